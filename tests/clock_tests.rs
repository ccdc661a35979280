//! Sample clock tests

use rust_mic_recorder::clock::{tick_due, SampleClock};

const PERIOD_US: u64 = 125; // 8 kHz

#[test]
fn test_not_due_before_period() {
    let mut clock = SampleClock::new(PERIOD_US);
    clock.reset(10_000);

    for now in 10_000..10_125 {
        assert!(!clock.poll(now), "fired early at {}", now);
    }
    assert!(clock.poll(10_125));
}

#[test]
fn test_at_most_one_tick_per_poll() {
    let mut clock = SampleClock::new(PERIOD_US);
    clock.reset(0);

    // Ten periods elapsed, but a single poll fires once
    assert!(clock.poll(1_250));
    assert_eq!(clock.anchor_us(), 125);
    assert_eq!(clock.backlog(1_250), 9);
}

#[test]
fn test_delayed_polls_catch_up_without_drift() {
    let mut clock = SampleClock::new(PERIOD_US);
    clock.reset(0);

    // Irregular polling: jitter plus a long stall
    let mut fired = 0u64;
    let mut now = 0u64;
    let steps = [3u64, 130, 7, 1_000, 1, 1, 1, 260, 40, 5_000, 2, 2, 2];
    for step in steps.iter().cycle().take(2_000) {
        now += step;
        if clock.poll(now) {
            fired += 1;
        }
        // Never ahead of wall time, never more than the elapsed periods
        assert!(fired <= now / PERIOD_US);
        assert_eq!(clock.anchor_us(), fired * PERIOD_US);
    }

    // Keep polling without advancing time: clock catches up exactly
    while clock.poll(now) {
        fired += 1;
    }
    assert_eq!(fired, now / PERIOD_US);
    assert_eq!(clock.backlog(now), 0);
    assert!(now - clock.anchor_us() < PERIOD_US);
}

#[test]
fn test_steady_polling_fires_every_period() {
    let mut clock = SampleClock::from_rate(8_000);
    clock.reset(500);

    let mut fires = Vec::new();
    for now in (500..=500 + 10 * PERIOD_US).step_by(25) {
        if clock.poll(now) {
            fires.push(now);
        }
    }

    let expected: Vec<u64> = (1..=10).map(|k| 500 + k * PERIOD_US).collect();
    assert_eq!(fires, expected);
}

#[test]
fn test_reset_reanchors() {
    let mut clock = SampleClock::new(PERIOD_US);
    clock.reset(0);
    assert!(clock.poll(200));

    clock.reset(1_000_000);
    assert_eq!(clock.anchor_us(), 1_000_000);
    assert!(!clock.poll(1_000_100));
    assert!(clock.poll(1_000_125));
}

#[test]
fn test_tick_due_predicate() {
    assert!(tick_due(250, 125, 125));
    assert!(!tick_due(249, 125, 125));
    // Anchor in the future: nothing elapsed
    assert!(!tick_due(100, 125, 125));
}
