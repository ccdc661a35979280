//! Session controller finite state machine.
//!
//! Pure logic over [`RecorderIo`]: polled once per loop iteration, does one
//! state's work and returns. Fully testable on host with a mock I/O.
//!
//! # States
//!
//! ```text
//!            record pressed                 play pressed (samples > 0)
//!   ┌────────────────────────▶ Recording    ┌──────────────────────▶ Playing
//! Idle ◀──────────────────────────┘       Idle ◀────────────────────────┘
//!        record released / buffer full          last sample emitted
//! ```
//!
//! Start requests are press edges; stopping a recording follows the button
//! level. A control held across the end of a session does not start a new one.

use crate::capture::CaptureBuffer;
use crate::clock::SampleClock;
use crate::conditioner::SignalConditioner;
use crate::config::{ConfigError, RecorderConfig};
use crate::hal::{Control, Indicator, RecorderIo};
use crate::logging::LogStream;
use crate::playback::PlaybackBuffer;
use crate::status::{SessionState, SessionStatus};
use crate::{rec_debug, rec_info, rec_warn};

/// Output level commanded when playback ends.
pub const NEUTRAL_LEVEL: u8 = 0;

/// Why a recording ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Record control released.
    Released,
    /// Capture buffer full.
    CapacityReached,
}

impl StopReason {
    fn as_str(self) -> &'static str {
        match self {
            StopReason::Released => "stopped",
            StopReason::CapacityReached => "complete",
        }
    }
}

/// Press-edge detector for a polled control.
#[derive(Clone, Copy, Debug, Default)]
struct PressEdge {
    was_active: bool,
}

impl PressEdge {
    /// Returns true on the released → pressed transition.
    #[inline]
    fn update(&mut self, active: bool) -> bool {
        let pressed = active && !self.was_active;
        self.was_active = active;
        pressed
    }
}

/// Capture/playback session controller.
///
/// Owns every piece of mutable recorder state. Buffer storage is borrowed
/// from the caller so it can live in a static or a single startup
/// allocation.
pub struct Session<'a, const L: usize = { crate::logging::LOG_BUFFER_SIZE }> {
    config: RecorderConfig,
    state: SessionState,
    clock: SampleClock,
    conditioner: SignalConditioner,
    capture: CaptureBuffer<'a>,
    playback: PlaybackBuffer<'a>,

    record_edge: PressEdge,
    play_edge: PressEdge,

    /// Worst clock backlog (periods) of the running session
    max_backlog: u64,

    log: &'a LogStream<L>,
    status: &'a SessionStatus,
}

impl<'a, const L: usize> Session<'a, L> {
    /// Create an idle session.
    ///
    /// # Errors
    /// Any [`RecorderConfig::validate`] error, or `StorageTooSmall` if a
    /// storage slice is shorter than `config.capacity()`.
    pub fn new(
        config: RecorderConfig,
        capture_storage: &'a mut [u16],
        playback_storage: &'a mut [u8],
        log: &'a LogStream<L>,
        status: &'a SessionStatus,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let capacity = config.capacity();
        let capture = CaptureBuffer::new(capture_storage, capacity)?;
        let playback = PlaybackBuffer::new(playback_storage, capacity)?;

        status.set_state(SessionState::Idle);
        status.set_valid_samples(0);
        status.set_played(0);

        Ok(Self {
            config,
            state: SessionState::Idle,
            clock: SampleClock::new(config.sample_period_us()),
            conditioner: SignalConditioner::from_config(&config),
            capture,
            playback,
            record_edge: PressEdge::default(),
            play_edge: PressEdge::default(),
            max_backlog: 0,
            log,
            status,
        })
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Valid sample count of the capture buffer.
    #[inline]
    pub fn valid_samples(&self) -> usize {
        self.capture.len()
    }

    #[inline]
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    #[inline]
    pub fn capture(&self) -> &CaptureBuffer<'a> {
        &self.capture
    }

    #[inline]
    pub fn playback(&self) -> &PlaybackBuffer<'a> {
        &self.playback
    }

    /// Run one control loop iteration.
    ///
    /// Returns the state after this iteration. Peripheral errors are
    /// returned as-is; the session state is left unchanged by a failed call
    /// except for side effects that already completed.
    pub fn poll<I: RecorderIo>(&mut self, io: &mut I) -> Result<SessionState, I::Error> {
        let now_us = io.now_us();
        let record_active = io.control_active(Control::Record);
        let record_pressed = self.record_edge.update(record_active);
        let play_pressed = self.play_edge.update(io.control_active(Control::Play));

        match self.state {
            SessionState::Idle => {
                if record_pressed {
                    self.start_recording(io, now_us)?;
                } else if play_pressed {
                    self.start_playback(io, now_us)?;
                }
            }
            SessionState::Recording => {
                // The tick is consumed only after a successful read, so a
                // failed read is retried on the next poll instead of leaving
                // a gap in the capture.
                if self.clock.is_due(now_us) {
                    self.track_backlog(now_us);
                    let raw = io.read_raw_sample()?;
                    self.clock.advance();
                    let full = self.capture.push(raw);
                    self.status.set_valid_samples(self.capture.len());

                    if full {
                        self.stop_recording(io, now_us, StopReason::CapacityReached)?;
                        return Ok(self.state);
                    }
                }

                if !record_active {
                    self.stop_recording(io, now_us, StopReason::Released)?;
                }
            }
            SessionState::Playing => {
                if self.clock.is_due(now_us) {
                    self.track_backlog(now_us);
                    match self.playback.peek() {
                        Some(level) => {
                            io.set_output_level(level)?;
                            self.clock.advance();
                            self.playback.advance();
                            self.status.set_played(self.playback.cursor());
                        }
                        None => {
                            self.clock.advance();
                            self.finish_playback(io, now_us)?;
                        }
                    }
                }
            }
        }

        Ok(self.state)
    }

    fn start_recording<I: RecorderIo>(&mut self, io: &mut I, now_us: u64) -> Result<(), I::Error> {
        io.set_capture_enabled(true)?;

        self.capture.clear();
        self.clock.reset(now_us);
        self.max_backlog = 0;
        self.enter(SessionState::Recording);
        self.status.set_valid_samples(0);

        rec_info!(
            self.log,
            now_us,
            "recording: {} Hz, gain {:.1}, buffer {} samples",
            self.config.sample_rate_hz,
            self.config.gain,
            self.capture.capacity()
        );

        io.set_indicator(Indicator::Recording, true)
    }

    fn stop_recording<I: RecorderIo>(
        &mut self,
        io: &mut I,
        now_us: u64,
        reason: StopReason,
    ) -> Result<(), I::Error> {
        self.enter(SessionState::Idle);

        rec_info!(
            self.log,
            now_us,
            "recording {}: {} samples",
            reason.as_str(),
            self.capture.len()
        );
        self.report_backlog(now_us);

        io.set_capture_enabled(false)?;
        io.set_indicator(Indicator::Recording, false)
    }

    fn start_playback<I: RecorderIo>(&mut self, io: &mut I, now_us: u64) -> Result<(), I::Error> {
        if self.capture.is_empty() {
            rec_warn!(self.log, now_us, "nothing to play");
            return Ok(());
        }

        // One synchronous pass, before the first output tick
        self.playback.prepare(&self.capture, &self.conditioner);

        self.clock.reset(now_us);
        self.max_backlog = 0;
        self.status.set_played(0);
        self.enter(SessionState::Playing);

        rec_info!(self.log, now_us, "playback: {} samples", self.playback.len());

        io.set_indicator(Indicator::Playing, true)
    }

    fn finish_playback<I: RecorderIo>(&mut self, io: &mut I, now_us: u64) -> Result<(), I::Error> {
        self.enter(SessionState::Idle);

        rec_info!(self.log, now_us, "playback complete: {} samples", self.playback.cursor());
        self.report_backlog(now_us);

        io.set_output_level(NEUTRAL_LEVEL)?;
        io.set_indicator(Indicator::Playing, false)
    }

    #[inline]
    fn enter(&mut self, state: SessionState) {
        self.state = state;
        self.status.set_state(state);
    }

    #[inline]
    fn track_backlog(&mut self, now_us: u64) {
        self.max_backlog = self.max_backlog.max(self.clock.backlog(now_us));
    }

    fn report_backlog(&self, now_us: u64) {
        if self.max_backlog > 0 {
            rec_warn!(self.log, now_us, "loop fell behind by up to {} periods", self.max_backlog);
        } else {
            rec_debug!(self.log, now_us, "sample clock kept up");
        }
    }
}
