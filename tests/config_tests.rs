//! Recorder configuration tests

use rust_mic_recorder::{ConfigError, RecorderConfig, CAPTURE_CAPACITY};

#[test]
fn test_capacity_is_rate_times_duration() {
    for rate in [1_000u32, 8_000, 11_025, 16_000, 22_050, 44_100, 48_000] {
        for duration_ms in [1u32, 10, 250, 1_000, 2_000, 5_000] {
            let config = RecorderConfig::DEFAULT
                .with_sample_rate(rate)
                .with_duration_ms(duration_ms);
            let expected = (rate as u64 * duration_ms as u64 / 1000) as usize;
            assert_eq!(config.capacity(), expected, "{} Hz x {} ms", rate, duration_ms);
        }
    }
}

#[test]
fn test_default_values() {
    let config = RecorderConfig::default();
    assert_eq!(config.sample_rate_hz, 8_000);
    assert_eq!(config.buffer_duration_ms, 2_000);
    assert_eq!(config.capacity(), 16_000);
    assert_eq!(CAPTURE_CAPACITY, 16_000);
    assert_eq!(config.sample_period_us(), 125);
    assert_eq!(config.adc_full_scale, 4095);
    assert_eq!(config.output_max, 255);
    assert_eq!(config.idle_delay_us, 10);
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn test_validate_rejects_bad_values() {
    let base = RecorderConfig::DEFAULT;

    assert_eq!(base.with_sample_rate(0).validate(), Err(ConfigError::ZeroSampleRate));
    assert_eq!(
        base.with_sample_rate(2_000_000).validate(),
        Err(ConfigError::SampleRateTooHigh)
    );
    assert_eq!(base.with_duration_ms(0).validate(), Err(ConfigError::ZeroDuration));
    // 10 Hz for 50 ms rounds down to no samples
    assert_eq!(
        base.with_sample_rate(10).with_duration_ms(50).validate(),
        Err(ConfigError::ZeroCapacity)
    );
    // 1 MHz for 4_294_968 ms no longer fits a u32 sample count
    let huge = base.with_sample_rate(1_000_000).with_duration_ms(4_294_968);
    assert_eq!(huge.sample_count(), u32::MAX as u64 + 705);
    assert_eq!(huge.validate(), Err(ConfigError::CapacityTooLarge));
    assert_eq!(huge.capacity(), u32::MAX as usize);
    assert_eq!(
        base.with_sample_rate(1_000_000)
            .with_duration_ms(4_294_967)
            .validate(),
        Ok(())
    );
    assert_eq!(base.with_adc(0, 3.3).validate(), Err(ConfigError::ZeroFullScale));
    assert_eq!(base.with_adc(4095, 0.0).validate(), Err(ConfigError::InvalidReference));
    assert_eq!(base.with_adc(4095, f32::NAN).validate(), Err(ConfigError::InvalidReference));
    assert_eq!(base.with_output_max(0).validate(), Err(ConfigError::ZeroOutputMax));
    assert_eq!(base.with_gain(f32::INFINITY).validate(), Err(ConfigError::InvalidGain));
    assert_eq!(base.with_dc_offset(f32::NAN).validate(), Err(ConfigError::InvalidOffset));
}

#[test]
fn test_error_codes_display() {
    assert_eq!(ConfigError::ZeroSampleRate.code(), "C01");
    assert_eq!(
        ConfigError::StorageTooSmall.to_string(),
        "C10: buffer storage too small"
    );
    assert_eq!(ConfigError::CapacityTooLarge.code(), "C11");
}
