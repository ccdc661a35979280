//! Module: config
//!
//! Purpose: Recorder configuration. Every numeric constant of the capture,
//! conditioning and playback path lives here.
//!
//! Architecture:
//! - `RecorderConfig::DEFAULT` is `const`, so static storage can be sized
//!   at compile time via [`CAPTURE_CAPACITY`]
//! - Builder-style setters for tests and alternative boards
//! - `validate()` rejects values the core cannot run with
//!
//! Safety: Safe. Plain `Copy` data, no unsafe.

pub mod error;

pub use error::ConfigError;

/// Default sample rate (8 kHz).
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 8_000;

/// Default playback gain (1.0 = unchanged amplitude).
pub const DEFAULT_GAIN: f32 = 2.0;

/// Default DC bias of the microphone front end (half of 3.3 V).
pub const DEFAULT_DC_OFFSET_VOLTS: f32 = 1.65;

/// Default recording length in milliseconds.
pub const DEFAULT_BUFFER_DURATION_MS: u32 = 2_000;

/// 12-bit ADC full-scale reading.
pub const DEFAULT_ADC_FULL_SCALE: u16 = 4_095;

/// ADC reference voltage.
pub const DEFAULT_REFERENCE_VOLTS: f32 = 3.3;

/// 8-bit PWM duty range (0-255).
pub const DEFAULT_OUTPUT_MAX: u8 = u8::MAX;

/// Busy-wait between control loop iterations while a session runs.
pub const DEFAULT_IDLE_DELAY_US: u32 = 10;

/// Highest sample rate whose period is still at least 1 µs.
pub const MAX_SAMPLE_RATE_HZ: u32 = 1_000_000;

/// Largest buffer, in samples. Sample counts are published as `u32` and
/// `usize` is 32 bits on the target.
pub const MAX_CAPACITY_SAMPLES: u64 = u32::MAX as u64;

/// Capture/playback capacity of the default configuration, in samples.
pub const CAPTURE_CAPACITY: usize = RecorderConfig::DEFAULT.capacity();

/// Recorder configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecorderConfig {
    /// Sampling and playback rate in Hz.
    pub sample_rate_hz: u32,

    /// Linear gain applied around the DC offset.
    pub gain: f32,

    /// DC bias removed before gain and restored after it.
    pub dc_offset_volts: f32,

    /// Recording length in milliseconds.
    pub buffer_duration_ms: u32,

    /// Highest raw ADC reading.
    pub adc_full_scale: u16,

    /// Voltage corresponding to `adc_full_scale`; also the clipping ceiling.
    pub reference_volts: f32,

    /// Highest PWM duty level.
    pub output_max: u8,

    /// Busy-wait between loop iterations while recording or playing, in
    /// microseconds. The idle state sleeps on the RTOS tick instead.
    pub idle_delay_us: u32,
}

impl RecorderConfig {
    /// Board defaults: 8 kHz, 2x gain, 1.65 V bias, 2 s buffer.
    pub const DEFAULT: Self = Self {
        sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
        gain: DEFAULT_GAIN,
        dc_offset_volts: DEFAULT_DC_OFFSET_VOLTS,
        buffer_duration_ms: DEFAULT_BUFFER_DURATION_MS,
        adc_full_scale: DEFAULT_ADC_FULL_SCALE,
        reference_volts: DEFAULT_REFERENCE_VOLTS,
        output_max: DEFAULT_OUTPUT_MAX,
        idle_delay_us: DEFAULT_IDLE_DELAY_US,
    };

    /// Exact sample count, `sample_rate_hz * buffer_duration_ms / 1000`.
    #[inline]
    pub const fn sample_count(&self) -> u64 {
        self.sample_rate_hz as u64 * self.buffer_duration_ms as u64 / 1000
    }

    /// Number of samples held by the capture and playback buffers.
    ///
    /// Saturates at [`MAX_CAPACITY_SAMPLES`]; [`validate`](Self::validate)
    /// rejects configurations above it.
    #[inline]
    pub const fn capacity(&self) -> usize {
        let count = self.sample_count();
        if count > MAX_CAPACITY_SAMPLES {
            MAX_CAPACITY_SAMPLES as usize
        } else {
            count as usize
        }
    }

    /// Sample period in microseconds (0 if the rate is 0).
    #[inline]
    pub const fn sample_period_us(&self) -> u64 {
        if self.sample_rate_hz == 0 {
            0
        } else {
            1_000_000 / self.sample_rate_hz as u64
        }
    }

    /// Config with given sample rate.
    pub const fn with_sample_rate(mut self, sample_rate_hz: u32) -> Self {
        self.sample_rate_hz = sample_rate_hz;
        self
    }

    /// Config with given gain.
    pub const fn with_gain(mut self, gain: f32) -> Self {
        self.gain = gain;
        self
    }

    /// Config with given DC offset.
    pub const fn with_dc_offset(mut self, dc_offset_volts: f32) -> Self {
        self.dc_offset_volts = dc_offset_volts;
        self
    }

    /// Config with given recording length.
    pub const fn with_duration_ms(mut self, buffer_duration_ms: u32) -> Self {
        self.buffer_duration_ms = buffer_duration_ms;
        self
    }

    /// Config with given ADC range.
    pub const fn with_adc(mut self, full_scale: u16, reference_volts: f32) -> Self {
        self.adc_full_scale = full_scale;
        self.reference_volts = reference_volts;
        self
    }

    /// Config with given PWM duty maximum.
    pub const fn with_output_max(mut self, output_max: u8) -> Self {
        self.output_max = output_max;
        self
    }

    /// Check that the core can run with this configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate_hz == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.sample_rate_hz > MAX_SAMPLE_RATE_HZ {
            return Err(ConfigError::SampleRateTooHigh);
        }
        if self.buffer_duration_ms == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        if self.sample_count() == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.sample_count() > MAX_CAPACITY_SAMPLES {
            return Err(ConfigError::CapacityTooLarge);
        }
        if self.adc_full_scale == 0 {
            return Err(ConfigError::ZeroFullScale);
        }
        if self.output_max == 0 {
            return Err(ConfigError::ZeroOutputMax);
        }
        if !self.reference_volts.is_finite() || self.reference_volts <= 0.0 {
            return Err(ConfigError::InvalidReference);
        }
        if !self.gain.is_finite() {
            return Err(ConfigError::InvalidGain);
        }
        if !self.dc_offset_volts.is_finite() {
            return Err(ConfigError::InvalidOffset);
        }
        Ok(())
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Startup banner.
impl core::fmt::Display for RecorderConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "- Sample rate: {} Hz", self.sample_rate_hz)?;
        writeln!(f, "- Gain: {:.1}x", self.gain)?;
        writeln!(f, "- DC offset: {:.2} V", self.dc_offset_volts)?;
        write!(
            f,
            "- Buffer: {} ms ({} samples)",
            self.buffer_duration_ms,
            self.capacity()
        )
    }
}
