//! Configuration error types

/// Configuration error with code and message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// C01: Sample rate is zero
    ZeroSampleRate,
    /// C02: Sample period would round to 0 µs
    SampleRateTooHigh,
    /// C03: Buffer duration is zero
    ZeroDuration,
    /// C04: Rate and duration give an empty buffer
    ZeroCapacity,
    /// C05: ADC full scale is zero
    ZeroFullScale,
    /// C06: PWM duty maximum is zero
    ZeroOutputMax,
    /// C07: Reference voltage not finite or not positive
    InvalidReference,
    /// C08: Gain not finite
    InvalidGain,
    /// C09: DC offset not finite
    InvalidOffset,
    /// C10: Buffer storage shorter than capacity
    StorageTooSmall,
    /// C11: Rate and duration give more samples than a `u32` counts
    CapacityTooLarge,
}

impl ConfigError {
    /// Get error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZeroSampleRate => "C01",
            Self::SampleRateTooHigh => "C02",
            Self::ZeroDuration => "C03",
            Self::ZeroCapacity => "C04",
            Self::ZeroFullScale => "C05",
            Self::ZeroOutputMax => "C06",
            Self::InvalidReference => "C07",
            Self::InvalidGain => "C08",
            Self::InvalidOffset => "C09",
            Self::StorageTooSmall => "C10",
            Self::CapacityTooLarge => "C11",
        }
    }

    /// Get error message
    pub fn message(&self) -> &'static str {
        match self {
            Self::ZeroSampleRate => "sample rate is zero",
            Self::SampleRateTooHigh => "sample rate above 1 MHz",
            Self::ZeroDuration => "buffer duration is zero",
            Self::ZeroCapacity => "buffer holds no samples",
            Self::ZeroFullScale => "ADC full scale is zero",
            Self::ZeroOutputMax => "output maximum is zero",
            Self::InvalidReference => "invalid reference voltage",
            Self::InvalidGain => "invalid gain",
            Self::InvalidOffset => "invalid DC offset",
            Self::StorageTooSmall => "buffer storage too small",
            Self::CapacityTooLarge => "buffer too large",
        }
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}
