//! Hardware Abstraction Layer for RustMicRecorder.
//!
//! Thin wrappers around ESP-IDF peripherals.
//! Business logic stays in core modules, HAL is just I/O.

#[cfg(target_os = "espidf")]
pub mod esp;

#[cfg(target_os = "espidf")]
pub use esp::EspRecorderIo;

/// Physical user control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// Held while recording (button A)
    Record,
    /// Pressed to start playback (button B)
    Play,
}

/// Binary status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// Lit while recording (red LED)
    Recording,
    /// Lit while playing (green LED)
    Playing,
}

/// I/O capabilities the session controller consumes.
///
/// Every call is non-blocking. Fallible calls report peripheral errors
/// through `Self::Error`; the controller passes them up unchanged.
pub trait RecorderIo {
    /// Peripheral error type.
    type Error: core::fmt::Debug;

    /// Monotonic time in microseconds.
    fn now_us(&mut self) -> u64;

    /// Most recent microphone ADC conversion.
    fn read_raw_sample(&mut self) -> Result<u16, Self::Error>;

    /// Set PWM duty level immediately.
    fn set_output_level(&mut self, level: u8) -> Result<(), Self::Error>;

    /// Debounced logical state of a control (true = pressed).
    fn control_active(&mut self, control: Control) -> bool;

    /// Switch a status indicator.
    fn set_indicator(&mut self, indicator: Indicator, on: bool) -> Result<(), Self::Error>;

    /// Power the capture peripheral up or down.
    ///
    /// Default: no-op, for converters that are always running.
    fn set_capture_enabled(&mut self, _enabled: bool) -> Result<(), Self::Error> {
        Ok(())
    }
}
