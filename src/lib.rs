//! # RustMicRecorder
//!
//! Microphone capture and PWM playback engine.
//!
//! ## Architecture
//!
//! A single polling loop drives a [`Session`]:
//! - [`SampleClock`] decides when a sample/output tick is due (drift-free)
//! - [`CaptureBuffer`] stores raw ADC readings while recording
//! - [`SignalConditioner`] turns them into PWM duty levels in one pass
//! - [`PlaybackBuffer`] replays those levels, one per tick
//!
//! Hardware is reached only through [`hal::RecorderIo`], so everything
//! above runs on the host in tests.

#![cfg_attr(not(test), no_std)]

pub mod capture;
pub mod clock;
pub mod conditioner;
pub mod config;
pub mod hal;
pub mod logging;
pub mod playback;
pub mod session;
pub mod status;

pub use capture::CaptureBuffer;
pub use clock::{tick_due, SampleClock};
pub use conditioner::SignalConditioner;
pub use config::{ConfigError, RecorderConfig, CAPTURE_CAPACITY};
pub use hal::{Control, Indicator, RecorderIo};
pub use logging::{LogLevel, LogStream};
pub use playback::PlaybackBuffer;
pub use session::{Session, StopReason, NEUTRAL_LEVEL};
pub use status::{SessionState, SessionStatus, StatusSnapshot};
