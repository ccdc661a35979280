//! Published session status.
//!
//! The session controller is the only writer. Any other context (status
//! task, console, interrupt) may read through [`SessionStatus::snapshot`]
//! without locks.

use core::sync::atomic::{AtomicU32, AtomicU8, Ordering};

/// Session controller state.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Waiting for a start request
    #[default]
    Idle = 0,
    /// Capturing microphone samples
    Recording = 1,
    /// Emitting conditioned samples on PWM
    Playing = 2,
}

impl SessionState {
    /// Convert from u8 (unknown values map to Idle)
    #[inline]
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => Self::Recording,
            2 => Self::Playing,
            _ => Self::Idle,
        }
    }

    /// True while sample or output ticks are running. The control loop must
    /// not block on console output in an active state.
    #[inline]
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Lowercase name for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Playing => "playing",
        }
    }
}

impl From<u8> for SessionState {
    fn from(v: u8) -> Self {
        Self::from_u8(v)
    }
}

impl From<SessionState> for u8 {
    fn from(s: SessionState) -> Self {
        s as u8
    }
}

/// Lock-free status shared with observers.
pub struct SessionStatus {
    state: AtomicU8,
    /// Valid samples in the capture buffer.
    valid_samples: AtomicU32,
    /// Samples emitted by the current (or last) playback.
    played: AtomicU32,
    /// Recording sessions started since boot.
    recordings: AtomicU32,
    /// Playback sessions started since boot.
    playbacks: AtomicU32,
}

impl SessionStatus {
    /// Create status (Idle, no samples).
    pub const fn new() -> Self {
        Self {
            state: AtomicU8::new(SessionState::Idle as u8),
            valid_samples: AtomicU32::new(0),
            played: AtomicU32::new(0),
            recordings: AtomicU32::new(0),
            playbacks: AtomicU32::new(0),
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Current valid sample count.
    #[inline]
    pub fn valid_samples(&self) -> u32 {
        self.valid_samples.load(Ordering::Acquire)
    }

    /// Samples emitted by the current playback.
    #[inline]
    pub fn played(&self) -> u32 {
        self.played.load(Ordering::Acquire)
    }

    pub(crate) fn set_state(&self, state: SessionState) {
        match state {
            SessionState::Recording => {
                self.recordings.fetch_add(1, Ordering::Relaxed);
            }
            SessionState::Playing => {
                self.playbacks.fetch_add(1, Ordering::Relaxed);
            }
            SessionState::Idle => {}
        }
        self.state.store(state as u8, Ordering::Release);
    }

    #[inline]
    pub(crate) fn set_valid_samples(&self, count: usize) {
        self.valid_samples.store(count as u32, Ordering::Release);
    }

    #[inline]
    pub(crate) fn set_played(&self, count: usize) {
        self.played.store(count as u32, Ordering::Release);
    }

    /// Get a snapshot of the current status.
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            state: self.state(),
            valid_samples: self.valid_samples(),
            played: self.played(),
            recordings: self.recordings.load(Ordering::Relaxed),
            playbacks: self.playbacks.load(Ordering::Relaxed),
        }
    }
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of session status at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub state: SessionState,
    pub valid_samples: u32,
    pub played: u32,
    pub recordings: u32,
    pub playbacks: u32,
}
