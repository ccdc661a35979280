//! Playback buffer manager.
//!
//! Holds the conditioned duty levels of one playback session. The whole
//! buffer is computed in one synchronous pass by [`PlaybackBuffer::prepare`]
//! before the first output tick; playback then only reads it.

use crate::capture::CaptureBuffer;
use crate::conditioner::SignalConditioner;
use crate::config::ConfigError;

/// Playback buffer over caller-provided storage.
pub struct PlaybackBuffer<'a> {
    levels: &'a mut [u8],
    len: usize,
    cursor: usize,
}

impl<'a> PlaybackBuffer<'a> {
    /// Create empty buffer using the first `capacity` slots of `storage`.
    ///
    /// # Errors
    /// `StorageTooSmall` if `storage` is shorter than `capacity`.
    pub fn new(storage: &'a mut [u8], capacity: usize) -> Result<Self, ConfigError> {
        if storage.len() < capacity {
            return Err(ConfigError::StorageTooSmall);
        }
        Ok(Self {
            levels: &mut storage[..capacity],
            len: 0,
            cursor: 0,
        })
    }

    /// Condition every valid capture sample and rewind the cursor.
    ///
    /// Samples beyond this buffer's capacity are ignored.
    pub fn prepare(&mut self, capture: &CaptureBuffer<'_>, conditioner: &SignalConditioner) {
        self.len = conditioner.condition_into(capture.as_slice(), self.levels);
        self.cursor = 0;
    }

    /// Level the next [`advance`](Self::advance) would return.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.as_slice().get(self.cursor).copied()
    }

    /// Next duty level, or `None` once every prepared level was emitted.
    #[inline]
    pub fn advance(&mut self) -> Option<u8> {
        if self.cursor >= self.len {
            return None;
        }

        let level = self.levels[self.cursor];
        self.cursor += 1;
        Some(level)
    }

    /// Restart from the first level without reconditioning.
    #[inline]
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Prepared level count.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Levels already emitted this session.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Levels still to emit.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.len - self.cursor
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.len
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.levels.len()
    }

    /// Prepared levels.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.levels[..self.len]
    }
}
