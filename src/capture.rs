//! Capture buffer manager.
//!
//! Fixed-capacity, append-only store of raw ADC readings. Storage is
//! supplied by the owner (static array or one startup allocation) and is
//! never resized. Entries past `len()` are stale and never exposed.

use crate::config::ConfigError;

/// Capture buffer over caller-provided storage.
pub struct CaptureBuffer<'a> {
    samples: &'a mut [u16],
    len: usize,
}

impl<'a> CaptureBuffer<'a> {
    /// Create empty buffer using the first `capacity` slots of `storage`.
    ///
    /// # Errors
    /// `StorageTooSmall` if `storage` is shorter than `capacity`.
    pub fn new(storage: &'a mut [u16], capacity: usize) -> Result<Self, ConfigError> {
        if storage.len() < capacity {
            return Err(ConfigError::StorageTooSmall);
        }
        Ok(Self {
            samples: &mut storage[..capacity],
            len: 0,
        })
    }

    /// Append one raw sample.
    ///
    /// Returns `true` when the buffer is full after this call. Pushing into
    /// a full buffer is a no-op that also returns `true`.
    #[inline]
    pub fn push(&mut self, raw_sample: u16) -> bool {
        if self.len >= self.samples.len() {
            return true;
        }

        self.samples[self.len] = raw_sample;
        self.len += 1;

        self.len == self.samples.len()
    }

    /// Drop all samples (session start). Storage is not cleared.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Valid sample count.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no samples recorded
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if capacity reached
    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.samples.len()
    }

    /// Maximum sample count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.samples.len()
    }

    /// Free slots left.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.len
    }

    /// Valid samples, oldest first.
    #[inline]
    pub fn as_slice(&self) -> &[u16] {
        &self.samples[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uses_only_capacity_slots() {
        let mut storage = [0u16; 8];
        let mut buf = CaptureBuffer::new(&mut storage, 3).unwrap();
        assert_eq!(buf.capacity(), 3);

        assert!(!buf.push(1));
        assert!(!buf.push(2));
        assert!(buf.push(3));
        assert!(buf.push(4));
        assert_eq!(buf.as_slice(), &[1, 2, 3]);
        drop(buf);

        assert_eq!(storage[3], 0);
    }

    #[test]
    fn test_storage_too_small() {
        let mut storage = [0u16; 2];
        assert_eq!(
            CaptureBuffer::new(&mut storage, 3).err(),
            Some(ConfigError::StorageTooSmall)
        );
    }
}
