//! Non-blocking diagnostic log for RustMicRecorder.
//!
//! # Architecture
//!
//! ```text
//! Control loop           LogStream            Console drain
//! ────────────           ─────────            ─────────────
//!
//! rec_info!() ─────────▶ [L0][L1][L2] ──────▶ print / UART
//! fixed-size entry        ring buffer         between ticks
//! never blocks            drops if full
//! ```
//!
//! # Rules
//!
//! - The sampling path never calls blocking output (`println!`, UART writes)
//! - Messages may be dropped if the ring is full; the drop count is kept
//! - Logging never changes control flow

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 96;

/// Log ring size (number of entries).
pub const LOG_BUFFER_SIZE: usize = 32;

/// Log level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    /// Convert to string for output.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }
}

/// A single log entry.
#[derive(Clone, Copy)]
pub struct LogEntry {
    /// Timestamp in microseconds.
    pub timestamp_us: u64,
    /// Log level.
    pub level: LogLevel,
    /// Message length.
    pub len: u8,
    /// Message bytes (not null-terminated).
    pub msg: [u8; MAX_MSG_LEN],
}

impl LogEntry {
    const EMPTY: Self = Self {
        timestamp_us: 0,
        level: LogLevel::Info,
        len: 0,
        msg: [0; MAX_MSG_LEN],
    };

    /// Message text (lossy: invalid UTF-8 yields a placeholder).
    pub fn text(&self) -> &str {
        core::str::from_utf8(&self.msg[..self.len as usize]).unwrap_or("<invalid utf8>")
    }
}

impl Default for LogEntry {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// One ring slot: the entry plus its publication sequence.
struct Slot {
    /// `pos` when free for the write at `pos`, `pos + 1` once that entry
    /// is published, `pos + N` after it was drained.
    seq: AtomicU32,
    entry: UnsafeCell<LogEntry>,
}

impl Slot {
    #[allow(clippy::declare_interior_mutable_const)]
    const EMPTY: Self = Self {
        seq: AtomicU32::new(0),
        entry: UnsafeCell::new(LogEntry::EMPTY),
    };
}

/// Lock-free bounded log ring.
///
/// Any number of producers and consumers may share it. Positions are
/// claimed with compare-exchange and every slot carries a sequence number,
/// so an entry is only read after its writer published it and only
/// rewritten after a reader released it.
pub struct LogStream<const N: usize = LOG_BUFFER_SIZE> {
    slots: [Slot; N],
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: A slot's entry is written only by the producer that won the CAS
// on write_idx for that position, while seq == pos, and read only by the
// consumer that won the CAS on read_idx, while seq == pos + 1. The seq
// store (Release) / load (Acquire) pair orders those accesses.
unsafe impl<const N: usize> Sync for LogStream<N> {}
unsafe impl<const N: usize> Send for LogStream<N> {}

impl<const N: usize> LogStream<N> {
    const MASK: usize = N - 1;

    /// Create a new empty log stream.
    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "Log buffer size must be power of 2");
        assert!(N <= i32::MAX as usize, "Log buffer size too large");

        let mut slots = [Slot::EMPTY; N];
        let mut i = 0;
        while i < N {
            slots[i].seq = AtomicU32::new(i as u32);
            i += 1;
        }

        Self {
            slots,
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a log entry (never blocks).
    ///
    /// Returns `true` if queued, `false` if dropped (ring full).
    /// Messages longer than [`MAX_MSG_LEN`] are truncated.
    #[inline]
    pub fn push(&self, timestamp_us: u64, level: LogLevel, msg: &[u8]) -> bool {
        let mut pos = self.write_idx.load(Ordering::Relaxed);

        let slot = loop {
            let slot = &self.slots[(pos as usize) & Self::MASK];
            let lap = slot.seq.load(Ordering::Acquire).wrapping_sub(pos) as i32;

            if lap == 0 {
                match self.write_idx.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => break slot,
                    Err(current) => pos = current,
                }
            } else if lap < 0 {
                // Previous lap's entry not drained yet
                self.dropped.fetch_add(1, Ordering::Relaxed);
                return false;
            } else {
                pos = self.write_idx.load(Ordering::Relaxed);
            }
        };

        // SAFETY: this producer owns position pos; no consumer reads the
        // slot until seq is published below.
        unsafe {
            let entry = &mut *slot.entry.get();
            entry.timestamp_us = timestamp_us;
            entry.level = level;
            entry.len = msg.len().min(MAX_MSG_LEN) as u8;
            entry.msg[..entry.len as usize].copy_from_slice(&msg[..entry.len as usize]);
        }

        slot.seq.store(pos.wrapping_add(1), Ordering::Release);
        true
    }

    /// Take the oldest published entry, `None` if empty.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let mut pos = self.read_idx.load(Ordering::Relaxed);

        let slot = loop {
            let slot = &self.slots[(pos as usize) & Self::MASK];
            let lap = slot
                .seq
                .load(Ordering::Acquire)
                .wrapping_sub(pos.wrapping_add(1)) as i32;

            if lap == 0 {
                match self.read_idx.compare_exchange_weak(
                    pos,
                    pos.wrapping_add(1),
                    Ordering::Relaxed,
                    Ordering::Relaxed,
                ) {
                    Ok(_) => break slot,
                    Err(current) => pos = current,
                }
            } else if lap < 0 {
                return None;
            } else {
                pos = self.read_idx.load(Ordering::Relaxed);
            }
        };

        // SAFETY: this consumer owns position pos; the producer's Release
        // store of seq happened before the Acquire load above.
        let entry = unsafe { *slot.entry.get() };

        slot.seq.store(pos.wrapping_add(N as u32), Ordering::Release);
        Some(entry)
    }

    /// Get count of dropped messages.
    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Reset dropped counter (e.g., after reporting).
    #[inline]
    pub fn reset_dropped(&self) {
        self.dropped.store(0, Ordering::Relaxed);
    }

    /// Get number of entries claimed but not yet drained.
    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for LogStream<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a buffer, truncating at the buffer end.
///
/// Returns the number of bytes written.
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    let mut writer = SliceWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl core::fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let mut take = bytes.len().min(self.buf.len() - self.pos);
        // Never split a UTF-8 sequence
        while take < bytes.len() && !s.is_char_boundary(take) {
            take -= 1;
        }
        self.buf[self.pos..self.pos + take].copy_from_slice(&bytes[..take]);
        self.pos += take;
        Ok(())
    }
}

/// Drain every pending entry into `out` as `[timestamp_us] LEVEL: message` lines.
///
/// Dropped messages since the last drain are reported as one extra line.
/// Returns the number of entries written.
pub fn drain_into<const N: usize, W: core::fmt::Write>(
    stream: &LogStream<N>,
    out: &mut W,
) -> Result<usize, core::fmt::Error> {
    let mut count = 0;
    let mut last_ts = 0;

    while let Some(entry) = stream.drain() {
        writeln!(
            out,
            "[{:10}] {}: {}",
            entry.timestamp_us,
            entry.level.as_str(),
            entry.text()
        )?;
        last_ts = entry.timestamp_us;
        count += 1;
    }

    let dropped = stream.dropped();
    if dropped > 0 {
        writeln!(out, "[{:10}] WARN: {} log messages dropped", last_ts, dropped)?;
        stream.reset_dropped();
    }

    Ok(count)
}

/// Non-blocking log macro.
///
/// # Example
///
/// ```ignore
/// rec_log!(LogLevel::Info, LOG_STREAM, now_us, "captured {} samples", n);
/// ```
#[macro_export]
macro_rules! rec_log {
    ($level:expr, $stream:expr, $timestamp:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $stream.push($timestamp, $level, &buf[..len]);
    }};
}

/// Info log.
#[macro_export]
macro_rules! rec_info {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rec_log!($crate::logging::LogLevel::Info, $stream, $timestamp, $($arg)*)
    };
}

/// Warning log.
#[macro_export]
macro_rules! rec_warn {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rec_log!($crate::logging::LogLevel::Warn, $stream, $timestamp, $($arg)*)
    };
}

/// Error log.
#[macro_export]
macro_rules! rec_error {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rec_log!($crate::logging::LogLevel::Error, $stream, $timestamp, $($arg)*)
    };
}

/// Debug log.
#[macro_export]
macro_rules! rec_debug {
    ($stream:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rec_log!($crate::logging::LogLevel::Debug, $stream, $timestamp, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_stream_basic() {
        let stream = LogStream::<16>::new();

        assert!(stream.push(1000, LogLevel::Info, b"test message"));
        assert_eq!(stream.pending(), 1);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.timestamp_us, 1000);
        assert_eq!(entry.level, LogLevel::Info);
        assert_eq!(entry.text(), "test message");

        assert_eq!(stream.pending(), 0);
        assert!(stream.drain().is_none());
    }

    #[test]
    fn test_log_stream_full() {
        let stream = LogStream::<4>::new();

        for i in 0..4 {
            assert!(stream.push(i, LogLevel::Info, b"x"));
        }

        // Should drop
        assert!(!stream.push(5, LogLevel::Info, b"5"));
        assert_eq!(stream.dropped(), 1);

        // Drain one, should be able to push again
        stream.drain();
        assert!(stream.push(6, LogLevel::Info, b"6"));
    }

    #[test]
    fn test_format_to_buffer_truncates() {
        let mut buf = [0u8; 32];
        let len = format_to_buffer(&mut buf, format_args!("Hello {}", 42));
        assert_eq!(&buf[..len], b"Hello 42");

        // 'é' is two bytes and would not fit after 'h'
        let mut small = [0u8; 2];
        let len = format_to_buffer(&mut small, format_args!("héllo"));
        assert_eq!(&small[..len], b"h");
    }

    #[test]
    fn test_macro_pushes_level() {
        let stream = LogStream::<8>::new();
        crate::rec_warn!(stream, 42, "lag {} periods", 3);

        let entry = stream.drain().unwrap();
        assert_eq!(entry.level, LogLevel::Warn);
        assert_eq!(entry.timestamp_us, 42);
        assert_eq!(entry.text(), "lag 3 periods");
    }

    #[test]
    fn test_drain_into_reports_drops() {
        let stream = LogStream::<2>::new();
        stream.push(10, LogLevel::Info, b"one");
        stream.push(20, LogLevel::Error, b"two");
        stream.push(30, LogLevel::Info, b"three");

        let mut out = String::new();
        assert_eq!(drain_into(&stream, &mut out), Ok(2));
        assert_eq!(
            out,
            "[        10] INFO: one\n\
             [        20] ERROR: two\n\
             [        20] WARN: 1 log messages dropped\n"
        );
        assert_eq!(stream.dropped(), 0);
    }

    #[test]
    fn test_multiple_producers_keep_every_message() {
        use std::sync::Arc;
        use std::thread;

        let stream = Arc::new(LogStream::<64>::new());
        let mut handles = vec![];

        for i in 0..4 {
            let stream = Arc::clone(&stream);
            handles.push(thread::spawn(move || {
                for j in 0..10 {
                    let msg = format!("task {} msg {}", i, j);
                    assert!(stream.push(j, LogLevel::Info, msg.as_bytes()));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let mut seen = std::collections::HashSet::new();
        while let Some(entry) = stream.drain() {
            assert!(seen.insert(entry.text().to_string()), "duplicate {}", entry.text());
        }
        assert_eq!(seen.len(), 40);
        assert_eq!(stream.dropped(), 0);
    }

    #[test]
    fn test_concurrent_push_and_drain_accounts_for_all() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;
        use std::thread;

        let stream = Arc::new(LogStream::<8>::new());
        let done = Arc::new(AtomicBool::new(false));

        let consumer = {
            let stream = Arc::clone(&stream);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut drained = 0u32;
                loop {
                    let finished = done.load(Ordering::Acquire);
                    while let Some(entry) = stream.drain() {
                        assert!(entry.text().starts_with("p"));
                        drained += 1;
                    }
                    if finished {
                        return drained;
                    }
                    thread::yield_now();
                }
            })
        };

        let producers: Vec<_> = (0..4)
            .map(|i| {
                let stream = Arc::clone(&stream);
                thread::spawn(move || {
                    for j in 0..250u64 {
                        let msg = format!("p{} {}", i, j);
                        stream.push(j, LogLevel::Debug, msg.as_bytes());
                    }
                })
            })
            .collect();
        for handle in producers {
            handle.join().unwrap();
        }
        done.store(true, Ordering::Release);

        let drained = consumer.join().unwrap();
        assert_eq!(drained + stream.dropped(), 1000);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Debug);
    }
}
