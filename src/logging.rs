//! RT-safe diagnostic logging for the drum module firmware.
//!
//! ```text
//! Tick loop              DiagLog              Console / host test
//! ──────────             ───────              ────────────────────
//!
//! rt_log!() ──────────▶ [L0][L1][L2] ──────▶ drain()
//! non-blocking            lock-free ring       leisure, off tick path
//! ```
//!
//! This ring is single-producer: only the tick loop ever pushes. There is
//! no `fetch_add` race to arbitrate, so `push` just compares the two index
//! atomics directly. Still RT-safe: `push` never blocks and drops the
//! message if the ring is full, consistent with the rule that the hot path
//! never waits on a consumer.
//!
//! This exists purely for the handful of boundary conditions the fault
//! layer also covers, never per-tick pad-state chatter.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, Ordering};

/// Maximum message length.
pub const MAX_MSG_LEN: usize = 64;

/// Log buffer size (number of entries). Must be a power of two.
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
    /// Timestamp in milliseconds (the same monotonic clock as the tick loop).
    pub timestamp_ms: u32,
    pub level: LogLevel,
    pub len: u8,
    pub msg: [u8; MAX_MSG_LEN],
}

impl Default for LogEntry {
    fn default() -> Self {
        Self {
            timestamp_ms: 0,
            level: LogLevel::Info,
            len: 0,
            msg: [0; MAX_MSG_LEN],
        }
    }
}

/// Lock-free, single-producer log ring.
///
/// One writer (the tick loop), one reader (a console task or a host test
/// harness draining at its own pace). `push` never blocks; if the reader
/// hasn't kept up, the new entry is dropped and counted rather than
/// overwriting an unread slot.
pub struct DiagLog<const N: usize = LOG_BUFFER_SIZE> {
    entries: UnsafeCell<[LogEntry; N]>,
    write_idx: AtomicU32,
    read_idx: AtomicU32,
    dropped: AtomicU32,
}

// SAFETY: single producer, single consumer, coordinated via the two index
// atomics. The producer only ever writes the slot at `write_idx` before
// publishing the new index with Release; the consumer only ever reads the
// slot at `read_idx` after observing it with Acquire.
unsafe impl<const N: usize> Sync for DiagLog<N> {}

impl<const N: usize> DiagLog<N> {
    const MASK: usize = N - 1;

    pub const fn new() -> Self {
        assert!(N.is_power_of_two(), "log buffer size must be power of 2");

        Self {
            entries: UnsafeCell::new(
                [LogEntry {
                    timestamp_ms: 0,
                    level: LogLevel::Info,
                    len: 0,
                    msg: [0; MAX_MSG_LEN],
                }; N],
            ),
            write_idx: AtomicU32::new(0),
            read_idx: AtomicU32::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    /// Push a log entry. Never blocks; returns `false` and bumps the drop
    /// counter if the ring is full rather than overwriting unread entries.
    #[inline]
    pub fn push(&self, timestamp_ms: u32, level: LogLevel, msg: &[u8]) -> bool {
        let write = self.write_idx.load(Ordering::Relaxed);
        let read = self.read_idx.load(Ordering::Acquire);

        if write.wrapping_sub(read) >= N as u32 {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        let idx = (write as usize) & Self::MASK;
        let len = msg.len().min(MAX_MSG_LEN) as u8;

        // SAFETY: single producer; this slot cannot be concurrently read
        // because `read_idx` has not yet reached `write` (checked above).
        unsafe {
            let entry = &mut (*self.entries.get())[idx];
            entry.timestamp_ms = timestamp_ms;
            entry.level = level;
            entry.len = len;
            entry.msg[..len as usize].copy_from_slice(&msg[..len as usize]);
        }

        self.write_idx.store(write.wrapping_add(1), Ordering::Release);
        true
    }

    /// Drain the next entry, if any.
    #[inline]
    pub fn drain(&self) -> Option<LogEntry> {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);

        if read == write {
            return None;
        }

        let idx = (read as usize) & Self::MASK;
        // SAFETY: single consumer; `write_idx` observed above guarantees
        // the producer has finished writing this slot.
        let entry = unsafe { (*self.entries.get())[idx] };

        self.read_idx.store(read.wrapping_add(1), Ordering::Release);
        Some(entry)
    }

    #[inline]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn has_entries(&self) -> bool {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        read != write
    }

    #[inline]
    pub fn pending(&self) -> u32 {
        let read = self.read_idx.load(Ordering::Relaxed);
        let write = self.write_idx.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }
}

impl<const N: usize> Default for DiagLog<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a message into a fixed buffer, for use by [`rt_log!`].
#[inline]
pub fn format_to_buffer(buf: &mut [u8], args: core::fmt::Arguments<'_>) -> usize {
    use core::fmt::Write;

    struct BufWriter<'a> {
        buf: &'a mut [u8],
        pos: usize,
    }

    impl<'a> Write for BufWriter<'a> {
        fn write_str(&mut self, s: &str) -> core::fmt::Result {
            let bytes = s.as_bytes();
            let remaining = self.buf.len() - self.pos;
            let to_write = bytes.len().min(remaining);
            self.buf[self.pos..self.pos + to_write].copy_from_slice(&bytes[..to_write]);
            self.pos += to_write;
            Ok(())
        }
    }

    let mut writer = BufWriter { buf, pos: 0 };
    let _ = core::fmt::write(&mut writer, args);
    writer.pos
}

/// RT-safe log macro. Use this on the tick path instead of `log::info!` et al.
#[macro_export]
macro_rules! rt_log {
    ($level:expr, $ring:expr, $timestamp:expr, $($arg:tt)*) => {{
        let mut buf = [0u8; $crate::logging::MAX_MSG_LEN];
        let len = $crate::logging::format_to_buffer(&mut buf, format_args!($($arg)*));
        $ring.push($timestamp, $level, &buf[..len]);
    }};
}

#[macro_export]
macro_rules! rt_info {
    ($ring:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Info, $ring, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! rt_warn {
    ($ring:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Warn, $ring, $timestamp, $($arg)*)
    };
}

#[macro_export]
macro_rules! rt_error {
    ($ring:expr, $timestamp:expr, $($arg:tt)*) => {
        $crate::rt_log!($crate::logging::LogLevel::Error, $ring, $timestamp, $($arg)*)
    };
}
