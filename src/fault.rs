//! Fault state management for the drum module's hardware boundary.
//!
//! # Philosophy
//!
//! There are no recoverable errors in the hit-detection state machine
//! itself: it is total over `(state, readings, now)`. The only things that
//! can go wrong live at the edge this firmware does not own: a sensor read
//! the HAL reports as failed, a serial write the transceiver couldn't
//! accept, a pad index that should never occur. None of those should ever
//! stop the tick driver from completing its pass.
//!
//! A dropped byte is safe. A stalled tick loop is not.

use core::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};

/// Fault codes for the hardware boundary this firmware does not own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCode {
    /// No fault (normal operation).
    None = 0,

    /// The sensor sampler reported a failed read for some channel.
    SensorReadError = 1,

    /// The MIDI transceiver could not accept a frame; it was dropped.
    SerialWriteDropped = 2,

    /// A pad index outside `0..NUM_PADS` was observed.
    InvalidPadIndex = 3,
}

impl FaultCode {
    /// Convert from raw u8 value.
    pub fn from_u8(value: u8) -> Self {
        match value {
            0 => FaultCode::None,
            1 => FaultCode::SensorReadError,
            2 => FaultCode::SerialWriteDropped,
            3 => FaultCode::InvalidPadIndex,
            _ => FaultCode::None,
        }
    }
}

/// Thread-safe fault state.
///
/// Written from the tick path whenever a boundary operation fails; read by
/// a lower-priority context (console, host test) that wants to observe it
/// out of band. Never gates or alters pad state.
///
/// # Usage
///
/// ```ignore
/// static FAULT: FaultState = FaultState::new();
///
/// if sensor.read(channel).is_err() {
///     FAULT.set(FaultCode::SensorReadError, channel as u32);
/// }
/// ```
pub struct FaultState {
    /// True if fault is active.
    active: AtomicBool,

    /// Fault code (reason for fault).
    code: AtomicU8,

    /// Additional data (meaning depends on the code, e.g. a channel or pad index).
    data: AtomicU32,

    /// Total fault count since boot (never cleared).
    count: AtomicU32,
}

impl FaultState {
    /// Create new fault state (no fault).
    pub const fn new() -> Self {
        Self {
            active: AtomicBool::new(false),
            code: AtomicU8::new(0),
            data: AtomicU32::new(0),
            count: AtomicU32::new(0),
        }
    }

    /// Set fault state.
    ///
    /// This atomically sets the fault as active with the given code and data.
    /// Increments the fault counter. Never panics, never blocks.
    #[inline]
    pub fn set(&self, code: FaultCode, data: u32) {
        self.code.store(code as u8, Ordering::Release);
        self.data.store(data, Ordering::Release);
        self.count.fetch_add(1, Ordering::Relaxed);
        self.active.store(true, Ordering::Release);
    }

    /// Check if fault is currently active.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Get fault code (only meaningful if `is_active()` is true).
    #[inline]
    pub fn code(&self) -> FaultCode {
        FaultCode::from_u8(self.code.load(Ordering::Acquire))
    }

    /// Get fault data (meaning depends on fault code).
    #[inline]
    pub fn data(&self) -> u32 {
        self.data.load(Ordering::Acquire)
    }

    /// Get total fault count since boot.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count.load(Ordering::Relaxed)
    }

    /// Clear fault state (after recovery).
    ///
    /// Note: This clears the active flag but does NOT reset the counter.
    /// Fault history is preserved for diagnostics.
    #[inline]
    pub fn clear(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Get a snapshot of the current fault state.
    #[inline]
    pub fn snapshot(&self) -> FaultSnapshot {
        FaultSnapshot {
            active: self.is_active(),
            code: self.code(),
            data: self.data(),
            count: self.count(),
        }
    }
}

impl Default for FaultState {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of fault state at a point in time.
#[derive(Clone, Copy, Debug)]
pub struct FaultSnapshot {
    pub active: bool,
    pub code: FaultCode,
    pub data: u32,
    pub count: u32,
}
