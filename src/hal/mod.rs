//! Hardware Abstraction Layer for the drum module firmware.
//!
//! Thin wrappers around ESP-IDF peripherals. Business logic stays in the
//! core modules (`pad`, `pedal`, `tick`); HAL is just I/O, and the core
//! never depends on it directly, only on the `SensorSampler`, `PedalInput`,
//! and `MidiSink` traits it implements.

pub mod gpio;
pub mod serial;
