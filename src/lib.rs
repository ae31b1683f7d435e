//! # drum-module-firmware
//!
//! Real-time firmware core for an electronic drum module: per-pad
//! hit-detection, dual-zone zone classification, cymbal choke detection,
//! and hi-hat pedal coupling, converting analog piezo readings into a
//! MIDI note-on/note-off stream.
//!
//! ## Architecture
//!
//! The tick driver ([`tick::TickDriver`]) owns one [`pad::PadController`]
//! per physical pad plus the process-wide collaborators, the crosstalk
//! [`arbiter::CrosstalkArbiter`] and the [`event::EventEmitter`], and
//! advances them all in fixed order on every call to `tick()`. Every pure
//! module (`pad`, `pedal`, `velocity`, `arbiter`) is host-testable without
//! hardware behind it: the hardware-specific seams (`sensor`, `event::MidiSink`,
//! `clock::MillisClock`) are traits implemented only by `hal` and `main`.

#![cfg_attr(not(test), no_std)]

pub mod arbiter;
pub mod clock;
pub mod config;
pub mod event;
pub mod fault;
pub mod hal;
pub mod logging;
pub mod pad;
pub mod pedal;
pub mod sensor;
pub mod tick;
pub mod velocity;
pub mod voice;

pub use config::{GainTrimOverlay, PadConfig, PadRole, Tunables, CLASSIFIER, DEFAULT_PADS, TUNABLES};
pub use event::{EventEmitter, MidiSink};
pub use fault::{FaultCode, FaultState};
pub use pad::{PadContext, PadController, PadState};
pub use pedal::PedalController;
pub use sensor::{PedalInput, SensorSampler};
pub use tick::TickDriver;
pub use voice::{Voice, VoiceTable};
