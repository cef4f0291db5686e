//! This crate contains architecture-agnostic logic for a USB MIDI keyboard built from a row/column button
//! matrix: the matrix scan, the per-key state machine that turns column samples into
//! [Note On/Note Off](https://midi.org/midi-1-0) messages, and the blink schedule of the status LED that
//! reports the USB connection phase.
//!
//! Hardware access is expressed through the [`embedded-hal`](https://docs.rs/embedded-hal) traits and time
//! through [`embassy_time`], so everything here runs (and is tested) on the host as well as on the device.

#![deny(missing_docs)]
#![no_std]

// must come first so the logging macros are visible to the modules below
mod fmt;

pub mod configuration;

/// The polling loop that ties the scanner, the status indicator, and the transport together.
pub mod keyboard;

pub mod matrix;

/// USB connection phase and the status LED blink schedule derived from it.
pub mod status;

pub mod usb_midi;

#[cfg(test)]
mod test_utils;
