//! # crsf-link
//!
//! Bridge joystick input to a CRSF (Crossfire) radio link over serial.
//!
//! The crate maps raw axis/button/hat samples onto 16 logical RC channels,
//! normalizes them into the CRSF value domain, packs them into the 11-bit
//! RC-channels payload, wraps that in a CRC8-protected frame and streams
//! frames to a serial port at a fixed rate.

pub mod config;
pub mod crsf;
pub mod error;
pub mod mapping;
pub mod sampler;
pub mod scheduler;
pub mod serial;
