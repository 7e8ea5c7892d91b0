//! # CRSF Protocol Constants and Types
//!
//! Core protocol definitions shared by the encoder and decoder.

use crate::error::FrameError;

/// CRSF frame sync byte (flight controller device address).
pub const SYNC_BYTE: u8 = 0xC8;

/// RC channels packed frame type.
pub const FRAMETYPE_RC_CHANNELS: u8 = 0x16;

/// Maximum serialized frame size allowed by CRSF.
pub const MAX_FRAME_SIZE: usize = 64;

/// Maximum payload size: sync(1) + length(1) + type(1) + crc(1) leave 60 bytes.
pub const MAX_PAYLOAD_SIZE: usize = 60;

/// RC channels payload size: 16 channels x 11 bits = 176 bits = 22 bytes.
pub const RC_PAYLOAD_SIZE: usize = 22;

/// RC channels frame length field: type(1) + payload(22) + crc(1).
pub const RC_FRAME_LENGTH: u8 = 0x18;

/// Full serialized RC channels frame size.
pub const RC_FRAME_SIZE: usize = 26;

/// Number of RC channels carried per frame.
pub const NUM_CHANNELS: usize = 16;

/// Channel value domain (11-bit unsigned).
pub const CHANNEL_MIN: u16 = 0;
pub const CHANNEL_MAX: u16 = 2047;

/// Conventional channel endpoints and center, matching the CRSF
/// working-group 8-bit-compatible scaling used by ELRS hardware.
pub const CHANNEL_LOW: u16 = 172;
pub const CHANNEL_CENTER: u16 = 992;
pub const CHANNEL_HIGH: u16 = 1811;

/// One tick's worth of resolved channel values.
pub type ChannelSet = [u16; NUM_CHANNELS];

/// One decoded wire-level frame: type byte plus raw payload.
///
/// Frames are created per tick by the codec, serialized and discarded;
/// nothing holds on to them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrsfFrame {
    pub frame_type: u8,
    pub payload: Vec<u8>,
}

impl CrsfFrame {
    /// Create a frame, rejecting payloads that would exceed the CRSF
    /// 64-byte frame limit.
    pub fn new(frame_type: u8, payload: Vec<u8>) -> Result<Self, FrameError> {
        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(FrameError::PayloadTooLarge {
                len: payload.len(),
                max: MAX_PAYLOAD_SIZE,
            });
        }
        Ok(Self { frame_type, payload })
    }

    /// Value of the wire length field: type + payload + crc.
    pub fn length(&self) -> u8 {
        (1 + self.payload.len() + 1) as u8
    }
}
