//! # CRSF Frame Decoder
//!
//! Validates serialized frames and recovers channel values. The bridge is
//! transmit-only in normal operation; decoding exists for loopback testing
//! and validation tooling.

use super::crc::crc8_dvb_s2;
use super::protocol::*;
use crate::error::FrameError;

/// Decode one complete serialized frame.
///
/// Checks the sync byte, the length field against the bytes supplied, and
/// the CRC8 trailer (computed over type + payload) before handing back the
/// frame contents.
///
/// # Errors
///
/// - [`FrameError::Truncated`] - fewer than 4 bytes
/// - [`FrameError::BadSync`] - first byte is not `0xC8`
/// - [`FrameError::BadLength`] - length field inconsistent with input size
/// - [`FrameError::BadCrc`] - checksum mismatch
pub fn decode_frame(frame: &[u8]) -> Result<CrsfFrame, FrameError> {
    // Smallest possible frame: sync + length + type + crc.
    if frame.len() < 4 {
        return Err(FrameError::Truncated { len: frame.len() });
    }

    if frame[0] != SYNC_BYTE {
        return Err(FrameError::BadSync { found: frame[0] });
    }

    let length = frame[1] as usize;
    let available = frame.len() - 2;
    if length < 2 || length > MAX_PAYLOAD_SIZE + 2 || length != available {
        return Err(FrameError::BadLength { declared: length, available });
    }

    let received = frame[1 + length];
    let computed = crc8_dvb_s2(&frame[2..1 + length]);
    if computed != received {
        return Err(FrameError::BadCrc { computed, received });
    }

    CrsfFrame::new(frame[2], frame[3..1 + length].to_vec())
}

/// Unpack the 22-byte RC-channels payload back into 16 channel values.
///
/// Exact inverse of [`pack_channels`](super::encoder::pack_channels).
pub fn unpack_channels(payload: &[u8; RC_PAYLOAD_SIZE]) -> ChannelSet {
    let mut channels = [0u16; NUM_CHANNELS];
    let mut bit_index = 0;

    for channel in channels.iter_mut() {
        let mut value = 0u16;
        for bit in 0..11 {
            if (payload[bit_index / 8] >> (bit_index % 8)) & 1 == 1 {
                value |= 1 << bit;
            }
            bit_index += 1;
        }
        *channel = value;
    }

    channels
}
