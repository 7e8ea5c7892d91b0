//! # CRSF Frame Encoder
//!
//! Packs 16-channel sets into the RC-channels payload and wraps payloads
//! in complete CRSF frames.
//!
//! The payload layout is the single highest-risk correctness point in the
//! bridge: channel *i* occupies bit positions `11*i ..= 11*i + 10` of one
//! continuous little-endian bitstream, least-significant-bit first within
//! each byte. Any off-by-one here scrambles several channels at once with
//! no error signal from the receiver.

use super::crc::crc8_dvb_s2;
use super::protocol::*;
use crate::error::FrameError;

/// Pack 16 channel values into the 22-byte RC-channels payload.
///
/// Values are clamped to the 11-bit domain before packing.
///
/// ```text
/// byte 0: ch0[0..8]
/// byte 1: ch0[8..11] | ch1[0..5]
/// byte 2: ch1[5..11] | ch2[0..2]
/// ...
/// ```
pub fn pack_channels(channels: &ChannelSet) -> [u8; RC_PAYLOAD_SIZE] {
    let mut payload = [0u8; RC_PAYLOAD_SIZE];
    let mut bit_index = 0;

    for &channel in channels.iter() {
        let value = channel.min(CHANNEL_MAX);
        for bit in 0..11 {
            if (value >> bit) & 1 == 1 {
                payload[bit_index / 8] |= 1 << (bit_index % 8);
            }
            bit_index += 1;
        }
    }

    payload
}

/// Build a complete serialized frame: sync + length + type + payload + CRC8.
///
/// The CRC spans the type byte and payload, per the CRSF working-group
/// spec; the sync and length bytes are not included.
///
/// # Errors
///
/// Returns [`FrameError::PayloadTooLarge`] if `payload` exceeds 60 bytes.
pub fn encode_frame(frame_type: u8, payload: &[u8]) -> Result<Vec<u8>, FrameError> {
    if payload.len() > MAX_PAYLOAD_SIZE {
        return Err(FrameError::PayloadTooLarge {
            len: payload.len(),
            max: MAX_PAYLOAD_SIZE,
        });
    }

    let mut frame = Vec::with_capacity(payload.len() + 4);
    frame.push(SYNC_BYTE);
    frame.push((payload.len() + 2) as u8); // type + payload + crc
    frame.push(frame_type);
    frame.extend_from_slice(payload);
    frame.push(crc8_dvb_s2(&frame[2..]));

    Ok(frame)
}

/// Encode a channel set into a complete 26-byte RC-channels frame.
///
/// # Examples
///
/// ```
/// use crsf_link::crsf::encoder::encode_rc_frame;
/// use crsf_link::crsf::protocol::CHANNEL_CENTER;
///
/// let frame = encode_rc_frame(&[CHANNEL_CENTER; 16]);
/// assert_eq!(frame.len(), 26);
/// assert_eq!(frame[0], 0xC8);
/// ```
pub fn encode_rc_frame(channels: &ChannelSet) -> Vec<u8> {
    let payload = pack_channels(channels);

    // Fixed 22-byte payload, so framing cannot fail.
    let mut frame = Vec::with_capacity(RC_FRAME_SIZE);
    frame.push(SYNC_BYTE);
    frame.push(RC_FRAME_LENGTH);
    frame.push(FRAMETYPE_RC_CHANNELS);
    frame.extend_from_slice(&payload);
    frame.push(crc8_dvb_s2(&frame[2..]));

    frame
}
