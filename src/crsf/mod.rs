//! # CRSF Protocol Module
//!
//! Wire-level CRSF (Crossfire) support: protocol constants, CRC8,
//! channel packing, frame encoding and frame decoding.

pub mod crc;
pub mod decoder;
pub mod encoder;
pub mod protocol;

pub use decoder::{decode_frame, unpack_channels};
pub use encoder::{encode_frame, encode_rc_frame, pack_channels};
pub use protocol::{ChannelSet, CrsfFrame};
