//! # Error Types
//!
//! Error taxonomy for the bridge, built on `thiserror`.
//!
//! Each failure domain gets its own type so callers can tell a rejected
//! configuration from a corrupt frame or a dead input device:
//!
//! - [`ConfigError`] - invalid mapping or settings, rejected at load/edit time
//! - [`FrameError`] - malformed or corrupt CRSF frame (decode/loopback paths)
//! - [`SamplerError`] - input device unavailable mid-session
//! - [`BridgeError`] - umbrella type used at module boundaries

use thiserror::Error;

/// Invalid configuration, rejected before it can reach the transmit pipeline.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A mapping targets a channel outside 1-16.
    #[error("{source_name}: channel {channel} is out of range (must be 1-16)")]
    ChannelOutOfRange { source_name: String, channel: u16 },

    /// A settings value is out of its allowed range.
    #[error("invalid configuration: {0}")]
    Invalid(String),

    /// The TOML text itself is malformed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Malformed or corrupt CRSF frame.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// Fewer bytes than the smallest possible frame.
    #[error("frame truncated: {len} bytes")]
    Truncated { len: usize },

    /// First byte is not the CRSF sync byte.
    #[error("bad sync byte: 0x{found:02X}")]
    BadSync { found: u8 },

    /// Length field disagrees with the number of bytes supplied.
    #[error("bad length: declared {declared}, frame carries {available} bytes after the length field")]
    BadLength { declared: usize, available: usize },

    /// CRC trailer does not match the computed checksum.
    #[error("CRC mismatch: computed 0x{computed:02X}, received 0x{received:02X}")]
    BadCrc { computed: u8, received: u8 },

    /// Payload would exceed the 64-byte CRSF frame limit.
    #[error("payload of {len} bytes exceeds the {max}-byte maximum")]
    PayloadTooLarge { len: usize, max: usize },
}

/// Input device failure while sampling.
#[derive(Debug, Error)]
pub enum SamplerError {
    #[error("input device disconnected")]
    Disconnected,

    #[error("input device unavailable: {0}")]
    Unavailable(String),
}

/// Top-level error type for the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    #[error("sampler error: {0}")]
    Sampler(#[from] SamplerError),

    #[error("serial error: {0}")]
    Serial(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the bridge.
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_error_messages_name_the_bytes() {
        let err = FrameError::BadCrc { computed: 0xEF, received: 0x00 };
        let msg = err.to_string();
        assert!(msg.contains("0xEF"));
        assert!(msg.contains("0x00"));
    }

    #[test]
    fn config_error_names_the_source() {
        let err = ConfigError::ChannelOutOfRange {
            source_name: "axis 2".to_string(),
            channel: 17,
        };
        assert!(err.to_string().contains("axis 2"));
        assert!(err.to_string().contains("17"));
    }

    #[test]
    fn bridge_error_wraps_io() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err: BridgeError = io.into();
        assert!(matches!(err, BridgeError::Io(_)));
    }
}
