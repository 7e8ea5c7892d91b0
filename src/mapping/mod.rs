//! # Channel Mapping Module
//!
//! The configurable routing layer between raw input sources and the 16
//! logical RC channels: the mapping table itself, and the normalization
//! step that turns raw samples into CRSF channel values.

pub mod normalize;
pub mod table;

pub use normalize::{build_channel_set, ChannelDefaults, NormalizeReport};
pub use table::{HatAxis, InputSource, MappingEntry, MappingTable};
