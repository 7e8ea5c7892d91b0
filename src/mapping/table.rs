//! # Mapping Table
//!
//! Routes physical input sources (axes, buttons, hat directions) to logical
//! RC channels. Loaded once from configuration, read-only during steady-state
//! transmission; edits happen through the explicit mutation API and are
//! swapped in as a fresh snapshot by the caller.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::error::ConfigError;

/// Which direction of a hat (d-pad) an entry reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HatAxis {
    X,
    Y,
}

/// One physical input source.
///
/// The `Ord` derive fixes the resolution order used each tick: axes first,
/// then buttons, then hats, each by index. When several sources target the
/// same channel, the last one resolved wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum InputSource {
    /// Analog axis, raw samples in `[-1.0, 1.0]`.
    Axis(u8),
    /// Digital button, raw samples boolean.
    Button(u8),
    /// One direction of a hat switch, raw samples in `{-1, 0, 1}`.
    Hat { index: u8, axis: HatAxis },
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Axis(i) => write!(f, "axis {i}"),
            InputSource::Button(i) => write!(f, "button {i}"),
            InputSource::Hat { index, axis: HatAxis::X } => write!(f, "hat {index} x"),
            InputSource::Hat { index, axis: HatAxis::Y } => write!(f, "hat {index} y"),
        }
    }
}

/// One source's routing: target channel (1-16) and inversion flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappingEntry {
    pub source: InputSource,
    pub channel: u8,
    pub invert: bool,
}

/// The full source-to-channel mapping.
///
/// Multiple entries may target the same channel; that is legal but hazardous,
/// and the per-tick resolution makes it deterministic (see [`InputSource`]).
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: HashMap<InputSource, MappingEntry>,
}

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `source`. Overwriting is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ChannelOutOfRange`] for channels outside 1-16;
    /// the value is never silently clamped.
    pub fn set(&mut self, source: InputSource, channel: u8, invert: bool) -> Result<(), ConfigError> {
        if !(1..=16).contains(&channel) {
            return Err(ConfigError::ChannelOutOfRange {
                source_name: source.to_string(),
                channel: channel as u16,
            });
        }
        self.entries.insert(source, MappingEntry { source, channel, invert });
        Ok(())
    }

    /// Delete the mapping for `source`; later lookups yield `None`.
    pub fn remove(&mut self, source: InputSource) -> Option<MappingEntry> {
        self.entries.remove(&source)
    }

    /// Look up the entry for `source`.
    pub fn resolve(&self, source: InputSource) -> Option<MappingEntry> {
        self.entries.get(&source).copied()
    }

    /// Replace the whole table with `entries`, validating every channel
    /// first. On error the table is left unchanged.
    pub fn load(&mut self, entries: impl IntoIterator<Item = MappingEntry>) -> Result<(), ConfigError> {
        let mut fresh = MappingTable::new();
        for entry in entries {
            fresh.set(entry.source, entry.channel, entry.invert)?;
        }
        self.entries = fresh.entries;
        Ok(())
    }

    /// All entries, sorted by source (the per-tick resolution order).
    pub fn export(&self) -> Vec<MappingEntry> {
        let mut entries: Vec<MappingEntry> = self.entries.values().copied().collect();
        entries.sort_by_key(|e| e.source);
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
