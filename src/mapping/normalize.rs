//! # Value Normalizer
//!
//! Converts raw input samples into the CRSF channel value domain and builds
//! the per-tick channel set from the mapping table.
//!
//! Axes map linearly from `[-1.0, 1.0]` onto `[172, 1811]` with `992` at
//! center; buttons map to the endpoints. Inversion negates the raw value
//! (axes/hats) or swaps the endpoints (buttons). Every output is clamped to
//! the 11-bit domain as a final bound, and every clamp or default
//! substitution is counted in the returned [`NormalizeReport`] so nothing
//! in this path can fail silently.

use super::table::{InputSource, MappingTable};
use crate::crsf::protocol::{ChannelSet, CHANNEL_CENTER, CHANNEL_HIGH, CHANNEL_LOW, CHANNEL_MAX, NUM_CHANNELS};
use crate::error::ConfigError;
use crate::sampler::InputSnapshot;

/// Map a raw axis sample in `[-1.0, 1.0]` to a channel value.
///
/// `-1.0 -> 172`, `0.0 -> 992`, `1.0 -> 1811`; `invert` reflects about the
/// center.
pub fn normalize_axis(raw: f32, invert: bool) -> u16 {
    let raw = if invert { -raw } else { raw };
    let raw = raw.clamp(-1.0, 1.0);
    let span = (CHANNEL_HIGH - CHANNEL_LOW) as f32;
    let value = (raw + 1.0) / 2.0 * span + CHANNEL_LOW as f32;
    (value.round() as u16).min(CHANNEL_MAX)
}

/// Map a button state to a channel value: released `172`, pressed `1811`,
/// swapped when `invert` is set.
pub fn normalize_button(pressed: bool, invert: bool) -> u16 {
    if pressed != invert {
        CHANNEL_HIGH
    } else {
        CHANNEL_LOW
    }
}

/// Map one hat direction (`-1`, `0`, `1`) like a coarse axis.
pub fn normalize_hat(raw: i8, invert: bool) -> u16 {
    normalize_axis(raw.clamp(-1, 1) as f32, invert)
}

/// Default values for channels no entry resolves to.
///
/// Unmapped channels sit at the neutral `992`. Channels carrying arm or
/// failsafe switches can instead be listed explicitly to default low
/// (`172`); defaulting an arm channel high is a safety hazard, so low
/// defaults are always opt-in configuration, never implicit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelDefaults {
    low: [bool; NUM_CHANNELS],
}

impl ChannelDefaults {
    /// All channels default to neutral.
    pub fn neutral() -> Self {
        Self::default()
    }

    /// Default the listed channels (1-16) low instead of neutral.
    pub fn with_low_channels(channels: &[u8]) -> Result<Self, ConfigError> {
        let mut low = [false; NUM_CHANNELS];
        for &channel in channels {
            if !(1..=16).contains(&channel) {
                return Err(ConfigError::Invalid(format!(
                    "low_default channel {channel} is out of range (must be 1-16)"
                )));
            }
            low[(channel - 1) as usize] = true;
        }
        Ok(Self { low })
    }

    /// Default value for a zero-based channel index.
    pub fn value_for(&self, index: usize) -> u16 {
        if self.low[index] {
            CHANNEL_LOW
        } else {
            CHANNEL_CENTER
        }
    }
}

/// What the normalizer had to do beyond plain mapping during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Raw samples outside their expected domain that were clamped.
    pub clamped: u32,
    /// Channels left at their default because no entry resolved to them.
    pub defaulted: u32,
    /// Channel writes that replaced an earlier write in the same tick
    /// (two sources mapped to one channel).
    pub overridden: u32,
}

/// Build one tick's channel set from the table and the current snapshot.
///
/// Entries are resolved in the table's sorted source order, so when two
/// sources target one channel the last resolved value wins deterministically.
/// Sources absent from the snapshot leave their channel at its default.
pub fn build_channel_set(
    table: &MappingTable,
    snapshot: &InputSnapshot,
    defaults: &ChannelDefaults,
) -> (ChannelSet, NormalizeReport) {
    let mut channels = [0u16; NUM_CHANNELS];
    let mut written = [false; NUM_CHANNELS];
    for (index, value) in channels.iter_mut().enumerate() {
        *value = defaults.value_for(index);
    }

    let mut report = NormalizeReport {
        defaulted: NUM_CHANNELS as u32,
        ..NormalizeReport::default()
    };

    for entry in table.export() {
        let value = match entry.source {
            InputSource::Axis(i) => match snapshot.axis(i) {
                Some(raw) => {
                    if !(-1.0..=1.0).contains(&raw) {
                        report.clamped += 1;
                    }
                    normalize_axis(raw, entry.invert)
                }
                None => continue,
            },
            InputSource::Button(i) => match snapshot.button(i) {
                Some(pressed) => normalize_button(pressed, entry.invert),
                None => continue,
            },
            InputSource::Hat { index, axis } => match snapshot.hat(index, axis) {
                Some(raw) => {
                    if !(-1..=1).contains(&raw) {
                        report.clamped += 1;
                    }
                    normalize_hat(raw, entry.invert)
                }
                None => continue,
            },
        };

        let index = (entry.channel - 1) as usize;
        if written[index] {
            report.overridden += 1;
        } else {
            written[index] = true;
            report.defaulted -= 1;
        }
        channels[index] = value;
    }

    (channels, report)
}
