//! # Configuration Module
//!
//! Loads and validates the bridge configuration from a TOML file, then
//! converts it into the strongly-typed pieces the pipeline consumes
//! (mapping table, channel defaults, scheduler settings). Nothing past
//! this boundary ever sees untyped data: every channel number and invert
//! flag is rejected here, never coerced.
//!
//! ```toml
//! [general]
//! joystick_index = 0
//! serial_port = "/dev/ttyACM0"
//! baud_rate = 921600
//!
//! [link]
//! rate_hz = 150
//! write_timeout_ms = 20
//!
//! [channels]
//! low_default = [5]
//!
//! [[axis]]
//! index = 0
//! channel = 1
//! invert = false
//!
//! [[button]]
//! index = 0
//! channel = 5
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{ConfigError, Result};
use crate::mapping::{ChannelDefaults, HatAxis, InputSource, MappingTable};
use crate::scheduler::SchedulerSettings;
use crate::serial::DEFAULT_BAUD_RATE;

/// Baud rates the usual CRSF-speaking hardware accepts.
const SUPPORTED_BAUD_RATES: [u32; 6] = [115_200, 400_000, 420_000, 921_600, 1_870_000, 3_750_000];

/// Main configuration structure.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub link: LinkConfig,

    #[serde(default)]
    pub channels: ChannelPolicyConfig,

    #[serde(default, rename = "axis")]
    pub axes: Vec<AxisMapping>,

    #[serde(default, rename = "button")]
    pub buttons: Vec<ButtonMapping>,

    #[serde(default, rename = "hat")]
    pub hats: Vec<HatMapping>,
}

/// Device settings: which joystick, which port.
#[derive(Debug, Deserialize, Clone)]
pub struct GeneralConfig {
    /// Index of the input device, consumed by the input backend.
    #[serde(default)]
    pub joystick_index: Option<u32>,

    #[serde(default = "default_serial_port")]
    pub serial_port: String,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
}

/// Transmit loop settings.
#[derive(Debug, Deserialize, Clone)]
pub struct LinkConfig {
    /// RC frame rate in Hz. CRSF links run 50-500 Hz; 150 matches common
    /// ELRS setups.
    #[serde(default = "default_rate_hz")]
    pub rate_hz: u32,

    /// Budget for one serial write before the tick is declared failed.
    #[serde(default = "default_write_timeout_ms")]
    pub write_timeout_ms: u64,
}

/// Per-channel default policy.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ChannelPolicyConfig {
    /// Channels (1-16) that default to 172 instead of the neutral 992.
    /// Meant for arm/failsafe switches; never applied implicitly.
    #[serde(default)]
    pub low_default: Vec<u8>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AxisMapping {
    pub index: u8,
    pub channel: u8,
    #[serde(default)]
    pub invert: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ButtonMapping {
    pub index: u8,
    pub channel: u8,
    #[serde(default)]
    pub invert: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HatMapping {
    pub index: u8,
    pub axis: HatAxis,
    pub channel: u8,
    #[serde(default)]
    pub invert: bool,
}

fn default_serial_port() -> String {
    "/dev/ttyACM0".to_string()
}
fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}
fn default_rate_hz() -> u32 {
    150
}
fn default_write_timeout_ms() -> u64 {
    20
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            joystick_index: None,
            serial_port: default_serial_port(),
            baud_rate: default_baud_rate(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_rate_hz(),
            write_timeout_ms: default_write_timeout_ms(),
        }
    }
}

impl Config {
    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, the TOML is malformed, or any
    /// value is out of range.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::parse(&contents)?)
    }

    /// Parse and validate configuration from TOML text.
    pub fn parse(text: &str) -> std::result::Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.general.serial_port.is_empty() {
            return Err(ConfigError::Invalid("serial_port cannot be empty".into()));
        }

        if !SUPPORTED_BAUD_RATES.contains(&self.general.baud_rate) {
            return Err(ConfigError::Invalid(format!(
                "baud_rate {} is not supported (expected one of {SUPPORTED_BAUD_RATES:?})",
                self.general.baud_rate
            )));
        }

        if !(50..=500).contains(&self.link.rate_hz) {
            return Err(ConfigError::Invalid(format!(
                "rate_hz {} is out of range (50-500)",
                self.link.rate_hz
            )));
        }

        if self.link.write_timeout_ms == 0 || self.link.write_timeout_ms > 1000 {
            return Err(ConfigError::Invalid(format!(
                "write_timeout_ms {} is out of range (1-1000)",
                self.link.write_timeout_ms
            )));
        }

        for &channel in &self.channels.low_default {
            if !(1..=16).contains(&channel) {
                return Err(ConfigError::Invalid(format!(
                    "low_default channel {channel} is out of range (must be 1-16)"
                )));
            }
        }

        // Mapping channels are validated through the table so the error
        // names the offending source.
        self.mapping_table().map(|_| ())
    }

    /// Build the mapping table from the axis/button/hat sections.
    ///
    /// Later entries for the same source replace earlier ones.
    pub fn mapping_table(&self) -> std::result::Result<MappingTable, ConfigError> {
        let mut table = MappingTable::new();
        for m in &self.axes {
            table.set(InputSource::Axis(m.index), m.channel, m.invert)?;
        }
        for m in &self.buttons {
            table.set(InputSource::Button(m.index), m.channel, m.invert)?;
        }
        for m in &self.hats {
            table.set(InputSource::Hat { index: m.index, axis: m.axis }, m.channel, m.invert)?;
        }
        Ok(table)
    }

    /// Channel default policy from the `[channels]` section.
    pub fn channel_defaults(&self) -> std::result::Result<ChannelDefaults, ConfigError> {
        ChannelDefaults::with_low_channels(&self.channels.low_default)
    }

    /// Scheduler settings from the `[link]` and `[channels]` sections.
    /// Call only on a validated config.
    pub fn scheduler_settings(&self) -> std::result::Result<SchedulerSettings, ConfigError> {
        Ok(SchedulerSettings::at_rate(
            self.link.rate_hz,
            Duration::from_millis(self.link.write_timeout_ms),
            self.channel_defaults()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[general]
joystick_index = 0
serial_port = "/dev/ttyUSB0"
baud_rate = 921600

[link]
rate_hz = 250
write_timeout_ms = 10

[channels]
low_default = [5]

[[axis]]
index = 0
channel = 1

[[axis]]
index = 1
channel = 2
invert = true

[[button]]
index = 0
channel = 5

[[hat]]
index = 0
axis = "x"
channel = 7
invert = true
"#;

    #[test]
    fn parse_full_config() {
        let config = Config::parse(FULL).unwrap();
        assert_eq!(config.general.serial_port, "/dev/ttyUSB0");
        assert_eq!(config.general.baud_rate, 921_600);
        assert_eq!(config.link.rate_hz, 250);
        assert_eq!(config.axes.len(), 2);
        assert!(config.axes[1].invert);

        let table = config.mapping_table().unwrap();
        assert_eq!(table.len(), 4);
        let hat = table
            .resolve(InputSource::Hat { index: 0, axis: HatAxis::X })
            .unwrap();
        assert_eq!(hat.channel, 7);
        assert!(hat.invert);
    }

    #[test]
    fn empty_config_gets_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.general.serial_port, "/dev/ttyACM0");
        assert_eq!(config.general.baud_rate, 921_600);
        assert_eq!(config.link.rate_hz, 150);
        assert_eq!(config.link.write_timeout_ms, 20);
        assert!(config.mapping_table().unwrap().is_empty());
    }

    #[test]
    fn invert_defaults_to_false() {
        let config = Config::parse("[[axis]]\nindex = 0\nchannel = 1\n").unwrap();
        assert!(!config.axes[0].invert);
    }

    #[test]
    fn malformed_invert_flag_rejected() {
        let result = Config::parse("[[axis]]\nindex = 0\nchannel = 1\ninvert = \"yes\"\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn mapping_channel_out_of_range_rejected() {
        let result = Config::parse("[[axis]]\nindex = 0\nchannel = 17\n");
        assert!(matches!(
            result,
            Err(ConfigError::ChannelOutOfRange { channel: 17, .. })
        ));
    }

    #[test]
    fn mapping_channel_zero_rejected() {
        let result = Config::parse("[[button]]\nindex = 0\nchannel = 0\n");
        assert!(matches!(
            result,
            Err(ConfigError::ChannelOutOfRange { channel: 0, .. })
        ));
    }

    #[test]
    fn duplicate_source_last_entry_wins() {
        let config = Config::parse(
            "[[axis]]\nindex = 0\nchannel = 1\n\n[[axis]]\nindex = 0\nchannel = 3\ninvert = true\n",
        )
        .unwrap();
        let table = config.mapping_table().unwrap();
        assert_eq!(table.len(), 1);
        let entry = table.resolve(InputSource::Axis(0)).unwrap();
        assert_eq!(entry.channel, 3);
        assert!(entry.invert);
    }

    #[test]
    fn unsupported_baud_rate_rejected() {
        let result = Config::parse("[general]\nbaud_rate = 9600\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rate_out_of_band_rejected() {
        assert!(Config::parse("[link]\nrate_hz = 49\n").is_err());
        assert!(Config::parse("[link]\nrate_hz = 501\n").is_err());
        assert!(Config::parse("[link]\nrate_hz = 500\n").is_ok());
    }

    #[test]
    fn write_timeout_bounds() {
        assert!(Config::parse("[link]\nwrite_timeout_ms = 0\n").is_err());
        assert!(Config::parse("[link]\nwrite_timeout_ms = 1001\n").is_err());
    }

    #[test]
    fn low_default_out_of_range_rejected() {
        assert!(Config::parse("[channels]\nlow_default = [0]\n").is_err());
        assert!(Config::parse("[channels]\nlow_default = [17]\n").is_err());
        assert!(Config::parse("[channels]\nlow_default = [1, 16]\n").is_ok());
    }

    #[test]
    fn scheduler_settings_reflect_link_section() {
        let config = Config::parse(FULL).unwrap();
        let settings = config.scheduler_settings().unwrap();
        assert_eq!(settings.period, Duration::from_secs_f64(1.0 / 250.0));
        assert_eq!(settings.write_timeout, Duration::from_millis(10));
        assert_eq!(settings.defaults.value_for(4), 172);
    }

    #[test]
    fn load_from_file() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(FULL.as_bytes()).unwrap();
        file.flush().unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.link.rate_hz, 250);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = Config::load("/nonexistent/crsf-link.toml");
        assert!(matches!(result, Err(crate::error::BridgeError::Io(_))));
    }
}
