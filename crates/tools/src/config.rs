//! Configuration management for dot11a tools

use anyhow::{bail, Context, Result};
use dot11a_conformance::annex_l::MESSAGE;
use dot11a_frame::data::DataField;
use dot11a_frame::rate::Rate;
use dot11a_frame::scrambler::Scrambler;
use dot11a_frame::signal::SignalField;
use dot11a_modem::sync::SyncConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by the `dot11a` subcommands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Data rate announced in the SIGNAL field, in Mbps
    pub rate_mbps: u32,
    /// PSDU length announced in the SIGNAL field, in octets
    pub length: usize,
    /// DATA scrambler seed, seven bits
    pub scrambler_seed: u8,
    pub sync: SyncConfig,
    pub channel: ChannelConfig,
    pub dump: DumpConfig,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            rate_mbps: 36,
            length: 100,
            scrambler_seed: 0b101_1101,
            sync: SyncConfig::default(),
            channel: ChannelConfig::default(),
            dump: DumpConfig::default(),
        }
    }
}

/// Impairments applied to generated test input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelConfig {
    /// Carrier frequency offset in Hz
    pub cfo_hz: f64,
    /// Signal to noise ratio in dB; no noise when unset
    pub snr_db: Option<f64>,
    pub noise_seed: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            cfo_hz: 0.0,
            snr_db: None,
            noise_seed: 1,
        }
    }
}

/// Table dump settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Word width in bytes
    pub width: usize,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self { width: 3 }
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl ToolConfig {
    /// The configured rate
    pub fn rate(&self) -> Result<Rate> {
        Rate::from_mbps(self.rate_mbps).context("Invalid rate in configuration")
    }

    /// Load configuration from a TOML file, or JSON when the extension is `.json`
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: Self = if is_json(path) {
            serde_json::from_str(&content).context("Failed to parse config file")?
        } else {
            toml::from_str(&content).context("Failed to parse config file")?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check every setting against the limits of the PLCP
    pub fn validate(&self) -> Result<()> {
        self.rate()?;
        if self.length > SignalField::MAX_LENGTH {
            bail!("PSDU length {} exceeds {} octets", self.length, SignalField::MAX_LENGTH);
        }
        Scrambler::new(self.scrambler_seed).context("Invalid scrambler seed in configuration")?;
        self.sync.validate().context("Invalid sync settings")?;
        if self.dump.width == 0 {
            bail!("Dump word width must be at least one byte");
        }
        Ok(())
    }

    /// DATA field at the configured rate carrying `length` octets of the
    /// worked example message, repeated as needed
    pub fn data_field(&self) -> Result<DataField> {
        let psdu = MESSAGE.iter().copied().cycle().take(self.length).collect();
        DataField::new(self.rate()?, psdu).context("Failed to build DATA field")
    }

    /// Load `path` if given, otherwise use the defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Save configuration, as JSON when the extension is `.json` and TOML otherwise
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        } else {
            toml::to_string_pretty(self).context("Failed to serialize config")?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn sample_config() -> ToolConfig {
        ToolConfig {
            rate_mbps: 12,
            length: 1500,
            scrambler_seed: 0x7F,
            sync: SyncConfig { window_len: 32, sample_rate: 40e6 },
            channel: ChannelConfig { cfo_hz: -52_000.0, snr_db: Some(15.0), noise_seed: 9 },
            dump: DumpConfig { width: 4 },
        }
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = sample_config();
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_path_buf();

        config.save_to_file(&path).unwrap();
        let loaded = ToolConfig::from_file(&path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = sample_config();
        let temp_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let path = temp_file.path().to_path_buf();

        config.save_to_file(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.trim_start().starts_with('{'));
        assert_eq!(ToolConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "rate_mbps = 6\n\n[channel]\ncfo_hz = 1000.0\n").unwrap();

        let config = ToolConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.rate().unwrap(), Rate::Mbps6);
        assert_eq!(config.length, 100);
        assert_eq!(config.channel.cfo_hz, 1000.0);
        assert_eq!(config.channel.snr_db, None);
        assert_eq!(config.sync, SyncConfig::default());
        assert_eq!(config.dump.width, 3);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "[sync]\nwindow_len = 0\n").unwrap();
        assert!(ToolConfig::from_file(temp_file.path()).is_err());

        let config = ToolConfig { rate_mbps: 11, ..ToolConfig::default() };
        assert!(config.rate().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_scrambler_seed_limit() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "scrambler_seed = 200\n").unwrap();
        let err = ToolConfig::from_file(temp_file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("scrambler seed"), "{:#}", err);

        std::fs::write(temp_file.path(), "scrambler_seed = 127\n").unwrap();
        assert_eq!(ToolConfig::from_file(temp_file.path()).unwrap().scrambler_seed, 0x7F);
    }

    #[test]
    fn test_length_and_width_limits() {
        let config = ToolConfig { length: 4096, ..ToolConfig::default() };
        assert!(config.validate().is_err());
        let config = ToolConfig { dump: DumpConfig { width: 0 }, ..ToolConfig::default() };
        assert!(config.validate().is_err());
        assert!(ToolConfig::default().validate().is_ok());
    }

    #[test]
    fn test_data_field_from_config() {
        let field = ToolConfig::default().data_field().unwrap();
        assert_eq!(field.rate(), Rate::Mbps36);
        assert_eq!(field.psdu(), &MESSAGE[..]);

        let config = ToolConfig { rate_mbps: 6, length: 250, ..ToolConfig::default() };
        let field = config.data_field().unwrap();
        assert_eq!(field.psdu().len(), 250);
        assert_eq!(field.psdu()[..100], MESSAGE[..]);
        assert_eq!(field.psdu()[100..200], MESSAGE[..]);
        assert_eq!(field.psdu()[200..], MESSAGE[..50]);
        assert_eq!(field.bits().len() % 24, 0);
    }

    #[test]
    fn test_missing_file() {
        assert!(ToolConfig::from_file(Path::new("/nonexistent/dot11a.toml")).is_err());
        assert_eq!(ToolConfig::load_or_default(None).unwrap(), ToolConfig::default());
    }
}
