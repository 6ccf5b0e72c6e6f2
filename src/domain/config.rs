//! Block parameters and configuration profiles
//!
//! A `Configuration` is a saved profile holding the parameters of both
//! transmit blocks, so a whole TX chain can be restored by name.

use serde::{Deserialize, Serialize};

use super::error::{OqpskError, OqpskResult};

/// OQPSK modulator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulatorConfig {
    /// Emit diagnostic traces through `log::debug!`
    #[serde(default)]
    pub debug: bool,
    /// Output samples per 2-bit symbol
    pub samples_per_symbol: usize,
    /// RRC roll-off factor, in (0, 1]
    pub rolloff: f32,
}

impl Default for ModulatorConfig {
    fn default() -> Self {
        Self {
            debug: false,
            samples_per_symbol: 4,
            rolloff: 0.35,
        }
    }
}

impl ModulatorConfig {
    pub fn validate(&self) -> OqpskResult<()> {
        if self.samples_per_symbol == 0 {
            return Err(OqpskError::InvalidParameter(
                "samples_per_symbol must be greater than zero".into(),
            ));
        }
        if !(self.rolloff > 0.0 && self.rolloff <= 1.0) {
            return Err(OqpskError::InvalidParameter(format!(
                "rolloff must be in (0, 1], got {}",
                self.rolloff
            )));
        }
        Ok(())
    }
}

fn default_tag_name() -> String {
    "packet_len".to_string()
}

/// PDU-to-stream converter parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConverterConfig {
    #[serde(default)]
    pub debug: bool,
    /// Key of the length tag attached to the first byte of every PDU
    #[serde(default = "default_tag_name")]
    pub tag_name: String,
    /// Output rate in items per second
    pub sample_rate: f64,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            debug: false,
            tag_name: default_tag_name(),
            sample_rate: 32_000.0,
        }
    }
}

impl ConverterConfig {
    pub fn validate(&self) -> OqpskResult<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(OqpskError::InvalidParameter(format!(
                "sample_rate must be positive, got {}",
                self.sample_rate
            )));
        }
        if self.tag_name.trim().is_empty() {
            return Err(OqpskError::InvalidParameter("tag_name cannot be empty".into()));
        }
        Ok(())
    }
}

/// A saved configuration profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Profile name (e.g., "Default", "Bench 2M")
    pub name: String,
    #[serde(default)]
    pub modulator: ModulatorConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            name: "Default".to_string(),
            modulator: ModulatorConfig::default(),
            converter: ConverterConfig::default(),
        }
    }
}

impl Configuration {
    pub fn validate(&self) -> OqpskResult<()> {
        self.modulator.validate()?;
        self.converter.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_has_sensible_values() {
        let config = Configuration::default();
        assert_eq!(config.name, "Default");
        assert_eq!(config.modulator.samples_per_symbol, 4);
        assert_eq!(config.converter.tag_name, "packet_len");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn configuration_serializes_to_json() {
        let config = Configuration::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"name\":\"Default\""));
        assert!(json.contains("\"samples_per_symbol\":4"));
    }

    #[test]
    fn missing_optional_fields_use_defaults() {
        let json = r#"{"name":"Bench","converter":{"sample_rate":1000.0}}"#;
        let config: Configuration = serde_json::from_str(json).unwrap();
        assert_eq!(config.converter.tag_name, "packet_len");
        assert!(!config.converter.debug);
        assert_eq!(config.modulator, ModulatorConfig::default());
    }

    #[test]
    fn modulator_rejects_bad_parameters() {
        let zero_sps = ModulatorConfig {
            samples_per_symbol: 0,
            ..Default::default()
        };
        assert!(zero_sps.validate().is_err());

        for rolloff in [0.0, -0.2, 1.5, f32::NAN] {
            let cfg = ModulatorConfig {
                rolloff,
                ..Default::default()
            };
            assert!(cfg.validate().is_err(), "rolloff {rolloff} accepted");
        }

        let edge = ModulatorConfig {
            rolloff: 1.0,
            ..Default::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn converter_rejects_bad_parameters() {
        let cfg = ConverterConfig {
            sample_rate: 0.0,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        let cfg = ConverterConfig {
            tag_name: "  ".into(),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
