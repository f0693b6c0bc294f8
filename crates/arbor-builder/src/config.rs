//! Builder Configuration

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Builder configuration options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// First sequence number handed out when none is supplied
    pub sequence_origin: u32,

    /// Attribute whose text value is whitespace-trimmed on flush
    pub class_attribute: String,

    /// Attribute targeted by the `style` shortcut
    pub style_attribute: String,

    /// Trim the reduced class attribute
    pub trim_class: bool,

    /// Emit `add_attributes` even when a node has no attributes
    pub emit_empty_attributes: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            sequence_origin: 0,
            class_attribute: "class".to_string(),
            style_attribute: "style".to_string(),
            trim_class: true,
            emit_empty_attributes: true,
        }
    }
}

impl BuilderConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: BuilderConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configured attribute names
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.class_attribute.trim().is_empty() {
            return Err(ConfigError::EmptyAttributeName("class"));
        }
        if self.style_attribute.trim().is_empty() {
            return Err(ConfigError::EmptyAttributeName("style"));
        }
        Ok(())
    }
}
