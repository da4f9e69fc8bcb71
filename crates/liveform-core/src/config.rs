//! Configuration types for the form validation system
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};

/// Main form validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    /// Validation rule thresholds
    #[serde(default)]
    pub rules: RuleConfig,

    /// Quiescence periods for the debounced checks
    #[serde(default)]
    pub debounce: DebounceConfig,

    /// Optional engine settings
    #[serde(default)]
    pub engine: EngineConfig,
}

impl FormConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            rules: RuleConfig::default(),
            debounce: DebounceConfig::default(),
            engine: EngineConfig::default(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.rules.validate()?;
        self.engine.validate()?;
        Ok(())
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation rule thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Minimum username length in characters
    #[serde(default = "default_min_username_chars")]
    pub min_username_chars: usize,

    /// Minimum password length in characters
    #[serde(default = "default_min_password_chars")]
    pub min_password_chars: usize,

    /// Characters of which a strong password must contain at least one
    #[serde(default = "default_required_symbols")]
    pub required_symbols: String,
}

impl RuleConfig {
    /// Validate the rule configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.min_username_chars == 0 {
            return Err(crate::Error::config("min_username_chars must be > 0"));
        }
        if self.min_password_chars == 0 {
            return Err(crate::Error::config("min_password_chars must be > 0"));
        }
        if self.required_symbols.is_empty() {
            return Err(crate::Error::config("required_symbols cannot be empty"));
        }
        Ok(())
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            min_username_chars: default_min_username_chars(),
            min_password_chars: default_min_password_chars(),
            required_symbols: default_required_symbols(),
        }
    }
}

/// Quiescence periods for the debounced checks, in milliseconds
///
/// A check only recomputes once its inputs have been idle for the
/// configured period; newer edits reset the timer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Username length check
    #[serde(default = "default_username_ms")]
    pub username_ms: u64,

    /// Password strength check
    #[serde(default = "default_strength_ms")]
    pub strength_ms: u64,

    /// Password emptiness check
    #[serde(default = "default_empty_ms")]
    pub empty_ms: u64,

    /// Passwords-equal check (runs on edits to either password field)
    #[serde(default = "default_equal_ms")]
    pub equal_ms: u64,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            username_ms: default_username_ms(),
            strength_ms: default_strength_ms(),
            empty_ms: default_empty_ms(),
            equal_ms: default_equal_ms(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the monitoring event channel
    ///
    /// When full, new events are dropped (with a warning log). This keeps
    /// a slow or absent event consumer from stalling validation.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    /// Validate the engine configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("event_channel_capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

fn default_min_username_chars() -> usize {
    3
}

fn default_min_password_chars() -> usize {
    6
}

fn default_required_symbols() -> String {
    "$@#!%*?&".to_string()
}

fn default_username_ms() -> u64 {
    800
}

fn default_strength_ms() -> u64 {
    200
}

fn default_empty_ms() -> u64 {
    800
}

fn default_equal_ms() -> u64 {
    300
}

fn default_event_channel_capacity() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = FormConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.rules.min_username_chars, 3);
        assert_eq!(config.rules.min_password_chars, 6);
        assert_eq!(config.rules.required_symbols, "$@#!%*?&");
        assert_eq!(config.debounce.username_ms, 800);
        assert_eq!(config.debounce.strength_ms, 200);
        assert_eq!(config.debounce.empty_ms, 800);
        assert_eq!(config.debounce.equal_ms, 300);
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let mut config = FormConfig::default();
        config.rules.required_symbols.clear();
        assert!(config.validate().is_err());

        let mut config = FormConfig::default();
        config.rules.min_password_chars = 0;
        assert!(config.validate().is_err());

        let mut config = FormConfig::default();
        config.engine.event_channel_capacity = 0;
        assert!(config.validate().is_err());
    }
}
