//! Tunables for the install flow and the storage key layout.
use crate::constants::{
    ALL_TIME_KEY, DISMISSAL_COOLDOWN_MS, DISMISSAL_KEY, IOS_BANNER_DELAY_MS, THEME_KEY,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Errors raised when an engagement configuration is unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("engagement config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("storage key {field} must not be empty")]
    EmptyKey { field: &'static str },
    #[error("storage keys must be distinct (`{key}` used twice)")]
    DuplicateKey { key: String },
}

/// Names of the persisted entries in browser-scoped storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageKeys {
    #[serde(default = "StorageKeys::default_dismissal")]
    pub dismissal: String,
    #[serde(default = "StorageKeys::default_theme")]
    pub theme: String,
    #[serde(default = "StorageKeys::default_all_time")]
    pub all_time: String,
}

impl StorageKeys {
    fn default_dismissal() -> String {
        DISMISSAL_KEY.to_string()
    }

    fn default_theme() -> String {
        THEME_KEY.to_string()
    }

    fn default_all_time() -> String {
        ALL_TIME_KEY.to_string()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("dismissal", &self.dismissal),
            ("theme", &self.theme),
            ("all_time", &self.all_time),
        ];
        for (field, key) in fields {
            if key.trim().is_empty() {
                return Err(ConfigError::EmptyKey { field });
            }
        }
        if self.dismissal == self.theme || self.dismissal == self.all_time {
            return Err(ConfigError::DuplicateKey {
                key: self.dismissal.clone(),
            });
        }
        if self.theme == self.all_time {
            return Err(ConfigError::DuplicateKey {
                key: self.theme.clone(),
            });
        }
        Ok(())
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            dismissal: Self::default_dismissal(),
            theme: Self::default_theme(),
            all_time: Self::default_all_time(),
        }
    }
}

/// Engagement configuration. Every field falls back to the shipped default when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementConfig {
    #[serde(default = "EngagementConfig::default_cooldown")]
    pub dismissal_cooldown_ms: u64,
    #[serde(default = "EngagementConfig::default_ios_delay")]
    pub ios_banner_delay_ms: u64,
    #[serde(default)]
    pub keys: StorageKeys,
}

impl EngagementConfig {
    const fn default_cooldown() -> u64 {
        DISMISSAL_COOLDOWN_MS
    }

    const fn default_ios_delay() -> u64 {
        IOS_BANNER_DELAY_MS
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any invariant is violated.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if the cooldown is zero or storage keys are empty or shared.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dismissal_cooldown_ms == 0 {
            return Err(ConfigError::Zero {
                field: "dismissal_cooldown_ms",
            });
        }
        self.keys.validate()
    }

    #[must_use]
    pub const fn dismissal_cooldown(&self) -> Duration {
        Duration::from_millis(self.dismissal_cooldown_ms)
    }

    #[must_use]
    pub const fn ios_banner_delay(&self) -> Duration {
        Duration::from_millis(self.ios_banner_delay_ms)
    }
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            dismissal_cooldown_ms: Self::default_cooldown(),
            ios_banner_delay_ms: Self::default_ios_delay(),
            keys: StorageKeys::default(),
        }
    }
}
