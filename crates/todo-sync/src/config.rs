//! Application Configuration
//!
//! Parsed from the JSON block the page embeds. Only the Firebase credentials
//! are required; everything else has defaults.

use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sync::ReconnectPolicy;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("missing required field `{0}`")]
    Missing(&'static str),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Options handed unchanged to `firebase.initializeApp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirebaseOptions {
    pub api_key: String,
    pub project_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_sender_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub firebase: FirebaseOptions,
    /// Remote collection holding the to-do records
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub reconnect: ReconnectPolicy,
}

fn default_collection() -> String {
    "todos".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.firebase.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("firebase.apiKey"));
        }
        if self.firebase.project_id.trim().is_empty() {
            return Err(ConfigError::Missing("firebase.projectId"));
        }
        if self.collection.is_empty() || self.collection.contains('/') {
            return Err(ConfigError::Invalid {
                field: "collection",
                reason: format!("{:?} is not a top-level collection name", self.collection),
            });
        }
        LevelFilter::from_str(&self.log_level).map_err(|_| ConfigError::Invalid {
            field: "logLevel",
            reason: format!("unknown level {:?}", self.log_level),
        })?;
        Ok(())
    }

    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}
