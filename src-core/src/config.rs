//! Configuration
//!
//! Service endpoints, field names and credentials, read from `tracker.toml`:
//!
//! ```toml
//! portal_url = "https://www.arcgis.com"
//! projects_layer = "https://services.arcgis.com/abc/arcgis/rest/services/Projects/FeatureServer/0"
//!
//! [credentials]
//! username = "editor"
//! password = "secret"
//! ```
//!
//! On native builds `TRACKER_USERNAME` / `TRACKER_PASSWORD` override the file.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{DisplayMode, TrackerError, TrackerResult};

pub const USERNAME_ENV: &str = "TRACKER_USERNAME";
pub const PASSWORD_ENV: &str = "TRACKER_PASSWORD";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppConfig {
    /// Portal hosting the token endpoint
    #[serde(default = "default_portal_url")]
    pub portal_url: String,
    /// Referer bound to generated tokens
    #[serde(default = "default_referer")]
    pub referer: String,
    #[serde(default = "default_token_minutes")]
    pub token_expiration_minutes: u32,
    /// Feature layer holding the project records
    pub projects_layer: String,
    #[serde(default)]
    pub fields: FieldNames,
    #[serde(default)]
    pub credentials: Credentials,
    #[serde(default)]
    pub return_links: ReturnLinks,
}

/// Where the return link sends the user, per display mode
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReturnLinks {
    pub edit: String,
    pub review: String,
}

impl Default for ReturnLinks {
    fn default() -> Self {
        Self {
            edit: "https://experience.arcgis.com/experience/e84a0f4117d1452396f407c080336f01".to_string(),
            review: "https://experience.arcgis.com/experience/e84a0f4117d1452396f407c080336f01/page/REVIEW-PROJECTS"
                .to_string(),
        }
    }
}

impl ReturnLinks {
    pub fn url_for(&self, mode: DisplayMode) -> &str {
        match mode {
            DisplayMode::Edit => &self.edit,
            DisplayMode::Review => &self.review,
        }
    }
}

/// Names of the identifying fields on the projects layer
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldNames {
    /// Globally unique identifier
    pub id: String,
    /// Service-local numeric row id
    pub row_id: String,
    /// Field shown in the project selector
    pub display_name: String,
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            id: "globalid".to_string(),
            row_id: "objectid".to_string(),
            display_name: "proj_name".to_string(),
        }
    }
}

/// Username and password used only to obtain tokens
#[derive(Clone, Default, PartialEq, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &"<redacted>")
            .field("password", &"<redacted>")
            .finish()
    }
}

fn default_portal_url() -> String {
    "https://www.arcgis.com".to_string()
}

fn default_referer() -> String {
    "https://www.arcgis.com".to_string()
}

fn default_token_minutes() -> u32 {
    60
}

impl AppConfig {
    pub fn from_toml_str(raw: &str) -> TrackerResult<Self> {
        let config: AppConfig =
            toml::from_str(raw).map_err(|e| TrackerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file and apply environment overrides
    pub fn load(path: &Path) -> TrackerResult<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| TrackerError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_toml_str(&raw)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(username) = lookup(USERNAME_ENV).filter(|v| !v.is_empty()) {
            self.credentials.username = username;
        }
        if let Some(password) = lookup(PASSWORD_ENV).filter(|v| !v.is_empty()) {
            self.credentials.password = password;
        }
    }

    pub fn token_url(&self) -> String {
        format!("{}/sharing/rest/generateToken", self.portal_url.trim_end_matches('/'))
    }

    fn validate(&self) -> TrackerResult<()> {
        if self.projects_layer.trim().is_empty() {
            return Err(TrackerError::Config("projects_layer must not be empty".to_string()));
        }
        if !self.projects_layer.starts_with("http") {
            return Err(TrackerError::Config(format!(
                "projects_layer is not a URL: {}",
                self.projects_layer
            )));
        }
        Ok(())
    }
}
