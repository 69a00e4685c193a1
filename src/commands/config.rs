//! Configuration Commands
//!
//! Fetches `tracker.toml` from the origin serving the app.

use crate::models::{AppConfig, TrackerError};

/// File name of the configuration served next to `index.html`
pub const CONFIG_FILE: &str = "tracker.toml";

fn origin() -> Result<String, TrackerError> {
    web_sys::window()
        .ok_or_else(|| TrackerError::Config("no window".to_string()))?
        .location()
        .origin()
        .map_err(|_| TrackerError::Config("page origin unavailable".to_string()))
}

/// Query string of the current page, including the leading `?`
pub fn current_query_string() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

pub async fn load_config() -> Result<AppConfig, TrackerError> {
    let url = format!("{}/{}", origin()?, CONFIG_FILE);
    let response = reqwest::get(&url)
        .await
        .map_err(|e| TrackerError::Config(format!("{}: {}", CONFIG_FILE, e)))?;
    if !response.status().is_success() {
        return Err(TrackerError::Config(format!(
            "{}: HTTP {}",
            CONFIG_FILE,
            response.status().as_u16()
        )));
    }
    let raw = response
        .text()
        .await
        .map_err(|e| TrackerError::Config(format!("{}: {}", CONFIG_FILE, e)))?;
    let config = AppConfig::from_toml_str(&raw)?;
    log::info!("Configuration loaded, projects layer {}", config.projects_layer);
    Ok(config)
}
