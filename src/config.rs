use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use toml;

pub const DEFAULT_API_BASE: &str = "https://api.openai.com";

#[derive(Debug, Deserialize, Serialize)]
#[allow(unused)]
pub struct Settings {
    pub model: String,
    pub api_key: Option<String>,
    /// Base URL of the completion API. Overridable so tests and self-hosted
    /// gateways can point elsewhere.
    pub api_base: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let blueprint_path = match std::env::var("CARGO_MANIFEST_DIR") {
            Ok(manifest_dir) => {
                let mut path = PathBuf::from(manifest_dir);
                path.push("sumlens.toml");
                path
            }
            Err(_) => {
                // Fallback for release builds or when not using Cargo.
                // Assumes sumlens.toml is in the current working directory.
                PathBuf::from("sumlens.toml")
            }
        };

        let user_config_path = get_user_config_path();

        // If the user config doesn't exist, create it from the blueprint `sumlens.toml`
        if !user_config_path.exists() {
            if let Ok(blueprint_content) = fs::read_to_string(&blueprint_path) {
                if let Some(parent) = user_config_path.parent() {
                    fs::create_dir_all(parent).expect("Could not create config directory");
                }
                fs::write(&user_config_path, blueprint_content)
                    .expect("Could not write user config file from blueprint");
            }
            // If sumlens.toml doesn't exist at blueprint_path, builder will fail. This is intended.
        }

        let s = Config::builder()
            // 1. Load project defaults from sumlens.toml (blueprint). Required.
            .add_source(File::from(blueprint_path).required(true))
            // 2. Merge user's global config. Required as we just created it if it was missing.
            .add_source(File::from(user_config_path).required(true))
            // 3. Merge local sumlens.toml from CWD. Optional override.
            .add_source(File::with_name("sumlens.toml").required(false))
            .build()?;

        s.try_deserialize()
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)
    }
}

pub fn get_user_config_path() -> PathBuf {
    let mut path = dirs::home_dir().expect("Failed to get home directory");
    path.push(".config");
    path.push("sumlens");
    path.push("sumlens.toml");
    path
}

pub fn get_log_path() -> PathBuf {
    let mut path = get_user_config_path();
    path.set_file_name("sumlens.log");
    path
}

pub fn save_api_key(api_key: &str) -> Result<(), anyhow::Error> {
    let user_config_path = get_user_config_path();

    let config_str = fs::read_to_string(&user_config_path).unwrap_or_else(|_| "".to_string());
    let mut doc = config_str.parse::<toml::Table>()?;

    doc.insert("api_key".to_string(), toml::Value::String(api_key.to_string()));

    fs::write(&user_config_path, doc.to_string())?;

    Ok(())
}
