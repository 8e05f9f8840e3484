use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::{
    app_state::Platform,
    notifications::{
        entities::{ChannelConfig, PushTokenConfig},
        registrar::{DEFAULT_PUSH_TOKEN_PATH, RegistrarConfig},
    },
};

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    pub base_url: String,
    #[serde(default = "default_push_token_path")]
    pub push_token_path: String,
}

fn default_push_token_path() -> String {
    DEFAULT_PUSH_TOKEN_PATH.to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushSettings {
    pub project_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Falls back to the compile target when unset
    pub platform: Option<Platform>,
    pub backend: BackendSettings,
    #[serde(default)]
    pub push: PushSettings,
    #[serde(default)]
    pub android_channel: ChannelConfig,
}

impl Settings {
    pub fn load() -> Result<Settings, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings"))
            .add_source(Environment::with_prefix("PETMATCH").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(Environment::with_prefix("PETMATCH").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }

    pub fn registrar_config(&self) -> RegistrarConfig {
        RegistrarConfig {
            platform: self.platform(),
            channel: self.android_channel.clone(),
            push_token: PushTokenConfig {
                project_id: self.push.project_id.clone(),
            },
            push_token_path: self.backend.push_token_path.clone(),
        }
    }
}
