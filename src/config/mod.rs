pub mod utils;

use ::config::{Config, Environment, Map};
use anyhow::Result;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "GREETING_CONFIG_PATH";
/// Selects the optional `appsettings.<Name>.json` overlay
pub const ENVIRONMENT_ENV: &str = "GREETING_ENVIRONMENT";
pub const DEFAULT_CONFIG_FILE: &str = "appsettings.json";
/// Separates sections in override variables: `Greeting__Language`
const ENV_SEPARATOR: &str = "__";

/// Application configuration
///
/// Keys are matched case-insensitively (the `config` crate lowercases
/// them), so `Greeting.Message` and `greeting.message` are the same setting.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub greeting: GreetingConfig,

    #[serde(default)]
    pub deepl: DeepLConfig,

    #[serde(default)]
    pub server: Option<ServerConfig>,
}

/// The `Greeting` section. Both values are validated by the greeting
/// service, not here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GreetingConfig {
    pub message: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeepLConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(rename = "sourcelanguage")]
    #[serde(default = "default_source_language")]
    pub source_language: String,
}

fn default_endpoint() -> String {
    "https://api-free.deepl.com/v2/translate".to_string()
}

fn default_source_language() -> String {
    "EN".to_string()
}

impl Default for DeepLConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            source_language: default_source_language(),
        }
    }
}

/// Optional HTTP shell exposing the greet command
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(deserialize_with = "port_from_number_or_string")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

// Environment overrides always arrive as strings.
fn port_from_number_or_string<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Number(u16),
        Text(String),
    }

    match Port::deserialize(deserializer)? {
        Port::Number(port) => Ok(port),
        Port::Text(text) => text.trim().parse().map_err(serde::de::Error::custom),
    }
}

impl AppConfig {
    /// Load configuration from the process environment: the file at `path`,
    /// the `GREETING_ENVIRONMENT` overlay and `Section__Key` variables.
    pub fn load(path: &Path) -> Result<Self> {
        let vars: Map<String, String> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        let environment = vars.get(ENVIRONMENT_ENV).cloned();

        Self::load_with(path, environment.as_deref(), &vars)
    }

    /// Layer the JSON (or YAML) file, the optional `<stem>.<environment>.<ext>`
    /// overlay and the override variables, then expand `${VAR}` placeholders
    /// inside string values from `vars`.
    pub fn load_with(
        path: &Path,
        environment: Option<&str>,
        vars: &Map<String, String>,
    ) -> Result<Self> {
        let mut builder = utils::add_file(Config::builder(), path)?;

        if let Some(environment) = environment {
            let overlay_path = utils::environment_file(path, environment);
            if overlay_path.exists() {
                debug!("Applying configuration overlay: {}", overlay_path.display());
                builder = utils::add_file(builder, &overlay_path)?;
            }
        }

        // Only sectioned names, so `PATH` and friends stay out of the tree
        let overrides: Map<String, String> = vars
            .iter()
            .filter(|(name, _)| name.contains(ENV_SEPARATOR))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();

        let mut value: Value = builder
            .add_source(
                Environment::default()
                    .separator(ENV_SEPARATOR)
                    .source(Some(overrides)),
            )
            .build()?
            .try_deserialize()?;

        utils::substitute_env(&mut value, &|name: &str| vars.get(name).cloned())?;

        let config: AppConfig = serde_json::from_value(value)?;
        Ok(config)
    }

    /// Find the configuration file: `GREETING_CONFIG_PATH`, then the working
    /// directory, then next to the executable.
    pub fn locate() -> Result<PathBuf> {
        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()));

        let candidates: Vec<PathBuf> = vec![
            std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from),
            Some(PathBuf::from(DEFAULT_CONFIG_FILE)),
            exe_dir.map(|dir| dir.join(DEFAULT_CONFIG_FILE)),
        ]
        .into_iter()
        .flatten()
        .collect();

        for path in &candidates {
            if path.is_file() {
                return Ok(path.clone());
            }
            debug!("No configuration at {}", path.display());
        }

        anyhow::bail!("Could not find config file. Tried: {:?}", candidates)
    }
}
