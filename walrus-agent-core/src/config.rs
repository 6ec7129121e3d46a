use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_PUBLISHER_URL: &str = "https://publisher.walrus-testnet.walrus.space";
pub const DEFAULT_AGGREGATOR_URL: &str = "https://aggregator.walrus-testnet.walrus.space";
pub const DEFAULT_EXPLORER_URL: &str = "https://suiscan.xyz/testnet";
pub const DEFAULT_MODEL: &str = "google/gemini-1.5-pro-latest";
pub const DEFAULT_LAST_MESSAGES: usize = 10;

/// Open-Meteo endpoints used by the weather tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub geocoding_url: String,
    pub forecast_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            forecast_url: DEFAULT_FORECAST_URL.to_string(),
        }
    }
}

/// WALRUS publisher/aggregator services and where downloads land.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalrusConfig {
    pub publisher_url: String,
    pub aggregator_url: String,
    /// Sui explorer base used to build object/transaction links.
    pub explorer_url: String,
    /// Directory for downloads that don't specify an output path.
    pub download_dir: PathBuf,
}

impl Default for WalrusConfig {
    fn default() -> Self {
        Self {
            publisher_url: DEFAULT_PUBLISHER_URL.to_string(),
            aggregator_url: DEFAULT_AGGREGATOR_URL.to_string(),
            explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            download_dir: PathBuf::from("downloads"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    /// Model identifier handed to whatever LLM runtime drives the agents.
    pub model: String,
    /// Size of each agent's per-thread memory buffer.
    pub last_messages: usize,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self { model: DEFAULT_MODEL.to_string(), last_messages: DEFAULT_LAST_MESSAGES }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Append tool events as JSON lines here; keep them in memory when unset.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [walrus]
/// publisher_url = "https://publisher.walrus-testnet.walrus.space"
/// download_dir = "/tmp/walrus"
///
/// [agents]
/// last_messages = 20
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub weather: WeatherConfig,
    pub walrus: WalrusConfig,
    pub agents: AgentsConfig,
    pub telemetry: TelemetryConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config from the platform config dir, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load config from an explicit path, or defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "walrus-agent", "walrus-agent")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
