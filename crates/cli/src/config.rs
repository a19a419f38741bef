use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "rewarddesk.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub tasks: TasksConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_server_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TasksConfig {
    /// Target the deprecated `/api/tasks` routes instead of `/admin/tasks`.
    #[serde(default)]
    pub legacy_routes: bool,
}

fn default_server_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Config directory (`~/.config/rewarddesk/`), overridable via
/// `REWARDDESK_CONFIG_DIR`. The session store keeps its two keys here too.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("REWARDDESK_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("could not determine home directory")?;
    Ok(PathBuf::from(home).join(".config").join("rewarddesk"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load config from disk, returning defaults if no file exists yet.
pub fn load_config() -> Result<CliConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(CliConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config at {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("failed to parse config at {}", path.display()))
}

pub fn save_config(config: &CliConfig) -> Result<()> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config dir at {}", dir.display()))?;
    let content = toml::to_string_pretty(config).context("failed to serialize config")?;
    let path = config_path()?;
    std::fs::write(&path, content)
        .with_context(|| format!("failed to write config at {}", path.display()))?;
    Ok(())
}

/// Print current config.
pub fn show_config() -> Result<()> {
    let config = load_config()?;
    let path = config_path()?;
    println!("Config file: {}", path.display());
    println!();
    println!("[server]");
    println!("  url          = {}", config.server.url);
    println!("  timeout_secs = {}", config.server.timeout_secs);
    println!();
    println!("[tasks]");
    println!("  legacy_routes = {}", config.tasks.legacy_routes);
    Ok(())
}

/// Update config with provided values.
pub fn set_config(
    server_url: Option<String>,
    timeout_secs: Option<u64>,
    legacy_task_routes: Option<bool>,
) -> Result<()> {
    let mut config = load_config()?;

    if let Some(url) = server_url {
        config.server.url = url.trim_end_matches('/').to_string();
    }
    if let Some(secs) = timeout_secs {
        config.server.timeout_secs = secs;
    }
    if let Some(legacy) = legacy_task_routes {
        config.tasks.legacy_routes = legacy;
    }

    save_config(&config)?;
    println!("Configuration updated.");
    show_config()?;
    Ok(())
}
