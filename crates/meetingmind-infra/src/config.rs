//! Configuration loader for MeetingMind.
//!
//! Reads `config.toml` (`~/.meetingmind/config.toml` unless overridden) into
//! [`AppConfig`], then applies environment overrides. Falls back to defaults
//! when the file is missing or malformed.

use std::path::{Path, PathBuf};

use meetingmind_types::config::{AppConfig, MemoryBackend};

/// Environment variables that override file settings.
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_MEMORY_BACKEND: &str = "MEETINGMIND_MEMORY_BACKEND";
pub const ENV_MEMORY_API_KEY: &str = "EVERMEMOS_API_KEY";
pub const ENV_MEMORY_BASE_URL: &str = "EVERMEMOS_BASE_URL";
pub const ENV_DATA_DIR: &str = "MEETINGMIND_DATA_DIR";

/// Resolve the data directory.
///
/// Priority:
/// 1. `MEETINGMIND_DATA_DIR` environment variable
/// 2. `~/.meetingmind`
/// 3. `.meetingmind` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        return PathBuf::from(dir);
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".meetingmind");
    }
    PathBuf::from(".meetingmind")
}

/// The explicit `--config` path, or `config.toml` in the data directory.
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => resolve_data_dir().join("config.toml"),
    }
}

/// Load configuration from `path`.
///
/// - Missing file: defaults.
/// - Unreadable or unparseable file: a warning, then defaults.
pub async fn load_config_file(path: &Path) -> AppConfig {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return AppConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", path.display());
            return AppConfig::default();
        }
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!("Failed to parse {}: {err}, using defaults", path.display());
            AppConfig::default()
        }
    }
}

/// Load `path` and apply overrides from the process environment.
pub async fn load_config(path: &Path) -> AppConfig {
    let mut config = load_config_file(path).await;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config
}

/// Apply environment overrides using `lookup` to read variables. Empty
/// values are ignored; an unknown backend name is logged and ignored.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = var(ENV_OPENAI_API_KEY) {
        config.llm.api_key = Some(key);
    }
    if let Some(url) = var(ENV_OPENAI_BASE_URL) {
        config.llm.base_url = url;
    }
    if let Some(backend) = var(ENV_MEMORY_BACKEND) {
        match backend.parse::<MemoryBackend>() {
            Ok(backend) => config.memory.backend = backend,
            Err(err) => tracing::warn!("Ignoring {ENV_MEMORY_BACKEND}: {err}"),
        }
    }
    if let Some(key) = var(ENV_MEMORY_API_KEY) {
        config.memory.api_key = Some(key);
    }
    if let Some(url) = var(ENV_MEMORY_BASE_URL) {
        config.memory.base_url = url;
    }
}
