//! Configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/chatvault/config.toml`
//! - Windows: `%APPDATA%/chatvault/config.toml`

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Static configuration, read once at startup and passed by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Chunk size limit in bytes; files above this are split before upload.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    /// Default directory of files to upload.
    #[serde(default = "default_files_dir")]
    pub files_dir: String,

    /// Directory where downloaded attachments are saved.
    #[serde(default = "default_downloads_dir")]
    pub downloads_dir: String,

    /// Path of the JSON manifest file.
    #[serde(default = "default_manifest_path")]
    pub manifest_path: String,

    /// Base URL of the messaging gateway.
    #[serde(default)]
    pub gateway_url: String,

    /// Bearer token for the gateway. Opaque pass-through.
    #[serde(default)]
    pub gateway_token: String,

    /// Channel identifier where attachments are stored. Opaque pass-through.
    #[serde(default)]
    pub channel: String,
}

fn default_chunk_size() -> u64 {
    chatvault_chunk::DEFAULT_CHUNK_SIZE
}

fn default_files_dir() -> String {
    "files".into()
}

fn default_downloads_dir() -> String {
    "downloads".into()
}

fn default_manifest_path() -> String {
    "manifests/file_manifest.json".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            files_dir: default_files_dir(),
            downloads_dir: default_downloads_dir(),
            manifest_path: default_manifest_path(),
            gateway_url: String::new(),
            gateway_token: String::new(),
            channel: String::new(),
        }
    }
}

impl Config {
    /// Loads configuration from the default path, creating a default file
    /// if none exists yet.
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path()?;

        if path.exists() {
            Self::load_from(&path)
        } else {
            let config = Config::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Loads configuration from an explicit path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Saves the current configuration to `path`.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        // The gateway token lives in this file.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("chatvault")
            .join("config.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("chatvault").join("config.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/chatvault/config.toml"))
    }
}
