//! Configuration store: one JSON document in the platform config directory.
//!
//! Windows: `%APPDATA%/savesync/config.json`
//! macOS: `~/Library/Application Support/savesync/config.json`
//! Linux: `~/.config/savesync/config.json`
//!
//! Every mutating operation is a load-then-save of the whole document.
//! Concurrent writers are out of scope (single desktop user assumed).

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, SyncError};

pub const CONFIG_DIR_NAME: &str = "savesync";
pub const CONFIG_FILE_NAME: &str = "config.json";

/// The whole configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub api_base_url: Option<String>,
    pub api_key: Option<String>,
    pub owner_id: Option<String>,
    pub games: Vec<ConfiguredGame>,
    pub extra_scan_roots: Vec<String>,
}

/// A game the user chose to track, with its save paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfiguredGame {
    pub id: String,
    pub paths: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_image: Option<String>,
}

impl Config {
    /// Look up a game by id, case-insensitively.
    pub fn game(&self, game_id: &str) -> Option<&ConfiguredGame> {
        self.games.iter().find(|g| g.id.eq_ignore_ascii_case(game_id))
    }

    /// Endpoint and owner id are required before any sync call; the API key
    /// may legitimately be empty. Returns (base url, owner id, api key).
    pub fn require_sync_settings(&self) -> Result<(String, String, String)> {
        let base = self
            .api_base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SyncError::Configuration("apiBaseUrl is not set".to_string()))?;
        let owner = self
            .owner_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SyncError::Configuration("ownerId is not set".to_string()))?;
        let key = self.api_key.clone().unwrap_or_default();
        Ok((base.to_string(), owner.to_string(), key))
    }
}

fn default_owner_id() -> String {
    std::env::var("USERNAME")
        .or_else(|_| std::env::var("USER"))
        .unwrap_or_else(|_| "default-user".to_string())
        .to_lowercase()
}

/// File-backed config store.
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    /// Store at the platform config location.
    pub fn new() -> Result<Self> {
        let base = dirs::config_dir()
            .or_else(dirs::data_local_dir)
            .or_else(dirs::home_dir)
            .ok_or_else(|| {
                SyncError::Configuration("no config directory available".to_string())
            })?;
        Ok(Self {
            path: base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME),
        })
    }

    /// Store at an explicit file path.
    pub fn at<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document. A missing or unparseable file yields the default
    /// config; the owner id falls back to the lowercased OS username.
    pub fn load(&self) -> Config {
        let mut config: Config = fs::read_to_string(&self.path)
            .ok()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        if config.owner_id.as_deref().map_or(true, |s| s.trim().is_empty()) {
            config.owner_id = Some(default_owner_id());
        }
        config
    }

    /// Write the whole document, creating the parent directory if needed.
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, json)?;
        Ok(())
    }

    /// Add a path to a game, creating the game when it does not exist yet.
    /// Game ids are stored lowercase; duplicate paths are ignored.
    pub fn add_game(&self, game_id: &str, path: &str) -> Result<Config> {
        let mut config = self.load();
        match config
            .games
            .iter_mut()
            .find(|g| g.id.eq_ignore_ascii_case(game_id))
        {
            Some(game) => {
                if !game.paths.iter().any(|p| p.eq_ignore_ascii_case(path)) {
                    game.paths.push(path.to_string());
                }
            }
            None => config.games.push(ConfiguredGame {
                id: game_id.to_lowercase(),
                paths: vec![path.to_string()],
                display_image: None,
            }),
        }
        self.save(&config)?;
        Ok(config)
    }

    /// Remove one path from a game, or the whole game when no path is given.
    /// A game whose last path is removed disappears from the config.
    pub fn remove_game(&self, game_id: &str, path: Option<&str>) -> Result<Config> {
        let mut config = self.load();
        let index = config
            .games
            .iter()
            .position(|g| g.id.eq_ignore_ascii_case(game_id))
            .ok_or_else(|| SyncError::GameNotFound(game_id.to_string()))?;

        match path {
            Some(path) => {
                let game = &mut config.games[index];
                game.paths.retain(|p| !p.eq_ignore_ascii_case(path));
                if game.paths.is_empty() {
                    config.games.remove(index);
                }
            }
            None => {
                config.games.remove(index);
            }
        }
        self.save(&config)?;
        Ok(config)
    }

    /// Add an extra scan root, ignoring case-insensitive duplicates.
    pub fn add_scan_root(&self, root: &str) -> Result<Config> {
        let mut config = self.load();
        if !config
            .extra_scan_roots
            .iter()
            .any(|r| r.eq_ignore_ascii_case(root))
        {
            config.extra_scan_roots.push(root.to_string());
        }
        self.save(&config)?;
        Ok(config)
    }

    /// Remove an extra scan root.
    pub fn remove_scan_root(&self, root: &str) -> Result<Config> {
        let mut config = self.load();
        config
            .extra_scan_roots
            .retain(|r| !r.eq_ignore_ascii_case(root));
        self.save(&config)?;
        Ok(config)
    }
}
