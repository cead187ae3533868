use serde::Deserialize;
use std::{env, fs, path::Path, path::PathBuf};
use thiserror::Error;

use crate::undo::DEFAULT_UNDO_CAPACITY;

pub(crate) const fn default_true() -> bool {
    true
}

pub const UNDO_CAPACITY_ENV: &str = "BLOCKBOARD_UNDO_CAPACITY";

/// Board configuration, read from `~/.blockboard/config.toml`.
///
/// ```toml
/// [undo]
/// capacity = 50
///
/// [dnd]
/// enabled = true
/// sorting = true
///
/// [blocks]
/// exclusive_by_default = true
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct BoardConfig {
    pub undo: Option<UndoConfig>,
    pub dnd: Option<DndConfig>,
    pub blocks: Option<BlocksConfig>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl ConfigError {
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UndoConfig {
    /// Maximum retained undo operations. 0 keeps everything. Default: 50.
    pub capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DndConfig {
    /// Give blocks drag handles. Default: true.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Register blocks as drop targets so lists can be reordered. Default: true.
    #[serde(default = "default_true")]
    pub sorting: bool,
}

impl Default for DndConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sorting: true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BlocksConfig {
    /// A plain header click collapses the other blocks. Default: true.
    #[serde(default = "default_true")]
    pub exclusive_by_default: bool,
}

impl Default for BlocksConfig {
    fn default() -> Self {
        Self {
            exclusive_by_default: true,
        }
    }
}

impl BoardConfig {
    /// Load the user config. A missing file is `Ok(None)`.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Undo capacity: `BLOCKBOARD_UNDO_CAPACITY`, then `[undo] capacity`,
    /// then the default. `None` means unbounded.
    #[must_use]
    pub fn undo_capacity(&self) -> Option<usize> {
        self.undo_capacity_with(env::var(UNDO_CAPACITY_ENV).ok().as_deref())
    }

    /// Resolve the capacity given the raw override value, if set.
    fn undo_capacity_with(&self, raw: Option<&str>) -> Option<usize> {
        let from_env = raw.and_then(|raw| match raw.trim().parse::<usize>() {
            Ok(capacity) => Some(capacity),
            Err(_) => {
                tracing::warn!("Ignoring non-numeric {}: {}", UNDO_CAPACITY_ENV, raw);
                None
            }
        });
        let capacity = from_env
            .or_else(|| self.undo.as_ref().and_then(|undo| undo.capacity))
            .unwrap_or(DEFAULT_UNDO_CAPACITY);
        (capacity > 0).then_some(capacity)
    }

    #[must_use]
    pub fn dnd_enabled(&self) -> bool {
        self.dnd.as_ref().is_none_or(|dnd| dnd.enabled)
    }

    #[must_use]
    pub fn dnd_sorting(&self) -> bool {
        self.dnd.as_ref().is_none_or(|dnd| dnd.sorting)
    }

    #[must_use]
    pub fn exclusive_by_default(&self) -> bool {
        self.blocks
            .as_ref()
            .is_none_or(|blocks| blocks.exclusive_by_default)
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".blockboard").join("config.toml"))
}
