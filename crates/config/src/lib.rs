//! Where the archive lives, and how strict exact-match lookups are.
//!
//! Sources, lowest precedence first:
//!
//! 1. Built-in defaults ([`DEFAULT_BASE_PATH`], [`DEFAULT_TOLERANCE_SECONDS`]).
//! 2. `<config dir>/aura/config.toml`, when it exists.
//! 3. `AURA_*` environment variables (`AURA_BASE_PATH`, `AURA_TOLERANCE_SECONDS`).
//! 4. A process-wide override installed with [`set_base_path`] (base path only).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use time::Duration;

pub const DEFAULT_BASE_PATH: &str = "/g/data/rq0/level_1/odim_pvol";
pub const DEFAULT_TOLERANCE_SECONDS: u64 = 60;
pub const ENV_PREFIX: &str = "AURA_";
pub const CONFIG_FILE: &str = "config.toml";

static BASE_PATH_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Archive root: `<base_path>/<radar>/<year>/vol/...`.
    pub base_path: PathBuf,
    /// Tolerance used by exact-match instant lookups.
    pub tolerance_seconds: u64,
}
impl Default for Config {
    fn default() -> Self {
        Self { base_path: PathBuf::from(DEFAULT_BASE_PATH), tolerance_seconds: DEFAULT_TOLERANCE_SECONDS }
    }
}
impl Config {
    /// Load from defaults, the user config file and the environment.
    ///
    /// The process-wide base path override is *not* applied here; see
    /// [`base_path`] for the effective root.
    pub fn load() -> Result<Self> {
        Self::from_figment(Self::figment(config_file().as_deref()))
    }

    /// The layered provider stack. `file` is optional and silently skipped
    /// when it does not exist.
    pub fn figment(file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(file) = file {
            figment = figment.merge(Toml::file(file));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    #[tracing::instrument(skip(figment))]
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(base_path = %config.base_path.display(), tolerance = config.tolerance_seconds, "Loaded configuration");
        Ok(config)
    }

    pub fn tolerance(&self) -> Duration {
        // Validated to fit in an i64.
        Duration::seconds(self.tolerance_seconds as i64)
    }

    fn validate(&self) -> Result<()> {
        if self.base_path.as_os_str().is_empty() {
            exn::bail!(ErrorKind::Invalid { field: "base_path", reason: "must not be empty".to_string() });
        }
        if i64::try_from(self.tolerance_seconds).is_err() {
            exn::bail!(ErrorKind::Invalid {
                field: "tolerance_seconds",
                reason: format!("{} is out of range", self.tolerance_seconds),
            });
        }
        Ok(())
    }
}

/// `<config dir>/aura/config.toml` for the current user, if a home directory
/// can be determined.
pub fn config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "aura").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Override the archive root for the rest of the process (or until
/// [`reset_base_path`]).
pub fn set_base_path(path: impl Into<PathBuf>) {
    let path = path.into();
    tracing::debug!(base_path = %path.display(), "Overriding archive root");
    *BASE_PATH_OVERRIDE.write().unwrap_or_else(PoisonError::into_inner) = Some(path);
}

/// Drop the override; [`base_path`] falls back to the loaded configuration.
pub fn reset_base_path() {
    *BASE_PATH_OVERRIDE.write().unwrap_or_else(PoisonError::into_inner) = None;
}

/// The effective archive root: the override if set, otherwise
/// [`Config::load`]'s `base_path`.
pub fn base_path() -> Result<PathBuf> {
    if let Some(path) = BASE_PATH_OVERRIDE.read().unwrap_or_else(PoisonError::into_inner).clone() {
        return Ok(path);
    }
    Ok(Config::load()?.base_path)
}
