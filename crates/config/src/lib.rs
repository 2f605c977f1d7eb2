//! Layered configuration.
//!
//! Values are merged from (later wins) built-in defaults, the user's
//! `config.toml` in the platform configuration directory, an explicitly given
//! file, and finally `PANELS_*` environment variables where `__` separates
//! nested keys (`PANELS_COVERS__QUALITY=90`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use panels_transcode::{DEFAULT_QUALITY, Encoding};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

const APPLICATION: &str = "panels";
const ENV_PREFIX: &str = "PANELS_";
const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "catalog.db";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Location of the SQLite catalog.
    pub database: PathBuf,
    pub covers: Covers,
    pub import: Import,
    pub search: SearchDefaults,
}

/// How covers are encoded. Fixed for the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Covers {
    pub lossless: bool,
    /// Lossy quality, `0..=100`. Ignored when `lossless` is set.
    pub quality: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Import {
    /// Archives inspected and transcoded at the same time.
    pub concurrency: usize,
}

/// Defaults for listing the catalog when the caller doesn't say otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    pub page_size: u32,
    pub sort_by: String,
    pub sort_direction: String,
}

impl Default for Config {
    fn default() -> Self {
        let database = project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE));
        Self {
            database,
            covers: Covers::default(),
            import: Import::default(),
            search: SearchDefaults::default(),
        }
    }
}
impl Default for Covers {
    fn default() -> Self {
        Self { lossless: false, quality: DEFAULT_QUALITY }
    }
}
impl Default for Import {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}
impl Default for SearchDefaults {
    fn default() -> Self {
        Self { page_size: 12, sort_by: "imported_at".to_string(), sort_direction: "DESC".to_string() }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", APPLICATION)
}

impl Config {
    /// Load the configuration, optionally layering an explicit file over the
    /// user's own configuration.
    #[instrument(level = "debug")]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let user = project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE));
        Self::layered(user.as_deref(), explicit, Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn layered(user: Option<&Path>, explicit: Option<&Path>, env: Env) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(user) = user {
            // Missing user configuration is fine, the provider is just empty.
            figment = figment.merge(Toml::file(user));
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
            }
            let extension = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
            figment = match extension.as_deref() {
                Some("toml") => figment.merge(Toml::file(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
                Some("json") => figment.merge(Json::file(path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
            };
        }
        let config: Config = figment
            .merge(env)
            .extract()
            .or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(database = %config.database.display(), "configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.covers.quality > 100 {
            exn::bail!(ErrorKind::Invalid("covers.quality must be between 0 and 100"));
        }
        if self.import.concurrency == 0 {
            exn::bail!(ErrorKind::Invalid("import.concurrency must be at least 1"));
        }
        if self.search.page_size == 0 {
            exn::bail!(ErrorKind::Invalid("search.page_size must be at least 1"));
        }
        Ok(())
    }

    /// The cover encoding described by the `covers` section.
    pub fn encoding(&self) -> Result<Encoding> {
        Encoding::from_settings(self.covers.lossless, self.covers.quality)
            .or_raise(|| ErrorKind::Invalid("covers.quality must be between 0 and 100"))
    }
}
