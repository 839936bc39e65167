use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hn: HnConfig,
    pub database: DatabaseConfig,
    pub templates: TemplatesConfig,
    pub site: SiteConfig,
    pub poll: PollConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HnConfig {
    pub ids_url: String,
    pub story_base_url: String,
}

impl Default for HnConfig {
    fn default() -> Self {
        HnConfig {
            ids_url: "https://hacker-news.firebaseio.com/v0/topstories.json".to_string(),
            story_base_url: "https://hacker-news.firebaseio.com/v0/item/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Directory holding both stores; platform data dir when unset
    pub db_dir: Option<PathBuf>,
    pub ids: PathBuf,
    pub archive: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            db_dir: None,
            ids: PathBuf::from("ids.json"),
            archive: PathBuf::from("archive.json"),
        }
    }
}

impl DatabaseConfig {
    fn dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.db_dir {
            return Ok(dir.clone());
        }

        directories::ProjectDirs::from("", "", "tophn")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .ok_or_else(|| Error::Config("could not determine data directory".to_string()))
    }

    /// Path of the sample store. Absolute `ids` paths ignore `db_dir`.
    pub fn ids_path(&self) -> Result<PathBuf> {
        Ok(self.dir()?.join(&self.ids))
    }

    pub fn archive_path(&self) -> Result<PathBuf> {
        Ok(self.dir()?.join(&self.archive))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplatesConfig {
    /// Asset directory copied verbatim into every stage
    pub static_dir: PathBuf,
}

impl Default for TemplatesConfig {
    fn default() -> Self {
        TemplatesConfig {
            static_dir: PathBuf::from("static"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub root: PathBuf,
    pub stage_dir: String,
    pub live_dir: String,
    pub defunct_dir: String,
    pub home: String,
    pub archive: String,
    pub about: String,
    pub static_dir: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            root: PathBuf::from("site"),
            stage_dir: "stage".to_string(),
            live_dir: "live".to_string(),
            defunct_dir: "defunct".to_string(),
            home: "index.html".to_string(),
            archive: "archive.html".to_string(),
            about: "about.html".to_string(),
            static_dir: "static".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// humantime duration, e.g. "60s" or "1m"
    pub interval: String,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            interval: "1m".to_string(),
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Result<Duration> {
        let interval = humantime::parse_duration(&self.interval)
            .map_err(|e| Error::Config(format!("poll.interval '{}': {e}", self.interval)))?;

        if interval.is_zero() {
            return Err(Error::Config("poll.interval must be greater than zero".to_string()));
        }

        Ok(interval)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append to this file; stderr when unset
    pub file: Option<PathBuf>,
    /// EnvFilter directive, overridden by RUST_LOG
    pub level: String,
    /// chrono format string for event timestamps
    pub date_format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            file: None,
            level: "info".to_string(),
            date_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;

        // surface a bad interval at startup rather than after the first cycle
        config.poll.interval()?;

        Ok(config)
    }
}
