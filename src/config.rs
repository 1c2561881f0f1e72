use crate::ignorelist::DEFAULT_IGNORE_FILE;
use crate::repo::{DEFAULT_MARKER, DEFAULT_MAX_DEPTH, LocatorConfig, SelectionMode};
use config::FileFormat;
use config::{Config as Conf, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, de};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "GITIGNORE_ADD";

#[derive(Debug, Deserialize)]
pub struct Core {
    #[serde(default = "default_marker")]
    pub marker: String,
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default, deserialize_with = "deserialize_bool")]
    pub all_roots: bool,
}

impl Default for Core {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            ignore_file: default_ignore_file(),
            max_depth: default_max_depth(),
            all_roots: false,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub core: Core,
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_owned()
}

fn default_ignore_file() -> String {
    DEFAULT_IGNORE_FILE.to_owned()
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn deserialize_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: de::Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(v) => Ok(v),
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" | "" => Ok(false),
            _ => Err(de::Error::custom(format!("expected boolean, got {s:?}"))),
        },
        t => Err(de::Error::custom(format!("expected boolean, got {t}"))),
    }
}

pub fn user_config_file() -> Option<PathBuf> {
    ProjectDirs::from("", "", "gitignore-add").map(|dirs| dirs.config_dir().join("config"))
}

impl Config {
    /// Defaults, overlaid by the user config file and then the environment.
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(user_config_file().as_deref(), Some(ENV_PREFIX))
    }

    pub fn load(file: Option<&Path>, env_prefix: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Conf::builder();
        if let Some(file) = file {
            builder = builder.add_source(
                File::from(file)
                    .required(false)
                    .format(FileFormat::Ini),
            );
        }
        if let Some(prefix) = env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__"),
            );
        }
        builder.build()?.try_deserialize()
    }

    pub fn locator(&self) -> LocatorConfig {
        LocatorConfig {
            marker: self.core.marker.clone(),
            max_depth: self.core.max_depth,
            mode: if self.core.all_roots {
                SelectionMode::All
            } else {
                SelectionMode::Nearest
            },
        }
    }
}
