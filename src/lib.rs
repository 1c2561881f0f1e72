pub mod config;
pub mod fsutils;
pub mod ignorelist;
pub mod repo;
pub mod select;

use fsutils::PathError;
use ignorelist::{IgnoreList, Outcome, UpdateError};
use log::info;
use repo::{LocateError, LocatorConfig, RepoLocator, SelectionPolicy};
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;

pub use crate::config::Config;
pub use fsutils::{Target, resolve_target};
pub use ignorelist::DEFAULT_IGNORE_FILE;
pub use repo::SelectionMode;
pub use select::Prompt;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Target(#[from] PathError),
    #[error(transparent)]
    Locate(#[from] LocateError),
    #[error(transparent)]
    Update(#[from] UpdateError),
    #[error("invalid configuration")]
    Config(#[from] ::config::ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct Options {
    pub locator: LocatorConfig,
    pub ignore_file: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            locator: LocatorConfig::default(),
            ignore_file: DEFAULT_IGNORE_FILE.to_owned(),
        }
    }
}

impl From<&Config> for Options {
    fn from(config: &Config) -> Self {
        Self {
            locator: config.locator(),
            ignore_file: config.core.ignore_file.clone(),
        }
    }
}

#[derive(Debug)]
pub struct Report {
    pub root: PathBuf,
    pub ignore_file: PathBuf,
    pub entry: String,
    pub outcome: Outcome,
}

/// Ignores `raw` (relative to `cwd`) in the repository that encloses it.
pub fn run(
    cwd: &Path,
    raw: &Path,
    options: &Options,
    policy: &mut dyn SelectionPolicy,
) -> Result<Report, Error> {
    let target = resolve_target(cwd, raw)?;
    let locator = RepoLocator::new(options.locator.clone());
    let root = locator.locate(target.start_dir(), policy)?;
    info!("using repository root {}", root.display());

    let list = IgnoreList::new(&root, &options.ignore_file);
    let (entry, outcome) = list.update(&root, &target)?;
    Ok(Report {
        ignore_file: list.path,
        root,
        entry,
        outcome,
    })
}
