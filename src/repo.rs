use crate::fsutils::parent;
use itertools::Itertools;
use log::{debug, warn};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;

pub const DEFAULT_MARKER: &str = ".git";
pub const DEFAULT_MAX_DEPTH: usize = 56;
const SELECT_PROMPT: &str = "Which repository should ignore this path?";

#[derive(Debug, ThisError)]
pub enum LocateError {
    #[error("no {marker} directory found in {} or any parent directory", start.display())]
    NotFound { start: PathBuf, marker: String },
    #[error("no repository root was selected")]
    SelectionAbandoned,
    #[error("could not ask which repository to use")]
    Prompt(#[source] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// First root found going upwards wins.
    #[default]
    Nearest,
    /// Collect every ancestor root and let a [`SelectionPolicy`] decide.
    All,
}

#[derive(Debug, Clone)]
pub struct LocatorConfig {
    pub marker: String,
    pub max_depth: usize,
    pub mode: SelectionMode,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_owned(),
            max_depth: DEFAULT_MAX_DEPTH,
            mode: SelectionMode::default(),
        }
    }
}

/// Picks one root out of several, nearest first. `Ok(None)` means no
/// choice was made.
pub trait SelectionPolicy {
    fn select(&mut self, candidates: &[PathBuf], prompt: &str) -> io::Result<Option<usize>>;
}

pub struct Nearest;

impl SelectionPolicy for Nearest {
    fn select(&mut self, candidates: &[PathBuf], _prompt: &str) -> io::Result<Option<usize>> {
        Ok(if candidates.is_empty() { None } else { Some(0) })
    }
}

/// `start` followed by its logical parents, yielding at most `limit`
/// directories.
pub struct Ancestors<'a> {
    next: Option<&'a Path>,
    hops_left: usize,
}

impl<'a> Ancestors<'a> {
    pub fn new(start: &'a Path, limit: usize) -> Self {
        Self {
            next: Some(start),
            hops_left: limit,
        }
    }

    /// True once the walk stopped because of the hop bound rather than
    /// reaching the filesystem root.
    pub fn exhausted(&self) -> bool {
        self.next.is_some() && self.hops_left == 0
    }
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Path;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        if self.hops_left == 0 {
            return None;
        }
        self.hops_left -= 1;
        self.next = parent(current);
        Some(current)
    }
}

/// A directory is a repository root when it directly contains a marker
/// directory. A plain file with the marker's name does not count.
pub fn is_repo_root(dir: &Path, marker: &str) -> bool {
    dir.join(marker)
        .symlink_metadata()
        .is_ok_and(|meta| meta.is_dir())
}

pub struct RepoLocator {
    config: LocatorConfig,
}

impl RepoLocator {
    pub fn new(config: LocatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Repository roots above `start`, nearest first. In `Nearest` mode the
    /// walk stops at the first one.
    pub fn candidates(&self, start: &Path) -> Vec<PathBuf> {
        let mut walk = Ancestors::new(start, self.config.max_depth.saturating_add(1));
        let mut candidates = Vec::new();
        for dir in walk.by_ref() {
            if is_repo_root(dir, &self.config.marker) {
                debug!("found {} in {}", self.config.marker, dir.display());
                candidates.push(dir.to_path_buf());
                if self.config.mode == SelectionMode::Nearest {
                    return candidates;
                }
            }
        }
        if walk.exhausted() {
            warn!(
                "stopped looking for {} after {} parent directories of {}",
                self.config.marker,
                self.config.max_depth,
                start.display()
            );
        }
        candidates
    }

    pub fn locate(
        &self,
        start: &Path,
        policy: &mut dyn SelectionPolicy,
    ) -> Result<PathBuf, LocateError> {
        let mut candidates = self.candidates(start);
        match candidates.len() {
            0 => Err(LocateError::NotFound {
                start: start.to_path_buf(),
                marker: self.config.marker.clone(),
            }),
            1 => Ok(candidates.remove(0)),
            n => {
                debug!(
                    "{n} repository roots: {}",
                    candidates.iter().map(|c| c.display()).join(", ")
                );
                policy
                    .select(&candidates, SELECT_PROMPT)
                    .map_err(LocateError::Prompt)?
                    .filter(|&i| i < n)
                    .map(|i| candidates.swap_remove(i))
                    .ok_or(LocateError::SelectionAbandoned)
            }
        }
    }
}
