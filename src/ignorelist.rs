use crate::fsutils::{PathError, Target, ignore_entry, relative_path};
use log::debug;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;

pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";

#[derive(Debug, ThisError)]
pub enum UpdateError {
    #[error("could not open or create {}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not read {}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write to {}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{} is not below {}", target.display(), root.display())]
    OutsideRoot { root: PathBuf, target: PathBuf },
    #[error("refusing to ignore the repository root itself")]
    EmptyEntry,
    #[error(transparent)]
    Entry(#[from] PathError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Added,
    AlreadyPresent,
}

/// The ignore file of one repository root.
pub struct IgnoreList {
    pub path: PathBuf,
}

impl IgnoreList {
    pub fn new(root: &Path, file_name: &str) -> Self {
        Self {
            path: root.join(file_name),
        }
    }

    /// Entry for `target` as seen from `root`.
    pub fn entry_for(root: &Path, target: &Target) -> Result<String, UpdateError> {
        let rel = relative_path(root, &target.path).ok_or_else(|| UpdateError::OutsideRoot {
            root: root.to_path_buf(),
            target: target.path.clone(),
        })?;
        if rel.as_os_str().is_empty() {
            return Err(UpdateError::EmptyEntry);
        }
        Ok(ignore_entry(&rel, target.is_dir)?)
    }

    /// Appends `entry` unless a line with exactly that text exists.
    pub fn add(&self, entry: &str) -> Result<Outcome, UpdateError> {
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|source| UpdateError::Open {
                path: self.path.clone(),
                source,
            })?;

        let (existing, ends_with_newline) = self.read_entries(&mut file)?;
        if existing.contains(entry) {
            debug!("{entry} already listed in {}", self.path.display());
            return Ok(Outcome::AlreadyPresent);
        }

        let mut line = String::with_capacity(entry.len() + 2);
        if !ends_with_newline {
            line.push('\n');
        }
        line.push_str(entry);
        line.push('\n');

        file.seek(SeekFrom::End(0))
            .and_then(|_| file.write_all(line.as_bytes()))
            .and_then(|()| file.flush())
            .map_err(|source| UpdateError::Write {
                path: self.path.clone(),
                source,
            })?;
        Ok(Outcome::Added)
    }

    pub fn update(&self, root: &Path, target: &Target) -> Result<(String, Outcome), UpdateError> {
        let entry = Self::entry_for(root, target)?;
        let outcome = self.add(&entry)?;
        Ok((entry, outcome))
    }

    /// Existing lines, plus whether the file is empty or ends in a newline.
    fn read_entries(&self, file: &mut File) -> Result<(HashSet<String>, bool), UpdateError> {
        let read_err = |source| UpdateError::Read {
            path: self.path.clone(),
            source,
        };
        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(read_err)?;
        let ends_with_newline = contents.last().is_none_or(|&b| b == b'\n');

        let entries = contents
            .as_slice()
            .lines()
            .map(|line| line.map(trim_cr))
            .collect::<Result<HashSet<_>, _>>()
            .map_err(read_err)?;
        Ok((entries, ends_with_newline))
    }
}

fn trim_cr(mut line: String) -> String {
    if line.ends_with('\r') {
        line.pop();
    }
    line
}
