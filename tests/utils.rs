#![allow(dead_code)]
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

#[macro_export]
macro_rules! t {
    ($e:expr) => {
        match $e {
            Ok(n) => n,
            Err(e) => panic!("error: {}", e),
        }
    };
}

/// Marker used where the walk must not see repositories above the temp dir.
pub const MARKER: &str = ".gitignore-add-test-repo";

pub fn write_to_temp_file<P: AsRef<Path>>(dir: &Path, file_path: P, content: &str) -> File {
    let file_path = dir.join(file_path);
    let mut file = t!(File::create(file_path));
    t!(write!(file, "{}", content));
    file
}

pub fn make_repo(dir: &Path, marker: &str) -> PathBuf {
    t!(fs::create_dir_all(dir.join(marker)));
    dir.to_path_buf()
}

pub fn read(path: &Path) -> String {
    t!(fs::read_to_string(path))
}
