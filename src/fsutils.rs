use path_clean::PathClean;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum PathError {
    #[error("{} does not exist", .0.display())]
    NotFound(PathBuf),
    #[error("{} is not valid UTF-8", .0.display())]
    NotUtf8(PathBuf),
    #[error("cannot inspect {}", path.display())]
    Metadata {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A fully resolved path that existed when it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub path: PathBuf,
    pub is_dir: bool,
}

impl Target {
    /// Directory the ancestor walk starts from.
    pub fn start_dir(&self) -> &Path {
        parent(&self.path).unwrap_or(&self.path)
    }
}

/// Joins `raw` onto `cwd` (unless already absolute) and normalizes it
/// lexically. Symlinks are not followed, so a link is ignored by its own
/// name rather than by what it points at.
pub fn resolve_target(cwd: &Path, raw: &Path) -> Result<Target, PathError> {
    let path = cwd.join(raw).clean();
    match fs::symlink_metadata(&path) {
        Ok(meta) => Ok(Target {
            is_dir: meta.is_dir(),
            path,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(PathError::NotFound(path)),
        Err(source) => Err(PathError::Metadata { path, source }),
    }
}

pub fn parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}

/// Lexical path from `from` to `to`. Both must be absolute and share a
/// root, otherwise there is no such path.
pub fn relative_path(from: &Path, to: &Path) -> Option<PathBuf> {
    if !from.is_absolute() || !to.is_absolute() {
        return None;
    }
    let from: Vec<Component> = from.components().filter(|c| *c != Component::CurDir).collect();
    let to: Vec<Component> = to.components().filter(|c| *c != Component::CurDir).collect();

    // absolute paths always start with a root or prefix component
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    if common == 0 {
        return None;
    }

    let mut rel = PathBuf::new();
    for _ in &from[common..] {
        rel.push(Component::ParentDir);
    }
    for c in &to[common..] {
        rel.push(c);
    }
    Some(rel)
}

/// Renders a relative path as an ignore entry: `/` separated, with a
/// single trailing `/` for directories. The ignore file is UTF-8, so a
/// component that is not valid UTF-8 is an error rather than a lossy guess.
pub fn ignore_entry(rel: &Path, is_dir: bool) -> Result<String, PathError> {
    let mut entry = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| PathError::NotUtf8(rel.to_path_buf()))?
        .join("/");
    if is_dir && !entry.is_empty() && !entry.ends_with('/') {
        entry.push('/');
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_below_root() {
        let rel = relative_path(Path::new("/a/b"), Path::new("/a/b/c/d.txt"));
        assert_eq!(rel, Some(PathBuf::from("c/d.txt")));
    }

    #[test]
    fn relative_path_diverging() {
        let rel = relative_path(Path::new("/a/b/x"), Path::new("/a/c/d"));
        assert_eq!(rel, Some(PathBuf::from("../../c/d")));
    }

    #[test]
    fn relative_path_to_self_is_empty() {
        let rel = relative_path(Path::new("/a/b"), Path::new("/a/b"));
        assert_eq!(rel, Some(PathBuf::new()));
    }

    #[test]
    fn relative_path_rejects_relative_inputs() {
        assert_eq!(relative_path(Path::new("a"), Path::new("/a/b")), None);
        assert_eq!(relative_path(Path::new("/a"), Path::new("b")), None);
    }

    #[test]
    fn entry_for_directory_gets_one_slash() {
        assert_eq!(ignore_entry(Path::new("sub"), true).unwrap(), "sub/");
        assert_eq!(ignore_entry(Path::new("sub/"), true).unwrap(), "sub/");
        assert_eq!(ignore_entry(Path::new("a/b"), false).unwrap(), "a/b");
    }

    #[test]
    fn entry_for_empty_path() {
        assert_eq!(ignore_entry(Path::new(""), true).unwrap(), "");
    }

    #[cfg(unix)]
    #[test]
    fn entry_rejects_invalid_utf8() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let rel = Path::new(OsStr::from_bytes(b"dir/bad\xffname.txt"));
        let err = ignore_entry(rel, false).unwrap_err();
        assert!(matches!(err, PathError::NotUtf8(p) if p == rel));
    }

    #[test]
    fn parent_stops_at_root() {
        assert_eq!(parent(Path::new("/a")), Some(Path::new("/")));
        assert_eq!(parent(Path::new("/")), None);
    }

    #[test]
    fn resolve_normalizes_dot_segments() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub/f.txt"), "x").unwrap();

        let target = resolve_target(dir.path(), Path::new("./sub/../sub/f.txt")).unwrap();
        assert_eq!(target.path, dir.path().join("sub/f.txt"));
        assert!(!target.is_dir);

        let target = resolve_target(dir.path(), Path::new("sub/")).unwrap();
        assert_eq!(target.path, dir.path().join("sub"));
        assert!(target.is_dir);
    }

    #[test]
    fn resolve_missing_target() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_target(dir.path(), Path::new("nope")).unwrap_err();
        assert!(matches!(err, PathError::NotFound(p) if p == dir.path().join("nope")));
    }
}
