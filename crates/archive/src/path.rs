//! Path validation for archive-relative paths.

use crate::error::{ErrorKind, Result};
use std::path::{Component, Path, PathBuf};

/// Validate and normalize an archive-relative path.
///
/// Archives are user-selected directories; every path handed to a store is
/// relative to that root and must stay inside it, so `..` components may
/// never climb above the start. Null bytes are rejected outright since
/// they truncate in C-based syscalls.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use shoebox_archive::validate_path;
/// assert!(validate_path("someblog/media/a.jpg").is_ok());
/// assert!(validate_path("a/../b.json").is_ok()); // stays inside the root
/// assert!(validate_path("../outside").is_err());
/// assert_eq!(
///     validate_path("Index/.//someblog.json/").unwrap(),
///     Path::new("Index/someblog.json")
/// );
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let mut components = Vec::new();
    for component in path.as_ref().components() {
        match component {
            Component::Normal(s) => {
                if s.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
                components.push(s)
            }
            Component::CurDir | Component::RootDir => {}
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf()));
                }
            }
        }
    }
    match components.is_empty() {
        true => exn::bail!(ErrorKind::InvalidPath(path.as_ref().to_path_buf())),
        false => Ok(components.into_iter().collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_normalizes_inside_paths() {
        assert_eq!(validate("someblog/texts.json").unwrap(), Path::new("someblog/texts.json"));
        assert_eq!(validate("a//b/./c/").unwrap(), Path::new("a/b/c"));
        assert_eq!(validate("a/b/..").unwrap(), Path::new("a"));
    }

    #[test]
    fn rejects_escapes_and_garbage() {
        assert!(validate("../etc/passwd").is_err());
        assert!(validate("a/../../b").is_err());
        assert!(validate("a\0b").is_err());
        assert!(validate("").is_err());
        assert!(validate(".").is_err());
    }
}
