//! Path normalization utilities.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand `~` and resolve a relative path against `root`.
pub fn expand_path(path: &Path, root: &Path) -> PathBuf {
    let expanded = shellexpand::tilde(path.to_str().unwrap_or_default()).into_owned();
    let path = PathBuf::from(expanded);
    let full_path = if path.is_relative() {
        root.join(&path)
    } else {
        path
    };
    normalize_path(&full_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_absolute_missing_path() {
        let path = Path::new("/definitely/not/here.txt");
        assert_eq!(normalize_path(path), PathBuf::from("/definitely/not/here.txt"));
    }

    #[test]
    fn test_expand_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("token");
        std::fs::write(&file, "abc").unwrap();

        let resolved = expand_path(Path::new("token"), dir.path());
        assert_eq!(resolved, normalize_path(&file));
    }

    #[test]
    fn test_expand_absolute_kept() {
        let resolved = expand_path(Path::new("/tmp/nowhere/token"), Path::new("/root"));
        assert_eq!(resolved, PathBuf::from("/tmp/nowhere/token"));
    }
}
