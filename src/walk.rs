//! Content tree walking.
//!
//! A thin visitor layer over [walkdir]: every non-directory file reachable
//! from the root is handed to the callback, depth-first. Sibling order is
//! whatever the platform's directory listing yields — callers filter by
//! filename, never by position.
//!
//! Two contract points matter to the rest of the pipeline:
//!
//! - A missing root is a successful no-op, not an error. Content categories
//!   are optional (a site with no notes directory is fine).
//! - The visitor owns all mutation, including rewriting or deleting the very
//!   file it was handed. The article stage relies on this to replace each
//!   `ReadMe.md` with a `ReadMe.html` mid-walk.

use std::path::Path;
use walkdir::WalkDir;

/// Visit every file under `root`, depth-first.
///
/// Returns `Ok(())` without calling the visitor when `root` does not exist.
/// Any other traversal failure (permission denied, unreadable directory)
/// converts into the visitor's error type and aborts the walk.
pub fn walk<F, E>(root: &Path, mut visit: F) -> Result<(), E>
where
    F: FnMut(&Path) -> Result<(), E>,
    E: From<walkdir::Error>,
{
    if !root.exists() {
        return Ok(());
    }

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file() {
            visit(entry.path())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Debug)]
    struct TestError;

    impl From<walkdir::Error> for TestError {
        fn from(_: walkdir::Error) -> Self {
            TestError
        }
    }

    fn visited(root: &Path) -> Vec<PathBuf> {
        let mut seen = Vec::new();
        walk::<_, TestError>(root, |p| {
            seen.push(p.to_path_buf());
            Ok(())
        })
        .unwrap();
        seen
    }

    #[test]
    fn missing_root_is_a_noop() {
        let tmp = TempDir::new().unwrap();
        let seen = visited(&tmp.path().join("does-not-exist"));
        assert!(seen.is_empty());
    }

    #[test]
    fn visits_nested_files_but_not_directories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        fs::write(tmp.path().join("top.txt"), "x").unwrap();
        fs::write(tmp.path().join("a/mid.txt"), "x").unwrap();
        fs::write(tmp.path().join("a/b/deep.txt"), "x").unwrap();

        let seen = visited(tmp.path());
        assert_eq!(seen.len(), 3);
        assert!(seen.iter().all(|p| p.is_file()));
    }

    #[test]
    fn visitor_may_delete_the_visited_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("one.txt"), "x").unwrap();
        fs::write(tmp.path().join("two.txt"), "x").unwrap();

        let mut count = 0;
        walk::<_, TestError>(tmp.path(), |p| {
            fs::remove_file(p).unwrap();
            count += 1;
            Ok(())
        })
        .unwrap();

        assert_eq!(count, 2);
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn visitor_error_aborts_the_walk() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("one.txt"), "x").unwrap();
        fs::write(tmp.path().join("two.txt"), "x").unwrap();

        let mut count = 0;
        let result = walk::<_, TestError>(tmp.path(), |_| {
            count += 1;
            Err(TestError)
        });

        assert!(result.is_err());
        assert_eq!(count, 1);
    }
}
