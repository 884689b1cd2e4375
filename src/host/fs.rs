//! File system backed by `std::fs` and `tokio::fs`.

use super::FileSystem;
use async_trait::async_trait;
use std::fs::Metadata;
use std::io;
use std::path::Path;

/// The real file system.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFileSystem;

fn is_regular(metadata: io::Result<Metadata>) -> bool {
    metadata.map(|m| m.is_file()).unwrap_or(false)
}

#[async_trait]
impl FileSystem for StdFileSystem {
    fn is_file_blocking(&self, path: &Path, follow_symlinks: bool) -> bool {
        if follow_symlinks {
            is_regular(std::fs::metadata(path))
        } else {
            is_regular(std::fs::symlink_metadata(path))
        }
    }

    async fn is_file(&self, path: &Path, follow_symlinks: bool) -> bool {
        if follow_symlinks {
            is_regular(tokio::fs::metadata(path).await)
        } else {
            is_regular(tokio::fs::symlink_metadata(path).await)
        }
    }

    fn read_to_string_blocking(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    fn write_blocking(&self, path: &Path, contents: &str) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        tokio::fs::write(path, contents).await
    }

    fn remove_file_blocking(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_file(path)
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        tokio::fs::remove_file(path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_is_file_rejects_directories_and_missing() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("app.json");
        std::fs::write(&file, "{}").unwrap();

        let fs = StdFileSystem;
        assert!(fs.is_file_blocking(&file, true));
        assert!(!fs.is_file_blocking(temp.path(), true));
        assert!(!fs.is_file_blocking(&temp.path().join("missing.json"), true));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_only_counts_when_followed() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("real.json");
        let link = temp.path().join("link.json");
        std::fs::write(&target, "{}").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let fs = StdFileSystem;
        assert!(fs.is_file_blocking(&link, true));
        assert!(!fs.is_file_blocking(&link, false));
    }

    #[tokio::test]
    async fn test_async_variants_match_blocking() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("app.yaml");

        let fs = StdFileSystem;
        fs.write(&file, "port: 1").await.unwrap();
        assert!(fs.is_file(&file, true).await);
        assert_eq!(fs.read_to_string(&file).await.unwrap(), "port: 1");
        fs.remove_file(&file).await.unwrap();
        assert!(!fs.is_file_blocking(&file, true));
    }
}
