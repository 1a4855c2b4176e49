//! Storage for uploaded payment screenshots.

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AdminError;

/// Destination for uploaded files.
#[async_trait]
pub trait FileStore: Send + Sync + fmt::Debug {
    /// Stores `bytes` under a name derived from `file_name` and returns the
    /// public path of the stored file.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::FileStorage`] if the file cannot be written.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, AdminError>;

    /// Deletes a file previously returned by [`upload`](Self::upload).
    /// Removing a file that is already gone succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::FileStorage`] if the path was not issued by this
    /// store or the file cannot be deleted.
    async fn remove(&self, public_path: &str) -> Result<(), AdminError>;
}

/// Writes uploads below a local directory, mirroring a static `public/`
/// tree served by the front end.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    /// Subdirectory holding transaction screenshots.
    pub const TRANSACTIONS_DIR: &'static str = "transactions";

    /// Stores files below `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
fn sanitize(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<String, AdminError> {
        let stored_name = format!("{}-{}", Uuid::new_v4(), sanitize(file_name));
        let dir = self.root.join(Self::TRANSACTIONS_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AdminError::FileStorage(e.to_string()))?;
        tokio::fs::write(dir.join(&stored_name), bytes)
            .await
            .map_err(|e| AdminError::FileStorage(e.to_string()))?;
        tracing::debug!(file = %stored_name, "screenshot stored");
        Ok(format!("/{}/{stored_name}", Self::TRANSACTIONS_DIR))
    }

    async fn remove(&self, public_path: &str) -> Result<(), AdminError> {
        let stored_name = public_path
            .strip_prefix('/')
            .and_then(|rest| rest.strip_prefix(Self::TRANSACTIONS_DIR))
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|name| !name.is_empty() && *name == sanitize(name))
            .ok_or_else(|| AdminError::FileStorage(format!("not an upload path: {public_path}")))?;
        let file = self.root.join(Self::TRANSACTIONS_DIR).join(stored_name);
        match tokio::fs::remove_file(&file).await {
            Ok(()) => {
                tracing::debug!(file = %stored_name, "screenshot removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AdminError::FileStorage(e.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_paths_and_odd_characters() {
        assert_eq!(sanitize("../../etc/passwd"), "passwd");
        assert_eq!(sanitize("C:\\Users\\me\\pay slip.png"), "pay_slip.png");
        assert_eq!(sanitize(".hidden"), "hidden");
        assert_eq!(sanitize("   "), "upload");
    }

    #[tokio::test]
    async fn upload_writes_below_transactions_dir() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let store = LocalFileStore::new(dir.path());
        let Ok(path) = store.upload("receipt.png", vec![1, 2, 3]).await else {
            panic!("upload must succeed");
        };
        assert!(path.starts_with("/transactions/"));
        assert!(path.ends_with("-receipt.png"));

        let on_disk = dir.path().join(path.trim_start_matches('/'));
        let Ok(bytes) = tokio::fs::read(on_disk).await else {
            panic!("stored file must exist");
        };
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn remove_deletes_an_upload_and_tolerates_repeats() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let store = LocalFileStore::new(dir.path());
        let Ok(path) = store.upload("receipt.png", vec![1]).await else {
            panic!("upload must succeed");
        };
        assert!(store.remove(&path).await.is_ok());
        assert!(!dir.path().join(path.trim_start_matches('/')).exists());
        assert!(store.remove(&path).await.is_ok());
    }

    #[tokio::test]
    async fn remove_refuses_paths_outside_the_upload_dir() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("tempdir");
        };
        let store = LocalFileStore::new(dir.path());
        for path in [
            "/transactions/../secret",
            "/other/file.png",
            "transactions/a.png",
            "/transactions/",
        ] {
            assert!(matches!(
                store.remove(path).await,
                Err(AdminError::FileStorage(_))
            ));
        }
    }
}
