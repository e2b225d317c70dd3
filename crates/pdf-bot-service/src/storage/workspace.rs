use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tracing::{debug, warn};

use crate::error::ProcessingError;
use crate::session::StoredFile;

/// Flat directory holding uploaded inputs and produced outputs. All
/// names are prefixed with the owning user id, so concurrent users
/// never collide and cleanup can always be scoped to one user's files.
pub struct Workspace {
    root: PathBuf,
    upload_seq: AtomicU64,
}

impl Workspace {
    pub async fn create(root: PathBuf) -> std::io::Result<Self> {
        fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            upload_seq: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Admit an uploaded document into the working area. The stored
    /// name carries a process-wide upload sequence, so two uploads of
    /// the same file name never overwrite each other.
    pub async fn store_input(
        &self,
        user_id: &str,
        file_name: &str,
        data: &[u8],
    ) -> Result<StoredFile, ProcessingError> {
        let seq = self.upload_seq.fetch_add(1, Ordering::Relaxed);
        let safe = sanitize_file_name(file_name);
        let path = self.root.join(format!("{user_id}_{seq}_{safe}"));
        fs::write(&path, data).await?;
        debug!(user_id, file = %path.display(), "stored uploaded document");
        Ok(StoredFile {
            path,
            file_name: file_name.to_string(),
        })
    }

    /// Where a produced document for this user goes.
    pub fn output_path(&self, user_id: &str, suffix: &str) -> PathBuf {
        self.root.join(format!("{user_id}_{suffix}"))
    }

    /// Best-effort release of a session's input files.
    pub async fn remove_files(&self, files: &[StoredFile]) {
        for file in files {
            self.remove_path(&file.path).await;
        }
    }

    /// Best-effort removal. A file that is already gone is not an
    /// error; anything else is logged and swallowed.
    pub async fn remove_path(&self, path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(file = %path.display(), "failed to remove working file: {e}");
            }
        }
    }
}

/// Strip any directory components and control characters from a
/// client-supplied file name.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    base.chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn identical_upload_names_get_distinct_paths() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::create(dir.path().to_path_buf()).await.unwrap();

        let a = ws.store_input("u1", "report.pdf", b"one").await.unwrap();
        let b = ws.store_input("u1", "report.pdf", b"two").await.unwrap();

        assert_ne!(a.path, b.path);
        assert_eq!(a.file_name, "report.pdf");
        assert_eq!(tokio::fs::read(&a.path).await.unwrap(), b"one");
        assert_eq!(tokio::fs::read(&b.path).await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn removing_missing_files_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::create(dir.path().to_path_buf()).await.unwrap();

        let stored = ws.store_input("u1", "a.pdf", b"x").await.unwrap();
        ws.remove_files(std::slice::from_ref(&stored)).await;
        assert!(!stored.path.exists());

        // Second removal is a no-op.
        ws.remove_files(std::slice::from_ref(&stored)).await;
    }

    #[test]
    fn sanitize_drops_directories_and_control_chars() {
        assert_eq!(sanitize_file_name("report.pdf"), "report.pdf");
        assert_eq!(sanitize_file_name("../../etc/passwd.pdf"), "passwd.pdf");
        assert_eq!(sanitize_file_name("dir\\doc.pdf"), "doc.pdf");
        assert_eq!(sanitize_file_name("a\nb.pdf"), "a_b.pdf");
    }
}
