//! Disk persistence for uploaded resumes.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::fs;
use tracing::{info, warn};

pub const RESUMES_SUBDIR: &str = "resumes";

/// Where resumes land on disk and how they are addressed over HTTP.
#[derive(Debug, Clone)]
pub struct ResumeStore {
    root: PathBuf,
    resumes_dir: PathBuf,
}

/// A successfully stored resume file.
#[derive(Debug, Clone)]
pub struct StoredResume {
    pub original_name: String,
    pub stored_name: String,
    pub size: usize,
    pub disk_path: PathBuf,
}

impl StoredResume {
    /// Path under the static `/uploads` mount.
    pub fn relative_path(&self) -> String {
        format!("/uploads/{RESUMES_SUBDIR}/{}", self.stored_name)
    }
}

impl ResumeStore {
    /// Opens the store, creating the resumes directory if needed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let resumes_dir = root.join(RESUMES_SUBDIR);
        fs::create_dir_all(&resumes_dir)
            .await
            .with_context(|| format!("Failed to create upload directory {}", resumes_dir.display()))?;
        info!("Resume uploads stored under {}", resumes_dir.display());
        Ok(Self { root, resumes_dir })
    }

    /// The statically served root, for mounting at `/uploads`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the resume under a timestamped name derived from the client
    /// filename.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<StoredResume> {
        let stored_name = stored_file_name(Utc::now().timestamp_millis(), original_name);
        let disk_path = self.resumes_dir.join(&stored_name);
        fs::write(&disk_path, data)
            .await
            .with_context(|| format!("Failed to write {}", disk_path.display()))?;
        Ok(StoredResume {
            original_name: original_name.to_string(),
            stored_name,
            size: data.len(),
            disk_path,
        })
    }

    /// Removes a stored file; used when the submission fails downstream of
    /// the upload.
    pub async fn discard(&self, stored: &StoredResume) {
        if let Err(e) = fs::remove_file(&stored.disk_path).await {
            warn!("Failed to remove {}: {e}", stored.disk_path.display());
        }
    }
}

/// `<epoch_millis>_<basename>` with whitespace runs collapsed to `_` and
/// anything outside `[A-Za-z0-9._-]` dropped.
fn stored_file_name(timestamp_millis: i64, original_name: &str) -> String {
    let base = Path::new(original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();

    let mut cleaned = String::with_capacity(base.len());
    let mut in_whitespace = false;
    for c in base.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                cleaned.push('_');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                cleaned.push(c);
            }
        }
    }
    if cleaned.is_empty() {
        cleaned.push_str("resume");
    }

    format!("{timestamp_millis}_{cleaned}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_file_name_prefixes_timestamp() {
        assert_eq!(stored_file_name(1700000000000, "cv.pdf"), "1700000000000_cv.pdf");
    }

    #[test]
    fn test_stored_file_name_collapses_whitespace() {
        assert_eq!(
            stored_file_name(1, "my  resume final.pdf"),
            "1_my_resume_final.pdf"
        );
    }

    #[test]
    fn test_stored_file_name_drops_special_characters() {
        assert_eq!(stored_file_name(1, "résumé(v2)!.pdf"), "1_rsumv2.pdf");
    }

    #[test]
    fn test_stored_file_name_ignores_directory_components() {
        assert_eq!(stored_file_name(1, "../../etc/passwd.pdf"), "1_passwd.pdf");
    }

    #[test]
    fn test_stored_file_name_falls_back_when_nothing_survives() {
        assert_eq!(stored_file_name(1, "§§§"), "1_resume");
    }

    #[tokio::test]
    async fn test_save_and_discard_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ResumeStore::open(dir.path()).await.expect("open");

        let stored = store.save("cv.pdf", b"%PDF-1.4").await.expect("save");
        assert!(stored.disk_path.exists());
        assert_eq!(stored.size, 8);
        assert!(stored.stored_name.ends_with("_cv.pdf"));
        assert!(stored
            .relative_path()
            .starts_with("/uploads/resumes/"));

        store.discard(&stored).await;
        assert!(!stored.disk_path.exists());
    }

    #[tokio::test]
    async fn test_open_creates_resumes_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ResumeStore::open(dir.path().join("nested")).await.expect("open");
        assert!(store.root().join(RESUMES_SUBDIR).exists());
    }
}
