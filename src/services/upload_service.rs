//! Upload adapters: persist a blob and return a publicly reachable URL.
//!
//! `LocalUploader` writes beneath `base_path` and the router serves that
//! directory at `/uploads`. A single attempt either succeeds or surfaces the
//! error; there are no retries.

use crate::errors::{ServiceError, ServiceResult};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use std::{
    io::{self, ErrorKind},
    path::PathBuf,
};
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::debug;
use uuid::Uuid;

/// URL prefix under which locally stored uploads are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

const MAX_FILENAME_LEN: usize = 120;

#[async_trait]
pub trait UploadAdapter: Send + Sync {
    /// Store `bytes` and return the URL it can be fetched from.
    async fn upload(
        &self,
        bytes: Bytes,
        filename: &str,
        content_type: Option<&str>,
    ) -> ServiceResult<String>;
}

#[derive(Clone, Debug)]
pub struct LocalUploader {
    /// Directory where uploaded payloads are written.
    pub base_path: PathBuf,
}

impl LocalUploader {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }
}

#[async_trait]
impl UploadAdapter for LocalUploader {
    /// Write to a temporary file, fsync, then rename into place so readers
    /// never observe a partial file.
    async fn upload(
        &self,
        bytes: Bytes,
        filename: &str,
        content_type: Option<&str>,
    ) -> ServiceResult<String> {
        fs::create_dir_all(&self.base_path).await?;

        let stored_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(filename)
        );
        let final_path = self.base_path.join(&stored_name);
        let tmp_path = self.base_path.join(format!(".tmp-{}", Uuid::new_v4()));

        if let Err(err) = write_synced(&tmp_path, &bytes).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(ServiceError::Io(err));
        }
        if let Err(err) = fs::rename(&tmp_path, &final_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(ServiceError::Io(err));
        }

        debug!(
            file = %final_path.display(),
            size = bytes.len(),
            content_type = content_type.unwrap_or("unknown"),
            "stored upload"
        );
        Ok(format!("{}/{}", PUBLIC_PREFIX, stored_name))
    }
}

async fn write_synced(path: &std::path::Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}

/// Replace anything outside `[A-Za-z0-9.]` with `_` and refuse names that
/// would escape the upload directory.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let mut cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '_' })
        .collect();
    while cleaned.starts_with('.') {
        cleaned.replace_range(..1, "_");
    }
    if cleaned.is_empty() {
        cleaned.push_str("upload");
    }
    if cleaned.len() > MAX_FILENAME_LEN {
        cleaned = cleaned[cleaned.len() - MAX_FILENAME_LEN..].to_string();
    }
    cleaned
}

/// Probe that the upload directory is writable: write, read back, delete.
pub async fn probe_writable(base_path: &std::path::Path) -> Result<(), String> {
    let tmp_path = base_path.join(format!(".readyz-{}", Uuid::new_v4()));
    fs::write(&tmp_path, b"readyz")
        .await
        .map_err(|e| format!("could not write tmp file: {}", e))?;
    let read = fs::read(&tmp_path).await;
    let _ = fs::remove_file(&tmp_path).await;
    match read {
        Ok(bytes) if bytes == b"readyz" => Ok(()),
        Ok(_) => Err("file content mismatch".into()),
        Err(e) if e.kind() == ErrorKind::NotFound => Err("tmp file vanished".into()),
        Err(e) => Err(format!("could not read tmp file: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filenames_are_sanitized() {
        assert_eq!(sanitize_filename("my photo (1).JPG"), "my_photo__1_.JPG");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("..hidden"), "_.hidden");
        assert_eq!(sanitize_filename(""), "upload");
        assert!(sanitize_filename(&"a".repeat(500)).len() <= MAX_FILENAME_LEN);
    }

    #[tokio::test]
    async fn local_upload_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let uploader = LocalUploader::new(dir.path().join("uploads"));

        let url = uploader
            .upload(Bytes::from_static(b"png-bytes"), "hero image.png", Some("image/png"))
            .await
            .unwrap();

        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-hero_image.png"));
        let stored = dir
            .path()
            .join("uploads")
            .join(url.trim_start_matches("/uploads/"));
        assert_eq!(std::fs::read(stored).unwrap(), b"png-bytes");

        let leftovers = std::fs::read_dir(dir.path().join("uploads"))
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp-"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn probe_reports_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(probe_writable(dir.path()).await.is_ok());
        assert!(probe_writable(&dir.path().join("missing")).await.is_err());
    }
}
