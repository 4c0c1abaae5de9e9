//! Local filesystem storage implementation.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::models::{BookRecord, OutputConfig};

/// Local filesystem storage backend.
pub struct LocalStorage {
    books_dir: PathBuf,
    metadata_path: PathBuf,
    // Serializes appends so concurrent workers cannot interleave lines
    log_lock: Mutex<()>,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(storage_dir: impl AsRef<Path>, output: &OutputConfig) -> Self {
        let storage_dir = storage_dir.as_ref();
        Self {
            books_dir: storage_dir.join(&output.root_dir),
            metadata_path: storage_dir.join(&output.metadata_file),
            log_lock: Mutex::new(()),
        }
    }

    /// Path of the metadata record log.
    pub fn metadata_path(&self) -> &Path {
        &self.metadata_path
    }

    /// Path of a book's scan directory.
    pub fn book_dir(&self, folder_name: &str) -> PathBuf {
        self.books_dir.join(folder_name)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write a downloaded scan atomically (write to temp, then rename).
    pub async fn write_image(&self, folder_name: &str, file_name: &str, bytes: &[u8]) -> Result<()> {
        let path = self.book_dir(folder_name).join(file_name);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Append a record to the metadata log as a single JSON line.
    pub async fn append_record(&self, record: &BookRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        let _guard = self.log_lock.lock().await;
        self.ensure_dir(&self.metadata_path).await?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.metadata_path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Read all records back from the metadata log.
    ///
    /// A missing log means no records yet, not an error.
    pub async fn load_records(&self) -> Result<Vec<BookRecord>> {
        let content = match tokio::fs::read_to_string(&self.metadata_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(AppError::Io(e)),
        };

        let mut records = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            records.push(serde_json::from_str(line)?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage(tmp: &TempDir) -> LocalStorage {
        LocalStorage::new(tmp.path(), &OutputConfig::default())
    }

    #[tokio::test]
    async fn test_write_image_creates_file() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);

        storage
            .write_image("b001_Test_id1", "id1_0001.jpg", b"jpegbytes")
            .await
            .unwrap();

        let path = tmp.path().join("books/b001_Test_id1/id1_0001.jpg");
        let bytes = tokio::fs::read(&path).await.unwrap();
        assert_eq!(bytes, b"jpegbytes");
    }

    #[tokio::test]
    async fn test_append_and_load_records_preserves_order() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);

        let first = BookRecord::sparse(1, "First", Some("a_1".to_string()));
        let second = BookRecord::sparse(2, "Second", None);
        storage.append_record(&first).await.unwrap();
        storage.append_record(&second).await.unwrap();

        let records = storage.load_records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], first);
        assert_eq!(records[1], second);
    }

    #[tokio::test]
    async fn test_load_records_missing_log_is_empty() {
        let tmp = TempDir::new().unwrap();
        let storage = storage(&tmp);
        assert!(storage.load_records().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_survives_across_instances() {
        let tmp = TempDir::new().unwrap();

        let record = BookRecord::sparse(1, "Kept", Some("k_1".to_string()));
        storage(&tmp).append_record(&record).await.unwrap();

        // A later run appends without rewriting earlier lines
        let again = BookRecord::sparse(2, "Later", None);
        let second_run = storage(&tmp);
        second_run.append_record(&again).await.unwrap();

        let records = second_run.load_records().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Kept");
    }
}
