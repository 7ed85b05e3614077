use async_trait::async_trait;
use invoice_core::error::AppError;
use std::path::PathBuf;
use tokio::fs;

/// Destination for rendered documents.
#[async_trait]
pub trait OutputStore: Send + Sync {
    /// Writes `data` under `file_name`, replacing any previous file, and
    /// returns where it landed.
    async fn save(&self, file_name: &str, data: Vec<u8>) -> Result<PathBuf, AppError>;
}

pub struct LocalOutputStore {
    base_path: PathBuf,
}

impl LocalOutputStore {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &PathBuf {
        &self.base_path
    }
}

#[async_trait]
impl OutputStore for LocalOutputStore {
    async fn save(&self, file_name: &str, data: Vec<u8>) -> Result<PathBuf, AppError> {
        let path = self.base_path.join(file_name);
        // the final name only ever holds a complete file
        let partial = self.base_path.join(format!(".{}.partial", file_name));
        fs::write(&partial, data).await?;
        fs::rename(&partial, &path).await?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_directory_and_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutputStore::new(dir.path().join("out/nested"))
            .await
            .unwrap();

        let path = store.save("invoice.pdf", b"%PDF-1.3".to_vec()).await.unwrap();
        assert_eq!(path, dir.path().join("out/nested/invoice.pdf"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.3");
    }

    #[tokio::test]
    async fn second_save_replaces_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalOutputStore::new(dir.path()).await.unwrap();

        store.save("invoice.pdf", b"first".to_vec()).await.unwrap();
        let path = store.save("invoice.pdf", b"second".to_vec()).await.unwrap();
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"second");
        assert!(!dir.path().join(".invoice.pdf.partial").exists());
    }
}
