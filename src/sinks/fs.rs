// Filesystem-backed object store for local runs: objects land under
// <root>/<bucket>/<key>.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::info;

use super::{ObjectStore, SinkError, SinkResult};

pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn put(&self, bucket: &str, key: &str, bytes: &[u8]) -> SinkResult<()> {
        let path = self.root.join(bucket).join(key);
        let rejected = |reason: String| SinkError::ObjectStore { key: key.to_string(), reason };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| rejected(e.to_string()))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| rejected(e.to_string()))?;

        info!(path = %path.display(), bytes = bytes.len(), "stored object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_writes_under_bucket_and_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsObjectStore::new(dir.path());
        store
            .put("books", "p/Coinbase/BTC/row.csv", b"a,b,c")
            .await
            .unwrap();

        let written = std::fs::read(dir.path().join("books/p/Coinbase/BTC/row.csv")).unwrap();
        assert_eq!(written, b"a,b,c");
    }
}
