use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use futures::future::BoxFuture;
use tracing::debug;

use adweave_core::error::{AdweaveError, Result};
use adweave_core::traits::{ArtifactRepository, ArtifactStorage};
use adweave_core::types::{ArtifactId, ArtifactRecord, ContentType, RunId};

/// Filesystem artifact storage.
///
/// Content bytes land under `<root>/<run-id>/<artifact-id>.<ext>` and the
/// record is written through the artifact repository afterwards, so a row
/// never references a file that does not exist.
pub struct FsArtifactStore {
    root: PathBuf,
    repo: Arc<dyn ArtifactRepository>,
}

impl FsArtifactStore {
    pub fn new(root: PathBuf, repo: Arc<dyn ArtifactRepository>) -> Self {
        Self { root, repo }
    }

    async fn save(
        &self,
        run_id: RunId,
        kind: ContentType,
        content: Vec<u8>,
        extension: String,
        metadata: serde_json::Value,
    ) -> Result<ArtifactRecord> {
        let id = ArtifactId::new();
        let dir = self.root.join(&run_id.0);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| AdweaveError::Storage(format!("create {}: {e}", dir.display())))?;

        let path = dir.join(format!("{}.{}", id.0, extension));
        tokio::fs::write(&path, &content)
            .await
            .map_err(|e| AdweaveError::Storage(format!("write {}: {e}", path.display())))?;

        let record = ArtifactRecord {
            id,
            run_id,
            kind,
            path: path.display().to_string(),
            metadata,
            created_at: Utc::now(),
        };
        self.repo.create(&record).await?;

        debug!(
            artifact_id = %record.id,
            kind = %kind,
            bytes = content.len(),
            path = %record.path,
            "Artifact stored"
        );
        Ok(record)
    }
}

impl ArtifactStorage for FsArtifactStore {
    fn save_artifact(
        &self,
        run_id: &RunId,
        kind: ContentType,
        content: Vec<u8>,
        extension: &str,
        metadata: serde_json::Value,
    ) -> BoxFuture<'_, Result<ArtifactRecord>> {
        let run_id = run_id.clone();
        let extension = extension.to_string();
        Box::pin(self.save(run_id, kind, content, extension, metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    #[tokio::test]
    async fn bytes_and_record_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let storage = FsArtifactStore::new(dir.path().to_path_buf(), store.clone());

        let run_id = RunId::new();
        let record = storage
            .save_artifact(
                &run_id,
                ContentType::Text,
                b"Spring into savings".to_vec(),
                "md",
                serde_json::json!({"provider": "acme"}),
            )
            .await
            .unwrap();

        let on_disk = tokio::fs::read(&record.path).await.unwrap();
        assert_eq!(on_disk, b"Spring into savings");

        let rows = store.find_by_run(&run_id).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, record.id);
        assert_eq!(rows[0].kind, ContentType::Text);
    }

    #[tokio::test]
    async fn artifacts_are_grouped_by_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(SqliteStore::in_memory().unwrap());
        let storage = FsArtifactStore::new(dir.path().to_path_buf(), store.clone());

        let run_a = RunId::new();
        let run_b = RunId::new();
        for (run, body) in [(&run_a, "a"), (&run_a, "aa"), (&run_b, "b")] {
            storage
                .save_artifact(
                    run,
                    ContentType::Text,
                    body.as_bytes().to_vec(),
                    "md",
                    serde_json::Value::Null,
                )
                .await
                .unwrap();
        }

        assert_eq!(store.find_by_run(&run_a).await.unwrap().len(), 2);
        assert_eq!(store.find_by_run(&run_b).await.unwrap().len(), 1);
    }
}
