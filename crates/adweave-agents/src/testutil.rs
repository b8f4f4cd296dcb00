//! In-memory collaborators for agent tests.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use futures::future::BoxFuture;

use adweave_core::error::{AdweaveError, Result};
use adweave_core::log::TaskLogger;
use adweave_core::plan::Plan;
use adweave_core::traits::{AgentContext, ArtifactStorage, LogRepository, ProviderInvoker};
use adweave_core::types::{
    ArtifactId, ArtifactRecord, ContentType, ExecutionMode, GenerationOutput, GenerationRequest,
    GenerationResponse, LogRecord, RunId, RunRecord, TaskId, TaskRecord,
};

/// Provider stub: answers synthetically, or always fails when `fail` is set.
pub struct StubInvoker {
    pub fail: bool,
}

impl ProviderInvoker for StubInvoker {
    fn invoke(&self, request: GenerationRequest) -> BoxFuture<'_, Result<GenerationResponse>> {
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                return Err(AdweaveError::ProviderExhausted { attempted: 1 });
            }
            let output = match request.content_type {
                ContentType::Text => GenerationOutput::Text {
                    content: format!("stub copy: {}", request.prompt),
                },
                _ => GenerationOutput::Media {
                    locator: format!("stub://{}/{}", request.content_type, request.prompt.len()),
                },
            };
            Ok(GenerationResponse {
                provider_id: "stub".into(),
                model: "stub-model".into(),
                mock: true,
                output,
            })
        })
    }

    fn mode(&self) -> ExecutionMode {
        ExecutionMode::Mock
    }
}

/// Artifact storage that keeps records in memory and never touches disk.
#[derive(Default)]
pub struct MemStorage {
    pub saved: Mutex<Vec<ArtifactRecord>>,
}

impl ArtifactStorage for MemStorage {
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
        Box::pin(async move {
            let id = ArtifactId::new();
            let record = ArtifactRecord {
                id: id.clone(),
                run_id,
                kind,
                path: format!("mem://{}.{}", id, extension),
                metadata,
                created_at: Utc::now(),
            };
            let _ = content;
            self.saved.lock().unwrap().push(record.clone());
            Ok(record)
        })
    }
}

/// Log repository that keeps entries in memory.
#[derive(Default)]
pub struct MemLogs {
    pub entries: Mutex<Vec<LogRecord>>,
}

impl LogRepository for MemLogs {
    fn create(&self, entry: &LogRecord) -> BoxFuture<'_, Result<()>> {
        let entry = entry.clone();
        Box::pin(async move {
            self.entries.lock().unwrap().push(entry);
            Ok(())
        })
    }

    fn find_by_task(&self, task_id: &TaskId) -> BoxFuture<'_, Result<Vec<LogRecord>>> {
        let task_id = task_id.clone();
        Box::pin(async move {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .filter(|e| e.task_id == task_id)
                .cloned()
                .collect())
        })
    }
}

/// A ready-to-use context around stub collaborators.
pub fn test_context(providers: Arc<dyn ProviderInvoker>, storage: Arc<MemStorage>) -> AgentContext {
    let task = TaskRecord::new(Plan::new("test task", vec![ContentType::Text]));
    let run = RunRecord::new(task.id.clone(), "node", "agent");
    let logger = TaskLogger::new(Arc::new(MemLogs::default()), task.id.clone());
    AgentContext {
        task,
        run,
        providers,
        storage,
        logger,
        mode: ExecutionMode::Mock,
        locale: "en-US".to_string(),
    }
}
