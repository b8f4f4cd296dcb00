use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::traits::LogRepository;
use crate::types::{LogLevel, LogRecord, RunId, TaskId};

/// Structured logger scoped to one task.
///
/// Every entry is mirrored to `tracing` and persisted through the
/// `LogRepository`. A failed log write never fails the caller — the full log
/// history is best-effort observability, not control flow.
#[derive(Clone)]
pub struct TaskLogger {
    repo: Arc<dyn LogRepository>,
    task_id: TaskId,
    run_id: Option<RunId>,
}

impl TaskLogger {
    pub fn new(repo: Arc<dyn LogRepository>, task_id: TaskId) -> Self {
        Self {
            repo,
            task_id,
            run_id: None,
        }
    }

    /// A copy of this logger scoped to one run.
    pub fn for_run(&self, run_id: RunId) -> Self {
        Self {
            repo: self.repo.clone(),
            task_id: self.task_id.clone(),
            run_id: Some(run_id),
        }
    }

    pub async fn info(&self, message: &str, meta: serde_json::Value) {
        tracing::info!(task_id = %self.task_id, message, %meta);
        self.persist(LogLevel::Info, message, meta).await;
    }

    pub async fn warn(&self, message: &str, meta: serde_json::Value) {
        tracing::warn!(task_id = %self.task_id, message, %meta);
        self.persist(LogLevel::Warn, message, meta).await;
    }

    pub async fn error(&self, message: &str, meta: serde_json::Value) {
        tracing::error!(task_id = %self.task_id, message, %meta);
        self.persist(LogLevel::Error, message, meta).await;
    }

    async fn persist(&self, level: LogLevel, message: &str, meta: serde_json::Value) {
        let entry = LogRecord {
            id: Uuid::new_v4().to_string(),
            task_id: self.task_id.clone(),
            run_id: self.run_id.clone(),
            level,
            message: message.to_string(),
            meta,
            created_at: Utc::now(),
        };
        if let Err(e) = self.repo.create(&entry).await {
            tracing::error!(error = %e, "Failed to persist log entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;
    use std::sync::Mutex;

    use crate::error::Result;

    #[derive(Default)]
    struct MemLogRepo {
        entries: Mutex<Vec<LogRecord>>,
    }

    impl LogRepository for MemLogRepo {
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

    #[tokio::test]
    async fn entries_are_persisted_with_scope() {
        let repo = Arc::new(MemLogRepo::default());
        let task_id = TaskId::new();
        let logger = TaskLogger::new(repo.clone(), task_id.clone());

        logger.info("task started", serde_json::json!({})).await;

        let run_id = RunId::new();
        let run_logger = logger.for_run(run_id.clone());
        run_logger
            .warn("node retried", serde_json::json!({"attempt": 2}))
            .await;

        let entries = repo.find_by_task(&task_id).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].run_id.is_none());
        assert_eq!(entries[1].run_id, Some(run_id));
        assert_eq!(entries[1].level, LogLevel::Warn);
    }
}
