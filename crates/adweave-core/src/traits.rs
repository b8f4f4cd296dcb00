use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::Result;
use crate::log::TaskLogger;
use crate::types::*;

/// Agent capability — a named, swappable unit of work.
///
/// Given a payload and an execution context, asynchronously produce a result
/// mapping or fail. The executor treats every agent uniformly through this
/// contract.
pub trait Agent: Send + Sync + 'static {
    /// Capability name (referenced by plan nodes).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Execute with the given payload and context.
    fn execute(
        &self,
        payload: serde_json::Value,
        ctx: AgentContext,
    ) -> BoxFuture<'_, Result<OutputMap>>;
}

/// Provider Invocation Layer — dispatch one generation request to a
/// prioritized provider pool.
pub trait ProviderInvoker: Send + Sync + 'static {
    fn invoke(&self, request: GenerationRequest) -> BoxFuture<'_, Result<GenerationResponse>>;

    /// Active mode, fixed at construction.
    fn mode(&self) -> ExecutionMode;
}

/// Artifact byte storage — turns generated content into a durable record.
pub trait ArtifactStorage: Send + Sync + 'static {
    fn save_artifact(
        &self,
        run_id: &RunId,
        kind: ContentType,
        content: Vec<u8>,
        extension: &str,
        metadata: serde_json::Value,
    ) -> BoxFuture<'_, Result<ArtifactRecord>>;
}

/// Task persistence. Durable once a call returns.
pub trait TaskRepository: Send + Sync + 'static {
    fn create(&self, task: &TaskRecord) -> BoxFuture<'_, Result<()>>;
    fn update(&self, task: &TaskRecord) -> BoxFuture<'_, Result<()>>;
    fn find_by_id(&self, id: &TaskId) -> BoxFuture<'_, Result<Option<TaskRecord>>>;
    fn list(&self) -> BoxFuture<'_, Result<Vec<TaskRecord>>>;
}

/// Run persistence.
pub trait RunRepository: Send + Sync + 'static {
    fn create(&self, run: &RunRecord) -> BoxFuture<'_, Result<()>>;
    fn update(&self, run: &RunRecord) -> BoxFuture<'_, Result<()>>;
    fn find_by_id(&self, id: &RunId) -> BoxFuture<'_, Result<Option<RunRecord>>>;
    fn find_by_task(&self, task_id: &TaskId) -> BoxFuture<'_, Result<Vec<RunRecord>>>;
}

/// Artifact persistence. Records are immutable — no update.
pub trait ArtifactRepository: Send + Sync + 'static {
    fn create(&self, artifact: &ArtifactRecord) -> BoxFuture<'_, Result<()>>;
    fn find_by_id(&self, id: &ArtifactId) -> BoxFuture<'_, Result<Option<ArtifactRecord>>>;
    fn find_by_run(&self, run_id: &RunId) -> BoxFuture<'_, Result<Vec<ArtifactRecord>>>;
}

/// Durable structured log rows.
pub trait LogRepository: Send + Sync + 'static {
    fn create(&self, entry: &LogRecord) -> BoxFuture<'_, Result<()>>;
    fn find_by_task(&self, task_id: &TaskId) -> BoxFuture<'_, Result<Vec<LogRecord>>>;
}

/// Context handed to every agent invocation.
#[derive(Clone)]
pub struct AgentContext {
    /// The owning task record.
    pub task: TaskRecord,
    /// The run record for this node.
    pub run: RunRecord,
    /// Provider Invocation Layer.
    pub providers: Arc<dyn ProviderInvoker>,
    /// Artifact byte storage.
    pub storage: Arc<dyn ArtifactStorage>,
    /// Durable structured logger scoped to the task.
    pub logger: TaskLogger,
    /// Active mode (real or mock).
    pub mode: ExecutionMode,
    /// Locale tag for generated content.
    pub locale: String,
}

impl std::fmt::Debug for AgentContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentContext")
            .field("task", &self.task.id)
            .field("run", &self.run.id)
            .field("mode", &self.mode)
            .field("locale", &self.locale)
            .finish()
    }
}
