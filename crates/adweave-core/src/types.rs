use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::plan::Plan;

/// Unique task identifier.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct TaskId(pub String);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique run identifier (one per task node).
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique artifact identifier.
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ArtifactId(pub String);

impl ArtifactId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Image,
    Video,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// Default file extension for stored artifacts of this kind.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "md",
            Self::Image => "png",
            Self::Video => "mp4",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "running" => Some(Self::Running),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a single node run. Same states as the owning task.
pub type RunStatus = TaskStatus;

/// Whether provider calls go over the network or are synthesized locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    Real,
    Mock,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Mock => "mock",
        }
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result mapping produced by an agent run.
pub type OutputMap = serde_json::Map<String, serde_json::Value>;

/// Capability name the executor looks up when a node exhausts its retries.
pub const ESCALATION_CAPABILITY: &str = "human_gate";

/// Key under which dependency outputs are merged into a node's payload.
pub const DEPENDENCIES_KEY: &str = "dependencies";

/// Durable record of one plan being executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub description: String,
    pub plan: Plan,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TaskRecord {
    pub fn new(plan: Plan) -> Self {
        let now = Utc::now();
        Self {
            id: TaskId::new(),
            description: plan.description.clone(),
            plan,
            status: TaskStatus::Pending,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Durable record of one node's execution within a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: RunId,
    pub task_id: TaskId,
    pub node_id: String,
    pub agent: String,
    pub status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub attempts: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl RunRecord {
    pub fn new(task_id: TaskId, node_id: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            id: RunId::new(),
            task_id,
            node_id: node_id.into(),
            agent: agent.into(),
            status: TaskStatus::Pending,
            error: None,
            attempts: 0,
            output: None,
            started_at: None,
            ended_at: None,
        }
    }
}

/// Durable record of one generated-content item. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub id: ArtifactId,
    pub run_id: RunId,
    pub kind: ContentType,
    /// Opaque locator — a filesystem path for locally stored content.
    pub path: String,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Log severity for durable task logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One durable structured log row attached to a task (and optionally a run).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: String,
    pub task_id: TaskId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_id: Option<RunId>,
    pub level: LogLevel,
    pub message: String,
    pub meta: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// A content-generation request handed to the provider layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub content_type: ContentType,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl GenerationRequest {
    pub fn new(content_type: ContentType, prompt: impl Into<String>) -> Self {
        Self {
            content_type,
            prompt: prompt.into(),
            model: None,
            params: serde_json::Value::Null,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }
}

/// Payload of a provider response. Text carries the content inline;
/// image and video carry an opaque locator, never binary data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GenerationOutput {
    Text { content: String },
    Media { locator: String },
}

/// A provider response tagged with the provider that produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub provider_id: String,
    pub model: String,
    pub mock: bool,
    pub output: GenerationOutput,
}

impl GenerationResponse {
    /// Inline text content, if this is a text response.
    pub fn text(&self) -> Option<&str> {
        match &self.output {
            GenerationOutput::Text { content } => Some(content),
            GenerationOutput::Media { .. } => None,
        }
    }

    /// Media locator, if this is an image/video response.
    pub fn locator(&self) -> Option<&str> {
        match &self.output {
            GenerationOutput::Media { locator } => Some(locator),
            GenerationOutput::Text { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_round_trip() {
        for ct in [ContentType::Text, ContentType::Image, ContentType::Video] {
            assert_eq!(ContentType::parse(ct.as_str()), Some(ct));
        }
        assert_eq!(ContentType::parse("audio"), None);
    }

    #[test]
    fn status_round_trip() {
        for st in [
            TaskStatus::Pending,
            TaskStatus::Running,
            TaskStatus::Completed,
            TaskStatus::Failed,
        ] {
            assert_eq!(TaskStatus::parse(st.as_str()), Some(st));
        }
    }

    #[test]
    fn run_record_starts_pending() {
        let run = RunRecord::new(TaskId::new(), "copy", "copywriter");
        assert_eq!(run.status, TaskStatus::Pending);
        assert_eq!(run.attempts, 0);
        assert!(run.output.is_none());
        assert!(run.started_at.is_none());
    }

    #[test]
    fn generation_response_accessors() {
        let text = GenerationResponse {
            provider_id: "p1".into(),
            model: "m".into(),
            mock: true,
            output: GenerationOutput::Text {
                content: "hello".into(),
            },
        };
        assert_eq!(text.text(), Some("hello"));
        assert_eq!(text.locator(), None);

        let media = GenerationResponse {
            provider_id: "p1".into(),
            model: "m".into(),
            mock: true,
            output: GenerationOutput::Media {
                locator: "mock://p1/image/42".into(),
            },
        };
        assert_eq!(media.locator(), Some("mock://p1/image/42"));
        assert_eq!(media.text(), None);
    }
}
