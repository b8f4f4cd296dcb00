use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdweaveError {
    // Agent errors
    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Agent execution failed: {agent}: {message}")]
    AgentExecution { agent: String, message: String },

    // Executor errors
    #[error("Task graph stalled: {unresolved} node(s) unresolved in task {task_id}")]
    GraphStagnation { task_id: String, unresolved: usize },

    #[error("Escalation failed for node {node}: {message}")]
    Escalation { node: String, message: String },

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    // Provider errors
    #[error("Provider request failed: {provider}: {message}")]
    ProviderRequest { provider: String, message: String },

    #[error("Provider has no credential: {0}")]
    MissingCredential(String),

    #[error("All providers exhausted after {attempted} attempt(s)")]
    ProviderExhausted { attempted: usize },

    // Review errors
    #[error("Review timed out for node: {0}")]
    ReviewTimeout(String),

    #[error("Review denied for node {node}: {reason}")]
    ReviewDenied { node: String, reason: String },

    // Config errors
    #[error("Config error: {0}")]
    Config(String),

    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    // Storage errors
    #[error("Database error: {0}")]
    Database(String),

    #[error("Artifact storage error: {0}")]
    Storage(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AdweaveError>;
