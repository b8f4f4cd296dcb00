use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::{oneshot, Mutex};

use adweave_core::types::{OutputMap, TaskId};

/// A pending escalation awaiting a human decision.
#[derive(Debug, Clone)]
pub struct ReviewRequest {
    pub id: String,
    pub task_id: TaskId,
    pub node_id: String,
    pub agent: String,
    pub message: String,
    /// Last known output of the failed node, possibly empty.
    pub partial: serde_json::Value,
    pub requested_at: DateTime<Utc>,
}

/// Outcome of a review. Approval carries the substitute result that lets the
/// graph proceed.
#[derive(Debug, Clone)]
pub enum ReviewDecision {
    Approved { output: OutputMap },
    Denied { reason: String },
}

/// Manages pending review requests with oneshot channels.
pub struct ReviewBroker {
    pending: Mutex<HashMap<String, (ReviewRequest, oneshot::Sender<ReviewDecision>)>>,
}

impl ReviewBroker {
    pub fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
        }
    }

    /// Register a review request, return the receiver to await.
    pub async fn request(&self, req: ReviewRequest) -> oneshot::Receiver<ReviewDecision> {
        let (tx, rx) = oneshot::channel();
        let id = req.id.clone();
        self.pending.lock().await.insert(id, (req, tx));
        rx
    }

    /// Resolve a pending review (called by the CLI or a gateway).
    /// Returns true if the request was found and resolved.
    pub async fn respond(&self, request_id: &str, decision: ReviewDecision) -> bool {
        let entry = self.pending.lock().await.remove(request_id);
        if let Some((_req, tx)) = entry {
            // Ignore send error (receiver may have been dropped due to timeout)
            let _ = tx.send(decision);
            true
        } else {
            false
        }
    }

    /// List all pending reviews.
    pub async fn pending_requests(&self) -> Vec<ReviewRequest> {
        self.pending
            .lock()
            .await
            .values()
            .map(|(req, _)| req.clone())
            .collect()
    }

    /// Find a pending request by prefix match on the ID.
    pub async fn find_by_prefix(&self, prefix: &str) -> Option<String> {
        let pending = self.pending.lock().await;
        for key in pending.keys() {
            if key.starts_with(prefix) {
                return Some(key.clone());
            }
        }
        None
    }
}

impl Default for ReviewBroker {
    fn default() -> Self {
        Self::new()
    }
}
