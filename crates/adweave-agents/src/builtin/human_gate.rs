use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::BoxFuture;
use uuid::Uuid;

use adweave_core::error::{AdweaveError, Result};
use adweave_core::traits::{Agent, AgentContext};
use adweave_core::types::{OutputMap, ESCALATION_CAPABILITY};

use crate::review::{ReviewBroker, ReviewDecision, ReviewRequest};

use super::str_field;

/// Escalation capability invoked when a node exhausts its retries.
///
/// Files a review request and waits for a human decision. An approval
/// carries the substitute output that becomes the failed node's result; a
/// denial or timeout leaves the node terminally failed. With `auto_approve`
/// the last known partial output is substituted without waiting — useful for
/// mock runs and demos.
pub struct HumanGateAgent {
    broker: Arc<ReviewBroker>,
    timeout: Duration,
    auto_approve: bool,
}

impl HumanGateAgent {
    pub fn new(broker: Arc<ReviewBroker>, timeout: Duration, auto_approve: bool) -> Self {
        Self {
            broker,
            timeout,
            auto_approve,
        }
    }

    fn partial_as_output(partial: &serde_json::Value) -> OutputMap {
        match partial.as_object() {
            Some(map) => map.clone(),
            None if partial.is_null() => OutputMap::new(),
            None => {
                let mut map = OutputMap::new();
                map.insert("content".into(), partial.clone());
                map
            }
        }
    }
}

impl Agent for HumanGateAgent {
    fn name(&self) -> &str {
        ESCALATION_CAPABILITY
    }

    fn description(&self) -> &str {
        "Escalates exhausted nodes to a human reviewer"
    }

    fn execute(
        &self,
        payload: serde_json::Value,
        ctx: AgentContext,
    ) -> BoxFuture<'_, Result<OutputMap>> {
        Box::pin(async move {
            let failed_node = str_field(&payload, "failed_node").unwrap_or("unknown").to_string();
            let message = str_field(&payload, "message").unwrap_or_default().to_string();
            let partial = payload.get("partial").cloned().unwrap_or(serde_json::Value::Null);

            if self.auto_approve {
                ctx.logger
                    .warn(
                        "escalation auto-approved",
                        serde_json::json!({"node": failed_node}),
                    )
                    .await;
                let mut output = Self::partial_as_output(&partial);
                output.insert("resolved_by".into(), serde_json::json!("auto"));
                return Ok(output);
            }

            let request = ReviewRequest {
                id: Uuid::new_v4().to_string(),
                task_id: ctx.task.id.clone(),
                node_id: failed_node.clone(),
                agent: ctx.run.agent.clone(),
                message,
                partial,
                requested_at: Utc::now(),
            };

            ctx.logger
                .warn(
                    "escalation filed for review",
                    serde_json::json!({"node": failed_node, "review_id": request.id}),
                )
                .await;

            let rx = self.broker.request(request).await;

            match tokio::time::timeout(self.timeout, rx).await {
                Ok(Ok(ReviewDecision::Approved { mut output })) => {
                    output.insert("resolved_by".into(), serde_json::json!("reviewer"));
                    Ok(output)
                }
                Ok(Ok(ReviewDecision::Denied { reason })) => Err(AdweaveError::ReviewDenied {
                    node: failed_node,
                    reason,
                }),
                // Sender dropped (broker cleaned up) or timeout elapsed
                Ok(Err(_)) | Err(_) => Err(AdweaveError::ReviewTimeout(failed_node)),
            }
        })
    }
}
