use futures::future::BoxFuture;

use adweave_core::error::Result;
use adweave_core::traits::{Agent, AgentContext};
use adweave_core::types::{ContentType, OutputMap};

use super::dependencies;

/// Collects the artifacts produced upstream into a publish manifest.
///
/// The manifest itself is stored as a JSON artifact of the publisher's run,
/// so the whole campaign output is reachable from one record.
pub struct PublisherAgent;

impl Agent for PublisherAgent {
    fn name(&self) -> &str {
        "publisher"
    }

    fn description(&self) -> &str {
        "Bundles upstream artifacts into a publish manifest"
    }

    fn execute(
        &self,
        payload: serde_json::Value,
        ctx: AgentContext,
    ) -> BoxFuture<'_, Result<OutputMap>> {
        Box::pin(async move {
            let deps = dependencies(&payload);

            let mut items = Vec::new();
            for (node, output) in &deps {
                let artifact_id = output.get("artifact_id").and_then(|v| v.as_str());
                let locator = output.get("locator").and_then(|v| v.as_str());
                if artifact_id.is_none() && locator.is_none() {
                    continue; // e.g. guard nodes produce no artifact
                }
                items.push(serde_json::json!({
                    "node": node,
                    "artifact_id": artifact_id,
                    "locator": locator,
                }));
            }

            let manifest = serde_json::json!({
                "task_id": ctx.task.id,
                "description": ctx.task.description,
                "locale": ctx.locale,
                "items": items,
            });

            let artifact = ctx
                .storage
                .save_artifact(
                    &ctx.run.id,
                    ContentType::Text,
                    serde_json::to_vec_pretty(&manifest)?,
                    "json",
                    serde_json::json!({"manifest": true}),
                )
                .await?;

            ctx.logger
                .info(
                    "manifest published",
                    serde_json::json!({
                        "items": items.len(),
                        "artifact_id": artifact.id,
                    }),
                )
                .await;

            let mut output = OutputMap::new();
            output.insert("published".into(), serde_json::json!(items.len()));
            output.insert(
                "manifest_artifact".into(),
                serde_json::Value::String(artifact.id.to_string()),
            );
            Ok(output)
        })
    }
}
