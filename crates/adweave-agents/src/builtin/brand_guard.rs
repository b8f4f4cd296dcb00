use futures::future::BoxFuture;

use adweave_core::error::{AdweaveError, Result};
use adweave_core::traits::{Agent, AgentContext};
use adweave_core::types::OutputMap;

use super::{dependencies, dependency_texts};

/// Checks upstream copy against a banned-term list.
///
/// Deterministic: no provider call. A violation is an ordinary execution
/// failure, so the node retries and eventually escalates like any other.
pub struct BrandGuardAgent;

impl Agent for BrandGuardAgent {
    fn name(&self) -> &str {
        "brand_guard"
    }

    fn description(&self) -> &str {
        "Rejects copy containing banned terms"
    }

    fn execute(
        &self,
        payload: serde_json::Value,
        ctx: AgentContext,
    ) -> BoxFuture<'_, Result<OutputMap>> {
        Box::pin(async move {
            let banned: Vec<String> = payload
                .get("banned_terms")
                .and_then(|v| v.as_array())
                .map(|terms| {
                    terms
                        .iter()
                        .filter_map(|t| t.as_str())
                        .map(|t| t.to_lowercase())
                        .collect()
                })
                .unwrap_or_default();

            let texts = dependency_texts(&dependencies(&payload));
            for (node, text) in &texts {
                let lowered = text.to_lowercase();
                for term in &banned {
                    if lowered.contains(term) {
                        ctx.logger
                            .warn(
                                "banned term found",
                                serde_json::json!({"node": node, "term": term}),
                            )
                            .await;
                        return Err(AdweaveError::AgentExecution {
                            agent: self.name().to_string(),
                            message: format!("banned term '{}' in output of node '{}'", term, node),
                        });
                    }
                }
            }

            ctx.logger
                .info(
                    "brand check passed",
                    serde_json::json!({"checked": texts.len()}),
                )
                .await;

            let mut output = OutputMap::new();
            output.insert("approved".into(), serde_json::Value::Bool(true));
            output.insert("checked".into(), serde_json::json!(texts.len()));
            Ok(output)
        })
    }
}
