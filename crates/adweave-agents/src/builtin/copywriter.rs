use futures::future::BoxFuture;

use adweave_core::error::{AdweaveError, Result};
use adweave_core::traits::{Agent, AgentContext};
use adweave_core::types::{ContentType, GenerationRequest, OutputMap};

use super::{dependencies, dependency_texts, str_field};

/// Generates marketing copy for the campaign topic.
///
/// Upstream text outputs (e.g. research notes) are folded into the prompt as
/// context. The finished copy is stored as a text artifact and returned
/// inline so downstream nodes can consume it.
pub struct CopywriterAgent;

impl CopywriterAgent {
    fn build_prompt(payload: &serde_json::Value, ctx: &AgentContext) -> String {
        let topic = str_field(payload, "topic").unwrap_or(&ctx.task.description);
        let mut prompt = format!(
            "Write marketing copy about \"{}\" in locale {}.",
            topic, ctx.locale
        );
        if let Some(tone) = str_field(payload, "tone") {
            prompt.push_str(&format!(" Tone: {}.", tone));
        }
        if let Some(brief) = str_field(payload, "brief") {
            prompt.push_str(&format!("\n\nBrief:\n{}", brief));
        }

        let texts = dependency_texts(&dependencies(payload));
        if !texts.is_empty() {
            prompt.push_str("\n\nContext from earlier steps:");
            for (node, text) in texts {
                prompt.push_str(&format!("\n[{}] {}", node, text));
            }
        }
        prompt
    }
}

impl Agent for CopywriterAgent {
    fn name(&self) -> &str {
        "copywriter"
    }

    fn description(&self) -> &str {
        "Generates marketing copy via the provider pool"
    }

    fn execute(
        &self,
        payload: serde_json::Value,
        ctx: AgentContext,
    ) -> BoxFuture<'_, Result<OutputMap>> {
        Box::pin(async move {
            let prompt = Self::build_prompt(&payload, &ctx);
            let mut request = GenerationRequest::new(ContentType::Text, prompt);
            if let Some(model) = str_field(&payload, "model") {
                request = request.with_model(model);
            }
            if let Some(params) = payload.get("params") {
                request = request.with_params(params.clone());
            }

            let response = ctx.providers.invoke(request).await?;
            let content = response
                .text()
                .ok_or_else(|| AdweaveError::AgentExecution {
                    agent: self.name().to_string(),
                    message: "provider returned no text content".to_string(),
                })?
                .to_string();

            let artifact = ctx
                .storage
                .save_artifact(
                    &ctx.run.id,
                    ContentType::Text,
                    content.clone().into_bytes(),
                    ContentType::Text.extension(),
                    serde_json::json!({
                        "provider": response.provider_id,
                        "model": response.model,
                        "mock": response.mock,
                    }),
                )
                .await?;

            ctx.logger
                .info(
                    "copy generated",
                    serde_json::json!({
                        "provider": response.provider_id,
                        "chars": content.len(),
                        "artifact_id": artifact.id,
                    }),
                )
                .await;

            let mut output = OutputMap::new();
            output.insert("content".into(), serde_json::Value::String(content));
            output.insert(
                "artifact_id".into(),
                serde_json::Value::String(artifact.id.to_string()),
            );
            output.insert(
                "provider".into(),
                serde_json::Value::String(response.provider_id),
            );
            Ok(output)
        })
    }
}
