use futures::future::BoxFuture;

use adweave_core::error::{AdweaveError, Result};
use adweave_core::traits::{Agent, AgentContext};
use adweave_core::types::{ContentType, GenerationRequest, OutputMap};

use super::{dependencies, dependency_texts, str_field};

/// How much upstream copy is quoted into a media prompt.
const CONTEXT_EXCERPT_CHARS: usize = 280;

/// Shared body of the image and video agents: build the prompt, invoke the
/// provider pool, store a locator artifact.
///
/// The provider layer returns an opaque locator, never bytes. What lands on
/// disk is a placeholder whose body is the locator itself; the locator is
/// also kept in the artifact metadata and the node output.
async fn direct_media(
    agent_name: &str,
    content_type: ContentType,
    payload: serde_json::Value,
    ctx: AgentContext,
) -> Result<OutputMap> {
    let prompt = match str_field(&payload, "prompt") {
        Some(p) => p.to_string(),
        None => {
            let topic = str_field(&payload, "topic").unwrap_or(&ctx.task.description);
            let mut prompt = format!("{} for the campaign \"{}\"", content_type, topic);
            if let Some((node, text)) = dependency_texts(&dependencies(&payload)).first() {
                let excerpt: String = text.chars().take(CONTEXT_EXCERPT_CHARS).collect();
                prompt.push_str(&format!(", matching the copy from {}: {}", node, excerpt));
            }
            prompt
        }
    };

    let mut request = GenerationRequest::new(content_type, prompt);
    if let Some(model) = str_field(&payload, "model") {
        request = request.with_model(model);
    }
    if let Some(params) = payload.get("params") {
        request = request.with_params(params.clone());
    }

    let response = ctx.providers.invoke(request).await?;
    let locator = response
        .locator()
        .ok_or_else(|| AdweaveError::AgentExecution {
            agent: agent_name.to_string(),
            message: "provider returned no locator".to_string(),
        })?
        .to_string();

    let artifact = ctx
        .storage
        .save_artifact(
            &ctx.run.id,
            content_type,
            locator.clone().into_bytes(),
            content_type.extension(),
            serde_json::json!({
                "locator": locator,
                "provider": response.provider_id,
                "model": response.model,
                "mock": response.mock,
            }),
        )
        .await?;

    ctx.logger
        .info(
            "media generated",
            serde_json::json!({
                "kind": content_type,
                "provider": response.provider_id,
                "artifact_id": artifact.id,
            }),
        )
        .await;

    let mut output = OutputMap::new();
    output.insert("locator".into(), serde_json::Value::String(locator));
    output.insert(
        "artifact_id".into(),
        serde_json::Value::String(artifact.id.to_string()),
    );
    output.insert(
        "provider".into(),
        serde_json::Value::String(response.provider_id),
    );
    Ok(output)
}

/// Produces a campaign image locator.
pub struct ImageDirectorAgent;

impl Agent for ImageDirectorAgent {
    fn name(&self) -> &str {
        "image_director"
    }

    fn description(&self) -> &str {
        "Generates campaign imagery via the provider pool"
    }

    fn execute(
        &self,
        payload: serde_json::Value,
        ctx: AgentContext,
    ) -> BoxFuture<'_, Result<OutputMap>> {
        Box::pin(direct_media(self.name(), ContentType::Image, payload, ctx))
    }
}

/// Produces a campaign video locator.
pub struct VideoDirectorAgent;

impl Agent for VideoDirectorAgent {
    fn name(&self) -> &str {
        "video_director"
    }

    fn description(&self) -> &str {
        "Generates campaign video via the provider pool"
    }

    fn execute(
        &self,
        payload: serde_json::Value,
        ctx: AgentContext,
    ) -> BoxFuture<'_, Result<OutputMap>> {
        Box::pin(direct_media(self.name(), ContentType::Video, payload, ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{test_context, MemStorage, StubInvoker};
    use std::sync::Arc;

    #[tokio::test]
    async fn image_output_carries_locator_and_artifact() {
        let storage = Arc::new(MemStorage::default());
        let ctx = test_context(Arc::new(StubInvoker { fail: false }), storage.clone());

        let output = ImageDirectorAgent
            .execute(serde_json::json!({"topic": "spring sale"}), ctx)
            .await
            .unwrap();

        assert!(output["locator"].as_str().unwrap().starts_with("stub://image/"));
        let saved = storage.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].kind, ContentType::Image);
        assert_eq!(saved[0].metadata["locator"], output["locator"]);
    }

    #[tokio::test]
    async fn video_uses_video_content_type() {
        let storage = Arc::new(MemStorage::default());
        let ctx = test_context(Arc::new(StubInvoker { fail: false }), storage.clone());

        let output = VideoDirectorAgent
            .execute(serde_json::json!({"prompt": "15s teaser"}), ctx)
            .await
            .unwrap();

        assert!(output["locator"].as_str().unwrap().starts_with("stub://video/"));
        assert_eq!(storage.saved.lock().unwrap()[0].kind, ContentType::Video);
    }

    #[tokio::test]
    async fn provider_failure_propagates() {
        let storage = Arc::new(MemStorage::default());
        let ctx = test_context(Arc::new(StubInvoker { fail: true }), storage);
        assert!(ImageDirectorAgent
            .execute(serde_json::json!({}), ctx)
            .await
            .is_err());
    }
}
