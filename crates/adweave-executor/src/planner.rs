use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};

use adweave_core::error::{AdweaveError, Result};
use adweave_core::plan::{Plan, PlanNode};
use adweave_core::traits::ProviderInvoker;
use adweave_core::types::{ContentType, GenerationRequest};

use crate::template;

/// Plan supplier backed by a text provider.
///
/// Asks the provider pool to lay out a campaign graph as JSON. Any failure —
/// provider error, unparseable answer, structurally invalid graph — falls
/// back to the static template, so planning never fails outright.
pub struct GenerativePlanner {
    providers: Arc<dyn ProviderInvoker>,
}

#[derive(Deserialize)]
struct PlannedGraph {
    nodes: Vec<PlanNode>,
}

impl GenerativePlanner {
    pub fn new(providers: Arc<dyn ProviderInvoker>) -> Self {
        Self { providers }
    }

    pub async fn plan(&self, topic: &str, content_types: &[ContentType]) -> Plan {
        match self.generate(topic, content_types).await {
            Ok(plan) => {
                info!(nodes = plan.nodes.len(), "Using generated plan");
                plan
            }
            Err(e) => {
                warn!(error = %e, "Generative planning failed, using template plan");
                template::build_plan(topic, content_types)
            }
        }
    }

    async fn generate(&self, topic: &str, content_types: &[ContentType]) -> Result<Plan> {
        let type_list: Vec<&str> = content_types.iter().map(|t| t.as_str()).collect();
        let prompt = format!(
            "Lay out a content production graph for the campaign \"{}\".\n\
             Requested content types: {}.\n\
             Available agents: copywriter, image_director, video_director, brand_guard, publisher.\n\
             Answer with ONLY a JSON object of the form\n\
             {{\"nodes\": [{{\"id\": \"...\", \"agent\": \"...\", \"input\": {{}}, \"depends_on\": []}}]}}",
            topic,
            type_list.join(", ")
        );

        let response = self
            .providers
            .invoke(GenerationRequest::new(ContentType::Text, prompt))
            .await?;

        let text = response.text().ok_or_else(|| {
            AdweaveError::Config("planner response carried no text".to_string())
        })?;

        let graph: PlannedGraph = serde_json::from_str(extract_json(text))?;
        let plan = Plan::new(topic, content_types.to_vec()).with_nodes(graph.nodes);
        plan.validate()?;
        Ok(plan)
    }
}

/// Strip markdown code fences some models wrap around JSON answers.
fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let without_open = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    without_open
        .strip_suffix("```")
        .unwrap_or(without_open)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::BoxFuture;

    use adweave_core::types::{
        ExecutionMode, GenerationOutput, GenerationResponse,
    };

    struct CannedInvoker {
        answer: Option<String>,
    }

    impl ProviderInvoker for CannedInvoker {
        fn invoke(
            &self,
            _request: GenerationRequest,
        ) -> BoxFuture<'_, Result<GenerationResponse>> {
            let answer = self.answer.clone();
            Box::pin(async move {
                match answer {
                    Some(content) => Ok(GenerationResponse {
                        provider_id: "canned".into(),
                        model: "canned".into(),
                        mock: true,
                        output: GenerationOutput::Text { content },
                    }),
                    None => Err(AdweaveError::ProviderExhausted { attempted: 1 }),
                }
            })
        }

        fn mode(&self) -> ExecutionMode {
            ExecutionMode::Mock
        }
    }

    fn planner(answer: Option<&str>) -> GenerativePlanner {
        GenerativePlanner::new(Arc::new(CannedInvoker {
            answer: answer.map(String::from),
        }))
    }

    #[tokio::test]
    async fn well_formed_answer_becomes_the_plan() {
        let answer = r#"```json
        {"nodes": [
            {"id": "copy", "agent": "copywriter", "input": {"topic": "sale"}},
            {"id": "check", "agent": "brand_guard", "depends_on": ["copy"]}
        ]}
        ```"#;
        let plan = planner(Some(answer)).plan("sale", &[ContentType::Text]).await;

        assert_eq!(plan.nodes.len(), 2);
        assert_eq!(plan.nodes[1].depends_on, vec!["copy".to_string()]);
    }

    #[tokio::test]
    async fn garbage_answer_falls_back_to_template() {
        let plan = planner(Some("I think you should make a nice campaign!"))
            .plan("sale", &[ContentType::Text])
            .await;
        // Template shape: copy, guard, publish.
        let ids: Vec<&str> = plan.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["copy", "guard", "publish"]);
    }

    #[tokio::test]
    async fn invalid_graph_falls_back_to_template() {
        // References a node that does not exist.
        let answer =
            r#"{"nodes": [{"id": "a", "agent": "copywriter", "depends_on": ["ghost"]}]}"#;
        let plan = planner(Some(answer)).plan("sale", &[ContentType::Text]).await;
        assert_eq!(plan.nodes.len(), 3);
    }

    #[tokio::test]
    async fn provider_failure_falls_back_to_template() {
        let plan = planner(None)
            .plan("sale", &[ContentType::Text, ContentType::Image])
            .await;
        let ids: Vec<&str> = plan.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["copy", "hero_image", "guard", "publish"]);
    }

    #[test]
    fn extract_json_handles_fences_and_bare_text() {
        assert_eq!(extract_json("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(extract_json("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(extract_json("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
    }
}
