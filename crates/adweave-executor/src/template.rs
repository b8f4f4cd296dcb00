use adweave_core::plan::{Plan, PlanNode};
use adweave_core::types::ContentType;

/// Default campaign graph for a topic and the requested content types.
///
/// Copy is always written first — media nodes derive their prompts from it.
/// The brand guard checks the copy, and the publisher waits on every
/// producer plus the guard.
pub fn build_plan(topic: &str, content_types: &[ContentType]) -> Plan {
    let mut nodes = vec![PlanNode::new("copy", "copywriter")
        .with_input(serde_json::json!({"topic": topic}))];

    let mut producer_ids = vec!["copy".to_string()];

    if content_types.contains(&ContentType::Image) {
        nodes.push(
            PlanNode::new("hero_image", "image_director")
                .with_input(serde_json::json!({"topic": topic}))
                .depends_on(vec!["copy".into()]),
        );
        producer_ids.push("hero_image".to_string());
    }

    if content_types.contains(&ContentType::Video) {
        nodes.push(
            PlanNode::new("promo_video", "video_director")
                .with_input(serde_json::json!({"topic": topic}))
                .depends_on(vec!["copy".into()]),
        );
        producer_ids.push("promo_video".to_string());
    }

    nodes.push(
        PlanNode::new("guard", "brand_guard")
            .with_input(serde_json::json!({
                "banned_terms": ["guaranteed results", "risk-free", "no strings attached"]
            }))
            .depends_on(vec!["copy".into()]),
    );

    let mut publish_deps = producer_ids;
    publish_deps.push("guard".to_string());
    nodes.push(PlanNode::new("publish", "publisher").depends_on(publish_deps));

    Plan::new(topic, content_types.to_vec()).with_nodes(nodes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_only_plan() {
        let plan = build_plan("spring sale", &[ContentType::Text]);
        plan.validate().unwrap();

        let ids: Vec<&str> = plan.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["copy", "guard", "publish"]);
        assert_eq!(
            plan.node("publish").unwrap().depends_on,
            vec!["copy".to_string(), "guard".to_string()]
        );
    }

    #[test]
    fn full_media_plan() {
        let plan = build_plan(
            "product launch",
            &[ContentType::Text, ContentType::Image, ContentType::Video],
        );
        plan.validate().unwrap();

        let ids: Vec<&str> = plan.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["copy", "hero_image", "promo_video", "guard", "publish"]
        );
        // Media nodes hang off the copy.
        assert_eq!(
            plan.node("hero_image").unwrap().depends_on,
            vec!["copy".to_string()]
        );
        assert_eq!(
            plan.node("publish").unwrap().depends_on,
            vec![
                "copy".to_string(),
                "hero_image".to_string(),
                "promo_video".to_string(),
                "guard".to_string()
            ]
        );
    }

    #[test]
    fn topic_lands_in_node_inputs() {
        let plan = build_plan("winter promo", &[ContentType::Image]);
        assert_eq!(
            plan.node("copy").unwrap().input["topic"],
            serde_json::json!("winter promo")
        );
        assert_eq!(plan.description, "winter promo");
    }

    #[test]
    fn guard_carries_banned_terms() {
        let plan = build_plan("promo", &[ContentType::Text]);
        let terms = &plan.node("guard").unwrap().input["banned_terms"];
        assert!(terms.as_array().is_some_and(|t| !t.is_empty()));
    }
}
