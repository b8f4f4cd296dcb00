use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use adweave_core::config::ProviderConfig;
use adweave_core::types::{ContentType, GenerationOutput, GenerationRequest, GenerationResponse};

/// Deterministic, network-free substitute response.
///
/// Embeds the provider id and request parameters so downstream agents and
/// tests can see exactly what would have been sent. The same request against
/// the same provider always yields the same response.
pub fn synthetic_response(
    config: &ProviderConfig,
    request: &GenerationRequest,
) -> GenerationResponse {
    let model = request
        .model
        .clone()
        .or_else(|| config.model.clone())
        .unwrap_or_else(|| "mock".to_string());

    let output = match request.content_type {
        ContentType::Text => GenerationOutput::Text {
            content: synthetic_copy(&config.id, &model, request),
        },
        ContentType::Image | ContentType::Video => GenerationOutput::Media {
            locator: format!(
                "mock://{}/{}/{:016x}",
                config.id,
                request.content_type,
                fingerprint(&config.id, request)
            ),
        },
    };

    GenerationResponse {
        provider_id: config.id.clone(),
        model,
        mock: true,
        output,
    }
}

fn synthetic_copy(provider_id: &str, model: &str, request: &GenerationRequest) -> String {
    let params = if request.params.is_null() {
        String::new()
    } else {
        format!("\nparams: {}", request.params)
    };
    format!(
        "[synthetic:{provider_id}/{model}]\n{}{params}",
        request.prompt
    )
}

fn fingerprint(provider_id: &str, request: &GenerationRequest) -> u64 {
    let mut hasher = DefaultHasher::new();
    provider_id.hash(&mut hasher);
    request.content_type.as_str().hash(&mut hasher);
    request.prompt.hash(&mut hasher);
    request.params.to_string().hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> ProviderConfig {
        ProviderConfig {
            id: "acme".into(),
            name: "Acme".into(),
            priority: 1,
            api_key: None,
            base_url: None,
            model: Some("acme-large".into()),
            mock: true,
            enabled: true,
            rate_limit: 10,
        }
    }

    #[test]
    fn text_embeds_provider_and_prompt() {
        let req = GenerationRequest::new(ContentType::Text, "Write a tagline");
        let resp = synthetic_response(&provider(), &req);

        assert!(resp.mock);
        assert_eq!(resp.provider_id, "acme");
        let content = resp.text().unwrap();
        assert!(content.contains("acme"));
        assert!(content.contains("Write a tagline"));
    }

    #[test]
    fn media_locator_is_deterministic() {
        let req = GenerationRequest::new(ContentType::Image, "A lighthouse at dusk");
        let a = synthetic_response(&provider(), &req);
        let b = synthetic_response(&provider(), &req);
        assert_eq!(a.locator(), b.locator());
        assert!(a.locator().unwrap().starts_with("mock://acme/image/"));
    }

    #[test]
    fn locator_varies_with_prompt() {
        let a = synthetic_response(
            &provider(),
            &GenerationRequest::new(ContentType::Video, "spot A"),
        );
        let b = synthetic_response(
            &provider(),
            &GenerationRequest::new(ContentType::Video, "spot B"),
        );
        assert_ne!(a.locator(), b.locator());
    }

    #[test]
    fn request_model_overrides_provider_default() {
        let req =
            GenerationRequest::new(ContentType::Text, "hello").with_model("acme-small");
        let resp = synthetic_response(&provider(), &req);
        assert_eq!(resp.model, "acme-small");
    }
}
