use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use adweave_core::config::ProviderConfig;
use adweave_core::error::{AdweaveError, Result};
use adweave_core::types::{ContentType, GenerationOutput, GenerationRequest, GenerationResponse};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// One concrete backend the router can call.
pub trait ProviderClient: Send + Sync + 'static {
    fn generate(
        &self,
        config: &ProviderConfig,
        request: &GenerationRequest,
    ) -> BoxFuture<'_, Result<GenerationResponse>>;
}

/// OpenAI-compatible HTTP client covering all three content types.
///
/// Text goes through `/chat/completions`; image and video generation return
/// locators from `/images/generations` and `/videos/generations` — the layer
/// never downloads binary payloads.
pub struct HttpProviderClient {
    http: Client,
}

impl HttpProviderClient {
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }
}

impl Default for HttpProviderClient {
    fn default() -> Self {
        Self::new()
    }
}

// Wire types

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatRequestMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatRequestMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Serialize)]
struct MediaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    size: Option<String>,
}

#[derive(Deserialize)]
struct MediaResponse {
    data: Vec<MediaItem>,
}

#[derive(Deserialize)]
struct MediaItem {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    id: Option<String>,
}

fn request_error(config: &ProviderConfig, message: impl Into<String>) -> AdweaveError {
    AdweaveError::ProviderRequest {
        provider: config.id.clone(),
        message: message.into(),
    }
}

impl HttpProviderClient {
    fn resolve_model(config: &ProviderConfig, request: &GenerationRequest) -> Result<String> {
        request
            .model
            .clone()
            .or_else(|| config.model.clone())
            .ok_or_else(|| request_error(config, "no model configured"))
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        config: &ProviderConfig,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T> {
        let base = config.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let url = format!("{}/{}", base.trim_end_matches('/'), path);
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| AdweaveError::MissingCredential(config.id.clone()))?;

        debug!(provider = %config.id, %url, "Provider request");

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| request_error(config, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(200).collect();
            return Err(request_error(config, format!("{status}: {excerpt}")));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| request_error(config, format!("malformed response: {e}")))
    }

    async fn generate_text(
        &self,
        config: &ProviderConfig,
        request: &GenerationRequest,
        model: String,
    ) -> Result<GenerationResponse> {
        let temperature = request
            .params
            .get("temperature")
            .and_then(|v| v.as_f64())
            .map(|v| v as f32);

        let body = ChatRequest {
            model: model.clone(),
            messages: vec![ChatRequestMessage {
                role: "user".to_string(),
                content: request.prompt.clone(),
            }],
            temperature,
        };

        let resp: ChatResponse = self.post_json(config, "chat/completions", &body).await?;
        let content = resp
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| request_error(config, "empty choices in response"))?;

        Ok(GenerationResponse {
            provider_id: config.id.clone(),
            model,
            mock: false,
            output: GenerationOutput::Text { content },
        })
    }

    async fn generate_media(
        &self,
        config: &ProviderConfig,
        request: &GenerationRequest,
        model: String,
        path: &str,
    ) -> Result<GenerationResponse> {
        let size = request
            .params
            .get("size")
            .and_then(|v| v.as_str())
            .map(String::from);

        let body = MediaRequest {
            model: model.clone(),
            prompt: request.prompt.clone(),
            size,
        };

        let resp: MediaResponse = self.post_json(config, path, &body).await?;
        let locator = resp
            .data
            .into_iter()
            .next()
            .and_then(|item| item.url.or(item.id))
            .ok_or_else(|| request_error(config, "no locator in response"))?;

        Ok(GenerationResponse {
            provider_id: config.id.clone(),
            model,
            mock: false,
            output: GenerationOutput::Media { locator },
        })
    }
}

impl ProviderClient for HttpProviderClient {
    fn generate(
        &self,
        config: &ProviderConfig,
        request: &GenerationRequest,
    ) -> BoxFuture<'_, Result<GenerationResponse>> {
        let config = config.clone();
        let request = request.clone();

        Box::pin(async move {
            let model = Self::resolve_model(&config, &request)?;
            match request.content_type {
                ContentType::Text => self.generate_text(&config, &request, model).await,
                ContentType::Image => {
                    self.generate_media(&config, &request, model, "images/generations")
                        .await
                }
                ContentType::Video => {
                    self.generate_media(&config, &request, model, "videos/generations")
                        .await
                }
            }
        })
    }
}
