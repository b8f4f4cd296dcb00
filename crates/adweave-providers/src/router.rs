use std::time::Duration;

use futures::future::BoxFuture;
use tracing::{debug, info, warn};

use adweave_core::config::ProviderConfig;
use adweave_core::error::{AdweaveError, Result};
use adweave_core::traits::ProviderInvoker;
use adweave_core::types::{ExecutionMode, GenerationRequest, GenerationResponse};

use crate::client::{HttpProviderClient, ProviderClient};
use crate::limiter::RateLimiter;
use crate::mock;

/// Base pause when a provider's bucket is empty. The limiter is advisory:
/// the call still proceeds after the pause.
const THROTTLE_PAUSE_MS: u64 = 150;

struct ProviderEntry {
    config: ProviderConfig,
    client: Box<dyn ProviderClient>,
}

/// Prioritized provider pool with automatic failover.
///
/// The list is fixed at construction: enabled providers only, sorted
/// ascending by priority. Mode is live only when at least one enabled
/// provider holds a credential and is not flagged mock; otherwise every
/// request is answered synthetically.
pub struct ProviderRouter {
    entries: Vec<ProviderEntry>,
    limiter: RateLimiter,
    mode: ExecutionMode,
}

impl ProviderRouter {
    pub fn new(configs: Vec<ProviderConfig>) -> Self {
        let clients = configs
            .into_iter()
            .map(|c| {
                let client: Box<dyn ProviderClient> = Box::new(HttpProviderClient::new());
                (c, client)
            })
            .collect();
        Self::with_clients(clients)
    }

    /// Construct with injected clients. Tests use this to script provider
    /// behavior without a network.
    pub fn with_clients(configs: Vec<(ProviderConfig, Box<dyn ProviderClient>)>) -> Self {
        let mut entries: Vec<ProviderEntry> = configs
            .into_iter()
            .filter(|(c, _)| c.enabled)
            .map(|(config, client)| ProviderEntry { config, client })
            .collect();
        entries.sort_by_key(|e| e.config.priority);

        let live = entries
            .iter()
            .any(|e| e.config.has_credential() && !e.config.mock);
        let mode = if live {
            ExecutionMode::Real
        } else {
            ExecutionMode::Mock
        };

        info!(
            providers = entries.len(),
            mode = %mode,
            "Provider router ready"
        );

        Self {
            entries,
            limiter: RateLimiter::new(),
            mode,
        }
    }

    pub fn providers(&self) -> impl Iterator<Item = &ProviderConfig> {
        self.entries.iter().map(|e| &e.config)
    }

    /// Built-in descriptor used when no provider is configured at all, so
    /// mock mode still produces a tagged response.
    fn fallback_config() -> ProviderConfig {
        ProviderConfig {
            id: "fallback".to_string(),
            name: "Built-in fallback".to_string(),
            priority: i32::MAX,
            api_key: None,
            base_url: None,
            model: None,
            mock: true,
            enabled: true,
            rate_limit: u32::MAX,
        }
    }

    async fn invoke_inner(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        if self.entries.is_empty() {
            debug!("No providers configured, answering from built-in fallback");
            return Ok(mock::synthetic_response(&Self::fallback_config(), &request));
        }

        let mut last_err: Option<AdweaveError> = None;
        let mut attempted = 0usize;

        for entry in &self.entries {
            attempted += 1;
            let config = &entry.config;

            if !self.limiter.try_acquire(&config.id, config.rate_limit) {
                // Advisory limiter: pause briefly, then attempt anyway.
                let jitter = (rand::random::<f64>() * THROTTLE_PAUSE_MS as f64) as u64;
                let pause = Duration::from_millis(THROTTLE_PAUSE_MS + jitter);
                warn!(
                    provider = %config.id,
                    pause_ms = pause.as_millis() as u64,
                    "Rate limit bucket empty, pausing before attempt"
                );
                tokio::time::sleep(pause).await;
            }

            if self.mode == ExecutionMode::Mock || config.mock {
                debug!(provider = %config.id, "Synthetic response");
                return Ok(mock::synthetic_response(config, &request));
            }

            if !config.has_credential() {
                warn!(provider = %config.id, "Provider skipped: no credential");
                last_err = Some(AdweaveError::MissingCredential(config.id.clone()));
                continue;
            }

            match entry.client.generate(config, &request).await {
                Ok(response) => {
                    debug!(
                        provider = %config.id,
                        model = %response.model,
                        content_type = %request.content_type,
                        "Provider call succeeded"
                    );
                    return Ok(response);
                }
                Err(e) => {
                    warn!(provider = %config.id, error = %e, "Provider call failed, trying next");
                    last_err = Some(e);
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or(AdweaveError::ProviderExhausted { attempted }))
    }
}

impl ProviderInvoker for ProviderRouter {
    fn invoke(&self, request: GenerationRequest) -> BoxFuture<'_, Result<GenerationResponse>> {
        Box::pin(self.invoke_inner(request))
    }

    fn mode(&self) -> ExecutionMode {
        self.mode
    }
}
