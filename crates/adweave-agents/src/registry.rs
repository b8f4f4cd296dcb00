use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use adweave_core::config::ExecutorConfig;
use adweave_core::error::{AdweaveError, Result};
use adweave_core::traits::Agent;

use crate::review::ReviewBroker;

/// Registry of available agent capabilities.
pub struct AgentRegistry {
    agents: HashMap<String, Arc<dyn Agent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self {
            agents: HashMap::new(),
        }
    }

    /// Register an agent under its capability name.
    pub fn register(&mut self, agent: impl Agent) {
        let name = agent.name().to_string();
        self.agents.insert(name, Arc::new(agent));
    }

    /// Unregister an agent by name.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.agents.remove(name).is_some()
    }

    /// Load an agent by capability name.
    pub fn load(&self, name: &str) -> Result<Arc<dyn Agent>> {
        self.agents
            .get(name)
            .cloned()
            .ok_or_else(|| AdweaveError::AgentNotFound(name.to_string()))
    }

    /// Look up an agent without failing.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Agent>> {
        self.agents.get(name).cloned()
    }

    /// List all registered capability names.
    pub fn list(&self) -> Vec<&str> {
        self.agents.keys().map(|s| s.as_str()).collect()
    }

    /// Create a registry with all built-in agents registered.
    pub fn with_builtins(review: Arc<ReviewBroker>, executor: &ExecutorConfig) -> Self {
        let mut registry = Self::new();

        registry.register(crate::builtin::copywriter::CopywriterAgent);
        registry.register(crate::builtin::media::ImageDirectorAgent);
        registry.register(crate::builtin::media::VideoDirectorAgent);
        registry.register(crate::builtin::brand_guard::BrandGuardAgent);
        registry.register(crate::builtin::publisher::PublisherAgent);
        registry.register(crate::builtin::human_gate::HumanGateAgent::new(
            review,
            Duration::from_secs(executor.review_timeout_secs),
            executor.auto_approve,
        ));

        registry
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
