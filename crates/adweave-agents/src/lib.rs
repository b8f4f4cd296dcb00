pub mod builtin;
pub mod registry;
pub mod review;

#[cfg(test)]
pub(crate) mod testutil;

pub use builtin::brand_guard::BrandGuardAgent;
pub use builtin::copywriter::CopywriterAgent;
pub use builtin::human_gate::HumanGateAgent;
pub use builtin::media::{ImageDirectorAgent, VideoDirectorAgent};
pub use builtin::publisher::PublisherAgent;
pub use registry::AgentRegistry;
pub use review::{ReviewBroker, ReviewDecision, ReviewRequest};
