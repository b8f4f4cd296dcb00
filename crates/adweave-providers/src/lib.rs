pub mod client;
pub mod limiter;
pub mod mock;
pub mod router;

pub use client::{HttpProviderClient, ProviderClient};
pub use limiter::RateLimiter;
pub use router::ProviderRouter;
