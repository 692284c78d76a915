//! # Tarawihdimana
//!
//! HTTP gateway in front of a places-search provider and a prayer-times
//! provider. It picks a random mosque near a point, with an optional in-memory
//! response cache, and resolves free-text Indonesian city names to today's
//! prayer schedule. All routes share one token-bucket rate limit and CORS.

pub mod cache;
pub mod city;
pub mod config;
pub mod error;
pub mod security;
pub mod server;
pub mod transport;
pub mod upstream;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::GatewayError;
pub use server::{SearchRequest, TarawihService};
pub use transport::HttpTransport;

/// Current version of the gateway
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
