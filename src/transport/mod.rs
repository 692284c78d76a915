//! Transport layer: the HTTP surface of the gateway

pub mod http;

pub use http::{AppState, HttpTransport, ROUTE_PREFIX};
