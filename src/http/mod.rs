//! HTTP module
//!
//! Provides the transport used by fetchers and resource loads, and the
//! process-wide rate gate every outgoing request passes through.
//!
//! # Features
//!
//! - **JSON:API defaults**: `Accept: application/vnd.api+json` on every request
//! - **Rate Gate**: minimum spacing between dispatches using governor
//! - **Authentication**: Integration with auth module
//! - **No retries**: failures surface immediately

mod client;
mod rate_gate;

pub use client::{HttpClient, HttpClientConfig, RequestConfig, JSON_API_MEDIA_TYPE};
pub use rate_gate::{RateGate, RateGateConfig, DEFAULT_MIN_INTERVAL};

#[cfg(test)]
mod tests;
