//! HTTP networking module
//!
//! Provides the HTTP client providers use to reach upstream services.

mod client;

pub use client::HttpClient;
