//! Ferret-RS: a pluggable search host with a Consul catalog provider
//!
//! Providers turn a keyword into a page of `Result`s. The bundled Consul
//! provider searches service names and tags across every datacenter of a
//! Consul catalog.

pub mod config;
pub mod network;
pub mod providers;
pub mod results;
pub mod search;
pub mod web;

pub use config::Settings;
pub use providers::{Provider, ProviderError};
pub use results::{Result as SearchResult, Results};
pub use search::{Cancellation, Query, Search, SearchRequest};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for a query in seconds
pub const DEFAULT_TIMEOUT: u64 = 5;

/// Maximum timeout that can be set
pub const MAX_TIMEOUT: u64 = 30;

/// Results returned per page by providers
pub const RESULTS_PER_PAGE: usize = 10;
