//! Search provider module
//!
//! Defines the Provider trait and provides a registry for all providers.

mod error;
mod loader;
mod registry;
mod traits;

// Provider implementations
pub mod consul;

pub use error::ProviderError;
pub use loader::ProviderLoader;
pub use registry::ProviderRegistry;
pub use traits::*;
