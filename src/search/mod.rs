//! Search orchestration module
//!
//! Query model, cancellation, and dispatch of queries to providers.

mod cancellation;
mod executor;
mod models;

pub use cancellation::Cancellation;
pub use executor::{Search, SearchError};
pub use models::*;
