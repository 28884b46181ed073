//! Result types shared by every provider
//!
//! Providers fill these, the host serializes them.

mod types;

pub use types::*;
