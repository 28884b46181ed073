//! Web server module
//!
//! JSON API the search UI talks to.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
