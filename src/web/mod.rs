//! Web shell
//!
//! Serves the search page; every `/search` request runs its own controller
//! against the remote service and renders the result section server-side.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
