//! Search submission module
//!
//! Owns the query, drives dispatches to the remote service and keeps the
//! resulting state.

mod controller;
mod error;
mod models;

pub use controller::{Dispatch, SearchController, SearchState};
pub use error::SearchError;
pub use models::*;
