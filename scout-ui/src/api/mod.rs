//! HTTP handlers for scout-ui

pub mod actions;
pub mod health;
pub mod pages;

pub use actions::{create_request, mark_request_printed, refine_search};
pub use health::health_routes;
pub use pages::{queue_page, search_page};
