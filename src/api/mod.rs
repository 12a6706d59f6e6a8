//! REST API for query resolution
//!
//! Thin axum layer over [`QueryEngine`](crate::engine::QueryEngine).

#[cfg(feature = "server")]
pub mod search_routes;

#[cfg(feature = "server")]
pub use search_routes::create_search_router;
