//! Shared types for the gallery
//!
//! Domain types used by the server and any API client: the image model,
//! list-query parsing, and the unified error system.

pub mod error;
pub mod models;
pub mod query;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use query::{ImageListResponse, ListParams, ListQuery, SortBy, SortOrder};
