//! Unified error system for the gallery
//!
//! - [`ErrorCode`]: Standardized numeric error codes
//! - [`ErrorCategory`]: Classification of errors by code range
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ErrorBody`]: JSON error body (`{ "error": ..., "code": ... }`)
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::ImageNotFound);
//! assert_eq!(err.http_status(), http::StatusCode::NOT_FOUND);
//!
//! let err = AppError::validation("limit must be a non-negative integer")
//!     .with_detail("field", "limit");
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, 2);
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, ErrorBody};
