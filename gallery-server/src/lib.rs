//! gallery-server: public image gallery backend
//!
//! ```text
//! gallery-server/src/
//! ├── api/       # HTTP routes and handlers
//! ├── auth.rs    # shared upload credentials
//! ├── config.rs  # environment configuration
//! ├── db/        # image metadata store (PostgreSQL / in-memory)
//! ├── storage/   # image bytes (S3 / in-memory)
//! ├── error.rs   # service-layer error bridge
//! └── state.rs   # shared application state
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod state;
pub mod storage;

pub use config::Config;
pub use state::AppState;
