//! Unified service-layer error type for gallery-server
//!
//! `ServiceError` bridges repository and storage errors to the API-layer
//! error (`AppError`), so handlers can use `?` on all three.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

use crate::db::RepoError;
use crate::storage::StorageError;

/// - `Repo` / `Storage`: infrastructure failures, logged and answered with a
///   generic 500 so store internals do not reach clients
/// - `App`: errors already carrying the right code, passed through
#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    Storage(StorageError),
    App(AppError),
}

impl From<RepoError> for ServiceError {
    fn from(e: RepoError) -> Self {
        ServiceError::Repo(e)
    }
}

impl From<StorageError> for ServiceError {
    fn from(e: StorageError) -> Self {
        ServiceError::Storage(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Repo(repo_err) => {
                tracing::error!(error = %repo_err, "Metadata store error");
                AppError::new(ErrorCode::DatabaseError)
            }
            ServiceError::Storage(storage_err) => {
                tracing::error!(error = %storage_err, "Object storage error");
                AppError::new(ErrorCode::StorageError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

/// Convenience type alias for service-layer results
pub type ServiceResult<T> = Result<T, ServiceError>;
