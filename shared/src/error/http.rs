//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::ImageNotFound => StatusCode::NOT_FOUND,

            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,

            // Misconfigured server, not a client mistake
            Self::AuthNotConfigured
            | Self::InternalError
            | Self::DatabaseError
            | Self::StorageError => StatusCode::INTERNAL_SERVER_ERROR,

            Self::ValidationFailed
            | Self::NoFileProvided
            | Self::EmptyFile
            | Self::FileTooLarge
            | Self::MalformedUpload => StatusCode::BAD_REQUEST,
        }
    }
}
