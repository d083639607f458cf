//! Unified error codes for the gallery
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Image errors (lookup, upload validation)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 on the wire so browser clients can switch on it
/// without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,

    // ==================== 1xxx: Auth ====================
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Server has no upload credentials configured
    AuthNotConfigured = 1010,

    // ==================== 2xxx: Image ====================
    /// Image record not found (or soft-deleted)
    ImageNotFound = 2001,
    /// Multipart form had no file field
    NoFileProvided = 2101,
    /// Uploaded file has zero bytes
    EmptyFile = 2102,
    /// Uploaded file exceeds the configured maximum
    FileTooLarge = 2103,
    /// Multipart body could not be read
    MalformedUpload = 2104,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Metadata store error
    DatabaseError = 9002,
    /// Object storage error
    StorageError = 9003,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",

            // Auth
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::AuthNotConfigured => {
                "Authentication not configured. Please set USERNAME and PASSWORD environment variables."
            }

            // Image
            ErrorCode::ImageNotFound => "Image not found",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file",
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::MalformedUpload => "Malformed multipart upload",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::StorageError => "Object storage error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),

            // Auth
            1002 => Ok(ErrorCode::InvalidCredentials),
            1010 => Ok(ErrorCode::AuthNotConfigured),

            // Image
            2001 => Ok(ErrorCode::ImageNotFound),
            2101 => Ok(ErrorCode::NoFileProvided),
            2102 => Ok(ErrorCode::EmptyFile),
            2103 => Ok(ErrorCode::FileTooLarge),
            2104 => Ok(ErrorCode::MalformedUpload),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::StorageError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
