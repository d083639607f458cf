//! Shared username/password check for uploads and login
//!
//! There are no user accounts: one credential pair from the environment
//! guards every write that needs it.

use sha2::{Digest, Sha256};
use shared::error::{AppError, ErrorCode};

use crate::config::Config;

/// Fallback pair accepted only in development when nothing is configured
const DEV_USERNAME: &str = "admin";
const DEV_PASSWORD: &str = "password";

#[derive(Clone)]
pub struct UploadCredentials {
    username: Option<String>,
    password: Option<String>,
    allow_dev_fallback: bool,
}

impl UploadCredentials {
    pub fn new(username: Option<String>, password: Option<String>) -> Self {
        Self {
            username,
            password,
            allow_dev_fallback: false,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            username: config.upload_username.clone(),
            password: config.upload_password.clone(),
            allow_dev_fallback: config.is_development(),
        }
    }

    pub fn with_dev_fallback(mut self, allow: bool) -> Self {
        self.allow_dev_fallback = allow;
        self
    }

    pub fn username_configured(&self) -> bool {
        self.username.is_some()
    }

    pub fn password_configured(&self) -> bool {
        self.password.is_some()
    }

    pub fn is_configured(&self) -> bool {
        self.username_configured() && self.password_configured()
    }

    /// Check a submitted pair
    ///
    /// Unconfigured servers answer `AuthNotConfigured` (500) rather than 401,
    /// except for the development fallback pair.
    pub fn verify(&self, username: Option<&str>, password: Option<&str>) -> Result<(), AppError> {
        let (Some(expected_user), Some(expected_pass)) = (&self.username, &self.password) else {
            if self.allow_dev_fallback
                && username == Some(DEV_USERNAME)
                && password == Some(DEV_PASSWORD)
            {
                tracing::warn!("Accepted development fallback credentials");
                return Ok(());
            }
            tracing::error!("Upload credentials are not configured");
            return Err(AppError::new(ErrorCode::AuthNotConfigured));
        };

        let (Some(username), Some(password)) = (username, password) else {
            return Err(AppError::invalid_credentials());
        };

        if digest_eq(username, expected_user) & digest_eq(password, expected_pass) {
            Ok(())
        } else {
            tracing::info!("Rejected upload credentials");
            Err(AppError::invalid_credentials())
        }
    }
}

impl std::fmt::Debug for UploadCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mask = |v: &Option<String>| if v.is_some() { "[SET]" } else { "[UNSET]" };
        f.debug_struct("UploadCredentials")
            .field("username", &mask(&self.username))
            .field("password", &mask(&self.password))
            .field("allow_dev_fallback", &self.allow_dev_fallback)
            .finish()
    }
}

/// Compare fixed-length digests so the comparison time does not depend on
/// how much of the secret matched.
fn digest_eq(a: &str, b: &str) -> bool {
    Sha256::digest(a.as_bytes()) == Sha256::digest(b.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> UploadCredentials {
        UploadCredentials::new(Some("curator".into()), Some("s3cret".into()))
    }

    #[test]
    fn test_accepts_matching_pair() {
        assert!(configured().verify(Some("curator"), Some("s3cret")).is_ok());
    }

    #[test]
    fn test_rejects_wrong_or_missing_pair() {
        let creds = configured();
        let err = creds.verify(Some("curator"), Some("nope")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);

        let err = creds.verify(None, Some("s3cret")).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
    }

    #[test]
    fn test_unconfigured_server() {
        let creds = UploadCredentials::new(None, None);
        let err = creds.verify(Some("admin"), Some("password")).unwrap_err();
        assert_eq!(err.code, ErrorCode::AuthNotConfigured);

        let creds = creds.with_dev_fallback(true);
        assert!(creds.verify(Some("admin"), Some("password")).is_ok());
        assert!(creds.verify(Some("admin"), Some("wrong")).is_err());
    }

    #[test]
    fn test_dev_fallback_ignored_once_configured() {
        let creds = configured().with_dev_fallback(true);
        assert!(creds.verify(Some("admin"), Some("password")).is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", configured());
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("[SET]"));
    }
}
