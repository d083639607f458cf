//! Credential endpoints
//!
//! - POST /api/auth — check the shared upload pair before showing the upload form
//! - GET /api/test-auth — which halves of the pair are configured (never the values)

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::error::ServiceResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub username_configured: bool,
    pub password_configured: bool,
    pub both_configured: bool,
    pub message: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ServiceResult<Json<LoginResponse>> {
    state
        .credentials
        .verify(req.username.as_deref(), req.password.as_deref())?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
    }))
}

pub async fn test_auth(State(state): State<AppState>) -> Json<AuthStatus> {
    let creds = &state.credentials;
    let both = creds.is_configured();
    Json(AuthStatus {
        username_configured: creds.username_configured(),
        password_configured: creds.password_configured(),
        both_configured: both,
        message: if both {
            "Upload credentials are configured".to_string()
        } else {
            "Upload credentials are missing".to_string()
        },
    })
}
