/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body / WWW-Authenticate)
 * - token 検証エラー / authority 変換エラーを 401 に統一的に変換
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::AuthorityError;
use crate::services::auth::access_jwt::AccessJwtError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("malformed authorization header")]
    InvalidRequest,
    #[error("invalid token")]
    InvalidToken,
    #[error("forbidden")]
    Forbidden,
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    // RFC 6750 challenge for bearer-token failures.
    fn challenge(&self) -> Option<&'static str> {
        match self {
            AppError::Unauthorized => Some("Bearer"),
            AppError::InvalidRequest => Some(r#"Bearer error="invalid_request""#),
            AppError::InvalidToken => Some(r#"Bearer error="invalid_token""#),
            AppError::Forbidden => Some(r#"Bearer error="insufficient_scope""#),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let challenge = self.challenge();

        let (status, code) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::InvalidRequest => (StatusCode::UNAUTHORIZED, "INVALID_REQUEST"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            AppError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR"),
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code,
                message: self.to_string(),
            },
        };

        let mut res = (status, Json(body)).into_response();
        if let Some(challenge) = challenge {
            res.headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static(challenge));
        }
        res
    }
}

// Token contents are never echoed to the client; details go to the log only.
impl From<AccessJwtError> for AppError {
    fn from(_: AccessJwtError) -> Self {
        AppError::InvalidToken
    }
}

impl From<AuthorityError> for AppError {
    fn from(_: AuthorityError) -> Self {
        AppError::InvalidToken
    }
}
