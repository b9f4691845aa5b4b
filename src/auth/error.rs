// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authorization errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use super::permissions::Permission;
use crate::error::ErrorEnvelope;

/// Authorization error type.
///
/// Every failure in the authorization pipeline produces exactly one of these.
/// The variant name doubles as the machine code in the error envelope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Authorization header missing or not `Bearer <token>`
    #[error("{0}")]
    MalformedHeader(&'static str),
    /// Token header has no `kid`, or the key set has no such key
    #[error("Unable to find the appropriate signing key")]
    InvalidKeyId,
    /// Signature check failed, or the algorithm is not the configured one
    #[error("Token signature is invalid")]
    InvalidSignature,
    /// `iss` does not match the configured issuer
    #[error("Token issuer is invalid")]
    InvalidIssuer,
    /// `aud` does not contain the configured audience
    #[error("Token audience is invalid")]
    InvalidAudience,
    /// `exp` is in the past
    #[error("Token has expired")]
    TokenExpired,
    /// `nbf` is in the future
    #[error("Token is not yet valid")]
    TokenNotYetValid,
    /// Token could not be decoded into the expected claim structure
    #[error("Unable to parse authentication token")]
    TokenMalformed,
    /// Verified token carries no usable `permissions` claim
    #[error("Permissions not included in token: {0}")]
    ClaimsMalformed(String),
    /// Verified token lacks the permission the route requires
    #[error("Permission `{0}` not granted")]
    InsufficientScope(Permission),
    /// The signing key set could not be fetched and nothing is cached
    #[error("Signing keys are unavailable: {0}")]
    KeySetUnavailable(String),
}

impl AuthError {
    /// Machine-readable code reported in the `code` field of the envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MalformedHeader(_) => "MalformedHeader",
            AuthError::InvalidKeyId => "InvalidKeyId",
            AuthError::InvalidSignature => "InvalidSignature",
            AuthError::InvalidIssuer => "InvalidIssuer",
            AuthError::InvalidAudience => "InvalidAudience",
            AuthError::TokenExpired => "TokenExpired",
            AuthError::TokenNotYetValid => "TokenNotYetValid",
            AuthError::TokenMalformed => "TokenMalformed",
            AuthError::ClaimsMalformed(_) => "ClaimsMalformed",
            AuthError::InsufficientScope(_) => "InsufficientScope",
            AuthError::KeySetUnavailable(_) => "KeySetUnavailable",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MalformedHeader(_)
            | AuthError::InvalidKeyId
            | AuthError::InvalidSignature
            | AuthError::InvalidIssuer
            | AuthError::InvalidAudience
            | AuthError::TokenExpired
            | AuthError::TokenNotYetValid
            | AuthError::TokenMalformed => StatusCode::UNAUTHORIZED,
            AuthError::InsufficientScope(_) => StatusCode::FORBIDDEN,
            AuthError::ClaimsMalformed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::KeySetUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Whether this failure points at server-side misconfiguration rather
    /// than at the caller's credentials.
    pub fn is_operational(&self) -> bool {
        matches!(
            self,
            AuthError::ClaimsMalformed(_) | AuthError::KeySetUnavailable(_)
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorEnvelope::new(status, self.code(), self.to_string()));
        (status, body).into_response()
    }
}
