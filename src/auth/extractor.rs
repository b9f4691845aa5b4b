// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the caller's verified claims.
//!
//! Use the `Claims` extractor in handlers behind [`with_auth`](super::with_auth):
//!
//! ```rust,ignore
//! async fn my_handler(Claims(context): Claims) -> impl IntoResponse {
//!     // context.claims is the verified token payload
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::{AuthContext, AuthError};

/// Verified claims of the caller, as stored by the permission guard.
///
/// Rejects with `MalformedHeader` on a route that was registered without
/// the guard, so an unguarded handler never sees an empty identity.
pub struct Claims(pub AuthContext);

impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .map(Claims)
            .ok_or(AuthError::MalformedHeader("Authorization header is expected"))
    }
}
