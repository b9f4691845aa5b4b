// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Permission guard for Axum routes.
//!
//! ```rust,ignore
//! Router::new().route(
//!     "/actor",
//!     with_auth(&authorizer, Permission::GetActor, get(actors::list_actors)),
//! )
//! ```
//!
//! The guard runs header parsing, token verification, permission extraction
//! and the permission check in that order, stopping at the first failure.
//! On success the [`AuthContext`] is placed in request extensions, where the
//! [`Claims`](super::Claims) extractor picks it up.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use super::claims::{extract_permissions, TokenClaims};
use super::error::AuthError;
use super::permissions::{check, Permission, PermissionSet};
use super::verifier::TokenVerifier;

/// Verified identity and permissions of the caller.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub claims: TokenClaims,
    pub permissions: PermissionSet,
}

impl AuthContext {
    /// Caller's user ID at the identity provider.
    pub fn subject(&self) -> &str {
        &self.claims.sub
    }
}

/// The authorization pipeline.
pub struct Authorizer {
    verifier: TokenVerifier,
}

impl Authorizer {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    pub fn verifier(&self) -> &TokenVerifier {
        &self.verifier
    }

    /// Decide whether a request carrying `header` may use an operation that
    /// requires `required`.
    pub async fn authorize(
        &self,
        header: Option<&str>,
        required: Permission,
    ) -> Result<AuthContext, AuthError> {
        let claims = self.verifier.verify_header(header).await?;
        let permissions = extract_permissions(&claims)?;
        check(required, &permissions)?;
        Ok(AuthContext {
            claims,
            permissions,
        })
    }
}

/// State of a single guarded route.
#[derive(Clone)]
struct PermissionGuard {
    authorizer: Arc<Authorizer>,
    required: Permission,
}

/// Wrap `route` so that every method on it requires `required`.
///
/// Compose guarded routers with [`MethodRouter::merge`] when methods on one
/// path need different permissions.
pub fn with_auth<S>(
    authorizer: &Arc<Authorizer>,
    required: Permission,
    route: MethodRouter<S>,
) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let guard = PermissionGuard {
        authorizer: Arc::clone(authorizer),
        required,
    };
    route.route_layer(middleware::from_fn_with_state(guard, enforce))
}

async fn enforce(
    State(guard): State<PermissionGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // A header that is not visible ASCII cannot hold a bearer token.
    let header = match request.headers().get(AUTHORIZATION) {
        Some(value) => Some(value.to_str().map_err(|_| {
            AuthError::MalformedHeader("Authorization header must be bearer token")
        })?),
        None => None,
    };

    match guard.authorizer.authorize(header, guard.required).await {
        Ok(context) => {
            tracing::debug!(
                subject = %context.subject(),
                required = %guard.required,
                "request authorized"
            );
            request.extensions_mut().insert(context);
            Ok(next.run(request).await)
        }
        Err(e) => {
            let path = request.uri().path();
            if e.is_operational() {
                tracing::error!(
                    code = e.code(),
                    required = %guard.required,
                    path,
                    error = %e,
                    "authorization failed on server-side configuration"
                );
            } else {
                tracing::warn!(
                    code = e.code(),
                    required = %guard.required,
                    path,
                    "request denied"
                );
            }
            Err(e)
        }
    }
}
