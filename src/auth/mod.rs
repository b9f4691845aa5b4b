// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authorization Module
//!
//! Bearer-token authorization for the Casting Agency API.
//!
//! ## Auth Flow
//!
//! 1. Client obtains an access token from the identity provider; roles are
//!    resolved there into a flat `permissions` claim
//! 2. Client sends `Authorization: Bearer <JWT>`
//! 3. Server:
//!    - Verifies algorithm, key id, signature, expiry, issuer, audience
//!      against the provider's JWKS
//!    - Extracts the `permissions` claim
//!    - Checks the route's required permission is in it
//!
//! ## Security
//!
//! - Only the configured asymmetric algorithm is accepted (`none` never is)
//! - JWKS is fetched over HTTPS and cached with TTL and refresh backoff
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod middleware;
pub mod permissions;
pub mod verifier;

#[cfg(test)]
pub(crate) mod testing;

pub use claims::TokenClaims;
pub use error::AuthError;
pub use extractor::Claims;
pub use jwks::{JwksCache, KeySource, RemoteKeySource, StaticKeySource};
pub use middleware::{with_auth, AuthContext, Authorizer};
pub use permissions::Permission;
pub use verifier::TokenVerifier;
