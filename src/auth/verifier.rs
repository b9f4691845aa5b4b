// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification.
//!
//! ## Order of Checks
//!
//! 1. `Authorization` header is `Bearer <token>`
//! 2. Token has three segments and a JSON header
//! 3. Header `alg` is exactly the configured algorithm (`none` never is)
//! 4. Header carries a `kid`
//! 5. `exp` is not in the past (before any key lookup, so expired tokens
//!    never cause key refreshes)
//! 6. `kid` resolves to a key in the JWKS cache
//! 7. Signature, issuer, audience and not-before, via `jsonwebtoken`

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use base64ct::{Base64UrlUnpadded, Encoding};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, Validation};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::claims::TokenClaims;
use super::error::AuthError;
use super::jwks::JwksCache;

/// Clock skew tolerance (60 seconds).
pub const CLOCK_SKEW_LEEWAY: Duration = Duration::from_secs(60);

/// The token header fields we act on. `alg` stays a string so that values
/// `jsonwebtoken` cannot represent (such as `none`) are still reported as a
/// signature failure rather than a parse failure.
#[derive(Debug, Deserialize)]
struct RawHeader {
    alg: String,
    #[serde(default)]
    kid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExpiryProbe {
    #[serde(default)]
    exp: Option<i64>,
}

/// Whether `algorithm` verifies with a public key. Symmetric algorithms are
/// never accepted: a JWKS public key must not double as an HMAC secret.
pub fn is_asymmetric(algorithm: Algorithm) -> bool {
    !matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}

/// Extract the token from an `Authorization` header value.
pub fn bearer_token(raw: Option<&str>) -> Result<&str, AuthError> {
    let raw = raw.ok_or(AuthError::MalformedHeader("Authorization header is expected"))?;
    let parts: Vec<&str> = raw.split(' ').collect();

    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(*token)
        }
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::MalformedHeader(
            "Authorization header must start with \"Bearer\"",
        )),
        [_] | [_, _] => Err(AuthError::MalformedHeader("Token not found")),
        _ => Err(AuthError::MalformedHeader(
            "Authorization header must be bearer token",
        )),
    }
}

/// Verifies access tokens against the issuer, audience and signing keys of
/// the configured identity provider.
#[derive(Clone)]
pub struct TokenVerifier {
    keys: Arc<JwksCache>,
    issuer: String,
    audience: String,
    algorithm: Algorithm,
    leeway: Duration,
}

impl TokenVerifier {
    /// Create a verifier requiring RS256 with the default clock skew.
    pub fn new(keys: Arc<JwksCache>, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            keys,
            issuer: issuer.into(),
            audience: audience.into(),
            algorithm: Algorithm::RS256,
            leeway: CLOCK_SKEW_LEEWAY,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_leeway(mut self, leeway: Duration) -> Self {
        self.leeway = leeway;
        self
    }

    pub fn keys(&self) -> &Arc<JwksCache> {
        &self.keys
    }

    /// Verify the token carried by a raw `Authorization` header value.
    pub async fn verify_header(&self, raw: Option<&str>) -> Result<TokenClaims, AuthError> {
        let token = bearer_token(raw)?;
        self.verify(token).await
    }

    /// Verify a compact JWS token and return its claims.
    pub async fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let (header_segment, payload_segment) = split_segments(token)?;

        let header: RawHeader = decode_segment(header_segment)?;
        match Algorithm::from_str(&header.alg) {
            Ok(alg) if alg == self.algorithm => {}
            _ => {
                if header.alg.eq_ignore_ascii_case("none") {
                    tracing::warn!("unsigned token rejected");
                } else {
                    tracing::warn!(
                        alg = %header.alg,
                        required = ?self.algorithm,
                        "token signed with unexpected algorithm"
                    );
                }
                return Err(AuthError::InvalidSignature);
            }
        }

        let kid = header.kid.ok_or(AuthError::InvalidKeyId)?;

        let probe: ExpiryProbe = decode_segment(payload_segment)?;
        if let Some(exp) = probe.exp {
            let leeway = i64::try_from(self.leeway.as_secs()).unwrap_or(i64::MAX);
            if exp < chrono::Utc::now().timestamp().saturating_sub(leeway) {
                return Err(AuthError::TokenExpired);
            }
        }

        let decoding_key = self.keys.decoding_key(&kid, self.algorithm).await?;

        let token_data = decode::<TokenClaims>(token, &decoding_key, &self.validation())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::InvalidSignature
                }
                ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                ErrorKind::InvalidAudience => AuthError::InvalidAudience,
                ErrorKind::ImmatureSignature => AuthError::TokenNotYetValid,
                _ => {
                    tracing::debug!(error = %e, "token failed to decode");
                    AuthError::TokenMalformed
                }
            })?;

        Ok(token_data.claims)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = self.leeway.as_secs();
        validation.validate_nbf = true;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation
    }
}

fn split_segments(token: &str) -> Result<(&str, &str), AuthError> {
    let mut segments = token.split('.');
    match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(header), Some(payload), Some(_signature), None) => Ok((header, payload)),
        _ => Err(AuthError::TokenMalformed),
    }
}

fn decode_segment<T: DeserializeOwned>(segment: &str) -> Result<T, AuthError> {
    let bytes = Base64UrlUnpadded::decode_vec(segment).map_err(|_| AuthError::TokenMalformed)?;
    serde_json::from_slice(&bytes).map_err(|_| AuthError::TokenMalformed)
}
