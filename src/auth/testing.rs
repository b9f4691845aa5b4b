// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fixture keys and token minting shared by the auth unit tests.

use std::sync::Arc;
use std::time::Duration;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

use super::claims::{Audience, TokenClaims};
use super::jwks::{JwksCache, StaticKeySource};
use super::middleware::{AuthContext, Authorizer};
use super::verifier::TokenVerifier;
use super::Claims;

pub const TRUSTED_KID: &str = "casting-test-key";
pub const ROTATED_KID: &str = "casting-rotated-key";
pub const ISSUER: &str = "https://casting.example.com/";
pub const AUDIENCE: &str = "casting";

const TRUSTED_PEM: &str = include_str!("../../tests/fixtures/trusted_key.pem");
const UNTRUSTED_PEM: &str = include_str!("../../tests/fixtures/untrusted_key.pem");

pub fn trusted_jwks() -> JwkSet {
    serde_json::from_str(include_str!("../../tests/fixtures/jwks.json")).unwrap()
}

/// Public half of the untrusted key, published under [`ROTATED_KID`].
pub fn rotated_jwks() -> JwkSet {
    serde_json::from_str(include_str!("../../tests/fixtures/rotated_jwks.json")).unwrap()
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Payload accepted by [`verifier`] for the given permissions.
pub fn claims(permissions: &[&str]) -> Value {
    json!({
        "iss": ISSUER,
        "sub": "auth0|casting-director",
        "aud": AUDIENCE,
        "iat": now() - 10,
        "exp": now() + 3600,
        "permissions": permissions,
    })
}

/// Sign with the trusted key under [`TRUSTED_KID`].
pub fn sign(payload: &Value) -> String {
    sign_with(TRUSTED_PEM, Some(TRUSTED_KID), payload)
}

/// Sign with the untrusted key, still claiming `kid`.
pub fn sign_untrusted(kid: &str, payload: &Value) -> String {
    sign_with(UNTRUSTED_PEM, Some(kid), payload)
}

pub fn sign_with(pem: &str, kid: Option<&str>, payload: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();
    encode(&header, payload, &key).unwrap()
}

/// Build a token by hand from raw header and payload JSON.
pub fn handcrafted(header: &Value, payload: &Value, signature: &str) -> String {
    format!(
        "{}.{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(payload.to_string()),
        signature
    )
}

pub fn key_cache() -> Arc<JwksCache> {
    Arc::new(
        JwksCache::new(Arc::new(StaticKeySource::new(trusted_jwks())))
            .with_min_refresh_interval(Duration::from_secs(60)),
    )
}

pub fn verifier() -> TokenVerifier {
    TokenVerifier::new(key_cache(), ISSUER, AUDIENCE)
}

pub fn authorizer() -> Authorizer {
    Authorizer::new(verifier())
}

/// Verified caller holding `permissions`, as a handler would receive it.
pub fn caller(permissions: &[&str]) -> Claims {
    Claims(AuthContext {
        claims: TokenClaims {
            iss: ISSUER.to_string(),
            sub: "auth0|casting-director".to_string(),
            aud: Audience::One(AUDIENCE.to_string()),
            exp: now() + 3600,
            iat: None,
            nbf: None,
            azp: None,
            scope: None,
            permissions: Some(json!(permissions)),
        },
        permissions: permissions.iter().copied().collect(),
    })
}
