// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Shared harness for the router-level tests: fixture keys, token minting
//! and a request helper.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderValue, Method, Request, StatusCode},
    Router,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use casting_agency::{
    api::router,
    auth::{Authorizer, JwksCache, StaticKeySource, TokenVerifier},
    state::AppState,
    storage::CastingDatabase,
};
use jsonwebtoken::{encode, jwk::JwkSet, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

pub const KID: &str = "casting-test-key";
pub const ISSUER: &str = "https://casting.example.com/";
pub const AUDIENCE: &str = "casting";

/// Every permission, as a casting director would hold.
pub const DIRECTOR: &[&str] = &[
    "get:actor",
    "post:actor",
    "patch:actor",
    "delete:actor",
    "get:movie",
    "post:movie",
    "patch:movie",
    "delete:movie",
];

/// Read-only permissions.
pub const ASSISTANT: &[&str] = &["get:actor", "get:movie"];

const TRUSTED_PEM: &str = include_str!("../fixtures/trusted_key.pem");
const UNTRUSTED_PEM: &str = include_str!("../fixtures/untrusted_key.pem");

pub fn app() -> Router {
    let jwks: JwkSet = serde_json::from_str(include_str!("../fixtures/jwks.json")).unwrap();
    let keys = Arc::new(JwksCache::new(Arc::new(StaticKeySource::new(jwks))));
    let verifier = TokenVerifier::new(keys, ISSUER, AUDIENCE);
    router(AppState::new(
        CastingDatabase::in_memory().unwrap(),
        Authorizer::new(verifier),
    ))
}

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn payload(permissions: &[&str]) -> Value {
    json!({
        "iss": ISSUER,
        "sub": "auth0|integration",
        "aud": AUDIENCE,
        "iat": now() - 10,
        "exp": now() + 3600,
        "permissions": permissions,
    })
}

pub fn sign(payload: &Value) -> String {
    sign_with(TRUSTED_PEM, KID, payload)
}

/// Signed by a key the server does not trust, under the trusted `kid`.
pub fn sign_untrusted(payload: &Value) -> String {
    sign_with(UNTRUSTED_PEM, KID, payload)
}

/// Signed by the trusted key but naming a `kid` the key set lacks.
pub fn sign_unknown_kid(payload: &Value) -> String {
    sign_with(TRUSTED_PEM, "retired-key", payload)
}

fn sign_with(pem: &str, kid: &str, payload: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    encode(
        &header,
        payload,
        &EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap(),
    )
    .unwrap()
}

/// Unsigned token declaring `alg: none`.
pub fn unsigned(payload: &Value) -> String {
    let header = json!({"alg": "none", "typ": "JWT", "kid": KID});
    format!(
        "{}.{}.",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

pub fn token_for(permissions: &[&str]) -> String {
    sign(&payload(permissions))
}

/// Send one request and return the status and JSON body.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

/// Send with a raw `Authorization` header value.
pub async fn send_raw_auth(app: &Router, uri: &str, authorization: &str) -> (StatusCode, Value) {
    send_raw_auth_bytes(app, uri, authorization.as_bytes()).await
}

/// Send with an `Authorization` header built from arbitrary bytes.
pub async fn send_raw_auth_bytes(
    app: &Router,
    uri: &str,
    authorization: &[u8],
) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri(uri)
        .header(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(authorization).unwrap(),
        )
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}
