// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and permission extraction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::AuthError;
use super::permissions::PermissionSet;

/// Audience claim: RFC 7519 allows a single string or an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

/// Claims carried by an access token issued for this API.
///
/// Only produced by the verifier, after signature, algorithm, issuer,
/// audience and expiry checks have passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Issuer (identity provider tenant URL)
    pub iss: String,

    /// Subject (user ID at the identity provider)
    pub sub: String,

    /// Audience (this API's identifier)
    pub aud: Audience,

    /// Expiration timestamp
    pub exp: i64,

    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Not before timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Authorized party (client the token was issued to)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub azp: Option<String>,

    /// Space-separated OAuth scopes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Raw permissions claim. Its shape is checked by [`extract_permissions`]
    /// so that a misconfigured provider is reported as such and not as a
    /// malformed token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Value>,
}

/// Read the permission set out of verified claims.
pub fn extract_permissions(claims: &TokenClaims) -> Result<PermissionSet, AuthError> {
    let raw = match &claims.permissions {
        None | Some(Value::Null) => {
            return Err(AuthError::ClaimsMalformed("claim is absent".into()));
        }
        Some(Value::Array(items)) => items,
        Some(other) => {
            return Err(AuthError::ClaimsMalformed(format!(
                "expected an array of strings, found {}",
                json_kind(other)
            )));
        }
    };

    raw.iter()
        .map(|item| match item {
            Value::String(permission) => Ok(permission.clone()),
            other => Err(AuthError::ClaimsMalformed(format!(
                "expected an array of strings, found an element of type {}",
                json_kind(other)
            ))),
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
