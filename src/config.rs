// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the [`Settings`] loaded from
//! them once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATABASE_PATH` | redb database file | `casting_agency.redb` |
//! | `AUTH_ISSUER` | Expected JWT issuer claim | Required |
//! | `AUTH_AUDIENCE` | Expected JWT audience claim | Required |
//! | `AUTH_JWKS_URL` | JWKS endpoint (HTTPS, or HTTP on loopback) | `{AUTH_ISSUER}.well-known/jwks.json` |
//! | `AUTH_ALGORITHM` | Required signing algorithm | `RS256` |
//! | `AUTH_LEEWAY_SECS` | Clock skew tolerance | `60` |
//! | `JWKS_CACHE_TTL_SECS` | Key set time-to-live | `300` |
//! | `JWKS_MIN_REFRESH_SECS` | Minimum interval between key set fetches | `30` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use url::{Host, Url};

use crate::auth::jwks::{DEFAULT_CACHE_TTL, DEFAULT_MIN_REFRESH_INTERVAL};
use crate::auth::verifier::{is_asymmetric, CLOCK_SKEW_LEEWAY};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const DATABASE_PATH_ENV: &str = "DATABASE_PATH";

/// Expected `iss` claim, e.g. `https://tenant.eu.auth0.com/`.
pub const AUTH_ISSUER_ENV: &str = "AUTH_ISSUER";
/// Expected `aud` claim (the API identifier at the identity provider).
pub const AUTH_AUDIENCE_ENV: &str = "AUTH_AUDIENCE";
pub const AUTH_JWKS_URL_ENV: &str = "AUTH_JWKS_URL";
pub const AUTH_ALGORITHM_ENV: &str = "AUTH_ALGORITHM";
pub const AUTH_LEEWAY_SECS_ENV: &str = "AUTH_LEEWAY_SECS";
pub const JWKS_CACHE_TTL_SECS_ENV: &str = "JWKS_CACHE_TTL_SECS";
pub const JWKS_MIN_REFRESH_SECS_ENV: &str = "JWKS_MIN_REFRESH_SECS";

/// `json` for structured logs, anything else for human-readable output.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_PATH: &str = "casting_agency.redb";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid number: {value:?}")]
    Number { name: &'static str, value: String },

    #[error("{name} is not a valid URL: {source}")]
    Url {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("{0} must use https (http is only allowed for loopback hosts)")]
    InsecureUrl(&'static str),

    #[error("unknown signing algorithm {0:?}")]
    UnknownAlgorithm(String),

    #[error("signing algorithm {0:?} is symmetric; only asymmetric algorithms are accepted")]
    SymmetricAlgorithm(Algorithm),
}

/// Token verification settings.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub issuer: String,
    pub audience: String,
    pub jwks_url: Url,
    pub algorithm: Algorithm,
    pub leeway: Duration,
    pub cache_ttl: Duration,
    pub min_refresh_interval: Duration,
}

/// Process configuration, immutable after startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub auth: AuthSettings,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through `lookup`, which returns a variable's value if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let host = var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var(PORT_ENV) {
            Some(value) => parse_number(PORT_ENV, &value)?,
            None => DEFAULT_PORT,
        };
        let database_path = var(DATABASE_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_PATH));

        Ok(Self {
            host,
            port,
            database_path,
            auth: AuthSettings::from_lookup(var)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl AuthSettings {
    fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let issuer = var(AUTH_ISSUER_ENV).ok_or(ConfigError::Missing(AUTH_ISSUER_ENV))?;
        let audience = var(AUTH_AUDIENCE_ENV).ok_or(ConfigError::Missing(AUTH_AUDIENCE_ENV))?;

        let jwks_url = match var(AUTH_JWKS_URL_ENV) {
            Some(raw) => parse_url(AUTH_JWKS_URL_ENV, &raw)?,
            None => parse_url(AUTH_ISSUER_ENV, &issuer)?
                .join(".well-known/jwks.json")
                .map_err(|source| ConfigError::Url {
                    name: AUTH_ISSUER_ENV,
                    source,
                })?,
        };
        if !is_secure(&jwks_url) {
            return Err(ConfigError::InsecureUrl(AUTH_JWKS_URL_ENV));
        }

        let algorithm = match var(AUTH_ALGORITHM_ENV) {
            Some(raw) => Algorithm::from_str(raw.trim())
                .map_err(|_| ConfigError::UnknownAlgorithm(raw.clone()))?,
            None => Algorithm::RS256,
        };
        if !is_asymmetric(algorithm) {
            return Err(ConfigError::SymmetricAlgorithm(algorithm));
        }

        Ok(Self {
            issuer,
            audience,
            jwks_url,
            algorithm,
            leeway: seconds(&var, AUTH_LEEWAY_SECS_ENV, CLOCK_SKEW_LEEWAY)?,
            cache_ttl: seconds(&var, JWKS_CACHE_TTL_SECS_ENV, DEFAULT_CACHE_TTL)?,
            min_refresh_interval: seconds(
                &var,
                JWKS_MIN_REFRESH_SECS_ENV,
                DEFAULT_MIN_REFRESH_INTERVAL,
            )?,
        })
    }
}

fn parse_number<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Number {
        name,
        value: value.to_string(),
    })
}

fn seconds<F>(var: &F, name: &'static str, default: Duration) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(value) => parse_number(name, &value).map(Duration::from_secs),
        None => Ok(default),
    }
}

fn parse_url(name: &'static str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|source| ConfigError::Url { name, source })
}

fn is_secure(url: &Url) -> bool {
    match url.scheme() {
        "https" => true,
        "http" => match url.host() {
            Some(Host::Domain(domain)) => domain == "localhost",
            Some(Host::Ipv4(ip)) => ip.is_loopback(),
            Some(Host::Ipv6(ip)) => ip.is_loopback(),
            None => false,
        },
        _ => false,
    }
}
