// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Refresh Policy
//!
//! - Keys are cached with a configurable TTL
//! - A token naming an unknown `kid` triggers a refresh (key rotation)
//! - Refreshes are serialized; callers that queued behind a refresh reuse
//!   its result instead of fetching again
//! - No refresh starts within `min_refresh_interval` of the previous attempt
//! - Stale cache is used on fetch failure (fail-open for availability)
//!
//! Verifications that hit the cache only take the read lock and are never
//! held up by an in-flight fetch.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey};
use tokio::sync::{Mutex, RwLock};
use url::Url;

use super::error::AuthError;

/// Default JWKS cache TTL (5 minutes).
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Default minimum interval between two refresh attempts.
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Where signing keys come from.
#[async_trait]
pub trait KeySource: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, AuthError>;
}

/// Fetches the key set from the identity provider's JWKS endpoint.
pub struct RemoteKeySource {
    url: Url,
    client: reqwest::Client,
}

impl RemoteKeySource {
    pub fn new(url: Url) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl KeySource for RemoteKeySource {
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeySetUnavailable(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))
    }
}

/// A fixed key set, for tests and for deployments that pin keys.
pub struct StaticKeySource(JwkSet);

impl StaticKeySource {
    pub fn new(keys: JwkSet) -> Self {
        Self(keys)
    }
}

#[async_trait]
impl KeySource for StaticKeySource {
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        Ok(self.0.clone())
    }
}

/// JWKS cache entry.
struct CacheEntry {
    jwks: JwkSet,
    fetched_at: Instant,
}

/// Process-wide signing key cache.
pub struct JwksCache {
    source: Arc<dyn KeySource>,
    cache_ttl: Duration,
    min_refresh_interval: Duration,
    cache: RwLock<Option<CacheEntry>>,
    /// Serializes refreshes; holds the time of the last attempt.
    refresh_gate: Mutex<Option<Instant>>,
}

impl JwksCache {
    pub fn new(source: Arc<dyn KeySource>) -> Self {
        Self {
            source,
            cache_ttl: DEFAULT_CACHE_TTL,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            cache: RwLock::new(None),
            refresh_gate: Mutex::new(None),
        }
    }

    /// Create with custom cache TTL.
    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Create with a custom minimum interval between refreshes.
    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// Resolve the decoding key for `kid`, refreshing the set if the key is
    /// unknown or the cache has gone stale.
    pub async fn decoding_key(
        &self,
        kid: &str,
        algorithm: Algorithm,
    ) -> Result<DecodingKey, AuthError> {
        if let Lookup::Fresh(jwk) = self.lookup(kid).await {
            return jwk_to_decoding_key(&jwk, algorithm);
        }

        self.refresh_if_due().await?;

        match self.lookup(kid).await {
            Lookup::Fresh(jwk) | Lookup::Stale(jwk) => jwk_to_decoding_key(&jwk, algorithm),
            Lookup::Missing => Err(AuthError::InvalidKeyId),
            Lookup::Empty => Err(AuthError::KeySetUnavailable(
                "no key set has been fetched yet".into(),
            )),
        }
    }

    async fn lookup(&self, kid: &str) -> Lookup {
        let cache = self.cache.read().await;
        let Some(entry) = &*cache else {
            return Lookup::Empty;
        };
        match entry.jwks.find(kid) {
            Some(jwk) if entry.fetched_at.elapsed() < self.cache_ttl => Lookup::Fresh(jwk.clone()),
            Some(jwk) => Lookup::Stale(jwk.clone()),
            None => Lookup::Missing,
        }
    }

    /// Refresh the key set unless another task just did, or the last attempt
    /// was less than `min_refresh_interval` ago.
    ///
    /// Fails only when the fetch fails and nothing is cached.
    pub async fn refresh_if_due(&self) -> Result<(), AuthError> {
        let requested_at = Instant::now();
        let mut last_attempt = self.refresh_gate.lock().await;

        // Someone refreshed while we were queued on the gate.
        if let Some(entry) = &*self.cache.read().await {
            if entry.fetched_at >= requested_at {
                return Ok(());
            }
        }

        if let Some(at) = *last_attempt {
            if at.elapsed() < self.min_refresh_interval {
                tracing::debug!(
                    since_last_ms = at.elapsed().as_millis() as u64,
                    "JWKS refresh suppressed by backoff"
                );
                return self.ensure_cached().await;
            }
        }

        *last_attempt = Some(Instant::now());
        match self.source.fetch().await {
            Ok(jwks) => {
                tracing::info!(keys = jwks.keys.len(), "JWKS refreshed");
                let mut cache = self.cache.write().await;
                *cache = Some(CacheEntry {
                    jwks,
                    fetched_at: Instant::now(),
                });
                Ok(())
            }
            Err(e) => {
                if self.cache.read().await.is_some() {
                    tracing::warn!(error = %e, "JWKS refresh failed, keeping stale keys");
                    Ok(())
                } else {
                    tracing::error!(error = %e, "JWKS fetch failed and no keys are cached");
                    Err(e)
                }
            }
        }
    }

    async fn ensure_cached(&self) -> Result<(), AuthError> {
        if self.cache.read().await.is_some() {
            Ok(())
        } else {
            Err(AuthError::KeySetUnavailable(
                "previous fetch failed, retry pending".into(),
            ))
        }
    }

    /// Check if JWKS is currently cached and valid.
    pub async fn is_cached(&self) -> bool {
        let cache = self.cache.read().await;
        if let Some(entry) = &*cache {
            entry.fetched_at.elapsed() < self.cache_ttl
        } else {
            false
        }
    }
}

enum Lookup {
    Fresh(Jwk),
    Stale(Jwk),
    Missing,
    Empty,
}

/// Convert a JWK to a DecodingKey, refusing keys published for a different
/// algorithm than the one tokens must use.
fn jwk_to_decoding_key(jwk: &Jwk, algorithm: Algorithm) -> Result<DecodingKey, AuthError> {
    if let Some(declared) = jwk.common.key_algorithm {
        if !key_algorithm_matches(declared, algorithm) {
            tracing::warn!(
                kid = ?jwk.common.key_id,
                declared = ?declared,
                required = ?algorithm,
                "JWK is published for a different algorithm"
            );
            return Err(AuthError::InvalidSignature);
        }
    }

    DecodingKey::from_jwk(jwk).map_err(|e| {
        tracing::warn!(kid = ?jwk.common.key_id, error = %e, "unusable JWK in key set");
        AuthError::InvalidKeyId
    })
}

fn key_algorithm_matches(declared: KeyAlgorithm, required: Algorithm) -> bool {
    matches!(
        (declared, required),
        (KeyAlgorithm::RS256, Algorithm::RS256)
            | (KeyAlgorithm::RS384, Algorithm::RS384)
            | (KeyAlgorithm::RS512, Algorithm::RS512)
            | (KeyAlgorithm::PS256, Algorithm::PS256)
            | (KeyAlgorithm::PS384, Algorithm::PS384)
            | (KeyAlgorithm::PS512, Algorithm::PS512)
            | (KeyAlgorithm::ES256, Algorithm::ES256)
            | (KeyAlgorithm::ES384, Algorithm::ES384)
            | (KeyAlgorithm::EdDSA, Algorithm::EdDSA)
    )
}
