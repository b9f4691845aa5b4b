// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use casting_agency::{
    api::router,
    auth::{Authorizer, JwksCache, RemoteKeySource, TokenVerifier},
    config::{Settings, DEFAULT_LOG_FILTER, LOG_FORMAT_ENV},
    state::AppState,
    storage::CastingDatabase,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Cancel `shutdown` on Ctrl+C or SIGTERM.
async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C"),
        _ = terminate => tracing::info!("received SIGTERM"),
    }
    shutdown.cancel();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let settings = Settings::from_env()?;
    let auth = &settings.auth;

    let source = RemoteKeySource::new(auth.jwks_url.clone())?;
    let keys = Arc::new(
        JwksCache::new(Arc::new(source))
            .with_cache_ttl(auth.cache_ttl)
            .with_min_refresh_interval(auth.min_refresh_interval),
    );

    // A failed warm-up is not fatal: requests retry once the backoff lapses.
    match keys.refresh_if_due().await {
        Ok(()) => tracing::info!(url = %auth.jwks_url, "JWKS loaded"),
        Err(e) => tracing::warn!(url = %auth.jwks_url, error = %e, "JWKS warm-up failed"),
    }

    let verifier = TokenVerifier::new(keys, auth.issuer.clone(), auth.audience.clone())
        .with_algorithm(auth.algorithm)
        .with_leeway(auth.leeway);

    let db = CastingDatabase::open(&settings.database_path)?;
    tracing::info!(path = %settings.database_path.display(), "database opened");

    let app = router(AppState::new(db, Authorizer::new(verifier)));

    let listener = TcpListener::bind(settings.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        issuer = %auth.issuer,
        audience = %auth.audience,
        "Casting Agency API listening (docs at /docs)"
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}
