pub mod appresult;
pub mod auth;
pub mod config;
pub mod db;
pub mod profiles;
pub mod rooms;
pub mod store;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    extract::{FromRef, FromRequest, FromRequestParts},
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use appresult::{AppError, AppResult, TransferSide};

use crate::{auth::CodeExchange, config::Config, store::Store};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: Store,
    pub wechat: Arc<dyn CodeExchange>,
}

/// `axum::Json` whose rejection is reported as [`AppError::BadRequest`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` whose rejection is reported as [`AppError::BadRequest`].
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth::router())
        .merge(rooms::router())
        .merge(profiles::router());

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

pub async fn serve(config: &Config, state: AppState) -> anyhow::Result<()> {
    let addr = config.listen_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, "listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("failed to serve API")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
        return;
    }
    tracing::info!("shutting down");
}
