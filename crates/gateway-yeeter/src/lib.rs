pub mod admission_request;
pub mod admission_response;
pub mod api;
mod certs;
pub mod cli;
pub mod config;
pub mod errors;
pub mod mutation;
pub mod tracing;

use ::tracing::info;
use anyhow::{anyhow, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use tower_http::trace::{self, TraceLayer};

use crate::api::handlers::{healthz_handler, mutate_handler};
use crate::config::{Config, MAX_REQUEST_BODY_SIZE};

pub struct GatewayYeeter {
    router: Router,
    tls_config: RustlsConfig,
    addr: SocketAddr,
}

impl GatewayYeeter {
    /// Loads the TLS certificate and builds the router. Failing to load the
    /// certificate is fatal: the webhook cannot be served over plain HTTP.
    pub async fn new_from_config(config: Config) -> Result<Self> {
        let tls_config = certs::create_tls_config_and_watch_certificate_changes(config.tls_config)
            .await
            .map_err(|e| anyhow!("Cannot setup TLS: {e}"))?;

        Ok(Self {
            router: router(),
            tls_config,
            addr: config.addr,
        })
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn run(self) -> Result<()> {
        info!(address = self.addr.to_string().as_str(), "started HTTPS server");
        axum_server::bind_rustls(self.addr, self.tls_config)
            .serve(self.router.into_make_service())
            .await?;

        Ok(())
    }
}

/// The webhook routes. The router holds no state and is shared by all the requests.
pub fn router() -> Router {
    Router::new()
        .route("/mutate", post(mutate_handler))
        .route("/healthz", get(healthz_handler))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE))
        .layer(
            TraceLayer::new_for_http()
                .on_request(trace::DefaultOnRequest::new().level(::tracing::Level::DEBUG))
                .on_response(trace::DefaultOnResponse::new().level(::tracing::Level::DEBUG)),
        )
}
