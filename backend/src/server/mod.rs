//! Server construction and middleware wiring.
//!
//! Builds the actix application from the configured ports: Diesel-backed
//! adapters when a database is configured, the in-memory store otherwise.
//! Swagger UI is mounted in debug builds only.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::memory::MemoryRedemptionStore;
use crate::domain::ports::{InventoryQuery, RedeemCommand};
use crate::domain::{InventoryReadService, RedemptionCoordinator};
use crate::inbound::http::error::json_payload_error;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::inventory::{code_status, peek_next, stats};
use crate::inbound::http::redemptions::redeem;
use crate::inbound::http::state::HttpState;
use crate::middleware::trace::Trace;
use crate::outbound::persistence::{
    DbPool, DieselInventoryReader, DieselRedemptionStore, PoolConfig,
};

/// Build the HTTP state from configuration.
///
/// With a database URL, the Diesel adapters back both ports. Without one,
/// the in-memory store serves single-process deployments and local
/// development; its contents do not survive a restart.
async fn build_http_state(config: &ServerConfig) -> std::io::Result<HttpState> {
    let (redeem_port, inventory): (Arc<dyn RedeemCommand>, Arc<dyn InventoryQuery>) =
        match &config.database_url {
            Some(url) => {
                let pool = DbPool::new(PoolConfig::new(url.clone()))
                    .await
                    .map_err(|err| std::io::Error::other(err.to_string()))?;
                info!("using PostgreSQL-backed store");
                let store = Arc::new(DieselRedemptionStore::new(pool.clone()));
                let reader = Arc::new(DieselInventoryReader::new(pool));
                (
                    Arc::new(
                        RedemptionCoordinator::new(store)
                            .with_deadline(config.redeem_deadline),
                    ),
                    Arc::new(InventoryReadService::new(reader)),
                )
            }
            None => {
                warn!("DATABASE_URL not set; serving from an in-memory store (dev only)");
                let store = Arc::new(MemoryRedemptionStore::new());
                (
                    Arc::new(
                        RedemptionCoordinator::new(Arc::clone(&store))
                            .with_deadline(config.redeem_deadline),
                    ),
                    Arc::new(InventoryReadService::new(store)),
                )
            }
        };

    Ok(HttpState::new(redeem_port, inventory, config.credential.clone()))
}

/// Assemble the actix application: API scope, trace middleware, health
/// probes, and (debug builds) Swagger UI.
pub fn build_app(
    state: HttpState,
    health_state: web::Data<HealthState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope("/api/v1")
        .service(redeem)
        .service(code_status)
        .service(peek_next)
        .service(stats);

    let mut app = App::new()
        .app_data(web::Data::new(state))
        .app_data(health_state)
        .app_data(web::JsonConfig::default().error_handler(json_payload_error))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    {
        app = app.service(
            SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    app
}

/// Wait for a termination request: SIGTERM (orchestrators) or Ctrl-C.
#[cfg(unix)]
async fn shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result,
        _ = terminate.recv() => Ok(()),
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}

/// Bind and run the server until shutdown.
///
/// Signal handling is owned here rather than by actix so the liveness probe
/// flips to 503 before the worker drain starts, giving orchestrators time to
/// stop routing.
///
/// # Errors
///
/// Returns an error when state building or binding fails.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let state = build_http_state(&config).await?;

    let health_state = web::Data::new(HealthState::new());
    // Clone for the server factory so the readiness probe stays shared.
    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(state.clone(), server_health_state.clone())
    })
    .disable_signals()
    .bind(config.bind_addr)?
    .run();

    let handle = server.handle();
    let drain_state = health_state.clone();
    tokio::spawn(async move {
        match shutdown_signal().await {
            Ok(()) => {
                info!("shutdown requested; draining connections");
                drain_state.mark_unhealthy();
                handle.stop(true).await;
            }
            Err(err) => warn!(error = %err, "signal listener failed; relying on external stop"),
        }
    });

    health_state.mark_ready();
    server.await
}
