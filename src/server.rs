/// HTTP server setup and routing
use crate::{
    api::{self, middleware as pr_middleware},
    context::AppContext,
    error::{PrError, PrResult},
};
use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::Json,
    Router,
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Build the main application router.
///
/// Health and metrics routes are included unless a separate monitoring port is configured.
pub fn build_router(ctx: AppContext) -> Router {
    let mut routes = api::routes();
    if !ctx.config.separate_monitoring() {
        routes = routes.merge(api::health::routes());
    }

    let router = Router::new().merge(routes).with_state(ctx.clone());
    with_layers(router, ctx.config.body_limit()).fallback(not_found)
}

/// Wrap routes in the request stack: body limit, fault handling, metrics, logging
pub fn with_layers(router: Router, body_limit: usize) -> Router {
    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(pr_middleware::handle_panic))
        .layer(middleware::from_fn(pr_middleware::track_operations))
        .layer(middleware::from_fn(pr_middleware::log_failures))
        .layer(TraceLayer::new_for_http())
}

/// Build the router served on the monitoring port
pub fn build_monitoring_router(ctx: AppContext) -> Router {
    api::health::routes()
        .with_state(ctx)
        .layer(CatchPanicLayer::custom(pr_middleware::handle_panic))
        .layer(middleware::from_fn(pr_middleware::log_failures))
        .fallback(not_found)
}

/// 404 handler
async fn not_found() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "code": 0,
            "message": "Endpoint not found"
        })),
    )
}

/// Start the HTTP server(s)
pub async fn serve(ctx: AppContext) -> PrResult<()> {
    let app = build_router(ctx.clone());

    if ctx.config.service.do_not_start {
        warn!("Not starting the application");
        return Ok(());
    }

    if let Some(monitoring_addr) = ctx.monitoring_addr() {
        let monitoring = build_monitoring_router(ctx.clone());
        let listener = bind(&monitoring_addr).await?;
        info!("Monitoring listening on {}", monitoring_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, monitoring)
                .with_graceful_shutdown(shutdown_signal())
                .await
            {
                tracing::error!("Monitoring server error: {}", e);
            }
        });
    }

    let addr = ctx.service_addr();
    let listener = bind(&addr).await?;
    info!("Starting application...");
    info!("PR mock v{} listening on {}", ctx.config.service.version, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PrError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}

async fn bind(addr: &str) -> PrResult<tokio::net::TcpListener> {
    tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| PrError::Internal(format!("Failed to bind to {}: {}", addr, e)))
}

/// Wait for SIGTERM or SIGINT signal
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C signal"),
            Err(e) => tracing::error!("Failed to listen for Ctrl+C: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received SIGTERM signal");
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
