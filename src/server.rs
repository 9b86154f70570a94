use std::{future::IntoFuture, sync::Arc, time::Duration};

use axum::{
    routing::{get, post},
    Router,
};
use tokio::{net::TcpListener, sync::watch};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    handlers,
    services::{LinkService, UserService},
};

/// Deadline for handling a single request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// How long in-flight requests may keep running after a shutdown signal.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

// ── Shared application state ───────────────────────────────────────────────

pub struct ApiState {
    pub links: LinkService,
}

pub struct UserState {
    pub users: UserService,
}

// ── Routers ────────────────────────────────────────────────────────────────

/// Routes of the link service.
pub fn api_router(state: Arc<ApiState>) -> Router {
    use handlers::links;

    let api = Router::new()
        .route("/links", post(links::create_link).get(links::list_links))
        .route("/links/random", get(links::random_link))
        .route(
            "/links/:id",
            get(links::get_link)
                .patch(links::update_link)
                .delete(links::delete_link),
        )
        .route("/links/:id/viewed", post(links::mark_viewed))
        .route("/stats/views", get(links::view_stats));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
}

/// Routes of the user service.
pub fn user_router(state: Arc<UserState>) -> Router {
    use handlers::users;

    let api = Router::new()
        .route("/users", post(users::get_or_create_user))
        .route("/users/:id", get(users::get_user))
        .route("/users/telegram/:telegram_id", get(users::get_user_by_telegram_id))
        .route("/users/telegram/:telegram_id/exists", get(users::user_exists));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(TraceLayer::new_for_http())
}

// ── Serve ──────────────────────────────────────────────────────────────────

/// Serve `app` until SIGINT/SIGTERM, then drain in-flight requests for at
/// most [`SHUTDOWN_GRACE`].
pub async fn serve(listener: TcpListener, app: Router) -> anyhow::Result<()> {
    let (signalled_tx, mut signalled_rx) = watch::channel(false);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, draining connections");
            let _ = signalled_tx.send(true);
        })
        .into_future();

    let grace = async move {
        if signalled_rx.wait_for(|signalled| *signalled).await.is_err() {
            std::future::pending::<()>().await;
        }
        tokio::time::sleep(SHUTDOWN_GRACE).await;
    };

    tokio::select! {
        res = server => res?,
        _ = grace => tracing::warn!("Grace period elapsed with requests still in flight"),
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
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
