use std::sync::Arc;

use clap::Parser;
use linkkeeper::{
    config::ApiConfig,
    db::{self, SqliteLinkRepository},
    server::{self, ApiState},
    services::LinkService,
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (ignore error if file is absent, env vars may already be set)
    dotenvy::dotenv().ok();

    let config = ApiConfig::parse();
    telemetry::init("api_service=info,linkkeeper=info,tower_http=info", &config.env);
    tracing::info!("Starting api-service ({}) on {}", config.env, config.http_addr);

    let pool = db::connect(&config.database_url).await?;
    db::migrate_links(&pool).await?;

    let links = LinkService::new(Arc::new(SqliteLinkRepository::new(pool.clone())));
    let app = server::api_router(Arc::new(ApiState { links }));

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    server::serve(listener, app).await?;
    pool.close().await;
    Ok(())
}
