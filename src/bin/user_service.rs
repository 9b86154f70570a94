use std::sync::Arc;

use clap::Parser;
use linkkeeper::{
    config::UserConfig,
    db::{self, SqliteUserRepository},
    server::{self, UserState},
    services::UserService,
    telemetry,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = UserConfig::parse();
    telemetry::init("user_service=info,linkkeeper=info,tower_http=info", &config.env);
    tracing::info!("Starting user-service ({}) on {}", config.env, config.http_addr);

    let pool = db::connect(&config.database_url).await?;
    db::migrate_users(&pool).await?;

    let users = UserService::new(Arc::new(SqliteUserRepository::new(pool.clone())));
    let app = server::user_router(Arc::new(UserState { users }));

    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    server::serve(listener, app).await?;
    pool.close().await;
    Ok(())
}
