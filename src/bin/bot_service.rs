use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use linkkeeper::{
    bot::{
        self,
        client::{LinksClient, UsersClient},
        BotContext, Menu,
    },
    config::BotConfig,
    telemetry,
};
use teloxide::Bot;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = BotConfig::parse().validate()?;
    telemetry::init("bot_service=info,linkkeeper=info,teloxide=warn", &config.env);
    tracing::info!("Starting bot-service ({})", config.env);
    tracing::info!("Link service: {}", config.api_base_url);
    tracing::info!("User service: {}", config.user_service_url);

    let ctx = Arc::new(BotContext {
        links: LinksClient::new(&config.api_base_url, config.timeout()).context("API_BASE_URL")?,
        users: UsersClient::new(&config.user_service_url, config.timeout()).context("USER_SERVICE_URL")?,
        menu: Menu::new(),
    });

    let bot = Bot::new(config.telegram_token.clone());
    bot::run(bot, ctx).await;

    tracing::info!("Bot stopped");
    Ok(())
}
