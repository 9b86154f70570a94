use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;

const DEFAULT_BOT_TIMEOUT_SECS: u64 = 10;

/// Settings for the link (API) service.
#[derive(Debug, Clone, Parser)]
#[command(name = "api-service", about = "Saved links and view statistics over HTTP")]
pub struct ApiConfig {
    /// Runtime environment tag, e.g. "dev" or "prod"
    #[arg(long, env = "ENV", default_value = "dev")]
    pub env: String,

    /// Address in the form "host:port" the HTTP server listens on
    #[arg(long = "http-addr", env = "HTTP_ADDR", default_value = "0.0.0.0:8080")]
    pub http_addr: String,

    /// SQLite connection string, e.g. "sqlite:./links.db"
    #[arg(long = "database-url", env = "DATABASE_URL", default_value = "sqlite:./links.db")]
    pub database_url: String,
}

/// Settings for the user service.
#[derive(Debug, Clone, Parser)]
#[command(name = "user-service", about = "Telegram-linked user accounts over HTTP")]
pub struct UserConfig {
    #[arg(long, env = "ENV", default_value = "dev")]
    pub env: String,

    #[arg(long = "http-addr", env = "HTTP_ADDR", default_value = "0.0.0.0:8081")]
    pub http_addr: String,

    #[arg(long = "database-url", env = "DATABASE_URL", default_value = "sqlite:./users.db")]
    pub database_url: String,
}

/// Settings for the Telegram bot.
#[derive(Clone, Parser)]
#[command(name = "bot-service", about = "Telegram front end for the link and user services")]
pub struct BotConfig {
    #[arg(long, env = "ENV", default_value = "dev")]
    pub env: String,

    /// Bot token issued by @BotFather
    #[arg(long = "telegram-token", env = "TELEGRAM_TOKEN", default_value = "", hide_env_values = true)]
    pub telegram_token: String,

    /// Base URL of the link service, e.g. "http://localhost:8080"
    #[arg(long = "api-base-url", env = "API_BASE_URL", default_value = "")]
    pub api_base_url: String,

    /// Base URL of the user service, e.g. "http://localhost:8081"
    #[arg(long = "user-service-url", env = "USER_SERVICE_URL", default_value = "")]
    pub user_service_url: String,

    /// Timeout applied to every outbound call, in seconds
    #[arg(long = "timeout-seconds", env = "BOT_TIMEOUT_SECONDS", default_value_t = DEFAULT_BOT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

impl BotConfig {
    /// Reject missing required settings and normalise the rest.
    pub fn validate(mut self) -> Result<Self> {
        if self.telegram_token.trim().is_empty() {
            bail!("TELEGRAM_TOKEN must be set in the environment or .env file");
        }
        if self.api_base_url.trim().is_empty() {
            bail!("API_BASE_URL must be set in the environment or .env file");
        }
        if self.user_service_url.trim().is_empty() {
            bail!("USER_SERVICE_URL must be set in the environment or .env file");
        }
        if self.timeout_secs == 0 {
            self.timeout_secs = DEFAULT_BOT_TIMEOUT_SECS;
        }

        self.api_base_url = self.api_base_url.trim().trim_end_matches('/').to_owned();
        self.user_service_url = self.user_service_url.trim().trim_end_matches('/').to_owned();
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("env", &self.env)
            .field("telegram_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("user_service_url", &self.user_service_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
