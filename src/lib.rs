//! Link bookmarking: a link service with view statistics, a user service keyed
//! by Telegram identity, and a Telegram bot in front of both.

pub mod bot;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod server;
pub mod services;
pub mod stats;
pub mod telemetry;

pub use error::{Error, Result};
