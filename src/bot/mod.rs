//! Telegram front end: turns chat input into calls against the link and user
//! services and renders the outcome as a chat reply.

use std::{num::TryFromIntError, sync::Arc};

use teloxide::{
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup, User, UserId},
};

pub mod client;
pub mod commands;

use client::{ChatUser, LinksClient, RemoteLink, UsersClient};
use commands::{Action, BTN_RANDOM, BTN_RANDOM_ARTICLE, BTN_RANDOM_VIDEO, BTN_SAVE, BTN_VIEWED};

const HELP: &str = "commands: /save <url>, /viewed <id>, /random [resource]";
const REGISTER_FAILED: &str = "failed to register you, try /start again later";

// ── Menu ───────────────────────────────────────────────────────────────────

/// Reply keyboard shown under every bot message. Built once at start-up.
#[derive(Clone, Debug)]
pub struct Menu {
    keyboard: KeyboardMarkup,
}

impl Menu {
    pub fn new() -> Self {
        let keyboard = KeyboardMarkup::new(vec![
            vec![KeyboardButton::new(BTN_SAVE), KeyboardButton::new(BTN_VIEWED)],
            vec![KeyboardButton::new(BTN_RANDOM)],
            vec![
                KeyboardButton::new(BTN_RANDOM_ARTICLE),
                KeyboardButton::new(BTN_RANDOM_VIDEO),
            ],
        ])
        .resize_keyboard();

        Self { keyboard }
    }

    pub fn keyboard(&self) -> KeyboardMarkup {
        self.keyboard.clone()
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

// ── Context ────────────────────────────────────────────────────────────────

/// Everything a chat handler needs, injected into the dispatcher.
pub struct BotContext {
    pub links: LinksClient,
    pub users: UsersClient,
    pub menu: Menu,
}

impl BotContext {
    /// Perform `action` and return the reply text.
    ///
    /// Upstream failures are logged and rendered as a short failure message;
    /// no error detail reaches the chat.
    pub async fn respond(&self, action: Action, sender: Option<&ChatUser>) -> String {
        match action {
            Action::Start => self.start(sender).await,

            Action::Save(url) if url.is_empty() => "usage: /save <url>".into(),
            Action::Save(url) => match self.links.create_link(&url).await {
                Ok(id) => format!("saved ✅ id: {id}"),
                Err(e) => {
                    tracing::error!(url = %url, error = %e, "Create link failed");
                    "failed to save link".into()
                }
            },

            Action::Viewed(id) if id.is_empty() => "usage: /viewed <id>".into(),
            Action::Viewed(id) => match self.links.mark_viewed(&id).await {
                Ok(_) => "marked viewed ✅".into(),
                Err(e) => {
                    tracing::error!(id = %id, error = %e, "Mark viewed failed");
                    "failed to mark viewed".into()
                }
            },

            Action::Random(resource) => match self.links.random_link(resource.as_deref()).await {
                Ok(link) => render_random(&link),
                Err(e) => {
                    let resource = resource.unwrap_or_default();
                    tracing::error!(resource = %resource, error = %e, "Random link failed");
                    if resource.is_empty() {
                        "failed to get random link".into()
                    } else {
                        format!("failed to get random {resource}")
                    }
                }
            },

            Action::SaveHint => "Send link: /save <url>".into(),
            Action::ViewedHint => "Send id: /viewed <id>".into(),
            Action::Unknown => "unknown command, try /save, /viewed, /random".into(),
            Action::Help => HELP.into(),
        }
    }

    /// Like [`respond`](Self::respond), for a sender whose Telegram id may
    /// not have fit the user service's id type.
    pub async fn respond_from(
        &self,
        action: Action,
        sender: Result<Option<ChatUser>, TryFromIntError>,
    ) -> String {
        match sender {
            Ok(sender) => self.respond(action, sender.as_ref()).await,
            Err(e) if action == Action::Start => {
                tracing::error!(error = %e, "Sender id out of range");
                REGISTER_FAILED.into()
            }
            Err(_) => self.respond(action, None).await,
        }
    }

    async fn start(&self, sender: Option<&ChatUser>) -> String {
        let Some(sender) = sender else {
            return "Choose an action:".into();
        };

        match self.users.get_or_create_user(sender).await {
            Ok(user) => {
                let name = user
                    .first_name
                    .or(user.username)
                    .unwrap_or_else(|| "there".into());
                format!("Hi, {name}! Choose an action:")
            }
            Err(e) => {
                tracing::error!(telegram_id = sender.telegram_id, error = %e, "Get-or-create user failed");
                REGISTER_FAILED.into()
            }
        }
    }
}

fn render_random(link: &RemoteLink) -> String {
    if link.url.is_empty() {
        return "no links found".into();
    }
    let mut msg = format!("random ✅\n{}\nID: {}", link.url, link.id);
    if !link.resource.is_empty() {
        msg.push_str("\nResource: ");
        msg.push_str(&link.resource);
    }
    msg
}

fn telegram_id(id: UserId) -> Result<i64, TryFromIntError> {
    i64::try_from(id.0)
}

fn chat_user(user: &User) -> Result<ChatUser, TryFromIntError> {
    Ok(ChatUser {
        telegram_id: telegram_id(user.id)?,
        username: user.username.clone(),
        first_name: Some(user.first_name.clone()).filter(|n| !n.is_empty()),
        last_name: user.last_name.clone(),
    })
}

// ── Dispatch ───────────────────────────────────────────────────────────────

async fn handle_message(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> ResponseResult<()> {
    let action = match msg.text() {
        Some(text) => match commands::parse(text) {
            Some(action) => action,
            None => return Ok(()),
        },
        // Photos, stickers, etc.
        None => Action::Help,
    };

    let sender = msg.from.as_ref().map(chat_user).transpose();
    let reply = ctx.respond_from(action, sender).await;

    bot.send_message(msg.chat.id, reply)
        .reply_markup(ctx.menu.keyboard())
        .await?;
    Ok(())
}

/// Long-poll Telegram until Ctrl-C.
pub async fn run(bot: Bot, ctx: Arc<BotContext>) {
    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![ctx])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}
