use std::{future::IntoFuture, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use linkkeeper::{
    bot::{
        client::{ChatUser, ClientError, LinksClient, UsersClient},
        commands::{self, Action},
        BotContext, Menu,
    },
    db::{self, SqliteLinkRepository, SqliteUserRepository},
    server::{self, ApiState, UserState},
    services::{LinkService, UserService},
};

async fn spawn(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(axum::serve(listener, app).into_future());
    addr
}

async fn setup() -> BotContext {
    let link_pool = db::connect_in_memory().await.unwrap();
    db::migrate_links(&link_pool).await.unwrap();
    let links = LinkService::new(Arc::new(SqliteLinkRepository::new(link_pool)));
    let api = spawn(server::api_router(Arc::new(ApiState { links }))).await;

    let user_pool = db::connect_in_memory().await.unwrap();
    db::migrate_users(&user_pool).await.unwrap();
    let users = UserService::new(Arc::new(SqliteUserRepository::new(user_pool)));
    let user_api = spawn(server::user_router(Arc::new(UserState { users }))).await;

    let timeout = Duration::from_secs(5);
    BotContext {
        links: LinksClient::new(&format!("http://{api}"), timeout).unwrap(),
        users: UsersClient::new(&format!("http://{user_api}/"), timeout).unwrap(),
        menu: Menu::new(),
    }
}

fn sender() -> ChatUser {
    ChatUser {
        telegram_id: 1001,
        username: Some("reader".into()),
        first_name: Some("Ada".into()),
        last_name: None,
    }
}

#[tokio::test]
async fn start_registers_sender_once() {
    let ctx = setup().await;

    assert!(!ctx.users.user_exists(1001).await.unwrap());

    let reply = ctx.respond(Action::Start, Some(&sender())).await;
    assert_eq!(reply, "Hi, Ada! Choose an action:");

    let renamed = ChatUser {
        first_name: Some("Someone".into()),
        ..sender()
    };
    let reply = ctx.respond(Action::Start, Some(&renamed)).await;
    assert_eq!(reply, "Hi, Ada! Choose an action:");

    let user = ctx.users.user_by_telegram_id(1001).await.unwrap();
    assert_eq!(user.username.as_deref(), Some("reader"));
    assert!(ctx.users.user_exists(1001).await.unwrap());
}

#[tokio::test]
async fn save_view_and_random_round_trip() {
    let ctx = setup().await;

    let reply = ctx
        .respond(commands::parse("/random").unwrap(), None)
        .await;
    assert_eq!(reply, "failed to get random link");

    let reply = ctx
        .respond(commands::parse("/save https://example.com/read-me").unwrap(), None)
        .await;
    let id = reply.strip_prefix("saved ✅ id: ").expect(&reply).to_owned();

    let reply = ctx.respond(Action::Viewed(id.clone()), None).await;
    assert_eq!(reply, "marked viewed ✅");

    let reply = ctx.respond(Action::Random(None), None).await;
    assert_eq!(reply, format!("random ✅\nhttps://example.com/read-me\nID: {id}"));

    let reply = ctx
        .respond(commands::parse(commands::BTN_RANDOM_VIDEO).unwrap(), None)
        .await;
    assert_eq!(reply, "failed to get random video");
}

#[tokio::test]
async fn unknown_link_fails_opaquely() {
    let ctx = setup().await;

    let reply = ctx.respond(Action::Viewed("does-not-exist".into()), None).await;
    assert_eq!(reply, "failed to mark viewed");

    let err = ctx.links.mark_viewed("does-not-exist").await.unwrap_err();
    assert!(matches!(err, ClientError::Status(s) if s.as_u16() == 404));
}

#[tokio::test]
async fn unreachable_upstream_is_a_failure_message() {
    let ctx = BotContext {
        links: LinksClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap(),
        users: UsersClient::new("http://127.0.0.1:1", Duration::from_secs(1)).unwrap(),
        menu: Menu::new(),
    };

    assert_eq!(
        ctx.respond(Action::Save("https://x.io".into()), None).await,
        "failed to save link"
    );
    assert_eq!(
        ctx.respond(Action::Start, Some(&sender())).await,
        "failed to register you, try /start again later"
    );
}
