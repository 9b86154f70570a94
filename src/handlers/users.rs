use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::json_body;
use crate::{
    error::{Error, Result},
    models::{NewUser, User},
    server::UserState,
};

#[derive(Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    telegram_id: i64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
}

#[derive(Serialize)]
pub struct ExistsResponse {
    exists: bool,
}

/// POST /api/v1/users
///
/// Get-or-create keyed by `telegram_id`; an existing user is returned as-is.
pub async fn get_or_create_user(
    State(state): State<Arc<UserState>>,
    body: std::result::Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Json<User>> {
    let req = json_body(body)?;
    let user = state
        .users
        .get_or_create(NewUser {
            telegram_id: req.telegram_id,
            username: non_blank(req.username),
            first_name: non_blank(req.first_name),
            last_name: non_blank(req.last_name),
        })
        .await?;

    Ok(Json(user))
}

/// GET /api/v1/users/:id
pub async fn get_user(State(state): State<Arc<UserState>>, Path(id): Path<String>) -> Result<Json<User>> {
    let id = Uuid::parse_str(&id).map_err(|_| Error::invalid("id", "must be a UUID"))?;
    Ok(Json(state.users.get(&id.to_string()).await?))
}

/// GET /api/v1/users/telegram/:telegram_id
pub async fn get_user_by_telegram_id(
    State(state): State<Arc<UserState>>,
    Path(raw): Path<String>,
) -> Result<Json<User>> {
    let telegram_id = parse_telegram_id(&raw)?;
    Ok(Json(state.users.get_by_telegram_id(telegram_id).await?))
}

/// GET /api/v1/users/telegram/:telegram_id/exists
pub async fn user_exists(
    State(state): State<Arc<UserState>>,
    Path(raw): Path<String>,
) -> Result<Json<ExistsResponse>> {
    let telegram_id = parse_telegram_id(&raw)?;
    let exists = state.users.exists(telegram_id).await?;
    Ok(Json(ExistsResponse { exists }))
}

// ── Private helpers ────────────────────────────────────────────────────────

fn parse_telegram_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::invalid("telegram_id", "must be an integer"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
