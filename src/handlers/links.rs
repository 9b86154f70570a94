use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use super::json_body;
use crate::{
    error::Result,
    models::{Link, LinkUpdate, NewLink, ViewStat},
    server::ApiState,
};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

// ── Request types ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateLinkRequest {
    url: String,
    #[serde(default)]
    resource: String,
}

#[derive(Deserialize)]
pub struct UpdateLinkRequest {
    url: Option<String>,
    resource: Option<String>,
}

/// Query parameters are taken as raw strings so that garbage falls back to
/// defaults instead of failing the request.
#[derive(Deserialize)]
pub struct ListParams {
    limit: Option<String>,
    offset: Option<String>,
}

#[derive(Deserialize)]
pub struct RandomParams {
    resource: Option<String>,
}

#[derive(Deserialize)]
pub struct StatsParams {
    days: Option<String>,
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// POST /api/v1/links
pub async fn create_link(
    State(state): State<Arc<ApiState>>,
    body: std::result::Result<Json<CreateLinkRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let req = json_body(body)?;
    let link = state
        .links
        .create(NewLink {
            url: req.url,
            resource: req.resource,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(link)))
}

/// GET /api/v1/links?limit=&offset=
pub async fn list_links(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Link>>> {
    let (limit, offset) = page(params.limit.as_deref(), params.offset.as_deref());
    let links = state.links.list(limit, offset).await?;
    Ok(Json(links))
}

/// GET /api/v1/links/random?resource=
pub async fn random_link(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<RandomParams>,
) -> Result<Json<Link>> {
    let link = state.links.random(params.resource.as_deref()).await?;
    Ok(Json(link))
}

/// GET /api/v1/links/:id
pub async fn get_link(State(state): State<Arc<ApiState>>, Path(id): Path<String>) -> Result<Json<Link>> {
    Ok(Json(state.links.get(&id).await?))
}

/// PATCH /api/v1/links/:id
pub async fn update_link(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<String>,
    body: std::result::Result<Json<UpdateLinkRequest>, JsonRejection>,
) -> Result<Json<Link>> {
    let req = json_body(body)?;
    let link = state
        .links
        .update(
            &id,
            LinkUpdate {
                url: req.url,
                resource: req.resource,
            },
        )
        .await?;

    Ok(Json(link))
}

/// DELETE /api/v1/links/:id
pub async fn delete_link(State(state): State<Arc<ApiState>>, Path(id): Path<String>) -> Result<StatusCode> {
    state.links.delete(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/links/:id/viewed
pub async fn mark_viewed(State(state): State<Arc<ApiState>>, Path(id): Path<String>) -> Result<Json<Link>> {
    Ok(Json(state.links.mark_viewed(&id).await?))
}

/// GET /api/v1/stats/views?days=
pub async fn view_stats(
    State(state): State<Arc<ApiState>>,
    Query(params): Query<StatsParams>,
) -> Result<Json<Vec<ViewStat>>> {
    let days = parse_or(params.days.as_deref(), 0);
    Ok(Json(state.links.view_stats(days).await?))
}

// ── Private helpers ────────────────────────────────────────────────────────

/// Resolve paging parameters: limit defaults to 50 and is capped at 200,
/// offset defaults to 0.
fn page(limit: Option<&str>, offset: Option<&str>) -> (i64, i64) {
    let limit = parse_or(limit, DEFAULT_LIMIT);
    let limit = if limit <= 0 { DEFAULT_LIMIT } else { limit.min(MAX_LIMIT) };
    let offset = parse_or(offset, 0).max(0);
    (limit, offset)
}

fn parse_or(raw: Option<&str>, default: i64) -> i64 {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}
