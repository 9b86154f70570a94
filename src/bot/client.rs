use std::time::Duration;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

/// Failure talking to an upstream service. Callers treat every variant as an
/// opaque failure.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream answered {0}")]
    Status(StatusCode),

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// The parts of a link the bot renders.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteLink {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub resource: String,
    #[serde(default)]
    pub views: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteUser {
    pub id: String,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Sender identity forwarded to the user service.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatUser {
    pub telegram_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[derive(Deserialize)]
struct ExistsResponse {
    exists: bool,
}

fn build_http(timeout: Duration) -> ClientResult<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

fn parse_base(raw: &str) -> ClientResult<Url> {
    match Url::parse(raw.trim()) {
        Ok(url) if !url.cannot_be_a_base() => Ok(url),
        _ => Err(ClientError::InvalidBaseUrl(raw.to_owned())),
    }
}

/// Append percent-encoded path segments to `base`.
fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

async fn send(req: RequestBuilder) -> ClientResult<reqwest::Response> {
    let resp = req.send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ClientError::Status(status));
    }
    Ok(resp)
}

async fn send_json<T: DeserializeOwned>(req: RequestBuilder) -> ClientResult<T> {
    Ok(send(req).await?.json().await?)
}

// ── Link service ───────────────────────────────────────────────────────────

/// HTTP client for the link service.
#[derive(Clone, Debug)]
pub struct LinksClient {
    base: Url,
    http: Client,
}

impl LinksClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            base: parse_base(base_url)?,
            http: build_http(timeout)?,
        })
    }

    /// Save a link and return its id.
    pub async fn create_link(&self, url: &str) -> ClientResult<String> {
        let req = self
            .http
            .post(endpoint(&self.base, &["api", "v1", "links"]))
            .json(&serde_json::json!({ "url": url }));

        let link: RemoteLink = send_json(req).await?;
        Ok(link.id)
    }

    pub async fn mark_viewed(&self, id: &str) -> ClientResult<RemoteLink> {
        let req = self
            .http
            .post(endpoint(&self.base, &["api", "v1", "links", id, "viewed"]));
        send_json(req).await
    }

    /// A random link, optionally restricted to `resource`.
    pub async fn random_link(&self, resource: Option<&str>) -> ClientResult<RemoteLink> {
        let mut req = self.http.get(endpoint(&self.base, &["api", "v1", "links", "random"]));
        if let Some(resource) = resource.filter(|r| !r.is_empty()) {
            req = req.query(&[("resource", resource)]);
        }
        send_json(req).await
    }
}

// ── User service ───────────────────────────────────────────────────────────

/// HTTP client for the user service.
#[derive(Clone, Debug)]
pub struct UsersClient {
    base: Url,
    http: Client,
}

impl UsersClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        Ok(Self {
            base: parse_base(base_url)?,
            http: build_http(timeout)?,
        })
    }

    pub async fn get_or_create_user(&self, user: &ChatUser) -> ClientResult<RemoteUser> {
        let req = self
            .http
            .post(endpoint(&self.base, &["api", "v1", "users"]))
            .json(user);
        send_json(req).await
    }

    pub async fn user_by_telegram_id(&self, telegram_id: i64) -> ClientResult<RemoteUser> {
        let req = self
            .http
            .get(endpoint(&self.base, &["api", "v1", "users", "telegram", &telegram_id.to_string()]));
        send_json(req).await
    }

    pub async fn user_exists(&self, telegram_id: i64) -> ClientResult<bool> {
        let req = self
            .http
            .get(endpoint(
                &self.base,
                &["api", "v1", "users", "telegram", &telegram_id.to_string(), "exists"],
            ));
        let body: ExistsResponse = send_json(req).await?;
        Ok(body.exists)
    }
}
