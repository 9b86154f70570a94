use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// A saved link record from the `links` table.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Link {
    pub id: String,
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource: String,
    pub views: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when saving a new link.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewLink {
    pub url: String,
    pub resource: String,
}

/// Partial update of a link; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkUpdate {
    pub url: Option<String>,
    pub resource: Option<String>,
}

impl LinkUpdate {
    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.resource.is_none()
    }
}

/// One day of the view heatmap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewStat {
    pub date: NaiveDate,
    pub count: i64,
    /// Intensity in `0..=4`, relative to the busiest day in the window.
    pub level: u8,
}

/// A Telegram-linked account from the `users` table.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub telegram_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Identity and display fields supplied to get-or-create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewUser {
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
