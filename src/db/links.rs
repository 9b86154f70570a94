use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    models::{Link, LinkUpdate, NewLink, ViewStat},
    stats,
};

/// Storage capability behind the link service. Any backend implementing it
/// can be swapped in.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    async fn create(&self, input: &NewLink) -> Result<Link>;

    /// Fails with [`Error::NotFound`] when no row has this id.
    async fn get_by_id(&self, id: &str) -> Result<Link>;

    /// Newest first.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Link>>;

    /// One link chosen uniformly at random, optionally restricted to a resource.
    async fn random(&self, resource: Option<&str>) -> Result<Link>;

    async fn update(&self, id: &str, input: &LinkUpdate) -> Result<Link>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Atomically bump the view counter and stamp `viewed_at`.
    async fn mark_viewed(&self, id: &str) -> Result<Link>;

    /// Number of view events per calendar day (UTC) in `[since, until]`.
    /// Days without events are omitted.
    async fn daily_view_counts(&self, since: NaiveDate, until: NaiveDate) -> Result<HashMap<NaiveDate, i64>>;

    /// Heatmap series for the last `days` days, ending today.
    async fn view_stats(&self, days: i64) -> Result<Vec<ViewStat>> {
        let days = stats::clamp_days(days);
        let today = Utc::now().date_naive();
        let counts = self.daily_view_counts(stats::window_start(today, days), today).await?;
        Ok(stats::build_series(today, days, &counts))
    }
}

const LINK_COLUMNS: &str = "id, url, resource, views, viewed_at, created_at, updated_at";

/// [`LinkRepository`] over the `links` and `link_views` tables.
#[derive(Clone, Debug)]
pub struct SqliteLinkRepository {
    pool: SqlitePool,
}

impl SqliteLinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for SqliteLinkRepository {
    async fn create(&self, input: &NewLink) -> Result<Link> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO links (id, url, resource, views, created_at, updated_at)
             VALUES (?1, ?2, ?3, 0, ?4, ?4)",
        )
        .bind(&id)
        .bind(&input.url)
        .bind(&input.resource)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(&id).await
    }

    async fn get_by_id(&self, id: &str) -> Result<Link> {
        let link: Option<Link> = sqlx::query_as(&format!("SELECT {LINK_COLUMNS} FROM links WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        link.ok_or(Error::NotFound)
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Link>> {
        let links: Vec<Link> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS} FROM links
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?1 OFFSET ?2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }

    async fn random(&self, resource: Option<&str>) -> Result<Link> {
        let link: Option<Link> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS} FROM links
             WHERE ?1 IS NULL OR resource = ?1
             ORDER BY RANDOM()
             LIMIT 1"
        ))
        .bind(resource)
        .fetch_optional(&self.pool)
        .await?;

        link.ok_or(Error::NotFound)
    }

    async fn update(&self, id: &str, input: &LinkUpdate) -> Result<Link> {
        let affected = sqlx::query(
            "UPDATE links
             SET url = COALESCE(?1, url),
                 resource = COALESCE(?2, resource),
                 updated_at = ?3
             WHERE id = ?4",
        )
        .bind(input.url.as_deref())
        .bind(input.resource.as_deref())
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(Error::NotFound);
        }
        self.get_by_id(id).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let affected = sqlx::query("DELETE FROM links WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if affected == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    async fn mark_viewed(&self, id: &str) -> Result<Link> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let affected = sqlx::query(
            "UPDATE links SET views = views + 1, viewed_at = ?1, updated_at = ?1 WHERE id = ?2",
        )
        .bind(now)
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if affected == 0 {
            return Err(Error::NotFound);
        }

        sqlx::query("INSERT INTO link_views (link_id, viewed_at) VALUES (?1, ?2)")
            .bind(id)
            .bind(now)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        self.get_by_id(id).await
    }

    async fn daily_view_counts(&self, since: NaiveDate, until: NaiveDate) -> Result<HashMap<NaiveDate, i64>> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT DATE(viewed_at) AS day, COUNT(*) AS count
             FROM link_views
             WHERE DATE(viewed_at) >= ?1 AND DATE(viewed_at) <= ?2
             GROUP BY DATE(viewed_at)",
        )
        .bind(since)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        let mut counts = HashMap::with_capacity(rows.len());
        for (day, count) in rows {
            match NaiveDate::parse_from_str(&day, "%Y-%m-%d") {
                Ok(date) => {
                    counts.insert(date, count);
                }
                Err(e) => tracing::warn!("Skipping unparseable view date '{}': {}", day, e),
            }
        }

        Ok(counts)
    }
}
