use std::sync::Arc;

use crate::{
    db::LinkRepository,
    error::{Error, Result},
    models::{Link, LinkUpdate, NewLink, ViewStat},
};

/// Validation and orchestration in front of a [`LinkRepository`].
#[derive(Clone)]
pub struct LinkService {
    repo: Arc<dyn LinkRepository>,
}

impl LinkService {
    pub fn new(repo: Arc<dyn LinkRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: NewLink) -> Result<Link> {
        let input = NewLink {
            url: input.url.trim().to_owned(),
            resource: input.resource.trim().to_owned(),
        };
        validate_create(&input)?;

        let link = self.repo.create(&input).await?;
        tracing::info!(id = %link.id, resource = %link.resource, "Link saved");
        Ok(link)
    }

    pub async fn get(&self, id: &str) -> Result<Link> {
        self.repo.get_by_id(id).await
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Link>> {
        self.repo.list(limit, offset).await
    }

    /// A random link, filtered to `resource` unless it is blank.
    pub async fn random(&self, resource: Option<&str>) -> Result<Link> {
        let resource = resource.map(str::trim).filter(|r| !r.is_empty());
        self.repo.random(resource).await
    }

    pub async fn update(&self, id: &str, input: LinkUpdate) -> Result<Link> {
        let input = LinkUpdate {
            url: input.url.map(|u| u.trim().to_owned()),
            resource: input.resource.map(|r| r.trim().to_owned()),
        };
        validate_update(&input)?;

        self.repo.update(id, &input).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.repo.delete(id).await?;
        tracing::info!(id, "Link deleted");
        Ok(())
    }

    pub async fn mark_viewed(&self, id: &str) -> Result<Link> {
        self.repo.mark_viewed(id).await
    }

    /// Daily heatmap; non-positive `days` means 53, anything above 365 is capped.
    pub async fn view_stats(&self, days: i64) -> Result<Vec<ViewStat>> {
        self.repo.view_stats(days).await
    }
}

fn validate_create(input: &NewLink) -> Result<()> {
    if input.url.is_empty() {
        return Err(Error::invalid("url", "is required"));
    }
    Ok(())
}

fn validate_update(input: &LinkUpdate) -> Result<()> {
    if input.is_empty() {
        return Err(Error::invalid("body", "has no fields to update"));
    }
    if matches!(input.url.as_deref(), Some("")) {
        return Err(Error::invalid("url", "must not be empty"));
    }
    Ok(())
}
