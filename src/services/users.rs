use std::sync::Arc;

use crate::{
    db::UserRepository,
    error::{Error, Result},
    models::{NewUser, User},
};

/// Account lookups and get-or-create over a [`UserRepository`].
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Return the user for `input.telegram_id`, creating it if absent.
    ///
    /// An existing user is returned unchanged: display fields in `input` are
    /// only used when the account is created. When a concurrent call wins the
    /// insert race the unique constraint rejects ours, and the lookup is
    /// retried once before the conflict is surfaced.
    pub async fn get_or_create(&self, input: NewUser) -> Result<User> {
        if input.telegram_id == 0 {
            return Err(Error::invalid("telegram_id", "is required"));
        }

        if let Some(user) = self.repo.get_by_telegram_id(input.telegram_id).await? {
            return Ok(user);
        }

        match self.repo.create(&input).await {
            Ok(user) => {
                tracing::info!(telegram_id = user.telegram_id, id = %user.id, "User created");
                Ok(user)
            }
            Err(Error::Conflict(reason)) => {
                tracing::debug!(telegram_id = input.telegram_id, "Lost create race, looking up again");
                self.repo
                    .get_by_telegram_id(input.telegram_id)
                    .await?
                    .ok_or(Error::Conflict(reason))
            }
            Err(e) => Err(e),
        }
    }

    pub async fn get(&self, id: &str) -> Result<User> {
        self.repo.get_by_id(id).await?.ok_or(Error::NotFound)
    }

    pub async fn get_by_telegram_id(&self, telegram_id: i64) -> Result<User> {
        self.repo.get_by_telegram_id(telegram_id).await?.ok_or(Error::NotFound)
    }

    pub async fn exists(&self, telegram_id: i64) -> Result<bool> {
        self.repo.exists(telegram_id).await
    }
}
