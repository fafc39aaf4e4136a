use std::sync::Arc;

use domains::{DomainError, Outcome, Result, User, UserProfile, UserRepository, UserUpdate};

/// Creation and profile management for forum members.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Registers `nickname`. On collision returns every user holding the
    /// nickname or the email.
    pub async fn create(
        &self,
        nickname: &str,
        profile: UserProfile,
    ) -> Result<Outcome<User, Vec<User>>> {
        let user = profile.into_user(nickname);
        match self.users.create(&user).await {
            Ok(()) => Ok(Outcome::Created(user)),
            Err(DomainError::Conflict(_)) => {
                let existing = self
                    .users
                    .find_conflicting(&user.nickname, &user.email)
                    .await?;
                tracing::debug!(nickname, count = existing.len(), "user already exists");
                Ok(Outcome::Conflict(existing))
            }
            Err(err) => Err(err),
        }
    }

    pub async fn profile(&self, nickname: &str) -> Result<User> {
        self.users
            .find_by_nickname(nickname)
            .await?
            .ok_or_else(|| user_not_found(nickname))
    }

    /// Applies a partial update. An empty patch returns the stored profile.
    pub async fn update(&self, nickname: &str, update: UserUpdate) -> Result<User> {
        if update.is_empty() {
            return self.profile(nickname).await;
        }
        match self.users.update(nickname, &update).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(user_not_found(nickname)),
            Err(DomainError::Conflict(_)) => Err(DomainError::Conflict(format!(
                "This email is already registered by another user: {}",
                update.email.as_deref().unwrap_or_default()
            ))),
            Err(err) => Err(err),
        }
    }
}

pub(crate) fn user_not_found(nickname: &str) -> DomainError {
    DomainError::not_found(format!("Can't find user with nickname: {nickname}"))
}
