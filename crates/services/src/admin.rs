use std::sync::Arc;

use domains::{AdminRepository, Result, Status};

/// Operational endpoints used by test harnesses: full reset and row counts.
#[derive(Clone)]
pub struct AdminService {
    admin: Arc<dyn AdminRepository>,
}

impl AdminService {
    pub fn new(admin: Arc<dyn AdminRepository>) -> Self {
        Self { admin }
    }

    /// Irreversibly removes every user, forum, thread, post and vote.
    pub async fn clear(&self) -> Result<()> {
        self.admin.clear().await?;
        tracing::warn!("all forum data cleared");
        Ok(())
    }

    pub async fn status(&self) -> Result<Status> {
        self.admin.status().await
    }
}
