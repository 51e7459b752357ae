//! Access control gate
//!
//! Resolves the caller behind a bearer token and authorizes operations
//! against the four-tier capability ladder. The authorization decision
//! itself is a pure function of (caller, tier) — see [`Caller::authorize`]
//! — this service only adds the storage lookups that keep roles fresh.

use crate::{
    error::{AppError, AppResult},
    models::user::{Caller, Claims, Tier},
    repository::Repository,
};

#[derive(Clone)]
pub struct AccessService {
    repository: Repository,
}

impl AccessService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Resolve the caller behind validated claims.
    ///
    /// The role is re-read from storage on every request, so a promotion
    /// applies to requests already holding an older token. A token whose
    /// user no longer exists resolves to `None` — a session may outlive
    /// its account, and that caller is simply anonymous again.
    pub async fn resolve(&self, claims: &Claims) -> AppResult<Option<Caller>> {
        let role = self.repository.users.get_role(claims.user_id).await?;
        Ok(role.map(|role| Caller {
            user_id: claims.user_id,
            role,
        }))
    }

    /// Resolve the caller and require at least `tier`.
    pub async fn require(&self, claims: &Claims, tier: Tier) -> AppResult<Caller> {
        let caller = self.resolve(claims).await?.ok_or_else(|| {
            tracing::debug!(user_id = claims.user_id, "token references a deleted user");
            AppError::Authentication("Not logged in".to_string())
        })?;

        caller.authorize(tier)?;
        Ok(caller)
    }
}
