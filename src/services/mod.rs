//! Business logic services

pub mod access;
pub mod borrowing;
pub mod catalog;
pub mod users;

use crate::{config::AuthConfig, error::AppResult, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub access: access::AccessService,
    pub borrowing: borrowing::BorrowingService,
    pub catalog: catalog::CatalogService,
    pub users: users::UsersService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            access: access::AccessService::new(repository.clone()),
            borrowing: borrowing::BorrowingService::new(repository.clone()),
            catalog: catalog::CatalogService::new(repository.clone()),
            users: users::UsersService::new(repository.clone(), auth_config),
            repository,
        }
    }

    /// Storage connectivity probe for the readiness endpoint
    pub async fn ping_storage(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
