use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::entities::document::OwnerId;
use crate::usecase::error::ServiceError;
use crate::usecase::ports::identity::IdentityProvider;
use crate::usecase::ports::store::FileStore;

pub const UNKNOWN_EMAIL: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRow {
    pub owner: OwnerId,
    pub email: String,
    pub file_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminReport {
    pub total_users: i64,
    pub total_files: i64,
    pub rows: Vec<AdminRow>,
}

pub struct AdminService {
    store: Arc<dyn FileStore>,
    identity: Arc<dyn IdentityProvider>,
}

impl AdminService {
    pub fn new(store: Arc<dyn FileStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { store, identity }
    }

    /// Walks every owner namespace in the store, counts documents per owner,
    /// and joins the account email index. Owners without an index entry are
    /// reported as "N/A".
    pub fn report(&self) -> Result<AdminReport, ServiceError> {
        let accounts = self
            .identity
            .list_accounts()
            .map_err(|err| ServiceError::Connectivity(err.to_string()))?;
        let email_index: HashMap<&str, &str> = accounts
            .iter()
            .map(|account| (account.id.as_str(), account.email.as_str()))
            .collect();

        let owners = self
            .store
            .list_owners()
            .map_err(|err| ServiceError::Connectivity(err.to_string()))?;

        let mut total_files = 0;
        let mut rows = Vec::with_capacity(owners.len());
        for owner in owners {
            let file_count = self
                .store
                .count_by_owner(&owner)
                .map_err(|err| ServiceError::Connectivity(err.to_string()))?;
            total_files += file_count;
            let email = email_index
                .get(owner.as_str())
                .map(|email| email.to_string())
                .unwrap_or_else(|| UNKNOWN_EMAIL.to_string());
            rows.push(AdminRow {
                owner,
                email,
                file_count,
            });
        }

        Ok(AdminReport {
            total_users: accounts.len() as i64,
            total_files,
            rows,
        })
    }
}
