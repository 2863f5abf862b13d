use std::sync::Arc;

use crate::domain::entities::document::{DocumentId, FileDocument, OwnerId};
use crate::usecase::error::ServiceError;
use crate::usecase::ports::store::{FileStore, HistorySubscription, SnapshotCallback};

pub struct HistoryService {
    store: Arc<dyn FileStore>,
}

impl HistoryService {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    pub fn list(&self, owner: &OwnerId) -> Result<Vec<FileDocument>, ServiceError> {
        self.store
            .list_by_owner(owner)
            .map_err(|err| ServiceError::Connectivity(err.to_string()))
    }

    pub fn delete(&self, owner: &OwnerId, id: DocumentId) -> Result<(), ServiceError> {
        self.store
            .delete(owner, id)
            .map_err(|err| ServiceError::Connectivity(err.to_string()))
    }

    /// Push updates for the owner's namespace; every snapshot is the full
    /// list and replaces prior state wholesale.
    pub fn watch(
        &self,
        owner: &OwnerId,
        callback: SnapshotCallback,
    ) -> Result<HistorySubscription, ServiceError> {
        self.store
            .watch(owner, callback)
            .map_err(|err| ServiceError::Connectivity(err.to_string()))
    }
}
