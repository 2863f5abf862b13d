use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::domain::entities::document::{DocumentId, FileDocument, NewFileDocument, OwnerId};
use crate::infra::sqlite::queries::{
    count_documents_by_owner, delete_document, insert_document, list_documents_by_owner,
    list_owner_ids,
};
use crate::infra::sqlite::schema::init_db;
use crate::usecase::ports::store::{
    FileStore, HistorySubscription, SnapshotCallback, StoreError,
};

struct Watcher {
    id: u64,
    owner: OwnerId,
    callback: SnapshotCallback,
}

/// Local document store. Watchers are notified with a freshly queried full
/// snapshot after every store or delete in the matching owner namespace.
pub struct SqliteStore {
    db_path: PathBuf,
    watchers: Arc<Mutex<Vec<Watcher>>>,
    next_watcher_id: Mutex<u64>,
}

impl SqliteStore {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            watchers: Arc::new(Mutex::new(Vec::new())),
            next_watcher_id: Mutex::new(0),
        }
    }

    fn notify_owner(&self, owner: &OwnerId) {
        let snapshot = match list_documents_by_owner(&self.db_path, owner) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!(owner = owner.as_str(), "failed to build watch snapshot: {err:#}");
                return;
            }
        };
        if let Ok(watchers) = self.watchers.lock() {
            for watcher in watchers.iter().filter(|watcher| &watcher.owner == owner) {
                (watcher.callback)(&snapshot);
            }
        }
    }
}

impl FileStore for SqliteStore {
    fn init(&self) -> Result<(), StoreError> {
        init_db(&self.db_path).map_err(|err| StoreError::Message(err.to_string()))
    }

    fn store(&self, owner: &OwnerId, document: NewFileDocument) -> Result<DocumentId, StoreError> {
        let id = insert_document(&self.db_path, owner, &document)
            .map_err(|err| StoreError::Message(err.to_string()))?;
        self.notify_owner(owner);
        Ok(DocumentId(id))
    }

    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<FileDocument>, StoreError> {
        list_documents_by_owner(&self.db_path, owner)
            .map_err(|err| StoreError::Message(err.to_string()))
    }

    fn delete(&self, owner: &OwnerId, id: DocumentId) -> Result<(), StoreError> {
        delete_document(&self.db_path, owner, id)
            .map_err(|err| StoreError::Message(err.to_string()))?;
        self.notify_owner(owner);
        Ok(())
    }

    fn list_owners(&self) -> Result<Vec<OwnerId>, StoreError> {
        list_owner_ids(&self.db_path).map_err(|err| StoreError::Message(err.to_string()))
    }

    fn count_by_owner(&self, owner: &OwnerId) -> Result<i64, StoreError> {
        count_documents_by_owner(&self.db_path, owner)
            .map_err(|err| StoreError::Message(err.to_string()))
    }

    fn watch(
        &self,
        owner: &OwnerId,
        callback: SnapshotCallback,
    ) -> Result<HistorySubscription, StoreError> {
        let initial = self.list_by_owner(owner)?;
        callback(&initial);

        let id = {
            let mut next = self
                .next_watcher_id
                .lock()
                .map_err(|_| StoreError::Message("watcher registry poisoned".to_string()))?;
            *next += 1;
            *next
        };
        {
            let mut watchers = self
                .watchers
                .lock()
                .map_err(|_| StoreError::Message("watcher registry poisoned".to_string()))?;
            watchers.push(Watcher {
                id,
                owner: owner.clone(),
                callback,
            });
        }

        let registry = self.watchers.clone();
        Ok(HistorySubscription::new(move || {
            if let Ok(mut watchers) = registry.lock() {
                watchers.retain(|watcher| watcher.id != id);
            }
        }))
    }
}
