use crate::domain::entities::document::{DocumentId, FileDocument, NewFileDocument, OwnerId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Message(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Message(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Receives the owner's full document list, already sorted most recent
/// first. Snapshots replace prior state wholesale; they are never diffs.
pub type SnapshotCallback = Box<dyn Fn(&[FileDocument]) + Send + Sync>;

/// Handle for a history watch. Dropping it cancels delivery.
pub struct HistorySubscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl HistorySubscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for HistorySubscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Per-user document store. Writes are atomic per document: either the whole
/// document (metadata, headers, serialized records) becomes visible to later
/// reads, or none of it does.
pub trait FileStore: Send + Sync {
    fn init(&self) -> Result<(), StoreError>;

    fn store(&self, owner: &OwnerId, document: NewFileDocument) -> Result<DocumentId, StoreError>;

    /// Ordered by upload time descending, ties broken by insertion order.
    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<FileDocument>, StoreError>;

    fn delete(&self, owner: &OwnerId, id: DocumentId) -> Result<(), StoreError>;

    fn list_owners(&self) -> Result<Vec<OwnerId>, StoreError>;
    fn count_by_owner(&self, owner: &OwnerId) -> Result<i64, StoreError>;

    /// Registers a snapshot callback for one owner's namespace. The current
    /// list is delivered immediately, then again after every store or delete
    /// in that namespace.
    fn watch(
        &self,
        owner: &OwnerId,
        callback: SnapshotCallback,
    ) -> Result<HistorySubscription, StoreError>;
}
