use std::sync::Arc;

use chrono::Utc;

use crate::domain::entities::document::{DocumentId, NewFileDocument, OwnerId};
use crate::infra::import::xlsx::ingest_workbook;
use crate::usecase::error::ServiceError;
use crate::usecase::ports::store::FileStore;

pub const ALLOWED_EXTENSIONS: [&str; 2] = ["xls", "xlsx"];

/// Suffix check only, before any decoding. Case-sensitive, mirroring the
/// observed upload-boundary behavior (`.XLSX` is rejected).
pub fn validate_file_name(file_name: &str) -> Result<(), ServiceError> {
    let extension = file_name.rsplit_once('.').map(|(_, extension)| extension);
    match extension {
        Some(extension) if ALLOWED_EXTENSIONS.contains(&extension) => Ok(()),
        _ => Err(ServiceError::Validation(
            "Please upload only .xls or .xlsx files.".to_string(),
        )),
    }
}

pub struct UploadService {
    store: Arc<dyn FileStore>,
}

impl UploadService {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    /// Validates the name, ingests the first worksheet, and stores the
    /// result as one document. Nothing is persisted on any failure.
    pub fn upload(
        &self,
        owner: &OwnerId,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<DocumentId, ServiceError> {
        validate_file_name(file_name)?;

        let table = ingest_workbook(bytes)?;
        let data = serde_json::to_string(&table.records)
            .map_err(|err| ServiceError::Format(format!("failed to serialize records: {err}")))?;

        let document = NewFileDocument {
            name: file_name.to_string(),
            uploaded_at: Utc::now(),
            size: bytes.len() as i64,
            headers: table.headers,
            data,
        };

        let id = self
            .store
            .store(owner, document)
            .map_err(|err| ServiceError::Connectivity(err.to_string()))?;
        tracing::info!(owner = owner.as_str(), file = file_name, "stored upload");
        Ok(id)
    }
}
