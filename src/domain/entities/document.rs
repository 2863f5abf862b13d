use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub i64);

impl From<i64> for DocumentId {
    fn from(value: i64) -> Self {
        DocumentId(value)
    }
}

impl From<DocumentId> for i64 {
    fn from(value: DocumentId) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One data row keyed by header name, in header order. Blank cells are left
/// unset, matching the serialized form the store round-trips.
pub type Record = Map<String, Value>;

/// Ingestion output: the header row plus one record per data row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

/// A stored upload. `data` holds the records as a JSON array of flat
/// objects; documents are created once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDocument {
    pub id: DocumentId,
    pub owner: OwnerId,
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    pub size: i64,
    pub headers: Vec<String>,
    pub data: String,
}

impl FileDocument {
    pub fn records(&self) -> Result<Vec<Record>, serde_json::Error> {
        serde_json::from_str(&self.data)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewFileDocument {
    pub name: String,
    pub uploaded_at: DateTime<Utc>,
    pub size: i64,
    pub headers: Vec<String>,
    pub data: String,
}

/// A record shaped for plotting: every field except the value axis carried
/// unchanged, with the value axis coerced to a number. An unparseable value
/// becomes NaN and renders as a gap rather than dropping the row.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRow {
    pub fields: Record,
    pub value: f64,
}
