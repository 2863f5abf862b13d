/// User-facing failure taxonomy. `Validation` is raised at the upload
/// boundary before any parsing, `Format` while decoding bytes, and
/// `Connectivity` when the store or identity backend fails. None of these is
/// fatal; callers surface them as transient notices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    Validation(String),
    Format(String),
    Connectivity(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Validation(message)
            | ServiceError::Format(message)
            | ServiceError::Connectivity(message) => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for ServiceError {}
