use crate::source::remote::RemoteError;

/// Errors produced by the patient-search core.
///
/// The router surfaces every variant except `RemoteLookup` to its caller;
/// remote failures are absorbed by the fallback flow and only show up in logs.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("at least one search field is required")]
    EmptyQuery,
    #[error("{0} is not supported yet")]
    UnsupportedHospital(String),
    #[error("no patient found")]
    NotFound,
    #[error("failed to execute patient search: {0}")]
    QueryExecution(#[source] sqlx::Error),
    #[error("failed to read patient row: {0}")]
    RowDecode(#[source] sqlx::Error),
    #[error("remote lookup failed: {0}")]
    RemoteLookup(#[from] RemoteError),
    #[error("staff store failure: {0}")]
    StaffPersistence(#[source] sqlx::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type SearchResult<T> = std::result::Result<T, SearchError>;
