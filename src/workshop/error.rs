use thiserror::Error;

/// Failures while resolving Workshop metadata. Any of these aborts the run:
/// a partially resolved collection graph is not safe to sync from.
#[derive(Error, Debug)]
pub enum WorkshopError {
    #[error("No Workshop IDs to resolve")]
    NoSeeds,
    #[error("Details request failed with HTTP {status}")]
    HttpStatus { status: u16 },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("Malformed details response: {0}")]
    Json(#[from] serde_json::Error),
}
