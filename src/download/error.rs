use std::path::PathBuf;

use thiserror::Error;

/// Failures while fetching a single asset.
///
/// None of these are retried: one failed attempt ends that asset's sync for
/// the run, and the item is picked up again next run because its manifest
/// entry was not updated.
#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Failed to create {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("HTTP error {status} downloading {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Transfer of {url} failed: {source}")]
    Transfer {
        url: String,
        source: reqwest::Error,
    },

    #[error("Failed writing {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The body was fully written but its length disagrees with the size the
    /// provider declared. The file is left on disk.
    #[error("{path}: expected {expected} bytes, received {actual} bytes")]
    SizeMismatch {
        path: PathBuf,
        expected: String,
        actual: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_mismatch_message() {
        let e = DownloadError::SizeMismatch {
            path: PathBuf::from("/w/101.vpk"),
            expected: "1000".to_string(),
            actual: 900,
        };
        assert_eq!(
            e.to_string(),
            "/w/101.vpk: expected 1000 bytes, received 900 bytes"
        );
    }

    #[test]
    fn test_http_status_message() {
        let e = DownloadError::HttpStatus {
            status: 404,
            url: "https://cdn.example.com/x".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "HTTP error 404 downloading https://cdn.example.com/x"
        );
    }

    #[tokio::test]
    async fn test_transfer_error_wraps_reqwest() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:1")
            .send()
            .await
            .unwrap_err();
        let e = DownloadError::Transfer {
            url: "http://127.0.0.1:1".to_string(),
            source: err,
        };
        assert!(e.to_string().starts_with("Transfer of http://127.0.0.1:1 failed"));
    }
}
