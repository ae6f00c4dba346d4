use std::path::Path;

use bytes::Bytes;
use futures_util::stream::{BoxStream, StreamExt};
use reqwest::Client;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use super::error::DownloadError;

/// Body of a fetched asset, delivered in chunks.
pub type ByteStream = BoxStream<'static, Result<Bytes, DownloadError>>;

/// Bulk content fetch: URL in, byte stream out.
///
/// Implemented for `reqwest::Client` so the sync engine can use a plain HTTP
/// client; tests supply an in-memory transport.
#[async_trait::async_trait]
pub trait BlobTransport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ByteStream, DownloadError>;
}

#[async_trait::async_trait]
impl BlobTransport for Client {
    async fn fetch(&self, url: &str) -> Result<ByteStream, DownloadError> {
        let response = self
            .get(url)
            .send()
            .await
            .map_err(|e| DownloadError::Transfer {
                url: url.to_string(),
                source: e,
            })?;

        if !response.status().is_success() {
            return Err(DownloadError::HttpStatus {
                status: response.status().as_u16(),
                url: url.to_string(),
            });
        }

        let url = url.to_string();
        let stream = response
            .bytes_stream()
            .map(move |chunk| {
                chunk.map_err(|e| DownloadError::Transfer {
                    url: url.clone(),
                    source: e,
                })
            })
            .boxed();
        Ok(stream)
    }
}

/// Download `url` into `path`, overwriting whatever is there.
///
/// The body is streamed straight into the destination file. Once complete,
/// the byte count (as a decimal string) must equal `expected_size`; on a
/// mismatch the written file is left in place and
/// [`DownloadError::SizeMismatch`] is returned. No resume, no retry.
///
/// Returns the number of bytes written.
pub async fn download_file(
    transport: &dyn BlobTransport,
    url: &str,
    path: &Path,
    expected_size: &str,
) -> Result<u64, DownloadError> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
        .await
        .map_err(|e| DownloadError::Create {
            path: path.to_path_buf(),
            source: e,
        })?;

    tracing::info!(url, path = %path.display(), "downloading");

    let mut stream = transport.fetch(url).await?;
    let mut bytes_written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.inspect_err(|e| {
            tracing::warn!(
                path = %path.display(),
                bytes_so_far = bytes_written,
                "Body stream error: {}",
                e
            );
        })?;
        file.write_all(&chunk)
            .await
            .map_err(|e| DownloadError::Write {
                path: path.to_path_buf(),
                source: e,
            })?;
        bytes_written += chunk.len() as u64;
    }
    file.flush().await.map_err(|e| DownloadError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    drop(file);

    if bytes_written.to_string() != expected_size {
        return Err(DownloadError::SizeMismatch {
            path: path.to_path_buf(),
            expected: expected_size.to_string(),
            actual: bytes_written,
        });
    }

    tracing::debug!(bytes = bytes_written, path = %path.display(), "Downloaded");
    Ok(bytes_written)
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    use futures_util::stream;

    use super::*;

    pub(crate) const CHUNK_SIZE: usize = 64;

    /// A real `reqwest::Error` to stand in for a dropped connection.
    fn connection_reset() -> reqwest::Error {
        match Client::new().get("not a url").build() {
            Err(e) => e,
            Ok(_) => unreachable!("relative URL must not build"),
        }
    }

    /// In-memory transport serving fixed bodies in small chunks.
    #[derive(Default)]
    pub(crate) struct FakeTransport {
        blobs: HashMap<String, Vec<u8>>,
        missing: HashSet<String>,
        fail_after: HashMap<String, usize>,
        fetched: Mutex<Vec<String>>,
    }

    impl FakeTransport {
        pub(crate) fn serve(mut self, url: &str, body: Vec<u8>) -> Self {
            self.blobs.insert(url.to_string(), body);
            self
        }

        /// Respond to `url` with HTTP 404.
        pub(crate) fn not_found(mut self, url: &str) -> Self {
            self.missing.insert(url.to_string());
            self
        }

        /// Serve the first `chunks` chunks of `url`'s body, then fail the
        /// stream with a transfer error.
        pub(crate) fn fail_after(mut self, url: &str, chunks: usize) -> Self {
            self.fail_after.insert(url.to_string(), chunks);
            self
        }

        pub(crate) fn fetched(&self) -> Vec<String> {
            self.fetched.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl BlobTransport for FakeTransport {
        async fn fetch(&self, url: &str) -> Result<ByteStream, DownloadError> {
            self.fetched.lock().unwrap().push(url.to_string());
            if self.missing.contains(url) {
                return Err(DownloadError::HttpStatus {
                    status: 404,
                    url: url.to_string(),
                });
            }
            let body = self.blobs.get(url).cloned().unwrap_or_default();
            let mut chunks: Vec<Result<Bytes, DownloadError>> = body
                .chunks(CHUNK_SIZE)
                .map(|c| Ok(Bytes::copy_from_slice(c)))
                .collect();
            if let Some(&n) = self.fail_after.get(url) {
                chunks.truncate(n);
                chunks.push(Err(DownloadError::Transfer {
                    url: url.to_string(),
                    source: connection_reset(),
                }));
            }
            Ok(stream::iter(chunks).boxed())
        }
    }
}
