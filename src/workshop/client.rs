use reqwest::Client;

use super::api::{DetailsEnvelope, PublishedFileDetails};
use super::error::WorkshopError;
use super::MetadataProvider;

pub const DEFAULT_API_URL: &str =
    "https://api.steampowered.com/IPublishedFileService/GetDetails/v1";

/// HTTP client for the `GetDetails` Web API method.
#[derive(Clone)]
pub struct WorkshopClient {
    http: Client,
    api_url: String,
    api_key: String,
}

impl std::fmt::Debug for WorkshopClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkshopClient")
            .field("api_url", &self.api_url)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl WorkshopClient {
    pub fn new(http: Client, api_url: String, api_key: String) -> Self {
        Self {
            http,
            api_url,
            api_key,
        }
    }

    /// Query pairs for one batch: children expansion, credentials, and one
    /// indexed `publishedfileids[i]` per requested ID.
    fn query_pairs(&self, ids: &[String]) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(ids.len() + 2);
        pairs.push(("includechildren".to_string(), "true".to_string()));
        pairs.push(("key".to_string(), self.api_key.clone()));
        for (i, id) in ids.iter().enumerate() {
            pairs.push((format!("publishedfileids[{i}]"), id.clone()));
        }
        pairs
    }
}

#[async_trait::async_trait]
impl MetadataProvider for WorkshopClient {
    async fn get_details(
        &self,
        ids: &[String],
    ) -> Result<Vec<PublishedFileDetails>, WorkshopError> {
        tracing::debug!(count = ids.len(), url = %self.api_url, "Requesting file details");

        let response = self
            .http
            .get(&self.api_url)
            .query(&self.query_pairs(ids))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WorkshopError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        let body = response.bytes().await?;
        let envelope: DetailsEnvelope = serde_json::from_slice(&body)?;
        Ok(envelope.response.details)
    }
}
