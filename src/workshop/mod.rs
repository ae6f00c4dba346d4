//! Steam Workshop metadata: wire types, the provider seam, the HTTP client,
//! and the resolver that flattens collections into downloadable items.

pub mod api;
pub mod client;
pub mod error;
pub mod resolver;
pub mod types;

pub use api::PublishedFileDetails;
pub use client::WorkshopClient;
pub use error::WorkshopError;
pub use resolver::resolve;
pub use types::ResolvedItem;

/// Batched metadata lookup used by the resolver.
///
/// The concrete implementation is [`WorkshopClient`]; tests substitute an
/// in-memory provider.
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch details for every ID in `ids`, with child lists expanded.
    async fn get_details(
        &self,
        ids: &[String],
    ) -> Result<Vec<PublishedFileDetails>, WorkshopError>;
}
