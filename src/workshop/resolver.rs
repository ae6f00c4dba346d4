//! Collection resolver: expands seed IDs into the flat set of downloadable
//! items by repeatedly querying the metadata provider for every identifier
//! that has been discovered but not yet described.

use std::collections::BTreeMap;
use std::time::Duration;

use super::api::PublishedFileDetails;
use super::error::WorkshopError;
use super::types::{NodeState, ResolvedItem};
use super::MetadataProvider;

/// Resolve `seeds` into downloadable items keyed by ID.
///
/// Each round sleeps `request_delay` (courtesy to the remote API), then
/// queries the whole frontier in one batch. Every ID is queried at most once,
/// so cyclic or diamond-shaped collection graphs terminate and shared
/// children are fetched a single time. Collections and anything without a
/// primary asset are dropped from the result.
pub async fn resolve(
    provider: &dyn MetadataProvider,
    seeds: &[String],
    request_delay: Duration,
) -> Result<BTreeMap<String, ResolvedItem>, WorkshopError> {
    if seeds.is_empty() {
        return Err(WorkshopError::NoSeeds);
    }

    let mut nodes: BTreeMap<String, NodeState> = seeds
        .iter()
        .map(|id| (id.clone(), NodeState::Pending))
        .collect();

    loop {
        let frontier: Vec<String> = nodes
            .iter()
            .filter(|(_, state)| matches!(state, NodeState::Pending))
            .map(|(id, _)| id.clone())
            .collect();
        if frontier.is_empty() {
            break;
        }

        tracing::info!(
            count = frontier.len(),
            "Requesting details for {} item(s), waiting {}s first",
            frontier.len(),
            request_delay.as_secs()
        );
        tokio::time::sleep(request_delay).await;

        let details = provider.get_details(&frontier).await?;

        // Anything the provider leaves out stays a container rather than
        // being requested again.
        for id in &frontier {
            nodes.insert(id.clone(), NodeState::Container);
        }
        for item in &details {
            apply_details(&mut nodes, item);
        }
        if details.len() < frontier.len() {
            tracing::warn!(
                requested = frontier.len(),
                returned = details.len(),
                "Provider returned fewer items than requested"
            );
        }
    }

    let resolved: BTreeMap<String, ResolvedItem> = nodes
        .into_iter()
        .filter_map(|(id, state)| match state {
            NodeState::Leaf(item) if !item.file_url.is_empty() => Some((id, item)),
            NodeState::Leaf(item) => {
                tracing::warn!(id = %id, title = %item.title, "Item has no download URL, skipping");
                None
            }
            NodeState::Container | NodeState::Pending => None,
        })
        .collect();

    tracing::info!(count = resolved.len(), "Resolved downloadable items");
    Ok(resolved)
}

/// Record one provider result: queue unseen children, then classify the item.
fn apply_details(nodes: &mut BTreeMap<String, NodeState>, item: &PublishedFileDetails) {
    if item.result != 1 {
        tracing::warn!(id = %item.id, result = item.result, "Provider could not describe item");
    }

    let has_children = item.num_children > 0;
    tracing::debug!(
        id = %item.id,
        title = %item.title,
        has_children,
        "Described item"
    );

    for child in item.child_ids() {
        if !nodes.contains_key(child) {
            nodes.insert(child.to_string(), NodeState::Pending);
        }
    }

    let state = match ResolvedItem::from_details(item) {
        Some(resolved) => NodeState::Leaf(resolved),
        None => NodeState::Container,
    };
    nodes.insert(item.id.clone(), state);
}
