use crate::manifest::types::{ManifestEntry, PRIMARY_EXTENSION};

use super::api::PublishedFileDetails;

/// A downloadable Workshop item produced by the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub title: String,
    pub file_url: String,
    pub preview_url: String,
    /// Remote metadata in the shape it is stored in the manifest.
    pub entry: ManifestEntry,
}

impl ResolvedItem {
    pub fn id(&self) -> &str {
        &self.entry.id
    }

    /// Build a leaf item from provider metadata, or `None` when the item
    /// carries no supported primary asset (collections, other content types).
    pub fn from_details(details: &PublishedFileDetails) -> Option<Self> {
        if !is_leaf_filename(&details.filename) {
            return None;
        }
        Some(Self {
            title: details.title.clone(),
            file_url: details.file_url.clone(),
            preview_url: details.preview_url.clone(),
            entry: ManifestEntry {
                id: details.id.clone(),
                time_created: details.time_created.clone(),
                time_updated: details.time_updated.clone(),
                content_hash: details.hcontent_file.clone(),
                content_size: details.file_size.clone(),
                preview_hash: details.hcontent_preview.clone(),
                preview_size: details.preview_file_size.clone(),
            },
        })
    }
}

/// Leaf detection: the last three characters of the filename must be the
/// primary asset extension, case-sensitively. A bare `"vpk"` is not a leaf.
pub fn is_leaf_filename(filename: &str) -> bool {
    filename.len() > PRIMARY_EXTENSION.len() && filename.ends_with(PRIMARY_EXTENSION)
}

/// Resolution state of one identifier.
#[derive(Debug, Clone)]
pub enum NodeState {
    /// Discovered but not yet queried.
    Pending,
    /// Queried; not a downloadable asset (collection, unsupported type, or
    /// not returned by the provider).
    Container,
    /// Queried; a downloadable asset.
    Leaf(ResolvedItem),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(filename: &str) -> PublishedFileDetails {
        PublishedFileDetails {
            id: "101".to_string(),
            result: 1,
            title: "Foo".to_string(),
            filename: filename.to_string(),
            file_url: "https://cdn.example.com/101".to_string(),
            preview_url: "https://cdn.example.com/101.jpg".to_string(),
            file_size: "1000".to_string(),
            preview_file_size: "200".to_string(),
            hcontent_file: "h1".to_string(),
            hcontent_preview: "h2".to_string(),
            time_created: "1".to_string(),
            time_updated: "2".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_leaf_filename_detection() {
        assert!(is_leaf_filename("foo.vpk"));
        assert!(is_leaf_filename("maps/foo.vpk"));
        assert!(is_leaf_filename("foovpk"));
        assert!(!is_leaf_filename("vpk"));
        assert!(!is_leaf_filename("foo.VPK"));
        assert!(!is_leaf_filename("foo.bsp"));
        assert!(!is_leaf_filename(""));
    }

    #[test]
    fn test_from_details_maps_fields() {
        let item = ResolvedItem::from_details(&details("foo.vpk")).unwrap();
        assert_eq!(item.id(), "101");
        assert_eq!(item.title, "Foo");
        assert_eq!(item.entry.content_size, "1000");
        assert_eq!(item.entry.content_hash, "h1");
        assert_eq!(item.entry.preview_size, "200");
        assert_eq!(item.entry.preview_hash, "h2");
        assert_eq!(item.entry.time_created, "1");
        assert_eq!(item.entry.time_updated, "2");
    }

    #[test]
    fn test_from_details_rejects_non_leaf() {
        assert!(ResolvedItem::from_details(&details("")).is_none());
        assert!(ResolvedItem::from_details(&details("readme.txt")).is_none());
    }
}
