//! Human-readable listing of the resolved item set.

use std::collections::BTreeMap;
use std::path::Path;

use crate::workshop::ResolvedItem;

/// One line per item, sorted by title and then ID:
/// `Title: <file url> (<primary path>) [<preview path>]`.
pub fn render_resolved(items: &BTreeMap<String, ResolvedItem>, prefix: &Path) -> Vec<String> {
    let mut sorted: Vec<&ResolvedItem> = items.values().collect();
    sorted.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id().cmp(b.id())));

    sorted
        .into_iter()
        .map(|item| {
            format!(
                "{}: {} ({}) [{}]",
                item.title,
                item.file_url,
                item.entry.primary_path(prefix).display(),
                item.entry.preview_path(prefix).display()
            )
        })
        .collect()
}

/// Print the resolved set to stdout.
pub fn print_resolved(items: &BTreeMap<String, ResolvedItem>, prefix: &Path) {
    for line in render_resolved(items, prefix) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::ManifestEntry;

    fn item(id: &str, title: &str) -> ResolvedItem {
        ResolvedItem {
            title: title.to_string(),
            file_url: format!("https://cdn.example.com/{id}"),
            preview_url: format!("https://cdn.example.com/{id}.jpg"),
            entry: ManifestEntry {
                id: id.to_string(),
                ..Default::default()
            },
        }
    }

    fn map(items: Vec<ResolvedItem>) -> BTreeMap<String, ResolvedItem> {
        items
            .into_iter()
            .map(|i| (i.id().to_string(), i))
            .collect()
    }

    #[test]
    fn test_sorted_by_title() {
        let items = map(vec![item("1", "Zeta"), item("2", "Alpha"), item("3", "Mid")]);
        let lines = render_resolved(&items, Path::new("/w"));
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Alpha: "));
        assert!(lines[1].starts_with("Mid: "));
        assert!(lines[2].starts_with("Zeta: "));
    }

    #[test]
    fn test_equal_titles_all_listed_by_id() {
        let items = map(vec![item("20", "Same"), item("10", "Same")]);
        let lines = render_resolved(&items, Path::new("/w"));
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("/10.vpk"));
        assert!(lines[1].contains("/20.vpk"));
    }

    #[test]
    fn test_line_format() {
        let items = map(vec![item("101", "Foo")]);
        let lines = render_resolved(&items, Path::new("/w"));
        assert_eq!(
            lines,
            vec!["Foo: https://cdn.example.com/101 (/w/101.vpk) [/w/101.jpg]".to_string()]
        );
    }

    #[test]
    fn test_empty_set() {
        assert!(render_resolved(&BTreeMap::new(), Path::new("/w")).is_empty());
    }
}
