use serde::{Deserialize, Deserializer};

/// Response from `IPublishedFileService/GetDetails`.
#[derive(Debug, Deserialize)]
pub struct DetailsEnvelope {
    #[serde(default)]
    pub response: DetailsResponse,
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailsResponse {
    #[serde(default, rename = "publishedfiledetails")]
    pub details: Vec<PublishedFileDetails>,
}

/// Metadata for a single published file. Only the fields the resolver and
/// sync engine need are decoded; the provider sends many more.
///
/// The provider is inconsistent about whether sizes and timestamps are JSON
/// strings or numbers, so all of them are decoded into their decimal string
/// form and never interpreted numerically.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PublishedFileDetails {
    #[serde(rename = "publishedfileid", deserialize_with = "string_or_number")]
    pub id: String,
    /// 1 means OK; anything else (e.g. 9, not found) carries no usable data.
    #[serde(default, deserialize_with = "null_as_default")]
    pub result: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filename: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub file_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub preview_url: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub file_size: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub preview_file_size: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub hcontent_file: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub hcontent_preview: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub time_created: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub time_updated: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub num_children: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<ChildRef>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChildRef {
    #[serde(rename = "publishedfileid", deserialize_with = "string_or_number")]
    pub id: String,
}

impl PublishedFileDetails {
    /// IDs of advertised children. Empty unless `num_children > 0`.
    pub fn child_ids(&self) -> impl Iterator<Item = &str> {
        let children: &[ChildRef] = if self.num_children > 0 {
            &self.children
        } else {
            &[]
        };
        children.iter().map(|c| c.id.as_str())
    }
}

/// Decode a JSON string, number, or null into a `String`. Numbers keep the
/// exact textual form serde_json produced for them.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
        Null,
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
        Raw::Null => String::new(),
    })
}

/// Decode `null` as the type's default instead of failing the whole record.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_details_response() {
        let json = r#"{
            "response": {
                "publishedfiledetails": [
                    {
                        "result": 1,
                        "publishedfileid": "101",
                        "title": "Map Pack",
                        "filename": "maps/foo.vpk",
                        "file_size": "1000",
                        "preview_file_size": "200",
                        "file_url": "https://cdn.example.com/101",
                        "preview_url": "https://cdn.example.com/101.jpg",
                        "hcontent_file": "4521778493210",
                        "hcontent_preview": "8812234",
                        "time_created": 1600000000,
                        "time_updated": 1650000000,
                        "num_children": 0,
                        "tags": [{"tag": "Map", "display_name": "Map"}]
                    }
                ]
            }
        }"#;
        let resp: DetailsEnvelope = serde_json::from_str(json).unwrap();
        let d = &resp.response.details[0];
        assert_eq!(d.id, "101");
        assert_eq!(d.result, 1);
        assert_eq!(d.file_size, "1000");
        assert_eq!(d.time_created, "1600000000");
        assert_eq!(d.time_updated, "1650000000");
        assert_eq!(d.child_ids().count(), 0);
    }

    #[test]
    fn test_sizes_accepted_as_numbers() {
        let json = r#"{"publishedfileid": 101, "file_size": 1000, "preview_file_size": "200"}"#;
        let d: PublishedFileDetails = serde_json::from_str(json).unwrap();
        assert_eq!(d.id, "101");
        assert_eq!(d.file_size, "1000");
        assert_eq!(d.preview_file_size, "200");
    }

    #[test]
    fn test_collection_children() {
        let json = r#"{
            "publishedfileid": "100",
            "result": 1,
            "title": "Server Collection",
            "num_children": 2,
            "children": [
                {"publishedfileid": "101", "sortorder": 1, "file_type": 0},
                {"publishedfileid": "102", "sortorder": 2, "file_type": 0}
            ]
        }"#;
        let d: PublishedFileDetails = serde_json::from_str(json).unwrap();
        assert_eq!(d.child_ids().collect::<Vec<_>>(), vec!["101", "102"]);
        assert_eq!(d.filename, "");
    }

    #[test]
    fn test_children_ignored_without_count() {
        let json = r#"{
            "publishedfileid": "100",
            "num_children": 0,
            "children": [{"publishedfileid": "101"}]
        }"#;
        let d: PublishedFileDetails = serde_json::from_str(json).unwrap();
        assert_eq!(d.child_ids().count(), 0);
    }

    #[test]
    fn test_not_found_result() {
        let json = r#"{"publishedfileid": "999", "result": 9}"#;
        let d: PublishedFileDetails = serde_json::from_str(json).unwrap();
        assert_eq!(d.result, 9);
        assert!(d.file_url.is_empty());
    }

    #[test]
    fn test_empty_response() {
        let resp: DetailsEnvelope = serde_json::from_str(r#"{"response": {}}"#).unwrap();
        assert!(resp.response.details.is_empty());
    }

    #[test]
    fn test_null_fields_decode_as_empty() {
        let json = r#"{
            "publishedfileid": "1",
            "result": null,
            "title": null,
            "filename": null,
            "file_url": null,
            "preview_url": null,
            "num_children": null,
            "children": null
        }"#;
        let d: PublishedFileDetails = serde_json::from_str(json).unwrap();
        assert_eq!(d.id, "1");
        assert_eq!(d.result, 0);
        assert!(d.title.is_empty());
        assert!(d.filename.is_empty());
        assert!(d.file_url.is_empty());
        assert!(d.preview_url.is_empty());
        assert_eq!(d.num_children, 0);
        assert_eq!(d.child_ids().count(), 0);
    }
}
