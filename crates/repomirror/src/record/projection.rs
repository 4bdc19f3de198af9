//! Wire and storage projections of a [`Record`].

use serde::{Deserialize, Serialize};

use super::types::Record;

/// Join topics into the relational storage form.
pub fn join_topics(topics: &[String]) -> String {
    topics.join(",")
}

/// Split the relational storage form back into topics.
pub fn split_topics(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        return Vec::new();
    }
    joined.split(',').map(String::from).collect()
}

/// Relational / read API projection of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoView {
    pub owner: String,
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(rename = "htmlurl")]
    pub html_url: String,
    pub homepage: String,
    /// Comma-joined topics, never re-split.
    pub topics: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
    pub uid: i64,
}

impl From<&Record> for RepoView {
    fn from(record: &Record) -> Self {
        Self {
            owner: record.owner.clone(),
            name: record.name.clone(),
            category: record.category.clone(),
            description: record.description.clone(),
            html_url: record.html_url.clone(),
            homepage: record.homepage.clone(),
            topics: join_topics(&record.topics),
            created_at: record.created_day(),
            updated_at: record.updated_day(),
            uid: record.uid,
        }
    }
}

/// Key-value projection: the value stored under `record.name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePayload {
    pub id: i64,
    #[serde(rename = "fullName")]
    pub full_name: String,
    pub description: String,
    #[serde(rename = "htmlURL")]
    pub html_url: String,
    pub homepage: String,
    pub topics: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl From<&Record> for CachePayload {
    fn from(record: &Record) -> Self {
        Self {
            id: record.uid,
            full_name: record.full_name.clone(),
            description: record.raw_description.clone(),
            html_url: record.html_url.clone(),
            homepage: record.homepage.clone(),
            topics: record.topics.clone(),
            created_at: record.created_day(),
            updated_at: record.updated_day(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RawListing, to_record};

    #[test]
    fn test_cache_payload_keeps_remote_description() {
        for remote in [":leading colon", "tool:sync", "a:b:c", "plain", ""] {
            let record = to_record(RawListing {
                full_name: "permalik/utility".to_string(),
                description: remote.to_string(),
                ..Default::default()
            });

            let payload = CachePayload::from(&record);
            assert_eq!(payload.description, remote);
        }
    }

    #[test]
    fn test_split_topics_empty_string_yields_no_topics() {
        assert!(split_topics("").is_empty());
    }

    #[test]
    fn test_repo_view_json_field_names() {
        let view = RepoView {
            owner: "o".to_string(),
            name: "n".to_string(),
            category: String::new(),
            description: "d".to_string(),
            html_url: "https://github.com/o/n".to_string(),
            homepage: String::new(),
            topics: "x,y".to_string(),
            created_at: "2024-01-01".to_string(),
            updated_at: "2024-02-01".to_string(),
            uid: 9,
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["htmlurl"], "https://github.com/o/n");
        assert_eq!(json["createdAt"], "2024-01-01");
        assert_eq!(json["updatedAt"], "2024-02-01");
        assert_eq!(json["topics"], "x,y");
        assert_eq!(json["uid"], 9);
    }

    #[test]
    fn test_cache_payload_json_field_names() {
        let payload = CachePayload {
            id: 1,
            full_name: "o/n".to_string(),
            description: "d".to_string(),
            html_url: "u".to_string(),
            homepage: String::new(),
            topics: vec!["x".to_string()],
            created_at: "2024-01-01".to_string(),
            updated_at: "2024-01-02".to_string(),
        };

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["fullName"], "o/n");
        assert_eq!(json["htmlURL"], "u");
        assert_eq!(json["topics"], serde_json::json!(["x"]));
        assert!(json.get("name").is_none());
    }
}
