//! Data loading: raw node records into localized, sortable nodes.
//!
//! Records arrive as JSON, one object per node, each field holding a list of
//! `[tag, text]` pairs:
//!
//! ```json
//! [
//!   {"id": "n1", "fields": {"label": [["en", "dog"], ["fr", "chien"]]}}
//! ]
//! ```

use crate::i18n::LocalizedString;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// A node as it appears in the source data.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeRecord {
    pub id: String,
    #[serde(default)]
    pub fields: BTreeMap<String, Vec<(String, String)>>,
}

/// A node whose fields have been turned into localized strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    fields: BTreeMap<String, LocalizedString>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, name: impl Into<String>, value: LocalizedString) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Convert a raw record, failing on the first malformed field.
    pub fn from_record(record: NodeRecord) -> Result<Self> {
        let mut fields = BTreeMap::new();
        for (name, pairs) in record.fields {
            let value = LocalizedString::new(pairs)
                .with_context(|| format!("Invalid field '{}' on node '{}'", name, record.id))?;
            fields.insert(name, value);
        }
        Ok(Self {
            id: record.id,
            fields,
        })
    }

    pub fn field(&self, name: &str) -> Option<&LocalizedString> {
        self.fields.get(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.keys().map(String::as_str)
    }
}

/// Key extractor ordering nodes by the named field (nodes without it first).
pub fn by_field(name: impl Into<String>) -> impl Fn(&Node) -> Option<LocalizedString> + 'static {
    let name = name.into();
    move |node: &Node| node.field(&name).cloned()
}

/// Parse a JSON array of node records.
pub fn parse_nodes(json: &str) -> Result<Vec<Node>> {
    let records: Vec<NodeRecord> =
        serde_json::from_str(json).context("Failed to parse node records")?;
    let nodes = records
        .into_iter()
        .map(Node::from_record)
        .collect::<Result<Vec<_>>>()?;
    debug!("Parsed {} node records", nodes.len());
    Ok(nodes)
}

/// Read and parse node records from a file.
pub fn load_nodes(path: &Path) -> Result<Vec<Node>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read records file '{}'", path.display()))?;
    parse_nodes(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::OrderedKeyedSet;
    use crate::i18n::{Langpath, ResolutionContext};
    use std::rc::Rc;
    use tempfile::TempDir;

    const ANIMALS: &str = r#"[
        {"id": "dog", "fields": {"label": [["en", "dog"], ["fr", "chien"], ["de", "Hund"]]}},
        {"id": "cat", "fields": {"label": [["en", "cat"], ["fr", "chat"], ["de", "Katze"]]}},
        {"id": "rock"}
    ]"#;

    // ==================== Parsing Tests ====================

    #[test]
    fn test_parse_nodes() {
        let nodes = parse_nodes(ANIMALS).expect("Should parse");
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].id, "dog");
        assert_eq!(nodes[0].field("label").unwrap().get("de"), Some("Hund"));
        assert!(nodes[2].field("label").is_none());
    }

    #[test]
    fn test_parse_rejects_duplicate_tag() {
        let json = r#"[{"id": "x", "fields": {"label": [["en", "a"], ["en", "b"]]}}]"#;
        let err = parse_nodes(json).unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("Invalid field 'label' on node 'x'"));
        assert!(chain.contains("duplicate tag 'en'"));
    }

    #[test]
    fn test_parse_rejects_empty_field() {
        let json = r#"[{"id": "x", "fields": {"label": []}}]"#;
        assert!(parse_nodes(json).is_err());
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        let err = parse_nodes("{not json").unwrap_err();
        assert!(err.to_string().contains("Failed to parse node records"));
    }

    #[test]
    fn test_load_nodes_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nodes.json");
        std::fs::write(&path, ANIMALS).unwrap();

        let nodes = load_nodes(&path).expect("Should load");
        assert_eq!(nodes.len(), 3);
    }

    #[test]
    fn test_load_nodes_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_nodes(&temp_dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read records file"));
    }

    // ==================== Node Tests ====================

    #[test]
    fn test_builder_and_field_names() {
        let node = Node::new("n1")
            .with_field("label", LocalizedString::untagged("one"))
            .with_field("alias", LocalizedString::untagged("uno"));
        assert_eq!(node.field_names().collect::<Vec<_>>(), vec!["alias", "label"]);
    }

    #[test]
    fn test_by_field_sorts_missing_first() {
        let ctx = ResolutionContext::new(Langpath::new(["fr"]));
        let mut set = OrderedKeyedSet::with_context(by_field("label"), ctx);
        for node in parse_nodes(ANIMALS).unwrap() {
            set.add(Rc::new(node));
        }
        let ids: Vec<&str> = set.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["rock", "cat", "dog"]);
    }
}
