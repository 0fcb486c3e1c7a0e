//! In-memory model of the framework tree and its YAML form.
//!
//! ```text
//! framework:
//!   meta: {name, version, autor, stand, ziel}
//!   <category_key>: [ <record>... ]
//!   category_meta: { <category_key>: {display_name, description, created_date, custom} }
//! ```

use std::fs;
use std::path::Path;

use chrono::{Local, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::category::BUILTIN_CATEGORIES;
use crate::config::MetaConfig;
use crate::error::{CodebookError, Result};

pub const FRAMEWORK_KEY: &str = "framework";
pub const META_KEY: &str = "meta";
pub const CATEGORY_META_KEY: &str = "category_meta";

/// Keys inside `framework` that are never categories
pub const RESERVED_KEYS: &[&str] = &[META_KEY, CATEGORY_META_KEY];

pub fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// Derive a category key from a user-facing name: "My Cat" -> "my_cat"
pub fn category_key(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}

/// Root of the YAML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub framework: Framework,
}

impl Document {
    pub fn with_defaults(meta: &MetaConfig) -> Self {
        Self {
            framework: Framework::with_defaults(meta),
        }
    }

    /// Parse YAML text. A document without a `framework` key is rejected.
    pub fn parse(content: &str, source: &Path) -> Result<Self> {
        let value: Value = if content.trim().is_empty() {
            Value::Null
        } else {
            serde_yaml::from_str(content)?
        };
        if value.get(FRAMEWORK_KEY).is_none() {
            return Err(CodebookError::MissingFrameworkRoot {
                path: source.to_path_buf(),
            });
        }
        Ok(serde_yaml::from_value(value)?)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the whole tree, replacing whatever is at `path`
    pub fn write(&self, path: &Path) -> Result<()> {
        let content = self.to_yaml()?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)?;
        Ok(())
    }
}

/// The framework: opaque meta, categories in insertion order, custom category metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Framework {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,

    #[serde(flatten)]
    pub categories: IndexMap<String, Entry>,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub category_meta: IndexMap<String, CategoryMetaEntry>,
}

impl Framework {
    /// Ten empty builtin categories plus populated meta
    pub fn with_defaults(meta: &MetaConfig) -> Self {
        let categories = BUILTIN_CATEGORIES
            .iter()
            .map(|c| (c.key.to_string(), Entry::Records(Vec::new())))
            .collect();

        Self {
            meta: Some(Value::Mapping(default_meta(meta))),
            categories,
            category_meta: IndexMap::new(),
        }
    }

    /// Category keys in insertion order
    pub fn category_keys(&self) -> Vec<&str> {
        self.categories
            .keys()
            .map(|k| k.as_str())
            .filter(|k| !is_reserved(k))
            .collect()
    }

    /// Records of a category; empty for absent or malformed categories
    pub fn records(&self, category: &str) -> &[Record] {
        match self.categories.get(category) {
            Some(entry) => entry.records(),
            None => &[],
        }
    }

    /// Display metadata of a custom category, if it has a readable entry
    pub fn category_meta(&self, category: &str) -> Option<&CategoryMeta> {
        self.category_meta
            .get(category)
            .and_then(CategoryMetaEntry::as_meta)
    }
}

fn default_meta(meta: &MetaConfig) -> Mapping {
    let mut mapping = Mapping::new();
    mapping.insert("name".into(), meta.name.clone().into());
    mapping.insert("version".into(), meta.version.clone().into());
    mapping.insert("autor".into(), meta.author.clone().into());
    mapping.insert("stand".into(), Local::now().format("%Y-%m").to_string().into());
    mapping.insert("ziel".into(), meta.goal.clone().into());
    mapping
}

/// Value stored under a category key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    /// Any sequence; elements of unknown shape become [`Record::Other`]
    Records(Vec<Record>),
    /// Anything that is not a sequence
    Other(Value),
}

impl Entry {
    pub fn records(&self) -> &[Record] {
        match self {
            Self::Records(records) => records,
            Self::Other(_) => &[],
        }
    }

    /// Item count for analysis; a malformed entry counts as one item
    pub fn item_count(&self) -> usize {
        match self {
            Self::Records(records) => records.len(),
            Self::Other(_) => 1,
        }
    }
}

/// One entry in a category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Structured(IndexMap<String, Field>),
    Raw(String),
    /// Numbers, booleans, nulls, nested lists, mappings with non-string keys
    Other(Value),
}

impl Record {
    pub fn get(&self, key: &str) -> Option<&Field> {
        match self {
            Self::Structured(fields) => fields.get(key),
            Self::Raw(_) | Self::Other(_) => None,
        }
    }

    /// Case-insensitive containment. `needle` must already be lower-case.
    ///
    /// Only top-level text fields and the string elements of list fields
    /// are inspected. Records of other shapes never match.
    pub fn contains(&self, needle: &str) -> bool {
        match self {
            Self::Structured(fields) => fields.values().any(|field| field.contains(needle)),
            Self::Raw(text) => text.to_lowercase().contains(needle),
            Self::Other(_) => false,
        }
    }

    /// Short label for listings: `name`, then `id`, then "Item N"
    pub fn label(&self, index: usize) -> String {
        match self {
            Self::Structured(_) => ["name", "id"]
                .iter()
                .filter_map(|k| self.get(k).and_then(Field::as_text))
                .find(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Item {}", index + 1)),
            Self::Raw(text) if text.chars().count() > 50 => {
                format!("{}...", text.chars().take(50).collect::<String>())
            }
            Self::Raw(text) => text.clone(),
            Self::Other(value) => match scalar_text(value) {
                text if text.is_empty() => format!("Item {}", index + 1),
                text => text,
            },
        }
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Parse a record from YAML; a scalar becomes a raw record
    pub fn from_yaml(content: &str) -> Result<Self> {
        let value: Value = serde_yaml::from_str(content)?;
        match value {
            Value::Mapping(_) | Value::String(_) => Ok(serde_yaml::from_value(value)?),
            Value::Null => Err(CodebookError::InvalidRecord {
                message: "empty input".to_string(),
            }),
            Value::Bool(_) | Value::Number(_) => Ok(Self::Raw(scalar_text(&value))),
            Value::Sequence(_) | Value::Tagged(_) => Err(CodebookError::InvalidRecord {
                message: "expected a mapping or a string".to_string(),
            }),
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

impl From<String> for Record {
    fn from(text: String) -> Self {
        Self::Raw(text)
    }
}

impl From<&str> for Record {
    fn from(text: &str) -> Self {
        Self::Raw(text.to_string())
    }
}

impl From<IndexMap<String, Field>> for Record {
    fn from(fields: IndexMap<String, Field>) -> Self {
        Self::Structured(fields)
    }
}

/// Field value inside a structured record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    Text(String),
    List(Vec<String>),
    Nested(IndexMap<String, Field>),
    /// Numbers, booleans, nulls, lists of mappings
    Other(Value),
}

impl Field {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Convert an arbitrary YAML value, keeping unrecognised shapes as `Other`
    pub fn from_value(value: Value) -> Self {
        serde_yaml::from_value(value.clone()).unwrap_or(Self::Other(value))
    }

    /// `needle` must already be lower-case. A list that mixes strings with
    /// other scalars lands in `Other`; its string elements still count.
    fn contains(&self, needle: &str) -> bool {
        match self {
            Self::Text(text) => text.to_lowercase().contains(needle),
            Self::List(items) => items.iter().any(|i| i.to_lowercase().contains(needle)),
            Self::Other(Value::Sequence(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .any(|i| i.to_lowercase().contains(needle)),
            Self::Nested(_) | Self::Other(_) => false,
        }
    }
}

impl From<&str> for Field {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Field {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<String>> for Field {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

/// Display metadata for a category created at runtime
///
/// Every field is optional so hand-edited entries still load; unknown
/// fields are carried in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryMeta {
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    /// RFC 3339
    #[serde(default)]
    pub created_date: String,
    #[serde(default)]
    pub custom: bool,
    #[serde(flatten)]
    pub extra: Mapping,
}

impl CategoryMeta {
    pub fn custom(display_name: &str, description: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            description: description.to_string(),
            created_date: Utc::now().to_rfc3339(),
            custom: true,
            extra: Mapping::new(),
        }
    }
}

/// One value under `category_meta`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryMetaEntry {
    Meta(CategoryMeta),
    /// Kept verbatim when the known fields have the wrong type
    Other(Value),
}

impl CategoryMetaEntry {
    pub fn as_meta(&self) -> Option<&CategoryMeta> {
        match self {
            Self::Meta(meta) => Some(meta),
            Self::Other(_) => None,
        }
    }
}

impl From<CategoryMeta> for CategoryMetaEntry {
    fn from(meta: CategoryMeta) -> Self {
        Self::Meta(meta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn record(pairs: &[(&str, Field)]) -> Record {
        Record::Structured(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_category_key() {
        assert_eq!(category_key("My Cat"), "my_cat");
        assert_eq!(category_key("  Design Notes "), "design_notes");
        assert_eq!(category_key("rules"), "rules");
    }

    #[test]
    fn test_defaults_have_ten_categories_and_meta() {
        let framework = Framework::with_defaults(&MetaConfig::default());
        let keys = framework.category_keys();
        assert_eq!(keys.len(), 10);
        assert_eq!(keys[0], "principles");
        let meta = framework.meta.as_ref().unwrap();
        assert_eq!(meta.get("name").and_then(Value::as_str), Some("LIFE"));
        assert!(meta.get("stand").is_some());
    }

    #[test]
    fn test_yaml_shape_keeps_order() {
        let mut framework = Framework::with_defaults(&MetaConfig::default());
        framework.category_meta.insert(
            "my_cat".to_string(),
            CategoryMeta::custom("My Cat", "desc").into(),
        );
        framework
            .categories
            .insert("my_cat".to_string(), Entry::Records(vec!["hello".into()]));
        let yaml = Document { framework }.to_yaml().unwrap();

        let meta_pos = yaml.find("  meta:").unwrap();
        let principles_pos = yaml.find("  principles:").unwrap();
        let open_pos = yaml.find("  open_questions:").unwrap();
        let custom_pos = yaml.find("  my_cat:").unwrap();
        let cmeta_pos = yaml.find("  category_meta:").unwrap();
        assert!(yaml.starts_with("framework:"));
        assert!(meta_pos < principles_pos);
        assert!(principles_pos < open_pos);
        assert!(open_pos < custom_pos);
        assert!(custom_pos < cmeta_pos);
    }

    #[test]
    fn test_category_meta_omitted_when_empty() {
        let doc = Document::with_defaults(&MetaConfig::default());
        assert!(!doc.to_yaml().unwrap().contains(CATEGORY_META_KEY));
    }

    #[test]
    fn test_parse_mixed_records() {
        let yaml = r#"
framework:
  meta:
    name: LIFE
    version: '1.0'
  rules:
    - id: R1
      text: Keine Regel ohne Beispiel
      tags: [klarheit, prüfung]
      details:
        owner: team
      priority: 3
    - just a sentence
  broken: 42
"#;
        let doc = Document::parse(yaml, &PathBuf::from("test.yaml")).unwrap();
        let rules = doc.framework.records("rules");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].get("text").and_then(Field::as_text), Some("Keine Regel ohne Beispiel"));
        assert!(matches!(rules[0].get("tags"), Some(Field::List(tags)) if tags.len() == 2));
        assert!(matches!(rules[0].get("details"), Some(Field::Nested(_))));
        assert!(matches!(rules[0].get("priority"), Some(Field::Other(_))));
        assert_eq!(rules[1], Record::Raw("just a sentence".to_string()));

        assert!(doc.framework.records("broken").is_empty());
        assert_eq!(doc.framework.categories["broken"].item_count(), 1);
        assert_eq!(doc.framework.category_keys(), vec!["rules", "broken"]);
    }

    #[test]
    fn test_parse_requires_framework_root() {
        let err = Document::parse("other: 1\n", &PathBuf::from("x.yaml")).unwrap_err();
        assert!(matches!(err, CodebookError::MissingFrameworkRoot { .. }));
        let err = Document::parse("", &PathBuf::from("x.yaml")).unwrap_err();
        assert!(matches!(err, CodebookError::MissingFrameworkRoot { .. }));
    }

    #[test]
    fn test_parse_round_trip_preserves_unicode() {
        let mut framework = Framework::with_defaults(&MetaConfig::default());
        framework.categories.insert(
            "semantic_gaps".to_string(),
            Entry::Records(vec![record(&[("lösung", "Übergänge prüfen".into())])]),
        );
        let doc = Document { framework };
        let yaml = doc.to_yaml().unwrap();
        assert!(yaml.contains("Übergänge prüfen"));
        let parsed = Document::parse(&yaml, &PathBuf::from("x.yaml")).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_record_contains() {
        let rec = record(&[
            ("name", "Klarheit".into()),
            ("steps", vec!["Erst Regel lesen".to_string()].into()),
        ]);
        assert!(rec.contains("klarheit"));
        assert!(rec.contains("regel"));
        assert!(!rec.contains("name"));
        assert!(Record::from("Eine REGEL").contains("regel"));
    }

    #[test]
    fn test_record_contains_ignores_nested() {
        let mut nested = IndexMap::new();
        nested.insert("hidden".to_string(), Field::from("secret"));
        let rec = record(&[("details", Field::Nested(nested))]);
        assert!(!rec.contains("secret"));
    }

    #[test]
    fn test_record_label() {
        assert_eq!(record(&[("name", "Klarheit".into())]).label(0), "Klarheit");
        assert_eq!(record(&[("id", "R1".into())]).label(0), "R1");
        assert_eq!(record(&[("text", "x".into())]).label(2), "Item 3");
        let long = "a".repeat(60);
        assert_eq!(Record::from(long.as_str()).label(0), format!("{}...", "a".repeat(50)));
    }

    #[test]
    fn test_record_from_yaml() {
        let rec = Record::from_yaml("id: R1\ntext: hello\n").unwrap();
        assert_eq!(rec.get("id").and_then(Field::as_text), Some("R1"));
        assert_eq!(Record::from_yaml("plain text").unwrap(), Record::from("plain text"));
        assert_eq!(Record::from_yaml("42").unwrap(), Record::from("42"));
        assert!(Record::from_yaml("").is_err());
        assert!(Record::from_yaml("- a\n- b\n").is_err());
    }

    #[test]
    fn test_parse_keeps_sequence_with_odd_elements() {
        let yaml = r#"
framework:
  rules:
    - Regel A
    - 42
    - ~
    - {1: numeric key}
"#;
        let doc = Document::parse(yaml, &PathBuf::from("x.yaml")).unwrap();
        let rules = doc.framework.records("rules");
        assert_eq!(rules.len(), 4);
        assert_eq!(rules[0], Record::from("Regel A"));
        assert!(matches!(&rules[1], Record::Other(Value::Number(_))));
        assert_eq!(rules[2], Record::Other(Value::Null));
        assert!(matches!(&rules[3], Record::Other(Value::Mapping(_))));
        assert_eq!(doc.framework.categories["rules"].item_count(), 4);

        assert_eq!(rules[1].label(1), "42");
        assert_eq!(rules[2].label(2), "Item 3");
        assert!(!rules[1].contains("42"));

        let reparsed = Document::parse(&doc.to_yaml().unwrap(), &PathBuf::from("x.yaml")).unwrap();
        assert_eq!(reparsed, doc);
    }

    #[test]
    fn test_record_contains_mixed_list() {
        let rec = Record::from_yaml("name: R1\ntags: [Regel, 5, ~]\n").unwrap();
        assert!(matches!(rec.get("tags"), Some(Field::Other(Value::Sequence(_)))));
        assert!(rec.contains("regel"));
        assert!(!rec.contains("5"));
    }

    #[test]
    fn test_parse_partial_category_meta() {
        let yaml = r#"
framework:
  notes: []
  odd: []
  category_meta:
    notes:
      description: hand edited
      color: blue
    odd:
      custom: maybe
"#;
        let doc = Document::parse(yaml, &PathBuf::from("x.yaml")).unwrap();
        let notes = doc.framework.category_meta("notes").unwrap();
        assert_eq!(notes.display_name, "");
        assert_eq!(notes.description, "hand edited");
        assert!(!notes.custom);
        assert_eq!(notes.extra.get("color").and_then(Value::as_str), Some("blue"));

        assert!(doc.framework.category_meta("odd").is_none());
        assert!(matches!(
            doc.framework.category_meta.get("odd"),
            Some(CategoryMetaEntry::Other(_))
        ));

        let yaml = doc.to_yaml().unwrap();
        assert!(yaml.contains("color: blue"));
        assert!(yaml.contains("custom: maybe"));
    }
}
