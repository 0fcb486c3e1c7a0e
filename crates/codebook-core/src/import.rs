//! File import pipeline
//!
//! Turns an arbitrary file into a proposed record plus a suggested
//! category. Nothing is persisted here; the caller confirms the proposal
//! and hands the record to [`FrameworkStore::add_item`](crate::FrameworkStore::add_item).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;
use tracing::debug;

use crate::category::{Classification, ContentClassifier, FileKind};
use crate::error::Result;
use crate::framework::{Field, Record};

#[derive(Debug, Clone, Serialize)]
pub struct ImportProposal {
    pub source: PathBuf,
    pub kind: FileKind,
    pub classification: Classification,
    pub record: Record,
}

impl ImportProposal {
    pub fn suggested_category(&self) -> &str {
        &self.classification.category
    }
}

/// Read `path` and build a proposal for it
pub fn propose_import(path: &Path, classifier: &ContentClassifier) -> Result<ImportProposal> {
    let bytes = fs::read(path)?;
    let content = String::from_utf8_lossy(&bytes);
    Ok(build_proposal(path, &content, classifier))
}

/// Build a proposal from already-read content
pub fn build_proposal(path: &Path, content: &str, classifier: &ContentClassifier) -> ImportProposal {
    let extension = path.extension().map(|e| e.to_string_lossy().into_owned());
    let kind = extension
        .as_deref()
        .map(FileKind::from_extension)
        .unwrap_or(FileKind::Other);
    let classification = classifier.classify(content, extension.as_deref());

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut fields: IndexMap<String, Field> = IndexMap::new();
    fields.insert("name".to_string(), name.into());
    fields.insert(
        "description".to_string(),
        format!("Imported from {}", file_name).into(),
    );
    fields.insert(
        "source_path".to_string(),
        path.display().to_string().into(),
    );
    fields.insert("imported_at".to_string(), Utc::now().to_rfc3339().into());
    fields.insert(
        "suggested_category".to_string(),
        classification.category.clone().into(),
    );

    match kind {
        FileKind::StructuredData => merge_structured(&mut fields, content),
        FileKind::Code => {
            fields.insert("code".to_string(), content.into());
            if let Some(language) = extension.as_deref().and_then(FileKind::language) {
                fields.insert("language".to_string(), language.into());
            }
        }
        FileKind::PlainText | FileKind::Other => {
            fields.insert("content".to_string(), content.into());
        }
    }

    ImportProposal {
        source: path.to_path_buf(),
        kind,
        classification,
        record: Record::Structured(fields),
    }
}

/// Merge top-level YAML mapping fields; anything else is kept as raw content
fn merge_structured(fields: &mut IndexMap<String, Field>, content: &str) {
    match serde_yaml::from_str::<Value>(content) {
        Ok(Value::Mapping(mapping)) => {
            for (key, value) in mapping {
                let key = match key {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => continue,
                };
                fields.insert(key, Field::from_value(value));
            }
        }
        Ok(_) => {
            fields.insert("content".to_string(), content.into());
        }
        Err(e) => {
            debug!("Structured content did not parse, keeping raw text: {}", e);
            fields.insert("content".to_string(), content.into());
        }
    }
}
