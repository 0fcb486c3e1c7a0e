//! Framework Store
//!
//! Single owner of the framework tree. Every mutation rewrites the whole
//! framework file; failures never escape the store, they are logged and
//! reported as `bool` / `Option`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::analysis::{GapReport, StructureAnalysis};
use crate::category::template_for;
use crate::config::{Config, MetaConfig};
use crate::framework::{
    category_key, is_reserved, CategoryMeta, Document, Entry, Framework, Record,
};

/// Kind of match reported by [`FrameworkStore::search`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// A text field or text list element contains the term
    Content,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub category: String,
    pub index: usize,
    pub item: Record,
    pub match_type: MatchType,
}

pub struct FrameworkStore {
    base_dir: PathBuf,
    framework_file: PathBuf,
    export_file: String,
    document: Document,
}

impl FrameworkStore {
    /// Open the store in `base_dir`, reading `config.toml` if present
    pub fn open(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        let config = Config::load(&base_dir).unwrap_or_else(|e| {
            warn!("Failed to load config, using defaults: {}", e);
            Config::default()
        });
        Self::new(base_dir, &config)
    }

    /// Open the store with an explicit config
    ///
    /// Never fails: a missing or unreadable framework file yields the
    /// default tree, which is not written until the first mutation.
    pub fn new(base_dir: impl Into<PathBuf>, config: &Config) -> Self {
        let base_dir = base_dir.into();
        if let Err(e) = std::fs::create_dir_all(&base_dir) {
            warn!("Failed to create {}: {}", base_dir.display(), e);
        }

        let framework_file = base_dir.join(&config.store.framework_file);
        let document = load_document(&framework_file, &config.meta);

        Self {
            base_dir,
            framework_file,
            export_file: config.store.export_file.clone(),
            document,
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn framework_path(&self) -> &Path {
        &self.framework_file
    }

    pub fn framework(&self) -> &Framework {
        &self.document.framework
    }

    /// Write the whole tree to the framework file
    ///
    /// In-memory state stays authoritative when the write fails.
    pub fn save(&self) -> bool {
        match self.document.write(&self.framework_file) {
            Ok(()) => {
                debug!("Saved framework to {}", self.framework_file.display());
                true
            }
            Err(e) => {
                warn!(
                    "Failed to save framework to {}: {}",
                    self.framework_file.display(),
                    e
                );
                false
            }
        }
    }

    /// Category keys in insertion order, without reserved keys
    pub fn categories(&self) -> Vec<&str> {
        self.framework().category_keys()
    }

    pub fn has_category(&self, category: &str) -> bool {
        !is_reserved(category) && self.framework().categories.contains_key(category)
    }

    /// Records of a category; empty when the category is absent
    pub fn items(&self, category: &str) -> &[Record] {
        if is_reserved(category) {
            return &[];
        }
        self.framework().records(category)
    }

    pub fn item(&self, category: &str, index: usize) -> Option<&Record> {
        self.items(category).get(index)
    }

    /// Append a record, creating the category if needed, then save
    ///
    /// Returns `false` and changes nothing when `category` is a reserved key
    /// or holds a value that is not a list.
    pub fn add_item(&mut self, category: &str, record: Record) -> bool {
        if is_reserved(category) {
            warn!("Refusing to add an item under reserved key '{}'", category);
            return false;
        }

        let entry = self
            .document
            .framework
            .categories
            .entry(category.to_string())
            .or_insert_with(|| Entry::Records(Vec::new()));

        match entry {
            Entry::Records(records) => records.push(record),
            Entry::Other(_) => {
                warn!("Category '{}' does not hold a list, item not added", category);
                return false;
            }
        }
        self.save();
        true
    }

    /// Replace the record at `index`; out of range is a silent no-op
    pub fn update_item(&mut self, category: &str, index: usize, record: Record) {
        let Some(records) = self.records_mut(category) else {
            return;
        };
        let Some(slot) = records.get_mut(index) else {
            return;
        };
        *slot = record;
        self.save();
    }

    /// Remove the record at `index`, shifting later ones down; out of range is a silent no-op
    pub fn delete_item(&mut self, category: &str, index: usize) {
        let Some(records) = self.records_mut(category) else {
            return;
        };
        if index >= records.len() {
            return;
        }
        records.remove(index);
        self.save();
    }

    fn records_mut(&mut self, category: &str) -> Option<&mut Vec<Record>> {
        if is_reserved(category) {
            return None;
        }
        match self.document.framework.categories.get_mut(category) {
            Some(Entry::Records(records)) => Some(records),
            _ => None,
        }
    }

    /// Create a custom category from a display name
    ///
    /// Returns `false` without touching anything if the derived key exists
    /// or is reserved.
    pub fn add_category(&mut self, name: &str, description: &str) -> bool {
        let key = category_key(name);
        if key.is_empty() || is_reserved(&key) {
            warn!("Invalid category name: '{}'", name);
            return false;
        }
        if self.document.framework.categories.contains_key(&key) {
            return false;
        }

        let framework = &mut self.document.framework;
        framework
            .categories
            .insert(key.clone(), Entry::Records(Vec::new()));
        framework
            .category_meta
            .insert(key, CategoryMeta::custom(name.trim(), description).into());
        self.save();
        true
    }

    pub fn category_meta(&self, category: &str) -> Option<&CategoryMeta> {
        self.framework().category_meta(category)
    }

    /// Item template for a category
    pub fn template_for(&self, category: &str) -> &'static str {
        template_for(category)
    }

    /// Case-insensitive substring search over every category
    pub fn search(&self, term: &str) -> Vec<SearchHit> {
        let needle = term.to_lowercase();
        let needle = needle.as_str();

        self.framework()
            .categories
            .iter()
            .filter(|(key, _)| !is_reserved(key))
            .flat_map(move |(key, entry)| {
                entry
                    .records()
                    .iter()
                    .enumerate()
                    .filter(move |(_, record)| record.contains(needle))
                    .map(move |(index, record)| SearchHit {
                        category: key.clone(),
                        index,
                        item: record.clone(),
                        match_type: MatchType::Content,
                    })
            })
            .collect()
    }

    pub fn analyze_structure(&self) -> StructureAnalysis {
        StructureAnalysis::of(self.framework())
    }

    pub fn analyze_gaps(&self) -> GapReport {
        GapReport::of(self.framework())
    }

    /// Export path used when the caller gives none
    pub fn default_export_path(&self) -> PathBuf {
        self.base_dir.join(&self.export_file)
    }

    /// Write the full tree to `destination` (relative paths resolve
    /// against the base directory)
    pub fn export(&self, destination: impl AsRef<Path>) -> Option<PathBuf> {
        let path = self.base_dir.join(destination);
        if path == self.framework_file {
            warn!(
                "Export target {} is the framework file itself",
                path.display()
            );
            return None;
        }

        match self.document.write(&path) {
            Ok(()) => {
                info!("Exported framework to {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Export to {} failed: {}", path.display(), e);
                None
            }
        }
    }

    /// Replace the whole tree with the framework in `source`, then save
    ///
    /// The current tree is kept if `source` is unreadable, unparseable or
    /// has no `framework` root key.
    pub fn import(&mut self, source: impl AsRef<Path>) -> bool {
        let source = source.as_ref();
        match Document::read(source) {
            Ok(document) => {
                self.document = document;
                self.save();
                info!("Imported framework from {}", source.display());
                true
            }
            Err(e) => {
                warn!("Import from {} failed: {}", source.display(), e);
                false
            }
        }
    }
}

fn load_document(path: &Path, meta: &MetaConfig) -> Document {
    if !path.exists() {
        debug!("No framework file at {}, using defaults", path.display());
        return Document::with_defaults(meta);
    }

    Document::read(path).unwrap_or_else(|e| {
        warn!(
            "Failed to load framework from {}, using defaults: {}",
            path.display(),
            e
        );
        back_up_unreadable(path);
        Document::with_defaults(meta)
    })
}

/// Copy a framework file that could not be loaded to `<file>.bak`, so the
/// next save does not destroy its only copy
fn back_up_unreadable(path: &Path) {
    let mut backup = path.as_os_str().to_owned();
    backup.push(".bak");
    let backup = PathBuf::from(backup);

    match std::fs::copy(path, &backup) {
        Ok(_) => warn!("Kept a copy of the unreadable file at {}", backup.display()),
        Err(e) => warn!("Failed to back up {}: {}", path.display(), e),
    }
}
