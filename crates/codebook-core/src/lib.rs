pub mod analysis;
pub mod category;
pub mod config;
pub mod error;
pub mod framework;
pub mod import;
pub mod store;

pub use analysis::{CategoryCount, GapReport, Recommendation, StructureAnalysis};
pub use config::{Config, MetaConfig, StoreConfig};
pub use error::{CodebookError, Result};
pub use framework::{
    category_key, CategoryMeta, CategoryMetaEntry, Document, Entry, Field, Framework, Record,
    CATEGORY_META_KEY, FRAMEWORK_KEY, META_KEY,
};
pub use import::{build_proposal, propose_import, ImportProposal};
pub use store::{FrameworkStore, MatchType, SearchHit};

// Category system
pub use category::{
    BuiltinCategory, CategoryDef, Classification, ClassificationMethod, ClassifierConfig,
    ContentClassifier, FileKind, KeywordConfigEntry, KeywordTable, BUILTIN_CATEGORIES,
    FALLBACK_CATEGORY,
};
