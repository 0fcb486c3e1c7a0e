use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodebookError {
    #[error("Category not found: {name}")]
    CategoryNotFound { name: String },

    #[error("Item index {index} out of range for category '{category}' ({len} items)")]
    IndexOutOfRange {
        category: String,
        index: usize,
        len: usize,
    },

    #[error("No 'framework' root key in {path}")]
    MissingFrameworkRoot { path: PathBuf },

    #[error("Export to {path} failed")]
    ExportFailed { path: PathBuf },

    #[error("Import from {path} failed")]
    ImportFailed { path: PathBuf },

    #[error("Item not added: '{category}' is reserved or does not hold a list")]
    ItemNotAdded { category: String },

    #[error("Invalid record: {message}")]
    InvalidRecord { message: String },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, CodebookError>;

impl CodebookError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CategoryNotFound { .. } => 2,
            Self::IndexOutOfRange { .. } => 3,
            Self::MissingFrameworkRoot { .. } => 4,
            Self::InvalidRecord { .. } => 5,
            _ => 1,
        }
    }
}
