//! # Category Module
//!
//! Frameworkのカテゴリ定義と、取り込んだテキストのカテゴリ推定を提供する。
//!
//! ## 設計目的
//!
//! ファイルから取り込んだ自由形式のテキストを、どのカテゴリに入れるべきか
//! 提案する。分類はキーワードの部分一致スコアのみで行い、キーワード表は
//! データとして分類ロジックから分離されている：
//!
//! - **Shortcut**: 拡張子ごとの判定（`.py`→examples等）、成立すれば即決定
//! - **Keywords**: カテゴリごとにキーワード出現数を数え、最大スコアを採用
//! - **Fallback**: 全カテゴリが0点なら`unknown`
//!
//! ## モジュール構成
//!
//! - `builtin`: ビルトインカテゴリ定義（キーワード、テンプレート）
//! - `store`: キーワード表のランタイムストア
//! - `classifier`: 分類器
//!
//! ## 使用例
//!
//! ```rust
//! use codebook_core::category::{ContentClassifier, KeywordTable, FALLBACK_CATEGORY};
//!
//! let table = KeywordTable::builtin();
//! assert!(table.get("rules").is_some());
//!
//! let classifier = ContentClassifier::new(table);
//! assert_eq!(classifier.suggest("Diese Regel gilt nicht immer", None), "rules");
//! assert_eq!(classifier.suggest("import os", Some("py")), "examples");
//! assert_eq!(classifier.suggest("lorem ipsum", None), FALLBACK_CATEGORY);
//! ```

mod builtin;
mod classifier;
mod store;

// Re-exports
pub use builtin::{
    builtin, template_for, BuiltinCategory, CategoryDef, BUILTIN_CATEGORIES, DEFAULT_TEMPLATE,
    ESSENTIAL_CATEGORIES, FALLBACK_CATEGORY,
};
pub use classifier::{Classification, ClassificationMethod, ContentClassifier, FileKind};
pub use store::{ClassifierConfig, KeywordConfigEntry, KeywordTable};
