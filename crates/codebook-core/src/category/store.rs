//! Keyword Table
//!
//! 分類器が使うカテゴリ→キーワード表。
//! ビルトインと`config.toml`の設定をマージして保持。順序は分類のタイブレーク順。

use serde::{Deserialize, Serialize};

use super::builtin::{CategoryDef, BUILTIN_CATEGORIES};

/// カテゴリ→キーワード表（宣言順を保持）
#[derive(Debug, Clone)]
pub struct KeywordTable {
    categories: Vec<CategoryDef>,
}

impl KeywordTable {
    /// ビルトインカテゴリのみで初期化
    pub fn builtin() -> Self {
        let categories = BUILTIN_CATEGORIES.iter().map(CategoryDef::from).collect();
        Self { categories }
    }

    /// 設定でキーワードを拡張
    ///
    /// - 既存カテゴリ: キーワードを追加（`replace = true`なら置換）
    /// - 新規カテゴリ: 末尾に追加
    pub fn with_config(mut self, config: &ClassifierConfig) -> Self {
        for entry in &config.categories {
            let keywords: Vec<String> = entry
                .keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();

            match self.categories.iter_mut().find(|c| c.key == entry.key) {
                Some(existing) if entry.replace => existing.keywords = keywords,
                Some(existing) => {
                    for kw in keywords {
                        if !existing.keywords.contains(&kw) {
                            existing.keywords.push(kw);
                        }
                    }
                }
                None => self.categories.push(CategoryDef {
                    key: entry.key.clone(),
                    keywords,
                }),
            }
        }
        self
    }

    /// カテゴリ定義を取得
    pub fn get(&self, key: &str) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| c.key == key)
    }

    /// 全カテゴリを取得（宣言順）
    pub fn all(&self) -> &[CategoryDef] {
        &self.categories
    }

    /// カテゴリキー一覧
    pub fn keys(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.key.as_str()).collect()
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// `config.toml`のclassifierセクション
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub categories: Vec<KeywordConfigEntry>,
}

/// 個別カテゴリのキーワード設定
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfigEntry {
    /// カテゴリキー
    pub key: String,
    /// 追加キーワード
    pub keywords: Vec<String>,
    /// trueならビルトインのキーワードを置換
    #[serde(default)]
    pub replace: bool,
}
