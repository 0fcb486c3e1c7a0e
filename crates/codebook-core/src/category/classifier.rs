//! Content Classifier
//!
//! 任意のテキストとファイル拡張子から、最も適切なカテゴリを推定する。
//! 副作用なし。Framework Storeの状態には触れない。

use serde::Serialize;

use super::builtin::FALLBACK_CATEGORY;
use super::store::KeywordTable;

/// Tokens that mark source code as an example
const CODE_MARKERS: &[&str] = &["class ", "def ", "import "];
/// Both groups must appear for the structured-data shortcut
const ID_MARKERS: &[&str] = &["id:"];
const NAME_MARKERS: &[&str] = &["name:"];
const RULE_MARKERS: &[&str] = &["regel", "rule"];
const PRINCIPLE_MARKERS: &[&str] = &["prinzip", "principle"];

/// 拡張子から判定したファイル種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// `.yaml` / `.yml`
    StructuredData,
    /// `.py`
    Code,
    /// `.txt`
    PlainText,
    /// それ以外（生テキストとして扱う）
    Other,
}

impl FileKind {
    /// 拡張子から判定（先頭の`.`と大文字小文字は無視）
    pub fn from_extension(ext: &str) -> Self {
        match normalize_extension(ext).as_str() {
            "yaml" | "yml" => Self::StructuredData,
            "py" => Self::Code,
            "txt" => Self::PlainText,
            _ => Self::Other,
        }
    }

    /// Code種別の言語タグ
    pub fn language(ext: &str) -> Option<&'static str> {
        match normalize_extension(ext).as_str() {
            "py" => Some("python"),
            _ => None,
        }
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// 分類の根拠
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassificationMethod {
    /// 拡張子ショートカット（スコアリングなし）
    Shortcut,
    /// キーワードスコア
    Keywords { score: usize },
    /// どのカテゴリもスコア0
    Fallback,
}

/// 分類結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: String,
    pub method: ClassificationMethod,
}

impl Classification {
    fn shortcut(category: &str) -> Self {
        Self {
            category: category.to_string(),
            method: ClassificationMethod::Shortcut,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.method == ClassificationMethod::Fallback
    }
}

/// キーワードスコアによるカテゴリ分類器
#[derive(Debug, Clone, Default)]
pub struct ContentClassifier {
    table: KeywordTable,
}

impl ContentClassifier {
    pub fn new(table: KeywordTable) -> Self {
        Self { table }
    }

    /// ビルトインキーワードのみで構築
    pub fn builtin() -> Self {
        Self::new(KeywordTable::builtin())
    }

    pub fn table(&self) -> &KeywordTable {
        &self.table
    }

    /// コンテンツを分類
    ///
    /// 拡張子ショートカットが成立すれば即座に返す。
    /// それ以外は最高スコア（>0）のカテゴリ、同点は表の先頭側。
    pub fn classify(&self, content: &str, extension: Option<&str>) -> Classification {
        let lowered = content.to_lowercase();

        if let Some(ext) = extension {
            if let Some(category) = shortcut(&lowered, FileKind::from_extension(ext)) {
                return Classification::shortcut(category);
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (key, score) in self.score_lowered(&lowered) {
            // strict > keeps the earliest category on ties
            if score > 0 && best.map_or(true, |(_, top)| score > top) {
                best = Some((key, score));
            }
        }

        match best {
            Some((key, score)) => Classification {
                category: key.to_string(),
                method: ClassificationMethod::Keywords { score },
            },
            None => Classification {
                category: FALLBACK_CATEGORY.to_string(),
                method: ClassificationMethod::Fallback,
            },
        }
    }

    /// カテゴリキーのみを返す
    pub fn suggest(&self, content: &str, extension: Option<&str>) -> String {
        self.classify(content, extension).category
    }

    /// 全カテゴリのスコア（表の順）
    pub fn scores(&self, content: &str) -> Vec<(&str, usize)> {
        self.score_lowered(&content.to_lowercase())
    }

    fn score_lowered(&self, lowered: &str) -> Vec<(&str, usize)> {
        self.table
            .all()
            .iter()
            .map(|cat| {
                let score = cat
                    .keywords
                    .iter()
                    .filter(|kw| lowered.contains(kw.as_str()))
                    .count();
                (cat.key.as_str(), score)
            })
            .collect()
    }
}

/// 拡張子ごとのショートカット判定
fn shortcut(lowered: &str, kind: FileKind) -> Option<&'static str> {
    let contains_any = |markers: &[&str]| markers.iter().any(|m| lowered.contains(m));

    match kind {
        FileKind::Code if contains_any(CODE_MARKERS) => Some("examples"),
        FileKind::StructuredData if contains_any(ID_MARKERS) && contains_any(NAME_MARKERS) => {
            Some("principles")
        }
        FileKind::PlainText if contains_any(RULE_MARKERS) => Some("rules"),
        FileKind::PlainText if contains_any(PRINCIPLE_MARKERS) => Some("principles"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::store::{ClassifierConfig, KeywordConfigEntry};

    #[test]
    fn test_rule_keywords_without_hint() {
        let classifier = ContentClassifier::builtin();
        let result = classifier.classify("Diese Regel darf nicht gebrochen werden", None);
        assert_eq!(result.category, "rules");
        assert!(matches!(
            result.method,
            ClassificationMethod::Keywords { score } if score >= 2
        ));
    }

    #[test]
    fn test_no_keywords_falls_back() {
        let classifier = ContentClassifier::builtin();
        let result = classifier.classify("lorem ipsum dolor sit amet", None);
        assert_eq!(result.category, FALLBACK_CATEGORY);
        assert!(result.is_fallback());
    }

    #[test]
    fn test_code_shortcut_beats_scores() {
        let classifier = ContentClassifier::builtin();
        let content = "import os\n# Regel: niemals nicht prüfen, muss Prinzip sein\n";
        let result = classifier.classify(content, Some(".py"));
        assert_eq!(result.category, "examples");
        assert_eq!(result.method, ClassificationMethod::Shortcut);
    }

    #[test]
    fn test_code_without_markers_is_scored() {
        let classifier = ContentClassifier::builtin();
        let result = classifier.classify("x = 1  # process step", Some("py"));
        assert_eq!(result.category, "processes");
    }

    #[test]
    fn test_yaml_shortcut_requires_id_and_name() {
        let classifier = ContentClassifier::builtin();
        assert_eq!(
            classifier.suggest("id: P1\nname: Klarheit\n", Some("yaml")),
            "principles"
        );
        let result = classifier.classify("name: Klarheit\n", Some("yml"));
        assert_ne!(result.method, ClassificationMethod::Shortcut);
    }

    #[test]
    fn test_text_shortcut_prefers_rules() {
        let classifier = ContentClassifier::builtin();
        assert_eq!(
            classifier.suggest("Ein Prinzip und eine Regel", Some("TXT")),
            "rules"
        );
        assert_eq!(
            classifier.suggest("The principle of least surprise", Some("txt")),
            "principles"
        );
    }

    #[test]
    fn test_hint_is_ignored_for_unknown_extension() {
        let classifier = ContentClassifier::builtin();
        let result = classifier.classify("import this", Some("md"));
        assert_ne!(result.method, ClassificationMethod::Shortcut);
    }

    #[test]
    fn test_tie_break_uses_table_order() {
        let classifier = ContentClassifier::builtin();
        // one hit each for principles ("prinzip") and rules ("regel")
        let result = classifier.classify("prinzip regel", None);
        assert_eq!(result.category, "principles");
        assert_eq!(result.method, ClassificationMethod::Keywords { score: 1 });
    }

    #[test]
    fn test_rule_of_thumb_is_a_heuristic() {
        let classifier = ContentClassifier::builtin();
        assert_eq!(
            classifier.suggest("A good rule of thumb: measure first", None),
            "heuristics"
        );
        assert_eq!(classifier.suggest("Faustregel: erst messen", None), "heuristics");
        assert_eq!(classifier.suggest("Daumenregel zum Schätzen", None), "heuristics");
    }

    #[test]
    fn test_scores_in_table_order() {
        let classifier = ContentClassifier::builtin();
        let scores = classifier.scores("Offene Frage");
        assert_eq!(scores.len(), 10);
        assert_eq!(scores[0].0, "principles");
        let (key, score) = scores[9];
        assert_eq!(key, "open_questions");
        assert_eq!(score, 2);
    }

    #[test]
    fn test_configured_keywords_are_scored() {
        let config = ClassifierConfig {
            categories: vec![KeywordConfigEntry {
                key: "glossary".to_string(),
                keywords: vec!["glossar".to_string()],
                replace: false,
            }],
        };
        let classifier = ContentClassifier::new(KeywordTable::builtin().with_config(&config));
        assert_eq!(classifier.suggest("Glossar der Begriffe", None), "glossary");
    }

    #[test]
    fn test_file_kind_from_extension() {
        assert_eq!(FileKind::from_extension(".YAML"), FileKind::StructuredData);
        assert_eq!(FileKind::from_extension("yml"), FileKind::StructuredData);
        assert_eq!(FileKind::from_extension("py"), FileKind::Code);
        assert_eq!(FileKind::from_extension(".txt"), FileKind::PlainText);
        assert_eq!(FileKind::from_extension("md"), FileKind::Other);
        assert_eq!(FileKind::language(".py"), Some("python"));
        assert_eq!(FileKind::language("txt"), None);
    }
}
