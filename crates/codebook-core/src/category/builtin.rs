//! Builtin Category Definitions
//!
//! すべてのFrameworkが持つ10個のビルトインカテゴリ。
//! 宣言順は新規Frameworkのキー順であり、分類器のタイブレーク順でもある。

use serde::{Deserialize, Serialize};

/// どのキーワードにもマッチしない場合の分類結果
pub const FALLBACK_CATEGORY: &str = "unknown";

/// ギャップ分析で必須とみなすカテゴリ
pub const ESSENTIAL_CATEGORIES: &[&str] = &[
    "principles",
    "rules",
    "heuristics",
    "roles",
    "processes",
    "examples",
    "transfer_examples",
];

/// 専用テンプレートを持たないカテゴリ用
pub const DEFAULT_TEMPLATE: &str = "# New item\nname: \"\"\ndescription: \"\"\n";

pub const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory {
        key: "principles",
        display_name: "Principles",
        description: "Foundational principles with goals, steps and attached rules.",
        keywords: &["prinzip", "principle", "grundsatz", "leitbild", "leitlinie", "hauptziel"],
        template: r#"id: ""
name: ""
description: ""
goals:
  - ""
steps:
  - ""
rules:
  - id: ""
    text: ""
heuristics:
  - ""
narrative_examples:
  - ""
transfer_examples:
  - context: ""
    rule: ""
    example: ""
semantic_gaps:
  - description: ""
    threshold: ""
    solution: ""
lessons_learned:
  - ""
"#,
    },
    BuiltinCategory {
        key: "rules",
        display_name: "Rules",
        description: "Concrete, binding rules: what must or must not be done.",
        keywords: &["regel", "rule", "muss", "must", "nicht", "niemals", "never", "verboten"],
        template: r#"id: ""
text: ""
context: ""
example: ""
"#,
    },
    BuiltinCategory {
        key: "heuristics",
        display_name: "Heuristics",
        description: "Rules of thumb and when to apply them.",
        // 複合語は固有の語幹も併記する (rules の "regel"/"rule" と同点にしない)
        keywords: &[
            "heuristik",
            "heuristic",
            "faustregel",
            "faust",
            "rule of thumb",
            "thumb",
            "daumenregel",
            "daumen",
            "wann",
        ],
        template: r#"rule: ""
when: ""
example: ""
"#,
    },
    BuiltinCategory {
        key: "roles",
        display_name: "Roles",
        description: "Roles with their tasks, responsibilities and interactions.",
        keywords: &["rolle", "role", "verantwortlich", "responsib", "zuständig", "akteur"],
        template: r#"name: ""
tasks:
  - ""
responsibilities:
  - ""
interactions:
  - ""
"#,
    },
    BuiltinCategory {
        key: "processes",
        display_name: "Processes",
        description: "Processes described as steps, participants and goals.",
        keywords: &["prozess", "process", "ablauf", "schritt", "step", "workflow", "phase"],
        template: r#"name: ""
steps:
  - ""
participants:
  - ""
goals:
  - ""
"#,
    },
    BuiltinCategory {
        key: "examples",
        display_name: "Examples",
        description: "Worked examples: starting point, transformation, lessons.",
        keywords: &["beispiel", "example", "ausgangslage", "fallstudie", "case study", "szenario"],
        template: r#"name: ""
starting_point: ""
transformation: ""
lessons_learned:
  - ""
"#,
    },
    BuiltinCategory {
        key: "transfer_examples",
        display_name: "Transfer Examples",
        description: "A rule carried over into a different context.",
        keywords: &["transfer", "übertrag", "analogie", "analogy", "anderen kontext"],
        template: r#"context: ""
rule: ""
example: ""
"#,
    },
    BuiltinCategory {
        key: "semantic_gaps",
        display_name: "Semantic Gaps",
        description: "Places where meaning drifts, with thresholds and remedies.",
        keywords: &["semantic gap", "semantische lücke", "lücke", "schwellenwert", "threshold", "missverständnis"],
        template: r#"description: ""
threshold: ""
solution: ""
"#,
    },
    BuiltinCategory {
        key: "lessons_learned",
        display_name: "Lessons Learned",
        description: "Experience gathered along the way and resulting recommendations.",
        keywords: &["lesson", "gelernt", "erfahrung", "experience", "empfehlung", "retrospektive"],
        template: r#"category: ""
experience: ""
recommendation: ""
"#,
    },
    BuiltinCategory {
        key: "open_questions",
        display_name: "Open Questions",
        description: "Unresolved questions with context and priority.",
        keywords: &["frage", "question", "unklar", "unclear", "offen", "ungeklärt"],
        template: r#"question: ""
context: ""
priority: ""
"#,
    },
];

/// ビルトインカテゴリの静的定義
#[derive(Debug, Clone)]
pub struct BuiltinCategory {
    /// Framework内のキー（一意識別子）
    pub key: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    /// 分類スコア用キーワード（小文字、部分一致）
    pub keywords: &'static [&'static str],
    /// 新規Item用のYAMLテンプレート
    pub template: &'static str,
}

/// ランタイムカテゴリ定義
///
/// ビルトインまたは`config.toml`の`[[classifier.categories]]`から構築される。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDef {
    pub key: String,
    pub keywords: Vec<String>,
}

impl From<&BuiltinCategory> for CategoryDef {
    fn from(builtin: &BuiltinCategory) -> Self {
        Self {
            key: builtin.key.to_string(),
            keywords: builtin.keywords.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// キーでビルトインを検索
pub fn builtin(key: &str) -> Option<&'static BuiltinCategory> {
    BUILTIN_CATEGORIES.iter().find(|c| c.key == key)
}

/// カテゴリのItemテンプレート（なければ[`DEFAULT_TEMPLATE`]）
pub fn template_for(key: &str) -> &'static str {
    builtin(key).map(|c| c.template).unwrap_or(DEFAULT_TEMPLATE)
}
