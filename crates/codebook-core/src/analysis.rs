//! Structural analysis of a framework: item counts, recommendations, gaps.

use std::fmt;

use serde::Serialize;

use crate::category::ESSENTIAL_CATEGORIES;
use crate::framework::{is_reserved, Framework};

/// Categories with fewer items than this get a `Sparse` recommendation
const SPARSE_THRESHOLD: usize = 3;
/// Categories with fewer items than this show up as weak in the gap report
const WEAK_THRESHOLD: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StructureAnalysis {
    pub total_categories: usize,
    pub categories: Vec<CategoryCount>,
    pub total_items: usize,
}

impl StructureAnalysis {
    pub fn of(framework: &Framework) -> Self {
        let categories: Vec<CategoryCount> = framework
            .categories
            .iter()
            .filter(|(key, _)| !is_reserved(key))
            .map(|(key, entry)| CategoryCount {
                category: key.clone(),
                count: entry.item_count(),
            })
            .collect();

        Self {
            total_categories: categories.len(),
            total_items: categories.iter().map(|c| c.count).sum(),
            categories,
        }
    }

    pub fn count(&self, category: &str) -> Option<usize> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.count)
    }

    pub fn recommendations(&self) -> Vec<Recommendation> {
        self.categories
            .iter()
            .filter_map(|c| match c.count {
                0 => Some(Recommendation::Empty {
                    category: c.category.clone(),
                }),
                n if n < SPARSE_THRESHOLD => Some(Recommendation::Sparse {
                    category: c.category.clone(),
                    count: n,
                }),
                _ => None,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    Empty { category: String },
    Sparse { category: String, count: usize },
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { category } => write!(f, "{}: no items yet", category),
            Self::Sparse { category, count } => {
                write!(f, "{}: could use more items ({} present)", category, count)
            }
        }
    }
}

/// Missing essential categories and weakly populated ones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GapReport {
    pub missing: Vec<String>,
    pub weak: Vec<CategoryCount>,
}

impl GapReport {
    pub fn of(framework: &Framework) -> Self {
        let present = framework.category_keys();

        let missing = ESSENTIAL_CATEGORIES
            .iter()
            .filter(|essential| !present.contains(*essential))
            .map(|s| s.to_string())
            .collect();

        let weak = present
            .iter()
            .map(|key| CategoryCount {
                category: key.to_string(),
                count: framework.records(key).len(),
            })
            .filter(|c| c.count < WEAK_THRESHOLD)
            .collect();

        Self { missing, weak }
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MetaConfig;
    use crate::framework::{Entry, Record};
    use serde_yaml::Value;

    fn records(n: usize) -> Entry {
        Entry::Records((0..n).map(|i| Record::from(format!("item {}", i))).collect())
    }

    #[test]
    fn test_defaults_analysis() {
        let framework = Framework::with_defaults(&MetaConfig::default());
        let analysis = StructureAnalysis::of(&framework);
        assert_eq!(analysis.total_categories, 10);
        assert_eq!(analysis.total_items, 0);
        assert_eq!(analysis.recommendations().len(), 10);
    }

    #[test]
    fn test_malformed_entry_counts_as_one() {
        let mut framework = Framework::with_defaults(&MetaConfig::default());
        framework.categories.insert("rules".to_string(), records(4));
        framework
            .categories
            .insert("odd".to_string(), Entry::Other(Value::from("not a list")));

        let analysis = StructureAnalysis::of(&framework);
        assert_eq!(analysis.total_categories, 11);
        assert_eq!(analysis.count("rules"), Some(4));
        assert_eq!(analysis.count("odd"), Some(1));
        assert_eq!(analysis.total_items, 5);
    }

    #[test]
    fn test_recommendations() {
        let mut framework = Framework::with_defaults(&MetaConfig::default());
        framework.categories.clear();
        framework.categories.insert("a".to_string(), records(0));
        framework.categories.insert("b".to_string(), records(2));
        framework.categories.insert("c".to_string(), records(3));

        let recs = StructureAnalysis::of(&framework).recommendations();
        assert_eq!(
            recs,
            vec![
                Recommendation::Empty {
                    category: "a".to_string()
                },
                Recommendation::Sparse {
                    category: "b".to_string(),
                    count: 2
                },
            ]
        );
        assert_eq!(recs[1].to_string(), "b: could use more items (2 present)");
    }

    #[test]
    fn test_gap_report() {
        let mut framework = Framework::with_defaults(&MetaConfig::default());
        framework.categories.shift_remove("roles");
        framework.categories.shift_remove("examples");
        framework.categories.insert("rules".to_string(), records(2));
        framework.categories.insert("heuristics".to_string(), records(1));

        let report = GapReport::of(&framework);
        assert_eq!(report.missing, vec!["roles", "examples"]);
        assert!(!report.is_complete());
        assert!(report.weak.iter().all(|c| c.category != "rules"));
        assert!(report
            .weak
            .iter()
            .any(|c| c.category == "heuristics" && c.count == 1));
    }
}
