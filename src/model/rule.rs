//! Keyword rules that map attachment filenames to destination subfolders.

use serde::{Deserialize, Serialize};

/// A lowercase filename substring and the subfolder it routes to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRule {
    pub keyword: String,
    pub folder: String,
}

impl KeywordRule {
    pub fn new(keyword: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            folder: folder.into(),
        }
    }
}

/// Ordered keyword table. Rules are tested in declaration order and the
/// first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordTable {
    rules: Vec<KeywordRule>,
}

impl KeywordTable {
    /// Build a table from rules, lowercasing every keyword.
    ///
    /// Rules with an empty keyword are dropped: they would match every filename.
    pub fn new(rules: impl IntoIterator<Item = KeywordRule>) -> Self {
        let rules = rules
            .into_iter()
            .filter_map(|rule| {
                let keyword = rule.keyword.to_lowercase();
                if keyword.is_empty() {
                    tracing::warn!(folder = %rule.folder, "Ignoring keyword rule with empty keyword");
                    return None;
                }
                Some(KeywordRule {
                    keyword,
                    folder: rule.folder,
                })
            })
            .collect();
        Self { rules }
    }

    /// Return the subfolder for `filename`, or `None` if no keyword occurs in it.
    ///
    /// Matching is a case-insensitive substring test.
    pub fn classify(&self, filename: &str) -> Option<&str> {
        let lower = filename.to_lowercase();
        self.rules
            .iter()
            .find(|rule| lower.contains(rule.keyword.as_str()))
            .map(|rule| rule.folder.as_str())
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }
}

impl Default for KeywordTable {
    /// `lecture`, `hw`, `written assignment`, each routed to a folder of the same name.
    fn default() -> Self {
        Self::new(default_rules())
    }
}

/// The built-in rules, in match order.
pub fn default_rules() -> Vec<KeywordRule> {
    ["lecture", "hw", "written assignment"]
        .into_iter()
        .map(|k| KeywordRule::new(k, k))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let table = KeywordTable::default();
        let keywords: Vec<&str> = table.rules().iter().map(|r| r.keyword.as_str()).collect();
        assert_eq!(keywords, ["lecture", "hw", "written assignment"]);
    }

    #[test]
    fn test_classify_case_insensitive() {
        let table = KeywordTable::default();
        assert_eq!(table.classify("HW3_solutions.pdf"), Some("hw"));
        assert_eq!(table.classify("Lecture01.pptx"), Some("lecture"));
        assert_eq!(
            table.classify("Written Assignment 2.docx"),
            Some("written assignment")
        );
    }

    #[test]
    fn test_first_declared_keyword_wins() {
        let table = KeywordTable::default();
        assert_eq!(table.classify("hw_lecture_notes.pdf"), Some("lecture"));
    }

    #[test]
    fn test_no_match() {
        let table = KeywordTable::default();
        assert_eq!(table.classify("syllabus.pdf"), None);
        // "written_assignment" is not "written assignment"
        assert_eq!(table.classify("written_assignment.pdf"), None);
    }

    #[test]
    fn test_keywords_are_lowercased_and_empty_dropped() {
        let table = KeywordTable::new([
            KeywordRule::new("", "everything"),
            KeywordRule::new("LAB", "labs"),
        ]);
        assert_eq!(table.rules().len(), 1);
        assert_eq!(table.classify("lab4.zip"), Some("labs"));
        assert_eq!(table.classify("notes.txt"), None);
    }
}
