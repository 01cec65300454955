//! Keyword theme classifier.
//!
//! Matching is plain substring containment on the lower-cased title: a keyword
//! inside a longer word still counts ("art" matches "party"). Existing tagged
//! data depends on this, so it must not become word-boundary matching.

use std::sync::Arc;

use super::{Taxonomy, ThemeRule, GENERAL_THEME};

/// Maps titles to theme tags using a shared, immutable taxonomy.
#[derive(Debug, Clone)]
pub struct ThemeClassifier {
    taxonomy: Arc<Taxonomy>,
}

impl ThemeClassifier {
    pub fn new(taxonomy: Arc<Taxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Rules triggered by a title, in taxonomy order.
    pub fn matching_rules<'a>(&'a self, title: &str) -> impl Iterator<Item = &'a ThemeRule> + 'a {
        let lowered = title.to_lowercase();
        self.taxonomy
            .themes
            .iter()
            .filter(move |rule| rule.keywords.iter().any(|k| lowered.contains(k.as_str())))
    }

    /// Theme tags for a title: matching themes in taxonomy order, or
    /// `["General"]` when nothing matches. Never empty, never fails.
    pub fn classify(&self, title: &str) -> Vec<String> {
        let themes: Vec<String> = self
            .matching_rules(title)
            .map(|rule| rule.name.clone())
            .collect();

        if themes.is_empty() {
            vec![GENERAL_THEME.to_string()]
        } else {
            themes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::presets;

    fn classifier(taxonomy: Taxonomy) -> ThemeClassifier {
        ThemeClassifier::new(Arc::new(taxonomy))
    }

    fn custom(rules: &[(&str, &[&str])]) -> ThemeClassifier {
        let themes = rules
            .iter()
            .map(|(name, keywords)| ThemeRule {
                name: name.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect();
        classifier(Taxonomy { name: "test".into(), version: "1".into(), themes })
    }

    #[test]
    fn test_empty_title_is_general() {
        let c = classifier(presets::standard());
        assert_eq!(c.classify(""), vec![GENERAL_THEME]);
    }

    #[test]
    fn test_no_match_is_general() {
        let c = classifier(presets::legacy());
        assert_eq!(c.classify("Zzz"), vec![GENERAL_THEME]);
    }

    #[test]
    fn test_legacy_grace_and_faith() {
        let c = classifier(presets::legacy());
        assert_eq!(c.classify("Grace and Faith"), vec!["Grace", "Faith"]);
    }

    #[test]
    fn test_taxonomy_order_not_title_order() {
        let c = classifier(presets::standard());
        let themes = c.classify("Healing and Grace");
        let grace = themes.iter().position(|t| t == "Grace & Gospel").unwrap();
        let healing = themes.iter().position(|t| t == "Healing & Miracles").unwrap();
        assert!(grace < healing);
        assert_eq!(themes, c.classify("Grace and Healing"));
    }

    #[test]
    fn test_case_insensitive_matching() {
        let c = custom(&[("Hope", &["hope"])]);
        assert_eq!(c.classify("HOPE Rising"), vec!["Hope"]);
    }

    #[test]
    fn test_substring_inside_word_matches() {
        let c = custom(&[("Art", &["art"]), ("Music", &["song"])]);
        assert_eq!(c.classify("Birthday Party"), vec!["Art"]);
    }

    #[test]
    fn test_multi_word_keyword() {
        let c = classifier(presets::legacy());
        assert_eq!(c.classify("Signs of the End Times"), vec!["End Times"]);
        // "end" alone is not a legacy keyword
        assert_eq!(c.classify("The End"), vec![GENERAL_THEME]);
    }

    #[test]
    fn test_deterministic() {
        let c = classifier(presets::standard());
        let title = "The Anointing Brings Joy and Peace";
        let first = c.classify(title);
        for _ in 0..10 {
            assert_eq!(c.classify(title), first);
        }
    }

    #[test]
    fn test_title_casing_irrelevant() {
        let c = classifier(presets::standard());
        assert_eq!(c.classify("FAITH IN THE CLOUD"), c.classify("faith in the cloud"));
    }
}
