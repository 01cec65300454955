//! Theme taxonomy and keyword classifier.
//!
//! A [`Taxonomy`] is an ordered list of `(theme, keywords)` rules. The order is
//! part of the output: a title matching several themes gets them in rule
//! order. It is loaded once at startup, frozen behind an `Arc`, and handed to
//! the [`ThemeClassifier`].
//!
//! ## JSON format
//!
//! ```json
//! {
//!   "name": "standard",
//!   "version": "2",
//!   "themes": [
//!     { "name": "Grace & Gospel", "keywords": ["grace", "gospel"] },
//!     { "name": "Healing & Miracles", "keywords": ["healing", "miracle"] }
//!   ]
//! }
//! ```

pub mod classifier;
pub mod presets;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;

use crate::error::{TaxonomyError, TaxonomyResult};
use crate::validation::validate_taxonomy_document;

pub use classifier::ThemeClassifier;

/// Tag given to recordings that match no theme.
pub const GENERAL_THEME: &str = "General";

/// Ordered keyword rules for theme tagging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Taxonomy {
    /// Short name recorded alongside tagged data.
    pub name: String,

    /// Version of the keyword table
    #[serde(default = "default_version")]
    pub version: String,

    /// Rules in display and tie-break order.
    pub themes: Vec<ThemeRule>,
}

/// One theme and the substrings that trigger it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemeRule {
    pub name: String,
    /// Lower-case substrings; any one occurring in a title triggers the theme.
    pub keywords: Vec<String>,
}

fn default_version() -> String {
    "1".to_string()
}

impl Taxonomy {
    /// Load a built-in preset (`standard` or `legacy`).
    pub fn preset(name: &str) -> TaxonomyResult<Self> {
        presets::by_name(name).ok_or_else(|| TaxonomyError::UnknownPreset(name.to_string()))
    }

    /// Parse and validate a taxonomy from JSON.
    pub fn from_json(json: &str) -> TaxonomyResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Parse and validate a taxonomy from a JSON value.
    pub fn from_value(value: Value) -> TaxonomyResult<Self> {
        validate_taxonomy_document(&value).map_err(TaxonomyError::Schema)?;
        let taxonomy: Taxonomy = serde_json::from_value(value)?;
        taxonomy.validated()
    }

    /// Read a taxonomy JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> TaxonomyResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check structure and lower-case every keyword.
    pub fn validated(mut self) -> TaxonomyResult<Self> {
        let mut seen = HashSet::new();

        for (position, theme) in self.themes.iter_mut().enumerate() {
            if theme.name.trim().is_empty() {
                return Err(TaxonomyError::EmptyThemeName(position));
            }
            if theme.name == GENERAL_THEME {
                return Err(TaxonomyError::ReservedTheme(theme.name.clone()));
            }
            if !seen.insert(theme.name.clone()) {
                return Err(TaxonomyError::DuplicateTheme(theme.name.clone()));
            }
            if theme.keywords.is_empty() {
                return Err(TaxonomyError::NoKeywords(theme.name.clone()));
            }
            if theme.keywords.iter().any(|k| k.is_empty()) {
                return Err(TaxonomyError::EmptyKeyword(theme.name.clone()));
            }
            for keyword in theme.keywords.iter_mut() {
                *keyword = keyword.to_lowercase();
            }
        }

        Ok(self)
    }

    /// Theme names in rule order.
    pub fn theme_names(&self) -> Vec<&str> {
        self.themes.iter().map(|t| t.name.as_str()).collect()
    }

    /// Position of a theme in rule order.
    pub fn position(&self, theme: &str) -> Option<usize> {
        self.themes.iter().position(|t| t.name == theme)
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        presets::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_json_roundtrip_keeps_order() {
        let taxonomy = presets::legacy();
        let json = taxonomy.to_json().unwrap();
        let parsed = Taxonomy::from_json(&json).unwrap();
        assert_eq!(parsed, taxonomy);
    }

    #[test]
    fn test_keywords_lowercased() {
        let taxonomy = Taxonomy::from_value(json!({
            "name": "custom",
            "themes": [{ "name": "Hope", "keywords": ["HOPE", "Future"] }]
        }))
        .unwrap();
        assert_eq!(taxonomy.themes[0].keywords, vec!["hope", "future"]);
        assert_eq!(taxonomy.version, "1");
    }

    #[test]
    fn test_duplicate_theme_rejected() {
        let result = Taxonomy::from_value(json!({
            "name": "dup",
            "themes": [
                { "name": "Hope", "keywords": ["hope"] },
                { "name": "Hope", "keywords": ["future"] }
            ]
        }));
        assert!(matches!(result, Err(TaxonomyError::DuplicateTheme(name)) if name == "Hope"));
    }

    #[test]
    fn test_reserved_theme_rejected() {
        let result = Taxonomy::from_value(json!({
            "name": "bad",
            "themes": [{ "name": "General", "keywords": ["misc"] }]
        }));
        assert!(matches!(result, Err(TaxonomyError::ReservedTheme(_))));
    }

    #[test]
    fn test_schema_violation_reported() {
        let result = Taxonomy::from_value(json!({ "name": "bad", "themes": [{ "name": "Hope" }] }));
        assert!(matches!(result, Err(TaxonomyError::Schema(_))));
    }

    #[test]
    fn test_empty_keyword_rejected_programmatically() {
        let taxonomy = Taxonomy {
            name: "x".into(),
            version: "1".into(),
            themes: vec![ThemeRule { name: "All".into(), keywords: vec![String::new()] }],
        };
        assert!(matches!(taxonomy.validated(), Err(TaxonomyError::EmptyKeyword(_))));
    }

    #[test]
    fn test_unknown_preset() {
        assert!(matches!(Taxonomy::preset("nope"), Err(TaxonomyError::UnknownPreset(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("taxonomy.json");
        std::fs::write(&path, presets::standard().to_json().unwrap()).unwrap();
        let loaded = Taxonomy::from_file(&path).unwrap();
        assert_eq!(loaded.position("Healing & Miracles"), Some(5));
    }
}
