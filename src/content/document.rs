//! The canonical `{posts, categories, settings}` document

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use super::Post;
use crate::error::{StoreError, ValidationError};

/// Default number of posts on a listing page
pub const DEFAULT_POSTS_PER_PAGE: usize = 6;

/// Blog-level settings stored inside the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub posts_per_page: usize,
    pub admin_email: String,

    // Unknown keys pass through untouched
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            posts_per_page: DEFAULT_POSTS_PER_PAGE,
            admin_email: String::new(),
            extra: IndexMap::new(),
        }
    }
}

/// Serializable snapshot of the whole content store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogDocument {
    pub posts: Vec<Post>,
    pub categories: IndexSet<String>,
    pub settings: Settings,
}

impl BlogDocument {
    /// Parse a document from JSON text. Absent sections default to empty.
    pub fn from_json(text: &str) -> Result<Self, StoreError> {
        serde_json::from_str(text).map_err(|e| StoreError::MalformedDocument(e.to_string()))
    }

    /// Parse a document supplied for import.
    ///
    /// Unlike [`BlogDocument::from_json`], a `posts` field that is present but
    /// not an array is reported as an invalid shape rather than a parse error.
    pub fn from_import_json(text: &str) -> Result<Self, StoreError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| StoreError::MalformedDocument(e.to_string()))?;

        let object = value.as_object().ok_or_else(|| {
            ValidationError::InvalidShape("document must be a JSON object".to_string())
        })?;

        if let Some(posts) = object.get("posts") {
            if !posts.is_array() {
                return Err(ValidationError::InvalidShape("`posts` must be an array".to_string()).into());
            }
        }

        serde_json::from_value(value).map_err(|e| StoreError::MalformedDocument(e.to_string()))
    }

    /// Pretty JSON suitable for writing to disk
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_defaults() {
        let doc = BlogDocument::from_json("{}").unwrap();
        assert!(doc.posts.is_empty());
        assert!(doc.categories.is_empty());
        assert_eq!(doc.settings.posts_per_page, DEFAULT_POSTS_PER_PAGE);
    }

    #[test]
    fn test_unknown_settings_pass_through() {
        let text = r#"{"settings": {"posts_per_page": 3, "admin_email": "a@b.c", "theme": "dark", "beta": true}}"#;
        let doc = BlogDocument::from_json(text).unwrap();
        assert_eq!(doc.settings.posts_per_page, 3);
        assert_eq!(doc.settings.admin_email, "a@b.c");
        assert_eq!(doc.settings.extra.get("theme"), Some(&serde_json::json!("dark")));

        let out: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();
        assert_eq!(out["settings"]["theme"], "dark");
        assert_eq!(out["settings"]["beta"], true);
    }

    #[test]
    fn test_categories_collapse_duplicates() {
        let doc = BlogDocument::from_json(r#"{"categories": ["Egress", "Smoke", "Egress"]}"#).unwrap();
        let categories: Vec<_> = doc.categories.iter().cloned().collect();
        assert_eq!(categories, vec!["Egress", "Smoke"]);
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = BlogDocument::from_json("{not json").unwrap_err();
        assert!(matches!(err, StoreError::MalformedDocument(_)));
    }

    #[test]
    fn test_import_rejects_non_array_posts() {
        let err = BlogDocument::from_import_json(r#"{"posts": "not-an-array"}"#).unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(ValidationError::InvalidShape(_))
        ));
    }

    #[test]
    fn test_import_rejects_non_object() {
        let err = BlogDocument::from_import_json("[1, 2]").unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(ValidationError::InvalidShape(_))
        ));
    }
}
