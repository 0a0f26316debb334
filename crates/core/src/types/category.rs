//! Category records.

use serde::{Deserialize, Serialize};

use super::id::CategoryId;
use super::validation::{ValidationError, require};

/// A named grouping label. Content refers to it by name, not by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    /// Names seeded into an empty category store.
    pub const DEFAULT_NAMES: [&'static str; 5] = [
        "Technology",
        "Health",
        "Education",
        "Entertainment",
        "Business",
    ];

    /// Create a category with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` if `name` is blank.
    pub fn new(name: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            id: CategoryId::generate(),
            name: Self::validate_name(name)?,
        })
    }

    /// The five default categories, each with a fresh id.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        Self::DEFAULT_NAMES
            .iter()
            .map(|name| Self {
                id: CategoryId::generate(),
                name: (*name).to_owned(),
            })
            .collect()
    }

    /// Trim a category name and reject blank ones.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` if `name` is blank.
    pub fn validate_name(name: &str) -> Result<String, ValidationError> {
        require(name, "category name")
    }

    /// Case-folded form of a category name. Used in storefront URLs and for
    /// every case-insensitive category comparison.
    #[must_use]
    pub fn slug_of(name: &str) -> String {
        name.to_lowercase()
    }

    /// URL path segment for the storefront category page.
    #[must_use]
    pub fn slug(&self) -> String {
        Self::slug_of(&self.name)
    }

    /// Whether `name` refers to this category, ignoring case.
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        Self::slug_of(name) == self.slug()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_trims_name() {
        let category = Category::new("  Science ").unwrap();
        assert_eq!(category.name, "Science");
    }

    #[test]
    fn test_new_rejects_blank() {
        assert!(Category::new("  ").is_err());
    }

    #[test]
    fn test_matches_folds_unicode_case() {
        let category = Category::new("Économie").unwrap();
        assert_eq!(category.slug(), "économie");
        assert!(category.matches("ÉCONOMIE"));
        assert!(category.matches("économie"));
        assert!(!category.matches("economie"));
    }

    #[test]
    fn test_defaults() {
        let defaults = Category::defaults();
        let names: Vec<&str> = defaults.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, Category::DEFAULT_NAMES);
        assert_ne!(defaults[0].id, defaults[1].id);
    }

    #[test]
    fn test_json_shape() {
        let category = Category::new("Health").unwrap();
        let json = serde_json::to_value(&category).unwrap();
        assert_eq!(json["name"], "Health");
        assert_eq!(json["id"], category.id.to_string());
    }
}
