//! Content records and their create/update payloads.
//!
//! Field names are camelCase on the wire (`imageUrls`, `createdAt`) and the
//! body text is serialized as `content`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::category::Category;
use super::id::ContentId;
use super::validation::{ValidationError, require, require_image_urls};

/// A single published item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: ContentId,
    pub title: String,
    pub subtitle: String,
    /// Category name. Expected to match a `Category`, not enforced.
    pub category: String,
    #[serde(rename = "content")]
    pub body: String,
    /// Ordered, never empty, no blank entries.
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Content {
    /// Build a new record from a payload, assigning id and timestamps.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if any required field is blank or no
    /// usable image URL remains after trimming.
    pub fn create(input: NewContent, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        let input = input.validate()?;
        Ok(Self {
            id: ContentId::generate(),
            title: input.title,
            subtitle: input.subtitle,
            category: input.category,
            body: input.content,
            image_urls: input.image_urls,
            created_at: now,
            updated_at: now,
        })
    }

    /// First image, used as the card thumbnail.
    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    /// Case-insensitive match against a category name.
    #[must_use]
    pub fn in_category(&self, name: &str) -> bool {
        Category::slug_of(&self.category) == Category::slug_of(name)
    }
}

/// Payload for creating content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContent {
    pub title: String,
    pub subtitle: String,
    pub category: String,
    pub content: String,
    pub image_urls: Vec<String>,
}

impl NewContent {
    /// Trim every field and drop blank image URLs.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` naming the first field that is blank, or
    /// `NoImageUrls` when no image URL remains.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            title: require(&self.title, "title")?,
            subtitle: require(&self.subtitle, "subtitle")?,
            category: require(&self.category, "category")?,
            content: require(&self.content, "content")?,
            image_urls: require_image_urls(self.image_urls)?,
        })
    }
}

/// Partial update. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
}

impl ContentUpdate {
    /// Validate the supplied fields with the same rules as `NewContent`.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if a supplied field is blank.
    pub fn validate(self) -> Result<Self, ValidationError> {
        Ok(Self {
            title: self.title.map(|v| require(&v, "title")).transpose()?,
            subtitle: self.subtitle.map(|v| require(&v, "subtitle")).transpose()?,
            category: self.category.map(|v| require(&v, "category")).transpose()?,
            content: self.content.map(|v| require(&v, "content")).transpose()?,
            image_urls: self.image_urls.map(require_image_urls).transpose()?,
        })
    }

    /// Shallow-merge the update over `target` and bump `updated_at`.
    ///
    /// Nothing is written to `target` unless every supplied field is valid.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if a supplied field is blank.
    pub fn apply(self, target: &mut Content, now: DateTime<Utc>) -> Result<(), ValidationError> {
        let update = self.validate()?;

        if let Some(title) = update.title {
            target.title = title;
        }
        if let Some(subtitle) = update.subtitle {
            target.subtitle = subtitle;
        }
        if let Some(category) = update.category {
            target.category = category;
        }
        if let Some(content) = update.content {
            target.body = content;
        }
        if let Some(image_urls) = update.image_urls {
            target.image_urls = image_urls;
        }
        target.updated_at = next_updated_at(target.updated_at, now);

        Ok(())
    }

    /// Whether no field is supplied.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.subtitle.is_none()
            && self.category.is_none()
            && self.content.is_none()
            && self.image_urls.is_none()
    }
}

/// `updated_at` must strictly increase even if the clock stalls or steps back.
fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    now.max(previous + Duration::microseconds(1))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> NewContent {
        NewContent {
            title: "Rust 2024".to_owned(),
            subtitle: "What changed".to_owned(),
            category: "Technology".to_owned(),
            content: "Edition notes.".to_owned(),
            image_urls: vec!["https://img.example/rust.png".to_owned()],
        }
    }

    #[test]
    fn test_create_sets_timestamps() {
        let now = Utc::now();
        let content = Content::create(sample(), now).unwrap();
        assert_eq!(content.created_at, now);
        assert_eq!(content.updated_at, now);
        assert_eq!(content.title, "Rust 2024");
        assert_eq!(content.body, "Edition notes.");
    }

    #[test]
    fn test_create_rejects_missing_images() {
        let input = NewContent {
            image_urls: vec!["   ".to_owned()],
            ..sample()
        };
        assert_eq!(
            Content::create(input, Utc::now()),
            Err(ValidationError::NoImageUrls)
        );
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let input = NewContent {
            title: " ".to_owned(),
            ..sample()
        };
        assert_eq!(
            Content::create(input, Utc::now()),
            Err(ValidationError::MissingField("title"))
        );
    }

    #[test]
    fn test_apply_merges_only_supplied_fields() {
        let created = Utc::now();
        let mut content = Content::create(sample(), created).unwrap();
        let update = ContentUpdate {
            title: Some("Rust 2024, revisited".to_owned()),
            ..ContentUpdate::default()
        };

        update.apply(&mut content, created).unwrap();

        assert_eq!(content.title, "Rust 2024, revisited");
        assert_eq!(content.subtitle, "What changed");
        assert_eq!(content.image_urls, vec!["https://img.example/rust.png"]);
        assert_eq!(content.created_at, created);
        assert!(content.updated_at > created);
    }

    #[test]
    fn test_apply_invalid_leaves_record_untouched() {
        let mut content = Content::create(sample(), Utc::now()).unwrap();
        let before = content.clone();
        let update = ContentUpdate {
            title: Some("New title".to_owned()),
            image_urls: Some(Vec::new()),
            ..ContentUpdate::default()
        };

        assert!(update.apply(&mut content, Utc::now()).is_err());
        assert_eq!(content, before);
    }

    #[test]
    fn test_next_updated_at_is_strict() {
        let now = Utc::now();
        assert!(next_updated_at(now, now) > now);
        assert!(next_updated_at(now, now - Duration::seconds(5)) > now);
        let later = now + Duration::seconds(5);
        assert_eq!(next_updated_at(now, later), later);
    }

    #[test]
    fn test_in_category_ignores_case() {
        let content = Content::create(sample(), Utc::now()).unwrap();
        assert!(content.in_category("technology"));
        assert!(content.in_category("TECHNOLOGY"));
        assert!(!content.in_category("health"));

        let mut accented = content;
        accented.category = "Économie".to_string();
        assert!(accented.in_category("ÉCONOMIE"));
    }

    #[test]
    fn test_wire_field_names() {
        let content = Content::create(sample(), Utc::now()).unwrap();
        let json = serde_json::to_value(&content).unwrap();
        assert_eq!(json["content"], "Edition notes.");
        assert_eq!(json["imageUrls"][0], "https://img.example/rust.png");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("body").is_none());
    }

    #[test]
    fn test_update_is_empty() {
        assert!(ContentUpdate::default().is_empty());
        let update = ContentUpdate {
            content: Some("x".to_owned()),
            ..ContentUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
