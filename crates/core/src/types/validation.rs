//! Input validation errors.

/// Errors raised when a create or update payload is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is missing or blank.
    #[error("Please provide a {0}")]
    MissingField(&'static str),
    /// No non-blank image URL was supplied.
    #[error("Please provide at least one image URL")]
    NoImageUrls,
}

/// Trim a required field, rejecting it when nothing is left.
pub(crate) fn require(value: &str, field: &'static str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}

/// Trim every image URL, drop blank entries, and require at least one to remain.
pub(crate) fn require_image_urls(urls: Vec<String>) -> Result<Vec<String>, ValidationError> {
    let urls: Vec<String> = urls
        .into_iter()
        .map(|url| url.trim().to_owned())
        .filter(|url| !url.is_empty())
        .collect();

    if urls.is_empty() {
        return Err(ValidationError::NoImageUrls);
    }
    Ok(urls)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_require_trims() {
        assert_eq!(require("  Hello ", "title").unwrap(), "Hello");
    }

    #[test]
    fn test_require_blank() {
        assert_eq!(
            require("   ", "title"),
            Err(ValidationError::MissingField("title"))
        );
    }

    #[test]
    fn test_image_urls_drops_blank_entries() {
        let urls = require_image_urls(vec![
            " https://img.example/a.jpg ".to_owned(),
            String::new(),
            "  ".to_owned(),
            "https://img.example/b.jpg".to_owned(),
        ])
        .unwrap();
        assert_eq!(
            urls,
            vec!["https://img.example/a.jpg", "https://img.example/b.jpg"]
        );
    }

    #[test]
    fn test_image_urls_all_blank() {
        assert_eq!(
            require_image_urls(vec![" ".to_owned(), String::new()]),
            Err(ValidationError::NoImageUrls)
        );
        assert_eq!(require_image_urls(Vec::new()), Err(ValidationError::NoImageUrls));
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            ValidationError::MissingField("title").to_string(),
            "Please provide a title"
        );
        assert_eq!(
            ValidationError::NoImageUrls.to_string(),
            "Please provide at least one image URL"
        );
    }
}
