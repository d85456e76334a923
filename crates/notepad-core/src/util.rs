//! Shared utility functions used across multiple modules.

/// Normalize optional text by trimming whitespace and removing empties.
///
/// Returns `None` when the input is `None` or the trimmed value is empty.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Check if a string starts with `http://` or `https://`.
pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

/// Trim a URL and strip trailing slashes, rejecting values without an HTTP scheme.
pub fn normalize_http_url(raw: &str, field: &str) -> Result<String, String> {
    let value = raw.trim().trim_end_matches('/').to_string();
    if value.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if !is_http_url(&value) {
        return Err(format!("{field} must include http:// or https://"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_text_option_rejects_empty() {
        assert_eq!(normalize_text_option(None), None);
        assert_eq!(normalize_text_option(Some("   ".to_string())), None);
    }

    #[test]
    fn normalize_text_option_trims_value() {
        assert_eq!(
            normalize_text_option(Some(" https://example.com ".to_string())),
            Some("https://example.com".to_string())
        );
    }

    #[test]
    fn is_http_url_accepts_valid_schemes() {
        assert!(is_http_url("http://localhost"));
        assert!(is_http_url("https://example.com"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("example.com"));
    }

    #[test]
    fn normalize_http_url_trims_and_validates() {
        assert_eq!(
            normalize_http_url(" https://api.example.com/graphql/ ", "endpoint").unwrap(),
            "https://api.example.com/graphql"
        );
        assert!(normalize_http_url("", "endpoint")
            .unwrap_err()
            .contains("must not be empty"));
        assert!(normalize_http_url("api.example.com", "endpoint")
            .unwrap_err()
            .contains("http:// or https://"));
    }
}
