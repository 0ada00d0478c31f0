use crate::utils::error::{Result, SiteError};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});

fn invalid(field_name: &str, value: impl Into<String>, reason: impl Into<String>) -> SiteError {
    SiteError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.into(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(invalid(
                field_name,
                url_str,
                format!("Unsupported URL scheme: {}", scheme),
            )),
        },
        Err(e) => Err(invalid(field_name, url_str, format!("Invalid URL format: {}", e))),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value.to_string(),
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// 檢查上傳檔名的副檔名（不分大小寫）
pub fn validate_file_extension(field_name: &str, file_name: &str, allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<String> = allowed_extensions.iter().map(|e| e.to_ascii_lowercase()).collect();

    match std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(&extension.to_ascii_lowercase()) => Ok(()),
        Some(extension) => Err(invalid(
            field_name,
            file_name,
            format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        )),
        None => Err(invalid(field_name, file_name, "File has no extension or invalid filename")),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| SiteError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "Value cannot be empty or whitespace-only"));
    }
    Ok(())
}

pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    if !EMAIL_RE.is_match(value.trim()) {
        return Err(invalid(field_name, value, "Not a valid email address"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api.base_url", "https://cms.techhouse.io/api").is_ok());
        assert!(validate_url("api.base_url", "http://localhost:8000").is_ok());
        assert!(validate_url("api.base_url", "").is_err());
        assert!(validate_url("api.base_url", "invalid-url").is_err());
        assert!(validate_url("api.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension("attachments", "cv.pdf", &["pdf", "docx"]).is_ok());
        assert!(validate_file_extension("attachments", "CV.PDF", &["pdf", "docx"]).is_ok());
        assert!(validate_file_extension("attachments", "cv.exe", &["pdf", "docx"]).is_err());
        assert!(validate_file_extension("attachments", "cv", &["pdf"]).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "sara@techhouse.io").is_ok());
        assert!(validate_email("email", "  sara@techhouse.io ").is_ok());
        assert!(validate_email("email", "sara@").is_err());
        assert!(validate_email("email", "not an email").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("listing.rows", 9, 1, 100).is_ok());
        assert!(validate_range("listing.rows", 0, 1, 100).is_err());
    }
}
