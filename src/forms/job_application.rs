use crate::forms::phone::{rule_for, validate_phone, DEFAULT_COUNTRY};
use crate::forms::FormErrors;
use crate::utils::error::Result;
use crate::utils::validation::{validate_email, validate_file_extension, validate_non_empty_string};
use reqwest::multipart::{Form, Part};

pub const ALLOWED_ATTACHMENT_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobApplicationForm {
    pub job_slug: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub country: String,
    pub phone: String,
    pub cover_letter: Option<String>,
    pub attachments: Vec<Attachment>,
}

impl Default for JobApplicationForm {
    fn default() -> Self {
        Self {
            job_slug: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
            phone: String::new(),
            cover_letter: None,
            attachments: Vec::new(),
        }
    }
}

impl JobApplicationForm {
    pub fn validate(&self) -> std::result::Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        errors.check("job_slug", validate_non_empty_string("job_slug", &self.job_slug));
        errors.check("first_name", validate_non_empty_string("first_name", &self.first_name));
        errors.check("last_name", validate_non_empty_string("last_name", &self.last_name));
        errors.check("email", validate_email("email", &self.email));

        let phone = validate_phone(&self.country, &self.phone);
        if !phone.is_valid() {
            errors.add("phone", phone.message());
        }

        if self.attachments.is_empty() {
            errors.add("attachments", "Please attach your CV");
        }
        for attachment in &self.attachments {
            errors.check(
                "attachments",
                validate_file_extension("attachments", &attachment.file_name, ALLOWED_ATTACHMENT_EXTENSIONS),
            );
            if attachment.bytes.len() > MAX_ATTACHMENT_BYTES {
                errors.add(
                    "attachments",
                    format!("{} is larger than {} MB", attachment.file_name, MAX_ATTACHMENT_BYTES / 1024 / 1024),
                );
            }
        }

        errors.into_result()
    }

    /// 組成 multipart 表單：文字欄位 + 每個附件一個 `attachments[]` part
    pub fn to_multipart(&self) -> Result<Form> {
        let dial_code = rule_for(&self.country).map(|rule| rule.dial_code).unwrap_or_default();

        let mut form = Form::new()
            .text("job", self.job_slug.clone())
            .text("firstName", self.first_name.trim().to_string())
            .text("lastName", self.last_name.trim().to_string())
            .text("email", self.email.trim().to_string())
            .text("phone", format!("{}{}", dial_code, self.phone))
            .text("countryCode", self.country.to_ascii_lowercase());

        if let Some(letter) = self.cover_letter.as_deref().filter(|l| !l.trim().is_empty()) {
            form = form.text("coverLetter", letter.to_string());
        }

        for attachment in &self.attachments {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.file_name.clone())
                .mime_str(&attachment.content_type)?;
            form = form.part("attachments[]", part);
        }

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> JobApplicationForm {
        JobApplicationForm {
            job_slug: "senior-rust-engineer".to_string(),
            first_name: "Omar".to_string(),
            last_name: "Haddad".to_string(),
            email: "omar@example.com".to_string(),
            country: "eg".to_string(),
            phone: "1012345678".to_string(),
            cover_letter: None,
            attachments: vec![Attachment::new("cv.pdf", "application/pdf", b"%PDF-1.7".to_vec())],
        }
    }

    #[test]
    fn test_valid_application() {
        assert!(valid_form().validate().is_ok());
        assert!(valid_form().to_multipart().is_ok());
    }

    #[test]
    fn test_missing_cv_rejected() {
        let form = JobApplicationForm {
            attachments: vec![],
            ..valid_form()
        };
        assert_eq!(form.validate().unwrap_err().get("attachments"), Some("Please attach your CV"));
    }

    #[test]
    fn test_attachment_extension_and_size() {
        let form = JobApplicationForm {
            attachments: vec![Attachment::new("cv.exe", "application/octet-stream", vec![0; 4])],
            ..valid_form()
        };
        assert!(form.validate().unwrap_err().contains("attachments"));

        let form = JobApplicationForm {
            attachments: vec![Attachment::new("cv.pdf", "application/pdf", vec![0; MAX_ATTACHMENT_BYTES + 1])],
            ..valid_form()
        };
        assert!(form.validate().unwrap_err().get("attachments").unwrap().contains("larger than 5 MB"));
    }

    #[test]
    fn test_phone_validated_against_selected_country() {
        let form = JobApplicationForm {
            country: "sa".to_string(),
            ..valid_form()
        };
        assert!(form.validate().unwrap_err().contains("phone"));
    }

    #[test]
    fn test_invalid_mime_type_is_error() {
        let form = JobApplicationForm {
            attachments: vec![Attachment::new("cv.pdf", "not a mime", vec![1])],
            ..valid_form()
        };
        assert!(form.to_multipart().is_err());
    }
}
