pub mod contact;
pub mod job_application;
pub mod phone;

use serde::Serialize;
use std::collections::BTreeMap;

pub use contact::{ContactForm, ContactSubmission};
pub use job_application::{Attachment, JobApplicationForm};
pub use phone::{validate_phone, PhoneField, PhoneValidation};

/// 逐欄位的驗證錯誤，直接顯示在表單欄位旁
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors {
    fields: BTreeMap<String, String>,
}

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.fields.entry(field.to_string()).or_insert_with(|| message.into());
    }

    /// 把 `utils::validation` 的結果轉成欄位錯誤
    pub fn check(&mut self, field: &str, result: crate::utils::error::Result<()>) {
        if let Err(e) = result {
            let message = match e {
                crate::utils::error::SiteError::InvalidConfigValueError { reason, .. } => reason,
                other => other.to_string(),
            };
            self.add(field, message);
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn into_result(self) -> std::result::Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl std::fmt::Display for FormErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, message)| format!("{}: {}", field, message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl From<FormErrors> for crate::utils::error::SiteError {
    fn from(errors: FormErrors) -> Self {
        crate::utils::error::SiteError::ValidationError {
            message: errors.to_string(),
        }
    }
}
