use crate::forms::phone::{validate_phone, DEFAULT_COUNTRY};
use crate::forms::FormErrors;
use crate::utils::validation::{validate_email, validate_non_empty_string};
use serde::{Deserialize, Serialize};

const MAX_MESSAGE_LENGTH: usize = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub country: String,
    pub phone: String,
    pub company: Option<String>,
    pub service: Option<String>,
    pub message: String,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            country: DEFAULT_COUNTRY.to_string(),
            phone: String::new(),
            company: None,
            service: None,
            message: String::new(),
        }
    }
}

/// 送往 CMS 的聯絡表單內容
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub country_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();

        errors.check("name", validate_non_empty_string("name", &self.name));
        errors.check("email", validate_email("email", &self.email));
        errors.check("message", validate_non_empty_string("message", &self.message));
        if self.message.chars().count() > MAX_MESSAGE_LENGTH {
            errors.add(
                "message",
                format!("Message must be at most {} characters", MAX_MESSAGE_LENGTH),
            );
        }

        let phone = validate_phone(&self.country, &self.phone);
        if !phone.is_valid() {
            errors.add("phone", phone.message());
        }

        errors.into_result()
    }

    /// 驗證並轉成提交內容，電話號碼帶上國碼
    pub fn submission(&self) -> Result<ContactSubmission, FormErrors> {
        self.validate()?;

        let dial_code = crate::forms::phone::rule_for(&self.country)
            .map(|rule| rule.dial_code)
            .unwrap_or_default();

        Ok(ContactSubmission {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: format!("{}{}", dial_code, self.phone),
            country_code: self.country.to_ascii_lowercase(),
            company: non_blank(&self.company),
            service: non_blank(&self.service),
            message: self.message.trim().to_string(),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
