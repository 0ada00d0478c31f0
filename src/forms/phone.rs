use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::LazyLock;

/// 單一國家的手機號碼規則（不含國碼）
#[derive(Debug)]
pub struct CountryPhoneRule {
    pub code: &'static str,
    pub name: &'static str,
    pub dial_code: &'static str,
    pub pattern: Regex,
    pub min_length: usize,
    pub max_length: usize,
    pub placeholder: &'static str,
}

// (code, name, dial code, pattern, min, max, placeholder)
type RuleDef = (&'static str, &'static str, &'static str, &'static str, usize, usize, &'static str);

const RULE_DEFS: &[RuleDef] = &[
    ("sa", "Saudi Arabia", "+966", r"^5[0-9]{8}$", 9, 9, "5XXXXXXXX"),
    ("eg", "Egypt", "+20", r"^1[0125][0-9]{8}$", 10, 10, "1XXXXXXXXX"),
    ("ae", "United Arab Emirates", "+971", r"^5[0-9]{8}$", 9, 9, "5XXXXXXXX"),
    ("kw", "Kuwait", "+965", r"^[569][0-9]{7}$", 8, 8, "5XXXXXXX"),
    ("qa", "Qatar", "+974", r"^[3567][0-9]{7}$", 8, 8, "3XXXXXXX"),
    ("bh", "Bahrain", "+973", r"^[36][0-9]{7}$", 8, 8, "3XXXXXXX"),
    ("om", "Oman", "+968", r"^[79][0-9]{7}$", 8, 8, "9XXXXXXX"),
    ("jo", "Jordan", "+962", r"^7[789][0-9]{7}$", 9, 9, "7XXXXXXXX"),
    ("lb", "Lebanon", "+961", r"^(3[0-9]{6}|7[0169][0-9]{6}|81[0-9]{6})$", 7, 8, "3XXXXXX"),
    ("sy", "Syria", "+963", r"^9[0-9]{8}$", 9, 9, "9XXXXXXXX"),
    ("iq", "Iraq", "+964", r"^7[0-9]{9}$", 10, 10, "7XXXXXXXXX"),
    ("ye", "Yemen", "+967", r"^7[0137][0-9]{7}$", 9, 9, "7XXXXXXXX"),
    ("ps", "Palestine", "+970", r"^5[69][0-9]{7}$", 9, 9, "5XXXXXXXX"),
    ("ly", "Libya", "+218", r"^9[1-5][0-9]{7}$", 9, 9, "9XXXXXXXX"),
    ("tn", "Tunisia", "+216", r"^[2459][0-9]{7}$", 8, 8, "2XXXXXXX"),
    ("dz", "Algeria", "+213", r"^[567][0-9]{8}$", 9, 9, "5XXXXXXXX"),
    ("ma", "Morocco", "+212", r"^[67][0-9]{8}$", 9, 9, "6XXXXXXXX"),
    ("sd", "Sudan", "+249", r"^9[0-9]{8}$", 9, 9, "9XXXXXXXX"),
    ("us", "United States", "+1", r"^[2-9][0-9]{9}$", 10, 10, "2XXXXXXXXX"),
    ("ca", "Canada", "+1", r"^[2-9][0-9]{9}$", 10, 10, "2XXXXXXXXX"),
    ("gb", "United Kingdom", "+44", r"^7[0-9]{9}$", 10, 10, "7XXXXXXXXX"),
    ("fr", "France", "+33", r"^[67][0-9]{8}$", 9, 9, "6XXXXXXXX"),
    ("de", "Germany", "+49", r"^1[5-7][0-9]{8,9}$", 10, 11, "15XXXXXXXX"),
    ("it", "Italy", "+39", r"^3[0-9]{8,9}$", 9, 10, "3XXXXXXXX"),
    ("es", "Spain", "+34", r"^[67][0-9]{8}$", 9, 9, "6XXXXXXXX"),
    ("nl", "Netherlands", "+31", r"^6[0-9]{8}$", 9, 9, "6XXXXXXXX"),
    ("be", "Belgium", "+32", r"^4[0-9]{8}$", 9, 9, "4XXXXXXXX"),
    ("ch", "Switzerland", "+41", r"^7[5-9][0-9]{7}$", 9, 9, "7XXXXXXXX"),
    ("se", "Sweden", "+46", r"^7[02369][0-9]{7}$", 9, 9, "7XXXXXXXX"),
    ("no", "Norway", "+47", r"^[49][0-9]{7}$", 8, 8, "4XXXXXXX"),
    ("dk", "Denmark", "+45", r"^[2-9][0-9]{7}$", 8, 8, "2XXXXXXX"),
    ("tr", "Turkey", "+90", r"^5[0-9]{9}$", 10, 10, "5XXXXXXXXX"),
    ("in", "India", "+91", r"^[6-9][0-9]{9}$", 10, 10, "9XXXXXXXXX"),
    ("pk", "Pakistan", "+92", r"^3[0-9]{9}$", 10, 10, "3XXXXXXXXX"),
    ("bd", "Bangladesh", "+880", r"^1[3-9][0-9]{8}$", 10, 10, "1XXXXXXXXX"),
    ("cn", "China", "+86", r"^1[3-9][0-9]{9}$", 11, 11, "1XXXXXXXXXX"),
    ("jp", "Japan", "+81", r"^[789]0[0-9]{8}$", 10, 10, "90XXXXXXXX"),
    ("kr", "South Korea", "+82", r"^1[0-9]{8,9}$", 9, 10, "10XXXXXXX"),
    ("id", "Indonesia", "+62", r"^8[0-9]{8,11}$", 9, 12, "8XXXXXXXX"),
    ("my", "Malaysia", "+60", r"^1[0-9]{8,9}$", 9, 10, "1XXXXXXXX"),
    ("sg", "Singapore", "+65", r"^[89][0-9]{7}$", 8, 8, "8XXXXXXX"),
    ("ph", "Philippines", "+63", r"^9[0-9]{9}$", 10, 10, "9XXXXXXXXX"),
    ("au", "Australia", "+61", r"^4[0-9]{8}$", 9, 9, "4XXXXXXXX"),
    ("nz", "New Zealand", "+64", r"^2[0-9]{7,9}$", 8, 10, "2XXXXXXX"),
    ("br", "Brazil", "+55", r"^[1-9]{2}9[0-9]{8}$", 11, 11, "119XXXXXXXX"),
    ("mx", "Mexico", "+52", r"^[0-9]{10}$", 10, 10, "XXXXXXXXXX"),
    ("za", "South Africa", "+27", r"^[678][0-9]{8}$", 9, 9, "6XXXXXXXX"),
    ("ng", "Nigeria", "+234", r"^[789][01][0-9]{8}$", 10, 10, "8XXXXXXXXX"),
];

/// 表單下拉選單中可選擇的國家
pub const SELECTABLE_COUNTRIES: &[&str] = &[
    "sa", "eg", "ae", "kw", "qa", "bh", "om", "jo", "lb", "sy", "iq", "ye", "ps", "ly", "tn", "dz",
    "ma", "sd", "us", "ca", "gb", "fr", "de", "it", "es", "nl", "be", "ch", "se", "no", "dk", "tr",
    "in", "pk", "bd", "cn", "jp", "kr", "id", "my", "sg", "ph", "au", "nz", "br", "mx", "za", "ng",
];

pub const DEFAULT_COUNTRY: &str = "sa";

static RULES: LazyLock<HashMap<&'static str, CountryPhoneRule>> = LazyLock::new(|| {
    RULE_DEFS
        .iter()
        .map(|&(code, name, dial_code, pattern, min_length, max_length, placeholder)| {
            let rule = CountryPhoneRule {
                code,
                name,
                dial_code,
                pattern: Regex::new(pattern).expect("phone patterns are static and valid"),
                min_length,
                max_length,
                placeholder,
            };
            (code, rule)
        })
        .collect()
});

pub fn rule_for(country: &str) -> Option<&'static CountryPhoneRule> {
    RULES.get(country.to_ascii_lowercase().as_str())
}

/// 驗證結果，依檢查順序：字元 → 國家 → 長度 → 格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PhoneValidation {
    Valid,
    InvalidCharacters,
    UnsupportedCountry { country: String },
    InvalidLength { min: usize, max: usize, actual: usize },
    InvalidFormat,
}

impl PhoneValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, PhoneValidation::Valid)
    }

    pub fn message(&self) -> String {
        match self {
            PhoneValidation::Valid => String::new(),
            PhoneValidation::InvalidCharacters => "Phone number may contain digits only".to_string(),
            PhoneValidation::UnsupportedCountry { country } => {
                format!("Phone numbers for '{}' are not supported", country)
            }
            PhoneValidation::InvalidLength { min, max, actual } if min == max => {
                format!("Phone number must be {} digits (got {})", min, actual)
            }
            PhoneValidation::InvalidLength { min, max, actual } => {
                format!("Phone number must be {}-{} digits (got {})", min, max, actual)
            }
            PhoneValidation::InvalidFormat => "Phone number format is not valid for this country".to_string(),
        }
    }
}

pub fn validate_phone(country: &str, input: &str) -> PhoneValidation {
    if input.chars().any(|c| !c.is_ascii_digit()) {
        return PhoneValidation::InvalidCharacters;
    }

    let Some(rule) = rule_for(country) else {
        return PhoneValidation::UnsupportedCountry {
            country: country.to_string(),
        };
    };

    let actual = input.len();
    if actual < rule.min_length || actual > rule.max_length {
        return PhoneValidation::InvalidLength {
            min: rule.min_length,
            max: rule.max_length,
            actual,
        };
    }

    if !rule.pattern.is_match(input) {
        return PhoneValidation::InvalidFormat;
    }

    PhoneValidation::Valid
}

/// 表單中的電話欄位狀態：目前選擇的國家與輸入值。
/// 切換國家會清空輸入，避免留下跨國家的無效號碼。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneField {
    country: String,
    value: String,
    status: Option<PhoneValidation>,
}

impl Default for PhoneField {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRY)
    }
}

impl PhoneField {
    pub fn new(country: &str) -> Self {
        Self {
            country: country.to_ascii_lowercase(),
            value: String::new(),
            status: None,
        }
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn status(&self) -> Option<&PhoneValidation> {
        self.status.as_ref()
    }

    pub fn placeholder(&self) -> &'static str {
        rule_for(&self.country).map(|rule| rule.placeholder).unwrap_or("")
    }

    pub fn select_country(&mut self, country: &str) {
        let country = country.to_ascii_lowercase();
        if country == self.country {
            return;
        }
        tracing::debug!("📞 Phone country changed {} → {}, clearing input", self.country, country);
        self.country = country;
        self.value.clear();
        self.status = None;
    }

    pub fn input(&mut self, value: &str) -> &PhoneValidation {
        self.value = value.to_string();
        self.status.insert(validate_phone(&self.country, &self.value))
    }

    /// 含國碼的完整號碼，例如 `+966512345678`
    pub fn international(&self) -> Option<String> {
        let rule = rule_for(&self.country)?;
        Some(format!("{}{}", rule.dial_code, self.value))
    }
}
