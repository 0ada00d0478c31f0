use crate::domain::ports::SiteSettings;
use crate::utils::error::{Result, SiteError};
use crate::utils::validation::{
    validate_positive_number, validate_range, validate_required_field, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub readiness: ReadinessConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// 圖片等相對路徑的前綴主機，未設定時使用 base_url 的 origin
    pub asset_host: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessConfig {
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    #[serde(default = "default_ceiling_ms")]
    pub ceiling_ms: u64,
}

impl Default for ReadinessConfig {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            ceiling_ms: default_ceiling_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_rows")]
    pub rows: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { rows: default_rows() }
    }
}

fn default_timeout_seconds() -> u64 {
    15
}

fn default_settle_ms() -> u64 {
    50
}

fn default_ceiling_ms() -> u64 {
    10_000
}

fn default_rows() -> u64 {
    9
}

impl SiteConfig {
    /// 只指定 API 位址，其餘使用預設值
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            api: ApiConfig {
                base_url: base_url.to_string(),
                asset_host: origin_of(base_url),
                timeout_seconds: default_timeout_seconds(),
                headers: HashMap::new(),
            },
            readiness: ReadinessConfig::default(),
            listing: ListingConfig::default(),
        }
    }

    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SiteError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        let mut config: SiteConfig =
            toml::from_str(&processed_content).map_err(|e| SiteError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        if config.api.asset_host.is_none() {
            config.api.asset_host = origin_of(&config.api.base_url);
        }
        Ok(config)
    }

    /// 替換環境變數 (例如 ${CMS_TOKEN})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

fn origin_of(base_url: &str) -> Option<String> {
    let url = url::Url::parse(base_url).ok()?;
    Some(url.origin().ascii_serialization()).filter(|origin| origin != "null")
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        let asset_host = validate_required_field("api.asset_host", &self.api.asset_host)?;
        validate_url("api.asset_host", asset_host)?;
        validate_positive_number("api.timeout_seconds", self.api.timeout_seconds, 1)?;
        validate_range("readiness.settle_ms", self.readiness.settle_ms, 0, 5_000)?;
        validate_range("readiness.ceiling_ms", self.readiness.ceiling_ms, 100, 120_000)?;
        validate_range("listing.rows", self.listing.rows, 1, 100)?;

        if let Some((key, _)) = self.api.headers.iter().find(|(_, value)| value.contains("${")) {
            return Err(SiteError::InvalidConfigValueError {
                field: format!("api.headers.{}", key),
                value: self.api.headers[key].clone(),
                reason: "Environment variable is not set".to_string(),
            });
        }
        Ok(())
    }
}

impl SiteSettings for SiteConfig {
    fn api_base_url(&self) -> &str {
        &self.api.base_url
    }

    fn asset_host(&self) -> &str {
        self.api.asset_host.as_deref().unwrap_or("")
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_seconds)
    }

    fn default_headers(&self) -> &HashMap<String, String> {
        &self.api.headers
    }

    fn listing_rows(&self) -> u64 {
        self.listing.rows
    }

    fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.readiness.settle_ms)
    }

    fn readiness_ceiling(&self) -> Duration {
        Duration::from_millis(self.readiness.ceiling_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let config = SiteConfig::from_toml_str(
            r#"
[api]
base_url = "https://cms.techhouse.io/api"
"#,
        )
        .unwrap();

        assert_eq!(config.asset_host(), "https://cms.techhouse.io");
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
        assert_eq!(config.settle_delay(), Duration::from_millis(50));
        assert_eq!(config.readiness_ceiling(), Duration::from_secs(10));
        assert_eq!(config.listing_rows(), 9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TECHHOUSE_TEST_CMS_TOKEN", "secret-token");

        let config = SiteConfig::from_toml_str(
            r#"
[api]
base_url = "https://cms.techhouse.io/api"
asset_host = "https://cdn.techhouse.io"

[api.headers]
Authorization = "Bearer ${TECHHOUSE_TEST_CMS_TOKEN}"
Accept-Language = "ar"
"#,
        )
        .unwrap();

        assert_eq!(config.default_headers()["Authorization"], "Bearer secret-token");
        assert_eq!(config.asset_host(), "https://cdn.techhouse.io");

        std::env::remove_var("TECHHOUSE_TEST_CMS_TOKEN");
    }

    #[test]
    fn test_unset_env_var_fails_validation() {
        let config = SiteConfig::from_toml_str(
            r#"
[api]
base_url = "https://cms.techhouse.io/api"

[api.headers]
Authorization = "Bearer ${TECHHOUSE_TEST_DEFINITELY_UNSET}"
"#,
        )
        .unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SiteConfig::with_base_url("invalid-url");
        assert!(config.validate().is_err());

        config.api.base_url = "https://cms.techhouse.io/api".to_string();
        config.listing.rows = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(
                br#"
[api]
base_url = "http://localhost:8000/api"

[readiness]
ceiling_ms = 2000

[listing]
rows = 6
"#,
            )
            .unwrap();

        let config = SiteConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.readiness_ceiling(), Duration::from_secs(2));
        assert_eq!(config.settle_delay(), Duration::from_millis(50));
        assert_eq!(config.listing_rows(), 6);
    }
}
