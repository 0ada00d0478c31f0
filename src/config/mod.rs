pub mod cli;
pub mod site_config;

pub use site_config::SiteConfig;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "techhouse")]
#[command(about = "Render the CMS data and hydration payload for one TechHouse page")]
pub struct CliConfig {
    #[arg(long, help = "TOML config file")]
    pub config: Option<String>,

    #[arg(long, help = "CMS API base URL (overrides the config file)")]
    pub api_base: Option<String>,

    #[arg(long, help = "Host prefixed to relative asset paths")]
    pub asset_host: Option<String>,

    #[arg(long, default_value = "/")]
    pub route: String,

    #[arg(long, default_value = "1")]
    pub page: u64,

    #[arg(long, help = "Write the payload to this file instead of stdout")]
    pub output: Option<String>,

    #[arg(long, help = "Emit the embeddable <script> tag instead of raw JSON")]
    pub script_tag: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
const DEFAULT_API_BASE: &str = "http://localhost:8000/api";

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併設定檔與命令列參數，命令列優先
    pub fn resolve(&self) -> Result<SiteConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("📄 Loading config from {}", path);
                SiteConfig::from_file(path)?
            }
            None => SiteConfig::with_base_url(self.api_base.as_deref().unwrap_or(DEFAULT_API_BASE)),
        };

        if let Some(api_base) = &self.api_base {
            config.api.base_url = api_base.clone();
        }
        if let Some(asset_host) = &self.asset_host {
            config.api.asset_host = Some(asset_host.clone());
        }
        Ok(config)
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::domain::ports::SiteSettings;

    #[test]
    fn test_resolve_without_config_file() {
        let cli = CliConfig::parse_from(["techhouse", "--api-base", "https://cms.example.com/api"]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.api_base_url(), "https://cms.example.com/api");
        assert_eq!(config.asset_host(), "https://cms.example.com");
        assert_eq!(cli.route, "/");
        assert_eq!(cli.page, 1);
    }

    #[test]
    fn test_api_base_with_toml_special_characters() {
        let cli = CliConfig::parse_from(["techhouse", "--api-base", r#"https://cms.example.com/a"b\c"#]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.api_base_url(), r#"https://cms.example.com/a"b\c"#);
        assert_eq!(config.asset_host(), "https://cms.example.com");
    }

    #[test]
    fn test_cli_overrides_asset_host() {
        let cli = CliConfig::parse_from([
            "techhouse",
            "--asset-host",
            "https://cdn.example.com",
            "--route",
            "/blogs",
            "--page",
            "3",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(config.api_base_url(), DEFAULT_API_BASE);
        assert_eq!(config.asset_host(), "https://cdn.example.com");
        assert_eq!(cli.page, 3);
    }
}
