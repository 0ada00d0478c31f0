use crate::utils::error::Result;
use std::collections::HashMap;
use std::time::Duration;

/// 網站設定來源（TOML 檔或命令列）
pub trait SiteSettings: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn asset_host(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn default_headers(&self) -> &HashMap<String, String>;
    fn listing_rows(&self) -> u64;
    fn settle_delay(&self) -> Duration;
    fn readiness_ceiling(&self) -> Duration;
}

/// 全域載入指示器（頁面外殼提供實作）
pub trait LoadingIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// 只寫日誌的指示器，用於伺服器端渲染與命令列
#[derive(Debug, Default)]
pub struct TracingIndicator;

impl LoadingIndicator for TracingIndicator {
    fn show(&self) {
        tracing::debug!("⏳ Loading indicator shown");
    }

    fn hide(&self) {
        tracing::debug!("✅ Loading indicator hidden");
    }
}

/// hydration payload 的輸出目的地
#[async_trait::async_trait]
pub trait PayloadSink: Send + Sync {
    /// 寫出 payload，回傳輸出位置的描述
    async fn write_payload(&self, payload: &str) -> Result<String>;
}
