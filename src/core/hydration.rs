use crate::utils::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// 伺服器端渲染時 `<script>` 標籤的 id
pub const TRANSFER_SCRIPT_ID: &str = "techhouse-state";

/// 伺服器渲染期間產生的資料，序列化進初始頁面，由客戶端首次渲染取用一次。
///
/// 每個鍵只能被取用一次：`take` 之後該槽位即被移除，
/// 之後的載入會改走正常的網路請求。
#[derive(Debug, Default)]
pub struct TransferState {
    slots: Mutex<HashMap<String, Value>>,
}

impl TransferState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從頁面內嵌的 JSON 還原（客戶端）
    pub fn from_payload(payload: &str) -> Result<Self> {
        let slots: HashMap<String, Value> = serde_json::from_str(payload)?;
        tracing::debug!("💧 Restored {} hydration slots", slots.len());
        Ok(Self {
            slots: Mutex::new(slots),
        })
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.slots().insert(key.to_string(), value);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.slots().contains_key(key)
    }

    /// 取出並移除槽位。內容無法反序列化時同樣移除，並回傳 None
    pub fn take<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.slots().remove(key)?;
        match serde_json::from_value(value) {
            Ok(parsed) => {
                tracing::debug!("💧 Hydrated {} from server payload", key);
                Some(parsed)
            }
            Err(e) => {
                tracing::warn!("⚠️ Discarding hydration slot {}: {}", key, e);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    pub fn to_payload(&self) -> Result<String> {
        Ok(serde_json::to_string(&*self.slots())?)
    }

    /// 產生可安全內嵌於 HTML 的 `<script>` 區塊
    pub fn to_script_tag(&self) -> Result<String> {
        let payload = self
            .to_payload()?
            .replace('<', "\\u003c")
            .replace('>', "\\u003e")
            .replace('&', "\\u0026");
        Ok(format!(
            r#"<script id="{}" type="application/json">{}</script>"#,
            TRANSFER_SCRIPT_ID, payload
        ))
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
