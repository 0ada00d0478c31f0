use crate::core::hydration::TransferState;
use crate::core::normalize::ShapeRule;
use crate::utils::error::{Result, SiteError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

/// 快取在渲染流程中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrationRole {
    /// 伺服器渲染：成功載入後寫入 transfer state
    Server,
    /// 客戶端渲染：載入前先取用 transfer state
    Client,
}

struct Slot<T> {
    loading: bool,
    value: watch::Sender<Option<T>>,
}

impl<T> Slot<T> {
    fn empty() -> Self {
        let (value, _) = watch::channel(None);
        Self {
            loading: false,
            value,
        }
    }
}

enum LoadStart<T> {
    Cached(T),
    InFlight,
    Fetch,
}

/// 單一資源類型的回應快取。
///
/// 每個鍵最多只會有一個進行中的請求，成功後只填入一次，之後永不失效。
/// 失敗時不重試，也不向呼叫端拋出錯誤，只記錄日誌並保持空值。
pub struct ResponseCache<T> {
    name: &'static str,
    rule: ShapeRule,
    slots: Mutex<HashMap<String, Slot<T>>>,
    hydration: Option<(Arc<TransferState>, HydrationRole)>,
}

impl<T> ResponseCache<T>
where
    T: DeserializeOwned + Serialize + Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str, rule: ShapeRule) -> Self {
        Self {
            name,
            rule,
            slots: Mutex::new(HashMap::new()),
            hydration: None,
        }
    }

    pub fn with_hydration(mut self, state: Arc<TransferState>, role: HydrationRole) -> Self {
        self.hydration = Some((state, role));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// transfer state 中使用的鍵，例如 `blog:launch-day`
    pub fn hydration_key(&self, key: &str) -> String {
        format!("{}:{}", self.name, key)
    }

    /// 載入 `key`。已有值時立即回傳；同一鍵已在載入中時立即回傳 None，
    /// 不會發出第二個請求；否則最多呼叫一次 `fetch`。
    pub async fn load<F, Fut>(&self, key: &str, fetch: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value>>,
    {
        match self.begin_load(key) {
            LoadStart::Cached(value) => return Some(value),
            LoadStart::InFlight => {
                tracing::debug!("⏳ {}: load for '{}' already in flight", self.name, key);
                return None;
            }
            LoadStart::Fetch => {}
        }
        let loading = LoadingGuard {
            cache: self,
            key,
            armed: true,
        };

        if let Some((state, HydrationRole::Client)) = &self.hydration {
            if let Some(value) = state.take::<T>(&self.hydration_key(key)) {
                loading.finish(Some(value.clone()));
                return Some(value);
            }
        }

        let outcome = match fetch().await {
            Ok(body) => self.normalize(key, &body),
            Err(e) => {
                self.report_failure(key, &e);
                None
            }
        };

        if let (Some(value), Some((state, HydrationRole::Server))) = (&outcome, &self.hydration) {
            if let Err(e) = state.set(&self.hydration_key(key), value) {
                tracing::warn!("⚠️ {}: could not store '{}' for hydration: {}", self.name, key, e);
            }
        }

        loading.finish(outcome.clone());
        outcome
    }

    pub fn get(&self, key: &str) -> Option<T> {
        self.slots()
            .get(key)
            .and_then(|slot| slot.value.borrow().clone())
    }

    pub fn is_loading(&self, key: &str) -> bool {
        self.slots().get(key).map(|slot| slot.loading).unwrap_or(false)
    }

    /// 訂閱某個鍵的值變化；值由空變為有值時會收到通知
    pub fn subscribe(&self, key: &str) -> watch::Receiver<Option<T>> {
        self.slots()
            .entry(key.to_string())
            .or_insert_with(Slot::empty)
            .value
            .subscribe()
    }

    /// 等待某個鍵被填入，最多等待 `timeout`
    pub async fn wait_for(&self, key: &str, timeout: Duration) -> Option<T> {
        let mut rx = self.subscribe(key);
        let value = match tokio::time::timeout(timeout, rx.wait_for(Option::is_some)).await {
            Ok(Ok(value)) => value.clone(),
            _ => None,
        };
        value
    }

    fn begin_load(&self, key: &str) -> LoadStart<T> {
        let mut slots = self.slots();
        let slot = slots.entry(key.to_string()).or_insert_with(Slot::empty);

        if let Some(value) = slot.value.borrow().clone() {
            return LoadStart::Cached(value);
        }
        if slot.loading {
            return LoadStart::InFlight;
        }
        slot.loading = true;
        LoadStart::Fetch
    }

    fn complete(&self, key: &str, outcome: Option<T>) {
        let mut slots = self.slots();
        let slot = slots.entry(key.to_string()).or_insert_with(Slot::empty);
        slot.loading = false;

        let Some(value) = outcome else {
            return;
        };
        if slot.value.borrow().is_some() {
            tracing::debug!("🔁 {}: '{}' already populated, keeping first value", self.name, key);
            return;
        }
        slot.value.send_replace(Some(value));
        tracing::debug!("📦 {}: cached '{}'", self.name, key);
    }

    fn normalize(&self, key: &str, body: &Value) -> Option<T> {
        let Some(extracted) = self.rule.extract(body) else {
            tracing::warn!(
                "⚠️ {}: response for '{}' matched no known shape ({})",
                self.name,
                key,
                self.rule.describe()
            );
            return None;
        };

        match serde_json::from_value(extracted) {
            Ok(value) => Some(value),
            Err(e) => {
                let err = SiteError::ShapeError {
                    key: self.hydration_key(key),
                    message: e.to_string(),
                };
                tracing::warn!("⚠️ {}", err);
                None
            }
        }
    }

    fn report_failure(&self, key: &str, err: &SiteError) {
        if err.is_connection_failure() {
            tracing::debug!("🔌 {}: no connection while loading '{}': {}", self.name, key, err);
        } else {
            tracing::error!("❌ {}: failed to load '{}': {}", self.name, key, err);
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<String, Slot<T>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 載入中旗標的守衛：load future 在等待 fetch 時被 drop，
/// 旗標仍會被清除，之後的 `load` 可以重新發出請求
struct LoadingGuard<'a, T>
where
    T: DeserializeOwned + Serialize + Clone + Send + Sync + 'static,
{
    cache: &'a ResponseCache<T>,
    key: &'a str,
    armed: bool,
}

impl<T> LoadingGuard<'_, T>
where
    T: DeserializeOwned + Serialize + Clone + Send + Sync + 'static,
{
    fn finish(mut self, outcome: Option<T>) {
        self.armed = false;
        self.cache.complete(self.key, outcome);
    }
}

impl<T> Drop for LoadingGuard<'_, T>
where
    T: DeserializeOwned + Serialize + Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!("🚫 {}: load for '{}' cancelled", self.cache.name, self.key);
            self.cache.complete(self.key, None);
        }
    }
}
