use crate::core::request_gate::RequestTracker;
use crate::domain::ports::SiteSettings;
use crate::utils::error::{Result, SiteError};
use reqwest::{multipart, Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// CMS API 的 HTTP 用戶端。每個請求都會經過 [`RequestTracker`] 計數。
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    headers: HashMap<String, String>,
    timeout: Duration,
    tracker: Arc<RequestTracker>,
}

impl ApiClient {
    pub fn new<C: SiteSettings + ?Sized>(settings: &C, tracker: Arc<RequestTracker>) -> Result<Self> {
        Ok(Self {
            client: Client::new(),
            base_url: normalize_base_url(settings.api_base_url())?,
            headers: settings.default_headers().clone(),
            timeout: settings.request_timeout(),
            tracker,
        })
    }

    pub fn tracker(&self) -> &Arc<RequestTracker> {
        &self.tracker
    }

    /// 將相對路徑接到 base URL 之後
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| SiteError::InvalidConfigValueError {
                field: "endpoint".to_string(),
                value: path.to_string(),
                reason: e.to_string(),
            })
    }

    /// `collection/id`，id 編碼為單一路徑段（`/`、`?`、`#` 會被 percent-encode）
    pub fn resource(&self, collection: &str, id: &str) -> Result<Url> {
        if matches!(id.trim(), "" | "." | "..") {
            return Err(SiteError::ValidationError {
                message: format!("Invalid identifier '{}' for {}", id, collection),
            });
        }

        let mut url = self.endpoint(collection)?;
        url.path_segments_mut()
            .map_err(|_| SiteError::InvalidConfigValueError {
                field: "api.base_url".to_string(),
                value: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    pub async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let request = self.request(Method::GET, path)?.query(query);
        self.send(request, path).await
    }

    /// 取得單一資源，例如 `get_resource("blogs", slug)`
    pub async fn get_resource(&self, collection: &str, id: &str) -> Result<Value> {
        let url = self.resource(collection, id)?;
        let label = url.path().to_string();
        let request = self.request_url(Method::GET, url);
        self.send(request, &label).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(request, path).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let request = self.request(Method::PUT, path)?.json(body);
        self.send(request, path).await
    }

    pub async fn patch_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let request = self.request(Method::PATCH, path)?.json(body);
        self.send(request, path).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value> {
        let request = self.request(Method::DELETE, path)?;
        self.send(request, path).await
    }

    pub async fn post_multipart(&self, path: &str, form: multipart::Form) -> Result<Value> {
        let request = self.request(Method::POST, path)?.multipart(form);
        self.send(request, path).await
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        Ok(self.request_url(method, url))
    }

    fn request_url(&self, method: Method, url: Url) -> RequestBuilder {
        let mut request = self.client.request(method, url).timeout(self.timeout);

        // 添加自定義標頭
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        request
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Value> {
        let _guard = self.tracker.track();

        tracing::debug!("📡 Making API request to: {}", path);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("📡 {}: API response status: {}", path, status);

        if !status.is_success() {
            return Err(SiteError::StatusError {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&body)?)
    }
}

fn normalize_base_url(raw: &str) -> Result<Url> {
    let with_slash = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };

    Url::parse(&with_slash).map_err(|e| SiteError::InvalidConfigValueError {
        field: "api.base_url".to_string(),
        value: raw.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })
}
