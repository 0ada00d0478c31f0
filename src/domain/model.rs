use serde::{Deserialize, Serialize};

/// 圖片來源：單一字串、最多三個 URL 的陣列，或響應式三組 URL。
/// 反序列化依宣告順序嘗試，陣列必須先於結構體變體。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageSource {
    /// CMS 回傳 null 或欄位缺失
    Missing,
    Single(String),
    List(Vec<String>),
    Responsive {
        #[serde(default)]
        desktop: Option<String>,
        #[serde(default)]
        tablet: Option<String>,
        #[serde(default)]
        mobile: Option<String>,
    },
}

impl Default for ImageSource {
    fn default() -> Self {
        ImageSource::Missing
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Banner {
    pub title: String,
    pub subtitle: String,
    pub paragraph: String,
    pub image: ImageSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Counter {
    pub label: String,
    pub value: u64,
    pub suffix: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceCard {
    pub id: u64,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub icon: ImageSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub id: u64,
    pub slug: String,
    pub title: String,
    pub category: String,
    pub summary: String,
    /// CMS 提供的富文本 HTML，渲染前需經過清理
    pub description: String,
    pub image: ImageSource,
    pub gallery: Vec<ImageSource>,
    pub client: String,
    pub link: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    pub id: u64,
    pub slug: String,
    pub title: String,
    pub location: String,
    pub employment_type: String,
    pub summary: String,
    pub description: String,
    pub requirements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Blog {
    pub id: u64,
    pub slug: String,
    pub title: String,
    pub author: String,
    pub published_at: Option<String>,
    pub excerpt: String,
    pub content: String,
    pub image: ImageSource,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomePage {
    pub banner: Banner,
    pub counters: Vec<Counter>,
    pub services: Vec<ServiceCard>,
    pub projects: Vec<Project>,
    pub blogs: Vec<Blog>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AboutPage {
    pub banner: Banner,
    pub story: String,
    pub mission: String,
    pub vision: String,
    pub values: Vec<String>,
    pub counters: Vec<Counter>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServicesPage {
    pub banner: Banner,
    pub services: Vec<ServiceCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactHero {
    pub title: String,
    pub paragraph: String,
    pub image: ImageSource,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactPage {
    pub email: String,
    pub phone: String,
    pub address: String,
    pub map_url: Option<String>,
    pub services: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivacyPolicy {
    pub title: String,
    pub content: String,
    pub updated_at: Option<String>,
}

/// 列表頁的分頁回應，CMS 以 `data` 陣列加上總數回傳
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paginated<T> {
    #[serde(alias = "data")]
    pub items: Vec<T>,
    #[serde(alias = "totalRecords")]
    pub total: u64,
    #[serde(alias = "currentPage")]
    pub current_page: u64,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            current_page: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_source_accepts_all_three_shapes() {
        let triple: ImageSource = serde_json::from_value(serde_json::json!({
            "desktop": "d.png", "tablet": "t.png", "mobile": "m.png"
        }))
        .unwrap();
        assert!(matches!(triple, ImageSource::Responsive { .. }));

        let single: ImageSource = serde_json::from_value(serde_json::json!("a.png")).unwrap();
        assert_eq!(single, ImageSource::Single("a.png".to_string()));

        let list: ImageSource = serde_json::from_value(serde_json::json!(["a.png", "b.png"])).unwrap();
        assert_eq!(list, ImageSource::List(vec!["a.png".to_string(), "b.png".to_string()]));

        let missing: ImageSource = serde_json::from_value(serde_json::Value::Null).unwrap();
        assert_eq!(missing, ImageSource::Missing);
    }

    #[test]
    fn test_paginated_accepts_data_array() {
        let page: Paginated<Blog> = serde_json::from_value(serde_json::json!({
            "data": [{"slug": "launch-day", "title": "Launch day"}],
            "totalRecords": 12
        }))
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].slug, "launch-day");
        assert_eq!(page.total, 12);
        assert_eq!(page.current_page, 1);
    }

    #[test]
    fn test_partial_payload_uses_defaults() {
        let page: HomePage = serde_json::from_value(serde_json::json!({
            "banner": {"title": "We build"}
        }))
        .unwrap();
        assert_eq!(page.banner.title, "We build");
        assert!(page.counters.is_empty());
    }
}
