use serde::Serialize;
use url::form_urlencoded;

/// 網站的固定路由表。詳情頁帶 `slug` 查詢參數。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "page", content = "slug")]
pub enum Route {
    Home,
    AboutUs,
    Services,
    Projects,
    ProjectDet(String),
    Jops,
    JopDet(String),
    Blogs,
    BlogDet(String),
    ContactUs,
    PrivacyPolicy,
}

impl Route {
    /// 解析 `/path?slug=...`；未知路徑導回首頁，缺少 slug 的詳情頁導回對應列表頁
    pub fn parse(target: &str) -> Route {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        let slug = form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "slug")
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty());

        let name = path.trim_matches('/').to_ascii_lowercase();
        match (name.as_str(), slug) {
            ("" | "home", _) => Route::Home,
            ("about-us", _) => Route::AboutUs,
            ("services", _) => Route::Services,
            ("projects", _) => Route::Projects,
            ("project-det", Some(slug)) => Route::ProjectDet(slug),
            ("project-det", None) => Route::Projects,
            ("jops", _) => Route::Jops,
            ("jop-det", Some(slug)) => Route::JopDet(slug),
            ("jop-det", None) => Route::Jops,
            ("blogs", _) => Route::Blogs,
            ("blog-det", Some(slug)) => Route::BlogDet(slug),
            ("blog-det", None) => Route::Blogs,
            ("contact-us", _) => Route::ContactUs,
            ("privacy-policy", _) => Route::PrivacyPolicy,
            (other, _) => {
                tracing::debug!("🧭 Unknown path '{}', redirecting to home", other);
                Route::Home
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::AboutUs => "about-us",
            Route::Services => "services",
            Route::Projects => "projects",
            Route::ProjectDet(_) => "project-det",
            Route::Jops => "jops",
            Route::JopDet(_) => "jop-det",
            Route::Blogs => "blogs",
            Route::BlogDet(_) => "blog-det",
            Route::ContactUs => "contact-us",
            Route::PrivacyPolicy => "privacy-policy",
        }
    }

    pub fn slug(&self) -> Option<&str> {
        match self {
            Route::ProjectDet(slug) | Route::JopDet(slug) | Route::BlogDet(slug) => Some(slug),
            _ => None,
        }
    }

    /// 站內連結，例如 `/blog-det?slug=launch-day`
    pub fn href(&self) -> String {
        match self.slug() {
            Some(slug) => {
                let query: String = form_urlencoded::Serializer::new(String::new())
                    .append_pair("slug", slug)
                    .finish();
                format!("/{}?{}", self.name(), query)
            }
            None if *self == Route::Home => "/".to_string(),
            None => format!("/{}", self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_named_pages() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/about-us"), Route::AboutUs);
        assert_eq!(Route::parse("/Privacy-Policy/"), Route::PrivacyPolicy);
        assert_eq!(Route::parse("/jops"), Route::Jops);
    }

    #[test]
    fn test_parse_detail_with_slug() {
        assert_eq!(
            Route::parse("/blog-det?slug=launch%20day"),
            Route::BlogDet("launch day".to_string())
        );
        assert_eq!(Route::parse("/jop-det?slug=qa&ref=x"), Route::JopDet("qa".to_string()));
    }

    #[test]
    fn test_detail_without_slug_falls_back_to_listing() {
        assert_eq!(Route::parse("/project-det"), Route::Projects);
        assert_eq!(Route::parse("/blog-det?slug="), Route::Blogs);
    }

    #[test]
    fn test_unknown_path_redirects_home() {
        assert_eq!(Route::parse("/wp-admin"), Route::Home);
    }

    #[test]
    fn test_href_round_trips() {
        for route in [
            Route::Home,
            Route::ContactUs,
            Route::ProjectDet("brand refresh".to_string()),
        ] {
            assert_eq!(Route::parse(&route.href()), route);
        }
    }
}
