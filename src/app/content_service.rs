use crate::core::http_client::ApiClient;
use crate::core::hydration::TransferState;
use crate::core::normalize::ShapeRule;
use crate::core::request_gate::RequestTracker;
use crate::core::response_cache::{HydrationRole, ResponseCache};
use crate::domain::model::{
    AboutPage, Blog, ContactHero, ContactPage, HomePage, ImageSource, Job, Paginated, PrivacyPolicy,
    Project, ServicesPage,
};
use crate::domain::ports::SiteSettings;
use crate::forms::{ContactForm, JobApplicationForm};
use crate::utils::error::{Result, SiteError};
use crate::view::images::select_image;
use crate::view::routes::Route;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// 單頁資源（首頁、關於我們等）在快取中使用的鍵
pub const PAGE_KEY: &str = "page";

/// 每種頁面資源各一個快取
pub struct ContentCaches {
    pub home: ResponseCache<HomePage>,
    pub about: ResponseCache<AboutPage>,
    pub services: ResponseCache<ServicesPage>,
    pub contact: ResponseCache<ContactPage>,
    pub contact_hero: ResponseCache<ContactHero>,
    pub privacy_policy: ResponseCache<PrivacyPolicy>,
    pub projects: ResponseCache<Paginated<Project>>,
    pub project: ResponseCache<Project>,
    pub jobs: ResponseCache<Paginated<Job>>,
    pub job: ResponseCache<Job>,
    pub blogs: ResponseCache<Paginated<Blog>>,
    pub blog: ResponseCache<Blog>,
}

impl ContentCaches {
    fn new(hydration: Option<(Arc<TransferState>, HydrationRole)>) -> Self {
        let h = &hydration;
        let home = ShapeRule::field("home").alternate("homePage").with_root_fallback();
        let about = ShapeRule::field("about").alternate("aboutUs").with_root_fallback();
        let services = ShapeRule::field("servicesPage").with_root_fallback();
        let contact = ShapeRule::field("contact").alternate("contactInfo").with_root_fallback();
        let contact_hero = ShapeRule::field("contactHero")
            .alternate_renamed("bannerSection", &[("text", "paragraph")]);
        let privacy_policy = ShapeRule::field("privacyPolicy").alternate("policy").with_root_fallback();

        Self {
            home: attach(ResponseCache::new("home", home.build()), h),
            about: attach(ResponseCache::new("about", about.build()), h),
            services: attach(ResponseCache::new("services", services.build()), h),
            contact: attach(ResponseCache::new("contact", contact.build()), h),
            contact_hero: attach(ResponseCache::new("contact-hero", contact_hero.build()), h),
            privacy_policy: attach(ResponseCache::new("privacy-policy", privacy_policy.build()), h),
            projects: attach(ResponseCache::new("projects", ShapeRule::root()), h),
            project: attach(ResponseCache::new("project", detail_rule("project")), h),
            jobs: attach(ResponseCache::new("jobs", ShapeRule::root()), h),
            job: attach(ResponseCache::new("job", detail_rule("job")), h),
            blogs: attach(ResponseCache::new("blogs", ShapeRule::root()), h),
            blog: attach(ResponseCache::new("blog", detail_rule("blog")), h),
        }
    }
}

fn detail_rule(name: &'static str) -> ShapeRule {
    ShapeRule::field(name).alternate("data").with_root_fallback().build()
}

fn attach<T>(
    cache: ResponseCache<T>,
    hydration: &Option<(Arc<TransferState>, HydrationRole)>,
) -> ResponseCache<T>
where
    T: DeserializeOwned + Serialize + Clone + Send + Sync + 'static,
{
    match hydration {
        Some((state, role)) => cache.with_hydration(Arc::clone(state), *role),
        None => cache,
    }
}

/// 網站所有頁面資料的入口：讀取走快取，寫入（表單）直接送出
pub struct ContentService {
    client: ApiClient,
    asset_host: String,
    rows: u64,
    caches: ContentCaches,
}

impl ContentService {
    pub fn new<C: SiteSettings + ?Sized>(settings: &C, tracker: Arc<RequestTracker>) -> Result<Self> {
        Self::build(settings, tracker, None)
    }

    /// 啟用 transfer state：伺服器端記錄載入結果，客戶端優先取用
    pub fn with_hydration<C: SiteSettings + ?Sized>(
        settings: &C,
        tracker: Arc<RequestTracker>,
        state: Arc<TransferState>,
        role: HydrationRole,
    ) -> Result<Self> {
        Self::build(settings, tracker, Some((state, role)))
    }

    fn build<C: SiteSettings + ?Sized>(
        settings: &C,
        tracker: Arc<RequestTracker>,
        hydration: Option<(Arc<TransferState>, HydrationRole)>,
    ) -> Result<Self> {
        Ok(Self {
            client: ApiClient::new(settings, tracker)?,
            asset_host: settings.asset_host().to_string(),
            rows: settings.listing_rows(),
            caches: ContentCaches::new(hydration),
        })
    }

    pub fn caches(&self) -> &ContentCaches {
        &self.caches
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// 依視窗寬度挑選圖片並補上資源主機
    pub fn image_url(&self, image: &ImageSource, viewport_width: u32) -> Option<String> {
        select_image(image, viewport_width, &self.asset_host)
    }

    pub async fn home(&self) -> Option<HomePage> {
        self.caches.home.load(PAGE_KEY, || self.client.get_json("home", &[])).await
    }

    pub async fn about(&self) -> Option<AboutPage> {
        self.caches.about.load(PAGE_KEY, || self.client.get_json("about", &[])).await
    }

    pub async fn services(&self) -> Option<ServicesPage> {
        self.caches
            .services
            .load(PAGE_KEY, || self.client.get_json("services", &[]))
            .await
    }

    pub async fn contact(&self) -> Option<ContactPage> {
        self.caches
            .contact
            .load(PAGE_KEY, || self.client.get_json("contact", &[]))
            .await
    }

    /// 聯絡頁橫幅，和聯絡資訊共用 `contact` 端點
    pub async fn contact_hero(&self) -> Option<ContactHero> {
        self.caches
            .contact_hero
            .load(PAGE_KEY, || self.client.get_json("contact", &[]))
            .await
    }

    pub async fn privacy_policy(&self) -> Option<PrivacyPolicy> {
        self.caches
            .privacy_policy
            .load(PAGE_KEY, || self.client.get_json("privacy-policy", &[]))
            .await
    }

    pub async fn projects(&self, page: u64) -> Option<Paginated<Project>> {
        let page = page.max(1);
        let query = self.listing_query(page);
        self.caches
            .projects
            .load(&page.to_string(), || self.client.get_json("projects", &query))
            .await
    }

    pub async fn project(&self, slug: &str) -> Option<Project> {
        self.caches
            .project
            .load(slug, || self.client.get_resource("projects", slug))
            .await
    }

    pub async fn jobs(&self, page: u64) -> Option<Paginated<Job>> {
        let page = page.max(1);
        let query = self.listing_query(page);
        self.caches
            .jobs
            .load(&page.to_string(), || self.client.get_json("jobs", &query))
            .await
    }

    pub async fn job(&self, slug: &str) -> Option<Job> {
        self.caches
            .job
            .load(slug, || self.client.get_resource("jobs", slug))
            .await
    }

    pub async fn blogs(&self, page: u64) -> Option<Paginated<Blog>> {
        let page = page.max(1);
        let query = self.listing_query(page);
        self.caches
            .blogs
            .load(&page.to_string(), || self.client.get_json("blogs", &query))
            .await
    }

    pub async fn blog(&self, slug: &str) -> Option<Blog> {
        self.caches
            .blog
            .load(slug, || self.client.get_resource("blogs", slug))
            .await
    }

    /// 載入某個路由需要的所有資料，回傳主要內容是否可用
    pub async fn load_route(&self, route: &Route, page: u64) -> bool {
        tracing::info!("🧭 Loading data for route {}", route.href());
        match route {
            Route::Home => self.home().await.is_some(),
            Route::AboutUs => self.about().await.is_some(),
            Route::Services => self.services().await.is_some(),
            Route::Projects => self.projects(page).await.is_some(),
            Route::ProjectDet(slug) => self.project(slug).await.is_some(),
            Route::Jops => self.jobs(page).await.is_some(),
            Route::JopDet(slug) => self.job(slug).await.is_some(),
            Route::Blogs => self.blogs(page).await.is_some(),
            Route::BlogDet(slug) => self.blog(slug).await.is_some(),
            Route::ContactUs => {
                let (contact, hero) = tokio::join!(self.contact(), self.contact_hero());
                if hero.is_none() {
                    tracing::warn!("⚠️ Contact hero unavailable, rendering page without banner");
                }
                contact.is_some()
            }
            Route::PrivacyPolicy => self.privacy_policy().await.is_some(),
        }
    }

    /// 送出聯絡表單；欄位錯誤時不發出請求
    pub async fn submit_contact(&self, form: &ContactForm) -> Result<Value> {
        let submission = form.submission().map_err(SiteError::from)?;

        tracing::info!("📨 Submitting contact request from {}", submission.email);
        let response = self.client.post_json("contact-us", &submission).await?;
        tracing::info!("✅ Contact request accepted");
        Ok(response)
    }

    /// 送出職缺申請（multipart，含履歷附件）
    pub async fn submit_job_application(&self, form: &JobApplicationForm) -> Result<Value> {
        form.validate().map_err(SiteError::from)?;
        let multipart = form.to_multipart()?;

        tracing::info!(
            "📨 Submitting application for '{}' with {} attachment(s)",
            form.job_slug,
            form.attachments.len()
        );
        let response = self.client.post_multipart("job-applications", multipart).await?;
        tracing::info!("✅ Job application accepted");
        Ok(response)
    }

    fn listing_query(&self, page: u64) -> [(&'static str, String); 2] {
        [("page", page.to_string()), ("rows", self.rows.to_string())]
    }
}
