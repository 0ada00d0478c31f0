use crate::domain::model::ImageSource;

pub const TABLET_BREAKPOINT: u32 = 768;
pub const DESKTOP_BREAKPOINT: u32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewport {
    Mobile,
    Tablet,
    Desktop,
}

impl Viewport {
    pub fn from_width(width: u32) -> Self {
        if width < TABLET_BREAKPOINT {
            Viewport::Mobile
        } else if width < DESKTOP_BREAKPOINT {
            Viewport::Tablet
        } else {
            Viewport::Desktop
        }
    }

    /// 陣列形式圖片的索引：0 桌機、1 平板、2 手機
    fn list_index(self) -> usize {
        match self {
            Viewport::Desktop => 0,
            Viewport::Tablet => 1,
            Viewport::Mobile => 2,
        }
    }
}

/// 依視窗寬度選擇圖片並補上資源主機，找不到任何 URL 時回傳 None
pub fn select_image(image: &ImageSource, width: u32, asset_host: &str) -> Option<String> {
    let viewport = Viewport::from_width(width);

    let chosen = match image {
        ImageSource::Missing => None,
        ImageSource::Single(url) => Some(url.as_str()),
        ImageSource::List(urls) => urls
            .get(viewport.list_index())
            .or_else(|| urls.first())
            .map(String::as_str),
        ImageSource::Responsive {
            desktop,
            tablet,
            mobile,
        } => {
            let preferred = match viewport {
                Viewport::Desktop => [desktop, tablet, mobile],
                Viewport::Tablet => [tablet, desktop, mobile],
                Viewport::Mobile => [mobile, tablet, desktop],
            };
            preferred
                .into_iter()
                .flatten()
                .map(String::as_str)
                .find(|url| !url.trim().is_empty())
        }
    };

    chosen
        .filter(|url| !url.trim().is_empty())
        .map(|url| resolve_asset_url(url, asset_host))
}

/// 相對路徑前綴資源主機；絕對 URL、protocol-relative 與 data URI 保持不變
pub fn resolve_asset_url(path: &str, asset_host: &str) -> String {
    let path = path.trim();
    if path.starts_with("http://")
        || path.starts_with("https://")
        || path.starts_with("//")
        || path.starts_with("data:")
        || asset_host.is_empty()
    {
        return path.to_string();
    }

    format!(
        "{}/{}",
        asset_host.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
