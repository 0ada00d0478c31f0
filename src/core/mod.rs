pub mod http_client;
pub mod hydration;
pub mod normalize;
pub mod readiness;
pub mod request_gate;
pub mod response_cache;

pub use crate::domain::ports::{LoadingIndicator, SiteSettings};
