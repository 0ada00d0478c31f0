pub mod content_service;

pub use content_service::{ContentCaches, ContentService, PAGE_KEY};
