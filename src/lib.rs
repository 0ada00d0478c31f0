pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod forms;
pub mod utils;
pub mod view;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::ContentService;
pub use config::cli::{FileSink, StdoutSink};
pub use config::SiteConfig;
pub use core::hydration::TransferState;
pub use core::readiness::{PageShell, ReadinessTimings, ReadyReason};
pub use core::request_gate::RequestTracker;
pub use core::response_cache::{HydrationRole, ResponseCache};
pub use utils::error::{Result, SiteError};
pub use view::Route;
