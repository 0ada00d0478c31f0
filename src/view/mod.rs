pub mod dates;
pub mod images;
pub mod pagination;
pub mod routes;
pub mod sanitize;

pub use images::{resolve_asset_url, select_image, Viewport};
pub use pagination::Pagination;
pub use routes::Route;
