//! Remote config client implementations.

pub mod http;
pub mod mock;
pub mod traits;

pub use http::HttpConfigApi;
pub use mock::MockConfigApi;
pub use traits::{ApiError, ConfigApi, ConfigApiFactory};
