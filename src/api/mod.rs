pub mod envelope;
pub mod extract;
pub mod pagination;

pub use envelope::{ApiResponse, ApiResult, Envelope};
pub use extract::{ApiJson, ApiPath, ApiQuery};
pub use pagination::{Page, PageQuery};
