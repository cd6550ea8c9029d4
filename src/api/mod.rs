//! API response types, extractors and pagination utilities

pub mod json;
pub mod pagination;
pub mod response;

pub use json::AppJson;
pub use pagination::{Paginated, PaginationMeta, PaginationParams};
pub use response::{Created, DataResponse, MessageResponse};
