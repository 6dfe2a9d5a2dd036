pub mod error;
pub mod pagination;
pub mod result;
pub mod storage;
pub mod text;
pub mod traits;

pub use error::{AppError, Result};
pub use pagination::{ListQuery, PageRequest, Paginated};
pub use result::{ErrorCode, ServiceError, ServiceFailure, ServiceResult};
