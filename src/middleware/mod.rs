pub mod auth;
pub mod response;

pub use auth::{authenticate, AuthRejection, Principal};
pub use response::{ApiResponse, ApiResult};
