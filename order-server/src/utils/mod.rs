//! 工具模块

pub mod error;
pub mod extract;
pub mod logger;
pub mod result;

pub use error::AppError;
pub use extract::AppJson;
pub use result::AppResult;
