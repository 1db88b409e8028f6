pub mod error_code;
pub mod tag_error;

pub use error_code::TagErrorCode;
pub use tag_error::TagError;

pub type Result<T> = std::result::Result<T, TagError>;
