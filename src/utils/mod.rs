//! Utility functions

pub mod encoding;
pub mod hashing;
pub mod paths;
pub mod tokens;

pub use encoding::{is_binary, read_file_safe};
pub use hashing::content_id;
pub use paths::normalize_path;
pub use tokens::estimate_tokens;
