//! Shared helpers: text file reading and path normalization

pub mod encoding;
pub mod paths;

pub use encoding::{decode_text, is_binary_file, FileReader, FilesystemReader};
pub use paths::{normalize_path, relative_to};
