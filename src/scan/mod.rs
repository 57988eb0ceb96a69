//! File discovery.

pub mod scanner;

pub use scanner::{FileScanner, ScanItem};
