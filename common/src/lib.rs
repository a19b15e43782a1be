// Public modules
pub mod error;
pub mod logger;
pub mod text;

// Re-exports
pub use error::AnalysisError;
pub use text::{normalize_for_matching, strip_diacritics};
