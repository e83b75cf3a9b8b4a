//! Result type alias for Bulkload

use super::errors::BulkloadError;

/// Result type alias for Bulkload operations
///
/// # Examples
///
/// ```
/// use bulkload::domain::result::Result;
/// use bulkload::domain::errors::BulkloadError;
///
/// fn load_nothing() -> Result<()> {
///     Err(BulkloadError::Source("file not found".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, BulkloadError>;
