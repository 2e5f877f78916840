//! Utility module: error types, logging, validation helpers

pub mod error;
pub mod logger;
pub mod validation;

pub use error::AppError;

/// Result type for API handlers
pub type AppResult<T> = Result<T, AppError>;

/// Current time as Unix milliseconds
///
/// The repository layer only ever sees `i64` millis; all conversion from
/// wall-clock time happens through this single helper.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
