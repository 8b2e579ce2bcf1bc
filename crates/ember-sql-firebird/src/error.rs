//! Error types for the Firebird backend.

use ember_sql_core::SqlValue;
use thiserror::Error;

use crate::convert::ConvertError;

/// Errors raised by the Firebird backend.
///
/// Every error is local to the statement or operation that caused it;
/// statement-level errors carry the offending SQL text and parameters so a
/// failed operation can be diagnosed (or cleaned up) without re-running it.
#[derive(Debug, Error)]
pub enum FirebirdError {
    /// A required connection parameter is missing or invalid. Raised before
    /// any connection attempt.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The driver failed to open a connection.
    #[error("connection failed (code {code}): {message}")]
    Connection {
        /// Vendor error code.
        code: i32,
        /// Driver message.
        message: String,
    },

    /// A value could not be mapped between semantic and native form.
    #[error(transparent)]
    Convert(#[from] ConvertError),

    /// The engine reported a constraint violation.
    #[error("integrity error (code {code}): {message}\nquery: {sql}\nparameters: {params}")]
    Integrity {
        /// Vendor error code.
        code: i32,
        /// Driver message.
        message: String,
        /// The SQL text submitted to the driver.
        sql: String,
        /// Rendered parameter values.
        params: String,
    },

    /// Any other driver-level failure.
    #[error("database error (code {code}): {message}\nquery: {sql}\nparameters: {params}")]
    Database {
        /// Vendor error code.
        code: i32,
        /// Driver message.
        message: String,
        /// The SQL text submitted to the driver.
        sql: String,
        /// Rendered parameter values.
        params: String,
    },

    /// The number of `%s` placeholders does not match the parameter count.
    /// Detected before the statement reaches the driver.
    #[error("placeholder count mismatch in query: expected {expected} parameters, got {actual}\nquery: {sql}")]
    PlaceholderMismatch {
        /// Placeholders found in the SQL text.
        expected: usize,
        /// Parameters supplied by the caller.
        actual: usize,
        /// The SQL text as received.
        sql: String,
    },
}

impl FirebirdError {
    /// Renders parameter values for an error payload.
    #[must_use]
    pub fn render_params(params: &[SqlValue]) -> String {
        let rendered: Vec<String> = params.iter().map(SqlValue::to_sql_inline).collect();
        format!("({})", rendered.join(", "))
    }
}

/// Result type alias for backend operations.
pub type Result<T> = std::result::Result<T, FirebirdError>;
