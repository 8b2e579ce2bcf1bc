//! Connection settings and character-set selection.
//!
//! Firebird negotiates one connection character set. `UNICODE_FSS` works
//! with every server version and uses 3 bytes per character; `UTF8`
//! (Firebird 2.0+) uses 4. The choice drives the charset code handed to the
//! driver's text codecs and the maximum safe VARCHAR width in generated DDL.

use serde::Deserialize;

use crate::error::{FirebirdError, Result};

/// Connection character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum Charset {
    /// Legacy UTF-8 variant, 3 bytes per character. Works everywhere.
    #[default]
    #[serde(rename = "UNICODE_FSS")]
    UnicodeFss,
    /// Standard UTF-8, 4 bytes per character. Firebird 2.0+.
    #[serde(rename = "UTF8")]
    Utf8,
}

impl Charset {
    /// The charset code the driver expects for text codecs.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::UnicodeFss => 3,
            Self::Utf8 => 4,
        }
    }

    /// Bytes per character at the connection charset.
    #[must_use]
    pub const fn bytes_per_char(self) -> usize {
        match self {
            Self::UnicodeFss => 3,
            Self::Utf8 => 4,
        }
    }

    /// Maximum safe VARCHAR length in characters (32765 bytes / width).
    #[must_use]
    pub const fn max_varchar_chars(self) -> usize {
        match self {
            Self::UnicodeFss => 10921,
            Self::Utf8 => 8191,
        }
    }

    /// The charset name as sent in connection parameters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnicodeFss => "UNICODE_FSS",
            Self::Utf8 => "UTF8",
        }
    }
}

/// Settings needed to open a connection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConnectionSettings {
    /// Server host. Empty means localhost.
    #[serde(default)]
    pub host: String,
    /// Database path or alias. Required.
    pub database: String,
    /// User name.
    #[serde(default)]
    pub user: String,
    /// Password.
    #[serde(default)]
    pub password: String,
    /// Connection character set.
    #[serde(default)]
    pub charset: Charset,
}

impl ConnectionSettings {
    /// Validates the settings, failing before any connection attempt.
    pub fn validate(&self) -> Result<()> {
        if self.database.is_empty() {
            return Err(FirebirdError::Configuration(String::from(
                "database name must not be empty",
            )));
        }
        Ok(())
    }

    /// Renders the `host:database` connection string.
    #[must_use]
    pub fn dsn(&self) -> String {
        if self.host.is_empty() {
            format!("localhost:{}", self.database)
        } else {
            format!("{}:{}", self.host, self.database)
        }
    }
}
