//! The logical connection.
//!
//! One logical connection owns exactly one native driver connection and
//! hands out cursors that must not be shared between threads. The quote
//! cache it carries is the process-shared one, so every connection sees the
//! same quoted forms.

use tracing::debug;

use ember_sql_core::SqlValue;

use crate::config::ConnectionSettings;
use crate::convert::{ConverterTable, DateMode};
use crate::cursor::Cursor;
use crate::dialect::{FirebirdDialect, QuoteCache};
use crate::driver::{ConnectParams, Driver, DriverConnection};
use crate::error::{FirebirdError, Result};

/// An open backend connection.
pub struct Connection {
    settings: ConnectionSettings,
    dialect: FirebirdDialect,
    converters: ConverterTable,
    native: Box<dyn DriverConnection>,
}

impl Connection {
    /// Opens a connection through the given driver.
    ///
    /// Settings are validated first; a missing database name fails here,
    /// before any driver call. The quote cache is shared: pass the same
    /// cache to every connection in the process.
    pub fn open(
        driver: &dyn Driver,
        settings: ConnectionSettings,
        quote_cache: QuoteCache,
    ) -> Result<Self> {
        settings.validate()?;
        let params = ConnectParams {
            dsn: settings.dsn(),
            user: settings.user.clone(),
            password: settings.password.clone(),
            charset: settings.charset.as_str(),
        };
        debug!(dsn = params.dsn.as_str(), charset = params.charset, "connecting");
        let native = driver
            .connect(&params)
            .map_err(|e| FirebirdError::Connection {
                code: e.code,
                message: e.message,
            })?;
        Ok(Self {
            dialect: FirebirdDialect::with_cache(quote_cache),
            converters: ConverterTable::new(settings.charset),
            settings,
            native,
        })
    }

    /// Overrides the date normalization mode for this connection.
    #[must_use]
    pub fn with_date_mode(mut self, mode: DateMode) -> Self {
        self.converters = self.converters.with_date_mode(mode);
        self
    }

    /// The connection settings.
    #[must_use]
    pub const fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// The dialect bound to this connection's quote cache.
    #[must_use]
    pub const fn dialect(&self) -> &FirebirdDialect {
        &self.dialect
    }

    /// The converter table attached at construction.
    #[must_use]
    pub const fn converters(&self) -> &ConverterTable {
        &self.converters
    }

    /// The server version string.
    #[must_use]
    pub fn server_version(&self) -> String {
        self.native.server_version()
    }

    /// Opens a new cursor.
    pub fn cursor(&mut self) -> Cursor {
        Cursor::new(self.native.open_cursor(), self.converters)
    }

    /// Reads the current value of the table's auto-increment generator
    /// without advancing it.
    pub fn last_insert_id(&mut self, table: &str) -> Result<i64> {
        let sql = self.dialect.last_insert_id_sql(table);
        let mut cursor = self.cursor();
        cursor.execute(&sql, &[])?;
        match cursor.fetch_one()? {
            Some(row) => match row.first() {
                Some(SqlValue::Int(id)) => Ok(*id),
                other => Err(FirebirdError::Database {
                    code: 0,
                    message: format!("unexpected generator value: {other:?}"),
                    sql,
                    params: String::from("()"),
                }),
            },
            None => Err(FirebirdError::Database {
                code: 0,
                message: String::from("generator query returned no rows"),
                sql,
                params: String::from("()"),
            }),
        }
    }

    /// Closes the native connection.
    pub fn close(&mut self) -> Result<()> {
        self.native.close().map_err(|e| FirebirdError::Connection {
            code: e.code,
            message: e.message,
        })
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
