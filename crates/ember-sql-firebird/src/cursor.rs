//! Cursor wrapper: placeholder translation, parameter conversion, and
//! driver error reclassification.
//!
//! The framework writes `%s`-style positional placeholders; the driver
//! wants `?`. The wrapper rewrites placeholders (validating the count
//! against the parameter list before the driver sees the statement), runs
//! parameters through the outbound half of the conversion pipeline, and
//! maps driver errors onto the backend taxonomy — constraint violations
//! become [`FirebirdError::Integrity`], everything else
//! [`FirebirdError::Database`], both carrying the statement and parameters
//! for diagnosis.

use ember_sql_core::SqlValue;
use tracing::debug;

use crate::convert::{ConverterTable, DriverValue, NativeTag};
use crate::driver::{DriverCursor, DriverError, ISC_UNIQUE_VIOLATION};
use crate::error::{FirebirdError, Result};

/// A cursor bound to one connection. Not safe for concurrent use.
pub struct Cursor {
    inner: Box<dyn DriverCursor>,
    converters: ConverterTable,
    last_sql: String,
}

impl Cursor {
    /// Wraps a driver cursor with the connection's converter table.
    #[must_use]
    pub fn new(inner: Box<dyn DriverCursor>, converters: ConverterTable) -> Self {
        Self {
            inner,
            converters,
            last_sql: String::new(),
        }
    }

    /// Rewrites `%s` placeholders to the driver's `?` form.
    ///
    /// `%%s` is the escape for a literal `%s` and produces no placeholder.
    /// The placeholder count must match `num_params` exactly; a mismatch
    /// fails before the statement reaches the driver.
    pub fn convert_query(sql: &str, num_params: usize) -> Result<String> {
        let mut out = String::with_capacity(sql.len());
        let mut found = 0_usize;
        let mut chars = sql.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.peek() {
                // "%%" collapses to a literal percent, so "%%s" comes out
                // as "%s" with no placeholder.
                Some('%') => {
                    chars.next();
                    out.push('%');
                }
                Some('s') => {
                    chars.next();
                    out.push('?');
                    found += 1;
                }
                _ => out.push('%'),
            }
        }
        if found != num_params {
            return Err(FirebirdError::PlaceholderMismatch {
                expected: found,
                actual: num_params,
                sql: String::from(sql),
            });
        }
        Ok(out)
    }

    /// Executes a statement with positional parameters.
    pub fn execute(&mut self, sql: &str, params: &[SqlValue]) -> Result<()> {
        let cquery = Self::convert_query(sql, params.len())?;
        let driver_params = self.outbound_params(params)?;
        debug!(sql = cquery.as_str(), params = params.len(), "execute");
        self.last_sql = cquery.clone();
        self.inner
            .execute(&cquery, &driver_params)
            .map_err(|e| classify(e, &cquery, params))
    }

    /// Executes a statement once per parameter tuple.
    ///
    /// An empty parameter list is a no-op, not an error.
    pub fn execute_many(&mut self, sql: &str, param_lists: &[Vec<SqlValue>]) -> Result<()> {
        let Some(first) = param_lists.first() else {
            return Ok(());
        };
        let cquery = Self::convert_query(sql, first.len())?;
        let mut converted = Vec::with_capacity(param_lists.len());
        for params in param_lists {
            if params.len() != first.len() {
                return Err(FirebirdError::PlaceholderMismatch {
                    expected: first.len(),
                    actual: params.len(),
                    sql: String::from(sql),
                });
            }
            converted.push(self.outbound_params(params)?);
        }
        debug!(
            sql = cquery.as_str(),
            batches = param_lists.len(),
            "execute_many"
        );
        self.last_sql = cquery.clone();
        self.inner
            .execute_many(&cquery, &converted)
            .map_err(|e| classify(e, &cquery, first))
    }

    /// Fetches the next row, converted to semantic values.
    pub fn fetch_one(&mut self) -> Result<Option<Vec<SqlValue>>> {
        let row = self
            .inner
            .fetch_row()
            .map_err(|e| classify(e, &self.last_sql, &[]))?;
        row.map(|cells| self.inbound_row(&cells)).transpose()
    }

    /// Fetches up to `size` rows.
    pub fn fetch_many(&mut self, size: usize) -> Result<Vec<Vec<SqlValue>>> {
        let mut rows = Vec::new();
        while rows.len() < size {
            match self.fetch_one()? {
                Some(row) => rows.push(row),
                None => break,
            }
        }
        Ok(rows)
    }

    /// Fetches all remaining rows.
    pub fn fetch_all(&mut self) -> Result<Vec<Vec<SqlValue>>> {
        let mut rows = Vec::new();
        while let Some(row) = self.fetch_one()? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Rows affected by the last statement.
    #[must_use]
    pub fn rows_affected(&self) -> u64 {
        self.inner.rows_affected()
    }

    fn outbound_params(&self, params: &[SqlValue]) -> Result<Vec<DriverValue>> {
        params.iter().map(|v| self.outbound_param(v)).collect()
    }

    fn outbound_param(&self, value: &SqlValue) -> Result<DriverValue> {
        // Integers and doubles ship structurally; the tagged kinds go
        // through the conversion pipeline.
        let tag = match value {
            SqlValue::Null => return Ok(DriverValue::Null),
            SqlValue::Int(n) => return Ok(DriverValue::Int(*n)),
            SqlValue::Float(f) => return Ok(DriverValue::Double(*f)),
            SqlValue::Bool(_) => NativeTag::Boolean,
            SqlValue::Decimal(_) => NativeTag::Fixed,
            SqlValue::Text(_) => NativeTag::TextUnicode,
            SqlValue::Blob(_) => NativeTag::Blob,
            SqlValue::Date(_) => NativeTag::Date,
            SqlValue::Time(_) => NativeTag::Time,
            SqlValue::Timestamp(_) => NativeTag::Timestamp,
        };
        Ok(self.converters.outbound(tag, value)?)
    }

    fn inbound_row(&self, cells: &[(Option<NativeTag>, DriverValue)]) -> Result<Vec<SqlValue>> {
        cells
            .iter()
            .map(|(tag, value)| {
                let converted = match tag {
                    Some(tag) => self.converters.inbound(*tag, value)?,
                    None => self.converters.inbound_untagged(value)?,
                };
                Ok(converted)
            })
            .collect()
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("last_sql", &self.last_sql)
            .finish_non_exhaustive()
    }
}

/// Maps a driver error onto the backend taxonomy, attaching the statement
/// and parameters.
fn classify(err: DriverError, sql: &str, params: &[SqlValue]) -> FirebirdError {
    let rendered = FirebirdError::render_params(params);
    if err.code == ISC_UNIQUE_VIOLATION {
        FirebirdError::Integrity {
            code: err.code,
            message: err.message,
            sql: String::from(sql),
            params: rendered,
        }
    } else {
        FirebirdError::Database {
            code: err.code,
            message: err.message,
            sql: String::from(sql),
            params: rendered,
        }
    }
}
