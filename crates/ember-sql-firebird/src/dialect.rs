//! Firebird dialect implementation.
//!
//! Firebird differs from the ANSI defaults in three load-bearing ways:
//! identifiers are capped at 31 characters, pagination is expressed as
//! `SELECT FIRST n SKIP m ...` (before DISTINCT and the column list, never
//! trailing), and several lookups have engine-specific operators
//! (`CONTAINING`, `STARTING WITH`). Everything here is pure SQL-text
//! generation; execution lives in the cursor layer.

use std::collections::HashMap;
use std::sync::Arc;

use ember_sql_core::Dialect;
use parking_lot::Mutex;
use tracing::debug;

use crate::ddl::Style;
use crate::names::{self, MAX_NAME_LENGTH};

/// Process-wide cache of quoted identifiers.
///
/// Quoting is deterministic, so entries are written once per key and never
/// invalidated. Clones share the same underlying map, making the cache safe
/// to hand to every connection in a multi-threaded host.
#[derive(Debug, Clone, Default)]
pub struct QuoteCache {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl QuoteCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached form, computing and memoizing on first use.
    pub fn get_or_insert_with(&self, name: &str, compute: impl FnOnce() -> String) -> String {
        let mut map = self.inner.lock();
        if let Some(hit) = map.get(name) {
            return hit.clone();
        }
        let quoted = compute();
        debug!(raw = name, quoted = quoted.as_str(), "quote cache insert");
        map.insert(String::from(name), quoted.clone());
        quoted
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// Date parts supported by `EXTRACT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePart {
    /// Calendar year.
    Year,
    /// Month of year.
    Month,
    /// Day of month.
    Day,
}

impl DatePart {
    /// The keyword used inside `EXTRACT(... FROM col)`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
        }
    }
}

/// Field lookups with Firebird-specific operator forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Exact match.
    Exact,
    /// Case-insensitive exact match.
    IExact,
    /// Substring match.
    Contains,
    /// Case-insensitive substring match.
    IContains,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Prefix match.
    StartsWith,
    /// Suffix match.
    EndsWith,
    /// Case-insensitive prefix match.
    IStartsWith,
    /// Case-insensitive suffix match.
    IEndsWith,
}

/// Firebird dialect.
///
/// Cheap to clone; clones share the quote cache.
#[derive(Debug, Clone, Default)]
pub struct FirebirdDialect {
    quote_cache: QuoteCache,
    no_limit_value: Option<u64>,
}

impl FirebirdDialect {
    /// Creates a dialect with its own quote cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a dialect sharing an existing quote cache.
    #[must_use]
    pub fn with_cache(quote_cache: QuoteCache) -> Self {
        Self {
            quote_cache,
            no_limit_value: None,
        }
    }

    /// Configures the sentinel row count for engine versions that reject
    /// `SKIP` without `FIRST`. The default is permissive (no sentinel).
    #[must_use]
    pub fn with_no_limit_value(mut self, value: u64) -> Self {
        self.no_limit_value = Some(value);
        self
    }

    /// The shared quote cache.
    #[must_use]
    pub const fn quote_cache(&self) -> &QuoteCache {
        &self.quote_cache
    }

    fn quote_uncached(name: &str) -> String {
        // Column ordinals (ORDER BY 2) and the generic merge placeholder
        // are not identifiers; they pass through untouched.
        if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
            return String::from(name);
        }
        if name == "%s" {
            return String::from(name);
        }
        // Prefix truncation only. Two long names sharing a 31-char prefix
        // collide; the limit is documented and covered by schema review.
        let stripped = names::strip_quotes(name);
        format!("\"{}\"", names::truncate_name(stripped, MAX_NAME_LENGTH))
    }

    /// `EXTRACT(<part> FROM col)` for date lookups.
    #[must_use]
    pub fn date_extract_sql(&self, part: DatePart, column: &str) -> String {
        format!("EXTRACT({} FROM {column})", part.as_str())
    }

    /// Truncates a timestamp column to the given precision.
    ///
    /// Firebird has no `date_trunc`; the equivalent is rebuilding the
    /// timestamp string from extracted parts and casting back.
    #[must_use]
    pub fn date_trunc_sql(&self, part: DatePart, column: &str) -> String {
        let rebuilt = match part {
            DatePart::Year => {
                format!("EXTRACT(year FROM {column})||'-01-01 00:00:00'")
            }
            DatePart::Month => format!(
                "EXTRACT(year FROM {column})||'-'||EXTRACT(month FROM {column})||'-01 00:00:00'"
            ),
            DatePart::Day => format!(
                "EXTRACT(year FROM {column})||'-'||EXTRACT(month FROM {column})||'-'||\
                 EXTRACT(day FROM {column})||' 00:00:00'"
            ),
        };
        format!("CAST({rebuilt} AS TIMESTAMP)")
    }

    /// Wraps the left-hand side of case-insensitive lookups in `UPPER`.
    #[must_use]
    pub const fn lookup_cast(&self, lookup: Lookup) -> &'static str {
        match lookup {
            Lookup::IExact | Lookup::IContains | Lookup::IStartsWith | Lookup::IEndsWith => {
                "UPPER(%s)"
            }
            _ => "%s",
        }
    }

    /// The right-hand operator fragment for a lookup.
    ///
    /// `CONTAINING` and `STARTING WITH` are native Firebird operators;
    /// `CONTAINING` ignores case by itself, and `STARTING WITH` outperforms
    /// the equivalent LIKE.
    #[must_use]
    pub const fn operator_sql(&self, lookup: Lookup) -> &'static str {
        match lookup {
            Lookup::Exact => "= %s",
            Lookup::IExact => "= UPPER(%s)",
            Lookup::Contains => "LIKE %s ESCAPE'\\'",
            Lookup::IContains => "CONTAINING %s",
            Lookup::Gt => "> %s",
            Lookup::Gte => ">= %s",
            Lookup::Lt => "< %s",
            Lookup::Lte => "<= %s",
            Lookup::StartsWith => "STARTING WITH %s",
            Lookup::EndsWith => "LIKE %s ESCAPE'\\'",
            Lookup::IStartsWith => "STARTING WITH UPPER(%s)",
            Lookup::IEndsWith => "LIKE UPPER(%s) ESCAPE'\\'",
        }
    }

    /// Full-text search predicate. Text columns are varchar-backed, so
    /// `CONTAINING` applies directly.
    #[must_use]
    pub fn fulltext_search_sql(&self, field: &str) -> String {
        format!("%s CONTAINING {}", self.quote_name(field))
    }

    /// SQL function returning a random value.
    #[must_use]
    pub const fn random_function_sql(&self) -> &'static str {
        "rand()"
    }

    /// Value an INSERT uses for "take the column default".
    #[must_use]
    pub const fn pk_default_value(&self) -> &'static str {
        "NULL"
    }

    /// Clause used when dropping a foreign key.
    #[must_use]
    pub const fn drop_foreignkey_sql(&self) -> &'static str {
        "DROP CONSTRAINT"
    }

    /// Maximum total index width in bytes for the given server.
    ///
    /// Pre-2.0 servers cap indexes at 252 bytes; later versions allow a
    /// quarter of the page size.
    #[must_use]
    pub const fn index_limit(&self, version_major: u32, page_size: usize) -> usize {
        if version_major < 2 {
            252
        } else {
            page_size / 4
        }
    }

    /// Statements that empty the given tables and rewind their generators.
    #[must_use]
    pub fn sql_flush(&self, style: &dyn Style, tables: &[&str], reset_tables: &[&str]) -> Vec<String> {
        if tables.is_empty() {
            return Vec::new();
        }
        let mut statements: Vec<String> = tables
            .iter()
            .map(|table| {
                format!(
                    "{} {} {};",
                    style.keyword("DELETE"),
                    style.keyword("FROM"),
                    style.table(&self.quote_name(table))
                )
            })
            .collect();
        for table in reset_tables {
            statements.push(format!(
                "{} {} {} 0;",
                style.keyword("SET GENERATOR"),
                names::generator_name(table),
                style.keyword("TO")
            ));
        }
        statements
    }
}

impl Dialect for FirebirdDialect {
    fn name(&self) -> &'static str {
        "firebird"
    }

    fn quote_name(&self, name: &str) -> String {
        self.quote_cache
            .get_or_insert_with(name, || Self::quote_uncached(name))
    }

    fn max_name_length(&self) -> Option<usize> {
        Some(MAX_NAME_LENGTH)
    }

    fn limit_offset_prefix(&self, limit: Option<u64>, offset: Option<u64>) -> Vec<String> {
        let mut tokens = Vec::new();
        if let Some(n) = limit {
            tokens.push(format!("FIRST {n}"));
        }
        if let Some(m) = offset {
            if m > 0 {
                if limit.is_none() {
                    if let Some(sentinel) = self.no_limit_value() {
                        tokens.push(format!("FIRST {sentinel}"));
                    }
                }
                tokens.push(format!("SKIP {m}"));
            }
        }
        tokens
    }

    fn limit_offset_suffix(&self, _limit: Option<u64>, _offset: Option<u64>) -> Option<String> {
        // Pagination lives in the SELECT clause; there is no trailing form.
        None
    }

    fn no_limit_value(&self) -> Option<u64> {
        self.no_limit_value
    }
}
