//! SQL Dialect support.
//!
//! Different databases have slightly different SQL syntax. This module
//! provides a trait for dialect-specific behavior. The query renderer calls
//! into the dialect for identifier quoting and pagination, so engines with
//! unusual syntax (e.g. `SELECT FIRST n SKIP m ...`) plug in without
//! subclassing the renderer.

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character (e.g., `"` for standard SQL, `` ` `` for MySQL).
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns the string escape character.
    fn string_escape(&self) -> &'static str {
        "''"
    }

    /// Quotes an identifier, applying any engine length limit.
    fn quote_name(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        format!("{quote}{name}{quote}")
    }

    /// Returns the maximum identifier length, if the engine has one.
    fn max_name_length(&self) -> Option<usize> {
        None
    }

    /// Tokens injected directly after the `SELECT` keyword, before
    /// `DISTINCT` and the column list.
    ///
    /// Engines whose pagination syntax lives inside the SELECT clause
    /// override this and return `None` from [`Dialect::limit_offset_suffix`].
    fn limit_offset_prefix(&self, limit: Option<u64>, offset: Option<u64>) -> Vec<String> {
        let _ = (limit, offset);
        Vec::new()
    }

    /// Trailing pagination clause appended after ORDER BY.
    ///
    /// The default is the ANSI `LIMIT n OFFSET m` form.
    fn limit_offset_suffix(&self, limit: Option<u64>, offset: Option<u64>) -> Option<String> {
        let mut clause = String::new();
        if let Some(n) = limit {
            clause.push_str(&format!("LIMIT {n}"));
        }
        if let Some(m) = offset {
            if !clause.is_empty() {
                clause.push(' ');
            }
            clause.push_str(&format!("OFFSET {m}"));
        }
        if clause.is_empty() { None } else { Some(clause) }
    }

    /// Sentinel row count emitted when an offset is given without a limit,
    /// for engine versions that reject a bare offset.
    ///
    /// `None` means the engine accepts an offset on its own.
    fn no_limit_value(&self) -> Option<u64> {
        None
    }

    /// Returns whether the dialect supports RETURNING clause.
    fn supports_returning(&self) -> bool {
        false
    }

    /// Returns whether the dialect supports UPSERT (ON CONFLICT).
    fn supports_upsert(&self) -> bool {
        false
    }
}

/// A generic SQL dialect using ANSI SQL standards.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericDialect;

impl GenericDialect {
    /// Creates a new generic dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for GenericDialect {
    fn name(&self) -> &'static str {
        "generic"
    }
}
