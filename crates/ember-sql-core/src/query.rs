//! The dialect-neutral SELECT fragment set.
//!
//! A [`SelectQuery`] carries the pieces of a logical query (columns, FROM,
//! predicate text with positional parameters, grouping, ordering, pagination
//! bounds) exactly as the framework assembled them. Rendering walks the
//! fragments once and asks the [`Dialect`] where pagination tokens belong,
//! so the same fragment set renders correctly for engines with trailing
//! `LIMIT/OFFSET` and for engines that paginate inside the SELECT clause.
//!
//! Predicate text uses the framework's generic `%s` placeholder style; the
//! backend's cursor layer translates placeholders to the driver's own form.

use crate::dialect::Dialect;
use crate::value::SqlValue;

/// A fully assembled, dialect-neutral SELECT statement.
///
/// Rendering is pure: calling [`SelectQuery::to_sql`] twice with the same
/// dialect yields byte-identical SQL.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    distinct: bool,
    columns: Vec<String>,
    from: Option<String>,
    joins: Vec<String>,
    where_sql: Option<String>,
    where_params: Vec<SqlValue>,
    group_by: Vec<String>,
    having_sql: Option<String>,
    having_params: Vec<SqlValue>,
    order_by: Vec<String>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl SelectQuery {
    /// Creates an empty fragment set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Specifies the select column list (already quoted by the caller).
    #[must_use]
    pub fn columns(mut self, cols: &[&str]) -> Self {
        self.columns = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Specifies the table to select from.
    #[must_use]
    pub fn from(mut self, table: &str) -> Self {
        self.from = Some(String::from(table));
        self
    }

    /// Adds an INNER JOIN.
    #[must_use]
    pub fn join(mut self, table: &str, on: &str) -> Self {
        self.joins.push(format!("INNER JOIN {table} ON {on}"));
        self
    }

    /// Adds a LEFT JOIN.
    #[must_use]
    pub fn left_join(mut self, table: &str, on: &str) -> Self {
        self.joins.push(format!("LEFT JOIN {table} ON {on}"));
        self
    }

    /// Sets the WHERE predicate text and its positional parameters.
    #[must_use]
    pub fn where_sql(mut self, predicate: &str, params: Vec<SqlValue>) -> Self {
        self.where_sql = Some(String::from(predicate));
        self.where_params = params;
        self
    }

    /// Adds a GROUP BY clause.
    #[must_use]
    pub fn group_by(mut self, cols: &[&str]) -> Self {
        self.group_by = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Sets the HAVING predicate text and its positional parameters.
    #[must_use]
    pub fn having_sql(mut self, predicate: &str, params: Vec<SqlValue>) -> Self {
        self.having_sql = Some(String::from(predicate));
        self.having_params = params;
        self
    }

    /// Adds an ORDER BY clause.
    #[must_use]
    pub fn order_by(mut self, cols: &[&str]) -> Self {
        self.order_by = cols.iter().map(|s| String::from(*s)).collect();
        self
    }

    /// Sets DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Sets the row limit. `0` is a real limit returning zero rows.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    /// Sets the row offset.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    /// Returns the pagination bounds.
    #[must_use]
    pub const fn bounds(&self) -> (Option<u64>, Option<u64>) {
        (self.limit, self.offset)
    }

    /// Renders the statement for the given dialect.
    ///
    /// Returns the SQL text and the positional parameters in placeholder
    /// order (WHERE parameters before HAVING parameters).
    #[must_use]
    pub fn to_sql(&self, dialect: &dyn Dialect) -> (String, Vec<SqlValue>) {
        let mut sql = String::from("SELECT ");
        let mut params = Vec::new();

        // Pagination tokens go before DISTINCT; Firebird requires
        // SELECT FIRST n SKIP m DISTINCT ... in exactly that order.
        for token in dialect.limit_offset_prefix(self.limit, self.offset) {
            sql.push_str(&token);
            sql.push(' ');
        }

        if self.distinct {
            sql.push_str("DISTINCT ");
        }

        sql.push_str(&self.columns.join(", "));

        if let Some(ref table) = self.from {
            sql.push_str(" FROM ");
            sql.push_str(table);
        }

        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join);
        }

        if let Some(ref predicate) = self.where_sql {
            sql.push_str(" WHERE ");
            sql.push_str(predicate);
            params.extend(self.where_params.iter().cloned());
        }

        if !self.group_by.is_empty() {
            sql.push_str(" GROUP BY ");
            sql.push_str(&self.group_by.join(", "));
        }

        if let Some(ref predicate) = self.having_sql {
            sql.push_str(" HAVING ");
            sql.push_str(predicate);
            params.extend(self.having_params.iter().cloned());
        }

        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by.join(", "));
        }

        if let Some(clause) = dialect.limit_offset_suffix(self.limit, self.offset) {
            sql.push(' ');
            sql.push_str(&clause);
        }

        (sql, params)
    }
}
