//! # ember-sql-core
//!
//! Dialect-neutral building blocks for database backends.
//!
//! This crate provides:
//! - [`SelectQuery`]: the assembled fragment set of a logical SELECT
//!   statement, rendered through a dialect
//! - [`Dialect`]: the strategy trait backends implement for quoting and
//!   pagination placement
//! - [`SqlValue`]: the semantic value type exchanged with backends
//!
//! ## Rendering through a dialect
//!
//! ```rust
//! use ember_sql_core::{GenericDialect, SelectQuery};
//!
//! let (sql, _params) = SelectQuery::new()
//!     .columns(&["id", "name"])
//!     .from("users")
//!     .limit(10)
//!     .to_sql(&GenericDialect::new());
//!
//! assert_eq!(sql, "SELECT id, name FROM users LIMIT 10");
//! ```
//!
//! Engines that paginate inside the SELECT clause (e.g. Firebird's
//! `SELECT FIRST n SKIP m ...`) override the dialect's pagination hooks;
//! the renderer itself never changes.

pub mod dialect;
pub mod query;
pub mod value;

pub use dialect::{Dialect, GenericDialect};
pub use query::SelectQuery;
pub use value::{SqlValue, ToSqlValue};
