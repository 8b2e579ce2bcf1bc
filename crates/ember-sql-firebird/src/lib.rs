//! # ember-sql-firebird
//!
//! A Firebird/InterBase backend: everything a generic ORM layer needs to
//! target an engine whose SQL dialect differs from the ANSI defaults in
//! ways that matter.
//!
//! - **Pagination** is `SELECT FIRST n SKIP m ...`, positioned inside the
//!   SELECT clause before DISTINCT — never a trailing `LIMIT/OFFSET`.
//!   [`FirebirdDialect`] plugs this into the core renderer.
//! - **Identifiers** are capped at 31 characters. Quoting truncates and
//!   memoizes through a process-shared [`QuoteCache`].
//! - **Auto-increment** does not exist natively; it is emulated with a
//!   generator plus a before-insert trigger, named deterministically from
//!   the table name (`AUTHOR$G` / `AUTHOR$T`). See
//!   [`FirebirdDialect::autoinc_sql`].
//! - **Values** cross the driver boundary through a per-connection
//!   [`ConverterTable`] handling timestamp precision truncation,
//!   fixed-point scaling, and charset-aware text codecs.
//! - **Cursors** translate the framework's `%s` placeholders to the
//!   driver's `?` form and reclassify vendor errors into the backend's
//!   typed taxonomy.
//!
//! The native wire protocol stays external: real driver bindings implement
//! the narrow traits in [`driver`], and tests run against
//! [`driver::testing::MockDriver`].
//!
//! ## Rendering a paginated query
//!
//! ```rust
//! use ember_sql_core::SelectQuery;
//! use ember_sql_firebird::FirebirdDialect;
//!
//! let dialect = FirebirdDialect::new();
//! let (sql, _params) = SelectQuery::new()
//!     .columns(&["\"id\"", "\"name\""])
//!     .from("\"author\"")
//!     .limit(2)
//!     .offset(1)
//!     .to_sql(&dialect);
//!
//! assert_eq!(sql, "SELECT FIRST 2 SKIP 1 \"id\", \"name\" FROM \"author\"");
//! ```

pub mod config;
pub mod connection;
pub mod convert;
pub mod cursor;
pub mod ddl;
pub mod dialect;
pub mod driver;
pub mod error;
pub mod names;

pub use config::{Charset, ConnectionSettings};
pub use connection::Connection;
pub use convert::{ConvertError, ConverterTable, DateMode, DriverValue, NativeTag};
pub use cursor::Cursor;
pub use ddl::{firebird_type_name, PlainStyle, ProcedureDef, SqlType, Style};
pub use dialect::{DatePart, FirebirdDialect, Lookup, QuoteCache};
pub use driver::{ConnectParams, Driver, DriverConnection, DriverCursor, DriverError};
pub use error::{FirebirdError, Result};
