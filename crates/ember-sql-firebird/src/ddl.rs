//! Schema DDL generation.
//!
//! Firebird has no native auto-increment: each auto-increment column is
//! emulated with a generator (sequence) plus a before-insert trigger that
//! fills the key column from it. This module emits that DDL, the companion
//! "reseed the generator after a bulk load" procedure, and the column type
//! names used when creating tables.
//!
//! Everything is text generation; running the statements is the migration
//! executor's job. Emitters are written to be idempotent on retry:
//! triggers and procedures use `CREATE OR ALTER`, and a catalog probe is
//! provided so callers can skip `CREATE GENERATOR` when the generator
//! already exists.

use ember_sql_core::Dialect;
use serde::{Deserialize, Serialize};

use crate::config::Charset;
use crate::dialect::FirebirdDialect;
use crate::names;

/// Cosmetic formatting hooks for generated DDL (keyword casing, identifier
/// highlighting). Purely presentational; the default passes text through.
pub trait Style {
    /// Formats a SQL keyword.
    fn keyword(&self, text: &str) -> String {
        String::from(text)
    }

    /// Formats a table reference.
    fn table(&self, text: &str) -> String {
        String::from(text)
    }

    /// Formats a column reference.
    fn field(&self, text: &str) -> String {
        String::from(text)
    }
}

/// The no-op style.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStyle;

impl Style for PlainStyle {}

/// SQL column types the backend knows how to render.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// Integer (32-bit).
    Integer,
    /// Small integer (16-bit).
    SmallInt,
    /// Big integer (64-bit).
    BigInt,
    /// Variable-length character string in the connection charset.
    Varchar(usize),
    /// Variable-length single-byte string (`CHARACTER SET ASCII`).
    AsciiVarchar(usize),
    /// Large text, stored as a text blob.
    Text,
    /// Date only.
    Date,
    /// Time only.
    Time,
    /// Date and time.
    Timestamp,
    /// Fixed-point decimal with precision and scale.
    Decimal(u8, u8),
    /// Double-precision float.
    Double,
    /// Binary large object.
    Blob,
    /// Boolean, stored as a checked smallint.
    Boolean,
}

/// Returns the Firebird type name for a column type.
///
/// `Boolean` is rendered bare here; pair it with
/// [`FirebirdDialect::boolean_check_sql`] when emitting the column
/// definition so the 0/1 domain is enforced at the schema level.
#[must_use]
pub fn firebird_type_name(sql_type: &SqlType, charset: Charset) -> String {
    match sql_type {
        SqlType::Integer => String::from("integer"),
        SqlType::SmallInt => String::from("smallint"),
        SqlType::BigInt => String::from("bigint"),
        SqlType::Varchar(len) => {
            // Wider columns than the charset allows would overflow the
            // 32765-byte VARCHAR ceiling at the server.
            let len = (*len).min(charset.max_varchar_chars());
            format!("varchar({len})")
        }
        SqlType::AsciiVarchar(len) => format!("varchar({len}) CHARACTER SET ASCII"),
        SqlType::Text => String::from("blob sub_type text"),
        SqlType::Date => String::from("date"),
        SqlType::Time => String::from("time"),
        SqlType::Timestamp => String::from("timestamp"),
        SqlType::Decimal(precision, scale) => format!("numeric({precision}, {scale})"),
        SqlType::Double => String::from("double precision"),
        SqlType::Blob => String::from("blob"),
        SqlType::Boolean => String::from("smallint"),
    }
}

/// A stored-procedure description consumed by the DDL emitter.
///
/// Plain data: name, declared variables, body lines. `to_sql` renders the
/// `CREATE OR ALTER PROCEDURE` text, so re-running it replaces rather than
/// fails.
#[derive(Debug, Clone)]
pub struct ProcedureDef {
    name: String,
    declares: Vec<(String, String)>,
    body: Vec<String>,
}

impl ProcedureDef {
    /// Creates a procedure definition with the given (quoted) name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            declares: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Declares a local variable.
    #[must_use]
    pub fn declare(mut self, name: &str, sql_type: &str) -> Self {
        self.declares.push((String::from(name), String::from(sql_type)));
        self
    }

    /// Appends a body line (terminators included by the caller).
    #[must_use]
    pub fn line(mut self, line: &str) -> Self {
        self.body.push(String::from(line));
        self
    }

    /// Renders the `CREATE OR ALTER PROCEDURE` statement.
    #[must_use]
    pub fn to_sql(&self, style: &dyn Style) -> String {
        let mut out = vec![format!(
            "{} {} {}",
            style.keyword("CREATE OR ALTER PROCEDURE"),
            style.table(&self.name),
            style.keyword("AS")
        )];
        for (name, sql_type) in &self.declares {
            out.push(format!(
                "{} {name} {sql_type};",
                style.keyword("DECLARE VARIABLE")
            ));
        }
        out.push(style.keyword("BEGIN"));
        for line in &self.body {
            out.push(format!("  {line}"));
        }
        out.push(format!("{};", style.keyword("END")));
        out.join("\n")
    }
}

impl FirebirdDialect {
    /// Emits the generator and trigger DDL emulating auto-increment for
    /// `table.column`.
    ///
    /// The trigger fires BEFORE INSERT at position 0 and assigns from the
    /// generator when the key is NULL *or* 0 — client layers that send an
    /// explicit 0 for unset integer keys get a generated value too.
    #[must_use]
    pub fn autoinc_sql(&self, table: &str, column: &str) -> (String, String) {
        let generator = names::generator_name(table);
        let trigger = names::trigger_name(table);
        let column = self.quote_name(column);
        let table = self.quote_name(table);

        let generator_sql = format!("CREATE GENERATOR {generator};");
        let trigger_sql = [
            format!("CREATE OR ALTER TRIGGER {trigger} FOR {table}"),
            String::from("ACTIVE BEFORE INSERT POSITION 0 AS"),
            String::from("BEGIN"),
            format!("  IF ((NEW.{column} IS NULL) OR (NEW.{column} = 0)) THEN"),
            String::from("  BEGIN"),
            format!("    NEW.{column} = GEN_ID({generator}, 1);"),
            String::from("  END"),
            String::from("END;"),
        ]
        .join("\n");
        (generator_sql, trigger_sql)
    }

    /// Catalog probe for the table's generator, for idempotent retries:
    /// run this first and skip `CREATE GENERATOR` on a hit.
    #[must_use]
    pub fn generator_exists_sql(&self, table: &str) -> String {
        format!(
            "SELECT RDB$GENERATOR_NAME FROM RDB$GENERATORS \
             WHERE RDB$GENERATOR_NAME = '{}'",
            names::generator_name(table)
        )
    }

    /// Drops the table's generator.
    #[must_use]
    pub fn drop_sequence_sql(&self, table: &str) -> String {
        format!("DROP GENERATOR {};", names::generator_name(table))
    }

    /// Statement reading the generator's current value without advancing it.
    #[must_use]
    pub fn last_insert_id_sql(&self, table: &str) -> String {
        format!(
            "SELECT GEN_ID({}, 0) FROM RDB$DATABASE",
            names::generator_name(table)
        )
    }

    /// CHECK clause enforcing the boolean 0/1 domain on a smallint column.
    #[must_use]
    pub fn boolean_check_sql(&self, column: &str) -> String {
        format!("CHECK ({} IN (0,1))", self.quote_name(column))
    }

    /// Emits statements reseeding each table's generator to `MAX(column)`
    /// after a bulk load with explicit keys.
    ///
    /// Per table, a `CREATE OR ALTER PROCEDURE "GENERATOR_RESET"` (so the
    /// definition is reusable and retry-safe) followed by its `EXECUTE
    /// PROCEDURE`. An empty table (MAX is NULL) resets the generator to
    /// zero, so the next generated key is 1.
    #[must_use]
    pub fn sequence_reset_sql(&self, style: &dyn Style, tables: &[(&str, &str)]) -> Vec<String> {
        let mut output = Vec::new();
        for (table, column) in tables {
            let generator = names::generator_name(table);
            let column = self.quote_name(column);
            let table = self.quote_name(table);

            let procedure = ProcedureDef::new("\"GENERATOR_RESET\"")
                .declare("start_val", "integer")
                .declare("gen_val", "integer")
                .line(&format!("SELECT MAX({column}) FROM {table} INTO :start_val;"))
                .line("IF (start_val IS NULL) THEN")
                .line(&format!(
                    "  gen_val = GEN_ID({generator}, 0 - GEN_ID({generator}, 0));"
                ))
                .line("ELSE")
                .line(&format!(
                    "  gen_val = GEN_ID({generator}, start_val - GEN_ID({generator}, 0));"
                ))
                .line("EXIT;");

            output.push(procedure.to_sql(style));
            output.push(format!(
                "{} {};",
                style.keyword("EXECUTE PROCEDURE"),
                style.table("\"GENERATOR_RESET\"")
            ));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_autoinc_sql_scenario() {
        let dialect = FirebirdDialect::new();
        let (generator_sql, trigger_sql) = dialect.autoinc_sql("author", "id");

        assert_eq!(generator_sql, "CREATE GENERATOR AUTHOR$G;");
        assert!(trigger_sql.starts_with("CREATE OR ALTER TRIGGER AUTHOR$T FOR \"author\""));
        assert!(trigger_sql.contains("ACTIVE BEFORE INSERT POSITION 0 AS"));
        assert!(trigger_sql.contains("IF ((NEW.\"id\" IS NULL) OR (NEW.\"id\" = 0)) THEN"));
        assert!(trigger_sql.contains("NEW.\"id\" = GEN_ID(AUTHOR$G, 1);"));
    }

    #[test]
    fn test_autoinc_sql_is_deterministic() {
        let dialect = FirebirdDialect::new();
        assert_eq!(
            dialect.autoinc_sql("author", "id"),
            dialect.autoinc_sql("author", "id")
        );
    }

    #[test]
    fn test_generator_probe_and_drop() {
        let dialect = FirebirdDialect::new();
        assert_eq!(
            dialect.generator_exists_sql("author"),
            "SELECT RDB$GENERATOR_NAME FROM RDB$GENERATORS \
             WHERE RDB$GENERATOR_NAME = 'AUTHOR$G'"
        );
        assert_eq!(dialect.drop_sequence_sql("author"), "DROP GENERATOR AUTHOR$G;");
    }

    #[test]
    fn test_sequence_reset_sql() {
        let dialect = FirebirdDialect::new();
        let statements = dialect.sequence_reset_sql(&PlainStyle, &[("author", "id")]);
        assert_eq!(statements.len(), 2);

        let procedure = &statements[0];
        assert!(procedure.starts_with("CREATE OR ALTER PROCEDURE \"GENERATOR_RESET\" AS"));
        assert!(procedure.contains("DECLARE VARIABLE start_val integer;"));
        assert!(procedure.contains("SELECT MAX(\"id\") FROM \"author\" INTO :start_val;"));
        // Empty table resets the generator to zero.
        assert!(procedure.contains("gen_val = GEN_ID(AUTHOR$G, 0 - GEN_ID(AUTHOR$G, 0));"));
        assert!(procedure.contains("gen_val = GEN_ID(AUTHOR$G, start_val - GEN_ID(AUTHOR$G, 0));"));
        assert!(procedure.ends_with("END;"));

        assert_eq!(statements[1], "EXECUTE PROCEDURE \"GENERATOR_RESET\";");
    }

    #[test]
    fn test_firebird_type_names() {
        assert_eq!(
            firebird_type_name(&SqlType::Integer, Charset::UnicodeFss),
            "integer"
        );
        assert_eq!(
            firebird_type_name(&SqlType::Varchar(255), Charset::UnicodeFss),
            "varchar(255)"
        );
        assert_eq!(
            firebird_type_name(&SqlType::AsciiVarchar(15), Charset::UnicodeFss),
            "varchar(15) CHARACTER SET ASCII"
        );
        assert_eq!(
            firebird_type_name(&SqlType::Decimal(10, 2), Charset::UnicodeFss),
            "numeric(10, 2)"
        );
        assert_eq!(
            firebird_type_name(&SqlType::Text, Charset::UnicodeFss),
            "blob sub_type text"
        );
        assert_eq!(
            firebird_type_name(&SqlType::Double, Charset::UnicodeFss),
            "double precision"
        );
    }

    #[test]
    fn test_varchar_capped_by_charset() {
        assert_eq!(
            firebird_type_name(&SqlType::Varchar(20_000), Charset::UnicodeFss),
            "varchar(10921)"
        );
        assert_eq!(
            firebird_type_name(&SqlType::Varchar(20_000), Charset::Utf8),
            "varchar(8191)"
        );
    }

    #[test]
    fn test_boolean_check_sql() {
        let dialect = FirebirdDialect::new();
        assert_eq!(
            dialect.boolean_check_sql("is_active"),
            "CHECK (\"is_active\" IN (0,1))"
        );
    }

    #[test]
    fn test_procedure_def_builder() {
        let sql = ProcedureDef::new("\"NOOP\"")
            .declare("x", "integer")
            .line("x = 1;")
            .line("EXIT;")
            .to_sql(&PlainStyle);
        assert_eq!(
            sql,
            "CREATE OR ALTER PROCEDURE \"NOOP\" AS\n\
             DECLARE VARIABLE x integer;\n\
             BEGIN\n  x = 1;\n  EXIT;\nEND;"
        );
    }
}
