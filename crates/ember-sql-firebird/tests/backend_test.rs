//! End-to-end backend scenarios against the mock driver.

use ember_sql_core::{Dialect, SelectQuery, SqlValue};
use ember_sql_firebird::driver::testing::MockDriver;
use ember_sql_firebird::{
    Charset, Connection, ConnectionSettings, FirebirdError, PlainStyle, QuoteCache,
};

fn settings() -> ConnectionSettings {
    ConnectionSettings {
        host: String::from("localhost"),
        database: String::from("test.fdb"),
        user: String::from("sysdba"),
        password: String::from("masterkey"),
        charset: Charset::UnicodeFss,
    }
}

fn open(driver: &MockDriver) -> Connection {
    Connection::open(driver, settings(), QuoteCache::new()).unwrap()
}

#[test]
fn paginated_select_round_trip() {
    let driver = MockDriver::new();
    let mut conn = open(&driver);

    let id = conn.dialect().quote_name("id");
    let name = conn.dialect().quote_name("name");
    let author = conn.dialect().quote_name("author");
    let (sql, params) = SelectQuery::new()
        .columns(&[id.as_str(), name.as_str()])
        .from(&author)
        .where_sql("\"name\" STARTING WITH %s", vec![SqlValue::Text(String::from("Bor"))])
        .limit(2)
        .offset(1)
        .to_sql(conn.dialect());

    assert_eq!(
        sql,
        "SELECT FIRST 2 SKIP 1 \"id\", \"name\" FROM \"author\" \
         WHERE \"name\" STARTING WITH %s"
    );

    let mut cursor = conn.cursor();
    cursor.execute(&sql, &params).unwrap();

    // The driver saw ?-style placeholders and encoded text.
    let executed = driver.executed();
    assert_eq!(
        executed[0].0,
        "SELECT FIRST 2 SKIP 1 \"id\", \"name\" FROM \"author\" \
         WHERE \"name\" STARTING WITH ?"
    );
}

#[test]
fn autoinc_schema_and_last_insert_id() {
    use ember_sql_firebird::convert::DriverValue;

    let driver = MockDriver::new();
    let mut conn = open(&driver);

    let (generator_sql, trigger_sql) = conn.dialect().autoinc_sql("author", "id");
    assert_eq!(generator_sql, "CREATE GENERATOR AUTHOR$G;");
    assert!(trigger_sql.contains("GEN_ID(AUTHOR$G, 1)"));

    let mut cursor = conn.cursor();
    cursor.execute(&generator_sql, &[]).unwrap();
    cursor.execute(&trigger_sql, &[]).unwrap();
    drop(cursor);

    driver.push_rows(vec![vec![(None, DriverValue::Int(7))]]);
    assert_eq!(conn.last_insert_id("author").unwrap(), 7);
}

#[test]
fn unique_violation_surfaces_as_integrity_error() {
    let driver = MockDriver::new();
    let mut conn = open(&driver);
    let mut cursor = conn.cursor();

    // First insert goes through, the duplicate violates the primary key.
    cursor
        .execute(
            "INSERT INTO \"author\" (\"id\", \"name\") VALUES (%s, %s)",
            &[SqlValue::Int(1), SqlValue::Text(String::from("Borges"))],
        )
        .unwrap();

    driver.push_error(-803, "violation of PRIMARY or UNIQUE KEY constraint \"INTEG_2\"");
    let err = cursor
        .execute(
            "INSERT INTO \"author\" (\"id\", \"name\") VALUES (%s, %s)",
            &[SqlValue::Int(1), SqlValue::Text(String::from("Cortázar"))],
        )
        .unwrap_err();

    match err {
        FirebirdError::Integrity { sql, params, .. } => {
            assert_eq!(
                sql,
                "INSERT INTO \"author\" (\"id\", \"name\") VALUES (?, ?)"
            );
            assert!(params.contains("Cortázar"));
        }
        other => panic!("expected an integrity error, got {other:?}"),
    }
}

#[test]
fn bulk_load_then_sequence_reset() {
    let driver = MockDriver::new();
    let mut conn = open(&driver);
    let mut cursor = conn.cursor();

    cursor
        .execute_many(
            "INSERT INTO \"author\" (\"id\", \"name\") VALUES (%s, %s)",
            &[
                vec![SqlValue::Int(1), SqlValue::Text(String::from("Borges"))],
                vec![SqlValue::Int(2), SqlValue::Text(String::from("Bioy"))],
            ],
        )
        .unwrap();

    let statements = conn
        .dialect()
        .sequence_reset_sql(&PlainStyle, &[("author", "id")]);
    for statement in &statements {
        cursor.execute(statement, &[]).unwrap();
    }

    let executed = driver.executed();
    assert_eq!(executed.len(), 3);
    assert!(executed[1].0.starts_with("CREATE OR ALTER PROCEDURE \"GENERATOR_RESET\""));
    assert_eq!(executed[2].0, "EXECUTE PROCEDURE \"GENERATOR_RESET\";");
}

#[test]
fn flush_empties_tables_and_rewinds_generators() {
    let driver = MockDriver::new();
    let mut conn = open(&driver);

    let statements = conn
        .dialect()
        .sql_flush(&PlainStyle, &["author", "book"], &["author"]);
    let mut cursor = conn.cursor();
    for statement in &statements {
        cursor.execute(statement, &[]).unwrap();
    }

    let executed = driver.executed();
    assert_eq!(executed[0].0, "DELETE FROM \"author\";");
    assert_eq!(executed[2].0, "SET GENERATOR AUTHOR$G TO 0;");
}

#[test]
fn limit_zero_requests_zero_rows() {
    let driver = MockDriver::new();
    let mut conn = open(&driver);

    let (sql, _) = SelectQuery::new()
        .columns(&["\"id\""])
        .from("\"author\"")
        .limit(0)
        .to_sql(conn.dialect());
    assert_eq!(sql, "SELECT FIRST 0 \"id\" FROM \"author\"");

    // The mock returns whatever was scripted; with FIRST 0 the engine
    // returns nothing, which an unscripted execute models.
    let mut cursor = conn.cursor();
    cursor.execute(&sql, &[]).unwrap();
    assert_eq!(cursor.fetch_all().unwrap(), Vec::<Vec<SqlValue>>::new());
}
