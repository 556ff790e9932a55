//! End-to-end attribution behavior, driven through a mocked SeaORM connection.
//!
//! These tests live outside `src/` on purpose: the resolver never attributes
//! frames of the attribution crate itself, so decoration is only observable
//! from a separate caller crate — which is exactly what application code is.

use std::collections::BTreeMap;

use sea_orm::{
    ConnectionTrait, DatabaseBackend, DbErr, MockDatabase, MockExecResult, Statement, Value,
};
use sea_orm_callsite::{
    decorate, resolve_call_site, AttributedConnection, AttributionConfig, CallsiteExt,
};

fn exec_result() -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: 1,
    }
}

#[test]
fn resolver_reports_this_test_file() {
    let site = resolve_call_site(&AttributionConfig::default()).expect("call site");

    let function = site.function.expect("function name");
    assert!(
        function.contains("resolver_reports_this_test_file"),
        "unexpected function: {function}"
    );
    assert!(!function.contains("closure"), "uncleaned symbol: {function}");

    let file = site.file.expect("file");
    assert!(
        file.ends_with("tests/attribution.rs"),
        "unexpected file: {}",
        file.display()
    );
    assert!(site.line.unwrap_or(0) > 0);
}

#[test]
fn decorate_uses_the_resolved_site() {
    let config = AttributionConfig::default();
    let site = resolve_call_site(&config);
    let out = decorate("SELECT 1", site.as_ref(), &config);

    assert!(out.starts_with("SELECT 1 /*func_name="), "got: {out}");
    assert!(out.contains(",file=tests/attribution.rs,line="), "got: {out}");
    assert!(out.ends_with("*/"));
}

#[tokio::test]
async fn decorates_pool_level_unprepared_statement() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_result()])
        .into_connection();
    let conn = AttributedConnection::wrap(db);

    conn.execute_unprepared("SELECT 1").await.unwrap();

    let log = format!("{:?}", conn.into_inner().into_transaction_log());
    assert!(log.contains("SELECT 1 /*func_name="), "log: {log}");
    assert!(
        log.contains("decorates_pool_level_unprepared_statement"),
        "log: {log}"
    );
    assert!(log.contains(",file=tests/attribution.rs,line="), "log: {log}");
}

#[tokio::test]
async fn decorates_prepared_statement_and_preserves_values() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![BTreeMap::from([("num", Value::Int(Some(7)))])]])
        .into_connection();
    let conn = AttributedConnection::wrap(db);

    let stmt = Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        "SELECT $1 AS num",
        [Value::Int(Some(7))],
    );
    let rows = conn.query_all(stmt).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].try_get::<i32>("", "num").unwrap(), 7);

    let log = format!("{:?}", conn.into_inner().into_transaction_log());
    // Marker lands between the original text and the preserved values.
    assert!(log.contains("SELECT $1 AS num /*func_name="), "log: {log}");
    assert!(log.contains("Int(Some(7))"), "log: {log}");
}

#[tokio::test]
async fn already_decorated_text_is_left_alone() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_result()])
        .into_connection();
    let conn = AttributedConnection::wrap(db);

    let pre = "SELECT 1 /*func_name=seed::load,file=src/seed.rs,line=3*/";
    conn.execute_unprepared(pre).await.unwrap();

    let log = format!("{:?}", conn.into_inner().into_transaction_log());
    assert!(log.contains(pre), "log: {log}");
    assert_eq!(log.matches("/*func_name=").count(), 1, "log: {log}");
}

#[tokio::test]
async fn acquired_connection_decorates_each_statement_once() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_result(), exec_result()])
        .into_connection();
    let pool = AttributedConnection::wrap(db);

    let conn = pool.acquire().await.unwrap();
    conn.execute_unprepared("UPDATE t SET x = 1").await.unwrap();
    conn.release().await.unwrap();

    // Reacquiring wraps the raw handle again; still exactly one marker each.
    let conn = pool.acquire().await.unwrap();
    conn.execute_unprepared("UPDATE t SET x = 2").await.unwrap();
    conn.release().await.unwrap();

    let log = format!("{:?}", pool.into_inner().into_transaction_log());
    assert!(log.contains("UPDATE t SET x = 1 /*func_name="), "log: {log}");
    assert!(log.contains("UPDATE t SET x = 2 /*func_name="), "log: {log}");
    assert_eq!(log.matches("/*func_name=").count(), 2, "log: {log}");
}

#[tokio::test]
async fn double_wrapping_still_emits_one_marker() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_result()])
        .into_connection();
    let conn = AttributedConnection::wrap(AttributedConnection::wrap(db));

    conn.execute_unprepared("SELECT 3").await.unwrap();

    let log = format!(
        "{:?}",
        conn.into_inner().into_inner().into_transaction_log()
    );
    assert!(log.contains("SELECT 3 /*func_name="), "log: {log}");
    assert_eq!(log.matches("/*func_name=").count(), 1, "log: {log}");
}

#[tokio::test]
async fn disabled_config_passes_text_through() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_result()])
        .into_connection();
    let conn = db.with_callsite_config(AttributionConfig::disabled());

    conn.execute_unprepared("SELECT 2").await.unwrap();

    let log = format!("{:?}", conn.into_inner().into_transaction_log());
    assert!(log.contains("SELECT 2"), "log: {log}");
    assert!(!log.contains("func_name="), "log: {log}");
}

#[tokio::test]
async fn column_variant_records_col_field() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([exec_result()])
        .into_connection();
    let conn = db.with_callsite_config(AttributionConfig::default().with_column_recording(true));

    conn.execute_unprepared("SELECT 4").await.unwrap();

    let log = format!("{:?}", conn.into_inner().into_transaction_log());
    assert!(log.contains("SELECT 4 /*func_name="), "log: {log}");
    assert!(log.contains(",col="), "log: {log}");
}

#[tokio::test]
async fn propagates_delegate_errors_untouched() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors([DbErr::Custom("boom".to_string())])
        .into_connection();
    let conn = AttributedConnection::wrap(db);

    let err = conn
        .query_one(Statement::from_string(DatabaseBackend::Postgres, "SELECT 1"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbErr::Custom(ref msg) if msg == "boom"), "{err:?}");
}
