use graphite_data::{StoreConnection, Value};
use graphite_test::{row, FakeStore};

#[tokio::test]
async fn test_records_statements_in_order() {
    let store = FakeStore::new();
    store.query("SELECT 1").await.unwrap();
    store.execute("DELETE FROM `t` \nWHERE `id` = '1'").await.unwrap();

    assert_eq!(store.statement_count(), 2);
    assert_eq!(store.statements()[0], "SELECT 1");
    assert_eq!(
        store.last_statement().as_deref(),
        Some("DELETE FROM `t` \nWHERE `id` = '1'")
    );
}

#[tokio::test]
async fn test_scripted_rows_then_empty() {
    let store = FakeStore::new();
    store.push_rows(vec![row! { "id" => 1, "name" => "Ann" }]);

    let rows = store.query("SELECT").await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], Value::from("Ann"));
    assert!(store.query("SELECT").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_default_execution() {
    let store = FakeStore::new();
    store.push_execution(0, 42);

    let first = store.execute("INSERT").await.unwrap();
    assert_eq!(first.last_insert_id, 42);
    assert_eq!(first.rows_affected, 0);

    let second = store.execute("UPDATE").await.unwrap();
    assert_eq!(second.rows_affected, 1);
    assert_eq!(second.last_insert_id, 0);
}

#[tokio::test]
async fn test_fail_next_applies_once() {
    let store = FakeStore::new();
    store.fail_next("connection reset");

    let err = store.execute("UPDATE").await.unwrap_err();
    assert!(err.is_store());
    assert!(err.to_string().contains("connection reset"));
    assert!(store.execute("UPDATE").await.is_ok());
    assert_eq!(store.statement_count(), 2);
}

#[tokio::test]
async fn test_clones_share_state() {
    let store = FakeStore::new();
    let handle = store.clone();
    handle.query("SELECT 2").await.unwrap();
    assert_eq!(store.last_statement().as_deref(), Some("SELECT 2"));

    store.clear();
    assert_eq!(handle.statement_count(), 0);
}

#[test]
fn test_row_macro() {
    let empty = row! {};
    assert!(empty.is_empty());

    let r = row! { "id" => 7, "active" => true, "note" => Value::Null };
    assert_eq!(r["id"], Value::Int(7));
    assert_eq!(r["active"], Value::Bool(true));
    assert!(r["note"].is_null());
}

#[test]
fn test_default_escape() {
    let store = FakeStore::new();
    assert_eq!(store.escape("O'Brien"), "O\\'Brien");
}

#[tokio::test]
async fn test_fail_next_execute_skips_queries() {
    let store = FakeStore::new();
    store.fail_next_execute("deadlock");

    assert!(store.query("SELECT").await.is_ok());
    assert!(store.execute("UPDATE").await.unwrap_err().is_store());
    assert!(store.execute("UPDATE").await.is_ok());
}
