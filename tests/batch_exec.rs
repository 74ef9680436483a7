use sql_fluent::prelude::*;
use tempfile::tempdir;

fn unique_db_path(prefix: &str) -> String {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    std::mem::forget(dir);
    path.to_string_lossy().into_owned()
}

async fn players_db(prefix: &str) -> Result<Database, Box<dyn std::error::Error>> {
    let db = Database::open(unique_db_path(prefix)).await?;
    db.table("players")
        .create(&["id INTEGER PRIMARY KEY", "name TEXT NOT NULL", "coins INTEGER"])
        .await?;
    Ok(db)
}

#[tokio::test]
async fn batch_inserts_rows_in_queued_order() -> Result<(), Box<dyn std::error::Error>> {
    let db = players_db("batch_order").await?;
    let players = db.table("players");

    let mut insert = players.insert_into(&["id", "name", "coins"]);
    insert.bind_i64(1).bind_text("Alice").bind_i64(100).add_batch();
    insert.bind_i64(2).bind_text("Bob").bind_i64(200).add_batch();

    let counts = insert.execute_batch().await?;
    assert_eq!(counts, vec![1, 1]);

    let rows = players
        .select("ORDER BY id")
        .fetch_all_rows(|row| {
            Ok((
                row.value_named("id")?,
                row.value_named("name")?,
                row.value_named("coins")?,
            ))
        })
        .await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0.as_int(), Some(1));
    assert_eq!(rows[0].1.as_text(), Some("Alice"));
    assert_eq!(rows[0].2.as_int(), Some(100));
    assert_eq!(rows[1].0.as_int(), Some(2));
    assert_eq!(rows[1].1.as_text(), Some("Bob"));
    assert_eq!(rows[1].2.as_int(), Some(200));
    Ok(())
}

#[tokio::test]
async fn bindings_after_last_boundary_stay_queued() -> Result<(), Box<dyn std::error::Error>> {
    let db = players_db("batch_trailing").await?;
    let players = db.table("players");

    let mut insert = players.insert_into(&["id", "name", "coins"]);
    insert.bind_i64(1).bind_text("Alice").bind_i64(100).add_batch();
    // Row without a closing add_batch: queued but not executed.
    insert.bind_i64(2).bind_text("Bob").bind_i64(200);

    let counts = insert.execute_batch().await?;
    assert_eq!(counts, vec![1]);

    let count = players
        .select_columns(&["COUNT(*) AS n"], "")
        .fetch_row(|row| row.value_named("n"))
        .await?
        .unwrap();
    assert_eq!(count.as_int(), Some(1));
    Ok(())
}

#[tokio::test]
async fn empty_batch_executes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let db = players_db("batch_empty").await?;
    let counts = db
        .table("players")
        .insert_into(&["id", "name", "coins"])
        .execute_batch()
        .await?;
    assert!(counts.is_empty());
    Ok(())
}

#[tokio::test]
async fn large_batch_returns_wide_counts() -> Result<(), Box<dyn std::error::Error>> {
    let db = players_db("batch_large").await?;
    let players = db.table("players");

    let mut insert = players.insert_positional(3);
    for id in 1..=5_i64 {
        insert
            .bind_i64(id)
            .bind_text(format!("p{id}"))
            .bind_i64(id * 10)
            .add_batch();
    }
    let counts = insert.execute_large_batch().await?;
    assert_eq!(counts, vec![1_u64; 5]);
    Ok(())
}

#[tokio::test]
async fn batch_row_failure_fails_whole_call() -> Result<(), Box<dyn std::error::Error>> {
    let db = players_db("batch_failure").await?;
    let players = db.table("players");

    let mut insert = players.insert_into(&["id", "name", "coins"]);
    insert.bind_i64(1).bind_text("Alice").bind_i64(100).add_batch();
    // Duplicate primary key: the driver rejects this row.
    insert.bind_i64(1).bind_text("Dupe").bind_i64(0).add_batch();

    let err = insert.execute_batch().await.unwrap_err();
    assert!(matches!(err, SqlFluentError::Execute(_)));
    Ok(())
}
