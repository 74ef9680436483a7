use sql_fluent::prelude::*;
use tempfile::tempdir;

fn unique_db_path(prefix: &str) -> String {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join(format!("{prefix}.db"));
    // Leak the tempdir so the file persists for the duration of the test binary.
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
async fn insert_and_fetch_single_row() -> Result<(), Box<dyn std::error::Error>> {
    let db = players_db("single_row").await?;
    let players = db.table("players");

    let mut insert = players.insert_into(&["id", "name", "coins"]);
    insert.bind_i64(1).bind_text("Alice").bind_i64(100);
    assert_eq!(insert.execute_update().await?, 1);

    let mut select = players.select("WHERE id = ?");
    select.bind_i64(1);
    let row = select
        .fetch_row(|row| Ok((row.value_named("name")?, row.value_named("coins")?)))
        .await?;
    let (name, coins) = row.expect("row should exist");
    assert_eq!(name.as_text(), Some("Alice"));
    assert_eq!(coins.as_int(), Some(100));
    Ok(())
}

#[tokio::test]
async fn fetch_row_on_empty_result_invokes_callback_zero_times()
-> Result<(), Box<dyn std::error::Error>> {
    let db = players_db("fetch_empty").await?;
    let row = db
        .table("players")
        .select_all()
        .fetch_row(|_row| -> Result<(), SqlFluentError> {
            panic!("callback must not run on an empty result")
        })
        .await?;
    assert!(row.is_none());
    Ok(())
}

#[tokio::test]
async fn fetch_all_rows_visits_each_row_in_cursor_order()
-> Result<(), Box<dyn std::error::Error>> {
    let db = players_db("all_rows").await?;
    let players = db.table("players");
    for (id, name) in [(3_i64, "Carol"), (1, "Alice"), (2, "Bob")] {
        players
            .insert_into(&["id", "name", "coins"])
            .bind_i64(id)
            .bind_text(name)
            .bind_i64(0)
            .execute_update()
            .await?;
    }

    let names = players
        .select("ORDER BY id")
        .fetch_all_rows(|row| row.value_named("name"))
        .await?;
    let names: Vec<_> = names.iter().filter_map(SqlValue::as_text).collect();
    assert_eq!(names, vec!["Alice", "Bob", "Carol"]);
    Ok(())
}

#[tokio::test]
async fn fetch_all_rows_on_empty_table_yields_nothing() -> Result<(), Box<dyn std::error::Error>>
{
    let db = players_db("all_rows_empty").await?;
    let rows = db
        .table("players")
        .select_all()
        .fetch_all_rows(|_row| -> Result<(), SqlFluentError> {
            panic!("callback must not run on an empty result")
        })
        .await?;
    assert!(rows.is_empty());
    Ok(())
}

#[tokio::test]
async fn execute_query_hands_cursor_to_caller_once() -> Result<(), Box<dyn std::error::Error>> {
    let db = players_db("manual_cursor").await?;
    let players = db.table("players");
    for id in 1..=3_i64 {
        players
            .insert_into(&["id", "name", "coins"])
            .bind_i64(id)
            .bind_text(format!("p{id}"))
            .bind_i64(id * 10)
            .execute_update()
            .await?;
    }

    // The caller drives advancement and may stop early.
    let first_two = players
        .select("ORDER BY id")
        .execute_query(|cursor| {
            let mut ids = Vec::new();
            while let Some(row) = cursor.advance()? {
                ids.push(row.value_named("id")?.as_int().unwrap());
                if ids.len() == 2 {
                    break;
                }
            }
            Ok(ids)
        })
        .await?;
    assert_eq!(first_two, vec![1, 2]);
    Ok(())
}

#[tokio::test]
async fn execute_reports_result_set_presence() -> Result<(), Box<dyn std::error::Error>> {
    let db = players_db("execute_bool").await?;
    assert!(db.execute("SELECT 1").await?);
    assert!(!db.execute("DELETE FROM players").await?);
    Ok(())
}

#[tokio::test]
async fn terminal_call_replays_bindings_until_cleared() -> Result<(), Box<dyn std::error::Error>>
{
    let db = players_db("replay").await?;
    let players = db.table("players");

    let mut insert = players.insert("(id, name, coins) VALUES (?, ?, ?)");
    insert.bind_i64(1).bind_text("Alice").bind_i64(100);
    assert_eq!(insert.execute_update().await?, 1);

    // Re-running without clearing replays the identical bindings.
    let second = insert.execute_update().await;
    assert!(second.is_err(), "duplicate primary key should fail");

    insert.clear_bindings();
    assert_eq!(insert.next_parameter_index(), 1);
    insert.bind_i64(2).bind_text("Bob").bind_i64(200);
    assert_eq!(insert.execute_update().await?, 1);

    let count = players
        .select_columns(&["COUNT(*) AS n"], "")
        .fetch_row(|row| row.value_named("n"))
        .await?
        .unwrap();
    assert_eq!(count.as_int(), Some(2));
    Ok(())
}

#[tokio::test]
async fn replace_rewrites_sql_before_execution() -> Result<(), Box<dyn std::error::Error>> {
    let db = players_db("replace").await?;
    let mut stmt = db.statement("INSERT INTO {table} (id, name, coins) VALUES (?, ?, ?)");
    stmt.replace(r"\{table\}", "players")?;
    stmt.bind_i64(1).bind_text("Alice").bind_null();
    assert_eq!(stmt.execute_update().await?, 1);

    let coins = db
        .table("players")
        .select_columns(&["coins"], "WHERE id = 1")
        .fetch_row(|row| row.value_named("coins"))
        .await?
        .unwrap();
    assert!(coins.is_null());
    Ok(())
}

#[tokio::test]
async fn update_and_delete_through_table_builders() -> Result<(), Box<dyn std::error::Error>> {
    let db = players_db("update_delete").await?;
    let players = db.table("players");
    for (id, coins) in [(1_i64, 10_i64), (2, 20), (3, 30)] {
        players
            .insert_into(&["id", "name", "coins"])
            .bind_i64(id)
            .bind_text(format!("p{id}"))
            .bind_i64(coins)
            .execute_update()
            .await?;
    }

    let updated = players
        .update_where(&["coins = ?"], "WHERE id = ?")
        .bind_i64(99)
        .bind_i64(2)
        .execute_update()
        .await?;
    assert_eq!(updated, 1);

    let deleted = players
        .delete("WHERE coins < ?")
        .bind_i64(25)
        .execute_update()
        .await?;
    assert_eq!(deleted, 1);

    let remaining = players
        .select_columns(&["id"], "ORDER BY id")
        .fetch_all_rows(|row| row.value(0))
        .await?;
    let ids: Vec<_> = remaining.iter().filter_map(|v| v.as_int()).collect();
    assert_eq!(ids, vec![2, 3]);
    Ok(())
}
