mod support;

use std::time::Duration;

use support::MockDriver;
use tokio::sync::oneshot;

fn sharded_db() -> (
    quill::Db,
    std::sync::Arc<support::DriverState>,
    std::sync::Arc<support::DriverState>,
) {
    let default_driver = MockDriver::new();
    let replica_driver = MockDriver::new();
    let default_state = default_driver.state();
    let replica_state = replica_driver.state();

    let db = quill::Db::builder()
        .driver(default_driver)
        .server("replica", replica_driver)
        .max_connections(1)
        .checkout_timeout(Duration::from_millis(200))
        .build()
        .unwrap();

    (db, default_state, replica_state)
}

#[tokio::test]
async fn servers_have_independent_pools() {
    let (db, default_state, replica_state) = sharded_db();

    db.execute_on("default", "SELECT 1", &[]).await.unwrap();
    db.execute_on("replica", "SELECT 2", &[]).await.unwrap();

    assert_eq!(default_state.sql_log(), vec!["SELECT 1"]);
    assert_eq!(replica_state.sql_log(), vec!["SELECT 2"]);

    assert_eq!(db.pool_stats("default").unwrap().total, 1);
    assert_eq!(db.pool_stats("replica").unwrap().total, 1);
}

#[tokio::test]
async fn unknown_server_is_a_build_error() {
    let (db, _, _) = sharded_db();
    let err = db.execute_on("nowhere", "SELECT 1", &[]).await.unwrap_err();
    assert!(err.is_build());
}

#[tokio::test]
async fn one_saturated_shard_does_not_block_another() {
    let (db, _default_state, replica_state) = sharded_db();

    let (entered_tx, entered_rx) = oneshot::channel::<()>();
    let (release_tx, release_rx) = oneshot::channel::<()>();

    // Saturate the default shard (max_connections = 1)
    let holder = {
        let db = db.clone();
        tokio::spawn(async move {
            db.synchronize("default", async |conn| {
                conn.execute("SELECT 'hold'", &[]).await?;
                let _ = entered_tx.send(());
                let _ = release_rx.await;
                Ok(())
            })
            .await
        })
    };
    entered_rx.await.unwrap();

    // The replica shard is unaffected
    db.execute_on("replica", "SELECT 'free'", &[]).await.unwrap();
    assert_eq!(replica_state.sql_log(), vec!["SELECT 'free'"]);

    release_tx.send(()).unwrap();
    holder.await.unwrap().unwrap();
}

#[tokio::test]
async fn nested_synchronize_reuses_the_checked_out_connection() {
    let (db, default_state, _replica_state) = sharded_db();

    // With max_connections = 1, a second checkout would deadlock; the
    // nested call must reuse the outer connection instead.
    let db2 = db.clone();
    db.synchronize("default", async |outer| {
        outer.execute("SELECT 'outer'", &[]).await?;
        db2.synchronize("default", async |inner| {
            inner.execute("SELECT 'inner'", &[]).await
        })
        .await?;
        outer.execute("SELECT 'outer again'", &[]).await
    })
    .await
    .unwrap();

    // All three statements ran on the same physical connection
    assert_eq!(default_state.conn_log(), vec![0, 0, 0]);
    assert_eq!(db.pool_stats("default").unwrap().total, 1);
}

#[tokio::test]
async fn nested_synchronize_on_other_server_checks_out_separately() {
    let (db, default_state, replica_state) = sharded_db();

    let db2 = db.clone();
    db.synchronize("default", async |conn| {
        conn.execute("SELECT 'primary'", &[]).await?;
        db2.synchronize("replica", async |replica| {
            replica.execute("SELECT 'secondary'", &[]).await
        })
        .await
    })
    .await
    .unwrap();

    assert_eq!(default_state.sql_log(), vec!["SELECT 'primary'"]);
    assert_eq!(replica_state.sql_log(), vec!["SELECT 'secondary'"]);
}

#[tokio::test]
async fn datasets_target_servers() {
    let (db, default_state, replica_state) = sharded_db();

    db.table("events").all().await.unwrap();
    db.table("events").server("replica").all().await.unwrap();

    assert_eq!(default_state.sql_log(), vec!["SELECT * FROM events"]);
    assert_eq!(replica_state.sql_log(), vec!["SELECT * FROM events"]);
}

#[tokio::test]
async fn shards_serve_concurrent_tasks_independently() {
    let (db, default_state, replica_state) = sharded_db();

    let mut tasks = Vec::new();
    for i in 0..10 {
        let db = db.clone();
        let server = if i % 2 == 0 { "default" } else { "replica" };
        tasks.push(tokio::spawn(async move {
            db.execute_on(server, &format!("SELECT {i}"), &[]).await
        }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(default_state.sql_log().len(), 5);
    assert_eq!(replica_state.sql_log().len(), 5);
}
