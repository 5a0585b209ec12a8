use sqlx::SqlitePool;

use session::model::{AuthSession, Role, UserProfile};
use session::store::SessionStore;
use session::store::sqlite_store::SqliteSessionStore;

fn sample_session() -> AuthSession {
    AuthSession {
        token: "tok-1".into(),
        user: UserProfile {
            id: 7,
            name: "Ada".into(),
            email: "ada@school.edu".into(),
            role: Role::Student,
            created_at: chrono::NaiveDate::from_ymd_opt(2024, 9, 1)
                .unwrap()
                .and_hms_opt(8, 30, 0),
        },
    }
}

async fn store_with_schema(pool: SqlitePool) -> anyhow::Result<SqliteSessionStore> {
    let store = SqliteSessionStore::from_pool(pool);
    store.ensure_schema().await?;
    Ok(store)
}

#[sqlx::test]
async fn save_and_load_round_trip(pool: SqlitePool) -> anyhow::Result<()> {
    let store = store_with_schema(pool).await?;

    let session = sample_session();
    store.save(&session).await?;

    let loaded = store.load().await?;
    assert_eq!(loaded, Some(session));

    Ok(())
}

#[sqlx::test]
async fn save_overwrites_the_single_slot(pool: SqlitePool) -> anyhow::Result<()> {
    let store = store_with_schema(pool.clone()).await?;

    let mut session = sample_session();
    store.save(&session).await?;

    session.token = "tok-2".into();
    session.user.name = "Ada L.".into();
    store.save(&session).await?;

    let loaded = store.load().await?.unwrap();
    assert_eq!(loaded.token, "tok-2");
    assert_eq!(loaded.user.name, "Ada L.");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM auth_session")
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 1);

    Ok(())
}

#[sqlx::test]
async fn clear_removes_the_row(pool: SqlitePool) -> anyhow::Result<()> {
    let store = store_with_schema(pool).await?;

    store.save(&sample_session()).await?;
    store.clear().await?;

    assert_eq!(store.load().await?, None);

    Ok(())
}

#[sqlx::test]
async fn clear_on_empty_store_is_fine(pool: SqlitePool) -> anyhow::Result<()> {
    let store = store_with_schema(pool).await?;

    store.clear().await?;
    assert_eq!(store.load().await?, None);

    Ok(())
}

#[sqlx::test]
async fn malformed_entry_is_dropped_not_fatal(pool: SqlitePool) -> anyhow::Result<()> {
    let store = store_with_schema(pool.clone()).await?;

    // A torn write from an older layout: token present, profile missing.
    sqlx::query("INSERT INTO auth_session (slot, session_json) VALUES (0, ?)")
        .bind(r#"{"token": "tok-1"}"#)
        .execute(&pool)
        .await?;

    assert_eq!(store.load().await?, None);

    // The corrupted entry is gone, not just ignored.
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM auth_session")
        .fetch_one(&pool)
        .await?;
    assert_eq!(count, 0);

    Ok(())
}

#[sqlx::test]
async fn non_json_entry_is_dropped_not_fatal(pool: SqlitePool) -> anyhow::Result<()> {
    let store = store_with_schema(pool.clone()).await?;

    sqlx::query("INSERT INTO auth_session (slot, session_json) VALUES (0, ?)")
        .bind("definitely not json")
        .execute(&pool)
        .await?;

    assert_eq!(store.load().await?, None);
    assert_eq!(store.load().await?, None); // stays absent on re-read

    Ok(())
}
