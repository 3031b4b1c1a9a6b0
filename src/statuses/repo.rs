use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Status {
    pub id: i32,
    pub name: String,
}

pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Status>> {
    sqlx::query_as::<_, Status>("SELECT id, name FROM statuses ORDER BY id")
        .fetch_all(db)
        .await
}

pub async fn find(db: &PgPool, id: i32) -> sqlx::Result<Option<Status>> {
    sqlx::query_as::<_, Status>("SELECT id, name FROM statuses WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Insert a status; `None` when the name is already taken.
pub async fn create(db: &PgPool, name: &str) -> sqlx::Result<Option<Status>> {
    sqlx::query_as::<_, Status>(
        r#"
        INSERT INTO statuses (name)
        VALUES ($1)
        ON CONFLICT (name) DO NOTHING
        RETURNING id, name
        "#,
    )
    .bind(name)
    .fetch_optional(db)
    .await
}

pub async fn rename(db: &PgPool, id: i32, name: &str) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE statuses SET name = $2 WHERE id = $1")
        .bind(id)
        .bind(name)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete(db: &PgPool, id: i32) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM statuses WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
