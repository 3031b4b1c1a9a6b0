use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Interest {
    pub id: i32,
    pub title: String,
}

pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Interest>> {
    sqlx::query_as::<_, Interest>("SELECT id, title FROM interests ORDER BY id")
        .fetch_all(db)
        .await
}

pub async fn find(db: &PgPool, id: i32) -> sqlx::Result<Option<Interest>> {
    sqlx::query_as::<_, Interest>("SELECT id, title FROM interests WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Insert an interest; `None` when the title is already taken.
pub async fn create(db: &PgPool, title: &str) -> sqlx::Result<Option<Interest>> {
    sqlx::query_as::<_, Interest>(
        r#"
        INSERT INTO interests (title)
        VALUES ($1)
        ON CONFLICT (title) DO NOTHING
        RETURNING id, title
        "#,
    )
    .bind(title)
    .fetch_optional(db)
    .await
}

pub async fn rename(db: &PgPool, id: i32, title: &str) -> sqlx::Result<u64> {
    let result = sqlx::query("UPDATE interests SET title = $2 WHERE id = $1")
        .bind(id)
        .bind(title)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete(db: &PgPool, id: i32) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM interests WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
