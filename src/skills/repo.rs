use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Skill {
    pub id: i32,
    pub title: String,
}

pub async fn list(db: &PgPool) -> sqlx::Result<Vec<Skill>> {
    sqlx::query_as::<_, Skill>("SELECT id, title FROM skills ORDER BY id")
        .fetch_all(db)
        .await
}

pub async fn find(db: &PgPool, id: i32) -> sqlx::Result<Option<Skill>> {
    sqlx::query_as::<_, Skill>("SELECT id, title FROM skills WHERE id = $1")
        .bind(id)
        .fetch_optional(db)
        .await
}

/// Insert a skill; `None` when the title is already taken.
pub async fn create(db: &PgPool, title: &str) -> sqlx::Result<Option<Skill>> {
    sqlx::query_as::<_, Skill>(
        r#"
        INSERT INTO skills (title)
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
    let result = sqlx::query("UPDATE skills SET title = $2 WHERE id = $1")
        .bind(id)
        .bind(title)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

pub async fn delete(db: &PgPool, id: i32) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM skills WHERE id = $1")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}
