use std::collections::HashMap;

use sqlx::{FromRow, PgPool, Postgres, Transaction};
use time::PrimitiveDateTime;

#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub date: PrimitiveDateTime,
}

#[derive(Debug)]
pub struct EventChange {
    pub title: String,
    pub description: String,
    pub date: PrimitiveDateTime,
    pub members: Vec<i32>,
    pub tags: Vec<String>,
}

/// Events within the optional inclusive bounds, ascending by date.
pub async fn list(
    db: &PgPool,
    start: Option<PrimitiveDateTime>,
    end: Option<PrimitiveDateTime>,
) -> sqlx::Result<Vec<EventRow>> {
    sqlx::query_as::<_, EventRow>(
        r#"
        SELECT id, title, description, date
        FROM events
        WHERE ($1::timestamp IS NULL OR date >= $1)
          AND ($2::timestamp IS NULL OR date <= $2)
        ORDER BY date
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
}

pub async fn find(db: &PgPool, id: i32) -> sqlx::Result<Option<EventRow>> {
    sqlx::query_as::<_, EventRow>(
        r#"
        SELECT id, title, description, date
        FROM events
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn create(db: &PgPool, change: EventChange) -> sqlx::Result<i32> {
    let mut tx = db.begin().await?;

    let (event_id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO events (title, description, date)
        VALUES ($1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(&change.title)
    .bind(&change.description)
    .bind(change.date)
    .fetch_one(&mut *tx)
    .await?;

    replace_associations(&mut tx, event_id, &change.members, &change.tags).await?;

    tx.commit().await?;
    Ok(event_id)
}

pub async fn update(db: &PgPool, event_id: i32, change: EventChange) -> sqlx::Result<()> {
    let mut tx = db.begin().await?;

    sqlx::query(
        r#"
        UPDATE events
        SET title = $2, description = $3, date = $4
        WHERE id = $1
        "#,
    )
    .bind(event_id)
    .bind(&change.title)
    .bind(&change.description)
    .bind(change.date)
    .execute(&mut *tx)
    .await?;

    replace_associations(&mut tx, event_id, &change.members, &change.tags).await?;

    tx.commit().await?;
    Ok(())
}

pub async fn delete(db: &PgPool, event_id: i32) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(event_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Replace the member and tag sets. Member ids that match no user and tag
/// titles that match no interest are dropped; empty lists clear the sets.
async fn replace_associations(
    tx: &mut Transaction<'_, Postgres>,
    event_id: i32,
    members: &[i32],
    tags: &[String],
) -> sqlx::Result<()> {
    sqlx::query("DELETE FROM events_members WHERE event_id = $1")
        .bind(event_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM events_tags WHERE event_id = $1")
        .bind(event_id)
        .execute(&mut **tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO events_members (event_id, user_id)
        SELECT $1, id FROM users WHERE id = ANY($2)
        "#,
    )
    .bind(event_id)
    .bind(members.to_vec())
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO events_tags (event_id, tag_id)
        SELECT $1, id FROM interests WHERE title = ANY($2)
        "#,
    )
    .bind(event_id)
    .bind(tags.to_vec())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

pub async fn members_for_events(
    db: &PgPool,
    event_ids: &[i32],
) -> sqlx::Result<HashMap<i32, Vec<i32>>> {
    let rows: Vec<(i32, i32)> = sqlx::query_as(
        r#"
        SELECT event_id, user_id
        FROM events_members
        WHERE event_id = ANY($1)
        ORDER BY user_id
        "#,
    )
    .bind(event_ids.to_vec())
    .fetch_all(db)
    .await?;

    let mut grouped: HashMap<i32, Vec<i32>> = HashMap::new();
    for (event_id, user_id) in rows {
        grouped.entry(event_id).or_default().push(user_id);
    }
    Ok(grouped)
}

pub async fn tags_for_events(
    db: &PgPool,
    event_ids: &[i32],
) -> sqlx::Result<HashMap<i32, Vec<String>>> {
    let rows: Vec<(i32, String)> = sqlx::query_as(
        r#"
        SELECT et.event_id, i.title
        FROM events_tags et
        JOIN interests i ON i.id = et.tag_id
        WHERE et.event_id = ANY($1)
        ORDER BY i.id
        "#,
    )
    .bind(event_ids.to_vec())
    .fetch_all(db)
    .await?;

    let mut grouped: HashMap<i32, Vec<String>> = HashMap::new();
    for (event_id, title) in rows {
        grouped.entry(event_id).or_default().push(title);
    }
    Ok(grouped)
}
