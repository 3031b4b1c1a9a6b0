use std::collections::HashMap;

use sqlx::{FromRow, PgPool, Postgres, Transaction};

use crate::users::dto::{TagDto, UserDto};

/// Full user row, including the password hash. Only the auth layer reads it.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub status_id: Option<i32>,
}

/// User row joined with its status name, as read endpoints need it.
#[derive(Debug, Clone, FromRow)]
pub struct UserListRow {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub looking_for: Vec<String>,
    pub roles: Vec<String>,
}

#[derive(Debug)]
pub struct UserUpdate {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub looking_for: Vec<String>,
    pub roles: Vec<String>,
}

pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, first_name, last_name, bio, status_id
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(db)
    .await
}

pub async fn find_by_id(db: &PgPool, id: i32) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, first_name, last_name, bio, status_id
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

/// Current role names of a user, straight from the database.
pub async fn role_names(db: &PgPool, user_id: i32) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar::<_, String>(
        r#"
        SELECT r.name
        FROM users_roles ur
        JOIN roles r ON r.id = ur.role_id
        WHERE ur.user_id = $1
        ORDER BY r.name
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn list(db: &PgPool) -> sqlx::Result<Vec<UserListRow>> {
    sqlx::query_as::<_, UserListRow>(
        r#"
        SELECT u.id, u.username, u.first_name, u.last_name, u.bio, s.name AS status
        FROM users u
        LEFT JOIN statuses s ON s.id = u.status_id
        ORDER BY u.id
        "#,
    )
    .fetch_all(db)
    .await
}

pub async fn get_with_status(db: &PgPool, id: i32) -> sqlx::Result<Option<UserListRow>> {
    sqlx::query_as::<_, UserListRow>(
        r#"
        SELECT u.id, u.username, u.first_name, u.last_name, u.bio, s.name AS status
        FROM users u
        LEFT JOIN statuses s ON s.id = u.status_id
        WHERE u.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn create(db: &PgPool, new: NewUser) -> sqlx::Result<i32> {
    let mut tx = db.begin().await?;

    let (user_id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO users (username, password_hash, first_name, last_name, bio, status_id)
        VALUES ($1, $2, $3, $4, $5, (SELECT id FROM statuses WHERE name = $6))
        RETURNING id
        "#,
    )
    .bind(&new.username)
    .bind(&new.password_hash)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.bio)
    .bind(&new.status)
    .fetch_one(&mut *tx)
    .await?;

    replace_associations(
        &mut tx,
        user_id,
        &new.skills,
        &new.interests,
        &new.looking_for,
        &new.roles,
    )
    .await?;

    tx.commit().await?;
    Ok(user_id)
}

pub async fn update(db: &PgPool, user_id: i32, up: UserUpdate) -> sqlx::Result<()> {
    let mut tx = db.begin().await?;

    sqlx::query(
        r#"
        UPDATE users
        SET username = $2,
            first_name = $3,
            last_name = $4,
            bio = $5,
            status_id = (SELECT id FROM statuses WHERE name = $6)
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .bind(&up.username)
    .bind(&up.first_name)
    .bind(&up.last_name)
    .bind(&up.bio)
    .bind(&up.status)
    .execute(&mut *tx)
    .await?;

    replace_associations(
        &mut tx,
        user_id,
        &up.skills,
        &up.interests,
        &up.looking_for,
        &up.roles,
    )
    .await?;

    tx.commit().await?;
    Ok(())
}

pub async fn delete(db: &PgPool, user_id: i32) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(result.rows_affected())
}

/// Replace every association set of a user with the submitted titles/names.
/// Natural keys that match no row contribute nothing; an empty list clears
/// the set.
async fn replace_associations(
    tx: &mut Transaction<'_, Postgres>,
    user_id: i32,
    skills: &[String],
    interests: &[String],
    looking_for: &[String],
    roles: &[String],
) -> sqlx::Result<()> {
    for table in ["users_skills", "users_interests", "users_looking_for", "users_roles"] {
        sqlx::query(&format!("DELETE FROM {table} WHERE user_id = $1"))
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO users_skills (user_id, skill_id)
        SELECT $1, id FROM skills WHERE title = ANY($2)
        "#,
    )
    .bind(user_id)
    .bind(skills.to_vec())
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO users_interests (user_id, interest_id)
        SELECT $1, id FROM interests WHERE title = ANY($2)
        "#,
    )
    .bind(user_id)
    .bind(interests.to_vec())
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO users_looking_for (user_id, skill_id)
        SELECT $1, id FROM skills WHERE title = ANY($2)
        "#,
    )
    .bind(user_id)
    .bind(looking_for.to_vec())
    .execute(&mut **tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO users_roles (user_id, role_id)
        SELECT $1, id FROM roles WHERE name = ANY($2)
        "#,
    )
    .bind(user_id)
    .bind(roles.to_vec())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

const USER_SKILLS_SQL: &str = r#"
    SELECT us.user_id, sk.id, sk.title
    FROM users_skills us
    JOIN skills sk ON sk.id = us.skill_id
    WHERE us.user_id = ANY($1)
    ORDER BY sk.id
"#;

const USER_INTERESTS_SQL: &str = r#"
    SELECT ui.user_id, i.id, i.title
    FROM users_interests ui
    JOIN interests i ON i.id = ui.interest_id
    WHERE ui.user_id = ANY($1)
    ORDER BY i.id
"#;

const USER_LOOKING_FOR_SQL: &str = r#"
    SELECT ul.user_id, sk.id, sk.title
    FROM users_looking_for ul
    JOIN skills sk ON sk.id = ul.skill_id
    WHERE ul.user_id = ANY($1)
    ORDER BY sk.id
"#;

/// Batch-load the association sets for a page of users and assemble DTOs.
pub async fn load_dtos(db: &PgPool, rows: Vec<UserListRow>) -> sqlx::Result<Vec<UserDto>> {
    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();

    let mut skills = group_tags(tag_rows(db, &ids, USER_SKILLS_SQL).await?);
    let mut interests = group_tags(tag_rows(db, &ids, USER_INTERESTS_SQL).await?);
    let mut looking_for = group_tags(tag_rows(db, &ids, USER_LOOKING_FOR_SQL).await?);

    Ok(rows
        .into_iter()
        .map(|r| UserDto {
            skills: skills.remove(&r.id).unwrap_or_default(),
            interests: interests.remove(&r.id).unwrap_or_default(),
            looking_for: looking_for.remove(&r.id).unwrap_or_default(),
            id: r.id,
            username: r.username,
            first_name: r.first_name,
            last_name: r.last_name,
            bio: r.bio,
            status: r.status,
        })
        .collect())
}

async fn tag_rows(db: &PgPool, user_ids: &[i32], sql: &str) -> sqlx::Result<Vec<(i32, i32, String)>> {
    sqlx::query_as(sql).bind(user_ids.to_vec()).fetch_all(db).await
}

fn group_tags(rows: Vec<(i32, i32, String)>) -> HashMap<i32, Vec<TagDto>> {
    let mut grouped: HashMap<i32, Vec<TagDto>> = HashMap::new();
    for (user_id, id, title) in rows {
        grouped
            .entry(user_id)
            .or_default()
            .push(TagDto { id, title });
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_tags_collects_per_user() {
        let grouped = group_tags(vec![
            (1, 10, "Rust".into()),
            (1, 11, "SQL".into()),
            (2, 10, "Rust".into()),
        ]);
        assert_eq!(grouped[&1].len(), 2);
        assert_eq!(grouped[&2].len(), 1);
        assert_eq!(grouped[&2][0].title, "Rust");
    }

    #[test]
    fn group_tags_is_empty_for_unknown_user() {
        let grouped = group_tags(vec![]);
        assert!(grouped.get(&1).is_none());
    }
}
