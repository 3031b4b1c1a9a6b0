use anyhow::Context;
use sqlx::PgPool;
use tracing::info;

use crate::auth::password::hash_password;
use crate::auth::{ROLE_ADMIN, ROLE_DEFAULT};

const STATUSES: [&str; 3] = ["Хочу сотрудничать", "Ищу людей в проект", "Ищу общение"];

const BOOTSTRAP_USERNAME: &str = "ahmed";
const BOOTSTRAP_PASSWORD: &str = "ahmed";
const BOOTSTRAP_STATUS: &str = "Ищу людей в проект";

/// Ensure reference data and the bootstrap admin exist. Safe to run on every
/// startup; existing rows are left untouched.
pub async fn run(db: &PgPool) -> anyhow::Result<()> {
    for name in [ROLE_ADMIN, ROLE_DEFAULT] {
        sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(db)
            .await?;
    }

    for name in STATUSES {
        sqlx::query("INSERT INTO statuses (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(db)
            .await?;
    }

    seed_bootstrap_user(db).await?;

    info!("seed data ensured");
    Ok(())
}

async fn seed_bootstrap_user(db: &PgPool) -> anyhow::Result<()> {
    let existing: Option<(i32,)> = sqlx::query_as("SELECT id FROM users WHERE username = $1")
        .bind(BOOTSTRAP_USERNAME)
        .fetch_optional(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let hash = hash_password(BOOTSTRAP_PASSWORD).context("hash bootstrap password")?;

    let mut tx = db.begin().await?;

    let (user_id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO users (username, password_hash, first_name, last_name, bio, status_id)
        VALUES ($1, $2, $1, $1, $1, (SELECT id FROM statuses WHERE name = $3))
        RETURNING id
        "#,
    )
    .bind(BOOTSTRAP_USERNAME)
    .bind(&hash)
    .bind(BOOTSTRAP_STATUS)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO users_roles (user_id, role_id)
        SELECT $1, id FROM roles WHERE name = ANY($2)
        "#,
    )
    .bind(user_id)
    .bind(vec![ROLE_ADMIN.to_string(), ROLE_DEFAULT.to_string()])
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    info!(username = BOOTSTRAP_USERNAME, "bootstrap user created");
    Ok(())
}
