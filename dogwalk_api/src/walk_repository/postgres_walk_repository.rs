use std::time::Duration;

use anyhow::Context;
use bb8::Pool;
use bb8_postgres::PostgresConnectionManager;
use chrono::{DateTime, Utc};
use tokio_postgres::error::SqlState;
use tokio_postgres::{Client, NoTls, Row, Statement};
use uuid::Uuid;

use crate::api::{FeedbackId, Path, PathId, UserId};
use crate::walk_repository::{NewFeedback, NewPath, WalkRepository, WalkRepositoryError};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    );

    CREATE TABLE IF NOT EXISTS paths (
        id              UUID PRIMARY KEY,
        user_id         UUID NOT NULL REFERENCES users (id),
        minutes         INTEGER NOT NULL,
        distance_m      INTEGER NOT NULL,
        duration_sec    INTEGER NOT NULL,
        meta            JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at      TIMESTAMPTZ NOT NULL DEFAULT now()
    );

    CREATE TABLE IF NOT EXISTS feedback (
        id              UUID PRIMARY KEY DEFAULT gen_random_uuid(),
        user_id         UUID NOT NULL REFERENCES users (id),
        path_id         UUID NOT NULL REFERENCES paths (id),
        value           SMALLINT NOT NULL CHECK (value IN (1, -1)),
        created_at      TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp()
    );

    CREATE INDEX IF NOT EXISTS feedback_user_likes_idx
        ON feedback (user_id, created_at DESC) WHERE value = 1;
";

pub struct PostgresWalkRepositoryConfig {
    pub hostname: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub dbname: String,
    pub pool_max_size: u32,
}

pub struct PostgresWalkRepository {
    pool: Pool<PostgresConnectionManager<NoTls>>,
}

impl PostgresWalkRepository {
    pub async fn init(config: PostgresWalkRepositoryConfig) -> anyhow::Result<Self> {
        tracing::info!(
            "Postgres connection: postgresql://{}@{}:{}/{}",
            config.username,
            config.hostname,
            config.port,
            config.dbname
        );
        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .host(&config.hostname)
            .port(config.port)
            .user(&config.username)
            .password(&config.password)
            .dbname(&config.dbname);

        let pool = Pool::builder()
            .max_size(config.pool_max_size)
            .connection_timeout(Duration::from_secs(5))
            .build(PostgresConnectionManager::new(pg_config, NoTls))
            .await
            .context("Failed to start postgres")?;

        pool.get()
            .await
            .context("Failed to get connection for setup")?
            .batch_execute(SCHEMA)
            .await
            .context("Failed to setup tables")?;

        Ok(Self { pool })
    }
}

fn is_foreign_key_violation(err: &tokio_postgres::Error, constraint: &str) -> bool {
    err.as_db_error()
        .map(|db_err| {
            db_err.code() == &SqlState::FOREIGN_KEY_VIOLATION
                && db_err.constraint() == Some(constraint)
        })
        .unwrap_or_default()
}

const USER_EXISTS: &str = "SELECT 1 FROM users WHERE id = $1";
const PATH_EXISTS: &str = "SELECT 1 FROM paths WHERE id = $1";

async fn row_exists(
    client: &Client,
    query: &str,
    id: &Uuid,
) -> Result<bool, WalkRepositoryError> {
    let stmt: Statement = client.prepare(query).await?;
    let rows = client.query(&stmt, &[id]).await?;
    Ok(!rows.is_empty())
}

fn path_from_row(row: &Row) -> Result<Path, WalkRepositoryError> {
    let id: Uuid = row.try_get("id")?;
    let user_id: Uuid = row.try_get("user_id")?;
    let meta: serde_json::Value = row.try_get("meta")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;

    Ok(Path {
        id: id.into(),
        user_id: user_id.into(),
        minutes: row.try_get("minutes")?,
        distance_m: row.try_get("distance_m")?,
        duration_sec: row.try_get("duration_sec")?,
        meta: serde_json::from_value(meta)?,
        created_at,
    })
}

#[async_trait::async_trait]
impl WalkRepository for PostgresWalkRepository {
    async fn add_user(&self) -> Result<UserId, WalkRepositoryError> {
        let client = self.pool.get().await?;
        let stmt: Statement = client
            .prepare("INSERT INTO users DEFAULT VALUES RETURNING id")
            .await?;

        let rows = client.query(&stmt, &[]).await?;

        let user_id: Uuid = rows
            .first()
            .ok_or_else(|| WalkRepositoryError::Other("Id not returned".to_string()))?
            .try_get(0)?;

        Ok(user_id.into())
    }

    async fn user_exists(&self, user_id: UserId) -> Result<bool, WalkRepositoryError> {
        let client = self.pool.get().await?;
        row_exists(&client, USER_EXISTS, &user_id.0).await
    }

    async fn add_path(&self, path: NewPath) -> Result<PathId, WalkRepositoryError> {
        let client = self.pool.get().await?;
        if !row_exists(&client, USER_EXISTS, &path.user_id.0).await? {
            return Err(WalkRepositoryError::UserNotFound(path.user_id));
        }

        let stmt: Statement = client
            .prepare(
                "INSERT INTO paths (id, user_id, minutes, distance_m, duration_sec, meta)
                 VALUES ($1, $2, $3, $4, $5, $6)",
            )
            .await?;

        let path_id = PathId::new_random();
        let meta = serde_json::Value::Object(path.meta.0);
        let inserted = client
            .execute(
                &stmt,
                &[
                    &path_id.0,
                    &path.user_id.0,
                    &path.minutes,
                    &path.distance_m,
                    &path.duration_sec,
                    &meta,
                ],
            )
            .await;

        match inserted {
            Ok(_) => Ok(path_id),
            Err(err) if is_foreign_key_violation(&err, "paths_user_id_fkey") => {
                Err(WalkRepositoryError::UserNotFound(path.user_id))
            }
            Err(other_err) => Err(other_err.into()),
        }
    }

    async fn path_exists(&self, path_id: PathId) -> Result<bool, WalkRepositoryError> {
        let client = self.pool.get().await?;
        row_exists(&client, PATH_EXISTS, &path_id.0).await
    }

    /// Existence checks and the insert share one pooled connection,
    /// foreign keys still catch a row deleted in between
    async fn add_feedback(&self, feedback: NewFeedback) -> Result<FeedbackId, WalkRepositoryError> {
        let client = self.pool.get().await?;
        if !row_exists(&client, USER_EXISTS, &feedback.user_id.0).await? {
            return Err(WalkRepositoryError::UserNotFound(feedback.user_id));
        }
        if !row_exists(&client, PATH_EXISTS, &feedback.path_id.0).await? {
            return Err(WalkRepositoryError::PathNotFound(feedback.path_id));
        }

        let stmt: Statement = client
            .prepare(
                "INSERT INTO feedback (user_id, path_id, value) VALUES ($1, $2, $3) RETURNING id",
            )
            .await?;

        let rows = client
            .query(
                &stmt,
                &[
                    &feedback.user_id.0,
                    &feedback.path_id.0,
                    &feedback.value.as_i16(),
                ],
            )
            .await;

        match rows {
            Ok(rows) => {
                let feedback_id: Uuid = rows
                    .first()
                    .ok_or_else(|| WalkRepositoryError::Other("Id not returned".to_string()))?
                    .try_get(0)?;
                Ok(feedback_id.into())
            }
            Err(err) if is_foreign_key_violation(&err, "feedback_user_id_fkey") => {
                Err(WalkRepositoryError::UserNotFound(feedback.user_id))
            }
            Err(err) if is_foreign_key_violation(&err, "feedback_path_id_fkey") => {
                Err(WalkRepositoryError::PathNotFound(feedback.path_id))
            }
            Err(other_err) => Err(other_err.into()),
        }
    }

    async fn get_liked_paths(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Path>, WalkRepositoryError> {
        let limit = i64::try_from(limit)
            .map_err(|_| WalkRepositoryError::Other(format!("Limit {limit} too large")))?;

        let client = self.pool.get().await?;
        let stmt: Statement = client
            .prepare(
                "SELECT p.id, p.user_id, p.minutes, p.distance_m, p.duration_sec, p.meta, p.created_at
                 FROM feedback f
                 JOIN paths p ON p.id = f.path_id
                 WHERE f.user_id = $1 AND f.value = 1
                 ORDER BY f.created_at DESC
                 LIMIT $2",
            )
            .await?;

        let rows = client.query(&stmt, &[&user_id.0, &limit]).await?;
        rows.iter().map(path_from_row).collect()
    }
}
