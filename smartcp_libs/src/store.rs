use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{migrate::Migrator, postgres::Postgres, FromRow, Pool};

type Result<T> = std::result::Result<T, sqlx::Error>;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_name: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,    // written by the session layer only
    pub handle: Option<String>,           // Codeforces handle
    pub notify_by_email: bool,            // e-mail notification opt-in
    #[serde(rename = "lastCheckedSubmissionID")]
    pub last_checked_submission_id: i64,  // progress watermark
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub handle: String,
    pub notify_by_email: bool,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn ping(&self) -> Result<()>;
    async fn find_user(&self, user_name: &str) -> Result<Option<User>>;
    /// Inserts the user or updates handle and notification flag of an existing one.
    async fn save_user(&self, user: &NewUser) -> Result<()>;
    /// Moves the watermark of `user_name`. Returns false when no such user exists.
    async fn update_last_checked(&self, user_name: &str, submission_id: i64) -> Result<bool>;
}

pub struct PgUserStore {
    pool: Pool<Postgres>,
}

impl PgUserStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_user(&self, user_name: &str) -> Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT
                "user_name",
                "password_hash",
                "handle",
                "notify_by_email",
                "last_checked_submission_id",
                "created_at",
                "updated_at"
            FROM
                "users"
            WHERE
                "user_name" = $1
            "#,
        )
        .bind(user_name)
        .fetch_optional(&self.pool)
        .await
    }

    async fn save_user(&self, user: &NewUser) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            MERGE INTO "users"
            USING
                (VALUES($1, $2, $3)) AS "user"("user_name", "handle", "notify_by_email")
            ON
                "users"."user_name" = "user"."user_name"
            WHEN MATCHED THEN
                UPDATE SET (
                    "handle",
                    "notify_by_email",
                    "updated_at"
                ) = (
                    "user"."handle",
                    "user"."notify_by_email",
                    NOW()
                )
            WHEN NOT MATCHED THEN
                INSERT (
                    "user_name",
                    "handle",
                    "notify_by_email"
                )
                VALUES (
                    "user"."user_name",
                    "user"."handle",
                    "user"."notify_by_email"
                );
            "#,
        )
        .bind(&user.user_name)
        .bind(&user.handle)
        .bind(user.notify_by_email)
        .execute(&mut tx)
        .await;

        // roll back and return the error as is
        if let Err(e) = result {
            tracing::error!("an error occurred at saving {:?}: {:?}", user, e);
            tx.rollback().await?;
            return Err(e);
        }

        tx.commit().await?;
        tracing::info!("User {} successfully saved.", user.user_name);

        Ok(())
    }

    async fn update_last_checked(&self, user_name: &str, submission_id: i64) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE "users"
            SET
                "last_checked_submission_id" = $1,
                "updated_at" = NOW()
            WHERE
                "user_name" = $2
            "#,
        )
        .bind(submission_id)
        .bind(user_name)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
