use crate::domain::{User, UserId};
use crate::ports::UniqueViolation;
use crate::ports::user_repository::{Result, UserRepository as UserRepositoryTrait};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

fn map_row_to_user(row: &PgRow) -> Result<User> {
    Ok(User {
        user_id: UserId::from_uuid(row.try_get("user_id")?),
        name: row.try_get("name")?,
        email: row.try_get("email")?,
    })
}

/// users.email の一意インデックス違反（23505）を `UniqueViolation` に変換する
fn map_write_error(error: sqlx::Error) -> Box<dyn std::error::Error + Send + Sync> {
    match error {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            Box::new(UniqueViolation(db.message().to_string()))
        }
        other => Box::new(other),
    }
}

/// UserRepositoryのPostgreSQL実装
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn insert(&self, user: User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, name, email)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(user.user_id.value())
        .bind(&user.name)
        .bind(&user.email)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn update(&self, user: User) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3
            WHERE user_id = $1
            "#,
        )
        .bind(user.user_id.value())
        .bind(&user.name)
        .bind(&user.email)
        .execute(&self.pool)
        .await
        .map_err(map_write_error)?;

        Ok(())
    }

    async fn get_by_id(&self, user_id: UserId) -> Result<Option<User>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, name, email
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_user).transpose()
    }

    async fn exists(&self, user_id: UserId) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE user_id = $1)")
                .bind(user_id.value())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn email_taken(&self, email: &str, except: Option<UserId>) -> Result<bool> {
        let taken: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE email = $1 AND ($2::uuid IS NULL OR user_id <> $2)
            )
            "#,
        )
        .bind(email)
        .bind(except.map(|id| id.value()))
        .fetch_one(&self.pool)
        .await?;

        Ok(taken)
    }

    async fn find_all(&self) -> Result<Vec<User>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, name, email
            FROM users
            ORDER BY user_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_user).collect()
    }

    async fn delete(&self, user_id: UserId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
