use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::database::ports::users::UsersRepository;
use crate::domain::{User, UserProfile};
use crate::error::Result;

/// PostgreSQL-backed implementation of the `UsersRepository` port.
#[derive(Clone, Debug)]
pub struct PostgresUsersRepository {
    pool: PgPool,
}

impl PostgresUsersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UsersRepository for PostgresUsersRepository {
    async fn upsert_user(&self, profile: &UserProfile, oauth_identifier: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (user_id, email, name, oauth_identifier)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET email = EXCLUDED.email, name = EXCLUDED.name
            "#,
        )
        .bind(&profile.subject)
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(oauth_identifier)
        .execute(self.pool())
        .await?;

        info!(user_id = %profile.subject, provider = oauth_identifier, "upserted user");
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT user_id, email, name, oauth_identifier
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(user)
    }
}
