use async_trait::async_trait;

use super::{NewUser, User, UserError, UserStore};
use crate::Result;
use crate::db::{Database, SqlxResultExt, is_unique_violation};

/// Users stored in the `users` table.
#[derive(Debug, Clone)]
pub struct SqlUserStore {
    db: Database,
}

impl SqlUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for SqlUserStore {
    async fn get_by_username(&self, username: &str) -> Result<User> {
        let row: Option<(i64, String, String, String)> = sqlx::query_as(
            "SELECT id, username, password_hash, password_salt FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(self.db.pool())
        .await
        .sql_context("Failed to get user")?;

        match row {
            Some((id, username, password_hash, password_salt)) => Ok(User {
                id,
                username,
                password_hash,
                password_salt,
            }),
            None => Err(UserError::UserNotFound {
                username: username.to_string(),
            }
            .into()),
        }
    }

    async fn create(&self, user: NewUser) -> Result<User> {
        let result: std::result::Result<(i64,), sqlx::Error> = sqlx::query_as(
            "INSERT INTO users (username, password_hash, password_salt)
             VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.password_salt)
        .fetch_one(self.db.pool())
        .await;

        let (id,) = match result {
            Err(e) if is_unique_violation(&e) => {
                return Err(UserError::UsernameAlreadyExists {
                    username: user.username,
                }
                .into());
            }
            other => other.sql_context("Failed to create user")?,
        };

        Ok(User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            password_salt: user.password_salt,
        })
    }
}
