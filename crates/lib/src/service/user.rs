use super::{Credentials, Service, ServiceError, TokenPair};
use crate::Result;
use crate::user::{NewUser, UserError};

/// Usernames are compared case-insensitively and without surrounding
/// whitespace.
pub(crate) fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

fn normalize(credentials: Credentials) -> Result<Credentials> {
    let username = normalize_username(&credentials.username);
    if username.is_empty() {
        return Err(ServiceError::RequiredField { field: "username" }.into());
    }
    let password = credentials.password.trim().to_string();
    if password.is_empty() {
        return Err(ServiceError::RequiredField { field: "password" }.into());
    }
    Ok(Credentials { username, password })
}

impl Service {
    /// Create an account and log it in.
    pub async fn register(&self, credentials: Credentials) -> Result<TokenPair> {
        let credentials = normalize(credentials)?;

        // Cheap early answer; the unique index has the final word.
        match self.users.get_by_username(&credentials.username).await {
            Ok(_) => {
                return Err(UserError::UsernameAlreadyExists {
                    username: credentials.username,
                }
                .into());
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e),
        }

        let digest = self.codec.hash(&credentials.password)?;
        let user = self
            .users
            .create(NewUser {
                username: credentials.username,
                password_hash: digest.hash,
                password_salt: digest.salt,
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "Registered user");
        self.issue_pair(user.id).await
    }

    /// Check a username and password and issue a fresh token pair.
    ///
    /// An unknown username and a wrong password fail identically.
    pub async fn login(&self, credentials: Credentials) -> Result<TokenPair> {
        let credentials = normalize(credentials)?;

        let user = match self.users.get_by_username(&credentials.username).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => return Err(UserError::InvalidCredentials.into()),
            Err(e) => return Err(e),
        };

        self.codec.verify(&credentials.password, &user.password_hash)?;
        self.issue_pair(user.id).await
    }

    async fn issue_pair(&self, user_id: i64) -> Result<TokenPair> {
        let access = self.tokens.issue_access(user_id).await?;
        let refresh = self.tokens.issue_refresh(user_id).await?;
        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh.token,
        })
    }
}
