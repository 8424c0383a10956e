use super::{Service, TokenPair};
use crate::Result;
use crate::token::{Claim, TokenError, TokenKind};

impl Service {
    /// Decode a bearer token of the given kind and check it against the
    /// identifier store.
    ///
    /// The stored user id must match the one in the claim; anything else is
    /// [`TokenError::InvalidToken`].
    pub async fn validate_token(&self, kind: TokenKind, token: &str) -> Result<Claim> {
        let claim = self.tokens.decode(kind, token)?;
        let identifier = claim.identifier(kind).ok_or(TokenError::InvalidToken)?;

        match self.tokens.validate(identifier).await? {
            Some(user_id) if user_id == claim.user_id => Ok(claim),
            _ => Err(TokenError::InvalidToken.into()),
        }
    }

    /// Issue a new access token for a validated refresh claim.
    ///
    /// The refresh token itself is handed back unchanged.
    pub async fn refresh_token(&self, claim: &Claim, refresh_token: &str) -> Result<TokenPair> {
        let access = self.tokens.issue_access(claim.user_id).await?;
        Ok(TokenPair {
            access_token: access.token,
            refresh_token: refresh_token.to_string(),
        })
    }

    /// Revoke the identifier a validated claim carries for `kind`.
    pub async fn revoke_token(&self, kind: TokenKind, claim: &Claim) -> Result<()> {
        let identifier = claim.identifier(kind).ok_or(TokenError::InvalidToken)?;
        self.tokens.revoke(identifier).await?;
        tracing::debug!(user_id = claim.user_id, "Revoked {kind:?} token");
        Ok(())
    }
}
