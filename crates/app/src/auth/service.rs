//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::auth::{
    AuthServiceError, IssuedApiToken, NewUser, Principal, User, UserUuid,
    generate_api_token_secret, parse_api_token, repository::PgAuthRepository,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Create a user that tokens can be issued for.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::AlreadyExists`] when the email is taken.
    pub async fn create_user(&self, user: NewUser) -> Result<User, AuthServiceError> {
        Ok(self.repository.create_user(&user).await?)
    }

    /// Issue a new API token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the user does not exist or the insert fails.
    pub async fn issue_api_token(
        &self,
        user: UserUuid,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let secret = generate_api_token_secret();

        self.repository
            .create_api_token(token_uuid, user, &secret.hash())
            .await?;

        Ok(IssuedApiToken {
            token_uuid,
            user_uuid: user,
            token: secret.to_token(),
        })
    }

    /// Revoke every active token of a user, returning how many were revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_tokens(&self, user: UserUuid) -> Result<u64, AuthServiceError> {
        Ok(self.repository.revoke_api_tokens(user).await?)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        let secret = parse_api_token(bearer_token).map_err(|_ignored| AuthServiceError::NotFound)?;

        let token = self
            .repository
            .find_active_token(&secret.hash())
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        // Auth success doesn't depend on this write.
        if let Err(source) = self.repository.touch_api_token(token.token_uuid).await {
            warn!("failed to record api token use: {source}");
        }

        Ok(token.principal)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a raw bearer token to the caller it belongs to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;
}
