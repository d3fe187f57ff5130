//! Auth service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::{debug, info, warn};

use crate::{
    auth::{
        ApiTokenMetadata, ApiTokenSecret, ApiTokenUuid, ApiTokenVersion, AuthServiceError,
        IssuedApiToken, NewApiToken, TokenVerifier, build_verifier_input, format_api_token,
        parse_api_token, repository::PgAuthRepository,
    },
    database::Db,
    domain::tenants::records::TenantUuid,
};

#[derive(Clone)]
pub struct PgAuthService {
    db: Db,
    repository: PgAuthRepository,
    verifier: Arc<dyn TokenVerifier>,
}

impl fmt::Debug for PgAuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgAuthService").field("db", &self.db).finish_non_exhaustive()
    }
}

impl PgAuthService {
    #[must_use]
    pub fn new(db: Db, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            db,
            repository: PgAuthRepository::new(),
            verifier,
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn issue_api_token(
        &self,
        tenant: TenantUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        if expires_at.is_some_and(|expires_at| expires_at <= Timestamp::now()) {
            return Err(AuthServiceError::InvalidData);
        }

        let uuid = ApiTokenUuid::new();
        let version = ApiTokenVersion::V1;
        let secret = ApiTokenSecret::generate();

        let token_hash = self
            .verifier
            .sign(&build_verifier_input(uuid.into_uuid(), version, tenant, &secret))
            .await?;

        let mut tx = self.db.begin_transaction().await?;

        let metadata = self
            .repository
            .create_api_token(
                &mut tx,
                &NewApiToken {
                    uuid,
                    tenant_uuid: tenant,
                    version,
                    token_hash,
                    expires_at,
                },
            )
            .await?;

        tx.commit().await?;

        info!(%tenant, token = %uuid, "issued api token");

        Ok(IssuedApiToken {
            token: format_api_token(uuid.into_uuid(), version, &secret),
            metadata,
        })
    }

    async fn list_api_tokens(
        &self,
        tenant: TenantUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let tokens = self.repository.list_api_tokens(&mut tx, tenant).await?;

        tx.commit().await?;

        Ok(tokens)
    }

    async fn revoke_api_token(
        &self,
        token: ApiTokenUuid,
    ) -> Result<ApiTokenMetadata, AuthServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let revoked = self
            .repository
            .revoke_api_token(&mut tx, token)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        tx.commit().await?;

        info!(tenant = %revoked.tenant_uuid, %token, "revoked api token");

        Ok(revoked)
    }

    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<TenantUuid, AuthServiceError> {
        let parsed = parse_api_token(bearer_token).map_err(|error| {
            debug!(%error, "rejected malformed api token");

            AuthServiceError::NotFound
        })?;

        let uuid = ApiTokenUuid::from_uuid(parsed.token_uuid);

        let mut tx = self.db.begin_transaction().await?;

        let token = self
            .repository
            .find_active_api_token(&mut tx, uuid)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if token.version != parsed.version {
            return Err(AuthServiceError::NotFound);
        }

        let input = build_verifier_input(
            parsed.token_uuid,
            parsed.version,
            token.tenant_uuid,
            &parsed.secret,
        );

        if !self.verifier.verify(&input, &token.token_hash).await? {
            return Err(AuthServiceError::NotFound);
        }

        if let Err(error) = self.repository.touch_last_used(&mut tx, uuid).await {
            warn!(token = %uuid, %error, "failed to record api token use");
        }

        tx.commit().await?;

        Ok(token.tenant_uuid)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Issue a staff token. The raw token is returned once and never stored.
    async fn issue_api_token(
        &self,
        tenant: TenantUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError>;

    /// Tokens issued for a tenant, oldest first.
    async fn list_api_tokens(
        &self,
        tenant: TenantUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError>;

    /// Revoke an active token.
    async fn revoke_api_token(
        &self,
        token: ApiTokenUuid,
    ) -> Result<ApiTokenMetadata, AuthServiceError>;

    /// Resolve a staff bearer token to its tenant.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<TenantUuid, AuthServiceError>;
}
