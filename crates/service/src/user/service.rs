use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::domain::{normalize_email, validate_name, AuthSession, LoginInput, NewUser, RegisterInput, User, UserPatch};
use super::repository::UserRepository;
use crate::auth::{PasswordHasher, TokenKeys};
use crate::errors::ServiceError;

const BAD_CREDENTIALS: &str = "invalid email or password";

/// User use cases: registration, login and profile management.
pub struct UserService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
    hasher: PasswordHasher,
    tokens: Arc<TokenKeys>,
}

impl<R: UserRepository + ?Sized> UserService<R> {
    pub fn new(repo: Arc<R>, hasher: PasswordHasher, tokens: Arc<TokenKeys>) -> Self {
        Self { repo, hasher, tokens }
    }

    /// Token verifier used by the bearer middleware.
    pub fn tokens(&self) -> &Arc<TokenKeys> { &self.tokens }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{HashCost, PasswordHasher, TokenKeys};
    /// use service::user::{RegisterInput, UserService, repository::mock::InMemoryUserRepository};
    /// use std::sync::Arc;
    /// let svc = UserService::new(
    ///     Arc::new(InMemoryUserRepository::default()),
    ///     PasswordHasher::new(HashCost::minimal()).unwrap(),
    ///     Arc::new(TokenKeys::new("secret", chrono::Duration::hours(72))),
    /// );
    /// let input = RegisterInput { email: "user@example.com".into(), password: "Secret123".into(), name: "Test".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// assert_ne!(user.password_hash, "Secret123");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<User, ServiceError> {
        let input = input.normalized();
        input.validate()?;
        // best-effort: the unique index still decides under concurrent sign-ups
        match self.repo.find_by_email(&input.email).await {
            Ok(Some(_)) => return Err(ServiceError::already_exists("user")),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "duplicate email pre-check failed"),
        }

        let RegisterInput { email, password, name } = input;
        let hash = self.hash_password(password).await?;
        let user = self.repo.save(NewUser { email, name, password_hash: hash }).await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(user)
    }

    /// Authenticate and issue a signed token.
    ///
    /// Unknown email and wrong password fail with the same `Unauthorized`
    /// message after the same argon2 work.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, ServiceError> {
        let email = normalize_email(&input.email);
        let Some(user) = self.repo.find_by_email(&email).await? else {
            let _ = self.verify_password(input.password, self.hasher.dummy_hash().to_string()).await;
            info!("login_unknown_email");
            return Err(ServiceError::unauthorized(BAD_CREDENTIALS));
        };
        if !self.verify_password(input.password, user.password_hash.clone()).await? {
            info!(user_id = %user.id, "login_bad_password");
            return Err(ServiceError::unauthorized(BAD_CREDENTIALS));
        }
        let token = self.tokens.issue(user.id)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    #[instrument(skip(self))]
    pub async fn find_user_by_id(&self, id: Uuid) -> Result<User, ServiceError> {
        self.repo.find_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn find_all_users(&self) -> Result<Vec<User>, ServiceError> {
        self.repo.find_all().await
    }

    /// Apply a partial update and return the stored state afterwards.
    #[instrument(skip(self))]
    pub async fn patch_user(&self, id: Uuid, patch: UserPatch) -> Result<User, ServiceError> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(ServiceError::invalid("username is invalid"));
            }
            validate_name(name)?;
        }
        self.repo.patch(id, &patch).await?;
        let user = self.repo.find_by_id(id).await?;
        info!(user_id = %id, "user_updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, id: Uuid) -> Result<(), ServiceError> {
        self.repo.delete(id).await?;
        info!(user_id = %id, "user_deleted");
        Ok(())
    }

    // argon2 is CPU bound; keep it off the async workers
    async fn hash_password(&self, password: String) -> Result<String, ServiceError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::internal(format!("hashing task failed: {e}")))?
    }

    async fn verify_password(&self, password: String, phc: String) -> Result<bool, ServiceError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &phc))
            .await
            .map_err(|e| ServiceError::internal(format!("verification task failed: {e}")))?
    }
}
