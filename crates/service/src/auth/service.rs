use std::sync::Arc;

use argon2::{Argon2, password_hash::{PasswordHasher, PasswordVerifier, SaltString}, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use models::user::NewUser;
use rand::rngs::OsRng;
use tracing::{info, debug, instrument};
use uuid::Uuid;

use super::domain::{RegisterInput, LoginInput, AuthUser, AuthSession, TokenClaims};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub password_algorithm: String,
    pub token_ttl_hours: i64,
    /// Lowercased emails that register as admins.
    pub admin_emails: Vec<String>,
}

impl AuthConfig {
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self { jwt_secret: secret.into(), password_algorithm: "argon2".into(), token_ttl_hours: 12, admin_emails: Vec::new() }
    }
}

impl From<&configs::AuthConfig> for AuthConfig {
    fn from(c: &configs::AuthConfig) -> Self {
        Self {
            jwt_secret: c.jwt_secret.clone(),
            password_algorithm: "argon2".into(),
            token_ttl_hours: c.token_ttl_hours,
            admin_emails: c.admin_emails.clone(),
        }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository + ?Sized> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, domain::RegisterInput};
    /// use service::store::MemoryStore;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemoryStore::default()), AuthConfig::with_secret("secret"));
    /// let input = RegisterInput { email: "User@Example.com".into(), username: "user".into(), password: "Secret123".into(), ..Default::default() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// assert!(!user.is_admin);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        if input.password.chars().count() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        let email = input.email.trim().to_ascii_lowercase();
        let new = NewUser {
            is_admin: self.cfg.admin_emails.iter().any(|e| *e == email),
            email,
            username: input.username,
            first_name: input.first_name,
            last_name: input.last_name,
            phone_number: input.phone_number,
        };
        new.validate()?;
        if let Some(existing) = self.repo.find_user_by_email(&new.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = self.repo.create_user(&new).await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user.id, email = %user.email, is_admin = user.is_admin, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, domain::{RegisterInput, LoginInput}};
    /// use service::store::MemoryStore;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemoryStore::default()), AuthConfig::with_secret("secret"));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), username: "u".into(), password: "Passw0rd".into(), ..Default::default() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// let claims = svc.decode_token(&session.token).unwrap();
    /// assert_eq!(claims.uid, session.user.id);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email.trim().to_ascii_lowercase())
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp();
        let claims = TokenClaims { sub: user.email.clone(), uid: user.id, adm: user.is_admin, exp: exp as usize };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token, expires_at: exp })
    }

    /// Validates signature and expiry of an HS256 token.
    pub fn decode_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()), &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<AuthUser, AuthError> {
        self.repo.find_user_by_id(user_id).await?.ok_or(AuthError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn svc(admins: &[&str]) -> AuthService<MemoryStore> {
        let mut cfg = AuthConfig::with_secret("unit-test-secret");
        cfg.admin_emails = admins.iter().map(|s| s.to_string()).collect();
        AuthService::new(Arc::new(MemoryStore::default()), cfg)
    }

    fn input(email: &str, password: &str) -> RegisterInput {
        RegisterInput { email: email.into(), username: "someone".into(), password: password.into(), ..Default::default() }
    }

    #[tokio::test]
    async fn register_then_login_issues_member_token() {
        let svc = svc(&[]);
        let user = svc.register(input("a@b.com", "Passw0rd!")).await.unwrap();
        let session = svc.login(LoginInput { email: "A@B.com".into(), password: "Passw0rd!".into() }).await.unwrap();
        let claims = svc.decode_token(&session.token).unwrap();
        assert_eq!(claims.uid, user.id);
        assert_eq!(claims.sub, "a@b.com");
        assert_eq!(claims.caller(), crate::caller::Caller::member(user.id));
        assert_eq!(svc.profile(user.id).await.unwrap().username, "someone");
    }

    #[tokio::test]
    async fn listed_email_registers_as_admin() {
        let svc = svc(&["boss@b.com"]);
        let user = svc.register(input("Boss@b.com", "Passw0rd!")).await.unwrap();
        assert!(user.is_admin);
        assert!(user.caller().is_admin());
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let svc = svc(&[]);
        svc.register(input("a@b.com", "Passw0rd!")).await.unwrap();
        let err = svc.register(input("a@b.com", "OtherPass1")).await.unwrap_err();
        assert!(matches!(err, AuthError::Conflict));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_unauthorized() {
        let svc = svc(&[]);
        svc.register(input("a@b.com", "Passw0rd!")).await.unwrap();
        let bad = svc.login(LoginInput { email: "a@b.com".into(), password: "nope-nope".into() }).await;
        assert!(matches!(bad, Err(AuthError::Unauthorized)));
        let missing = svc.login(LoginInput { email: "x@b.com".into(), password: "Passw0rd!".into() }).await;
        assert!(matches!(missing, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn short_password_and_bad_email_are_rejected() {
        let svc = svc(&[]);
        assert!(matches!(svc.register(input("a@b.com", "short")).await, Err(AuthError::Validation(_))));
        assert!(matches!(svc.register(input("not-an-email", "Passw0rd!")).await, Err(AuthError::Validation(_))));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = svc(&[]);
        let other = AuthService::new(Arc::new(MemoryStore::default()), AuthConfig::with_secret("different"));
        let claims = TokenClaims { sub: "a@b.com".into(), uid: Uuid::new_v4(), adm: true, exp: (chrono::Utc::now().timestamp() + 60) as usize };
        let token = encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(b"different")).unwrap();
        assert!(other.decode_token(&token).is_ok());
        assert!(matches!(svc.decode_token(&token), Err(AuthError::TokenError(_))));
        assert!(svc.decode_token("garbage").is_err());
    }
}
