use crate::error::{AuthError, Result};
use crate::jwt::{hash_token, JwtService};
use crate::password::PasswordHasher;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tickethub_database::{AuthSessionRepository, Database, DatabaseError, UserRepository};
use tickethub_models::{NewAuthSession, Profile, User};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,

    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// Identity-provider boundary: credentials, tokens, and the mirrored
/// profile record. The rest of the workspace only talks to this surface.
pub struct IdentityService {
    pub db: Database,
    pub jwt: JwtService,
    user_repo: UserRepository,
    session_repo: AuthSessionRepository,
}

impl IdentityService {
    pub fn new(db: Database, jwt: JwtService) -> Self {
        let pool = db.pool().clone();

        Self {
            db,
            jwt,
            user_repo: UserRepository::new(pool.clone()),
            session_repo: AuthSessionRepository::new(pool),
        }
    }

    /// Create a new identity. Does not sign the caller in: registration and
    /// sign-in are decoupled.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<User> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Err(AuthError::AlreadyExists(
                "An account with this email already exists".to_string(),
            ));
        }

        let password_hash = PasswordHasher::hash(password)?;
        let user = self.user_repo.create(email, &password_hash).await?;

        tracing::info!("Identity created: id={}, email={}", user.id, user.email);

        Ok(user)
    }

    /// Insert the mirrored profile record for an identity. Callers decide
    /// whether a failure here is fatal (§ bootstrap tolerates it).
    pub async fn mirror_profile(&self, user: &User, full_name: &str) -> Result<Profile> {
        let profile = self
            .user_repo
            .create_profile(user.id, &user.email, full_name)
            .await?;

        Ok(profile)
    }

    /// Authenticate with email and password, creating a refresh session
    pub async fn sign_in_with_password(&self, request: &SignInRequest) -> Result<AuthResponse> {
        request.validate()?;

        let user = self
            .user_repo
            .find_by_email(&request.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.is_active {
            return Err(AuthError::UserInactive);
        }

        if !PasswordHasher::verify(&request.password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let access_token = self.jwt.generate_access_token(user.id, &user.email)?;
        let refresh_token = self.jwt.generate_refresh_token(user.id, &user.email)?;

        let new_session = NewAuthSession {
            user_id: user.id,
            refresh_token_hash: hash_token(&refresh_token),
            expires_at: Utc::now() + Duration::days(self.jwt.refresh_token_exp_days()),
        };
        self.session_repo.create(&new_session).await?;

        self.user_repo.touch_last_login(user.id).await?;

        tracing::info!("User signed in: id={}, email={}", user.id, user.email);

        Ok(AuthResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_exp_hours() * 3600,
            user,
        })
    }

    /// Exchange a refresh token for a fresh access token
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse> {
        let claims = self.jwt.validate_refresh_token(refresh_token)?;

        let session = self
            .session_repo
            .find_by_refresh_token(&hash_token(refresh_token))
            .await?
            .ok_or_else(|| {
                AuthError::InvalidToken("Refresh session not found or expired".to_string())
            })?;

        let user = self.user_repo.find_by_id(session.user_id).await?;

        if !user.is_active {
            return Err(AuthError::UserInactive);
        }

        debug_assert_eq!(claims.sub, user.id.to_string());

        let access_token = self.jwt.generate_access_token(user.id, &user.email)?;

        Ok(AuthResponse {
            access_token,
            refresh_token: refresh_token.to_string(),
            token_type: "Bearer".to_string(),
            expires_in: self.jwt.access_token_exp_hours() * 3600,
            user,
        })
    }

    /// Revoke the refresh session (sign-out). Idempotent.
    pub async fn sign_out(&self, refresh_token: &str) -> Result<()> {
        let deleted = self
            .session_repo
            .delete_by_refresh_token(&hash_token(refresh_token))
            .await?;

        if !deleted {
            tracing::debug!("Sign-out for unknown or already-revoked session");
        }

        Ok(())
    }

    /// The caller's mirrored profile. A missing profile is tolerated
    /// (bootstrap step (c) may have failed): fall back to the identity record.
    pub async fn current_user(&self, user_id: Uuid) -> Result<Profile> {
        match self.user_repo.find_profile(user_id).await {
            Ok(profile) => Ok(profile),
            Err(DatabaseError::NotFound(_)) => {
                tracing::warn!("Profile missing for user {}, serving identity record", user_id);
                let user = self.user_repo.find_by_id(user_id).await?;
                Ok(Profile {
                    id: user.id,
                    email: user.email,
                    full_name: String::new(),
                    created_at: user.created_at,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}
