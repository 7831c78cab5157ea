//! Authentication service — sign-in, sign-out, and session
//! validation.

use chrono::{Duration, Utc};
use innkeep_core::error::{InnkeepError, InnkeepResult};
use innkeep_core::models::session::{CreateSession, Session};
use innkeep_core::models::user::User;
use innkeep_core::repository::{SessionRepository, UserRepository};
use tracing::info;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the sign-in flow.
#[derive(Debug)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

/// Successful sign-in result.
#[derive(Debug)]
pub struct SignInOutput {
    pub user: User,
    pub session: Session,
    /// Raw opaque session token (return to client, not stored).
    pub token: String,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U: UserRepository, S: SessionRepository> {
    user_repo: U,
    session_repo: S,
    config: AuthConfig,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    pub fn new(user_repo: U, session_repo: S, config: AuthConfig) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    /// Authenticate with email + password and open a session.
    ///
    /// Any existing sessions for the user are replaced — one terminal,
    /// one session.
    pub async fn sign_in(&self, input: SignInInput) -> InnkeepResult<SignInOutput> {
        // 1. Look up the user; an unknown email reads the same as a
        //    wrong password.
        let user = match self.user_repo.get_by_email(&input.email).await {
            Ok(user) => user,
            Err(InnkeepError::NotFound { .. }) => {
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        // 2. Verify password.
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Replace any existing sessions for this user.
        self.session_repo.delete_for_user(user.id).await?;

        // 4. Generate the opaque token and persist its hash.
        let raw_token = token::generate_session_token();
        let token_hash = token::hash_session_token(&raw_token);
        let expires_at = Utc::now() + Duration::seconds(self.lifetime_secs(input.remember_me));

        let session = self
            .session_repo
            .create(CreateSession {
                user_id: user.id,
                token_hash,
                remember_me: input.remember_me,
                expires_at,
            })
            .await?;

        info!(user_id = %user.id, session_id = %session.id, "User signed in");

        Ok(SignInOutput {
            user,
            session,
            token: raw_token,
        })
    }

    /// Remove every session belonging to the user.
    pub async fn sign_out(&self, user_id: Uuid) -> InnkeepResult<()> {
        self.session_repo.delete_for_user(user_id).await?;
        info!(user_id = %user_id, "User signed out");
        Ok(())
    }

    /// The most recent unexpired session and its user, if any.
    ///
    /// Expired or orphaned sessions found along the way are removed.
    pub async fn current_session(&self) -> InnkeepResult<Option<(User, Session)>> {
        let Some(session) = self.session_repo.latest().await? else {
            return Ok(None);
        };

        if session.expires_at < Utc::now() {
            self.session_repo.delete(session.id).await?;
            return Ok(None);
        }

        match self.user_repo.get_by_id(session.user_id).await {
            Ok(user) => Ok(Some((user, session))),
            Err(InnkeepError::NotFound { .. }) => {
                self.session_repo.delete(session.id).await?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve a raw session token to its user.
    ///
    /// Expired sessions are deleted and rejected; orphaned sessions
    /// (user gone) likewise.
    pub async fn validate_session(&self, raw_token: &str) -> InnkeepResult<User> {
        let token_hash = token::hash_session_token(raw_token);

        let session = self
            .session_repo
            .get_by_token_hash(&token_hash)
            .await
            .map_err(|e| match e {
                InnkeepError::NotFound { .. } => {
                    AuthError::SessionInvalid("unknown session token".into()).into()
                }
                other => other,
            })?;

        if session.expires_at < Utc::now() {
            self.session_repo.delete(session.id).await?;
            return Err(AuthError::SessionExpired.into());
        }

        match self.user_repo.get_by_id(session.user_id).await {
            Ok(user) => Ok(user),
            Err(InnkeepError::NotFound { .. }) => {
                self.session_repo.delete(session.id).await?;
                Err(AuthError::SessionInvalid("session user no longer exists".into()).into())
            }
            Err(e) => Err(e),
        }
    }

    /// Push the user's session expiry forward by its configured
    /// lifetime. A no-op when the user has no session.
    pub async fn extend_session(&self, user_id: Uuid) -> InnkeepResult<()> {
        let sessions = self.session_repo.get_by_user(user_id).await?;
        let Some(session) = sessions.into_iter().next() else {
            return Ok(());
        };

        let expires_at = Utc::now() + Duration::seconds(self.lifetime_secs(session.remember_me));
        self.session_repo.set_expiry(session.id, expires_at).await
    }

    fn lifetime_secs(&self, remember_me: bool) -> i64 {
        if remember_me {
            self.config.remember_me_lifetime_secs as i64
        } else {
            self.config.session_lifetime_secs as i64
        }
    }
}
