use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{AuthSession, AuthUser, Credentials};

use super::with_conn;

const DEFAULT_SESSION_TTL_DAYS: i64 = 7;

/// Email/password accounts and the opaque session tokens issued for them.
#[derive(Clone)]
pub struct AuthRepository {
    pool: DbPool,
    session_ttl: Duration,
}

impl AuthRepository {
    pub fn new(pool: DbPool) -> Self {
        Self::with_ttl_days(pool, DEFAULT_SESSION_TTL_DAYS)
    }

    pub fn with_ttl_days(pool: DbPool, days: i64) -> Self {
        Self {
            pool,
            session_ttl: Duration::days(days),
        }
    }

    pub async fn sign_up(&self, credentials: &Credentials) -> Result<AuthUser> {
        credentials
            .validate()
            .map_err(|msg| AppError::Validation(msg.to_string()))?;

        let password_hash = hash_password(&credentials.password)?;
        let user = AuthUser {
            id: Uuid::new_v4().to_string(),
            email: credentials.email.clone(),
        };
        let user_clone = user.clone();
        let now = Utc::now();

        with_conn(&self.pool, move |conn| {
            let taken: bool = conn.query_row(
                "SELECT COUNT(*) > 0 FROM auth_accounts WHERE email = ?",
                [&user_clone.email],
                |row| row.get(0),
            )?;
            if taken {
                return Err(AppError::Validation(
                    "An account with this email already exists".to_string(),
                ));
            }

            conn.execute(
                "INSERT INTO auth_accounts (id, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
                rusqlite::params![user_clone.id, user_clone.email, password_hash, now],
            )?;
            Ok(())
        })
        .await?;

        tracing::info!("Signed up {}", user.email);
        Ok(user)
    }

    /// Verify the password and open a new session. Wrong email or password is `Unauthorized`.
    pub async fn sign_in_with_password(&self, credentials: &Credentials) -> Result<AuthSession> {
        credentials
            .validate()
            .map_err(|msg| AppError::Validation(msg.to_string()))?;

        let email = credentials.email.clone();
        let account: Option<(String, String)> = with_conn(&self.pool, move |conn| {
            let account = conn
                .query_row(
                    "SELECT id, password_hash FROM auth_accounts WHERE email = ?",
                    [&email],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?;
            Ok(account)
        })
        .await?;

        let (user_id, hash) = account.ok_or(AppError::Unauthorized)?;
        if !verify_password(&credentials.password, &hash)? {
            return Err(AppError::Unauthorized);
        }

        let user = AuthUser {
            id: user_id,
            email: credentials.email.clone(),
        };
        self.create_session(user).await
    }

    async fn create_session(&self, user: AuthUser) -> Result<AuthSession> {
        let token = Uuid::new_v4().to_string();
        let now = Utc::now();
        let expires_at = now + self.session_ttl;
        let session = AuthSession {
            token,
            user,
            expires_at,
        };
        let session_clone = session.clone();

        with_conn(&self.pool, move |conn| {
            conn.execute(
                "INSERT INTO auth_sessions (token, user_id, created_at, expires_at) VALUES (?, ?, ?, ?)",
                rusqlite::params![
                    session_clone.token,
                    session_clone.user.id,
                    now,
                    session_clone.expires_at
                ],
            )?;
            Ok(())
        })
        .await?;

        Ok(session)
    }

    /// Resolve a token to its session. Expired sessions are deleted and reported as absent.
    pub async fn get_session(&self, token: &str) -> Result<Option<AuthSession>> {
        let token = token.to_string();
        let now = Utc::now();

        with_conn(&self.pool, move |conn| {
            let result: Option<(String, String, DateTime<Utc>)> = conn
                .query_row(
                    "SELECT s.user_id, a.email, s.expires_at
                     FROM auth_sessions s
                     JOIN auth_accounts a ON a.id = s.user_id
                     WHERE s.token = ?",
                    [&token],
                    |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
                )
                .optional()?;

            match result {
                Some((_, _, expires_at)) if expires_at <= now => {
                    conn.execute("DELETE FROM auth_sessions WHERE token = ?", [&token])?;
                    Ok(None)
                }
                Some((id, email, expires_at)) => Ok(Some(AuthSession {
                    token,
                    user: AuthUser { id, email },
                    expires_at,
                })),
                None => Ok(None),
            }
        })
        .await
    }

    pub async fn sign_out(&self, token: &str) -> Result<()> {
        let token = token.to_string();
        with_conn(&self.pool, move |conn| {
            conn.execute("DELETE FROM auth_sessions WHERE token = ?", [&token])?;
            Ok(())
        })
        .await
    }

    /// Batch delete all expired sessions.
    pub async fn cleanup_expired(&self) -> Result<usize> {
        let now = Utc::now();
        with_conn(&self.pool, move |conn| {
            let rows = conn.execute(
                "DELETE FROM auth_sessions WHERE expires_at <= ?",
                rusqlite::params![now],
            )?;
            Ok(rows)
        })
        .await
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|_| AppError::PasswordHash)?
        .to_string();
    Ok(password_hash)
}

fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AppError::PasswordHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
