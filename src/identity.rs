//! Identity provider seam.
//!
//! Authentication itself belongs to an external provider. The wizard only asks
//! one question of it: does this bearer token belong to a verified session?
//! [`InMemoryIdentityProvider`] stands in for the real provider in development
//! and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Errors reported by the identity provider, surfaced to users verbatim
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account with this email already exists")]
    EmailTaken,

    #[error("Invalid sign-up details: {0}")]
    InvalidProfile(String),

    #[error("Please verify your email address before booking")]
    Unverified,

    #[error("Please sign in to continue")]
    NotSignedIn,

    #[error("This verification link is invalid or has already been used")]
    InvalidVerification,

    #[error("Identity provider error: {0}")]
    Provider(String),
}

/// Sign-up form
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpProfile {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub name: String,
    pub verified: bool,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate and open a session; the session reports whether the
    /// account's email is verified.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError>;

    async fn sign_up(&self, profile: SignUpProfile) -> Result<(), AuthError>;

    /// Look up a live session by its bearer token
    async fn current_session(&self, token: &str) -> Option<Session>;

    /// End a session. Returns false if the token was not live.
    async fn sign_out(&self, token: Uuid) -> bool;

    /// Redeem the one-time token sent to a new account's email address
    async fn verify_email(&self, token: &str) -> Result<(), AuthError>;
}

#[derive(Debug, Clone)]
struct Account {
    user_id: Uuid,
    name: String,
    email: String,
    #[allow(dead_code)]
    phone: String,
    password_hash: String,
    verified: bool,
}

/// Process-local identity provider with bcrypt-hashed passwords
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    sessions: RwLock<HashMap<Uuid, String>>,
    /// Outstanding verification tokens, by token
    verifications: RwLock<HashMap<Uuid, String>>,
    auto_verify: bool,
    hash_cost: u32,
}

impl InMemoryIdentityProvider {
    /// `auto_verify` marks new accounts verified immediately instead of
    /// issuing a verification token.
    pub fn new(auto_verify: bool) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            sessions: RwLock::new(HashMap::new()),
            verifications: RwLock::new(HashMap::new()),
            auto_verify,
            hash_cost: bcrypt::DEFAULT_COST,
        }
    }

    /// Lower the bcrypt cost (tests only need the hashing shape, not its strength)
    pub fn with_hash_cost(mut self, cost: u32) -> Self {
        self.hash_cost = cost;
        self
    }

    /// Outstanding verification token for an email, i.e. what a mailer
    /// would deliver
    pub async fn verification_token(&self, email: &str) -> Option<Uuid> {
        let email = normalize_email(email);
        self.verifications
            .read()
            .await
            .iter()
            .find(|(_, pending)| **pending == email)
            .map(|(token, _)| *token)
    }

    fn validate_profile(profile: &SignUpProfile) -> Result<(), AuthError> {
        if profile.name.trim().is_empty() {
            return Err(AuthError::InvalidProfile("name is required".to_string()));
        }
        let email = profile.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthError::InvalidProfile(
                "a valid email is required".to_string(),
            ));
        }
        if profile.password.len() < 6 {
            return Err(AuthError::InvalidProfile(
                "password must be at least 6 characters".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new(false)
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        let key = normalize_email(email);
        let account = self
            .accounts
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or(AuthError::InvalidCredentials)?;

        let password = password.to_string();
        let hash = account.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        if !matches {
            warn!("Failed sign-in attempt for {}", key);
            return Err(AuthError::InvalidCredentials);
        }

        let token = Uuid::new_v4();
        self.sessions.write().await.insert(token, key);
        debug!("Session opened for user {}", account.user_id);

        Ok(Session {
            token,
            user_id: account.user_id,
            email: account.email,
            name: account.name,
            verified: account.verified,
        })
    }

    async fn sign_up(&self, profile: SignUpProfile) -> Result<(), AuthError> {
        Self::validate_profile(&profile)?;
        let key = normalize_email(&profile.email);

        if self.accounts.read().await.contains_key(&key) {
            return Err(AuthError::EmailTaken);
        }

        let cost = self.hash_cost;
        let password = profile.password;
        let password_hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let mut accounts = self.accounts.write().await;
        // Re-check under the write lock; another sign-up may have raced us.
        if accounts.contains_key(&key) {
            return Err(AuthError::EmailTaken);
        }

        let account = Account {
            user_id: Uuid::new_v4(),
            name: profile.name.trim().to_string(),
            email: key.clone(),
            phone: profile.phone.trim().to_string(),
            password_hash,
            verified: self.auto_verify,
        };
        info!(
            "Account created for user {} (verified: {})",
            account.user_id, account.verified
        );
        if !account.verified {
            let token = Uuid::new_v4();
            self.verifications.write().await.insert(token, key.clone());
            info!("Verification token for {}: {}", key, token);
        }
        accounts.insert(key, account);
        Ok(())
    }

    async fn current_session(&self, token: &str) -> Option<Session> {
        let token = Uuid::parse_str(token.trim()).ok()?;
        let email = self.sessions.read().await.get(&token).cloned()?;
        let accounts = self.accounts.read().await;
        let account = accounts.get(&email)?;

        Some(Session {
            token,
            user_id: account.user_id,
            email: account.email.clone(),
            name: account.name.clone(),
            verified: account.verified,
        })
    }

    async fn sign_out(&self, token: Uuid) -> bool {
        self.sessions.write().await.remove(&token).is_some()
    }

    async fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        let token = Uuid::parse_str(token.trim()).map_err(|_| AuthError::InvalidVerification)?;
        let email = self
            .verifications
            .write()
            .await
            .remove(&token)
            .ok_or(AuthError::InvalidVerification)?;

        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&email)
            .ok_or(AuthError::InvalidVerification)?;
        account.verified = true;
        info!("Email verified for user {}", account.user_id);
        Ok(())
    }
}
