//! Local single-profile authentication.

use std::sync::Arc;
use sha2::{Digest, Sha256};

use crate::config::settings::DefaultProfileConfig;
use crate::records::{now_millis, UserProfile, UserSession};
use crate::storage::Repository;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("No user profile found")]
    NoProfile,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Please enter valid registration details")]
    InvalidRegistration,
}

/// Lowercase hex SHA-256 of the password
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub struct AuthService {
    repo: Arc<Repository>,
}

impl AuthService {
    /// Seeds a default profile, and logs out, when none is stored yet
    pub fn new(repo: Arc<Repository>, defaults: &DefaultProfileConfig) -> Self {
        if repo.get_profile().is_none() {
            let mut profile = UserProfile::new(
                &defaults.name,
                &defaults.email,
                hash_password(&defaults.password),
            );
            profile.study_goal_hours = defaults.study_goal_hours;
            repo.save_profile(profile);
            repo.clear_session();
            tracing::info!(email = %defaults.email, "Seeded default profile");
        }
        Self { repo }
    }

    pub fn is_logged_in(&self) -> bool {
        self.repo.get_session().logged_in && self.repo.get_profile().is_some()
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        if !self.is_logged_in() {
            return None;
        }
        self.repo.get_profile()
    }

    pub fn login(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let user = self.repo.get_profile().ok_or(AuthError::NoProfile)?;

        let email_matches = user.email.trim().eq_ignore_ascii_case(email.trim());
        if !email_matches || hash_password(password) != user.password_hash {
            tracing::warn!("Login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        self.start_session(&user);
        Ok(user)
    }

    /// Replace the stored profile with a new one and log it in
    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let (name, email) = (name.trim(), email.trim());
        if name.is_empty() || email.is_empty() || password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidRegistration);
        }

        let profile = UserProfile::new(name, email, hash_password(password));
        self.repo.save_profile(profile.clone());
        self.start_session(&profile);
        tracing::info!(user_id = %profile.id, "Registered profile");
        Ok(profile)
    }

    pub fn logout(&self) {
        self.repo.clear_session();
    }

    fn start_session(&self, user: &UserProfile) {
        self.repo.save_session(UserSession {
            user_id: Some(user.id.clone()),
            logged_in: true,
            last_login: Some(now_millis()),
        });
    }
}
