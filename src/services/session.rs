use std::sync::{Arc, Mutex};
use std::time::Duration;

use rusqlite::Connection;

use crate::db::queries;
use crate::errors::AppError;
use crate::models::Profile;

/// Bounded retry for the profile lookup: a fixed attempt cap with a fixed
/// pause between attempts, expressed as data instead of ad-hoc recursion.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    // a profile row can lag a fresh sign-in briefly; three tries half a
    // second apart cover that window
    fn default() -> Self {
        Self { max_attempts: 3, delay: Duration::from_millis(500) }
    }
}

/// Fetch the principal's profile, retrying transient store failures up to
/// the policy's cap. `Ok(None)` (no such profile) is a definitive answer
/// and is not retried.
pub async fn fetch_profile(
    db: &Arc<Mutex<Connection>>,
    principal: &str,
    policy: &RetryPolicy,
) -> Result<Option<Profile>, AppError> {
    let attempts = policy.max_attempts.max(1);
    let mut last_err = None;

    for attempt in 0..attempts {
        if attempt > 0 {
            tokio::time::sleep(policy.delay).await;
        }
        let result = {
            let conn = db.lock().unwrap();
            queries::get_profile(&conn, principal)
        };
        match result {
            Ok(profile) => return Ok(profile),
            Err(e) => {
                tracing::warn!(error = %e, attempt, "profile fetch failed");
                last_err = Some(e);
            }
        }
    }

    Err(match last_err {
        Some(e) => AppError::Store(e),
        None => AppError::NotFound(format!("profile {principal}")),
    })
}

/// Process-wide session state: who is signed in and whether the identity
/// provider marked them as admin. Explicit sign-in/sign-out lifecycle;
/// injected through AppState rather than read ambiently.
#[derive(Debug, Default)]
pub struct Session {
    principal: Option<String>,
    is_admin: bool,
}

impl Session {
    pub fn sign_in(&mut self, principal: &str, is_admin: bool) {
        self.principal = Some(principal.to_string());
        self.is_admin = is_admin;
    }

    pub fn sign_out(&mut self) {
        self.principal = None;
        self.is_admin = false;
    }

    pub fn principal(&self) -> Option<&str> {
        self.principal.as_deref()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }
}
