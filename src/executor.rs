//! Authenticated request execution with one-shot re-authentication.
//!
//! A unit of work performs exactly one HTTP round trip with the session it is
//! handed. When it fails with `NotAuthorized`, the executor asks the server
//! whether that session is still valid. Only an expired session triggers a
//! fresh login followed by a single retry; a still-valid session means the
//! caller is simply not allowed, and the error propagates unchanged.

use crate::api::ApiClient;
use crate::error::HiveError;
use crate::session::{Credentials, Session, SessionManager, UserId};
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::sync::Arc;

pub struct AuthenticatedExecutor {
    api: Arc<ApiClient>,
    sessions: SessionManager,
    credentials: Credentials,
    // Serializes "inspect session, decide, replace session" across callers.
    reauth: Mutex<()>,
}

impl AuthenticatedExecutor {
    /// Creates the executor and logs in immediately.
    ///
    /// Fails with `HiveError::Authentication` when the credentials are rejected.
    pub fn connect(api: Arc<ApiClient>, credentials: Credentials) -> Result<Self, HiveError> {
        let executor = AuthenticatedExecutor {
            sessions: SessionManager::new(api.clone()),
            api,
            credentials,
            reauth: Mutex::new(()),
        };
        executor.authenticate()?;
        Ok(executor)
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.sessions.current_session().map(|s| s.user_id().clone())
    }

    // Callers must hold `reauth` or be the constructor.
    fn authenticate(&self) -> Result<Session, HiveError> {
        self.sessions.clear_session();
        let session = self.api.create_session(&self.credentials)?;
        info!("Authenticated to Hive API as {}", self.credentials.username());
        self.sessions.set_session(session.clone());
        Ok(session)
    }

    fn current_or_authenticate(&self) -> Result<Session, HiveError> {
        if let Some(session) = self.sessions.current_session() {
            return Ok(session);
        }
        let _guard = self.reauth.lock();
        match self.sessions.current_session() {
            Some(session) => Ok(session),
            None => self.authenticate(),
        }
    }

    /// Decides how to recover from a `NotAuthorized` seen with `stale`.
    ///
    /// Returns the session to retry with, or `NotAuthorized` when the session
    /// is still valid and retrying would not help.
    fn recover(&self, stale: &Session) -> Result<Session, HiveError> {
        let _guard = self.reauth.lock();

        if let Some(current) = self.sessions.current_session()
            && current != *stale
        {
            debug!("Session was replaced by a concurrent caller; retrying with it");
            return Ok(current);
        }

        if self.sessions.is_valid(stale)? {
            debug!("Session is still valid; not re-authenticating");
            return Err(HiveError::NotAuthorized);
        }

        warn!("Hive session expired; re-authenticating");
        self.authenticate()
    }

    /// Runs `work`, re-authenticating and retrying at most once.
    pub fn call<T>(&self, mut work: impl FnMut(&ApiClient, &Session) -> Result<T, HiveError>) -> Result<T, HiveError> {
        let session = self.current_or_authenticate()?;
        match work(self.api.as_ref(), &session) {
            Err(HiveError::NotAuthorized) => {}
            other => return other,
        }

        let fresh = self.recover(&session)?;
        work(self.api.as_ref(), &fresh)
    }

    /// Best-effort logout. Failures are logged and otherwise ignored.
    pub fn close(&self) {
        let _guard = self.reauth.lock();
        if let Some(session) = self.sessions.take_session()
            && let Err(e) = self.api.delete_session(&session)
        {
            debug!("Discarding session failed (ignored): {}", e);
        }
    }
}
