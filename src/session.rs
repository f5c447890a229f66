//! Authentication sessions and the shared session state.

use crate::api::ApiClient;
use crate::error::HiveError;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// Opaque session token. Redacted in `Debug` output so it never reaches logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(token: String) -> Self {
        SessionId(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionId(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

/// An authenticated credential bundle. Immutable; re-authentication replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    session_id: SessionId,
    user_id: UserId,
}

impl Session {
    pub fn new(session_id: SessionId, user_id: UserId) -> Self {
        Session { session_id, user_id }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}

#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Holds the process-wide current session.
///
/// Reads and writes are individually atomic. The "decide to re-authenticate
/// and replace" sequence is serialized one level up, in the executor.
pub struct SessionManager {
    current: Mutex<Option<Session>>,
    api: Arc<ApiClient>,
}

impl SessionManager {
    pub fn new(api: Arc<ApiClient>) -> Self {
        SessionManager {
            current: Mutex::new(None),
            api,
        }
    }

    pub fn current_session(&self) -> Option<Session> {
        self.current.lock().clone()
    }

    pub fn set_session(&self, session: Session) {
        *self.current.lock() = Some(session);
    }

    pub fn clear_session(&self) {
        *self.current.lock() = None;
    }

    /// Removes and returns the current session, if any.
    pub fn take_session(&self) -> Option<Session> {
        self.current.lock().take()
    }

    /// Asks the server whether `session` is still accepted.
    pub fn is_valid(&self, session: &Session) -> Result<bool, HiveError> {
        self.api.session_status(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::ScriptedTransport;

    fn manager() -> (Arc<ScriptedTransport>, SessionManager) {
        let transport = Arc::new(ScriptedTransport::new());
        let api = Arc::new(ApiClient::new(transport.clone(), "https://api.example.test/", "tests"));
        (transport, SessionManager::new(api))
    }

    fn session(token: &str) -> Session {
        Session::new(SessionId::new(token.into()), UserId("user".into()))
    }

    #[test]
    fn set_then_current_round_trips() {
        let (_, sessions) = manager();
        assert_eq!(sessions.current_session(), None);

        sessions.set_session(session("a"));
        assert_eq!(sessions.current_session(), Some(session("a")));

        sessions.set_session(session("b"));
        assert_eq!(sessions.current_session(), Some(session("b")));

        sessions.clear_session();
        assert_eq!(sessions.current_session(), None);
    }

    #[test]
    fn validity_probe_hits_the_session_endpoint() {
        let (transport, sessions) = manager();
        transport.respond(200, "{}").respond(401, "");

        assert!(sessions.is_valid(&session("a")).expect("probe"));
        assert!(!sessions.is_valid(&session("a")).expect("probe"));
        assert_eq!(transport.count(&http::Method::GET, "auth/sessions/a"), 2);
    }

    #[test]
    fn secrets_are_not_debug_printed() {
        let printed = format!("{:?} {:?}", session("top-secret"), Credentials::new("me", "pw123"));
        assert!(!printed.contains("top-secret"));
        assert!(!printed.contains("pw123"));
    }
}
