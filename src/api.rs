//! Request layer for the Hive (Omnia) API.
//!
//! - Resolves endpoint paths against the configured base URL.
//! - Attaches the client id, the API media type and (when given) the session token.
//! - Maps HTTP status codes onto `HiveError` and parses bodies into the wire models.
//!
//! This layer is stateless with respect to sessions: callers pass the session
//! to use for each call. Re-authentication lives in `executor`.

use crate::error::HiveError;
use crate::models::hive::{WireNodes, WireSession, WireSessions};
use crate::session::{Credentials, Session, SessionId, UserId};
use crate::transport::{ApiRequest, Transport};
use crate::values::NodeId;
use http::{Method, StatusCode};
use log::debug;
use serde::de::DeserializeOwned;
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://api.prod.bgchprod.info/omnia/";

const ENDPOINT_NODES: &str = "nodes";
const ENDPOINT_SESSIONS: &str = "auth/sessions";

const HEADER_CLIENT_ID: &str = "X-Omnia-Client";
const HEADER_ACCESS_TOKEN: &str = "X-Omnia-Access-Token";
const MEDIA_TYPE_API: &str = "application/vnd.alertme.zoo-6.5.0+json";
const MEDIA_TYPE_JSON: &str = "application/json";

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    base_url: String,
    client_id: String,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: impl Into<String>, client_id: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        ApiClient {
            transport,
            base_url,
            client_id: client_id.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `endpoint/{id}` with the id percent-encoded as a single path segment.
    fn resource_path(endpoint: &str, id: &str) -> String {
        format!("{}/{}", endpoint, urlencoding::encode(id))
    }

    /// Sends one request and returns the body of a 2xx response.
    fn send(
        &self,
        method: Method,
        path: &str,
        session: Option<&Session>,
        body: Option<String>,
    ) -> Result<String, HiveError> {
        let mut headers = vec![
            (HEADER_CLIENT_ID.to_string(), self.client_id.clone()),
            ("Accept".to_string(), MEDIA_TYPE_API.to_string()),
        ];
        if let Some(s) = session {
            headers.push((HEADER_ACCESS_TOKEN.to_string(), s.session_id().as_str().to_string()));
        }
        if body.is_some() {
            headers.push(("Content-Type".to_string(), MEDIA_TYPE_JSON.to_string()));
        }

        let request = ApiRequest {
            method,
            url: self.url(path),
            headers,
            body,
        };
        debug!("{} {}", request.method, request.url);

        let response = self.transport.execute(request)?;
        match response.status {
            s if s.is_success() => Ok(response.body),
            StatusCode::UNAUTHORIZED => Err(HiveError::NotAuthorized),
            status => Err(HiveError::UnknownApi {
                status,
                message: response.body,
            }),
        }
    }

    pub fn create_session(&self, credentials: &Credentials) -> Result<Session, HiveError> {
        let request = WireSessions {
            sessions: Some(vec![WireSession {
                username: Some(credentials.username().to_string()),
                password: Some(credentials.password().to_string()),
                caller: Some(self.client_id.clone()),
                ..WireSession::default()
            }]),
        };
        let body = serde_json::to_string(&request)?;

        let text = match self.send(Method::POST, ENDPOINT_SESSIONS, None, Some(body)) {
            Ok(text) => text,
            Err(HiveError::NotAuthorized) => {
                return Err(HiveError::Authentication("credentials rejected".into()));
            }
            Err(HiveError::UnknownApi { status, .. })
                if status == StatusCode::BAD_REQUEST || status == StatusCode::FORBIDDEN =>
            {
                return Err(HiveError::Authentication(format!("credentials rejected (http {status})")));
            }
            Err(e) => return Err(e),
        };

        let parsed: WireSessions = parse_body(&text)?;
        let wire = parsed
            .sessions
            .and_then(|s| s.into_iter().next())
            .ok_or_else(|| HiveError::malformed("session list is missing or empty"))?;
        let session_id = wire
            .session_id
            .or(wire.id)
            .ok_or_else(|| HiveError::malformed("session id is missing"))?;
        let user_id = wire
            .user_id
            .ok_or_else(|| HiveError::malformed("session user id is missing"))?;

        Ok(Session::new(SessionId::new(session_id), UserId(user_id)))
    }

    /// Cheap probe: is this session still accepted by the server?
    pub fn session_status(&self, session: &Session) -> Result<bool, HiveError> {
        let path = ApiClient::resource_path(ENDPOINT_SESSIONS, session.session_id().as_str());
        match self.send(Method::GET, &path, Some(session), None) {
            Ok(_) => Ok(true),
            Err(HiveError::NotAuthorized) => Ok(false),
            Err(HiveError::UnknownApi { status, .. })
                if status == StatusCode::FORBIDDEN || status == StatusCode::NOT_FOUND =>
            {
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub fn delete_session(&self, session: &Session) -> Result<(), HiveError> {
        let path = ApiClient::resource_path(ENDPOINT_SESSIONS, session.session_id().as_str());
        self.send(Method::DELETE, &path, Some(session), None).map(|_| ())
    }

    pub fn get_nodes(&self, session: &Session) -> Result<WireNodes, HiveError> {
        let text = self.send(Method::GET, ENDPOINT_NODES, Some(session), None)?;
        parse_body(&text)
    }

    pub fn get_node(&self, session: &Session, id: &NodeId) -> Result<WireNodes, HiveError> {
        let path = ApiClient::resource_path(ENDPOINT_NODES, &id.0);
        let text = self.send(Method::GET, &path, Some(session), None)?;
        parse_body(&text)
    }

    pub fn put_node(&self, session: &Session, id: &NodeId, update: &WireNodes) -> Result<WireNodes, HiveError> {
        let path = ApiClient::resource_path(ENDPOINT_NODES, &id.0);
        let body = serde_json::to_string(update)?;
        let text = self.send(Method::PUT, &path, Some(session), Some(body))?;
        parse_body(&text)
    }
}

/// Parses a 2xx body; any shape error is reported with its JSON path.
fn parse_body<T: DeserializeOwned>(text: &str) -> Result<T, HiveError> {
    let de = &mut serde_json::Deserializer::from_str(text);
    serde_path_to_error::deserialize(de)
        .map_err(|e| HiveError::MalformedResponse(format!("{} at {}", e.inner(), e.path())))
}
