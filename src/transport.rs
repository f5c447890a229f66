//! HTTP transport seam.
//!
//! - `Transport` is the boundary to whatever HTTP stack the caller supplies.
//! - `UreqTransport` is the default blocking implementation on `ureq`.
//! - Timeouts and cancellation belong to the transport; they surface as
//!   `TransportError` and are never retried by the client.

use crate::error::TransportError;
use http::{Method, StatusCode};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

pub trait Transport: Send + Sync {
    fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build();
        UreqTransport {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn map_ureq_error(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(t) => TransportError::Timeout(t.to_string()),
        other => TransportError::Connection(other.to_string()),
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let ApiRequest {
            method,
            url,
            headers,
            body,
        } = request;
        let body = body.unwrap_or_default();

        let result = match method {
            Method::GET => with_headers(self.agent.get(&url), &headers).call(),
            Method::DELETE => with_headers(self.agent.delete(&url), &headers).call(),
            Method::POST => with_headers(self.agent.post(&url), &headers).send(body.as_str()),
            Method::PUT => with_headers(self.agent.put(&url), &headers).send(body.as_str()),
            other => return Err(TransportError::Connection(format!("unsupported method {other}"))),
        };

        let mut response = result.map_err(map_ureq_error)?;
        let status = response.status();
        let body = response.body_mut().read_to_string().map_err(map_ureq_error)?;
        Ok(ApiResponse { status, body })
    }
}

/// Scripted in-memory transport for tests: replays canned responses in order
/// and records every request it saw.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::Arc;

    type Router = Arc<dyn Fn(&ApiRequest) -> (u16, String) + Send + Sync>;

    #[derive(Default)]
    pub(crate) struct ScriptedTransport {
        responses: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
        router: Mutex<Option<Router>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        pub(crate) fn new() -> Self {
            ScriptedTransport::default()
        }

        pub(crate) fn respond(&self, status: u16, body: &str) -> &Self {
            self.responses.lock().push_back(Ok(ApiResponse {
                status: StatusCode::from_u16(status).expect("valid status"),
                body: body.to_string(),
            }));
            self
        }

        /// Answers requests with `router` once the scripted responses run out.
        pub(crate) fn route(&self, router: impl Fn(&ApiRequest) -> (u16, String) + Send + Sync + 'static) -> &Self {
            *self.router.lock() = Some(Arc::new(router));
            self
        }

        pub(crate) fn fail(&self, err: TransportError) -> &Self {
            self.responses.lock().push_back(Err(err));
            self
        }

        pub(crate) fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().clone()
        }

        pub(crate) fn count(&self, method: &Method, path_suffix: &str) -> usize {
            self.requests
                .lock()
                .iter()
                .filter(|r| r.method == *method && r.url.ends_with(path_suffix))
                .count()
        }
    }

    impl Transport for ScriptedTransport {
        fn execute(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
            self.requests.lock().push(request.clone());
            if let Some(scripted) = self.responses.lock().pop_front() {
                return scripted;
            }
            let router = self.router.lock().clone();
            let Some(router) = router else {
                panic!("no scripted response left for {} {}", request.method, request.url);
            };
            let (status, body) = router(&request);
            Ok(ApiResponse {
                status: StatusCode::from_u16(status).expect("valid status"),
                body,
            })
        }
    }
}
