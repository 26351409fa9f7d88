use crux_core::capability::{CapabilityContext, Operation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

pub const MAX_RESPONSE_BODY_SIZE: usize = 5 * 1024 * 1024;
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub timeout_ms: u64,
}

impl HttpRequest {
    pub fn get(url: &Url) -> Self {
        Self {
            url: url.to_string(),
            headers: vec![("Accept".to_string(), "application/json".to_string())],
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

/// The single request the venue search collaborator performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VenueSearchOperation {
    Get(HttpRequest),
}

impl VenueSearchOperation {
    pub fn request(&self) -> &HttpRequest {
        match self {
            Self::Get(request) => request,
        }
    }
}

impl Operation for VenueSearchOperation {
    type Output = HttpResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    #[serde(with = "serde_bytes")]
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn with_status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures reported by the shell before any response was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum TransportError {
    #[error("connection failed: {message}")]
    Connection { message: String },

    #[error("timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("request cancelled")]
    Cancelled,

    #[error("invalid response: {reason}")]
    InvalidResponse { reason: String },
}

pub type HttpResult = Result<HttpResponse, TransportError>;

#[derive(crux_core::macros::Capability)]
pub struct VenueSearch<Ev> {
    context: CapabilityContext<VenueSearchOperation, Ev>,
}

impl<Ev> VenueSearch<Ev> {
    pub fn new(context: CapabilityContext<VenueSearchOperation, Ev>) -> Self {
        Self { context }
    }
}

impl<Ev> VenueSearch<Ev>
where
    Ev: Send + 'static,
{
    /// Asks the shell to GET `url`; the outcome is turned into an event by `make_event`.
    pub fn get<F>(&self, url: &Url, make_event: F)
    where
        F: FnOnce(HttpResult) -> Ev + Send + 'static,
    {
        let ctx = self.context.clone();
        let operation = VenueSearchOperation::Get(HttpRequest::get(url));
        self.context.spawn(async move {
            let result = ctx.request_from_shell(operation).await;
            ctx.update_app(make_event(result));
        });
    }
}
