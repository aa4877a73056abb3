use astra::Response;
// errors.rs
use std::fmt;

/// Errors originating from the server logic (routing, bad payloads,
/// missing configuration) or from a downstream collaborator (document
/// store, LangFlow, ServiceNow).
#[derive(Debug)]
pub enum ServerError {
    NotFound,
    BadRequest(String),
    /// A required configuration group is absent. Surfaced as a client
    /// error so an unconfigured deployment answers 400, never crashes.
    NotConfigured(String),
    /// The ticketing source or the automation endpoint was unreachable
    /// or answered non-2xx.
    Upstream(String),
    StoreError(String),
    InternalError,
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::NotFound => write!(f, "Not Found"),
            ServerError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            ServerError::NotConfigured(msg) => write!(f, "Not Configured: {msg}"),
            ServerError::Upstream(msg) => write!(f, "Upstream Error: {msg}"),
            ServerError::StoreError(msg) => write!(f, "Store Error: {msg}"),
            ServerError::InternalError => write!(f, "Internal Server Error"),
        }
    }
}

impl std::error::Error for ServerError {}
