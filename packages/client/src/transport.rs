//! The transport seam: something that executes a [`RequestDescriptor`] and
//! returns the parsed JSON body.
//!
//! The core never builds HTTP requests. [`HttpTransport`] is the reference
//! implementation on top of `reqwest`; tests substitute their own.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use linkweft::{Method, RequestDescriptor};
use linkweft_api::ErrorResponse;

use crate::session::Session;

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// Errors a transport can return. Retrying is up to the caller.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request failed or the body was not valid JSON.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("API returned status {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    BadStatus { status: u16, message: Option<String> },
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Executes logical requests.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// [`Arc`](std::sync::Arc).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &RequestDescriptor) -> Result<Value, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn execute(&self, request: &RequestDescriptor) -> Result<Value, TransportError> {
        (**self).execute(request).await
    }
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// [`Transport`] over HTTP.
///
/// Holds a cloneable [`reqwest::Client`] (which pools connections
/// internally) and the [`Session`] every request is made in.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    session: Session,
}

impl HttpTransport {
    /// # Arguments
    ///
    /// * `client`: pre-configured `reqwest::Client` (e.g. with a timeout).
    /// * `session`: API base, credentials, and version.
    pub fn new(client: Client, session: Session) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: &RequestDescriptor) -> Result<Value, TransportError> {
        let url = self.session.url_for(request);
        debug!("{} {url}", request.method());

        let mut req = self
            .client
            .request(http_method(request.method()), &url)
            .header(ACCEPT, self.session.accept_header());
        if let Some(token) = self.session.access_token() {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .ok()
                .map(|body| body.message().to_string());
            return Err(TransportError::BadStatus {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

fn http_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Patch => reqwest::Method::PATCH,
        Method::Delete => reqwest::Method::DELETE,
    }
}
