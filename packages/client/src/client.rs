//! Typed fetches on top of a [`Transport`].
//!
//! [`Client`] pairs a transport with the decoders in `linkweft`: it executes
//! a [`RequestDescriptor`], decodes the body as a model or a page, and can
//! walk a paginated collection until it runs out of pages, hits a page
//! limit, or fails.

use tracing::{debug, info, warn};

use linkweft::{
    decode, Connection, DecodeError, Model, ModelType, Page, PageCursor, RequestDescriptor,
};

use crate::transport::{Transport, TransportError};

// ---------------------------------------------------------------------------
// ClientError
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A connection was followed as a collection of the wrong model type.
    #[error("connection '{connection}' points at {expected}, not {requested}")]
    TargetMismatch {
        connection: String,
        expected: &'static str,
        requested: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Walk
// ---------------------------------------------------------------------------

/// The outcome of walking a paginated collection.
///
/// Items from every page decoded before a failure are kept; `error` records
/// what stopped the walk early, if anything.
#[derive(Debug)]
pub struct Walk<M> {
    items: Vec<M>,
    pages: usize,
    next: Option<RequestDescriptor>,
    error: Option<ClientError>,
}

impl<M> Walk<M> {
    /// All items in page order.
    pub fn items(&self) -> &[M] {
        &self.items
    }

    pub fn into_items(self) -> Vec<M> {
        self.items
    }

    /// Number of pages successfully decoded.
    pub fn pages(&self) -> usize {
        self.pages
    }

    /// The request that would continue the walk, if the collection has more
    /// pages (or the failing request, if the walk stopped on an error).
    pub fn next(&self) -> Option<&RequestDescriptor> {
        self.next.as_ref()
    }

    pub fn error(&self) -> Option<&ClientError> {
        self.error.as_ref()
    }

    /// `true` if the last page was reached without error.
    pub fn is_complete(&self) -> bool {
        self.error.is_none() && self.next.is_none()
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Executes requests through `T` and decodes the responses.
#[derive(Debug, Clone)]
pub struct Client<T> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch a single resource and decode it as `M`.
    pub async fn fetch<M: Model>(&self, request: &RequestDescriptor) -> Result<M, ClientError> {
        let body = self.transport.execute(request).await?;
        Ok(decode::<M>(&body)?)
    }

    /// Fetch one page of a collection of `M`.
    pub async fn fetch_page<M: Model>(
        &self,
        request: &RequestDescriptor,
    ) -> Result<Page<M>, ClientError> {
        let body = self.transport.execute(request).await?;
        Ok(Page::<M>::decode(&body)?)
    }

    /// Fetch the first page behind `connection`, decoded as `M`.
    ///
    /// Fails with [`ClientError::TargetMismatch`] when the owning model
    /// declared a different target type for the connection.
    pub async fn follow_page<M: Model>(
        &self,
        connection: &Connection,
    ) -> Result<Page<M>, ClientError> {
        check_target::<M>(connection)?;
        self.fetch_page::<M>(&connection.request()).await
    }

    /// Walk the collection starting at `first`, fetching at most `max_pages`
    /// pages.
    ///
    /// Never fails as a whole: the returned [`Walk`] holds whatever was
    /// decoded plus the error that ended the walk, if any.
    pub async fn walk<M: Model>(&self, first: RequestDescriptor, max_pages: usize) -> Walk<M> {
        let mut cursor = PageCursor::<M>::new(first);
        let mut items = Vec::new();
        let mut error = None;

        while cursor.pages_fetched() < max_pages {
            let Some(request) = cursor.pending().cloned() else {
                break;
            };
            debug!("walk: fetching {request}");

            let body = match self.transport.execute(&request).await {
                Ok(body) => body,
                Err(e) => {
                    warn!("walk: request {request} failed: {e}");
                    error = Some(ClientError::Transport(e));
                    break;
                }
            };

            match cursor.advance(&body) {
                Ok(page) => {
                    info!(
                        "walk: page {} of {} {}: {} item(s)",
                        cursor.pages_fetched(),
                        M::NAME,
                        request,
                        page.len()
                    );
                    items.extend(page.into_items());
                }
                Err(e) => {
                    warn!("walk: page from {request} did not decode: {e}");
                    error = Some(ClientError::Decode(e));
                    break;
                }
            }
        }

        debug!(
            "walk: {} {} item(s) across {} page(s)",
            items.len(),
            M::NAME,
            cursor.pages_fetched()
        );

        Walk {
            items,
            pages: cursor.pages_fetched(),
            next: cursor.pending().cloned(),
            error,
        }
    }
}

fn check_target<M: Model>(connection: &Connection) -> Result<(), ClientError> {
    match connection.target() {
        Some(target) if !target.is::<M>() => Err(ClientError::TargetMismatch {
            connection: connection.name().to_string(),
            expected: target.name(),
            requested: ModelType::of::<M>().name(),
        }),
        _ => Ok(()),
    }
}
