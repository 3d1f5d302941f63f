//! Paginated collections and the request cursor that walks them.
//!
//! A collection endpoint answers with one page of items plus paging links:
//!
//! ```json
//! {
//!   "total": 3, "page": 1, "per_page": 2,
//!   "paging": {
//!     "next": "/me/videos?page=2&per_page=2",
//!     "previous": null,
//!     "first": "/me/videos?page=1&per_page=2",
//!     "last": "/me/videos?page=2&per_page=2"
//!   },
//!   "data": [ { ... }, { ... } ]
//! }
//! ```
//!
//! [`Page::decode`] turns that into ordered items and, when a `next` link is
//! present, a ready-to-send [`RequestDescriptor`]. [`PageCursor`] tracks a
//! whole walk without doing any I/O: the caller executes
//! [`PageCursor::pending`] with its transport and feeds the response back
//! through [`PageCursor::advance`].

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use urlencoding::{decode as percent_decode, encode};

use crate::error::DecodeError;
use crate::model::{decode, Model};
use crate::value;

// ---------------------------------------------------------------------------
// RequestDescriptor
// ---------------------------------------------------------------------------

/// HTTP method of a logical request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A logical request: method, API path, and ordered query parameters.
///
/// This is not an HTTP request. The transport joins it to its base URL and
/// adds whatever headers it needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    #[serde(default)]
    method: Method,
    path: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    query: Vec<(String, String)>,
}

impl RequestDescriptor {
    /// A `GET` for `path` with no query.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: normalise_path(path.into()),
            query: Vec::new(),
        }
    }

    /// Parse a link as returned by the API, e.g. `/me/videos?page=2&per_page=25`.
    ///
    /// Absolute links (`https://host/me/videos?...`) are reduced to their path
    /// and query. Query keys and values are percent-decoded; a value that
    /// does not decode to UTF-8 is kept verbatim.
    pub fn parse(link: &str) -> Self {
        let link = strip_origin(link.trim());
        let (path, query) = match link.split_once('?') {
            Some((path, query)) => (path, query),
            None => (link, ""),
        };
        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(k), decode_component(v))
            })
            .collect();
        Self {
            method: Method::Get,
            path: normalise_path(path.to_owned()),
            query,
        }
    }

    /// Append a query parameter, replacing any existing value for `key`.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self.query.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.query.push((key, value)),
        }
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// The first value of query parameter `key`.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Path plus percent-encoded query, e.g. `/me/videos?page=2`.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", encode(k), encode(v)))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path_and_query())
    }
}

fn strip_origin(link: &str) -> &str {
    for scheme in ["https://", "http://"] {
        if let Some(rest) = link.strip_prefix(scheme) {
            return rest.find('/').map_or("/", |i| &rest[i..]);
        }
    }
    link
}

fn normalise_path(path: String) -> String {
    if path.starts_with('/') {
        path
    } else {
        format!("/{path}")
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match percent_decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// One decoded page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<M> {
    items: Vec<M>,
    total: Option<u64>,
    page: Option<u64>,
    per_page: Option<u64>,
    next: Option<RequestDescriptor>,
    previous: Option<RequestDescriptor>,
    first: Option<RequestDescriptor>,
    last: Option<RequestDescriptor>,
}

impl<M: Model> Page<M> {
    /// Decode a collection payload.
    ///
    /// Items keep their payload order. Any item that fails to decode fails
    /// the whole page with [`DecodeError::Item`]. A bare JSON array is read
    /// as a single, final page.
    pub fn decode(payload: &Value) -> Result<Self, DecodeError> {
        if let Some(items) = payload.as_array() {
            return Ok(Self::terminal(decode_items(items)?));
        }

        let items = payload
            .get("data")
            .and_then(Value::as_array)
            .ok_or(DecodeError::MissingPageData)?;
        let count = |key: &str| {
            payload
                .get(key)
                .and_then(value::coerce_i64)
                .and_then(|n| u64::try_from(n).ok())
        };
        let paging = payload.get("paging");
        let link = |key: &str| {
            paging
                .and_then(|p| p.get(key))
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(RequestDescriptor::parse)
        };

        Ok(Self {
            items: decode_items(items)?,
            total: count("total"),
            page: count("page"),
            per_page: count("per_page"),
            next: link("next"),
            previous: link("previous"),
            first: link("first"),
            last: link("last"),
        })
    }
}

impl<M> Page<M> {
    fn terminal(items: Vec<M>) -> Self {
        Self {
            items,
            total: None,
            page: None,
            per_page: None,
            next: None,
            previous: None,
            first: None,
            last: None,
        }
    }

    pub fn items(&self) -> &[M] {
        &self.items
    }

    pub fn into_items(self) -> Vec<M> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total items across all pages, when reported.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// 1-based page number, when reported.
    pub fn page(&self) -> Option<u64> {
        self.page
    }

    pub fn per_page(&self) -> Option<u64> {
        self.per_page
    }

    /// The request for the following page; `None` on the last page.
    pub fn next_request(&self) -> Option<&RequestDescriptor> {
        self.next.as_ref()
    }

    pub fn previous_request(&self) -> Option<&RequestDescriptor> {
        self.previous.as_ref()
    }

    pub fn first_request(&self) -> Option<&RequestDescriptor> {
        self.first.as_ref()
    }

    pub fn last_request(&self) -> Option<&RequestDescriptor> {
        self.last.as_ref()
    }
}

fn decode_items<M: Model>(items: &[Value]) -> Result<Vec<M>, DecodeError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            decode::<M>(item).map_err(|e| DecodeError::Item {
                index,
                source: Box::new(e),
            })
        })
        .collect()
}

/// The request for the page after `page`, or `None` when `page` is the last.
pub fn next_page<M>(page: &Page<M>) -> Option<&RequestDescriptor> {
    page.next_request()
}

// ---------------------------------------------------------------------------
// PageCursor
// ---------------------------------------------------------------------------

/// Where a [`PageCursor`] is in its walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    /// The first request has not been answered yet.
    Initial,
    /// At least one page has been decoded and another one is available.
    Fetched,
    /// The last decoded page had no `next` link.
    Exhausted,
}

/// Sequential walk over a paginated collection of `M`.
///
/// The cursor never performs I/O and never keeps the pages it decodes: every
/// [`Page`] returned by [`PageCursor::advance`] belongs to the caller and
/// stays valid whatever happens to later requests. A payload that fails to
/// decode leaves the cursor where it was, so the same request can be retried.
pub struct PageCursor<M> {
    state: CursorState,
    pending: Option<RequestDescriptor>,
    pages: usize,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> PageCursor<M> {
    /// Start a walk at `first`.
    pub fn new(first: RequestDescriptor) -> Self {
        Self {
            state: CursorState::Initial,
            pending: Some(first),
            pages: 0,
            _model: PhantomData,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    /// The request to execute next; `None` once exhausted.
    pub fn pending(&self) -> Option<&RequestDescriptor> {
        self.pending.as_ref()
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == CursorState::Exhausted
    }

    /// Number of pages decoded so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Decode the response to [`PageCursor::pending`] and move to the next state.
    pub fn advance(&mut self, payload: &Value) -> Result<Page<M>, DecodeError> {
        if self.is_exhausted() {
            return Err(DecodeError::CursorExhausted);
        }
        let page = Page::<M>::decode(payload)?;
        self.pending = page.next_request().cloned();
        self.state = if self.pending.is_some() {
            CursorState::Fetched
        } else {
            CursorState::Exhausted
        };
        self.pages += 1;
        Ok(page)
    }
}

impl<M> fmt::Debug for PageCursor<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageCursor")
            .field("state", &self.state)
            .field("pending", &self.pending)
            .field("pages", &self.pages)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
