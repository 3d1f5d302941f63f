//! Typed decoding of JSON API payloads, with hypermedia connections and
//! page cursors.
//!
//! This crate turns already-parsed JSON (`serde_json::Value`) into typed
//! models. It does no I/O: a transport fetches payloads, this crate decodes
//! them and tells the caller which request to send next.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`model`] | The [`Model`] contract, field tables, and [`decode`] |
//! | [`value`] | Scalar coercion (numeric strings, ISO 8601 timestamps, …) |
//! | [`resolve`] | Nested-type lookup by wire key via [`ModelType`] |
//! | [`enums`] | Tolerant closed-set enums via [`WireEnum`] |
//! | [`connection`] | Connection maps built from `metadata.connections` |
//! | [`page`] | [`Page`], [`PageCursor`], and [`RequestDescriptor`] |
//!
//! # Forward compatibility
//!
//! Unknown payload keys, unknown enum values, and unknown connection names
//! are dropped without error. Only a missing or unreadable *required* field
//! fails a decode. A malformed optional nested object degrades to absent.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use linkweft::{decode, next_page, Page};
//!
//! let folder: Folder = decode(&payload)?;
//! if let Some(videos) = folder.connections().get(FolderConnection::Videos) {
//!     let request = videos.request();
//!     // hand `request` to a transport, then:
//!     let page = Page::<Video>::decode(&response)?;
//!     let more = next_page(&page);
//! }
//! ```

pub mod connection;
pub mod enums;
pub mod error;
pub mod model;
pub mod page;
pub mod resolve;
pub mod value;

pub use connection::{Connection, ConnectionMap};
pub use enums::{NoConnections, WireEnum};
pub use error::DecodeError;
pub use model::{connections, decode, FieldSpec, Fields, Model};
pub use page::{next_page, CursorState, Method, Page, PageCursor, RequestDescriptor};
pub use resolve::{resolve_type, ModelType};
pub use value::FieldKind;
