//! Typed models for the Vimeo-style REST API.
//!
//! Each model implements [`linkweft::Model`] through a static field table,
//! a nested-type table, and a connection-key enum. Decode them with
//! [`linkweft::decode`] or, for collections, [`linkweft::Page::decode`].
//!
//! # Endpoints covered
//!
//! | Method | Path | Type |
//! |--------|------|------|
//! | GET | `/me`, `/users/{id}` | [`User`] |
//! | GET | `/users/{id}/folders/{folder_id}` | [`Folder`] |
//! | GET | `/me/folders`, `/users/{id}/folders` | page of [`Folder`] |
//! | GET | `/videos/{id}` | [`Video`] |
//! | GET | `/me/videos`, `/channels/{id}/videos` | page of [`Video`] |
//! | any | non-2xx | [`ErrorResponse`] |

pub mod error;
pub mod folder;
pub mod render;
pub mod user;
pub mod video;

pub use error::ErrorResponse;
pub use folder::{Folder, FolderConnection, FolderField, SlackLanguagePreference, SlackUserPreference};
pub use render::{render_page, Render};
pub use user::{AccountType, User, UserConnection, UserField};
pub use video::{Video, VideoConnection, VideoField, VideoStatus};
