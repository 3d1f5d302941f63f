//! Async HTTP access for `linkweft` models.
//!
//! | Type | Role |
//! |------|------|
//! | [`ClientConfig`] | API base, token, version, and limits read from the environment |
//! | [`Session`] | Explicit per-transport request context |
//! | [`Transport`] | Executes a [`linkweft::RequestDescriptor`] and returns JSON |
//! | [`HttpTransport`] | `reqwest`-backed [`Transport`] |
//! | [`Client`] | Typed fetches and paginated walks over any [`Transport`] |
//!
//! ```no_run
//! # async fn run() -> Result<(), linkweft_client::ClientError> {
//! use linkweft_api::Video;
//! use linkweft_client::{Client, ClientConfig, HttpTransport};
//!
//! let config = ClientConfig::from_env();
//! let http = reqwest::Client::builder()
//!     .timeout(config.timeout)
//!     .build()
//!     .map_err(linkweft_client::TransportError::from)?;
//! let session = config.session();
//! let first = session.default_videos_request();
//! let client = Client::new(HttpTransport::new(http, session));
//!
//! let walk = client.walk::<Video>(first, config.max_pages).await;
//! println!("{} videos", walk.items().len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod session;
pub mod transport;

pub use client::{Client, ClientError, Walk};
pub use config::ClientConfig;
pub use session::Session;
pub use transport::{HttpTransport, Transport, TransportError};
