//! Session: the explicit context every request is made in.
//!
//! A [`Session`] carries the API base URL, the optional bearer token, and
//! the API version. There is no process-wide default: each transport owns
//! its own session, so several independent sessions (different accounts,
//! different test servers) can coexist.

use linkweft::RequestDescriptor;

/// The API location and credentials a transport uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    api_base: String,
    access_token: Option<String>,
    api_version: String,
}

impl Session {
    /// An unauthenticated session against `api_base`.
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            access_token: None,
            api_version: "3.4".into(),
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// `Accept` header value selecting the configured API version.
    pub fn accept_header(&self) -> String {
        format!("application/vnd.vimeo.*+json;version={}", self.api_version)
    }

    /// `{api_base}{path}?{query}` for `request`.
    pub fn url_for(&self, request: &RequestDescriptor) -> String {
        format!("{}{}", self.api_base, request.path_and_query())
    }

    /// The default video listing: the caller's own videos when
    /// authenticated, the public staff picks otherwise.
    pub fn default_videos_request(&self) -> RequestDescriptor {
        if self.is_authenticated() {
            RequestDescriptor::get("/me/videos")
        } else {
            RequestDescriptor::get("/channels/staffpicks/videos")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("https://api.example.com/")
    }

    #[test]
    fn strips_trailing_slash() {
        assert_eq!(session().api_base(), "https://api.example.com");
    }

    #[test]
    fn url_for_joins_path_and_query() {
        let req = RequestDescriptor::parse("/me/videos?page=2&per_page=25");
        assert_eq!(
            session().url_for(&req),
            "https://api.example.com/me/videos?page=2&per_page=25"
        );
    }

    #[test]
    fn accept_header_carries_version() {
        assert_eq!(
            session().with_api_version("3.2").accept_header(),
            "application/vnd.vimeo.*+json;version=3.2"
        );
    }

    #[test]
    fn default_videos_depends_on_authentication() {
        assert_eq!(
            session().default_videos_request().path(),
            "/channels/staffpicks/videos"
        );
        assert_eq!(
            session()
                .with_access_token("t")
                .default_videos_request()
                .path(),
            "/me/videos"
        );
    }

    #[test]
    fn sessions_are_independent() {
        let a = session().with_access_token("a");
        let b = session();
        assert!(a.is_authenticated());
        assert!(!b.is_authenticated());
    }
}
