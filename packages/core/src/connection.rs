//! Hypermedia connections read from a model's metadata block.
//!
//! The API attaches a `metadata.connections` object to most resources:
//!
//! ```json
//! "metadata": {
//!   "connections": {
//!     "videos": { "uri": "/users/1/folders/7/videos", "options": ["GET"], "total": 3 },
//!     "unrelated": { "uri": "/somewhere", "options": ["GET"] }
//!   }
//! }
//! ```
//!
//! The set of connection names is open-ended on the wire, but each model only
//! cares about a known subset. [`build`] keeps the entries whose name is a
//! case of the model's connection-key enum and ignores everything else.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::trace;

use crate::enums::WireEnum;
use crate::model::Model;
use crate::page::RequestDescriptor;
use crate::resolve::ModelType;
use crate::value;

/// Wire key of the connections section inside the metadata block.
pub const CONNECTIONS_KEY: &str = "connections";

/// One related-resource link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    name: String,
    uri: String,
    options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<u64>,
    #[serde(skip)]
    target: Option<ModelType>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    extra: Map<String, Value>,
}

impl Connection {
    /// The connection's wire name, e.g. `"videos"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The URI of the related resource, relative to the API base.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// HTTP methods the API allows on this connection.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Number of items behind the connection, when the API reports it.
    pub fn total(&self) -> Option<u64> {
        self.total
    }

    /// The model type the owning model declares for this connection.
    pub fn target(&self) -> Option<ModelType> {
        self.target
    }

    /// Link fields other than `uri`, `options`, and `total`.
    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }

    /// `true` if `method` is listed in [`Connection::options`] (case-insensitive).
    pub fn allows(&self, method: &str) -> bool {
        self.options.iter().any(|m| m.eq_ignore_ascii_case(method))
    }

    /// A `GET` request for the connected resource.
    pub fn request(&self) -> RequestDescriptor {
        RequestDescriptor::parse(&self.uri)
    }
}

/// Connections of one model instance, keyed by its connection-key enum.
///
/// Never contains a key outside `K`; lookups of anything else are simply
/// absent.
#[derive(Clone, PartialEq)]
pub struct ConnectionMap<K: WireEnum> {
    entries: HashMap<K, Connection>,
}

impl<K: WireEnum> ConnectionMap<K> {
    pub fn get(&self, key: K) -> Option<&Connection> {
        self.entries.get(&key)
    }

    pub fn contains(&self, key: K) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All connections in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &Connection)> {
        self.entries.iter().map(|(k, c)| (*k, c))
    }
}

impl<K: WireEnum> Default for ConnectionMap<K> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K: WireEnum> fmt::Debug for ConnectionMap<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

/// Build the connection map for key type `K` from a metadata block.
///
/// `targets` supplies the expected model type per key. Entries are skipped
/// when their name is not a case of `K`, their body is not an object, or the
/// body has no string `uri`.
pub fn build<K: WireEnum>(metadata: &Value, targets: &[(K, ModelType)]) -> ConnectionMap<K> {
    let mut map = ConnectionMap::default();

    let Some(links) = metadata.get(CONNECTIONS_KEY).and_then(Value::as_object) else {
        return map;
    };

    for (name, body) in links {
        let Some(key) = K::coerce(name) else {
            trace!("ignoring undeclared connection {name:?}");
            continue;
        };
        let Some(body) = body.as_object() else {
            continue;
        };
        let Some(uri) = body.get("uri").and_then(Value::as_str) else {
            trace!("ignoring connection {name:?} without a uri");
            continue;
        };

        let options = body
            .get("options")
            .and_then(value::coerce_string_list)
            .unwrap_or_default();
        let total = body
            .get("total")
            .and_then(value::coerce_i64)
            .and_then(|t| u64::try_from(t).ok());
        let extra = body
            .iter()
            .filter(|(k, _)| !matches!(k.as_str(), "uri" | "options" | "total"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let target = targets
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, model_type)| *model_type);

        map.entries.insert(
            key,
            Connection {
                name: name.clone(),
                uri: uri.to_owned(),
                options,
                total,
                target,
                extra,
            },
        );
    }

    map
}

/// Build the connections of model `M` from its metadata block.
pub fn build_connections<M: Model>(metadata: &Value) -> ConnectionMap<M::ConnectionKey> {
    build(metadata, M::CONNECTION_TARGETS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Key {
        Videos,
        Followers,
    }

    impl WireEnum for Key {
        const CASES: &'static [(&'static str, Self)] =
            &[("videos", Key::Videos), ("followers", Key::Followers)];
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum VideosOnly {
        Videos,
    }

    impl WireEnum for VideosOnly {
        const CASES: &'static [(&'static str, Self)] = &[("videos", VideosOnly::Videos)];
    }

    fn metadata() -> Value {
        json!({
            "connections": {
                "videos": {
                    "uri": "/users/1/folders/7/videos",
                    "options": ["GET", "PATCH"],
                    "total": 3
                },
                "unrelated": { "uri": "/elsewhere", "options": ["GET"] }
            },
            "interactions": {}
        })
    }

    #[test]
    fn keeps_only_declared_keys() {
        let map = build::<VideosOnly>(&metadata(), &[]);
        assert_eq!(map.len(), 1);
        assert!(map.contains(VideosOnly::Videos));
        let videos = map.get(VideosOnly::Videos).unwrap();
        assert_eq!(videos.name(), "videos");
        assert_eq!(videos.uri(), "/users/1/folders/7/videos");
        assert_eq!(videos.total(), Some(3));
        assert!(videos.allows("get"));
        assert!(videos.allows("PATCH"));
        assert!(!videos.allows("DELETE"));
    }

    #[test]
    fn declared_but_absent_key_is_not_present() {
        let map = build::<Key>(&metadata(), &[]);
        assert_eq!(map.len(), 1);
        assert!(map.get(Key::Followers).is_none());
    }

    #[test]
    fn entries_without_uri_are_skipped() {
        let meta = json!({
            "connections": {
                "videos": { "options": ["GET"], "total": 1 },
                "followers": "not an object"
            }
        });
        assert!(build::<Key>(&meta, &[]).is_empty());
    }

    #[test]
    fn missing_connections_section_is_empty() {
        assert!(build::<Key>(&json!({}), &[]).is_empty());
        assert!(build::<Key>(&json!("metadata"), &[]).is_empty());
    }

    #[test]
    fn numeric_string_total_and_extra_fields() {
        let meta = json!({
            "connections": {
                "followers": { "uri": "/users/1/followers", "total": "12", "name": "Followers" }
            }
        });
        let map = build::<Key>(&meta, &[]);
        let followers = map.get(Key::Followers).unwrap();
        assert_eq!(followers.total(), Some(12));
        assert!(followers.options().is_empty());
        assert_eq!(followers.extra().get("name"), Some(&json!("Followers")));
    }

    #[test]
    fn negative_total_is_dropped() {
        let meta = json!({ "connections": { "videos": { "uri": "/v", "total": -1 } } });
        let map = build::<Key>(&meta, &[]);
        assert_eq!(map.get(Key::Videos).unwrap().total(), None);
    }

    #[test]
    fn connection_request_follows_uri() {
        let map = build::<Key>(&metadata(), &[]);
        let request = map.get(Key::Videos).unwrap().request();
        assert_eq!(request.path(), "/users/1/folders/7/videos");
        assert!(request.query().is_empty());
    }
}
