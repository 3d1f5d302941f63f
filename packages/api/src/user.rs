//! Users: `GET /users/{id}`, `GET /me`, and the `user` field embedded in
//! folders and videos.

use chrono::{DateTime, Utc};
use serde_json::Value;

use linkweft::{
    ConnectionMap, DecodeError, FieldKind, FieldSpec, Fields, Model, ModelType, WireEnum,
};

use crate::folder::Folder;
use crate::video::Video;

/// A user account.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    uri: String,
    name: Option<String>,
    link: Option<String>,
    location: Option<String>,
    bio: Option<String>,
    created_time: Option<DateTime<Utc>>,
    account: Option<AccountType>,
    resource_key: Option<String>,
    pictures: Option<Value>,
    connections: ConnectionMap<UserConnection>,
}

impl User {
    /// The user's canonical API path, e.g. `/users/152184`.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Public profile URL.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn created_time(&self) -> Option<DateTime<Utc>> {
        self.created_time
    }

    /// Membership level. Absent when the API sends a level this client
    /// does not know.
    pub fn account(&self) -> Option<AccountType> {
        self.account
    }

    pub fn resource_key(&self) -> Option<&str> {
        self.resource_key.as_deref()
    }

    /// Raw picture sizes, kept as JSON.
    pub fn pictures(&self) -> Option<&Value> {
        self.pictures.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserField {
    Uri,
    Name,
    Link,
    Location,
    Bio,
    CreatedTime,
    Account,
    ResourceKey,
    Pictures,
}

/// Connections a [`User`] exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserConnection {
    Videos,
    Folders,
    Followers,
    Following,
    Likes,
}

impl WireEnum for UserConnection {
    const CASES: &'static [(&'static str, Self)] = &[
        ("videos", UserConnection::Videos),
        ("folders", UserConnection::Folders),
        ("followers", UserConnection::Followers),
        ("following", UserConnection::Following),
        ("likes", UserConnection::Likes),
    ];
}

/// Membership level of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccountType {
    Basic,
    Plus,
    Pro,
    ProUnlimited,
    Business,
    LivePro,
    LiveBusiness,
    LivePremium,
    Producer,
    Enterprise,
}

impl WireEnum for AccountType {
    const CASES: &'static [(&'static str, Self)] = &[
        ("basic", AccountType::Basic),
        ("plus", AccountType::Plus),
        ("pro", AccountType::Pro),
        ("pro_unlimited", AccountType::ProUnlimited),
        ("business", AccountType::Business),
        ("live_pro", AccountType::LivePro),
        ("live_business", AccountType::LiveBusiness),
        ("live_premium", AccountType::LivePremium),
        ("producer", AccountType::Producer),
        ("enterprise", AccountType::Enterprise),
    ];
}

impl Model for User {
    const NAME: &'static str = "user";
    type Attr = UserField;
    type ConnectionKey = UserConnection;

    const FIELDS: &'static [FieldSpec<UserField>] = &[
        FieldSpec::required("uri", UserField::Uri, FieldKind::String),
        FieldSpec::optional("name", UserField::Name, FieldKind::String),
        FieldSpec::optional("link", UserField::Link, FieldKind::String),
        FieldSpec::optional("location", UserField::Location, FieldKind::String),
        FieldSpec::optional("bio", UserField::Bio, FieldKind::String),
        FieldSpec::optional("created_time", UserField::CreatedTime, FieldKind::Timestamp),
        FieldSpec::optional("account", UserField::Account, FieldKind::String),
        FieldSpec::optional("resource_key", UserField::ResourceKey, FieldKind::String),
        FieldSpec::optional("pictures", UserField::Pictures, FieldKind::Model),
    ];

    const CONNECTION_TARGETS: &'static [(UserConnection, ModelType)] = &[
        (UserConnection::Videos, ModelType::of::<Video>()),
        (UserConnection::Folders, ModelType::of::<Folder>()),
        (UserConnection::Followers, ModelType::of::<User>()),
        (UserConnection::Following, ModelType::of::<User>()),
        (UserConnection::Likes, ModelType::of::<Video>()),
    ];

    fn from_fields(
        mut fields: Fields<UserField>,
        connections: ConnectionMap<UserConnection>,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            uri: fields.require_string(UserField::Uri)?,
            name: fields.string(UserField::Name),
            link: fields.string(UserField::Link),
            location: fields.string(UserField::Location),
            bio: fields.string(UserField::Bio),
            created_time: fields.timestamp(UserField::CreatedTime),
            account: fields.enumeration(UserField::Account),
            resource_key: fields.string(UserField::ResourceKey),
            pictures: fields.json(UserField::Pictures),
            connections,
        })
    }

    fn connections(&self) -> &ConnectionMap<UserConnection> {
        &self.connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkweft::{connections, decode};
    use serde_json::json;

    fn payload() -> Value {
        json!({
            "uri": "/users/152184",
            "name": "Staff",
            "link": "https://vimeo.com/staff",
            "location": "New York",
            "bio": null,
            "created_time": "2008-01-16T16:15:48+00:00",
            "account": "business",
            "resource_key": "2f3c4e",
            "pictures": { "sizes": [{ "width": 30, "link": "https://i.vimeocdn.com/p/30" }] },
            "metadata": {
                "connections": {
                    "videos": { "uri": "/users/152184/videos", "options": ["GET"], "total": 300 },
                    "followers": { "uri": "/users/152184/followers", "options": ["GET"], "total": 9 },
                    "albums": { "uri": "/users/152184/albums", "options": ["GET"] }
                }
            }
        })
    }

    #[test]
    fn decodes_user() {
        let user: User = decode(&payload()).unwrap();
        assert_eq!(user.uri(), "/users/152184");
        assert_eq!(user.name(), Some("Staff"));
        assert_eq!(user.location(), Some("New York"));
        assert_eq!(user.bio(), None);
        assert_eq!(user.account(), Some(AccountType::Business));
        assert_eq!(user.resource_key(), Some("2f3c4e"));
        assert!(user.pictures().is_some());
    }

    #[test]
    fn unknown_account_type_is_absent() {
        let mut p = payload();
        p["account"] = json!("galactic");
        let user: User = decode(&p).unwrap();
        assert_eq!(user.account(), None);
    }

    #[test]
    fn connections_carry_declared_targets() {
        let user: User = decode(&payload()).unwrap();
        let conns = connections(&user);
        assert_eq!(conns.len(), 2);
        let videos = conns.get(UserConnection::Videos).unwrap();
        assert_eq!(videos.total(), Some(300));
        assert!(videos.target().unwrap().is::<Video>());
        let followers = conns.get(UserConnection::Followers).unwrap();
        assert!(followers.target().unwrap().is::<User>());
        assert!(conns.get(UserConnection::Folders).is_none());
    }

    #[test]
    fn uri_is_required() {
        let err = decode::<User>(&json!({ "name": "Nobody" })).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingRequiredField {
                model: "user",
                key: "uri"
            }
        );
    }
}
