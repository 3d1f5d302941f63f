//! Videos: `GET /videos/{id}`, `GET /me/videos`, `GET /channels/{id}/videos`.

use chrono::{DateTime, Utc};
use serde_json::Value;

use linkweft::{
    ConnectionMap, DecodeError, FieldKind, FieldSpec, Fields, Model, ModelType, WireEnum,
};

use crate::user::User;

/// A video.
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    uri: String,
    name: Option<String>,
    description: Option<String>,
    link: Option<String>,
    duration: Option<i64>,
    width: Option<i64>,
    height: Option<i64>,
    created_time: Option<DateTime<Utc>>,
    modified_time: Option<DateTime<Utc>>,
    release_time: Option<DateTime<Utc>>,
    status: Option<VideoStatus>,
    content_rating: Option<Vec<String>>,
    privacy: Option<Value>,
    pictures: Option<Value>,
    user: Option<User>,
    connections: ConnectionMap<VideoConnection>,
}

impl Video {
    /// The video's canonical API path, e.g. `/videos/76979871`.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Public page URL.
    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    /// Length in whole seconds.
    pub fn duration(&self) -> Option<i64> {
        self.duration
    }

    pub fn width(&self) -> Option<i64> {
        self.width
    }

    pub fn height(&self) -> Option<i64> {
        self.height
    }

    pub fn created_time(&self) -> Option<DateTime<Utc>> {
        self.created_time
    }

    pub fn modified_time(&self) -> Option<DateTime<Utc>> {
        self.modified_time
    }

    pub fn release_time(&self) -> Option<DateTime<Utc>> {
        self.release_time
    }

    pub fn status(&self) -> Option<VideoStatus> {
        self.status
    }

    pub fn content_rating(&self) -> Option<&[String]> {
        self.content_rating.as_deref()
    }

    /// Privacy settings, kept as JSON.
    pub fn privacy(&self) -> Option<&Value> {
        self.privacy.as_ref()
    }

    /// Thumbnail sizes, kept as JSON.
    pub fn pictures(&self) -> Option<&Value> {
        self.pictures.as_ref()
    }

    /// The uploader. Absent when missing or malformed.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoField {
    Uri,
    Name,
    Description,
    Link,
    Duration,
    Width,
    Height,
    CreatedTime,
    ModifiedTime,
    ReleaseTime,
    Status,
    ContentRating,
    Privacy,
    Pictures,
    User,
}

/// Connections a [`Video`] exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoConnection {
    Comments,
    Credits,
    Likes,
    Pictures,
    Texttracks,
    Related,
}

impl WireEnum for VideoConnection {
    const CASES: &'static [(&'static str, Self)] = &[
        ("comments", VideoConnection::Comments),
        ("credits", VideoConnection::Credits),
        ("likes", VideoConnection::Likes),
        ("pictures", VideoConnection::Pictures),
        ("texttracks", VideoConnection::Texttracks),
        ("related", VideoConnection::Related),
    ];
}

/// Processing state of a video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoStatus {
    Available,
    Uploading,
    Transcoding,
    UploadingError,
    TranscodingError,
    QuotaExceeded,
    TotalCapExceeded,
    Unavailable,
}

impl WireEnum for VideoStatus {
    const CASES: &'static [(&'static str, Self)] = &[
        ("available", VideoStatus::Available),
        ("uploading", VideoStatus::Uploading),
        ("transcoding", VideoStatus::Transcoding),
        ("uploading_error", VideoStatus::UploadingError),
        ("transcoding_error", VideoStatus::TranscodingError),
        ("quota_exceeded", VideoStatus::QuotaExceeded),
        ("total_cap_exceeded", VideoStatus::TotalCapExceeded),
        ("unavailable", VideoStatus::Unavailable),
    ];
}

impl Model for Video {
    const NAME: &'static str = "video";
    type Attr = VideoField;
    type ConnectionKey = VideoConnection;

    const FIELDS: &'static [FieldSpec<VideoField>] = &[
        FieldSpec::required("uri", VideoField::Uri, FieldKind::String),
        FieldSpec::optional("name", VideoField::Name, FieldKind::String),
        FieldSpec::optional("description", VideoField::Description, FieldKind::String),
        FieldSpec::optional("link", VideoField::Link, FieldKind::String),
        FieldSpec::optional("duration", VideoField::Duration, FieldKind::Integer),
        FieldSpec::optional("width", VideoField::Width, FieldKind::Integer),
        FieldSpec::optional("height", VideoField::Height, FieldKind::Integer),
        FieldSpec::optional("created_time", VideoField::CreatedTime, FieldKind::Timestamp),
        FieldSpec::optional("modified_time", VideoField::ModifiedTime, FieldKind::Timestamp),
        FieldSpec::optional("release_time", VideoField::ReleaseTime, FieldKind::Timestamp),
        FieldSpec::optional("status", VideoField::Status, FieldKind::String),
        FieldSpec::optional("content_rating", VideoField::ContentRating, FieldKind::StringList),
        FieldSpec::optional("privacy", VideoField::Privacy, FieldKind::Model),
        FieldSpec::optional("pictures", VideoField::Pictures, FieldKind::Model),
        FieldSpec::optional("user", VideoField::User, FieldKind::Model),
    ];

    const NESTED: &'static [(&'static str, ModelType)] = &[("user", ModelType::of::<User>())];

    const CONNECTION_TARGETS: &'static [(VideoConnection, ModelType)] = &[
        (VideoConnection::Likes, ModelType::of::<User>()),
        (VideoConnection::Related, ModelType::of::<Video>()),
    ];

    fn from_fields(
        mut fields: Fields<VideoField>,
        connections: ConnectionMap<VideoConnection>,
    ) -> Result<Self, DecodeError> {
        Ok(Self {
            uri: fields.require_string(VideoField::Uri)?,
            name: fields.string(VideoField::Name),
            description: fields.string(VideoField::Description),
            link: fields.string(VideoField::Link),
            duration: fields.integer(VideoField::Duration),
            width: fields.integer(VideoField::Width),
            height: fields.integer(VideoField::Height),
            created_time: fields.timestamp(VideoField::CreatedTime),
            modified_time: fields.timestamp(VideoField::ModifiedTime),
            release_time: fields.timestamp(VideoField::ReleaseTime),
            status: fields.enumeration(VideoField::Status),
            content_rating: fields.strings(VideoField::ContentRating),
            privacy: fields.json(VideoField::Privacy),
            pictures: fields.json(VideoField::Pictures),
            user: fields.model(VideoField::User),
            connections,
        })
    }

    fn connections(&self) -> &ConnectionMap<VideoConnection> {
        &self.connections
    }
}
