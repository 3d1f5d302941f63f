//! Folders: `GET /users/{id}/folders/{folder_id}` and friends.
//!
//! A folder groups videos and can be wired to a Slack channel. Its Slack
//! settings arrive as raw strings; they are also exposed as
//! [`SlackLanguagePreference`] and [`SlackUserPreference`] values, with
//! unknown strings dropped.

use chrono::{DateTime, NaiveDate, Utc};

use linkweft::{
    ConnectionMap, DecodeError, FieldKind, FieldSpec, Fields, Model, ModelType, WireEnum,
};

use crate::user::User;
use crate::video::Video;

/// A folder of videos.
#[derive(Debug, Clone, PartialEq)]
pub struct Folder {
    created_time: DateTime<Utc>,
    modified_time: Option<DateTime<Utc>>,
    name: Option<String>,
    resource_key: Option<String>,
    slack_incoming_webhooks_id: Option<i64>,
    slack_integration_channel: Option<String>,
    slack_language_preference: Option<String>,
    slack_user_preferences: Option<Vec<String>>,
    uri: Option<String>,
    user: Option<User>,
    language_preference: Option<SlackLanguagePreference>,
    user_preferences: Option<Vec<SlackUserPreference>>,
    connections: ConnectionMap<FolderConnection>,
}

impl Folder {
    pub fn created_time(&self) -> DateTime<Utc> {
        self.created_time
    }

    /// Calendar date of [`Folder::created_time`] in UTC.
    pub fn created_date(&self) -> NaiveDate {
        self.created_time.date_naive()
    }

    pub fn modified_time(&self) -> Option<DateTime<Utc>> {
        self.modified_time
    }

    /// Calendar date of [`Folder::modified_time`] in UTC.
    pub fn modified_date(&self) -> Option<NaiveDate> {
        self.modified_time.map(|t| t.date_naive())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn resource_key(&self) -> Option<&str> {
        self.resource_key.as_deref()
    }

    pub fn slack_incoming_webhooks_id(&self) -> Option<i64> {
        self.slack_incoming_webhooks_id
    }

    pub fn slack_integration_channel(&self) -> Option<&str> {
        self.slack_integration_channel.as_deref()
    }

    /// The Slack notification language exactly as sent.
    pub fn slack_language_preference(&self) -> Option<&str> {
        self.slack_language_preference.as_deref()
    }

    /// The Slack notification preferences exactly as sent.
    pub fn slack_user_preferences(&self) -> Option<&[String]> {
        self.slack_user_preferences.as_deref()
    }

    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// The owner of the folder. Absent when missing or malformed.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn language_preference(&self) -> Option<SlackLanguagePreference> {
        self.language_preference
    }

    /// Known Slack notification preferences, in payload order.
    pub fn user_preferences(&self) -> Option<&[SlackUserPreference]> {
        self.user_preferences.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderField {
    CreatedTime,
    ModifiedTime,
    Name,
    ResourceKey,
    SlackIncomingWebhooksId,
    SlackIntegrationChannel,
    SlackLanguagePreference,
    SlackUserPreferences,
    Uri,
    User,
}

/// Connections a [`Folder`] exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FolderConnection {
    Videos,
}

impl WireEnum for FolderConnection {
    const CASES: &'static [(&'static str, Self)] = &[("videos", FolderConnection::Videos)];
}

/// Language used for Slack notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlackLanguagePreference {
    De,
    En,
    Es,
    Fr,
    Ja,
    Ko,
    Pt,
}

impl WireEnum for SlackLanguagePreference {
    const CASES: &'static [(&'static str, Self)] = &[
        ("de-DE", SlackLanguagePreference::De),
        ("en", SlackLanguagePreference::En),
        ("es", SlackLanguagePreference::Es),
        ("fr-FR", SlackLanguagePreference::Fr),
        ("ja-JP", SlackLanguagePreference::Ja),
        ("ko-KR", SlackLanguagePreference::Ko),
        ("pt-BR", SlackLanguagePreference::Pt),
    ];
}

/// Events that trigger a Slack notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlackUserPreference {
    CollectionChange,
    PrivacyChange,
    ReviewPage,
    VideoDetail,
}

impl WireEnum for SlackUserPreference {
    const CASES: &'static [(&'static str, Self)] = &[
        ("COLLECTION_CHANGE", SlackUserPreference::CollectionChange),
        ("PRIVACY_CHANGE", SlackUserPreference::PrivacyChange),
        ("REVIEW_PAGE", SlackUserPreference::ReviewPage),
        ("VIDEO_DETAIL", SlackUserPreference::VideoDetail),
    ];
}

impl Model for Folder {
    const NAME: &'static str = "folder";
    type Attr = FolderField;
    type ConnectionKey = FolderConnection;

    const FIELDS: &'static [FieldSpec<FolderField>] = &[
        FieldSpec::required("created_time", FolderField::CreatedTime, FieldKind::Timestamp),
        FieldSpec::optional("modified_time", FolderField::ModifiedTime, FieldKind::Timestamp),
        FieldSpec::optional("name", FolderField::Name, FieldKind::String),
        FieldSpec::optional("resource_key", FolderField::ResourceKey, FieldKind::String),
        FieldSpec::optional(
            "slack_incoming_webhooks_id",
            FolderField::SlackIncomingWebhooksId,
            FieldKind::Integer,
        ),
        FieldSpec::optional(
            "slack_integration_channel",
            FolderField::SlackIntegrationChannel,
            FieldKind::String,
        ),
        FieldSpec::optional(
            "slack_language_preference",
            FolderField::SlackLanguagePreference,
            FieldKind::String,
        ),
        FieldSpec::optional(
            "slack_user_preferences",
            FolderField::SlackUserPreferences,
            FieldKind::StringList,
        ),
        FieldSpec::optional("uri", FolderField::Uri, FieldKind::String),
        FieldSpec::optional("user", FolderField::User, FieldKind::Model),
    ];

    const NESTED: &'static [(&'static str, ModelType)] = &[("user", ModelType::of::<User>())];

    const CONNECTION_TARGETS: &'static [(FolderConnection, ModelType)] =
        &[(FolderConnection::Videos, ModelType::of::<Video>())];

    fn from_fields(
        mut fields: Fields<FolderField>,
        connections: ConnectionMap<FolderConnection>,
    ) -> Result<Self, DecodeError> {
        let slack_language_preference = fields.string(FolderField::SlackLanguagePreference);
        let slack_user_preferences = fields.strings(FolderField::SlackUserPreferences);
        let language_preference = slack_language_preference
            .as_deref()
            .and_then(SlackLanguagePreference::coerce);
        let user_preferences = slack_user_preferences
            .as_ref()
            .map(|raw| SlackUserPreference::coerce_all(raw));

        Ok(Self {
            created_time: fields.require_timestamp(FolderField::CreatedTime)?,
            modified_time: fields.timestamp(FolderField::ModifiedTime),
            name: fields.string(FolderField::Name),
            resource_key: fields.string(FolderField::ResourceKey),
            slack_incoming_webhooks_id: fields.integer(FolderField::SlackIncomingWebhooksId),
            slack_integration_channel: fields.string(FolderField::SlackIntegrationChannel),
            slack_language_preference,
            slack_user_preferences,
            uri: fields.string(FolderField::Uri),
            user: fields.model(FolderField::User),
            language_preference,
            user_preferences,
            connections,
        })
    }

    fn connections(&self) -> &ConnectionMap<FolderConnection> {
        &self.connections
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkweft::{connections, decode};
    use serde_json::{json, Value};

    fn payload() -> Value {
        json!({
            "created_time": "2019-06-04T15:22:09+00:00",
            "modified_time": "2019-06-05T09:00:00+00:00",
            "name": "Launch assets",
            "resource_key": "a1b2c3",
            "slack_incoming_webhooks_id": "4412",
            "slack_integration_channel": "#video-review",
            "slack_language_preference": "fr-FR",
            "slack_user_preferences": ["REVIEW_PAGE", "VIDEO_DETAIL"],
            "uri": "/users/10/projects/7",
            "user": { "uri": "/users/10", "name": "Ada" },
            "metadata": {
                "connections": {
                    "videos": { "uri": "/users/10/projects/7/videos", "options": ["GET"], "total": 4 },
                    "unrelated": { "uri": "/users/10/somewhere", "options": ["GET"] }
                }
            }
        })
    }

    #[test]
    fn decodes_every_scalar() {
        let folder: Folder = decode(&payload()).unwrap();
        assert_eq!(folder.created_time().to_rfc3339(), "2019-06-04T15:22:09+00:00");
        assert_eq!(folder.created_date(), NaiveDate::from_ymd_opt(2019, 6, 4).unwrap());
        assert_eq!(folder.modified_date(), NaiveDate::from_ymd_opt(2019, 6, 5));
        assert_eq!(folder.name(), Some("Launch assets"));
        assert_eq!(folder.resource_key(), Some("a1b2c3"));
        assert_eq!(folder.slack_incoming_webhooks_id(), Some(4412));
        assert_eq!(folder.slack_integration_channel(), Some("#video-review"));
        assert_eq!(folder.slack_language_preference(), Some("fr-FR"));
        assert_eq!(folder.language_preference(), Some(SlackLanguagePreference::Fr));
        assert_eq!(
            folder.user_preferences(),
            Some(&[SlackUserPreference::ReviewPage, SlackUserPreference::VideoDetail][..])
        );
        assert_eq!(folder.uri(), Some("/users/10/projects/7"));
        assert_eq!(folder.user().map(|u| u.uri()), Some("/users/10"));
    }

    #[test]
    fn minimal_payload_with_unknown_preference() {
        let folder: Folder = decode(&json!({
            "created_time": "2019-01-01T00:00:00Z",
            "slack_user_preferences": ["VIDEO_DETAIL", "NOPE"]
        }))
        .unwrap();
        assert_eq!(folder.created_date(), NaiveDate::from_ymd_opt(2019, 1, 1).unwrap());
        assert_eq!(
            folder.user_preferences(),
            Some(&[SlackUserPreference::VideoDetail][..])
        );
        assert_eq!(
            folder.slack_user_preferences(),
            Some(&["VIDEO_DETAIL".to_string(), "NOPE".to_string()][..])
        );
        assert_eq!(folder.modified_date(), None);
        assert!(folder.user().is_none());
        assert!(connections(&folder).is_empty());
    }

    #[test]
    fn unknown_language_is_absent_but_raw_is_kept() {
        let mut p = payload();
        p["slack_language_preference"] = json!("tlh");
        let folder: Folder = decode(&p).unwrap();
        assert_eq!(folder.language_preference(), None);
        assert_eq!(folder.slack_language_preference(), Some("tlh"));
    }

    #[test]
    fn malformed_user_degrades_to_absent() {
        let mut p = payload();
        p["user"] = json!({ "name": "missing its uri" });
        let folder: Folder = decode(&p).unwrap();
        assert!(folder.user().is_none());
        assert_eq!(folder.name(), Some("Launch assets"));
    }

    #[test]
    fn missing_created_time_fails() {
        let mut p = payload();
        p["user"] = json!({ "name": "missing its uri" });
        p.as_object_mut().unwrap().remove("created_time");
        let err = decode::<Folder>(&p).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingRequiredField {
                model: "folder",
                key: "created_time"
            }
        );
    }

    #[test]
    fn only_declared_connections_are_kept() {
        let folder: Folder = decode(&payload()).unwrap();
        let conns = connections(&folder);
        assert_eq!(conns.len(), 1);
        let videos = conns.get(FolderConnection::Videos).unwrap();
        assert_eq!(videos.uri(), "/users/10/projects/7/videos");
        assert_eq!(videos.total(), Some(4));
        assert!(videos.target().unwrap().is::<Video>());
    }

    #[test]
    fn extra_keys_do_not_change_the_result() {
        let plain: Folder = decode(&payload()).unwrap();
        let mut p = payload();
        p["privacy"] = json!({ "view": "team" });
        p["is_pinned"] = json!(true);
        let extended: Folder = decode(&p).unwrap();
        assert_eq!(plain, extended);
    }
}
