//! Human-readable text rendering of models and pages.
//!
//! The output is stable plain text for terminals and logs. It is not a
//! canonical format; only the JSON wire format is normative.

use chrono::{DateTime, Utc};

use linkweft::{Model, Page, WireEnum};

use crate::folder::Folder;
use crate::user::User;
use crate::video::Video;

/// Text rendering for a model.
pub trait Render {
    /// Multi-line detail view.
    fn render(&self) -> String;

    /// One line, used in page listings.
    fn summary(&self) -> String;
}

/// Render a page as a numbered listing followed by its paging state.
///
/// ```text
/// page 1  (2 of 3)
///   1. /videos/1  Video 1  [2:05]
///   2. /videos/2  Video 2  [2:05]
/// next: GET /me/videos?page=2
/// ```
pub fn render_page<M: Model + Render>(page: &Page<M>) -> String {
    let mut out = String::new();

    let number = page.page().map(|p| p.to_string()).unwrap_or_else(|| "?".into());
    let of = page
        .total()
        .map(|t| format!("  ({} of {})", page.len(), t))
        .unwrap_or_default();
    out.push_str(&format!("page {}{}\n", number, of));

    for (i, item) in page.items().iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, item.summary()));
    }

    match page.next_request() {
        Some(next) => out.push_str(&format!("next: {}\n", next)),
        None => out.push_str("next: (none)\n"),
    }

    out
}

fn connections_section<M: Model>(model: &M, out: &mut String) {
    let mut lines: Vec<String> = model
        .connections()
        .iter()
        .map(|(key, conn)| {
            let total = conn.total().map(|t| format!(" ({t})")).unwrap_or_default();
            format!("  {:<12} {}{}\n", key.as_wire(), conn.uri(), total)
        })
        .collect();
    if lines.is_empty() {
        return;
    }
    lines.sort();
    out.push_str("\nConnections:\n");
    for line in lines {
        out.push_str(&line);
    }
}

fn timestamp(t: Option<DateTime<Utc>>) -> String {
    t.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".into())
}

fn duration(seconds: i64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

impl Render for Folder {
    /// ```text
    /// [folder] Launch assets
    /// uri: /users/10/projects/7  owner: /users/10
    /// created: 2019-06-04  modified: 2019-06-05
    ///
    /// Slack:
    ///   channel: #video-review  language: fr-FR
    ///   notify: REVIEW_PAGE, VIDEO_DETAIL
    ///
    /// Connections:
    ///   videos       /users/10/projects/7/videos (4)
    /// ```
    fn render(&self) -> String {
        let mut out = format!("[folder] {}\n", self.name().unwrap_or("(untitled)"));

        let owner = self
            .user()
            .map(|u| format!("  owner: {}", u.uri()))
            .unwrap_or_default();
        out.push_str(&format!("uri: {}{}\n", self.uri().unwrap_or("-"), owner));

        let modified = self
            .modified_date()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".into());
        out.push_str(&format!(
            "created: {}  modified: {}\n",
            self.created_date(),
            modified
        ));

        if let Some(channel) = self.slack_integration_channel() {
            out.push_str("\nSlack:\n");
            let language = self
                .language_preference()
                .map(|l| format!("  language: {}", l.as_wire()))
                .unwrap_or_default();
            out.push_str(&format!("  channel: {}{}\n", channel, language));
            if let Some(prefs) = self.user_preferences() {
                let prefs: Vec<&str> = prefs.iter().map(|p| p.as_wire()).collect();
                out.push_str(&format!("  notify: {}\n", prefs.join(", ")));
            }
        }

        connections_section(self, &mut out);
        out
    }

    fn summary(&self) -> String {
        format!(
            "{}  {}  created {}",
            self.uri().unwrap_or("-"),
            self.name().unwrap_or("(untitled)"),
            self.created_date()
        )
    }
}

impl Render for User {
    fn render(&self) -> String {
        let mut out = format!("[user] {}\n", self.name().unwrap_or("(unnamed)"));
        let account = self
            .account()
            .map(|a| format!("  account: {}", a.as_wire()))
            .unwrap_or_default();
        out.push_str(&format!("uri: {}{}\n", self.uri(), account));
        if let Some(location) = self.location() {
            out.push_str(&format!("location: {}\n", location));
        }
        if let Some(link) = self.link() {
            out.push_str(&format!("link: {}\n", link));
        }
        out.push_str(&format!("joined: {}\n", timestamp(self.created_time())));
        if let Some(bio) = self.bio() {
            out.push('\n');
            out.push_str(bio);
            out.push('\n');
        }
        connections_section(self, &mut out);
        out
    }

    fn summary(&self) -> String {
        format!("{}  {}", self.uri(), self.name().unwrap_or("(unnamed)"))
    }
}

impl Render for Video {
    fn render(&self) -> String {
        let mut out = format!("[video] {}\n", self.name().unwrap_or("(untitled)"));

        let mut facts = vec![format!("uri: {}", self.uri())];
        if let Some(d) = self.duration() {
            facts.push(format!("duration: {}", duration(d)));
        }
        if let (Some(w), Some(h)) = (self.width(), self.height()) {
            facts.push(format!("size: {w}x{h}"));
        }
        if let Some(status) = self.status() {
            facts.push(format!("status: {}", status.as_wire()));
        }
        out.push_str(&facts.join("  "));
        out.push('\n');

        if let Some(user) = self.user() {
            out.push_str(&format!("by: {}\n", user.summary()));
        }
        out.push_str(&format!("created: {}\n", timestamp(self.created_time())));

        if let Some(description) = self.description() {
            out.push('\n');
            out.push_str(description);
            out.push('\n');
        }

        connections_section(self, &mut out);
        out
    }

    fn summary(&self) -> String {
        let length = self
            .duration()
            .map(|d| format!("  [{}]", duration(d)))
            .unwrap_or_default();
        format!(
            "{}  {}{}",
            self.uri(),
            self.name().unwrap_or("(untitled)"),
            length
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkweft::decode;
    use serde_json::json;

    #[test]
    fn duration_formatting() {
        assert_eq!(duration(5), "0:05");
        assert_eq!(duration(125), "2:05");
        assert_eq!(duration(3725), "1:02:05");
    }

    #[test]
    fn folder_render_includes_slack_and_connections() {
        let folder: Folder = decode(&json!({
            "created_time": "2019-06-04T15:22:09+00:00",
            "name": "Launch assets",
            "uri": "/users/10/projects/7",
            "slack_integration_channel": "#video-review",
            "slack_language_preference": "fr-FR",
            "slack_user_preferences": ["REVIEW_PAGE", "BOGUS"],
            "metadata": { "connections": { "videos": { "uri": "/users/10/projects/7/videos", "total": 4 } } }
        }))
        .unwrap();
        let text = folder.render();
        assert!(text.starts_with("[folder] Launch assets\n"));
        assert!(text.contains("created: 2019-06-04  modified: -"));
        assert!(text.contains("channel: #video-review  language: fr-FR"));
        assert!(text.contains("notify: REVIEW_PAGE\n"));
        assert!(text.contains("videos       /users/10/projects/7/videos (4)"));
    }

    #[test]
    fn page_render_lists_items_and_next() {
        let page = Page::<Video>::decode(&json!({
            "page": 1,
            "total": 3,
            "paging": { "next": "/me/videos?page=2" },
            "data": [
                { "uri": "/videos/1", "name": "One", "duration": 65 },
                { "uri": "/videos/2", "name": "Two" }
            ]
        }))
        .unwrap();
        let text = render_page(&page);
        assert_eq!(
            text,
            "page 1  (2 of 3)\n  1. /videos/1  One  [1:05]\n  2. /videos/2  Two\nnext: GET /me/videos?page=2\n"
        );
    }

    #[test]
    fn user_summary() {
        let user: User = decode(&json!({ "uri": "/users/1", "name": "Ada" })).unwrap();
        assert_eq!(user.summary(), "/users/1  Ada");
    }
}
