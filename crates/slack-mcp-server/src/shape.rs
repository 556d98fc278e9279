//! Presentation shapes for tool envelopes and resource documents.
//!
//! Wire entities from the gateway keep raw Slack encodings; this module maps
//! them into the JSON shapes the MCP surface emits, attaching derived
//! ISO-8601 renderings next to the raw timestamps they come from. Optional
//! fields are skipped when absent instead of serialized as null.

use serde::Serialize;
use slack_gateway::{
    epoch_to_iso8601, ts_to_iso8601, Bookmark, Channel, FileObject, GatewayError, Message, Paging,
    SearchMatch, Thread, User,
};

/// Failure envelope shared by every tool. Failures are reported inside the
/// tool result body, never as protocol-level errors.
#[derive(Debug, Serialize)]
pub(crate) struct ErrorEnvelope {
    pub success: bool,
    pub error: String,
}

impl ErrorEnvelope {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

impl From<&GatewayError> for ErrorEnvelope {
    fn from(error: &GatewayError) -> Self {
        Self::new(error.to_string())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ListChannelsEnvelope {
    pub success: bool,
    pub channels: Vec<ChannelSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListMessagesEnvelope {
    pub success: bool,
    pub messages: Vec<MessageSummary>,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListThreadsEnvelope {
    pub success: bool,
    pub threads: Vec<ThreadSummary>,
    pub has_more: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchEnvelope {
    pub success: bool,
    pub messages: Vec<SearchHit>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChannelInfoEnvelope {
    pub success: bool,
    pub channel: ChannelDetail,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserInfoEnvelope {
    pub success: bool,
    pub user: UserDetail,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListUsersEnvelope {
    pub success: bool,
    pub users: Vec<UserSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListBookmarksEnvelope {
    pub success: bool,
    pub bookmarks: Vec<BookmarkSummary>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct ListFilesEnvelope {
    pub success: bool,
    pub files: Vec<FileSummary>,
    pub paging: Paging,
}

#[derive(Debug, Serialize)]
pub(crate) struct ReactionEnvelope {
    pub success: bool,
    pub message: &'static str,
}

/// Compact channel rendering used by the listing tool.
#[derive(Debug, Serialize)]
pub(crate) struct ChannelSummary {
    pub id: String,
    pub name: String,
    pub is_private: bool,
    pub is_archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_members: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

pub(crate) fn channel_summary(channel: &Channel) -> ChannelSummary {
    ChannelSummary {
        id: channel.id.clone(),
        name: channel.name.clone(),
        is_private: channel.is_private,
        is_archived: channel.is_archived,
        num_members: channel.num_members,
        topic: topic_value(channel.topic.as_ref().map(|topic| topic.value.as_str())),
        purpose: topic_value(channel.purpose.as_ref().map(|topic| topic.value.as_str())),
        created: epoch_to_iso8601(channel.created),
    }
}

/// Fuller channel rendering used by the info tool.
#[derive(Debug, Serialize)]
pub(crate) struct ChannelDetail {
    pub id: String,
    pub name: String,
    pub is_private: bool,
    pub is_archived: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_members: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

pub(crate) fn channel_detail(channel: &Channel) -> ChannelDetail {
    ChannelDetail {
        id: channel.id.clone(),
        name: channel.name.clone(),
        is_private: channel.is_private,
        is_archived: channel.is_archived,
        creator: channel.creator.clone(),
        num_members: channel.num_members,
        topic: topic_value(channel.topic.as_ref().map(|topic| topic.value.as_str())),
        purpose: topic_value(channel.purpose.as_ref().map(|topic| topic.value.as_str())),
        created: epoch_to_iso8601(channel.created),
    }
}

/// Message rendering: the raw `ts` round-trips untouched and the derived
/// `timestamp` sits beside it.
#[derive(Debug, Serialize)]
pub(crate) struct MessageSummary {
    pub ts: String,
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_users_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_reply: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

pub(crate) fn message_summary(message: &Message) -> MessageSummary {
    MessageSummary {
        ts: message.ts.clone(),
        message_type: message.message_type.clone(),
        subtype: message.subtype.clone(),
        text: message.text.clone(),
        user: message.user.clone(),
        bot_id: message.bot_id.clone(),
        thread_ts: message.thread_ts.clone(),
        reply_count: message.reply_count,
        reply_users_count: message.reply_users_count,
        latest_reply: message.latest_reply.clone(),
        timestamp: ts_to_iso8601(&message.ts),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ThreadRootSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ThreadSummary {
    pub thread_ts: String,
    pub reply_count: i64,
    pub reply_users_count: i64,
    pub latest_reply: String,
    pub reply_users: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_message: Option<ThreadRootSummary>,
}

pub(crate) fn thread_summary(thread: &Thread) -> ThreadSummary {
    ThreadSummary {
        thread_ts: thread.thread_ts.clone(),
        reply_count: thread.reply_count,
        reply_users_count: thread.reply_users_count,
        latest_reply: thread.latest_reply.clone(),
        reply_users: thread.reply_users.clone(),
        root_message: thread.root_message.as_ref().map(|root| ThreadRootSummary {
            text: root.text.clone(),
            user: root.user.clone(),
            timestamp: ts_to_iso8601(&thread.thread_ts),
        }),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchHitChannel {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchHitMessage {
    pub ts: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SearchHit {
    pub channel: SearchHitChannel,
    pub message: SearchHitMessage,
}

pub(crate) fn search_hit(hit: &SearchMatch) -> SearchHit {
    SearchHit {
        channel: SearchHitChannel {
            id: hit.channel.id.clone(),
            name: hit.channel.name.clone(),
        },
        message: SearchHitMessage {
            ts: hit.message.ts.clone(),
            text: hit.message.text.clone(),
            user: hit.message.user.clone(),
        },
    }
}

/// Full profile rendering used by the user info tool.
#[derive(Debug, Serialize)]
pub(crate) struct UserDetail {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub is_bot: bool,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

pub(crate) fn user_detail(user: &User) -> UserDetail {
    UserDetail {
        id: user.id.clone(),
        name: user.name.clone(),
        real_name: user.real_name.clone(),
        display_name: user.profile.display_name.clone(),
        status_text: user.profile.status_text.clone(),
        status_emoji: user.profile.status_emoji.clone(),
        email: user.profile.email.clone(),
        title: user.profile.title.clone(),
        is_bot: user.is_bot,
        is_admin: user.is_admin,
        timezone: user.tz.clone(),
    }
}

/// Compact member rendering used by the listing tool.
#[derive(Debug, Serialize)]
pub(crate) struct UserSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_bot: bool,
    pub is_admin: bool,
}

pub(crate) fn user_summary(user: &User) -> UserSummary {
    UserSummary {
        id: user.id.clone(),
        name: user.name.clone(),
        real_name: user.real_name.clone(),
        display_name: user.profile.display_name.clone(),
        email: user.profile.email.clone(),
        is_bot: user.is_bot,
        is_admin: user.is_admin,
    }
}

/// Member rendering for the `slack://users` directory document.
#[derive(Debug, Serialize)]
pub(crate) struct DirectoryUser {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub is_bot: bool,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

pub(crate) fn directory_user(user: &User) -> DirectoryUser {
    DirectoryUser {
        id: user.id.clone(),
        name: user.name.clone(),
        real_name: user.real_name.clone(),
        display_name: user.profile.display_name.clone(),
        email: user.profile.email.clone(),
        is_bot: user.is_bot,
        is_admin: user.is_admin,
        timezone: user.tz.clone(),
    }
}

/// Channel rendering for the `slack://channels` directory document.
#[derive(Debug, Serialize)]
pub(crate) struct DirectoryChannel {
    pub id: String,
    pub name: String,
    pub is_private: bool,
    pub is_archived: bool,
    pub is_channel: bool,
    pub is_group: bool,
    pub is_im: bool,
    pub is_mpim: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_members: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
}

pub(crate) fn directory_channel(channel: &Channel) -> DirectoryChannel {
    DirectoryChannel {
        id: channel.id.clone(),
        name: channel.name.clone(),
        is_private: channel.is_private,
        is_archived: channel.is_archived,
        is_channel: channel.is_channel,
        is_group: channel.is_group,
        is_im: channel.is_im,
        is_mpim: channel.is_mpim,
        num_members: channel.num_members,
        topic: topic_value(channel.topic.as_ref().map(|topic| topic.value.as_str())),
        purpose: topic_value(channel.purpose.as_ref().map(|topic| topic.value.as_str())),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct BookmarkSummary {
    pub id: String,
    pub title: String,
    pub link: String,
    #[serde(rename = "type")]
    pub bookmark_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

pub(crate) fn bookmark_summary(bookmark: &Bookmark) -> BookmarkSummary {
    BookmarkSummary {
        id: bookmark.id.clone(),
        title: bookmark.title.clone(),
        link: bookmark.link.clone(),
        bookmark_type: bookmark.bookmark_type.clone(),
        emoji: bookmark.emoji.clone(),
        created: epoch_to_iso8601(bookmark.date_created),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct FileSummary {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
}

pub(crate) fn file_summary(file: &FileObject) -> FileSummary {
    FileSummary {
        id: file.id.clone(),
        name: file.name.clone(),
        title: file.title.clone(),
        mimetype: file.mimetype.clone(),
        filetype: file.filetype.clone(),
        size: file.size,
        user: file.user.clone(),
        created: epoch_to_iso8601(file.created),
        permalink: file.permalink.clone(),
    }
}

fn topic_value(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use slack_gateway::{ChannelTopic, SearchChannelRef, SearchedMessage, UserProfile};

    fn sample_channel() -> Channel {
        Channel {
            id: "C123".to_string(),
            name: "general".to_string(),
            is_channel: true,
            is_group: false,
            is_im: false,
            is_mpim: false,
            is_private: false,
            created: 1_700_000_000,
            creator: Some("U1".to_string()),
            is_archived: false,
            is_general: true,
            topic: Some(ChannelTopic {
                value: "Release planning".to_string(),
                creator: "U1".to_string(),
                last_set: 0,
            }),
            purpose: Some(ChannelTopic {
                value: String::new(),
                creator: String::new(),
                last_set: 0,
            }),
            num_members: Some(42),
        }
    }

    #[test]
    fn unit_channel_summary_renders_created_and_drops_empty_topic() {
        let summary = channel_summary(&sample_channel());
        assert_eq!(summary.created.as_deref(), Some("2023-11-14T22:13:20.000Z"));
        assert_eq!(summary.topic.as_deref(), Some("Release planning"));
        assert_eq!(summary.purpose, None);
        assert_eq!(summary.num_members, Some(42));
    }

    #[test]
    fn unit_message_summary_keeps_raw_ts_and_derives_timestamp() {
        let message = Message {
            message_type: "message".to_string(),
            subtype: None,
            text: Some("ship it".to_string()),
            ts: "1700000000.000100".to_string(),
            user: Some("U1".to_string()),
            bot_id: None,
            thread_ts: None,
            reply_count: None,
            reply_users_count: None,
            latest_reply: None,
            reply_users: None,
            reactions: None,
        };
        let summary = message_summary(&message);
        assert_eq!(summary.ts, "1700000000.000100");
        assert_eq!(
            summary.timestamp.as_deref(),
            Some("2023-11-14T22:13:20.000Z")
        );
    }

    #[test]
    fn unit_message_summary_skips_absent_optionals_in_json() {
        let message = Message {
            message_type: "message".to_string(),
            subtype: None,
            text: None,
            ts: "not-a-ts".to_string(),
            user: None,
            bot_id: None,
            thread_ts: None,
            reply_count: None,
            reply_users_count: None,
            latest_reply: None,
            reply_users: None,
            reactions: None,
        };
        let value = serde_json::to_value(message_summary(&message)).expect("serialize");
        let object = value.as_object().expect("object");
        assert!(!object.contains_key("timestamp"));
        assert!(!object.contains_key("subtype"));
        assert_eq!(object["type"], "message");
    }

    #[test]
    fn unit_thread_summary_derives_root_timestamp_from_thread_ts() {
        let thread = Thread {
            thread_ts: "1700000000.000100".to_string(),
            reply_count: 3,
            reply_users_count: 2,
            latest_reply: "1700000100.000000".to_string(),
            reply_users: vec!["U1".to_string(), "U2".to_string()],
            root_message: Some(Message {
                message_type: "message".to_string(),
                subtype: None,
                text: Some("kickoff".to_string()),
                ts: "1700000000.000100".to_string(),
                user: Some("U1".to_string()),
                bot_id: None,
                thread_ts: Some("1700000000.000100".to_string()),
                reply_count: Some(3),
                reply_users_count: Some(2),
                latest_reply: Some("1700000100.000000".to_string()),
                reply_users: None,
                reactions: None,
            }),
        };
        let summary = thread_summary(&thread);
        let root = summary.root_message.expect("root message");
        assert_eq!(root.timestamp.as_deref(), Some("2023-11-14T22:13:20.000Z"));
        assert_eq!(root.text.as_deref(), Some("kickoff"));
    }

    #[test]
    fn unit_user_detail_flattens_profile_fields() {
        let user = User {
            id: "U1".to_string(),
            name: "ada".to_string(),
            real_name: Some("Ada Lovelace".to_string()),
            deleted: false,
            is_admin: true,
            is_owner: false,
            is_bot: false,
            tz: Some("Europe/London".to_string()),
            profile: UserProfile {
                display_name: Some("ada".to_string()),
                status_text: Some("reviewing".to_string()),
                status_emoji: Some(":mag:".to_string()),
                email: Some("ada@example.com".to_string()),
                title: Some("Engineer".to_string()),
                image_72: None,
                image_192: None,
            },
        };
        let detail = user_detail(&user);
        assert_eq!(detail.email.as_deref(), Some("ada@example.com"));
        assert_eq!(detail.timezone.as_deref(), Some("Europe/London"));
        assert!(detail.is_admin);
    }

    #[test]
    fn unit_search_hit_drops_derived_timestamp() {
        let hit = SearchMatch {
            channel: SearchChannelRef {
                id: "C123".to_string(),
                name: "general".to_string(),
            },
            message: SearchedMessage {
                ts: "1700000000.000100".to_string(),
                text: Some("deploy finished".to_string()),
                user: Some("U1".to_string()),
                timestamp: Some("2023-11-14T22:13:20.000Z".to_string()),
            },
        };
        let value = serde_json::to_value(search_hit(&hit)).expect("serialize");
        assert_eq!(value["message"]["ts"], "1700000000.000100");
        assert!(value["message"].get("timestamp").is_none());
    }
}
