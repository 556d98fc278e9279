//! Wire entities returned by the Slack Web API.
//!
//! Fields mirror the remote payloads; everything timestamp-bearing keeps the
//! remote encoding untouched (`ts` as string seconds, `created` as epoch
//! seconds). Presentation layers derive human-readable renderings on top.

use serde::{Deserialize, Serialize};

/// Topic or purpose block attached to a channel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChannelTopic {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub creator: String,
    #[serde(default)]
    pub last_set: i64,
}

/// A conversation container: public, private, direct, or group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_channel: bool,
    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub is_im: bool,
    #[serde(default)]
    pub is_mpim: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_general: bool,
    #[serde(default)]
    pub topic: Option<ChannelTopic>,
    #[serde(default)]
    pub purpose: Option<ChannelTopic>,
    #[serde(default)]
    pub num_members: Option<i64>,
}

/// Emoji reaction aggregate on a message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reaction {
    pub name: String,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub count: i64,
}

/// One posted item in a channel or thread. `ts` is the sole stable identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    #[serde(rename = "type", default)]
    pub message_type: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    pub ts: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub thread_ts: Option<String>,
    #[serde(default)]
    pub reply_count: Option<i64>,
    #[serde(default)]
    pub reply_users_count: Option<i64>,
    #[serde(default)]
    pub latest_reply: Option<String>,
    #[serde(default)]
    pub reply_users: Option<Vec<String>>,
    #[serde(default)]
    pub reactions: Option<Vec<Reaction>>,
}

/// A thread root plus its reply aggregate.
///
/// Not a first-class remote entity: synthesized from channel history
/// messages with `reply_count > 0`. The root message `ts` doubles as the
/// thread identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub thread_ts: String,
    pub reply_count: i64,
    pub reply_users_count: i64,
    pub latest_reply: String,
    pub reply_users: Vec<String>,
    pub root_message: Option<Message>,
}

/// Profile block carried by a workspace member.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default)]
    pub status_emoji: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub image_72: Option<String>,
    #[serde(default)]
    pub image_192: Option<String>,
}

/// A workspace member. Soft-deleted members are surfaced as-is here and
/// filtered at the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub real_name: Option<String>,
    #[serde(default)]
    pub deleted: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub is_bot: bool,
    #[serde(default)]
    pub tz: Option<String>,
    #[serde(default)]
    pub profile: UserProfile,
}

/// A saved link attached to a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(rename = "type", default)]
    pub bookmark_type: String,
    #[serde(default)]
    pub date_created: i64,
    #[serde(default)]
    pub date_updated: i64,
}

/// An uploaded attachment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileObject {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
    #[serde(default)]
    pub filetype: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub permalink: Option<String>,
}

/// Page-number pagination block returned by `files.list` and search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub count: i64,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub pages: i64,
}

/// Identity of the connected workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub email_domain: Option<String>,
    #[serde(default)]
    pub enterprise_id: Option<String>,
    #[serde(default)]
    pub enterprise_name: Option<String>,
}

/// Authenticated actor identity resolved via `auth.test`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthInfo {
    pub user_id: String,
    pub team_id: String,
    #[serde(default)]
    pub bot_id: Option<String>,
}

/// Channel reference attached to a search match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchChannelRef {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Message portion of a search match, with a derived ISO timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchedMessage {
    pub ts: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// One search hit: the channel it landed in plus the matched message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchMatch {
    pub channel: SearchChannelRef,
    pub message: SearchedMessage,
}

/// One page of channels with the cursor for the next page, if any.
#[derive(Debug, Clone)]
pub struct ChannelPage {
    pub channels: Vec<Channel>,
    pub next_cursor: Option<String>,
}

/// One page of channel history or thread replies.
#[derive(Debug, Clone)]
pub struct MessagePage {
    pub messages: Vec<Message>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// One page of synthesized threads.
#[derive(Debug, Clone)]
pub struct ThreadPage {
    pub threads: Vec<Thread>,
    pub has_more: bool,
    pub next_cursor: Option<String>,
}

/// One page of workspace members.
#[derive(Debug, Clone)]
pub struct UserPage {
    pub users: Vec<User>,
    pub next_cursor: Option<String>,
}

/// One page of uploaded files with page-number pagination.
#[derive(Debug, Clone)]
pub struct FilePage {
    pub files: Vec<FileObject>,
    pub paging: Paging,
}

/// One page of search results.
#[derive(Debug, Clone)]
pub struct SearchPage {
    pub messages: Vec<SearchMatch>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
}
