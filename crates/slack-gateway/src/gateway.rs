//! Authenticated Slack Web API client, one method per remote capability.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::error::GatewayError;
use crate::time::ts_to_iso8601;
use crate::types::{
    AuthInfo, Bookmark, Channel, ChannelPage, FileObject, FilePage, Message, MessagePage, Paging,
    SearchChannelRef, SearchMatch, SearchPage, SearchedMessage, TeamInfo, Thread, ThreadPage, User,
    UserPage,
};

/// Production Slack Web API endpoint base.
pub const DEFAULT_API_BASE: &str = "https://slack.com/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Parameters for [`SlackGateway::list_channels`].
#[derive(Debug, Clone)]
pub struct ListChannelsOptions {
    pub exclude_archived: bool,
    pub types: String,
    pub limit: u32,
    pub cursor: Option<String>,
}

impl Default for ListChannelsOptions {
    fn default() -> Self {
        Self {
            exclude_archived: true,
            types: "public_channel,private_channel".to_string(),
            limit: 100,
            cursor: None,
        }
    }
}

/// Parameters for [`SlackGateway::list_messages`].
///
/// With `thread_ts` set the call reads thread replies; without it, channel
/// history. Two distinct remote operations behind one local signature.
#[derive(Debug, Clone)]
pub struct ListMessagesOptions {
    pub channel: String,
    pub thread_ts: Option<String>,
    pub limit: u32,
    pub cursor: Option<String>,
    pub oldest: Option<String>,
    pub latest: Option<String>,
    pub inclusive: bool,
    pub include_all_metadata: bool,
}

impl ListMessagesOptions {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            thread_ts: None,
            limit: 100,
            cursor: None,
            oldest: None,
            latest: None,
            inclusive: false,
            include_all_metadata: false,
        }
    }
}

/// Parameters for [`SlackGateway::list_threads`].
#[derive(Debug, Clone)]
pub struct ListThreadsOptions {
    pub channel: String,
    pub limit: u32,
    pub cursor: Option<String>,
    pub oldest: Option<String>,
    pub latest: Option<String>,
}

impl ListThreadsOptions {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            limit: 100,
            cursor: None,
            oldest: None,
            latest: None,
        }
    }
}

/// Sort key accepted by `search.messages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchSort {
    Score,
    Timestamp,
}

impl SearchSort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Timestamp => "timestamp",
        }
    }
}

/// Sort direction accepted by `search.messages`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Parameters for [`SlackGateway::search_messages`].
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub query: String,
    pub count: u32,
    pub page: u32,
    pub highlight: bool,
    pub sort: SearchSort,
    pub sort_dir: SortDirection,
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            count: 20,
            page: 1,
            highlight: true,
            sort: SearchSort::Score,
            sort_dir: SortDirection::Desc,
        }
    }
}

/// Parameters for [`SlackGateway::list_users`].
#[derive(Debug, Clone)]
pub struct ListUsersOptions {
    pub cursor: Option<String>,
    pub limit: u32,
    pub include_locale: bool,
}

impl Default for ListUsersOptions {
    fn default() -> Self {
        Self {
            cursor: None,
            limit: 100,
            include_locale: false,
        }
    }
}

/// Parameters for [`SlackGateway::list_files`].
#[derive(Debug, Clone)]
pub struct ListFilesOptions {
    pub channel: Option<String>,
    pub user: Option<String>,
    pub ts_from: Option<String>,
    pub ts_to: Option<String>,
    pub types: Option<String>,
    pub count: u32,
    pub page: u32,
}

impl Default for ListFilesOptions {
    fn default() -> Self {
        Self {
            channel: None,
            user: None,
            ts_from: None,
            ts_to: None,
            types: None,
            count: 20,
            page: 1,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ResponseMetadata {
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConversationsListResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    channels: Vec<Channel>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ConversationsHistoryResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    messages: Vec<Message>,
    #[serde(default)]
    has_more: Option<bool>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct ConversationsInfoResponse {
    ok: bool,
    #[serde(default)]
    channel: Option<Channel>,
}

#[derive(Debug, Deserialize)]
struct UsersInfoResponse {
    ok: bool,
    #[serde(default)]
    user: Option<User>,
}

#[derive(Debug, Deserialize)]
struct UsersListResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    members: Vec<User>,
    #[serde(default)]
    response_metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
struct BookmarksListResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    bookmarks: Vec<Bookmark>,
}

#[derive(Debug, Deserialize)]
struct FilesListResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    files: Vec<FileObject>,
    #[serde(default)]
    paging: Paging,
}

#[derive(Debug, Deserialize)]
struct ReactionResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TeamInfoResponse {
    ok: bool,
    #[serde(default)]
    team: Option<TeamInfo>,
}

#[derive(Debug, Deserialize)]
struct AuthTestResponse {
    ok: bool,
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    team_id: Option<String>,
    #[serde(default)]
    bot_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchMessagesBody {
    #[serde(default)]
    total: i64,
    #[serde(default)]
    paging: Paging,
    #[serde(default)]
    matches: Vec<SearchWireMatch>,
}

#[derive(Debug, Deserialize)]
struct SearchWireMatch {
    #[serde(default)]
    channel: SearchChannelRef,
    ts: String,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    user: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchMessagesResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    messages: Option<SearchMessagesBody>,
}

/// Stateless Slack Web API gateway.
///
/// Holds only immutable configuration and a reqwest client; safe to share
/// across concurrent handlers. No caching, no cross-call bookkeeping, no
/// automatic retries.
#[derive(Clone)]
pub struct SlackGateway {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
    team_id: Option<String>,
}

impl SlackGateway {
    pub fn new(bot_token: impl Into<String>, team_id: Option<String>) -> Result<Self, GatewayError> {
        Self::with_api_base(DEFAULT_API_BASE, bot_token, team_id)
    }

    /// Builds a gateway against a custom endpoint base. Tests point this at
    /// a local mock server.
    pub fn with_api_base(
        api_base: &str,
        bot_token: impl Into<String>,
        team_id: Option<String>,
    ) -> Result<Self, GatewayError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("slack-mcp-server"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| GatewayError::new("create api client", err.to_string()))?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.into().trim().to_string(),
            team_id: team_id.filter(|value| !value.trim().is_empty()),
        })
    }

    /// Lists channels via `conversations.list`.
    pub async fn list_channels(
        &self,
        options: ListChannelsOptions,
    ) -> Result<ChannelPage, GatewayError> {
        const CAPABILITY: &str = "list channels";
        let mut query = vec![
            ("exclude_archived", options.exclude_archived.to_string()),
            ("types", options.types),
            ("limit", options.limit.to_string()),
        ];
        if let Some(cursor) = options.cursor {
            query.push(("cursor", cursor));
        }

        let response: ConversationsListResponse = self
            .call(CAPABILITY, self.get("conversations.list").query(&query))
            .await?;
        if !response.ok {
            return Err(GatewayError::new(CAPABILITY, remote_error(response.error)));
        }
        Ok(ChannelPage {
            channels: response.channels,
            next_cursor: normalize_cursor(response.response_metadata),
        })
    }

    /// Lists channel history, or thread replies when `thread_ts` is set.
    ///
    /// `include_all_metadata` is accepted on both paths but only honored on
    /// the history path; `conversations.replies` does not support it.
    pub async fn list_messages(
        &self,
        options: ListMessagesOptions,
    ) -> Result<MessagePage, GatewayError> {
        const CAPABILITY: &str = "list messages";
        let mut query = vec![
            ("channel", options.channel),
            ("limit", options.limit.to_string()),
            ("inclusive", options.inclusive.to_string()),
        ];
        if let Some(cursor) = options.cursor {
            query.push(("cursor", cursor));
        }
        if let Some(oldest) = options.oldest {
            query.push(("oldest", oldest));
        }
        if let Some(latest) = options.latest {
            query.push(("latest", latest));
        }

        let request = match options.thread_ts {
            Some(thread_ts) => {
                query.push(("ts", thread_ts));
                self.get("conversations.replies").query(&query)
            }
            None => {
                query.push((
                    "include_all_metadata",
                    options.include_all_metadata.to_string(),
                ));
                self.get("conversations.history").query(&query)
            }
        };

        let response: ConversationsHistoryResponse = self.call(CAPABILITY, request).await?;
        if !response.ok {
            return Err(GatewayError::new(CAPABILITY, remote_error(response.error)));
        }
        Ok(MessagePage {
            messages: response.messages,
            has_more: response.has_more.unwrap_or(false),
            next_cursor: normalize_cursor(response.response_metadata),
        })
    }

    /// Lists threads by fetching channel history and keeping messages with
    /// `reply_count > 0`; the root message `ts` is the thread identity.
    ///
    /// A thread whose root scrolled out of the requested window or `limit`
    /// is missed. That gap is inherited from the history-based heuristic and
    /// kept for behavior compatibility.
    pub async fn list_threads(
        &self,
        options: ListThreadsOptions,
    ) -> Result<ThreadPage, GatewayError> {
        const CAPABILITY: &str = "list threads";
        let mut query = vec![
            ("channel", options.channel),
            ("limit", options.limit.to_string()),
        ];
        if let Some(cursor) = options.cursor {
            query.push(("cursor", cursor));
        }
        if let Some(oldest) = options.oldest {
            query.push(("oldest", oldest));
        }
        if let Some(latest) = options.latest {
            query.push(("latest", latest));
        }

        let response: ConversationsHistoryResponse = self
            .call(CAPABILITY, self.get("conversations.history").query(&query))
            .await?;
        if !response.ok {
            return Err(GatewayError::new(CAPABILITY, remote_error(response.error)));
        }

        let threads = response
            .messages
            .into_iter()
            .filter(|message| message.reply_count.unwrap_or(0) > 0)
            .map(|message| Thread {
                thread_ts: message.ts.clone(),
                reply_count: message.reply_count.unwrap_or(0),
                reply_users_count: message.reply_users_count.unwrap_or(0),
                latest_reply: message
                    .latest_reply
                    .clone()
                    .unwrap_or_else(|| message.ts.clone()),
                reply_users: message.reply_users.clone().unwrap_or_default(),
                root_message: Some(message),
            })
            .collect();

        Ok(ThreadPage {
            threads,
            has_more: response.has_more.unwrap_or(false),
            next_cursor: normalize_cursor(response.response_metadata),
        })
    }

    /// Fetches a single channel. Absence (and any lookup failure) is `None`,
    /// never an error.
    pub async fn get_channel_info(&self, channel_id: &str) -> Option<Channel> {
        let query = [("channel", channel_id)];
        let response: ConversationsInfoResponse = self
            .call(
                "get channel info",
                self.get("conversations.info").query(&query),
            )
            .await
            .ok()?;
        if !response.ok {
            return None;
        }
        response.channel
    }

    /// Searches messages via `search.messages`. Each match carries a derived
    /// ISO timestamp next to the raw `ts`.
    pub async fn search_messages(&self, options: SearchOptions) -> Result<SearchPage, GatewayError> {
        const CAPABILITY: &str = "search messages";
        let query = vec![
            ("query", options.query),
            ("count", options.count.to_string()),
            ("page", options.page.to_string()),
            ("highlight", options.highlight.to_string()),
            ("sort", options.sort.as_str().to_string()),
            ("sort_dir", options.sort_dir.as_str().to_string()),
        ];

        let response: SearchMessagesResponse = self
            .call(CAPABILITY, self.get("search.messages").query(&query))
            .await?;
        if !response.ok {
            return Err(GatewayError::new(CAPABILITY, remote_error(response.error)));
        }

        let body = response.messages.unwrap_or_default();
        let messages = body
            .matches
            .into_iter()
            .map(|hit| SearchMatch {
                channel: hit.channel,
                message: SearchedMessage {
                    timestamp: ts_to_iso8601(&hit.ts),
                    ts: hit.ts,
                    text: hit.text,
                    user: hit.user,
                },
            })
            .collect();

        Ok(SearchPage {
            messages,
            total: body.total,
            page: body.paging.page,
            pages: body.paging.pages,
        })
    }

    /// Fetches a single user. Absence (and any lookup failure) is `None`.
    pub async fn get_user_info(&self, user_id: &str) -> Option<User> {
        let query = [("user", user_id)];
        let response: UsersInfoResponse = self
            .call("get user info", self.get("users.info").query(&query))
            .await
            .ok()?;
        if !response.ok {
            return None;
        }
        response.user
    }

    /// Lists workspace members via `users.list`. Soft-deleted members are
    /// included; filtering them is a presentation concern.
    pub async fn list_users(&self, options: ListUsersOptions) -> Result<UserPage, GatewayError> {
        const CAPABILITY: &str = "list users";
        let mut query = vec![
            ("limit", options.limit.to_string()),
            ("include_locale", options.include_locale.to_string()),
        ];
        if let Some(cursor) = options.cursor {
            query.push(("cursor", cursor));
        }

        let response: UsersListResponse = self
            .call(CAPABILITY, self.get("users.list").query(&query))
            .await?;
        if !response.ok {
            return Err(GatewayError::new(CAPABILITY, remote_error(response.error)));
        }
        Ok(UserPage {
            users: response.members,
            next_cursor: normalize_cursor(response.response_metadata),
        })
    }

    /// Lists bookmarks attached to a channel. The remote API exposes no
    /// pagination here.
    pub async fn list_bookmarks(&self, channel_id: &str) -> Result<Vec<Bookmark>, GatewayError> {
        const CAPABILITY: &str = "list bookmarks";
        let query = [("channel_id", channel_id)];
        let response: BookmarksListResponse = self
            .call(CAPABILITY, self.get("bookmarks.list").query(&query))
            .await?;
        if !response.ok {
            return Err(GatewayError::new(CAPABILITY, remote_error(response.error)));
        }
        Ok(response.bookmarks)
    }

    /// Lists uploaded files via `files.list`, optionally filtered by
    /// channel, user, time range, and type.
    pub async fn list_files(&self, options: ListFilesOptions) -> Result<FilePage, GatewayError> {
        const CAPABILITY: &str = "list files";
        let mut query = vec![
            ("count", options.count.to_string()),
            ("page", options.page.to_string()),
        ];
        if let Some(channel) = options.channel {
            query.push(("channel", channel));
        }
        if let Some(user) = options.user {
            query.push(("user", user));
        }
        if let Some(ts_from) = options.ts_from {
            query.push(("ts_from", ts_from));
        }
        if let Some(ts_to) = options.ts_to {
            query.push(("ts_to", ts_to));
        }
        if let Some(types) = options.types {
            query.push(("types", types));
        }

        let response: FilesListResponse = self
            .call(CAPABILITY, self.get("files.list").query(&query))
            .await?;
        if !response.ok {
            return Err(GatewayError::new(CAPABILITY, remote_error(response.error)));
        }
        Ok(FilePage {
            files: response.files,
            paging: response.paging,
        })
    }

    /// Adds an emoji reaction. Reacting twice with the same emoji is
    /// success: the desired end state already holds.
    pub async fn add_reaction(
        &self,
        channel: &str,
        timestamp: &str,
        name: &str,
    ) -> Result<bool, GatewayError> {
        self.toggle_reaction("add reaction", "reactions.add", "already_reacted", channel, timestamp, name)
            .await
    }

    /// Removes an emoji reaction. Removing an absent reaction is success.
    pub async fn remove_reaction(
        &self,
        channel: &str,
        timestamp: &str,
        name: &str,
    ) -> Result<bool, GatewayError> {
        self.toggle_reaction("remove reaction", "reactions.remove", "no_reaction", channel, timestamp, name)
            .await
    }

    async fn toggle_reaction(
        &self,
        capability: &'static str,
        method: &str,
        idempotent_error: &str,
        channel: &str,
        timestamp: &str,
        name: &str,
    ) -> Result<bool, GatewayError> {
        let payload = json!({
            "channel": channel,
            "timestamp": timestamp,
            "name": name,
        });
        let response: ReactionResponse = self
            .call(
                capability,
                self.http
                    .post(self.endpoint(method))
                    .bearer_auth(&self.bot_token)
                    .json(&payload),
            )
            .await?;
        if response.ok {
            return Ok(true);
        }
        match response.error.as_deref() {
            Some(error) if error == idempotent_error => Ok(true),
            other => Err(GatewayError::new(
                capability,
                other.unwrap_or("unknown error").to_string(),
            )),
        }
    }

    /// Fetches workspace identity via `team.info`. Absence (and any lookup
    /// failure) is `None`.
    pub async fn get_workspace_info(&self) -> Option<TeamInfo> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(team_id) = &self.team_id {
            query.push(("team", team_id.clone()));
        }
        let response: TeamInfoResponse = self
            .call("get workspace info", self.get("team.info").query(&query))
            .await
            .ok()?;
        if !response.ok {
            return None;
        }
        response.team
    }

    /// Resolves the authenticated identity via `auth.test`. Used for startup
    /// verification and for answering "who am I".
    pub async fn get_auth_info(&self) -> Option<AuthInfo> {
        let response: AuthTestResponse = self
            .call(
                "get auth info",
                self.http
                    .post(self.endpoint("auth.test"))
                    .bearer_auth(&self.bot_token),
            )
            .await
            .ok()?;
        if !response.ok {
            return None;
        }
        Some(AuthInfo {
            user_id: response.user_id?,
            team_id: response.team_id?,
            bot_id: response.bot_id,
        })
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{method}", self.api_base)
    }

    fn get(&self, method: &str) -> reqwest::RequestBuilder {
        self.http
            .get(self.endpoint(method))
            .bearer_auth(&self.bot_token)
    }

    async fn call<T>(
        &self,
        capability: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(|err| GatewayError::new(capability, err.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::new(
                capability,
                format!(
                    "status {}: {}",
                    status.as_u16(),
                    truncate_for_error(&body, 320)
                ),
            ));
        }
        response
            .json::<T>()
            .await
            .map_err(|err| GatewayError::new(capability, format!("undecodable response: {err}")))
    }
}

fn remote_error(error: Option<String>) -> String {
    error.unwrap_or_else(|| "unknown error".to_string())
}

fn normalize_cursor(metadata: Option<ResponseMetadata>) -> Option<String> {
    metadata
        .and_then(|metadata| metadata.next_cursor)
        .filter(|cursor| !cursor.is_empty())
}

fn truncate_for_error(body: &str, max_chars: usize) -> String {
    if body.chars().count() <= max_chars {
        return body.to_string();
    }
    let truncated: String = body.chars().take(max_chars).collect();
    format!("{truncated}…")
}
