//! MCP surface: tool router plus resource and prompt handlers.
//!
//! Tool calls never surface failures as protocol errors. Every call returns
//! a single JSON text item with an explicit `success` flag, so a remote
//! failure reads the same way a hit does.

use std::sync::Arc;

use chrono::Utc;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, GetPromptRequestParam, GetPromptResult, Implementation,
    ListPromptsResult, ListResourcesResult, PaginatedRequestParam, ReadResourceRequestParam,
    ReadResourceResult, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde::{Deserialize, Serialize};
use slack_gateway::{
    ListChannelsOptions, ListFilesOptions, ListMessagesOptions, ListThreadsOptions,
    ListUsersOptions, SearchOptions, SearchSort, SlackGateway, SortDirection,
};

use crate::shape::{
    self, ChannelInfoEnvelope, ErrorEnvelope, ListBookmarksEnvelope, ListChannelsEnvelope,
    ListFilesEnvelope, ListMessagesEnvelope, ListThreadsEnvelope, ListUsersEnvelope,
    ReactionEnvelope, SearchEnvelope, UserInfoEnvelope,
};
use crate::{prompts, resources};

fn default_true() -> bool {
    true
}

fn default_channel_types() -> String {
    "public_channel,private_channel".to_string()
}

fn default_page_limit() -> u32 {
    100
}

fn default_search_count() -> u32 {
    20
}

fn default_page_number() -> u32 {
    1
}

fn default_sort_field() -> SortFieldParam {
    SortFieldParam::Score
}

fn default_sort_direction() -> SortDirectionParam {
    SortDirectionParam::Desc
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListChannelsParams {
    /// Exclude archived channels (default: true)
    #[serde(default = "default_true")]
    pub exclude_archived: bool,
    /// Comma-separated channel types: public_channel, private_channel, mpim, im
    #[serde(default = "default_channel_types")]
    pub types: String,
    /// Maximum number of channels to return per page (default: 100)
    #[serde(default = "default_page_limit")]
    pub limit: u32,
    /// Pagination cursor from a previous response
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListMessagesParams {
    /// Channel ID (e.g., C1234567890)
    pub channel: String,
    /// Thread timestamp: set to read the replies of that thread instead of
    /// channel history
    #[serde(default)]
    pub thread_ts: Option<String>,
    /// Maximum number of messages to return per page (default: 100)
    #[serde(default = "default_page_limit")]
    pub limit: u32,
    /// Pagination cursor from a previous response
    #[serde(default)]
    pub cursor: Option<String>,
    /// Only messages after this Slack timestamp
    #[serde(default)]
    pub oldest: Option<String>,
    /// Only messages before this Slack timestamp
    #[serde(default)]
    pub latest: Option<String>,
    /// Include messages with oldest/latest timestamps themselves
    #[serde(default)]
    pub inclusive: bool,
    /// Include all message metadata in the response
    #[serde(default)]
    pub include_all_metadata: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListThreadsParams {
    /// Channel ID (e.g., C1234567890)
    pub channel: String,
    /// Maximum number of history messages to scan (default: 100)
    #[serde(default = "default_page_limit")]
    pub limit: u32,
    /// Pagination cursor from a previous response
    #[serde(default)]
    pub cursor: Option<String>,
    /// Only threads rooted after this Slack timestamp
    #[serde(default)]
    pub oldest: Option<String>,
    /// Only threads rooted before this Slack timestamp
    #[serde(default)]
    pub latest: Option<String>,
}

/// Sort key for search results.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortFieldParam {
    Score,
    Timestamp,
}

/// Sort direction for search results.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortDirectionParam {
    Asc,
    Desc,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchMessagesParams {
    /// Search query; supports Slack modifiers like in:, from:, after:
    pub query: String,
    /// Number of results per page (default: 20)
    #[serde(default = "default_search_count")]
    pub count: u32,
    /// Page number, 1-based (default: 1)
    #[serde(default = "default_page_number")]
    pub page: u32,
    /// Wrap matched terms in highlight markers (default: true)
    #[serde(default = "default_true")]
    pub highlight: bool,
    /// Sort by relevance score or message timestamp (default: score)
    #[serde(default = "default_sort_field")]
    pub sort: SortFieldParam,
    /// Sort direction (default: desc)
    #[serde(default = "default_sort_direction")]
    pub sort_dir: SortDirectionParam,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetUserInfoParams {
    /// User ID (e.g., U1234567890)
    pub user: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetChannelInfoParams {
    /// Channel ID (e.g., C1234567890)
    pub channel: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListUsersParams {
    /// Maximum number of users to return per page (default: 100)
    #[serde(default = "default_page_limit")]
    pub limit: u32,
    /// Pagination cursor from a previous response
    #[serde(default)]
    pub cursor: Option<String>,
    /// Include locale information for each user
    #[serde(default)]
    pub include_locale: bool,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListBookmarksParams {
    /// Channel ID to read bookmarks from
    pub channel: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFilesParams {
    /// Restrict to files in this channel
    #[serde(default)]
    pub channel: Option<String>,
    /// Restrict to files uploaded by this user
    #[serde(default)]
    pub user: Option<String>,
    /// Only files created after this timestamp
    #[serde(default)]
    pub ts_from: Option<String>,
    /// Only files created before this timestamp
    #[serde(default)]
    pub ts_to: Option<String>,
    /// Comma-separated file types (e.g., images, pdfs, zips)
    #[serde(default)]
    pub types: Option<String>,
    /// Number of files per page (default: 20)
    #[serde(default = "default_search_count")]
    pub count: u32,
    /// Page number, 1-based (default: 1)
    #[serde(default = "default_page_number")]
    pub page: u32,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ReactionParams {
    /// Channel ID containing the message
    pub channel: String,
    /// Timestamp of the message to react to
    pub timestamp: String,
    /// Emoji name without colons (e.g., thumbsup)
    pub name: String,
}

/// The MCP server: one shared gateway behind the tool, resource, and prompt
/// surfaces.
#[derive(Clone)]
pub struct SlackMcpServer {
    gateway: Arc<SlackGateway>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl SlackMcpServer {
    pub fn new(gateway: SlackGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "slack_list_channels",
        description = "List channels in the workspace with pagination"
    )]
    async fn slack_list_channels(
        &self,
        params: Parameters<ListChannelsParams>,
    ) -> Result<CallToolResult, McpError> {
        let ListChannelsParams {
            exclude_archived,
            types,
            limit,
            cursor,
        } = params.0;
        let options = ListChannelsOptions {
            exclude_archived,
            types,
            limit,
            cursor,
        };
        match self.gateway.list_channels(options).await {
            Ok(page) => tool_json(&ListChannelsEnvelope {
                success: true,
                total: page.channels.len(),
                channels: page.channels.iter().map(shape::channel_summary).collect(),
                next_cursor: page.next_cursor,
            }),
            Err(error) => tool_json(&ErrorEnvelope::from(&error)),
        }
    }

    #[tool(
        name = "slack_list_messages",
        description = "List messages from a channel, or replies from a thread when thread_ts is set"
    )]
    async fn slack_list_messages(
        &self,
        params: Parameters<ListMessagesParams>,
    ) -> Result<CallToolResult, McpError> {
        let ListMessagesParams {
            channel,
            thread_ts,
            limit,
            cursor,
            oldest,
            latest,
            inclusive,
            include_all_metadata,
        } = params.0;
        let options = ListMessagesOptions {
            channel,
            thread_ts,
            limit,
            cursor,
            oldest,
            latest,
            inclusive,
            include_all_metadata,
        };
        match self.gateway.list_messages(options).await {
            Ok(page) => tool_json(&ListMessagesEnvelope {
                success: true,
                total: page.messages.len(),
                messages: page.messages.iter().map(shape::message_summary).collect(),
                has_more: page.has_more,
                next_cursor: page.next_cursor,
            }),
            Err(error) => tool_json(&ErrorEnvelope::from(&error)),
        }
    }

    /// Threads are synthesized from one page of channel history, so a thread
    /// whose root fell outside the requested page is not reported.
    #[tool(
        name = "slack_list_threads",
        description = "List threaded conversations rooted in a channel's recent history"
    )]
    async fn slack_list_threads(
        &self,
        params: Parameters<ListThreadsParams>,
    ) -> Result<CallToolResult, McpError> {
        let ListThreadsParams {
            channel,
            limit,
            cursor,
            oldest,
            latest,
        } = params.0;
        let options = ListThreadsOptions {
            channel,
            limit,
            cursor,
            oldest,
            latest,
        };
        match self.gateway.list_threads(options).await {
            Ok(page) => tool_json(&ListThreadsEnvelope {
                success: true,
                total: page.threads.len(),
                threads: page.threads.iter().map(shape::thread_summary).collect(),
                has_more: page.has_more,
                next_cursor: page.next_cursor,
            }),
            Err(error) => tool_json(&ErrorEnvelope::from(&error)),
        }
    }

    #[tool(
        name = "slack_search_messages",
        description = "Search messages across the workspace with Slack query modifiers"
    )]
    async fn slack_search_messages(
        &self,
        params: Parameters<SearchMessagesParams>,
    ) -> Result<CallToolResult, McpError> {
        let SearchMessagesParams {
            query,
            count,
            page,
            highlight,
            sort,
            sort_dir,
        } = params.0;
        let options = SearchOptions {
            query,
            count,
            page,
            highlight,
            sort: match sort {
                SortFieldParam::Score => SearchSort::Score,
                SortFieldParam::Timestamp => SearchSort::Timestamp,
            },
            sort_dir: match sort_dir {
                SortDirectionParam::Asc => SortDirection::Asc,
                SortDirectionParam::Desc => SortDirection::Desc,
            },
        };
        match self.gateway.search_messages(options).await {
            Ok(page) => tool_json(&SearchEnvelope {
                success: true,
                messages: page.messages.iter().map(shape::search_hit).collect(),
                total: page.total,
                page: page.page,
                pages: page.pages,
            }),
            Err(error) => tool_json(&ErrorEnvelope::from(&error)),
        }
    }

    #[tool(
        name = "slack_get_user_info",
        description = "Get profile details for a workspace member"
    )]
    async fn slack_get_user_info(
        &self,
        params: Parameters<GetUserInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.gateway.get_user_info(&params.0.user).await {
            Some(user) => tool_json(&UserInfoEnvelope {
                success: true,
                user: shape::user_detail(&user),
            }),
            None => tool_json(&ErrorEnvelope::new("User not found")),
        }
    }

    #[tool(
        name = "slack_get_channel_info",
        description = "Get details for a single channel"
    )]
    async fn slack_get_channel_info(
        &self,
        params: Parameters<GetChannelInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.gateway.get_channel_info(&params.0.channel).await {
            Some(channel) => tool_json(&ChannelInfoEnvelope {
                success: true,
                channel: shape::channel_detail(&channel),
            }),
            None => tool_json(&ErrorEnvelope::new("Channel not found")),
        }
    }

    /// `total` counts the raw page before soft-deleted members are dropped,
    /// so callers can detect filtered pages.
    #[tool(
        name = "slack_list_users",
        description = "List workspace members with pagination"
    )]
    async fn slack_list_users(
        &self,
        params: Parameters<ListUsersParams>,
    ) -> Result<CallToolResult, McpError> {
        let ListUsersParams {
            limit,
            cursor,
            include_locale,
        } = params.0;
        let options = ListUsersOptions {
            limit,
            cursor,
            include_locale,
        };
        match self.gateway.list_users(options).await {
            Ok(page) => tool_json(&ListUsersEnvelope {
                success: true,
                total: page.users.len(),
                users: page
                    .users
                    .iter()
                    .filter(|user| !user.deleted)
                    .map(shape::user_summary)
                    .collect(),
                next_cursor: page.next_cursor,
            }),
            Err(error) => tool_json(&ErrorEnvelope::from(&error)),
        }
    }

    #[tool(
        name = "slack_list_bookmarks",
        description = "List bookmarks saved in a channel"
    )]
    async fn slack_list_bookmarks(
        &self,
        params: Parameters<ListBookmarksParams>,
    ) -> Result<CallToolResult, McpError> {
        match self.gateway.list_bookmarks(&params.0.channel).await {
            Ok(bookmarks) => tool_json(&ListBookmarksEnvelope {
                success: true,
                total: bookmarks.len(),
                bookmarks: bookmarks.iter().map(shape::bookmark_summary).collect(),
            }),
            Err(error) => tool_json(&ErrorEnvelope::from(&error)),
        }
    }

    #[tool(
        name = "slack_list_files",
        description = "List uploaded files with optional channel, user, time, and type filters"
    )]
    async fn slack_list_files(
        &self,
        params: Parameters<ListFilesParams>,
    ) -> Result<CallToolResult, McpError> {
        let ListFilesParams {
            channel,
            user,
            ts_from,
            ts_to,
            types,
            count,
            page,
        } = params.0;
        let options = ListFilesOptions {
            channel,
            user,
            ts_from,
            ts_to,
            types,
            count,
            page,
        };
        match self.gateway.list_files(options).await {
            Ok(page) => tool_json(&ListFilesEnvelope {
                success: true,
                files: page.files.iter().map(shape::file_summary).collect(),
                paging: page.paging,
            }),
            Err(error) => tool_json(&ErrorEnvelope::from(&error)),
        }
    }

    #[tool(
        name = "slack_add_reaction",
        description = "Add an emoji reaction to a message; re-adding an existing reaction succeeds"
    )]
    async fn slack_add_reaction(
        &self,
        params: Parameters<ReactionParams>,
    ) -> Result<CallToolResult, McpError> {
        let ReactionParams {
            channel,
            timestamp,
            name,
        } = params.0;
        match self.gateway.add_reaction(&channel, &timestamp, &name).await {
            Ok(_) => tool_json(&ReactionEnvelope {
                success: true,
                message: "Reaction added successfully",
            }),
            Err(error) => tool_json(&ErrorEnvelope::from(&error)),
        }
    }

    #[tool(
        name = "slack_remove_reaction",
        description = "Remove an emoji reaction from a message; removing an absent reaction succeeds"
    )]
    async fn slack_remove_reaction(
        &self,
        params: Parameters<ReactionParams>,
    ) -> Result<CallToolResult, McpError> {
        let ReactionParams {
            channel,
            timestamp,
            name,
        } = params.0;
        match self
            .gateway
            .remove_reaction(&channel, &timestamp, &name)
            .await
        {
            Ok(_) => tool_json(&ReactionEnvelope {
                success: true,
                message: "Reaction removed successfully",
            }),
            Err(error) => tool_json(&ErrorEnvelope::from(&error)),
        }
    }
}

#[tool_handler]
impl ServerHandler for SlackMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "slack-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(
                "Read-focused Slack workspace access: list channels, messages, threads, \
                 users, bookmarks, and files; search messages; add and remove reactions. \
                 Resources expose workspace, bot identity, and full user and channel \
                 directories as JSON documents."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .enable_prompts()
                .build(),
            ..Default::default()
        }
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(resources::list_resources())
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        resources::read_resource(&self.gateway, &request.uri).await
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(prompts::list_prompts())
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        prompts::get_prompt(&request.name, request.arguments.as_ref(), Utc::now())
    }
}

fn tool_json<T: Serialize>(payload: &T) -> Result<CallToolResult, McpError> {
    let text = serde_json::to_string_pretty(payload).map_err(|error| {
        McpError::internal_error(format!("failed to encode tool response: {error}"), None)
    })?;
    Ok(CallToolResult::success(vec![Content::text(text)]))
}

#[cfg(test)]
mod tests;
