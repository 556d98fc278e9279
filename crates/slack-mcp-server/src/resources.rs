//! Resource surface: whole-view JSON documents addressed by `slack://` URIs.
//!
//! Directory documents exhaust cursor pagination before rendering; a failure
//! on any page discards the partial set and yields an error document at the
//! same URI instead of a protocol error.

use rmcp::model::{
    AnnotateAble, ListResourcesResult, RawResource, ReadResourceResult, Resource,
    ResourceContents,
};
use rmcp::ErrorData as McpError;
use serde_json::{json, Value};
use slack_gateway::{ListChannelsOptions, ListUsersOptions, SlackGateway};

use crate::shape;

pub(crate) const WORKSPACE_URI: &str = "slack://workspace";
pub(crate) const ME_URI: &str = "slack://me";
pub(crate) const USERS_URI: &str = "slack://users";
pub(crate) const CHANNELS_URI: &str = "slack://channels";

const DIRECTORY_PAGE_LIMIT: u32 = 200;
const DIRECTORY_CHANNEL_TYPES: &str = "public_channel,private_channel,mpim,im";

pub(crate) fn list_resources() -> ListResourcesResult {
    ListResourcesResult {
        resources: vec![
            resource(
                WORKSPACE_URI,
                "Workspace Information",
                "Current Slack workspace information",
            ),
            resource(
                ME_URI,
                "Bot User Information",
                "Information about the current bot user",
            ),
            resource(
                USERS_URI,
                "Workspace Users",
                "List of all users in the workspace",
            ),
            resource(
                CHANNELS_URI,
                "All Channels",
                "List of all accessible channels",
            ),
        ],
        ..Default::default()
    }
}

pub(crate) async fn read_resource(
    gateway: &SlackGateway,
    uri: &str,
) -> Result<ReadResourceResult, McpError> {
    let document = match uri {
        WORKSPACE_URI => workspace_document(gateway).await,
        ME_URI => me_document(gateway).await,
        USERS_URI => user_directory_document(gateway).await,
        CHANNELS_URI => channel_directory_document(gateway).await,
        other => {
            return Err(McpError::resource_not_found(
                format!("unknown resource uri: {other}"),
                None,
            ))
        }
    };
    let payload = document.unwrap_or_else(|message| json!({ "error": message }));
    let text = serde_json::to_string_pretty(&payload).map_err(|error| {
        McpError::internal_error(format!("failed to encode resource document: {error}"), None)
    })?;
    Ok(ReadResourceResult {
        contents: vec![ResourceContents::text(text, uri)],
    })
}

pub(crate) async fn workspace_document(gateway: &SlackGateway) -> Result<Value, String> {
    let workspace = gateway
        .get_workspace_info()
        .await
        .ok_or_else(|| "Unable to fetch workspace information".to_string())?;
    Ok(json!({
        "id": workspace.id,
        "name": workspace.name,
        "domain": workspace.domain,
        "email_domain": workspace.email_domain,
        "enterprise_id": workspace.enterprise_id,
        "enterprise_name": workspace.enterprise_name,
    }))
}

pub(crate) async fn me_document(gateway: &SlackGateway) -> Result<Value, String> {
    let auth = gateway
        .get_auth_info()
        .await
        .ok_or_else(|| "Unable to fetch auth information".to_string())?;
    let user = gateway
        .get_user_info(&auth.user_id)
        .await
        .ok_or_else(|| "Unable to fetch user information".to_string())?;
    Ok(json!({
        "user_id": auth.user_id,
        "bot_id": auth.bot_id,
        "team_id": auth.team_id,
        "name": user.name,
        "real_name": user.real_name,
        "is_bot": user.is_bot,
    }))
}

/// Walks `users.list` to exhaustion. Soft-deleted members never reach the
/// document.
pub(crate) async fn user_directory_document(gateway: &SlackGateway) -> Result<Value, String> {
    let mut members = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let options = ListUsersOptions {
            cursor: cursor.clone(),
            limit: DIRECTORY_PAGE_LIMIT,
            include_locale: false,
        };
        let page = gateway
            .list_users(options)
            .await
            .map_err(|error| error.to_string())?;
        members.extend(page.users.into_iter().filter(|user| !user.deleted));
        cursor = page.next_cursor;
        if cursor.is_none() {
            break;
        }
    }
    let users: Vec<_> = members.iter().map(shape::directory_user).collect();
    Ok(json!({
        "total": users.len(),
        "users": users,
    }))
}

/// Walks `conversations.list` across every conversation type the token can
/// see, direct messages included.
pub(crate) async fn channel_directory_document(gateway: &SlackGateway) -> Result<Value, String> {
    let mut collected = Vec::new();
    let mut cursor: Option<String> = None;
    loop {
        let options = ListChannelsOptions {
            cursor: cursor.clone(),
            limit: DIRECTORY_PAGE_LIMIT,
            types: DIRECTORY_CHANNEL_TYPES.to_string(),
            ..Default::default()
        };
        let page = gateway
            .list_channels(options)
            .await
            .map_err(|error| error.to_string())?;
        collected.extend(page.channels);
        cursor = page.next_cursor;
        if cursor.is_none() {
            break;
        }
    }
    let channels: Vec<_> = collected.iter().map(shape::directory_channel).collect();
    Ok(json!({
        "total": channels.len(),
        "channels": channels,
    }))
}

fn resource(uri: &str, name: &str, description: &str) -> Resource {
    let mut raw = RawResource::new(uri, name.to_string());
    raw.description = Some(description.to_string());
    raw.mime_type = Some("application/json".to_string());
    raw.no_annotation()
}
