use httpmock::prelude::*;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::CallToolResult;
use serde_json::{json, Value};
use slack_gateway::SlackGateway;

use super::{
    GetChannelInfoParams, ListChannelsParams, ListMessagesParams, ListUsersParams, ReactionParams,
    SearchMessagesParams, SlackMcpServer, SortDirectionParam, SortFieldParam,
};

fn test_server(mock: &MockServer) -> SlackMcpServer {
    let gateway = SlackGateway::with_api_base(&mock.base_url(), "xoxb-test", None)
        .expect("gateway for mock server");
    SlackMcpServer::new(gateway)
}

fn envelope_of(result: &CallToolResult) -> Value {
    let raw = serde_json::to_value(result).expect("serialize tool result");
    let text = raw["content"][0]["text"].as_str().expect("text content");
    serde_json::from_str(text).expect("json envelope")
}

#[tokio::test]
async fn integration_list_messages_reports_pagination_in_envelope() {
    let mock = MockServer::start();
    let history = mock.mock(|when, then| {
        when.method(GET)
            .path("/conversations.history")
            .query_param("channel", "C123")
            .query_param("limit", "2");
        then.status(200).json_body(json!({
            "ok": true,
            "messages": [
                {"type": "message", "ts": "1700000000.000100", "text": "first", "user": "U1"},
                {"type": "message", "ts": "1700000001.000200", "text": "second", "user": "U2"}
            ],
            "has_more": true,
            "response_metadata": {"next_cursor": "cursor-from-slack"}
        }));
    });
    let replies = mock.mock(|when, then| {
        when.method(GET).path("/conversations.replies");
        then.status(200).json_body(json!({"ok": true, "messages": []}));
    });

    let server = test_server(&mock);
    let result = server
        .slack_list_messages(Parameters(ListMessagesParams {
            channel: "C123".to_string(),
            thread_ts: None,
            limit: 2,
            cursor: None,
            oldest: None,
            latest: None,
            inclusive: false,
            include_all_metadata: false,
        }))
        .await
        .expect("tool result");

    let envelope = envelope_of(&result);
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["total"], 2);
    assert_eq!(envelope["has_more"], true);
    assert_eq!(envelope["next_cursor"], "cursor-from-slack");
    assert_eq!(envelope["messages"][0]["ts"], "1700000000.000100");
    assert_eq!(
        envelope["messages"][0]["timestamp"],
        "2023-11-14T22:13:20.000Z"
    );
    history.assert();
    assert_eq!(replies.calls(), 0);
}

#[tokio::test]
async fn integration_list_messages_with_thread_ts_reads_replies() {
    let mock = MockServer::start();
    let replies = mock.mock(|when, then| {
        when.method(GET)
            .path("/conversations.replies")
            .query_param("channel", "C123")
            .query_param("ts", "1700000000.000100");
        then.status(200).json_body(json!({
            "ok": true,
            "messages": [
                {"type": "message", "ts": "1700000000.000100", "text": "root", "user": "U1"},
                {"type": "message", "ts": "1700000050.000000", "text": "reply", "user": "U2"}
            ],
            "has_more": false
        }));
    });

    let server = test_server(&mock);
    let result = server
        .slack_list_messages(Parameters(ListMessagesParams {
            channel: "C123".to_string(),
            thread_ts: Some("1700000000.000100".to_string()),
            limit: 100,
            cursor: None,
            oldest: None,
            latest: None,
            inclusive: false,
            include_all_metadata: false,
        }))
        .await
        .expect("tool result");

    let envelope = envelope_of(&result);
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["total"], 2);
    assert_eq!(envelope["messages"][1]["text"], "reply");
    replies.assert();
}

#[tokio::test]
async fn functional_list_channels_failure_keeps_tool_result_shape() {
    let mock = MockServer::start();
    mock.mock(|when, then| {
        when.method(GET).path("/conversations.list");
        then.status(200)
            .json_body(json!({"ok": false, "error": "invalid_auth"}));
    });

    let server = test_server(&mock);
    let result = server
        .slack_list_channels(Parameters(ListChannelsParams {
            exclude_archived: true,
            types: "public_channel,private_channel".to_string(),
            limit: 100,
            cursor: None,
        }))
        .await
        .expect("tool result");

    let envelope = envelope_of(&result);
    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["error"], "Failed to list channels: invalid_auth");
}

#[tokio::test]
async fn functional_get_channel_info_absent_reports_not_found() {
    let mock = MockServer::start();
    mock.mock(|when, then| {
        when.method(GET).path("/conversations.info");
        then.status(200)
            .json_body(json!({"ok": false, "error": "channel_not_found"}));
    });

    let server = test_server(&mock);
    let result = server
        .slack_get_channel_info(Parameters(GetChannelInfoParams {
            channel: "C404".to_string(),
        }))
        .await
        .expect("tool result");

    let envelope = envelope_of(&result);
    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["error"], "Channel not found");
}

#[tokio::test]
async fn functional_list_users_filters_deleted_but_counts_raw_page() {
    let mock = MockServer::start();
    mock.mock(|when, then| {
        when.method(GET).path("/users.list");
        then.status(200).json_body(json!({
            "ok": true,
            "members": [
                {"id": "U1", "name": "ada", "deleted": false, "profile": {}},
                {"id": "U2", "name": "ghost", "deleted": true, "profile": {}}
            ],
            "response_metadata": {"next_cursor": ""}
        }));
    });

    let server = test_server(&mock);
    let result = server
        .slack_list_users(Parameters(ListUsersParams {
            limit: 100,
            cursor: None,
            include_locale: false,
        }))
        .await
        .expect("tool result");

    let envelope = envelope_of(&result);
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["total"], 2);
    let users = envelope["users"].as_array().expect("users array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["id"], "U1");
}

#[tokio::test]
async fn functional_search_messages_envelope_carries_paging_counts() {
    let mock = MockServer::start();
    let search = mock.mock(|when, then| {
        when.method(GET)
            .path("/search.messages")
            .query_param("query", "deploy")
            .query_param("sort", "timestamp")
            .query_param("sort_dir", "asc");
        then.status(200).json_body(json!({
            "ok": true,
            "messages": {
                "total": 1,
                "matches": [{
                    "channel": {"id": "C1", "name": "general"},
                    "ts": "1700000000.000100",
                    "text": "deploy finished",
                    "user": "U1"
                }],
                "paging": {"count": 20, "total": 1, "page": 1, "pages": 1}
            }
        }));
    });

    let server = test_server(&mock);
    let result = server
        .slack_search_messages(Parameters(SearchMessagesParams {
            query: "deploy".to_string(),
            count: 20,
            page: 1,
            highlight: true,
            sort: SortFieldParam::Timestamp,
            sort_dir: SortDirectionParam::Asc,
        }))
        .await
        .expect("tool result");

    let envelope = envelope_of(&result);
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["total"], 1);
    assert_eq!(envelope["pages"], 1);
    assert_eq!(envelope["messages"][0]["channel"]["name"], "general");
    assert_eq!(envelope["messages"][0]["message"]["ts"], "1700000000.000100");
    search.assert();
}

#[tokio::test]
async fn integration_add_reaction_is_idempotent_at_the_tool_surface() {
    let mock = MockServer::start();
    let add = mock.mock(|when, then| {
        when.method(POST).path("/reactions.add");
        then.status(200)
            .json_body(json!({"ok": false, "error": "already_reacted"}));
    });

    let server = test_server(&mock);
    for _ in 0..2 {
        let result = server
            .slack_add_reaction(Parameters(ReactionParams {
                channel: "C123".to_string(),
                timestamp: "1700000000.000100".to_string(),
                name: "thumbsup".to_string(),
            }))
            .await
            .expect("tool result");
        let envelope = envelope_of(&result);
        assert_eq!(envelope["success"], true);
        assert_eq!(envelope["message"], "Reaction added successfully");
    }
    assert_eq!(add.calls(), 2);
}

#[tokio::test]
async fn functional_remove_reaction_propagates_real_failures() {
    let mock = MockServer::start();
    mock.mock(|when, then| {
        when.method(POST).path("/reactions.remove");
        then.status(200)
            .json_body(json!({"ok": false, "error": "message_not_found"}));
    });

    let server = test_server(&mock);
    let result = server
        .slack_remove_reaction(Parameters(ReactionParams {
            channel: "C123".to_string(),
            timestamp: "1700000000.000100".to_string(),
            name: "thumbsup".to_string(),
        }))
        .await
        .expect("tool result");

    let envelope = envelope_of(&result);
    assert_eq!(envelope["success"], false);
    assert_eq!(
        envelope["error"],
        "Failed to remove reaction: message_not_found"
    );
}

#[test]
fn unit_get_info_advertises_all_three_surfaces() {
    let info_capabilities = {
        let gateway = SlackGateway::with_api_base("http://127.0.0.1:1", "xoxb-test", None)
            .expect("gateway");
        let server = SlackMcpServer::new(gateway);
        rmcp::ServerHandler::get_info(&server).capabilities
    };
    assert!(info_capabilities.tools.is_some());
    assert!(info_capabilities.resources.is_some());
    assert!(info_capabilities.prompts.is_some());
}
