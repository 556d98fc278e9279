//! Prompt templates exposed through the MCP prompt surface.
//!
//! Every template renders a single user-role message. Date arithmetic takes
//! the clock as an argument so tests can pin it.

use chrono::{DateTime, Duration, Utc};
use rmcp::model::{
    GetPromptResult, JsonObject, ListPromptsResult, Prompt, PromptArgument, PromptMessage,
    PromptMessageRole,
};
use rmcp::ErrorData as McpError;

pub(crate) const FIND_RECENT_DISCUSSIONS: &str = "find_recent_discussions";
pub(crate) const CHANNEL_ACTIVITY_SUMMARY: &str = "channel_activity_summary";
pub(crate) const TEAM_MEMBER_ACTIVITY: &str = "team_member_activity";
pub(crate) const DAILY_STANDUP_HELPER: &str = "daily_standup_helper";
pub(crate) const KNOWLEDGE_SEARCH: &str = "knowledge_search";

pub(crate) fn list_prompts() -> ListPromptsResult {
    ListPromptsResult {
        prompts: vec![
            Prompt::new(
                FIND_RECENT_DISCUSSIONS,
                Some("Find recent discussions about a specific topic across channels"),
                Some(vec![
                    argument("topic", "The topic or keywords to search for", true),
                    argument("days", "Number of days to look back (default: 7)", false),
                ]),
            ),
            Prompt::new(
                CHANNEL_ACTIVITY_SUMMARY,
                Some("Generate a summary of recent activity in specific channels"),
                Some(vec![
                    argument(
                        "channel_names",
                        "Comma-separated list of channel names (e.g., 'general,engineering,support')",
                        true,
                    ),
                    argument("hours", "Number of hours to look back (default: 24)", false),
                ]),
            ),
            Prompt::new(
                TEAM_MEMBER_ACTIVITY,
                Some("Check recent activity and status of team members"),
                Some(vec![argument(
                    "user_names",
                    "Comma-separated list of user names or email addresses",
                    true,
                )]),
            ),
            Prompt::new(
                DAILY_STANDUP_HELPER,
                Some("Gather information for daily standup meetings"),
                Some(vec![
                    argument("team_channel", "The team's main channel name", true),
                    argument(
                        "standup_channel",
                        "Channel where standups are posted (if different)",
                        false,
                    ),
                ]),
            ),
            Prompt::new(
                KNOWLEDGE_SEARCH,
                Some("Search for institutional knowledge and previous solutions"),
                Some(vec![
                    argument(
                        "query",
                        "What you're looking for (e.g., 'deployment process', 'API documentation')",
                        true,
                    ),
                    argument(
                        "channels",
                        "Specific channels to search in (optional, comma-separated)",
                        false,
                    ),
                ]),
            ),
        ],
        ..Default::default()
    }
}

pub(crate) fn get_prompt(
    name: &str,
    arguments: Option<&JsonObject>,
    now: DateTime<Utc>,
) -> Result<GetPromptResult, McpError> {
    let text = match name {
        FIND_RECENT_DISCUSSIONS => {
            let topic = required_argument(arguments, "topic")?;
            let days = optional_argument(arguments, "days").unwrap_or_else(|| "7".to_string());
            render_find_recent_discussions(&topic, &days, now)
        }
        CHANNEL_ACTIVITY_SUMMARY => {
            let channel_names = required_argument(arguments, "channel_names")?;
            let hours = optional_argument(arguments, "hours").unwrap_or_else(|| "24".to_string());
            render_channel_activity_summary(&channel_names, &hours, now)
        }
        TEAM_MEMBER_ACTIVITY => {
            let user_names = required_argument(arguments, "user_names")?;
            render_team_member_activity(&user_names)
        }
        DAILY_STANDUP_HELPER => {
            let team_channel = required_argument(arguments, "team_channel")?;
            let standup_channel = optional_argument(arguments, "standup_channel");
            render_daily_standup_helper(&team_channel, standup_channel.as_deref(), now)
        }
        KNOWLEDGE_SEARCH => {
            let query = required_argument(arguments, "query")?;
            let channels = optional_argument(arguments, "channels");
            render_knowledge_search(&query, channels.as_deref())
        }
        other => {
            return Err(McpError::invalid_params(
                format!("unknown prompt: {other}"),
                None,
            ))
        }
    };
    Ok(GetPromptResult {
        description: None,
        messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
    })
}

fn render_find_recent_discussions(topic: &str, days: &str, now: DateTime<Utc>) -> String {
    let days_back: i64 = days.trim().parse().unwrap_or(7);
    let date_str = (now - Duration::days(days_back)).format("%Y-%m-%d");
    format!(
        r#"Find all recent discussions about "{topic}" in our Slack workspace from the last {days} days.

Please:
1. Search for messages containing "{topic}" or related terms
2. Group the results by channel
3. For each relevant discussion, show:
   - Channel name
   - Message author
   - Message timestamp
   - Message content (with context if it's part of a thread)
   - Number of replies (if it's a thread)
4. Sort by relevance and recency
5. Summarize the key points from these discussions

Search query hint: Use the slack_search_messages tool with query: "{topic} after:{date_str}""#
    )
}

fn render_channel_activity_summary(channel_names: &str, hours: &str, now: DateTime<Utc>) -> String {
    let hours_back: i64 = hours.trim().parse().unwrap_or(24);
    let timestamp = now.timestamp() - hours_back * 3600;
    format!(
        r#"Generate a comprehensive activity summary for the following channels: {channel_names}

For the last {hours} hours, please:

1. First, find the channel IDs for: {channel_names}
2. For each channel:
   - Count total messages posted
   - Identify the most active users
   - List any threads with significant discussion (3+ replies)
   - Highlight messages with many reactions
   - Note any shared files or links
   - Identify key topics discussed

3. Provide insights:
   - Peak activity times
   - Cross-channel themes or related discussions
   - Important announcements or decisions
   - Action items or questions that need attention

Use the following tools:
- slack_list_channels to find channel IDs
- slack_list_messages with oldest:"{timestamp}" to get recent messages
- slack_list_threads to identify active discussions

Format the summary in a clear, executive-friendly format."#
    )
}

fn render_team_member_activity(user_names: &str) -> String {
    format!(
        r#"Check the recent Slack activity for these team members: {user_names}

Please provide:

1. User Information:
   - Find each user's ID using slack_list_users
   - Get their profile details with slack_get_user_info
   - Current status (emoji and text)
   - Time zone and local time

2. Recent Activity:
   - Search for their recent messages across channels
   - Identify channels they're most active in
   - Recent files they've shared
   - Threads they've participated in

3. Collaboration Patterns:
   - Who they frequently interact with
   - Main topics they discuss
   - Channels they're members of

This will help understand team dynamics and ensure no one is blocked or needs assistance."#
    )
}

fn render_daily_standup_helper(
    team_channel: &str,
    standup_channel: Option<&str>,
    now: DateTime<Utc>,
) -> String {
    let yesterday = now.timestamp() - 24 * 3600;
    let extra_channel = standup_channel
        .map(|channel| format!(" and {channel}"))
        .unwrap_or_default();
    let updates_channel = standup_channel.unwrap_or(team_channel);
    format!(
        r#"Help prepare for daily standup by gathering relevant information from {team_channel}{extra_channel}.

Please collect:

1. Yesterday's Updates:
   - Find messages in {updates_channel} from the last 24 hours
   - Look for keywords like "completed", "finished", "done", "shipped"
   - Identify completed tasks and achievements

2. Current Work:
   - Active threads and discussions
   - Open questions that need answers
   - Work-in-progress mentions

3. Blockers:
   - Search for keywords like "blocked", "stuck", "help", "issue", "problem"
   - Unresolved questions from yesterday
   - Requests waiting for responses

4. Team Highlights:
   - Celebrations or kudos (look for reactions like :tada:, :clap:)
   - Important announcements
   - Upcoming deadlines mentioned

Use oldest:"{yesterday}" when listing messages to focus on the last 24 hours.

Format this as a standup summary that the team lead can quickly review."#
    )
}

fn render_knowledge_search(query: &str, channels: Option<&str>) -> String {
    let scoped_query = match channels {
        Some(channels) => format!("{query} in:{}", channels.replace(',', " in:")),
        None => query.to_string(),
    };
    format!(
        r#"Search for institutional knowledge about: "{query}"

Please help find relevant information by:

1. Searching for messages:
   - Use slack_search_messages with query: "{scoped_query}"
   - Look for detailed explanations, documentation links, or solutions

2. Check pinned messages and bookmarks:
   - If you find relevant channels, check their bookmarks with slack_list_bookmarks
   - These often contain important documentation

3. Find subject matter experts:
   - Identify users who frequently discuss this topic
   - Note their contributions and expertise

4. Compile findings:
   - Group information by relevance
   - Include message links (permalink) for reference
   - Highlight the most useful/detailed responses
   - Note any conflicting information or outdated content

5. Provide recommendations:
   - Suggest channels to join for more information
   - Identify people to reach out to for clarification
   - Recommend documentation that should be created if gaps exist

This search will help preserve and surface tribal knowledge within the organization."#
    )
}

fn argument(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        required: Some(required),
    }
}

fn required_argument(arguments: Option<&JsonObject>, name: &str) -> Result<String, McpError> {
    optional_argument(arguments, name).ok_or_else(|| {
        McpError::invalid_params(format!("missing required argument: {name}"), None)
    })
}

fn optional_argument(arguments: Option<&JsonObject>, name: &str) -> Option<String> {
    arguments?
        .get(name)?
        .as_str()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).single().expect("valid clock")
    }

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().expect("object").clone()
    }

    fn rendered_text(result: &GetPromptResult) -> String {
        let value = serde_json::to_value(result).expect("serialize prompt result");
        value["messages"][0]["content"]["text"]
            .as_str()
            .expect("text message")
            .to_string()
    }

    #[test]
    fn unit_find_recent_discussions_computes_after_date() {
        let result = get_prompt(
            FIND_RECENT_DISCUSSIONS,
            Some(&args(json!({"topic": "deploys"}))),
            fixed_now(),
        )
        .expect("prompt");
        let text = rendered_text(&result);
        assert!(text.contains(r#"discussions about "deploys""#));
        assert!(text.contains("deploys after:2024-01-08"));
    }

    #[test]
    fn unit_find_recent_discussions_honours_days_override() {
        let result = get_prompt(
            FIND_RECENT_DISCUSSIONS,
            Some(&args(json!({"topic": "deploys", "days": "30"}))),
            fixed_now(),
        )
        .expect("prompt");
        assert!(rendered_text(&result).contains("after:2023-12-16"));
    }

    #[test]
    fn unit_channel_activity_summary_embeds_oldest_timestamp() {
        let result = get_prompt(
            CHANNEL_ACTIVITY_SUMMARY,
            Some(&args(json!({"channel_names": "general,support", "hours": "48"}))),
            fixed_now(),
        )
        .expect("prompt");
        let expected_oldest = fixed_now().timestamp() - 48 * 3600;
        let text = rendered_text(&result);
        assert!(text.contains("general,support"));
        assert!(text.contains(&format!(r#"oldest:"{expected_oldest}""#)));
    }

    #[test]
    fn unit_daily_standup_helper_prefers_standup_channel() {
        let result = get_prompt(
            DAILY_STANDUP_HELPER,
            Some(&args(
                json!({"team_channel": "eng", "standup_channel": "eng-standup"}),
            )),
            fixed_now(),
        )
        .expect("prompt");
        let text = rendered_text(&result);
        assert!(text.contains("from eng and eng-standup"));
        assert!(text.contains("Find messages in eng-standup"));
    }

    #[test]
    fn unit_knowledge_search_expands_channel_scopes() {
        let result = get_prompt(
            KNOWLEDGE_SEARCH,
            Some(&args(json!({"query": "rollback", "channels": "ops,incidents"}))),
            fixed_now(),
        )
        .expect("prompt");
        assert!(rendered_text(&result).contains(r#"query: "rollback in:ops in:incidents""#));
    }

    #[test]
    fn unit_get_prompt_rejects_unknown_names() {
        let error = get_prompt("nope", None, fixed_now()).expect_err("unknown prompt");
        assert!(error.message.contains("unknown prompt"));
    }

    #[test]
    fn unit_get_prompt_requires_declared_arguments() {
        let error =
            get_prompt(FIND_RECENT_DISCUSSIONS, None, fixed_now()).expect_err("missing topic");
        assert!(error.message.contains("topic"));
    }

    #[test]
    fn unit_list_prompts_declares_all_templates() {
        let listed = list_prompts();
        let names: Vec<_> = listed
            .prompts
            .iter()
            .map(|prompt| prompt.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                FIND_RECENT_DISCUSSIONS,
                CHANNEL_ACTIVITY_SUMMARY,
                TEAM_MEMBER_ACTIVITY,
                DAILY_STANDUP_HELPER,
                KNOWLEDGE_SEARCH,
            ]
        );
    }
}
