use assert_cmd::Command;
use slack_mcp_server::{BOT_TOKEN_ENV, TEAM_ID_ENV};

#[test]
fn integration_missing_bot_token_exits_with_setup_guidance() {
    let output = Command::cargo_bin("slack-mcp-server")
        .expect("binary built")
        .env_remove(BOT_TOKEN_ENV)
        .env_remove(TEAM_ID_ENV)
        .output()
        .expect("binary ran");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SLACK_BOT_TOKEN environment variable is required"));
    assert!(stderr.contains("https://api.slack.com/apps"));
}

#[test]
fn integration_blank_bot_token_is_rejected() {
    let output = Command::cargo_bin("slack-mcp-server")
        .expect("binary built")
        .env(BOT_TOKEN_ENV, "   ")
        .env_remove(TEAM_ID_ENV)
        .output()
        .expect("binary ran");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("SLACK_BOT_TOKEN"));
}
