//! MCP server exposing a Slack workspace over stdio.
//!
//! Three surfaces share one [`slack_gateway::SlackGateway`]: tools for
//! paged reads and reactions, resources for whole-view JSON documents, and
//! prompt templates for common investigation workflows.

mod config;
mod prompts;
mod resources;
mod server;
mod shape;

pub use config::{Config, BOT_TOKEN_ENV, TEAM_ID_ENV};
pub use server::SlackMcpServer;
