//! Typed Slack Web API gateway.
//!
//! One method per remote capability, normalized pagination cursors, and a
//! uniform error kind naming the capability that failed. Info lookups return
//! `Option` sentinels instead of errors because absence is an expected
//! outcome there, not a call failure.

mod error;
mod gateway;
mod time;
mod types;

pub use error::GatewayError;
pub use gateway::{
    ListChannelsOptions, ListFilesOptions, ListMessagesOptions, ListThreadsOptions,
    ListUsersOptions, SearchOptions, SearchSort, SlackGateway, SortDirection, DEFAULT_API_BASE,
};
pub use time::{epoch_to_iso8601, ts_to_iso8601};
pub use types::{
    AuthInfo, Bookmark, Channel, ChannelPage, ChannelTopic, FileObject, FilePage, Message,
    MessagePage, Paging, Reaction, SearchChannelRef, SearchMatch, SearchPage, SearchedMessage,
    TeamInfo, Thread, ThreadPage, User, UserPage, UserProfile,
};
