pub mod cli;
pub mod config;
pub mod error;
pub mod hn;
pub mod logging;
pub mod poll;
pub mod select;
pub mod site;
pub mod store;

/// Hacker News item id.
pub type ItemId = u64;
