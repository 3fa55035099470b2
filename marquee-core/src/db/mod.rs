//! Database layer for marquee
//!
//! A key-value blob store on SQLite with:
//! - Schema migrations
//! - JSON-encoded record lists, one blob per record kind
//! - The [`WatchedStore`](crate::store::WatchedStore) implementation

pub mod repo;
pub mod schema;

pub use repo::{Database, BADGES_KEY, EPISODES_KEY, MOVIES_KEY, SERIES_KEY, STATS_KEY};
