//! Record store interface.
//!
//! The analytics never touch storage themselves. The library service loads
//! and saves through this trait, so any backing (the SQLite blob store in
//! [`crate::db`], a test double, a remote sync layer) can sit behind it.
//!
//! Lists are exchanged in insertion order, most recent first.

use crate::error::Result;
use crate::types::{Badge, WatchedEpisode, WatchedMovie, WatchedSeries, WatchedStats};

/// Everything one mutation writes. Lists left as `None` stay as stored.
#[derive(Debug, Clone, Copy)]
pub struct StoreChanges<'a> {
    pub movies: Option<&'a [WatchedMovie]>,
    pub series: Option<&'a [WatchedSeries]>,
    pub episodes: Option<&'a [WatchedEpisode]>,
    pub stats: &'a WatchedStats,
    pub unlocked_badges: Option<&'a [Badge]>,
}

/// Load/save access to the persisted watched history.
///
/// Implementations should return an empty list (not an error) when stored
/// data cannot be decoded: analytics over a partial history beat a crash.
pub trait WatchedStore {
    fn load_watched_movies(&self) -> Result<Vec<WatchedMovie>>;
    fn save_watched_movies(&self, movies: &[WatchedMovie]) -> Result<()>;

    fn load_watched_series(&self) -> Result<Vec<WatchedSeries>>;
    fn save_watched_series(&self, series: &[WatchedSeries]) -> Result<()>;

    fn load_watched_episodes(&self) -> Result<Vec<WatchedEpisode>>;
    fn save_watched_episodes(&self, episodes: &[WatchedEpisode]) -> Result<()>;

    /// Unlocked badges only.
    fn load_unlocked_badges(&self) -> Result<Vec<Badge>>;
    fn save_unlocked_badges(&self, badges: &[Badge]) -> Result<()>;

    /// The last saved snapshot, if any.
    fn load_stats(&self) -> Result<Option<WatchedStats>>;
    fn save_stats(&self, stats: &WatchedStats) -> Result<()>;

    /// Apply a mutation's writes together.
    ///
    /// The default saves one blob at a time, so a failure part way leaves
    /// earlier writes in place. Stores with transactions should override it.
    fn commit(&self, changes: &StoreChanges<'_>) -> Result<()> {
        if let Some(movies) = changes.movies {
            self.save_watched_movies(movies)?;
        }
        if let Some(series) = changes.series {
            self.save_watched_series(series)?;
        }
        if let Some(episodes) = changes.episodes {
            self.save_watched_episodes(episodes)?;
        }
        self.save_stats(changes.stats)?;
        if let Some(badges) = changes.unlocked_badges {
            self.save_unlocked_badges(badges)?;
        }
        Ok(())
    }
}
