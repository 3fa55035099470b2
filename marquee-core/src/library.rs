//! Watched-history service.
//!
//! [`WatchedLibrary`] owns the mutation pipeline. Every change reloads the
//! full record set, persists it, recomputes the stats snapshot from scratch,
//! runs the badge engine, and persists whatever unlocked. The recompute is
//! O(n) in the history size on every mutation; there are no incremental
//! counters to drift.

use crate::analytics::{
    unlocked_ids, BadgeCatalog, BadgeEngine, BadgeProgress, StatsAggregator, WrappedAggregator,
    WrappedConfig, WrappedPeriod, WrappedStats, CATALOG_VERSION,
};
use crate::clock::{Clock, SystemClock};
use crate::config::{AnalyticsConfig, Config};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::store::{StoreChanges, WatchedStore};
use crate::types::{valid_rating, Badge, WatchedEpisode, WatchedMovie, WatchedSeries, WatchedStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// Result of a mutation.
#[derive(Debug, Clone)]
pub struct WatchOutcome {
    /// False when the record was a duplicate and nothing changed
    pub inserted: bool,
    pub stats: WatchedStats,
    /// Badges unlocked by this mutation, in catalog order
    pub newly_unlocked: Vec<Badge>,
}

impl WatchOutcome {
    /// The badge to surface to the user, if any.
    pub fn notification(&self) -> Option<&Badge> {
        self.newly_unlocked.first()
    }
}

/// Everything the user has logged, as one document.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryExport {
    pub exported_at: DateTime<Utc>,
    pub catalog_version: u32,
    pub movies: Vec<WatchedMovie>,
    pub series: Vec<WatchedSeries>,
    pub episodes: Vec<WatchedEpisode>,
    pub unlocked_badges: Vec<Badge>,
    pub stats: WatchedStats,
}

/// The record set as loaded from the store.
struct Records {
    movies: Vec<WatchedMovie>,
    series: Vec<WatchedSeries>,
    episodes: Vec<WatchedEpisode>,
}

/// The record list a mutation changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Touched {
    Movies,
    Series,
    Episodes,
}

pub struct WatchedLibrary<S: WatchedStore> {
    store: S,
    clock: Arc<dyn Clock>,
    aggregator: StatsAggregator,
    engine: BadgeEngine,
    wrapped: WrappedAggregator,
}

impl<S: WatchedStore> WatchedLibrary<S> {
    pub fn new(
        store: S,
        clock: Arc<dyn Clock>,
        catalog: Arc<BadgeCatalog>,
        config: &AnalyticsConfig,
    ) -> Self {
        let wrapped_config = WrappedConfig {
            top_genres_count: config.top_genres(),
            ..WrappedConfig::default()
        };
        Self {
            aggregator: StatsAggregator::new(clock.clone())
                .with_series_dates(config.include_series_dates),
            engine: BadgeEngine::new(catalog, clock.clone()),
            wrapped: WrappedAggregator::new(clock.clone(), wrapped_config),
            store,
            clock,
        }
    }

    /// Replace the wrapped-summary settings.
    pub fn with_wrapped_config(mut self, config: WrappedConfig) -> Self {
        self.wrapped = WrappedAggregator::new(self.clock.clone(), config);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn catalog(&self) -> &BadgeCatalog {
        self.engine.catalog()
    }

    // ============================================
    // Mutations
    // ============================================

    /// Log a movie. A movie with an already-logged TMDB id is ignored.
    pub fn mark_movie_watched(&self, mut movie: WatchedMovie) -> Result<WatchOutcome> {
        require_title("movie", &movie.title)?;
        movie.rating = check_rating(movie.rating)?;
        let mut records = self.load()?;
        if records.movies.iter().any(|m| m.tmdb_id == movie.tmdb_id) {
            tracing::debug!(tmdb_id = movie.tmdb_id, "Movie already watched");
            return self.unchanged(&records);
        }

        tracing::info!(tmdb_id = movie.tmdb_id, title = %movie.title, "Marking movie watched");
        records.movies.insert(0, movie);
        self.refresh(&records, Touched::Movies)
    }

    /// Log a series. A series with an already-logged TVDB id is ignored.
    pub fn mark_series_watched(&self, mut series: WatchedSeries) -> Result<WatchOutcome> {
        require_title("series", &series.title)?;
        series.rating = check_rating(series.rating)?;
        let mut records = self.load()?;
        if records.series.iter().any(|s| s.tvdb_id == series.tvdb_id) {
            tracing::debug!(tvdb_id = series.tvdb_id, "Series already watched");
            return self.unchanged(&records);
        }

        tracing::info!(tvdb_id = series.tvdb_id, title = %series.title, "Marking series watched");
        records.series.insert(0, series);
        self.refresh(&records, Touched::Series)
    }

    /// Set how many episodes of a logged series have been watched.
    ///
    /// Negative counts are stored as zero.
    pub fn update_series_progress(&self, tvdb_id: i64, watched_episodes: i64) -> Result<WatchOutcome> {
        let mut records = self.load()?;
        let series = records
            .series
            .iter_mut()
            .find(|s| s.tvdb_id == tvdb_id)
            .ok_or_else(|| Error::NotFound(format!("series {}", tvdb_id)))?;

        series.watched_episodes = watched_episodes.clamp(0, u32::MAX as i64) as u32;
        tracing::info!(
            tvdb_id,
            watched = series.watched_episodes,
            total = series.total_episodes,
            "Updated series progress"
        );
        self.refresh(&records, Touched::Series)
    }

    /// Log an episode.
    ///
    /// Ignored when the episode id is already logged, or when another record
    /// holds the same series, season, and episode number.
    pub fn mark_episode_watched(&self, mut episode: WatchedEpisode) -> Result<WatchOutcome> {
        require_title("episode series", &episode.series_title)?;
        episode.rating = check_rating(episode.rating)?;
        let mut records = self.load()?;
        let duplicate = records.episodes.iter().any(|e| {
            e.episode_id == episode.episode_id
                || (e.series_id == episode.series_id
                    && e.season_number == episode.season_number
                    && e.episode_number == episode.episode_number)
        });
        if duplicate {
            tracing::debug!(
                episode_id = episode.episode_id,
                code = %episode.code(),
                "Episode already watched"
            );
            return self.unchanged(&records);
        }

        tracing::info!(
            episode_id = episode.episode_id,
            series = %episode.series_title,
            code = %episode.code(),
            "Marking episode watched"
        );
        records.episodes.insert(0, episode);
        self.refresh(&records, Touched::Episodes)
    }

    /// Forget a movie. Badges already earned stay unlocked.
    pub fn remove_movie(&self, tmdb_id: i64) -> Result<WatchOutcome> {
        let mut records = self.load()?;
        let before = records.movies.len();
        records.movies.retain(|m| m.tmdb_id != tmdb_id);
        if records.movies.len() == before {
            return Err(Error::NotFound(format!("movie {}", tmdb_id)));
        }

        tracing::info!(tmdb_id, "Removed movie");
        self.refresh(&records, Touched::Movies)
    }

    /// Forget a series. Badges already earned stay unlocked.
    pub fn remove_series(&self, tvdb_id: i64) -> Result<WatchOutcome> {
        let mut records = self.load()?;
        let before = records.series.len();
        records.series.retain(|s| s.tvdb_id != tvdb_id);
        if records.series.len() == before {
            return Err(Error::NotFound(format!("series {}", tvdb_id)));
        }

        tracing::info!(tvdb_id, "Removed series");
        self.refresh(&records, Touched::Series)
    }

    /// Forget an episode by its episode id. Badges already earned stay unlocked.
    pub fn remove_episode(&self, episode_id: i64) -> Result<WatchOutcome> {
        let mut records = self.load()?;
        let before = records.episodes.len();
        records.episodes.retain(|e| e.episode_id != episode_id);
        if records.episodes.len() == before {
            return Err(Error::NotFound(format!("episode {}", episode_id)));
        }

        tracing::info!(episode_id, "Removed episode");
        self.refresh(&records, Touched::Episodes)
    }

    /// Rate a logged movie and optionally attach notes.
    ///
    /// Ratings do not feed any statistic, so nothing is recomputed.
    pub fn rate_movie(&self, tmdb_id: i64, rating: u8, notes: Option<String>) -> Result<()> {
        if valid_rating(Some(rating)).is_none() {
            return Err(Error::InvalidRating(rating));
        }

        let mut movies = self.store.load_watched_movies()?;
        let movie = movies
            .iter_mut()
            .find(|m| m.tmdb_id == tmdb_id)
            .ok_or_else(|| Error::NotFound(format!("movie {}", tmdb_id)))?;
        movie.rating = Some(rating);
        if notes.is_some() {
            movie.notes = notes;
        }

        tracing::info!(tmdb_id, rating, "Rated movie");
        self.store.save_watched_movies(&movies)
    }

    // ============================================
    // Queries
    // ============================================

    /// Fresh stats from the stored records. Nothing is persisted.
    pub fn stats(&self) -> Result<WatchedStats> {
        let records = self.load()?;
        self.recompute(&records)
    }

    /// The full catalog with stored unlock dates merged in.
    pub fn badges(&self) -> Result<Vec<Badge>> {
        let unlocked = self.store.load_unlocked_badges()?;
        Ok(self.catalog().merge_unlocked(&unlocked))
    }

    /// Progress toward every catalog badge.
    pub fn badge_progress(&self) -> Result<Vec<BadgeProgress>> {
        let records = self.load()?;
        let stats = self.recompute(&records)?;
        let unlocked = unlocked_ids(&self.store.load_unlocked_badges()?);
        Ok(self.engine.progress(
            &stats,
            &records.movies,
            &records.series,
            &records.episodes,
            &unlocked,
        ))
    }

    pub fn is_movie_watched(&self, tmdb_id: i64) -> Result<bool> {
        Ok(self
            .store
            .load_watched_movies()?
            .iter()
            .any(|m| m.tmdb_id == tmdb_id))
    }

    pub fn is_series_watched(&self, tvdb_id: i64) -> Result<bool> {
        Ok(self
            .store
            .load_watched_series()?
            .iter()
            .any(|s| s.tvdb_id == tvdb_id))
    }

    pub fn is_episode_watched(&self, episode_id: i64) -> Result<bool> {
        Ok(self
            .store
            .load_watched_episodes()?
            .iter()
            .any(|e| e.episode_id == episode_id))
    }

    pub fn monthly_wrapped(&self, year: i32, month: u32) -> Result<WrappedStats> {
        self.wrapped(WrappedPeriod::Month(year, month))
    }

    pub fn wrapped(&self, period: WrappedPeriod) -> Result<WrappedStats> {
        let records = self.load()?;
        Ok(self
            .wrapped
            .wrapped(period, &records.movies, &records.series, &records.episodes))
    }

    /// Months with any logged record, most recent first.
    pub fn available_months(&self) -> Result<Vec<WrappedPeriod>> {
        let records = self.load()?;
        Ok(self
            .wrapped
            .available_months(&records.movies, &records.series, &records.episodes))
    }

    pub fn export(&self) -> Result<HistoryExport> {
        let records = self.load()?;
        let stats = self.recompute(&records)?;
        Ok(HistoryExport {
            exported_at: self.clock.now().with_timezone(&Utc),
            catalog_version: CATALOG_VERSION,
            unlocked_badges: self.store.load_unlocked_badges()?,
            movies: records.movies,
            series: records.series,
            episodes: records.episodes,
            stats,
        })
    }

    // ============================================
    // Pipeline
    // ============================================

    fn load(&self) -> Result<Records> {
        Ok(Records {
            movies: self.store.load_watched_movies()?,
            series: self.store.load_watched_series()?,
            episodes: self.store.load_watched_episodes()?,
        })
    }

    fn recompute(&self, records: &Records) -> Result<WatchedStats> {
        let previous_longest = self
            .store
            .load_stats()?
            .map(|s| s.longest_streak)
            .unwrap_or(0);
        Ok(self.aggregator.recompute(
            &records.movies,
            &records.series,
            &records.episodes,
            previous_longest,
        ))
    }

    /// Recompute, unlock what is newly earned, and persist the touched list
    /// with the snapshot and unlocks in one commit.
    fn refresh(&self, records: &Records, touched: Touched) -> Result<WatchOutcome> {
        let stats = self.recompute(records)?;

        let mut unlocked = self.store.load_unlocked_badges()?;
        let newly_unlocked = self.engine.evaluate(
            &stats,
            &records.movies,
            &records.series,
            &records.episodes,
            &unlocked_ids(&unlocked),
        );
        unlocked.extend(newly_unlocked.iter().cloned());

        self.store.commit(&StoreChanges {
            movies: (touched == Touched::Movies).then_some(records.movies.as_slice()),
            series: (touched == Touched::Series).then_some(records.series.as_slice()),
            episodes: (touched == Touched::Episodes).then_some(records.episodes.as_slice()),
            stats: &stats,
            unlocked_badges: (!newly_unlocked.is_empty()).then_some(unlocked.as_slice()),
        })?;

        Ok(WatchOutcome {
            inserted: true,
            stats,
            newly_unlocked,
        })
    }

    fn unchanged(&self, records: &Records) -> Result<WatchOutcome> {
        Ok(WatchOutcome {
            inserted: false,
            stats: self.recompute(records)?,
            newly_unlocked: Vec::new(),
        })
    }
}

impl WatchedLibrary<Database> {
    /// Open the library at the configured database path on the system clock.
    pub fn open(config: &Config) -> Result<Self> {
        let db_path = Config::database_path();
        tracing::info!(path = %db_path.display(), "Opening database");

        let db = Database::open(&db_path)?;
        db.migrate()?;
        Ok(Self::new(
            db,
            Arc::new(SystemClock),
            Arc::new(BadgeCatalog::standard()),
            &config.analytics,
        ))
    }
}

fn require_title(kind: &str, title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(Error::InvalidRecord(format!("{} title is empty", kind)));
    }
    Ok(())
}

fn check_rating(rating: Option<u8>) -> Result<Option<u8>> {
    match rating {
        Some(r) if valid_rating(Some(r)).is_none() => Err(Error::InvalidRating(r)),
        other => Ok(other),
    }
}
