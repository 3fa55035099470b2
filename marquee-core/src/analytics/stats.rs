//! Statistics recomputation.
//!
//! [`StatsAggregator::recompute`] rebuilds the whole [`WatchedStats`]
//! snapshot from the record lists on every change. There is no incremental
//! path: each recompute is O(n) over the history, which keeps the snapshot
//! free of drift between insert and delete paths.

use super::local_date;
use super::streak::{compute_streak, Streak};
use crate::clock::Clock;
use crate::types::{WatchedEpisode, WatchedMovie, WatchedSeries, WatchedStats};
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Rolling "this week" window.
pub const WEEK_WINDOW_DAYS: i64 = 7;
/// Rolling "this month" window.
pub const MONTH_WINDOW_DAYS: i64 = 30;

/// Rebuilds statistics snapshots against an injected clock.
#[derive(Clone)]
pub struct StatsAggregator {
    clock: Arc<dyn Clock>,
    include_series_dates: bool,
}

impl StatsAggregator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            include_series_dates: false,
        }
    }

    /// Count series watch dates as activity for streaks and `last_watched_date`.
    pub fn with_series_dates(mut self, include: bool) -> Self {
        self.include_series_dates = include;
        self
    }

    /// Recompute the snapshot from the full record set.
    ///
    /// Record slices are in store order (most recent first). The resulting
    /// `longest_streak` is never lower than `previous_longest_streak`, so a
    /// historical best survives deletion of the records that produced it.
    pub fn recompute(
        &self,
        movies: &[WatchedMovie],
        series: &[WatchedSeries],
        episodes: &[WatchedEpisode],
        previous_longest_streak: u32,
    ) -> WatchedStats {
        let now = self.clock.now();
        let now_utc = now.with_timezone(&Utc);
        let week_start = now_utc - Duration::days(WEEK_WINDOW_DAYS);
        let month_start = now_utc - Duration::days(MONTH_WINDOW_DAYS);

        let movie_dates = || movies.iter().map(|m| m.watched_date);
        let series_dates = || series.iter().map(|s| s.watched_date);
        let episode_dates = || episodes.iter().map(|e| e.watched_date);

        let (genre_counts, unique_genres) = count_genres(movies.iter().map(|m| &m.genres));
        let (series_genre_counts, unique_series_genres) =
            count_genres(series.iter().map(|s| &s.genres));

        // Activity days for the streak
        let offset = *now.offset();
        let mut activity: Vec<DateTime<Utc>> = movie_dates().chain(episode_dates()).collect();
        if self.include_series_dates {
            activity.extend(series_dates());
        }
        let Streak { current, longest } = compute_streak(
            activity.iter().map(|ts| local_date(*ts, &offset)),
            now.date_naive(),
        );

        // Index 0 is the most recently inserted record of each kind
        let mut latest = vec![
            movies.first().map(|m| m.watched_date),
            episodes.first().map(|e| e.watched_date),
        ];
        if self.include_series_dates {
            latest.push(series.first().map(|s| s.watched_date));
        }
        let last_watched_date = latest.into_iter().flatten().max();

        let stats = WatchedStats {
            total_movies: movies.len() as u32,
            total_runtime: movies.iter().map(|m| m.runtime.unwrap_or(0) as u64).sum(),
            genre_counts,
            unique_genres,
            movies_this_week: count_since(movie_dates(), week_start),
            movies_this_month: count_since(movie_dates(), month_start),

            current_streak: current,
            longest_streak: longest.max(previous_longest_streak),
            last_watched_date,

            total_series: series.len() as u32,
            completed_series: series.iter().filter(|s| s.is_completed()).count() as u32,
            series_genre_counts,
            unique_series_genres,
            series_this_week: count_since(series_dates(), week_start),
            series_this_month: count_since(series_dates(), month_start),

            total_episodes: episodes.len() as u32,
            episodes_runtime: episodes.iter().map(|e| e.runtime.unwrap_or(0) as u64).sum(),
            episodes_this_week: count_since(episode_dates(), week_start),
            episodes_this_month: count_since(episode_dates(), month_start),
        };

        tracing::debug!(
            movies = stats.total_movies,
            series = stats.total_series,
            episodes = stats.total_episodes,
            current_streak = stats.current_streak,
            longest_streak = stats.longest_streak,
            "Recomputed watched stats"
        );

        stats
    }
}

fn count_since(dates: impl Iterator<Item = DateTime<Utc>>, since: DateTime<Utc>) -> u32 {
    dates.filter(|d| *d >= since).count() as u32
}

/// Every genre tag of every record adds one to that genre.
fn count_genres<'a>(
    genre_lists: impl Iterator<Item = &'a Vec<String>>,
) -> (BTreeMap<String, u32>, BTreeSet<String>) {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for genres in genre_lists {
        for genre in genres {
            *counts.entry(genre.clone()).or_insert(0) += 1;
        }
    }
    let unique = counts.keys().cloned().collect();
    (counts, unique)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::parse("2024-06-12T15:00:00+00:00").unwrap())
    }

    fn ago(days: i64) -> DateTime<Utc> {
        clock().now().with_timezone(&Utc) - Duration::days(days)
    }

    fn movie(tmdb_id: i64, days: i64, genres: &[&str], runtime: Option<u32>) -> WatchedMovie {
        let mut m = WatchedMovie::new(tmdb_id, format!("Movie {}", tmdb_id), ago(days));
        m.genres = genres.iter().map(|g| g.to_string()).collect();
        m.runtime = runtime;
        m
    }

    fn episode(episode_id: i64, days: i64, runtime: Option<u32>) -> WatchedEpisode {
        let mut e = WatchedEpisode::new(episode_id, 1, "Show", 1, episode_id as u32, ago(days));
        e.runtime = runtime;
        e
    }

    #[test]
    fn test_empty_history() {
        let stats = StatsAggregator::new(clock()).recompute(&[], &[], &[], 0);
        assert_eq!(stats, WatchedStats::default());
    }

    #[test]
    fn test_movie_totals_and_genres() {
        let movies = vec![
            movie(1, 0, &["Action", "Comedy"], Some(120)),
            movie(2, 1, &["Action"], None),
        ];
        let stats = StatsAggregator::new(clock()).recompute(&movies, &[], &[], 0);

        assert_eq!(stats.total_movies, 2);
        assert_eq!(stats.total_runtime, 120);
        assert_eq!(stats.genre_counts.get("Action"), Some(&2));
        assert_eq!(stats.genre_counts.get("Comedy"), Some(&1));
        assert_eq!(stats.unique_genres.len(), 2);
    }

    #[test]
    fn test_rolling_windows() {
        let movies = vec![
            movie(1, 0, &[], None),
            movie(2, 6, &[], None),
            movie(3, 8, &[], None),
            movie(4, 29, &[], None),
            movie(5, 31, &[], None),
        ];
        let stats = StatsAggregator::new(clock()).recompute(&movies, &[], &[], 0);
        assert_eq!(stats.movies_this_week, 2);
        assert_eq!(stats.movies_this_month, 4);
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let movies = vec![movie(1, WEEK_WINDOW_DAYS, &[], None)];
        let stats = StatsAggregator::new(clock()).recompute(&movies, &[], &[], 0);
        assert_eq!(stats.movies_this_week, 1);
    }

    #[test]
    fn test_series_fields() {
        let mut done = WatchedSeries::new(10, "Done", ago(2));
        done.total_episodes = 8;
        done.watched_episodes = 8;
        done.genres = vec!["Drama".into(), "Crime".into()];
        let mut partial = WatchedSeries::new(11, "Partial", ago(20));
        partial.total_episodes = 10;
        partial.watched_episodes = 3;
        partial.genres = vec!["Drama".into()];

        let stats = StatsAggregator::new(clock()).recompute(&[], &[done, partial], &[], 0);
        assert_eq!(stats.total_series, 2);
        assert_eq!(stats.completed_series, 1);
        assert_eq!(stats.series_genre_counts.get("Drama"), Some(&2));
        assert_eq!(stats.unique_series_genres.len(), 2);
        assert_eq!(stats.series_this_week, 1);
        assert_eq!(stats.series_this_month, 2);
    }

    #[test]
    fn test_episode_fields_and_combined_totals() {
        let movies = vec![movie(1, 0, &[], Some(100))];
        let episodes = vec![episode(1, 0, Some(45)), episode(2, 10, Some(50)), episode(3, 40, None)];
        let stats = StatsAggregator::new(clock()).recompute(&movies, &[], &episodes, 0);

        assert_eq!(stats.total_episodes, 3);
        assert_eq!(stats.episodes_runtime, 95);
        assert_eq!(stats.episodes_this_week, 1);
        assert_eq!(stats.episodes_this_month, 2);
        assert_eq!(stats.total_watched(), stats.total_movies + stats.total_episodes);
        assert_eq!(
            stats.total_combined_runtime(),
            stats.total_runtime + stats.episodes_runtime
        );
    }

    #[test]
    fn test_streak_uses_movies_and_episodes() {
        let movies = vec![movie(1, 0, &[], None), movie(2, 2, &[], None)];
        let episodes = vec![episode(1, 1, None)];
        let stats = StatsAggregator::new(clock()).recompute(&movies, &[], &episodes, 0);
        assert_eq!(stats.current_streak, 3);
        assert_eq!(stats.longest_streak, 3);
    }

    #[test]
    fn test_series_dates_excluded_by_default() {
        let movies = vec![movie(1, 0, &[], None)];
        let series = vec![WatchedSeries::new(1, "Show", ago(1))];

        let stats = StatsAggregator::new(clock()).recompute(&movies, &series, &[], 0);
        assert_eq!(stats.current_streak, 1);

        let stats = StatsAggregator::new(clock())
            .with_series_dates(true)
            .recompute(&movies, &series, &[], 0);
        assert_eq!(stats.current_streak, 2);
    }

    #[test]
    fn test_longest_streak_ratchet() {
        let movies = vec![movie(1, 0, &[], None)];
        let stats = StatsAggregator::new(clock()).recompute(&movies, &[], &[], 9);
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 9);
    }

    #[test]
    fn test_last_watched_uses_head_of_each_list() {
        // Head of the movie list is older than a later entry: store order wins
        let movies = vec![movie(1, 3, &[], None), movie(2, 0, &[], None)];
        let episodes = vec![episode(1, 2, None)];
        let series = vec![WatchedSeries::new(1, "Show", ago(0))];

        let stats = StatsAggregator::new(clock()).recompute(&movies, &series, &episodes, 0);
        assert_eq!(stats.last_watched_date, Some(ago(2)));

        let stats = StatsAggregator::new(clock())
            .with_series_dates(true)
            .recompute(&movies, &series, &episodes, 0);
        assert_eq!(stats.last_watched_date, Some(ago(0)));
    }
}
