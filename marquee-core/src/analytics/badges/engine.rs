//! Achievement rule engine.
//!
//! Interprets catalog rows against a stats snapshot and the raw records.
//! Record-derived facts (today's movies, weekend movies, night watches, ...)
//! are computed once per evaluation, then every row is a lookup plus a
//! comparison.
//!
//! Missing data counts as zero. A badge is only unlocked when its value is
//! known to meet the requirement.

use super::catalog::{
    BadgeCatalog, BadgeDefinition, Condition, CLASSIC_MOVIE_BEFORE, CLASSIC_SERIES_BEFORE,
    EARLY_BIRD_HOURS, LONG_MOVIE_MINUTES, LONG_SERIES_EPISODES, NIGHT_OWL_HOURS,
};
use crate::analytics::local_date;
use crate::clock::Clock;
use crate::types::{Badge, WatchedEpisode, WatchedMovie, WatchedSeries, WatchedStats};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Timelike, Utc, Weekday};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

/// Where a badge stands relative to its requirement.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeProgress {
    pub id: String,
    /// Current condition value (0 or 1 for existence badges)
    pub current: u64,
    pub requirement: u32,
    pub unlocked: bool,
}

impl BadgeProgress {
    /// Completion in 0.0-1.0.
    pub fn fraction(&self) -> f64 {
        if self.requirement == 0 {
            return 0.0;
        }
        (self.current as f64 / self.requirement as f64).min(1.0)
    }
}

/// Ids of the badges in `badges` that are unlocked.
pub fn unlocked_ids(badges: &[Badge]) -> HashSet<String> {
    badges
        .iter()
        .filter(|b| b.is_unlocked())
        .map(|b| b.id.clone())
        .collect()
}

/// Evaluates the badge catalog.
#[derive(Clone)]
pub struct BadgeEngine {
    catalog: Arc<BadgeCatalog>,
    clock: Arc<dyn Clock>,
}

impl BadgeEngine {
    pub fn new(catalog: Arc<BadgeCatalog>, clock: Arc<dyn Clock>) -> Self {
        Self { catalog, clock }
    }

    pub fn catalog(&self) -> &BadgeCatalog {
        &self.catalog
    }

    /// Badges whose condition is newly met, in catalog order, stamped as
    /// unlocked now.
    ///
    /// Rows whose id is in `already_unlocked` are skipped entirely, so feeding
    /// the result back in makes a repeat call return nothing. Episode-based
    /// conditions read their counts from `stats`.
    pub fn evaluate(
        &self,
        stats: &WatchedStats,
        movies: &[WatchedMovie],
        series: &[WatchedSeries],
        _episodes: &[WatchedEpisode],
        already_unlocked: &HashSet<String>,
    ) -> Vec<Badge> {
        let now = self.clock.now();
        let facts = Facts::gather(stats, movies, series, now);
        let unlocked_at = now.with_timezone(&Utc);

        let newly: Vec<Badge> = self
            .catalog
            .definitions()
            .iter()
            .filter(|def| !already_unlocked.contains(&def.id))
            .filter(|def| facts.is_met(def))
            .map(|def| {
                let mut badge = def.to_badge();
                badge.unlocked_date = Some(unlocked_at);
                badge
            })
            .collect();

        for badge in &newly {
            tracing::info!(
                badge = %badge.id,
                rarity = badge.rarity.as_str(),
                "Badge unlocked"
            );
        }

        newly
    }

    /// Progress for every catalog row, in catalog order.
    pub fn progress(
        &self,
        stats: &WatchedStats,
        movies: &[WatchedMovie],
        series: &[WatchedSeries],
        _episodes: &[WatchedEpisode],
        already_unlocked: &HashSet<String>,
    ) -> Vec<BadgeProgress> {
        let facts = Facts::gather(stats, movies, series, self.clock.now());
        self.catalog
            .definitions()
            .iter()
            .map(|def| BadgeProgress {
                id: def.id.clone(),
                current: facts.value(&def.condition),
                requirement: if def.condition.is_existence() {
                    1
                } else {
                    def.requirement
                },
                unlocked: already_unlocked.contains(&def.id),
            })
            .collect()
    }
}

/// Values the conditions read, computed once per evaluation.
struct Facts<'a> {
    stats: &'a WatchedStats,
    movies_today: u64,
    weekend_movies: u64,
    night_owl: bool,
    early_bird: bool,
    long_movie: bool,
    classic_movies: u64,
    modern_movies: u64,
    long_series: bool,
    classic_series: u64,
    modern_series: u64,
}

impl<'a> Facts<'a> {
    fn gather(
        stats: &'a WatchedStats,
        movies: &[WatchedMovie],
        series: &[WatchedSeries],
        now: DateTime<FixedOffset>,
    ) -> Self {
        let offset = *now.offset();
        let today = now.date_naive();
        let current_year = now.year();
        let weekend = weekend_containing(today);

        let local_hour = |ts: DateTime<Utc>| ts.with_timezone(&offset).hour();
        let in_hours = |ts: DateTime<Utc>, (start, end): (u32, u32)| {
            let hour = local_hour(ts);
            hour >= start && hour < end
        };

        let movie_days = || movies.iter().map(|m| local_date(m.watched_date, &offset));

        Facts {
            stats,
            movies_today: movie_days().filter(|d| *d == today).count() as u64,
            weekend_movies: match weekend {
                Some((sat, sun)) => movie_days().filter(|d| *d >= sat && *d <= sun).count() as u64,
                None => 0,
            },
            night_owl: movies.iter().any(|m| in_hours(m.watched_date, NIGHT_OWL_HOURS)),
            early_bird: movies.iter().any(|m| in_hours(m.watched_date, EARLY_BIRD_HOURS)),
            long_movie: movies
                .iter()
                .any(|m| m.runtime.is_some_and(|r| r >= LONG_MOVIE_MINUTES)),
            classic_movies: movies
                .iter()
                .filter(|m| m.year.is_some_and(|y| y < CLASSIC_MOVIE_BEFORE))
                .count() as u64,
            modern_movies: movies
                .iter()
                .filter(|m| m.year == Some(current_year))
                .count() as u64,
            long_series: series
                .iter()
                .any(|s| s.total_episodes >= LONG_SERIES_EPISODES),
            classic_series: series
                .iter()
                .filter(|s| s.year.is_some_and(|y| y < CLASSIC_SERIES_BEFORE))
                .count() as u64,
            modern_series: series
                .iter()
                .filter(|s| s.year == Some(current_year))
                .count() as u64,
        }
    }

    fn value(&self, condition: &Condition) -> u64 {
        let s = self.stats;
        match *condition {
            Condition::TotalMovies => s.total_movies as u64,
            Condition::TotalSeries => s.total_series as u64,
            Condition::TotalEpisodes => s.total_episodes as u64,
            Condition::TotalWatched => s.total_watched() as u64,
            Condition::Genre(genre) => genre_count(&s.genre_counts, genre),
            Condition::SeriesGenre(genre) => genre_count(&s.series_genre_counts, genre),
            Condition::MoviesToday => self.movies_today,
            Condition::MoviesThisWeek => s.movies_this_week as u64,
            Condition::CurrentStreak => s.current_streak as u64,
            Condition::NightOwl => self.night_owl as u64,
            Condition::EarlyBird => self.early_bird as u64,
            Condition::UniqueGenres => s.unique_genres.len() as u64,
            Condition::LongMovie => self.long_movie as u64,
            Condition::ClassicMovies => self.classic_movies,
            Condition::ModernMovies => self.modern_movies,
            Condition::WeekendMovies => self.weekend_movies,
            Condition::CompletedSeries => s.completed_series as u64,
            Condition::LongSeries => self.long_series as u64,
            Condition::ClassicSeries => self.classic_series,
            Condition::ModernSeries => self.modern_series,
            Condition::UniqueSeriesGenres => s.unique_series_genres.len() as u64,
        }
    }

    fn is_met(&self, def: &BadgeDefinition) -> bool {
        let value = self.value(&def.condition);
        if def.condition.is_existence() {
            value > 0
        } else {
            // A zero requirement would grant the badge unearned
            def.requirement > 0 && value >= def.requirement as u64
        }
    }
}

/// Count stored under exactly this genre name; absent genres count as zero.
fn genre_count(counts: &BTreeMap<String, u32>, genre: &str) -> u64 {
    counts.get(genre).copied().unwrap_or(0) as u64
}

/// The Saturday-Sunday span containing `day`, if `day` is on a weekend.
fn weekend_containing(day: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    match day.weekday() {
        Weekday::Sat => Some((day, day + Duration::days(1))),
        Weekday::Sun => Some((day - Duration::days(1), day)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::badges::{genre_slug, MAIN_GENRES};
    use crate::analytics::StatsAggregator;
    use crate::clock::FixedClock;

    // Wednesday
    const NOW: &str = "2024-06-12T15:00:00+00:00";

    fn clock_at(rfc3339: &str) -> Arc<dyn Clock> {
        Arc::new(FixedClock::parse(rfc3339).unwrap())
    }

    fn engine_at(rfc3339: &str) -> BadgeEngine {
        BadgeEngine::new(Arc::new(BadgeCatalog::standard()), clock_at(rfc3339))
    }

    fn ts(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn movies_on(dates: &[&str]) -> Vec<WatchedMovie> {
        dates
            .iter()
            .enumerate()
            .map(|(i, d)| WatchedMovie::new(i as i64 + 1, format!("Movie {}", i), ts(d)))
            .collect()
    }

    fn evaluate_at(rfc3339: &str, movies: &[WatchedMovie], series: &[WatchedSeries]) -> Vec<String> {
        let clock = clock_at(rfc3339);
        let stats = StatsAggregator::new(clock.clone()).recompute(movies, series, &[], 0);
        engine_at(rfc3339)
            .evaluate(&stats, movies, series, &[], &HashSet::new())
            .into_iter()
            .map(|b| b.id)
            .collect()
    }

    fn unlocks(stats: &WatchedStats, id: &str) -> bool {
        engine_at(NOW)
            .evaluate(stats, &[], &[], &[], &HashSet::new())
            .iter()
            .any(|b| b.id == id)
    }

    /// Stats where the counter read by a badge family holds `value`.
    fn stats_for(family: &str, value: u32) -> WatchedStats {
        let mut stats = WatchedStats::default();
        match family {
            "movies" => stats.total_movies = value,
            "series" => stats.total_series = value,
            "episodes" => stats.total_episodes = value,
            "watched" => {
                stats.total_movies = value / 2;
                stats.total_episodes = value - value / 2;
            }
            "marathon_week" => stats.movies_this_week = value,
            "dedication_streak" => stats.current_streak = value,
            "series_binger" => stats.completed_series = value,
            "variety" => {
                stats.unique_genres = (0..value).map(|i| format!("Genre {}", i)).collect();
            }
            "series_variety" => {
                stats.unique_series_genres = (0..value).map(|i| format!("Genre {}", i)).collect();
            }
            other => panic!("unknown family {}", other),
        }
        stats
    }

    #[test]
    fn test_threshold_boundary() {
        let mut stats = WatchedStats {
            total_movies: 4,
            ..Default::default()
        };
        let engine = engine_at(NOW);
        let ids: Vec<_> = engine
            .evaluate(&stats, &[], &[], &[], &HashSet::new())
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert!(ids.contains(&"movies_1".to_string()));
        assert!(!ids.contains(&"movies_5".to_string()));

        stats.total_movies = 5;
        let unlocked: HashSet<String> = ids.into_iter().collect();
        let ids: Vec<_> = engine
            .evaluate(&stats, &[], &[], &[], &unlocked)
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["movies_5".to_string()]);
    }

    #[test]
    fn test_idempotent_with_merged_unlocks() {
        let movies = movies_on(&[
            "2024-06-12T01:00:00Z",
            "2024-06-11T21:00:00Z",
            "2024-06-10T21:00:00Z",
        ]);
        let clock = clock_at(NOW);
        let stats = StatsAggregator::new(clock).recompute(&movies, &[], &[], 0);
        let engine = engine_at(NOW);

        let first = engine.evaluate(&stats, &movies, &[], &[], &HashSet::new());
        assert!(!first.is_empty());
        let unlocked = unlocked_ids(&first);
        let second = engine.evaluate(&stats, &movies, &[], &[], &unlocked);
        assert!(second.is_empty());
    }

    #[test]
    fn test_unlocked_badges_are_stamped() {
        let stats = WatchedStats {
            total_movies: 1,
            ..Default::default()
        };
        let badges = engine_at(NOW).evaluate(&stats, &[], &[], &[], &HashSet::new());
        assert_eq!(badges[0].id, "movies_1");
        assert_eq!(badges[0].unlocked_date, Some(ts(NOW)));
    }

    #[test]
    fn test_genre_badges_only_for_present_genres() {
        let mut stats = WatchedStats::default();
        stats.genre_counts.insert("Horror".into(), 5);
        stats.genre_counts.insert("Documentary".into(), 40);
        let ids: Vec<_> = engine_at(NOW)
            .evaluate(&stats, &[], &[], &[], &HashSet::new())
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(ids, vec!["genre_horror_5".to_string()]);
    }

    #[test]
    fn test_case_variant_tags_are_distinct_genres() {
        let mut movies = movies_on(&[
            "2024-06-10T20:00:00Z",
            "2024-06-11T20:00:00Z",
            "2024-06-12T10:00:00Z",
        ]);
        for m in &mut movies {
            m.genres = vec!["Horror".to_string(), "horror".to_string()];
        }
        let stats = StatsAggregator::new(clock_at(NOW)).recompute(&movies, &[], &[], 0);
        assert_eq!(stats.genre_counts.get("Horror"), Some(&3));
        assert_eq!(stats.genre_counts.get("horror"), Some(&3));

        let ids = evaluate_at(NOW, &movies, &[]);
        assert!(ids.contains(&"movies_1".to_string()));
        assert!(!ids.iter().any(|id| id.starts_with("genre_horror")));

        let mut lower_only = WatchedStats::default();
        lower_only.genre_counts.insert("horror".into(), 5);
        assert!(!unlocks(&lower_only, "genre_horror_5"));
    }

    #[test]
    fn test_series_genre_badges() {
        let mut stats = WatchedStats::default();
        stats.series_genre_counts.insert("Drama".into(), 5);
        let ids: Vec<_> = engine_at(NOW)
            .evaluate(&stats, &[], &[], &[], &HashSet::new())
            .into_iter()
            .map(|b| b.id)
            .collect();
        assert_eq!(
            ids,
            vec![
                "series_genre_drama_3".to_string(),
                "series_genre_drama_5".to_string()
            ]
        );
    }

    #[test]
    fn test_marathon_day_counts_today_only() {
        let movies = movies_on(&[
            "2024-06-12T10:00:00Z",
            "2024-06-12T13:00:00Z",
            "2024-06-11T23:00:00Z",
        ]);
        let ids = evaluate_at(NOW, &movies, &[]);
        assert!(ids.contains(&"marathon_day_2".to_string()));
        assert!(!ids.contains(&"marathon_day_3".to_string()));
    }

    #[test]
    fn test_night_owl_and_early_bird_use_local_hours() {
        // 20:30 UTC is 05:30 at +09:00
        let movies = movies_on(&["2024-06-11T20:30:00Z"]);
        let ids = evaluate_at("2024-06-12T15:00:00+09:00", &movies, &[]);
        assert!(ids.contains(&"early_bird".to_string()));
        assert!(!ids.contains(&"night_owl".to_string()));

        let ids = evaluate_at(NOW, &movies, &[]);
        assert!(!ids.contains(&"early_bird".to_string()));

        let movies = movies_on(&["2024-06-10T04:59:00Z"]);
        let ids = evaluate_at(NOW, &movies, &[]);
        assert!(ids.contains(&"night_owl".to_string()));
    }

    #[test]
    fn test_long_movie_and_release_years() {
        let mut movies = movies_on(&[
            "2024-06-01T20:00:00Z",
            "2024-06-02T20:00:00Z",
            "2024-06-03T20:00:00Z",
            "2024-06-04T20:00:00Z",
            "2024-06-05T20:00:00Z",
        ]);
        for m in &mut movies {
            m.year = Some(1975);
        }
        movies[0].runtime = Some(180);
        let ids = evaluate_at(NOW, &movies, &[]);
        assert!(ids.contains(&"long_movie".to_string()));
        assert!(ids.contains(&"classic_lover".to_string()));
        assert!(!ids.contains(&"modern_fan".to_string()));

        for m in &mut movies {
            m.year = Some(2024);
            m.runtime = Some(179);
        }
        let ids = evaluate_at(NOW, &movies, &[]);
        assert!(!ids.contains(&"long_movie".to_string()));
        assert!(!ids.contains(&"classic_lover".to_string()));
        assert!(ids.contains(&"modern_fan".to_string()));
    }

    #[test]
    fn test_missing_year_is_not_classic() {
        let movies = movies_on(&[
            "2024-06-01T20:00:00Z",
            "2024-06-02T20:00:00Z",
            "2024-06-03T20:00:00Z",
            "2024-06-04T20:00:00Z",
            "2024-06-05T20:00:00Z",
        ]);
        let ids = evaluate_at(NOW, &movies, &[]);
        assert!(!ids.contains(&"classic_lover".to_string()));
    }

    #[test]
    fn test_weekend_warrior() {
        let movies = movies_on(&[
            "2024-06-15T10:00:00Z",
            "2024-06-16T10:00:00Z",
            "2024-06-16T14:00:00Z",
        ]);
        // Sunday of that weekend
        let ids = evaluate_at("2024-06-16T20:00:00+00:00", &movies, &[]);
        assert!(ids.contains(&"weekend_warrior".to_string()));

        // The following Monday: no weekend contains today
        let ids = evaluate_at("2024-06-17T09:00:00+00:00", &movies, &[]);
        assert!(!ids.contains(&"weekend_warrior".to_string()));
    }

    #[test]
    fn test_series_specials() {
        let watched = ts("2024-05-01T20:00:00Z");
        let mut long = WatchedSeries::new(1, "Long", watched);
        long.total_episodes = 120;
        long.watched_episodes = 120;
        long.year = Some(1995);
        let mut old = WatchedSeries::new(2, "Old", watched);
        old.year = Some(1989);
        let mut older = WatchedSeries::new(3, "Older", watched);
        older.year = Some(1970);

        let ids = evaluate_at(NOW, &[], &[long, old, older]);
        assert!(ids.contains(&"series_binger".to_string()));
        assert!(!ids.contains(&"series_binger_5".to_string()));
        assert!(ids.contains(&"series_long".to_string()));
        assert!(ids.contains(&"series_classic".to_string()));
        assert!(!ids.contains(&"series_modern".to_string()));
    }

    #[test]
    fn test_counter_rows_unlock_exactly_at_requirement() {
        let families = [
            "movies",
            "series",
            "episodes",
            "watched",
            "marathon_week",
            "dedication_streak",
        ];
        let catalog = BadgeCatalog::standard();
        let mut checked = 0;
        for def in catalog.definitions() {
            let Some((family, threshold)) = families.iter().find_map(|f| {
                def.id
                    .strip_prefix(f)
                    .and_then(|rest| rest.strip_prefix('_'))
                    .and_then(|n| n.parse::<u32>().ok())
                    .map(|n| (*f, n))
            }) else {
                continue;
            };
            assert_eq!(def.requirement, threshold, "{}", def.id);
            assert!(
                !unlocks(&stats_for(family, threshold - 1), &def.id),
                "{} unlocked one short",
                def.id
            );
            assert!(
                unlocks(&stats_for(family, threshold), &def.id),
                "{} locked at its requirement",
                def.id
            );
            checked += 1;
        }
        // movies, series, episodes, watched, marathon week, dedication
        assert_eq!(checked, 9 + 6 + 7 + 5 + 3 + 7);
    }

    #[test]
    fn test_variety_and_completion_rows_unlock_exactly_at_requirement() {
        let rows = [
            ("variety_lover", "variety", 5),
            ("genre_master", "variety", 10),
            ("series_genre_variety", "series_variety", 5),
            ("series_binger", "series_binger", 1),
            ("series_binger_5", "series_binger", 5),
            ("series_binger_20", "series_binger", 20),
        ];
        for (id, family, requirement) in rows {
            assert!(!unlocks(&stats_for(family, requirement - 1), id), "{}", id);
            assert!(unlocks(&stats_for(family, requirement), id), "{}", id);
        }
    }

    #[test]
    fn test_genre_tiers_unlock_exactly_at_requirement() {
        for genre in MAIN_GENRES {
            let slug = genre_slug(genre);
            for tier in [5, 10, 25] {
                let id = format!("genre_{}_{}", slug, tier);
                let mut stats = WatchedStats::default();
                stats.genre_counts.insert(genre.to_string(), tier - 1);
                assert!(!unlocks(&stats, &id), "{}", id);
                stats.genre_counts.insert(genre.to_string(), tier);
                assert!(unlocks(&stats, &id), "{}", id);
            }
            for tier in [3, 5, 10] {
                let id = format!("series_genre_{}_{}", slug, tier);
                let mut stats = WatchedStats::default();
                stats.series_genre_counts.insert(genre.to_string(), tier - 1);
                assert!(!unlocks(&stats, &id), "{}", id);
                stats.series_genre_counts.insert(genre.to_string(), tier);
                assert!(unlocks(&stats, &id), "{}", id);
            }
        }
    }

    #[test]
    fn test_series_modern_and_classic_boundaries() {
        let watched = ts("2024-05-01T20:00:00Z");
        let series_from = |years: &[i32]| -> Vec<WatchedSeries> {
            years
                .iter()
                .enumerate()
                .map(|(i, year)| {
                    let mut s = WatchedSeries::new(i as i64 + 1, format!("Show {}", i), watched);
                    s.year = Some(*year);
                    s
                })
                .collect()
        };

        let ids = evaluate_at(NOW, &[], &series_from(&[2024, 2024]));
        assert!(!ids.contains(&"series_modern".to_string()));
        let ids = evaluate_at(NOW, &[], &series_from(&[2024, 2024, 2024]));
        assert!(ids.contains(&"series_modern".to_string()));
        assert!(!ids.contains(&"series_classic".to_string()));

        let ids = evaluate_at(NOW, &[], &series_from(&[1999, 1999, 2000]));
        assert!(!ids.contains(&"series_classic".to_string()));
        let ids = evaluate_at(NOW, &[], &series_from(&[1999, 1999, 1950]));
        assert!(ids.contains(&"series_classic".to_string()));
    }

    #[test]
    fn test_completed_series_reach_five() {
        let watched = ts("2024-05-01T20:00:00Z");
        let series: Vec<WatchedSeries> = (1..=5)
            .map(|id| {
                let mut s = WatchedSeries::new(id, format!("Show {}", id), watched);
                s.total_episodes = 8;
                s.watched_episodes = 8;
                s
            })
            .collect();

        let ids = evaluate_at(NOW, &[], &series[..4]);
        assert!(ids.contains(&"series_binger".to_string()));
        assert!(!ids.contains(&"series_binger_5".to_string()));

        let ids = evaluate_at(NOW, &[], &series);
        assert!(ids.contains(&"series_binger_5".to_string()));
        assert!(ids.contains(&"series_5".to_string()));
        assert!(!ids.contains(&"series_binger_20".to_string()));
    }

    #[test]
    fn test_zero_requirement_never_unlocks() {
        let mut def = BadgeCatalog::standard().get("movies_1").unwrap().clone();
        def.requirement = 0;
        let engine = BadgeEngine::new(
            Arc::new(BadgeCatalog::from_definitions(vec![def])),
            clock_at(NOW),
        );
        let badges = engine.evaluate(&WatchedStats::default(), &[], &[], &[], &HashSet::new());
        assert!(badges.is_empty());
    }

    #[test]
    fn test_progress() {
        let stats = WatchedStats {
            total_movies: 20,
            ..Default::default()
        };
        let unlocked: HashSet<String> = ["movies_1".to_string()].into_iter().collect();
        let progress = engine_at(NOW).progress(&stats, &[], &[], &[], &unlocked);
        assert_eq!(progress.len(), BadgeCatalog::standard().len());

        let first = &progress[0];
        assert_eq!(first.id, "movies_1");
        assert!(first.unlocked);
        assert_eq!(first.fraction(), 1.0);

        let quarter = progress.iter().find(|p| p.id == "movies_25").unwrap();
        assert_eq!(quarter.current, 20);
        assert!((quarter.fraction() - 0.8).abs() < 1e-9);

        let owl = progress.iter().find(|p| p.id == "night_owl").unwrap();
        assert_eq!(owl.requirement, 1);
        assert_eq!(owl.current, 0);
    }

    #[test]
    fn test_weekend_span() {
        let sat = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let sun = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
        let wed = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        assert_eq!(weekend_containing(sat), Some((sat, sun)));
        assert_eq!(weekend_containing(sun), Some((sat, sun)));
        assert_eq!(weekend_containing(wed), None);
    }
}
