//! Wrapped - Month/Year in Review
//!
//! Buckets watched records by local calendar month (or year) and summarizes
//! each bucket. Purely derived: the same records always give the same
//! summary.

use super::local_date;
use crate::clock::Clock;
use crate::types::{format_minutes, WatchedEpisode, WatchedMovie, WatchedSeries};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Time period for wrapped statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WrappedPeriod {
    /// Full year (e.g., 2024)
    Year(i32),
    /// Specific month (year, month 1-12)
    Month(i32, u32),
}

impl WrappedPeriod {
    /// First calendar day of the period, `None` for an invalid month.
    pub fn first_day(&self) -> Option<NaiveDate> {
        match *self {
            WrappedPeriod::Year(year) => NaiveDate::from_ymd_opt(year, 1, 1),
            WrappedPeriod::Month(year, month) => NaiveDate::from_ymd_opt(year, month, 1),
        }
    }

    /// First instant of the period in the given offset.
    pub fn start(&self, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
        let midnight = self.first_day()?.and_hms_opt(0, 0, 0)?;
        offset.from_local_datetime(&midnight).single()
    }

    /// Whether a local calendar day falls in this period.
    pub fn contains(&self, day: NaiveDate) -> bool {
        match *self {
            WrappedPeriod::Year(year) => day.year() == year,
            WrappedPeriod::Month(year, month) => day.year() == year && day.month() == month,
        }
    }

    /// Number of days in the period.
    pub fn total_days(&self) -> i64 {
        match (self.first_day(), self.next().and_then(|p| p.first_day())) {
            (Some(start), Some(end)) => (end - start).num_days(),
            _ => 0,
        }
    }

    /// Get the previous period for trend comparison.
    ///
    /// `None` when the year would overflow.
    pub fn previous(&self) -> Option<Self> {
        match *self {
            WrappedPeriod::Year(year) => year.checked_sub(1).map(WrappedPeriod::Year),
            WrappedPeriod::Month(year, month) => {
                if month <= 1 {
                    year.checked_sub(1).map(|y| WrappedPeriod::Month(y, 12))
                } else {
                    Some(WrappedPeriod::Month(year, month - 1))
                }
            }
        }
    }

    fn next(&self) -> Option<Self> {
        match *self {
            WrappedPeriod::Year(year) => year.checked_add(1).map(WrappedPeriod::Year),
            WrappedPeriod::Month(year, month) => {
                if month >= 12 {
                    year.checked_add(1).map(|y| WrappedPeriod::Month(y, 1))
                } else {
                    Some(WrappedPeriod::Month(year, month + 1))
                }
            }
        }
    }

    /// Get display name for this period.
    pub fn display_name(&self) -> String {
        match self {
            WrappedPeriod::Year(year) => format!("{}", year),
            WrappedPeriod::Month(year, month) => {
                let month_name = match month {
                    1 => "January",
                    2 => "February",
                    3 => "March",
                    4 => "April",
                    5 => "May",
                    6 => "June",
                    7 => "July",
                    8 => "August",
                    9 => "September",
                    10 => "October",
                    11 => "November",
                    12 => "December",
                    _ => "Unknown",
                };
                format!("{} {}", month_name, year)
            }
        }
    }

    /// The period containing a local day, at month granularity.
    pub fn month_of(day: NaiveDate) -> Self {
        WrappedPeriod::Month(day.year(), day.month())
    }

    /// Create a period for the current year.
    pub fn current_year(clock: &dyn Clock) -> Self {
        WrappedPeriod::Year(clock.now().year())
    }

    /// Create a period for the current month.
    pub fn current_month(clock: &dyn Clock) -> Self {
        let now = clock.now();
        WrappedPeriod::Month(now.year(), now.month())
    }
}

/// Configuration for wrapped generation.
#[derive(Debug, Clone)]
pub struct WrappedConfig {
    /// Include trend comparison with previous period
    pub include_trends: bool,
    /// Number of top genres to include
    pub top_genres_count: usize,
}

impl Default for WrappedConfig {
    fn default() -> Self {
        Self {
            include_trends: true,
            top_genres_count: 5,
        }
    }
}

/// Wrapped summary for one period.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedStats {
    /// The time period these stats cover
    pub period: WrappedPeriod,
    /// First instant of the period in local time
    pub period_start: Option<DateTime<FixedOffset>>,
    pub totals: WrappedTotals,
    /// Most frequent genres across the period's movies and series
    pub top_genres: Vec<(String, u32)>,
    /// Distinct local days with any watched record
    pub active_days: i64,
    /// Days in the period
    pub total_days: i64,
    /// Comparison with previous period (None if not requested or no data)
    pub trends: Option<TrendComparison>,
}

/// The month-granularity summary.
pub type MonthlyWrappedStats = WrappedStats;

impl WrappedStats {
    /// Genre names only, most frequent first.
    pub fn top_genre_names(&self) -> Vec<&str> {
        self.top_genres.iter().map(|(g, _)| g.as_str()).collect()
    }

    /// Calculate activity percentage.
    pub fn activity_percentage(&self) -> f64 {
        if self.total_days == 0 {
            0.0
        } else {
            (self.active_days as f64 / self.total_days as f64) * 100.0
        }
    }
}

/// Counts for a period.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrappedTotals {
    pub movies: u32,
    pub series: u32,
    pub episodes: u32,
    /// Movie plus episode runtime, minutes
    pub runtime_minutes: u64,
}

impl WrappedTotals {
    pub fn is_empty(&self) -> bool {
        self.movies == 0 && self.series == 0 && self.episodes == 0
    }

    /// Format runtime for display (e.g., "31h 5m").
    pub fn runtime_display(&self) -> String {
        format_minutes(self.runtime_minutes)
    }
}

/// Trend comparison with previous period.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendComparison {
    pub movies_delta_pct: f64,
    pub episodes_delta_pct: f64,
    pub runtime_delta_pct: f64,
    /// Previous period totals (for context)
    pub previous_totals: WrappedTotals,
}

impl TrendComparison {
    /// Calculate delta percentage between two values.
    pub fn calc_delta(current: u64, previous: u64) -> f64 {
        if previous == 0 {
            if current == 0 {
                0.0
            } else {
                100.0 // Infinite growth shown as 100%
            }
        } else {
            ((current as f64 - previous as f64) / previous as f64) * 100.0
        }
    }

    /// Format delta for display (e.g., "+23%" or "-15%").
    pub fn format_delta(delta: f64) -> String {
        if delta >= 0.0 {
            format!("+{:.0}%", delta)
        } else {
            format!("{:.0}%", delta)
        }
    }
}

/// Builds wrapped summaries in the clock's local offset.
#[derive(Clone)]
pub struct WrappedAggregator {
    clock: Arc<dyn Clock>,
    config: WrappedConfig,
}

impl WrappedAggregator {
    pub fn new(clock: Arc<dyn Clock>, config: WrappedConfig) -> Self {
        Self { clock, config }
    }

    /// Summary for one calendar month.
    pub fn monthly_stats(
        &self,
        year: i32,
        month: u32,
        movies: &[WatchedMovie],
        series: &[WatchedSeries],
        episodes: &[WatchedEpisode],
    ) -> MonthlyWrappedStats {
        self.wrapped(WrappedPeriod::Month(year, month), movies, series, episodes)
    }

    /// Summary for any period.
    pub fn wrapped(
        &self,
        period: WrappedPeriod,
        movies: &[WatchedMovie],
        series: &[WatchedSeries],
        episodes: &[WatchedEpisode],
    ) -> WrappedStats {
        let offset = *self.clock.now().offset();
        let bucket = Bucket::collect(period, &offset, movies, series, episodes);
        let totals = bucket.totals();

        let previous_period = period.previous().filter(|_| self.config.include_trends);
        let trends = previous_period.and_then(|previous_period| {
            let previous = Bucket::collect(previous_period, &offset, movies, series, episodes);
            let previous_totals = previous.totals();
            if previous_totals.is_empty() {
                return None;
            }
            Some(TrendComparison {
                movies_delta_pct: TrendComparison::calc_delta(
                    totals.movies as u64,
                    previous_totals.movies as u64,
                ),
                episodes_delta_pct: TrendComparison::calc_delta(
                    totals.episodes as u64,
                    previous_totals.episodes as u64,
                ),
                runtime_delta_pct: TrendComparison::calc_delta(
                    totals.runtime_minutes,
                    previous_totals.runtime_minutes,
                ),
                previous_totals,
            })
        });

        WrappedStats {
            period,
            period_start: period.start(&offset),
            top_genres: bucket.top_genres(self.config.top_genres_count.max(1)),
            active_days: bucket.active_days.len() as i64,
            total_days: period.total_days(),
            totals,
            trends,
        }
    }

    /// Distinct months holding at least one record of any kind, most recent first.
    pub fn available_months(
        &self,
        movies: &[WatchedMovie],
        series: &[WatchedSeries],
        episodes: &[WatchedEpisode],
    ) -> Vec<WrappedPeriod> {
        let offset = *self.clock.now().offset();
        let months: BTreeSet<WrappedPeriod> = movies
            .iter()
            .map(|m| m.watched_date)
            .chain(series.iter().map(|s| s.watched_date))
            .chain(episodes.iter().map(|e| e.watched_date))
            .map(|ts| WrappedPeriod::month_of(local_date(ts, &offset)))
            .collect();
        months.into_iter().rev().collect()
    }
}

/// Records of one period.
struct Bucket<'a> {
    movies: Vec<&'a WatchedMovie>,
    series: Vec<&'a WatchedSeries>,
    episodes: Vec<&'a WatchedEpisode>,
    active_days: BTreeSet<NaiveDate>,
}

impl<'a> Bucket<'a> {
    fn collect(
        period: WrappedPeriod,
        offset: &FixedOffset,
        movies: &'a [WatchedMovie],
        series: &'a [WatchedSeries],
        episodes: &'a [WatchedEpisode],
    ) -> Self {
        let mut active_days = BTreeSet::new();
        let mut in_period = |ts: DateTime<Utc>| {
            let day = local_date(ts, offset);
            let hit = period.contains(day);
            if hit {
                active_days.insert(day);
            }
            hit
        };

        let movies: Vec<&WatchedMovie> =
            movies.iter().filter(|m| in_period(m.watched_date)).collect();
        let series: Vec<&WatchedSeries> =
            series.iter().filter(|s| in_period(s.watched_date)).collect();
        let episodes: Vec<&WatchedEpisode> =
            episodes.iter().filter(|e| in_period(e.watched_date)).collect();

        Self {
            movies,
            series,
            episodes,
            active_days,
        }
    }

    fn totals(&self) -> WrappedTotals {
        let movie_minutes: u64 = self.movies.iter().map(|m| m.runtime.unwrap_or(0) as u64).sum();
        let episode_minutes: u64 = self
            .episodes
            .iter()
            .map(|e| e.runtime.unwrap_or(0) as u64)
            .sum();
        WrappedTotals {
            movies: self.movies.len() as u32,
            series: self.series.len() as u32,
            episodes: self.episodes.len() as u32,
            runtime_minutes: movie_minutes + episode_minutes,
        }
    }

    /// Genres by frequency; ties keep first-encountered order (movies, then series).
    fn top_genres(&self, limit: usize) -> Vec<(String, u32)> {
        let mut ranked: Vec<(String, u32)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        let genres = self
            .movies
            .iter()
            .flat_map(|m| m.genres.iter())
            .chain(self.series.iter().flat_map(|s| s.genres.iter()));
        for genre in genres {
            match index.get(genre.as_str()) {
                Some(&i) => ranked[i].1 += 1,
                None => {
                    index.insert(genre.as_str(), ranked.len());
                    ranked.push((genre.clone(), 1));
                }
            }
        }
        // Stable sort keeps first-encountered order among equal counts
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(limit);
        ranked
    }
}
