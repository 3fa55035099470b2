//! Core domain types for marquee
//!
//! These types are the records a user logs (movies, series, episodes), the
//! badges they earn, and the derived statistics snapshot.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Watched record** | A movie, series, or episode the user marked as watched |
//! | **Streak** | Consecutive local calendar days with at least one watched record |
//! | **Badge** | A catalog milestone with a threshold condition; unlocked once, never re-locked |
//! | **Stats** | A snapshot derived from the full record set, always replaced wholesale |
//!
//! Record lists are kept in insertion order, most recent first. Uniqueness
//! per external id is enforced by the inserting code (see
//! [`crate::library::WatchedLibrary`]), not by these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

/// Keep a rating only if it sits on the 1-5 scale.
pub fn valid_rating(rating: Option<u8>) -> Option<u8> {
    rating.filter(|r| (1..=5).contains(r))
}

// ============================================
// Watched records
// ============================================

/// A movie the user has watched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedMovie {
    pub id: Uuid,
    /// External catalog id (TMDB)
    pub tmdb_id: i64,
    /// Id in the movie library manager, when the movie is managed there
    #[serde(default)]
    pub library_id: Option<i64>,
    pub title: String,
    /// Release year
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub backdrop_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    pub watched_date: DateTime<Utc>,
    /// 1-5 stars
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl WatchedMovie {
    pub fn new(tmdb_id: i64, title: impl Into<String>, watched_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tmdb_id,
            library_id: None,
            title: title.into(),
            year: None,
            poster_url: None,
            backdrop_url: None,
            genres: Vec::new(),
            runtime: None,
            watched_date,
            rating: None,
            notes: None,
        }
    }
}

/// A series the user has marked as watched.
///
/// `watched_date` is the date the series was marked, not a per-episode date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedSeries {
    pub id: Uuid,
    /// External catalog id (TVDB)
    pub tvdb_id: i64,
    /// Id in the series library manager
    #[serde(default)]
    pub library_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub backdrop_url: Option<String>,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub total_episodes: u32,
    #[serde(default)]
    pub watched_episodes: u32,
    pub watched_date: DateTime<Utc>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl WatchedSeries {
    pub fn new(tvdb_id: i64, title: impl Into<String>, watched_date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tvdb_id,
            library_id: None,
            title: title.into(),
            year: None,
            poster_url: None,
            backdrop_url: None,
            genres: Vec::new(),
            total_episodes: 0,
            watched_episodes: 0,
            watched_date,
            rating: None,
            notes: None,
        }
    }

    /// A series with a known episode count whose every episode is watched.
    pub fn is_completed(&self) -> bool {
        self.total_episodes > 0 && self.watched_episodes >= self.total_episodes
    }
}

/// A single episode the user has watched.
///
/// Series title and poster are denormalized for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedEpisode {
    pub id: Uuid,
    /// External episode id
    pub episode_id: i64,
    /// External series id
    pub series_id: i64,
    pub series_title: String,
    #[serde(default)]
    pub series_poster_url: Option<String>,
    #[serde(default)]
    pub title: String,
    pub season_number: u32,
    pub episode_number: u32,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub still_url: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    pub watched_date: DateTime<Utc>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl WatchedEpisode {
    pub fn new(
        episode_id: i64,
        series_id: i64,
        series_title: impl Into<String>,
        season_number: u32,
        episode_number: u32,
        watched_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            episode_id,
            series_id,
            series_title: series_title.into(),
            series_poster_url: None,
            title: String::new(),
            season_number,
            episode_number,
            runtime: None,
            still_url: None,
            overview: None,
            watched_date,
            rating: None,
            notes: None,
        }
    }

    /// Display code such as `S02E05`.
    pub fn code(&self) -> String {
        format!("S{:02}E{:02}", self.season_number, self.episode_number)
    }
}

// ============================================
// Badges
// ============================================

/// Badge category, in catalog block order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeCategory {
    Collector,
    SeriesCollector,
    Genre,
    Marathon,
    Dedication,
    Special,
}

impl BadgeCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeCategory::Collector => "collector",
            BadgeCategory::SeriesCollector => "series_collector",
            BadgeCategory::Genre => "genre",
            BadgeCategory::Marathon => "marathon",
            BadgeCategory::Dedication => "dedication",
            BadgeCategory::Special => "special",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            BadgeCategory::Collector => "Collector",
            BadgeCategory::SeriesCollector => "Series Collector",
            BadgeCategory::Genre => "Genre",
            BadgeCategory::Marathon => "Marathon",
            BadgeCategory::Dedication => "Dedication",
            BadgeCategory::Special => "Special",
        }
    }
}

/// How hard a badge is to earn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeRarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl BadgeRarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeRarity::Common => "common",
            BadgeRarity::Uncommon => "uncommon",
            BadgeRarity::Rare => "rare",
            BadgeRarity::Epic => "epic",
            BadgeRarity::Legendary => "legendary",
        }
    }

    /// Display glow weight, 0.0-1.0.
    pub fn glow_intensity(&self) -> f64 {
        match self {
            BadgeRarity::Common => 0.3,
            BadgeRarity::Uncommon => 0.5,
            BadgeRarity::Rare => 0.7,
            BadgeRarity::Epic => 0.85,
            BadgeRarity::Legendary => 1.0,
        }
    }
}

/// A badge as shown to and stored for the user.
///
/// Unlocked iff `unlocked_date` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    /// Stable across catalog versions
    pub id: String,
    pub name: String,
    pub description: String,
    /// Icon glyph
    pub icon: String,
    pub category: BadgeCategory,
    pub rarity: BadgeRarity,
    /// Threshold the badge condition compares against
    pub requirement: u32,
    #[serde(default)]
    pub unlocked_date: Option<DateTime<Utc>>,
}

impl Badge {
    pub fn is_unlocked(&self) -> bool {
        self.unlocked_date.is_some()
    }
}

// ============================================
// Statistics snapshot
// ============================================

/// Statistics derived from the full watched-record set.
///
/// Never mutated field by field: [`crate::analytics::StatsAggregator`]
/// replaces it wholesale on every change to the records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchedStats {
    // Movies
    pub total_movies: u32,
    /// Movie runtime in minutes
    pub total_runtime: u64,
    pub genre_counts: BTreeMap<String, u32>,
    pub unique_genres: BTreeSet<String>,
    pub movies_this_week: u32,
    pub movies_this_month: u32,

    // Streaks
    pub current_streak: u32,
    /// High-water mark; never decreases across recomputes
    pub longest_streak: u32,
    pub last_watched_date: Option<DateTime<Utc>>,

    // Series
    pub total_series: u32,
    pub completed_series: u32,
    pub series_genre_counts: BTreeMap<String, u32>,
    pub unique_series_genres: BTreeSet<String>,
    pub series_this_week: u32,
    pub series_this_month: u32,

    // Episodes
    pub total_episodes: u32,
    /// Episode runtime in minutes
    pub episodes_runtime: u64,
    pub episodes_this_week: u32,
    pub episodes_this_month: u32,
}

impl WatchedStats {
    /// Movies plus episodes.
    pub fn total_watched(&self) -> u32 {
        self.total_movies + self.total_episodes
    }

    /// Movie plus episode runtime, in minutes.
    pub fn total_combined_runtime(&self) -> u64 {
        self.total_runtime + self.episodes_runtime
    }

    /// Format combined runtime for display (e.g., "312h 45m").
    pub fn runtime_display(&self) -> String {
        format_minutes(self.total_combined_runtime())
    }
}

/// Format a minute count as "Xh Ym" (or "Ym" below an hour).
pub fn format_minutes(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}
