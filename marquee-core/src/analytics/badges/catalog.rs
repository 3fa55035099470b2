//! The badge catalog.
//!
//! Badges are rows in a table: identity, display fields, rarity, a
//! requirement, and a [`Condition`] selector naming the value the rule
//! engine compares. Genre badges are generated from [`MAIN_GENRES`], once for
//! movies and once for series.
//!
//! Ids are stable across catalog versions. Stored unlocks refer to them.

use crate::types::{Badge, BadgeCategory, BadgeRarity};
use std::collections::HashMap;

/// Bump when rows are added or changed.
pub const CATALOG_VERSION: u32 = 1;

/// Genres with dedicated movie and series badges.
pub const MAIN_GENRES: [&str; 8] = [
    "Action",
    "Comedy",
    "Drama",
    "Horror",
    "Science Fiction",
    "Thriller",
    "Romance",
    "Animation",
];

/// Hour range `[start, end)` for the night owl badge.
pub const NIGHT_OWL_HOURS: (u32, u32) = (0, 5);
/// Hour range `[start, end)` for the early bird badge.
pub const EARLY_BIRD_HOURS: (u32, u32) = (5, 7);
/// Minimum runtime in minutes for the long movie badge.
pub const LONG_MOVIE_MINUTES: u32 = 180;
/// Minimum episode count for the long series badge.
pub const LONG_SERIES_EPISODES: u32 = 100;
/// Movies released before this year are classics.
pub const CLASSIC_MOVIE_BEFORE: i32 = 1980;
/// Series released before this year are classics.
pub const CLASSIC_SERIES_BEFORE: i32 = 2000;

/// The value a badge's requirement is compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Condition {
    TotalMovies,
    TotalSeries,
    TotalEpisodes,
    /// Movies plus episodes
    TotalWatched,
    /// Movies tagged with the genre
    Genre(&'static str),
    /// Series tagged with the genre
    SeriesGenre(&'static str),
    /// Movies watched on the current local day
    MoviesToday,
    /// Movies in the rolling week window
    MoviesThisWeek,
    CurrentStreak,
    /// Some movie watched in [`NIGHT_OWL_HOURS`]
    NightOwl,
    /// Some movie watched in [`EARLY_BIRD_HOURS`]
    EarlyBird,
    UniqueGenres,
    /// Some movie at least [`LONG_MOVIE_MINUTES`] long
    LongMovie,
    ClassicMovies,
    /// Movies released in the current year
    ModernMovies,
    /// Movies watched during the weekend containing today
    WeekendMovies,
    CompletedSeries,
    /// Some series with at least [`LONG_SERIES_EPISODES`] episodes
    LongSeries,
    ClassicSeries,
    ModernSeries,
    UniqueSeriesGenres,
}

impl Condition {
    /// Existence conditions unlock on a single match; the requirement is unused.
    pub fn is_existence(&self) -> bool {
        matches!(
            self,
            Condition::NightOwl | Condition::EarlyBird | Condition::LongMovie | Condition::LongSeries
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Condition::TotalMovies => "total_movies",
            Condition::TotalSeries => "total_series",
            Condition::TotalEpisodes => "total_episodes",
            Condition::TotalWatched => "total_watched",
            Condition::Genre(_) => "genre",
            Condition::SeriesGenre(_) => "series_genre",
            Condition::MoviesToday => "movies_today",
            Condition::MoviesThisWeek => "movies_this_week",
            Condition::CurrentStreak => "current_streak",
            Condition::NightOwl => "night_owl",
            Condition::EarlyBird => "early_bird",
            Condition::UniqueGenres => "unique_genres",
            Condition::LongMovie => "long_movie",
            Condition::ClassicMovies => "classic_movies",
            Condition::ModernMovies => "modern_movies",
            Condition::WeekendMovies => "weekend_movies",
            Condition::CompletedSeries => "completed_series",
            Condition::LongSeries => "long_series",
            Condition::ClassicSeries => "classic_series",
            Condition::ModernSeries => "modern_series",
            Condition::UniqueSeriesGenres => "unique_series_genres",
        }
    }

    pub fn genre(&self) -> Option<&'static str> {
        match *self {
            Condition::Genre(g) | Condition::SeriesGenre(g) => Some(g),
            _ => None,
        }
    }
}

/// Composite identity of a badge: what it measures and where the bar sits.
///
/// Unlike the string id, this never depends on how a genre name slugs.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BadgeKey {
    pub condition: &'static str,
    pub genre: Option<&'static str>,
    pub requirement: u32,
}

/// One catalog row.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: &'static str,
    pub category: BadgeCategory,
    pub rarity: BadgeRarity,
    pub requirement: u32,
    pub condition: Condition,
}

impl BadgeDefinition {
    pub fn key(&self) -> BadgeKey {
        BadgeKey {
            condition: self.condition.kind(),
            genre: self.condition.genre(),
            requirement: self.requirement,
        }
    }

    /// A locked badge for this row.
    pub fn to_badge(&self) -> Badge {
        Badge {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            icon: self.icon.to_string(),
            category: self.category,
            rarity: self.rarity,
            requirement: self.requirement,
            unlocked_date: None,
        }
    }
}

/// Static part of a row; category and condition come from its block.
#[derive(Clone, Copy)]
struct Row(&'static str, &'static str, &'static str, &'static str, BadgeRarity, u32);

use BadgeRarity::{Common, Epic, Legendary, Rare, Uncommon};

const MOVIE_COLLECTOR: &[Row] = &[
    Row("movies_1", "First Screening", "Watch your first movie", "🎬", Common, 1),
    Row("movies_5", "Popcorn Regular", "Watch 5 movies", "🍿", Common, 5),
    Row("movies_10", "Film Fan", "Watch 10 movies", "🎞️", Common, 10),
    Row("movies_25", "Cinephile", "Watch 25 movies", "📽️", Uncommon, 25),
    Row("movies_50", "Movie Maniac", "Watch 50 movies", "🎥", Uncommon, 50),
    Row("movies_100", "Centurion", "Watch 100 movies", "💯", Rare, 100),
    Row("movies_250", "Film Scholar", "Watch 250 movies", "🎓", Epic, 250),
    Row("movies_500", "Cinema Legend", "Watch 500 movies", "🏛️", Epic, 500),
    Row("movies_1000", "Projectionist", "Watch 1000 movies", "👑", Legendary, 1000),
];

const SERIES_COLLECTOR: &[Row] = &[
    Row("series_1", "Pilot", "Watch your first series", "📺", Common, 1),
    Row("series_5", "Channel Surfer", "Watch 5 series", "📡", Common, 5),
    Row("series_10", "Box Set", "Watch 10 series", "📦", Uncommon, 10),
    Row("series_25", "Showrunner", "Watch 25 series", "🎬", Rare, 25),
    Row("series_50", "Network Executive", "Watch 50 series", "🏢", Epic, 50),
    Row("series_100", "Television Royalty", "Watch 100 series", "👑", Legendary, 100),
];

const EPISODE_COLLECTOR: &[Row] = &[
    Row("episodes_10", "Next Episode", "Watch 10 episodes", "▶️", Common, 10),
    Row("episodes_50", "Just One More", "Watch 50 episodes", "⏭️", Common, 50),
    Row("episodes_100", "Season Pass", "Watch 100 episodes", "🎟️", Uncommon, 100),
    Row("episodes_250", "Couch Resident", "Watch 250 episodes", "🛋️", Rare, 250),
    Row("episodes_500", "Remote Master", "Watch 500 episodes", "🎮", Epic, 500),
    Row("episodes_1000", "Episode Machine", "Watch 1000 episodes", "⚙️", Epic, 1000),
    Row("episodes_2500", "Eternal Viewer", "Watch 2500 episodes", "♾️", Legendary, 2500),
];

const TOTAL_WATCHED: &[Row] = &[
    Row("watched_10", "Warming Up", "Watch 10 movies or episodes", "🌱", Common, 10),
    Row("watched_50", "Screen Time", "Watch 50 movies or episodes", "⏱️", Uncommon, 50),
    Row("watched_100", "Triple Digits", "Watch 100 movies or episodes", "🔢", Rare, 100),
    Row("watched_500", "Viewing Veteran", "Watch 500 movies or episodes", "🎖️", Epic, 500),
    Row("watched_1000", "Thousand Screens", "Watch 1000 movies or episodes", "🌌", Legendary, 1000),
];

const MARATHON_DAY: &[Row] = &[
    Row("marathon_day_2", "Double Feature", "Watch 2 movies in one day", "✌️", Common, 2),
    Row("marathon_day_3", "Triple Feature", "Watch 3 movies in one day", "🥉", Uncommon, 3),
    Row("marathon_day_5", "Movie Marathon", "Watch 5 movies in one day", "🏃", Epic, 5),
];

const MARATHON_WEEK: &[Row] = &[
    Row("marathon_week_5", "Busy Week", "Watch 5 movies within a week", "📅", Common, 5),
    Row("marathon_week_10", "Binge Week", "Watch 10 movies within a week", "🔥", Rare, 10),
    Row("marathon_week_20", "Lost Week", "Watch 20 movies within a week", "🌋", Legendary, 20),
];

const DEDICATION: &[Row] = &[
    Row("dedication_streak_3", "Habit Forming", "Watch something 3 days in a row", "🔥", Common, 3),
    Row("dedication_streak_7", "Week Streak", "Watch something 7 days in a row", "📆", Uncommon, 7),
    Row("dedication_streak_14", "Fortnight", "Watch something 14 days in a row", "🗓️", Rare, 14),
    Row("dedication_streak_30", "Monthly Ritual", "Watch something 30 days in a row", "🌙", Epic, 30),
    Row("dedication_streak_60", "Unstoppable", "Watch something 60 days in a row", "⚡", Epic, 60),
    Row("dedication_streak_100", "Hundred Nights", "Watch something 100 days in a row", "💎", Legendary, 100),
    Row("dedication_streak_365", "Year of Screens", "Watch something every day for a year", "🏆", Legendary, 365),
];

/// Genre badge tiers for movies: (threshold, rarity, title suffix).
const GENRE_TIERS: [(u32, BadgeRarity, &str); 3] =
    [(5, Common, "Fan"), (10, Uncommon, "Enthusiast"), (25, Rare, "Expert")];

/// Genre badge tiers for series.
const SERIES_GENRE_TIERS: [(u32, BadgeRarity, &str); 3] =
    [(3, Common, "Viewer"), (5, Uncommon, "Devotee"), (10, Rare, "Authority")];

/// Lower-case slug for ids: runs of non-alphanumerics become one `_`.
pub fn genre_slug(genre: &str) -> String {
    let mut slug = String::with_capacity(genre.len());
    let mut pending_sep = false;
    for c in genre.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    slug
}

fn genre_icon(genre: &str) -> &'static str {
    match genre {
        "Action" => "💥",
        "Comedy" => "😂",
        "Drama" => "🎭",
        "Horror" => "👻",
        "Science Fiction" => "🚀",
        "Thriller" => "🔪",
        "Romance" => "💕",
        "Animation" => "🎨",
        _ => "🏷️",
    }
}

/// The versioned badge catalog.
#[derive(Debug, Clone)]
pub struct BadgeCatalog {
    definitions: Vec<BadgeDefinition>,
    by_id: HashMap<String, usize>,
}

impl BadgeCatalog {
    /// The built-in catalog, in evaluation order.
    pub fn standard() -> Self {
        let mut defs = Vec::new();

        push_rows(&mut defs, MOVIE_COLLECTOR, BadgeCategory::Collector, Condition::TotalMovies);
        push_rows(&mut defs, SERIES_COLLECTOR, BadgeCategory::SeriesCollector, Condition::TotalSeries);
        push_rows(&mut defs, EPISODE_COLLECTOR, BadgeCategory::SeriesCollector, Condition::TotalEpisodes);
        push_rows(&mut defs, TOTAL_WATCHED, BadgeCategory::Collector, Condition::TotalWatched);

        for genre in MAIN_GENRES {
            for (threshold, rarity, title) in GENRE_TIERS {
                defs.push(BadgeDefinition {
                    id: format!("genre_{}_{}", genre_slug(genre), threshold),
                    name: format!("{} {}", genre, title),
                    description: format!("Watch {} {} movies", threshold, genre),
                    icon: genre_icon(genre),
                    category: BadgeCategory::Genre,
                    rarity,
                    requirement: threshold,
                    condition: Condition::Genre(genre),
                });
            }
        }
        for genre in MAIN_GENRES {
            for (threshold, rarity, title) in SERIES_GENRE_TIERS {
                defs.push(BadgeDefinition {
                    id: format!("series_genre_{}_{}", genre_slug(genre), threshold),
                    name: format!("{} Series {}", genre, title),
                    description: format!("Watch {} {} series", threshold, genre),
                    icon: genre_icon(genre),
                    category: BadgeCategory::Genre,
                    rarity,
                    requirement: threshold,
                    condition: Condition::SeriesGenre(genre),
                });
            }
        }

        push_rows(&mut defs, MARATHON_DAY, BadgeCategory::Marathon, Condition::MoviesToday);
        push_rows(&mut defs, MARATHON_WEEK, BadgeCategory::Marathon, Condition::MoviesThisWeek);
        push_rows(&mut defs, DEDICATION, BadgeCategory::Dedication, Condition::CurrentStreak);

        let special = [
            (Row("night_owl", "Night Owl", "Watch a movie between midnight and 5am", "🦉", Uncommon, 1), Condition::NightOwl),
            (Row("early_bird", "Early Bird", "Watch a movie between 5am and 7am", "🐦", Uncommon, 1), Condition::EarlyBird),
            (Row("variety_lover", "Variety Lover", "Watch movies from 5 different genres", "🌈", Common, 5), Condition::UniqueGenres),
            (Row("genre_master", "Genre Master", "Watch movies from 10 different genres", "🧭", Rare, 10), Condition::UniqueGenres),
            (Row("long_movie", "Endurance", "Watch a movie of 3 hours or more", "⏳", Uncommon, 1), Condition::LongMovie),
            (Row("classic_lover", "Classic Lover", "Watch 5 movies released before 1980", "📼", Rare, 5), Condition::ClassicMovies),
            (Row("modern_fan", "Fresh Off the Reel", "Watch 5 movies released this year", "✨", Uncommon, 5), Condition::ModernMovies),
            (Row("weekend_warrior", "Weekend Warrior", "Watch 3 movies in one weekend", "🛡️", Uncommon, 3), Condition::WeekendMovies),
            (Row("series_binger", "Finisher", "Complete a series", "✅", Common, 1), Condition::CompletedSeries),
            (Row("series_binger_5", "Serial Finisher", "Complete 5 series", "🏁", Rare, 5), Condition::CompletedSeries),
            (Row("series_binger_20", "Completionist", "Complete 20 series", "🏆", Legendary, 20), Condition::CompletedSeries),
            (Row("series_long", "Long Haul", "Watch a series with 100 or more episodes", "🚂", Rare, 1), Condition::LongSeries),
            (Row("series_classic", "Golden Age", "Watch 3 series released before 2000", "📻", Uncommon, 3), Condition::ClassicSeries),
            (Row("series_modern", "Trendsetter", "Watch 3 series released this year", "🆕", Uncommon, 3), Condition::ModernSeries),
            (Row("series_genre_variety", "Channel Hopper", "Watch series from 5 different genres", "🔀", Uncommon, 5), Condition::UniqueSeriesGenres),
        ];
        for (row, condition) in special {
            defs.push(definition(&row, BadgeCategory::Special, condition));
        }

        Self::from_definitions(defs)
    }

    /// Build a catalog from explicit rows. Later duplicates of an id are dropped.
    pub fn from_definitions(definitions: Vec<BadgeDefinition>) -> Self {
        let mut by_id = HashMap::with_capacity(definitions.len());
        let mut kept = Vec::with_capacity(definitions.len());
        for def in definitions {
            if by_id.contains_key(&def.id) {
                tracing::warn!(id = %def.id, "Duplicate badge id in catalog, skipping");
                continue;
            }
            by_id.insert(def.id.clone(), kept.len());
            kept.push(def);
        }
        Self {
            definitions: kept,
            by_id,
        }
    }

    pub fn definitions(&self) -> &[BadgeDefinition] {
        &self.definitions
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&BadgeDefinition> {
        self.by_id.get(id).map(|&i| &self.definitions[i])
    }

    pub fn find(&self, key: &BadgeKey) -> Option<&BadgeDefinition> {
        self.definitions.iter().find(|d| &d.key() == key)
    }

    /// The whole catalog as badges, with unlock dates restored from storage.
    ///
    /// Stored badges whose id is no longer in the catalog are ignored.
    pub fn merge_unlocked(&self, unlocked: &[Badge]) -> Vec<Badge> {
        let dates: HashMap<&str, _> = unlocked
            .iter()
            .filter_map(|b| b.unlocked_date.map(|d| (b.id.as_str(), d)))
            .collect();
        self.definitions
            .iter()
            .map(|def| {
                let mut badge = def.to_badge();
                badge.unlocked_date = dates.get(def.id.as_str()).copied();
                badge
            })
            .collect()
    }
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn definition(row: &Row, category: BadgeCategory, condition: Condition) -> BadgeDefinition {
    let Row(id, name, description, icon, rarity, requirement) = *row;
    BadgeDefinition {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon,
        category,
        rarity,
        requirement,
        condition,
    }
}

fn push_rows(
    defs: &mut Vec<BadgeDefinition>,
    rows: &[Row],
    category: BadgeCategory,
    condition: Condition,
) {
    defs.extend(rows.iter().map(|row| definition(row, category, condition)));
}
