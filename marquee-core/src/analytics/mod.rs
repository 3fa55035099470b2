//! Analytics module for marquee
//!
//! Everything here is derived from the watched records and can be rebuilt
//! from them at any time:
//! - [`stats`]: the statistics snapshot, recomputed in full on every change
//! - [`streak`]: consecutive-day streaks over local calendar days
//! - [`badges`]: the badge catalog and the rule engine that unlocks it
//! - [`wrapped`]: month/year in review
//!
//! All entry points are synchronous and hold no state between calls. "Now"
//! and the local offset come from an injected [`Clock`](crate::clock::Clock).

pub mod badges;
pub mod stats;
pub mod streak;
pub mod wrapped;

pub use badges::{
    unlocked_ids, BadgeCatalog, BadgeDefinition, BadgeEngine, BadgeKey, BadgeProgress, Condition,
    CATALOG_VERSION, MAIN_GENRES,
};
pub use stats::{StatsAggregator, MONTH_WINDOW_DAYS, WEEK_WINDOW_DAYS};
pub use streak::{compute_streak, Streak};
pub use wrapped::{
    MonthlyWrappedStats, TrendComparison, WrappedAggregator, WrappedConfig, WrappedPeriod,
    WrappedStats, WrappedTotals,
};

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};

/// Local calendar day of an instant.
pub(crate) fn local_date(ts: DateTime<Utc>, offset: &FixedOffset) -> NaiveDate {
    ts.with_timezone(offset).date_naive()
}
