//! Achievement badges: the catalog and the rule engine that unlocks them.

pub mod catalog;
pub mod engine;

pub use catalog::{
    genre_slug, BadgeCatalog, BadgeDefinition, BadgeKey, Condition, CATALOG_VERSION, MAIN_GENRES,
};
pub use engine::{unlocked_ids, BadgeEngine, BadgeProgress};
