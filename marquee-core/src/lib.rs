//! # marquee-core
//!
//! Core library for marquee - a watched-movie and TV diary with statistics,
//! achievement badges, and "wrapped" retrospectives.
//!
//! This library provides:
//! - Domain types for watched movies, series, episodes, and badges
//! - Statistics and streak aggregation over the full record set
//! - A declarative badge catalog and the rule engine that unlocks it
//! - Monthly and yearly wrapped summaries
//! - A SQLite-backed record store, configuration, and logging
//!
//! ## Architecture
//!
//! Stats are never updated in place. Every mutation goes through
//! [`WatchedLibrary`], which reloads all records, recomputes the
//! [`WatchedStats`] snapshot, and evaluates the badge catalog against it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use marquee_core::analytics::BadgeCatalog;
//! use marquee_core::{Config, Database, SystemClock, WatchedLibrary, WatchedMovie};
//!
//! let config = Config::load().expect("failed to load config");
//! let db = Database::open(&Config::database_path()).expect("failed to open database");
//! db.migrate().expect("failed to run migrations");
//!
//! let library = WatchedLibrary::new(
//!     db,
//!     Arc::new(SystemClock),
//!     Arc::new(BadgeCatalog::standard()),
//!     &config.analytics,
//! );
//! let outcome = library
//!     .mark_movie_watched(WatchedMovie::new(603, "The Matrix", chrono::Utc::now()))
//!     .expect("failed to log movie");
//! if let Some(badge) = outcome.notification() {
//!     println!("Unlocked {}", badge.name);
//! }
//! ```

// Re-export commonly used items at the crate root
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use db::Database;
pub use error::{Error, Result};
pub use library::{HistoryExport, WatchOutcome, WatchedLibrary};
pub use store::WatchedStore;
pub use types::*;

// Public modules
pub mod analytics;
pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod library;
pub mod logging;
pub mod store;
pub mod types;
