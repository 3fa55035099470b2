//! Database repository layer
//!
//! Stores each record kind as one JSON blob keyed by name. Blobs that fail
//! to decode load as empty (or `None` for the stats snapshot) with a warning.

use crate::error::Result;
use crate::store::{StoreChanges, WatchedStore};
use crate::types::{Badge, WatchedEpisode, WatchedMovie, WatchedSeries, WatchedStats};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

pub const MOVIES_KEY: &str = "watched_movies";
pub const SERIES_KEY: &str = "watched_series";
pub const EPISODES_KEY: &str = "watched_episodes";
pub const BADGES_KEY: &str = "unlocked_badges";
pub const STATS_KEY: &str = "watched_stats";

/// Database handle (single connection)
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run migrations on this database
    pub fn migrate(&self) -> Result<()> {
        let conn = self.connection();
        super::schema::run_migrations(&conn)
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-statement leaves nothing half-applied in SQLite
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ============================================
    // Raw blob operations
    // ============================================

    /// Read a raw blob.
    pub fn get_blob(&self, key: &str) -> Result<Option<String>> {
        let conn = self.connection();
        let value = conn
            .query_row("SELECT value FROM blobs WHERE key = ?1", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Insert or replace a raw blob.
    pub fn put_blob(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.connection();
        upsert_blob(&conn, key, value)
    }

    /// Delete a blob. Returns whether it existed.
    pub fn delete_blob(&self, key: &str) -> Result<bool> {
        let conn = self.connection();
        let changed = conn.execute("DELETE FROM blobs WHERE key = ?1", [key])?;
        Ok(changed > 0)
    }

    // ============================================
    // Typed helpers
    // ============================================

    fn load_list<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        Ok(self.load_value(key)?.unwrap_or_default())
    }

    fn load_value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(raw) = self.get_blob(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key, error = %e, "Undecodable blob, treating as empty");
                Ok(None)
            }
        }
    }

    fn save_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.put_blob(key, &json)
    }
}

fn upsert_blob(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO blobs (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
        params![key, value, Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

impl WatchedStore for Database {
    fn load_watched_movies(&self) -> Result<Vec<WatchedMovie>> {
        self.load_list(MOVIES_KEY)
    }

    fn save_watched_movies(&self, movies: &[WatchedMovie]) -> Result<()> {
        self.save_value(MOVIES_KEY, movies)
    }

    fn load_watched_series(&self) -> Result<Vec<WatchedSeries>> {
        self.load_list(SERIES_KEY)
    }

    fn save_watched_series(&self, series: &[WatchedSeries]) -> Result<()> {
        self.save_value(SERIES_KEY, series)
    }

    fn load_watched_episodes(&self) -> Result<Vec<WatchedEpisode>> {
        self.load_list(EPISODES_KEY)
    }

    fn save_watched_episodes(&self, episodes: &[WatchedEpisode]) -> Result<()> {
        self.save_value(EPISODES_KEY, episodes)
    }

    fn load_unlocked_badges(&self) -> Result<Vec<Badge>> {
        self.load_list(BADGES_KEY)
    }

    fn save_unlocked_badges(&self, badges: &[Badge]) -> Result<()> {
        self.save_value(BADGES_KEY, badges)
    }

    fn load_stats(&self) -> Result<Option<WatchedStats>> {
        self.load_value(STATS_KEY)
    }

    fn save_stats(&self, stats: &WatchedStats) -> Result<()> {
        self.save_value(STATS_KEY, stats)
    }

    /// All blobs land in one transaction or none do.
    fn commit(&self, changes: &StoreChanges<'_>) -> Result<()> {
        let mut blobs: Vec<(&str, String)> = Vec::new();
        if let Some(movies) = changes.movies {
            blobs.push((MOVIES_KEY, serde_json::to_string(movies)?));
        }
        if let Some(series) = changes.series {
            blobs.push((SERIES_KEY, serde_json::to_string(series)?));
        }
        if let Some(episodes) = changes.episodes {
            blobs.push((EPISODES_KEY, serde_json::to_string(episodes)?));
        }
        blobs.push((STATS_KEY, serde_json::to_string(changes.stats)?));
        if let Some(badges) = changes.unlocked_badges {
            blobs.push((BADGES_KEY, serde_json::to_string(badges)?));
        }

        let mut conn = self.connection();
        let tx = conn.transaction()?;
        for (key, value) in &blobs {
            upsert_blob(&tx, key, value)?;
        }
        tx.commit()?;

        tracing::debug!(blobs = blobs.len(), "Committed changes");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        db.migrate().unwrap();
        db
    }

    #[test]
    fn test_blob_crud() {
        let db = test_db();
        assert_eq!(db.get_blob("k").unwrap(), None);

        db.put_blob("k", "[1]").unwrap();
        assert_eq!(db.get_blob("k").unwrap().as_deref(), Some("[1]"));

        db.put_blob("k", "[2]").unwrap();
        assert_eq!(db.get_blob("k").unwrap().as_deref(), Some("[2]"));

        assert!(db.delete_blob("k").unwrap());
        assert!(!db.delete_blob("k").unwrap());
    }

    #[test]
    fn test_movies_round_trip_keeps_order() {
        let db = test_db();
        let now = Utc::now();
        let movies = vec![
            WatchedMovie::new(2, "Second", now),
            WatchedMovie::new(1, "First", now),
        ];
        db.save_watched_movies(&movies).unwrap();

        let loaded = db.load_watched_movies().unwrap();
        assert_eq!(loaded, movies);
    }

    #[test]
    fn test_missing_lists_load_empty() {
        let db = test_db();
        assert!(db.load_watched_movies().unwrap().is_empty());
        assert!(db.load_watched_series().unwrap().is_empty());
        assert!(db.load_watched_episodes().unwrap().is_empty());
        assert!(db.load_unlocked_badges().unwrap().is_empty());
        assert!(db.load_stats().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_blob_degrades_to_empty() {
        let db = test_db();
        db.put_blob(MOVIES_KEY, "{not json").unwrap();
        db.put_blob(STATS_KEY, "[]").unwrap();

        assert!(db.load_watched_movies().unwrap().is_empty());
        assert!(db.load_stats().unwrap().is_none());
    }

    #[test]
    fn test_stats_round_trip() {
        let db = test_db();
        let mut stats = WatchedStats {
            total_movies: 3,
            longest_streak: 7,
            ..Default::default()
        };
        stats.genre_counts.insert("Drama".into(), 2);
        db.save_stats(&stats).unwrap();

        assert_eq!(db.load_stats().unwrap(), Some(stats));
    }

    /// Aborts any write of `key` until dropped.
    fn fail_writes_to(db: &Database, key: &str) {
        db.connection()
            .execute_batch(&format!(
                "CREATE TRIGGER fail_insert BEFORE INSERT ON blobs WHEN NEW.key = '{key}'
                 BEGIN SELECT RAISE(ABORT, 'write refused'); END;
                 CREATE TRIGGER fail_update BEFORE UPDATE ON blobs WHEN NEW.key = '{key}'
                 BEGIN SELECT RAISE(ABORT, 'write refused'); END;"
            ))
            .unwrap();
    }

    #[test]
    fn test_commit_writes_only_given_lists() {
        let db = test_db();
        let stats = WatchedStats {
            total_movies: 1,
            ..Default::default()
        };
        let movies = vec![WatchedMovie::new(1, "One", Utc::now())];
        db.commit(&StoreChanges {
            movies: Some(&movies),
            series: None,
            episodes: None,
            stats: &stats,
            unlocked_badges: None,
        })
        .unwrap();

        assert_eq!(db.load_watched_movies().unwrap(), movies);
        assert_eq!(db.load_stats().unwrap(), Some(stats));
        assert_eq!(db.get_blob(SERIES_KEY).unwrap(), None);
        assert_eq!(db.get_blob(BADGES_KEY).unwrap(), None);
    }

    #[test]
    fn test_commit_is_all_or_nothing() {
        let db = test_db();
        fail_writes_to(&db, BADGES_KEY);

        let stats = WatchedStats {
            total_movies: 1,
            ..Default::default()
        };
        let movies = vec![WatchedMovie::new(1, "One", Utc::now())];
        let result = db.commit(&StoreChanges {
            movies: Some(&movies),
            series: None,
            episodes: None,
            stats: &stats,
            unlocked_badges: Some(&[]),
        });

        assert!(matches!(result, Err(crate::error::Error::Database(_))));
        assert_eq!(db.get_blob(MOVIES_KEY).unwrap(), None);
        assert_eq!(db.get_blob(STATS_KEY).unwrap(), None);
    }

    #[test]
    fn test_unmigrated_database_errors() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_watched_movies().is_err());
    }
}
