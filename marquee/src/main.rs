//! marquee - watched movie and TV diary
//!
//! Log what you watch, track streaks, and unlock badges.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use marquee_core::analytics::BadgeProgress;
use marquee_core::{
    Badge, Config, WatchOutcome, WatchedEpisode, WatchedLibrary, WatchedMovie, WatchedSeries,
    WatchedStats,
};

#[derive(Parser)]
#[command(name = "marquee")]
#[command(about = "Track watched movies and TV, streaks, and badges")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log a watched movie
    Movie {
        #[arg(long)]
        tmdb_id: i64,
        #[arg(long)]
        title: String,
        /// Release year
        #[arg(long)]
        year: Option<i32>,
        /// Genre tag (repeatable)
        #[arg(long = "genre")]
        genres: Vec<String>,
        /// Runtime in minutes
        #[arg(long)]
        runtime: Option<u32>,
        /// When it was watched (YYYY-MM-DD or RFC 3339, default: now)
        #[arg(long)]
        date: Option<String>,
        /// Rating from 1 to 5
        #[arg(long)]
        rating: Option<u8>,
    },

    /// Log a watched series
    Series {
        #[arg(long)]
        tvdb_id: i64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long = "genre")]
        genres: Vec<String>,
        #[arg(long, default_value_t = 0)]
        total_episodes: u32,
        #[arg(long, default_value_t = 0)]
        watched_episodes: u32,
        #[arg(long)]
        date: Option<String>,
    },

    /// Update how many episodes of a logged series are watched
    Progress {
        #[arg(long)]
        tvdb_id: i64,
        #[arg(long, allow_negative_numbers = true)]
        watched: i64,
    },

    /// Log a watched episode
    Episode {
        #[arg(long)]
        episode_id: i64,
        #[arg(long)]
        series_id: i64,
        #[arg(long)]
        series_title: String,
        #[arg(long)]
        season: u32,
        #[arg(long)]
        number: u32,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        runtime: Option<u32>,
        #[arg(long)]
        date: Option<String>,
    },

    /// Rate a logged movie
    Rate {
        #[arg(long)]
        tmdb_id: i64,
        rating: u8,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Remove a logged record
    Remove {
        kind: RecordKind,
        /// TMDB id, TVDB id, or episode id
        id: i64,
    },

    /// Show statistics
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Show badges (unlocked only unless --all)
    Badges {
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },

    /// Print the full history as JSON
    Export,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RecordKind {
    Movie,
    Series,
    Episode,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = marquee_core::logging::init(&config.logging).ok();
    tracing::debug!("marquee starting up");

    let library = WatchedLibrary::open(&config).context("failed to open library")?;

    match args.command {
        Command::Movie {
            tmdb_id,
            title,
            year,
            genres,
            runtime,
            date,
            rating,
        } => {
            let mut movie = WatchedMovie::new(tmdb_id, title, parse_date(date.as_deref())?);
            movie.year = year;
            movie.genres = genres;
            movie.runtime = runtime;
            movie.rating = rating;
            let label = movie.title.clone();
            let outcome = library.mark_movie_watched(movie)?;
            report(&label, &outcome);
        }
        Command::Series {
            tvdb_id,
            title,
            year,
            genres,
            total_episodes,
            watched_episodes,
            date,
        } => {
            let mut series = WatchedSeries::new(tvdb_id, title, parse_date(date.as_deref())?);
            series.year = year;
            series.genres = genres;
            series.total_episodes = total_episodes;
            series.watched_episodes = watched_episodes;
            let label = series.title.clone();
            let outcome = library.mark_series_watched(series)?;
            report(&label, &outcome);
        }
        Command::Progress { tvdb_id, watched } => {
            let outcome = library
                .update_series_progress(tvdb_id, watched)
                .with_context(|| format!("failed to update series {}", tvdb_id))?;
            report(&format!("series {}", tvdb_id), &outcome);
        }
        Command::Episode {
            episode_id,
            series_id,
            series_title,
            season,
            number,
            title,
            runtime,
            date,
        } => {
            let mut episode = WatchedEpisode::new(
                episode_id,
                series_id,
                series_title,
                season,
                number,
                parse_date(date.as_deref())?,
            );
            episode.title = title.unwrap_or_default();
            episode.runtime = runtime;
            let label = format!("{} {}", episode.series_title, episode.code());
            let outcome = library.mark_episode_watched(episode)?;
            report(&label, &outcome);
        }
        Command::Rate {
            tmdb_id,
            rating,
            notes,
        } => {
            library
                .rate_movie(tmdb_id, rating, notes)
                .with_context(|| format!("failed to rate movie {}", tmdb_id))?;
            println!("Rated movie {}: {}/5", tmdb_id, rating);
        }
        Command::Remove { kind, id } => {
            let outcome = match kind {
                RecordKind::Movie => library.remove_movie(id),
                RecordKind::Series => library.remove_series(id),
                RecordKind::Episode => library.remove_episode(id),
            }
            .with_context(|| format!("failed to remove {:?} {}", kind, id))?;
            println!("Removed {:?} {}", kind, id);
            print_summary(&outcome.stats);
        }
        Command::Stats { json } => {
            let stats = library.stats()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }
        Command::Badges { all, json } => {
            let badges = library.badges()?;
            let progress = library.badge_progress()?;
            if json {
                print_badges_json(&badges, &progress, all)?;
            } else {
                print_badges(&badges, &progress, all);
            }
        }
        Command::Export => {
            let export = library.export()?;
            println!("{}", serde_json::to_string_pretty(&export)?);
        }
    }

    Ok(())
}

/// Accepts RFC 3339 or a bare date (local noon). Defaults to now.
fn parse_date(input: Option<&str>) -> Result<DateTime<Utc>> {
    let Some(input) = input else {
        return Ok(Utc::now());
    };

    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Ok(ts.with_timezone(&Utc));
    }

    let day = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{}'. Use YYYY-MM-DD or RFC 3339", input))?;
    let noon = day
        .and_hms_opt(12, 0, 0)
        .context("invalid time of day")?;
    let local = Local
        .from_local_datetime(&noon)
        .earliest()
        .with_context(|| format!("{} does not exist in the local time zone", input))?;
    Ok(local.with_timezone(&Utc))
}

fn report(label: &str, outcome: &WatchOutcome) {
    if outcome.inserted {
        println!("Logged {}", label);
    } else {
        println!("Already logged: {}", label);
    }
    print_summary(&outcome.stats);

    if let Some(badge) = outcome.notification() {
        println!();
        println!(
            "{} Badge unlocked: {} ({}) - {}",
            badge.icon,
            badge.name,
            badge.rarity.as_str(),
            badge.description
        );
        let more = outcome.newly_unlocked.len() - 1;
        if more > 0 {
            println!("   ...and {} more. Run 'marquee badges' to see them.", more);
        }
    }
}

fn print_summary(stats: &WatchedStats) {
    println!(
        "   {} movies, {} episodes, {} series  |  streak {} day{}",
        stats.total_movies,
        stats.total_episodes,
        stats.total_series,
        stats.current_streak,
        if stats.current_streak == 1 { "" } else { "s" }
    );
}

fn print_stats(stats: &WatchedStats) {
    println!("WATCHED");
    println!(
        "   Movies:   {:<10} Runtime: {}",
        stats.total_movies,
        marquee_core::format_minutes(stats.total_runtime)
    );
    println!(
        "   Episodes: {:<10} Runtime: {}",
        stats.total_episodes,
        marquee_core::format_minutes(stats.episodes_runtime)
    );
    println!(
        "   Series:   {:<10} Completed: {}",
        stats.total_series, stats.completed_series
    );
    println!(
        "   Total:    {:<10} Runtime: {}",
        stats.total_watched(),
        stats.runtime_display()
    );
    println!();

    println!("RECENT");
    println!(
        "   This week:  {} movies, {} episodes, {} series",
        stats.movies_this_week, stats.episodes_this_week, stats.series_this_week
    );
    println!(
        "   This month: {} movies, {} episodes, {} series",
        stats.movies_this_month, stats.episodes_this_month, stats.series_this_month
    );
    if let Some(last) = stats.last_watched_date {
        println!(
            "   Last watched: {}",
            last.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }
    println!();

    println!("STREAKS");
    println!("   Current:  {} days", stats.current_streak);
    println!("   Longest:  {} days", stats.longest_streak);
    println!();

    if !stats.genre_counts.is_empty() {
        println!("GENRES");
        let mut genres: Vec<(&String, &u32)> = stats.genre_counts.iter().collect();
        genres.sort_by(|a, b| b.1.cmp(a.1));
        for (genre, count) in genres {
            println!("   {:<20} {:>4}", genre, count);
        }
        println!();
    }
}

fn print_badges(badges: &[Badge], progress: &[BadgeProgress], all: bool) {
    let unlocked = badges.iter().filter(|b| b.is_unlocked()).count();
    println!("BADGES ({} of {} unlocked)", unlocked, badges.len());

    for (badge, progress) in badges.iter().zip(progress) {
        if badge.is_unlocked() {
            let when = badge
                .unlocked_date
                .map(|d| d.with_timezone(&Local).format("%Y-%m-%d").to_string())
                .unwrap_or_default();
            println!("   {} {:<24} {:<10} {}", badge.icon, badge.name, badge.rarity.as_str(), when);
        } else if all {
            println!(
                "   🔒 {:<24} {:<10} {}/{}",
                badge.name,
                badge.rarity.as_str(),
                progress.current.min(progress.requirement as u64),
                progress.requirement
            );
        }
    }
}

fn print_badges_json(badges: &[Badge], progress: &[BadgeProgress], all: bool) -> Result<()> {
    let json: Vec<_> = badges
        .iter()
        .zip(progress)
        .filter(|(badge, _)| all || badge.is_unlocked())
        .map(|(badge, progress)| {
            serde_json::json!({
                "id": badge.id,
                "name": badge.name,
                "description": badge.description,
                "icon": badge.icon,
                "category": badge.category.as_str(),
                "rarity": badge.rarity.as_str(),
                "requirement": badge.requirement,
                "unlocked_date": badge.unlocked_date,
                "progress": progress.fraction(),
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
