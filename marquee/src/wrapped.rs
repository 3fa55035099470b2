//! marquee-wrapped - Watched Year/Month in Review CLI
//!
//! Generate Spotify Wrapped-style summaries of what you watched.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use marquee_core::analytics::{TrendComparison, WrappedConfig, WrappedPeriod, WrappedStats};
use marquee_core::{Config, SystemClock, WatchedLibrary};

#[derive(Parser, Debug)]
#[command(name = "marquee-wrapped")]
#[command(about = "Marquee Wrapped - Your Viewing in Review")]
#[command(version)]
struct Args {
    /// Year to generate wrapped for (default: current month)
    #[arg(long)]
    year: Option<i32>,

    /// Month to generate wrapped for (format: YYYY-MM)
    #[arg(long, conflicts_with = "year")]
    month: Option<String>,

    /// List the months that have activity
    #[arg(long, conflicts_with_all = ["year", "month"])]
    list: bool,

    /// Export format (md = markdown, json = JSON)
    #[arg(long)]
    export: Option<String>,

    /// Disable trend comparison with previous period
    #[arg(long)]
    no_trends: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration and library
    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = marquee_core::logging::init(&config.logging).ok();
    tracing::debug!(?args, "marquee-wrapped starting up");

    let wrapped_config = WrappedConfig {
        include_trends: !args.no_trends,
        top_genres_count: config.analytics.top_genres(),
    };
    let library = WatchedLibrary::open(&config)
        .context("failed to open library")?
        .with_wrapped_config(wrapped_config);

    if args.list {
        let months = library
            .available_months()
            .context("failed to list months")?;
        print_months(&months, args.export.as_deref())?;
        return Ok(());
    }

    // Determine the period
    let period = if let Some(month_str) = &args.month {
        parse_month(month_str)?
    } else if let Some(year) = args.year {
        WrappedPeriod::Year(check_year(year)?)
    } else {
        WrappedPeriod::current_month(&SystemClock)
    };

    let stats = library
        .wrapped(period)
        .context("failed to generate wrapped stats")?;

    // Output based on export format
    match args.export.as_deref() {
        Some("json") => print_json(&stats)?,
        Some("md") => print_markdown(&stats),
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other),
        None => print_terminal(&stats),
    }

    Ok(())
}

/// Parse `YYYY-MM`.
fn parse_month(input: &str) -> Result<WrappedPeriod> {
    let parts: Vec<&str> = input.split('-').collect();
    if parts.len() != 2 {
        anyhow::bail!("Invalid month format. Use YYYY-MM (e.g., 2024-12)");
    }
    let year: i32 = parts[0].parse().context("Invalid year")?;
    let month: u32 = parts[1].parse().context("Invalid month")?;
    if !(1..=12).contains(&month) {
        anyhow::bail!("Month must be between 1 and 12");
    }
    Ok(WrappedPeriod::Month(check_year(year)?, month))
}

/// Reject years the calendar cannot represent.
fn check_year(year: i32) -> Result<i32> {
    if NaiveDate::from_ymd_opt(year, 1, 1).is_none() {
        anyhow::bail!("Year {} is out of range", year);
    }
    Ok(year)
}

fn print_months(months: &[WrappedPeriod], export: Option<&str>) -> Result<()> {
    match export {
        Some("json") => {
            let json: Vec<_> = months
                .iter()
                .filter_map(|p| match p {
                    WrappedPeriod::Month(year, month) => Some(format!("{:04}-{:02}", year, month)),
                    WrappedPeriod::Year(_) => None,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Some(other) if other != "md" => {
            anyhow::bail!("Unknown export format: {}. Use 'md' or 'json'", other)
        }
        _ => {
            if months.is_empty() {
                println!("No activity recorded yet.");
            }
            for period in months {
                println!("{}", period.display_name());
            }
        }
    }
    Ok(())
}

fn print_terminal(stats: &WrappedStats) {
    let title = format!("🎬 YOUR {} WRAPPED 🎬", stats.period.display_name().to_uppercase());

    // Header
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    if stats.totals.is_empty() {
        println!("  No activity found for this period.");
        println!();
        return;
    }

    // The Numbers
    println!("📊 THE NUMBERS");
    println!(
        "   Movies:   {:<12} Watch time: {}",
        stats.totals.movies,
        stats.totals.runtime_display()
    );
    println!(
        "   Episodes: {:<12} Series: {}",
        stats.totals.episodes, stats.totals.series
    );
    println!();

    // Top Genres
    if !stats.top_genres.is_empty() {
        println!("🏆 TOP GENRES");
        for (i, (genre, count)) in stats.top_genres.iter().enumerate() {
            let rank = match i {
                0 => "🥇".to_string(),
                1 => "🥈".to_string(),
                2 => "🥉".to_string(),
                _ => format!("{}.", i + 1),
            };
            println!("   {} {:<20} {:>4}", rank, genre, count);
        }
        println!();
    }

    // Activity
    println!("🔥 ACTIVITY");
    println!(
        "   Active:   {} of {} days ({:.0}%)",
        stats.active_days,
        stats.total_days,
        stats.activity_percentage()
    );
    println!();

    // Trends
    if let Some(trends) = &stats.trends {
        println!("📈 VS PREVIOUS PERIOD");
        println!(
            "   Movies: {}  │  Episodes: {}  │  Watch time: {}",
            TrendComparison::format_delta(trends.movies_delta_pct),
            TrendComparison::format_delta(trends.episodes_delta_pct),
            TrendComparison::format_delta(trends.runtime_delta_pct),
        );
        println!();
    }
}

fn print_markdown(stats: &WrappedStats) {
    println!("# 🎬 {} Wrapped", stats.period.display_name());
    println!();

    if stats.totals.is_empty() {
        println!("*No activity found for this period.*");
        return;
    }

    // Summary table
    println!("## Summary");
    println!();
    println!("| Metric | Value |");
    println!("|--------|-------|");
    println!("| Movies | {} |", stats.totals.movies);
    println!("| Episodes | {} |", stats.totals.episodes);
    println!("| Series | {} |", stats.totals.series);
    println!("| Watch Time | {} |", stats.totals.runtime_display());
    println!(
        "| Active Days | {} of {} ({:.0}%) |",
        stats.active_days,
        stats.total_days,
        stats.activity_percentage()
    );
    println!();

    if !stats.top_genres.is_empty() {
        println!("## Top Genres");
        println!();
        for (i, (genre, count)) in stats.top_genres.iter().enumerate() {
            println!("{}. **{}** - {} titles", i + 1, genre, count);
        }
        println!();
    }

    // Trends
    if let Some(trends) = &stats.trends {
        println!("## Trends vs Previous Period");
        println!();
        println!("| Metric | Change |");
        println!("|--------|--------|");
        println!(
            "| Movies | {} |",
            TrendComparison::format_delta(trends.movies_delta_pct)
        );
        println!(
            "| Episodes | {} |",
            TrendComparison::format_delta(trends.episodes_delta_pct)
        );
        println!(
            "| Watch Time | {} |",
            TrendComparison::format_delta(trends.runtime_delta_pct)
        );
        println!();
    }

    println!("---");
    println!("*Generated by marquee-wrapped*");
}

fn print_json(stats: &WrappedStats) -> Result<()> {
    let json = serde_json::json!({
        "period": stats.period.display_name(),
        "period_start": stats.period_start.map(|d| d.to_rfc3339()),
        "totals": {
            "movies": stats.totals.movies,
            "series": stats.totals.series,
            "episodes": stats.totals.episodes,
            "runtime_minutes": stats.totals.runtime_minutes,
        },
        "top_genres": stats.top_genres.iter().map(|(name, count)| {
            serde_json::json!({"name": name, "count": count})
        }).collect::<Vec<_>>(),
        "active_days": stats.active_days,
        "total_days": stats.total_days,
        "trends": stats.trends.as_ref().map(|t| serde_json::json!({
            "movies_delta_pct": t.movies_delta_pct,
            "episodes_delta_pct": t.episodes_delta_pct,
            "runtime_delta_pct": t.runtime_delta_pct,
        })),
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
