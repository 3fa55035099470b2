//! Consecutive-day viewing streaks.
//!
//! Works on local calendar days. The caller decides which records count as
//! activity (movies and episodes by default) and converts their instants to
//! days in the user's offset.

use chrono::NaiveDate;
use std::collections::BTreeSet;

/// Current and longest run of consecutive active days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streak {
    /// Run ending today, or yesterday if nothing was watched yet today
    pub current: u32,
    /// Longest run anywhere in the history, never less than `current`
    pub longest: u32,
}

/// Compute the streak over a set of activity days.
///
/// Duplicate days collapse. A streak is still "current" on a day with no
/// activity yet, as long as yesterday was active.
pub fn compute_streak<I>(days: I, today: NaiveDate) -> Streak
where
    I: IntoIterator<Item = NaiveDate>,
{
    let unique: BTreeSet<NaiveDate> = days.into_iter().collect();
    if unique.is_empty() {
        return Streak::default();
    }

    let current = current_run(&unique, today);

    // Longest run, scanning most recent first
    let mut longest = 0u32;
    let mut run = 0u32;
    let mut prev: Option<NaiveDate> = None;
    for &day in unique.iter().rev() {
        run = match prev {
            Some(p) if (p - day).num_days() == 1 => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }

    Streak {
        current,
        longest: longest.max(current),
    }
}

fn current_run(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let yesterday = today.pred_opt();
    let start = if days.contains(&today) {
        today
    } else {
        match yesterday {
            Some(y) if days.contains(&y) => y,
            _ => return 0,
        }
    };

    let mut count = 1u32;
    let mut day = start;
    while let Some(prev) = day.pred_opt() {
        if !days.contains(&prev) {
            break;
        }
        count += 1;
        day = prev;
    }
    count
}
