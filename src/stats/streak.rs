use std::collections::BTreeSet;

use serde::Serialize;
use time::{Date, Duration};

/// Number of trailing logged days, ending at the newest element.
///
/// Zero whenever the newest day is empty, whatever came before it.
pub fn current_streak(presence: &[bool]) -> u32 {
    presence.iter().rev().take_while(|logged| **logged).count() as u32
}

/// True when every day of the window has an entry. Stops at the first gap.
pub fn streak_met(presence: &[bool]) -> bool {
    presence.iter().all(|logged| *logged)
}

/// Presence flags for each day of `[start, end]`, oldest first.
pub fn day_presence(logged: &BTreeSet<Date>, start: Date, end: Date) -> Vec<bool> {
    std::iter::successors(Some(start), |d| d.next_day().filter(|n| *n <= end))
        .take_while(|d| *d <= end)
        .map(|d| logged.contains(&d))
        .collect()
}

/// First day of the `days`-long window that ends on `today`, saturating at
/// the earliest representable date.
pub fn window_start(today: Date, days: u32) -> Date {
    today
        .checked_sub(Duration::days(i64::from(days.saturating_sub(1))))
        .unwrap_or(Date::MIN)
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct StripDay {
    pub date: Date,
    pub logged: bool,
    pub is_today: bool,
}

/// One row per day of the trailing `len` days ending on `today`.
pub fn week_strip(logged: &BTreeSet<Date>, today: Date, len: u32) -> Vec<StripDay> {
    let start = window_start(today, len);
    day_presence(logged, start, today)
        .into_iter()
        .enumerate()
        .map(|(i, present)| {
            let date = start + Duration::days(i as i64);
            StripDay {
                date,
                logged: present,
                is_today: date == today,
            }
        })
        .collect()
}
