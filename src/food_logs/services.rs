use time::Date;

use super::dto::RangeQuery;

/// Longest range a single listing may cover, in days.
pub const MAX_RANGE_DAYS: i64 = 366;

/// Fills missing ends with `today` and checks the range is ordered and bounded.
pub fn resolve_range(q: &RangeQuery, today: Date) -> Result<(Date, Date), String> {
    let to = q.to.unwrap_or(today);
    let from = q.from.unwrap_or(to);
    if from > to {
        return Err("from must not be after to".into());
    }
    if (to - from).whole_days() >= MAX_RANGE_DAYS {
        return Err(format!("range must not exceed {MAX_RANGE_DAYS} days"));
    }
    Ok((from, to))
}
