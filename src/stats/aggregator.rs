use serde::Serialize;
use time::Date;

use crate::food_logs::repo_types::FoodLogEntry;
use crate::nutrition::Targets;

const WEEK_LEN: usize = 7;
/// Weekly buckets in the month view; days past the fourth week are left out.
const WEEKS_PER_MONTH: usize = 4;

/// Sum of one day's entries. Derived on demand, never stored.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DailyTotal {
    pub date: Date,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fats: f64,
    pub entry_count: u32,
}

impl DailyTotal {
    pub fn empty(date: Date) -> Self {
        Self {
            date,
            calories: 0.0,
            protein: 0.0,
            carbs: 0.0,
            fats: 0.0,
            entry_count: 0,
        }
    }

    pub fn has_entries(&self) -> bool {
        self.entry_count > 0
    }

    fn add(&mut self, entry: &FoodLogEntry) {
        self.calories += entry.calories;
        self.protein += entry.protein;
        self.carbs += entry.carbs;
        self.fats += entry.fats;
        self.entry_count += 1;
    }

    /// How far this day has come towards the targets.
    pub fn progress(&self, targets: &Targets) -> GoalProgress {
        GoalProgress {
            calories: MacroProgress::new(self.calories, targets.calories),
            protein: MacroProgress::new(self.protein, targets.protein_g),
            carbs: MacroProgress::new(self.carbs, targets.carbs_g),
            fats: MacroProgress::new(self.fats, targets.fats_g),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct MacroProgress {
    pub consumed: f64,
    pub target: i32,
    pub remaining: f64,
    /// Share of the target consumed; 0 for non-positive targets.
    pub percent: f64,
}

impl MacroProgress {
    fn new(consumed: f64, target: i32) -> Self {
        let target_f = f64::from(target);
        let percent = if target > 0 {
            round1(consumed / target_f * 100.0)
        } else {
            0.0
        };
        Self {
            consumed,
            target,
            remaining: target_f - consumed,
            percent,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct GoalProgress {
    pub calories: MacroProgress,
    pub protein: MacroProgress,
    pub carbs: MacroProgress,
    pub fats: MacroProgress,
}

/// Folds entries into one total per calendar day of `[start, end]`, oldest
/// first. Days without entries are zero-filled; entries dated outside the
/// range are dropped. An entry's day is the date part of its timestamp as
/// given.
pub fn aggregate(entries: &[FoodLogEntry], start: Date, end: Date) -> Vec<DailyTotal> {
    if start > end {
        return Vec::new();
    }

    let mut days: Vec<DailyTotal> =
        std::iter::successors(Some(start), |d| d.next_day().filter(|n| *n <= end))
            .map(DailyTotal::empty)
            .collect();

    for entry in entries {
        let offset = (entry.logged_at.date() - start).whole_days();
        let Ok(idx) = usize::try_from(offset) else {
            continue;
        };
        if let Some(bucket) = days.get_mut(idx) {
            bucket.add(entry);
        }
    }

    days
}

/// Averages over the days that have data.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct RangeSummary {
    pub days: usize,
    pub days_with_data: usize,
    pub total_calories: f64,
    pub avg_calories: i64,
    pub avg_protein: i64,
    pub avg_carbs: i64,
    pub avg_fats: i64,
}

pub fn summarize(series: &[DailyTotal]) -> RangeSummary {
    let with_data: Vec<&DailyTotal> = series.iter().filter(|d| d.has_entries()).collect();
    let n = with_data.len();
    let avg = |f: fn(&DailyTotal) -> f64| -> i64 {
        if n == 0 {
            return 0;
        }
        (with_data.iter().map(|d| f(d)).sum::<f64>() / n as f64).round() as i64
    };

    RangeSummary {
        days: series.len(),
        days_with_data: n,
        total_calories: series.iter().map(|d| d.calories).sum(),
        avg_calories: avg(|d| d.calories),
        avg_protein: avg(|d| d.protein),
        avg_carbs: avg(|d| d.carbs),
        avg_fats: avg(|d| d.fats),
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct WeeklyAverage {
    /// 1-based position of the week within the series.
    pub week: usize,
    pub start: Date,
    pub end: Date,
    pub avg_calories: i64,
    pub avg_protein: i64,
    pub avg_carbs: i64,
    pub avg_fats: i64,
}

/// Averages each macro over the logged days of the first four consecutive
/// 7-day buckets. A 30-day series yields four weeks; days 29 and 30 only count
/// towards the range summary.
pub fn weekly_averages(series: &[DailyTotal]) -> Vec<WeeklyAverage> {
    series
        .chunks(WEEK_LEN)
        .take(WEEKS_PER_MONTH)
        .enumerate()
        .filter_map(|(i, week)| {
            let (first, last) = (week.first()?, week.last()?);
            let divisor = week.iter().filter(|d| d.has_entries()).count().max(1) as f64;
            let avg = |f: fn(&DailyTotal) -> f64| -> i64 {
                (week.iter().map(f).sum::<f64>() / divisor).round() as i64
            };
            Some(WeeklyAverage {
                week: i + 1,
                start: first.date,
                end: last.date,
                avg_calories: avg(|d| d.calories),
                avg_protein: avg(|d| d.protein),
                avg_carbs: avg(|d| d.carbs),
                avg_fats: avg(|d| d.fats),
            })
        })
        .collect()
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
