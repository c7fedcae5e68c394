use serde::{Deserialize, Serialize};

use super::aggregator::{round1, DailyTotal};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Calories,
    Protein,
    Carbs,
    Fats,
}

impl Metric {
    pub fn of(self, day: &DailyTotal) -> f64 {
        match self {
            Metric::Calories => day.calories,
            Metric::Protein => day.protein,
            Metric::Carbs => day.carbs,
            Metric::Fats => day.fats,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Trend {
    pub direction: Direction,
    /// Absolute change of the second-half mean relative to the first, in
    /// percent with one decimal. 0 when the first-half mean is not positive.
    pub percent: f64,
}

/// Compares the mean of the later half of logged days with the earlier half.
///
/// Only days with entries count. Returns `None` with fewer than two such days.
/// Whether a direction is good or bad depends on the metric and is left to
/// the caller.
pub fn compute_trend(series: &[DailyTotal], metric: Metric) -> Option<Trend> {
    let values: Vec<f64> = series
        .iter()
        .filter(|d| d.has_entries())
        .map(|d| metric.of(d))
        .collect();
    if values.len() < 2 {
        return None;
    }

    let (first, second) = values.split_at(values.len() / 2);
    let first_avg = mean(first);
    let second_avg = mean(second);

    let diff = second_avg - first_avg;
    let percent = if first_avg > 0.0 {
        round1((diff / first_avg).abs() * 100.0)
    } else {
        0.0
    };
    let direction = if diff > 0.0 {
        Direction::Up
    } else if diff < 0.0 {
        Direction::Down
    } else {
        Direction::Stable
    };

    Some(Trend { direction, percent })
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
