use serde::{Deserialize, Serialize};
use time::Date;

use super::repo_types::WeightLog;
use super::services::WeightSummary;

#[derive(Debug, Deserialize)]
pub struct WeightRequest {
    pub weight_kg: f64,
    /// Day of the weigh-in; defaults to today.
    #[serde(default)]
    pub date: Option<Date>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl WeightRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !self.weight_kg.is_finite() || self.weight_kg <= 0.0 || self.weight_kg > 500.0 {
            return Err("weight_kg must be between 0 and 500".into());
        }
        Ok(())
    }

    /// Trimmed notes, or `None` when blank.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct WeightsResponse {
    pub logs: Vec<WeightLog>,
    pub summary: Option<WeightSummary>,
}
