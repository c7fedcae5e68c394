use serde::Deserialize;

use super::repo_types::BodyMetrics;
use crate::nutrition::Goal;

#[derive(Debug, Deserialize)]
pub struct OnboardRequest {
    #[serde(flatten)]
    pub metrics: BodyMetrics,
    #[serde(default = "default_goal")]
    pub goal: Goal,
}

fn default_goal() -> Goal {
    Goal::Cut
}
