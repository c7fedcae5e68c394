pub mod calculator;

pub use calculator::{calculate_targets, Goal, Targets};
