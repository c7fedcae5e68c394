use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

const ACTIVITY_MULTIPLIER: f64 = 1.55;
const BULK_SURPLUS_KCAL: f64 = 300.0;
const CUT_DEFICIT_KCAL: f64 = 500.0;
const PROTEIN_G_PER_KG: f64 = 2.2;
const FAT_CALORIE_SHARE: f64 = 0.25;
const KCAL_PER_G_FAT: f64 = 9.0;
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;

/// User's stated objective.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    /// Calorie deficit.
    Cut,
    /// Calorie surplus.
    Bulk,
}

impl Goal {
    pub fn toggled(self) -> Self {
        match self {
            Goal::Cut => Goal::Bulk,
            Goal::Bulk => Goal::Cut,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Goal::Cut => "cut",
            Goal::Bulk => "bulk",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Goal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cut" => Ok(Goal::Cut),
            "bulk" => Ok(Goal::Bulk),
            other => Err(format!("unknown goal: {other}")),
        }
    }
}

/// Daily calorie and macro targets.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Targets {
    pub calories: i32,
    pub protein_g: i32,
    pub carbs_g: i32,
    pub fats_g: i32,
}

/// Nearest integer, halves towards positive infinity (-75.5 becomes -75).
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Derives daily targets from body metrics and goal.
///
/// Mifflin-St Jeor BMR (male offset) times a fixed moderate activity factor,
/// shifted by the goal. Protein and fat are fixed first and carbs take whatever
/// calories remain, so carbs go negative when protein and fat alone exceed the
/// calorie target. Inputs are not validated.
pub fn calculate_targets(weight_kg: f64, height_cm: f64, age_years: f64, goal: Goal) -> Targets {
    let bmr = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years + 5.0;
    let tdee = bmr * ACTIVITY_MULTIPLIER;

    let calories = match goal {
        Goal::Bulk => round_half_up(tdee + BULK_SURPLUS_KCAL),
        Goal::Cut => round_half_up(tdee - CUT_DEFICIT_KCAL),
    };
    let protein = round_half_up(weight_kg * PROTEIN_G_PER_KG);
    let fats = round_half_up(calories * FAT_CALORIE_SHARE / KCAL_PER_G_FAT);
    let carbs = round_half_up(
        (calories - (protein * KCAL_PER_G_PROTEIN + fats * KCAL_PER_G_FAT)) / KCAL_PER_G_CARBS,
    );

    Targets {
        calories: calories as i32,
        protein_g: protein as i32,
        carbs_g: carbs as i32,
        fats_g: fats as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cut_targets_for_reference_profile() {
        let t = calculate_targets(70.0, 175.0, 30.0, Goal::Cut);
        assert_eq!(
            t,
            Targets {
                calories: 2056,
                protein_g: 154,
                carbs_g: 232,
                fats_g: 57,
            }
        );
    }

    #[test]
    fn bulk_adds_surplus_instead_of_deficit() {
        // bmr = 1648.75, tdee = 2555.5625
        let t = calculate_targets(70.0, 175.0, 30.0, Goal::Bulk);
        assert_eq!(t.calories, 2856);
        assert_eq!(t.fats_g, 79);
        assert_eq!(t.carbs_g, 382);
    }

    #[test]
    fn protein_ignores_goal() {
        for weight in [45.0, 70.0, 82.5, 120.0] {
            let cut = calculate_targets(weight, 180.0, 40.0, Goal::Cut);
            let bulk = calculate_targets(weight, 180.0, 40.0, Goal::Bulk);
            assert_eq!(cut.protein_g, bulk.protein_g);
            assert_eq!(cut.protein_g, (weight * 2.2_f64).round() as i32);
        }
    }

    #[test]
    fn same_inputs_same_targets() {
        let a = calculate_targets(63.2, 168.0, 27.0, Goal::Cut);
        let b = calculate_targets(63.2, 168.0, 27.0, Goal::Cut);
        assert_eq!(a, b);
    }

    #[test]
    fn carbs_can_go_negative() {
        // protein + fat already exceed the 1542 kcal cut target
        let t = calculate_targets(150.0, 50.0, 100.0, Goal::Cut);
        assert_eq!(t.calories, 1542);
        assert_eq!(t.protein_g, 330);
        assert_eq!(t.fats_g, 43);
        assert_eq!(t.carbs_g, -41);
    }

    #[test]
    fn negative_halves_round_up() {
        // carbs = (767 - (880 + 189)) / 4 = -75.5
        let t = calculate_targets(100.0, 50.0, 100.0, Goal::Cut);
        assert_eq!(t.calories, 767);
        assert_eq!(t.protein_g, 220);
        assert_eq!(t.fats_g, 21);
        assert_eq!(t.carbs_g, -75);
    }

    #[test]
    fn halves_round_towards_positive_infinity() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.51), -3.0);
    }

    #[test]
    fn goal_round_trips_through_str() {
        assert_eq!("cut".parse::<Goal>().unwrap(), Goal::Cut);
        assert_eq!(Goal::Bulk.to_string(), "bulk");
        assert_eq!(Goal::Cut.toggled(), Goal::Bulk);
        assert!("maintain".parse::<Goal>().is_err());
    }
}
