use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{BodyMetrics, GoalProfile};
use crate::nutrition::{calculate_targets, Goal, Targets};

pub(crate) fn validate_metrics(m: &BodyMetrics) -> Result<(), String> {
    if !m.weight_kg.is_finite() || m.weight_kg <= 0.0 || m.weight_kg > 500.0 {
        return Err("weight_kg must be between 0 and 500".into());
    }
    if !m.height_cm.is_finite() || m.height_cm <= 0.0 || m.height_cm > 300.0 {
        return Err("height_cm must be between 0 and 300".into());
    }
    if !(1..=120).contains(&m.age_years) {
        return Err("age_years must be between 1 and 120".into());
    }
    Ok(())
}

pub(crate) fn validate_targets(t: &Targets) -> Result<(), String> {
    if t.calories <= 0 || t.protein_g < 0 || t.carbs_g < 0 || t.fats_g < 0 {
        return Err("targets must be non-negative and calories positive".into());
    }
    Ok(())
}

fn formula_targets(m: &BodyMetrics, goal: Goal) -> Targets {
    calculate_targets(m.weight_kg, m.height_cm, f64::from(m.age_years), goal)
}

/// Fresh profile with targets derived from the metrics.
pub fn onboard(user_id: Uuid, metrics: BodyMetrics, goal: Goal, now: OffsetDateTime) -> GoalProfile {
    GoalProfile {
        user_id,
        metrics,
        goal,
        targets: formula_targets(&metrics, goal),
        targets_overridden: false,
        updated_at: now,
    }
}

/// New body metrics; current targets are kept until the goal is toggled.
pub fn apply_metrics(mut p: GoalProfile, metrics: BodyMetrics, now: OffsetDateTime) -> GoalProfile {
    p.metrics = metrics;
    p.updated_at = now;
    p
}

/// Flips cut/bulk and re-derives targets, dropping any manual override.
pub fn toggle_goal(mut p: GoalProfile, now: OffsetDateTime) -> GoalProfile {
    p.goal = p.goal.toggled();
    p.targets = formula_targets(&p.metrics, p.goal);
    p.targets_overridden = false;
    p.updated_at = now;
    p
}

pub fn override_targets(mut p: GoalProfile, targets: Targets, now: OffsetDateTime) -> GoalProfile {
    p.targets = targets;
    p.targets_overridden = true;
    p.updated_at = now;
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    const NOW: OffsetDateTime = datetime!(2024-01-10 09:00 UTC);

    fn metrics() -> BodyMetrics {
        BodyMetrics {
            weight_kg: 70.0,
            height_cm: 175.0,
            age_years: 30,
        }
    }

    #[test]
    fn onboarding_derives_targets() {
        let p = onboard(Uuid::new_v4(), metrics(), Goal::Cut, NOW);
        assert_eq!(p.targets.calories, 2056);
        assert_eq!(p.targets.carbs_g, 232);
        assert!(!p.targets_overridden);
    }

    #[test]
    fn metric_edit_keeps_targets() {
        let p = onboard(Uuid::new_v4(), metrics(), Goal::Cut, NOW);
        let before = p.targets;
        let p = apply_metrics(
            p,
            BodyMetrics {
                weight_kg: 65.0,
                ..metrics()
            },
            NOW,
        );
        assert_eq!(p.metrics.weight_kg, 65.0);
        assert_eq!(p.targets, before);
    }

    #[test]
    fn override_then_toggle_restores_formula() {
        let p = onboard(Uuid::new_v4(), metrics(), Goal::Cut, NOW);
        let manual = Targets {
            calories: 1800,
            protein_g: 160,
            carbs_g: 150,
            fats_g: 60,
        };
        let p = override_targets(p, manual, NOW);
        assert!(p.targets_overridden);
        assert_eq!(p.targets, manual);

        let p = toggle_goal(p, NOW);
        assert_eq!(p.goal, Goal::Bulk);
        assert!(!p.targets_overridden);
        assert_eq!(p.targets, calculate_targets(70.0, 175.0, 30.0, Goal::Bulk));

        let p = toggle_goal(p, NOW);
        assert_eq!(p.targets.calories, 2056);
    }

    #[test]
    fn toggle_uses_edited_metrics() {
        let p = onboard(Uuid::new_v4(), metrics(), Goal::Cut, NOW);
        let p = apply_metrics(
            p,
            BodyMetrics {
                weight_kg: 80.0,
                ..metrics()
            },
            NOW,
        );
        let p = toggle_goal(p, NOW);
        assert_eq!(p.targets.protein_g, 176);
    }

    #[test]
    fn metric_validation() {
        assert!(validate_metrics(&metrics()).is_ok());
        assert!(validate_metrics(&BodyMetrics {
            weight_kg: 0.0,
            ..metrics()
        })
        .is_err());
        assert!(validate_metrics(&BodyMetrics {
            height_cm: f64::INFINITY,
            ..metrics()
        })
        .is_err());
        assert!(validate_metrics(&BodyMetrics {
            age_years: 0,
            ..metrics()
        })
        .is_err());
    }

    #[test]
    fn target_validation() {
        let t = Targets {
            calories: 2000,
            protein_g: 0,
            carbs_g: 200,
            fats_g: 70,
        };
        assert!(validate_targets(&t).is_ok());
        assert!(validate_targets(&Targets { calories: 0, ..t }).is_err());
        assert!(validate_targets(&Targets { carbs_g: -1, ..t }).is_err());
    }
}
