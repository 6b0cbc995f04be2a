use anyhow::{Context, Result};
use serde::Serialize;
use volley_core::{clamp01, BoostPadRegistry, BotSettings};
use volley_team::{tuning, Decision, Directive, TeamContext, TeamCoordinator};

use crate::scenarios::{Action, Scenario};

/// Outcome of running the team logic on one scenario.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EvaluationResult {
    pub scenario_id: String,
    pub description: String,
    pub tags: Vec<String>,
    pub passed: bool,
    pub action: Action,
    pub role: usize,
    pub attacker_id: u32,
    pub double_commit_risk: f64,
    pub last_man_violation: bool,
    pub message: String,
}

/// Coarse action a directive stands for.
pub fn action_of(directive: &Directive) -> Action {
    match directive {
        Directive::AttackShot { .. }
        | Directive::AttackClearFallback { .. }
        | Directive::KickoffCommit => Action::Attack,
        Directive::BoostDetour { .. } => Action::Boost,
        Directive::DefensiveClear { .. } => Action::Defend,
        Directive::SupportHold { force_nearest, .. } if *force_nearest => Action::Defend,
        Directive::SupportHold { .. } | Directive::KickoffSupportHold | Directive::Recover => {
            Action::Support
        }
    }
}

/// How much a non-first man's intercept overlaps the attacker's, in `[0, 1]`.
pub fn double_commit_risk(role: usize, my_time: f64, attacker_time: f64, window: f64) -> f64 {
    if role == 0 {
        return 0.0;
    }
    let delta = my_time - attacker_time;
    clamp01(1.0 - (delta + window) / (window + 0.30).max(0.01))
}

/// Run a fresh coordinator on the scenario and check the expectation.
pub fn evaluate(
    scenario: &Scenario,
    settings: &BotSettings,
    pads: &BoostPadRegistry,
) -> Result<EvaluationResult> {
    let mut coordinator = TeamCoordinator::new(settings.clone(), [scenario.bot]);
    let decisions = coordinator
        .tick(&scenario.world, pads)
        .with_context(|| format!("Scenario {} failed to run", scenario.id))?;
    let Some((_, decision)) = decisions.into_iter().find(|(id, _)| *id == scenario.bot) else {
        anyhow::bail!("Scenario {}: bot {} made no decision", scenario.id, scenario.bot);
    };

    let window = tuning::commit_window(coordinator.settings(), &coordinator.settings().skill());
    let context = TeamContext::build(&scenario.world)?;
    let Some(mine) = context.intercept(scenario.bot) else {
        anyhow::bail!("Scenario {}: bot {} has no intercept", scenario.id, scenario.bot);
    };
    let now = scenario.world.time;
    let risk = double_commit_risk(
        decision.role,
        mine.effective_time() - now,
        context.attacker_intercept().effective_time() - now,
        window,
    );
    let attacker_id = context.attacker_id.as_u32();
    let team_size = context.team_size();

    Ok(judge(scenario, &decision, attacker_id, team_size, risk))
}

fn judge(
    scenario: &Scenario,
    decision: &Decision,
    attacker_id: u32,
    team_size: usize,
    double_commit_risk: f64,
) -> EvaluationResult {
    let expected = &scenario.expectation;
    let action = action_of(&decision.directive);
    let last_man_violation =
        team_size > 1 && decision.role == team_size - 1 && action == Action::Attack;

    let mut reasons = Vec::new();
    if action != expected.action {
        reasons.push(format!(
            "expected action '{}', got '{}'",
            expected.action, action
        ));
    }
    if let Some(role) = expected.role {
        if decision.role != role {
            reasons.push(format!("expected role {}, got {}", role, decision.role));
        }
    }
    if double_commit_risk > expected.max_double_commit_risk {
        reasons.push(format!(
            "double_commit_risk {:.3} exceeded max {:.3}",
            double_commit_risk, expected.max_double_commit_risk
        ));
    }
    if last_man_violation && !expected.allow_last_man_attack {
        reasons.push("last-man violation: attack selected while being final backline role".into());
    }

    EvaluationResult {
        scenario_id: scenario.id.to_string(),
        description: scenario.description.to_string(),
        tags: scenario.tags.iter().map(|tag| tag.to_string()).collect(),
        passed: reasons.is_empty(),
        action,
        role: decision.role,
        attacker_id,
        double_commit_risk,
        last_man_violation,
        message: if reasons.is_empty() {
            "ok".to_string()
        } else {
            reasons.join("; ")
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use volley_core::{BoostPadRegistry, Vector3};

    use crate::scenarios::catalog;

    fn support(force_nearest: bool) -> Directive {
        Directive::SupportHold {
            anchor: Vector3::zeros(),
            hold_position: Vector3::new(0.0, -1000.0, 0.0),
            standoff: 1000.0,
            force_nearest,
            anchor_reused: false,
        }
    }

    #[test]
    fn test_action_mapping() {
        assert_eq!(action_of(&Directive::KickoffCommit), Action::Attack);
        assert_eq!(action_of(&Directive::Recover), Action::Support);
        assert_eq!(action_of(&Directive::KickoffSupportHold), Action::Support);
        assert_eq!(action_of(&support(false)), Action::Support);
        assert_eq!(action_of(&support(true)), Action::Defend);
    }

    #[test]
    fn test_double_commit_risk() {
        assert_eq!(double_commit_risk(0, 1.0, 1.0, 0.3), 0.0);
        // same arrival time
        assert_relative_eq!(double_commit_risk(1, 1.0, 1.0, 0.3), 0.5);
        // well behind the attacker
        assert_eq!(double_commit_risk(1, 3.0, 1.0, 0.3), 0.0);
        // ahead of the attacker
        assert_eq!(double_commit_risk(2, 0.5, 1.5, 0.3), 1.0);
    }

    #[test]
    fn test_evaluate_catalog() {
        let settings = BotSettings::default();
        let pads = BoostPadRegistry::standard();
        for scenario in catalog() {
            let result = evaluate(&scenario, &settings, &pads).unwrap();
            assert_eq!(result.scenario_id, scenario.id);
            assert!(result.passed, "{}: {}", result.scenario_id, result.message);
            assert_eq!(result.message, "ok");
            assert!((0.0..=1.0).contains(&result.double_commit_risk));
            if result.role == 0 {
                assert_eq!(result.double_commit_risk, 0.0);
            }
        }
    }

    #[test]
    fn test_first_man_attack_passes() {
        let scenario = catalog()
            .into_iter()
            .find(|s| s.id == "2v2_attack_first_man")
            .unwrap();
        let result = evaluate(&scenario, &BotSettings::default(), &BoostPadRegistry::standard())
            .unwrap();
        assert!(result.passed, "{}", result.message);
        assert_eq!(result.action, Action::Attack);
        assert_eq!(result.attacker_id, 1);
        assert!(!result.last_man_violation);
    }

    #[test]
    fn test_last_man_holds_behind_challenge() {
        let settings = BotSettings::default();
        let pads = BoostPadRegistry::standard();
        let last_man = catalog()
            .into_iter()
            .filter(|s| s.tags.contains(&"last_man"))
            .collect::<Vec<_>>();
        assert_eq!(last_man.len(), 2);
        for scenario in last_man {
            let result = evaluate(&scenario, &settings, &pads).unwrap();
            assert_eq!(result.action, Action::Defend, "{}", scenario.id);
            assert_eq!(result.role, 2, "{}", scenario.id);
            // the challenging teammate is first man
            assert_eq!(result.attacker_id, 3, "{}", scenario.id);
            assert!(!result.last_man_violation);
        }
    }

    #[test]
    fn test_boost_detour_scenarios() {
        let settings = BotSettings::default();
        let pads = BoostPadRegistry::standard();
        for scenario in catalog().into_iter().filter(|s| s.tags.contains(&"boost")) {
            let result = evaluate(&scenario, &settings, &pads).unwrap();
            assert_eq!(result.action, Action::Boost, "{}", scenario.id);
            assert_eq!(result.role, 1, "{}", scenario.id);
            assert_eq!(result.attacker_id, 2, "{}", scenario.id);
        }
    }
}
