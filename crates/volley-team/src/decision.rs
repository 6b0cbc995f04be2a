use anyhow::{bail, Context, Result};
use serde::Serialize;
use volley_core::{
    ground, ground_distance, shot_alignment, BoostPadRegistry, BotSettings, ObjectKind, VehicleId,
    VehicleState, WorldSnapshot,
};

use crate::{
    boost::{choose_pad, is_safe_to_detour},
    directive::{Directive, DirectiveKind},
    human::HumanAggressionTracker,
    memory::DecisionMemory,
    support::{hold_position, support_anchor, support_standoff},
    team_context::TeamContext,
    tuning::{
        adaptive_aggression, alignment_threshold, commit_window, low_boost_threshold,
        role_lock_duration, takeover_threshold,
    },
};

/// Above this danger a locked role no longer overrides the fresh one.
const ROLE_LOCK_DANGER_LIMIT: f64 = 0.82;

/// Why a directive was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    RecoveryAirborne,
    KickoffCommit,
    KickoffSupport,
    BoostDetourSafe,
    DangerForcedClear,
    AttackTakeoverShot,
    AttackTakeoverClear,
    ThirdManReliefClear,
    SecondManBoostDetour,
    SupportShapeHold,
}

/// Every intermediate scalar of a full decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionSignals {
    pub team_size: usize,
    pub attacker_id: VehicleId,
    /// Role computed by the team context this tick.
    pub fresh_role: usize,
    /// Whether the locked role replaced the fresh one.
    pub role_pinned: bool,
    pub my_intercept_time: f64,
    pub attacker_intercept_time: f64,
    pub opponent_fastest_time: Option<f64>,
    pub danger: f64,
    pub time_advantage: f64,
    pub open_attack_window: f64,
    pub commit_density: f64,
    pub opportunity_self: f64,
    pub opportunity_attacker: f64,
    pub aggression: f64,
    pub commit_window: f64,
    pub takeover_threshold: f64,
    pub takeover_bias: f64,
    pub low_boost_threshold: f64,
    pub should_attack: bool,
    pub attack_alignment: Option<f64>,
    pub alignment_threshold: Option<f64>,
}

/// Structured record of one decision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionTrace {
    pub time: f64,
    pub vehicle_id: VehicleId,
    pub role: usize,
    pub role_label: &'static str,
    pub reason: DecisionReason,
    pub directive: DirectiveKind,
    /// Absent for the airborne and kickoff shortcuts.
    pub signals: Option<DecisionSignals>,
}

/// Outcome of [`decide`].
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub directive: Directive,
    pub role: usize,
    pub trace: DecisionTrace,
}

/// Everything one vehicle needs to make its decision for the tick.
pub struct DecisionCtx<'a> {
    pub vehicle_id: VehicleId,
    pub world: &'a WorldSnapshot,
    pub context: &'a TeamContext,
    pub settings: &'a BotSettings,
    pub pads: &'a BoostPadRegistry,
    pub humans: &'a HumanAggressionTracker,
    pub memory: &'a mut DecisionMemory,
}

pub fn role_label(role: usize) -> &'static str {
    match role {
        0 => "first_man",
        1 => "second_man",
        _ => "third_man",
    }
}

/// Whether the object sits still on the center spot.
pub fn is_kickoff(world: &WorldSnapshot) -> bool {
    ground(&world.object.position).norm() < 1.0 && world.object.velocity.norm() < 1.0
}

/// Inputs of the attack takeover check.
struct TakeoverInputs {
    role: usize,
    my_time: f64,
    attacker_time: f64,
    commit_window: f64,
    opportunity_self: f64,
    opportunity_attacker: f64,
    open_attack_window: f64,
    commit_density: f64,
    danger: f64,
    threshold: f64,
}

/// Whether the vehicle should go for the object rather than support.
fn should_take_over(inputs: &TakeoverInputs) -> bool {
    let TakeoverInputs {
        role,
        my_time,
        attacker_time,
        commit_window,
        opportunity_self,
        opportunity_attacker,
        open_attack_window,
        commit_density,
        danger,
        threshold,
    } = *inputs;

    if role == 0 {
        return true;
    }
    if my_time + commit_window < attacker_time {
        return true;
    }
    if opportunity_self - opportunity_attacker > 0.12
        && my_time < attacker_time + 0.65 * commit_window
    {
        return true;
    }
    if open_attack_window >= threshold
        && opportunity_self >= threshold
        && commit_density < 0.70
        && (role <= 1 || danger < 0.60)
    {
        return true;
    }
    danger > 0.72 && role == 1 && my_time < attacker_time + 0.5 * commit_window
}

/// Choose the directive of one vehicle for this tick and update its memory.
///
/// Fails if the vehicle is not an active member of the team.
pub fn decide(ctx: DecisionCtx<'_>) -> Result<Decision> {
    let DecisionCtx {
        vehicle_id,
        world,
        context,
        settings,
        pads,
        humans,
        memory,
    } = ctx;

    let Some(vehicle) = context.team.iter().find(|v| v.id == vehicle_id).copied() else {
        bail!(
            "Vehicle {} is not an active member of team {}",
            vehicle_id,
            world.our_team
        );
    };
    let now = world.time;
    let team_size = context.team_size();
    let last_role = team_size - 1;

    let shortcut = |role: usize, reason: DecisionReason, directive: Directive| Decision {
        trace: DecisionTrace {
            time: now,
            vehicle_id,
            role,
            role_label: role_label(role),
            reason,
            directive: directive.kind(),
            signals: None,
        },
        directive,
        role,
    };

    if !vehicle.on_ground {
        let role = memory.last_role().unwrap_or(1).min(last_role);
        let decision = shortcut(role, DecisionReason::RecoveryAirborne, Directive::Recover);
        memory.set_trace(decision.trace.clone());
        return Ok(decision);
    }

    if is_kickoff(world) {
        let distance = |v: &VehicleState| (v.position - world.object.position).norm();
        let my_distance = distance(&vehicle);
        let decision = if context.team.iter().all(|v| distance(v) >= my_distance) {
            shortcut(0, DecisionReason::KickoffCommit, Directive::KickoffCommit)
        } else {
            shortcut(
                1.min(last_role),
                DecisionReason::KickoffSupport,
                Directive::KickoffSupportHold,
            )
        };
        memory.set_trace(decision.trace.clone());
        return Ok(decision);
    }

    let skill = settings.skill();
    let style = &settings.human_style;
    let aggression = adaptive_aggression(
        settings,
        &skill,
        humans.team_aggression(world, vehicle_id),
    );
    let takeover = takeover_threshold(style);

    let fresh_role = context.role(vehicle_id).unwrap_or(last_role);
    let locked_role = memory.last_role().filter(|_| memory.is_role_locked(now));
    let role = match locked_role {
        Some(locked)
            if context.danger < ROLE_LOCK_DANGER_LIMIT
                && fresh_role != 0
                && context.open_attack_window < takeover + 0.08 =>
        {
            locked.min(last_role)
        }
        _ => {
            memory.lock_role(fresh_role, now, role_lock_duration(style));
            fresh_role
        }
    };
    if role != fresh_role {
        log::debug!(
            "Vehicle {} keeps locked role {} over fresh role {}",
            vehicle_id,
            role,
            fresh_role
        );
    }

    let my_intercept = *context
        .intercept(vehicle_id)
        .with_context(|| format!("No intercept for vehicle {}", vehicle_id))?;
    let my_time = my_intercept.effective_time();
    let attacker_time = context.attacker_intercept().effective_time();
    let window = commit_window(settings, &skill);

    let own_goal = ground(&world.own_goal().center);
    let opponent_goal = world.opponent_goal().center;
    let intercept_goal_distance = ground_distance(&my_intercept.ground_position, &own_goal);

    let mut signals = DecisionSignals {
        team_size,
        attacker_id: context.attacker_id,
        fresh_role,
        role_pinned: role != fresh_role,
        my_intercept_time: my_time,
        attacker_intercept_time: attacker_time,
        opponent_fastest_time: context.opponent_fastest_time(),
        danger: context.danger,
        time_advantage: context.time_advantage,
        open_attack_window: context.open_attack_window,
        commit_density: context.commit_density,
        opportunity_self: context.opportunity(vehicle_id),
        opportunity_attacker: context.opportunity(context.attacker_id),
        aggression,
        commit_window: window,
        takeover_threshold: takeover,
        takeover_bias: style.takeover_bias,
        low_boost_threshold: low_boost_threshold(&skill, style),
        should_attack: false,
        attack_alignment: None,
        alignment_threshold: None,
    };

    let clear = Directive::DefensiveClear {
        target: my_intercept.target.position,
        intercept_time: my_time,
        aerial_allowed: world.object_kind == ObjectKind::Ball
            && skill.mechanics > 0.72
            && skill.consistency > 0.55
            && vehicle.boost > 35.0,
    };

    let (directive, reason) = 'choice: {
        if vehicle.boost < signals.low_boost_threshold
            && role > 0
            && is_safe_to_detour(context, &vehicle, settings)
        {
            if let Some(pad) = choose_pad(&vehicle, world, pads) {
                break 'choice (Directive::BoostDetour { pad }, DecisionReason::BoostDetourSafe);
            }
        }

        if context.danger > 0.86
            && intercept_goal_distance < 4600.0
            && (role <= 1 || my_time <= attacker_time + 0.10)
        {
            break 'choice (clear, DecisionReason::DangerForcedClear);
        }

        let should_attack = should_take_over(&TakeoverInputs {
            role,
            my_time,
            attacker_time,
            commit_window: window,
            opportunity_self: signals.opportunity_self,
            opportunity_attacker: signals.opportunity_attacker,
            open_attack_window: context.open_attack_window,
            commit_density: context.commit_density,
            danger: context.danger,
            threshold: takeover,
        });
        signals.should_attack = should_attack;
        if should_attack {
            let alignment = shot_alignment(
                &my_intercept.vehicle.position,
                &my_intercept.target.position,
                &opponent_goal,
            );
            let threshold = alignment_threshold(aggression, style);
            signals.attack_alignment = Some(alignment);
            signals.alignment_threshold = Some(threshold);

            if alignment > threshold
                || intercept_goal_distance > 5600.0
                || context.time_advantage > 0.18
                || signals.opportunity_self > takeover + 0.05
            {
                let allow_dribble = world.object_kind == ObjectKind::Ball
                    && skill.effective_mechanics() > 0.55 + style.mechanical_variance * 0.18;
                break 'choice (
                    Directive::AttackShot {
                        target: my_intercept.target.position,
                        shot_target: opponent_goal,
                        intercept_time: my_time,
                        allow_dribble,
                    },
                    DecisionReason::AttackTakeoverShot,
                );
            }
            break 'choice (
                Directive::AttackClearFallback {
                    target: my_intercept.target.position,
                    intercept_time: my_time,
                },
                DecisionReason::AttackTakeoverClear,
            );
        }

        if role >= 2 && context.danger > 0.74 && my_time < attacker_time + window {
            break 'choice (clear, DecisionReason::ThirdManReliefClear);
        }

        if role == 1
            && vehicle.boost < 35.0
            && context.danger < 0.45
            && context.open_attack_window < 0.60
            && is_safe_to_detour(context, &vehicle, settings)
        {
            if let Some(pad) = choose_pad(&vehicle, world, pads) {
                break 'choice (
                    Directive::BoostDetour { pad },
                    DecisionReason::SecondManBoostDetour,
                );
            }
        }

        let fresh_anchor = support_anchor(world, context, vehicle_id, settings, humans);
        let (anchor, anchor_reused) = match memory.last_support_target() {
            Some(previous) if !memory.can_repath(now, style.support_repath_cooldown) => {
                (previous, true)
            }
            _ => {
                memory.remember_support_target(fresh_anchor, now);
                (fresh_anchor, false)
            }
        };
        let standoff = support_standoff(context, role, settings, &skill, aggression);
        let force_nearest = role >= last_role
            && settings.teamplay.conservative_last_man
            && context.danger > 0.40;
        (
            Directive::SupportHold {
                anchor,
                hold_position: hold_position(&anchor, standoff, world, &vehicle, force_nearest),
                standoff,
                force_nearest,
                anchor_reused,
            },
            DecisionReason::SupportShapeHold,
        )
    };

    let trace = DecisionTrace {
        time: now,
        vehicle_id,
        role,
        role_label: role_label(role),
        reason,
        directive: directive.kind(),
        signals: Some(signals),
    };
    memory.set_trace(trace.clone());

    Ok(Decision {
        directive,
        role,
        trace,
    })
}
