use volley_core::{
    ground_distance, BoostPad, BoostPadRegistry, BotSettings, VehicleState, WorldSnapshot,
};

use crate::{
    intercept::{Intercept, FAR_FUTURE},
    team_context::TeamContext,
};

/// Cost reduction for large pads, in units of travel distance.
const LARGE_PAD_BONUS: f64 = 1500.0;

/// Whether `vehicle` can leave the play to pick up boost without exposing the
/// team.
pub fn is_safe_to_detour(
    context: &TeamContext,
    vehicle: &VehicleState,
    settings: &BotSettings,
) -> bool {
    let cutoff = 0.64 + settings.human_style.takeover_bias * 0.08;
    if context.open_attack_window > cutoff {
        return false;
    }

    let own_time = context
        .intercept(vehicle.id)
        .map_or(FAR_FUTURE, Intercept::effective_time);
    let time_buffer = match context.opponent_fastest_time() {
        Some(opponent) => opponent - own_time,
        None => f64::INFINITY,
    };

    let risk = settings.teamplay.boost_detour_risk * settings.skill().decision_quality();
    let required_buffer = 0.25 + (1.0 - risk) * 0.60 + context.danger * 0.40;
    time_buffer > required_buffer && context.danger < 0.82
}

/// The available pad with the cheapest detour: close to the vehicle and not far
/// from our own goal. Pads past the object toward the opponent goal are only
/// picked when nothing else is up.
pub fn choose_pad(
    vehicle: &VehicleState,
    world: &WorldSnapshot,
    pads: &BoostPadRegistry,
) -> Option<BoostPad> {
    let own_goal = world.own_goal().center;
    let attack_sign = world.our_team.attack_sign();
    let object_depth = world.object.position.y * attack_sign;

    let cost = |pad: &BoostPad| {
        let travel = ground_distance(&vehicle.position, &pad.position);
        let retreat = ground_distance(&pad.position, &own_goal) * 0.5;
        let bonus = if pad.large { LARGE_PAD_BONUS } else { 0.0 };
        travel + retreat - bonus
    };
    let cheapest = |candidates: Vec<&BoostPad>| {
        candidates
            .into_iter()
            .min_by(|a, b| cost(*a).total_cmp(&cost(*b)))
            .copied()
    };

    let (behind, ahead): (Vec<&BoostPad>, Vec<&BoostPad>) = pads
        .available()
        .partition(|pad| pad.position.y * attack_sign <= object_depth);
    cheapest(behind).or_else(|| cheapest(ahead))
}
