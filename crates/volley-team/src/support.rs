use volley_core::{
    clamp_to_arena, ground, ground_direction, ground_distance, lerp, BotSettings, Goal,
    SkillProfile, Vector3, VehicleId, VehicleState, WorldSnapshot,
};

use crate::{human::HumanAggressionTracker, team_context::TeamContext};

pub const MIN_STANDOFF: f64 = 2800.0;
pub const MAX_STANDOFF: f64 = 7600.0;
/// Distance kept from the walls when holding position.
const WALL_MARGIN: f64 = 150.0;

/// Point a supporting vehicle watches: between the object and the attacker,
/// pulled toward the human we play around.
pub fn support_anchor(
    world: &WorldSnapshot,
    context: &TeamContext,
    me: VehicleId,
    settings: &BotSettings,
    tracker: &HumanAggressionTracker,
) -> Vector3 {
    let Some(attacker) = context.vehicle_for_role(0) else {
        return world.object.position;
    };

    let anchor = lerp(world.object.position, attacker.position, 0.30);
    if !settings.teamplay.follow_human_style {
        return anchor;
    }
    match tracker.primary_human(world, me) {
        Some(human) => {
            let amount = settings.teamplay.human_follow_strength * 0.35;
            lerp(anchor, human.position, amount)
        }
        None => anchor,
    }
}

/// Distance a supporting vehicle in `role` keeps from its anchor.
pub fn support_standoff(
    context: &TeamContext,
    role: usize,
    settings: &BotSettings,
    skill: &SkillProfile,
    aggression: f64,
) -> f64 {
    let teamplay = &settings.teamplay;
    let mut standoff = if context.team_size() <= 2 {
        teamplay.support_distance_2v2
    } else if role <= 1 {
        teamplay.support_distance_3v3_second
    } else {
        teamplay.support_distance_3v3_third
    };

    standoff -= (aggression - 0.5) * 700.0;
    standoff += (0.70 - skill.rotation_discipline) * 600.0;
    standoff += context.danger * 900.0;
    if role >= 2 && teamplay.conservative_last_man {
        standoff += (1.0 - aggression) * 500.0;
    }

    standoff.clamp(MIN_STANDOFF, MAX_STANDOFF)
}

/// Where to wait: `standoff` back from the anchor toward our goal, or toward the
/// near post when `force_nearest` is set.
pub fn hold_position(
    anchor: &Vector3,
    standoff: f64,
    world: &WorldSnapshot,
    vehicle: &VehicleState,
    force_nearest: bool,
) -> Vector3 {
    let goal = world.own_goal().center;
    let aim = if force_nearest {
        let post_x = vehicle.position.x.signum() * (Goal::WIDTH / 2.0 - 200.0);
        Vector3::new(post_x, goal.y, 0.0)
    } else {
        goal
    };
    let back_off = standoff.min(ground_distance(anchor, &aim));
    let position = ground(anchor) + ground_direction(anchor, &aim) * back_off;
    clamp_to_arena(position, WALL_MARGIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use volley_core::{ObjectKind, ObjectState, ObjectTrajectory, TeamSide};

    fn car(id: u32, x: f64, y: f64) -> VehicleState {
        VehicleState::new(
            id,
            TeamSide::Blue,
            Vector3::new(x, y, 17.0),
            Vector3::new(0.0, 1000.0, 0.0),
            50.0,
        )
    }

    fn world(vehicles: Vec<VehicleState>) -> WorldSnapshot {
        let object = ObjectState::new(Vector3::new(0.0, 1000.0, 93.0), Vector3::zeros());
        WorldSnapshot {
            time: 0.0,
            our_team: TeamSide::Blue,
            object,
            object_kind: ObjectKind::Ball,
            vehicles,
            trajectory: ObjectTrajectory::extrapolate(0.0, &object, 5.0, 1.0 / 120.0),
        }
    }

    #[test]
    fn test_anchor_between_object_and_attacker() {
        let world = world(vec![car(1, 0.0, 0.0), car(2, -2000.0, -3000.0)]);
        let context = TeamContext::build(&world).unwrap();
        assert_eq!(context.attacker_id, VehicleId::new(1));

        let settings = BotSettings::default();
        let anchor = support_anchor(
            &world,
            &context,
            VehicleId::new(2),
            &settings,
            &HumanAggressionTracker::new(),
        );
        assert_relative_eq!(anchor, Vector3::new(0.0, 700.0, 70.2), epsilon = 1e-9);
    }

    #[test]
    fn test_anchor_pulled_toward_human() {
        let world = world(vec![car(1, 0.0, 0.0).human(), car(2, -2000.0, -3000.0)]);
        let context = TeamContext::build(&world).unwrap();
        let settings = BotSettings::default();
        let tracker = HumanAggressionTracker::new();

        let anchor = support_anchor(&world, &context, VehicleId::new(2), &settings, &tracker);
        let amount = 0.7 * 0.35;
        let expected = Vector3::new(0.0, 700.0, 70.2) * (1.0 - amount)
            + Vector3::new(0.0, 0.0, 17.0) * amount;
        assert_relative_eq!(anchor, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_standoff_is_clamped() {
        let world = world(vec![car(1, 0.0, 0.0), car(2, -2000.0, -3000.0)]);
        let context = TeamContext::build(&world).unwrap();
        let mut settings = BotSettings::default();
        let skill = settings.skill();

        let standoff = support_standoff(&context, 1, &settings, &skill, 0.5);
        let expected = 4300.0 + (0.70 - 0.80) * 600.0 + context.danger * 900.0;
        assert_relative_eq!(standoff, expected, epsilon = 1e-9);

        settings.teamplay.support_distance_2v2 = 100.0;
        assert_eq!(support_standoff(&context, 1, &settings, &skill, 1.0), MIN_STANDOFF);
        settings.teamplay.support_distance_2v2 = 20_000.0;
        assert_eq!(support_standoff(&context, 1, &settings, &skill, 0.0), MAX_STANDOFF);
    }

    #[test]
    fn test_hold_position_backs_off_toward_goal() {
        let world = world(vec![car(1, 0.0, 0.0)]);
        let anchor = Vector3::new(0.0, 1000.0, 93.0);
        let position = hold_position(&anchor, 3000.0, &world, &car(1, 0.0, 0.0), false);
        assert_relative_eq!(position, Vector3::new(0.0, -2000.0, 0.0), epsilon = 1e-9);

        // never past the goal itself
        let position = hold_position(&anchor, 9000.0, &world, &car(1, 0.0, 0.0), false);
        assert_relative_eq!(position.y, -5120.0 + WALL_MARGIN, epsilon = 1e-9);
    }

    #[test]
    fn test_hold_position_near_post() {
        let world = world(vec![car(1, 0.0, 0.0)]);
        let anchor = Vector3::new(0.0, -1000.0, 93.0);
        let position = hold_position(&anchor, 9000.0, &world, &car(1, -1500.0, -3000.0), true);
        assert!(position.x < 0.0);
        assert_relative_eq!(position.x, -(Goal::WIDTH / 2.0 - 200.0), epsilon = 1e-9);
    }
}
