use std::collections::HashMap;

use anyhow::{bail, Result};
use volley_core::{
    clamp01, ground, ground_direction, ground_distance, shot_alignment, Vector3, VehicleId,
    VehicleState, WorldSnapshot,
};

use crate::intercept::Intercept;

/// Time advantage assumed when there are no opponents.
pub const UNCONTESTED_TIME_ADVANTAGE: f64 = 2.0;

/// Shared per-tick view of the team: who attacks, who follows, and how the play
/// looks. Rebuilt from scratch every tick.
#[derive(Debug, Clone)]
pub struct TeamContext {
    /// Active teammates in roster order.
    pub team: Vec<VehicleState>,
    pub intercepts: HashMap<VehicleId, Intercept>,
    /// Vehicle ids ordered from first (attacker) to last (deepest) role.
    pub role_order: Vec<VehicleId>,
    pub roles: HashMap<VehicleId, usize>,
    pub attacker_id: VehicleId,
    pub opponent_fastest: Option<Intercept>,
    /// Threat to our goal, in `[0, 1]`.
    pub danger: f64,
    /// Fastest opponent intercept minus attacker intercept, in seconds.
    pub time_advantage: f64,
    /// Best opportunity score on the team.
    pub open_attack_window: f64,
    /// Share of supporting teammates that could double commit.
    pub commit_density: f64,
    pub opportunity: HashMap<VehicleId, f64>,
}

impl TeamContext {
    /// Build the context for `world.our_team`. Fails if the team has no active
    /// vehicle.
    pub fn build(world: &WorldSnapshot) -> Result<Self> {
        let team = world.teammates();
        if team.is_empty() {
            bail!("No active vehicles on team {}", world.our_team);
        }

        let own_goal = ground(&world.own_goal().center);
        let opponent_goal = ground(&world.opponent_goal().center);

        let intercepts: HashMap<VehicleId, Intercept> = team
            .iter()
            .map(|vehicle| (vehicle.id, Intercept::new(vehicle, world)))
            .collect();
        let opponent_fastest = world
            .opponents()
            .iter()
            .map(|opponent| Intercept::new(opponent, world))
            .min_by(|a, b| a.effective_time().total_cmp(&b.effective_time()));

        let alignment = |vehicle: &VehicleState| {
            shot_alignment(
                &vehicle.position,
                &intercepts[&vehicle.id].target.position,
                &opponent_goal,
            )
        };

        let attacker_score = |vehicle: &VehicleState| {
            let defensive_penalty =
                if team.len() >= 3 && ground_distance(&vehicle.position, &own_goal) < 1800.0 {
                    0.08
                } else {
                    0.0
                };
            intercepts[&vehicle.id].effective_time() - alignment(vehicle) * 0.25
                - vehicle.boost / 100.0 * 0.12
                + defensive_penalty
        };
        let attacker = team
            .iter()
            .min_by(|a, b| attacker_score(*a).total_cmp(&attacker_score(*b)))
            .copied()
            .unwrap_or(team[0]);
        let attacker_time = intercepts[&attacker.id].effective_time();

        let role_order = order_roles(&team, &attacker, &intercepts, &own_goal);
        let roles: HashMap<VehicleId, usize> = role_order
            .iter()
            .enumerate()
            .map(|(role, id)| (*id, role))
            .collect();

        let fastest_opponent_time = opponent_fastest.as_ref().map(Intercept::effective_time);

        let opportunity: HashMap<VehicleId, f64> = team
            .iter()
            .map(|vehicle| {
                let intercept = &intercepts[&vehicle.id];
                let own_time = intercept.effective_time();
                let opponent_edge = fastest_opponent_time
                    .map_or(1.0, |opp| clamp01((opp - own_time + 0.25) / 1.25));
                let attacker_edge = clamp01((attacker_time - own_time + 0.35) / 0.70);
                let lane = clamp01((alignment(vehicle) + 1.0) / 2.0);
                let boost = clamp01(vehicle.boost / 50.0);
                let depth = clamp01(
                    (ground_distance(&intercept.ground_position, &own_goal) - 2000.0) / 6000.0,
                );
                let score = opponent_edge * 0.34
                    + attacker_edge * 0.28
                    + lane * 0.20
                    + boost * 0.10
                    + depth * 0.08;
                (vehicle.id, clamp01(score))
            })
            .collect();

        let open_attack_window = opportunity.values().copied().fold(0.0, f64::max);

        let supporters: Vec<&VehicleState> =
            team.iter().filter(|v| v.id != attacker.id).collect();
        let commit_density = if supporters.is_empty() {
            0.0
        } else {
            let committing = supporters
                .iter()
                .filter(|v| {
                    let time = intercepts[&v.id].effective_time();
                    (time - attacker_time).abs() <= 0.20 && opportunity[&v.id] > 0.52
                })
                .count();
            committing as f64 / supporters.len() as f64
        };

        let goal_pressure =
            clamp01((4200.0 - ground_distance(&world.object.position, &own_goal)) / 4200.0);
        let (time_pressure, time_advantage) = match fastest_opponent_time {
            Some(opp) => (
                clamp01((attacker_time - opp + 0.30) / 1.20),
                opp - attacker_time,
            ),
            None => (0.0, UNCONTESTED_TIME_ADVANTAGE),
        };
        let toward_goal = world
            .object
            .velocity
            .dot(&ground_direction(&world.object.position, &own_goal));
        let velocity_pressure = clamp01((toward_goal + 300.0) / 2000.0);
        let danger =
            clamp01(goal_pressure * 0.45 + time_pressure * 0.35 + velocity_pressure * 0.20);

        Ok(Self {
            attacker_id: attacker.id,
            team,
            intercepts,
            role_order,
            roles,
            opponent_fastest,
            danger,
            time_advantage,
            open_attack_window,
            commit_density,
            opportunity,
        })
    }

    pub fn team_size(&self) -> usize {
        self.team.len()
    }

    pub fn intercept(&self, id: VehicleId) -> Option<&Intercept> {
        self.intercepts.get(&id)
    }

    pub fn attacker_intercept(&self) -> &Intercept {
        &self.intercepts[&self.attacker_id]
    }

    pub fn role(&self, id: VehicleId) -> Option<usize> {
        self.roles.get(&id).copied()
    }

    pub fn opportunity(&self, id: VehicleId) -> f64 {
        self.opportunity.get(&id).copied().unwrap_or(0.0)
    }

    /// The vehicle holding `role`, if any.
    pub fn vehicle_for_role(&self, role: usize) -> Option<&VehicleState> {
        let id = self.role_order.get(role)?;
        self.team.iter().find(|v| v.id == *id)
    }

    /// Effective time of the fastest opponent intercept, if there are opponents.
    pub fn opponent_fastest_time(&self) -> Option<f64> {
        self.opponent_fastest.as_ref().map(Intercept::effective_time)
    }
}

/// Attacker first. With two or more others, the one nearest to our goal goes last
/// and the rest fill the middle by intercept time.
fn order_roles(
    team: &[VehicleState],
    attacker: &VehicleState,
    intercepts: &HashMap<VehicleId, Intercept>,
    own_goal: &Vector3,
) -> Vec<VehicleId> {
    let mut order = vec![attacker.id];
    let remaining: Vec<&VehicleState> = team.iter().filter(|v| v.id != attacker.id).collect();
    match remaining.as_slice() {
        [] => {}
        [only] => order.push(only.id),
        _ => {
            let last_id = remaining
                .iter()
                .min_by(|a, b| {
                    ground_distance(&a.position, own_goal)
                        .total_cmp(&ground_distance(&b.position, own_goal))
                })
                .map(|v| v.id);
            let mut middle: Vec<&VehicleState> = remaining
                .iter()
                .copied()
                .filter(|v| Some(v.id) != last_id)
                .collect();
            middle.sort_by(|a, b| {
                intercepts[&a.id]
                    .effective_time()
                    .total_cmp(&intercepts[&b.id].effective_time())
            });
            order.extend(middle.iter().map(|v| v.id));
            order.extend(last_id);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use volley_core::{ObjectKind, ObjectState, ObjectTrajectory, TeamSide};

    fn vehicle(id: u32, team: TeamSide, x: f64, y: f64, vy: f64, boost: f64) -> VehicleState {
        VehicleState::new(
            id,
            team,
            Vector3::new(x, y, 17.0),
            Vector3::new(0.0, vy, 0.0),
            boost,
        )
    }

    fn world(object: ObjectState, vehicles: Vec<VehicleState>) -> WorldSnapshot {
        WorldSnapshot {
            time: 0.0,
            our_team: TeamSide::Blue,
            object,
            object_kind: ObjectKind::Ball,
            vehicles,
            trajectory: ObjectTrajectory::extrapolate(0.0, &object, 5.0, 1.0 / 120.0),
        }
    }

    fn still_object(x: f64, y: f64) -> ObjectState {
        ObjectState::new(Vector3::new(x, y, 93.0), Vector3::zeros())
    }

    #[test]
    fn test_empty_team_is_an_error() {
        let world = world(
            still_object(0.0, 1000.0),
            vec![
                vehicle(1, TeamSide::Blue, 0.0, 0.0, 0.0, 0.0).demolished(),
                vehicle(2, TeamSide::Orange, 0.0, 2000.0, 0.0, 0.0),
            ],
        );
        assert!(TeamContext::build(&world).is_err());
    }

    #[test]
    fn test_single_vehicle_without_opponents() {
        let world = world(
            still_object(0.0, 1000.0),
            vec![vehicle(1, TeamSide::Blue, 0.0, -1000.0, 500.0, 40.0)],
        );
        let context = TeamContext::build(&world).unwrap();
        assert_eq!(context.role_order, vec![VehicleId::new(1)]);
        assert_eq!(context.attacker_id, VehicleId::new(1));
        assert_eq!(context.time_advantage, UNCONTESTED_TIME_ADVANTAGE);
        assert_eq!(context.commit_density, 0.0);
        assert!(context.opponent_fastest.is_none());

        // object resting 6120 from our goal: no goal or velocity pressure beyond the
        // +300 offset and no time pressure
        assert_relative_eq!(context.danger, 300.0 / 2000.0 * 0.20, epsilon = 1e-9);

        let intercept = context.attacker_intercept();
        let depth = clamp01(
            (ground_distance(&intercept.ground_position, &Vector3::new(0.0, -5120.0, 0.0))
                - 2000.0)
                / 6000.0,
        );
        let expected = 0.34 + 0.5 * 0.28 + 1.0 * 0.20 + 0.8 * 0.10 + depth * 0.08;
        assert_relative_eq!(context.opportunity(VehicleId::new(1)), expected, epsilon = 1e-9);
        assert_relative_eq!(context.open_attack_window, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_three_vehicle_role_order() {
        let world = world(
            still_object(0.0, 2000.0),
            vec![
                vehicle(1, TeamSide::Blue, 0.0, -4500.0, 0.0, 30.0),
                vehicle(2, TeamSide::Blue, 0.0, 1000.0, 800.0, 30.0),
                vehicle(3, TeamSide::Blue, 500.0, -1000.0, 800.0, 30.0),
                vehicle(21, TeamSide::Orange, 0.0, 4000.0, -500.0, 30.0),
            ],
        );
        let context = TeamContext::build(&world).unwrap();
        assert_eq!(
            context.role_order,
            vec![VehicleId::new(2), VehicleId::new(3), VehicleId::new(1)]
        );
        assert_eq!(context.role(VehicleId::new(1)), Some(2));
        assert_eq!(context.vehicle_for_role(1).map(|v| v.id), Some(VehicleId::new(3)));
    }

    #[test]
    fn test_ties_go_to_roster_order() {
        let world = world(
            still_object(0.0, 0.0),
            vec![
                vehicle(7, TeamSide::Blue, -1000.0, -2000.0, 0.0, 50.0),
                vehicle(3, TeamSide::Blue, -1000.0, -2000.0, 0.0, 50.0),
            ],
        );
        let context = TeamContext::build(&world).unwrap();
        assert_eq!(context.attacker_id, VehicleId::new(7));
    }

    #[test]
    fn test_empty_trajectory_keeps_scalars_finite() {
        let object = still_object(0.0, -3000.0);
        let mut world = world(
            object,
            vec![
                vehicle(1, TeamSide::Blue, 0.0, -1000.0, 0.0, 40.0),
                vehicle(2, TeamSide::Blue, 900.0, -4000.0, 0.0, 40.0),
                vehicle(21, TeamSide::Orange, 0.0, 1000.0, 0.0, 40.0),
            ],
        );
        world.trajectory = ObjectTrajectory::default();
        let context = TeamContext::build(&world).unwrap();
        for value in [
            context.danger,
            context.time_advantage,
            context.open_attack_window,
            context.commit_density,
        ] {
            assert!(value.is_finite());
        }
        assert!(context.opportunity.values().all(|v| v.is_finite()));
    }

    #[test]
    fn test_roles_are_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let team_size = rng.gen_range(1..=3);
            let mut vehicles = Vec::new();
            for i in 0..team_size {
                vehicles.push(vehicle(
                    i + 1,
                    TeamSide::Blue,
                    rng.gen_range(-4000.0..4000.0),
                    rng.gen_range(-5000.0..5000.0),
                    rng.gen_range(-1500.0..1500.0),
                    rng.gen_range(0.0..100.0),
                ));
            }
            for i in 0..rng.gen_range(0..=3) {
                vehicles.push(vehicle(
                    i + 21,
                    TeamSide::Orange,
                    rng.gen_range(-4000.0..4000.0),
                    rng.gen_range(-5000.0..5000.0),
                    rng.gen_range(-1500.0..1500.0),
                    rng.gen_range(0.0..100.0),
                ));
            }
            let object = ObjectState::new(
                Vector3::new(rng.gen_range(-3000.0..3000.0), rng.gen_range(-4000.0..4000.0), 93.0),
                Vector3::new(rng.gen_range(-1000.0..1000.0), rng.gen_range(-1000.0..1000.0), 0.0),
            );
            let world = world(object, vehicles);
            let context = TeamContext::build(&world).unwrap();

            let mut roles: Vec<usize> = context.roles.values().copied().collect();
            roles.sort_unstable();
            assert_eq!(roles, (0..team_size as usize).collect::<Vec<_>>());
            assert_eq!(context.role(context.attacker_id), Some(0));

            for value in [context.danger, context.open_attack_window, context.commit_density] {
                assert!((0.0..=1.0).contains(&value));
            }

            // rebuilding gives the same answer
            let again = TeamContext::build(&world).unwrap();
            assert_eq!(again.role_order, context.role_order);
            assert_eq!(again.danger, context.danger);
            assert_eq!(again.open_attack_window, context.open_attack_window);
        }
    }
}
