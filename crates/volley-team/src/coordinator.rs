use std::collections::HashMap;

use anyhow::{bail, Result};
use volley_core::{BoostPadRegistry, BotSettings, VehicleId, WorldSnapshot};

use crate::{
    decision::{decide, Decision, DecisionCtx},
    human::HumanAggressionTracker,
    memory::DecisionMemory,
    team_context::TeamContext,
};

/// A drop in game time larger than this is treated as a new match.
const RESTART_TIME_JUMP: f64 = 5.0;

/// Runs the decision of every bot-controlled vehicle of one team, once per tick.
///
/// Keeps the per-vehicle memories and the human aggression estimates. One
/// [`TeamContext`] is built per tick and shared by all vehicles deciding on it.
pub struct TeamCoordinator {
    settings: BotSettings,
    controlled: Vec<VehicleId>,
    memories: HashMap<VehicleId, DecisionMemory>,
    humans: HumanAggressionTracker,
    last_time: Option<f64>,
}

impl TeamCoordinator {
    pub fn new(settings: BotSettings, controlled: impl IntoIterator<Item = VehicleId>) -> Self {
        let controlled: Vec<VehicleId> = controlled.into_iter().collect();
        Self {
            settings: settings.sanitized(),
            memories: controlled
                .iter()
                .map(|id| (*id, DecisionMemory::new()))
                .collect(),
            controlled,
            humans: HumanAggressionTracker::new(),
            last_time: None,
        }
    }

    pub fn settings(&self) -> &BotSettings {
        &self.settings
    }

    pub fn humans(&self) -> &HumanAggressionTracker {
        &self.humans
    }

    pub fn memory(&self, id: VehicleId) -> Option<&DecisionMemory> {
        self.memories.get(&id)
    }

    /// Forget all memories and estimates, as at the start of a match.
    pub fn reset(&mut self) {
        self.memories.values_mut().for_each(DecisionMemory::reset);
        self.humans.reset();
        self.last_time = None;
    }

    /// Decide for one vehicle, which need not be in the controlled list. The
    /// team context is built from `world` on every call.
    pub fn decide(
        &mut self,
        vehicle_id: VehicleId,
        world: &WorldSnapshot,
        pads: &BoostPadRegistry,
    ) -> Result<Decision> {
        let context = TeamContext::build(world)?;
        self.decide_in(&context, vehicle_id, world, pads)
    }

    fn decide_in(
        &mut self,
        context: &TeamContext,
        vehicle_id: VehicleId,
        world: &WorldSnapshot,
        pads: &BoostPadRegistry,
    ) -> Result<Decision> {
        if context.role(vehicle_id).is_none() {
            bail!(
                "Vehicle {} is not an active member of team {}",
                vehicle_id,
                world.our_team
            );
        }
        decide(DecisionCtx {
            vehicle_id,
            world,
            context,
            settings: &self.settings,
            pads,
            humans: &self.humans,
            memory: self.memories.entry(vehicle_id).or_default(),
        })
    }

    /// Run one tick: update the human estimates and decide for every controlled
    /// vehicle that is active in `world`.
    pub fn tick(
        &mut self,
        world: &WorldSnapshot,
        pads: &BoostPadRegistry,
    ) -> Result<Vec<(VehicleId, Decision)>> {
        if let Some(last) = self.last_time {
            if world.time + RESTART_TIME_JUMP < last {
                log::info!("Game time went back from {:.2} to {:.2}, resetting", last, world.time);
                self.reset();
            }
        }
        self.last_time = Some(world.time);
        self.humans.update(world);

        let active = world.teammates();
        let deciding: Vec<VehicleId> = self
            .controlled
            .iter()
            .copied()
            .filter(|id| {
                let is_active = active.iter().any(|v| v.id == *id);
                if !is_active {
                    log::debug!("Vehicle {} is not active, skipping", id);
                }
                is_active
            })
            .collect();
        if deciding.is_empty() {
            return Ok(Vec::new());
        }

        let context = TeamContext::build(world)?;
        let mut decisions = Vec::with_capacity(deciding.len());
        for id in deciding {
            let decision = self.decide_in(&context, id, world, pads)?;
            log::trace!(
                "Vehicle {} role {}: {:?}",
                id,
                decision.role,
                decision.trace.reason
            );
            decisions.push((id, decision));
        }
        Ok(decisions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volley_core::{ObjectKind, ObjectState, ObjectTrajectory, TeamSide, Vector3, VehicleState};

    use crate::directive::DirectiveKind;

    fn world(time: f64, vehicles: Vec<VehicleState>) -> WorldSnapshot {
        let object = ObjectState::new(Vector3::new(0.0, 1500.0, 93.0), Vector3::zeros());
        WorldSnapshot {
            time,
            our_team: TeamSide::Blue,
            object,
            object_kind: ObjectKind::Ball,
            vehicles,
            trajectory: ObjectTrajectory::extrapolate(time, &object, 4.0, 1.0 / 60.0),
        }
    }

    fn car(id: u32, x: f64, y: f64) -> VehicleState {
        VehicleState::new(
            id,
            TeamSide::Blue,
            Vector3::new(x, y, 17.0),
            Vector3::new(0.0, 500.0, 0.0),
            60.0,
        )
    }

    #[test]
    fn test_tick_skips_inactive_vehicles() {
        let ids = [VehicleId::new(1), VehicleId::new(2)];
        let mut coordinator = TeamCoordinator::new(BotSettings::default(), ids);
        let world = world(1.0, vec![car(1, 0.0, 0.0), car(2, 0.0, -3000.0).demolished()]);

        let decisions = coordinator.tick(&world, &BoostPadRegistry::standard()).unwrap();
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].0, VehicleId::new(1));
        // alone on the field, always first man
        assert_eq!(decisions[0].1.role, 0);
        assert!(decisions[0].1.directive.is_commit());
    }

    #[test]
    fn test_tick_records_traces() {
        let ids = [VehicleId::new(1), VehicleId::new(2)];
        let mut coordinator = TeamCoordinator::new(BotSettings::default(), ids);
        let world = world(1.0, vec![car(1, 0.0, 0.0), car(2, -2500.0, -3500.0)]);

        let decisions = coordinator.tick(&world, &BoostPadRegistry::standard()).unwrap();
        assert_eq!(decisions.len(), 2);
        for (id, decision) in &decisions {
            let trace = coordinator.memory(*id).unwrap().last_trace().unwrap();
            assert_eq!(trace, &decision.trace);
        }
        let roles: Vec<usize> = decisions.iter().map(|(_, d)| d.role).collect();
        assert_eq!(roles, vec![0, 1]);
        assert_eq!(decisions[0].1.directive.kind(), DirectiveKind::AttackShot);
    }

    #[test]
    fn test_time_jump_resets_memory() {
        let ids = [VehicleId::new(1), VehicleId::new(2)];
        let mut coordinator = TeamCoordinator::new(BotSettings::default(), ids);
        let pads = BoostPadRegistry::standard();
        let vehicles = vec![car(1, 0.0, 0.0), car(2, -2500.0, -3500.0)];

        coordinator.tick(&world(100.0, vehicles.clone()), &pads).unwrap();
        let locked = coordinator.memory(VehicleId::new(2)).unwrap().locked_role_until();
        assert!(locked > 100.0);

        coordinator.tick(&world(2.0, vehicles), &pads).unwrap();
        let locked = coordinator.memory(VehicleId::new(2)).unwrap().locked_role_until();
        assert!(locked < 3.0);
    }

    #[test]
    fn test_decide_unknown_vehicle_fails() {
        let mut coordinator = TeamCoordinator::new(BotSettings::default(), [VehicleId::new(1)]);
        let world = world(0.5, vec![car(1, 0.0, 0.0)]);
        for _ in 0..3 {
            assert!(coordinator
                .decide(VehicleId::new(9), &world, &BoostPadRegistry::standard())
                .is_err());
        }
        assert!(coordinator.memory(VehicleId::new(9)).is_none());
    }

    #[test]
    fn test_same_time_snapshots_are_not_confused() {
        let ids = [VehicleId::new(1), VehicleId::new(2)];
        let mut coordinator = TeamCoordinator::new(BotSettings::default(), ids);
        let pads = BoostPadRegistry::standard();
        let respawned = world(3.0, vec![car(1, 0.0, 0.0), car(2, -2500.0, -3500.0)]);
        let demolished = world(
            3.0,
            vec![car(1, 0.0, 0.0), car(2, -2500.0, -3500.0).demolished()],
        );

        let decisions = coordinator.tick(&demolished, &pads).unwrap();
        assert_eq!(decisions.len(), 1);

        let decisions = coordinator.tick(&respawned, &pads).unwrap();
        assert_eq!(decisions.len(), 2);

        let context = TeamContext::build(&respawned).unwrap();
        let expected = decide(DecisionCtx {
            vehicle_id: VehicleId::new(2),
            world: &respawned,
            context: &context,
            settings: &BotSettings::default(),
            pads: &pads,
            humans: &HumanAggressionTracker::new(),
            memory: &mut DecisionMemory::new(),
        })
        .unwrap();
        assert_eq!(decisions[1], (VehicleId::new(2), expected));
        assert_eq!(decisions[1].1.role, 1);
    }
}
