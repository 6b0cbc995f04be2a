use std::collections::HashMap;

use volley_core::{clamp01, VehicleId, VehicleState, WorldSnapshot};

/// Aggression assumed for a human we know nothing about.
pub const NEUTRAL_AGGRESSION: f64 = 0.5;
/// Weight of the previous estimate in the exponential smoothing.
const SMOOTHING: f64 = 0.96;

/// Running estimate of how aggressively each human teammate plays.
///
/// Each tick scores a human's position and speed relative to the object, and the
/// estimate is smoothed toward that score.
#[derive(Debug, Clone, Default)]
pub struct HumanAggressionTracker {
    aggression: HashMap<VehicleId, f64>,
}

impl HumanAggressionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the estimates from a new snapshot. Humans that left our team or got
    /// demolished are dropped.
    pub fn update(&mut self, world: &WorldSnapshot) {
        let attack_sign = world.our_team.attack_sign();
        let humans: Vec<VehicleState> = world
            .teammates()
            .into_iter()
            .filter(|v| v.is_human)
            .collect();

        for human in &humans {
            let sample = aggression_sample(human, world, attack_sign);
            let previous = self
                .aggression
                .get(&human.id)
                .copied()
                .unwrap_or(NEUTRAL_AGGRESSION);
            self.aggression
                .insert(human.id, previous * SMOOTHING + sample * (1.0 - SMOOTHING));
        }

        self.aggression.retain(|id, _| {
            let active = humans.iter().any(|human| human.id == *id);
            if !active {
                log::debug!("Dropping aggression estimate of human {}", id);
            }
            active
        });
    }

    pub fn reset(&mut self) {
        self.aggression.clear();
    }

    pub fn aggression(&self, id: VehicleId) -> f64 {
        self.aggression
            .get(&id)
            .copied()
            .unwrap_or(NEUTRAL_AGGRESSION)
    }

    /// Mean aggression of the human teammates of `me`, neutral without any.
    pub fn team_aggression(&self, world: &WorldSnapshot, me: VehicleId) -> f64 {
        let humans = human_teammates(world, me);
        if humans.is_empty() {
            return NEUTRAL_AGGRESSION;
        }
        let total: f64 = humans.iter().map(|h| self.aggression(h.id)).sum();
        total / humans.len() as f64
    }

    /// The human teammate `me` should play around: the most aggressive one, with a
    /// bonus for being near the object.
    pub fn primary_human(&self, world: &WorldSnapshot, me: VehicleId) -> Option<VehicleState> {
        let score = |human: &VehicleState| {
            let distance = (human.position - world.object.position).norm();
            self.aggression(human.id) + clamp01((3200.0 - distance) / 3200.0) * 0.35
        };
        human_teammates(world, me)
            .into_iter()
            .max_by(|a, b| score(a).total_cmp(&score(b)))
    }
}

fn human_teammates(world: &WorldSnapshot, me: VehicleId) -> Vec<VehicleState> {
    world
        .teammates()
        .into_iter()
        .filter(|v| v.is_human && v.id != me)
        .collect()
}

fn aggression_sample(human: &VehicleState, world: &WorldSnapshot, attack_sign: f64) -> f64 {
    let object = &world.object;
    let ahead = clamp01((attack_sign * (human.position.y - object.position.y) + 900.0) / 2800.0);
    let close = clamp01((3400.0 - (human.position - object.position).norm()) / 3400.0);
    let forward_speed = clamp01((attack_sign * human.velocity.y + 300.0) / 2000.0);
    ahead * 0.45 + close * 0.35 + forward_speed * 0.20
}
