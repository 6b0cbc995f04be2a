use serde::{Deserialize, Serialize};

use crate::{ground, Goal, TeamSide, Vector3, VehicleId, FALLBACK_DIRECTION};

/// State of one vehicle in a single tick.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct VehicleState {
    pub id: VehicleId,
    pub team: TeamSide,
    pub position: Vector3,
    pub velocity: Vector3,
    /// Unit forward axis on the ground plane.
    pub forward: Vector3,
    /// Boost amount in `[0, 100]`.
    pub boost: f64,
    pub on_ground: bool,
    pub demolished: bool,
    pub is_human: bool,
}

impl VehicleState {
    /// Create a grounded bot vehicle. The forward axis follows the velocity, or +x
    /// when the vehicle is standing still.
    pub fn new(
        id: impl Into<VehicleId>,
        team: TeamSide,
        position: Vector3,
        velocity: Vector3,
        boost: f64,
    ) -> Self {
        let heading = ground(&velocity);
        let forward = if heading.norm() > 1e-6 {
            heading.normalize()
        } else {
            FALLBACK_DIRECTION
        };
        Self {
            id: id.into(),
            team,
            position,
            velocity,
            forward,
            boost: boost.clamp(0.0, 100.0),
            on_ground: true,
            demolished: false,
            is_human: false,
        }
    }

    /// Override the forward axis. It is projected onto the ground and normalized.
    pub fn with_forward(mut self, forward: Vector3) -> Self {
        let heading = ground(&forward);
        self.forward = if heading.norm() > 1e-6 {
            heading.normalize()
        } else {
            FALLBACK_DIRECTION
        };
        self
    }

    pub fn human(mut self) -> Self {
        self.is_human = true;
        self
    }

    pub fn airborne(mut self) -> Self {
        self.on_ground = false;
        self
    }

    pub fn demolished(mut self) -> Self {
        self.demolished = true;
        self
    }

    pub fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

/// Position and velocity of the object being played.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ObjectState {
    pub position: Vector3,
    pub velocity: Vector3,
}

impl ObjectState {
    pub fn new(position: Vector3, velocity: Vector3) -> Self {
        Self { position, velocity }
    }
}

/// What is being played with.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    #[default]
    Ball,
    Puck,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Ball => write!(f, "ball"),
            ObjectKind::Puck => write!(f, "puck"),
        }
    }
}

/// A predicted state of the object at an absolute game time.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct ObjectSample {
    pub time: f64,
    pub position: Vector3,
    pub velocity: Vector3,
}

/// Predicted future of the object, ordered by non-decreasing time.
///
/// Serialized as a plain list of samples. Deserializing goes through [`ObjectTrajectory::new`].
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(from = "Vec<ObjectSample>", into = "Vec<ObjectSample>")]
pub struct ObjectTrajectory {
    samples: Vec<ObjectSample>,
}

impl ObjectTrajectory {
    /// Linear drag coefficient of a rolling object, per second.
    pub const ROLLING_DRAG: f64 = 0.0305;

    /// Wrap a set of predicted samples. Out-of-order samples are sorted.
    pub fn new(mut samples: Vec<ObjectSample>) -> Self {
        if samples.windows(2).any(|w| w[1].time < w[0].time) {
            log::debug!("Reordering {} trajectory samples by time", samples.len());
            samples.sort_by(|a, b| a.time.total_cmp(&b.time));
        }
        Self { samples }
    }

    /// Roll the object forward in a straight line with linear drag, sampled every
    /// `dt` seconds over `horizon` seconds after `time`.
    pub fn extrapolate(time: f64, object: &ObjectState, horizon: f64, dt: f64) -> Self {
        if dt <= 0.0 || horizon <= 0.0 {
            return Self::default();
        }
        let steps = (horizon / dt).round() as usize;
        let mut position = object.position;
        let mut velocity = object.velocity;
        let mut samples = Vec::with_capacity(steps);
        for step in 1..=steps {
            velocity -= velocity * (Self::ROLLING_DRAG * dt).min(1.0);
            position += velocity * dt;
            samples.push(ObjectSample {
                time: time + step as f64 * dt,
                position,
                velocity,
            });
        }
        Self { samples }
    }

    pub fn samples(&self) -> &[ObjectSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last(&self) -> Option<&ObjectSample> {
        self.samples.last()
    }
}

impl From<Vec<ObjectSample>> for ObjectTrajectory {
    fn from(samples: Vec<ObjectSample>) -> Self {
        Self::new(samples)
    }
}

impl From<ObjectTrajectory> for Vec<ObjectSample> {
    fn from(trajectory: ObjectTrajectory) -> Self {
        trajectory.samples
    }
}

/// Everything the team logic sees in one tick.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WorldSnapshot {
    /// Game time in seconds.
    pub time: f64,
    pub our_team: TeamSide,
    pub object: ObjectState,
    pub object_kind: ObjectKind,
    /// Vehicles of both teams.
    pub vehicles: Vec<VehicleState>,
    pub trajectory: ObjectTrajectory,
}

impl WorldSnapshot {
    /// Active (non-demolished) vehicles of our team, in roster order.
    pub fn teammates(&self) -> Vec<VehicleState> {
        self.vehicles
            .iter()
            .filter(|v| v.team == self.our_team && !v.demolished)
            .copied()
            .collect()
    }

    /// Active (non-demolished) opponents, in roster order.
    pub fn opponents(&self) -> Vec<VehicleState> {
        self.vehicles
            .iter()
            .filter(|v| v.team != self.our_team && !v.demolished)
            .copied()
            .collect()
    }

    pub fn vehicle(&self, id: VehicleId) -> Option<&VehicleState> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    pub fn own_goal(&self) -> Goal {
        Goal::defended_by(self.our_team)
    }

    pub fn opponent_goal(&self) -> Goal {
        Goal::defended_by(self.our_team.opposite())
    }
}
