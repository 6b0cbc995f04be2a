use volley_core::{ground, ObjectSample, Vector3, VehicleState, WorldSnapshot};

use crate::arrival::{estimate_time, DriveDirection};

/// Trajectory samples are inspected every `SAMPLE_STRIDE` entries.
pub const SAMPLE_STRIDE: usize = 3;

/// Time used in place of an infinite intercept time whenever two times are
/// compared or subtracted.
pub const FAR_FUTURE: f64 = 1.0e6;

/// Optional constraints on the sample an intercept may target.
#[derive(Default)]
pub struct InterceptQuery<'a> {
    /// Extra condition the target sample must satisfy.
    pub predicate: Option<&'a dyn Fn(&VehicleState, &ObjectSample) -> bool>,
    /// Accept samples regardless of whether the vehicle can get there in time.
    pub ignore_time_estimate: bool,
    /// Estimate arrival driving backwards.
    pub backwards: bool,
}

/// Earliest point of the predicted trajectory a vehicle can reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intercept {
    pub vehicle: VehicleState,
    pub target: ObjectSample,
    /// Absolute game time of the target sample, infinite if there is none.
    pub time: f64,
    pub ground_position: Vector3,
    /// Whether the target was actually reachable in time.
    pub viable: bool,
}

impl Intercept {
    /// The earliest sample `vehicle` can reach before the object gets there.
    pub fn new(vehicle: &VehicleState, world: &WorldSnapshot) -> Self {
        Self::with_query(vehicle, world, &InterceptQuery::default())
    }

    pub fn with_query(
        vehicle: &VehicleState,
        world: &WorldSnapshot,
        query: &InterceptQuery,
    ) -> Self {
        let samples = world.trajectory.samples();
        let direction = if query.backwards {
            DriveDirection::Backward
        } else {
            DriveDirection::Forward
        };

        let found = samples.iter().step_by(SAMPLE_STRIDE).find(|sample| {
            let in_time = query.ignore_time_estimate
                || estimate_time(vehicle, &sample.position, direction) < sample.time - world.time;
            in_time && query.predicate.map_or(true, |predicate| predicate(vehicle, sample))
        });

        let (target, viable) = match (found, samples.last()) {
            (Some(sample), _) => (*sample, true),
            (None, Some(last)) => (*last, false),
            (None, None) => (
                ObjectSample {
                    time: f64::INFINITY,
                    position: world.object.position,
                    velocity: world.object.velocity,
                },
                false,
            ),
        };

        Self {
            vehicle: *vehicle,
            target,
            time: target.time,
            ground_position: ground(&target.position),
            viable,
        }
    }

    /// Intercept time with infinity replaced by [`FAR_FUTURE`].
    pub fn effective_time(&self) -> f64 {
        effective_time(self.time)
    }
}

/// Replace non-finite times by [`FAR_FUTURE`].
pub fn effective_time(time: f64) -> f64 {
    if time.is_finite() {
        time
    } else {
        FAR_FUTURE
    }
}
