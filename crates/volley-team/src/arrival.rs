use volley_core::{angle_between, ground_direction, ground_distance, Vector3, VehicleState};

use crate::accel::{BOOST, BOOST_PER_SECOND, MAX_SPEED, THROTTLE, THROTTLE_MAX_SPEED};

/// Distance from the target at which the vehicle is considered to have arrived.
pub const REACH_ALLOWANCE: f64 = 200.0;
/// Turning costs below this many seconds are ignored.
const MIN_TURNING_COST: f64 = 0.5;
/// Padding applied to the kinematic time.
const TIME_PADDING: f64 = 1.05;
/// Speed assumed for a vehicle that is not moving toward the target.
const STANDING_START_SPEED: f64 = 600.0;

/// Which way the vehicle drives to reach a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriveDirection {
    #[default]
    Forward,
    Backward,
}

impl DriveDirection {
    pub fn sign(&self) -> f64 {
        match self {
            DriveDirection::Forward => 1.0,
            DriveDirection::Backward => -1.0,
        }
    }
}

/// Turning radius of a vehicle driving at `speed`.
pub fn turning_radius(speed: f64) -> f64 {
    let v = speed.clamp(0.0, MAX_SPEED);
    156.0 + 0.1 * v + 0.000069 * v.powi(2) + 0.000000164 * v.powi(3) - 5.62e-11 * v.powi(4)
}

/// Estimated time (s) for `vehicle` to reach `target`.
///
/// The estimate adds a turning cost, based on the angle between the (possibly
/// reversed) forward axis and the target, to the time needed to cover the ground
/// distance while accelerating with boost and then throttle. The result is always
/// finite and non-negative.
pub fn estimate_time(vehicle: &VehicleState, target: &Vector3, direction: DriveDirection) -> f64 {
    let sign = direction.sign();

    let radius = turning_radius(vehicle.speed() + 500.0);
    let to_target = ground_direction(&vehicle.position, target);
    let mut turning = angle_between(&(vehicle.forward * sign), &to_target) * radius / 1800.0;
    if turning < MIN_TURNING_COST {
        turning = 0.0;
    }

    let mut distance = ground_distance(&vehicle.position, target) - REACH_ALLOWANCE;
    if distance <= 0.0 {
        return turning;
    }

    let mut speed = vehicle.velocity.dot(&vehicle.forward) * sign;
    if speed <= 1.0 {
        speed = vehicle.speed().max(STANDING_START_SPEED);
    }

    let mut time = 0.0;
    let mut last = None;

    if vehicle.boost > 0.0 && direction == DriveDirection::Forward {
        let boost_time = vehicle.boost / BOOST_PER_SECOND;
        let result = BOOST.simulate_until_limit(speed, Some(distance), Some(boost_time));
        distance -= result.distance_traveled;
        time += result.time_passed;
        speed = result.speed_reached;
        last = Some(result);
    }

    if distance > 0.0 && speed < THROTTLE_MAX_SPEED {
        let result = THROTTLE.simulate_until_limit(speed, Some(distance), None);
        distance -= result.distance_traveled;
        time += result.time_passed;
        speed = result.speed_reached;
        last = Some(result);
    }

    if !last.is_some_and(|result| result.distance_limit_reached) {
        time += distance.max(0.0) / speed.max(1.0);
    }

    time * TIME_PADDING + turning
}
