//! Longitudinal acceleration model of a vehicle driving in a straight line.
//!
//! Each curve is sampled once by integrating the throttle (and optionally boost)
//! acceleration from rest. The samples are monotone in speed, time and distance,
//! so any of them can be used as a lookup key.

use lazy_static::lazy_static;

/// Integration step of the curves, in seconds.
const CURVE_DT: f64 = 1.0 / 120.0;
/// Upper bound on the sampled duration, in seconds.
const CURVE_MAX_TIME: f64 = 8.0;

/// Throttle acceleration at rest, in u/s².
pub const THROTTLE_ACCEL_AT_REST: f64 = 1600.0;
/// Throttle acceleration at [`THROTTLE_KNEE_SPEED`], in u/s².
pub const THROTTLE_ACCEL_AT_KNEE: f64 = 160.0;
pub const THROTTLE_KNEE_SPEED: f64 = 1400.0;
/// Speed above which throttle no longer accelerates.
pub const THROTTLE_MAX_SPEED: f64 = 1410.0;
/// Extra acceleration while boosting, in u/s².
pub const BOOST_ACCEL: f64 = 991.667;
pub const MAX_SPEED: f64 = 2300.0;
/// Boost consumed per second of boosting.
pub const BOOST_PER_SECOND: f64 = 33.33;

lazy_static! {
    /// Full throttle while boosting.
    pub static ref BOOST: AccelerationCurve =
        AccelerationCurve::integrate(|speed| throttle_acceleration(speed) + BOOST_ACCEL, MAX_SPEED);
    /// Full throttle without boost.
    pub static ref THROTTLE: AccelerationCurve =
        AccelerationCurve::integrate(throttle_acceleration, THROTTLE_MAX_SPEED);
}

/// Throttle acceleration at the given forward speed.
pub fn throttle_acceleration(speed: f64) -> f64 {
    if speed < THROTTLE_KNEE_SPEED {
        let drop = THROTTLE_ACCEL_AT_REST - THROTTLE_ACCEL_AT_KNEE;
        THROTTLE_ACCEL_AT_REST - drop * speed.max(0.0) / THROTTLE_KNEE_SPEED
    } else if speed < THROTTLE_MAX_SPEED {
        THROTTLE_ACCEL_AT_KNEE * (THROTTLE_MAX_SPEED - speed)
            / (THROTTLE_MAX_SPEED - THROTTLE_KNEE_SPEED)
    } else {
        0.0
    }
}

/// Outcome of [`AccelerationCurve::simulate_until_limit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelerationResult {
    pub time_passed: f64,
    pub distance_traveled: f64,
    pub speed_reached: f64,
    /// Whether the simulation stopped because the distance limit was hit.
    pub distance_limit_reached: bool,
}

/// Sampled speed, time and distance of a vehicle accelerating from rest.
#[derive(Debug, Clone)]
pub struct AccelerationCurve {
    speeds: Vec<f64>,
    times: Vec<f64>,
    distances: Vec<f64>,
}

impl AccelerationCurve {
    /// Integrate `acceleration(speed)` from rest until `top_speed` is reached or the
    /// acceleration vanishes.
    pub fn integrate(acceleration: impl Fn(f64) -> f64, top_speed: f64) -> Self {
        let mut speeds = vec![0.0];
        let mut times = vec![0.0];
        let mut distances = vec![0.0];

        let (mut speed, mut time, mut distance) = (0.0, 0.0, 0.0);
        while time < CURVE_MAX_TIME {
            let next = (speed + acceleration(speed) * CURVE_DT).min(top_speed);
            if next - speed < 1e-6 {
                break;
            }
            distance += (speed + next) * 0.5 * CURVE_DT;
            time += CURVE_DT;
            speed = next;

            speeds.push(speed);
            times.push(time);
            distances.push(distance);
        }

        Self {
            speeds,
            times,
            distances,
        }
    }

    pub fn top_speed(&self) -> f64 {
        self.speeds.last().copied().unwrap_or(0.0)
    }

    pub fn duration(&self) -> f64 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Time on the curve at which `speed` is reached.
    pub fn time_at_speed(&self, speed: f64) -> f64 {
        interpolate(&self.speeds, &self.times, speed)
    }

    pub fn speed_at_time(&self, time: f64) -> f64 {
        interpolate(&self.times, &self.speeds, time)
    }

    pub fn distance_at_time(&self, time: f64) -> f64 {
        interpolate(&self.times, &self.distances, time)
    }

    pub fn time_at_distance(&self, distance: f64) -> f64 {
        interpolate(&self.distances, &self.times, distance)
    }

    /// Accelerate from `initial_speed` until the distance limit, the time limit or
    /// the end of the curve, whichever comes first.
    pub fn simulate_until_limit(
        &self,
        initial_speed: f64,
        distance_limit: Option<f64>,
        time_limit: Option<f64>,
    ) -> AccelerationResult {
        let start_time = self.time_at_speed(initial_speed);
        let start_distance = self.distance_at_time(start_time);

        let mut end_time = self.duration();
        if let Some(limit) = time_limit {
            end_time = end_time.min(start_time + limit.max(0.0));
        }

        let mut distance_limit_reached = false;
        if let Some(limit) = distance_limit {
            let target = start_distance + limit.max(0.0);
            if target <= self.distances.last().copied().unwrap_or(0.0) {
                let time = self.time_at_distance(target);
                if time <= end_time {
                    end_time = time;
                    distance_limit_reached = true;
                }
            }
        }

        if end_time <= start_time {
            return AccelerationResult {
                time_passed: 0.0,
                distance_traveled: 0.0,
                speed_reached: initial_speed,
                distance_limit_reached,
            };
        }

        AccelerationResult {
            time_passed: end_time - start_time,
            distance_traveled: self.distance_at_time(end_time) - start_distance,
            speed_reached: self.speed_at_time(end_time).max(initial_speed),
            distance_limit_reached,
        }
    }
}

/// Piecewise linear lookup of `x` in the ascending `keys`, clamped to the ends.
fn interpolate(keys: &[f64], values: &[f64], x: f64) -> f64 {
    let (Some(&first), Some(&last)) = (keys.first(), keys.last()) else {
        return 0.0;
    };
    if x.is_nan() || x <= first {
        return values[0];
    }
    if x >= last {
        return values[values.len() - 1];
    }
    let upper = keys.partition_point(|&k| k < x);
    let lower = upper - 1;
    let span = keys[upper] - keys[lower];
    if span <= 0.0 {
        return values[upper];
    }
    let t = (x - keys[lower]) / span;
    values[lower] + (values[upper] - values[lower]) * t
}
