use crate::Vector3;

/// Fallback direction used whenever a direction between coincident points is
/// requested.
pub const FALLBACK_DIRECTION: Vector3 = Vector3::new(1.0, 0.0, 0.0);

/// Lateral offset of the two post-aimed lanes used by [`shot_alignment`].
pub const POST_LANE_OFFSET: f64 = 800.0;

/// Clamp a value into `[0, 1]`. NaN maps to `0`.
pub fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: Vector3, b: Vector3, t: f64) -> Vector3 {
    a * (1.0 - t) + b * t
}

/// Project a position onto the ground plane.
pub fn ground(position: &Vector3) -> Vector3 {
    Vector3::new(position.x, position.y, 0.0)
}

/// Distance between two positions, ignoring height.
pub fn ground_distance(a: &Vector3, b: &Vector3) -> f64 {
    (ground(a) - ground(b)).norm()
}

/// Unit direction from `source` to `target` on the ground plane.
///
/// Returns [`FALLBACK_DIRECTION`] when the points coincide.
pub fn ground_direction(source: &Vector3, target: &Vector3) -> Vector3 {
    let delta = ground(target) - ground(source);
    let norm = delta.norm();
    if norm < 1e-9 {
        FALLBACK_DIRECTION
    } else {
        delta / norm
    }
}

/// Unsigned angle between two vectors in radians, `0` if either is zero.
pub fn angle_between(a: &Vector3, b: &Vector3) -> f64 {
    let norms = a.norm() * b.norm();
    if norms < 1e-12 {
        return 0.0;
    }
    (a.dot(b) / norms).clamp(-1.0, 1.0).acos()
}

/// How well a vehicle at `position` is lined up to push an object at
/// `object_position` toward `goal_center`.
///
/// The best of three dot products: the direct lane to the goal center and two
/// lanes aimed [`POST_LANE_OFFSET`] to either side along the goal line, which
/// rewards positions that allow a curved shot. Result is in `[-1, 1]`.
pub fn shot_alignment(position: &Vector3, object_position: &Vector3, goal_center: &Vector3) -> f64 {
    let to_object = ground_direction(position, object_position);
    let offset = Vector3::new(POST_LANE_OFFSET, 0.0, 0.0);
    [*goal_center, goal_center + offset, goal_center - offset]
        .iter()
        .map(|aim| to_object.dot(&ground_direction(object_position, aim)))
        .fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp01() {
        assert_eq!(clamp01(-0.5), 0.0);
        assert_eq!(clamp01(0.25), 0.25);
        assert_eq!(clamp01(3.0), 1.0);
        assert_eq!(clamp01(f64::NAN), 0.0);
        assert_eq!(clamp01(f64::INFINITY), 1.0);
    }

    #[test]
    fn test_ground_distance_ignores_height() {
        let a = Vector3::new(0.0, 0.0, 500.0);
        let b = Vector3::new(3.0, 4.0, 17.0);
        assert_relative_eq!(ground_distance(&a, &b), 5.0);
    }

    #[test]
    fn test_ground_direction_coincident_points() {
        let p = Vector3::new(10.0, 20.0, 0.0);
        assert_eq!(ground_direction(&p, &Vector3::new(10.0, 20.0, 300.0)), FALLBACK_DIRECTION);
    }

    #[test]
    fn test_angle_between() {
        let x = Vector3::new(1.0, 0.0, 0.0);
        let y = Vector3::new(0.0, 2.0, 0.0);
        assert_relative_eq!(angle_between(&x, &y), std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(angle_between(&x, &-x), std::f64::consts::PI, epsilon = 1e-12);
        assert_eq!(angle_between(&x, &Vector3::zeros()), 0.0);
    }

    #[test]
    fn test_shot_alignment_straight_behind_object() {
        let goal = Vector3::new(0.0, 5120.0, 0.0);
        let object = Vector3::new(0.0, 0.0, 93.0);
        let behind = Vector3::new(0.0, -1000.0, 17.0);
        let in_front = Vector3::new(0.0, 1000.0, 17.0);
        assert_relative_eq!(shot_alignment(&behind, &object, &goal), 1.0, epsilon = 1e-12);
        assert!(shot_alignment(&in_front, &object, &goal) < -0.9);
    }

    #[test]
    fn test_shot_alignment_rewards_post_lanes() {
        let goal = Vector3::new(0.0, 5120.0, 0.0);
        let object = Vector3::new(0.0, 0.0, 93.0);
        // lined up with the left-post lane rather than the center
        let offset = ground_direction(&Vector3::new(-800.0, 5120.0, 0.0), &object);
        let position = object + offset * 1000.0;
        assert_relative_eq!(shot_alignment(&position, &object, &goal), 1.0, epsilon = 1e-9);
    }
}
