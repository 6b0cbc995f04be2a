use serde::{Deserialize, Serialize};

use crate::{TeamSide, Vector3};

/// Half extent of the arena along x (side wall), in unreal units.
pub const ARENA_HALF_WIDTH: f64 = 4096.0;
/// Half extent of the arena along y (back wall / goal line), in unreal units.
pub const ARENA_HALF_LENGTH: f64 = 5120.0;

/// A goal mouth.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Goal {
    /// Team defending this goal
    pub team: TeamSide,
    /// Center of the goal mouth on the ground
    pub center: Vector3,
}

impl Goal {
    /// Distance between the posts.
    pub const WIDTH: f64 = 1784.0;
    /// Crossbar height.
    pub const HEIGHT: f64 = 640.0;
    /// Distance of the goal line from the center of the field.
    pub const DISTANCE: f64 = ARENA_HALF_LENGTH;

    /// The goal defended by `team`.
    pub fn defended_by(team: TeamSide) -> Self {
        let sign = team.attack_sign();
        Self {
            team,
            center: Vector3::new(0.0, -sign * Self::DISTANCE, 0.0),
        }
    }
}

/// Clamp a ground position so that it stays `margin` away from the walls.
pub fn clamp_to_arena(position: Vector3, margin: f64) -> Vector3 {
    let half_width = (ARENA_HALF_WIDTH - margin).max(0.0);
    let half_length = (ARENA_HALF_LENGTH - margin).max(0.0);
    Vector3::new(
        position.x.clamp(-half_width, half_width),
        position.y.clamp(-half_length, half_length),
        position.z,
    )
}
