use serde::{Deserialize, Serialize};
use volley_core::{BoostPad, Vector3};

/// The behaviour chosen for one vehicle for this tick, handed to the locomotion
/// layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Directive {
    /// Get back on the ground.
    Recover,
    /// Go for the kickoff.
    KickoffCommit,
    /// Stay back while a teammate takes the kickoff.
    KickoffSupportHold,
    /// Pick up a boost pad.
    BoostDetour { pad: BoostPad },
    /// Hit the object away from our goal.
    DefensiveClear {
        target: Vector3,
        intercept_time: f64,
        /// Whether an aerial clear may be attempted.
        aerial_allowed: bool,
    },
    /// Shoot at the opponent goal.
    AttackShot {
        target: Vector3,
        shot_target: Vector3,
        intercept_time: f64,
        allow_dribble: bool,
    },
    /// Take the touch but only clear it, the shooting lane is poor.
    AttackClearFallback {
        target: Vector3,
        intercept_time: f64,
    },
    /// Hold a support position facing the play.
    SupportHold {
        /// Point the vehicle watches.
        anchor: Vector3,
        /// Where the vehicle should wait.
        hold_position: Vector3,
        /// Distance kept from the anchor.
        standoff: f64,
        /// Hold the near post instead of the anchor line.
        force_nearest: bool,
        /// Whether the anchor was reused from an earlier tick.
        anchor_reused: bool,
    },
}

/// Payload-free tag of a [`Directive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    Recover,
    KickoffCommit,
    KickoffSupportHold,
    BoostDetour,
    DefensiveClear,
    AttackShot,
    AttackClearFallback,
    SupportHold,
}

impl Directive {
    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::Recover => DirectiveKind::Recover,
            Directive::KickoffCommit => DirectiveKind::KickoffCommit,
            Directive::KickoffSupportHold => DirectiveKind::KickoffSupportHold,
            Directive::BoostDetour { .. } => DirectiveKind::BoostDetour,
            Directive::DefensiveClear { .. } => DirectiveKind::DefensiveClear,
            Directive::AttackShot { .. } => DirectiveKind::AttackShot,
            Directive::AttackClearFallback { .. } => DirectiveKind::AttackClearFallback,
            Directive::SupportHold { .. } => DirectiveKind::SupportHold,
        }
    }

    /// Whether the vehicle goes for the object.
    pub fn is_commit(&self) -> bool {
        matches!(
            self,
            Directive::KickoffCommit
                | Directive::AttackShot { .. }
                | Directive::AttackClearFallback { .. }
        )
    }
}

impl std::fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DirectiveKind::Recover => "Recover",
            DirectiveKind::KickoffCommit => "KickoffCommit",
            DirectiveKind::KickoffSupportHold => "KickoffSupportHold",
            DirectiveKind::BoostDetour => "BoostDetour",
            DirectiveKind::DefensiveClear => "DefensiveClear",
            DirectiveKind::AttackShot => "AttackShot",
            DirectiveKind::AttackClearFallback => "AttackClearFallback",
            DirectiveKind::SupportHold => "SupportHold",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_commit() {
        let shot = Directive::AttackShot {
            target: Vector3::zeros(),
            shot_target: Vector3::new(0.0, 5120.0, 0.0),
            intercept_time: 1.0,
            allow_dribble: false,
        };
        assert_eq!(shot.kind(), DirectiveKind::AttackShot);
        assert!(shot.is_commit());
        assert!(!Directive::Recover.is_commit());
        assert_eq!(DirectiveKind::SupportHold.to_string(), "SupportHold");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(Directive::KickoffCommit).unwrap();
        assert_eq!(json["type"], "kickoff_commit");

        let clear = Directive::AttackClearFallback {
            target: Vector3::new(1.0, 2.0, 0.0),
            intercept_time: 3.5,
        };
        let json = serde_json::to_value(&clear).unwrap();
        assert_eq!(json["type"], "attack_clear_fallback");
        assert_eq!(json["data"]["intercept_time"], 3.5);
    }
}
