use serde::{Deserialize, Serialize};

/// # Field sides
///
/// The arena is symmetric about the x axis. Blue defends the goal at negative y
/// and attacks toward positive y; orange is the mirror image. All positions are
/// kept in arena coordinates, the helpers below give the per-team direction.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Blue,
    Orange,
}

impl TeamSide {
    /// Build a side from the engine's team index (0 = blue, anything else = orange).
    pub fn from_index(index: u8) -> Self {
        if index == 0 {
            TeamSide::Blue
        } else {
            TeamSide::Orange
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            TeamSide::Blue => 0,
            TeamSide::Orange => 1,
        }
    }

    /// Returns the opposite side.
    pub fn opposite(&self) -> Self {
        match self {
            TeamSide::Blue => TeamSide::Orange,
            TeamSide::Orange => TeamSide::Blue,
        }
    }

    /// Sign of the y axis this team attacks toward.
    pub fn attack_sign(&self) -> f64 {
        match self {
            TeamSide::Blue => 1.0,
            TeamSide::Orange => -1.0,
        }
    }
}

impl std::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSide::Blue => write!(f, "Blue"),
            TeamSide::Orange => write!(f, "Orange"),
        }
    }
}
