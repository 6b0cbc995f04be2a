use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::clamp01;

/// Rank presets a bot can be tuned to.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SkillPreset {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    #[default]
    Champion,
    GrandChampion,
}

impl SkillPreset {
    pub const ALL: [SkillPreset; 7] = [
        SkillPreset::Bronze,
        SkillPreset::Silver,
        SkillPreset::Gold,
        SkillPreset::Platinum,
        SkillPreset::Diamond,
        SkillPreset::Champion,
        SkillPreset::GrandChampion,
    ];

    /// The tuned skill scalars of this preset.
    pub fn profile(&self) -> SkillProfile {
        let (overall, mechanics, decision_making, aggression, rotation, awareness, consistency) =
            match self {
                SkillPreset::Bronze => (0.20, 0.18, 0.22, 0.40, 0.55, 0.45, 0.30),
                SkillPreset::Silver => (0.32, 0.30, 0.35, 0.45, 0.58, 0.52, 0.38),
                SkillPreset::Gold => (0.45, 0.45, 0.48, 0.52, 0.62, 0.60, 0.48),
                SkillPreset::Platinum => (0.58, 0.58, 0.60, 0.58, 0.68, 0.68, 0.58),
                SkillPreset::Diamond => (0.70, 0.72, 0.72, 0.62, 0.74, 0.76, 0.70),
                SkillPreset::Champion => (0.82, 0.84, 0.84, 0.67, 0.80, 0.84, 0.82),
                SkillPreset::GrandChampion => (0.92, 0.94, 0.94, 0.70, 0.86, 0.90, 0.92),
            };
        SkillProfile {
            overall,
            mechanics,
            decision_making,
            aggression,
            rotation_discipline: rotation,
            teammate_awareness: awareness,
            consistency,
        }
    }
}

impl std::fmt::Display for SkillPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SkillPreset::Bronze => "bronze",
            SkillPreset::Silver => "silver",
            SkillPreset::Gold => "gold",
            SkillPreset::Platinum => "platinum",
            SkillPreset::Diamond => "diamond",
            SkillPreset::Champion => "champion",
            SkillPreset::GrandChampion => "grand_champion",
        };
        write!(f, "{}", name)
    }
}

/// Resolved skill scalars, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SkillProfile {
    pub overall: f64,
    pub mechanics: f64,
    pub decision_making: f64,
    pub aggression: f64,
    pub rotation_discipline: f64,
    pub teammate_awareness: f64,
    pub consistency: f64,
}

impl SkillProfile {
    /// Decision making scaled by overall skill.
    pub fn decision_quality(&self) -> f64 {
        self.decision_making * (0.7 + 0.3 * self.overall)
    }

    /// Mechanics scaled by overall skill.
    pub fn effective_mechanics(&self) -> f64 {
        self.mechanics * (0.7 + 0.3 * self.overall)
    }
}

/// Skill configuration: a preset plus optional per-field overrides.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkillSettings {
    pub preset: SkillPreset,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanics: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_making: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggression: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_discipline: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teammate_awareness: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consistency: Option<f64>,
}

impl SkillSettings {
    pub fn from_preset(preset: SkillPreset) -> Self {
        Self {
            preset,
            ..Default::default()
        }
    }

    /// Apply the overrides on top of the preset. Every scalar ends up in `[0, 1]`.
    pub fn resolve(&self) -> SkillProfile {
        let base = self.preset.profile();
        let pick = |value: Option<f64>, fallback: f64| clamp01(value.unwrap_or(fallback));
        SkillProfile {
            overall: pick(self.overall, base.overall),
            mechanics: pick(self.mechanics, base.mechanics),
            decision_making: pick(self.decision_making, base.decision_making),
            aggression: pick(self.aggression, base.aggression),
            rotation_discipline: pick(self.rotation_discipline, base.rotation_discipline),
            teammate_awareness: pick(self.teammate_awareness, base.teammate_awareness),
            consistency: pick(self.consistency, base.consistency),
        }
    }
}

/// Team play tuning.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TeamplaySettings {
    /// Whether to blend toward the observed aggression of human teammates.
    pub follow_human_style: bool,
    /// How strongly to follow human teammates, in `[0, 1]`.
    pub human_follow_strength: f64,
    /// Support standoff for the second vehicle of a team of two.
    pub support_distance_2v2: f64,
    /// Support standoff for the second vehicle of a team of three.
    pub support_distance_3v3_second: f64,
    /// Support standoff for the last vehicle of a team of three.
    pub support_distance_3v3_third: f64,
    /// Base time window (s) inside which two teammates would double commit.
    pub double_commit_window: f64,
    /// Whether the last vehicle holds back when the play is dangerous.
    pub conservative_last_man: bool,
    /// Appetite for boost detours, in `[0, 1]`.
    pub boost_detour_risk: f64,
}

impl Default for TeamplaySettings {
    fn default() -> Self {
        Self {
            follow_human_style: true,
            human_follow_strength: 0.7,
            support_distance_2v2: 4300.0,
            support_distance_3v3_second: 3900.0,
            support_distance_3v3_third: 6700.0,
            double_commit_window: 0.22,
            conservative_last_man: true,
            boost_detour_risk: 0.35,
        }
    }
}

/// Scalars that make the bot behave less like a machine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HumanStyleSettings {
    pub decisiveness: f64,
    /// Shifts the boost detour cutoff, in `[-1, 1]`.
    pub takeover_bias: f64,
    pub role_stability: f64,
    pub mistake_rate: f64,
    pub mechanical_variance: f64,
    pub defense_turn_hysteresis: f64,
    /// Minimum time (s) between two support anchor refreshes.
    pub support_repath_cooldown: f64,
}

impl Default for HumanStyleSettings {
    fn default() -> Self {
        Self {
            decisiveness: 0.7,
            takeover_bias: 0.0,
            role_stability: 0.6,
            mistake_rate: 0.1,
            mechanical_variance: 0.1,
            defense_turn_hysteresis: 0.2,
            support_repath_cooldown: 0.35,
        }
    }
}

/// All the static configuration consumed by the team logic.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BotSettings {
    pub skill: SkillSettings,
    pub teamplay: TeamplaySettings,
    pub human_style: HumanStyleSettings,
}

impl BotSettings {
    /// Load the settings from the given file, or write the defaults if it does not
    /// exist. The loaded values are sanitized.
    pub fn load_or_insert(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => {
                let settings: BotSettings = serde_json::from_str(&contents)
                    .with_context(|| format!("Failed to parse bot settings {}", path.display()))?;
                Ok(settings.sanitized())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let settings = Self::default();
                settings.store(path)?;
                log::debug!("Wrote default bot settings to {}", path.display());
                Ok(settings)
            }
            Err(err) => {
                Err(err).with_context(|| format!("Failed to read bot settings {}", path.display()))
            }
        }
    }

    /// Store the settings in the given file.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write bot settings {}", path.display()))
    }

    /// Clamp every scalar into its valid range.
    pub fn sanitized(mut self) -> Self {
        let skill = &mut self.skill;
        for value in [
            &mut skill.overall,
            &mut skill.mechanics,
            &mut skill.decision_making,
            &mut skill.aggression,
            &mut skill.rotation_discipline,
            &mut skill.teammate_awareness,
            &mut skill.consistency,
        ]
        .into_iter()
        .flatten()
        {
            *value = clamp01(*value);
        }

        let teamplay = &mut self.teamplay;
        teamplay.human_follow_strength = clamp01(teamplay.human_follow_strength);
        teamplay.boost_detour_risk = clamp01(teamplay.boost_detour_risk);
        teamplay.double_commit_window = clamp01(teamplay.double_commit_window);
        for distance in [
            &mut teamplay.support_distance_2v2,
            &mut teamplay.support_distance_3v3_second,
            &mut teamplay.support_distance_3v3_third,
        ] {
            *distance = non_negative(*distance);
        }

        let style = &mut self.human_style;
        style.takeover_bias = if style.takeover_bias.is_nan() {
            0.0
        } else {
            style.takeover_bias.clamp(-1.0, 1.0)
        };
        for value in [
            &mut style.decisiveness,
            &mut style.role_stability,
            &mut style.mistake_rate,
            &mut style.mechanical_variance,
        ] {
            *value = clamp01(*value);
        }
        style.defense_turn_hysteresis = non_negative(style.defense_turn_hysteresis);
        style.support_repath_cooldown = non_negative(style.support_repath_cooldown);

        self
    }

    /// The resolved skill profile.
    pub fn skill(&self) -> SkillProfile {
        self.skill.resolve()
    }
}

fn non_negative(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.max(0.0)
    }
}
