//! Scalars derived from the static settings that shape every decision.

use volley_core::{clamp01, BotSettings, HumanStyleSettings, SkillProfile};

/// Aggression of the bot, blended toward its human teammates when following
/// their style. `human_aggression` is neutral for a team without humans.
pub fn adaptive_aggression(
    settings: &BotSettings,
    skill: &SkillProfile,
    human_aggression: f64,
) -> f64 {
    let base = skill.aggression * 0.60 + skill.decision_making * 0.20 + skill.overall * 0.20;
    if !settings.teamplay.follow_human_style {
        return clamp01(base);
    }
    let follow = settings.teamplay.human_follow_strength * 0.4;
    clamp01(base * (1.0 - follow) + human_aggression * follow)
}

/// Opportunity a supporting vehicle needs to take over the attack.
pub fn takeover_threshold(style: &HumanStyleSettings) -> f64 {
    0.56 + (1.0 - style.decisiveness) * 0.08 + style.mistake_rate * 0.06
}

/// Shot alignment above which a taken-over touch becomes a shot.
pub fn alignment_threshold(aggression: f64, style: &HumanStyleSettings) -> f64 {
    -0.30 + aggression * 0.34 - style.mistake_rate * 0.05
}

/// Intercept time margin (s) inside which two teammates would double commit.
pub fn commit_window(settings: &BotSettings, skill: &SkillProfile) -> f64 {
    let style = &settings.human_style;
    let window = settings.teamplay.double_commit_window
        + (1.0 - skill.decision_quality()) * 0.16
        + (1.0 - skill.teammate_awareness) * 0.10
        + (1.0 - style.role_stability) * 0.08
        + style.mechanical_variance * 0.04
        + (1.0 - style.decisiveness) * 0.06;
    window.clamp(0.08, 0.65)
}

/// How long a freshly assigned role is held.
pub fn role_lock_duration(style: &HumanStyleSettings) -> f64 {
    0.15 + style.role_stability * 0.50
}

/// Boost amount under which the bot looks for a pad.
pub fn low_boost_threshold(skill: &SkillProfile, style: &HumanStyleSettings) -> f64 {
    let threshold = 12.0
        + (1.0 - skill.overall) * 14.0
        + style.mistake_rate * 6.0
        + (1.0 - style.decisiveness) * 4.0;
    threshold.round().clamp(8.0, 34.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use volley_core::SkillPreset;

    use crate::human::NEUTRAL_AGGRESSION;

    #[test]
    fn test_default_thresholds() {
        let settings = BotSettings::default();
        let style = &settings.human_style;
        assert_relative_eq!(takeover_threshold(style), 0.56 + 0.3 * 0.08 + 0.1 * 0.06);
        assert_relative_eq!(role_lock_duration(style), 0.45);
        // 12 + 0.18 * 14 + 0.6 + 1.2 = 16.32
        assert_eq!(low_boost_threshold(&settings.skill(), style), 16.0);
    }

    #[test]
    fn test_low_boost_threshold_bounds() {
        let mut style = HumanStyleSettings::default();
        style.mistake_rate = 1.0;
        style.decisiveness = 0.0;
        let bronze = SkillPreset::Bronze.profile();
        // 12 + 11.2 + 6 + 4
        assert_eq!(low_boost_threshold(&bronze, &style), 33.0);

        let mut perfect = SkillPreset::GrandChampion.profile();
        perfect.overall = 1.0;
        style.mistake_rate = 0.0;
        style.decisiveness = 1.0;
        assert_eq!(low_boost_threshold(&perfect, &style), 12.0);
    }

    #[test]
    fn test_commit_window_is_clamped() {
        let mut settings = BotSettings::default();
        settings.teamplay.double_commit_window = 5.0;
        assert_eq!(commit_window(&settings, &settings.skill()), 0.65);
        settings.teamplay.double_commit_window = 0.0;
        settings.human_style.role_stability = 1.0;
        settings.human_style.decisiveness = 1.0;
        settings.human_style.mechanical_variance = 0.0;
        let mut skill = settings.skill();
        skill.decision_making = 1.0;
        skill.overall = 1.0;
        skill.teammate_awareness = 1.0;
        assert_eq!(commit_window(&settings, &skill), 0.08);
    }

    #[test]
    fn test_adaptive_aggression_follows_humans() {
        let mut settings = BotSettings::default();
        let skill = settings.skill();
        let base = 0.67 * 0.60 + 0.84 * 0.20 + 0.82 * 0.20;
        let follow = 0.7 * 0.4;
        assert_relative_eq!(
            adaptive_aggression(&settings, &skill, 1.0),
            base * (1.0 - follow) + follow
        );

        // all-bot team still blends toward neutral
        let neutral = adaptive_aggression(&settings, &skill, NEUTRAL_AGGRESSION);
        assert_relative_eq!(neutral, base * (1.0 - follow) + 0.5 * follow);
        assert_relative_eq!(neutral, 0.6685, epsilon = 1e-4);

        settings.teamplay.follow_human_style = false;
        assert_relative_eq!(adaptive_aggression(&settings, &skill, 1.0), base);
    }
}
