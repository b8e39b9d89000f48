//! Animation timing - baked clip durations, impact ratios and the
//! defender start delay that lines both impacts up

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::moves::Strength;
use super::resolver::AttackResult;

/// Character rigs with their own baked animation timings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fighter {
    Samuel,
    Clara,
}

impl Fighter {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Samuel => "Samuel",
            Self::Clara => "Clara",
        }
    }
}

impl fmt::Display for Fighter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Fighter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "samuel" => Ok(Self::Samuel),
            "clara" => Ok(Self::Clara),
            other => Err(format!("unknown fighter `{}`", other)),
        }
    }
}

/// Every clip the combat engine can ask the renderer to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationType {
    // Punches
    PunchHeadRightLight,
    PunchHeadRightMedium,
    PunchHeadRightHard,
    PunchHeadLeftLight,
    PunchHeadLeftMedium,
    PunchHeadLeftHard,

    // Kicks
    KickHeadRightLight,
    KickHeadRightMedium,
    KickHeadRightHard,
    KickHeadLeftLight,
    KickHeadLeftMedium,
    KickHeadLeftHard,

    // Reactions
    DodgeHeadRight,
    DodgeHeadLeft,
    HitHeadRightLight,
    HitHeadRightMedium,
    HitHeadRightHard,
    HitHeadLeftLight,
    HitHeadLeftMedium,
    HitHeadLeftHard,
    HitHeadStraightLight,
    HitHeadStraightMedium,
    HitHeadStraightHard,
    KillHeadRightLight,
    KillHeadRightMedium,
    KillHeadRightHard,
    KillHeadLeftLight,
    KillHeadLeftMedium,
    KillHeadLeftHard,

    // Neutral
    Stop,
    IdleFight,
    IdleStand,
}

use AnimationType::*;

impl AnimationType {
    /// Punch or kick
    pub fn is_attack(&self) -> bool {
        matches!(
            self,
            PunchHeadRightLight
                | PunchHeadRightMedium
                | PunchHeadRightHard
                | PunchHeadLeftLight
                | PunchHeadLeftMedium
                | PunchHeadLeftHard
                | KickHeadRightLight
                | KickHeadRightMedium
                | KickHeadRightHard
                | KickHeadLeftLight
                | KickHeadLeftMedium
                | KickHeadLeftHard
        )
    }

    /// Dodge, hit or kill reaction
    pub fn is_reaction(&self) -> bool {
        !self.is_attack() && !matches!(self, Stop | IdleFight | IdleStand)
    }

    pub fn is_kill(&self) -> bool {
        matches!(
            self,
            KillHeadRightLight
                | KillHeadRightMedium
                | KillHeadRightHard
                | KillHeadLeftLight
                | KillHeadLeftMedium
                | KillHeadLeftHard
        )
    }

    /// Side the clip attacks toward, or dodges/recoils from
    pub fn is_right(&self) -> bool {
        matches!(
            self,
            PunchHeadRightLight
                | PunchHeadRightMedium
                | PunchHeadRightHard
                | KickHeadRightLight
                | KickHeadRightMedium
                | KickHeadRightHard
                | DodgeHeadRight
                | HitHeadRightLight
                | HitHeadRightMedium
                | HitHeadRightHard
                | KillHeadRightLight
                | KillHeadRightMedium
                | KillHeadRightHard
        )
    }

    pub fn strength(&self) -> Option<Strength> {
        match self {
            PunchHeadRightLight | PunchHeadLeftLight | KickHeadRightLight | KickHeadLeftLight
            | HitHeadRightLight | HitHeadLeftLight | HitHeadStraightLight
            | KillHeadRightLight | KillHeadLeftLight => Some(Strength::Light),
            PunchHeadRightMedium | PunchHeadLeftMedium | KickHeadRightMedium
            | KickHeadLeftMedium | HitHeadRightMedium | HitHeadLeftMedium
            | HitHeadStraightMedium | KillHeadRightMedium | KillHeadLeftMedium => {
                Some(Strength::Medium)
            }
            PunchHeadRightHard | PunchHeadLeftHard | KickHeadRightHard | KickHeadLeftHard
            | HitHeadRightHard | HitHeadLeftHard | HitHeadStraightHard | KillHeadRightHard
            | KillHeadLeftHard => Some(Strength::Hard),
            DodgeHeadRight | DodgeHeadLeft | Stop | IdleFight | IdleStand => None,
        }
    }

    /// True when this fighter's rig throws the attack straight at the head
    /// rather than hooking in from the side
    pub fn is_straight_attack(&self, fighter: Fighter) -> bool {
        if !self.is_attack() {
            return false;
        }
        match self.strength() {
            Some(Strength::Light) => fighter == Fighter::Samuel,
            Some(Strength::Medium) | Some(Strength::Hard) => fighter == Fighter::Clara,
            None => false,
        }
    }

    /// Total baked clip length in seconds
    pub fn duration(&self, fighter: Fighter) -> f64 {
        let (samuel, clara) = match self {
            IdleStand => (4.46667, 38.833332),
            Stop => (0.0, 0.0),
            IdleFight => (2.2, 2.966667),
            PunchHeadLeftLight | PunchHeadRightLight | KickHeadLeftLight | KickHeadRightLight => {
                (1.13333, 1.53333)
            }
            PunchHeadLeftMedium | PunchHeadRightMedium | KickHeadLeftMedium
            | KickHeadRightMedium => (1.2, 1.133333),
            PunchHeadLeftHard | PunchHeadRightHard | KickHeadLeftHard | KickHeadRightHard => {
                (1.96667, 1.66667)
            }
            DodgeHeadRight | DodgeHeadLeft => (1.433333, 1.433333),
            HitHeadRightLight => (0.833333, 0.933333),
            HitHeadRightMedium | HitHeadRightHard => (1.0, 1.166667),
            HitHeadLeftLight => (0.766667, 1.066667),
            HitHeadLeftMedium => (1.066667, 1.233333),
            HitHeadLeftHard => (1.633333, 1.666667),
            HitHeadStraightLight => (0.8, 1.066667),
            HitHeadStraightMedium => (0.933333, 1.233333),
            HitHeadStraightHard => (1.3, 1.433333),
            KillHeadRightLight | KillHeadLeftLight => (2.333333, 2.6),
            KillHeadRightMedium | KillHeadLeftMedium => (2.533333, 2.2),
            KillHeadRightHard | KillHeadLeftHard => (2.233333, 3.033333),
        };
        pick(fighter, samuel, clara)
    }

    /// Fraction of the clip at which the impact is depicted
    pub fn hit_ratio(&self, fighter: Fighter) -> f64 {
        let (samuel, clara) = match self {
            IdleStand | IdleFight | Stop => (0.0, 0.0),
            DodgeHeadRight | DodgeHeadLeft => (10.0 / 43.0, 10.0 / 43.0),
            HitHeadRightLight => (2.0 / 25.0, 1.0 / 28.0),
            HitHeadRightMedium => (2.0 / 30.0, 2.0 / 35.0),
            HitHeadRightHard => (2.0 / 47.0, 2.0 / 46.0),
            HitHeadLeftLight => (2.0 / 23.0, 2.0 / 32.0),
            HitHeadLeftMedium => (2.0 / 32.0, 2.0 / 37.0),
            HitHeadLeftHard => (2.0 / 49.0, 2.0 / 50.0),
            HitHeadStraightLight => (2.0 / 24.0, 2.0 / 32.0),
            HitHeadStraightMedium => (2.0 / 28.0, 2.0 / 37.0),
            HitHeadStraightHard => (2.0 / 30.0, 2.0 / 43.0),
            KillHeadRightLight | KillHeadLeftLight => (2.0 / 70.0, 9.0 / 78.0),
            KillHeadRightMedium | KillHeadLeftMedium => (1.0 / 77.0, 2.0 / 76.0),
            KillHeadRightHard | KillHeadLeftHard => (1.0 / 68.0, 1.0 / 91.0),
            PunchHeadLeftLight | PunchHeadRightLight | KickHeadLeftLight | KickHeadRightLight => {
                (7.0 / 34.0, 8.0 / 31.0)
            }
            PunchHeadLeftMedium | PunchHeadRightMedium | KickHeadLeftMedium
            | KickHeadRightMedium => (16.0 / 36.0, 22.0 / 34.0),
            PunchHeadLeftHard | PunchHeadRightHard | KickHeadLeftHard | KickHeadRightHard => {
                (29.0 / 59.0, 26.0 / 50.0)
            }
        };
        pick(fighter, samuel, clara)
    }

    /// Seconds from clip start to the depicted impact
    pub fn hit_time(&self, fighter: Fighter) -> f64 {
        self.duration(fighter) * self.hit_ratio(fighter)
    }

    fn hit(strength: Strength, straight: bool, right: bool) -> Self {
        match (strength, straight, right) {
            (Strength::Light, true, _) => HitHeadStraightLight,
            (Strength::Medium, true, _) => HitHeadStraightMedium,
            (Strength::Hard, true, _) => HitHeadStraightHard,
            (Strength::Light, false, true) => HitHeadRightLight,
            (Strength::Medium, false, true) => HitHeadRightMedium,
            (Strength::Hard, false, true) => HitHeadRightHard,
            (Strength::Light, false, false) => HitHeadLeftLight,
            (Strength::Medium, false, false) => HitHeadLeftMedium,
            (Strength::Hard, false, false) => HitHeadLeftHard,
        }
    }

    fn kill(strength: Strength, right: bool) -> Self {
        match (strength, right) {
            (Strength::Light, true) => KillHeadRightLight,
            (Strength::Medium, true) => KillHeadRightMedium,
            (Strength::Hard, true) => KillHeadRightHard,
            (Strength::Light, false) => KillHeadLeftLight,
            (Strength::Medium, false) => KillHeadLeftMedium,
            (Strength::Hard, false) => KillHeadLeftHard,
        }
    }
}

fn pick(fighter: Fighter, samuel: f64, clara: f64) -> f64 {
    match fighter {
        Fighter::Samuel => samuel,
        Fighter::Clara => clara,
    }
}

/// Seconds to wait after starting the attacker's clip before starting the
/// defender's, so both impacts land on the same frame. Never negative.
///
/// Only reaction clips are delayed; anything else starts immediately.
pub fn delay_for_defending_animation(
    defender_animation: AnimationType,
    attacker_animation: AnimationType,
    attacker: Fighter,
    defender: Fighter,
) -> f64 {
    if !defender_animation.is_reaction() {
        return 0.0;
    }
    let delay = attacker_animation.hit_time(attacker) - defender_animation.hit_time(defender);
    if delay <= 0.0 {
        0.0
    } else {
        delay
    }
}

/// Reaction clip the defender plays for an attack outcome
pub fn defender_animation(
    attack_animation: AnimationType,
    attacker: Fighter,
    result: &AttackResult,
) -> Option<AnimationType> {
    let right = attack_animation.is_right();
    match result {
        AttackResult::NoAttack => None,
        AttackResult::Miss => Some(if right { DodgeHeadLeft } else { DodgeHeadRight }),
        AttackResult::Damage(_) => {
            let strength = attack_animation.strength()?;
            let straight = attack_animation.is_straight_attack(attacker);
            Some(AnimationType::hit(strength, straight, right))
        }
        // Kill clips fall away from the blow
        AttackResult::Kill(_) => {
            let strength = attack_animation.strength()?;
            Some(AnimationType::kill(strength, !right))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defender_waits_for_attacker_impact() {
        let attack = PunchHeadRightHard;
        let reaction = HitHeadRightHard;
        let delay =
            delay_for_defending_animation(reaction, attack, Fighter::Samuel, Fighter::Clara);

        let expected = 1.96667 * 29.0 / 59.0 - 1.166667 * 2.0 / 46.0;
        assert!((delay - expected).abs() < 1e-9);
        assert!(delay > 0.0);
    }

    #[test]
    fn delay_clamps_to_zero_when_defender_impact_is_later() {
        // Dodge impact (~0.33s) comes after a samuel light punch impact (~0.23s)
        let delay = delay_for_defending_animation(
            DodgeHeadLeft,
            PunchHeadRightLight,
            Fighter::Samuel,
            Fighter::Samuel,
        );
        assert_eq!(delay, 0.0);
    }

    #[test]
    fn same_move_lands_at_different_times_per_rig() {
        let samuel = PunchHeadLeftMedium.hit_time(Fighter::Samuel);
        let clara = PunchHeadLeftMedium.hit_time(Fighter::Clara);
        assert!((samuel - 1.2 * 16.0 / 36.0).abs() < 1e-9);
        assert!((clara - 1.133333 * 22.0 / 34.0).abs() < 1e-9);
        assert_ne!(samuel, clara);
    }

    #[test]
    fn non_reaction_defender_clip_is_not_delayed() {
        let delay = delay_for_defending_animation(
            IdleFight,
            PunchHeadRightHard,
            Fighter::Clara,
            Fighter::Clara,
        );
        assert_eq!(delay, 0.0);
    }

    #[test]
    fn miss_dodges_away_from_attack_side() {
        let right = defender_animation(PunchHeadRightLight, Fighter::Samuel, &AttackResult::Miss);
        let left = defender_animation(KickHeadLeftHard, Fighter::Samuel, &AttackResult::Miss);
        assert_eq!(right, Some(DodgeHeadLeft));
        assert_eq!(left, Some(DodgeHeadRight));
    }

    #[test]
    fn hit_reaction_depends_on_attacker_rig() {
        let damage = AttackResult::Damage(10.0);
        assert_eq!(
            defender_animation(PunchHeadRightLight, Fighter::Samuel, &damage),
            Some(HitHeadStraightLight)
        );
        assert_eq!(
            defender_animation(PunchHeadRightLight, Fighter::Clara, &damage),
            Some(HitHeadRightLight)
        );
        assert_eq!(
            defender_animation(PunchHeadLeftMedium, Fighter::Clara, &damage),
            Some(HitHeadStraightMedium)
        );
    }

    #[test]
    fn kill_reaction_mirrors_attack_side() {
        let kill = AttackResult::Kill(25.0);
        assert_eq!(
            defender_animation(PunchHeadRightHard, Fighter::Samuel, &kill),
            Some(KillHeadLeftHard)
        );
        assert_eq!(
            defender_animation(PunchHeadRightHard, Fighter::Samuel, &AttackResult::NoAttack),
            None
        );
    }
}
