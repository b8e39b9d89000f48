//! Move catalog - immutable attack and defense definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::animation::AnimationType;

/// Attack strength tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strength {
    Light,
    Medium,
    Hard,
}

/// Lane an attack comes from. Odd codes are left-side lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum AttackPosition {
    LeftLight = 1,
    RightLight = 2,
    LeftMedium = 3,
    RightMedium = 4,
    LeftHard = 5,
    RightHard = 6,
}

impl AttackPosition {
    pub const ALL: [AttackPosition; 6] = [
        Self::LeftLight,
        Self::RightLight,
        Self::LeftMedium,
        Self::RightMedium,
        Self::LeftHard,
        Self::RightHard,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_left(self) -> bool {
        self.code() % 2 == 1
    }

    pub fn strength(self) -> Strength {
        match self {
            Self::LeftLight | Self::RightLight => Strength::Light,
            Self::LeftMedium | Self::RightMedium => Strength::Medium,
            Self::LeftHard | Self::RightHard => Strength::Hard,
        }
    }
}

impl TryFrom<u8> for AttackPosition {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| format!("invalid attack position {}", code))
    }
}

impl From<AttackPosition> for u8 {
    fn from(position: AttackPosition) -> Self {
        position.code()
    }
}

/// Direction of a defensive dash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum DefensePosition {
    Forward = 1,
    Left = 2,
    Backward = 3,
    Right = 4,
}

impl DefensePosition {
    pub const ALL: [DefensePosition; 4] = [Self::Forward, Self::Left, Self::Backward, Self::Right];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Whether dashing this way avoids an attack from the given lane
    pub fn dodges(self, attack: AttackPosition) -> bool {
        match self {
            Self::Forward | Self::Backward => false,
            Self::Left => attack.is_left(),
            Self::Right => !attack.is_left(),
        }
    }
}

impl TryFrom<u8> for DefensePosition {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|p| p.code() == code)
            .ok_or_else(|| format!("invalid defense position {}", code))
    }
}

impl From<DefensePosition> for u8 {
    fn from(position: DefensePosition) -> Self {
        position.code()
    }
}

/// Every attack in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttackKind {
    LeftPunchLight,
    LeftPunchMedium,
    LeftPunchHard,
    RightPunchLight,
    RightPunchMedium,
    RightPunchHard,
    LeftKickLight,
    LeftKickMedium,
    LeftKickHard,
    RightKickLight,
    RightKickMedium,
    RightKickHard,
}

impl AttackKind {
    pub const PUNCHES: [AttackKind; 6] = [
        Self::LeftPunchLight,
        Self::LeftPunchMedium,
        Self::LeftPunchHard,
        Self::RightPunchLight,
        Self::RightPunchMedium,
        Self::RightPunchHard,
    ];

    pub const KICKS: [AttackKind; 6] = [
        Self::LeftKickLight,
        Self::LeftKickMedium,
        Self::LeftKickHard,
        Self::RightKickLight,
        Self::RightKickMedium,
        Self::RightKickHard,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::LeftPunchLight => "leftPunchLight",
            Self::LeftPunchMedium => "leftPunchMedium",
            Self::LeftPunchHard => "leftPunchHard",
            Self::RightPunchLight => "rightPunchLight",
            Self::RightPunchMedium => "rightPunchMedium",
            Self::RightPunchHard => "rightPunchHard",
            Self::LeftKickLight => "leftKickLight",
            Self::LeftKickMedium => "leftKickMedium",
            Self::LeftKickHard => "leftKickHard",
            Self::RightKickLight => "rightKickLight",
            Self::RightKickMedium => "rightKickMedium",
            Self::RightKickHard => "rightKickHard",
        }
    }

    pub fn position(self) -> AttackPosition {
        match self {
            Self::LeftPunchLight | Self::LeftKickLight => AttackPosition::LeftLight,
            Self::LeftPunchMedium | Self::LeftKickMedium => AttackPosition::LeftMedium,
            Self::LeftPunchHard | Self::LeftKickHard => AttackPosition::LeftHard,
            Self::RightPunchLight | Self::RightKickLight => AttackPosition::RightLight,
            Self::RightPunchMedium | Self::RightKickMedium => AttackPosition::RightMedium,
            Self::RightPunchHard | Self::RightKickHard => AttackPosition::RightHard,
        }
    }

    pub fn is_kick(self) -> bool {
        Self::KICKS.contains(&self)
    }

    fn animation(self) -> AnimationType {
        match self {
            Self::LeftPunchLight => AnimationType::PunchHeadLeftLight,
            Self::LeftPunchMedium => AnimationType::PunchHeadLeftMedium,
            Self::LeftPunchHard => AnimationType::PunchHeadLeftHard,
            Self::RightPunchLight => AnimationType::PunchHeadRightLight,
            Self::RightPunchMedium => AnimationType::PunchHeadRightMedium,
            Self::RightPunchHard => AnimationType::PunchHeadRightHard,
            Self::LeftKickLight => AnimationType::KickHeadLeftLight,
            Self::LeftKickMedium => AnimationType::KickHeadLeftMedium,
            Self::LeftKickHard => AnimationType::KickHeadLeftHard,
            Self::RightKickLight => AnimationType::KickHeadRightLight,
            Self::RightKickMedium => AnimationType::KickHeadRightMedium,
            Self::RightKickHard => AnimationType::KickHeadRightHard,
        }
    }

    fn can_boost(self) -> bool {
        matches!(
            self,
            Self::LeftPunchLight
                | Self::RightPunchLight
                | Self::RightPunchMedium
                | Self::LeftKickLight
                | Self::RightKickLight
                | Self::LeftKickMedium
        )
    }
}

/// Every defense in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DefenseKind {
    DashLeft,
    DashForward,
    DashBackward,
    DashRight,
}

impl DefenseKind {
    pub const ALL: [DefenseKind; 4] = [
        Self::DashLeft,
        Self::DashForward,
        Self::DashBackward,
        Self::DashRight,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::DashLeft => "left",
            Self::DashForward => "forward",
            Self::DashBackward => "backward",
            Self::DashRight => "right",
        }
    }

    pub fn position(self) -> DefensePosition {
        match self {
            Self::DashLeft => DefensePosition::Left,
            Self::DashForward => DefensePosition::Forward,
            Self::DashBackward => DefensePosition::Backward,
            Self::DashRight => DefensePosition::Right,
        }
    }
}

/// Attack definition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AttackDef {
    pub kind: AttackKind,
    /// Base damage on a clean hit
    pub damage: f64,
    /// Decides who acts first
    pub speed: f64,
    /// Multiplier applied to the opponent's attack when they act second
    /// after this one
    pub damage_reduction: f64,
    pub position: AttackPosition,
    /// Rounds the move is unavailable after use
    pub cooldown: u32,
    pub animation: AnimationType,
    /// Landing this attack grows the boost streak
    pub can_boost: bool,
}

impl AttackDef {
    pub fn for_kind(kind: AttackKind) -> Self {
        let position = kind.position();
        let (damage, speed, damage_reduction, cooldown) = match position.strength() {
            Strength::Light => (10.0, 50.0, 0.85, 1),
            Strength::Medium => (15.0, 35.0, 0.75, 2),
            Strength::Hard => (25.0, 25.0, 0.65, 3),
        };

        Self {
            kind,
            damage,
            speed,
            damage_reduction,
            position,
            cooldown,
            animation: kind.animation(),
            can_boost: kind.can_boost(),
        }
    }
}

/// Defense definition. Multipliers default to 1; below 1 reduces, above 1
/// increases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DefenseDef {
    pub kind: DefenseKind,
    /// Scales the owner's own attack damage this round
    pub damage_multiplier: f64,
    /// Scales damage the owner takes this round
    pub incoming_damage_multiplier: f64,
    /// Scales the owner's attack speed this round
    pub speed_multiplier: f64,
    pub position: DefensePosition,
    pub cooldown: u32,
    pub animation: AnimationType,
}

impl DefenseDef {
    pub fn for_kind(kind: DefenseKind) -> Self {
        let (damage_multiplier, incoming_damage_multiplier, speed_multiplier, animation) =
            match kind {
                DefenseKind::DashForward => (1.35, 1.0, 1.5, AnimationType::IdleFight),
                DefenseKind::DashBackward => (1.0, 0.6, 0.85, AnimationType::IdleFight),
                DefenseKind::DashLeft => (1.0, 1.0, 1.0, AnimationType::DodgeHeadLeft),
                DefenseKind::DashRight => (1.0, 1.0, 1.0, AnimationType::DodgeHeadRight),
            };

        Self {
            kind,
            damage_multiplier,
            incoming_damage_multiplier,
            speed_multiplier,
            position: kind.position(),
            cooldown: 1,
            animation,
        }
    }
}

/// A catalog move, addressed by its string id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "kind", rename_all = "snake_case")]
pub enum Move {
    Attack(AttackKind),
    Defense(DefenseKind),
}

impl Move {
    pub fn id(&self) -> &'static str {
        match self {
            Self::Attack(kind) => kind.id(),
            Self::Defense(kind) => kind.id(),
        }
    }

    /// Look a move up by id
    pub fn from_id(id: &str) -> Option<Self> {
        AttackKind::PUNCHES
            .into_iter()
            .chain(AttackKind::KICKS)
            .find(|k| k.id() == id)
            .map(Self::Attack)
            .or_else(|| {
                DefenseKind::ALL
                    .into_iter()
                    .find(|k| k.id() == id)
                    .map(Self::Defense)
            })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Attack family a player brings into a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Loadout {
    Punches,
    Kicks,
}

impl Loadout {
    pub fn attacks(self) -> Vec<AttackDef> {
        let kinds = match self {
            Self::Punches => AttackKind::PUNCHES,
            Self::Kicks => AttackKind::KICKS,
        };
        kinds.into_iter().map(AttackDef::for_kind).collect()
    }

    pub fn defenses(self) -> Vec<DefenseDef> {
        DefenseKind::ALL.into_iter().map(DefenseDef::for_kind).collect()
    }
}

impl FromStr for Loadout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "punches" | "punch" => Ok(Self::Punches),
            "kicks" | "kick" => Ok(Self::Kicks),
            other => Err(format!("unknown loadout `{}`", other)),
        }
    }
}
