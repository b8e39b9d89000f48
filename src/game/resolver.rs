//! Round resolver - dodge check and damage for one attacker/defender pairing

use serde::{Deserialize, Serialize};

use super::moves::{AttackPosition, DefensePosition};
use super::round::RoundChoice;

/// Outcome of one attack
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "amount", rename_all = "snake_case")]
pub enum AttackResult {
    /// Attacker picked no attack
    NoAttack,
    /// Defender dashed out of the lane
    Miss,
    Damage(f64),
    /// Damage dealt as the killing blow
    Kill(f64),
}

impl AttackResult {
    pub fn did_attack_land(&self) -> bool {
        matches!(self, Self::Damage(_) | Self::Kill(_))
    }

    pub fn is_defender_alive(&self) -> bool {
        !matches!(self, Self::Kill(_))
    }

    pub fn damage(&self) -> Option<f64> {
        match self {
            Self::NoAttack | Self::Miss => None,
            Self::Damage(amount) | Self::Kill(amount) => Some(*amount),
        }
    }
}

/// Whether the defense avoids the attack. No defense never dodges.
pub fn did_dodge(attack: AttackPosition, defense: Option<DefensePosition>) -> bool {
    defense.is_some_and(|d| d.dodges(attack))
}

/// Damage the attacker deals through the defender's defense.
///
/// The attacker's own dash multiplier and fire multiplier each add their
/// delta over the base; they do not compound.
pub fn total_damage(
    attacker: &RoundChoice,
    defender: &RoundChoice,
    second_attacker_damage_reduction: f64,
) -> f64 {
    let Some(attack) = attacker.attack else {
        return 0.0;
    };
    let base = attack.def.damage;
    let defend_multiplier = attacker.defense.map(|d| d.damage_multiplier).unwrap_or(1.0);
    let fire_multiplier = attack.fire_state.boost_multiplier();
    let incoming_multiplier = defender
        .defense
        .map(|d| d.incoming_damage_multiplier)
        .unwrap_or(1.0);

    let total = base + (base * defend_multiplier - base) + (base * fire_multiplier - base);
    let actual = total * incoming_multiplier * second_attacker_damage_reduction;
    actual.max(0.0)
}

/// Resolve one attack against the defender's current HP
pub fn resolve(
    attacker: &RoundChoice,
    defender: &RoundChoice,
    defender_hp: f64,
    second_attacker_damage_reduction: f64,
) -> AttackResult {
    let Some(attack) = attacker.attack else {
        return AttackResult::NoAttack;
    };

    if did_dodge(attack.def.position, defender.defense.map(|d| d.position)) {
        return AttackResult::Miss;
    }

    let actual = total_damage(attacker, defender, second_attacker_damage_reduction);
    if actual >= defender_hp {
        AttackResult::Kill(actual)
    } else {
        AttackResult::Damage(actual)
    }
}

/// Apply damage to HP, returns (new_hp, is_dead)
pub fn apply_damage(current_hp: f64, damage: f64) -> (f64, bool) {
    let new_hp = (current_hp - damage).max(0.0);
    (new_hp, new_hp <= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::boost::FireState;
    use crate::game::moves::{AttackDef, AttackKind, DefenseDef, DefenseKind};
    use crate::game::round::ChosenAttack;

    fn attacking(kind: AttackKind, fire: FireState, defense: Option<DefenseDef>) -> RoundChoice {
        RoundChoice {
            attack: Some(ChosenAttack {
                def: AttackDef::for_kind(kind),
                fire_state: fire,
            }),
            defense,
        }
    }

    fn defending(defense: Option<DefenseDef>) -> RoundChoice {
        RoundChoice {
            attack: None,
            defense,
        }
    }

    fn custom_defense(damage: f64, incoming: f64) -> DefenseDef {
        DefenseDef {
            damage_multiplier: damage,
            incoming_damage_multiplier: incoming,
            ..DefenseDef::for_kind(DefenseKind::DashForward)
        }
    }

    #[test]
    fn no_attack_resolves_to_no_attack() {
        let result = resolve(&defending(None), &defending(None), 100.0, 1.0);
        assert_eq!(result, AttackResult::NoAttack);
        assert!(!result.did_attack_land());
    }

    #[test]
    fn left_light_is_dodged_by_left_and_lands_through_right() {
        let attacker = attacking(AttackKind::LeftPunchLight, FireState::Big, None);
        let left = defending(Some(DefenseDef::for_kind(DefenseKind::DashLeft)));
        let right = defending(Some(DefenseDef::for_kind(DefenseKind::DashRight)));

        for hp in [1.0, 50.0, 1000.0] {
            assert_eq!(resolve(&attacker, &left, hp, 1.0), AttackResult::Miss);
            assert!(resolve(&attacker, &right, hp, 1.0).did_attack_land());
        }
    }

    #[test]
    fn forward_dash_never_dodges() {
        let forward = defending(Some(DefenseDef::for_kind(DefenseKind::DashForward)));
        for kind in AttackKind::PUNCHES {
            let attacker = attacking(kind, FireState::None, None);
            assert!(resolve(&attacker, &forward, 100.0, 1.0).did_attack_land());
        }
    }

    #[test]
    fn damage_formula_adds_deltas_then_scales() {
        let cases = [
            (1.0, FireState::None, 1.0, 1.0),
            (1.35, FireState::Small, 1.0, 1.0),
            (1.35, FireState::Big, 0.6, 0.65),
            (0.5, FireState::Small, 1.5, 0.85),
            (1.0, FireState::Big, 2.0, 0.75),
        ];
        for (d, fire, i, r) in cases {
            let attacker = attacking(
                AttackKind::RightPunchMedium,
                fire,
                Some(custom_defense(d, 1.0)),
            );
            let defender = defending(Some(custom_defense(1.0, i)));
            let b = 15.0;
            let f = fire.boost_multiplier();

            let actual = total_damage(&attacker, &defender, r);
            assert!((actual - b * (d + f - 1.0) * i * r).abs() < 1e-9);
            assert!(actual >= 0.0);
        }
    }

    #[test]
    fn damage_never_goes_negative() {
        let attacker = attacking(
            AttackKind::LeftPunchLight,
            FireState::None,
            Some(custom_defense(-3.0, 1.0)),
        );
        assert_eq!(total_damage(&attacker, &defending(None), 1.0), 0.0);
    }

    #[test]
    fn risky_incoming_multiplier_increases_damage() {
        let attacker = attacking(AttackKind::LeftPunchLight, FireState::None, None);
        let defender = defending(Some(custom_defense(1.0, 1.2)));
        assert!((total_damage(&attacker, &defender, 1.0) - 12.0).abs() < 1e-9);
    }

    #[test]
    fn kill_threshold_is_inclusive() {
        let attacker = attacking(AttackKind::RightPunchLight, FireState::None, None);
        let defender = defending(None);

        assert_eq!(resolve(&attacker, &defender, 10.0, 1.0), AttackResult::Kill(10.0));
        assert_eq!(resolve(&attacker, &defender, 9.5, 1.0), AttackResult::Kill(10.0));
        assert_eq!(
            resolve(&attacker, &defender, 10.0 + 1e-9, 1.0),
            AttackResult::Damage(10.0)
        );
    }

    #[test]
    fn apply_damage_floors_at_zero() {
        assert_eq!(apply_damage(100.0, 10.0), (90.0, false));
        assert_eq!(apply_damage(5.0, 25.0), (0.0, true));
    }

    #[test]
    fn result_json_shape() {
        let json = serde_json::to_string(&AttackResult::Kill(25.0)).unwrap();
        assert_eq!(json, r#"{"type":"kill","amount":25.0}"#);
        let miss: AttackResult = serde_json::from_str(r#"{"type":"miss"}"#).unwrap();
        assert_eq!(miss, AttackResult::Miss);
    }
}
