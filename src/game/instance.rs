//! Per-player move instances and the cooldown state machine

use serde::Serialize;

use crate::error::SelectionRejection;

use super::boost::FireState;
use super::moves::{AttackDef, AttackPosition, DefenseDef, DefensePosition, Loadout, Move};

/// Button state of an owned move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveState {
    Initial,
    Unselected,
    Selected,
    Cooldown,
}

/// Runtime state shared by attacks and defenses.
/// `state == Cooldown` iff `current_cooldown > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MoveSlot {
    state: MoveState,
    current_cooldown: u32,
}

impl MoveSlot {
    const FRESH: MoveSlot = MoveSlot {
        state: MoveState::Initial,
        current_cooldown: 0,
    };

    fn select(&mut self) -> Result<(), SelectionRejection> {
        if self.state == MoveState::Cooldown {
            return Err(SelectionRejection::OnCooldown {
                remaining: self.current_cooldown,
            });
        }
        self.state = MoveState::Selected;
        Ok(())
    }

    fn unselect(&mut self) {
        if self.state != MoveState::Cooldown {
            self.state = MoveState::Unselected;
        }
    }

    fn advance_round(&mut self, cooldown: u32) {
        match self.state {
            MoveState::Selected => {
                if cooldown > 0 {
                    self.state = MoveState::Cooldown;
                    self.current_cooldown = cooldown;
                } else {
                    self.state = MoveState::Initial;
                }
            }
            MoveState::Cooldown => {
                self.current_cooldown = self.current_cooldown.saturating_sub(1);
                if self.current_cooldown == 0 {
                    self.state = MoveState::Initial;
                }
            }
            MoveState::Initial | MoveState::Unselected => {
                self.state = MoveState::Initial;
            }
        }
    }
}

/// An owned attack
#[derive(Debug, Clone, PartialEq)]
pub struct AttackInstance {
    pub def: AttackDef,
    slot: MoveSlot,
    fire_state: FireState,
}

impl AttackInstance {
    pub fn new(def: AttackDef) -> Self {
        Self {
            def,
            slot: MoveSlot::FRESH,
            fire_state: FireState::None,
        }
    }

    pub fn state(&self) -> MoveState {
        self.slot.state
    }

    pub fn current_cooldown(&self) -> u32 {
        self.slot.current_cooldown
    }

    pub fn fire_state(&self) -> FireState {
        self.fire_state
    }

    pub fn is_available(&self) -> bool {
        self.slot.state != MoveState::Cooldown
    }

    pub(crate) fn set_fire_state(&mut self, fire_state: FireState) {
        self.fire_state = fire_state;
    }
}

/// An owned defense
#[derive(Debug, Clone, PartialEq)]
pub struct DefenseInstance {
    pub def: DefenseDef,
    slot: MoveSlot,
}

impl DefenseInstance {
    pub fn new(def: DefenseDef) -> Self {
        Self {
            def,
            slot: MoveSlot::FRESH,
        }
    }

    pub fn state(&self) -> MoveState {
        self.slot.state
    }

    pub fn current_cooldown(&self) -> u32 {
        self.slot.current_cooldown
    }

    pub fn is_available(&self) -> bool {
        self.slot.state != MoveState::Cooldown
    }
}

/// Every move a player owns. At most one attack and one defense are
/// selected at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveSet {
    attacks: Vec<AttackInstance>,
    defenses: Vec<DefenseInstance>,
}

impl MoveSet {
    pub fn new(attacks: Vec<AttackDef>, defenses: Vec<DefenseDef>) -> Self {
        Self {
            attacks: attacks.into_iter().map(AttackInstance::new).collect(),
            defenses: defenses.into_iter().map(DefenseInstance::new).collect(),
        }
    }

    pub fn from_loadout(loadout: Loadout) -> Self {
        Self::new(loadout.attacks(), loadout.defenses())
    }

    pub fn attacks(&self) -> &[AttackInstance] {
        &self.attacks
    }

    pub fn defenses(&self) -> &[DefenseInstance] {
        &self.defenses
    }

    pub(crate) fn attacks_mut(&mut self) -> &mut [AttackInstance] {
        &mut self.attacks
    }

    pub fn selected_attack(&self) -> Option<&AttackInstance> {
        self.attacks.iter().find(|a| a.state() == MoveState::Selected)
    }

    pub fn selected_defense(&self) -> Option<&DefenseInstance> {
        self.defenses.iter().find(|d| d.state() == MoveState::Selected)
    }

    pub fn available_attacks(&self) -> impl Iterator<Item = &AttackInstance> {
        self.attacks.iter().filter(|a| a.is_available())
    }

    pub fn available_defenses(&self) -> impl Iterator<Item = &DefenseInstance> {
        self.defenses.iter().filter(|d| d.is_available())
    }

    /// Select a move; every other available move of the same kind becomes
    /// unselected
    pub fn select(&mut self, mv: Move) -> Result<(), SelectionRejection> {
        match mv {
            Move::Attack(kind) => {
                let position = self
                    .attacks
                    .iter()
                    .find(|a| a.def.kind == kind)
                    .map(|a| a.def.position)
                    .ok_or(SelectionRejection::NotOwned)?;
                self.select_attack_at(position)
            }
            Move::Defense(kind) => {
                let position = self
                    .defenses
                    .iter()
                    .find(|d| d.def.kind == kind)
                    .map(|d| d.def.position)
                    .ok_or(SelectionRejection::NotOwned)?;
                self.select_defense_at(position)
            }
        }
    }

    pub fn select_attack_at(&mut self, position: AttackPosition) -> Result<(), SelectionRejection> {
        let index = self
            .attacks
            .iter()
            .position(|a| a.def.position == position)
            .ok_or(SelectionRejection::NotOwned)?;
        self.attacks[index].slot.select()?;
        for (i, attack) in self.attacks.iter_mut().enumerate() {
            if i != index {
                attack.slot.unselect();
            }
        }
        Ok(())
    }

    pub fn select_defense_at(
        &mut self,
        position: DefensePosition,
    ) -> Result<(), SelectionRejection> {
        let index = self
            .defenses
            .iter()
            .position(|d| d.def.position == position)
            .ok_or(SelectionRejection::NotOwned)?;
        self.defenses[index].slot.select()?;
        for (i, defense) in self.defenses.iter_mut().enumerate() {
            if i != index {
                defense.slot.unselect();
            }
        }
        Ok(())
    }

    /// Drop any selection; cooling moves are untouched
    pub fn clear_selection(&mut self) {
        self.clear_attack();
        self.clear_defense();
    }

    pub fn clear_attack(&mut self) {
        for attack in &mut self.attacks {
            attack.slot.unselect();
        }
    }

    pub fn clear_defense(&mut self) {
        for defense in &mut self.defenses {
            defense.slot.unselect();
        }
    }

    /// Round-end transition applied to every owned move
    pub fn advance_round(&mut self) {
        for attack in &mut self.attacks {
            attack.slot.advance_round(attack.def.cooldown);
        }
        for defense in &mut self.defenses {
            defense.slot.advance_round(defense.def.cooldown);
        }
    }

    /// Back to a fresh match: no cooldowns, no selections, no fire
    pub fn restart(&mut self) {
        for attack in &mut self.attacks {
            attack.slot = MoveSlot::FRESH;
            attack.fire_state = FireState::None;
        }
        for defense in &mut self.defenses {
            defense.slot = MoveSlot::FRESH;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::moves::{AttackKind, DefenseKind};

    fn punches() -> MoveSet {
        MoveSet::from_loadout(Loadout::Punches)
    }

    fn attack(set: &MoveSet, kind: AttackKind) -> &AttackInstance {
        set.attacks().iter().find(|a| a.def.kind == kind).unwrap()
    }

    #[test]
    fn selecting_unselects_the_rest() {
        let mut set = punches();
        set.select(Move::Attack(AttackKind::LeftPunchLight)).unwrap();
        set.select(Move::Attack(AttackKind::RightPunchHard)).unwrap();

        let selected: Vec<_> = set
            .attacks()
            .iter()
            .filter(|a| a.state() == MoveState::Selected)
            .collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].def.kind, AttackKind::RightPunchHard);
        assert_eq!(attack(&set, AttackKind::LeftPunchLight).state(), MoveState::Unselected);
    }

    #[test]
    fn cooldown_lasts_exactly_its_length() {
        for kind in [
            AttackKind::LeftPunchLight,
            AttackKind::LeftPunchMedium,
            AttackKind::LeftPunchHard,
        ] {
            let mut set = punches();
            set.select(Move::Attack(kind)).unwrap();
            set.advance_round();

            let n = attack(&set, kind).def.cooldown;
            assert_eq!(attack(&set, kind).state(), MoveState::Cooldown);
            assert_eq!(attack(&set, kind).current_cooldown(), n);

            for _ in 1..n {
                set.advance_round();
                assert_eq!(attack(&set, kind).state(), MoveState::Cooldown);
            }
            set.advance_round();
            assert_eq!(attack(&set, kind).state(), MoveState::Initial);
            assert_eq!(attack(&set, kind).current_cooldown(), 0);
        }
    }

    #[test]
    fn cooling_move_rejects_selection() {
        let mut set = punches();
        set.select(Move::Attack(AttackKind::RightPunchHard)).unwrap();
        set.advance_round();

        let err = set.select(Move::Attack(AttackKind::RightPunchHard)).unwrap_err();
        assert_eq!(err, SelectionRejection::OnCooldown { remaining: 3 });
        assert!(set.selected_attack().is_none());
    }

    #[test]
    fn unselected_moves_settle_back_to_initial() {
        let mut set = punches();
        set.select(Move::Defense(DefenseKind::DashLeft)).unwrap();
        set.advance_round();

        for defense in set.defenses() {
            let expected = if defense.def.kind == DefenseKind::DashLeft {
                MoveState::Cooldown
            } else {
                MoveState::Initial
            };
            assert_eq!(defense.state(), expected);
        }
    }

    #[test]
    fn kicks_are_not_owned_by_a_puncher() {
        let mut set = punches();
        let err = set.select(Move::Attack(AttackKind::LeftKickLight)).unwrap_err();
        assert_eq!(err, SelectionRejection::NotOwned);
    }

    #[test]
    fn clearing_keeps_cooldowns() {
        let mut set = punches();
        set.select(Move::Attack(AttackKind::LeftPunchHard)).unwrap();
        set.advance_round();
        set.select(Move::Attack(AttackKind::LeftPunchLight)).unwrap();
        set.clear_selection();

        assert!(set.selected_attack().is_none());
        assert_eq!(attack(&set, AttackKind::LeftPunchHard).state(), MoveState::Cooldown);
    }

    #[test]
    fn restart_clears_cooldowns() {
        let mut set = punches();
        set.select(Move::Attack(AttackKind::LeftPunchHard)).unwrap();
        set.select(Move::Defense(DefenseKind::DashForward)).unwrap();
        set.advance_round();
        set.restart();

        assert!(set.attacks().iter().all(|a| a.state() == MoveState::Initial));
        assert!(set.defenses().iter().all(|d| d.current_cooldown() == 0));
    }
}
