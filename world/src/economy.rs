//! Money and base hit points.

use machines_td_core::{STARTING_BASE_HP, STARTING_MONEY};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Economy {
    money: u32,
    base_hp: u32,
}

impl Economy {
    pub(crate) const fn new() -> Self {
        Self {
            money: STARTING_MONEY,
            base_hp: STARTING_BASE_HP,
        }
    }

    pub(crate) const fn money(&self) -> u32 {
        self.money
    }

    pub(crate) const fn base_hp(&self) -> u32 {
        self.base_hp
    }

    /// Deducts `cost` when affordable; leaves money untouched otherwise.
    pub(crate) fn try_spend(&mut self, cost: u32) -> bool {
        match self.money.checked_sub(cost) {
            Some(remaining) => {
                self.money = remaining;
                true
            }
            None => false,
        }
    }

    pub(crate) fn credit(&mut self, amount: u32) {
        self.money = self.money.saturating_add(amount);
    }

    /// Removes one base hit point and returns what remains.
    pub(crate) fn damage_base(&mut self) -> u32 {
        self.base_hp = self.base_hp.saturating_sub(1);
        self.base_hp
    }
}
