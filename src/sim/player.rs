//! Players and their economy

use serde::{Deserialize, Serialize};

use super::castle::{Castle, Weapon};

/// Who decides a player's shots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerKind {
    Human,
    Ai,
}

impl PlayerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerKind::Human => "human",
            PlayerKind::Ai => "ai",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" => Some(PlayerKind::Human),
            "ai" | "cpu" => Some(PlayerKind::Ai),
            _ => None,
        }
    }
}

/// Spending options on a player's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EconomyAction {
    /// Restore castle hp
    Repair,
    /// Raise income level for future turns
    UpgradeIncome,
}

/// One side of the duel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub kind: PlayerKind,
    pub castle: Castle,
    pub weapon: Weapon,
    pub gold: f32,
    pub income_level: u32,
}

impl Player {
    pub fn new(name: impl Into<String>, kind: PlayerKind, castle: Castle, weapon: Weapon) -> Self {
        Self {
            name: name.into(),
            kind,
            castle,
            weapon,
            gold: 0.0,
            income_level: 0,
        }
    }

    pub fn is_human(&self) -> bool {
        self.kind == PlayerKind::Human
    }

    pub fn earn(&mut self, amount: f32) {
        self.gold += amount.max(0.0);
    }

    /// Deduct gold if affordable; returns false (and spends nothing) otherwise
    pub fn try_spend(&mut self, cost: f32) -> bool {
        if cost < 0.0 || self.gold < cost {
            return false;
        }
        self.gold -= cost;
        true
    }

    /// Spend `cost` to repair `amount` hp; no-op at full health
    pub fn buy_repair(&mut self, cost: f32, amount: f32) -> bool {
        if self.castle.is_full_health() || !self.try_spend(cost) {
            return false;
        }
        self.castle.repair(amount);
        true
    }

    /// Spend `cost` to raise income level by one
    pub fn buy_income_upgrade(&mut self, cost: f32) -> bool {
        if !self.try_spend(cost) {
            return false;
        }
        self.income_level += 1;
        true
    }
}
