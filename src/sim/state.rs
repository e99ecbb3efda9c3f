//! Run state and core simulation types
//!
//! Everything that must survive Continue lives on [`RunState`]; the grid and
//! the shop offer are rebuilt from it.

use serde::{Deserialize, Serialize};

use super::catalog::Item;
use super::grid::TileKind;
use super::stats::{StatBlock, aggregate};
use crate::meta::Tier;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    /// No run in progress
    Menu,
    /// Grid is interactive
    #[default]
    Active,
    /// Grid frozen until resumed
    Paused,
    /// Enemy defeated; shop open until Continue
    LevelCleared,
    /// Final level cleared outside endless mode
    RunCompleted,
    /// Player defeated with no revive left
    RunOver,
}

/// Which combatant an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Player,
    Enemy,
}

/// Floating popup styles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PopupKind {
    Damage,
    Heal,
    Miss,
    Gold,
}

/// Notifications produced by the simulation, drained by the session each input
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum GameEvent {
    HealthChanged { player_pct: f64, enemy_pct: f64 },
    GoldChanged { amount: u32 },
    LevelChanged { level: u32 },
    Popup { kind: PopupKind, text: String, side: Side },
    ComboChanged { side: Side, value: f64 },
    /// Attack animation cue
    AttackPlayed { side: Side },
    BossAppeared,
    LevelCleared { won: bool },
    RunOver,
    RunCompleted,
    RunStarted,
    /// A saved run was restored; `phase` is where it left off. Not counted by meta progress.
    RunResumed { phase: GamePhase },
    ShopOffered { items: Vec<&'static str> },
    ItemPurchased { item_id: &'static str },
    /// A consumable item fired (revive)
    ItemActivated { item_id: &'static str, name: &'static str },
    GridBuilt { cols: u32, rows: u32 },
    TileRevealed { number: u32, kind: TileKind },
    GoldEarned { amount: u32 },
    DamageDealt { amount: u32 },
    DamageTaken { amount: u32 },
    BossDefeated,
    AchievementUnlocked { id: &'static str, tier: Tier },
}

/// Complete state of one playthrough
#[derive(Debug, Clone)]
pub struct RunState {
    pub level: u32,
    pub game_over: bool,
    pub is_boss_level: bool,
    /// Set once the player keeps going past the final level
    pub endless_mode: bool,
    pub phase: GamePhase,
    pub player_health: f64,
    pub player_max_health: f64,
    pub enemy_health: f64,
    pub enemy_max_health: f64,
    /// Scaling accumulators, never decrease within a run
    pub enemy_bonus_health: u32,
    pub enemy_bonus_damage: u32,
    pub player_combo: f64,
    pub enemy_combo: f64,
    pub player_gold: u32,
    /// Inventory in purchase order
    pub owned_items: Vec<&'static Item>,
    pub total_damage_dealt: u64,
    pub total_damage_taken: u64,
    pub total_healing_done: u64,
    pub revives_used: u32,
    /// Damage tiles on the board this level, per side
    pub player_attack_count: u32,
    pub enemy_attack_count: u32,
    /// Pending notifications
    pub events: Vec<GameEvent>,
}

impl RunState {
    /// Fresh level-1 state with base values
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            level: 1,
            game_over: false,
            is_boss_level: false,
            endless_mode: false,
            phase: GamePhase::Active,
            player_health: tuning.base_player_health,
            player_max_health: tuning.base_player_health,
            enemy_health: tuning.base_enemy_health,
            enemy_max_health: tuning.base_enemy_health,
            enemy_bonus_health: 0,
            enemy_bonus_damage: 0,
            player_combo: 1.0,
            enemy_combo: 1.0,
            player_gold: 0,
            owned_items: Vec::new(),
            total_damage_dealt: 0,
            total_damage_taken: 0,
            total_healing_done: 0,
            revives_used: 0,
            player_attack_count: tuning.base_player_attack_count,
            enemy_attack_count: tuning.base_enemy_attack_count,
            events: Vec::new(),
        }
    }

    /// Current aggregated item stats
    pub fn stats(&self) -> StatBlock {
        aggregate(self.owned_items.iter().copied())
    }

    /// True if an item with this id is in the inventory
    pub fn owns(&self, id: &str) -> bool {
        self.owned_items.iter().any(|item| item.id == id)
    }

    /// Player max HP from base plus owned items; current HP is clamped to it
    pub fn refresh_player_max_health(&mut self, tuning: &Tuning) {
        self.player_max_health = tuning.base_player_health + self.stats().bonus_hp;
        self.player_health = self.player_health.clamp(0.0, self.player_max_health);
    }

    /// Heal up to max HP, returning the amount actually restored
    pub fn heal_player(&mut self, amount: f64) -> f64 {
        let before = self.player_health;
        self.player_health = (self.player_health + amount).min(self.player_max_health);
        self.player_health - before
    }

    /// Apply damage to the enemy (floored at zero), returning damage dealt
    pub fn damage_enemy(&mut self, amount: f64) -> f64 {
        let before = self.enemy_health;
        self.enemy_health = (self.enemy_health - amount).max(0.0);
        before - self.enemy_health
    }

    /// Apply damage to the player (floored at zero)
    pub fn damage_player(&mut self, amount: f64) {
        self.player_health = (self.player_health - amount).max(0.0);
    }

    /// Neutral tile or level start: both multipliers back to 1.0
    pub fn reset_combos(&mut self) {
        self.player_combo = 1.0;
        self.enemy_combo = 1.0;
        self.emit_combos();
    }

    /// Queue a notification
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn emit_health(&mut self) {
        let event = GameEvent::HealthChanged {
            player_pct: crate::percent(self.player_health, self.player_max_health),
            enemy_pct: crate::percent(self.enemy_health, self.enemy_max_health),
        };
        self.emit(event);
    }

    pub fn emit_gold(&mut self) {
        let amount = self.player_gold;
        self.emit(GameEvent::GoldChanged { amount });
    }

    pub fn emit_combos(&mut self) {
        let (player, enemy) = (self.player_combo, self.enemy_combo);
        self.emit(GameEvent::ComboChanged { side: Side::Player, value: player });
        self.emit(GameEvent::ComboChanged { side: Side::Enemy, value: enemy });
    }

    pub fn popup(&mut self, kind: PopupKind, text: impl Into<String>, side: Side) {
        self.emit(GameEvent::Popup { kind, text: text.into(), side });
    }
}
