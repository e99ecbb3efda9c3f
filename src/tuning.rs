//! Data-driven game balance
//!
//! Every balance number the simulation reads. Defaults come from
//! [`crate::consts`]; any subset can be overridden from JSON, and missing
//! fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Grid ===
    pub grid_cols: u32,
    pub grid_rows: u32,
    pub grid_buffer: u32,
    pub max_added_cols: u32,

    // === Combatants ===
    pub base_player_health: f64,
    pub base_enemy_health: f64,
    pub base_player_attack_count: u32,
    pub base_enemy_attack_count: u32,
    pub base_player_damage: f64,
    pub base_enemy_damage: f64,
    pub max_combo: f64,
    pub combo_step: f64,

    // === Gold ===
    pub gold_tiles_per_round: u32,
    pub gold_per_tile: u32,

    // === Progression ===
    pub boss_interval: u32,
    pub boss_health_mult: f64,
    pub boss_damage_mult: f64,
    pub boss_gold_bonus: u32,
    pub enemy_health_step: u32,
    pub enemy_damage_step: u32,
    pub final_level: u32,

    // === Shop ===
    pub shop_size: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grid_cols: BASE_GRID_COLS,
            grid_rows: BASE_GRID_ROWS,
            grid_buffer: GRID_BUFFER_CELLS,
            max_added_cols: MAX_ADDED_COLS,

            base_player_health: BASE_PLAYER_HEALTH,
            base_enemy_health: BASE_ENEMY_HEALTH,
            base_player_attack_count: BASE_PLAYER_ATTACK_COUNT,
            base_enemy_attack_count: BASE_ENEMY_ATTACK_COUNT,
            base_player_damage: BASE_PLAYER_DAMAGE,
            base_enemy_damage: BASE_ENEMY_DAMAGE,
            max_combo: MAX_COMBO,
            combo_step: COMBO_STEP,

            gold_tiles_per_round: GOLD_TILES_PER_ROUND,
            gold_per_tile: GOLD_PER_TILE,

            boss_interval: BOSS_INTERVAL,
            boss_health_mult: BOSS_HEALTH_MULT,
            boss_damage_mult: BOSS_DAMAGE_MULT,
            boss_gold_bonus: BOSS_GOLD_BONUS,
            enemy_health_step: ENEMY_HEALTH_STEP,
            enemy_damage_step: ENEMY_DAMAGE_STEP,
            final_level: FINAL_LEVEL,

            shop_size: SHOP_SIZE,
        }
    }
}

impl Tuning {
    /// Storage key for balance overrides
    pub const STORAGE_KEY: &'static str = "grid_duel_tuning";

    /// Parse overrides, falling back to defaults on malformed input
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => tuning.sanitized(),
            Err(e) => {
                log::warn!("Ignoring malformed tuning ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Load overrides from the store (defaults if absent or unreadable)
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => {
                log::info!("Loaded tuning overrides");
                Self::from_json(&json)
            }
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Could not read tuning ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Save to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        if let Ok(json) = serde_json::to_string(self) {
            match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Tuning saved"),
                Err(e) => log::warn!("Tuning not saved: {}", e),
            }
        }
    }

    /// Clamp values the simulation cannot work with
    fn sanitized(mut self) -> Self {
        self.grid_cols = self.grid_cols.max(1);
        self.grid_rows = self.grid_rows.max(1);
        self.max_added_cols = self.max_added_cols.max(1);
        self.boss_interval = self.boss_interval.max(1);
        self.max_combo = self.max_combo.max(1.0);
        self.combo_step = self.combo_step.max(0.0);
        self.base_player_health = self.base_player_health.max(1.0);
        self.base_enemy_health = self.base_enemy_health.max(1.0);
        self
    }
}
