//! Grid Duel - a tile-clicking roguelite duel
//!
//! Core modules:
//! - `sim`: Deterministic run simulation (combat, grid, progression, shop)
//! - `game`: Session controller that turns player input into simulation steps
//! - `ui`: Render/notify boundary for the presentation layer
//! - `platform`: Browser/native platform abstraction (key-value storage)
//! - `persistence`: Run and meta snapshots
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod meta;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::{Game, Input};
pub use meta::MetaProgress;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Starting grid: 15 columns by 4 rows
    pub const BASE_GRID_COLS: u32 = 15;
    pub const BASE_GRID_ROWS: u32 = 4;
    /// Spare cells on top of every required tile
    pub const GRID_BUFFER_CELLS: u32 = 5;
    /// Columns added before the grid grows by a row
    pub const MAX_ADDED_COLS: u32 = 3;

    /// Attack tiles on the board at level 1
    pub const BASE_PLAYER_ATTACK_COUNT: u32 = 10;
    pub const BASE_ENEMY_ATTACK_COUNT: u32 = 1;

    /// Starting health for both sides
    pub const BASE_PLAYER_HEALTH: f64 = 100.0;
    pub const BASE_ENEMY_HEALTH: f64 = 100.0;

    /// Damage per attack tile before items and combo
    pub const BASE_PLAYER_DAMAGE: f64 = 20.0;
    pub const BASE_ENEMY_DAMAGE: f64 = 10.0;

    /// Combo multiplier caps at 2.0x, growing 0.2 per consecutive hit
    pub const MAX_COMBO: f64 = 2.0;
    pub const COMBO_STEP: f64 = 0.2;

    /// Player heals this much at the start of every level (items add to it)
    pub const BASE_REGEN_PER_ROUND: f64 = 10.0;

    /// Gold tiles
    pub const GOLD_TILES_PER_ROUND: u32 = 5;
    pub const GOLD_PER_TILE: u32 = 5;

    /// Every 10th level is a boss
    pub const BOSS_INTERVAL: u32 = 10;
    pub const BOSS_HEALTH_MULT: f64 = 1.5;
    pub const BOSS_DAMAGE_MULT: f64 = 2.0;
    pub const BOSS_GOLD_BONUS: u32 = 50;

    /// Enemy scaling steps (+25 HP from level 5, +5 damage one level after each boss)
    pub const ENEMY_HEALTH_STEP: u32 = 25;
    pub const ENEMY_DAMAGE_STEP: u32 = 5;

    /// Clearing this level finishes a run (unless already in endless mode)
    pub const FINAL_LEVEL: u32 = 100;

    /// Items shown per shop visit
    pub const SHOP_SIZE: usize = 5;
}

/// Round half up, matching how damage and heal values are displayed
#[inline]
pub fn js_round(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Percentage of `current` over `max`, clamped to [0, 100]
#[inline]
pub fn percent(current: f64, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    (current / max * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_round_half_up() {
        assert_eq!(js_round(2.5), 3.0);
        assert_eq!(js_round(2.4), 2.0);
        assert_eq!(js_round(24.0), 24.0);
        assert_eq!(js_round(0.0), 0.0);
    }

    #[test]
    fn test_percent_clamps() {
        assert_eq!(percent(50.0, 100.0), 50.0);
        assert_eq!(percent(-5.0, 100.0), 0.0);
        assert_eq!(percent(10.0, 0.0), 0.0);
    }
}
