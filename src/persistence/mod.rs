//! Save/load for the current run and cross-run progress
//!
//! Features:
//! - Versioned, flat camelCase JSON snapshots
//! - Every field defaults, so older or partial saves still load
//! - Items stored by id and rehydrated from the catalog
//! - An open shop visit keeps its offer across reloads
//! - Corrupt saves are reported and ignored

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::meta::MetaProgress;
use crate::platform::{KeyValueStore, StorageError};
use crate::sim::catalog::{Item, find};
use crate::sim::progression::{enemy_max_health, is_boss_level};
use crate::sim::shop::ShopOffer;
use crate::sim::state::{GamePhase, RunState};
use crate::tuning::Tuning;

/// Storage key for the run in progress
pub const RUN_KEY: &str = "grid_duel_run_v1";
/// Storage key for cross-run progress
pub const META_KEY: &str = "grid_duel_meta_v1";
/// Current snapshot layout
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported save version {0}")]
    Version(u32),
}

/// Everything needed to resume a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunSnapshot {
    pub version: u32,
    pub level: u32,
    pub game_over: bool,
    pub is_boss_level: bool,
    pub endless_mode: bool,
    pub phase: GamePhase,
    pub player_health: Option<f64>,
    pub enemy_health: Option<f64>,
    /// Stored so boss levels keep their multiplier on resume
    pub enemy_max_health: Option<f64>,
    pub enemy_bonus_health: u32,
    pub enemy_bonus_damage: u32,
    pub player_attack_count: Option<u32>,
    pub enemy_attack_count: Option<u32>,
    pub player_gold: u32,
    pub player_items: Vec<String>,
    pub total_damage_dealt: u64,
    pub total_damage_taken: u64,
    pub total_healing_done: u64,
    pub revives_used: u32,
    pub player_combo: Option<f64>,
    pub enemy_combo: Option<f64>,
    /// Item ids of the open shop visit, empty outside the shop
    pub shop_offer: Vec<String>,
    pub shop_purchased: Vec<String>,
}

/// A loaded run together with the shop visit it was saved in
#[derive(Debug, Clone)]
pub struct SavedRun {
    pub state: RunState,
    pub shop: ShopOffer,
}

impl RunSnapshot {
    pub fn from_state(state: &RunState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            level: state.level,
            game_over: state.game_over,
            is_boss_level: state.is_boss_level,
            endless_mode: state.endless_mode,
            phase: state.phase,
            player_health: Some(state.player_health),
            enemy_health: Some(state.enemy_health),
            enemy_max_health: Some(state.enemy_max_health),
            enemy_bonus_health: state.enemy_bonus_health,
            enemy_bonus_damage: state.enemy_bonus_damage,
            player_attack_count: Some(state.player_attack_count),
            enemy_attack_count: Some(state.enemy_attack_count),
            player_gold: state.player_gold,
            player_items: state.owned_items.iter().map(|item| item.id.to_string()).collect(),
            total_damage_dealt: state.total_damage_dealt,
            total_damage_taken: state.total_damage_taken,
            total_healing_done: state.total_healing_done,
            revives_used: state.revives_used,
            player_combo: Some(state.player_combo),
            enemy_combo: Some(state.enemy_combo),
            shop_offer: Vec::new(),
            shop_purchased: Vec::new(),
        }
    }

    /// Record the current shop visit alongside the run
    pub fn with_shop(mut self, shop: &ShopOffer) -> Self {
        self.shop_offer = shop.item_ids().into_iter().map(String::from).collect();
        self.shop_purchased = shop.purchased_ids().into_iter().map(String::from).collect();
        self
    }

    /// Rebuild the saved shop visit. Only a run sitting in the shop has one.
    pub fn shop(&self) -> ShopOffer {
        if self.phase != GamePhase::LevelCleared {
            return ShopOffer::default();
        }
        ShopOffer::from_ids(&self.shop_offer, &self.shop_purchased)
    }

    /// Rebuild a run, clamping anything out of range
    pub fn into_state(self, tuning: &Tuning) -> RunState {
        let mut state = RunState::new(tuning);
        state.level = self.level.max(1);
        state.game_over = self.game_over;
        state.endless_mode = self.endless_mode;
        state.phase = match self.phase {
            GamePhase::Paused | GamePhase::Menu => GamePhase::Active,
            phase => phase,
        };
        state.is_boss_level = self.is_boss_level || is_boss_level(state.level, tuning);
        state.enemy_bonus_health = self.enemy_bonus_health;
        state.enemy_bonus_damage = self.enemy_bonus_damage;
        state.player_gold = self.player_gold;
        state.owned_items = items_from_ids(&self.player_items);
        state.player_attack_count = self.player_attack_count.unwrap_or(tuning.base_player_attack_count);
        state.enemy_attack_count = self.enemy_attack_count.unwrap_or(tuning.base_enemy_attack_count);

        state.refresh_player_max_health(tuning);
        state.player_health = clamp_health(self.player_health, state.player_max_health);
        state.enemy_max_health = self
            .enemy_max_health
            .filter(|max| max.is_finite() && *max > 0.0)
            .unwrap_or_else(|| enemy_max_health(&state, tuning));
        state.enemy_health = clamp_health(self.enemy_health, state.enemy_max_health);

        state.total_damage_dealt = self.total_damage_dealt;
        state.total_damage_taken = self.total_damage_taken;
        state.total_healing_done = self.total_healing_done;
        state.revives_used = self.revives_used;
        state.player_combo = clamp_combo(self.player_combo, tuning);
        state.enemy_combo = clamp_combo(self.enemy_combo, tuning);
        state
    }
}

fn clamp_health(value: Option<f64>, max: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, max),
        _ => max,
    }
}

fn clamp_combo(value: Option<f64>, tuning: &Tuning) -> f64 {
    match value {
        Some(v) if v.is_finite() => v.clamp(1.0, tuning.max_combo),
        _ => 1.0,
    }
}

/// Look up saved ids in the catalog, dropping any that no longer exist
pub fn items_from_ids(ids: &[String]) -> Vec<&'static Item> {
    ids.iter()
        .filter_map(|id| {
            let item = find(id);
            if item.is_none() {
                log::warn!("Dropping unknown item id '{}' from save", id);
            }
            item
        })
        .collect()
}

/// Write the run snapshot, including the open shop offer
pub fn save_run(store: &mut dyn KeyValueStore, state: &RunState, shop: &ShopOffer) -> Result<(), PersistError> {
    let json = serde_json::to_string(&RunSnapshot::from_state(state).with_shop(shop))?;
    store.set(RUN_KEY, &json)?;
    log::debug!("Run saved at level {}", state.level);
    Ok(())
}

/// Read the snapshot without rebuilding state
pub fn read_snapshot(store: &dyn KeyValueStore) -> Result<Option<RunSnapshot>, PersistError> {
    let Some(json) = store.get(RUN_KEY)? else {
        return Ok(None);
    };
    let snapshot: RunSnapshot = serde_json::from_str(&json)?;
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(PersistError::Version(snapshot.version));
    }
    Ok(Some(snapshot))
}

/// Resume a saved run. Missing or unreadable saves yield `None`.
pub fn load_run(store: &dyn KeyValueStore, tuning: &Tuning) -> Option<SavedRun> {
    match read_snapshot(store) {
        Ok(Some(snapshot)) => {
            let shop = snapshot.shop();
            let state = snapshot.into_state(tuning);
            log::info!("Resumed run at level {}", state.level);
            Some(SavedRun { state, shop })
        }
        Ok(None) => None,
        Err(e) => {
            log::warn!("Ignoring saved run: {}", e);
            None
        }
    }
}

/// Forget the saved run
pub fn clear_run(store: &mut dyn KeyValueStore) -> Result<(), PersistError> {
    store.remove(RUN_KEY)?;
    log::debug!("Saved run cleared");
    Ok(())
}

pub fn save_meta(store: &mut dyn KeyValueStore, meta: &MetaProgress) -> Result<(), PersistError> {
    let json = serde_json::to_string(meta)?;
    store.set(META_KEY, &json)?;
    Ok(())
}

/// Load cross-run progress, starting fresh if absent or unreadable
pub fn load_meta(store: &dyn KeyValueStore) -> MetaProgress {
    let json = match store.get(META_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => {
            log::info!("No saved progress found, starting fresh");
            return MetaProgress::new();
        }
        Err(e) => {
            log::warn!("Could not read progress ({}), starting fresh", e);
            return MetaProgress::new();
        }
    };
    match serde_json::from_str::<MetaProgress>(&json) {
        Ok(meta) => {
            log::info!("Loaded progress ({} runs, {} wins)", meta.runs_started, meta.wins);
            meta
        }
        Err(e) => {
            log::warn!("Ignoring corrupt progress: {}", e);
            MetaProgress::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryStore;

    fn sample_state(tuning: &Tuning) -> RunState {
        let mut state = RunState::new(tuning);
        state.level = 20;
        state.is_boss_level = true;
        state.enemy_bonus_health = 50;
        state.enemy_bonus_damage = 5;
        state.owned_items = items_from_ids(&["leatherShield".to_string(), "lifeAmulet".to_string()]);
        state.refresh_player_max_health(tuning);
        state.player_health = 88.0;
        state.enemy_max_health = 225.0;
        state.enemy_health = 140.0;
        state.player_gold = 73;
        state.player_combo = 1.4;
        state.total_damage_dealt = 900;
        state.revives_used = 1;
        state.player_attack_count = 23;
        state.enemy_attack_count = 20;
        state.endless_mode = true;
        state
    }

    #[test]
    fn test_run_round_trip() {
        let tuning = Tuning::default();
        let mut store = MemoryStore::new();
        let state = sample_state(&tuning);
        save_run(&mut store, &state, &ShopOffer::default()).unwrap();

        let loaded = load_run(&store, &tuning).unwrap().state;
        assert_eq!(loaded.level, 20);
        assert_eq!(loaded.player_health, 88.0);
        assert_eq!(loaded.player_max_health, 120.0);
        assert_eq!(loaded.enemy_max_health, 225.0);
        assert_eq!(loaded.enemy_health, 140.0);
        assert_eq!(loaded.player_gold, 73);
        assert_eq!(loaded.player_combo, 1.4);
        assert_eq!(loaded.player_attack_count, 23);
        assert_eq!(loaded.enemy_attack_count, 20);
        assert!(loaded.endless_mode);
        assert!(loaded.owns("lifeAmulet"));
        assert_eq!(RunSnapshot::from_state(&loaded), RunSnapshot::from_state(&state));
    }

    #[test]
    fn test_missing_and_corrupt_saves() {
        let tuning = Tuning::default();
        let mut store = MemoryStore::new();
        assert!(load_run(&store, &tuning).is_none());

        store.set(RUN_KEY, "{\"level\": ").unwrap();
        assert!(load_run(&store, &tuning).is_none());

        clear_run(&mut store).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_partial_snapshot_uses_defaults() {
        let tuning = Tuning::default();
        let mut store = MemoryStore::new();
        store
            .set(RUN_KEY, r#"{"level": 10, "playerItems": ["ironShield", "noSuchThing"]}"#)
            .unwrap();
        let state = load_run(&store, &tuning).unwrap().state;
        assert_eq!(state.level, 10);
        assert_eq!(state.owned_items.len(), 1);
        assert_eq!(state.player_health, state.player_max_health);
        assert_eq!(state.enemy_max_health, 150.0);
        assert_eq!(state.player_combo, 1.0);
        assert_eq!(state.player_attack_count, tuning.base_player_attack_count);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let tuning = Tuning::default();
        let mut store = MemoryStore::new();
        store
            .set(RUN_KEY, r#"{"level": 3, "playerHealth": 9000, "enemyHealth": -4, "playerCombo": 7.5}"#)
            .unwrap();
        let state = load_run(&store, &tuning).unwrap().state;
        assert_eq!(state.player_health, 100.0);
        assert_eq!(state.enemy_health, 0.0);
        assert_eq!(state.player_combo, tuning.max_combo);
    }

    #[test]
    fn test_shop_offer_round_trip() {
        let tuning = Tuning::default();
        let mut store = MemoryStore::new();
        let mut state = sample_state(&tuning);
        state.phase = GamePhase::LevelCleared;
        let shop = ShopOffer::from_ids(&["smallSword", "crudePotion", "omnigem"], &["smallSword"]);
        save_run(&mut store, &state, &shop).unwrap();

        let saved = load_run(&store, &tuning).unwrap();
        assert_eq!(saved.shop, shop);
        assert_eq!(saved.shop.purchased_ids(), vec!["smallSword"]);
        assert_eq!(saved.state.phase, GamePhase::LevelCleared);
    }

    #[test]
    fn test_shop_offer_ignored_outside_shop() {
        let tuning = Tuning::default();
        let mut store = MemoryStore::new();
        store
            .set(RUN_KEY, r#"{"level": 5, "phase": "active", "shopOffer": ["smallSword"]}"#)
            .unwrap();
        assert!(load_run(&store, &tuning).unwrap().shop.is_empty());

        store.set(RUN_KEY, r#"{"level": 5, "phase": "levelCleared"}"#).unwrap();
        assert!(load_run(&store, &tuning).unwrap().shop.is_empty());
    }

    #[test]
    fn test_future_version_rejected() {
        let tuning = Tuning::default();
        let mut store = MemoryStore::new();
        store.set(RUN_KEY, r#"{"version": 99, "level": 4}"#).unwrap();
        assert!(matches!(read_snapshot(&store), Err(PersistError::Version(99))));
        assert!(load_run(&store, &tuning).is_none());
    }

    #[test]
    fn test_meta_round_trip() {
        let mut store = MemoryStore::new();
        assert_eq!(load_meta(&store), MetaProgress::new());

        let mut meta = MetaProgress::new();
        meta.wins = 2;
        meta.total_tiles_clicked = 640;
        meta.check_unlocks();
        save_meta(&mut store, &meta).unwrap();
        assert_eq!(load_meta(&store), meta);
    }
}
