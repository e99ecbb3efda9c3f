//! Tile click resolution
//!
//! One click is the simulation's unit of time: reveal the tile, apply its
//! effect, tick burn, then check for a winner exactly once.

use rand::Rng;

use super::combat::{DeathOutcome, apply_burn, resolve_deaths, resolve_enemy_attack, resolve_player_attack};
use super::grid::{GridLayout, TileKind};
use super::progression::{LevelClear, on_enemy_defeated, on_player_defeated};
use super::state::{GameEvent, GamePhase, PopupKind, RunState, Side};
use crate::tuning::Tuning;

/// What a single click did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickResult {
    /// Kind of the revealed tile, `None` if the click was ignored
    pub kind: Option<TileKind>,
    /// Set when the click defeated the enemy
    pub level_clear: Option<LevelClear>,
    /// Set when the click killed the player
    pub player_lost: bool,
}

impl ClickResult {
    pub fn accepted(&self) -> bool {
        self.kind.is_some()
    }
}

/// Resolve a click on tile `number`.
///
/// Ignored unless the run is active. Unknown numbers and tiles that were
/// already clicked are ignored as well.
pub fn click_tile<R: Rng + ?Sized>(
    state: &mut RunState,
    grid: &mut GridLayout,
    number: u32,
    tuning: &Tuning,
    rng: &mut R,
) -> ClickResult {
    if state.phase != GamePhase::Active || state.game_over {
        return ClickResult::default();
    }
    let Some(kind) = grid.claim(number) else {
        return ClickResult::default();
    };
    state.emit(GameEvent::TileRevealed { number, kind });
    log::debug!("Tile {} revealed: {:?}", number, kind);

    let stats = state.stats();
    match kind {
        TileKind::EnemyAttack => {
            resolve_enemy_attack(state, &stats, tuning, rng);
        }
        TileKind::PlayerAttack => {
            resolve_player_attack(state, &stats, tuning);
        }
        TileKind::Gold => {
            let gain = tuning.gold_per_tile + stats.extra_gold_per_tile;
            state.player_gold += gain;
            state.emit(GameEvent::GoldEarned { amount: gain });
            state.emit_gold();
            state.popup(PopupKind::Gold, format!("+{}", gain), Side::Player);
            state.reset_combos();
        }
        TileKind::Blank => state.reset_combos(),
    }

    apply_burn(state, &stats);

    let mut result = ClickResult {
        kind: Some(kind),
        ..ClickResult::default()
    };
    match resolve_deaths(state) {
        DeathOutcome::Ongoing => {}
        DeathOutcome::PlayerWon => {
            state.emit_health();
            result.level_clear = Some(on_enemy_defeated(state, tuning));
        }
        DeathOutcome::PlayerLost => {
            state.emit_health();
            on_player_defeated(state);
            result.player_lost = true;
        }
    }
    result
}

/// Flip between `Active` and `Paused`. Other phases are left alone.
pub fn toggle_pause(state: &mut RunState) -> bool {
    match state.phase {
        GamePhase::Active => {
            state.phase = GamePhase::Paused;
            true
        }
        GamePhase::Paused => {
            state.phase = GamePhase::Active;
            true
        }
        _ => false,
    }
}
