//! Tile grid generation
//!
//! Each level the numbered cells `1..=cols*rows` are split into disjoint
//! player-attack, enemy-attack, gold and blank sets. The grid widens (and
//! then deepens) until every required tile fits.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::rng::{draw_from_pool, draw_from_range, draw_unique};
use super::state::RunState;
use crate::tuning::Tuning;

/// What a tile does when clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TileKind {
    PlayerAttack,
    EnemyAttack,
    Gold,
    Blank,
}

/// A numbered cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub number: u32,
    pub kind: TileKind,
    /// Inside an owned item's guaranteed range (highlight only)
    pub safe_range: bool,
    pub clicked: bool,
}

/// The board for one level
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLayout {
    pub cols: u32,
    pub rows: u32,
    /// Indexed by `number - 1`
    tiles: Vec<Tile>,
}

impl GridLayout {
    /// All-blank grid of the given size
    pub fn blank(cols: u32, rows: u32) -> Self {
        let tiles = (1..=cols * rows)
            .map(|number| Tile {
                number,
                kind: TileKind::Blank,
                safe_range: false,
                clicked: false,
            })
            .collect();
        Self { cols, rows, tiles }
    }

    pub fn total_cells(&self) -> u32 {
        self.cols * self.rows
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, number: u32) -> Option<&Tile> {
        let idx = number.checked_sub(1)? as usize;
        self.tiles.get(idx)
    }

    /// Numbers of every tile of a kind, ascending
    pub fn numbers_of(&self, kind: TileKind) -> Vec<u32> {
        self.tiles
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.number)
            .collect()
    }

    /// Unclicked tiles of a kind
    pub fn remaining(&self, kind: TileKind) -> usize {
        self.tiles
            .iter()
            .filter(|t| t.kind == kind && !t.clicked)
            .count()
    }

    /// Mark a tile clicked and return its kind.
    ///
    /// Returns `None` for unknown numbers and tiles that were already clicked.
    pub fn claim(&mut self, number: u32) -> Option<TileKind> {
        let idx = number.checked_sub(1)? as usize;
        let tile = self.tiles.get_mut(idx)?;
        if tile.clicked {
            return None;
        }
        tile.clicked = true;
        Some(tile.kind)
    }

    fn assign(&mut self, numbers: &[u32], kind: TileKind) {
        for &n in numbers {
            if let Some(tile) = self.tiles.get_mut(n as usize - 1) {
                tile.kind = kind;
            }
        }
    }
}

/// Cells needed for every tile category plus the spare buffer
pub fn required_cells(state: &RunState, gold_tiles: u32, tuning: &Tuning) -> u32 {
    state.player_attack_count + state.enemy_attack_count + gold_tiles + tuning.grid_buffer
}

/// Grow from the base size one column at a time; every `max_added_cols`
/// columns also add a row. Stops at the first size that fits.
pub fn grid_dimensions(base_cols: u32, base_rows: u32, required: u32, max_added_cols: u32) -> (u32, u32) {
    let (mut cols, mut rows) = (base_cols, base_rows);
    let mut added_cols = 0;
    while cols * rows < required {
        cols += 1;
        added_cols += 1;
        if added_cols >= max_added_cols {
            rows += 1;
            added_cols = 0;
        }
    }
    (cols, rows)
}

/// Lay out the grid for the current level
pub fn build_grid<R: Rng + ?Sized>(state: &RunState, tuning: &Tuning, rng: &mut R) -> GridLayout {
    let stats = state.stats();
    let gold_tiles = tuning.gold_tiles_per_round + stats.extra_gold_tiles;
    let required = required_cells(state, gold_tiles, tuning);
    let (cols, rows) = grid_dimensions(tuning.grid_cols, tuning.grid_rows, required, tuning.max_added_cols);
    let total = cols * rows;

    let mut taken = HashSet::new();
    let mut player = draw_unique(rng, state.player_attack_count as usize, total, &taken);
    taken.extend(player.iter().copied());
    let enemy = draw_unique(rng, state.enemy_attack_count as usize, total, &taken);
    taken.extend(enemy.iter().copied());

    // Range items reserve extra player tiles inside their interval
    let ranges: Vec<_> = state.owned_items.iter().filter_map(|item| item.range).collect();
    for range in &ranges {
        let reserved = draw_from_range(rng, range.count as usize, range.min, range.max, total, &taken);
        taken.extend(reserved.iter().copied());
        player.extend(reserved);
    }

    let pool: Vec<u32> = (1..=total).filter(|n| !taken.contains(n)).collect();
    let gold = draw_from_pool(rng, pool, gold_tiles as usize);

    let mut grid = GridLayout::blank(cols, rows);
    grid.assign(&player, TileKind::PlayerAttack);
    grid.assign(&enemy, TileKind::EnemyAttack);
    grid.assign(&gold, TileKind::Gold);
    for tile in &mut grid.tiles {
        tile.safe_range = ranges.iter().any(|r| r.contains(tile.number));
    }

    log::debug!(
        "Level {} grid {}x{}: {} player, {} enemy, {} gold",
        state.level,
        cols,
        rows,
        player.len(),
        enemy.len(),
        gold.len()
    );
    grid
}
