//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One click is one step; there are no timers
//! - Seeded RNG only
//! - Stable iteration order (catalog order, purchase order)
//! - No rendering or platform dependencies

pub mod catalog;
pub mod combat;
pub mod grid;
pub mod progression;
pub mod rng;
pub mod shop;
pub mod state;
pub mod stats;
pub mod tick;

pub use catalog::{CATALOG, Item, Rarity, SafeRange};
pub use combat::{AttackOutcome, DeathOutcome};
pub use grid::{GridLayout, Tile, TileKind, build_grid};
pub use progression::{LevelClear, advance_level, next_level, reset_run};
pub use shop::{Purchase, PurchaseError, ShopOffer, ShopSlot, rarity_weights};
pub use state::{GameEvent, GamePhase, PopupKind, RunState, Side};
pub use stats::{StatBlock, aggregate};
pub use tick::{ClickResult, click_tile, toggle_pause};
