//! Between-level shop
//!
//! Offers are drawn without replacement from the catalog, weighted by rarity.
//! Rarer tiers get more likely as the level rises.

use rand::Rng;
use thiserror::Error;

use super::catalog::{CATALOG, Item, Rarity, find};
use super::rng::weighted_index;
use super::state::{GameEvent, RunState};
use crate::tuning::Tuning;

/// Levels over which the rarity curve reaches its final shape
const RARITY_RAMP_LEVELS: f64 = 50.0;

/// Per-tier selection weights for one level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RarityWeights {
    pub common: f64,
    pub rare: f64,
    pub epic: f64,
    pub legendary: f64,
}

impl RarityWeights {
    pub fn of(&self, rarity: Rarity) -> f64 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
            Rarity::Legendary => self.legendary,
        }
    }
}

/// Rarity weights shift from common toward rare tiers until level 50
pub fn rarity_weights(level: u32) -> RarityWeights {
    let p = (level as f64 / RARITY_RAMP_LEVELS).min(1.0);
    RarityWeights {
        common: Rarity::Common.base_weight() - 0.20 * p,
        rare: Rarity::Rare.base_weight() + 0.10 * p,
        epic: Rarity::Epic.base_weight() + 0.05 * p,
        legendary: Rarity::Legendary.base_weight() + 0.05 * p,
    }
}

/// Integer roulette weight for one item
fn item_weight(item: &Item, weights: &RarityWeights) -> u32 {
    ((weights.of(item.rarity) * 100.0).floor() as u32).max(1)
}

/// Pick up to `size` distinct items the player can still buy, sorted by rarity
pub fn offer_items<R: Rng + ?Sized>(level: u32, owned: &[&'static Item], size: usize, rng: &mut R) -> Vec<&'static Item> {
    let weights = rarity_weights(level);
    let mut candidates: Vec<&'static Item> = CATALOG
        .iter()
        .filter(|item| item.repeatable || !owned.iter().any(|o| o.id == item.id))
        .collect();

    let count = size.min(candidates.len());
    let mut picked = Vec::with_capacity(count);
    while picked.len() < count {
        let item_weights: Vec<u32> = candidates.iter().map(|item| item_weight(item, &weights)).collect();
        let Some(idx) = weighted_index(rng, &item_weights) else {
            break;
        };
        picked.push(candidates.remove(idx));
    }
    picked.sort_by_key(|item| item.rarity);
    picked
}

/// Why a purchase was refused
#[derive(Debug, Error, PartialEq)]
pub enum PurchaseError {
    #[error("{0} is not on offer")]
    NotOffered(String),

    #[error("{0} was already bought this visit")]
    AlreadyPurchased(String),

    #[error("{cost} gold needed, {gold} available")]
    InsufficientGold { cost: u32, gold: u32 },
}

/// One offered item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShopSlot {
    pub item: &'static Item,
    pub purchased: bool,
}

/// A successful purchase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Purchase {
    pub item: &'static Item,
    pub cost: u32,
    /// HP actually restored by a potion
    pub healed: f64,
}

/// The items on offer for one shop visit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShopOffer {
    pub slots: Vec<ShopSlot>,
}

impl ShopOffer {
    /// Roll a fresh offer for the state's level and inventory
    pub fn roll<R: Rng + ?Sized>(state: &RunState, tuning: &Tuning, rng: &mut R) -> Self {
        let slots = offer_items(state.level, &state.owned_items, tuning.shop_size, rng)
            .into_iter()
            .map(|item| ShopSlot { item, purchased: false })
            .collect();
        Self { slots }
    }

    /// Rebuild a saved offer. Ids missing from the catalog are dropped.
    pub fn from_ids<S: AsRef<str>>(offered: &[S], purchased: &[S]) -> Self {
        let slots = offered
            .iter()
            .filter_map(|id| {
                let id = id.as_ref();
                let item = find(id);
                if item.is_none() {
                    log::warn!("Dropping unknown shop item '{}'", id);
                }
                item
            })
            .map(|item| ShopSlot {
                item,
                purchased: purchased.iter().any(|p| p.as_ref() == item.id),
            })
            .collect();
        Self { slots }
    }

    pub fn item_ids(&self) -> Vec<&'static str> {
        self.slots.iter().map(|slot| slot.item.id).collect()
    }

    /// Ids of ordinary items already bought this visit
    pub fn purchased_ids(&self) -> Vec<&'static str> {
        self.slots
            .iter()
            .filter(|slot| slot.purchased)
            .map(|slot| slot.item.id)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Buy an offered item, mutating the run state on success.
    ///
    /// Potions heal immediately and stay purchasable. Everything else joins
    /// the inventory and can be bought once per visit.
    pub fn purchase(&mut self, id: &str, state: &mut RunState, tuning: &Tuning) -> Result<Purchase, PurchaseError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.item.id == id)
            .ok_or_else(|| PurchaseError::NotOffered(id.to_string()))?;
        let item = slot.item;
        if slot.purchased && !item.repeatable {
            return Err(PurchaseError::AlreadyPurchased(id.to_string()));
        }
        let cost = item.cost();
        if state.player_gold < cost {
            return Err(PurchaseError::InsufficientGold {
                cost,
                gold: state.player_gold,
            });
        }

        state.player_gold -= cost;
        let mut healed = 0.0;
        if let Some(heal) = item.on_purchase_heal {
            healed = state.heal_player(heal as f64);
            state.total_healing_done += healed as u64;
        }
        if !item.repeatable {
            state.owned_items.push(item);
            state.player_attack_count += item.mods.bonus_attack_count;
            state.refresh_player_max_health(tuning);
            slot.purchased = true;
        }

        state.emit(GameEvent::ItemPurchased { item_id: item.id });
        state.emit_gold();
        state.emit_health();
        log::info!("Bought {} for {} gold ({} left)", item.name, cost, state.player_gold);
        Ok(Purchase { item, cost, healed })
    }
}
