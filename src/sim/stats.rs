//! Folds owned items into one flat stat block

use super::catalog::Item;
use crate::consts::BASE_REGEN_PER_ROUND;

/// Aggregated player modifiers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatBlock {
    pub bonus_damage: f64,
    pub bonus_hp: f64,
    pub damage_reduction: f64,
    pub heal_on_attack: f64,
    pub ignore_damage_chance: f64,
    pub regen_per_round: f64,
    pub combo_boost: f64,
    pub burn_damage: f64,
    pub extra_gold_per_tile: u32,
    pub extra_gold_tiles: u32,
    pub passive_gold_per_round: u32,
    pub bonus_attack_count: u32,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            bonus_damage: 0.0,
            bonus_hp: 0.0,
            damage_reduction: 0.0,
            heal_on_attack: 0.0,
            ignore_damage_chance: 0.0,
            regen_per_round: BASE_REGEN_PER_ROUND,
            combo_boost: 0.0,
            burn_damage: 0.0,
            extra_gold_per_tile: 0,
            extra_gold_tiles: 0,
            passive_gold_per_round: 0,
            bonus_attack_count: 0,
        }
    }
}

/// Sum every item's modifiers on top of the base stats.
///
/// Cheap enough to call on every click, so nothing is cached.
pub fn aggregate<'a, I>(items: I) -> StatBlock
where
    I: IntoIterator<Item = &'a Item>,
{
    items.into_iter().fold(StatBlock::default(), |mut s, item| {
        let m = &item.mods;
        s.bonus_damage += m.bonus_damage;
        s.bonus_hp += m.bonus_hp;
        s.damage_reduction += m.damage_reduction;
        s.heal_on_attack += m.heal_on_attack;
        s.ignore_damage_chance += m.ignore_damage_chance;
        s.regen_per_round += m.regen_per_round;
        s.combo_boost += m.combo_boost;
        s.burn_damage += m.burn_damage;
        s.extra_gold_per_tile += m.extra_gold_per_tile;
        s.extra_gold_tiles += m.extra_gold_tiles;
        s.passive_gold_per_round += m.passive_gold_per_round;
        s.bonus_attack_count += m.bonus_attack_count;
        s
    })
}
