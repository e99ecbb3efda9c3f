//! Combat resolution
//!
//! Attacks, burn ticks, revives and the win/loss check. All functions mutate
//! the run state in place and queue the matching events.

use rand::Rng;

use super::catalog::Item;
use super::rng::chance;
use super::state::{GameEvent, PopupKind, RunState, Side};
use super::stats::StatBlock;
use crate::js_round;
use crate::tuning::Tuning;

/// Result of a single attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackOutcome {
    /// Damage landed (possibly zero after reduction)
    Hit { damage: u32, healed: u32 },
    /// Dodged through `ignore_damage_chance`
    Miss,
}

/// Result of the death check after a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathOutcome {
    /// Both sides still standing
    Ongoing,
    /// Enemy reached zero health
    PlayerWon,
    /// Player reached zero health and had no revive left
    PlayerLost,
}

/// Damage the player deals with the current combo
pub fn player_damage(state: &RunState, stats: &StatBlock, tuning: &Tuning) -> u32 {
    js_round((tuning.base_player_damage + stats.bonus_damage) * state.player_combo).max(0.0) as u32
}

/// Damage the enemy deals after reduction, before the dodge roll
pub fn enemy_damage(state: &RunState, stats: &StatBlock, tuning: &Tuning) -> u32 {
    let boss_mult = if state.is_boss_level { tuning.boss_damage_mult } else { 1.0 };
    let base = (tuning.base_enemy_damage + state.enemy_bonus_damage as f64) * boss_mult;
    (js_round(base * state.enemy_combo) - js_round(stats.damage_reduction)).max(0.0) as u32
}

/// Player attack tile: hit the enemy, heal-on-attack, grow the player combo
pub fn resolve_player_attack(state: &mut RunState, stats: &StatBlock, tuning: &Tuning) -> AttackOutcome {
    let damage = player_damage(state, stats, tuning);
    state.damage_enemy(damage as f64);
    state.total_damage_dealt += damage as u64;
    state.emit(GameEvent::AttackPlayed { side: Side::Player });
    state.emit(GameEvent::DamageDealt { amount: damage });

    let mut healed = 0;
    if stats.heal_on_attack > 0.0 {
        healed = js_round(stats.heal_on_attack) as u32;
        state.heal_player(healed as f64);
        state.total_healing_done += healed as u64;
        state.popup(PopupKind::Heal, format!("+{}", healed), Side::Player);
    }
    state.popup(PopupKind::Damage, format!("-{}", damage), Side::Enemy);

    state.player_combo = (state.player_combo + tuning.combo_step + stats.combo_boost).min(tuning.max_combo);
    state.enemy_combo = 1.0;
    state.emit_combos();
    state.emit_health();

    log::debug!("Player hits for {} (combo now {:.1})", damage, state.player_combo);
    AttackOutcome::Hit { damage, healed }
}

/// Enemy attack tile: roll the dodge, then hurt the player and grow the enemy combo
pub fn resolve_enemy_attack<R: Rng + ?Sized>(
    state: &mut RunState,
    stats: &StatBlock,
    tuning: &Tuning,
    rng: &mut R,
) -> AttackOutcome {
    let damage = enemy_damage(state, stats, tuning);
    state.emit(GameEvent::AttackPlayed { side: Side::Enemy });

    if chance(rng, stats.ignore_damage_chance) {
        state.popup(PopupKind::Miss, "MISS", Side::Player);
        log::debug!("Enemy attack dodged");
        return AttackOutcome::Miss;
    }

    state.damage_player(damage as f64);
    state.total_damage_taken += damage as u64;
    state.emit(GameEvent::DamageTaken { amount: damage });
    state.popup(PopupKind::Damage, format!("-{}", damage), Side::Player);

    state.enemy_combo = (state.enemy_combo + tuning.combo_step).min(tuning.max_combo);
    state.player_combo = 1.0;
    state.emit_combos();
    state.emit_health();

    log::debug!("Enemy hits for {} (combo now {:.1})", damage, state.enemy_combo);
    AttackOutcome::Hit { damage, healed: 0 }
}

/// Flat burn damage applied after every click. Returns the damage dealt.
pub fn apply_burn(state: &mut RunState, stats: &StatBlock) -> Option<u32> {
    if stats.burn_damage <= 0.0 || state.enemy_health <= 0.0 {
        return None;
    }
    let burn = js_round(stats.burn_damage) as u32;
    state.damage_enemy(burn as f64);
    state.total_damage_dealt += burn as u64;
    state.emit(GameEvent::DamageDealt { amount: burn });
    state.popup(PopupKind::Damage, format!("-{}", burn), Side::Enemy);
    state.emit_health();
    Some(burn)
}

/// Consume the first revive item in the inventory, if any
pub fn try_revive(state: &mut RunState) -> Option<&'static Item> {
    let idx = state
        .owned_items
        .iter()
        .position(|item| item.revive_at_percent.is_some())?;
    let item = state.owned_items.remove(idx);
    let pct = item.revive_at_percent.unwrap_or(0.0);

    state.player_health = (state.player_max_health * pct).floor();
    state.revives_used += 1;
    state.emit(GameEvent::ItemActivated {
        item_id: item.id,
        name: item.name,
    });
    state.emit_health();
    log::info!("{} activated, revived at {} HP", item.name, state.player_health);
    Some(item)
}

/// Decide whether the click ended the level.
///
/// The player gets one revive attempt first. If both sides are at zero after
/// that, the player loses.
pub fn resolve_deaths(state: &mut RunState) -> DeathOutcome {
    if state.game_over {
        return DeathOutcome::Ongoing;
    }

    if state.player_health <= 0.0 {
        try_revive(state);
    }

    if state.player_health <= 0.0 {
        state.player_health = 0.0;
        state.game_over = true;
        return DeathOutcome::PlayerLost;
    }
    if state.enemy_health <= 0.0 {
        state.enemy_health = 0.0;
        state.game_over = true;
        return DeathOutcome::PlayerWon;
    }
    DeathOutcome::Ongoing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::find;
    use crate::sim::rng::seeded;
    use crate::sim::stats::aggregate;
    use proptest::prelude::*;

    fn fresh() -> (RunState, Tuning) {
        let tuning = Tuning::default();
        (RunState::new(&tuning), tuning)
    }

    #[test]
    fn test_player_attack_example() {
        let (mut state, tuning) = fresh();
        let stats = state.stats();
        let outcome = resolve_player_attack(&mut state, &stats, &tuning);
        assert_eq!(outcome, AttackOutcome::Hit { damage: 20, healed: 0 });
        assert_eq!(state.enemy_health, 80.0);
        assert!((state.player_combo - 1.2).abs() < 1e-9);
        assert_eq!(state.enemy_combo, 1.0);
        assert_eq!(state.total_damage_dealt, 20);
    }

    #[test]
    fn test_enemy_attack_example() {
        let (mut state, tuning) = fresh();
        let stats = state.stats();
        let mut rng = seeded(1);
        state.player_combo = 1.6;
        let outcome = resolve_enemy_attack(&mut state, &stats, &tuning, &mut rng);
        assert_eq!(outcome, AttackOutcome::Hit { damage: 10, healed: 0 });
        assert_eq!(state.player_health, 90.0);
        assert_eq!(state.player_combo, 1.0);
        assert!((state.enemy_combo - 1.2).abs() < 1e-9);
        assert_eq!(state.total_damage_taken, 10);
    }

    #[test]
    fn test_combo_boost_and_bonus_damage() {
        let (mut state, tuning) = fresh();
        state.owned_items.push(find("strikeBelt").unwrap());
        let stats = state.stats();
        resolve_player_attack(&mut state, &stats, &tuning);
        assert_eq!(state.enemy_health, 74.0);
        assert!((state.player_combo - 1.3).abs() < 1e-9);
        // (20 + 6) * 1.3 = 33.8 -> 34
        resolve_player_attack(&mut state, &stats, &tuning);
        assert_eq!(state.enemy_health, 40.0);
    }

    #[test]
    fn test_combo_caps_at_max() {
        let (mut state, tuning) = fresh();
        state.enemy_health = 10_000.0;
        state.enemy_max_health = 10_000.0;
        state.owned_items.push(find("heavySword").unwrap());
        let stats = state.stats();
        for _ in 0..8 {
            resolve_player_attack(&mut state, &stats, &tuning);
        }
        assert_eq!(state.player_combo, tuning.max_combo);
    }

    #[test]
    fn test_heal_on_attack_caps_and_counts() {
        let (mut state, tuning) = fresh();
        state.player_health = 97.0;
        state.owned_items.push(find("bloodCharm").unwrap());
        let stats = state.stats();
        let outcome = resolve_player_attack(&mut state, &stats, &tuning);
        assert_eq!(outcome, AttackOutcome::Hit { damage: 20, healed: 5 });
        assert_eq!(state.player_health, 100.0);
        assert_eq!(state.total_healing_done, 5);
    }

    #[test]
    fn test_boss_damage_and_reduction() {
        let (mut state, tuning) = fresh();
        state.is_boss_level = true;
        state.enemy_bonus_damage = 5;
        state.enemy_combo = 1.2;
        state.owned_items.push(find("steadyBoots").unwrap());
        let stats = state.stats();
        // (10 + 5) * 2 * 1.2 = 36, minus 3
        assert_eq!(enemy_damage(&state, &stats, &tuning), 33);
    }

    #[test]
    fn test_reduction_never_heals() {
        let (mut state, tuning) = fresh();
        state.owned_items.push(find("titanPlate").unwrap());
        let stats = state.stats();
        let mut rng = seeded(2);
        resolve_enemy_attack(&mut state, &stats, &tuning, &mut rng);
        assert_eq!(state.player_health, 100.0);
        assert_eq!(state.total_damage_taken, 0);
    }

    #[test]
    fn test_guaranteed_dodge_is_a_clean_miss() {
        let (mut state, tuning) = fresh();
        state.enemy_combo = 1.4;
        state.player_combo = 1.6;
        let mut stats = state.stats();
        stats.ignore_damage_chance = 1.0;
        let mut rng = seeded(3);
        let outcome = resolve_enemy_attack(&mut state, &stats, &tuning, &mut rng);
        assert_eq!(outcome, AttackOutcome::Miss);
        assert_eq!(state.player_health, 100.0);
        assert_eq!(state.enemy_combo, 1.4);
        assert_eq!(state.player_combo, 1.6);
        assert!(state.events.iter().any(|e| matches!(
            e,
            GameEvent::Popup { kind: PopupKind::Miss, .. }
        )));
    }

    #[test]
    fn test_burn_only_while_enemy_alive() {
        let (mut state, _) = fresh();
        state.owned_items.push(find("pyreHeart").unwrap());
        let stats = state.stats();
        assert_eq!(apply_burn(&mut state, &stats), Some(3));
        assert_eq!(state.enemy_health, 97.0);
        state.enemy_health = 0.0;
        assert_eq!(apply_burn(&mut state, &stats), None);

        let no_burn = aggregate(std::iter::empty::<&Item>());
        state.enemy_health = 50.0;
        assert_eq!(apply_burn(&mut state, &no_burn), None);
    }

    #[test]
    fn test_revive_consumed_once() {
        let (mut state, _) = fresh();
        state.owned_items.push(find("minorFocus").unwrap());
        state.owned_items.push(find("lifeAmulet").unwrap());
        state.player_health = 0.0;

        assert_eq!(resolve_deaths(&mut state), DeathOutcome::Ongoing);
        assert_eq!(state.player_health, 25.0);
        assert_eq!(state.revives_used, 1);
        assert!(!state.owns("lifeAmulet"));
        assert!(state.owns("minorFocus"));

        state.player_health = 0.0;
        assert_eq!(resolve_deaths(&mut state), DeathOutcome::PlayerLost);
        assert!(state.game_over);
    }

    #[test]
    fn test_revive_uses_first_revive_item() {
        let (mut state, _) = fresh();
        state.owned_items.push(find("secondLife").unwrap());
        state.owned_items.push(find("phoenixHeart").unwrap());
        state.player_health = 0.0;
        let item = try_revive(&mut state).unwrap();
        assert_eq!(item.id, "secondLife");
        assert_eq!(state.player_health, 50.0);
        assert!(state.owns("phoenixHeart"));
    }

    #[test]
    fn test_tie_goes_to_enemy() {
        let (mut state, _) = fresh();
        state.player_health = 0.0;
        state.enemy_health = 0.0;
        assert_eq!(resolve_deaths(&mut state), DeathOutcome::PlayerLost);
    }

    #[test]
    fn test_revive_then_win_on_tie() {
        let (mut state, _) = fresh();
        state.owned_items.push(find("phoenixHeart").unwrap());
        state.player_health = 0.0;
        state.enemy_health = 0.0;
        assert_eq!(resolve_deaths(&mut state), DeathOutcome::PlayerWon);
        assert_eq!(state.player_health, 100.0);
    }

    #[test]
    fn test_resolve_deaths_noop_after_game_over() {
        let (mut state, _) = fresh();
        state.enemy_health = 0.0;
        assert_eq!(resolve_deaths(&mut state), DeathOutcome::PlayerWon);
        assert_eq!(resolve_deaths(&mut state), DeathOutcome::Ongoing);
    }

    proptest! {
        #[test]
        fn prop_health_and_combo_bounds(
            seed in any::<u64>(),
            moves in proptest::collection::vec(0u8..3, 1..60),
            items in proptest::collection::vec(0usize..110, 0..6),
        ) {
            let (mut state, tuning) = fresh();
            for idx in items {
                let item = &crate::sim::catalog::CATALOG[idx % crate::sim::catalog::CATALOG.len()];
                if !item.repeatable {
                    state.owned_items.push(item);
                }
            }
            state.refresh_player_max_health(&tuning);
            let stats = state.stats();
            let mut rng = seeded(seed);
            for m in moves {
                match m {
                    0 => { resolve_player_attack(&mut state, &stats, &tuning); }
                    1 => { resolve_enemy_attack(&mut state, &stats, &tuning, &mut rng); }
                    _ => { apply_burn(&mut state, &stats); }
                }
                prop_assert!(state.enemy_health >= 0.0 && state.enemy_health <= state.enemy_max_health);
                prop_assert!(state.player_health >= 0.0 && state.player_health <= state.player_max_health);
                prop_assert!(state.player_combo >= 1.0 && state.player_combo <= tuning.max_combo);
                prop_assert!(state.enemy_combo >= 1.0 && state.enemy_combo <= tuning.max_combo);
            }
        }
    }
}
