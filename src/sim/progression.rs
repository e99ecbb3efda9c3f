//! Level progression
//!
//! Level advancement, enemy scaling, boss levels and run resets.

use rand::Rng;

use super::grid::{GridLayout, build_grid};
use super::state::{GameEvent, GamePhase, RunState};
use crate::tuning::Tuning;

/// What clearing a level led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelClear {
    /// Gold granted for beating a boss
    pub boss_bonus: u32,
    /// Final level cleared outside endless mode
    pub run_completed: bool,
}

/// Every `boss_interval`-th level is a boss
pub fn is_boss_level(level: u32, tuning: &Tuning) -> bool {
    level % tuning.boss_interval == 0
}

/// Enemy HP step lands on levels 5, 15, 25, ...
pub fn gains_enemy_health(level: u32, tuning: &Tuning) -> bool {
    let offset = tuning.boss_interval / 2;
    level >= offset && (level - offset) % tuning.boss_interval == 0
}

/// Enemy damage step lands one level after each boss: 11, 21, 31, ...
pub fn gains_enemy_damage(level: u32, tuning: &Tuning) -> bool {
    level > tuning.boss_interval && (level - 1) % tuning.boss_interval == 0
}

/// Enemy max HP before the boss multiplier
pub fn enemy_base_max_health(state: &RunState, tuning: &Tuning) -> f64 {
    tuning.base_enemy_health + state.enemy_bonus_health as f64
}

/// Enemy max HP for the current level
pub fn enemy_max_health(state: &RunState, tuning: &Tuning) -> f64 {
    let base = enemy_base_max_health(state, tuning);
    if state.is_boss_level {
        base * tuning.boss_health_mult
    } else {
        base
    }
}

/// Enemy defeated: pay the boss bonus and decide between shop and run completion
pub fn on_enemy_defeated(state: &mut RunState, tuning: &Tuning) -> LevelClear {
    let mut boss_bonus = 0;
    if state.is_boss_level {
        boss_bonus = tuning.boss_gold_bonus;
        state.player_gold += boss_bonus;
        state.emit(GameEvent::BossDefeated);
        state.emit(GameEvent::GoldEarned { amount: boss_bonus });
        state.emit_gold();
    }

    let run_completed = !state.endless_mode && state.level >= tuning.final_level;
    state.game_over = true;
    state.emit(GameEvent::LevelCleared { won: true });
    if run_completed {
        state.phase = GamePhase::RunCompleted;
        state.emit(GameEvent::RunCompleted);
        log::info!("Run completed at level {}", state.level);
    } else {
        state.phase = GamePhase::LevelCleared;
        log::info!("Level {} cleared", state.level);
    }
    LevelClear {
        boss_bonus,
        run_completed,
    }
}

/// Player defeated with no revive left
pub fn on_player_defeated(state: &mut RunState) {
    state.game_over = true;
    state.phase = GamePhase::RunOver;
    state.emit(GameEvent::LevelCleared { won: false });
    state.emit(GameEvent::RunOver);
    log::info!(
        "Run over at level {} ({} dealt, {} taken)",
        state.level,
        state.total_damage_dealt,
        state.total_damage_taken
    );
}

/// Move the counters to the next level: one more enemy tile every level, one
/// more player tile on even levels
pub fn advance_level(state: &mut RunState) {
    state.level += 1;
    state.enemy_attack_count += 1;
    if state.level % 2 == 0 {
        state.player_attack_count += 1;
    }
}

/// Start the current level: scaling, health, passive gold, regen and a fresh grid
pub fn next_level<R: Rng + ?Sized>(state: &mut RunState, tuning: &Tuning, rng: &mut R) -> GridLayout {
    state.game_over = false;
    state.phase = GamePhase::Active;
    state.reset_combos();

    let stats = state.stats();
    if stats.passive_gold_per_round > 0 {
        state.player_gold += stats.passive_gold_per_round;
        state.emit(GameEvent::GoldEarned {
            amount: stats.passive_gold_per_round,
        });
    }

    state.is_boss_level = is_boss_level(state.level, tuning);
    if gains_enemy_health(state.level, tuning) {
        state.enemy_bonus_health += tuning.enemy_health_step;
    }
    if gains_enemy_damage(state.level, tuning) {
        state.enemy_bonus_damage += tuning.enemy_damage_step;
    }

    state.refresh_player_max_health(tuning);
    state.enemy_max_health = enemy_max_health(state, tuning);
    state.enemy_health = state.enemy_max_health;
    if state.is_boss_level {
        state.emit(GameEvent::BossAppeared);
        log::info!("Boss appears on level {} ({} HP)", state.level, state.enemy_max_health);
    }

    state.heal_player(stats.regen_per_round);

    let grid = build_grid(state, tuning, rng);
    let (cols, rows, level) = (grid.cols, grid.rows, state.level);
    state.emit(GameEvent::GridBuilt { cols, rows });
    state.emit(GameEvent::LevelChanged { level });
    state.emit_gold();
    state.emit_health();
    log::info!(
        "Level {} started: enemy {}/{} HP, +{} dmg, grid {}x{}",
        state.level,
        state.enemy_health,
        state.enemy_max_health,
        state.enemy_bonus_damage,
        cols,
        rows
    );
    grid
}

/// Put every run-scoped counter back to its base value
pub fn reset_run(state: &mut RunState, tuning: &Tuning) {
    let events = std::mem::take(&mut state.events);
    *state = RunState::new(tuning);
    state.events = events;
    state.emit_gold();
    state.emit_health();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::find;
    use crate::sim::rng::seeded;

    fn fresh() -> (RunState, Tuning) {
        let tuning = Tuning::default();
        (RunState::new(&tuning), tuning)
    }

    #[test]
    fn test_boss_levels() {
        let tuning = Tuning::default();
        assert!(!is_boss_level(1, &tuning));
        assert!(is_boss_level(10, &tuning));
        assert!(is_boss_level(100, &tuning));
        assert!(!is_boss_level(11, &tuning));
    }

    #[test]
    fn test_scaling_steps() {
        let tuning = Tuning::default();
        let hp: Vec<u32> = (1..=40).filter(|&l| gains_enemy_health(l, &tuning)).collect();
        assert_eq!(hp, vec![5, 15, 25, 35]);
        let dmg: Vec<u32> = (1..=40).filter(|&l| gains_enemy_damage(l, &tuning)).collect();
        assert_eq!(dmg, vec![11, 21, 31]);
    }

    #[test]
    fn test_advance_level_counts() {
        let (mut state, _) = fresh();
        advance_level(&mut state);
        assert_eq!(state.level, 2);
        assert_eq!(state.enemy_attack_count, 2);
        assert_eq!(state.player_attack_count, 11);
        advance_level(&mut state);
        assert_eq!(state.level, 3);
        assert_eq!(state.enemy_attack_count, 3);
        assert_eq!(state.player_attack_count, 11);
    }

    #[test]
    fn test_boss_health_is_exactly_one_and_a_half() {
        let (mut state, tuning) = fresh();
        state.level = 10;
        state.enemy_bonus_health = 25;
        let mut rng = seeded(4);
        next_level(&mut state, &tuning, &mut rng);
        assert!(state.is_boss_level);
        assert_eq!(state.enemy_max_health, 125.0 * 1.5);
        assert_eq!(state.enemy_health, 187.5);
        assert!(state.events.contains(&GameEvent::BossAppeared));
    }

    #[test]
    fn test_next_level_applies_scaling_once() {
        let (mut state, tuning) = fresh();
        let mut rng = seeded(5);
        state.level = 5;
        next_level(&mut state, &tuning, &mut rng);
        assert_eq!(state.enemy_bonus_health, 25);
        assert_eq!(state.enemy_max_health, 125.0);

        state.level = 11;
        next_level(&mut state, &tuning, &mut rng);
        assert_eq!(state.enemy_bonus_damage, 5);
        assert!(!state.is_boss_level);
    }

    #[test]
    fn test_next_level_regen_and_passive_gold() {
        let (mut state, tuning) = fresh();
        state.owned_items.push(find("streetTithe").unwrap());
        state.owned_items.push(find("lightArmor").unwrap());
        state.player_health = 50.0;
        state.player_combo = 1.8;
        let mut rng = seeded(6);
        next_level(&mut state, &tuning, &mut rng);
        assert_eq!(state.player_gold, 5);
        assert_eq!(state.player_health, 65.0);
        assert_eq!(state.player_combo, 1.0);
        assert_eq!(state.phase, GamePhase::Active);
    }

    #[test]
    fn test_enemy_defeat_on_boss_pays_bonus() {
        let (mut state, tuning) = fresh();
        state.level = 20;
        state.is_boss_level = true;
        let clear = on_enemy_defeated(&mut state, &tuning);
        assert_eq!(clear, LevelClear { boss_bonus: 50, run_completed: false });
        assert_eq!(state.player_gold, 50);
        assert_eq!(state.phase, GamePhase::LevelCleared);
    }

    #[test]
    fn test_final_level_completes_run_unless_endless() {
        let (mut state, tuning) = fresh();
        state.level = 100;
        state.is_boss_level = true;
        let clear = on_enemy_defeated(&mut state, &tuning);
        assert!(clear.run_completed);
        assert_eq!(state.phase, GamePhase::RunCompleted);

        let (mut state, tuning) = fresh();
        state.level = 110;
        state.endless_mode = true;
        assert!(!on_enemy_defeated(&mut state, &tuning).run_completed);
        assert_eq!(state.phase, GamePhase::LevelCleared);
    }

    #[test]
    fn test_reset_run_restores_base() {
        let (mut state, tuning) = fresh();
        state.level = 37;
        state.player_gold = 400;
        state.enemy_bonus_damage = 15;
        state.endless_mode = true;
        state.owned_items.push(find("godblade").unwrap());
        reset_run(&mut state, &tuning);
        assert_eq!(state.level, 1);
        assert_eq!(state.player_gold, 0);
        assert_eq!(state.enemy_bonus_damage, 0);
        assert!(!state.endless_mode);
        assert!(state.owned_items.is_empty());
        assert_eq!(state.player_attack_count, tuning.base_player_attack_count);
    }
}
