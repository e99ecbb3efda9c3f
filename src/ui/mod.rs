//! Presentation boundary
//!
//! The simulation never draws anything. Front ends implement [`Presenter`]
//! and receive the drained event list through [`dispatch`].

use crate::meta::{ACHIEVEMENTS, Tier};
use crate::sim::catalog::find;
use crate::sim::state::{GameEvent, GamePhase, PopupKind, Side};

/// Render/notify callbacks. Every method defaults to doing nothing.
#[allow(unused_variables)]
pub trait Presenter {
    /// Health bars as percentages in [0, 100]
    fn health_changed(&mut self, player_pct: f64, enemy_pct: f64) {}
    fn gold_changed(&mut self, gold: u32) {}
    fn level_changed(&mut self, level: u32) {}
    fn popup(&mut self, kind: PopupKind, text: &str, side: Side) {}
    fn combo_changed(&mut self, side: Side, value: f64) {}
    fn boss_appeared(&mut self) {}
    fn level_cleared(&mut self, won: bool) {}
    fn run_over(&mut self) {}
    fn shop_offered(&mut self, items: &[&'static str]) {}
    fn run_completed(&mut self) {}
    /// A saved run was restored at `phase`
    fn run_resumed(&mut self, phase: GamePhase) {}
    fn attack_played(&mut self, side: Side) {}
    fn item_activated(&mut self, item_id: &str, name: &str) {}
    fn achievement_unlocked(&mut self, id: &str, tier: Tier) {}
    fn grid_built(&mut self, cols: u32, rows: u32) {}
}

/// Fan events out to the presenter, in order
pub fn dispatch<P: Presenter + ?Sized>(events: &[GameEvent], presenter: &mut P) {
    for event in events {
        match event {
            GameEvent::HealthChanged { player_pct, enemy_pct } => presenter.health_changed(*player_pct, *enemy_pct),
            GameEvent::GoldChanged { amount } => presenter.gold_changed(*amount),
            GameEvent::LevelChanged { level } => presenter.level_changed(*level),
            GameEvent::Popup { kind, text, side } => presenter.popup(*kind, text, *side),
            GameEvent::ComboChanged { side, value } => presenter.combo_changed(*side, *value),
            GameEvent::AttackPlayed { side } => presenter.attack_played(*side),
            GameEvent::BossAppeared => presenter.boss_appeared(),
            GameEvent::LevelCleared { won } => presenter.level_cleared(*won),
            GameEvent::RunOver => presenter.run_over(),
            GameEvent::RunCompleted => presenter.run_completed(),
            GameEvent::RunResumed { phase } => presenter.run_resumed(*phase),
            GameEvent::ShopOffered { items } => presenter.shop_offered(items),
            GameEvent::ItemActivated { item_id, name } => presenter.item_activated(item_id, name),
            GameEvent::GridBuilt { cols, rows } => presenter.grid_built(*cols, *rows),
            GameEvent::AchievementUnlocked { id, tier } => presenter.achievement_unlocked(id, *tier),
            // Bookkeeping events with no direct presentation
            GameEvent::RunStarted
            | GameEvent::ItemPurchased { .. }
            | GameEvent::TileRevealed { .. }
            | GameEvent::GoldEarned { .. }
            | GameEvent::DamageDealt { .. }
            | GameEvent::DamageTaken { .. }
            | GameEvent::BossDefeated => {}
        }
    }
}

/// Presenter that narrates milestones through the `log` facade
#[derive(Debug, Default)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn level_changed(&mut self, level: u32) {
        log::info!("== Level {} ==", level);
    }

    fn boss_appeared(&mut self) {
        log::info!("A boss blocks the way");
    }

    fn level_cleared(&mut self, won: bool) {
        if won {
            log::info!("Enemy defeated");
        }
    }

    fn run_over(&mut self) {
        log::info!("You were defeated");
    }

    fn run_completed(&mut self) {
        log::info!("Run complete!");
    }

    fn run_resumed(&mut self, phase: GamePhase) {
        log::info!("Resumed saved run ({:?})", phase);
    }

    fn shop_offered(&mut self, items: &[&'static str]) {
        let names: Vec<String> = items
            .iter()
            .filter_map(|id| find(id))
            .map(|item| format!("{} [{}, {}g]", item.name, item.rarity.as_str(), item.cost()))
            .collect();
        log::info!("Shop: {}", names.join(", "));
    }

    fn item_activated(&mut self, _item_id: &str, name: &str) {
        log::info!("{} activated", name);
    }

    fn achievement_unlocked(&mut self, id: &str, tier: Tier) {
        let title = ACHIEVEMENTS.iter().find(|a| a.id == id).map_or(id, |a| a.title);
        log::info!("Achievement unlocked: {} ({})", title, tier.name());
    }
}
