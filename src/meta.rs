//! Cross-run progress and achievements
//!
//! Counters survive every run and feed six tiered achievements. Persisted
//! through [`crate::persistence`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Achievement tier, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Bronze, Tier::Silver, Tier::Gold, Tier::Platinum];

    pub fn name(&self) -> &'static str {
        match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
        }
    }

    /// Display color (hex)
    pub fn color(&self) -> &'static str {
        match self {
            Tier::Bronze => "#cd7f32",
            Tier::Silver => "#c0c0c0",
            Tier::Gold => "#ffd700",
            Tier::Platinum => "#e5e4e2",
        }
    }
}

/// A tiered achievement
#[derive(Debug, Clone, Copy)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Progress needed for each tier, Bronze to Platinum
    pub thresholds: [u64; 4],
    pub progress: fn(&MetaProgress) -> u64,
}

impl Achievement {
    /// Highest tier reached for a progress value
    pub fn tier_for(&self, progress: u64) -> Option<Tier> {
        self.thresholds
            .iter()
            .zip(Tier::ALL)
            .filter(|(threshold, _)| progress >= **threshold)
            .map(|(_, tier)| tier)
            .last()
    }
}

pub static ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: "boss_slayer",
        title: "Boss Slayer",
        description: "Defeat bosses over all runs",
        thresholds: [10, 25, 50, 100],
        progress: |m| m.bosses_defeated as u64,
    },
    Achievement {
        id: "victor",
        title: "Victories",
        description: "Complete a full run (reach Level 100)",
        thresholds: [1, 3, 10, 25],
        progress: |m| m.wins as u64,
    },
    Achievement {
        id: "gold_digger",
        title: "Gold Collector",
        description: "Accumulate gold across all runs",
        thresholds: [500, 2000, 10000, 50000],
        progress: |m| m.total_gold_earned,
    },
    Achievement {
        id: "click_master",
        title: "Relentless Clicker",
        description: "Click total tiles across all runs",
        thresholds: [500, 2000, 8000, 25000],
        progress: |m| m.total_tiles_clicked,
    },
    Achievement {
        id: "heavy_hitter",
        title: "Heavy Hitter",
        description: "Deal total damage across all runs",
        thresholds: [2000, 10000, 50000, 200000],
        progress: |m| m.total_damage_dealt_all_runs,
    },
    Achievement {
        id: "survivor",
        title: "Survivor",
        description: "Total damage taken across all runs (you lived!)",
        thresholds: [2000, 10000, 50000, 200000],
        progress: |m| m.total_damage_taken_all_runs,
    },
];

/// One achievement as a front end lists it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementView {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub progress: u64,
    pub thresholds: [u64; 4],
    pub tier: Option<Tier>,
    /// Hex color of the unlocked tier
    pub tier_color: Option<&'static str>,
}

/// Counters kept across runs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MetaProgress {
    pub wins: u32,
    pub runs_started: u32,
    pub bosses_defeated: u32,
    pub highest_level: u32,
    pub total_gold_earned: u64,
    pub total_damage_dealt_all_runs: u64,
    pub total_damage_taken_all_runs: u64,
    pub total_tiles_clicked: u64,
    /// Highest tier unlocked per achievement id
    pub achievement_tiers: BTreeMap<String, Tier>,
}

impl MetaProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one simulation event into the counters. Returns true if anything changed.
    pub fn record(&mut self, event: &GameEvent) -> bool {
        match *event {
            GameEvent::RunStarted => self.runs_started += 1,
            GameEvent::RunCompleted => self.wins += 1,
            GameEvent::BossDefeated => self.bosses_defeated += 1,
            GameEvent::TileRevealed { .. } => self.total_tiles_clicked += 1,
            GameEvent::GoldEarned { amount } => self.total_gold_earned += amount as u64,
            GameEvent::DamageDealt { amount } => self.total_damage_dealt_all_runs += amount as u64,
            GameEvent::DamageTaken { amount } => self.total_damage_taken_all_runs += amount as u64,
            GameEvent::LevelChanged { level } if level > self.highest_level => self.highest_level = level,
            _ => return false,
        }
        true
    }

    /// Every achievement with its progress and unlocked tier
    pub fn achievement_views(&self) -> Vec<AchievementView> {
        ACHIEVEMENTS
            .iter()
            .map(|achievement| {
                let tier = self.tier(achievement.id);
                AchievementView {
                    id: achievement.id,
                    title: achievement.title,
                    description: achievement.description,
                    progress: (achievement.progress)(self),
                    thresholds: achievement.thresholds,
                    tier,
                    tier_color: tier.map(|t| t.color()),
                }
            })
            .collect()
    }

    /// Current tier of an achievement, if any
    pub fn tier(&self, id: &str) -> Option<Tier> {
        self.achievement_tiers.get(id).copied()
    }

    /// Store newly reached tiers and report them as events
    pub fn check_unlocks(&mut self) -> Vec<GameEvent> {
        let mut unlocked = Vec::new();
        for achievement in ACHIEVEMENTS {
            let Some(tier) = achievement.tier_for((achievement.progress)(self)) else {
                continue;
            };
            if self.tier(achievement.id).is_some_and(|prev| prev >= tier) {
                continue;
            }
            self.achievement_tiers.insert(achievement.id.to_string(), tier);
            log::info!("Achievement unlocked: {} ({})", achievement.title, tier.name());
            unlocked.push(GameEvent::AchievementUnlocked {
                id: achievement.id,
                tier,
            });
        }
        unlocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn achievement(id: &str) -> &'static Achievement {
        ACHIEVEMENTS.iter().find(|a| a.id == id).unwrap()
    }

    #[test]
    fn test_tier_thresholds() {
        let bosses = achievement("boss_slayer");
        assert_eq!(bosses.tier_for(9), None);
        assert_eq!(bosses.tier_for(10), Some(Tier::Bronze));
        assert_eq!(bosses.tier_for(49), Some(Tier::Silver));
        assert_eq!(bosses.tier_for(50), Some(Tier::Gold));
        assert_eq!(bosses.tier_for(1000), Some(Tier::Platinum));
    }

    #[test]
    fn test_record_counts_events() {
        let mut meta = MetaProgress::new();
        meta.record(&GameEvent::RunStarted);
        meta.record(&GameEvent::GoldEarned { amount: 5 });
        meta.record(&GameEvent::GoldEarned { amount: 50 });
        meta.record(&GameEvent::DamageDealt { amount: 20 });
        meta.record(&GameEvent::LevelChanged { level: 7 });
        meta.record(&GameEvent::LevelChanged { level: 1 });
        assert!(!meta.record(&GameEvent::BossAppeared));

        assert_eq!(meta.runs_started, 1);
        assert_eq!(meta.total_gold_earned, 55);
        assert_eq!(meta.total_damage_dealt_all_runs, 20);
        assert_eq!(meta.highest_level, 7);
    }

    #[test]
    fn test_unlocks_fire_once_per_tier() {
        let mut meta = MetaProgress::new();
        meta.wins = 1;
        let first = meta.check_unlocks();
        assert_eq!(
            first,
            vec![GameEvent::AchievementUnlocked {
                id: "victor",
                tier: Tier::Bronze
            }]
        );
        assert!(meta.check_unlocks().is_empty());

        meta.wins = 3;
        meta.total_tiles_clicked = 2500;
        let second = meta.check_unlocks();
        assert_eq!(second.len(), 2);
        assert_eq!(meta.tier("victor"), Some(Tier::Silver));
        assert_eq!(meta.tier("click_master"), Some(Tier::Silver));
    }

    #[test]
    fn test_achievement_views() {
        let mut meta = MetaProgress::new();
        meta.bosses_defeated = 27;
        meta.check_unlocks();

        let views = meta.achievement_views();
        assert_eq!(views.len(), ACHIEVEMENTS.len());
        let bosses = views.iter().find(|v| v.id == "boss_slayer").unwrap();
        assert_eq!(bosses.progress, 27);
        assert_eq!(bosses.tier, Some(Tier::Silver));
        assert_eq!(bosses.tier_color, Some("#c0c0c0"));
        let wins = views.iter().find(|v| v.id == "victor").unwrap();
        assert_eq!(wins.tier, None);
        assert_eq!(wins.tier_color, None);

        let json = serde_json::to_value(bosses).unwrap();
        assert_eq!(json["tierColor"], "#c0c0c0");
        assert_eq!(json["tier"], "Silver");
    }

    #[test]
    fn test_serde_defaults_missing_fields() {
        let meta: MetaProgress = serde_json::from_str(r#"{"wins": 2, "achievementTiers": {"victor": "Bronze"}}"#).unwrap();
        assert_eq!(meta.wins, 2);
        assert_eq!(meta.runs_started, 0);
        assert_eq!(meta.tier("victor"), Some(Tier::Bronze));
    }
}
