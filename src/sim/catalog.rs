//! Item catalog
//!
//! Every purchasable item as plain data. Behaviour is interpreted elsewhere
//! from which fields are set: numeric modifiers are folded by the stat
//! aggregator, and the special tags (`revive_at_percent`, `on_purchase_heal`,
//! `range`) are handled by name in combat, shop and grid code.

use serde::{Deserialize, Serialize};

/// Item rarity tier, ordered from most to least common
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "COMMON",
            Rarity::Rare => "RARE",
            Rarity::Epic => "EPIC",
            Rarity::Legendary => "LEGENDARY",
        }
    }

    /// Display color (hex)
    pub fn color(&self) -> &'static str {
        match self {
            Rarity::Common => "#4CAF50",
            Rarity::Rare => "#2196F3",
            Rarity::Epic => "#9C27B0",
            Rarity::Legendary => "#FFD700",
        }
    }

    /// Selection weight at level 0
    pub fn base_weight(&self) -> f64 {
        match self {
            Rarity::Common => 0.55,
            Rarity::Rare => 0.25,
            Rarity::Epic => 0.15,
            Rarity::Legendary => 0.05,
        }
    }

    /// Shop price in gold
    pub fn cost(&self) -> u32 {
        match self {
            Rarity::Common => 10,
            Rarity::Rare => 25,
            Rarity::Epic => 50,
            Rarity::Legendary => 100,
        }
    }
}

/// Numeric interval that guarantees player-attack tiles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeRange {
    pub min: u32,
    pub max: u32,
    /// How many tiles inside the interval are reserved
    pub count: u32,
}

impl SafeRange {
    pub fn contains(&self, number: u32) -> bool {
        (self.min..=self.max).contains(&number)
    }
}

/// Stat modifiers an item contributes while owned. Unset fields are zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Modifiers {
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

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        bonus_damage: 0.0,
        bonus_hp: 0.0,
        damage_reduction: 0.0,
        heal_on_attack: 0.0,
        ignore_damage_chance: 0.0,
        regen_per_round: 0.0,
        combo_boost: 0.0,
        burn_damage: 0.0,
        extra_gold_per_tile: 0,
        extra_gold_tiles: 0,
        passive_gold_per_round: 0,
        bonus_attack_count: 0,
    };
}

/// A catalog entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Item {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub mods: Modifiers,
    pub range: Option<SafeRange>,
    /// Fraction of max HP restored instead of dying (consumed on use)
    pub revive_at_percent: Option<f64>,
    /// HP restored immediately when bought
    pub on_purchase_heal: Option<u32>,
    /// Can be bought any number of times and never enters the inventory
    pub repeatable: bool,
}

impl Item {
    const fn new(id: &'static str, name: &'static str, description: &'static str, rarity: Rarity) -> Self {
        Self {
            id,
            name,
            description,
            rarity,
            mods: Modifiers::NONE,
            range: None,
            revive_at_percent: None,
            on_purchase_heal: None,
            repeatable: false,
        }
    }

    const fn damage(mut self, v: f64) -> Self {
        self.mods.bonus_damage = v;
        self
    }

    const fn hp(mut self, v: f64) -> Self {
        self.mods.bonus_hp = v;
        self
    }

    const fn armor(mut self, v: f64) -> Self {
        self.mods.damage_reduction = v;
        self
    }

    const fn lifesteal(mut self, v: f64) -> Self {
        self.mods.heal_on_attack = v;
        self
    }

    const fn dodge(mut self, v: f64) -> Self {
        self.mods.ignore_damage_chance = v;
        self
    }

    const fn regen(mut self, v: f64) -> Self {
        self.mods.regen_per_round = v;
        self
    }

    const fn combo(mut self, v: f64) -> Self {
        self.mods.combo_boost = v;
        self
    }

    const fn burn(mut self, v: f64) -> Self {
        self.mods.burn_damage = v;
        self
    }

    const fn gold_per_tile(mut self, v: u32) -> Self {
        self.mods.extra_gold_per_tile = v;
        self
    }

    const fn gold_tiles(mut self, v: u32) -> Self {
        self.mods.extra_gold_tiles = v;
        self
    }

    const fn passive_gold(mut self, v: u32) -> Self {
        self.mods.passive_gold_per_round = v;
        self
    }

    const fn attack_tiles(mut self, v: u32) -> Self {
        self.mods.bonus_attack_count = v;
        self
    }

    const fn safe_range(mut self, min: u32, max: u32, count: u32) -> Self {
        self.range = Some(SafeRange { min, max, count });
        self
    }

    const fn revive(mut self, pct: f64) -> Self {
        self.revive_at_percent = Some(pct);
        self
    }

    const fn potion(mut self, heal: u32) -> Self {
        self.on_purchase_heal = Some(heal);
        self.repeatable = true;
        self
    }

    /// Shop price in gold
    pub fn cost(&self) -> u32 {
        self.rarity.cost()
    }
}

use Rarity::{Common, Epic, Legendary, Rare};

/// Every item the shop can offer
pub static CATALOG: &[Item] = &[
    // Common
    Item::new("smallSword", "Small Sword", "Gain +1 Attack Square", Common).attack_tiles(1),
    Item::new("leatherShield", "Leather Shield", "+20 Max HP", Common).hp(20.0),
    Item::new("vitalLeaf", "Vital Leaf", "Heal +2 HP Per Attack Dealt", Common).lifesteal(2.0),
    Item::new("tinyRing", "Tiny Lucky Ring", "5% Chance To Ignore Damage", Common).dodge(0.05),
    Item::new("scoutGem", "Scout Gem", "1 Attack Number Between 35-40", Common).safe_range(35, 40, 1),
    Item::new("steadyBoots", "Steady Boots", "Take -3 Damage", Common).armor(3.0),
    Item::new("minorFocus", "Minor Focus", "Deal +5 Damage", Common).damage(5.0),
    Item::new("lightArmor", "Light Armor", "Heal +5 HP Per Round", Common).regen(5.0),
    Item::new("coinPouch", "Coin Pouch", "+1 Gold Per Square", Common).gold_per_tile(1),
    Item::new("minersMap", "Miner's Map", "+1 Gold Tiles", Common).gold_tiles(1),
    Item::new("streetTithe", "Street Tithe", "+5 Gold Per Level", Common).passive_gold(5),
    Item::new("comboCharm", "Combo Charm", "Increases Combo +0.1", Common).combo(0.1),
    Item::new("crudePotion", "Crude Potion", "Instantly heal 40 HP on purchase (repeatable)", Common).potion(40),
    Item::new("sturdyBuckle", "Sturdy Buckle", "+10 Max HP", Common).hp(10.0),
    Item::new("whetstone", "Whetstone", "Deal +3 Damage", Common).damage(3.0),
    Item::new("woolCloak", "Wool Cloak", "Take -2 Damage", Common).armor(2.0),
    Item::new("rabbitFoot", "Rabbit's Foot", "2% Chance To Ignore Damage", Common).dodge(0.02),
    Item::new("trailMap", "Trail Map", "1 Attack Number Between 28-32", Common).safe_range(28, 32, 1),
    Item::new("quickstep", "Quickstep Anklet", "Combo Gain +0.1", Common).combo(0.1),
    Item::new("sawbonesKit", "Sawbones Kit", "Heal +1 HP Per Attack Dealt", Common).lifesteal(1.0),
    Item::new("campRations", "Camp Rations", "Heal +4 HP Per Round", Common).regen(4.0),
    Item::new("tinderSpark", "Tinder Spark", "1 Burn Per Square", Common).burn(1.0),
    Item::new("purseStrings", "Purse Strings", "+1 Gold Per Square", Common).gold_per_tile(1),
    Item::new("scavengerSatchel", "Scavenger Satchel", "+1 Gold Tile", Common).gold_tiles(1),
    Item::new("streetTips", "Street Tips", "+3 Gold Per Level", Common).passive_gold(3),
    Item::new("practiceBlade", "Practice Blade", "Gain +1 Attack Square", Common).attack_tiles(1),
    Item::new("bandage", "Bandage", "Instantly heal 25 HP on purchase (repeatable)", Common).potion(25),
    Item::new("ironRations", "Iron Rations", "Instantly heal 35 HP on purchase (repeatable)", Common).potion(35),
    Item::new("barkShield", "Bark Shield", "+15 Max HP", Common).hp(15.0),
    Item::new("paddedVambrace", "Padded Vambrace", "Take -1 Damage", Common).armor(1.0),
    Item::new("clearMind", "Clear Mind", "Combo Gain +0.1", Common).combo(0.1),
    Item::new("luckyPenny", "Lucky Penny", "3% Chance To Ignore Damage", Common).dodge(0.03),
    Item::new("lantern", "Miner's Lantern", "1 Attack Number Between 41-45", Common).safe_range(41, 45, 1),
    Item::new("aloeSalve", "Aloe Salve", "Instantly heal 20 HP on purchase (repeatable)", Common).potion(20),
    Item::new("woodenHammer", "Wooden Hammer", "Deal +4 Damage", Common).damage(4.0),
    Item::new("corkCharm", "Cork Charm", "Take -1 Damage", Common).armor(1.0),
    Item::new("copperRing", "Copper Ring", "+1 Gold Per Square", Common).gold_per_tile(1),
    Item::new("gamblerToken", "Gambler's Token", "4% Chance To Ignore Damage", Common).dodge(0.04),
    Item::new("ashSmudge", "Ash Smudge", "1 Burn Per Square", Common).burn(1.0),
    Item::new("threadbareCloak", "Threadbare Cloak", "Heal +3 HP Per Round", Common).regen(3.0),
    Item::new("brightTally", "Bright Tally", "1 Attack Number Between 12-16", Common).safe_range(12, 16, 1),
    Item::new("tinyTonic", "Tiny Tonic", "Instantly heal 15 HP on purchase (repeatable)", Common).potion(15),
    Item::new("spareBlade", "Spare Blade", "Gain +1 Attack Square", Common).attack_tiles(1),
    Item::new("leadCharm", "Lead Charm", "Deal +2 Damage", Common).damage(2.0),
    // Rare
    Item::new("ironSword", "Iron Sword", "Gain +2 Attack Squares", Rare).attack_tiles(2),
    Item::new("ironShield", "Iron Shield", "+30 Max HP", Rare).hp(30.0),
    Item::new("luckyRing", "Lucky Ring", "10% Chance To Ignore Damage", Rare).dodge(0.1),
    Item::new("bloodCharm", "Blood Charm", "Heal +5 HP Per Attack Dealt", Rare).lifesteal(5.0),
    Item::new("radarGem", "Radar Gem", "1 Attack Number Between 20-25", Rare).safe_range(20, 25, 1),
    Item::new("strongBoots", "Strong Boots", "Take -5 Damage", Rare).armor(5.0),
    Item::new("huntersRing", "Treasure Hunter's Ring", "+2 Gold Per Square", Rare).gold_per_tile(2),
    Item::new("prospectorsPick", "Prospector's Pick", "+2 Gold Tiles", Rare).gold_tiles(2),
    Item::new("guildStipend", "Guild Stipend", "+7 Gold Per Level", Rare).passive_gold(7),
    Item::new("bronzeArmor", "Bronze Armor", "Heal +10 HP Per Round", Rare).regen(10.0),
    Item::new("flamePendant", "Flame Pendant", "Inflicts 1 Burn Per Square", Rare).burn(1.0),
    Item::new("lifeAmulet", "Life Amulet", "Revive Once With 25% HP", Rare).revive(0.25),
    Item::new("steelEdge", "Steel Edge", "Deal +8 Damage", Rare).damage(8.0),
    Item::new("soldierMail", "Soldier's Mail", "Take -6 Damage", Rare).armor(6.0),
    Item::new("vigorCharm", "Vigor Charm", "Heal +3 HP Per Attack Dealt", Rare).lifesteal(3.0),
    Item::new("eagleGem", "Eagle Gem", "1 Attack Number Between 18-22", Rare).safe_range(18, 22, 1),
    Item::new("guardianBand", "Guardian Band", "12% Chance To Ignore Damage", Rare).dodge(0.12),
    Item::new("warmCloak", "Warm Cloak", "Heal +8 HP Per Round", Rare).regen(8.0),
    Item::new("glowingBrand", "Glowing Brand", "2 Burn Per Square", Rare).burn(2.0),
    Item::new("duelistGrip", "Duelist's Grip", "Combo Gain +0.2", Rare).combo(0.2),
    Item::new("steelBrooch", "Steel Brooch", "+25 Max HP", Rare).hp(25.0),
    Item::new("silverPouch", "Silver Pouch", "+2 Gold Per Square", Rare).gold_per_tile(2),
    Item::new("townLedgers", "Town Ledgers", "+8 Gold Per Level", Rare).passive_gold(8),
    Item::new("tealCompass", "Teal Compass", "+2 Gold Tiles", Rare).gold_tiles(2),
    Item::new("secondWind", "Second Wind", "Instantly heal 55 HP on purchase (repeatable)", Rare).potion(55),
    Item::new("honedEdge", "Honed Edge", "Gain +2 Attack Squares", Rare).attack_tiles(2),
    Item::new("riverStone", "River Stone", "Take -4 Damage", Rare).armor(4.0),
    Item::new("hunterSigil", "Hunter's Sigil", "1 Attack Number Between 22-26", Rare).safe_range(22, 26, 1),
    Item::new("amberRing", "Amber Ring", "Combo Gain +0.2", Rare).combo(0.2),
    Item::new("emberVial", "Ember Vial", "Instantly heal 25 HP on purchase (repeatable)", Rare).potion(25),
    Item::new("scoutCharm", "Scout's Charm", "+20 Max HP & Heal +5/round", Rare).hp(20.0).regen(5.0),
    Item::new("strikeBelt", "Strike Belt", "Deal +6 Damage & +0.1 Combo", Rare).damage(6.0).combo(0.1),
    // Epic
    Item::new("crystalSword", "Crystal Sword", "Gain +5 Attack Squares", Epic).attack_tiles(5),
    Item::new("holyCharm", "Holy Charm", "Heal +8 HP Per Attack Dealt", Epic).lifesteal(8.0),
    Item::new("divineRadar", "Divine Radar", "2 Attack Numbers Between 10-15", Epic).safe_range(10, 15, 2),
    Item::new("adamantArmor", "Adamant Armor", "Take -10 Damage", Epic).armor(10.0),
    Item::new("focusTalisman", "Focus Talisman", "Deal +10 Damage", Epic).damage(10.0),
    Item::new("fireBrand", "Firebrand", "Combo Gain +0.2 And 2 Burn per Square", Epic).combo(0.2).burn(2.0),
    Item::new("goldenTouch", "Golden Touch", "+3 Gold Per Square", Epic).gold_per_tile(3),
    Item::new("royalCharter", "Royal Charter", "+10 Gold Per Level", Epic).passive_gold(10),
    Item::new("gildedCompass", "Gilded Compass", "+3 Gold Tiles", Epic).gold_tiles(3),
    Item::new("swiftCharm", "Swift Charm", "Gain +1 Attack Square & +0.1 Combo Gain", Epic).attack_tiles(1).combo(0.1),
    Item::new("runedBlade", "Runed Blade", "Gain +3 Attack Squares & +8 Damage", Epic).attack_tiles(3).damage(8.0),
    Item::new("titanPlate", "Titan Plate", "Take -12 Damage", Epic).armor(12.0),
    Item::new("vampTalisman", "Vampiric Talisman", "Heal +10 HP Per Attack Dealt", Epic).lifesteal(10.0),
    Item::new("seerStone", "Seer Stone", "2 Attack Numbers Between 8-12", Epic).safe_range(8, 12, 2),
    Item::new("stormBand", "Storm Band", "Combo Gain +0.3", Epic).combo(0.3),
    Item::new("pyreHeart", "Pyre Heart", "3 Burn Per Square", Epic).burn(3.0),
    Item::new("kingsPurse", "King's Purse", "+4 Gold Per Square", Epic).gold_per_tile(4),
    Item::new("royalDecree", "Royal Decree", "+12 Gold Per Level", Epic).passive_gold(12),
    Item::new("orienteerKit", "Orienteer Kit", "+4 Gold Tiles", Epic).gold_tiles(4),
    Item::new("ironWill", "Iron Will", "+40 Max HP & Heal +8/round", Epic).hp(40.0).regen(8.0),
    // Legendary
    Item::new("phoenixHeart", "Phoenix Heart", "Revive Once With 100% HP", Legendary).revive(1.0),
    Item::new("infernoSoul", "Inferno Soul", "Combo Gain +0.3 And 3 Burn Per Square", Legendary).combo(0.3).burn(3.0),
    Item::new("godblade", "Godblade", "Gain +5 Attack Squares, Deal +10 Damage", Legendary).attack_tiles(5).damage(10.0),
    Item::new("omnigem", "Omni Gem", "5 Attack Numbers Between 1-10", Legendary).safe_range(1, 10, 5),
    Item::new("heavySword", "Heavy Sword", "Combo Gain +0.5", Legendary).combo(0.5),
    Item::new("emberCore", "Ember Core", "5 Burn Per Square", Legendary).burn(5.0),
    Item::new("dragonsHoard", "Dragon's Hoard", "+5 Gold Per Square & +2 Gold Tiles", Legendary).gold_per_tile(5).gold_tiles(2),
    Item::new("ancientBank", "Bank of the Ancients", "+20 Gold Per Level", Legendary).passive_gold(20),
    Item::new("secondLife", "Second Life", "Revive Once With 50% HP", Legendary).revive(0.5),
    Item::new("blazingCrown", "Blazing Crown", "4 Burn Per Square & +0.2 Combo", Legendary).burn(4.0).combo(0.2),
    Item::new("warDrum", "War Drum", "Gain +4 Attack Squares", Legendary).attack_tiles(4),
    Item::new("goldenSceptre", "Golden Sceptre", "+6 Gold Per Square & +2 Gold Tiles", Legendary).gold_per_tile(6).gold_tiles(2),
    Item::new("colossusHeart", "Colossus Heart", "+80 Max HP & Heal +12/round", Legendary).hp(80.0).regen(12.0),
];

/// Look up a catalog entry by id
pub fn find(id: &str) -> Option<&'static Item> {
    CATALOG.iter().find(|item| item.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<&str> = CATALOG.iter().map(|i| i.id).collect();
        assert_eq!(ids.len(), CATALOG.len());
    }

    #[test]
    fn test_find_by_id() {
        let item = find("phoenixHeart").expect("phoenix heart in catalog");
        assert_eq!(item.rarity, Rarity::Legendary);
        assert_eq!(item.revive_at_percent, Some(1.0));
        assert!(find("noSuchItem").is_none());
    }

    #[test]
    fn test_potions_are_repeatable() {
        for item in CATALOG.iter().filter(|i| i.on_purchase_heal.is_some()) {
            assert!(item.repeatable, "{} should be repeatable", item.id);
            assert_eq!(item.mods, Modifiers::NONE);
        }
    }

    #[test]
    fn test_combined_modifiers() {
        let item = find("runedBlade").unwrap();
        assert_eq!(item.mods.bonus_attack_count, 3);
        assert_eq!(item.mods.bonus_damage, 8.0);
        let omni = find("omnigem").unwrap();
        assert_eq!(omni.range, Some(SafeRange { min: 1, max: 10, count: 5 }));
    }

    #[test]
    fn test_rarity_order_and_cost() {
        assert!(Rarity::Common < Rarity::Legendary);
        let costs: Vec<u32> = Rarity::ALL.iter().map(|r| r.cost()).collect();
        assert_eq!(costs, vec![10, 25, 50, 100]);
        let total: f64 = Rarity::ALL.iter().map(|r| r.base_weight()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
