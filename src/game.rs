//! Session controller
//!
//! Owns the run, the board, the shop, cross-run progress and the save store.
//! The presentation layer feeds it [`Input`]s and renders the returned events.

use rand_pcg::Pcg32;

use crate::meta::MetaProgress;
use crate::persistence::{self, SavedRun};
use crate::platform::KeyValueStore;
use crate::sim::grid::{GridLayout, build_grid};
use crate::sim::progression::{advance_level, next_level, reset_run};
use crate::sim::rng::seeded;
use crate::sim::shop::ShopOffer;
use crate::sim::state::{GameEvent, GamePhase, RunState};
use crate::sim::tick::{click_tile, toggle_pause};
use crate::tuning::Tuning;

/// Player intents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Click the tile with this number
    TileClicked(u32),
    /// Buy an item from the current shop offer
    PurchaseRequested(String),
    /// Leave the shop for the next level
    ContinueRequested,
    /// Keep playing past the final level
    ContinueEndlessRequested,
    /// Abandon everything and start over from level 1
    NewRunRequested,
    /// Start over after losing
    RetryRequested,
    /// Drop the current run and its save
    ResetToMenuRequested,
    PauseToggled,
}

pub struct Game {
    state: RunState,
    grid: GridLayout,
    shop: ShopOffer,
    meta: MetaProgress,
    tuning: Tuning,
    rng: Pcg32,
    seed: u64,
    store: Box<dyn KeyValueStore>,
}

impl Game {
    /// Create a session sitting at the menu. Progress is loaded from `store`.
    pub fn new(seed: u64, tuning: Tuning, store: Box<dyn KeyValueStore>) -> Self {
        let meta = persistence::load_meta(store.as_ref());
        let mut state = RunState::new(&tuning);
        state.phase = GamePhase::Menu;
        let grid = GridLayout::blank(tuning.grid_cols, tuning.grid_rows);
        Self {
            state,
            grid,
            shop: ShopOffer::default(),
            meta,
            tuning,
            rng: seeded(seed),
            seed,
            store,
        }
    }

    /// Resume the saved run if there is one, otherwise start a new run
    pub fn start(&mut self) -> Vec<GameEvent> {
        match persistence::load_run(self.store.as_ref(), &self.tuning) {
            Some(saved) => self.resume(saved),
            None => self.begin_run(true),
        }
        self.finish()
    }

    /// Apply one input and return everything that happened
    pub fn handle(&mut self, input: Input) -> Vec<GameEvent> {
        match input {
            Input::TileClicked(number) => self.click(number),
            Input::PurchaseRequested(id) => self.purchase(&id),
            Input::ContinueRequested => {
                if self.state.phase == GamePhase::LevelCleared {
                    self.continue_run();
                }
            }
            Input::ContinueEndlessRequested => {
                if self.state.phase == GamePhase::RunCompleted {
                    self.state.endless_mode = true;
                    log::info!("Entering endless mode");
                    self.continue_run();
                }
            }
            Input::NewRunRequested => self.begin_run(true),
            Input::RetryRequested => {
                if self.state.phase == GamePhase::RunOver {
                    self.begin_run(false);
                }
            }
            Input::ResetToMenuRequested => self.reset_to_menu(),
            Input::PauseToggled => {
                toggle_pause(&mut self.state);
            }
        }
        self.finish()
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn grid(&self) -> &GridLayout {
        &self.grid
    }

    pub fn shop(&self) -> &ShopOffer {
        &self.shop
    }

    pub fn meta(&self) -> &MetaProgress {
        &self.meta
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn click(&mut self, number: u32) {
        let result = click_tile(&mut self.state, &mut self.grid, number, &self.tuning, &mut self.rng);
        if let Some(clear) = result.level_clear {
            if !clear.run_completed {
                self.open_shop();
            }
            self.autosave();
        } else if result.player_lost {
            self.autosave();
        }
    }

    fn purchase(&mut self, id: &str) {
        if self.state.phase != GamePhase::LevelCleared {
            return;
        }
        match self.shop.purchase(id, &mut self.state, &self.tuning) {
            Ok(_) => self.autosave(),
            Err(e) => log::debug!("Purchase refused: {}", e),
        }
    }

    fn open_shop(&mut self) {
        self.shop = ShopOffer::roll(&self.state, &self.tuning, &mut self.rng);
        let items = self.shop.item_ids();
        log::debug!("Shop offers {:?}", items);
        self.state.emit(GameEvent::ShopOffered { items });
    }

    fn continue_run(&mut self) {
        self.shop = ShopOffer::default();
        advance_level(&mut self.state);
        self.start_level();
    }

    fn begin_run(&mut self, counts_as_new: bool) {
        reset_run(&mut self.state, &self.tuning);
        self.shop = ShopOffer::default();
        if counts_as_new {
            self.state.emit(GameEvent::RunStarted);
            log::info!("New run started");
        }
        self.start_level();
    }

    fn start_level(&mut self) {
        self.grid = next_level(&mut self.state, &self.tuning, &mut self.rng);
        self.autosave();
    }

    /// Rebuild the transient pieces around a loaded run.
    ///
    /// Emits `RunResumed` rather than replaying terminal events, so a reload
    /// never counts a win or defeat twice.
    fn resume(&mut self, saved: SavedRun) {
        self.state = saved.state;
        self.shop = saved.shop;
        self.grid = build_grid(&self.state, &self.tuning, &mut self.rng);
        let (cols, rows, level) = (self.grid.cols, self.grid.rows, self.state.level);
        self.state.emit(GameEvent::GridBuilt { cols, rows });
        self.state.emit(GameEvent::LevelChanged { level });
        if self.state.is_boss_level {
            self.state.emit(GameEvent::BossAppeared);
        }
        self.state.emit_gold();
        self.state.emit_health();
        self.state.emit_combos();
        let phase = self.state.phase;
        self.state.emit(GameEvent::RunResumed { phase });
        if phase == GamePhase::LevelCleared {
            if self.shop.is_empty() {
                self.open_shop();
                self.autosave();
            } else {
                let items = self.shop.item_ids();
                self.state.emit(GameEvent::ShopOffered { items });
            }
        }
    }

    fn reset_to_menu(&mut self) {
        if let Err(e) = persistence::clear_run(self.store.as_mut()) {
            log::warn!("Could not clear saved run: {}", e);
        }
        reset_run(&mut self.state, &self.tuning);
        self.state.phase = GamePhase::Menu;
        self.shop = ShopOffer::default();
        self.grid = GridLayout::blank(self.tuning.grid_cols, self.tuning.grid_rows);
        log::info!("Returned to menu");
    }

    fn autosave(&mut self) {
        if let Err(e) = persistence::save_run(self.store.as_mut(), &self.state, &self.shop) {
            log::warn!("Run not saved: {}", e);
        }
    }

    /// Drain the simulation's events and fold them into cross-run progress
    fn finish(&mut self) -> Vec<GameEvent> {
        let mut events = self.state.drain_events();
        let mut changed = false;
        for event in &events {
            changed |= self.meta.record(event);
        }
        if changed {
            events.extend(self.meta.check_unlocks());
            if let Err(e) = persistence::save_meta(self.store.as_mut(), &self.meta) {
                log::warn!("Progress not saved: {}", e);
            }
        }
        events
    }
}
