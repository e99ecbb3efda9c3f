//! wasm-bindgen facade
//!
//! The page's script drives the game through [`WebGame`]. Every input method
//! returns the resulting events as a JSON array, tagged by `type`.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use super::LocalStore;
use crate::game::{Game, Input};
use crate::persistence::RunSnapshot;
use crate::sim::GameEvent;
use crate::tuning::Tuning;

/// Shop slot as the page renders it
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SlotView {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    rarity: &'static str,
    color: &'static str,
    cost: u32,
    purchased: bool,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::warn!("Could not serialize for the page: {}", e);
        "null".to_string()
    })
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game,
}

#[wasm_bindgen]
impl WebGame {
    /// Seeded from the clock; tuning overrides come from LocalStorage
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebGame {
        let store = LocalStore;
        let tuning = Tuning::load(&store);
        let seed = js_sys::Date::now() as u64;
        log::info!("Grid Duel starting (seed {})", seed);
        WebGame {
            game: Game::new(seed, tuning, Box::new(store)),
        }
    }

    pub fn start(&mut self) -> String {
        events_json(&self.game.start())
    }

    pub fn click(&mut self, number: u32) -> String {
        self.input(Input::TileClicked(number))
    }

    pub fn purchase(&mut self, id: &str) -> String {
        self.input(Input::PurchaseRequested(id.to_string()))
    }

    #[wasm_bindgen(js_name = continueRun)]
    pub fn continue_run(&mut self) -> String {
        self.input(Input::ContinueRequested)
    }

    #[wasm_bindgen(js_name = continueEndless)]
    pub fn continue_endless(&mut self) -> String {
        self.input(Input::ContinueEndlessRequested)
    }

    #[wasm_bindgen(js_name = newRun)]
    pub fn new_run(&mut self) -> String {
        self.input(Input::NewRunRequested)
    }

    pub fn retry(&mut self) -> String {
        self.input(Input::RetryRequested)
    }

    #[wasm_bindgen(js_name = resetToMenu)]
    pub fn reset_to_menu(&mut self) -> String {
        self.input(Input::ResetToMenuRequested)
    }

    #[wasm_bindgen(js_name = togglePause)]
    pub fn toggle_pause(&mut self) -> String {
        self.input(Input::PauseToggled)
    }

    /// Current run as a flat snapshot
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> String {
        to_json(&RunSnapshot::from_state(self.game.state()))
    }

    #[wasm_bindgen(js_name = gridJson)]
    pub fn grid_json(&self) -> String {
        to_json(self.game.grid())
    }

    #[wasm_bindgen(js_name = shopJson)]
    pub fn shop_json(&self) -> String {
        let slots: Vec<SlotView> = self
            .game
            .shop()
            .slots
            .iter()
            .map(|slot| SlotView {
                id: slot.item.id,
                name: slot.item.name,
                description: slot.item.description,
                rarity: slot.item.rarity.as_str(),
                color: slot.item.rarity.color(),
                cost: slot.item.cost(),
                purchased: slot.purchased,
            })
            .collect();
        to_json(&slots)
    }

    #[wasm_bindgen(js_name = metaJson)]
    pub fn meta_json(&self) -> String {
        to_json(self.game.meta())
    }

    /// Achievement list with progress and tier colors
    #[wasm_bindgen(js_name = achievementsJson)]
    pub fn achievements_json(&self) -> String {
        to_json(&self.game.meta().achievement_views())
    }
}

impl WebGame {
    fn input(&mut self, input: Input) -> String {
        events_json(&self.game.handle(input))
    }
}

impl Default for WebGame {
    fn default() -> Self {
        Self::new()
    }
}

fn events_json(events: &[GameEvent]) -> String {
    to_json(events)
}
