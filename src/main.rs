//! Grid Duel entry point
//!
//! On the web this only installs logging; the page drives
//! [`grid_duel::platform::web::WebGame`]. Natively it runs a headless
//! autoplay demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Logger init failed: {}", e).into());
    }
    log::info!("Grid Duel (web) ready");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::path::PathBuf;

    use clap::Parser;
    use rand::Rng;
    use rand::seq::SliceRandom;

    use grid_duel::platform::MemoryStore;
    use grid_duel::sim::GamePhase;
    use grid_duel::ui::{LogPresenter, dispatch};
    use grid_duel::{Game, Input, Tuning};

    #[derive(Parser)]
    #[command(name = "grid-duel")]
    #[command(about = "Headless autoplay demo of the Grid Duel simulation")]
    #[command(version)]
    pub struct Args {
        /// RNG seed (random if omitted)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Stop after clearing this many levels
        #[arg(short, long, default_value_t = 10)]
        max_levels: u32,

        /// JSON file with balance overrides
        #[arg(short, long)]
        tuning: Option<PathBuf>,
    }

    fn load_tuning(path: Option<&PathBuf>) -> Tuning {
        let Some(path) = path else {
            return Tuning::default();
        };
        match std::fs::read_to_string(path) {
            Ok(json) => Tuning::from_json(&json),
            Err(e) => {
                log::warn!("Could not read {} ({}), using default tuning", path.display(), e);
                Tuning::default()
            }
        }
    }

    /// Buy the priciest affordable items, then a potion when below half health
    fn go_shopping(game: &mut Game, presenter: &mut LogPresenter) {
        loop {
            let gold = game.state().player_gold;
            let pick = game
                .shop()
                .slots
                .iter()
                .filter(|slot| !slot.purchased && !slot.item.repeatable && slot.item.cost() <= gold)
                .max_by_key(|slot| slot.item.cost())
                .map(|slot| slot.item.id.to_string());
            let Some(id) = pick else {
                break;
            };
            dispatch(&game.handle(Input::PurchaseRequested(id)), presenter);
        }

        let state = game.state();
        if state.player_health < state.player_max_health / 2.0 {
            let potion = game
                .shop()
                .slots
                .iter()
                .find(|slot| slot.item.repeatable && slot.item.cost() <= state.player_gold)
                .map(|slot| slot.item.id.to_string());
            if let Some(id) = potion {
                dispatch(&game.handle(Input::PurchaseRequested(id)), presenter);
            }
        }
    }

    pub fn run() {
        let args = Args::parse();
        let seed = args.seed.unwrap_or_else(|| rand::rng().random());
        let tuning = load_tuning(args.tuning.as_ref());
        log::info!("Grid Duel (native) starting with seed {}", seed);

        let mut game = Game::new(seed, tuning, Box::new(MemoryStore::new()));
        let mut presenter = LogPresenter;
        // Separate stream so the bot never perturbs the game's RNG
        let mut bot_rng = grid_duel::sim::rng::seeded(seed ^ 0x9E37_79B9_7F4A_7C15);
        dispatch(&game.start(), &mut presenter);

        let mut cleared = 0;
        loop {
            match game.phase() {
                GamePhase::Active => {
                    let mut order: Vec<u32> = (1..=game.grid().total_cells()).collect();
                    order.shuffle(&mut bot_rng);
                    for n in order {
                        dispatch(&game.handle(Input::TileClicked(n)), &mut presenter);
                        if game.phase() != GamePhase::Active {
                            break;
                        }
                    }
                    // Every tile clicked and both sides still standing
                    if game.phase() == GamePhase::Active {
                        log::warn!("Board exhausted on level {}", game.state().level);
                        break;
                    }
                }
                GamePhase::LevelCleared => {
                    cleared += 1;
                    if cleared >= args.max_levels {
                        break;
                    }
                    go_shopping(&mut game, &mut presenter);
                    dispatch(&game.handle(Input::ContinueRequested), &mut presenter);
                }
                _ => break,
            }
        }

        let state = game.state();
        let summary = [
            ("Seed", game.seed().to_string()),
            ("Level", state.level.to_string()),
            ("Outcome", format!("{:?}", state.phase)),
            ("Health", format!("{}/{}", state.player_health, state.player_max_health)),
            ("Gold", state.player_gold.to_string()),
            ("Items", state.owned_items.len().to_string()),
            ("Damage dealt", state.total_damage_dealt.to_string()),
            ("Damage taken", state.total_damage_taken.to_string()),
            ("Healing done", state.total_healing_done.to_string()),
            ("Revives used", state.revives_used.to_string()),
        ];
        println!("\n=== Run summary ===");
        for (label, value) in summary {
            println!("{:>14}: {}", label, value);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    demo::run();
}
