//! Browser bindings
//!
//! The page owns the canvas and the `requestAnimationFrame` loop; it calls
//! `step` once per display frame with the frame timestamp and the latched
//! controls, then draws from the returned JSON.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::FrameClock;
use crate::settings::{QualityPreset, Settings};
use crate::sim::{CharacterKind, Controller, GameEvent, GamePhase, GameState, TickInput, tick};

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Already initialized by an earlier module instance
        return;
    }
    log::info!("Brawl Arena starting...");
}

#[derive(Serialize)]
struct Frame<'a> {
    state: &'a GameState,
    events: Vec<GameEvent>,
    /// Shake after applying the reduced-motion preference
    screen_shake: f32,
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// A match plus its frame clock, owned by the page
#[wasm_bindgen]
pub struct ArenaHandle {
    state: GameState,
    settings: Settings,
    clock: FrameClock,
}

#[wasm_bindgen]
impl ArenaHandle {
    /// Create a match in the menu. `settings_json` may be empty.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, settings_json: &str) -> Result<ArenaHandle, JsValue> {
        let settings = if settings_json.trim().is_empty() {
            Settings::default()
        } else {
            Settings::from_json(settings_json).map_err(js_err)?
        };
        let state = settings.new_match(seed, [CharacterKind::Hero, CharacterKind::DarkMage]);
        Ok(Self {
            state,
            settings,
            clock: FrameClock::new(),
        })
    }

    /// Pick archetypes by ID ("hero", "dark-mage", "brute", "caster")
    pub fn select_roster(&mut self, left: &str, right: &str) -> Result<bool, JsValue> {
        let left = CharacterKind::from_id(left)
            .ok_or_else(|| js_err(format!("unknown character {left}")))?;
        let right = CharacterKind::from_id(right)
            .ok_or_else(|| js_err(format!("unknown character {right}")))?;
        Ok(self.state.select_roster([left, right]))
    }

    /// Hand a slot to the computer (or back to the keyboard)
    pub fn set_ai(&mut self, slot: usize, ai: bool) {
        if let Some(controller) = self.state.controllers.get_mut(slot) {
            *controller = if ai { Controller::Ai } else { Controller::Human };
        }
    }

    /// Switch quality preset by name ("low", "medium", "high")
    pub fn set_quality(&mut self, name: &str) -> bool {
        match QualityPreset::from_str(name) {
            Some(preset) => {
                self.settings.quality = preset;
                self.state.max_particles = self.settings.max_particles();
                true
            }
            None => false,
        }
    }

    pub fn quality(&self) -> String {
        self.settings.quality.as_str().to_string()
    }

    pub fn start(&mut self) -> bool {
        self.clock.reset();
        self.state.start_match()
    }

    /// Same roster again, only once a result is in
    pub fn rematch(&mut self) -> bool {
        if self.state.phase != GamePhase::Victory {
            return false;
        }
        self.start()
    }

    pub fn toggle_pause(&mut self) {
        self.state.toggle_pause();
        self.clock.reset();
    }

    pub fn menu(&mut self) -> bool {
        self.state.return_to_menu()
    }

    /// Advance to `now_ms` and return `{state, events, screen_shake}` as JSON
    pub fn step(&mut self, now_ms: f64, input_json: &str) -> Result<String, JsValue> {
        let input: TickInput = if input_json.trim().is_empty() {
            TickInput::default()
        } else {
            serde_json::from_str(input_json).map_err(js_err)?
        };
        let dt = self.clock.advance(now_ms);
        tick(&mut self.state, &input, dt);

        let screen_shake = if self.settings.effective_screen_shake() {
            self.state.screen_shake
        } else {
            0.0
        };
        let frame = Frame {
            events: self.state.take_events(),
            state: &self.state,
            screen_shake,
        };
        serde_json::to_string(&frame).map_err(js_err)
    }

    /// Full state as JSON without advancing
    pub fn snapshot(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state).map_err(js_err)
    }
}
