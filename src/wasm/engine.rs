//! WASM bridge type for the play engine.
//!
//! Provides a JavaScript/TypeScript-compatible wrapper around
//! [`crate::engine::Engine`], mirroring its imperative, tick-driven API.
//! Intended exclusively for JS/TS consumers via WebAssembly and not part
//! of the public Rust API.
//!
//! Feature-gated behind the `wasm` Cargo feature. Compiled to WebAssembly
//! via `wasm-pack`.

use wasm_bindgen::prelude::*;

use crate::engine::Engine as CoreEngine;
use crate::geometry::Vector2D;
use crate::motion::MotionType;
use crate::qb::QbMovementKind;

fn parse_motion_type(key: &str) -> Result<MotionType, JsError> {
    match key {
        "jet" => Ok(MotionType::Jet),
        "fly" => Ok(MotionType::Fly),
        "orbit" => Ok(MotionType::Orbit),
        "across" => Ok(MotionType::Across),
        "glide" => Ok(MotionType::Glide),
        "return" => Ok(MotionType::Return),
        "shift" => Ok(MotionType::Shift),
        other => Err(JsError::new(&format!("unknown motion type '{other}'"))),
    }
}

fn parse_qb_movement_kind(key: &str) -> Result<QbMovementKind, JsError> {
    match key {
        "three-step" => Ok(QbMovementKind::ThreeStep),
        "five-step" => Ok(QbMovementKind::FiveStep),
        "seven-step" => Ok(QbMovementKind::SevenStep),
        "play-action-boot-right" => Ok(QbMovementKind::PlayActionBootRight),
        "rollout-right" => Ok(QbMovementKind::RolloutRight),
        "rollout-left" => Ok(QbMovementKind::RolloutLeft),
        other => Err(JsError::new(&format!("unknown QB movement kind '{other}'"))),
    }
}

/// A WASM-friendly wrapper around the core `Engine` type.
///
/// Holds one play's state and RNG. Every method mirrors its Rust
/// counterpart 1:1; the caller still drives the clock via `tick`.
#[wasm_bindgen(js_name = "Engine")]
pub struct WasmEngine {
    inner: CoreEngine,
}

#[wasm_bindgen(js_class = "Engine")]
impl WasmEngine {
    /// Creates a new free-play engine seeded for reproducibility.
    #[wasm_bindgen(constructor)]
    pub fn new(rng_seed: u64) -> WasmEngine {
        WasmEngine {
            inner: CoreEngine::new(rng_seed),
        }
    }

    /// Creates a new challenge-mode engine (tighter sack budget).
    #[wasm_bindgen(js_name = "newChallenge")]
    pub fn new_challenge(rng_seed: u64) -> WasmEngine {
        WasmEngine {
            inner: CoreEngine::new_challenge(rng_seed),
        }
    }

    #[wasm_bindgen(js_name = "setPlayConcept")]
    pub fn set_play_concept(&mut self, concept_key: &str) -> bool {
        self.inner.set_play_concept(concept_key)
    }

    #[wasm_bindgen(js_name = "setCoverage")]
    pub fn set_coverage(&mut self, coverage_key: &str) -> bool {
        self.inner.set_coverage_by_key(coverage_key)
    }

    #[wasm_bindgen(js_name = "setPersonnel")]
    pub fn set_personnel(&mut self, package_key: &str) -> bool {
        self.inner.set_personnel(package_key)
    }

    #[wasm_bindgen(js_name = "updatePlayerPosition")]
    pub fn update_player_position(&mut self, player_id: &str, x: f64, y: f64) -> bool {
        self.inner.update_player_position(player_id, Vector2D::new(x, y))
    }

    /// Sends a player in motion. `motion_type` is one of `jet`, `fly`,
    /// `orbit`, `across`, `glide`, `return`, `shift`; omit it to default to
    /// `jet`.
    #[wasm_bindgen(js_name = "sendInMotion")]
    pub fn send_in_motion(&mut self, player_id: &str, motion_type: Option<String>) -> Result<bool, JsError> {
        let parsed = match motion_type {
            Some(key) => Some(parse_motion_type(&key)?),
            None => None,
        };
        Ok(self.inner.send_in_motion(player_id, parsed))
    }

    /// Sets the quarterback's drop/rollout scheme for the upcoming snap.
    /// `kind_key` is one of `three-step`, `five-step`, `seven-step`,
    /// `play-action-boot-right`, `rollout-right`, `rollout-left`.
    #[wasm_bindgen(js_name = "setQbMovement")]
    pub fn set_qb_movement(&mut self, kind_key: &str) -> Result<bool, JsError> {
        let kind = parse_qb_movement_kind(kind_key)?;
        Ok(self.inner.set_qb_movement(kind))
    }

    #[wasm_bindgen(js_name = "audibleRoute")]
    pub fn audible_route(&mut self, player_id: &str, route_key: &str) -> bool {
        self.inner.audible_route(player_id, route_key)
    }

    pub fn snap(&mut self) -> bool {
        self.inner.snap()
    }

    pub fn tick(&mut self, dt: f64) -> bool {
        self.inner.tick(dt)
    }

    #[wasm_bindgen(js_name = "throwTo")]
    pub fn throw_to(&mut self, target_id: &str) -> bool {
        self.inner.throw_to(target_id)
    }

    #[wasm_bindgen(js_name = "resetPlay")]
    pub fn reset_play(&mut self) {
        self.inner.reset_play();
    }

    #[wasm_bindgen(js_name = "nextPlay")]
    pub fn next_play(&mut self) {
        self.inner.next_play();
    }

    /// Returns the current play state as a JSON-serializable object.
    #[wasm_bindgen(js_name = "getGameState")]
    pub fn get_game_state(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.inner.get_game_state()).map_err(|e| JsError::new(&e.to_string()))
    }
}
