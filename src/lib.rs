use wasm_bindgen::prelude::*;

pub mod animation;
pub mod config;
pub mod growth;
pub mod logging;
pub mod math;
pub mod scene;

pub use config::{ConfigError, TreeConfig};
pub use growth::{GrowthParams, Simulation, TreeStats};
pub use scene::{RenderSurface, SceneRecorder, INSTANCE_STRIDE};

use animation::{Clock, Playback};

/// Install the panic hook and the console logger
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logging::init();
}

/// Growing tree exposed to JavaScript.
///
/// The page calls `update` once per animation frame and draws whatever
/// `instance_data` returns.
#[wasm_bindgen]
pub struct SeasonalTree {
    simulation: Simulation<SceneRecorder>,
    playback: Playback,
    clock: Clock,
}

#[wasm_bindgen]
impl SeasonalTree {
    /// Create a tree from a YAML config document (may be empty).
    /// Without a configured seed every page load grows a different tree.
    #[wasm_bindgen(constructor)]
    pub fn new(config_yaml: &str) -> Result<SeasonalTree, JsValue> {
        let mut config = TreeConfig::from_yaml(config_yaml).map_err(to_js)?;
        if config.growth.seed.is_none() {
            config.growth.seed = Some((js_sys::Math::random() * u32::MAX as f64) as u64);
        }
        Self::from_config(config).map_err(to_js)
    }

    /// Advance by `dt` seconds. Returns whether the scene changed.
    #[wasm_bindgen]
    pub fn update(&mut self, dt: f32) -> bool {
        let ticks = self.clock.advance(dt);
        let mut changed = false;

        for _ in 0..ticks.growth {
            if self.playback.step(self.clock.growth_interval()) {
                self.simulation.set_age(self.playback.age);
                changed = true;
            }
        }
        for _ in 0..ticks.fall {
            if self.simulation.falling().is_empty() {
                break;
            }
            self.simulation.animate_fall();
            changed = true;
        }
        changed
    }

    #[wasm_bindgen]
    pub fn play(&mut self) {
        self.playback.play();
    }

    #[wasm_bindgen]
    pub fn pause(&mut self) {
        self.playback.pause();
    }

    /// Play/pause button
    #[wasm_bindgen]
    pub fn toggle(&mut self) {
        self.playback.toggle();
    }

    #[wasm_bindgen]
    pub fn is_playing(&self) -> bool {
        self.playback.playing
    }

    /// Years control, clamped to 1..=99
    #[wasm_bindgen]
    pub fn set_max_years(&mut self, years: u32) {
        self.playback.set_max_years(years);
    }

    #[wasm_bindgen]
    pub fn max_years(&self) -> u32 {
        self.playback.max_years
    }

    /// Tree years per second
    #[wasm_bindgen]
    pub fn set_speed(&mut self, years_per_second: f32) {
        self.playback.set_speed(years_per_second);
    }

    /// Back to a bare root at age zero, paused
    #[wasm_bindgen]
    pub fn reset(&mut self) {
        self.simulation.reset();
        self.playback.reset();
        self.clock.reset();
    }

    #[wasm_bindgen]
    pub fn age(&self) -> f32 {
        self.simulation.age()
    }

    #[wasm_bindgen]
    pub fn branch_count(&self) -> usize {
        self.simulation.tree().len()
    }

    /// Leaves on the tree, not counting falling ones
    #[wasm_bindgen]
    pub fn leaf_count(&self) -> usize {
        self.simulation.tree().leaf_count()
    }

    #[wasm_bindgen]
    pub fn falling_leaf_count(&self) -> usize {
        self.simulation.falling().len()
    }

    #[wasm_bindgen]
    pub fn live_entities(&self) -> usize {
        self.simulation.counter().live as usize
    }

    /// Flat per-instance floats, `instance_stride` per visible entity
    #[wasm_bindgen]
    pub fn instance_data(&self) -> Vec<f32> {
        self.simulation.surface().instance_data()
    }

    #[wasm_bindgen]
    pub fn instance_stride(&self) -> usize {
        INSTANCE_STRIDE
    }

    /// Diagnostics as a YAML document
    #[wasm_bindgen]
    pub fn stats_yaml(&self) -> Result<String, JsValue> {
        self.simulation.stats().to_yaml().map_err(to_js)
    }
}

impl SeasonalTree {
    /// Build from an already parsed config. A missing seed uses
    /// [`growth::DEFAULT_SEED`].
    pub fn from_config(config: TreeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let clock = Clock::from_config(&config.playback);
        let playback = Playback::new(&config.playback);
        let simulation = Simulation::new(config.growth, SceneRecorder::new())?;
        Ok(Self {
            simulation,
            playback,
            clock,
        })
    }

    pub fn simulation(&self) -> &Simulation<SceneRecorder> {
        &self.simulation
    }

    pub fn stats(&self) -> TreeStats {
        self.simulation.stats()
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(yaml: &str) -> SeasonalTree {
        let mut config = TreeConfig::from_yaml(yaml).unwrap();
        config.growth.seed = Some(5);
        SeasonalTree::from_config(config).unwrap()
    }

    #[test]
    fn test_starts_paused_with_bare_root() {
        let mut tree = seeded("");
        assert!(!tree.is_playing());
        assert!(!tree.update(1.0));
        assert_eq!(tree.age(), 0.0);
        assert_eq!(tree.branch_count(), 1);
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_playing_advances_age() {
        let mut tree = seeded("playback:\n  years_per_second: 2.0\n");
        tree.play();
        for _ in 0..30 {
            tree.update(1.0 / 60.0);
        }
        // Half a second at two years per second
        assert!((tree.age() - 1.0).abs() < 0.11, "age={}", tree.age());
    }

    #[test]
    fn test_stops_at_max_years() {
        let mut tree = seeded("playback:\n  max_years: 2\n  years_per_second: 4.0\n");
        tree.toggle();
        for _ in 0..120 {
            tree.update(1.0 / 30.0);
        }
        assert_eq!(tree.age(), 2.0);
        assert!(!tree.is_playing());
        assert!(tree.branch_count() > 1);
    }

    #[test]
    fn test_instance_data_covers_visible_entities() {
        let mut tree = seeded("");
        tree.play();
        for _ in 0..60 {
            tree.update(0.05);
        }
        let data = tree.instance_data();
        assert_eq!(data.len() % tree.instance_stride(), 0);
        // The group entity draws nothing
        assert_eq!(data.len() / INSTANCE_STRIDE, tree.live_entities());
    }

    #[test]
    fn test_reset() {
        let mut tree = seeded("");
        tree.play();
        for _ in 0..60 {
            tree.update(0.05);
        }
        tree.reset();
        assert_eq!(tree.age(), 0.0);
        assert!(!tree.is_playing());
        assert_eq!(tree.branch_count(), 1);
        assert_eq!(tree.falling_leaf_count(), 0);
        assert_eq!(tree.live_entities(), 3);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = TreeConfig::from_yaml("growth:\n  leaf_count: 0\n");
        assert!(config.is_err());
    }
}
