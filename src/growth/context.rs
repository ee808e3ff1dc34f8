use serde::Serialize;
use crate::scene::{EntityId, RenderSurface};
use super::falling::FallingLeaves;
use super::palette::Gradient;
use super::params::GrowthParams;
use super::rng::Distortion;

/// Live branch and leaf entities.
///
/// Diagnostics only; nothing in the simulation branches on these numbers.
/// Mutated from the single thread that delivers ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounter {
    pub live: u64,
    pub created: u64,
    pub destroyed: u64,
}

impl EntityCounter {
    pub fn on_create(&mut self) {
        self.live += 1;
        self.created += 1;
    }

    pub fn on_destroy(&mut self) {
        self.live = self.live.saturating_sub(1);
        self.destroyed += 1;
    }
}

/// Everything a branch or leaf touches besides its own arena slot
pub struct GrowthCtx<'a> {
    pub params: &'a GrowthParams,
    pub rng: &'a mut Distortion,
    pub surface: &'a mut dyn RenderSurface,
    pub counter: &'a mut EntityCounter,
    pub palette: &'a Gradient,
    /// Shed leaves end up here, independent of the branch that grew them
    pub falling: &'a mut FallingLeaves,
    /// Scene entity every branch and leaf is created under
    pub group: Option<EntityId>,
}

/// Owned pieces of a [`GrowthCtx`] for unit tests
#[cfg(test)]
pub(crate) struct TestWorld {
    pub params: GrowthParams,
    pub rng: Distortion,
    pub surface: crate::scene::SceneRecorder,
    pub counter: EntityCounter,
    pub palette: Gradient,
    pub falling: FallingLeaves,
}

#[cfg(test)]
impl TestWorld {
    pub fn new(params: GrowthParams) -> Self {
        Self {
            params,
            rng: Distortion::new(1234),
            surface: crate::scene::SceneRecorder::new(),
            counter: EntityCounter::default(),
            palette: super::palette::autumn_gradient(),
            falling: FallingLeaves::new(),
        }
    }

    pub fn ctx(&mut self) -> GrowthCtx<'_> {
        GrowthCtx {
            params: &self.params,
            rng: &mut self.rng,
            surface: &mut self.surface,
            counter: &mut self.counter,
            palette: &self.palette,
            falling: &mut self.falling,
            group: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_tracks_live_entities() {
        let mut counter = EntityCounter::default();
        counter.on_create();
        counter.on_create();
        counter.on_destroy();
        assert_eq!(counter.live, 1);
        assert_eq!(counter.created, 2);
        assert_eq!(counter.destroyed, 1);

        counter.on_destroy();
        counter.on_destroy();
        assert_eq!(counter.live, 0);
    }
}
