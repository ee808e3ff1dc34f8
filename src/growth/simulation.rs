use log::info;
use serde::Serialize;

use crate::config::ConfigError;
use crate::math::Vec3;
use crate::scene::{EntityId, RenderSurface};
use super::context::{EntityCounter, GrowthCtx};
use super::falling::FallingLeaves;
use super::orient::Anchor;
use super::palette::{autumn_gradient, Gradient};
use super::params::GrowthParams;
use super::rng::Distortion;
use super::tree::Tree;

/// Used when the parameters carry no seed
pub const DEFAULT_SEED: u64 = 0x7EE5;

/// Snapshot of the simulation for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TreeStats {
    pub age: f32,
    pub branches: usize,
    pub attached_leaves: usize,
    pub falling_leaves: usize,
    pub live_entities: u64,
    pub created: u64,
    pub destroyed: u64,
    pub pruned: u64,
    pub landed: u64,
    pub depth: u32,
}

impl TreeStats {
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// A tree planted on a rendering surface, plus everything that outlives
/// single branches: the leaves in flight, the entity counts and the
/// random source.
pub struct Simulation<S: RenderSurface> {
    params: GrowthParams,
    rng: Distortion,
    surface: S,
    counter: EntityCounter,
    palette: Gradient,
    falling: FallingLeaves,
    /// Parent entity of the whole tree
    group: EntityId,
    tree: Tree,
    age: f32,
}

impl<S: RenderSurface> Simulation<S> {
    pub fn new(params: GrowthParams, mut surface: S) -> Result<Self, ConfigError> {
        params.validate()?;
        let seed = params.seed.unwrap_or(DEFAULT_SEED);
        let mut rng = Distortion::new(seed);
        let mut counter = EntityCounter::default();
        let palette = autumn_gradient();
        let mut falling = FallingLeaves::new();
        let group = surface.create_entity(None);

        let tree = Tree::plant(
            ground_anchor(),
            &mut GrowthCtx {
                params: &params,
                rng: &mut rng,
                surface: &mut surface,
                counter: &mut counter,
                palette: &palette,
                falling: &mut falling,
                group: Some(group),
            },
        );
        info!("planted tree with seed {}", seed);

        Ok(Self {
            params,
            rng,
            surface,
            counter,
            palette,
            falling,
            group,
            tree,
            age: 0.0,
        })
    }

    pub fn params(&self) -> &GrowthParams {
        &self.params
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn falling(&self) -> &FallingLeaves {
        &self.falling
    }

    pub fn counter(&self) -> &EntityCounter {
        &self.counter
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Entity every branch and leaf hangs under
    pub fn group(&self) -> EntityId {
        self.group
    }

    /// Age last passed to [`Simulation::set_age`]
    pub fn age(&self) -> f32 {
        self.age
    }

    /// Growth tick: bring the whole tree to `age` years
    pub fn set_age(&mut self, age: f32) {
        let (tree, mut ctx) = self.split();
        tree.set_age(age, &mut ctx);
        self.age = age;
    }

    /// Fall frame: move every leaf in the air. Returns how many landed.
    pub fn animate_fall(&mut self) -> usize {
        let mut pool = std::mem::take(&mut self.falling);
        let (_, mut ctx) = self.split();
        let landed = pool.step(&mut ctx);
        self.falling = pool;
        landed
    }

    /// Tear the tree down, falling leaves included, and plant a new root
    pub fn reset(&mut self) {
        let mut pool = std::mem::take(&mut self.falling);
        let (tree, mut ctx) = self.split();
        pool.clear(&mut ctx);
        let fresh = Tree::plant(ground_anchor(), &mut ctx);
        std::mem::replace(tree, fresh).uproot(&mut ctx);
        self.falling = pool;
        self.age = 0.0;
        info!("tree reset, {} entities live", self.counter.live);
    }

    pub fn stats(&self) -> TreeStats {
        TreeStats {
            age: self.age,
            branches: self.tree.len(),
            attached_leaves: self.tree.leaf_count(),
            falling_leaves: self.falling.len(),
            live_entities: self.counter.live,
            created: self.counter.created,
            destroyed: self.counter.destroyed,
            pruned: self.tree.pruned(),
            landed: self.falling.landed(),
            depth: self.tree.depth(),
        }
    }

    fn split(&mut self) -> (&mut Tree, GrowthCtx<'_>) {
        let Self {
            params,
            rng,
            surface,
            counter,
            palette,
            falling,
            group,
            tree,
            ..
        } = self;
        let ctx = GrowthCtx {
            params,
            rng,
            surface,
            counter,
            palette,
            falling,
            group: Some(*group),
        };
        (tree, ctx)
    }
}

/// The root grows straight up out of the ground at the origin
fn ground_anchor() -> Anchor {
    Anchor::from_segment(Vec3::new(0.0, -0.5, 0.0), Vec3::ZERO)
}
