//! Seasonal tree growth
//!
//! A [`Tree`] of [`Branch`]es ages one tick at a time. Branches extend and
//! thicken, grow a ring of [`Leaf`]s every spring, colour and shed them in
//! autumn, branch once they are a year old and may die when old enough.
//! All randomness comes from one seeded [`Distortion`].

mod branch;
mod context;
mod falling;
mod leaf;
mod orient;
mod palette;
mod params;
mod rng;
mod simulation;
mod tree;

pub use branch::{growth_factor, summer_age, Branch, BranchRole};
pub use context::{EntityCounter, GrowthCtx};
pub use falling::FallingLeaves;
pub use leaf::{FallStep, Leaf, LeafSeason};
pub use orient::{lean_and_spin, lean_axis, tilt_from_vertical, Anchor};
pub use palette::{autumn_gradient, Gradient, AUTUMN_SAMPLES};
pub use params::GrowthParams;
pub use rng::Distortion;
pub use simulation::{Simulation, TreeStats, DEFAULT_SEED};
pub use tree::{BranchId, Tree};
