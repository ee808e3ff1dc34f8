use log::trace;
use super::context::GrowthCtx;
use super::leaf::{FallStep, Leaf};

/// Leaves that left their branch. They animate on the fast tick until
/// they reach the ground, independent of what happens to the tree.
#[derive(Debug, Default)]
pub struct FallingLeaves {
    leaves: Vec<Leaf>,
    landed: u64,
}

impl FallingLeaves {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, leaf: Leaf) {
        self.leaves.push(leaf);
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Leaf> {
        self.leaves.iter()
    }

    /// Leaves that reached the ground so far
    pub fn landed(&self) -> u64 {
        self.landed
    }

    /// One animation frame. Landed leaves are destroyed; returns how many.
    pub fn step(&mut self, ctx: &mut GrowthCtx) -> usize {
        let mut landed = Vec::new();
        let mut airborne = Vec::with_capacity(self.leaves.len());
        for mut leaf in self.leaves.drain(..) {
            match leaf.fall_step(ctx) {
                FallStep::Falling => airborne.push(leaf),
                FallStep::Landed => landed.push(leaf),
            }
        }
        self.leaves = airborne;

        for leaf in &landed {
            leaf.release(ctx);
        }
        self.landed += landed.len() as u64;
        if !landed.is_empty() {
            trace!("{} leaves landed, {} still falling", landed.len(), self.leaves.len());
        }
        landed.len()
    }

    /// Destroy every leaf still in the air
    pub fn clear(&mut self, ctx: &mut GrowthCtx) {
        for leaf in self.leaves.drain(..) {
            leaf.release(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::context::TestWorld;
    use crate::growth::orient::Anchor;
    use crate::growth::GrowthParams;
    use crate::math::Vec3;

    fn drop_leaf(world: &mut TestWorld, height: f32) -> Leaf {
        let anchor = Anchor { point: Vec3::new(0.0, height, 0.0), direction: Vec3::UP };
        let mut leaf = Leaf::new(anchor, &mut world.ctx());
        leaf.fall_and_die(anchor, 0.5);
        leaf
    }

    #[test]
    fn test_leaves_land_and_are_destroyed() {
        let mut world = TestWorld::new(GrowthParams::default());
        let mut pool = FallingLeaves::new();
        pool.push(drop_leaf(&mut world, 0.2));
        pool.push(drop_leaf(&mut world, 2.0));
        assert_eq!(world.counter.live, 2);

        let mut landed = 0;
        for _ in 0..10 {
            // `world.falling` is not this pool; the ctx only carries it along
            landed += pool.step(&mut world.ctx());
        }
        assert_eq!(landed, 1);
        assert_eq!(pool.len(), 1);
        assert_eq!(world.counter.live, 1);

        while !pool.is_empty() {
            pool.step(&mut world.ctx());
        }
        assert_eq!(pool.landed(), 2);
        assert_eq!(world.counter.live, 0);
        assert!(world.surface.is_empty());
    }

    #[test]
    fn test_leaf_below_ground_lands_on_first_frame() {
        let mut world = TestWorld::new(GrowthParams::default());
        let mut pool = FallingLeaves::new();
        pool.push(drop_leaf(&mut world, -1.0));
        assert_eq!(pool.step(&mut world.ctx()), 1);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_clear_releases_everything() {
        let mut world = TestWorld::new(GrowthParams::default());
        let mut pool = FallingLeaves::new();
        for h in [1.0, 2.0, 3.0] {
            pool.push(drop_leaf(&mut world, h));
        }
        pool.clear(&mut world.ctx());
        assert!(pool.is_empty());
        assert_eq!(world.counter.live, 0);
        assert_eq!(pool.landed(), 0);
    }
}
