//! The branch arena and the yearly growth cycle.
//!
//! Every call to [`Tree::set_age`] walks the whole tree once. A branch of
//! age `a` is in its `(a - floor(a))` part of the year: leaves unfold in
//! spring, turn in autumn and fall before the year ends. When a branch
//! first reaches one year it grows its children, which from then on are
//! always exactly one year younger than their parent.

use log::{debug, trace};
use slotmap::{new_key_type, SlotMap};

use crate::math::{Quat, Vec3};
use crate::scene::Color;
use super::branch::{Branch, BranchRole};
use super::context::GrowthCtx;
use super::leaf::{Leaf, LeafSeason};
use super::orient::{lean_and_spin, tilt_from_vertical, Anchor};

new_key_type! {
    /// Stable handle of a branch in a [`Tree`]
    pub struct BranchId;
}

/// Branches stored by id, parent and child links kept as ids.
#[derive(Debug)]
pub struct Tree {
    branches: SlotMap<BranchId, Branch>,
    root: BranchId,
    /// Where the root segment is planted
    anchor: Anchor,
    /// Branches that died during the current pass
    pending: Vec<BranchId>,
    pruned: u64,
}

impl Tree {
    /// Plant a root segment at `anchor`, at age zero
    pub fn plant(anchor: Anchor, ctx: &mut GrowthCtx) -> Self {
        let mut tree = Self {
            branches: SlotMap::with_key(),
            root: BranchId::default(),
            anchor,
            pending: Vec::new(),
            pruned: 0,
        };
        tree.root = tree.spawn(None, BranchRole::Root, ctx);
        tree.set_age(0.0, ctx);
        debug!("planted tree at {:?}", anchor.point);
        tree
    }

    pub fn root(&self) -> BranchId {
        self.root
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn get(&self, id: BranchId) -> Option<&Branch> {
        self.branches.get(id)
    }

    pub fn contains(&self, id: BranchId) -> bool {
        self.branches.contains_key(id)
    }

    /// Number of live branches
    pub fn len(&self) -> usize {
        self.branches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BranchId, &Branch)> {
        self.branches.iter()
    }

    /// Leaves still attached to a branch
    pub fn leaf_count(&self) -> usize {
        self.branches.values().map(|b| b.leaves.len()).sum()
    }

    /// Deepest generation currently alive
    pub fn depth(&self) -> u32 {
        self.branches.values().map(Branch::depth).max().unwrap_or(0)
    }

    /// Branches removed by death so far, subtrees not included
    pub fn pruned(&self) -> u64 {
        self.pruned
    }

    /// Advance the whole tree to `age` years
    pub fn set_age(&mut self, age: f32, ctx: &mut GrowthCtx) {
        self.set_branch_age(self.root, age, ctx);
    }

    /// Advance the subtree under `id`; its children get `age - 1`
    pub fn set_branch_age(&mut self, id: BranchId, age: f32, ctx: &mut GrowthCtx) {
        self.grow(id, age, ctx);
        self.drain_pending(ctx);
    }

    /// Orient a lateral branch: away from its parent's axis by a random
    /// lean, then `angle` degrees around that axis
    pub fn rotate(&mut self, id: BranchId, angle: f32, ctx: &mut GrowthCtx) {
        let parent = self.parent_anchor(id);
        let lean = tilt_from_vertical(parent.direction) + ctx.rng.upto(ctx.params.max_branch_angle) - 90.0;
        if let Some(branch) = self.branches.get_mut(id) {
            branch.rotation = lean_and_spin(parent.direction, lean, angle);
        }
    }

    /// Re-seat a branch on its parent's end and push the new shape to the surface
    pub fn update_position(&mut self, id: BranchId, ctx: &mut GrowthCtx) {
        let origin = self.parent_anchor(id).point;
        let Some(branch) = self.branches.get_mut(id) else {
            return;
        };
        branch.place_at(origin);
        ctx.surface.set_cone(branch.entity, branch.cone());
        ctx.surface.set_transform(branch.entity, &branch.transform);
    }

    /// Top the leaf ring up to the configured count and spread it evenly
    /// around the branch end from a random start. Every leaf restarts at age 0.
    pub fn place_leafs(&mut self, id: BranchId, ctx: &mut GrowthCtx) {
        let Some(branch) = self.branches.get_mut(id) else {
            return;
        };
        let anchor = branch.anchor();
        let count = usize::from(ctx.params.leaf_count);
        while branch.leaves.len() < count {
            branch.leaves.push(Leaf::new(anchor, ctx));
        }

        let step = 360.0 / branch.leaves.len().max(1) as f32;
        let mut angle = ctx.rng.upto(ctx.params.leaf_rotation_distortion);
        for leaf in branch.leaves.iter_mut() {
            leaf.rotate(angle, anchor, ctx);
            leaf.update_position(anchor, ctx);
            leaf.set_age(0.0, ctx);
            angle += step;
        }
    }

    /// Remove a branch and everything growing from it. The root can't be pruned.
    pub fn prune(&mut self, id: BranchId, ctx: &mut GrowthCtx) -> bool {
        if id == self.root {
            return false;
        }
        let Some(parent) = self.branches.get(id).map(|b| b.parent) else {
            return false;
        };
        if let Some(parent) = parent.and_then(|p| self.branches.get_mut(p)) {
            parent.children.retain(|child| *child != id);
        }
        let removed = self.destroy_subtree(id, ctx);
        self.pruned += 1;
        debug!("pruned {:?} with {} branches", id, removed);
        true
    }

    /// Destroy every branch and attached leaf
    pub fn uproot(mut self, ctx: &mut GrowthCtx) {
        let removed = self.destroy_subtree(self.root, ctx);
        debug!("uprooted tree of {} branches", removed);
    }

    fn spawn(&mut self, parent: Option<BranchId>, role: BranchRole, ctx: &mut GrowthCtx) -> BranchId {
        let (parent_radius, trunk, depth) = match parent.and_then(|p| self.branches.get(p)) {
            Some(p) => (p.top_radius(), p.is_trunk() && role.is_continuation(), p.depth() + 1),
            None => (ctx.params.start_branch_radius, true, 0),
        };

        let entity = ctx.surface.create_entity(ctx.group);
        ctx.surface.set_diffuse(entity, Color::DARK_GRAY);
        ctx.counter.on_create();

        let branch = Branch::new(entity, parent, role, trunk, depth, parent_radius, ctx.params, ctx.rng);
        let id = self.branches.insert(branch);
        if let Some(parent) = parent.and_then(|p| self.branches.get_mut(p)) {
            parent.children.push(id);
        }

        if role.is_continuation() {
            let direction = self.parent_anchor(id).direction;
            if let Some(branch) = self.branches.get_mut(id) {
                branch.rotation = Quat::from_rotation_arc(Vec3::UP, direction);
            }
        }
        self.update_position(id, ctx);
        self.place_leafs(id, ctx);
        id
    }

    /// End of the parent, or the planting anchor for the root
    fn parent_anchor(&self, id: BranchId) -> Anchor {
        self.branches
            .get(id)
            .and_then(|b| b.parent)
            .and_then(|p| self.branches.get(p))
            .map(Branch::anchor)
            .unwrap_or(self.anchor)
    }

    fn grow(&mut self, id: BranchId, age: f32, ctx: &mut GrowthCtx) {
        let Some(branch) = self.branches.get_mut(id) else {
            return;
        };
        branch.set_growth(age, ctx.params);
        self.update_position(id, ctx);

        if age < 1.0 {
            self.step_leaves(id, age, ctx);
        } else if self.branches.get(id).is_some_and(|b| !b.leaves.is_empty()) {
            // The tick stepped over the end of autumn
            self.shed_leaves(id, age, true, ctx);
        }

        let Some(branch) = self.branches.get(id) else {
            return;
        };
        if branch.branched {
            let children = branch.children.clone();
            for child in children {
                self.grow(child, age - 1.0, ctx);
            }
        } else if age >= 1.0 {
            self.branch_out(id, ctx);
        }

        self.roll_death(id, age, ctx);
    }

    fn step_leaves(&mut self, id: BranchId, age: f32, ctx: &mut GrowthCtx) {
        let params = ctx.params;
        let Some(branch) = self.branches.get_mut(id) else {
            return;
        };
        let anchor = branch.anchor();

        if age <= 0.25 {
            // Spring
            for leaf in branch.leaves.iter_mut() {
                leaf.set_age(age * 4.0, ctx);
                leaf.update_position(anchor, ctx);
            }
        } else if age <= 0.5 {
            for leaf in branch.leaves.iter_mut() {
                leaf.update_position(anchor, ctx);
            }
        } else if age <= 0.75 {
            for leaf in branch.leaves.iter_mut() {
                leaf.update_position(anchor, ctx);
                if leaf.season() == LeafSeason::Green
                    && ctx.rng.chance_above(age, 0.75, params.autumn_color_cutoff)
                {
                    let color = ctx.palette.sample(ctx.rng);
                    leaf.turn_autumn(color, ctx);
                }
            }
        } else {
            self.shed_leaves(id, age, age > params.deep_autumn, ctx);
        }
    }

    /// Drop leaves that draw a fall roll, or all of them when `all` is set
    fn shed_leaves(&mut self, id: BranchId, age: f32, all: bool, ctx: &mut GrowthCtx) {
        let params = ctx.params;
        let Some(branch) = self.branches.get_mut(id) else {
            return;
        };
        let anchor = branch.anchor();
        let mut kept = Vec::with_capacity(branch.leaves.len());
        let mut shed = 0;
        for mut leaf in std::mem::take(&mut branch.leaves) {
            if all || ctx.rng.chance_above(age, 1.0, params.leaf_fall_cutoff) {
                leaf.fall_and_die(anchor, params.fall_tail);
                ctx.falling.push(leaf);
                shed += 1;
            } else {
                leaf.update_position(anchor, ctx);
                kept.push(leaf);
            }
        }
        branch.leaves = kept;
        if shed > 0 {
            trace!("{:?} shed {} leaves at {:.2}", id, shed, age);
        }
    }

    fn branch_out(&mut self, id: BranchId, ctx: &mut GrowthCtx) {
        match self.branches.get_mut(id) {
            Some(branch) => branch.branched = true,
            None => return,
        }

        if ctx.params.has_continuation {
            let child = self.spawn(Some(id), BranchRole::Continuation, ctx);
            self.grow(child, 0.0, ctx);
        }

        let count = ctx.params.lateral_branch_count;
        let step = 360.0 / f32::from(count.max(1));
        let mut angle = ctx.rng.upto(ctx.params.branch_rotation_distortion);
        for _ in 0..count {
            let child = self.spawn(Some(id), BranchRole::Lateral, ctx);
            self.rotate(child, angle, ctx);
            self.update_position(child, ctx);
            self.grow(child, 0.0, ctx);
            self.place_leafs(child, ctx);
            angle += step;
        }

        let children = self.branches.get(id).map_or(0, |b| b.children.len());
        debug!("{:?} branched into {} children", id, children);
    }

    /// Mark a branch off the trunk for removal if it draws an unlucky death
    /// roll outside the safe age window
    fn roll_death(&mut self, id: BranchId, age: f32, ctx: &mut GrowthCtx) {
        let params = ctx.params;
        if !params.enable_death {
            return;
        }
        let Some(branch) = self.branches.get(id) else {
            return;
        };
        if branch.is_trunk() || age.floor() <= 1.0 {
            return;
        }
        if (params.min_death_threshold..=params.max_death_threshold).contains(&age) {
            return;
        }
        if ctx.rng.standard_normal().abs() > params.death_cutoff && !self.pending.contains(&id) {
            self.pending.push(id);
        }
    }

    fn drain_pending(&mut self, ctx: &mut GrowthCtx) {
        for id in std::mem::take(&mut self.pending) {
            // An ancestor may have taken this one down already
            self.prune(id, ctx);
        }
    }

    fn destroy_subtree(&mut self, id: BranchId, ctx: &mut GrowthCtx) -> usize {
        let Some(branch) = self.branches.remove(id) else {
            return 0;
        };
        let mut removed = 1;
        for child in &branch.children {
            removed += self.destroy_subtree(*child, ctx);
        }
        for leaf in &branch.leaves {
            leaf.release(ctx);
        }
        ctx.surface.destroy_entity(branch.entity);
        ctx.counter.on_destroy();
        removed
    }
}
