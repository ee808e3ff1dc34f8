use crate::math::{Quat, Transform, Vec3};
use crate::scene::{Cone, EntityId};
use super::leaf::Leaf;
use super::orient::Anchor;
use super::params::GrowthParams;
use super::rng::Distortion;
use super::tree::BranchId;

/// Cone tessellation handed to the surface
const CONE_RINGS: u32 = 20;
const CONE_SLICES: u32 = 10;

/// How a branch relates to its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchRole {
    /// First trunk segment, planted on the ground anchor
    Root,
    /// Coaxial extension of the parent
    Continuation,
    /// Offset around the parent's axis
    Lateral,
}

impl BranchRole {
    pub fn is_continuation(&self) -> bool {
        !matches!(self, BranchRole::Lateral)
    }
}

/// One segment of the tree. Lives in the [`Tree`](super::Tree) arena.
#[derive(Debug)]
pub struct Branch {
    pub(crate) parent: Option<BranchId>,
    pub(crate) children: Vec<BranchId>,
    pub(crate) leaves: Vec<Leaf>,
    /// Set once the branching round happened, even if every child was pruned since
    pub(crate) branched: bool,

    pub(crate) entity: EntityId,
    role: BranchRole,
    /// Part of the continuation chain rising from the root
    trunk: bool,
    depth: u32,

    bottom_radius: f32,
    top_radius: f32,
    base_length: f32,

    age: f32,
    length: f32,
    radius_scale: f32,

    pub(crate) rotation: Quat,
    pub(crate) transform: Transform,
    start: Vec3,
    end: Vec3,
}

impl Branch {
    /// Randomise dimensions from the parent's top radius.
    /// Continuations keep the parent's radius exactly.
    pub(crate) fn new(
        entity: EntityId,
        parent: Option<BranchId>,
        role: BranchRole,
        trunk: bool,
        depth: u32,
        parent_radius: f32,
        params: &GrowthParams,
        rng: &mut Distortion,
    ) -> Self {
        let bottom_radius = if role.is_continuation() {
            parent_radius
        } else {
            parent_radius - rng.upto(params.branch_distortion)
        }
        .max(params.min_branch_radius);
        let top_radius = (bottom_radius - params.branch_radius_delta).max(params.min_branch_radius);
        let base_length = params.branch_length + rng.upto(params.branch_length_distortion);

        Self {
            parent,
            children: Vec::new(),
            leaves: Vec::new(),
            branched: false,
            entity,
            role,
            trunk,
            depth,
            bottom_radius,
            top_radius,
            base_length,
            age: 0.0,
            length: 0.0,
            radius_scale: 0.0,
            rotation: Quat::IDENTITY,
            transform: Transform::default(),
            start: Vec3::ZERO,
            end: Vec3::ZERO,
        }
    }

    pub fn parent(&self) -> Option<BranchId> {
        self.parent
    }

    pub fn children(&self) -> &[BranchId] {
        &self.children
    }

    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn role(&self) -> BranchRole {
        self.role
    }

    pub fn is_continuation(&self) -> bool {
        self.role.is_continuation()
    }

    pub fn is_trunk(&self) -> bool {
        self.trunk
    }

    /// Generations below the root
    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn bottom_radius(&self) -> f32 {
        self.bottom_radius
    }

    pub fn top_radius(&self) -> f32 {
        self.top_radius
    }

    /// Length before any growth scaling
    pub fn base_length(&self) -> f32 {
        self.base_length
    }

    /// Length at the current age
    pub fn length(&self) -> f32 {
        self.length
    }

    pub fn start_pos(&self) -> Vec3 {
        self.start
    }

    pub fn end_pos(&self) -> Vec3 {
        self.end
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Unit axis of the branch, from its rotation
    pub fn direction(&self) -> Vec3 {
        self.rotation.rotate(Vec3::UP)
    }

    /// Where children and leaves attach
    pub fn anchor(&self) -> Anchor {
        Anchor {
            point: self.end,
            direction: self.direction(),
        }
    }

    /// Cone matching the current size
    pub fn cone(&self) -> Cone {
        Cone {
            bottom_radius: self.bottom_radius * self.radius_scale,
            top_radius: self.top_radius * self.radius_scale,
            length: self.length,
            rings: CONE_RINGS,
            slices: CONE_SLICES,
        }
    }

    /// Record a new age and rescale length and radius from it
    pub(crate) fn set_growth(&mut self, age: f32, params: &GrowthParams) {
        self.age = age;
        let summer = summer_age(age);
        let rate = self.growth_rate(params);
        self.length = self.base_length * growth_factor(summer, params.branch_length_multiplier * rate);
        self.radius_scale = growth_factor(summer, params.branch_scale * rate);
    }

    fn growth_rate(&self, params: &GrowthParams) -> f32 {
        let mut rate = if self.trunk { 1.0 } else { 1.0 / params.branch_slower };
        if self.role == BranchRole::Root {
            rate *= params.first_branch_multiplier;
        }
        rate
    }

    /// Centre the cone on the segment starting at `origin`
    pub(crate) fn place_at(&mut self, origin: Vec3) {
        let half = Vec3::new(0.0, self.length * 0.5, 0.0);
        self.transform.rotation = self.rotation;
        self.transform.scale = 1.0;
        self.transform.translation = origin + self.rotation.rotate(half);
        self.start = origin;
        self.end = self.transform.map(half);
    }
}

/// Age with the in-year part replaced by the spring growth burst:
/// the first half of every year counts double, the second half not at all.
pub fn summer_age(age: f32) -> f32 {
    let age = age.max(0.0);
    let years = age.floor();
    let within = age - years;
    years + (within * 2.0).min(1.0)
}

/// Size multiplier after `summer_age` years. Linear through the first
/// year, then `per_century` extra sizes every hundred years.
pub fn growth_factor(summer_age: f32, per_century: f32) -> f32 {
    if summer_age <= 1.0 {
        summer_age
    } else {
        1.0 + summer_age / (100.0 / per_century)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summer_age_spring_burst() {
        assert_eq!(summer_age(0.0), 0.0);
        assert_eq!(summer_age(0.25), 0.5);
        assert_eq!(summer_age(0.5), 1.0);
        assert_eq!(summer_age(0.9), 1.0);
        assert_eq!(summer_age(2.25), 2.5);
        assert_eq!(summer_age(-1.0), 0.0);
    }

    #[test]
    fn test_growth_factor_decelerates_after_first_year() {
        assert_eq!(growth_factor(0.5, 50.0), 0.5);
        assert_eq!(growth_factor(1.0, 50.0), 1.0);
        assert_eq!(growth_factor(10.0, 50.0), 6.0);
        assert_eq!(growth_factor(10.0, 5.0), 1.5);
        // Non-decreasing from the second year on
        let mut prev = growth_factor(1.01, 5.0);
        for i in 2..100 {
            let next = growth_factor(i as f32, 5.0);
            assert!(next >= prev);
            prev = next;
        }
    }

    #[test]
    fn test_continuation_keeps_parent_radius() {
        let params = GrowthParams::default();
        let mut rng = Distortion::new(3);
        let b = Branch::new(EntityId(1), None, BranchRole::Continuation, true, 0, 0.03, &params, &mut rng);
        assert_eq!(b.bottom_radius(), 0.03);
        assert!((b.top_radius() - 0.027).abs() < 1e-6);
        assert!(b.base_length() >= 0.35 && b.base_length() < 0.5);
    }

    #[test]
    fn test_lateral_radius_is_distorted_and_floored() {
        let params = GrowthParams::default();
        let mut rng = Distortion::new(3);
        let b = Branch::new(EntityId(1), None, BranchRole::Lateral, false, 1, 0.03, &params, &mut rng);
        assert!(b.bottom_radius() <= 0.03 && b.bottom_radius() > 0.02);

        let thin = Branch::new(EntityId(2), None, BranchRole::Lateral, false, 9, 0.0005, &params, &mut rng);
        assert_eq!(thin.bottom_radius(), params.min_branch_radius);
        assert_eq!(thin.top_radius(), params.min_branch_radius);
    }

    #[test]
    fn test_lateral_grows_slower_than_root() {
        let params = GrowthParams::default();
        let mut rng = Distortion::new(3);
        let mut root = Branch::new(EntityId(1), None, BranchRole::Root, true, 0, 0.035, &params, &mut rng);
        let mut lateral = Branch::new(EntityId(2), None, BranchRole::Lateral, false, 1, 0.035, &params, &mut rng);
        root.set_growth(10.0, &params);
        lateral.set_growth(10.0, &params);
        assert!(root.length() / root.base_length() > lateral.length() / lateral.base_length());
    }

    #[test]
    fn test_placement_matches_length() {
        let params = GrowthParams::default();
        let mut rng = Distortion::new(3);
        let mut b = Branch::new(EntityId(1), None, BranchRole::Lateral, false, 1, 0.03, &params, &mut rng);
        b.rotation = Quat::from_axis_angle(Vec3::new(1.0, 0.0, 1.0), 0.8);
        b.set_growth(3.3, &params);
        b.place_at(Vec3::new(0.0, 2.0, 0.0));

        let seg = b.end_pos() - b.start_pos();
        assert!((seg.length() - b.length()).abs() < 1e-4);
        assert!(seg.normalize().distance(&b.direction()) < 1e-4);
        // The cone is centred on the segment
        let mid = (b.start_pos() + b.end_pos()).scale(0.5);
        assert!(mid.distance(&b.transform().translation) < 1e-4);
    }
}
