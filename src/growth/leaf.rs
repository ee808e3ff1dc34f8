use crate::math::{Transform, Vec3};
use crate::scene::{Color, EntityId, MeshKind};
use super::context::GrowthCtx;
use super::orient::{lean_and_spin, tilt_from_vertical, Anchor};

/// Seasonal colouring state of a leaf
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafSeason {
    /// Still the summer green
    Green,
    /// Turned to an autumn colour; never resampled
    Autumn,
    /// Detached from its branch and falling
    Falling,
}

/// Outcome of one fall frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallStep {
    Falling,
    Landed,
}

/// Independent frame of a falling leaf
#[derive(Debug, Clone, Copy)]
struct FallTrajectory {
    start: Vec3,
    end: Vec3,
    angle: f32,
}

/// A single leaf. Attached leaves read their branch's anchor; a falling
/// leaf carries its own and never returns to the branch frame.
#[derive(Debug)]
pub struct Leaf {
    entity: EntityId,
    age: f32,
    season: LeafSeason,
    color: Color,
    /// Lean off the branch axis, degrees
    distortion: f32,
    fall: Option<FallTrajectory>,
    transform: Transform,
}

impl Leaf {
    pub fn new(anchor: Anchor, ctx: &mut GrowthCtx) -> Self {
        let entity = ctx.surface.create_entity(ctx.group);
        ctx.surface.set_mesh(entity, MeshKind::Leaf);
        ctx.surface.set_diffuse(entity, Color::DARK_GREEN);
        ctx.counter.on_create();

        let transform = Transform {
            scale: 0.0,
            ..Transform::from_translation(anchor.point)
        };
        ctx.surface.set_transform(entity, &transform);

        Self {
            entity,
            age: 0.0,
            season: LeafSeason::Green,
            color: Color::DARK_GREEN,
            distortion: ctx.rng.upto(ctx.params.leaf_angle),
            fall: None,
            transform,
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    pub fn scale(&self) -> f32 {
        self.transform.scale
    }

    pub fn season(&self) -> LeafSeason {
        self.season
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn is_falling(&self) -> bool {
        self.fall.is_some()
    }

    /// Position of the leaf stem
    pub fn position(&self) -> Vec3 {
        self.transform.translation
    }

    /// Age in 0..=1; scale grows linearly with it
    pub fn set_age(&mut self, age: f32, ctx: &mut GrowthCtx) {
        self.age = age.clamp(0.0, 1.0);
        self.transform.scale = ctx.params.leaf_base_scale * self.age;
        ctx.surface.set_transform(self.entity, &self.transform);
    }

    /// Follow the branch end, or the own trajectory once falling
    pub fn update_position(&mut self, anchor: Anchor, ctx: &mut GrowthCtx) {
        self.transform.translation = match &self.fall {
            Some(fall) => fall.end,
            None => anchor.point,
        };
        ctx.surface.set_transform(self.entity, &self.transform);
    }

    /// Orient the leaf roughly orthogonal to its axis, `angle` degrees around it
    pub fn rotate(&mut self, angle: f32, anchor: Anchor, ctx: &mut GrowthCtx) {
        let direction = match &self.fall {
            Some(fall) => {
                self.distortion = ctx.rng.upto(ctx.params.leaf_angle);
                (fall.end - fall.start).normalize_or(Vec3::UP)
            }
            None => anchor.direction.normalize_or(Vec3::UP),
        };

        let lean = tilt_from_vertical(direction) + self.distortion;
        self.transform.rotation = lean_and_spin(direction, lean, angle);
        ctx.surface.set_transform(self.entity, &self.transform);
    }

    /// Turn to an autumn colour. Returns false if already coloured or falling.
    pub fn turn_autumn(&mut self, color: Color, ctx: &mut GrowthCtx) -> bool {
        if self.season != LeafSeason::Green {
            return false;
        }
        self.season = LeafSeason::Autumn;
        self.set_color(color, ctx);
        true
    }

    pub fn set_color(&mut self, color: Color, ctx: &mut GrowthCtx) {
        self.color = color;
        ctx.surface.set_diffuse(self.entity, color);
    }

    /// Detach from the branch and start an independent fall from its end
    pub fn fall_and_die(&mut self, anchor: Anchor, tail: f32) {
        if self.fall.is_some() {
            return;
        }
        let end = anchor.point;
        self.fall = Some(FallTrajectory {
            start: end - Vec3::UP.scale(tail),
            end,
            angle: 0.0,
        });
        self.season = LeafSeason::Falling;
    }

    /// Advance the fall by one animation frame
    pub fn fall_step(&mut self, ctx: &mut GrowthCtx) -> FallStep {
        let Some(fall) = self.fall else {
            return FallStep::Falling;
        };
        if fall.end.y <= 0.0 {
            return FallStep::Landed;
        }

        // The anchor argument is ignored while falling
        let anchor = Anchor { point: fall.end, direction: Vec3::UP };
        self.rotate(fall.angle, anchor, ctx);

        let end = fall.end - Vec3::UP.scale(ctx.params.fall_drop);
        self.fall = Some(FallTrajectory {
            start: end - Vec3::UP.scale(ctx.params.fall_tail),
            end,
            angle: fall.angle + ctx.params.fall_spin,
        });
        self.update_position(anchor, ctx);
        FallStep::Falling
    }

    /// Remove the leaf's entity from the scene
    pub fn release(&self, ctx: &mut GrowthCtx) {
        ctx.surface.destroy_entity(self.entity);
        ctx.counter.on_destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::growth::context::TestWorld;
    use crate::growth::GrowthParams;

    fn anchor() -> Anchor {
        Anchor {
            point: Vec3::new(0.0, 1.0, 0.0),
            direction: Vec3::new(1.0, 1.0, 0.0).normalize(),
        }
    }

    #[test]
    fn test_scale_is_linear_in_clamped_age() {
        let mut world = TestWorld::new(GrowthParams::default());
        let mut ctx = world.ctx();
        let mut leaf = Leaf::new(anchor(), &mut ctx);

        for i in 0..=20 {
            let age = i as f32 / 20.0;
            leaf.set_age(age, &mut ctx);
            assert_eq!(leaf.scale(), 0.25 * age);
        }
        leaf.set_age(3.0, &mut ctx);
        assert_eq!(leaf.age(), 1.0);
        assert_eq!(leaf.scale(), 0.25);
        leaf.set_age(-1.0, &mut ctx);
        assert_eq!(leaf.scale(), 0.0);
    }

    #[test]
    fn test_new_leaf_registers_entity() {
        let mut world = TestWorld::new(GrowthParams::default());
        let leaf = Leaf::new(anchor(), &mut world.ctx());
        assert_eq!(world.counter.live, 1);

        let record = world.surface.get(leaf.entity()).unwrap();
        assert_eq!(record.color, Color::DARK_GREEN);
        assert_eq!(record.transform.translation, anchor().point);

        leaf.release(&mut world.ctx());
        assert_eq!(world.counter.live, 0);
        assert!(!world.surface.contains(leaf.entity()));
    }

    #[test]
    fn test_rotation_keeps_leaf_close_to_branch_axis() {
        let mut world = TestWorld::new(GrowthParams::default());
        let mut ctx = world.ctx();
        let mut leaf = Leaf::new(anchor(), &mut ctx);

        for angle in [0.0, 90.0, 180.0, 270.0] {
            leaf.rotate(angle, anchor(), &mut ctx);
            let up = leaf.transform().rotation.rotate(Vec3::UP);
            let off_axis = up.angle_between(&anchor().direction).to_degrees();
            assert!(off_axis <= 45.0 + 0.05, "off_axis={}", off_axis);
        }
    }

    #[test]
    fn test_degenerate_branch_direction_is_safe() {
        let mut world = TestWorld::new(GrowthParams::default());
        let mut ctx = world.ctx();
        let flat = Anchor { point: Vec3::UP, direction: Vec3::ZERO };
        let mut leaf = Leaf::new(flat, &mut ctx);
        leaf.rotate(30.0, flat, &mut ctx);
        let q = leaf.transform().rotation;
        assert!(q.x.is_finite() && q.y.is_finite() && q.z.is_finite() && q.w.is_finite());
    }

    #[test]
    fn test_autumn_colour_is_set_once() {
        let mut world = TestWorld::new(GrowthParams::default());
        let mut ctx = world.ctx();
        let mut leaf = Leaf::new(anchor(), &mut ctx);

        assert!(leaf.turn_autumn(Color::YELLOW, &mut ctx));
        assert!(!leaf.turn_autumn(Color::RED, &mut ctx));
        assert_eq!(leaf.color(), Color::YELLOW);
        assert_eq!(leaf.season(), LeafSeason::Autumn);
    }

    #[test]
    fn test_fall_leaves_branch_frame_and_lands() {
        let mut world = TestWorld::new(GrowthParams::default());
        let mut ctx = world.ctx();
        let mut leaf = Leaf::new(anchor(), &mut ctx);
        leaf.fall_and_die(anchor(), 0.5);
        assert!(leaf.is_falling());
        assert_eq!(leaf.season(), LeafSeason::Falling);

        // The branch moving no longer drags the leaf along
        let moved = Anchor { point: Vec3::new(5.0, 5.0, 5.0), direction: Vec3::UP };
        leaf.update_position(moved, &mut ctx);
        assert_eq!(leaf.position(), anchor().point);

        let mut frames = 0;
        while leaf.fall_step(&mut ctx) == FallStep::Falling {
            frames += 1;
            assert!(frames < 1000);
        }
        // 1.0 / 0.05 frames to reach the ground, give or take rounding
        assert!((20..=22).contains(&frames), "frames={}", frames);
        assert!(leaf.position().y <= 0.0);
        assert!(leaf.is_falling());
    }

    #[test]
    fn test_season_cannot_change_while_falling() {
        let mut world = TestWorld::new(GrowthParams::default());
        let mut ctx = world.ctx();
        let mut leaf = Leaf::new(anchor(), &mut ctx);
        leaf.fall_and_die(anchor(), 0.5);
        assert!(!leaf.turn_autumn(Color::RED, &mut ctx));
    }
}
