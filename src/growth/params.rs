use serde::{Deserialize, Serialize};
use crate::config::ConfigError;

/// Parameters controlling how the tree grows, sheds and dies.
/// Angles are in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthParams {
    /// Leaf scale when its age reaches 1
    pub leaf_base_scale: f32,
    /// Max random lean of a leaf away from the branch axis
    pub leaf_angle: f32,
    /// Max random start azimuth of the leaf ring
    pub leaf_rotation_distortion: f32,
    /// Leaves on every fresh branch
    pub leaf_count: u8,

    /// Max random radius loss of a lateral branch
    pub branch_distortion: f32,
    /// Radius lost between bottom and top of a branch
    pub branch_radius_delta: f32,
    /// Bottom radius of the root segment
    pub start_branch_radius: f32,
    /// Radius floor
    pub min_branch_radius: f32,
    /// Base segment length
    pub branch_length: f32,
    /// Max random extra length
    pub branch_length_distortion: f32,
    /// Max random lean added to lateral branches
    pub max_branch_angle: f32,
    /// Lateral children per branching round
    pub lateral_branch_count: u8,
    /// Spawn a child parallel to, and on top of, its parent
    pub has_continuation: bool,
    /// Max random start azimuth of the lateral ring
    pub branch_rotation_distortion: f32,
    /// How much longer a trunk segment gets over a century
    pub branch_length_multiplier: f32,
    /// How much thicker a trunk segment gets over a century
    pub branch_scale: f32,
    /// Growth-rate divisor for lateral branches
    pub branch_slower: f32,
    /// Growth-rate multiplier for the root segment
    pub first_branch_multiplier: f32,

    /// Autumn colouring happens when `U(age, 0.75)` beats this
    pub autumn_color_cutoff: f32,
    /// A leaf starts falling when `U(age, 1.0)` beats this
    pub leaf_fall_cutoff: f32,
    /// Past this fraction of the year every leaf falls
    pub deep_autumn: f32,
    /// Drop per fall frame
    pub fall_drop: f32,
    /// Spin per fall frame
    pub fall_spin: f32,
    /// Distance between the two anchor points of a falling leaf
    pub fall_tail: f32,

    pub enable_death: bool,
    /// Lower bound of the safe age window, in years
    pub min_death_threshold: f32,
    /// Upper bound of the safe age window, in years
    pub max_death_threshold: f32,
    /// A branch is pruned when |N(0, 1)| exceeds this
    pub death_cutoff: f32,

    /// Seed for the distortion source; drawn by the driver when absent
    pub seed: Option<u64>,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            leaf_base_scale: 0.25,
            leaf_angle: 45.0,
            leaf_rotation_distortion: 50.0,
            leaf_count: 2,

            branch_distortion: 0.01,
            branch_radius_delta: 0.003,
            start_branch_radius: 0.035,
            min_branch_radius: 0.001,
            branch_length: 0.35,
            branch_length_distortion: 0.15,
            max_branch_angle: 55.0,
            lateral_branch_count: 3,
            has_continuation: true,
            branch_rotation_distortion: 35.0,
            branch_length_multiplier: 50.0,
            branch_scale: 5.0,
            branch_slower: 2.0,
            first_branch_multiplier: 2.0,

            autumn_color_cutoff: 0.63,
            leaf_fall_cutoff: 0.9,
            deep_autumn: 0.96,
            fall_drop: 0.05,
            fall_spin: 15.0,
            fall_tail: 0.5,

            enable_death: true,
            min_death_threshold: 3.0,
            max_death_threshold: 20.0,
            death_cutoff: 2.5,

            seed: None,
        }
    }
}

impl GrowthParams {
    /// Parse from a YAML document holding only growth parameters
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let params: GrowthParams = serde_yaml::from_str(yaml)?;
        params.validate()?;
        Ok(params)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("leaf_base_scale", self.leaf_base_scale),
            ("leaf_angle", self.leaf_angle),
            ("leaf_rotation_distortion", self.leaf_rotation_distortion),
            ("branch_distortion", self.branch_distortion),
            ("branch_radius_delta", self.branch_radius_delta),
            ("start_branch_radius", self.start_branch_radius),
            ("min_branch_radius", self.min_branch_radius),
            ("branch_length", self.branch_length),
            ("branch_length_distortion", self.branch_length_distortion),
            ("max_branch_angle", self.max_branch_angle),
            ("branch_rotation_distortion", self.branch_rotation_distortion),
            ("branch_length_multiplier", self.branch_length_multiplier),
            ("branch_scale", self.branch_scale),
            ("first_branch_multiplier", self.first_branch_multiplier),
            ("fall_drop", self.fall_drop),
            ("fall_spin", self.fall_spin),
            ("fall_tail", self.fall_tail),
            ("min_death_threshold", self.min_death_threshold),
            ("max_death_threshold", self.max_death_threshold),
            ("death_cutoff", self.death_cutoff),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(field, "must be a finite, non-negative number"));
            }
        }

        if !self.branch_slower.is_finite() || self.branch_slower <= 0.0 {
            return Err(ConfigError::invalid("branch_slower", "must be positive"));
        }
        if self.lateral_branch_count == 0 {
            return Err(ConfigError::invalid("lateral_branch_count", "can't be less than 1"));
        }
        if self.leaf_count == 0 {
            return Err(ConfigError::invalid("leaf_count", "can't be less than 1"));
        }
        if !(self.deep_autumn > 0.75 && self.deep_autumn <= 1.0) {
            return Err(ConfigError::invalid("deep_autumn", "must lie in (0.75, 1]"));
        }
        if self.min_death_threshold > self.max_death_threshold {
            return Err(ConfigError::invalid(
                "min_death_threshold",
                "must not exceed max_death_threshold",
            ));
        }
        Ok(())
    }
}
