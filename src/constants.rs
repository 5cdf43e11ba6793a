//! Constants used throughout the library

/// Number of tracked fingers per hand
pub const FINGER_COUNT: usize = 5;

/// Bone slots the device reports for every finger
pub const BONES_PER_FINGER: usize = 5;

/// Size of the canonical finger slot layout (5 slots × 5 fingers, thumb slot 4 is a gap)
pub const FINGER_LAYOUT_SLOTS: usize = 25;

/// Number of entries in a full device validity mask
pub const VALIDITY_MASK_LEN: usize = 30;

/// Channels in a position sample
pub const POSITION_CHANNELS: usize = 3;

/// Channels in a rotation sample
pub const ROTATION_CHANNELS: usize = 4;

/// Vectors shorter than this are treated as zero
pub const EPSILON: f32 = 1e-5;

/// Palm seed interpolation between wrist and middle knuckle
pub const PALM_SEED_LERP: f32 = 0.5;

/// Fraction of the wrist-to-thumb-proximal distance used as the palm radius
pub const PALM_RADIUS_SCALE: f32 = 0.5;

/// Viewpoint distance at which the range compensation curve saturates
pub const VIEW_DISTANCE_REFERENCE: f32 = 0.5;

/// Normalized viewpoint distance where radius attenuation starts
pub const VIEW_DISTANCE_FALLOFF_START: f32 = 0.9;

/// Largest radius reduction applied at range
pub const VIEW_DISTANCE_MAX_ATTENUATION: f32 = 0.4;

/// Anchor position between wrist and thumb proximal for the inward slide
pub const PALM_ORIGIN_LERP: f32 = 0.35;

/// Inward vector rotation per unit of hand roll, in degrees (right hand)
pub const INWARD_ROTATION_DEGREES: f32 = 90.0;

/// Back-of-hand facing threshold above which forward is steered to the middle knuckle
pub const BACK_FACING_THRESHOLD: f32 = 0.5;

/// Knuckle alignment with global up where the counter-clockwise roll fix starts
pub const KNUCKLE_ROLL_START: f32 = 0.35;

/// Knuckle alignment with global up where the roll fix is fully applied
pub const KNUCKLE_ROLL_FULL: f32 = 0.7;

/// Seed-to-wrist distance below which the hand counts as fully tilted away
pub const TILT_AWAY_NEAR: f32 = 0.025;

/// Seed-to-wrist distance above which no tilt-away correction applies
pub const TILT_AWAY_FAR: f32 = 0.04;

/// Forward alignment with global up that triggers self-occlusion steering
pub const SELF_OCCLUSION_THRESHOLD: f32 = 0.7;

/// Roll applied when the palm faces down, in degrees (right hand, negated)
pub const PALM_DOWN_ROLL_DEGREES: f32 = 30.0;

/// Default robust smoothing: minimum cutoff in Hz
pub const DEFAULT_ROBUST_MIN_CUTOFF: f32 = 1.0;

/// Default robust smoothing: speed coefficient
pub const DEFAULT_ROBUST_BETA: f32 = 8.0;

/// Default fixed smoothing: constant cutoff in Hz
pub const DEFAULT_FIXED_MIN_CUTOFF: f32 = 2.5;

/// Default derivative cutoff in Hz
pub const DEFAULT_DERIVATIVE_CUTOFF: f32 = 1.0;
