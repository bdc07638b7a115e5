//! Compile-time configuration shared by the sequencer core

/// Maximum number of steps in a sequence (capacity of pattern buffers and selections)
pub const STEP_COUNT: usize = 64;

/// Largest seed the random generator accepts
pub const SEED_MAX: i32 = 999;

/// Smoothing passes (random generator)
pub const SMOOTH_MAX: i32 = 10;

/// Bias range in tenths (random generator)
pub const BIAS_RANGE: i32 = 10;

/// Scale in tenths; 10 is unity (random generator)
pub const SCALE_MAX: i32 = 100;
pub const SCALE_UNITY: i32 = 10;

/// Level written by the init-layer generator
pub const DEFAULT_LEVEL: f32 = 0.0;
