//! sequin-core: step progression, curve shapes and pattern generators for a step sequencer

pub mod config;
pub mod curve;
mod error;
pub mod generator;
pub mod random;
mod run_mode;
mod sequence_state;

pub use curve::{evaluate, inverted_shape, reversed_shape, CurveShape};
pub use error::{Result, SequinError};
pub use generator::{
    euclidean_rhythm, EuclideanGenerator, Generator, GeneratorMode, InitLayerGenerator,
    LayerBuilder, PatternSink, RandomGenerator, StepSelection,
};
pub use random::{Random, RandomSource};
pub use run_mode::RunMode;
pub use sequence_state::SequenceState;
