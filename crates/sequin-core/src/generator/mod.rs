//! Pattern generators
//!
//! A generator fills the selected steps of one sequence layer from a small
//! set of parameters. It is opened from an edit context, borrowing the layer
//! (through a [`PatternSink`]) and the step selection for the duration of the
//! session. Parameters are edited with relative deltas; every edit is
//! followed by [`Generator::update`] so the layer previews the result, and
//! [`Generator::revert`] drops everything the session wrote.

mod builder;
mod euclidean;
mod init_layer;
mod random;

pub use builder::{LayerBuilder, StepSelection};
pub use euclidean::{euclidean_rhythm, EuclideanGenerator, EuclideanParam, EuclideanParams};
pub use init_layer::InitLayerGenerator;
pub use random::{RandomGenerator, RandomParam, RandomParams};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{normalize_name, SequinError};
use crate::random::Random;

/// Write-back target for generated levels
pub trait PatternSink {
    /// Number of steps in the layer
    fn length(&self) -> usize;

    /// Set step `index` to `level` in `[0, 1]`
    fn set_value(&mut self, index: usize, level: f32);

    /// Reset step `index` to the layer default
    fn clear_value(&mut self, index: usize);

    /// Record the current levels as the point [`PatternSink::revert`] returns to
    fn snapshot(&mut self);

    /// Restore the levels from the last snapshot
    fn revert(&mut self);
}

/// Capability set shared by all generators
pub trait Generator {
    fn mode(&self) -> GeneratorMode;

    fn param_count(&self) -> usize;

    /// Name of parameter `index`; empty past the last parameter
    fn param_name(&self, index: usize) -> &'static str;

    /// Apply a relative edit. `shift` selects the coarse step where a parameter has one.
    fn edit_param(&mut self, index: usize, delta: i32, shift: bool);

    /// Append the display text of parameter `index` to `out`
    fn print_param(&self, index: usize, out: &mut String);

    /// Reset parameters to defaults and regenerate
    fn init(&mut self);

    /// Regenerate the layer from the current parameters
    fn update(&mut self);

    /// The layer this generator writes to
    fn sink(&mut self) -> &mut dyn PatternSink;

    fn revert(&mut self) {
        tracing::debug!("Reverting {} generator", self.mode());
        self.sink().revert();
    }

    fn param_text(&self, index: usize) -> String {
        let mut out = String::new();
        self.print_param(index, &mut out);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeneratorMode {
    InitLayer,
    Euclidean,
    Random,
}

impl GeneratorMode {
    pub const ALL: [GeneratorMode; 3] = [Self::InitLayer, Self::Euclidean, Self::Random];

    pub fn name(&self) -> &'static str {
        match self {
            Self::InitLayer => "Init Layer",
            Self::Euclidean => "Euclidean",
            Self::Random => "Random",
        }
    }
}

impl fmt::Display for GeneratorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeneratorMode {
    type Err = SequinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Self::ALL
            .into_iter()
            .find(|mode| normalize_name(mode.name()) == wanted)
            .ok_or_else(|| SequinError::UnknownGenerator(s.to_string()))
    }
}

/// Open a generator session on `sink`, initialized and applied once.
///
/// The sink is snapshotted first, so a later revert drops only what this
/// session wrote. `entropy` seeds parameter randomization (the random
/// generator's seed).
pub fn create<'a>(
    mode: GeneratorMode,
    sink: &'a mut dyn PatternSink,
    selected: &'a StepSelection,
    entropy: Random,
) -> Box<dyn Generator + 'a> {
    tracing::debug!("Opening {} generator on {} steps", mode, sink.length());
    sink.snapshot();
    let mut generator: Box<dyn Generator + 'a> = match mode {
        GeneratorMode::InitLayer => Box::new(InitLayerGenerator::new(sink, selected)),
        GeneratorMode::Euclidean => Box::new(EuclideanGenerator::new(sink, selected)),
        GeneratorMode::Random => Box::new(RandomGenerator::new(sink, selected, entropy)),
    };
    generator.init();
    generator
}
