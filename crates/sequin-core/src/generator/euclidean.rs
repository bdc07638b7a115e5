//! Euclidean generator: evenly spread beats over a cycle of steps

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::config::STEP_COUNT;

use super::{Generator, GeneratorMode, PatternSink, StepSelection};

/// Spread `beats` hits as evenly as possible over `steps`, then rotate the
/// cycle right by `offset`. `beats` is capped at `steps`.
///
/// ```
/// use sequin_core::euclidean_rhythm;
/// let tresillo = euclidean_rhythm(8, 3, 0);
/// assert_eq!(tresillo, [true, false, false, true, false, false, true, false]);
/// ```
pub fn euclidean_rhythm(steps: usize, beats: usize, offset: usize) -> Vec<bool> {
    let beats = beats.min(steps);
    if beats == 0 || beats == steps {
        return vec![beats > 0; steps];
    }

    // Bjorklund: keep two block kinds with their repeat counts. Each round
    // appends one trailing block to each leading block; unpaired blocks of
    // the larger kind become the new trailing kind.
    let (mut lead, mut lead_count) = (vec![true], beats);
    let (mut trail, mut trail_count) = (vec![false], steps - beats);
    loop {
        let paired = lead_count.min(trail_count);
        let joined = [lead.as_slice(), trail.as_slice()].concat();
        if lead_count > trail_count {
            trail = std::mem::replace(&mut lead, joined);
            trail_count = lead_count - paired;
        } else {
            lead = joined;
            trail_count -= paired;
        }
        lead_count = paired;
        if trail_count <= 1 {
            break;
        }
    }

    let mut cycle = lead.repeat(lead_count);
    cycle.extend(trail.repeat(trail_count));
    cycle.rotate_right(offset % steps);
    cycle
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EuclideanParam {
    Steps,
    Beats,
    Offset,
}

impl EuclideanParam {
    pub const ALL: [EuclideanParam; 3] = [Self::Steps, Self::Beats, Self::Offset];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Steps => "Steps",
            Self::Beats => "Beats",
            Self::Offset => "Offset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EuclideanParams {
    pub steps: usize,
    pub beats: usize,
    pub offset: usize,
}

impl Default for EuclideanParams {
    fn default() -> Self {
        Self {
            steps: 16,
            beats: 4,
            offset: 0,
        }
    }
}

pub struct EuclideanGenerator<'a> {
    sink: &'a mut dyn PatternSink,
    selected: &'a StepSelection,
    params: EuclideanParams,
    pattern: Vec<bool>,
}

impl<'a> EuclideanGenerator<'a> {
    pub fn new(sink: &'a mut dyn PatternSink, selected: &'a StepSelection) -> Self {
        Self {
            sink,
            selected,
            params: EuclideanParams::default(),
            pattern: Vec::new(),
        }
    }

    pub fn params(&self) -> &EuclideanParams {
        &self.params
    }

    /// Replace all parameters (clamped) without regenerating
    pub fn set_params(&mut self, params: EuclideanParams) {
        self.params = params;
        self.set_steps(params.steps);
    }

    /// One cycle of the last generated rhythm
    pub fn pattern(&self) -> &[bool] {
        &self.pattern
    }

    pub fn set_steps(&mut self, steps: usize) {
        self.params.steps = steps.clamp(1, STEP_COUNT);
        self.set_beats(self.params.beats);
        self.set_offset(self.params.offset);
    }

    pub fn set_beats(&mut self, beats: usize) {
        self.params.beats = beats.min(self.params.steps);
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.params.offset = offset.min(self.params.steps - 1);
    }
}

fn offset_by(value: usize, delta: i32) -> usize {
    (value as i64 + delta as i64).max(0) as usize
}

impl Generator for EuclideanGenerator<'_> {
    fn mode(&self) -> GeneratorMode {
        GeneratorMode::Euclidean
    }

    fn param_count(&self) -> usize {
        EuclideanParam::ALL.len()
    }

    fn param_name(&self, index: usize) -> &'static str {
        EuclideanParam::ALL.get(index).map_or("", EuclideanParam::name)
    }

    fn edit_param(&mut self, index: usize, delta: i32, _shift: bool) {
        let Some(param) = EuclideanParam::ALL.get(index) else {
            return;
        };
        match param {
            EuclideanParam::Steps => self.set_steps(offset_by(self.params.steps, delta)),
            EuclideanParam::Beats => self.set_beats(offset_by(self.params.beats, delta)),
            EuclideanParam::Offset => self.set_offset(offset_by(self.params.offset, delta)),
        }
    }

    fn print_param(&self, index: usize, out: &mut String) {
        let Some(param) = EuclideanParam::ALL.get(index) else {
            return;
        };
        let value = match param {
            EuclideanParam::Steps => self.params.steps,
            EuclideanParam::Beats => self.params.beats,
            EuclideanParam::Offset => self.params.offset,
        };
        let _ = write!(out, "{}", value);
    }

    fn init(&mut self) {
        self.params = EuclideanParams::default();
        self.update();
    }

    fn update(&mut self) {
        let EuclideanParams { steps, beats, offset } = self.params;
        self.pattern = euclidean_rhythm(steps, beats, offset);

        for i in 0..self.sink.length() {
            if self.selected.is_selected(i) {
                let level = if self.pattern[i % steps] { 1.0 } else { 0.0 };
                self.sink.set_value(i, level);
            }
        }

        tracing::trace!("Euclidean update: {} beats in {} steps, offset {}", beats, steps, offset);
    }

    fn sink(&mut self) -> &mut dyn PatternSink {
        &mut *self.sink
    }
}
