//! Random generator: seeded noise, smoothed and reshaped

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::config::{BIAS_RANGE, SCALE_MAX, SCALE_UNITY, SEED_MAX, SMOOTH_MAX, STEP_COUNT};
use crate::random::{Random, RandomSource};

use super::{Generator, GeneratorMode, PatternSink, StepSelection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomParam {
    Seed,
    Smooth,
    Bias,
    Scale,
}

impl RandomParam {
    pub const ALL: [RandomParam; 4] = [Self::Seed, Self::Smooth, Self::Bias, Self::Scale];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Seed => "Seed",
            Self::Smooth => "Smooth",
            Self::Bias => "Bias",
            Self::Scale => "Scale",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomParams {
    pub seed: i32,
    pub smooth: i32,
    /// Offset in tenths of full range
    pub bias: i32,
    /// Multiplier in tenths
    pub scale: i32,
}

impl Default for RandomParams {
    fn default() -> Self {
        Self {
            seed: 0,
            smooth: 0,
            bias: 0,
            scale: SCALE_UNITY,
        }
    }
}

pub struct RandomGenerator<'a> {
    sink: &'a mut dyn PatternSink,
    selected: &'a StepSelection,
    entropy: Random,
    params: RandomParams,
    pattern: [u8; STEP_COUNT],
}

impl<'a> RandomGenerator<'a> {
    /// `entropy` is only used to roll a fresh seed in [`Generator::init`].
    pub fn new(
        sink: &'a mut dyn PatternSink,
        selected: &'a StepSelection,
        entropy: Random,
    ) -> Self {
        Self {
            sink,
            selected,
            entropy,
            params: RandomParams::default(),
            pattern: [0; STEP_COUNT],
        }
    }

    pub fn params(&self) -> &RandomParams {
        &self.params
    }

    /// Replace all parameters (clamped) without regenerating
    pub fn set_params(&mut self, params: RandomParams) {
        self.set_seed(params.seed);
        self.set_smooth(params.smooth);
        self.set_bias(params.bias);
        self.set_scale(params.scale);
    }

    /// Intensities from the last update, one per step of the layer
    pub fn pattern(&self) -> &[u8] {
        &self.pattern[..self.size()]
    }

    pub fn set_seed(&mut self, seed: i32) {
        self.params.seed = seed.clamp(0, SEED_MAX);
    }

    pub fn set_smooth(&mut self, smooth: i32) {
        self.params.smooth = smooth.clamp(0, SMOOTH_MAX);
    }

    pub fn set_bias(&mut self, bias: i32) {
        self.params.bias = bias.clamp(-BIAS_RANGE, BIAS_RANGE);
    }

    pub fn set_scale(&mut self, scale: i32) {
        self.params.scale = scale.clamp(0, SCALE_MAX);
    }

    fn size(&self) -> usize {
        self.sink.length().min(STEP_COUNT)
    }
}

impl Generator for RandomGenerator<'_> {
    fn mode(&self) -> GeneratorMode {
        GeneratorMode::Random
    }

    fn param_count(&self) -> usize {
        RandomParam::ALL.len()
    }

    fn param_name(&self, index: usize) -> &'static str {
        RandomParam::ALL.get(index).map_or("", RandomParam::name)
    }

    fn edit_param(&mut self, index: usize, delta: i32, shift: bool) {
        let Some(param) = RandomParam::ALL.get(index) else {
            return;
        };
        let RandomParams { seed, smooth, bias, scale } = self.params;
        match param {
            RandomParam::Seed => self.set_seed(step_by(seed, delta, if shift { 100 } else { 1 })),
            RandomParam::Smooth => self.set_smooth(step_by(smooth, delta, 1)),
            RandomParam::Bias => self.set_bias(step_by(bias, delta, 1)),
            RandomParam::Scale => self.set_scale(step_by(scale, delta, if shift { 10 } else { 1 })),
        }
    }

    fn print_param(&self, index: usize, out: &mut String) {
        let Some(param) = RandomParam::ALL.get(index) else {
            return;
        };
        let _ = match param {
            RandomParam::Seed => write!(out, "{}", self.params.seed),
            RandomParam::Smooth => write!(out, "{}", self.params.smooth),
            RandomParam::Bias => write!(out, "{:+}%", self.params.bias * 10),
            RandomParam::Scale => write!(out, "{:.1}x", self.params.scale as f32 / 10.0),
        };
    }

    fn init(&mut self) {
        self.params = RandomParams {
            seed: self.entropy.next_range(SEED_MAX as u32 + 1) as i32,
            ..RandomParams::default()
        };
        tracing::debug!("Random generator seeded with {}", self.params.seed);
        self.update();
    }

    fn update(&mut self) {
        let size = self.size();
        let pattern = &mut self.pattern[..size];
        let RandomParams { seed, smooth, bias, scale } = self.params;

        fill(pattern, self.selected, seed as u32);
        smooth_pattern(pattern, self.selected, smooth);
        for (i, value) in pattern.iter_mut().enumerate() {
            if self.selected.is_selected(i) {
                *value = reshape(*value, bias, scale);
            }
        }

        for (i, &value) in pattern.iter().enumerate() {
            if self.selected.is_selected(i) {
                self.sink.set_value(i, value as f32 / 255.0);
            }
        }

        tracing::trace!(
            "Random update: seed={} smooth={} bias={} scale={} steps={}",
            seed,
            smooth,
            bias,
            scale,
            size
        );
    }

    fn sink(&mut self) -> &mut dyn PatternSink {
        &mut *self.sink
    }
}

/// `value + delta * coarse`, saturating at the `i32` bounds
fn step_by(value: i32, delta: i32, coarse: i32) -> i32 {
    value.saturating_add(delta.saturating_mul(coarse))
}

/// Fresh stream per update, so equal parameters give equal patterns
fn fill(pattern: &mut [u8], selected: &StepSelection, seed: u32) {
    let mut rng = Random::new(seed);
    for (i, value) in pattern.iter_mut().enumerate() {
        *value = if selected.is_selected(i) {
            rng.next_range(256) as u8
        } else {
            0
        };
    }
}

/// 1-4-1 low pass over selected steps, in place and left to right.
/// Neighbours wrap around the whole pattern, selected or not.
fn smooth_pattern(pattern: &mut [u8], selected: &StepSelection, passes: i32) {
    let size = pattern.len();
    for _ in 0..passes {
        for i in 0..size {
            if !selected.is_selected(i) {
                continue;
            }
            let prev = pattern[(i + size - 1) % size] as i32;
            let next = pattern[(i + 1) % size] as i32;
            let value = pattern[i] as i32;
            pattern[i] = ((4 * value + prev + next + 3) / 6) as u8;
        }
    }
}

/// Offset by `bias` tenths of full range, then scale by `scale` tenths around the midpoint
fn reshape(value: u8, bias: i32, scale: i32) -> u8 {
    let offset = bias * 255 / 10;
    let value = ((value as i32 + offset - 127) * scale) / 10 + 127;
    value.clamp(0, 255) as u8
}
