//! Seeded pseudorandom source used by the stepper and the generators

/// Uniform integer source. Deterministic for a given seed and call sequence.
pub trait RandomSource {
    fn seed(&mut self, seed: u32);

    /// Uniform draw in `[0, range)`. `range` must be non-zero.
    fn next_range(&mut self, range: u32) -> u32;
}

/// Default source backed by `fastrand`
#[derive(Debug, Clone)]
pub struct Random {
    rng: fastrand::Rng,
}

impl Random {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: fastrand::Rng::with_seed(seed as u64),
        }
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RandomSource for Random {
    fn seed(&mut self, seed: u32) {
        self.rng.seed(seed as u64);
    }

    fn next_range(&mut self, range: u32) -> u32 {
        assert!(range > 0, "empty random range");
        self.rng.u32(0..range)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn seed(&mut self, seed: u32) {
        (**self).seed(seed);
    }

    fn next_range(&mut self, range: u32) -> u32 {
        (**self).next_range(range)
    }
}

/// Replays a fixed list of draws (reduced modulo the requested range). Test helper.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct ScriptedRandom {
    values: Vec<u32>,
    cursor: usize,
    pub draws: usize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub(crate) fn new(values: &[u32]) -> Self {
        Self { values: values.to_vec(), cursor: 0, draws: 0 }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn seed(&mut self, _seed: u32) {
        self.cursor = 0;
    }

    fn next_range(&mut self, range: u32) -> u32 {
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        self.draws += 1;
        value % range
    }
}
