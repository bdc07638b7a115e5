//! Step-progression state machine
//!
//! One [`SequenceState`] tracks playback position for one sequence. The
//! owning track engine calls [`SequenceState::advance_free`] once per tick
//! when free-running, or [`SequenceState::advance_aligned`] with the absolute
//! tick count when the sequence is locked to the master clock.
//!
//! Advancing is a two-phase protocol: the next step is computed (if it has
//! not been precomputed already) and then committed. Callers may compute the
//! next step early with `calculate_next_*` and peek at it via
//! [`SequenceState::next_step`]; the following advance commits that value
//! without drawing again.
//!
//! Nothing here allocates, blocks or logs: it runs on the tick driver.

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;
use crate::run_mode::RunMode;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceState {
    step: Option<usize>,
    prev_step: Option<usize>,
    next_step: Option<usize>,
    direction: i8,
    iteration: u32,
    next_iteration: u32,
}

impl Default for SequenceState {
    fn default() -> Self {
        Self {
            step: None,
            prev_step: None,
            next_step: None,
            direction: 1,
            iteration: 0,
            next_iteration: 0,
        }
    }
}

impl SequenceState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to "not started" (playback stop, pattern change)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Currently playing step, `None` before the first advance
    pub fn step(&self) -> Option<usize> {
        self.step
    }

    pub fn prev_step(&self) -> Option<usize> {
        self.prev_step
    }

    /// Precomputed next step, if any
    pub fn next_step(&self) -> Option<usize> {
        self.next_step
    }

    /// -1, 0 (drunken walk stayed in place) or +1
    pub fn direction(&self) -> i8 {
        self.direction
    }

    /// Completed passes through the step range
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Advance one tick in free-running mode.
    ///
    /// Panics if `first_step > last_step`.
    pub fn advance_free<R: RandomSource + ?Sized>(
        &mut self,
        run_mode: RunMode,
        first_step: usize,
        last_step: usize,
        rng: &mut R,
    ) {
        check_range(first_step, last_step);

        if self.next_step.is_none() {
            self.calculate_next_free(run_mode, first_step, last_step, rng);
        }
        self.commit();
        self.iteration = self.next_iteration;
    }

    /// Advance to the position dictated by `absolute_tick` on the master clock.
    ///
    /// Forward, backward, pendulum and ping-pong derive both step and
    /// iteration from the tick count. Stochastic modes cannot be aligned and
    /// fall back to their free-running rules.
    ///
    /// Panics if `first_step > last_step`.
    pub fn advance_aligned<R: RandomSource + ?Sized>(
        &mut self,
        absolute_tick: u32,
        run_mode: RunMode,
        first_step: usize,
        last_step: usize,
        rng: &mut R,
    ) {
        check_range(first_step, last_step);

        if self.next_step.is_none() {
            self.calculate_next_aligned(absolute_tick, run_mode, first_step, last_step, rng);
        }
        self.commit();
    }

    /// Compute (but do not commit) the next free-running step.
    pub fn calculate_next_free<R: RandomSource + ?Sized>(
        &mut self,
        run_mode: RunMode,
        first_step: usize,
        last_step: usize,
        rng: &mut R,
    ) {
        check_range(first_step, last_step);

        self.next_iteration = self.iteration;

        let Some(step) = self.step else {
            let first = match run_mode {
                RunMode::Forward | RunMode::Pendulum | RunMode::PingPong => {
                    self.direction = 1;
                    first_step
                }
                RunMode::Backward => {
                    self.direction = -1;
                    last_step
                }
                RunMode::Random | RunMode::RandomWalk | RunMode::DrunkenWalk => {
                    random_step(first_step, last_step, rng)
                }
            };
            self.next_step = Some(first);
            return;
        };

        let next = match run_mode {
            RunMode::Forward => {
                self.direction = 1;
                if step >= last_step || step < first_step {
                    self.next_iteration += 1;
                    first_step
                } else {
                    step + 1
                }
            }
            RunMode::Backward => {
                self.direction = -1;
                if step <= first_step || step > last_step {
                    self.next_iteration += 1;
                    last_step
                } else {
                    step - 1
                }
            }
            RunMode::Pendulum | RunMode::PingPong => {
                if self.direction == 0 {
                    self.direction = 1;
                }
                let reversed = self.bounce(step, first_step, last_step);
                if reversed && run_mode == RunMode::Pendulum {
                    // boundary step plays twice
                    step.clamp(first_step, last_step)
                } else {
                    offset_clamped(step, self.direction, first_step, last_step)
                }
            }
            RunMode::Random => random_step(first_step, last_step, rng),
            RunMode::RandomWalk => {
                if rng.next_range(2) == 0 {
                    self.walk_back(step, first_step, last_step)
                } else {
                    self.walk_forward(step, first_step, last_step)
                }
            }
            RunMode::DrunkenWalk => match rng.next_range(4) {
                0 => self.walk_back(step, first_step, last_step),
                1 => {
                    self.direction = 0;
                    step.clamp(first_step, last_step)
                }
                _ => self.walk_forward(step, first_step, last_step),
            },
        };
        self.next_step = Some(next);
    }

    /// Compute (but do not commit) the step for `absolute_tick`.
    ///
    /// For the deterministic modes `iteration` is written here directly from
    /// the tick count.
    pub fn calculate_next_aligned<R: RandomSource + ?Sized>(
        &mut self,
        absolute_tick: u32,
        run_mode: RunMode,
        first_step: usize,
        last_step: usize,
        rng: &mut R,
    ) {
        check_range(first_step, last_step);

        let count = (last_step - first_step + 1) as u32;

        let next = match run_mode {
            RunMode::Forward => {
                self.direction = 1;
                self.iteration = absolute_tick / count;
                first_step + (absolute_tick % count) as usize
            }
            RunMode::Backward => {
                self.direction = -1;
                self.iteration = absolute_tick / count;
                last_step - (absolute_tick % count) as usize
            }
            RunMode::Pendulum => {
                let period = 2 * count;
                self.iteration = absolute_tick / period;
                let phase = absolute_tick % period;
                self.stage_aligned_bounce(first_step, last_step);
                if phase < count {
                    first_step + phase as usize
                } else {
                    last_step - (phase - count) as usize
                }
            }
            RunMode::PingPong => {
                self.stage_aligned_bounce(first_step, last_step);
                if count == 1 {
                    self.iteration = absolute_tick;
                    first_step
                } else {
                    let period = 2 * count - 2;
                    self.iteration = absolute_tick / period;
                    let phase = absolute_tick % period;
                    if phase < count {
                        first_step + phase as usize
                    } else {
                        last_step - (phase - count) as usize - 1
                    }
                }
            }
            RunMode::Random | RunMode::RandomWalk | RunMode::DrunkenWalk => {
                self.calculate_next_free(run_mode, first_step, last_step, rng);
                return;
            }
        };
        self.next_step = Some(next);
    }

    fn commit(&mut self) {
        self.prev_step = self.step;
        self.step = self.next_step.take();
    }

    /// Flip direction at a boundary. Returns true when the direction changed.
    fn bounce(&mut self, step: usize, first_step: usize, last_step: usize) -> bool {
        if self.direction > 0 && step >= last_step {
            self.direction = -1;
            true
        } else if self.direction < 0 && step <= first_step {
            self.direction = 1;
            self.next_iteration += 1;
            true
        } else {
            false
        }
    }

    /// Aligned pendulum/ping-pong direction tracking. Reads the last committed
    /// step, so it trails the computed position by one tick. The staged
    /// iteration is never committed in aligned mode.
    fn stage_aligned_bounce(&mut self, first_step: usize, last_step: usize) {
        if let Some(step) = self.step {
            if self.direction == 0 {
                self.direction = 1;
            }
            self.bounce(step, first_step, last_step);
        }
    }

    fn walk_back(&mut self, step: usize, first_step: usize, last_step: usize) -> usize {
        self.direction = -1;
        if step <= first_step || step > last_step {
            last_step
        } else {
            step - 1
        }
    }

    fn walk_forward(&mut self, step: usize, first_step: usize, last_step: usize) -> usize {
        self.direction = 1;
        if step >= last_step || step < first_step {
            first_step
        } else {
            step + 1
        }
    }
}

fn check_range(first_step: usize, last_step: usize) {
    assert!(
        first_step <= last_step,
        "invalid step range: first {first_step} > last {last_step}"
    );
}

fn random_step<R: RandomSource + ?Sized>(
    first_step: usize,
    last_step: usize,
    rng: &mut R,
) -> usize {
    first_step + rng.next_range((last_step - first_step + 1) as u32) as usize
}

fn offset_clamped(step: usize, direction: i8, first_step: usize, last_step: usize) -> usize {
    let moved = step as isize + direction as isize;
    moved.clamp(first_step as isize, last_step as isize) as usize
}
