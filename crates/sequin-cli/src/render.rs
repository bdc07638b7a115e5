//! Text rendering of step traces, curves and generated layers

use std::fmt::Write;

use sequin_core::{CurveShape, RunMode, SequenceState};

/// Title and column header of a step trace
pub fn step_header(mode: RunMode, first: usize, last: usize) -> String {
    format!(
        "{} [{}..={}]\n{:>6} {:>5} {:>5} {:>4}",
        mode, first, last, "tick", "step", "iter", "dir"
    )
}

/// One trace line: tick, step, iteration, direction
pub fn step_row(tick: u32, state: &SequenceState) -> String {
    let step = state.step().map_or_else(|| "-".to_string(), |s| s.to_string());
    format!(
        "{:>6} {:>5} {:>5} {:>+4}",
        tick,
        step,
        state.iteration(),
        state.direction()
    )
}

/// Horizontal bar for a level in `[0, 1]`
pub fn bar(level: f32, width: usize) -> String {
    let filled = (level.clamp(0.0, 1.0) * width as f32).round() as usize;
    "#".repeat(filled)
}

/// `points` evenly spaced samples from phase 0 to 1 inclusive
pub fn curve_samples(shape: CurveShape, points: usize) -> Vec<(f32, f32)> {
    match points {
        0 => Vec::new(),
        1 => vec![(0.0, shape.evaluate(0.0))],
        _ => (0..points)
            .map(|i| {
                let x = i as f32 / (points - 1) as f32;
                (x, shape.evaluate(x))
            })
            .collect(),
    }
}

pub fn curve(shape: CurveShape, points: usize, width: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", shape, shape.index());
    for (x, y) in curve_samples(shape, points) {
        let _ = writeln!(out, "{:>5.3} {:>6.3} |{}", x, y, bar(y, width));
    }
    out
}

/// Every shape with its invert and reverse partners
pub fn shape_table() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:>3} {:<18} {:<18} {:<18}", "#", "shape", "inverted", "reversed");
    for shape in CurveShape::ALL {
        let _ = writeln!(
            out,
            "{:>3} {:<18} {:<18} {:<18}",
            shape.index(),
            shape.name(),
            shape.inverted().name(),
            shape.reversed().name()
        );
    }
    out
}

/// One line per step of a generated layer
pub fn layer(values: &[f32], width: usize) -> String {
    let mut out = String::new();
    for (i, &level) in values.iter().enumerate() {
        let _ = writeln!(out, "{:>3} {:>5.3} |{}", i, level, bar(level, width));
    }
    out
}
