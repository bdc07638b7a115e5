//! Curve shapes for curve tracks
//!
//! Every shape maps a phase `x` in `[0, 1]` to a level, nominally in
//! `[0, 1]`. Evaluation is a single lookup into a fixed function table; there
//! is no state and nothing allocates, so it is safe on the tick driver.
//! Phases outside `[0, 1]` are not clamped.

use std::f32::consts::TAU;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{normalize_name, SequinError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CurveShape {
    #[default]
    Low,
    High,
    StepUp,
    StepDown,
    RampUp,
    RampDown,
    ExpUp,
    ExpDown,
    LogUp,
    LogDown,
    SmoothUp,
    SmoothDown,
    RampUpHalf,
    RampDownHalf,
    ExpUpHalf,
    ExpDownHalf,
    LogUpHalf,
    LogDownHalf,
    SmoothUpHalf,
    SmoothDownHalf,
    DoubleRampUpHalf,
    DoubleRampDownHalf,
    DoubleExpUpHalf,
    DoubleExpDownHalf,
    DoubleLogUpHalf,
    DoubleLogDownHalf,
    DoubleSmoothUpHalf,
    DoubleSmoothDownHalf,
    StepUpHalf,
    StepDownHalf,
    Triangle,
    RevTriangle,
    Bell,
    RevBell,
    ExpDown2x,
    ExpDown3x,
    ExpDown4x,
}

impl CurveShape {
    /// Number of shapes; one past the last valid ordinal
    pub const COUNT: usize = 37;

    pub const ALL: [CurveShape; Self::COUNT] = {
        use CurveShape::*;
        [
            Low, High, StepUp, StepDown, RampUp, RampDown, ExpUp, ExpDown, LogUp, LogDown,
            SmoothUp, SmoothDown, RampUpHalf, RampDownHalf, ExpUpHalf, ExpDownHalf, LogUpHalf,
            LogDownHalf, SmoothUpHalf, SmoothDownHalf, DoubleRampUpHalf, DoubleRampDownHalf,
            DoubleExpUpHalf, DoubleExpDownHalf, DoubleLogUpHalf, DoubleLogDownHalf,
            DoubleSmoothUpHalf, DoubleSmoothDownHalf, StepUpHalf, StepDownHalf, Triangle,
            RevTriangle, Bell, RevBell, ExpDown2x, ExpDown3x, ExpDown4x,
        ]
    };

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::High => "High",
            Self::StepUp => "Step Up",
            Self::StepDown => "Step Down",
            Self::RampUp => "Ramp Up",
            Self::RampDown => "Ramp Down",
            Self::ExpUp => "Exp Up",
            Self::ExpDown => "Exp Down",
            Self::LogUp => "Log Up",
            Self::LogDown => "Log Down",
            Self::SmoothUp => "Smooth Up",
            Self::SmoothDown => "Smooth Down",
            Self::RampUpHalf => "Ramp Up Half",
            Self::RampDownHalf => "Ramp Down Half",
            Self::ExpUpHalf => "Exp Up Half",
            Self::ExpDownHalf => "Exp Down Half",
            Self::LogUpHalf => "Log Up Half",
            Self::LogDownHalf => "Log Down Half",
            Self::SmoothUpHalf => "Smooth Up Half",
            Self::SmoothDownHalf => "Smooth Down Half",
            Self::DoubleRampUpHalf => "Dbl Ramp Up",
            Self::DoubleRampDownHalf => "Dbl Ramp Down",
            Self::DoubleExpUpHalf => "Dbl Exp Up",
            Self::DoubleExpDownHalf => "Dbl Exp Down",
            Self::DoubleLogUpHalf => "Dbl Log Up",
            Self::DoubleLogDownHalf => "Dbl Log Down",
            Self::DoubleSmoothUpHalf => "Dbl Smooth Up",
            Self::DoubleSmoothDownHalf => "Dbl Smooth Down",
            Self::StepUpHalf => "Step Up Half",
            Self::StepDownHalf => "Step Down Half",
            Self::Triangle => "Triangle",
            Self::RevTriangle => "Rev Triangle",
            Self::Bell => "Bell",
            Self::RevBell => "Rev Bell",
            Self::ExpDown2x => "Exp Down 2x",
            Self::ExpDown3x => "Exp Down 3x",
            Self::ExpDown4x => "Exp Down 4x",
        }
    }

    pub fn evaluate(self, x: f32) -> f32 {
        evaluate(self, x)
    }

    pub fn inverted(self) -> Self {
        inverted_shape(self.index())
    }

    pub fn reversed(self) -> Self {
        reversed_shape(self.index())
    }
}

impl fmt::Display for CurveShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CurveShape {
    type Err = SequinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Self::ALL
            .into_iter()
            .find(|shape| {
                normalize_name(shape.name()) == wanted
                    || normalize_name(&format!("{shape:?}")) == wanted
            })
            .ok_or_else(|| SequinError::UnknownCurveShape(s.to_string()))
    }
}

impl TryFrom<usize> for CurveShape {
    type Error = SequinError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Self::from_index(index).ok_or(SequinError::CurveShapeIndex(index))
    }
}

// ============================================================================
// Shape functions
// ============================================================================

fn low(_x: f32) -> f32 {
    0.0
}

fn high(_x: f32) -> f32 {
    1.0
}

fn step_up(x: f32) -> f32 {
    if x < 0.5 { 0.0 } else { 1.0 }
}

fn step_down(x: f32) -> f32 {
    if x < 0.5 { 1.0 } else { 0.0 }
}

fn ramp_up(x: f32) -> f32 {
    x
}

fn ramp_down(x: f32) -> f32 {
    1.0 - x
}

fn exp_up(x: f32) -> f32 {
    x * x
}

fn exp_down(x: f32) -> f32 {
    (1.0 - x) * (1.0 - x)
}

fn log_up(x: f32) -> f32 {
    x.sqrt()
}

fn log_down(x: f32) -> f32 {
    (1.0 - x).sqrt()
}

fn smooth_up(x: f32) -> f32 {
    x * x * (3.0 - 2.0 * x)
}

fn smooth_down(x: f32) -> f32 {
    1.0 - smooth_up(x)
}

fn triangle(x: f32) -> f32 {
    if x < 0.5 { 2.0 * x } else { 2.0 - 2.0 * x }
}

fn rev_triangle(x: f32) -> f32 {
    1.0 - triangle(x)
}

fn bell(x: f32) -> f32 {
    0.5 - 0.5 * (x * TAU).cos()
}

fn rev_bell(x: f32) -> f32 {
    1.0 - bell(x)
}

/// Base shape squeezed into the first half, zero for the second half
macro_rules! half_shape {
    ($name:ident, $base:ident) => {
        fn $name(x: f32) -> f32 {
            if x < 0.5 { $base(x * 2.0) } else { 0.0 }
        }
    };
}

/// Base shape played twice, once per half
macro_rules! double_shape {
    ($name:ident, $base:ident) => {
        fn $name(x: f32) -> f32 {
            if x < 0.5 { $base(x * 2.0) } else { $base(x * 2.0 - 1.0) }
        }
    };
}

/// Exp down repeated `n` times; exactly 0 at the end of the phase
macro_rules! exp_down_repeat {
    ($name:ident, $n:expr) => {
        fn $name(x: f32) -> f32 {
            if x < 1.0 { exp_down((x * $n).fract()) } else { 0.0 }
        }
    };
}

half_shape!(ramp_up_half, ramp_up);
half_shape!(ramp_down_half, ramp_down);
half_shape!(exp_up_half, exp_up);
half_shape!(exp_down_half, exp_down);
half_shape!(log_up_half, log_up);
half_shape!(log_down_half, log_down);
half_shape!(smooth_up_half, smooth_up);
half_shape!(smooth_down_half, smooth_down);
half_shape!(step_up_half, step_up);
half_shape!(step_down_half, step_down);

double_shape!(double_ramp_up_half, ramp_up);
double_shape!(double_ramp_down_half, ramp_down);
double_shape!(double_exp_up_half, exp_up);
double_shape!(double_exp_down_half, exp_down);
double_shape!(double_log_up_half, log_up);
double_shape!(double_log_down_half, log_down);
double_shape!(double_smooth_up_half, smooth_up);
double_shape!(double_smooth_down_half, smooth_down);

exp_down_repeat!(exp_down_2x, 2.0);
exp_down_repeat!(exp_down_3x, 3.0);
exp_down_repeat!(exp_down_4x, 4.0);

type ShapeFn = fn(f32) -> f32;

/// Indexed by `CurveShape` ordinal
const FUNCTIONS: [ShapeFn; CurveShape::COUNT] = [
    low,
    high,
    step_up,
    step_down,
    ramp_up,
    ramp_down,
    exp_up,
    exp_down,
    log_up,
    log_down,
    smooth_up,
    smooth_down,
    ramp_up_half,
    ramp_down_half,
    exp_up_half,
    exp_down_half,
    log_up_half,
    log_down_half,
    smooth_up_half,
    smooth_down_half,
    double_ramp_up_half,
    double_ramp_down_half,
    double_exp_up_half,
    double_exp_down_half,
    double_log_up_half,
    double_log_down_half,
    double_smooth_up_half,
    double_smooth_down_half,
    step_up_half,
    step_down_half,
    triangle,
    rev_triangle,
    bell,
    rev_bell,
    exp_down_2x,
    exp_down_3x,
    exp_down_4x,
];

/// Evaluate `shape` at phase `x`. The caller clamps `x` to `[0, 1]`.
pub fn evaluate(shape: CurveShape, x: f32) -> f32 {
    FUNCTIONS[shape as usize](x)
}

// ============================================================================
// Invert / reverse tables
// ============================================================================

/// Vertically flipped counterpart, by ordinal
const INVERTED: [CurveShape; CurveShape::COUNT] = {
    use CurveShape::*;
    [
        High,
        Low,
        StepDown,
        StepUp,
        RampDown,
        RampUp,
        LogDown,
        LogUp,
        ExpDown,
        ExpUp,
        SmoothDown,
        SmoothUp,
        RampDownHalf,
        RampUpHalf,
        LogDownHalf,
        LogUpHalf,
        ExpDownHalf,
        ExpUpHalf,
        SmoothDownHalf,
        SmoothUpHalf,
        DoubleRampDownHalf,
        DoubleRampUpHalf,
        DoubleLogDownHalf,
        DoubleLogUpHalf,
        DoubleExpDownHalf,
        DoubleExpUpHalf,
        DoubleSmoothDownHalf,
        DoubleSmoothUpHalf,
        StepDownHalf,
        StepUpHalf,
        RevTriangle,
        Triangle,
        RevBell,
        Bell,
        ExpDown2x,
        ExpDown3x,
        ExpDown4x,
    ]
};

/// Time-reversed counterpart, by ordinal
const REVERSED: [CurveShape; CurveShape::COUNT] = {
    use CurveShape::*;
    [
        Low,
        High,
        StepDown,
        StepUp,
        RampDown,
        RampUp,
        ExpDown,
        ExpUp,
        LogDown,
        LogUp,
        SmoothDown,
        SmoothUp,
        RampDownHalf,
        RampUpHalf,
        ExpDownHalf,
        ExpUpHalf,
        LogDownHalf,
        LogUpHalf,
        SmoothDownHalf,
        SmoothUpHalf,
        DoubleRampDownHalf,
        DoubleRampUpHalf,
        DoubleExpDownHalf,
        DoubleExpUpHalf,
        DoubleLogDownHalf,
        DoubleLogUpHalf,
        DoubleSmoothDownHalf,
        DoubleSmoothUpHalf,
        StepDownHalf,
        StepUpHalf,
        RevTriangle,
        Triangle,
        RevBell,
        Bell,
        ExpDown2x,
        ExpDown3x,
        ExpDown4x,
    ]
};

/// Shape to use when the shape at `index` is inverted. Panics past the last shape.
pub fn inverted_shape(index: usize) -> CurveShape {
    assert!(index < CurveShape::COUNT, "curve shape index {index} out of range");
    INVERTED[index]
}

/// Shape to use when the shape at `index` is reversed. Panics past the last shape.
pub fn reversed_shape(index: usize) -> CurveShape {
    assert!(index < CurveShape::COUNT, "curve shape index {index} out of range");
    REVERSED[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    // avoids the 0.5 discontinuities of the step and half shapes
    const SAMPLES: [f32; 10] = [0.0, 0.05, 0.13, 0.26, 0.37, 0.49, 0.51, 0.68, 0.87, 0.99];

    fn assert_close(a: f32, b: f32, what: &str) {
        assert!((a - b).abs() < EPSILON, "{what}: {a} != {b}");
    }

    #[test]
    fn test_table_order_matches_enum() {
        for (i, shape) in CurveShape::ALL.iter().enumerate() {
            assert_eq!(shape.index(), i);
            assert_eq!(CurveShape::from_index(i), Some(*shape));
        }
        assert_eq!(CurveShape::from_index(CurveShape::COUNT), None);
        assert_eq!(
            CurveShape::try_from(40),
            Err(SequinError::CurveShapeIndex(40))
        );
    }

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(evaluate(CurveShape::RampUp, 0.0), 0.0);
        assert_eq!(evaluate(CurveShape::RampUp, 1.0), 1.0);
        assert_eq!(evaluate(CurveShape::RampDown, 0.0), 1.0);
        assert_eq!(evaluate(CurveShape::RampDown, 1.0), 0.0);
    }

    #[test]
    fn test_flat_shapes() {
        for i in 0..=100 {
            let x = i as f32 / 100.0;
            assert_eq!(evaluate(CurveShape::Low, x), 0.0);
            assert_eq!(evaluate(CurveShape::High, x), 1.0);
        }
    }

    #[test]
    fn test_shapes_stay_normalized() {
        for shape in CurveShape::ALL {
            for i in 0..=200 {
                let x = i as f32 / 200.0;
                let y = evaluate(shape, x);
                assert!((-EPSILON..=1.0 + EPSILON).contains(&y), "{shape} at {x}: {y}");
            }
        }
    }

    #[test]
    fn test_half_shapes() {
        let pairs = [
            (CurveShape::RampUpHalf, CurveShape::RampUp),
            (CurveShape::RampDownHalf, CurveShape::RampDown),
            (CurveShape::ExpUpHalf, CurveShape::ExpUp),
            (CurveShape::ExpDownHalf, CurveShape::ExpDown),
            (CurveShape::LogUpHalf, CurveShape::LogUp),
            (CurveShape::LogDownHalf, CurveShape::LogDown),
            (CurveShape::SmoothUpHalf, CurveShape::SmoothUp),
            (CurveShape::SmoothDownHalf, CurveShape::SmoothDown),
            (CurveShape::StepUpHalf, CurveShape::StepUp),
            (CurveShape::StepDownHalf, CurveShape::StepDown),
        ];
        for (half, base) in pairs {
            for i in 0..100 {
                let x = i as f32 / 200.0;
                assert_close(evaluate(half, x), evaluate(base, x * 2.0), half.name());
            }
            for i in 100..=200 {
                let x = i as f32 / 200.0;
                assert_eq!(evaluate(half, x), 0.0, "{half} at {x}");
            }
        }
    }

    #[test]
    fn test_double_shapes_fill_both_halves() {
        let pairs = [
            (CurveShape::DoubleRampUpHalf, CurveShape::RampUp),
            (CurveShape::DoubleExpUpHalf, CurveShape::ExpUp),
            (CurveShape::DoubleLogDownHalf, CurveShape::LogDown),
            (CurveShape::DoubleSmoothUpHalf, CurveShape::SmoothUp),
        ];
        for (double, base) in pairs {
            for x in SAMPLES {
                let expected = if x < 0.5 {
                    evaluate(base, x * 2.0)
                } else {
                    evaluate(base, x * 2.0 - 1.0)
                };
                assert_close(evaluate(double, x), expected, double.name());
            }
        }
        assert_close(evaluate(CurveShape::DoubleRampUpHalf, 0.75), 0.5, "dbl ramp");
    }

    #[test]
    fn test_triangle_and_bell() {
        assert_eq!(evaluate(CurveShape::Triangle, 0.0), 0.0);
        assert_eq!(evaluate(CurveShape::Triangle, 0.5), 1.0);
        assert_eq!(evaluate(CurveShape::Triangle, 1.0), 0.0);
        assert_eq!(evaluate(CurveShape::RevTriangle, 0.5), 0.0);
        assert_close(evaluate(CurveShape::Bell, 0.0), 0.0, "bell");
        assert_close(evaluate(CurveShape::Bell, 0.5), 1.0, "bell");
        assert_close(evaluate(CurveShape::RevBell, 0.5), 0.0, "rev bell");
    }

    #[test]
    fn test_exp_down_repeats() {
        for (shape, n) in [
            (CurveShape::ExpDown2x, 2.0),
            (CurveShape::ExpDown3x, 3.0),
            (CurveShape::ExpDown4x, 4.0),
        ] {
            assert_eq!(evaluate(shape, 0.0), 1.0);
            assert_eq!(evaluate(shape, 1.0), 0.0);
            // every repeat restarts at full level
            for k in 1..(n as usize) {
                assert_close(evaluate(shape, k as f32 / n), 1.0, shape.name());
            }
        }
    }

    #[test]
    fn test_step_shapes_hit_extremes() {
        assert_eq!(evaluate(CurveShape::StepUp, 0.0), 0.0);
        assert_eq!(evaluate(CurveShape::StepUp, 0.5), 1.0);
        assert_eq!(evaluate(CurveShape::StepDown, 0.49), 1.0);
        assert_eq!(evaluate(CurveShape::StepDown, 1.0), 0.0);
    }

    fn assert_bijection(lookup: fn(usize) -> CurveShape) {
        let mut seen = [false; CurveShape::COUNT];
        for i in 0..CurveShape::COUNT {
            let target = lookup(i).index();
            assert!(!seen[target], "ordinal {target} hit twice");
            seen[target] = true;
        }
    }

    #[test]
    fn test_remap_tables_are_bijections() {
        assert_bijection(inverted_shape);
        assert_bijection(reversed_shape);
    }

    #[test]
    fn test_remap_tables_are_involutions() {
        for shape in CurveShape::ALL {
            assert_eq!(shape.inverted().inverted(), shape);
            assert_eq!(shape.reversed().reversed(), shape);
        }
    }

    #[test]
    fn test_inverted_pairs() {
        assert_eq!(inverted_shape(0), CurveShape::High);
        assert_eq!(inverted_shape(1), CurveShape::Low);
        assert_eq!(CurveShape::ExpUp.inverted(), CurveShape::LogDown);
        assert_eq!(CurveShape::Triangle.inverted(), CurveShape::RevTriangle);
        assert_eq!(CurveShape::ExpDown3x.inverted(), CurveShape::ExpDown3x);

        let exact = [
            CurveShape::Low,
            CurveShape::StepUp,
            CurveShape::RampUp,
            CurveShape::SmoothUp,
            CurveShape::Triangle,
            CurveShape::Bell,
        ];
        for shape in exact {
            for x in SAMPLES {
                assert_close(
                    evaluate(shape.inverted(), x),
                    1.0 - evaluate(shape, x),
                    shape.name(),
                );
            }
        }
    }

    #[test]
    fn test_reversed_pairs() {
        assert_eq!(reversed_shape(0), CurveShape::Low);
        assert_eq!(CurveShape::ExpUp.reversed(), CurveShape::ExpDown);
        assert_eq!(CurveShape::Bell.reversed(), CurveShape::RevBell);
        // step shapes pair up in both tables
        assert_eq!(CurveShape::StepUp.reversed(), CurveShape::StepDown);
        assert_eq!(CurveShape::StepUp.inverted(), CurveShape::StepDown);
        // exp/log swap partners between the tables
        assert_ne!(CurveShape::ExpUp.reversed(), CurveShape::ExpUp.inverted());

        let exact = [
            CurveShape::StepUp,
            CurveShape::RampUp,
            CurveShape::ExpUp,
            CurveShape::LogUp,
            CurveShape::SmoothUp,
            CurveShape::DoubleRampUpHalf,
            CurveShape::DoubleExpUpHalf,
        ];
        for shape in exact {
            for x in SAMPLES {
                assert_close(
                    evaluate(shape.reversed(), x),
                    evaluate(shape, 1.0 - x),
                    shape.name(),
                );
            }
        }
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_remap_past_end_panics() {
        inverted_shape(CurveShape::COUNT);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("exp down 2x".parse(), Ok(CurveShape::ExpDown2x));
        assert_eq!("Rev Bell".parse(), Ok(CurveShape::RevBell));
        assert_eq!("DoubleSmoothUpHalf".parse(), Ok(CurveShape::DoubleSmoothUpHalf));
        assert_eq!("dbl-smooth-up".parse(), Ok(CurveShape::DoubleSmoothUpHalf));
        assert!("wobble".parse::<CurveShape>().is_err());
        for shape in CurveShape::ALL {
            assert_eq!(shape.to_string().parse(), Ok(shape));
        }
    }
}
