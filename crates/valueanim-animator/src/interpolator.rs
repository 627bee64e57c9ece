//! Progress curves.
//!
//! An [`Interpolator`] maps linear elapsed progress to eased progress. Inputs
//! above `1.0` are possible (a tick can land after the nominal end) and are
//! passed through unclamped, so a curve sees exactly what the timer produced.

use std::f32::consts::PI;

/// Maps linear progress to eased progress.
pub trait Interpolator {
    fn interpolation(&self, input: f32) -> f32;
}

impl<F> Interpolator for F
where
    F: Fn(f32) -> f32,
{
    fn interpolation(&self, input: f32) -> f32 {
        self(input)
    }
}

/// Built-in curves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    /// Cosine ease in and out; what an animator falls back to when started
    /// without a curve.
    #[default]
    AccelerateDecelerate,
    /// No easing.
    Linear,
    /// Quadratic ease in.
    Accelerate,
    /// Quadratic ease out.
    Decelerate,
    EaseIn,
    EaseOut,
    EaseInOut,
    /// Material standard curve.
    FastOutSlowIn,
    LinearOutSlowIn,
    FastOutLinearIn,
}

impl Easing {
    pub fn transform(&self, input: f32) -> f32 {
        match self {
            Easing::AccelerateDecelerate => ((input + 1.0) * PI).cos() / 2.0 + 0.5,
            Easing::Linear => input,
            Easing::Accelerate => input * input,
            Easing::Decelerate => 1.0 - (1.0 - input) * (1.0 - input),
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, input),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, input),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, input),
            Easing::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, input),
            Easing::LinearOutSlowIn => cubic_bezier(0.0, 0.0, 0.2, 1.0, input),
            Easing::FastOutLinearIn => cubic_bezier(0.4, 0.0, 1.0, 1.0, input),
        }
    }
}

impl Interpolator for Easing {
    fn interpolation(&self, input: f32) -> f32 {
        self.transform(input)
    }
}

/// Evaluates the bezier through (0,0), (x1,y1), (x2,y2), (1,1) at `x`.
///
/// Bezier curves are only defined on [0, 1]; inputs outside are clamped.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, x: f32) -> f32 {
    let x = x.clamp(0.0, 1.0);
    let t = solve_bezier_t(x1, x2, x);
    bezier_component(y1, y2, t)
}

fn bezier_component(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * t * p1 + 3.0 * mt * t * t * p2 + t * t * t
}

fn bezier_slope(p1: f32, p2: f32, t: f32) -> f32 {
    let mt = 1.0 - t;
    3.0 * mt * mt * p1 + 6.0 * mt * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

fn solve_bezier_t(x1: f32, x2: f32, x: f32) -> f32 {
    const EPSILON: f32 = 1e-6;

    // Newton-Raphson first, bisection if the slope flattens out.
    let mut t = x;
    for _ in 0..8 {
        let error = bezier_component(x1, x2, t) - x;
        if error.abs() < EPSILON {
            return t;
        }
        let slope = bezier_slope(x1, x2, t);
        if slope.abs() < EPSILON {
            break;
        }
        t = (t - error / slope).clamp(0.0, 1.0);
    }

    let (mut low, mut high) = (0.0f32, 1.0f32);
    t = x;
    for _ in 0..32 {
        let value = bezier_component(x1, x2, t);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            low = t;
        } else {
            high = t;
        }
        t = (low + high) / 2.0;
    }
    t
}
