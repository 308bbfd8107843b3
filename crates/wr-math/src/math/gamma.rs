//! Gamma function via the Lanczos approximation.
//!
//! Only the positive real axis matters for Weibull moments (the argument is
//! always `1 + k/beta` with `beta > 0`), but the reflection formula keeps the
//! functions well defined for non-integer negative inputs as well.

use std::f64::consts::PI;

/// Lanczos parameter g.
const LANCZOS_G: f64 = 7.0;

/// Lanczos coefficients for g = 7, n = 9.
#[allow(clippy::excessive_precision)]
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_9,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of |Γ(x)|.
///
/// Returns `+inf` at the poles (0, -1, -2, ...) and NaN for NaN input.
pub fn ln_gamma(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= 0.0 && x.fract() == 0.0 {
        return f64::INFINITY;
    }
    if x < 0.5 {
        // Reflection: Γ(x)Γ(1-x) = π / sin(πx)
        return PI.ln() - (PI * x).sin().abs().ln() - ln_gamma(1.0 - x);
    }

    let x_minus_one = x - 1.0;
    let mut base = LANCZOS_COEFFICIENTS[0];
    for (i, &c) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
        base += c / (x_minus_one + i as f64);
    }

    let t = x_minus_one + LANCZOS_G + 0.5;
    let log_2pi = (2.0 * PI).ln();
    0.5f64.mul_add(log_2pi, t.ln() * (x_minus_one + 0.5)) - t + base.ln()
}

/// Γ(x) for real x.
///
/// NaN at the poles (0, -1, -2, ...). Overflows to `+inf` for x above ~171.6,
/// matching the range of `f64`.
pub fn gamma(x: f64) -> f64 {
    if x.is_nan() || (x <= 0.0 && x.fract() == 0.0) {
        return f64::NAN;
    }
    if x < 0.5 {
        return PI / ((PI * x).sin() * gamma(1.0 - x));
    }
    ln_gamma(x).exp()
}
