//! Two-parameter Weibull distribution and maximum-likelihood fitting.
//!
//! With shape `beta > 0` and scale `eta > 0`:
//!
//! ```text
//! F(t) = 1 - exp(-(t/eta)^beta)                      t >= 0
//! f(t) = (beta/eta) * (t/eta)^(beta-1) * exp(-(t/eta)^beta)
//! E[T] = eta * Γ(1 + 1/beta)
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::gamma::gamma;

/// Maximum solver iterations before giving up.
pub const MAX_ITER: usize = 200;

/// Relative convergence tolerance on the shape parameter.
const TOL: f64 = 1e-10;

/// Shape bracket limits searched by the solver.
const BETA_FLOOR: f64 = 1e-6;
const BETA_CEILING: f64 = 1e6;

/// A validated Weibull 2P distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weibull {
    /// Shape parameter (beta).
    pub shape: f64,
    /// Scale parameter (eta).
    pub scale: f64,
}

impl Weibull {
    /// `None` unless both parameters are finite and positive.
    pub fn new(shape: f64, scale: f64) -> Option<Self> {
        if !shape.is_finite() || !scale.is_finite() || shape <= 0.0 || scale <= 0.0 {
            return None;
        }
        Some(Self { shape, scale })
    }

    /// Cumulative failure probability F(t). Zero for `t <= 0`.
    pub fn cdf(&self, t: f64) -> f64 {
        if t.is_nan() {
            return f64::NAN;
        }
        if t <= 0.0 {
            return 0.0;
        }
        // -expm1(-z) keeps precision when z is tiny.
        -(-(t / self.scale).powf(self.shape)).exp_m1()
    }

    /// Survival probability R(t) = 1 - F(t). One for `t <= 0`.
    pub fn survival(&self, t: f64) -> f64 {
        if t.is_nan() {
            return f64::NAN;
        }
        if t <= 0.0 {
            return 1.0;
        }
        (-(t / self.scale).powf(self.shape)).exp()
    }

    /// Probability density f(t). Zero for `t < 0`.
    pub fn pdf(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        let z = t / self.scale;
        (self.shape / self.scale) * z.powf(self.shape - 1.0) * (-z.powf(self.shape)).exp()
    }

    /// Hazard rate h(t) = f(t) / R(t).
    pub fn hazard(&self, t: f64) -> f64 {
        if t < 0.0 {
            return 0.0;
        }
        (self.shape / self.scale) * (t / self.scale).powf(self.shape - 1.0)
    }

    /// Mean lifetime `eta * Γ(1 + 1/beta)`; `None` if it overflows.
    pub fn mean(&self) -> Option<f64> {
        let m = self.scale * gamma(1.0 + 1.0 / self.shape);
        if m.is_finite() && m > 0.0 {
            Some(m)
        } else {
            None
        }
    }

    /// Log-likelihood of complete (uncensored) samples.
    pub fn log_likelihood(&self, samples: &[f64]) -> f64 {
        let n = samples.len() as f64;
        let sum_ln: f64 = samples.iter().map(|t| t.ln()).sum();
        let sum_z: f64 = samples
            .iter()
            .map(|&t| (t / self.scale).powf(self.shape))
            .sum();
        n * self.shape.ln() - n * self.shape * self.scale.ln() + (self.shape - 1.0) * sum_ln
            - sum_z
    }
}

/// Successful maximum-likelihood fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeibullMle {
    pub distribution: Weibull,
    /// Log-likelihood at the fitted parameters.
    pub log_likelihood: f64,
    /// Solver iterations used.
    pub iterations: usize,
}

/// Reasons the MLE could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MleError {
    /// Fewer than two samples.
    TooFewSamples { n: usize },
    /// A sample was non-positive or non-finite.
    InvalidSample,
    /// All samples identical; the likelihood has no finite maximum.
    ZeroVariance,
    /// Shape root not found within the iteration budget.
    NonConvergence { iterations: usize },
    /// Solver produced non-finite or non-positive parameters.
    DegenerateParameters,
}

impl fmt::Display for MleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MleError::TooFewSamples { n } => write!(f, "too few samples ({n}, need at least 2)"),
            MleError::InvalidSample => write!(f, "samples must be positive and finite"),
            MleError::ZeroVariance => write!(f, "samples have zero variance"),
            MleError::NonConvergence { iterations } => {
                write!(f, "shape solver did not converge after {iterations} iterations")
            }
            MleError::DegenerateParameters => write!(f, "fit produced degenerate parameters"),
        }
    }
}

impl std::error::Error for MleError {}

/// Profile score for the shape parameter on max-normalized samples.
///
/// `x` holds `t_i / max(t)` so every `x^beta` lies in `(0, 1]` and cannot
/// overflow. Returns `(g(beta), g'(beta), s0)` where
///
/// ```text
/// g(beta) = 1/beta + mean(ln x) - S1/S0
/// S0 = sum(x^beta), S1 = sum(x^beta ln x), S2 = sum(x^beta (ln x)^2)
/// g'(beta) = -1/beta^2 - (S2*S0 - S1^2) / S0^2
/// ```
///
/// `g` is strictly decreasing, so its single root is the MLE shape.
fn profile_score(ln_x: &[f64], mean_ln_x: f64, beta: f64) -> (f64, f64, f64) {
    let mut s0 = 0.0_f64;
    let mut s1 = 0.0_f64;
    let mut s2 = 0.0_f64;
    for &lx in ln_x {
        let w = (beta * lx).exp();
        s0 += w;
        s1 += w * lx;
        s2 += w * lx * lx;
    }
    let g = 1.0 / beta + mean_ln_x - s1 / s0;
    let g_prime = -1.0 / (beta * beta) - (s2 * s0 - s1 * s1) / (s0 * s0);
    (g, g_prime, s0)
}

/// Fit a Weibull 2P distribution to complete failure samples by MLE.
///
/// The shape equation is solved by Newton-Raphson inside a bisection
/// bracket, which always converges for non-degenerate data. The scale then
/// follows in closed form: `eta = (sum(t_i^beta) / n)^(1/beta)`.
///
/// # Reference
/// Lawless (2003), *Statistical Models and Methods for Lifetime Data*, 2nd ed.
pub fn fit_weibull_mle(samples: &[f64]) -> Result<WeibullMle, MleError> {
    let n = samples.len();
    if n < 2 {
        return Err(MleError::TooFewSamples { n });
    }
    if !samples.iter().all(|&t| t.is_finite() && t > 0.0) {
        return Err(MleError::InvalidSample);
    }

    let t_max = samples.iter().copied().fold(f64::MIN, f64::max);
    let ln_x: Vec<f64> = samples.iter().map(|&t| (t / t_max).ln()).collect();
    let min_ln_x = ln_x.iter().copied().fold(f64::MAX, f64::min);
    if min_ln_x == 0.0 {
        return Err(MleError::ZeroVariance);
    }
    let n_f = n as f64;
    let mean_ln_x = ln_x.iter().sum::<f64>() / n_f;

    // Bracket the root: g(lo) > 0 > g(hi).
    let mut lo = 0.5_f64;
    while profile_score(&ln_x, mean_ln_x, lo).0 <= 0.0 {
        lo /= 2.0;
        if lo < BETA_FLOOR {
            return Err(MleError::NonConvergence { iterations: 0 });
        }
    }
    let mut hi = 2.0_f64;
    while profile_score(&ln_x, mean_ln_x, hi).0 >= 0.0 {
        hi *= 2.0;
        if hi > BETA_CEILING {
            return Err(MleError::NonConvergence { iterations: 0 });
        }
    }

    let mut beta = if lo < 1.2 && 1.2 < hi { 1.2 } else { 0.5 * (lo + hi) };
    let mut converged = false;
    let mut iterations = 0;

    for iter in 0..MAX_ITER {
        iterations = iter + 1;
        let (g, g_prime, _) = profile_score(&ln_x, mean_ln_x, beta);
        if g == 0.0 {
            converged = true;
            break;
        }
        if g > 0.0 {
            lo = beta;
        } else {
            hi = beta;
        }

        let newton = beta - g / g_prime;
        let next = if newton.is_finite() && newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };

        let step = (next - beta).abs();
        beta = next;
        if step <= TOL * beta.max(1.0) || (hi - lo) <= TOL * beta.max(1.0) {
            converged = true;
            break;
        }
    }

    if !converged {
        return Err(MleError::NonConvergence { iterations });
    }

    let (_, _, s0) = profile_score(&ln_x, mean_ln_x, beta);
    let eta = t_max * (s0 / n_f).powf(1.0 / beta);
    let distribution = Weibull::new(beta, eta).ok_or(MleError::DegenerateParameters)?;
    let log_likelihood = distribution.log_likelihood(samples);

    Ok(WeibullMle {
        distribution,
        log_likelihood,
        iterations,
    })
}
