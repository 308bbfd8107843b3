//! Per-cohort Weibull fitting and milestone probabilities.

use serde::{Deserialize, Serialize};
use wr_config::MilestoneConfig;
use wr_math::{fit_weibull_mle, MleError, Weibull};

use super::outlier::FilteredSample;

/// A successful two-parameter fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeibullFit {
    /// Shape (beta).
    pub shape: f64,
    /// Scale (eta), in distance units.
    pub scale: f64,
    pub log_likelihood: f64,
    pub iterations: usize,
    /// Number of samples the fit used.
    pub sample_size: usize,
}

impl WeibullFit {
    pub fn distribution(&self) -> Option<Weibull> {
        Weibull::new(self.shape, self.scale)
    }
}

/// Why a cohort has no fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum FitUnavailable {
    /// Fewer usable samples than required, before or after trimming.
    InsufficientSamples { before: usize, after: usize },
    /// A sample was non-positive or non-finite (e.g. after perturbation).
    InvalidSample,
    NonConvergence { iterations: usize },
    /// Non-positive, non-finite, or undefined parameters.
    DegenerateParameters,
}

impl std::fmt::Display for FitUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InsufficientSamples { before, after } => {
                write!(f, "insufficient_samples ({before} raw, {after} retained)")
            }
            Self::InvalidSample => write!(f, "invalid_sample"),
            Self::NonConvergence { iterations } => {
                write!(f, "non_convergence ({iterations} iterations)")
            }
            Self::DegenerateParameters => write!(f, "degenerate_parameters"),
        }
    }
}

impl From<MleError> for FitUnavailable {
    fn from(err: MleError) -> Self {
        match err {
            MleError::TooFewSamples { n } => Self::InsufficientSamples {
                before: n,
                after: n,
            },
            MleError::InvalidSample => Self::InvalidSample,
            MleError::NonConvergence { iterations } => Self::NonConvergence { iterations },
            MleError::ZeroVariance | MleError::DegenerateParameters => Self::DegenerateParameters,
        }
    }
}

/// Either a fit or the reason there is none. Callers branch on this; the
/// estimator never panics or returns an error for per-cohort problems.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FitOutcome {
    Fitted(WeibullFit),
    Unavailable(FitUnavailable),
}

impl FitOutcome {
    pub fn fit(&self) -> Option<&WeibullFit> {
        match self {
            FitOutcome::Fitted(fit) => Some(fit),
            FitOutcome::Unavailable(_) => None,
        }
    }

    pub fn shape(&self) -> Option<f64> {
        self.fit().map(|f| f.shape)
    }

    pub fn scale(&self) -> Option<f64> {
        self.fit().map(|f| f.scale)
    }

    pub fn is_fitted(&self) -> bool {
        matches!(self, FitOutcome::Fitted(_))
    }
}

/// Cumulative failure probability at one milestone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MilestoneProbability {
    pub distance: f64,
    /// `None` when the fit is unavailable.
    pub probability: Option<f64>,
}

/// Fit plus every derived quantity for one cohort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub fit: FitOutcome,
    /// `eta * Γ(1 + 1/beta)`.
    pub theoretical_mean: Option<f64>,
    /// In milestone order.
    pub milestones: Vec<MilestoneProbability>,
    /// Probability of surviving beyond the far threshold.
    pub far_survival: Option<f64>,
}

impl Estimate {
    /// Probability at the nearest (first) milestone.
    pub fn nearest_probability(&self) -> Option<f64> {
        self.milestones.first().and_then(|m| m.probability)
    }
}

/// Fits cohorts against a fixed milestone grid.
#[derive(Debug, Clone)]
pub struct WeibullEstimator {
    milestones: Vec<f64>,
    far_threshold: f64,
}

impl WeibullEstimator {
    pub fn new(config: &MilestoneConfig) -> Self {
        Self {
            milestones: config.distances.clone(),
            far_threshold: config.far_threshold,
        }
    }

    pub fn milestones(&self) -> &[f64] {
        &self.milestones
    }

    pub fn far_threshold(&self) -> f64 {
        self.far_threshold
    }

    /// An estimate with every derived value unavailable.
    pub fn unavailable(&self, reason: FitUnavailable) -> Estimate {
        Estimate {
            fit: FitOutcome::Unavailable(reason),
            theoretical_mean: None,
            milestones: self
                .milestones
                .iter()
                .map(|&distance| MilestoneProbability {
                    distance,
                    probability: None,
                })
                .collect(),
            far_survival: None,
        }
    }

    /// Fit a filtered sample and derive milestone probabilities.
    pub fn estimate(&self, sample: &FilteredSample) -> Estimate {
        let mle = match fit_weibull_mle(&sample.values) {
            Ok(mle) => mle,
            Err(err) => return self.unavailable(err.into()),
        };
        let dist = mle.distribution;
        // fit_weibull_mle only returns validated parameters; re-check so a
        // degenerate pair can never reach the probability math.
        let Some(dist) = Weibull::new(dist.shape, dist.scale) else {
            return self.unavailable(FitUnavailable::DegenerateParameters);
        };

        let milestones = self
            .milestones
            .iter()
            .map(|&distance| MilestoneProbability {
                distance,
                probability: finite(if distance > 0.0 { dist.cdf(distance) } else { 0.0 }),
            })
            .collect();

        let far_survival = match sample.min() {
            Some(min) if self.far_threshold > min => finite(dist.survival(self.far_threshold)),
            _ => None,
        };

        Estimate {
            fit: FitOutcome::Fitted(WeibullFit {
                shape: dist.shape,
                scale: dist.scale,
                log_likelihood: mle.log_likelihood,
                iterations: mle.iterations,
                sample_size: sample.len(),
            }),
            theoretical_mean: dist.mean(),
            milestones,
            far_survival,
        }
    }
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}
