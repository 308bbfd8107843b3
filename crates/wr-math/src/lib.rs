//! Warranty reliability math utilities.

pub mod math;

pub use math::gamma::{gamma, ln_gamma};
pub use math::quantile::{quantile, quantile_sorted, quantiles};
pub use math::ranks::{bernard_median_rank, weibull_plot_y};
pub use math::weibull::{fit_weibull_mle, MleError, Weibull, WeibullMle};
