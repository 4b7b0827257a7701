//! Performance-measure kernels. Each measure is a pure numeric formula over
//! already-collected per-experiment data, wrapped by a univariate driver
//! (1D batch) and a bivariate driver (2D grid walking the population axis).

pub mod common;
pub mod flexibility;
pub mod raw;
pub mod scalability;
pub mod self_organization;
pub mod vcs;

pub use common::{
    FractionalLossesBivar, FractionalLossesUnivar, fractional_loss_kernel, normalize_theta,
    plost_kernel, sigmoid,
};
pub use flexibility::{CurveComparisonBivar, CurveComparisonUnivar, WeightedPm};
pub use raw::{RawBivar, RawUnivar};
pub use scalability::{
    NormalizedEfficiencyBivar, NormalizedEfficiencyUnivar, ParallelFractionBivar,
    ParallelFractionUnivar, efficiency_kernel, parallel_fraction_kernel,
};
pub use self_organization::{
    FlInteractiveBivar, FlInteractiveUnivar, FlMarginalBivar, FlMarginalUnivar, PgInteractiveBivar,
    PgInteractiveUnivar, PgMarginalBivar, PgMarginalUnivar,
};
pub use vcs::CurveSimilarity;
