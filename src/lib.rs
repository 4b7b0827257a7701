//! Batch experiment generation core for swarm-robotics simulation campaigns.
//!
//! One XML experiment template goes in; a batch of N (univariate) or N x M
//! (bivariate) concrete experiment definitions comes out, driven by a compact
//! batch-criteria definition string. The crate also carries the pure numeric
//! kernels that turn collected per-experiment results into scalability,
//! self-organization, flexibility and raw performance measures.
//!
//! - [`models`]: diff value objects, geometry primitives, config, errors.
//! - [`services`]: XML document engine, multi-file writer, diff persistence.
//! - [`criteria`]: the batch-criteria DSL and its concrete implementations.
//! - [`measures`]: univariate/bivariate performance-measure kernels.

pub mod criteria;
pub mod measures;
pub mod models;
pub mod services;
pub mod utils;

pub use criteria::{Criteria, PerfMeasure, UnivarCriteria, factory, univar_factory};
pub use models::{
    ArenaExtent, AttrChange, AttrChangeSet, BatchConfig, BatchError, BatchResult, TagAdd,
    TagAddList, TagRm, TagRmList, Vector3D,
};
pub use services::{ExpDef, Writer, WriterConfig};

/// Install the default tracing subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}
