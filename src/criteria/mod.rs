//! Batch criteria: parsing a compact definition string into the ordered list
//! (univariate) or grid (bivariate) of diff sets that expand one experiment
//! template into a whole batch.
//!
//! Criteria are pure functions of the definition string and the batch config:
//! later pipeline stages reconstruct them independently, and regenerating from
//! the same inputs must always yield the same diff lists, names and axis
//! values.

pub mod bivar;
pub mod constant_density;
pub mod parser;
pub mod population_size;
pub mod saa_noise;
pub mod variable_density;

pub use bivar::BivarCriteria;
pub use constant_density::ConstantDensity;
pub use parser::{ExpSetupDef, GrowthLaw, SaaCategory};
pub use population_size::PopulationSize;
pub use saa_noise::SaaNoise;
pub use variable_density::VariableDensity;

use crate::models::{
    ArenaExtent, AttrChangeSet, BatchConfig, BatchError, BatchResult, TagAddList, TagRmList,
};

/// Performance measures a criteria may (or may not) be able to answer for.
/// Callers check this before invoking a measure kernel; computing an
/// unsupported measure is undefined (the kernels assume population varies
/// monotonically with experiment index).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerfMeasure {
    Raw,
    Scalability,
    SelfOrg,
    Flexibility,
    RobustnessSaa,
}

/// Closed set of univariate criteria kinds.
#[derive(Debug, Clone)]
pub enum UnivarCriteria {
    PopulationSize(PopulationSize),
    ConstantDensity(ConstantDensity),
    VariableDensity(VariableDensity),
    SaaNoise(SaaNoise),
}

macro_rules! delegate {
    ($self:ident, $c:ident => $body:expr) => {
        match $self {
            UnivarCriteria::PopulationSize($c) => $body,
            UnivarCriteria::ConstantDensity($c) => $body,
            UnivarCriteria::VariableDensity($c) => $body,
            UnivarCriteria::SaaNoise($c) => $body,
        }
    };
}

impl UnivarCriteria {
    pub fn cli_arg(&self) -> &str {
        delegate!(self, c => c.cli_arg())
    }

    pub fn n_exps(&self) -> usize {
        delegate!(self, c => c.n_exps())
    }

    /// Per-experiment attribute changesets, memoized on first call.
    pub fn gen_attr_changelist(&mut self) -> &[AttrChangeSet] {
        delegate!(self, c => c.gen_attr_changelist())
    }

    /// Per-experiment tag additions. None of the current criteria model their
    /// variation through added tags, so the lists are empty; platforms whose
    /// population is tag-shaped hook in here.
    pub fn gen_tag_addlist(&mut self) -> Vec<TagAddList> {
        vec![TagAddList::new(); self.n_exps()]
    }

    /// Per-experiment tag removals; empty for the current criteria.
    pub fn gen_tag_rmlist(&mut self) -> Vec<TagRmList> {
        vec![TagRmList::new(); self.n_exps()]
    }

    pub fn gen_exp_names(&self, named: bool) -> Vec<String> {
        delegate!(self, c => c.gen_exp_names(named))
    }

    /// Population per experiment, when the criteria determines it.
    pub fn populations(&self) -> Option<Vec<usize>> {
        match self {
            UnivarCriteria::PopulationSize(c) => Some(c.populations()),
            UnivarCriteria::ConstantDensity(c) => Some(c.populations()),
            UnivarCriteria::VariableDensity(c) => Some(c.populations()),
            UnivarCriteria::SaaNoise(c) => c.populations(),
        }
    }

    pub fn graph_xticks(&self) -> Vec<f64> {
        delegate!(self, c => c.graph_xticks())
    }

    pub fn graph_xticklabels(&self) -> Vec<String> {
        delegate!(self, c => c.graph_xticklabels())
    }

    pub fn graph_xlabel(&self) -> &'static str {
        delegate!(self, c => c.graph_xlabel())
    }

    pub fn pm_query(&self, measure: PerfMeasure) -> bool {
        delegate!(self, c => c.pm_query(measure))
    }

    /// Whether swarm size changes across the experiments of this criteria.
    pub fn varies_population(&self) -> bool {
        delegate!(self, c => c.varies_population())
    }
}

/// One or two variation axes.
#[derive(Debug, Clone)]
pub enum Criteria {
    Univar(UnivarCriteria),
    Bivar(BivarCriteria),
}

/// Build a univariate criteria from one definition string.
pub fn univar_factory(
    def: &str,
    cfg: &BatchConfig,
    base_extent: ArenaExtent,
) -> BatchResult<UnivarCriteria> {
    match parser::category(def) {
        "population_size" => Ok(UnivarCriteria::PopulationSize(PopulationSize::new(
            def, cfg,
        )?)),
        "constant_density" => Ok(UnivarCriteria::ConstantDensity(ConstantDensity::new(
            def,
            cfg,
            base_extent,
        )?)),
        "variable_density" => Ok(UnivarCriteria::VariableDensity(VariableDensity::new(
            def,
            cfg,
            base_extent,
        )?)),
        "saa_noise" => Ok(UnivarCriteria::SaaNoise(SaaNoise::new(def, cfg)?)),
        other => Err(BatchError::CriteriaParse {
            input: def.to_string(),
            section: other.to_string(),
            reason: "unknown criteria category".to_string(),
        }),
    }
}

/// Build the batch criteria from the definition strings given on the command
/// line: one string for a univariate batch, two for a bivariate batch. More
/// than two axes, or the same category on both axes, are hard errors.
pub fn factory(
    defs: &[&str],
    cfg: &BatchConfig,
    base_extent: ArenaExtent,
) -> BatchResult<Criteria> {
    match defs {
        [def] => Ok(Criteria::Univar(univar_factory(def, cfg, base_extent)?)),
        [def1, def2] => {
            if parser::category(def1) == parser::category(def2) {
                return Err(BatchError::CriteriaSetup(format!(
                    "duplicate criteria category '{}' on both axes",
                    parser::category(def1)
                )));
            }
            Ok(Criteria::Bivar(BivarCriteria::new(
                univar_factory(def1, cfg, base_extent)?,
                univar_factory(def2, cfg, base_extent)?,
            )))
        }
        [] => Err(BatchError::CriteriaSetup(
            "at least one batch criteria definition is required".to_string(),
        )),
        _ => Err(BatchError::CriteriaSetup(format!(
            "at most two batch criteria are supported, got {}",
            defs.len()
        ))),
    }
}
