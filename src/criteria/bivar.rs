//! Composition of two univariate criteria into an N x M experiment grid.

use crate::criteria::{PerfMeasure, UnivarCriteria};
use crate::models::{AttrChangeSet, BatchError, BatchResult};

/// Grid layout: index `[i][j]` is criteria1's experiment `i` crossed with
/// criteria2's experiment `j`.
#[derive(Debug, Clone)]
pub struct BivarCriteria {
    c1: UnivarCriteria,
    c2: UnivarCriteria,
    changes: Option<Vec<Vec<AttrChangeSet>>>,
}

impl BivarCriteria {
    pub fn new(c1: UnivarCriteria, c2: UnivarCriteria) -> Self {
        Self {
            c1,
            c2,
            changes: None,
        }
    }

    pub fn criteria1(&self) -> &UnivarCriteria {
        &self.c1
    }

    pub fn criteria2(&self) -> &UnivarCriteria {
        &self.c2
    }

    pub fn grid_shape(&self) -> (usize, usize) {
        (self.c1.n_exps(), self.c2.n_exps())
    }

    /// Per-cell diff set: the union of criteria1's i-th set and criteria2's
    /// j-th set.
    pub fn gen_attr_changelist(&mut self) -> &[Vec<AttrChangeSet>] {
        if self.changes.is_none() {
            let rows = self.c1.gen_attr_changelist().to_vec();
            let cols = self.c2.gen_attr_changelist().to_vec();
            let grid = rows
                .iter()
                .map(|row| {
                    cols.iter()
                        .map(|col| row.clone() | col.clone())
                        .collect::<Vec<_>>()
                })
                .collect();
            self.changes = Some(grid);
        }
        self.changes.as_deref().unwrap_or_default()
    }

    /// Axis-concatenated names, e.g. `exp0+exp2` or `size16+n0p50`.
    pub fn gen_exp_names(&self, named: bool) -> Vec<Vec<String>> {
        let names1 = self.c1.gen_exp_names(named);
        let names2 = self.c2.gen_exp_names(named);
        names1
            .iter()
            .map(|n1| names2.iter().map(|n2| format!("{n1}+{n2}")).collect())
            .collect()
    }

    /// Which grid axis varies the population. Formulas comparing experiment
    /// `i` against `i-1` must walk this axis; the other axis is held fixed.
    /// An explicit override wins; otherwise criteria1 takes precedence.
    pub fn get_primary_axis(&self, cli_override: Option<usize>) -> BatchResult<usize> {
        match cli_override {
            Some(axis @ (0 | 1)) => Ok(axis),
            Some(axis) => Err(BatchError::CriteriaSetup(format!(
                "primary axis override must be 0 or 1, got {axis}"
            ))),
            None if self.c1.varies_population() => Ok(0),
            None if self.c2.varies_population() => Ok(1),
            None => Err(BatchError::CriteriaSetup(
                "neither criteria varies the population; no primary axis".to_string(),
            )),
        }
    }

    /// Population per grid cell, broadcast from the population-bearing axis.
    pub fn populations_grid(&self, cli_override: Option<usize>) -> BatchResult<Vec<Vec<usize>>> {
        let axis = self.get_primary_axis(cli_override)?;
        let (rows, cols) = self.grid_shape();
        let source = if axis == 0 { &self.c1 } else { &self.c2 };
        let pops = source.populations().ok_or_else(|| {
            BatchError::CriteriaSetup(format!(
                "primary axis criteria '{}' has no population data",
                source.cli_arg()
            ))
        })?;
        let grid = (0..rows)
            .map(|i| {
                (0..cols)
                    .map(|j| if axis == 0 { pops[i] } else { pops[j] })
                    .collect()
            })
            .collect();
        Ok(grid)
    }

    pub fn graph_xticks(&self) -> Vec<f64> {
        self.c1.graph_xticks()
    }

    pub fn graph_yticks(&self) -> Vec<f64> {
        self.c2.graph_xticks()
    }

    pub fn graph_xlabel(&self) -> &'static str {
        self.c1.graph_xlabel()
    }

    pub fn graph_ylabel(&self) -> &'static str {
        self.c2.graph_xlabel()
    }

    /// A measure is computable if either component criteria supports it.
    pub fn pm_query(&self, measure: PerfMeasure) -> bool {
        self.c1.pm_query(measure) || self.c2.pm_query(measure)
    }
}
