//! Univariate criteria sweeping swarm density over a fixed arena.

use crate::criteria::PerfMeasure;
use crate::criteria::constant_density::floored_population;
use crate::criteria::parser;
use crate::models::{
    AttrChange, AttrChangeSet, ArenaExtent, BatchConfig, BatchResult, XmlTarget,
};
use crate::utils::linspace;

/// `variable_density.<min>.<max>.C<cardinality>`.
///
/// The arena stays at the base extent; the population is swept so that the
/// density moves linearly from min to max (robots per 100 area units).
#[derive(Debug, Clone)]
pub struct VariableDensity {
    cli_arg: String,
    base: ArenaExtent,
    densities: Vec<f64>,
    arena_target: XmlTarget,
    pop_target: XmlTarget,
    changes: Option<Vec<AttrChangeSet>>,
    already_added: bool,
}

impl VariableDensity {
    pub fn new(cli_arg: &str, cfg: &BatchConfig, base: ArenaExtent) -> BatchResult<Self> {
        let def = parser::parse_variable_density(cli_arg)?;
        let densities = linspace(def.min_density, def.max_density, def.cardinality as usize);
        Ok(Self {
            cli_arg: cli_arg.to_string(),
            base,
            densities,
            arena_target: cfg.arena_shape.clone(),
            pop_target: cfg.population.clone(),
            changes: None,
            already_added: false,
        })
    }

    pub fn cli_arg(&self) -> &str {
        &self.cli_arg
    }

    pub fn densities(&self) -> &[f64] {
        &self.densities
    }

    pub fn n_exps(&self) -> usize {
        self.densities.len()
    }

    pub fn gen_attr_changelist(&mut self) -> &[AttrChangeSet] {
        if self.changes.is_none() {
            // The arena is pinned explicitly so templates with a different
            // default extent still run the requested scenario.
            let list = self
                .densities
                .iter()
                .map(|_| {
                    [AttrChange::new(
                        &self.arena_target.path,
                        &self.arena_target.attr,
                        self.base.dims.to_string(),
                    )]
                    .into_iter()
                    .collect()
                })
                .collect();
            self.changes = Some(list);
        }
        if !self.already_added {
            let pops = self.populations();
            if let Some(changes) = self.changes.as_mut() {
                for (set, pop) in changes.iter_mut().zip(pops) {
                    let inject: AttrChangeSet = [AttrChange::new(
                        &self.pop_target.path,
                        &self.pop_target.attr,
                        pop.to_string(),
                    )]
                    .into_iter()
                    .collect();
                    *set |= inject;
                }
            }
            self.already_added = true;
        }
        self.changes.as_deref().unwrap_or_default()
    }

    pub fn gen_exp_names(&self, named: bool) -> Vec<String> {
        if named {
            self.densities
                .iter()
                .map(|d| format!("d{}", format!("{d:.2}").replace('.', "p")))
                .collect()
        } else {
            (0..self.densities.len())
                .map(|i| format!("exp{i}"))
                .collect()
        }
    }

    pub fn populations(&self) -> Vec<usize> {
        self.densities
            .iter()
            .map(|&d| floored_population(&self.base, d))
            .collect()
    }

    pub fn graph_xticks(&self) -> Vec<f64> {
        self.densities.clone()
    }

    pub fn graph_xticklabels(&self) -> Vec<String> {
        self.densities.iter().map(|d| format!("{d:.2}")).collect()
    }

    pub fn graph_xlabel(&self) -> &'static str {
        "Swarm Density"
    }

    pub fn pm_query(&self, measure: PerfMeasure) -> bool {
        matches!(
            measure,
            PerfMeasure::Raw | PerfMeasure::Scalability | PerfMeasure::SelfOrg
        )
    }

    pub fn varies_population(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Vector3D;

    fn base_20x20() -> ArenaExtent {
        ArenaExtent::new(Vector3D::new(20.0, 20.0, 2.0))
    }

    #[test]
    fn test_density_sweep() {
        let c = VariableDensity::new(
            "variable_density.1p0.4p0.C4",
            &BatchConfig::default(),
            base_20x20(),
        )
        .unwrap();
        assert_eq!(c.densities(), &[1.0, 2.0, 3.0, 4.0]);
        // 400 area units: floor(400 * d / 100)
        assert_eq!(c.populations(), vec![4, 8, 12, 16]);
    }

    #[test]
    fn test_flooring_to_one_robot() {
        let c = VariableDensity::new(
            "variable_density.1p0.2p0.C2",
            &BatchConfig::default(),
            ArenaExtent::new(Vector3D::new(5.0, 5.0, 2.0)),
        )
        .unwrap();
        // 25 area units at 1..2 robots per 100 floors to 0; reported as 1.
        assert_eq!(c.populations(), vec![1, 1]);
    }

    #[test]
    fn test_changelist_idempotent() {
        let mut c = VariableDensity::new(
            "variable_density.1p0.4p0.C4",
            &BatchConfig::default(),
            base_20x20(),
        )
        .unwrap();
        let first = c.gen_attr_changelist().to_vec();
        let second = c.gen_attr_changelist().to_vec();
        assert_eq!(first, second);
        assert_eq!(first[0].len(), 2);
    }

    #[test]
    fn test_named_dirnames() {
        let c = VariableDensity::new(
            "variable_density.1p0.2p0.C2",
            &BatchConfig::default(),
            base_20x20(),
        )
        .unwrap();
        assert_eq!(c.gen_exp_names(true), vec!["d1p00", "d2p00"]);
    }
}
