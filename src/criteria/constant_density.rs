//! Univariate criteria holding swarm density constant while the arena grows.

use crate::criteria::PerfMeasure;
use crate::criteria::parser::{self, ConstantDensityDef};
use crate::models::{
    AttrChange, AttrChangeSet, ArenaExtent, BatchConfig, BatchResult, Vector3D, XmlTarget,
};
use tracing::warn;

/// `constant_density.<density>.I<increment>.C<cardinality>`.
///
/// Experiment `i` scales the base arena's X dimension by `i * increment`
/// (preserving the base aspect ratio) and sets the population so that
/// `population / area` stays at the requested density (robots per 100 area
/// units).
#[derive(Debug, Clone)]
pub struct ConstantDensity {
    cli_arg: String,
    def: ConstantDensityDef,
    extents: Vec<ArenaExtent>,
    arena_target: XmlTarget,
    pop_target: XmlTarget,
    changes: Option<Vec<AttrChangeSet>>,
    already_added: bool,
}

impl ConstantDensity {
    pub fn new(cli_arg: &str, cfg: &BatchConfig, base: ArenaExtent) -> BatchResult<Self> {
        let def = parser::parse_constant_density(cli_arg)?;
        let aspect = base.dims.y / base.dims.x;
        let extents = (0..def.cardinality)
            .map(|i| {
                let x = base.dims.x + (i * def.arena_increment) as f64;
                ArenaExtent::new(Vector3D::new(x, x * aspect, base.dims.z))
            })
            .collect();
        Ok(Self {
            cli_arg: cli_arg.to_string(),
            def,
            extents,
            arena_target: cfg.arena_shape.clone(),
            pop_target: cfg.population.clone(),
            changes: None,
            already_added: false,
        })
    }

    pub fn cli_arg(&self) -> &str {
        &self.cli_arg
    }

    pub fn extents(&self) -> &[ArenaExtent] {
        &self.extents
    }

    pub fn n_exps(&self) -> usize {
        self.extents.len()
    }

    pub fn gen_attr_changelist(&mut self) -> &[AttrChangeSet] {
        if self.changes.is_none() {
            let list = self
                .extents
                .iter()
                .map(|ext| {
                    [AttrChange::new(
                        &self.arena_target.path,
                        &self.arena_target.attr,
                        ext.dims.to_string(),
                    )]
                    .into_iter()
                    .collect()
                })
                .collect();
            self.changes = Some(list);
        }
        // The population change is injected into the generated changesets
        // exactly once; regenerating must not double-append.
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
            self.extents
                .iter()
                .map(|e| format!("{}x{}", e.dims.x, e.dims.y))
                .collect()
        } else {
            (0..self.extents.len()).map(|i| format!("exp{i}")).collect()
        }
    }

    /// Population per experiment: `floor(area * density / 100)`, floored to a
    /// minimum of one robot (a zero-robot simulation cannot start). The
    /// substitution silently changes the requested density for very sparse
    /// configurations, so it is logged.
    pub fn populations(&self) -> Vec<usize> {
        self.extents
            .iter()
            .map(|ext| floored_population(ext, self.def.density))
            .collect()
    }

    pub fn graph_xticks(&self) -> Vec<f64> {
        self.populations().iter().map(|&p| p as f64).collect()
    }

    pub fn graph_xticklabels(&self) -> Vec<String> {
        self.populations().iter().map(|p| p.to_string()).collect()
    }

    pub fn graph_xlabel(&self) -> &'static str {
        "Swarm Size"
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

pub(crate) fn floored_population(ext: &ArenaExtent, density: f64) -> usize {
    let requested = (ext.area() * density / 100.0).floor() as usize;
    if requested == 0 {
        warn!(
            area = ext.area(),
            density, "requested density yields zero robots, flooring population to 1"
        );
        1
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_20x20() -> ArenaExtent {
        ArenaExtent::new(Vector3D::new(20.0, 20.0, 2.0))
    }

    #[test]
    fn test_arena_progression() {
        let c = ConstantDensity::new(
            "constant_density.1p0.I16.C3",
            &BatchConfig::default(),
            base_20x20(),
        )
        .unwrap();
        let dims: Vec<(f64, f64)> = c.extents().iter().map(|e| (e.dims.x, e.dims.y)).collect();
        assert_eq!(dims, vec![(20.0, 20.0), (36.0, 36.0), (52.0, 52.0)]);
    }

    #[test]
    fn test_populations_follow_density() {
        let c = ConstantDensity::new(
            "constant_density.1p0.I16.C3",
            &BatchConfig::default(),
            base_20x20(),
        )
        .unwrap();
        // floor(400 * 0.01), floor(1296 * 0.01), floor(2704 * 0.01)
        assert_eq!(c.populations(), vec![4, 12, 27]);
    }

    #[test]
    fn test_population_floored_to_one() {
        let c = ConstantDensity::new(
            "constant_density.1p0.I4.C2",
            &BatchConfig::default(),
            ArenaExtent::new(Vector3D::new(4.0, 4.0, 2.0)),
        )
        .unwrap();
        // 16 and 64 area units at 1 robot per 100: both floor to 0, report 1.
        assert_eq!(c.populations(), vec![1, 1]);
    }

    #[test]
    fn test_population_injected_exactly_once() {
        let cfg = BatchConfig::default();
        let mut c =
            ConstantDensity::new("constant_density.1p0.I16.C3", &cfg, base_20x20()).unwrap();

        let first = c.gen_attr_changelist().to_vec();
        let second = c.gen_attr_changelist().to_vec();
        assert_eq!(first, second);
        // Arena shape change plus population change per experiment.
        assert_eq!(first[0].len(), 2);
        assert!(first[1].contains(&AttrChange::new(
            &cfg.population.path,
            &cfg.population.attr,
            "12"
        )));
    }

    #[test]
    fn test_aspect_ratio_preserved() {
        let c = ConstantDensity::new(
            "constant_density.1p0.I10.C2",
            &BatchConfig::default(),
            ArenaExtent::new(Vector3D::new(10.0, 5.0, 2.0)),
        )
        .unwrap();
        assert_eq!(c.extents()[1].dims.x, 20.0);
        assert_eq!(c.extents()[1].dims.y, 10.0);
    }
}
