//! Univariate criteria sweeping sensor/actuator noise levels.

use crate::criteria::PerfMeasure;
use crate::criteria::parser::{self, SaaCategory};
use crate::models::{
    AttrChange, AttrChangeSet, BatchConfig, BatchResult, NoiseTarget, XmlTarget,
};

/// `saa_noise.{sensors,actuators,all}.C<cardinality>[.Z<population>]`.
///
/// Step `i` sets every selected noise target to
/// `min + (max - min) * i / (cardinality - 1)`. With a `Z` override the fixed
/// population change is unioned into every generated set, so the sweep runs at
/// a constant swarm size.
#[derive(Debug, Clone)]
pub struct SaaNoise {
    cli_arg: String,
    category: SaaCategory,
    cardinality: u32,
    population: Option<u32>,
    targets: Vec<NoiseTarget>,
    pop_target: XmlTarget,
    changes: Option<Vec<AttrChangeSet>>,
}

impl SaaNoise {
    pub fn new(cli_arg: &str, cfg: &BatchConfig) -> BatchResult<Self> {
        let def = parser::parse_saa_noise(cli_arg)?;
        let mut targets = Vec::new();
        if matches!(def.category, SaaCategory::Sensors | SaaCategory::All) {
            targets.extend(cfg.sensor_noise.iter().cloned());
        }
        if matches!(def.category, SaaCategory::Actuators | SaaCategory::All) {
            targets.extend(cfg.actuator_noise.iter().cloned());
        }
        Ok(Self {
            cli_arg: cli_arg.to_string(),
            category: def.category,
            cardinality: def.cardinality,
            population: def.population,
            targets,
            pop_target: cfg.population.clone(),
            changes: None,
        })
    }

    pub fn cli_arg(&self) -> &str {
        &self.cli_arg
    }

    pub fn category(&self) -> SaaCategory {
        self.category
    }

    pub fn n_exps(&self) -> usize {
        self.cardinality as usize
    }

    /// Normalized sweep position per experiment, `0.0..=1.0`.
    pub fn levels(&self) -> Vec<f64> {
        crate::utils::linspace(0.0, 1.0, self.cardinality as usize)
    }

    pub fn gen_attr_changelist(&mut self) -> &[AttrChangeSet] {
        if self.changes.is_none() {
            let list = self
                .levels()
                .iter()
                .map(|&frac| {
                    let mut set: AttrChangeSet = self
                        .targets
                        .iter()
                        .map(|t| {
                            let value = t.min + (t.max - t.min) * frac;
                            AttrChange::new(&t.target.path, &t.target.attr, format!("{value}"))
                        })
                        .collect();
                    if let Some(pop) = self.population {
                        let inject: AttrChangeSet = [AttrChange::new(
                            &self.pop_target.path,
                            &self.pop_target.attr,
                            pop.to_string(),
                        )]
                        .into_iter()
                        .collect();
                        set |= inject;
                    }
                    set
                })
                .collect();
            self.changes = Some(list);
        }
        self.changes.as_deref().unwrap_or_default()
    }

    pub fn gen_exp_names(&self, named: bool) -> Vec<String> {
        if named {
            self.levels()
                .iter()
                .map(|l| format!("n{}", format!("{l:.2}").replace('.', "p")))
                .collect()
        } else {
            (0..self.n_exps()).map(|i| format!("exp{i}")).collect()
        }
    }

    /// Population only known when fixed by the `Z` override.
    pub fn populations(&self) -> Option<Vec<usize>> {
        self.population
            .map(|p| vec![p as usize; self.n_exps()])
    }

    pub fn graph_xticks(&self) -> Vec<f64> {
        self.levels()
    }

    pub fn graph_xticklabels(&self) -> Vec<String> {
        self.levels().iter().map(|l| format!("{l:.2}")).collect()
    }

    pub fn graph_xlabel(&self) -> &'static str {
        "Noise Level"
    }

    pub fn pm_query(&self, measure: PerfMeasure) -> bool {
        matches!(measure, PerfMeasure::Raw | PerfMeasure::RobustnessSaa)
    }

    /// The noise sweep never varies swarm size; with `Z` it explicitly pins
    /// it.
    pub fn varies_population(&self) -> bool {
        false
    }
}
