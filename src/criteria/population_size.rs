//! Univariate criteria varying the swarm population directly.

use crate::criteria::PerfMeasure;
use crate::criteria::parser::{self, GrowthLaw};
use crate::models::{AttrChange, AttrChangeSet, BatchConfig, BatchResult, XmlTarget};

/// `population_size.{Log,Linear}<N>[.C<card>]`.
///
/// `Linear<n>` expands to the ten sizes `n, 2n, ..., 10n`; `Log<max>` to the
/// powers of two `1, 2, 4, ..., max`.
#[derive(Debug, Clone)]
pub struct PopulationSize {
    cli_arg: String,
    target: XmlTarget,
    sizes: Vec<u32>,
    changes: Option<Vec<AttrChangeSet>>,
}

impl PopulationSize {
    pub fn new(cli_arg: &str, cfg: &BatchConfig) -> BatchResult<Self> {
        let def = parser::parse_population_size(cli_arg)?;
        let sizes = match def.law {
            GrowthLaw::Linear => (1..=10).map(|i| i * def.magnitude).collect(),
            GrowthLaw::Log => {
                let exps = def.magnitude.ilog2();
                (0..=exps).map(|e| 1u32 << e).collect()
            }
        };
        Ok(Self {
            cli_arg: cli_arg.to_string(),
            target: cfg.population.clone(),
            sizes,
            changes: None,
        })
    }

    pub fn cli_arg(&self) -> &str {
        &self.cli_arg
    }

    pub fn sizes(&self) -> &[u32] {
        &self.sizes
    }

    pub fn n_exps(&self) -> usize {
        self.sizes.len()
    }

    pub fn gen_attr_changelist(&mut self) -> &[AttrChangeSet] {
        if self.changes.is_none() {
            let list = self
                .sizes
                .iter()
                .map(|size| {
                    [AttrChange::new(
                        &self.target.path,
                        &self.target.attr,
                        size.to_string(),
                    )]
                    .into_iter()
                    .collect()
                })
                .collect();
            self.changes = Some(list);
        }
        self.changes.as_deref().unwrap_or_default()
    }

    pub fn gen_exp_names(&self, named: bool) -> Vec<String> {
        if named {
            self.sizes.iter().map(|s| format!("size{s}")).collect()
        } else {
            (0..self.sizes.len()).map(|i| format!("exp{i}")).collect()
        }
    }

    pub fn populations(&self) -> Vec<usize> {
        self.sizes.iter().map(|&s| s as usize).collect()
    }

    pub fn graph_xticks(&self) -> Vec<f64> {
        self.sizes.iter().map(|&s| s as f64).collect()
    }

    pub fn graph_xticklabels(&self) -> Vec<String> {
        self.sizes.iter().map(|s| s.to_string()).collect()
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_expansion() {
        let mut c = PopulationSize::new("population_size.Linear3.C3", &BatchConfig::default())
            .unwrap();
        assert_eq!(c.sizes(), &[3, 6, 9, 12, 15, 18, 21, 24, 27, 30]);
        assert_eq!(c.gen_attr_changelist().len(), 10);
        assert_eq!(
            c.gen_exp_names(false),
            (0..10).map(|i| format!("exp{i}")).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_log_expansion() {
        let c = PopulationSize::new("population_size.Log16", &BatchConfig::default()).unwrap();
        assert_eq!(c.sizes(), &[1, 2, 4, 8, 16]);
    }

    #[test]
    fn test_changelist_targets_population_attr() {
        let cfg = BatchConfig::default();
        let mut c = PopulationSize::new("population_size.Log4", &cfg).unwrap();
        let changes = c.gen_attr_changelist();
        let expected: AttrChangeSet = [AttrChange::new(
            &cfg.population.path,
            &cfg.population.attr,
            "4",
        )]
        .into_iter()
        .collect();
        assert_eq!(changes[2], expected);
    }

    #[test]
    fn test_memoized_generation_is_idempotent() {
        let mut c = PopulationSize::new("population_size.Log8", &BatchConfig::default()).unwrap();
        let first = c.gen_attr_changelist().to_vec();
        let second = c.gen_attr_changelist().to_vec();
        assert_eq!(first, second);
        assert_eq!(first[0].len(), 1);
    }

    #[test]
    fn test_named_dirnames() {
        let c = PopulationSize::new("population_size.Log4", &BatchConfig::default()).unwrap();
        assert_eq!(c.gen_exp_names(true), vec!["size1", "size2", "size4"]);
    }
}
