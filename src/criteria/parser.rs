//! Parsers for the compact batch criteria DSL.
//!
//! Grammar: `<category>.<definition>[.<definition>...]`, where each definition
//! token starts with a known sigil (`I` increment, `C` cardinality, `Z`
//! population override, `T` duration, `K` ticks/sec, `N` datapoints, `p` the
//! fractional-mantissa marker). Parse failures are always hard errors naming
//! the offending section and the full input; there is no partial parse.

use crate::models::{BatchError, BatchResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static GROWTH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(Log|Linear)(\d+)$").unwrap());
static DENSITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)p(\d+)$").unwrap());
static CARDINALITY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^C(\d+)$").unwrap());
static INCREMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^I(\d+)$").unwrap());
static POPULATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^Z(\d+)$").unwrap());
static DURATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^T(\d+)$").unwrap());
static TICKS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^K(\d+)$").unwrap());
static DATAPOINTS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^N(\d+)$").unwrap());

fn parse_err(input: &str, section: &str, reason: &str) -> BatchError {
    BatchError::CriteriaParse {
        input: input.to_string(),
        section: section.to_string(),
        reason: reason.to_string(),
    }
}

/// The category token selecting a parser, i.e. everything before the first
/// dot.
pub fn category(def: &str) -> &str {
    def.split('.').next().unwrap_or(def)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrowthLaw {
    Log,
    Linear,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulationSizeDef {
    pub law: GrowthLaw,
    /// `Linear<n>`: per-step increment (max size is `10n`); `Log<n>`: the
    /// maximum size, which must be a power of two.
    pub magnitude: u32,
    pub cardinality: Option<u32>,
}

/// `population_size.{Log,Linear}<N>[.C<card>]`
pub fn parse_population_size(def: &str) -> BatchResult<PopulationSizeDef> {
    let tokens: Vec<&str> = def.split('.').collect();
    if tokens.first() != Some(&"population_size") {
        return Err(parse_err(def, tokens[0], "expected category 'population_size'"));
    }
    let model = tokens
        .get(1)
        .ok_or_else(|| parse_err(def, def, "missing growth model section"))?;
    let caps = GROWTH_RE
        .captures(model)
        .ok_or_else(|| parse_err(def, model, "expected Log<N> or Linear<N>"))?;
    let law = match &caps[1] {
        "Log" => GrowthLaw::Log,
        _ => GrowthLaw::Linear,
    };
    let magnitude: u32 = caps[2]
        .parse()
        .map_err(|_| parse_err(def, model, "size out of range"))?;
    if magnitude == 0 {
        return Err(parse_err(def, model, "size must be positive"));
    }
    if law == GrowthLaw::Log && !magnitude.is_power_of_two() {
        return Err(parse_err(def, model, "Log max size must be a power of two"));
    }

    let mut cardinality = None;
    match tokens.get(2) {
        Some(tok) => {
            let caps = CARDINALITY_RE
                .captures(tok)
                .ok_or_else(|| parse_err(def, tok, "expected C<cardinality>"))?;
            cardinality = Some(
                caps[1]
                    .parse()
                    .map_err(|_| parse_err(def, tok, "cardinality out of range"))?,
            );
        }
        None => {}
    }
    if let Some(tok) = tokens.get(3) {
        return Err(parse_err(def, tok, "unexpected trailing section"));
    }

    Ok(PopulationSizeDef {
        law,
        magnitude,
        cardinality,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantDensityDef {
    /// Robots per 100 arena area units.
    pub density: f64,
    /// Raw density token (`1p0`), kept for experiment naming.
    pub density_token: String,
    pub arena_increment: u32,
    pub cardinality: u32,
}

/// `constant_density.<char>p<mantissa>.I<increment>.C<cardinality>`
pub fn parse_constant_density(def: &str) -> BatchResult<ConstantDensityDef> {
    let tokens: Vec<&str> = def.split('.').collect();
    if tokens.first() != Some(&"constant_density") {
        return Err(parse_err(def, tokens[0], "expected category 'constant_density'"));
    }
    if tokens.len() != 4 {
        return Err(parse_err(def, def, "expected <density>.I<inc>.C<card>"));
    }
    let density = parse_density_token(def, tokens[1])?;
    let arena_increment = capture_u32(&INCREMENT_RE, def, tokens[2], "expected I<increment>")?;
    let cardinality = capture_u32(&CARDINALITY_RE, def, tokens[3], "expected C<cardinality>")?;
    if cardinality == 0 {
        return Err(parse_err(def, tokens[3], "cardinality must be positive"));
    }

    Ok(ConstantDensityDef {
        density,
        density_token: tokens[1].to_string(),
        arena_increment,
        cardinality,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariableDensityDef {
    pub min_density: f64,
    pub max_density: f64,
    pub min_token: String,
    pub max_token: String,
    pub cardinality: u32,
}

/// `variable_density.<min density>.<max density>.C<cardinality>`
pub fn parse_variable_density(def: &str) -> BatchResult<VariableDensityDef> {
    let tokens: Vec<&str> = def.split('.').collect();
    if tokens.first() != Some(&"variable_density") {
        return Err(parse_err(def, tokens[0], "expected category 'variable_density'"));
    }
    if tokens.len() != 4 {
        return Err(parse_err(def, def, "expected <min>.<max>.C<card>"));
    }
    let min_density = parse_density_token(def, tokens[1])?;
    let max_density = parse_density_token(def, tokens[2])?;
    if max_density < min_density {
        return Err(parse_err(def, tokens[2], "max density below min density"));
    }
    let cardinality = capture_u32(&CARDINALITY_RE, def, tokens[3], "expected C<cardinality>")?;
    if cardinality == 0 {
        return Err(parse_err(def, tokens[3], "cardinality must be positive"));
    }

    Ok(VariableDensityDef {
        min_density,
        max_density,
        min_token: tokens[1].to_string(),
        max_token: tokens[2].to_string(),
        cardinality,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaaCategory {
    Sensors,
    Actuators,
    All,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaaNoiseDef {
    pub category: SaaCategory,
    pub cardinality: u32,
    /// Fixed population override applied alongside the noise sweep.
    pub population: Option<u32>,
}

/// `saa_noise.{sensors,actuators,all}.C<cardinality>[.Z<population>]`
pub fn parse_saa_noise(def: &str) -> BatchResult<SaaNoiseDef> {
    let tokens: Vec<&str> = def.split('.').collect();
    if tokens.first() != Some(&"saa_noise") {
        return Err(parse_err(def, tokens[0], "expected category 'saa_noise'"));
    }
    let category = match tokens.get(1) {
        Some(&"sensors") => SaaCategory::Sensors,
        Some(&"actuators") => SaaCategory::Actuators,
        Some(&"all") => SaaCategory::All,
        Some(tok) => return Err(parse_err(def, tok, "expected sensors|actuators|all")),
        None => return Err(parse_err(def, def, "missing noise category section")),
    };
    let card_tok = tokens
        .get(2)
        .ok_or_else(|| parse_err(def, def, "missing cardinality section"))?;
    let cardinality = capture_u32(&CARDINALITY_RE, def, card_tok, "expected C<cardinality>")?;
    if cardinality == 0 {
        return Err(parse_err(def, card_tok, "cardinality must be positive"));
    }

    let mut population = None;
    if let Some(tok) = tokens.get(3) {
        population = Some(capture_u32(&POPULATION_RE, def, tok, "expected Z<population>")?);
    }
    if let Some(tok) = tokens.get(4) {
        return Err(parse_err(def, tok, "unexpected trailing section"));
    }

    Ok(SaaNoiseDef {
        category,
        cardinality,
        population,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpSetupDef {
    pub duration_secs: u32,
    pub ticks_per_sec: u32,
    pub n_datapoints: u32,
}

pub const DEFAULT_TICKS_PER_SEC: u32 = 5;
pub const DEFAULT_N_DATAPOINTS: u32 = 50;

/// `exp_setup.T<secs>[.K<ticks_per_sec>][.N<datapoints>]`
pub fn parse_exp_setup(def: &str) -> BatchResult<ExpSetupDef> {
    let tokens: Vec<&str> = def.split('.').collect();
    if tokens.first() != Some(&"exp_setup") {
        return Err(parse_err(def, tokens[0], "expected category 'exp_setup'"));
    }
    let dur_tok = tokens
        .get(1)
        .ok_or_else(|| parse_err(def, def, "missing duration section"))?;
    let duration_secs = capture_u32(&DURATION_RE, def, dur_tok, "expected T<seconds>")?;

    let mut ticks_per_sec = DEFAULT_TICKS_PER_SEC;
    let mut n_datapoints = DEFAULT_N_DATAPOINTS;
    let mut rest = &tokens[2..];
    if let Some(tok) = rest.first() {
        if TICKS_RE.is_match(tok) {
            ticks_per_sec = capture_u32(&TICKS_RE, def, tok, "expected K<ticks>")?;
            rest = &rest[1..];
        }
    }
    if let Some(tok) = rest.first() {
        n_datapoints = capture_u32(&DATAPOINTS_RE, def, tok, "expected N<datapoints>")?;
        rest = &rest[1..];
    }
    if let Some(tok) = rest.first() {
        return Err(parse_err(def, tok, "unexpected trailing section"));
    }

    Ok(ExpSetupDef {
        duration_secs,
        ticks_per_sec,
        n_datapoints,
    })
}

/// `<characteristic>p<mantissa>`, e.g. `1p0` == 1.0, `2p5` == 2.5.
fn parse_density_token(input: &str, token: &str) -> BatchResult<f64> {
    let caps = DENSITY_RE
        .captures(token)
        .ok_or_else(|| parse_err(input, token, "expected <char>p<mantissa> density"))?;
    format!("{}.{}", &caps[1], &caps[2])
        .parse()
        .map_err(|_| parse_err(input, token, "density out of range"))
}

fn capture_u32(re: &Regex, input: &str, token: &str, reason: &str) -> BatchResult<u32> {
    let caps = re
        .captures(token)
        .ok_or_else(|| parse_err(input, token, reason))?;
    caps[1]
        .parse()
        .map_err(|_| parse_err(input, token, "value out of range"))
}
