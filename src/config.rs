//! Configuración del servicio leída del entorno (y de `.env` si existe).
//!
//! | Variable | Default |
//! |---|---|
//! | `QUICKPLAN_BIND` | `127.0.0.1:8080` |
//! | `QUICKPLAN_CATALOG` | `catalog.json` |
//! | `QUICKPLAN_MAX_CREDITS` | `14` |
//! | `QUICKPLAN_MAX_COURSES` | `8` |
//! | `QUICKPLAN_CREDIT_RATE` | `6500` |
//! | `QUICKPLAN_FIXED_FEES` | `12500` |
//! | `QUICKPLAN_WORKERS` | núcleos disponibles |

use serde::Serialize;
use std::collections::HashMap;
use std::str::FromStr;

use crate::algorithm::Limits;
use crate::error::{PlannerError, Result};

/// Fórmula afín de costo: `créditos × tarifa + cargos fijos`.
/// Es un dato de presentación, no una regla del núcleo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostFormula {
    pub credit_rate: f64,
    pub fixed_fees: f64,
}

impl CostFormula {
    pub fn estimate(&self, credits: u32) -> f64 {
        f64::from(credits) * self.credit_rate + self.fixed_fees
    }
}

impl Default for CostFormula {
    fn default() -> Self {
        CostFormula { credit_rate: 6500.0, fixed_fees: 12500.0 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    pub bind: String,
    pub catalog: String,
    pub default_limits: Limits,
    pub cost: CostFormula,
    pub workers: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            bind: "127.0.0.1:8080".to_string(),
            catalog: "catalog.json".to_string(),
            default_limits: Limits::default(),
            cost: CostFormula::default(),
            workers: std::cmp::max(1, num_cpus::get()),
        }
    }
}

impl PlannerConfig {
    /// Carga `.env` (si existe) y lee las variables `QUICKPLAN_*`.
    pub fn from_env() -> Result<Self> {
        let _ = dotenv::dotenv();
        let vars: HashMap<String, String> = std::env::vars().filter(|(k, _)| k.starts_with("QUICKPLAN_")).collect();
        Self::from_vars(&vars)
    }

    /// Igual que `from_env` pero sobre un mapa explícito (útil en tests).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let mut cfg = PlannerConfig::default();
        let get = |k: &str| vars.get(k).map(|v| v.trim()).filter(|v| !v.is_empty());

        if let Some(bind) = get("QUICKPLAN_BIND") {
            cfg.bind = bind.to_string();
        }
        if let Some(catalog) = get("QUICKPLAN_CATALOG") {
            cfg.catalog = catalog.to_string();
        }
        if let Some(v) = get("QUICKPLAN_MAX_CREDITS") {
            cfg.default_limits.max_credits = parse_var("QUICKPLAN_MAX_CREDITS", v)?;
        }
        if let Some(v) = get("QUICKPLAN_MAX_COURSES") {
            cfg.default_limits.max_courses = parse_var("QUICKPLAN_MAX_COURSES", v)?;
        }
        if let Some(v) = get("QUICKPLAN_CREDIT_RATE") {
            cfg.cost.credit_rate = parse_var("QUICKPLAN_CREDIT_RATE", v)?;
        }
        if let Some(v) = get("QUICKPLAN_FIXED_FEES") {
            cfg.cost.fixed_fees = parse_var("QUICKPLAN_FIXED_FEES", v)?;
        }
        if let Some(v) = get("QUICKPLAN_WORKERS") {
            cfg.workers = parse_var("QUICKPLAN_WORKERS", v)?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.default_limits
            .validate()
            .map_err(|e| PlannerError::Config(e.to_string()))?;
        if self.workers == 0 {
            return Err(PlannerError::Config("QUICKPLAN_WORKERS must be > 0".to_string()));
        }
        if self.cost.credit_rate < 0.0 || self.cost.fixed_fees < 0.0 {
            return Err(PlannerError::Config("cost values must be >= 0".to_string()));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .parse::<T>()
        .map_err(|_| PlannerError::Config(format!("{} has invalid value '{}'", name, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_defaults_when_empty() {
        let cfg = PlannerConfig::from_vars(&HashMap::new()).expect("defaults are valid");
        assert_eq!(cfg.default_limits, Limits { max_credits: 14, max_courses: 8 });
        assert_eq!(cfg.bind, "127.0.0.1:8080");
        assert!(cfg.workers >= 1);
    }

    #[test]
    fn test_overrides_and_errors() {
        let cfg = PlannerConfig::from_vars(&vars(&[
            ("QUICKPLAN_MAX_CREDITS", "18"),
            ("QUICKPLAN_MAX_COURSES", " 6 "),
            ("QUICKPLAN_CATALOG", "fall.xlsx"),
        ]))
        .unwrap();
        assert_eq!(cfg.default_limits.max_credits, 18);
        assert_eq!(cfg.default_limits.max_courses, 6);
        assert_eq!(cfg.catalog, "fall.xlsx");

        assert!(matches!(
            PlannerConfig::from_vars(&vars(&[("QUICKPLAN_MAX_CREDITS", "0")])),
            Err(PlannerError::Config(_))
        ));
        assert!(matches!(
            PlannerConfig::from_vars(&vars(&[("QUICKPLAN_MAX_COURSES", "ocho")])),
            Err(PlannerError::Config(_))
        ));
    }

    #[test]
    fn test_cost_formula() {
        let f = CostFormula { credit_rate: 100.0, fixed_fees: 50.0 };
        assert_eq!(f.estimate(4), 450.0);
    }
}
