//! Project configuration: the full state of one quote in progress.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::materials::{MaterialConfig, MaterialSet, MaterialType};

/// Upper bound on `workDays` accepted at the edit boundary.
pub const MAX_WORK_DAYS: u32 = 60;

/// Named member of the crew roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: String,
    pub name: String,
    /// Cost of one 8 hour shift.
    pub daily_rate: f64,
}

/// Whether the primer line is printed when the sealer is also the finish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SealerLine {
    #[default]
    Always,
    SkipWhenSelected,
}

impl SealerLine {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "always" => Some(Self::Always),
            "skip_when_selected" | "skip" => Some(Self::SkipWhenSelected),
            _ => None,
        }
    }
}

/// How the labor line is costed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaborMode {
    /// `numWorkers × workerDailyRate × workDays`
    #[default]
    Crew,
    /// Sum of every roster worker's daily rate, times `workDays`.
    Roster,
}

impl LaborMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "crew" => Some(Self::Crew),
            "roster" => Some(Self::Roster),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    #[serde(default)]
    pub sealer_line: SealerLine,
    #[serde(default)]
    pub labor_mode: LaborMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub m2: f64,
    pub selected_material: MaterialType,
    pub materials: MaterialSet,
    /// Auxiliary supplies cost per 100 m².
    pub aux_material_rate: f64,
    /// Margin charged per m².
    pub profit_rate: f64,
    pub num_workers: u32,
    pub worker_daily_rate: f64,
    pub work_days: u32,
    /// Zero means no scaffolding is rented.
    pub scaffold_count: u32,
    pub scaffold_daily_rate: f64,
    pub scaffold_days: u32,
    pub masonry_repair_enabled: bool,
    pub masonry_repair_cost: f64,
    #[serde(default)]
    pub workers: Vec<Worker>,
    #[serde(default)]
    pub pricing: PricingPolicy,
}

/// A configuration that must not reach the quote engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{material} yield must be greater than zero")]
    NonPositiveYield { material: MaterialType },

    #[error("material slot {slot} holds {found}")]
    MislabeledMaterial {
        slot: MaterialType,
        found: MaterialType,
    },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} must not be negative")]
    Negative { field: &'static str },

    #[error("workDays must be at most {max}, got {got}")]
    TooManyWorkDays { got: u32, max: u32 },

    #[error("worker {id} needs a name")]
    UnnamedWorker { id: String },
}

fn check_amount(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(ConfigError::Negative { field });
    }
    Ok(())
}

impl ProjectConfig {
    /// The configuration a new quote starts from.
    pub fn initial(pricing: PricingPolicy) -> Self {
        Self {
            m2: 100.0,
            selected_material: MaterialType::Waterproofing,
            materials: MaterialSet {
                waterproofing: MaterialConfig::new(MaterialType::Waterproofing, "Fester", 34.0, 1639.0),
                paint: MaterialConfig::new(MaterialType::Paint, "Comex", 120.0, 2100.0),
                sealer: MaterialConfig::new(MaterialType::Sealer, "Sayer", 50.0, 1200.0),
            },
            aux_material_rate: 1805.0,
            profit_rate: 70.0,
            num_workers: 2,
            worker_daily_rate: 600.0,
            work_days: 5,
            scaffold_count: 0,
            scaffold_daily_rate: 150.0,
            scaffold_days: 5,
            masonry_repair_enabled: false,
            masonry_repair_cost: 0.0,
            workers: vec![
                Worker {
                    id: "1".to_string(),
                    name: "Maestro Obra".to_string(),
                    daily_rate: 650.0,
                },
                Worker {
                    id: "2".to_string(),
                    name: "Ayudante 1".to_string(),
                    daily_rate: 400.0,
                },
            ],
            pricing,
        }
    }

    pub fn selected(&self) -> &MaterialConfig {
        self.materials.get(self.selected_material)
    }

    pub fn sealer(&self) -> &MaterialConfig {
        self.materials.get(MaterialType::Sealer)
    }

    /// Checks every invariant the quote engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_amount("m2", self.m2)?;

        for (slot, material) in self.materials.iter() {
            if material.name != slot {
                return Err(ConfigError::MislabeledMaterial {
                    slot,
                    found: material.name,
                });
            }
            if !material.yield_per_unit.is_finite() {
                return Err(ConfigError::NotFinite { field: "yield" });
            }
            if material.yield_per_unit <= 0.0 {
                return Err(ConfigError::NonPositiveYield { material: slot });
            }
            check_amount("price", material.price)?;
        }

        check_amount("auxMaterialRate", self.aux_material_rate)?;
        check_amount("profitRate", self.profit_rate)?;
        check_amount("workerDailyRate", self.worker_daily_rate)?;
        check_amount("scaffoldDailyRate", self.scaffold_daily_rate)?;
        check_amount("masonryRepairCost", self.masonry_repair_cost)?;

        if self.work_days > MAX_WORK_DAYS {
            return Err(ConfigError::TooManyWorkDays {
                got: self.work_days,
                max: MAX_WORK_DAYS,
            });
        }

        for worker in &self.workers {
            if worker.name.trim().is_empty() {
                return Err(ConfigError::UnnamedWorker {
                    id: worker.id.clone(),
                });
            }
            check_amount("dailyRate", worker.daily_rate)?;
        }

        Ok(())
    }
}

/// Body of a wholesale configuration replacement.
///
/// `pricing` is server policy: when the body leaves it out, the policy
/// already in force is kept.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplaceConfigRequest {
    #[serde(default)]
    pub pricing: Option<PricingPolicy>,
    #[serde(flatten)]
    pub config: ProjectConfig,
}

impl ReplaceConfigRequest {
    /// The configuration to install on top of `current`.
    pub fn into_config(self, current: &ProjectConfig) -> ProjectConfig {
        ProjectConfig {
            pricing: self.pricing.unwrap_or(current.pricing),
            ..self.config
        }
    }
}

/// Request to add a named worker to the roster.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddWorkerRequest {
    pub name: String,
    pub daily_rate: f64,
}
