//! Sparse configuration updates coming from the language-model interpreter.
//!
//! [`PartialUpdate`] is exactly what the interpreter sent. Nothing in it is
//! trusted: [`PartialUpdate::sanitize`] checks every field on its own and
//! keeps only the ones that pass, producing a [`SanitizedUpdate`] that the
//! merge step can apply without further checks.

use serde::{Deserialize, Serialize};

use super::materials::MaterialType;
use super::project::MAX_WORK_DAYS;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWorkerInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub daily_rate: f64,
}

/// Raw interpreter output. Every field is optional; unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartialUpdate {
    #[serde(default)]
    pub m2: Option<f64>,
    #[serde(default)]
    pub selected_material: Option<String>,
    #[serde(default, rename = "yield")]
    pub yield_per_unit: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub aux_material_rate: Option<f64>,
    #[serde(default)]
    pub profit_rate: Option<f64>,
    #[serde(default)]
    pub num_workers: Option<f64>,
    #[serde(default)]
    pub worker_daily_rate: Option<f64>,
    #[serde(default)]
    pub work_days: Option<f64>,
    #[serde(default)]
    pub scaffold_count: Option<f64>,
    #[serde(default)]
    pub scaffold_daily_rate: Option<f64>,
    #[serde(default)]
    pub scaffold_days: Option<f64>,
    #[serde(default)]
    pub masonry_repair_enabled: Option<bool>,
    #[serde(default)]
    pub masonry_repair_cost: Option<f64>,
    #[serde(default)]
    pub add_worker: Option<NewWorkerInput>,
    /// Worker id or name.
    #[serde(default)]
    pub remove_worker: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewWorker {
    pub name: String,
    pub daily_rate: f64,
}

/// Update whose every present field is known to be in range.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SanitizedUpdate {
    pub m2: Option<f64>,
    pub selected_material: Option<MaterialType>,
    pub yield_per_unit: Option<f64>,
    pub price: Option<f64>,
    pub brand: Option<String>,
    pub aux_material_rate: Option<f64>,
    pub profit_rate: Option<f64>,
    pub num_workers: Option<u32>,
    pub worker_daily_rate: Option<f64>,
    pub work_days: Option<u32>,
    pub scaffold_count: Option<u32>,
    pub scaffold_daily_rate: Option<f64>,
    pub scaffold_days: Option<u32>,
    pub masonry_repair_enabled: Option<bool>,
    pub masonry_repair_cost: Option<f64>,
    pub add_worker: Option<NewWorker>,
    pub remove_worker: Option<String>,
}

impl SanitizedUpdate {
    /// True when the update targets a material's brand, yield or price.
    pub fn touches_material(&self) -> bool {
        self.brand.is_some() || self.yield_per_unit.is_some() || self.price.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A field dropped during sanitization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldRejection {
    pub field: &'static str,
    pub reason: String,
}

struct Checker {
    rejections: Vec<FieldRejection>,
}

impl Checker {
    fn reject(&mut self, field: &'static str, reason: impl Into<String>) {
        self.rejections.push(FieldRejection {
            field,
            reason: reason.into(),
        });
    }

    /// Finite, non-negative amount.
    fn amount(&mut self, field: &'static str, value: Option<f64>) -> Option<f64> {
        let value = value?;
        if !value.is_finite() {
            self.reject(field, "not a finite number");
            return None;
        }
        if value < 0.0 {
            self.reject(field, format!("negative value {}", value));
            return None;
        }
        Some(value)
    }

    fn positive(&mut self, field: &'static str, value: Option<f64>) -> Option<f64> {
        let value = self.amount(field, value)?;
        if value == 0.0 {
            self.reject(field, "must be greater than zero");
            return None;
        }
        Some(value)
    }

    /// Whole, non-negative count no larger than `max`.
    fn count(&mut self, field: &'static str, value: Option<f64>, max: u32) -> Option<u32> {
        let value = self.amount(field, value)?;
        if value.fract() != 0.0 {
            self.reject(field, format!("{} is not a whole number", value));
            return None;
        }
        if value > f64::from(max) {
            self.reject(field, format!("{} exceeds the maximum of {}", value, max));
            return None;
        }
        Some(value as u32)
    }

    fn text(&mut self, field: &'static str, value: Option<String>) -> Option<String> {
        let value = value?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.reject(field, "empty text");
            return None;
        }
        Some(trimmed.to_string())
    }
}

impl PartialUpdate {
    /// Validates each field independently. Invalid fields are dropped and
    /// reported; valid ones are kept.
    pub fn sanitize(self) -> (SanitizedUpdate, Vec<FieldRejection>) {
        let mut check = Checker {
            rejections: Vec::new(),
        };

        let selected_material = match self.selected_material {
            Some(label) => match label.parse::<MaterialType>() {
                Ok(material) => Some(material),
                Err(e) => {
                    check.reject("selectedMaterial", e.to_string());
                    None
                }
            },
            None => None,
        };

        let add_worker = match self.add_worker {
            Some(input) => {
                let name = check.text("addWorker.name", Some(input.name));
                let daily_rate = check.amount("addWorker.dailyRate", Some(input.daily_rate));
                match (name, daily_rate) {
                    (Some(name), Some(daily_rate)) => Some(NewWorker { name, daily_rate }),
                    _ => None,
                }
            }
            None => None,
        };

        let update = SanitizedUpdate {
            m2: check.amount("m2", self.m2),
            selected_material,
            yield_per_unit: check.positive("yield", self.yield_per_unit),
            price: check.amount("price", self.price),
            brand: check.text("brand", self.brand),
            aux_material_rate: check.amount("auxMaterialRate", self.aux_material_rate),
            profit_rate: check.amount("profitRate", self.profit_rate),
            num_workers: check.count("numWorkers", self.num_workers, u32::MAX),
            worker_daily_rate: check.amount("workerDailyRate", self.worker_daily_rate),
            work_days: check.count("workDays", self.work_days, MAX_WORK_DAYS),
            scaffold_count: check.count("scaffoldCount", self.scaffold_count, u32::MAX),
            scaffold_daily_rate: check.amount("scaffoldDailyRate", self.scaffold_daily_rate),
            scaffold_days: check.count("scaffoldDays", self.scaffold_days, u32::MAX),
            masonry_repair_enabled: self.masonry_repair_enabled,
            masonry_repair_cost: check.amount("masonryRepairCost", self.masonry_repair_cost),
            add_worker,
            remove_worker: check.text("removeWorker", self.remove_worker),
        };

        (update, check.rejections)
    }
}
