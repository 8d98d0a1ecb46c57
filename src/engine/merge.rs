//! Applies a sanitized interpreter update onto a configuration snapshot.

use uuid::Uuid;

use crate::domain::{MaterialType, ProjectConfig, SanitizedUpdate, Worker};

/// Keyword in the user's text that redirects brand/yield/price to the primer.
pub const SEALER_KEYWORD: &str = "sellador";

/// Material that `brand`, `yield` and `price` updates apply to.
///
/// `selected` must already reflect any `selectedMaterial` change in the
/// same batch.
pub fn resolve_target(raw_text: &str, selected: MaterialType) -> MaterialType {
    if raw_text.to_lowercase().contains(SEALER_KEYWORD) {
        MaterialType::Sealer
    } else {
        selected
    }
}

/// Returns a new configuration with every present field of `update`
/// applied. Absent fields keep their value from `current`.
pub fn merge(current: &ProjectConfig, update: &SanitizedUpdate, raw_text: &str) -> ProjectConfig {
    let mut next = current.clone();

    if let Some(m2) = update.m2 {
        next.m2 = m2;
    }
    if let Some(material) = update.selected_material {
        next.selected_material = material;
    }
    if let Some(rate) = update.aux_material_rate {
        next.aux_material_rate = rate;
    }
    if let Some(rate) = update.profit_rate {
        next.profit_rate = rate;
    }
    if let Some(n) = update.num_workers {
        next.num_workers = n;
    }
    if let Some(rate) = update.worker_daily_rate {
        next.worker_daily_rate = rate;
    }
    if let Some(days) = update.work_days {
        next.work_days = days;
    }
    if let Some(count) = update.scaffold_count {
        next.scaffold_count = count;
    }
    if let Some(rate) = update.scaffold_daily_rate {
        next.scaffold_daily_rate = rate;
    }
    if let Some(days) = update.scaffold_days {
        next.scaffold_days = days;
    }
    if let Some(enabled) = update.masonry_repair_enabled {
        next.masonry_repair_enabled = enabled;
    }
    if let Some(cost) = update.masonry_repair_cost {
        next.masonry_repair_cost = cost;
    }

    if update.touches_material() {
        let target = resolve_target(raw_text, next.selected_material);
        let material = next.materials.get_mut(target);
        if let Some(brand) = &update.brand {
            material.brand = brand.clone();
        }
        if let Some(yield_per_unit) = update.yield_per_unit {
            material.yield_per_unit = yield_per_unit;
        }
        if let Some(price) = update.price {
            material.price = price;
        }
    }

    if let Some(key) = &update.remove_worker {
        remove_worker(&mut next.workers, key);
    }
    if let Some(worker) = &update.add_worker {
        next.workers.push(Worker {
            id: Uuid::new_v4().to_string(),
            name: worker.name.clone(),
            daily_rate: worker.daily_rate,
        });
    }

    next
}

/// Removes the first worker whose id matches exactly, or else whose name
/// matches ignoring case. Returns the removed worker.
pub fn remove_worker(workers: &mut Vec<Worker>, key: &str) -> Option<Worker> {
    let key = key.trim();
    let index = workers
        .iter()
        .position(|w| w.id == key)
        .or_else(|| {
            let lowered = key.to_lowercase();
            workers.iter().position(|w| w.name.to_lowercase() == lowered)
        })?;
    Some(workers.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::updates::NewWorker;
    use crate::domain::PricingPolicy;

    fn base_config() -> ProjectConfig {
        ProjectConfig::initial(PricingPolicy::default())
    }

    #[test]
    fn test_empty_update_is_identity() {
        let config = base_config();
        let merged = merge(&config, &SanitizedUpdate::default(), "cualquier cosa");
        assert_eq!(merged, config);
    }

    #[test]
    fn test_only_present_fields_change() {
        let config = base_config();
        let update = SanitizedUpdate {
            m2: Some(250.0),
            work_days: Some(8),
            masonry_repair_enabled: Some(true),
            ..Default::default()
        };

        let merged = merge(&config, &update, "250 metros, 8 días y reparar muros");
        assert_eq!(merged.m2, 250.0);
        assert_eq!(merged.work_days, 8);
        assert!(merged.masonry_repair_enabled);

        let mut expected = config.clone();
        expected.m2 = 250.0;
        expected.work_days = 8;
        expected.masonry_repair_enabled = true;
        assert_eq!(merged, expected);
    }

    #[test]
    fn test_material_fields_target_selected_material() {
        let config = base_config();
        let update = SanitizedUpdate {
            price: Some(1700.0),
            brand: Some("Sika".to_string()),
            ..Default::default()
        };

        let merged = merge(&config, &update, "cambia el precio a 1700 y la marca a Sika");
        assert_eq!(merged.materials.waterproofing.price, 1700.0);
        assert_eq!(merged.materials.waterproofing.brand, "Sika");
        assert_eq!(merged.materials.sealer, config.materials.sealer);
        assert_eq!(merged.materials.paint, config.materials.paint);
    }

    #[test]
    fn test_sealer_keyword_redirects_target() {
        let config = base_config();
        let update = SanitizedUpdate {
            yield_per_unit: Some(60.0),
            ..Default::default()
        };

        let merged = merge(&config, &update, "El SELLADOR rinde 60 m2");
        assert_eq!(merged.materials.sealer.yield_per_unit, 60.0);
        assert_eq!(merged.materials.waterproofing.yield_per_unit, 34.0);
    }

    #[test]
    fn test_target_uses_newly_selected_material() {
        let mut config = base_config();
        config.selected_material = MaterialType::Paint;

        let update = SanitizedUpdate {
            selected_material: Some(MaterialType::Sealer),
            price: Some(999.0),
            ..Default::default()
        };

        let merged = merge(&config, &update, "usa otro producto a 999");
        assert_eq!(merged.selected_material, MaterialType::Sealer);
        assert_eq!(merged.materials.sealer.price, 999.0);
        assert_eq!(merged.materials.paint, config.materials.paint);
    }

    #[test]
    fn test_switching_finish_then_pricing_it() {
        let config = base_config();
        let update = SanitizedUpdate {
            selected_material: Some(MaterialType::Paint),
            price: Some(2500.0),
            ..Default::default()
        };

        let merged = merge(&config, &update, "mejor pintura a 2500");
        assert_eq!(merged.materials.paint.price, 2500.0);
        assert_eq!(merged.materials.waterproofing.price, 1639.0);
    }

    #[test]
    fn test_merge_does_not_touch_current() {
        let config = base_config();
        let snapshot = config.clone();
        let update = SanitizedUpdate {
            price: Some(1.0),
            add_worker: Some(NewWorker {
                name: "Pedro".to_string(),
                daily_rate: 450.0,
            }),
            ..Default::default()
        };

        let merged = merge(&config, &update, "");
        assert_eq!(config, snapshot);
        assert_ne!(merged, snapshot);
    }

    #[test]
    fn test_add_and_remove_workers() {
        let config = base_config();
        let update = SanitizedUpdate {
            remove_worker: Some("ayudante 1".to_string()),
            add_worker: Some(NewWorker {
                name: "Pedro".to_string(),
                daily_rate: 450.0,
            }),
            ..Default::default()
        };

        let merged = merge(&config, &update, "");
        let names: Vec<_> = merged.workers.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Maestro Obra", "Pedro"]);
        assert!(Uuid::parse_str(&merged.workers[1].id).is_ok());
    }

    #[test]
    fn test_remove_worker_prefers_id_and_ignores_unknown() {
        let mut workers = base_config().workers;
        assert_eq!(remove_worker(&mut workers, "2").map(|w| w.name), Some("Ayudante 1".to_string()));
        assert!(remove_worker(&mut workers, "nadie").is_none());
        assert_eq!(workers.len(), 1);
    }

    #[test]
    fn test_merged_config_stays_valid() {
        let config = base_config();
        let update = SanitizedUpdate {
            m2: Some(0.0),
            yield_per_unit: Some(12.5),
            scaffold_count: Some(3),
            ..Default::default()
        };
        assert_eq!(merge(&config, &update, "").validate(), Ok(()));
    }
}
