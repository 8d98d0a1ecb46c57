//! Quote engine: derives the itemized quote from a project configuration.
//!
//! Items always come out in the same order (primary material, primer,
//! auxiliary material, scaffolding, labor, optional masonry repair, profit)
//! because the printed document and the UI footer index into them by
//! position. Display strings are formatted here; amounts are never rounded.

use crate::domain::{
    LaborDetails, LaborMode, LineKind, MaterialConfig, MaterialType, ProjectConfig, QuoteItem,
    QuoteResult, SealerLine,
};

/// Builds the quote for `config`.
///
/// `config` must have passed [`ProjectConfig::validate`]; a zero yield
/// produces an infinite unit count.
pub fn compute(config: &ProjectConfig) -> QuoteResult {
    let mut items = Vec::with_capacity(7);

    items.push(primary_material(config));

    let skip_sealer = config.pricing.sealer_line == SealerLine::SkipWhenSelected
        && config.selected_material == MaterialType::Sealer;
    if !skip_sealer {
        items.push(sealer(config));
    }

    items.push(aux_material(config));
    items.push(scaffolding(config));
    items.push(labor(config));

    if config.masonry_repair_enabled {
        items.push(masonry_repair(config));
    }

    items.push(profit(config));

    QuoteResult::from_items(items)
}

/// Whole containers needed to cover `m2`.
pub fn units_needed(m2: f64, material: &MaterialConfig) -> f64 {
    (m2 / material.yield_per_unit).ceil()
}

fn material_line(kind: LineKind, concept: String, detail: String, m2: f64, material: &MaterialConfig) -> QuoteItem {
    let units = units_needed(m2, material);
    QuoteItem {
        kind,
        concept,
        detail,
        quantity: format!("{} Cub.", units),
        unit_price: material.price,
        total: units * material.price,
        brand: Some(material.brand.clone()),
        yield_display: Some(format!("{} m²/c", material.yield_per_unit)),
        is_warning: false,
        labor_details: None,
    }
}

fn primary_material(config: &ProjectConfig) -> QuoteItem {
    material_line(
        LineKind::PrimaryMaterial,
        config.selected_material.label().to_string(),
        format!("Cobertura total para {} m²", config.m2),
        config.m2,
        config.selected(),
    )
}

fn sealer(config: &ProjectConfig) -> QuoteItem {
    material_line(
        LineKind::Sealer,
        "Sellador Primario".to_string(),
        "Base de adherencia".to_string(),
        config.m2,
        config.sealer(),
    )
}

fn aux_material(config: &ProjectConfig) -> QuoteItem {
    QuoteItem {
        kind: LineKind::AuxMaterial,
        concept: "Material Auxiliar".to_string(),
        detail: "Insumos varios de aplicación".to_string(),
        quantity: format!("{} m²", config.m2),
        unit_price: config.aux_material_rate / 100.0,
        total: (config.m2 / 100.0) * config.aux_material_rate,
        brand: Some("Varios".to_string()),
        yield_display: Some("N/A".to_string()),
        is_warning: false,
        labor_details: None,
    }
}

fn scaffolding(config: &ProjectConfig) -> QuoteItem {
    let active = config.scaffold_count > 0;
    let total = if active {
        f64::from(config.scaffold_count) * config.scaffold_daily_rate * f64::from(config.scaffold_days)
    } else {
        0.0
    };

    QuoteItem {
        kind: LineKind::Scaffolding,
        concept: "Renta de andamio".to_string(),
        detail: "Equipo de altura certificado".to_string(),
        quantity: if active {
            format!("{} Und.", config.scaffold_count)
        } else {
            "0".to_string()
        },
        unit_price: config.scaffold_daily_rate,
        total,
        brand: Some(if active { "SÍ" } else { "NO" }.to_string()),
        yield_display: Some(if active {
            format!("{} Días", config.scaffold_days)
        } else {
            "0 D".to_string()
        }),
        is_warning: false,
        labor_details: None,
    }
}

fn labor(config: &ProjectConfig) -> QuoteItem {
    let days = config.work_days;

    let (workers, rate, total, detail) = match config.pricing.labor_mode {
        LaborMode::Crew => (
            config.num_workers,
            config.worker_daily_rate,
            f64::from(config.num_workers) * config.worker_daily_rate * f64::from(days),
            "Ejecución especializada".to_string(),
        ),
        LaborMode::Roster => {
            let workers = config.workers.len() as u32;
            let daily: f64 = config.workers.iter().map(|w| w.daily_rate).sum();
            let average = if workers == 0 { 0.0 } else { daily / f64::from(workers) };
            let names: Vec<&str> = config.workers.iter().map(|w| w.name.as_str()).collect();
            (
                workers,
                average,
                daily * f64::from(days),
                format!("Cuadrilla: {}", names.join(", ")),
            )
        }
    };

    QuoteItem {
        kind: LineKind::Labor,
        concept: "Mano de Obra".to_string(),
        detail,
        quantity: format!("{} Jorn.", u64::from(workers) * u64::from(days)),
        unit_price: rate,
        total,
        brand: Some(format!("{} Trab.", workers)),
        yield_display: Some(format!("{} Días", days)),
        is_warning: false,
        labor_details: Some(LaborDetails {
            workers,
            rate,
            days,
        }),
    }
}

fn masonry_repair(config: &ProjectConfig) -> QuoteItem {
    QuoteItem {
        kind: LineKind::MasonryRepair,
        concept: "Reparaciones Albañilería".to_string(),
        detail: "DAÑO ESTRUCTURAL: Resanes y parches profundos previos.".to_string(),
        quantity: "1 Serv.".to_string(),
        unit_price: config.masonry_repair_cost,
        total: config.masonry_repair_cost,
        brand: Some("URGENTE".to_string()),
        yield_display: Some("Previo".to_string()),
        is_warning: true,
        labor_details: None,
    }
}

fn profit(config: &ProjectConfig) -> QuoteItem {
    QuoteItem {
        kind: LineKind::Profit,
        concept: "Admin / Supervisión".to_string(),
        detail: "Dirección técnica".to_string(),
        quantity: format!("{} m²", config.m2),
        unit_price: config.profit_rate,
        total: config.m2 * config.profit_rate,
        brand: Some("Supervisión".to_string()),
        yield_display: Some("N/A".to_string()),
        is_warning: false,
        labor_details: None,
    }
}
