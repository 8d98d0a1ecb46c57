use serde::{Deserialize, Serialize};

use super::project::ProjectConfig;

/// Value-added tax applied to the subtotal.
pub const IVA_RATE: f64 = 0.16;

/// Which line of the quote an item is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    PrimaryMaterial,
    Sealer,
    AuxMaterial,
    Scaffolding,
    Labor,
    MasonryRepair,
    Profit,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaborDetails {
    pub workers: u32,
    pub rate: f64,
    pub days: u32,
}

/// One printed line of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    pub kind: LineKind,
    pub concept: String,
    pub detail: String,
    /// Pre-formatted for display.
    pub quantity: String,
    pub unit_price: f64,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yield_display: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_warning: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labor_details: Option<LaborDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResult {
    pub items: Vec<QuoteItem>,
    pub subtotal: f64,
    pub iva: f64,
    pub total: f64,
}

impl QuoteResult {
    /// Totals the items and applies IVA.
    pub fn from_items(items: Vec<QuoteItem>) -> Self {
        let subtotal: f64 = items.iter().map(|item| item.total).sum();
        let iva = subtotal * IVA_RATE;
        Self {
            items,
            subtotal,
            iva,
            total: subtotal + iva,
        }
    }

    pub fn item(&self, kind: LineKind) -> Option<&QuoteItem> {
        self.items.iter().find(|item| item.kind == kind)
    }

    /// Material spend: primary finish plus primer.
    pub fn materials_total(&self) -> f64 {
        self.items
            .iter()
            .filter(|item| matches!(item.kind, LineKind::PrimaryMaterial | LineKind::Sealer))
            .map(|item| item.total)
            .sum()
    }
}

// =============================================================================
// Response DTOs
// =============================================================================

/// A configuration together with the quote derived from it.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteSnapshot {
    pub config: ProjectConfig,
    pub quote: QuoteResult,
}

impl QuoteSnapshot {
    pub fn new(config: &ProjectConfig) -> Self {
        Self {
            quote: crate::engine::compute(config),
            config: config.clone(),
        }
    }
}
