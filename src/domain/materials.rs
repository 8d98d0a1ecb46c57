//! Coating materials and the brand preset catalog.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Finish coat (or primer) a quote can be priced with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MaterialType {
    #[serde(rename = "Impermeabilizante")]
    Waterproofing,
    #[serde(rename = "Pintura")]
    Paint,
    #[serde(rename = "Sellador")]
    Sealer,
}

impl MaterialType {
    pub const ALL: [MaterialType; 3] = [Self::Waterproofing, Self::Paint, Self::Sealer];

    /// Label used on the printed quote and on the wire.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Waterproofing => "Impermeabilizante",
            Self::Paint => "Pintura",
            Self::Sealer => "Sellador",
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown material: {0}")]
pub struct UnknownMaterial(pub String);

impl FromStr for MaterialType {
    type Err = UnknownMaterial;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownMaterial(s.to_string()))
    }
}

/// One coating product as priced on a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialConfig {
    pub name: MaterialType,
    /// Square meters covered by one container. Always > 0.
    #[serde(rename = "yield")]
    pub yield_per_unit: f64,
    /// Price of one container.
    pub price: f64,
    pub brand: String,
}

impl MaterialConfig {
    pub fn new(name: MaterialType, brand: impl Into<String>, yield_per_unit: f64, price: f64) -> Self {
        Self {
            name,
            yield_per_unit,
            price,
            brand: brand.into(),
        }
    }
}

/// One entry per [`MaterialType`], so lookups can never miss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialSet {
    #[serde(rename = "Impermeabilizante")]
    pub waterproofing: MaterialConfig,
    #[serde(rename = "Pintura")]
    pub paint: MaterialConfig,
    #[serde(rename = "Sellador")]
    pub sealer: MaterialConfig,
}

impl MaterialSet {
    pub fn get(&self, material: MaterialType) -> &MaterialConfig {
        match material {
            MaterialType::Waterproofing => &self.waterproofing,
            MaterialType::Paint => &self.paint,
            MaterialType::Sealer => &self.sealer,
        }
    }

    pub fn get_mut(&mut self, material: MaterialType) -> &mut MaterialConfig {
        match material {
            MaterialType::Waterproofing => &mut self.waterproofing,
            MaterialType::Paint => &mut self.paint,
            MaterialType::Sealer => &mut self.sealer,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialType, &MaterialConfig)> {
        MaterialType::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

/// A known retail product that can be loaded into a material slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialPreset {
    pub material: MaterialType,
    pub brand: &'static str,
    #[serde(rename = "yield")]
    pub yield_per_unit: f64,
    pub price: f64,
}

impl MaterialPreset {
    const fn new(material: MaterialType, brand: &'static str, yield_per_unit: f64, price: f64) -> Self {
        Self {
            material,
            brand,
            yield_per_unit,
            price,
        }
    }

    pub fn to_config(self) -> MaterialConfig {
        MaterialConfig::new(self.material, self.brand, self.yield_per_unit, self.price)
    }
}

pub const PRESETS: [MaterialPreset; 9] = [
    MaterialPreset::new(MaterialType::Waterproofing, "Fester Vaportite", 34.0, 1850.0),
    MaterialPreset::new(MaterialType::Waterproofing, "Sika Acril Techo", 34.0, 1650.0),
    MaterialPreset::new(MaterialType::Waterproofing, "Comex Top", 34.0, 1400.0),
    MaterialPreset::new(MaterialType::Paint, "Vinimex Total", 120.0, 2400.0),
    MaterialPreset::new(MaterialType::Paint, "Comex Pro 1000", 100.0, 1800.0),
    MaterialPreset::new(MaterialType::Paint, "Behr Premium", 140.0, 2900.0),
    MaterialPreset::new(MaterialType::Sealer, "Sellador 5x1 Sayer", 60.0, 1300.0),
    MaterialPreset::new(MaterialType::Sealer, "Sika Vinilo", 50.0, 1100.0),
    MaterialPreset::new(MaterialType::Sealer, "Comex 5x1", 55.0, 1250.0),
];

pub fn presets_for(material: MaterialType) -> impl Iterator<Item = &'static MaterialPreset> {
    PRESETS.iter().filter(move |p| p.material == material)
}

/// Looks up a preset by brand, ignoring case.
pub fn find_preset(material: MaterialType, brand: &str) -> Option<&'static MaterialPreset> {
    let brand = brand.trim();
    presets_for(material).find(|p| p.brand.eq_ignore_ascii_case(brand))
}

/// Request to load a catalog preset into a material slot.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyPresetRequest {
    pub brand: String,
}

/// Presets grouped for a picker.
#[derive(Debug, Clone, Serialize)]
pub struct PresetGroup {
    pub material: MaterialType,
    pub presets: Vec<MaterialPreset>,
}

pub fn preset_catalog() -> Vec<PresetGroup> {
    MaterialType::ALL
        .into_iter()
        .map(|material| PresetGroup {
            material,
            presets: presets_for(material).copied().collect(),
        })
        .collect()
}
