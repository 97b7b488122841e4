//! Catalog model and evaluation rules for the PC-building assistant.
//!
//! The catalog collaborator hands us [`Component`] records whose
//! specifications are loosely structured `{name, value}` pairs of free text.
//! This crate turns those into something the recommender can reason about:
//!
//! * [`spec`] – normalizes free-text attribute values into typed magnitudes.
//! * [`stock`] – resolves availability and the lowest in-stock price from batches.
//! * [`compat`] – socket, memory and power compatibility verdicts.
//! * [`score`] – per-component and per-build heuristic scores.
//!
//! Everything here is a pure function of its inputs; components are treated
//! as read-only for the duration of a request.

pub mod compat;
pub mod score;
pub mod spec;
pub mod stock;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

pub use compat::{check_compatibility, CompatibilityRules, CompatibilityVerdict};
pub use score::{score_component, ProfileScores};
pub use spec::{normalize, Attribute, NormalizedSpec, SpecKind, Unit};
pub use stock::{available_quantity, best_price, Availability, StockLevel};

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown component category: {0}")]
    UnknownCategory(String),

    #[error("Failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Hardware category of a catalog entry.
///
/// The set is closed: catalog labels that do not map onto one of these
/// variants are rejected when the catalog is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "&'static str")]
pub enum Category {
    Cpu,
    Motherboard,
    Ram,
    Storage,
    Gpu,
    Psu,
    Case,
    CpuCooler,
    CaseFan,
    Desktop,
    Laptop,
    Monitor,
    Keyboard,
    Mouse,
    Headset,
    Speaker,
    Accessory,
}

impl Category {
    pub const ALL: [Category; 17] = [
        Category::Cpu,
        Category::Motherboard,
        Category::Ram,
        Category::Storage,
        Category::Gpu,
        Category::Psu,
        Category::Case,
        Category::CpuCooler,
        Category::CaseFan,
        Category::Desktop,
        Category::Laptop,
        Category::Monitor,
        Category::Keyboard,
        Category::Mouse,
        Category::Headset,
        Category::Speaker,
        Category::Accessory,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::Motherboard => "Motherboard",
            Category::Ram => "RAM",
            Category::Storage => "Storage",
            Category::Gpu => "GPU",
            Category::Psu => "PSU",
            Category::Case => "Case",
            Category::CpuCooler => "CPU Cooler",
            Category::CaseFan => "Case Fan",
            Category::Desktop => "Desktop",
            Category::Laptop => "Laptop",
            Category::Monitor => "Monitor",
            Category::Keyboard => "Keyboard",
            Category::Mouse => "Mouse",
            Category::Headset => "Headset",
            Category::Speaker => "Speaker",
            Category::Accessory => "Accessory",
        }
    }

    /// Whether parts of this category can be assembled into a desktop build.
    ///
    /// Prebuilt systems and peripherals are sold alongside parts but never
    /// take part in compatibility rules or scoring.
    pub fn is_build_part(self) -> bool {
        matches!(
            self,
            Category::Cpu
                | Category::Motherboard
                | Category::Ram
                | Category::Storage
                | Category::Gpu
                | Category::Psu
                | Category::Case
                | Category::CpuCooler
                | Category::CaseFan
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        let category = match key.as_str() {
            "cpu" | "cpus" | "processor" | "processors" => Category::Cpu,
            "motherboard" | "motherboards" | "mainboard" | "mobo" => Category::Motherboard,
            "ram" | "memory" | "rammemory" | "systemmemory" => Category::Ram,
            "storage" | "ssd" | "hdd" | "nvme" | "harddrive" | "solidstatedrive" => {
                Category::Storage
            }
            "gpu" | "gpus" | "graphicscard" | "videocard" | "graphics" => Category::Gpu,
            "psu" | "powersupply" | "powersupplyunit" => Category::Psu,
            "case" | "pccase" | "computercase" | "chassis" => Category::Case,
            "cpucooler" | "cooler" | "cooling" | "aiocooler" => Category::CpuCooler,
            "casefan" | "casefans" | "fan" | "fans" => Category::CaseFan,
            "desktop" | "desktoppc" | "prebuilt" => Category::Desktop,
            "laptop" | "laptops" | "notebook" => Category::Laptop,
            "monitor" | "monitors" | "display" => Category::Monitor,
            "keyboard" | "keyboards" => Category::Keyboard,
            "mouse" | "mice" => Category::Mouse,
            "headset" | "headsets" | "headphones" => Category::Headset,
            "speaker" | "speakers" => Category::Speaker,
            "accessory" | "accessories" | "peripheral" | "peripherals" => Category::Accessory,
            _ => return Err(CatalogError::UnknownCategory(s.to_string())),
        };
        Ok(category)
    }
}

impl TryFrom<String> for Category {
    type Error = CatalogError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Category> for &'static str {
    fn from(category: Category) -> Self {
        category.label()
    }
}

/// One free-text `{name, value}` specification pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub name: String,
    pub value: String,
}

impl Specification {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A stock lot of one component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    #[serde(deserialize_with = "string_or_number")]
    pub batch_id: String,
    pub quantity: u32,
    pub remaining: u32,
    #[serde(default)]
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<DateTime<Utc>>,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
    pub category: Category,
    /// Typical draw in watts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_draw: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub specifications: Vec<Specification>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub batches: Vec<Batch>,
}

impl Component {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category,
            power_draw: None,
            specifications: Vec::new(),
            batches: Vec::new(),
        }
    }

    pub fn with_spec(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.specifications.push(Specification::new(name, value));
        self
    }

    pub fn with_power_draw(mut self, watts: f64) -> Self {
        self.power_draw = Some(watts);
        self
    }

    pub fn with_batch(mut self, batch: Batch) -> Self {
        self.batches.push(batch);
        self
    }

    /// Power draw in watts; absent or nonsensical values count as zero.
    pub fn power_draw_watts(&self) -> f64 {
        self.power_draw
            .filter(|w| w.is_finite() && *w > 0.0)
            .unwrap_or(0.0)
    }
}

/// Parse a catalog exported by the catalog collaborator (a JSON array of components).
pub fn parse_catalog(json: &str) -> Result<Vec<Component>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

/// Row ids come out of the relational store as integers, hand-entered ones as strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_category_aliases() {
        assert_eq!("cpu".parse::<Category>().unwrap(), Category::Cpu);
        assert_eq!("Graphics Card".parse::<Category>().unwrap(), Category::Gpu);
        assert_eq!("power_supply".parse::<Category>().unwrap(), Category::Psu);
        assert_eq!("CPU Cooler".parse::<Category>().unwrap(), Category::CpuCooler);
        assert_eq!("Case-Fan".parse::<Category>().unwrap(), Category::CaseFan);
        assert!("flux capacitor".parse::<Category>().is_err());
    }

    #[test]
    fn test_category_labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(category.label().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_parse_catalog() {
        let json = r#"[
            {
                "id": 17,
                "name": "Ryzen 5 5600",
                "category": "CPU",
                "powerDraw": 65,
                "specifications": [
                    {"name": "Socket", "value": "AM4"},
                    {"name": "Cores", "value": "6"}
                ],
                "batches": [
                    {"batchId": "B-1", "quantity": 10, "remaining": 4, "buyPrice": 6500, "sellPrice": "7495.00",
                     "dateAdded": "2024-03-01T08:00:00Z"}
                ]
            },
            {"id": "mb-1", "name": "B550M", "category": "Motherboard"}
        ]"#;

        let catalog = parse_catalog(json).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].id, "17");
        assert_eq!(catalog[0].category, Category::Cpu);
        assert_eq!(catalog[0].power_draw_watts(), 65.0);
        assert_eq!(catalog[0].batches[0].sell_price, dec!(7495.00));
        assert_eq!(catalog[0].batches[0].buy_price, dec!(6500));
        assert!(catalog[0].batches[0].date_added.is_some());
        assert_eq!(catalog[1].power_draw_watts(), 0.0);
        assert!(catalog[1].batches.is_empty());
    }

    #[test]
    fn test_parse_catalog_rejects_unknown_category() {
        let json = r#"[{"id": 1, "name": "Mystery", "category": "Toaster"}]"#;
        let err = parse_catalog(json).unwrap_err();
        assert!(err.to_string().contains("Toaster"));
    }
}
