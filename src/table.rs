//! Read-only nuclide reference table.
//!
//! The table is loaded once from the `elements.json` layout: one record per
//! lowercase element key plus an `order` array listing those keys by atomic
//! number. It is shared behind an `Arc` and never mutated afterwards.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::Path,
    sync::Arc,
};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::decay_mode::{lenient_tag, DecayMode};

#[derive(Debug, Clone, Deserialize)]
pub struct ElementRecord {
    pub name: String,
    pub symbol: String,
    pub number: u32,
    #[serde(default)]
    pub atomic_mass: Option<f64>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub isotopes: BTreeMap<String, IsotopeRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IsotopeRecord {
    #[serde(rename = "Z")]
    pub protons: u32,
    #[serde(rename = "N")]
    pub neutrons: u32,
    pub is_stable: bool,
    #[serde(default)]
    pub halflife: Option<f64>,
    #[serde(default)]
    pub decay: Vec<DecayBranch>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DecayBranch {
    #[serde(default)]
    pub daughter: Option<String>,
    #[serde(default, deserialize_with = "lenient_tag")]
    pub mode: Option<DecayMode>,
    #[serde(default)]
    pub percentage: Option<f64>,
}

impl DecayBranch {
    /// A branch with neither daughter nor mode carries no decay path.
    pub fn is_empty(&self) -> bool {
        self.daughter.is_none() && self.mode.is_none()
    }
}

#[derive(Deserialize)]
struct RawTable {
    order: Vec<String>,
    #[serde(flatten)]
    elements: HashMap<String, ElementRecord>,
}

#[derive(Debug, Default)]
pub struct ReferenceTable {
    order: Vec<String>,
    elements: HashMap<String, ElementRecord>,
    symbols: HashMap<String, String>,
}

impl ReferenceTable {
    pub fn load(path: impl AsRef<Path>) -> Result<Arc<Self>> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read reference table {}", path.display()))?;
        let table = Self::from_json(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        debug!(
            path = %path.display(),
            elements = table.order.len(),
            isotopes = table.isotope_count(),
            "reference table loaded"
        );
        Ok(Arc::new(table))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let raw: RawTable = serde_json::from_str(text)?;
        Ok(Self::from_parts(raw.order, raw.elements))
    }

    pub fn from_parts(order: Vec<String>, elements: HashMap<String, ElementRecord>) -> Self {
        let symbols = elements
            .iter()
            .map(|(key, element)| (element.symbol.clone(), key.clone()))
            .collect();
        Self {
            order,
            elements,
            symbols,
        }
    }

    pub fn element_count(&self) -> usize {
        self.order.len()
    }

    pub fn isotope_count(&self) -> usize {
        self.elements.values().map(|e| e.isotopes.len()).sum()
    }

    /// Element with the given atomic number, if the table names one.
    pub fn element_by_number(&self, protons: u32) -> Option<&ElementRecord> {
        let index = usize::try_from(protons).ok()?.checked_sub(1)?;
        self.order
            .get(index)
            .and_then(|key| self.elements.get(key))
    }

    pub fn element_by_name(&self, name: &str) -> Option<&ElementRecord> {
        self.elements.get(&name.to_lowercase())
    }

    pub fn element_by_symbol(&self, symbol: &str) -> Option<&ElementRecord> {
        self.symbols
            .get(symbol)
            .and_then(|key| self.elements.get(key))
    }

    /// Look up an isotope by its canonical symbol, e.g. `U-238` or `Pa-234m`.
    pub fn isotope(&self, isotope_symbol: &str) -> Option<&IsotopeRecord> {
        let (symbol, _) = isotope_symbol.split_once('-')?;
        self.element_by_symbol(symbol)?
            .isotopes
            .get(isotope_symbol)
    }

    /// The branch of `parent` whose daughter is `daughter`.
    pub fn branch_between(&self, parent: &str, daughter: &str) -> Option<&DecayBranch> {
        self.isotope(parent)?
            .decay
            .iter()
            .find(|branch| branch.daughter.as_deref() == Some(daughter))
    }

    /// Ground-state isotopes of an element as `(symbol, record)`, in key order.
    pub fn ground_states(&self, protons: u32) -> Vec<(&str, &IsotopeRecord)> {
        self.element_by_number(protons)
            .map(|element| {
                element
                    .isotopes
                    .iter()
                    .filter(|(symbol, _)| !is_metastable_symbol(symbol))
                    .map(|(symbol, record)| (symbol.as_str(), record))
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn is_metastable_symbol(symbol: &str) -> bool {
    symbol
        .rsplit_once('-')
        .map(|(_, mass)| mass.contains('m'))
        .unwrap_or(false)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use super::ReferenceTable;

    /// Hydrogen to beryllium, including the artificial cascade
    /// He-9 -> Li-9 -> Be-9m -> Be-9.
    pub const SMALL_TABLE: &str = r#"{
        "order": ["hydrogen", "helium", "lithium", "beryllium"],
        "hydrogen": { "name": "Hydrogen", "symbol": "H", "number": 1, "atomic_mass": 1.008,
            "category": "diatomic nonmetal",
            "isotopes": {
                "H-1": { "Z": 1, "N": 0, "is_stable": true, "decay": [] },
                "H-3": { "Z": 1, "N": 2, "is_stable": false, "halflife": 388800000.0,
                    "decay": [{ "daughter": "He-3", "mode": "β−", "percentage": 100 }] }
            } },
        "helium": { "name": "Helium", "symbol": "He", "number": 2, "atomic_mass": 4.0026,
            "category": "noble gas",
            "isotopes": {
                "He-3": { "Z": 2, "N": 1, "is_stable": true, "decay": [] },
                "He-4": { "Z": 2, "N": 2, "is_stable": true, "decay": [] },
                "He-9": { "Z": 2, "N": 7, "is_stable": false, "halflife": 0.001,
                    "decay": [{ "daughter": "Li-9", "mode": "β−", "percentage": 100 }] }
            } },
        "lithium": { "name": "Lithium", "symbol": "Li", "number": 3, "atomic_mass": 6.94,
            "category": "alkali metal",
            "isotopes": {
                "Li-8": { "Z": 3, "N": 5, "is_stable": false, "halflife": 0.84,
                    "decay": [{ "daughter": "Be-8", "mode": "β−", "percentage": 100 }] },
                "Li-9": { "Z": 3, "N": 6, "is_stable": false, "halflife": 0.18,
                    "decay": [{ "daughter": "Be-9m", "mode": "β−" }] },
                "Li-10": { "Z": 3, "N": 7, "is_stable": false, "decay": [{}] },
                "Li-11": { "Z": 3, "N": 8, "is_stable": false, "halflife": 0.0087,
                    "decay": [{ "daughter": "Qq-11", "mode": "β−", "percentage": 100 }] },
                "Li-12": { "Z": 3, "N": 9, "is_stable": false, "halflife": 0.01,
                    "decay": [
                        { "daughter": "Be-12", "mode": "β−", "percentage": 30 },
                        { "daughter": "He-8", "mode": "β−α", "percentage": 60 },
                        { "daughter": "He-7", "mode": "n", "percentage": 60 }
                    ] },
                "Li-13": { "Z": 3, "N": 10, "is_stable": false, "halflife": 0.001,
                    "decay": [
                        { "daughter": "Be-13", "mode": "β−", "percentage": 10 },
                        { "daughter": "He-9", "mode": "n" },
                        { "daughter": "Li-11", "mode": "2n" }
                    ] }
            } },
        "beryllium": { "name": "Beryllium", "symbol": "Be", "number": 4, "atomic_mass": 9.0122,
            "category": "alkaline earth metal",
            "isotopes": {
                "Be-7": { "Z": 4, "N": 3, "is_stable": false, "halflife": 2.0,
                    "decay": [{ "mode": "SF" }] },
                "Be-8": { "Z": 4, "N": 4, "is_stable": false, "halflife": 8.19e-17,
                    "decay": [{ "daughter": "He-4", "mode": "α", "percentage": 100 }] },
                "Be-9": { "Z": 4, "N": 5, "is_stable": true, "decay": [] },
                "Be-9m": { "Z": 4, "N": 5, "is_stable": false, "halflife": 1.0,
                    "decay": [{ "daughter": "Be-9", "mode": "IT", "percentage": 100 }] }
            } }
    }"#;

    pub fn small_table() -> Arc<ReferenceTable> {
        Arc::new(ReferenceTable::from_json(SMALL_TABLE).expect("fixture parses"))
    }
}
