//! Isotope resolution: element names, symbols, systematic (IUPAC) names and
//! the reference-table lookups that decide whether an isotope exists.

use std::sync::Arc;

use serde::Serialize;

use crate::error::ResolveError;
use crate::table::{DecayBranch, ElementRecord, IsotopeRecord, ReferenceTable};

const IUPAC_ROOTS: [&str; 10] = [
    "nil", "un", "bi", "tri", "quad", "pent", "hex", "sept", "oct", "enn",
];

const MAGIC_NUMBERS: [u32; 6] = [2, 8, 20, 28, 50, 82];
const MAGIC_PROTONS: [u32; 1] = [114];
const MAGIC_NEUTRONS: [u32; 2] = [126, 184];

/// Normalised description of one isotope. Never mutated once built; a decay
/// produces a new analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IsotopeAnalysis {
    pub exists: bool,
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub protons: u32,
    pub neutrons: u32,
    pub isotope_symbol: String,
    pub metastable_number: Option<u32>,
    pub metastable_parent_symbol: Option<String>,
    pub iupac_name: String,
    pub iupac_symbol: String,
    /// Taken from the reference table; `None` when the isotope is not listed.
    pub is_stable: Option<bool>,
    /// Seconds. Stable isotopes without a listed value are infinite.
    pub halflife: Option<f64>,
    /// Table value when listed, otherwise the nuclear-shell heuristic.
    pub estimated_stable: Option<bool>,
}

impl IsotopeAnalysis {
    /// Element name, or the systematic name for unnamed elements.
    pub fn element_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.iupac_name)
    }

    pub fn element_symbol(&self) -> &str {
        self.symbol.as_deref().unwrap_or(&self.iupac_symbol)
    }

    pub fn mass_number(&self) -> u32 {
        self.protons + self.neutrons
    }

    /// e.g. `Uranium-238`
    pub fn isotope_name(&self) -> String {
        format!("{}-{}", self.element_name(), self.mass_number())
    }

    pub fn is_metastable(&self) -> bool {
        self.metastable_number.is_some()
    }
}

/// Stateless translator between isotope representations, backed by a shared
/// read-only reference table.
#[derive(Debug, Clone)]
pub struct IsotopeResolver {
    table: Arc<ReferenceTable>,
}

impl IsotopeResolver {
    pub fn new(table: Arc<ReferenceTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ReferenceTable {
        &self.table
    }

    /// Resolve an explicit nucleon pair. Only `protons == 0` is rejected.
    pub fn resolve_nucleons(
        &self,
        protons: u32,
        neutrons: u32,
    ) -> Result<IsotopeAnalysis, ResolveError> {
        if protons == 0 {
            return Err(ResolveError::InvalidNucleonCount {
                protons: 0,
                neutrons: i64::from(neutrons),
            });
        }
        Ok(self.build(protons, neutrons, None))
    }

    /// Resolve a signed nucleon pair, as produced by decay arithmetic.
    pub fn resolve_signed(
        &self,
        protons: i64,
        neutrons: i64,
    ) -> Result<IsotopeAnalysis, ResolveError> {
        match (u32::try_from(protons), u32::try_from(neutrons)) {
            (Ok(p), Ok(n)) if p >= 1 => Ok(self.build(p, n, None)),
            _ => Err(ResolveError::InvalidNucleonCount { protons, neutrons }),
        }
    }

    /// Resolve a free-form string: an element name (`uranium`, `Ununennium`),
    /// an element symbol (`U`, `Uue`) or an isotope (`U-238`, `In-119m2`).
    pub fn resolve_str(&self, input: &str) -> Result<IsotopeAnalysis, ResolveError> {
        let input = input.trim();
        let parse_error = || ResolveError::Parse(input.to_string());
        let (identifier, mass_part) = match input.split_once('-') {
            Some((identifier, mass)) => (identifier.trim(), Some(mass.trim())),
            None => (input, None),
        };

        let (mass, metastable) = match mass_part {
            Some(part) => {
                let (digits, metastable) = split_metastable(part).ok_or_else(parse_error)?;
                let mass: u32 = digits.parse().map_err(|_| parse_error())?;
                (Some(mass), metastable)
            }
            None => (None, None),
        };

        let protons = self.identify_element(identifier).ok_or_else(parse_error)?;
        if protons == 0 {
            return Err(parse_error());
        }

        let neutrons = match mass {
            Some(mass) => i64::from(mass) - i64::from(protons),
            None => {
                let atomic_mass = self
                    .table
                    .element_by_number(protons)
                    .and_then(|element| element.atomic_mass)
                    .ok_or_else(|| ResolveError::MissingMass(input.to_string()))?;
                (atomic_mass - f64::from(protons)).round() as i64
            }
        };
        let neutrons = u32::try_from(neutrons).map_err(|_| ResolveError::InvalidNucleonCount {
            protons: i64::from(protons),
            neutrons,
        })?;

        Ok(self.build(protons, neutrons, metastable))
    }

    /// Decay branches for an isotope; empty when the table does not list it.
    pub fn branches(&self, analysis: &IsotopeAnalysis) -> &[DecayBranch] {
        self.record(analysis)
            .map(|record| record.decay.as_slice())
            .unwrap_or(&[])
    }

    pub fn record(&self, analysis: &IsotopeAnalysis) -> Option<&IsotopeRecord> {
        self.table
            .element_by_number(analysis.protons)?
            .isotopes
            .get(&analysis.isotope_symbol)
    }

    pub fn element(&self, analysis: &IsotopeAnalysis) -> Option<&ElementRecord> {
        self.table.element_by_number(analysis.protons)
    }

    fn identify_element(&self, identifier: &str) -> Option<u32> {
        if identifier.is_empty() {
            return None;
        }
        if let Some(element) = self.table.element_by_name(identifier) {
            return Some(element.number);
        }
        if let Some(number) = parse_iupac_name(identifier) {
            return Some(number);
        }
        if let Some(element) = self.table.element_by_symbol(&capitalise(identifier)) {
            return Some(element.number);
        }
        parse_iupac_symbol(identifier)
    }

    fn build(&self, protons: u32, neutrons: u32, metastable: Option<u32>) -> IsotopeAnalysis {
        let element = self.table.element_by_number(protons);
        let (iupac_name, iupac_symbol) = iupac_name_symbol(protons);
        let base_symbol = element
            .map(|e| e.symbol.as_str())
            .unwrap_or(iupac_symbol.as_str());
        let parent_symbol = format!("{base_symbol}-{}", protons + neutrons);
        let isotope_symbol = match metastable {
            None => parent_symbol.clone(),
            Some(0) => format!("{parent_symbol}m"),
            Some(number) => format!("{parent_symbol}m{number}"),
        };

        let record = element.and_then(|e| e.isotopes.get(&isotope_symbol));
        let is_stable = record.map(|r| r.is_stable);
        let halflife = record.and_then(|r| {
            r.halflife
                .or_else(|| r.is_stable.then_some(f64::INFINITY))
        });
        let estimated_stable = is_stable.or_else(|| estimate_stable(protons, neutrons));

        IsotopeAnalysis {
            exists: record.is_some(),
            name: element.map(|e| e.name.clone()),
            symbol: element.map(|e| e.symbol.clone()),
            protons,
            neutrons,
            isotope_symbol,
            metastable_number: metastable,
            metastable_parent_symbol: metastable.map(|_| parent_symbol),
            iupac_name,
            iupac_symbol,
            is_stable,
            halflife,
            estimated_stable,
        }
    }
}

/// Split `238`, `119m`, `119m2` into the mass digits and optional isomer number.
/// A bare `m` and `m0` both read as isomer 0, so `In-119m0` resolves to `In-119m`.
fn split_metastable(part: &str) -> Option<(&str, Option<u32>)> {
    match part.find(['m', 'M']) {
        None => Some((part, None)),
        Some(index) => {
            let digits = &part[..index];
            let suffix = &part[index + 1..];
            let number = if suffix.is_empty() {
                0
            } else {
                suffix.parse().ok()?
            };
            Some((digits, Some(number)))
        }
    }
}

fn capitalise(text: &str) -> String {
    let lower = text.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Systematic name and symbol built from the digits of the atomic number,
/// e.g. 119 -> (`Ununennium`, `Uue`).
pub fn iupac_name_symbol(atomic_number: u32) -> (String, String) {
    let mut name = String::new();
    let mut symbol = String::new();
    for digit in atomic_number.to_string().bytes() {
        let root = IUPAC_ROOTS[usize::from(digit - b'0')];
        name.push_str(root);
        symbol.push_str(&root[..1]);
    }
    (format!("{}ium", capitalise(&name)), capitalise(&symbol))
}

/// Inverse of the symbol half of [`iupac_name_symbol`].
pub fn parse_iupac_symbol(symbol: &str) -> Option<u32> {
    if symbol.is_empty() {
        return None;
    }
    let mut digits = String::with_capacity(symbol.len());
    for c in symbol.to_lowercase().chars() {
        let index = IUPAC_ROOTS.iter().position(|root| root.starts_with(c))?;
        digits.push(char::from(b'0' + index as u8));
    }
    digits.parse().ok()
}

/// Inverse of the name half of [`iupac_name_symbol`].
pub fn parse_iupac_name(name: &str) -> Option<u32> {
    let lower = name.to_lowercase();
    let mut rest = lower.strip_suffix("ium")?;
    if rest.is_empty() {
        return None;
    }
    let mut digits = String::new();
    while !rest.is_empty() {
        let (index, root) = IUPAC_ROOTS
            .iter()
            .enumerate()
            .find(|(_, root)| rest.starts_with(*root))?;
        digits.push(char::from(b'0' + index as u8));
        rest = &rest[root.len()..];
    }
    digits.parse().ok()
}

/// Rough stability guess for isotopes missing from the table, from magic
/// numbers and the neutron/proton ratio. `None` when no rule applies.
pub fn estimate_stable(protons: u32, neutrons: u32) -> Option<bool> {
    if protons >= 84 {
        return Some(false);
    }
    if (protons + neutrons) % 2 == 0 {
        return Some(true);
    }
    if MAGIC_NUMBERS.contains(&protons)
        || MAGIC_NUMBERS.contains(&neutrons)
        || MAGIC_NEUTRONS.contains(&neutrons)
        || MAGIC_PROTONS.contains(&protons)
    {
        return Some(true);
    }
    if neutrons < protons {
        return Some(false);
    }
    None
}
