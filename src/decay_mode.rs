use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DecayMode {
    Alpha,
    BetaMinus,
    BetaPlus,
    NeutronEmission,
    SpontaneousFission,
    ElectronCapture,
    NuclearIsomerTransition,
    ClusterDecay,
}

impl DecayMode {
    pub const ALL: [DecayMode; 8] = [
        DecayMode::Alpha,
        DecayMode::BetaMinus,
        DecayMode::BetaPlus,
        DecayMode::NeutronEmission,
        DecayMode::SpontaneousFission,
        DecayMode::ElectronCapture,
        DecayMode::NuclearIsomerTransition,
        DecayMode::ClusterDecay,
    ];

    /// Tag used by the reference data.
    pub fn symbol(self) -> &'static str {
        match self {
            DecayMode::Alpha => "α",
            DecayMode::BetaMinus => "β−",
            DecayMode::BetaPlus => "β+",
            DecayMode::NeutronEmission => "n",
            DecayMode::SpontaneousFission => "SF",
            DecayMode::ElectronCapture => "EC",
            DecayMode::NuclearIsomerTransition => "IT",
            DecayMode::ClusterDecay => "CD",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DecayMode::Alpha => "Eject an alpha particle (He-4)",
            DecayMode::BetaMinus => "Eject an electron and an antineutrino, turning a neutron into a proton",
            DecayMode::BetaPlus => "Eject a positron and a neutrino, turning a proton into a neutron",
            DecayMode::NeutronEmission => "Eject one or more neutrons",
            DecayMode::SpontaneousFission => "Split into two lighter nuclei",
            DecayMode::ElectronCapture => {
                "Capture an orbiting electron, converting a proton into a neutron"
            }
            DecayMode::NuclearIsomerTransition => "Release energy from a metastable state",
            DecayMode::ClusterDecay => "Emit a small cluster of nucleons",
        }
    }

    /// Interpret a decay tag from the reference data.
    ///
    /// Compound tags such as `β−n` or `2β−` resolve to the first mode matched in
    /// the order α, β−, β+, n, SF, EC, IT, CD. Unrecognised tags yield `None`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.is_empty() {
            return None;
        }
        if tag.contains('α') {
            Some(DecayMode::Alpha)
        } else if tag.contains("β−") || tag.contains("β-") {
            Some(DecayMode::BetaMinus)
        } else if tag.contains("β+") {
            Some(DecayMode::BetaPlus)
        } else if tag.trim_start_matches(|c: char| c.is_ascii_digit()) == "n" {
            Some(DecayMode::NeutronEmission)
        } else if tag.contains("SF") {
            Some(DecayMode::SpontaneousFission)
        } else if tag.contains("EC") || tag.contains('ε') {
            Some(DecayMode::ElectronCapture)
        } else if tag.contains("IT") {
            Some(DecayMode::NuclearIsomerTransition)
        } else if tag.contains("CD") {
            Some(DecayMode::ClusterDecay)
        } else {
            None
        }
    }
}

impl fmt::Display for DecayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for DecayMode {
    type Err = String;

    /// Accepts either a human name (`alpha`, `beta-`, `electron-capture`, ...)
    /// or a data tag (`α`, `β−`, `EC`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let named = match s.trim().to_ascii_lowercase().as_str() {
            "alpha" | "a" => Some(DecayMode::Alpha),
            "beta-" | "betaminus" | "beta-minus" | "b-" => Some(DecayMode::BetaMinus),
            "beta+" | "betaplus" | "beta-plus" | "b+" => Some(DecayMode::BetaPlus),
            "neutron" | "neutron-emission" => Some(DecayMode::NeutronEmission),
            "fission" | "spontaneous-fission" | "sf" => Some(DecayMode::SpontaneousFission),
            "electron-capture" | "ec" => Some(DecayMode::ElectronCapture),
            "isomer" | "isomeric-transition" | "it" => Some(DecayMode::NuclearIsomerTransition),
            "cluster" | "cluster-decay" | "cd" => Some(DecayMode::ClusterDecay),
            _ => None,
        };
        named
            .or_else(|| DecayMode::from_tag(s))
            .ok_or_else(|| format!("unknown decay mode '{s}'"))
    }
}

impl Serialize for DecayMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.symbol())
    }
}

impl<'de> Deserialize<'de> for DecayMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Deserialize an optional tag, mapping unknown tags to `None` instead of failing.
pub(crate) fn lenient_tag<'de, D>(deserializer: D) -> Result<Option<DecayMode>, D::Error>
where
    D: Deserializer<'de>,
{
    let tag: Option<String> = Option::deserialize(deserializer)?;
    Ok(tag.as_deref().and_then(DecayMode::from_tag))
}
