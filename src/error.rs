//! Error types for isotope resolution and decay transforms.
use thiserror::Error;

use crate::decay_mode::DecayMode;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("unable to parse isotope string '{0}'")]
    Parse(String),
    #[error("neutron count must be stated for theoretical element '{0}'")]
    MissingMass(String),
    #[error("invalid nucleon count: {protons} protons, {neutrons} neutrons")]
    InvalidNucleonCount { protons: i64, neutrons: i64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecayError {
    #[error("decay mode {0} cannot be forced")]
    UnsupportedMode(DecayMode),
    #[error("invalid nucleon count: {protons} protons, {neutrons} neutrons")]
    InvalidNucleonCount { protons: i64, neutrons: i64 },
    #[error("emitted nucleon count must be a finite, non-negative number, got {0}")]
    InvalidEmissionCount(f64),
    #[error("cluster decay requires both a proton and a neutron count")]
    MissingClusterArgs,
    #[error("no suitable fission fragment for {0}")]
    NoSuitableFissionFragment(String),
    #[error("no daughter found for {0}")]
    NoDaughterFound(String),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PopulationError {
    #[error("tick increment must be a finite, positive number of seconds, got {0}")]
    InvalidTickIncrement(f64),
}
