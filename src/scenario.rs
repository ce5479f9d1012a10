use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::{
    engine::PLACEMENT_STREAM,
    nuclide::Nuclide,
    population::Population,
    resolver::IsotopeResolver,
    rng::RngManager,
    table::ReferenceTable,
};

fn default_tick_increment() -> f64 {
    1.0
}

fn default_table() -> PathBuf {
    PathBuf::from("data/elements.json")
}

fn default_prune_theoretical() -> bool {
    true
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    600.0
}

fn default_count() -> usize {
    1
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub seed: u64,
    /// Simulated seconds per tick.
    #[serde(default = "default_tick_increment")]
    pub tick_increment: f64,
    #[serde(default)]
    pub ticks: Option<u64>,
    /// Reference table, relative to the scenario loader's base directory.
    #[serde(default = "default_table")]
    pub table: PathBuf,
    #[serde(default = "default_prune_theoretical")]
    pub prune_theoretical: bool,
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    pub nuclides: Vec<ScenarioNuclide>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioNuclide {
    pub isotope: String,
    #[serde(default = "default_count")]
    pub count: usize,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        debug!(path = %path.display(), name = %scenario.name, "scenario loaded");
        Ok(scenario)
    }

    /// Load the reference table named by `scenario`, or `override_path` when given.
    pub fn load_table(
        &self,
        scenario: &Scenario,
        override_path: Option<&Path>,
    ) -> Result<Arc<ReferenceTable>> {
        let path = override_path.unwrap_or(&scenario.table);
        ReferenceTable::load(self.base_dir.join(path))
    }
}

impl Scenario {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.tick_increment.is_finite() && self.tick_increment > 0.0,
            "tick_increment must be positive, got {}",
            self.tick_increment
        );
        ensure!(
            self.width > 0.0 && self.height > 0.0,
            "placement area must be non-empty"
        );
        Ok(())
    }

    /// Resolve every listed isotope and scatter the nuclides over the
    /// placement area using the "placement" stream of `rng`.
    pub fn build_population(
        &self,
        resolver: &IsotopeResolver,
        rng: &mut RngManager,
    ) -> Result<Population> {
        let mut population = Population::new().with_tick_increment(self.tick_increment)?;
        let mut placement = rng.stream(PLACEMENT_STREAM);
        for entry in &self.nuclides {
            let template = Nuclide::parse(resolver, &entry.isotope)
                .with_context(|| format!("Scenario '{}' lists '{}'", self.name, entry.isotope))?;
            for _ in 0..entry.count {
                let mut nuclide = template.duplicate();
                let radius = nuclide.radius();
                let x = placement.gen_range(radius, self.width - radius);
                let y = placement.gen_range(radius, self.height - radius);
                nuclide.set_position(x, y);
                population.add(nuclide);
            }
        }
        if self.prune_theoretical {
            let pruned = population.prune_theoretical();
            if pruned > 0 {
                info!(pruned, "removed nuclides missing from the reference table");
            }
        }
        Ok(population)
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or(100)
    }
}
