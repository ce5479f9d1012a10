use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info};

use crate::{population::Population, rng::RngManager};

pub const DECAY_STREAM: &str = "decay";
pub const PLACEMENT_STREAM: &str = "placement";

pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
}

pub struct EngineBuilder {
    settings: EngineSettings,
    stop_when_settled: bool,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            stop_when_settled: false,
        }
    }

    /// End the run early once no radioactive nuclide is left.
    pub fn stop_when_settled(mut self, enabled: bool) -> Self {
        self.stop_when_settled = enabled;
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            stop_when_settled: self.stop_when_settled,
            settings: self.settings,
        }
    }
}

/// State reported to the hook after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub time: f64,
    pub decays: usize,
    pub failures: usize,
    pub nuclides: usize,
    pub radioactive: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub time: f64,
    pub decays: usize,
    pub failures: usize,
}

/// Periodic driver for a [`Population`]. Every tick draws from the same
/// seeded "decay" stream, so a run is reproducible from its seed.
pub struct Engine {
    rng: RngManager,
    stop_when_settled: bool,
    settings: EngineSettings,
}

impl Engine {
    pub fn rng_mut(&mut self) -> &mut RngManager {
        &mut self.rng
    }

    pub fn scenario_name(&self) -> &str {
        &self.settings.scenario_name
    }

    pub fn run(&mut self, population: &mut Population, ticks: u64) -> Result<RunSummary> {
        self.run_with_hook(population, ticks, |_| {})
    }

    pub fn run_with_hook<F>(
        &mut self,
        population: &mut Population,
        ticks: u64,
        mut hook: F,
    ) -> Result<RunSummary>
    where
        F: FnMut(&TickSnapshot),
    {
        info!(
            scenario = %self.settings.scenario_name,
            seed = self.settings.seed,
            nuclides = population.len(),
            ticks,
            "simulation started"
        );
        let mut summary = RunSummary {
            time: population.time(),
            ..RunSummary::default()
        };
        population.start();
        for tick in 1..=ticks {
            if !population.is_running() {
                break;
            }
            let mut stream = self.rng.stream(DECAY_STREAM);
            let result = population.tick(&mut stream);
            let snapshot = TickSnapshot {
                tick,
                time: result.time,
                decays: result.decays,
                failures: result.failures,
                nuclides: population.len(),
                radioactive: population.radioactive_count(),
            };
            debug!(tick, time = snapshot.time, decays = snapshot.decays, "tick");
            hook(&snapshot);

            summary.ticks = tick;
            summary.time = result.time;
            summary.decays += result.decays;
            summary.failures += result.failures;

            if self.stop_when_settled && snapshot.radioactive == 0 {
                info!(tick, "no radioactive nuclides left");
                break;
            }
        }
        population.stop();
        info!(
            ticks = summary.ticks,
            decays = summary.decays,
            failures = summary.failures,
            "simulation finished"
        );
        Ok(summary)
    }
}
