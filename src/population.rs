//! A sample of nuclides sharing one simulated clock.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, trace};

use crate::decay_mode::DecayMode;
use crate::error::PopulationError;
use crate::nuclide::{DecayOutcome, Nuclide, NuclideState};
use crate::rng::RandomSource;

pub type NuclideId = u64;

pub const REASON_NONEXISTENT: &str = "nuclide does not exist";
pub const REASON_CLEARED: &str = "population cleared";

type DecayCallback = Box<dyn FnMut(NuclideId, &Nuclide, &DecayOutcome, f64)>;
type RemoveCallback = Box<dyn FnMut(NuclideId, &Nuclide, &str)>;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TickSummary {
    /// Simulated time after the tick.
    pub time: f64,
    pub decays: usize,
    pub failures: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TallyKind {
    Isotopes,
    Elements,
    Radioactive,
    Decayed,
    DecayedTimes,
}

impl FromStr for TallyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isotopes" | "isotope" => Ok(TallyKind::Isotopes),
            "elements" | "element" => Ok(TallyKind::Elements),
            "radioactive" => Ok(TallyKind::Radioactive),
            "decayed" => Ok(TallyKind::Decayed),
            "decayed-times" | "decays" => Ok(TallyKind::DecayedTimes),
            other => Err(format!("unknown tally '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TallyEntry {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

impl fmt::Display for TallyEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<16} {:>8} {:>7.2}%", self.label, self.count, self.percent)
    }
}

/// Owns the nuclides of one simulation and the clock that drives them.
///
/// The population has no timer of its own. `start`/`stop` only flag whether a
/// scheduler such as [`crate::engine::Engine`] should keep calling [`Population::tick`].
pub struct Population {
    next_id: NuclideId,
    members: Vec<(NuclideId, Nuclide)>,
    time: f64,
    tick_increment: f64,
    running: bool,
    on_decay: Option<DecayCallback>,
    on_remove: Option<RemoveCallback>,
}

impl Default for Population {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Population")
            .field("len", &self.members.len())
            .field("time", &self.time)
            .field("tick_increment", &self.tick_increment)
            .field("running", &self.running)
            .finish()
    }
}

impl Population {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            members: Vec::new(),
            time: 0.0,
            tick_increment: 1.0,
            running: false,
            on_decay: None,
            on_remove: None,
        }
    }

    pub fn with_tick_increment(mut self, increment: f64) -> Result<Self, PopulationError> {
        self.set_tick_increment(increment)?;
        Ok(self)
    }

    /// Called for every decay attempt that produced an outcome, successful or not.
    pub fn on_decay(&mut self, callback: impl FnMut(NuclideId, &Nuclide, &DecayOutcome, f64) + 'static) {
        self.on_decay = Some(Box::new(callback));
    }

    pub fn on_remove(&mut self, callback: impl FnMut(NuclideId, &Nuclide, &str) + 'static) {
        self.on_remove = Some(Box::new(callback));
    }

    pub fn add(&mut self, nuclide: Nuclide) -> NuclideId {
        let id = self.next_id;
        self.next_id += 1;
        self.members.push((id, nuclide));
        id
    }

    /// Remove a nuclide. Returns `false` when `id` is not a member.
    pub fn remove(&mut self, id: NuclideId, reason: &str) -> bool {
        let Some(index) = self.index_of(id) else {
            return false;
        };
        let (id, nuclide) = self.members.remove(index);
        debug!(id, isotope = nuclide.isotope_symbol(), reason, "nuclide removed");
        if let Some(callback) = self.on_remove.as_mut() {
            callback(id, &nuclide, reason);
        }
        true
    }

    pub fn clear(&mut self) {
        for (id, nuclide) in std::mem::take(&mut self.members) {
            if let Some(callback) = self.on_remove.as_mut() {
                callback(id, &nuclide, REASON_CLEARED);
            }
        }
    }

    pub fn get(&self, id: NuclideId) -> Option<&Nuclide> {
        self.index_of(id).map(|index| &self.members[index].1)
    }

    pub fn get_mut(&mut self, id: NuclideId) -> Option<&mut Nuclide> {
        self.index_of(id).map(|index| &mut self.members[index].1)
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NuclideId, &Nuclide)> {
        self.members.iter().map(|(id, nuclide)| (*id, nuclide))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn tick_increment(&self) -> f64 {
        self.tick_increment
    }

    /// Seconds added to the clock per tick. Must be finite and positive, so
    /// simulated time never runs backwards or stalls.
    pub fn set_tick_increment(&mut self, increment: f64) -> Result<(), PopulationError> {
        if !increment.is_finite() || increment <= 0.0 {
            return Err(PopulationError::InvalidTickIncrement(increment));
        }
        self.tick_increment = increment;
        Ok(())
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance every member by one tick, then the clock by one increment.
    ///
    /// A nuclide that decays is queued again at the end of the batch, so its
    /// daughter gets its own trial (with its own probability) in the same tick.
    pub fn tick(&mut self, rng: &mut dyn RandomSource) -> TickSummary {
        let increment = self.tick_increment;
        let time = self.time;
        let mut summary = TickSummary::default();
        let mut batch: Vec<usize> = (0..self.members.len()).collect();
        let mut cursor = 0;

        while cursor < batch.len() {
            let index = batch[cursor];
            cursor += 1;
            let (id, nuclide) = &mut self.members[index];
            let probability = nuclide.decay_probability_per_tick() * increment;
            if !rng.chance(probability) || nuclide.analysis().is_stable != Some(false) {
                continue;
            }
            let Some(outcome) = nuclide.decay(rng) else {
                continue;
            };
            if let Some(callback) = self.on_decay.as_mut() {
                callback(*id, nuclide, &outcome, time);
            }
            if outcome.success() {
                summary.decays += 1;
                batch.push(index);
            } else {
                summary.failures += 1;
                debug!(id = *id, parent = %outcome.parent, error = ?outcome.error, "decay failed");
            }
        }

        self.time += increment;
        summary.time = self.time;
        trace!(time = self.time, decays = summary.decays, "tick complete");
        summary
    }

    /// Natural decay of one member, skipping the per-tick probability gate.
    pub fn decay_now(&mut self, id: NuclideId, rng: &mut dyn RandomSource) -> Option<DecayOutcome> {
        let index = self.index_of(id)?;
        let time = self.time;
        let (id, nuclide) = &mut self.members[index];
        let outcome = nuclide.decay(rng)?;
        if let Some(callback) = self.on_decay.as_mut() {
            callback(*id, nuclide, &outcome, time);
        }
        Some(outcome)
    }

    /// Forced decay of one member. `None` when `id` is not a member.
    pub fn force_decay(
        &mut self,
        id: NuclideId,
        mode: DecayMode,
        neutrons: Option<f64>,
        protons: Option<f64>,
    ) -> Option<DecayOutcome> {
        let index = self.index_of(id)?;
        let time = self.time;
        let (id, nuclide) = &mut self.members[index];
        let outcome = nuclide.force_decay(mode, neutrons, protons);
        if let Some(callback) = self.on_decay.as_mut() {
            callback(*id, nuclide, &outcome, time);
        }
        Some(outcome)
    }

    /// Zero the clock and return every transformed nuclide to its origin.
    pub fn reset_simulation(&mut self) {
        self.time = 0.0;
        let mut restored = 0;
        for (_, nuclide) in &mut self.members {
            if nuclide.isotope_symbol() != nuclide.origin().isotope_symbol
                || nuclide.history().len() > 1
            {
                nuclide.restore_origin();
                restored += 1;
            }
        }
        debug!(restored, "simulation reset");
    }

    /// Remove members whose isotope is not in the reference table.
    pub fn prune_theoretical(&mut self) -> usize {
        let doomed: Vec<NuclideId> = self
            .members
            .iter()
            .filter(|(_, nuclide)| !nuclide.analysis().exists)
            .map(|(id, _)| *id)
            .collect();
        for id in &doomed {
            self.remove(*id, REASON_NONEXISTENT);
        }
        doomed.len()
    }

    /// Topmost member under the point; later additions are drawn on top.
    pub fn nuclide_at(&self, x: f64, y: f64) -> Option<NuclideId> {
        self.members
            .iter()
            .rev()
            .find(|(_, nuclide)| nuclide.contains_point(x, y))
            .map(|(id, _)| *id)
    }

    pub fn radioactive_count(&self) -> usize {
        self.members
            .iter()
            .filter(|(_, nuclide)| nuclide.state() == NuclideState::Radioactive)
            .count()
    }

    /// Group members by `kind`, most common first.
    pub fn tally(&self, kind: TallyKind) -> Vec<TallyEntry> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for (_, nuclide) in &self.members {
            *counts.entry(tally_label(nuclide, kind)).or_default() += 1;
        }
        let total = self.members.len() as f64;
        let mut entries: Vec<TallyEntry> = counts
            .into_iter()
            .map(|(label, count)| TallyEntry {
                label,
                count,
                percent: count as f64 / total * 100.0,
            })
            .collect();
        entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
        entries
    }

    fn index_of(&self, id: NuclideId) -> Option<usize> {
        self.members.iter().position(|(member, _)| *member == id)
    }
}

fn tally_label(nuclide: &Nuclide, kind: TallyKind) -> String {
    match kind {
        TallyKind::Isotopes => nuclide.isotope_symbol().to_string(),
        TallyKind::Elements => nuclide.element_name().to_string(),
        TallyKind::Radioactive => match nuclide.state() {
            NuclideState::Stable => "Stable".to_string(),
            NuclideState::Radioactive => "Radioactive".to_string(),
            NuclideState::Theoretical => "Unknown".to_string(),
        },
        TallyKind::Decayed => {
            if nuclide.has_decayed() {
                "Decayed".to_string()
            } else {
                "Not decayed".to_string()
            }
        }
        TallyKind::DecayedTimes => match nuclide.decay_count() {
            1 => "1 decay".to_string(),
            count => format!("{count} decays"),
        },
    }
}
