//! A single decaying particle and its transformation history.
//!
//! Every transformation (natural decay, forced decay, direct edit) either
//! replaces the analysis *and* appends one history entry, or changes nothing.

use serde::Serialize;
use tracing::trace;

use crate::decay_mode::DecayMode;
use crate::error::{DecayError, ResolveError};
use crate::resolver::{IsotopeAnalysis, IsotopeResolver};
use crate::rng::RandomSource;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub isotope: String,
    /// `None` for the origin entry and for direct edits.
    pub mode: Option<DecayMode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecayOutcome {
    pub parent: String,
    pub daughter: Option<String>,
    pub mode: Option<DecayMode>,
    /// Lighter nucleus emitted by spontaneous fission.
    pub fragment: Option<String>,
    pub error: Option<DecayError>,
}

impl DecayOutcome {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<Self, DecayError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }

    fn failed(parent: String, mode: Option<DecayMode>, error: DecayError) -> Self {
        Self {
            parent,
            daughter: None,
            mode,
            fragment: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NuclideState {
    Stable,
    Radioactive,
    Theoretical,
}

struct Selection {
    daughter: String,
    mode: Option<DecayMode>,
    fragment: Option<String>,
}

struct FissionSplit {
    remainder: IsotopeAnalysis,
    fragment: String,
}

#[derive(Debug)]
pub struct Nuclide {
    resolver: IsotopeResolver,
    analysis: IsotopeAnalysis,
    origin: IsotopeAnalysis,
    history: Vec<HistoryEntry>,
    pub position: Position,
    pub highlighted: bool,
}

impl Nuclide {
    pub fn from_analysis(resolver: IsotopeResolver, analysis: IsotopeAnalysis) -> Self {
        let history = vec![HistoryEntry {
            isotope: analysis.isotope_symbol.clone(),
            mode: None,
        }];
        Self {
            resolver,
            origin: analysis.clone(),
            analysis,
            history,
            position: Position::default(),
            highlighted: false,
        }
    }

    pub fn parse(resolver: &IsotopeResolver, isotope: &str) -> Result<Self, ResolveError> {
        let analysis = resolver.resolve_str(isotope)?;
        Ok(Self::from_analysis(resolver.clone(), analysis))
    }

    pub fn from_nucleons(
        resolver: &IsotopeResolver,
        protons: u32,
        neutrons: u32,
    ) -> Result<Self, ResolveError> {
        let analysis = resolver.resolve_nucleons(protons, neutrons)?;
        Ok(Self::from_analysis(resolver.clone(), analysis))
    }

    pub fn analysis(&self) -> &IsotopeAnalysis {
        &self.analysis
    }

    /// Isotope this nuclide was constructed as. Fixed for its lifetime.
    pub fn origin(&self) -> &IsotopeAnalysis {
        &self.origin
    }

    pub fn isotope_symbol(&self) -> &str {
        &self.analysis.isotope_symbol
    }

    pub fn element_name(&self) -> &str {
        self.analysis.element_name()
    }

    pub fn element_symbol(&self) -> &str {
        self.analysis.element_symbol()
    }

    pub fn protons(&self) -> u32 {
        self.analysis.protons
    }

    pub fn neutrons(&self) -> u32 {
        self.analysis.neutrons
    }

    pub fn category(&self) -> Option<&str> {
        self.resolver
            .element(&self.analysis)
            .and_then(|element| element.category.as_deref())
    }

    /// Display radius, growing with nucleon count.
    pub fn radius(&self) -> f64 {
        10.0 + f64::from(self.analysis.mass_number()) / 10.0
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = Position { x, y };
    }

    /// Bounding-box hit test against the display radius.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let r = self.radius();
        (self.position.x - r..=self.position.x + r).contains(&x)
            && (self.position.y - r..=self.position.y + r).contains(&y)
    }

    pub fn state(&self) -> NuclideState {
        if self.analysis.is_stable == Some(true) {
            NuclideState::Stable
        } else if self.analysis.exists {
            NuclideState::Radioactive
        } else {
            NuclideState::Theoretical
        }
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn has_decayed(&self) -> bool {
        self.history.len() > 1
    }

    pub fn decay_count(&self) -> usize {
        self.history.len() - 1
    }

    /// Chance of decaying in one unit of simulated time.
    ///
    /// This is `1 / (2 * halflife)`, an approximation that only holds while the
    /// tick is much shorter than the half-life. NaN when the half-life is unknown.
    pub fn decay_probability_per_tick(&self) -> f64 {
        match self.analysis.halflife {
            Some(halflife) => 1.0 / (2.0 * halflife),
            None => f64::NAN,
        }
    }

    pub fn can_decay(&self) -> bool {
        if !self.analysis.exists || self.analysis.is_stable == Some(true) {
            return false;
        }
        if !self.decay_probability_per_tick().is_finite() {
            return false;
        }
        self.resolver
            .branches(&self.analysis)
            .iter()
            .any(|branch| !branch.is_empty())
    }

    /// Natural decay through the reference-table branches.
    ///
    /// Returns `None` without touching state for stable or unlisted isotopes.
    pub fn decay(&mut self, rng: &mut dyn RandomSource) -> Option<DecayOutcome> {
        if self.analysis.is_stable == Some(true) || !self.analysis.exists {
            return None;
        }
        let parent = self.analysis.isotope_symbol.clone();
        let selection = match self.select_branch(rng) {
            Some(selection) => selection,
            None => {
                return Some(DecayOutcome::failed(
                    parent.clone(),
                    None,
                    DecayError::NoDaughterFound(parent),
                ))
            }
        };

        match self.resolver.resolve_str(&selection.daughter) {
            Ok(analysis) => {
                trace!(%parent, daughter = %analysis.isotope_symbol, "natural decay");
                self.commit(analysis, selection.mode);
                Some(DecayOutcome {
                    parent,
                    daughter: Some(selection.daughter),
                    mode: selection.mode,
                    fragment: selection.fragment,
                    error: None,
                })
            }
            Err(err) => Some(DecayOutcome {
                parent,
                daughter: Some(selection.daughter),
                mode: selection.mode,
                fragment: None,
                error: Some(err.into()),
            }),
        }
    }

    fn select_branch(&self, rng: &mut dyn RandomSource) -> Option<Selection> {
        let branches = self.resolver.branches(&self.analysis);
        let mut known = Vec::new();
        let mut unknown = Vec::new();
        for branch in branches {
            if let Some(daughter) = &branch.daughter {
                match branch.percentage {
                    Some(percentage) => known.push((daughter, branch.mode, percentage)),
                    None => unknown.push((daughter, branch.mode)),
                }
            }
        }

        // Independent trial per branch, not one normalised draw.
        for (daughter, mode, percentage) in &known {
            if rng.chance(percentage / 100.0) {
                return Some(Selection::of(daughter, *mode));
            }
        }

        if !unknown.is_empty() {
            let (daughter, mode) = unknown[rng.pick(unknown.len())];
            return Some(Selection::of(daughter, mode));
        }

        // Ties keep the earlier branch.
        let likeliest = known.iter().fold(None, |best: Option<&(&String, _, f64)>, entry| {
            match best {
                Some(current) if current.2 >= entry.2 => Some(current),
                _ => Some(entry),
            }
        });
        if let Some((daughter, mode, _)) = likeliest {
            return Some(Selection::of(daughter, *mode));
        }

        let has_bare_fission = branches.iter().any(|branch| {
            branch.mode == Some(DecayMode::SpontaneousFission) && branch.daughter.is_none()
        });
        if has_bare_fission {
            if let Some(split) = self.fission_split() {
                return Some(Selection {
                    daughter: split.remainder.isotope_symbol,
                    mode: Some(DecayMode::SpontaneousFission),
                    fragment: Some(split.fragment),
                });
            }
        }
        None
    }

    /// Deterministic fission fragment choice.
    ///
    /// Fragment atomic numbers are tried from `Z/2` down to `ceil(Z/3)`. For
    /// the first one with a usable table entry, the ground-state isotope whose
    /// N/Z ratio is closest to the parent's is emitted (lighter mass on ties),
    /// and the nuclide becomes the remainder.
    fn fission_split(&self) -> Option<FissionSplit> {
        let protons = self.analysis.protons;
        let neutrons = self.analysis.neutrons;
        let ratio = f64::from(neutrons) / f64::from(protons);
        let highest = protons / 2;
        let lowest = protons.div_ceil(3).max(1);

        for fragment_protons in (lowest..=highest).rev() {
            let candidate = self
                .resolver
                .table()
                .ground_states(fragment_protons)
                .into_iter()
                .filter(|(_, record)| {
                    record.protons == fragment_protons && record.neutrons <= neutrons
                })
                .min_by(|(_, a), (_, b)| {
                    let score = |n: u32| (f64::from(n) / f64::from(fragment_protons) - ratio).abs();
                    score(a.neutrons)
                        .total_cmp(&score(b.neutrons))
                        .then(a.neutrons.cmp(&b.neutrons))
                });
            if let Some((symbol, record)) = candidate {
                let remainder = self
                    .resolver
                    .resolve_nucleons(protons - fragment_protons, neutrons - record.neutrons)
                    .ok()?;
                return Some(FissionSplit {
                    remainder,
                    fragment: symbol.to_string(),
                });
            }
        }
        None
    }

    /// Apply a decay mode directly, ignoring probabilities and the table's
    /// branch list. `neutrons`/`protons` are only read by neutron emission
    /// (defaults to one neutron) and cluster decay (both required).
    pub fn force_decay(
        &mut self,
        mode: DecayMode,
        neutrons: Option<f64>,
        protons: Option<f64>,
    ) -> DecayOutcome {
        let parent = self.analysis.isotope_symbol.clone();
        let transformed = match mode {
            DecayMode::Alpha => self.alpha().map(|a| (a, None)),
            DecayMode::BetaMinus => self.shifted(1, -1).map(|a| (a, None)),
            DecayMode::BetaPlus | DecayMode::ElectronCapture => {
                self.shifted(-1, 1).map(|a| (a, None))
            }
            DecayMode::NeutronEmission => whole(neutrons.unwrap_or(1.0))
                .and_then(|emitted| self.shifted(0, -emitted))
                .map(|a| (a, None)),
            DecayMode::ClusterDecay => match (protons, neutrons) {
                (Some(p), Some(n)) => whole(p)
                    .and_then(|p| Ok((p, whole(n)?)))
                    .and_then(|(p, n)| self.shifted(-p, -n))
                    .map(|a| (a, None)),
                _ => Err(DecayError::MissingClusterArgs),
            },
            DecayMode::SpontaneousFission => self
                .fission_split()
                .map(|split| (split.remainder, Some(split.fragment)))
                .ok_or_else(|| DecayError::NoSuitableFissionFragment(parent.clone())),
            DecayMode::NuclearIsomerTransition => Err(DecayError::UnsupportedMode(mode)),
        };

        match transformed {
            Ok((analysis, fragment)) => {
                let daughter = analysis.isotope_symbol.clone();
                trace!(%parent, %daughter, %mode, "forced decay");
                self.commit(analysis, Some(mode));
                DecayOutcome {
                    parent,
                    daughter: Some(daughter),
                    mode: Some(mode),
                    fragment,
                    error: None,
                }
            }
            Err(err) => DecayOutcome::failed(parent, Some(mode), err),
        }
    }

    /// Alpha emission needs more than two protons and more than two neutrons.
    fn alpha(&self) -> Result<IsotopeAnalysis, DecayError> {
        let (protons, neutrons) = (self.analysis.protons, self.analysis.neutrons);
        if protons <= 2 || neutrons <= 2 {
            return Err(DecayError::InvalidNucleonCount {
                protons: i64::from(protons) - 2,
                neutrons: i64::from(neutrons) - 2,
            });
        }
        self.shifted(-2, -2)
    }

    fn shifted(&self, delta_protons: i64, delta_neutrons: i64) -> Result<IsotopeAnalysis, DecayError> {
        let protons = i64::from(self.analysis.protons) + delta_protons;
        let neutrons = i64::from(self.analysis.neutrons) + delta_neutrons;
        if protons < 1 || neutrons < 0 {
            return Err(DecayError::InvalidNucleonCount { protons, neutrons });
        }
        Ok(self.resolver.resolve_signed(protons, neutrons)?)
    }

    /// Direct nucleon edit. Recorded in history without a decay mode.
    pub fn set_nucleons(&mut self, protons: u32, neutrons: u32) -> Result<(), ResolveError> {
        let analysis = self.resolver.resolve_nucleons(protons, neutrons)?;
        self.commit(analysis, None);
        Ok(())
    }

    /// Same isotope, fresh history, default position.
    pub fn duplicate(&self) -> Nuclide {
        Nuclide::from_analysis(self.resolver.clone(), self.analysis.clone())
    }

    /// Truncate history to a single entry for the current isotope.
    pub fn reset_history(&mut self) {
        self.history = vec![HistoryEntry {
            isotope: self.analysis.isotope_symbol.clone(),
            mode: None,
        }];
    }

    /// Return to the construction-time isotope with a single-entry history.
    pub fn restore_origin(&mut self) {
        self.analysis = self.origin.clone();
        self.reset_history();
    }

    fn commit(&mut self, analysis: IsotopeAnalysis, mode: Option<DecayMode>) {
        self.history.push(HistoryEntry {
            isotope: analysis.isotope_symbol.clone(),
            mode,
        });
        self.analysis = analysis;
    }
}

impl Selection {
    fn of(daughter: &str, mode: Option<DecayMode>) -> Self {
        Self {
            daughter: daughter.to_string(),
            mode,
            fragment: None,
        }
    }
}

/// Floor a requested emission count. Never larger than `u32::MAX`, so the
/// signed arithmetic in `shifted` cannot overflow.
fn whole(count: f64) -> Result<i64, DecayError> {
    if !count.is_finite() || count < 0.0 {
        return Err(DecayError::InvalidEmissionCount(count));
    }
    Ok(count.floor().min(f64::from(u32::MAX)) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;
    use crate::table::fixtures::small_table;

    fn resolver() -> IsotopeResolver {
        IsotopeResolver::new(small_table())
    }

    fn nuclide(isotope: &str) -> Nuclide {
        Nuclide::parse(&resolver(), isotope).unwrap()
    }

    #[test]
    fn new_nuclide_has_origin_entry() {
        let n = nuclide("H-3");
        assert_eq!(
            n.history(),
            &[HistoryEntry {
                isotope: "H-3".into(),
                mode: None
            }]
        );
        assert!(!n.has_decayed());
        assert_eq!(n.state(), NuclideState::Radioactive);
    }

    #[test]
    fn stable_nuclide_never_decays() {
        let mut n = nuclide("He-4");
        let mut rng = ScriptedRandom::always(0.0);
        assert_eq!(n.state(), NuclideState::Stable);
        assert!(n.decay(&mut rng).is_none());
        assert_eq!(n.history().len(), 1);
        assert!(!n.can_decay());
    }

    #[test]
    fn theoretical_nuclide_never_decays() {
        let mut n = Nuclide::from_nucleons(&resolver(), 3, 30).unwrap();
        let mut rng = ScriptedRandom::always(0.0);
        assert_eq!(n.state(), NuclideState::Theoretical);
        assert!(n.decay(&mut rng).is_none());
        assert!(!n.can_decay());
        assert!(n.decay_probability_per_tick().is_nan());
    }

    #[test]
    fn certain_branch_is_always_taken() {
        let mut rng = ScriptedRandom::always(0.999);
        let mut n = nuclide("Li-8");
        let outcome = n.decay(&mut rng).unwrap();
        assert!(outcome.success());
        assert_eq!(outcome.daughter.as_deref(), Some("Be-8"));
        assert_eq!(outcome.mode, Some(DecayMode::BetaMinus));
        assert_eq!(n.isotope_symbol(), "Be-8");
        assert_eq!(n.history().len(), 2);
        assert_eq!(n.history()[1].mode, Some(DecayMode::BetaMinus));
    }

    #[test]
    fn unknown_percentage_branch_keeps_metastable_daughter() {
        let mut rng = ScriptedRandom::always(0.5);
        let mut n = nuclide("Li-9");
        let outcome = n.decay(&mut rng).unwrap();
        assert!(outcome.success());
        assert_eq!(n.isotope_symbol(), "Be-9m");
        assert!(n.analysis().exists);
    }

    #[test]
    fn failed_trials_fall_back_to_likeliest_branch() {
        // Draws above every percentage: 0.3, 0.6 and 0.6 all fail.
        let mut rng = ScriptedRandom::always(0.9);
        let mut n = nuclide("Li-12");
        let outcome = n.decay(&mut rng).unwrap();
        assert_eq!(outcome.daughter.as_deref(), Some("He-8"));
        assert_eq!(outcome.mode, Some(DecayMode::Alpha));
        assert_eq!(rng.draws(), 3);
    }

    #[test]
    fn first_successful_trial_wins() {
        let mut rng = ScriptedRandom::new(vec![0.5, 0.1]);
        let mut n = nuclide("Li-12");
        let outcome = n.decay(&mut rng).unwrap();
        assert_eq!(outcome.daughter.as_deref(), Some("He-8"));
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn unknown_branches_beat_the_likeliest_fallback() {
        // 0.9 misses the 10% trial; 0.6 picks the second of two unknown branches.
        let mut rng = ScriptedRandom::new(vec![0.9, 0.6]);
        let mut n = nuclide("Li-13");
        let outcome = n.decay(&mut rng).unwrap();
        assert_eq!(outcome.daughter.as_deref(), Some("Li-11"));
        assert_eq!(outcome.mode, Some(DecayMode::NeutronEmission));
        assert_eq!(rng.draws(), 2);
    }

    #[test]
    fn unknown_branch_pick_can_take_the_first() {
        let mut rng = ScriptedRandom::new(vec![0.9, 0.2]);
        let mut n = nuclide("Li-13");
        let outcome = n.decay(&mut rng).unwrap();
        assert_eq!(outcome.daughter.as_deref(), Some("He-9"));
        assert_eq!(n.history().len(), 2);
    }

    #[test]
    fn known_trial_wins_before_unknown_pick() {
        let mut rng = ScriptedRandom::new(vec![0.05]);
        let mut n = nuclide("Li-13");
        let outcome = n.decay(&mut rng).unwrap();
        assert_eq!(outcome.daughter.as_deref(), Some("Be-13"));
        assert_eq!(outcome.mode, Some(DecayMode::BetaMinus));
        assert_eq!(rng.draws(), 1);
    }

    #[test]
    fn bare_fission_branch_uses_fragment_heuristic() {
        let mut rng = ScriptedRandom::always(0.0);
        let mut n = nuclide("Be-7");
        let outcome = n.decay(&mut rng).unwrap();
        assert!(outcome.success());
        assert_eq!(outcome.mode, Some(DecayMode::SpontaneousFission));
        assert_eq!(outcome.fragment.as_deref(), Some("He-3"));
        assert_eq!(n.isotope_symbol(), "He-4");
    }

    #[test]
    fn empty_branch_list_reports_no_daughter() {
        let mut rng = ScriptedRandom::always(0.0);
        let mut n = nuclide("Li-10");
        assert!(!n.can_decay());
        let outcome = n.decay(&mut rng).unwrap();
        assert_eq!(outcome.error, Some(DecayError::NoDaughterFound("Li-10".into())));
        assert_eq!(n.history().len(), 1);
    }

    #[test]
    fn malformed_daughter_leaves_state_unchanged() {
        let mut rng = ScriptedRandom::always(0.0);
        let mut n = nuclide("Li-11");
        let outcome = n.decay(&mut rng).unwrap();
        assert!(!outcome.success());
        // "Qq" reads as the systematic symbol for Z=44, heavier than mass 11.
        assert!(matches!(
            outcome.error,
            Some(DecayError::Resolve(ResolveError::InvalidNucleonCount { .. }))
        ));
        assert_eq!(n.isotope_symbol(), "Li-11");
        assert_eq!(n.history().len(), 1);
    }

    #[test]
    fn decay_probability_is_half_inverse_halflife() {
        let n = nuclide("Be-9m");
        assert_eq!(n.decay_probability_per_tick(), 0.5);
        assert!(n.can_decay());
    }

    #[test]
    fn forced_alpha_shifts_two_and_two() {
        let mut n = nuclide("Be-8");
        let outcome = n.force_decay(DecayMode::Alpha, None, None);
        assert!(outcome.success());
        assert_eq!(n.isotope_symbol(), "He-4");
        assert_eq!(n.history().last().unwrap().mode, Some(DecayMode::Alpha));
    }

    #[test]
    fn forced_alpha_rejects_light_nuclei() {
        let mut n = nuclide("He-4");
        let outcome = n.force_decay(DecayMode::Alpha, None, None);
        assert_eq!(
            outcome.error,
            Some(DecayError::InvalidNucleonCount {
                protons: 0,
                neutrons: 0
            })
        );
        assert_eq!(n.isotope_symbol(), "He-4");
        assert_eq!(n.history().len(), 1);
    }

    #[test]
    fn forced_alpha_needs_more_than_two_neutrons() {
        let mut n = Nuclide::from_nucleons(&resolver(), 3, 2).unwrap();
        let outcome = n.force_decay(DecayMode::Alpha, None, None);
        assert_eq!(
            outcome.error,
            Some(DecayError::InvalidNucleonCount {
                protons: 1,
                neutrons: 0
            })
        );
        assert_eq!(n.isotope_symbol(), "Li-5");
        assert_eq!(n.history().len(), 1);
    }

    #[test]
    fn emission_counts_must_be_finite_and_non_negative() {
        let mut n = nuclide("Be-9");
        for bad in [-1e19, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let outcome = n.force_decay(DecayMode::NeutronEmission, Some(bad), None);
            assert!(matches!(outcome.error, Some(DecayError::InvalidEmissionCount(_))));
            let outcome = n.force_decay(DecayMode::ClusterDecay, Some(1.0), Some(bad));
            assert!(matches!(outcome.error, Some(DecayError::InvalidEmissionCount(_))));
            let outcome = n.force_decay(DecayMode::ClusterDecay, Some(bad), Some(1.0));
            assert!(matches!(outcome.error, Some(DecayError::InvalidEmissionCount(_))));
        }
        let outcome = n.force_decay(DecayMode::NeutronEmission, Some(1e19), None);
        assert!(matches!(
            outcome.error,
            Some(DecayError::InvalidNucleonCount { .. })
        ));
        assert_eq!(n.isotope_symbol(), "Be-9");
        assert_eq!(n.history().len(), 1);
    }

    #[test]
    fn forced_beta_modes() {
        let mut n = nuclide("H-3");
        assert!(n.force_decay(DecayMode::BetaMinus, None, None).success());
        assert_eq!(n.isotope_symbol(), "He-3");
        assert!(n.force_decay(DecayMode::BetaPlus, None, None).success());
        assert_eq!(n.isotope_symbol(), "H-3");
        assert!(!n.force_decay(DecayMode::ElectronCapture, None, None).success());
        assert_eq!(n.history().len(), 3);
    }

    #[test]
    fn forced_neutron_emission_defaults_to_one() {
        let mut n = nuclide("Be-9");
        assert!(n.force_decay(DecayMode::NeutronEmission, None, None).success());
        assert_eq!(n.isotope_symbol(), "Be-8");
        assert!(n
            .force_decay(DecayMode::NeutronEmission, Some(2.7), None)
            .success());
        assert_eq!(n.isotope_symbol(), "Be-6");
    }

    #[test]
    fn cluster_decay_needs_both_counts() {
        let mut n = nuclide("Be-9");
        for (neutrons, protons) in [(None, None), (Some(1.0), None), (None, Some(1.0))] {
            let outcome = n.force_decay(DecayMode::ClusterDecay, neutrons, protons);
            assert_eq!(outcome.error, Some(DecayError::MissingClusterArgs));
        }
        assert_eq!(n.history().len(), 1);
        let outcome = n.force_decay(DecayMode::ClusterDecay, Some(2.0), Some(1.0));
        assert!(outcome.success());
        assert_eq!(n.isotope_symbol(), "Li-6");
    }

    #[test]
    fn isomeric_transition_cannot_be_forced() {
        let mut n = nuclide("Be-9m");
        let outcome = n.force_decay(DecayMode::NuclearIsomerTransition, None, None);
        assert_eq!(
            outcome.error,
            Some(DecayError::UnsupportedMode(DecayMode::NuclearIsomerTransition))
        );
        assert_eq!(n.isotope_symbol(), "Be-9m");
    }

    #[test]
    fn forced_fission_emits_closest_ratio_fragment() {
        let mut n = nuclide("Be-9");
        let outcome = n.force_decay(DecayMode::SpontaneousFission, None, None);
        assert!(outcome.success());
        assert_eq!(outcome.fragment.as_deref(), Some("He-4"));
        assert_eq!(n.isotope_symbol(), "He-5");
    }

    #[test]
    fn forced_fission_of_hydrogen_fails() {
        let mut n = nuclide("H-1");
        let outcome = n.force_decay(DecayMode::SpontaneousFission, None, None);
        assert_eq!(
            outcome.error,
            Some(DecayError::NoSuitableFissionFragment("H-1".into()))
        );
    }

    #[test]
    fn duplicate_has_fresh_history_and_position() {
        let mut n = nuclide("Be-9m");
        n.set_position(40.0, 50.0);
        n.force_decay(DecayMode::NeutronEmission, None, None);
        let copy = n.duplicate();
        assert_eq!(copy.isotope_symbol(), "Be-8");
        assert_eq!(copy.history().len(), 1);
        assert_eq!(copy.position, Position::default());
    }

    #[test]
    fn duplicate_keeps_metastable_state() {
        let copy = nuclide("Be-9m").duplicate();
        assert_eq!(copy.isotope_symbol(), "Be-9m");
        assert_eq!(copy.origin().isotope_symbol, "Be-9m");
    }

    #[test]
    fn reset_history_keeps_current_isotope() {
        let mut n = nuclide("Be-8");
        n.force_decay(DecayMode::Alpha, None, None);
        n.reset_history();
        assert_eq!(n.history().len(), 1);
        assert_eq!(n.history()[0].isotope, "He-4");
        assert_eq!(n.origin().isotope_symbol, "Be-8");
        n.restore_origin();
        assert_eq!(n.isotope_symbol(), "Be-8");
        assert_eq!(n.history().len(), 1);
    }

    #[test]
    fn direct_edit_is_recorded_without_mode() {
        let mut n = nuclide("H-1");
        n.set_nucleons(2, 2).unwrap();
        assert_eq!(n.isotope_symbol(), "He-4");
        assert_eq!(
            n.history().last(),
            Some(&HistoryEntry {
                isotope: "He-4".into(),
                mode: None
            })
        );
        assert!(n.set_nucleons(0, 2).is_err());
        assert_eq!(n.history().len(), 2);
    }

    #[test]
    fn hit_test_uses_radius() {
        let mut n = nuclide("He-4");
        n.set_position(100.0, 100.0);
        assert!((n.radius() - 10.4).abs() < 1e-9);
        assert!(n.contains_point(105.0, 95.0));
        assert!(!n.contains_point(120.0, 100.0));
        assert_eq!(n.category(), Some("noble gas"));
    }
}
