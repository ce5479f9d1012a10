pub mod chain;
pub mod decay_mode;
pub mod engine;
pub mod error;
pub mod nuclide;
pub mod population;
pub mod resolver;
pub mod rng;
pub mod scenario;
pub mod table;
pub mod timefmt;

pub use decay_mode::DecayMode;
pub use engine::{Engine, EngineBuilder, EngineSettings, RunSummary, TickSnapshot};
pub use error::{DecayError, PopulationError, ResolveError};
pub use nuclide::{DecayOutcome, HistoryEntry, Nuclide, NuclideState};
pub use population::{NuclideId, Population, TallyEntry, TallyKind};
pub use resolver::{IsotopeAnalysis, IsotopeResolver};
pub use table::ReferenceTable;
