use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use decaysim::{
    chain::{decay_chain, DEFAULT_MAX_DEPTH},
    decay_mode::DecayMode,
    engine::{EngineBuilder, EngineSettings},
    population::TallyKind,
    resolver::IsotopeResolver,
    scenario::ScenarioLoader,
    table::ReferenceTable,
    timefmt::format_seconds,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Radioactive decay simulator")]
struct Cli {
    /// Scenario YAML listing the starting nuclides, seed and tick increment
    #[arg(long, default_value = "scenarios/uranium_series.yaml")]
    scenario: PathBuf,

    /// Number of ticks to run, replacing the scenario's `ticks` (100 if neither is set)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the scenario seed
    #[arg(long)]
    seed: Option<u64>,

    /// Reference table JSON (defaults to the scenario's table)
    #[arg(long)]
    table: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Print the decay chain of an isotope instead of running a scenario
    #[arg(long)]
    chain: Option<String>,

    /// Grouping for the final tally: isotopes, elements, radioactive, decayed, decayed-times
    #[arg(long, default_value = "isotopes")]
    tally: TallyKind,

    /// Stop as soon as no radioactive nuclide is left
    #[arg(long)]
    until_settled: bool,

    /// List the decay modes that can be forced, then exit
    #[arg(long)]
    list_modes: bool,

    /// Print the run summary and tally as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    if cli.list_modes {
        for mode in DecayMode::ALL {
            println!("{:<4} {:?}: {}", mode.symbol(), mode, mode.description());
        }
        return Ok(());
    }

    if let Some(isotope) = &cli.chain {
        let path = cli
            .table
            .clone()
            .unwrap_or_else(|| PathBuf::from("data/elements.json"));
        let table = ReferenceTable::load(&path)?;
        let resolver = IsotopeResolver::new(table.clone());
        let analysis = resolver.resolve_str(isotope)?;
        let chain = decay_chain(&table, &analysis.isotope_symbol, DEFAULT_MAX_DEPTH);
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&chain)?);
        } else {
            print!("{}", chain.render());
        }
        return Ok(());
    }

    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?;
    let table = loader.load_table(&scenario, cli.table.as_deref())?;
    let resolver = IsotopeResolver::new(table);
    let ticks = scenario.ticks(cli.ticks);

    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: cli.seed.unwrap_or(scenario.seed),
    };
    let mut engine = EngineBuilder::new(settings)
        .stop_when_settled(cli.until_settled)
        .build();
    let mut population = scenario.build_population(&resolver, engine.rng_mut())?;

    let summary = engine.run(&mut population, ticks)?;
    let tally = population.tally(cli.tally);
    if cli.json {
        let report = serde_json::json!({
            "scenario": scenario.name,
            "summary": summary,
            "radioactive": population.radioactive_count(),
            "nuclides": population.len(),
            "tally": tally,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    println!(
        "Scenario '{}' ran {} ticks ({} simulated): {} decays, {} failed, {} of {} nuclides still radioactive",
        scenario.name,
        summary.ticks,
        format_seconds(summary.time),
        summary.decays,
        summary.failures,
        population.radioactive_count(),
        population.len()
    );
    for entry in tally {
        println!("{entry}");
    }
    Ok(())
}
