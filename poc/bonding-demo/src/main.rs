//! Valence Proof of Concept — Signals Through Bonded Atoms
//!
//! A "cell" atom bonds a managed energy store, a shared membrane potential
//! and a nested "organelle" atom. A Linear signal is sent on a carrier and
//! propagates to every resonant bond, including through the organelle.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use valence::prelude::*;

#[derive(Parser)]
#[command(name = "bonding-demo")]
#[command(about = "Propagate a signal through bonded atoms")]
struct Cli {
    /// Path to a valence.toml (searched for upward if omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level regardless of configuration
    #[arg(short, long)]
    verbose: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => ValenceConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => ValenceConfig::find_and_load().context("Failed to load valence.toml")?,
    };

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        config.logging.level().context("Invalid logging level")?
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let mut table = PeriodicTable::new();
    let energy = table.assign_tag("Energy").context("Failed to register Energy")?;
    let potential = table.assign_tag("MembranePotential").context("Failed to register MembranePotential")?;
    let clock = table.assign_tag("Clock").context("Failed to register Clock")?;
    let organelle_tag = table.assign_tag("Organelle").context("Failed to register Organelle")?;

    // --- Assemble ---
    let membrane = share(Quantum::new(-70i64));

    let mut organelle = Atom::from_config("mitochondrion", &config)
        .context("Failed to create organelle")?
        .with_properties(Properties::from([Property::Structural, Property::Linear]));
    form(&mut organelle, energy, Bonded::manage(Quantum::new(100i64)))?;

    let mut cell = Atom::from_config("cell", &config).context("Failed to create cell")?;
    form(&mut cell, energy, Bonded::manage(Quantum::new(10i64)))?;
    form(&mut cell, potential, Bonded::using(&membrane))?;
    form(
        &mut cell,
        clock,
        Bonded::manage(Quantum::new(0u64).with_properties(Properties::from([Property::Periodic]))),
    )?;
    form(&mut cell, organelle_tag, Bonded::manage(organelle))?;
    info!(atom = %cell.name(), bonds = cell.bond_count(), "cell assembled");

    // A second Energy bond is refused and the quantum comes back.
    if let Err(rejection) = cell.form(energy, Bonded::manage(Quantum::new(1i64))) {
        let (error, returned) = rejection.into_parts();
        info!(%error, kind = %returned.kind(), "duplicate bond refused");
    }

    // --- Propagate ---
    let signal = Carrier::new(Properties::from([Property::Linear]), Quantum::new(5i64));
    let report = cell.propagate(&signal, Phase::Attenuate);
    info!(
        visited = report.visited.len(),
        forwarded = report.forwarded,
        failed = report.failures.len(),
        "signal propagated"
    );
    for failure in &report.failures {
        info!(tag = %failure.tag, error = %failure.error, "bond refused signal");
    }

    let snapshot = cell.snapshot(&table);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("Atom {} ({})", snapshot.name, snapshot.id);
    for bond in &snapshot.bonds {
        println!(
            "  [{}] {} {:<18} {}",
            bond.index,
            bond.tag,
            bond.name.as_deref().unwrap_or("?"),
            bond.kind,
        );
    }
    println!();
    println!("Energy:            {}", quantum_value(&cell, energy)?);
    println!("Membrane:          {}", membrane_value(&membrane)?);
    println!("Organelle energy:  {}", organelle_energy(&cell, organelle_tag, energy)?);

    Ok(())
}

fn form(atom: &mut Atom, tag: AtomicNumber, bonded: Bonded) -> Result<Index> {
    let index = atom.form(tag, bonded).map_err(ValenceError::from)?;
    Ok(index)
}

fn quantum_value(atom: &Atom, tag: AtomicNumber) -> Result<i64> {
    let bond = atom.bonded(tag).context("bond missing")?;
    bond.bonded()
        .with_wave(|wave| wave.downcast_ref::<Quantum<i64>>().map(|q| *q.value()))?
        .context("bond is not an i64 quantum")
}

fn membrane_value(membrane: &SharedWave) -> Result<i64> {
    let guard = membrane
        .lock()
        .map_err(|_| anyhow::anyhow!("membrane lock poisoned"))?;
    let value = guard.downcast_ref::<Quantum<i64>>().map(|q| *q.value());
    value.context("membrane is not an i64 quantum")
}

fn organelle_energy(cell: &Atom, organelle: AtomicNumber, energy: AtomicNumber) -> Result<i64> {
    let bond = cell.bonded(organelle).context("organelle missing")?;
    bond.bonded()
        .with_wave(|wave| {
            wave.downcast_ref::<Atom>()
                .map(|atom| quantum_value(atom, energy))
        })?
        .context("organelle is not an atom")?
}
