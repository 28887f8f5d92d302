//! Muster - Entry Point
//!
//! Reads one or more unit-list documents against the catalogs under a data
//! directory and prints what was restored.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

use muster::catalog::{EquipmentCatalog, OptionCatalog, UnitCatalog};
use muster::model::Unit;
use muster::{Catalogs, Collection, ReaderConfig, Roster, RosterReader};

/// Restore saved unit rosters from unit-list documents
#[derive(Parser, Debug)]
#[command(name = "muster")]
#[command(about = "Reconstitute units, crews and damage from unit-list documents")]
struct Args {
    /// Unit-list documents to read
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Data directory holding equipment/, units/ and options.toml
    #[arg(long, default_value = "data")]
    data: PathBuf,

    /// Unit template directory (overrides <data>/units)
    #[arg(long)]
    units: Option<PathBuf>,

    /// Equipment directory (overrides <data>/equipment)
    #[arg(long)]
    equipment: Option<PathBuf>,

    /// Option name file (overrides <data>/options.toml)
    #[arg(long)]
    options: Option<PathBuf>,

    /// Reader configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,
}

/// JSON output for one document
#[derive(Serialize)]
struct FileReport<'a> {
    file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    roster: Option<&'a Roster>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("muster=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let catalogs = match load_catalogs(&args) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load catalogs: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = match &args.config {
        Some(path) => match ReaderConfig::load_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ReaderConfig::default(),
    };

    let reader = RosterReader::new(&catalogs, &config);
    let results: Vec<_> = args
        .files
        .par_iter()
        .map(|path| (path, reader.read_file(path)))
        .collect();

    let failed = results.iter().any(|(_, r)| r.is_err());

    if args.format == "json" {
        let reports: Vec<FileReport> = results
            .iter()
            .map(|(path, result)| FileReport {
                file: path.display().to_string(),
                roster: result.as_ref().ok(),
                error: result.as_ref().err().map(|e| e.to_string()),
            })
            .collect();
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize output: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        for (path, result) in &results {
            match result {
                Ok(roster) => print_roster(path, roster),
                Err(e) => println!("=== {} ===\nerror: {}\n", path.display(), e),
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn load_catalogs(args: &Args) -> muster::Result<Catalogs> {
    let mut catalogs = if args.data.is_dir() {
        Catalogs::load_directory(&args.data)?
    } else {
        Catalogs::new()
    };

    if let Some(dir) = &args.equipment {
        let mut equipment = EquipmentCatalog::new();
        equipment.load_directory(dir)?;
        catalogs.equipment = equipment;
    }
    if let Some(dir) = &args.units {
        let mut units = UnitCatalog::new();
        units.load_directory(dir)?;
        catalogs.units = units;
    }
    if let Some(file) = &args.options {
        catalogs.options = OptionCatalog::load_file(file)?;
    }
    Ok(catalogs)
}

fn print_roster(path: &Path, roster: &Roster) {
    println!("=== {} ===", path.display());

    for collection in Collection::ALL {
        let units = roster.collection(collection);
        if units.is_empty() {
            continue;
        }
        println!("{} ({}):", collection.tag(), units.len());
        for unit in units {
            print_unit(unit);
        }
    }

    if !roster.pilots.is_empty() {
        println!("pilots ({}):", roster.pilots.len());
        for crew in &roster.pilots {
            for (slot, member) in crew.members.iter().enumerate().filter(|(_, m)| !m.missing) {
                println!(
                    "  {} {}/{}",
                    crew.name_and_role(slot),
                    member.gunnery,
                    member.piloting
                );
            }
        }
    }

    if !roster.kills.is_empty() {
        println!("kills ({}):", roster.kills.len());
        for (killed, killer) in &roster.kills {
            println!("  {} killed by {}", killed, killer);
        }
    }

    if roster.has_warnings() {
        println!("diagnostics ({}):", roster.diagnostics.len());
        for diagnostic in roster.diagnostics.iter() {
            println!("  {}", diagnostic.message);
        }
    }
    println!();
}

fn print_unit(unit: &Unit) {
    let pilot = unit
        .crew
        .as_ref()
        .and_then(|c| c.member(0).map(|m| (c.name_and_role(0), m.gunnery, m.piloting)));
    match pilot {
        Some((name, gunnery, piloting)) => println!(
            "  {} [{:?}] pilot {} {}/{}",
            unit.short_name(),
            unit.kind,
            name,
            gunnery,
            piloting
        ),
        None => println!("  {} [{:?}]", unit.short_name(), unit.kind),
    }

    let destroyed: Vec<&str> = unit
        .locations
        .iter()
        .filter(|l| l.is_destroyed())
        .map(|l| l.name.as_str())
        .collect();
    if !destroyed.is_empty() {
        println!("    destroyed: {}", destroyed.join(", "));
    }
}
