//! `swx resolve` command - Resolve reference URLs to display names
//!
//! Lookups go through the same name cache as character enrichment, so a URL
//! resolved here is free the next time a listing references it.

use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{load_config, runtime};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{Explorer, ResolveRequest, ResolvedReferences};
use crate::entities::ReferenceRole;

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Homeworld (planet) URL
    #[arg(long)]
    pub homeworld: Option<String>,

    /// Film URL (repeatable)
    #[arg(long = "film")]
    pub films: Vec<String>,

    /// Species URL (repeatable)
    #[arg(long)]
    pub species: Vec<String>,

    /// Starship URL (repeatable)
    #[arg(long = "starship")]
    pub starships: Vec<String>,

    /// Vehicle URL (repeatable)
    #[arg(long = "vehicle")]
    pub vehicles: Vec<String>,
}

impl From<ResolveArgs> for ResolveRequest {
    fn from(args: ResolveArgs) -> Self {
        ResolveRequest {
            homeworld: args.homeworld,
            films: args.films,
            species: args.species,
            starships: args.starships,
            vehicles: args.vehicles,
        }
    }
}

pub fn run(args: ResolveArgs, global: &GlobalOpts) -> Result<()> {
    let request = ResolveRequest::from(args);
    let resolved = if request.is_empty() {
        ResolvedReferences::default()
    } else {
        let explorer = Explorer::open(load_config(global)?)?;
        runtime()?.block_on(explorer.resolve_references(request))
    };

    match global.format {
        OutputFormat::Json | OutputFormat::Auto => {
            println!(
                "{}",
                serde_json::to_string_pretty(&resolved).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&resolved).into_diagnostic()?);
        }
        OutputFormat::Id => {
            for (_, name) in role_rows(&resolved) {
                println!("{}", name);
            }
        }
        OutputFormat::Tsv | OutputFormat::Csv => {
            let delimiter = if global.format == OutputFormat::Tsv { b'\t' } else { b',' };
            let mut writer = csv::WriterBuilder::new()
                .delimiter(delimiter)
                .from_writer(std::io::stdout());
            writer.write_record(["role", "name"]).into_diagnostic()?;
            for (role, name) in role_rows(&resolved) {
                writer.write_record([role.as_str(), name]).into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Md => {
            let mut table = Builder::default();
            table.push_record(["role", "name"]);
            for (role, name) in role_rows(&resolved) {
                table.push_record([role.as_str(), name]);
            }
            println!("{}", table.build().with(Style::markdown()));
        }
    }

    if !global.quiet && global.format == OutputFormat::Auto {
        eprintln!(
            "{} {} name(s) resolved",
            style("✓").green(),
            role_rows(&resolved).len()
        );
    }

    Ok(())
}

/// Flatten resolved names into (role, name) pairs in role order
fn role_rows(resolved: &ResolvedReferences) -> Vec<(ReferenceRole, &str)> {
    let mut rows = Vec::new();
    if let Some(ref name) = resolved.homeworld_name {
        rows.push((ReferenceRole::Homeworld, name.as_str()));
    }
    let lists = [
        (ReferenceRole::Films, &resolved.film_titles),
        (ReferenceRole::Species, &resolved.species_names),
        (ReferenceRole::Starships, &resolved.starship_names),
        (ReferenceRole::Vehicles, &resolved.vehicle_names),
    ];
    for (role, names) in lists {
        rows.extend(names.iter().map(|n| (role, n.as_str())));
    }
    rows
}
