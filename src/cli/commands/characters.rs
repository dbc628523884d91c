//! `swx characters` command - List enriched characters

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{format_number, join_names, load_config, runtime, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{sort_characters, Explorer, ListingSource, SortField, SortOrder};
use crate::entities::Character;

#[derive(clap::Args, Debug)]
pub struct CharactersArgs {
    /// Ignore the cache and fetch the listing again
    #[arg(long, short = 'r')]
    pub refresh: bool,

    /// Sort field
    #[arg(long, value_enum, default_value_t = SortField::MassKg)]
    pub sort_by: SortField,

    /// Sort order
    #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
    pub order: SortOrder,

    /// Filter by name (case-insensitive substring)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show count only
    #[arg(long)]
    pub count: bool,
}

/// Flattened row for CSV/TSV output
#[derive(Debug, Serialize)]
struct CharacterRow<'a> {
    name: &'a str,
    height_cm: String,
    height_in: String,
    mass_kg: String,
    birth_year: &'a str,
    gender: &'a str,
    homeworld: &'a str,
    films: String,
    species: String,
    starships: String,
    vehicles: String,
}

impl<'a> From<&'a Character> for CharacterRow<'a> {
    fn from(c: &'a Character) -> Self {
        Self {
            name: &c.name,
            height_cm: format_number(c.height_cm),
            height_in: format_number(c.height_in),
            mass_kg: format_number(c.mass_kg),
            birth_year: c.birth_year.as_deref().unwrap_or_default(),
            gender: c.gender.as_deref().unwrap_or_default(),
            homeworld: c.homeworld_name.as_deref().unwrap_or_default(),
            films: join_names(&c.film_titles),
            species: join_names(&c.species_names),
            starships: join_names(&c.starship_names),
            vehicles: join_names(&c.vehicle_names),
        }
    }
}

const HEADERS: [&str; 11] = [
    "name",
    "height_cm",
    "height_in",
    "mass_kg",
    "birth_year",
    "gender",
    "homeworld",
    "films",
    "species",
    "starships",
    "vehicles",
];

pub fn run(args: CharactersArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global)?;
    let explorer = Explorer::open(config)?;

    let (mut characters, source) = runtime()?
        .block_on(explorer.get_characters_with_source(args.refresh))?;

    if let Some(ref search) = args.search {
        let needle = search.to_lowercase();
        characters.retain(|c| c.name.to_lowercase().contains(&needle));
    }

    sort_characters(&mut characters, args.sort_by, args.order);

    if let Some(limit) = args.limit {
        characters.truncate(limit);
    }

    if args.count {
        println!("{}", characters.len());
        return Ok(());
    }

    if !global.quiet {
        let origin = match source {
            ListingSource::Cache => "cache",
            ListingSource::Repaired => "cache, repaired",
            ListingSource::Upstream => "upstream",
        };
        eprintln!(
            "{} {} character(s) ({})",
            style("✓").green(),
            characters.len(),
            origin
        );
    }

    match global.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&characters).into_diagnostic()?
            );
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&characters).into_diagnostic()?);
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            for c in &characters {
                writer.serialize(CharacterRow::from(c)).into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Tsv => {
            let mut writer = csv::WriterBuilder::new()
                .delimiter(b'\t')
                .from_writer(std::io::stdout());
            for c in &characters {
                writer.serialize(CharacterRow::from(c)).into_diagnostic()?;
            }
            writer.flush().into_diagnostic()?;
        }
        OutputFormat::Id => {
            for c in &characters {
                println!("{}", c.name);
            }
        }
        OutputFormat::Md | OutputFormat::Auto => {
            if characters.is_empty() {
                println!("No characters found.");
                return Ok(());
            }
            let table_style = global.format;
            println!("{}", render_table(&characters, table_style));
        }
    }

    Ok(())
}

fn render_table(characters: &[Character], format: OutputFormat) -> String {
    let mut table = Builder::default();
    table.push_record(HEADERS);
    for c in characters {
        let row = CharacterRow::from(c);
        table.push_record([
            row.name.to_string(),
            row.height_cm,
            row.height_in,
            row.mass_kg,
            row.birth_year.to_string(),
            row.gender.to_string(),
            row.homeworld.to_string(),
            truncate_str(&row.films, 40),
            row.species,
            truncate_str(&row.starships, 30),
            truncate_str(&row.vehicles, 30),
        ]);
    }

    let mut table = table.build();
    match format {
        OutputFormat::Md => table.with(Style::markdown()),
        _ => table.with(Style::rounded()),
    };
    table.to_string()
}
