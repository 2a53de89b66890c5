//! Extract subcommand - edition number and base name of venue strings

use anyhow::Result;
use clap::Args;
use comfy_table::{Cell, Color, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL};

use citegraph_build::edition;

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Venue strings
    #[arg(required = true)]
    pub venues: Vec<String>,

    /// Year against which two-digit years ('19) are resolved (default: current year)
    #[arg(long)]
    pub reference_year: Option<i32>,
}

/// (venue, edition, kind, base name)
fn rows(args: &ExtractArgs) -> Vec<[String; 4]> {
    let year = args.reference_year.unwrap_or_else(edition::current_year);
    args.venues
        .iter()
        .map(|venue| {
            let found = edition::detect_edition_at(venue, year);
            [
                venue.clone(),
                found.map(|e| e.value.to_string()).unwrap_or_else(|| "-".into()),
                found.map(|e| e.kind.to_string()).unwrap_or_else(|| "-".into()),
                citegraph_build::normalize_venue(venue),
            ]
        })
        .collect()
}

pub fn run(args: ExtractArgs) -> Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec![
            Cell::new("Venue").fg(Color::Cyan),
            Cell::new("Edition").fg(Color::Cyan),
            Cell::new("Matched").fg(Color::Cyan),
            Cell::new("Base name").fg(Color::Cyan),
        ]);
    for row in rows(&args) {
        table.add_row(row.to_vec());
    }
    println!("{table}");
    Ok(())
}
