use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::data::filter::FilterOptions;
use crate::helpers::date_fromisoformat;

/// Explore past and future close approaches of near-Earth objects.
#[derive(Debug, Parser)]
#[command(name = "neo-explorer", version, about)]
pub struct Cli {
    /// CSV file of near-Earth objects.
    #[arg(long, env = "NEO_FILE", default_value = "data/neos.csv", global = true)]
    pub neofile: PathBuf,

    /// JSON file of close approaches.
    #[arg(long, env = "CAD_FILE", default_value = "data/cad.json", global = true)]
    pub cadfile: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Look up one NEO by designation or by name.
    Inspect(InspectArgs),
    /// Query close approaches matching the given criteria.
    Query(QueryArgs),
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Primary designation of the NEO.
    #[arg(short, long, required_unless_present = "name", conflicts_with = "name")]
    pub pdes: Option<String>,

    /// IAU name of the NEO.
    #[arg(short, long)]
    pub name: Option<String>,

    /// Also print the NEO's close approaches.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// Only approaches on this date (YYYY-MM-DD).
    #[arg(short, long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Only approaches on or after this date (YYYY-MM-DD).
    #[arg(short, long, value_parser = parse_date)]
    pub start_date: Option<NaiveDate>,

    /// Only approaches on or before this date (YYYY-MM-DD).
    #[arg(short, long, value_parser = parse_date)]
    pub end_date: Option<NaiveDate>,

    /// Minimum approach distance in au.
    #[arg(long = "min-distance")]
    pub distance_min: Option<f64>,

    /// Maximum approach distance in au.
    #[arg(long = "max-distance")]
    pub distance_max: Option<f64>,

    /// Minimum relative velocity in km/s.
    #[arg(long = "min-velocity")]
    pub velocity_min: Option<f64>,

    /// Maximum relative velocity in km/s.
    #[arg(long = "max-velocity")]
    pub velocity_max: Option<f64>,

    /// Minimum NEO diameter in km.
    #[arg(long = "min-diameter")]
    pub diameter_min: Option<f64>,

    /// Maximum NEO diameter in km.
    #[arg(long = "max-diameter")]
    pub diameter_max: Option<f64>,

    /// Only potentially hazardous NEOs.
    #[arg(long, conflicts_with = "not_hazardous")]
    pub hazardous: bool,

    /// Only NEOs that are not potentially hazardous.
    #[arg(long)]
    pub not_hazardous: bool,

    /// Only approaches of the NEO with this primary designation.
    #[arg(long)]
    pub designation: Option<String>,

    /// Maximum number of results; 0 means unlimited.
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    /// Write results to this .csv or .json file instead of stdout.
    #[arg(short, long)]
    pub outfile: Option<PathBuf>,
}

impl QueryArgs {
    pub fn filter_options(&self) -> FilterOptions {
        let hazardous = match (self.hazardous, self.not_hazardous) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        FilterOptions {
            date: self.date,
            start_date: self.start_date,
            end_date: self.end_date,
            distance_min: self.distance_min,
            distance_max: self.distance_max,
            velocity_min: self.velocity_min,
            velocity_max: self.velocity_max,
            diameter_min: self.diameter_min,
            diameter_max: self.diameter_max,
            hazardous,
            designation: self.designation.clone(),
        }
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    date_fromisoformat(s).map_err(|e| e.to_string())
}
