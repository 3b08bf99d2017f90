use anyhow::{Context, Result};
use clap::Parser;

use neo_explorer::cli::{Cli, Command, InspectArgs, QueryArgs};
use neo_explorer::data::database::NeoDatabase;
use neo_explorer::data::filter::limit;
use neo_explorer::data::loader::{load_approaches, load_neos};
use neo_explorer::output::write_results;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let neos = load_neos(&cli.neofile)?;
    let approaches = load_approaches(&cli.cadfile)?;
    let db = NeoDatabase::new(neos, approaches);

    match &cli.command {
        Command::Inspect(args) => inspect(&db, args),
        Command::Query(args) => query(&db, args),
    }
}

fn inspect(db: &NeoDatabase, args: &InspectArgs) -> Result<()> {
    let neo = match (&args.pdes, &args.name) {
        (Some(pdes), _) => db.get_neo_by_designation(pdes),
        (_, Some(name)) => db.get_neo_by_name(name),
        _ => None,
    };

    let Some(neo) = neo else {
        println!("No matching NEOs exist in the database.");
        return Ok(());
    };

    println!("{neo}");
    if args.verbose {
        for approach in neo.approaches() {
            println!("- {approach}");
        }
    }
    Ok(())
}

fn query(db: &NeoDatabase, args: &QueryArgs) -> Result<()> {
    let filters = args.filter_options().create_filters();
    log::debug!("Querying with {} filters: {filters:?}", filters.len());

    let results = limit(db.query(&filters), Some(args.limit));

    match &args.outfile {
        Some(path) => {
            let count = write_results(results, path)
                .with_context(|| format!("writing results to {}", path.display()))?;
            println!("Wrote {count} close approaches to {}", path.display());
        }
        None => {
            for approach in results {
                println!("{approach}");
            }
        }
    }
    Ok(())
}
