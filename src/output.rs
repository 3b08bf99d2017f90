use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::rc::Rc;

use anyhow::{bail, Context, Result};

use crate::data::model::CloseApproach;

/// Write results to `path`, choosing the format by extension.
///
/// Supported formats:
/// * `.csv`  – one flat row per approach
/// * `.json` – array of approaches with the object nested under `neo`
pub fn write_results<'a, I>(results: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a Rc<CloseApproach>>,
{
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => write_to_csv(results, path),
        "json" => write_to_json(results, path),
        other => bail!("Unsupported output extension: .{other}"),
    }
}

/// Columns: `datetime_utc, distance_au, velocity_km_s, designation, name,
/// diameter_km, potentially_hazardous`. Returns the number of rows written.
pub fn write_to_csv<'a, I>(results: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a Rc<CloseApproach>>,
{
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV file {}", path.display()))?;
    let mut count = 0;
    for approach in results {
        let row = approach.serialize()?;
        writer.serialize(&row).context("writing CSV row")?;
        count += 1;
    }
    writer.flush().context("flushing CSV file")?;
    log::info!("Wrote {count} close approaches to {}", path.display());
    Ok(count)
}

/// Unknown diameters become `null`. Returns the number of records written.
pub fn write_to_json<'a, I>(results: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a Rc<CloseApproach>>,
{
    let records = results
        .into_iter()
        .map(|approach| approach.to_dict())
        .collect::<crate::error::Result<Vec<_>>>()?;

    let file = File::create(path)
        .with_context(|| format!("creating JSON file {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &records).context("writing JSON")?;
    log::info!("Wrote {} close approaches to {}", records.len(), path.display());
    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::database::NeoDatabase;
    use crate::data::model::NearEarthObject;
    use crate::helpers::cd_to_datetime;
    use serde_json::Value as JsonValue;
    use tempfile::tempdir;

    fn sample() -> NeoDatabase {
        let neos = vec![NearEarthObject::new("433").with_name("Eros").with_diameter(16.84)];
        let approaches = vec![
            CloseApproach::new("433", Some(cd_to_datetime("1900-Jan-01 00:00").unwrap()), 0.3, 5.5),
            CloseApproach::new("2020 AB", Some(cd_to_datetime("2020-Jan-01 00:00").unwrap()), 0.05, 12.0),
        ];
        NeoDatabase::new(neos, approaches)
    }

    #[test]
    fn csv_has_flat_header_and_rows() {
        let db = sample();
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        assert_eq!(write_results(db.query(&[]), &path).unwrap(), 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "datetime_utc,distance_au,velocity_km_s,designation,name,diameter_km,potentially_hazardous"
        );
        assert_eq!(
            lines.next().unwrap(),
            "1900-01-01 00:00,0.3,5.5,433,Eros,16.84,false"
        );
        assert!(lines.next().unwrap().starts_with("2020-01-01 00:00,0.05,12.0,2020 AB,,"));
    }

    #[test]
    fn json_nests_the_object() {
        let db = sample();
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_results(db.query(&[]), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let json: JsonValue = serde_json::from_str(&text).unwrap();
        let records = json.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["datetime_utc"], "1900-01-01 00:00");
        assert_eq!(records[0]["neo"]["name"], "Eros");
        assert_eq!(records[0]["neo"]["potentially_hazardous"], false);
        assert!(records[1]["neo"]["diameter_km"].is_null());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let db = sample();
        let dir = tempdir().unwrap();
        assert!(write_results(db.query(&[]), &dir.path().join("out.txt")).is_err());
    }

    #[test]
    fn unlinked_approach_cannot_be_written() {
        let dir = tempdir().unwrap();
        let orphan = Rc::new(CloseApproach::new("1", None, 0.1, 1.0));
        let err = write_to_json([&orphan], &dir.path().join("out.json")).unwrap_err();
        assert!(err.to_string().contains("no linked NEO"));
    }
}
