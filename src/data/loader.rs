use std::collections::HashSet;
use std::hash::Hash;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::model::{CloseApproach, NearEarthObject};
use crate::error::NeoError;
use crate::helpers::cd_to_datetime;

// ---------------------------------------------------------------------------
// NEO catalogue (CSV)
// ---------------------------------------------------------------------------

/// CSV layout: header row, one object per line. The loader uses
///   `pdes`     – primary designation (required)
///   `name`     – IAU name, may be empty
///   `diameter` – km, may be empty
///   `pha`      – `Y` when potentially hazardous
/// All other columns are ignored. Empty values are skipped so the record's
/// default applies.
pub fn load_neos(path: &Path) -> Result<Vec<NearEarthObject>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening NEO file {}", path.display()))?;
    let neos = read_neos(file)?;
    log::info!("Loaded {} NEOs from {}", neos.len(), path.display());
    Ok(neos)
}

/// Parse NEO rows from any CSV source. See [`load_neos`].
pub fn read_neos<R: std::io::Read>(source: R) -> Result<Vec<NearEarthObject>> {
    let mut reader = csv::Reader::from_reader(source);
    let headers = reader.headers().context("reading CSV headers")?.clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };
    let pdes_idx = column("pdes")?;
    let name_idx = column("name")?;
    let diameter_idx = column("diameter")?;
    let pha_idx = column("pha")?;

    let mut neos = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV record {}", row_no + 1))?;
        // Header is line 1, so the first data record is line 2.
        let line = record.position().map_or(row_no as u64 + 2, |p| p.line());
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let mut neo = NearEarthObject::new(field(pdes_idx));
        if !field(name_idx).is_empty() {
            neo = neo.with_name(field(name_idx));
        }
        let diameter = field(diameter_idx).trim();
        // A bare "0" counts as missing, same as an empty cell; other
        // spellings of zero such as "0.0" are kept.
        if !diameter.is_empty() && diameter != "0" {
            let value = parse_number("diameter", diameter)
                .with_context(|| format!("CSV line {line}"))?;
            neo = neo.with_diameter(value);
        }
        if !field(pha_idx).is_empty() {
            neo = neo.with_hazardous(field(pha_idx) == "Y");
        }
        neos.push(neo);
    }

    Ok(dedup_by_key(neos, |neo| neo.designation().to_string()))
}

// ---------------------------------------------------------------------------
// Close approach data (JSON)
// ---------------------------------------------------------------------------

/// Fixed column offsets of the close approach rows.
const DES_POS: usize = 0;
const CD_POS: usize = 3;
const DIST_POS: usize = 4;
const V_REL_POS: usize = 7;

/// Expected JSON schema (the CAD API response):
///
/// ```json
/// {
///   "fields": ["des", "orbit_id", "jd", "cd", "dist", "dist_min", "dist_max", "v_rel", ...],
///   "data": [
///     ["170903", "105", "2415020.507669610", "1900-Jan-01 00:11", "0.0921795123769547", ...],
///     ...
///   ]
/// }
/// ```
///
/// `fields` is optional; without it the fixed offsets apply.
#[derive(Debug, Deserialize)]
struct CadDocument {
    #[serde(default)]
    fields: Option<Vec<String>>,
    data: Vec<Vec<JsonValue>>,
}

/// Column offsets for one document, resolved from `fields` when present.
#[derive(Debug, Clone, Copy, PartialEq)]
struct CadLayout {
    des: usize,
    cd: usize,
    dist: usize,
    v_rel: usize,
}

impl CadLayout {
    fn resolve(fields: Option<&[String]>) -> Self {
        let find = |name: &str, fallback: usize| {
            fields
                .and_then(|f| f.iter().position(|h| h == name))
                .unwrap_or(fallback)
        };
        Self {
            des: find("des", DES_POS),
            cd: find("cd", CD_POS),
            dist: find("dist", DIST_POS),
            v_rel: find("v_rel", V_REL_POS),
        }
    }
}

pub fn load_approaches(path: &Path) -> Result<Vec<CloseApproach>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading close approach file {}", path.display()))?;
    let approaches = parse_approaches(&text)?;
    log::info!(
        "Loaded {} close approaches from {}",
        approaches.len(),
        path.display()
    );
    Ok(approaches)
}

/// Parse close approaches from a CAD JSON document. See [`load_approaches`].
pub fn parse_approaches(text: &str) -> Result<Vec<CloseApproach>> {
    let doc: CadDocument = serde_json::from_str(text).context("parsing JSON")?;
    let layout = CadLayout::resolve(doc.fields.as_deref());
    log::debug!("Close approach column layout: {layout:?}");

    let mut approaches = Vec::with_capacity(doc.data.len());
    for (i, row) in doc.data.iter().enumerate() {
        let des = row_str(row, layout.des, i, "des")?;
        let cd = row_str(row, layout.cd, i, "cd")?;
        let dist = row_str(row, layout.dist, i, "dist")?;
        let v_rel = row_str(row, layout.v_rel, i, "v_rel")?;

        let time = cd_to_datetime(cd).with_context(|| format!("Row {i}"))?;
        let distance = parse_number("dist", dist).with_context(|| format!("Row {i}"))?;
        let velocity = parse_number("v_rel", v_rel).with_context(|| format!("Row {i}"))?;

        approaches.push(CloseApproach::new(des, Some(time), distance, velocity));
    }

    Ok(dedup_by_key(approaches, |ca| {
        (ca.designation().to_string(), ca.time())
    }))
}

fn row_str<'a>(row: &'a [JsonValue], idx: usize, i: usize, col: &str) -> Result<&'a str> {
    match row.get(idx) {
        Some(JsonValue::String(s)) => Ok(s.as_str()),
        Some(other) => bail!("Row {i}: '{col}' is not a string: {other}"),
        None => bail!("Row {i}: missing '{col}' at position {idx}"),
    }
}

// -- shared helpers --

fn parse_number(field: &'static str, raw: &str) -> std::result::Result<f64, NeoError> {
    raw.trim().parse::<f64>().map_err(|_| NeoError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// Keep the first record for each key, preserving load order.
fn dedup_by_key<T, K, F>(records: Vec<T>, key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: Fn(&T) -> K,
{
    let before = records.len();
    let mut seen = HashSet::with_capacity(before);
    let unique: Vec<T> = records.into_iter().filter(|r| seen.insert(key(r))).collect();
    if unique.len() < before {
        log::debug!("Dropped {} duplicate records", before - unique.len());
    }
    unique
}
