use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{NeoError, Result};

/// Calendar-date format used in the close approach data, e.g. `1900-Jan-01`.
const CD_DATE_FORMAT: &str = "%Y-%b-%d";
/// Full close approach format, e.g. `1900-Jan-01 00:00`.
const CD_DATETIME_FORMAT: &str = "%Y-%b-%d %H:%M";
/// Output format, always including the time of day.
const OUTPUT_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a CAD calendar date (`YYYY-MMM-DD HH:MM`, time part optional) into a
/// naive UTC datetime. A missing time of day means midnight.
pub fn cd_to_datetime(cd: &str) -> Result<NaiveDateTime> {
    let cd = cd.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(cd, CD_DATETIME_FORMAT) {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(cd, CD_DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| NeoError::InvalidDate(cd.to_string()))
}

/// Render a datetime as `YYYY-MM-DD HH:MM`.
pub fn datetime_to_str(dt: &NaiveDateTime) -> String {
    dt.format(OUTPUT_FORMAT).to_string()
}

/// Parse an ISO calendar date (`YYYY-MM-DD`) as typed on the command line.
pub fn date_fromisoformat(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| NeoError::InvalidDate(s.to_string()))
}
