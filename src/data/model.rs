use std::cell::OnceCell;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::{NeoError, Result};
use crate::helpers::datetime_to_str;

// ---------------------------------------------------------------------------
// NearEarthObject – one physical object from the NEO catalogue
// ---------------------------------------------------------------------------

/// A near-Earth object (NEO).
///
/// Identity is the primary designation alone: two objects with the same
/// designation are equal, hash alike and sort together regardless of their
/// other fields.
///
/// The close approaches start out empty and are filled in exactly once by
/// [`NeoDatabase`](super::database::NeoDatabase) while it links the dataset.
#[derive(Debug)]
pub struct NearEarthObject {
    designation: String,
    name: Option<String>,
    /// Diameter in km, `NaN` when unknown.
    diameter: f64,
    hazardous: bool,
    approaches: OnceCell<Vec<Rc<CloseApproach>>>,
}

impl Default for NearEarthObject {
    fn default() -> Self {
        Self {
            designation: String::new(),
            name: None,
            diameter: f64::NAN,
            hazardous: false,
            approaches: OnceCell::new(),
        }
    }
}

impl NearEarthObject {
    /// A bare object with only its designation set; every other field keeps
    /// its default. This is also the shape of the stubs minted for orphaned
    /// close approaches.
    pub fn new(designation: impl Into<String>) -> Self {
        Self {
            designation: designation.into(),
            ..Self::default()
        }
    }

    /// Set the IAU name. An empty name means "no name".
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    pub fn with_diameter(mut self, diameter: f64) -> Self {
        self.diameter = diameter;
        self
    }

    pub fn with_hazardous(mut self, hazardous: bool) -> Self {
        self.hazardous = hazardous;
        self
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn hazardous(&self) -> bool {
        self.hazardous
    }

    /// Close approaches of this object, in load order.
    pub fn approaches(&self) -> &[Rc<CloseApproach>] {
        self.approaches.get().map(Vec::as_slice).unwrap_or_default()
    }

    /// `"<designation> [<name>]"`, or just the designation when unnamed.
    pub fn fullname(&self) -> String {
        match &self.name {
            Some(name) => format!("{} [{}]", self.designation, name),
            None => self.designation.clone(),
        }
    }

    pub fn to_dict(&self) -> NeoDict {
        NeoDict {
            designation: self.designation.clone(),
            name: self.name.clone().unwrap_or_default(),
            diameter_km: self.diameter,
            potentially_hazardous: self.hazardous,
        }
    }

    /// Commit the approaches gathered during linking. Only the first call
    /// has any effect.
    pub(crate) fn link_approaches(&self, approaches: Vec<Rc<CloseApproach>>) -> bool {
        self.approaches.set(approaches).is_ok()
    }
}

impl PartialEq for NearEarthObject {
    fn eq(&self, other: &Self) -> bool {
        self.designation == other.designation
    }
}

impl Eq for NearEarthObject {}

impl PartialOrd for NearEarthObject {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NearEarthObject {
    fn cmp(&self, other: &Self) -> Ordering {
        self.designation.cmp(&other.designation)
    }
}

impl Hash for NearEarthObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.designation.hash(state);
    }
}

impl fmt::Display for NearEarthObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} with a diameter of {:.3} km and {} potentially hazardous",
            self.fullname(),
            self.diameter,
            if self.hazardous { "is" } else { "is not" }
        )
    }
}

// ---------------------------------------------------------------------------
// CloseApproach – one flyby event
// ---------------------------------------------------------------------------

/// A close approach to Earth by an NEO.
///
/// `designation` is the foreign key read from the source file. The database
/// resolves it once and stores a non-owning back-reference to the matching
/// [`NearEarthObject`]. Identity is `(designation, time)`.
#[derive(Debug)]
pub struct CloseApproach {
    designation: String,
    time: Option<NaiveDateTime>,
    /// Nominal approach distance in au.
    distance: f64,
    /// Relative approach velocity in km/s.
    velocity: f64,
    neo: OnceCell<Weak<NearEarthObject>>,
}

impl Default for CloseApproach {
    fn default() -> Self {
        Self {
            designation: String::new(),
            time: None,
            distance: f64::NAN,
            velocity: f64::NAN,
            neo: OnceCell::new(),
        }
    }
}

impl CloseApproach {
    pub fn new(
        designation: impl Into<String>,
        time: Option<NaiveDateTime>,
        distance: f64,
        velocity: f64,
    ) -> Self {
        Self {
            designation: designation.into(),
            time,
            distance,
            velocity,
            neo: OnceCell::new(),
        }
    }

    /// Designation of the object this approach refers to.
    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn time(&self) -> Option<NaiveDateTime> {
        self.time
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// The linked object, or `None` before linking.
    pub fn neo(&self) -> Option<Rc<NearEarthObject>> {
        self.neo.get().and_then(Weak::upgrade)
    }

    /// Approach time as `YYYY-MM-DD HH:MM`; empty when unknown.
    pub fn time_str(&self) -> String {
        self.time.as_ref().map(datetime_to_str).unwrap_or_default()
    }

    /// Point this approach at its object. The back-reference is written at
    /// most once: linking again to the same object is a no-op, re-pointing
    /// it elsewhere is refused.
    pub(crate) fn update_neo(&self, neo: &Rc<NearEarthObject>) -> bool {
        match self.neo.get() {
            None => self.neo.set(Rc::downgrade(neo)).is_ok(),
            Some(current) => {
                let same = current.upgrade().is_some_and(|c| Rc::ptr_eq(&c, neo));
                if !same {
                    log::warn!(
                        "Refusing to re-link approach '{}' to '{}'",
                        self.designation,
                        neo.designation()
                    );
                }
                same
            }
        }
    }

    fn linked_neo(&self) -> Result<Rc<NearEarthObject>> {
        self.neo().ok_or_else(|| NeoError::UnlinkedApproach {
            designation: self.designation.clone(),
        })
    }

    /// Flat record with the object fields inlined, one CSV row.
    pub fn serialize(&self) -> Result<ApproachRow> {
        let neo = self.linked_neo()?;
        Ok(ApproachRow {
            datetime_utc: self.time_str(),
            distance_au: self.distance,
            velocity_km_s: self.velocity,
            designation: neo.designation.clone(),
            name: neo.name.clone().unwrap_or_default(),
            diameter_km: neo.diameter,
            potentially_hazardous: neo.hazardous,
        })
    }

    /// Nested record with the object under `neo`, one JSON array element.
    pub fn to_dict(&self) -> Result<ApproachDict> {
        let neo = self.linked_neo()?;
        Ok(ApproachDict {
            datetime_utc: self.time_str(),
            distance_au: self.distance,
            velocity_km_s: self.velocity,
            neo: neo.to_dict(),
        })
    }
}

impl PartialEq for CloseApproach {
    fn eq(&self, other: &Self) -> bool {
        self.designation == other.designation && self.time == other.time
    }
}

impl Eq for CloseApproach {}

impl PartialOrd for CloseApproach {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CloseApproach {
    fn cmp(&self, other: &Self) -> Ordering {
        self.designation
            .cmp(&other.designation)
            .then_with(|| self.time.cmp(&other.time))
    }
}

impl Hash for CloseApproach {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.designation.hash(state);
        self.time.hash(state);
    }
}

impl fmt::Display for CloseApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = self
            .neo()
            .map(|neo| neo.fullname())
            .unwrap_or_else(|| self.designation.clone());
        write!(
            f,
            "At {}, '{}' approaches Earth at a distance of {:.2} au and a velocity of {:.2} km/s",
            self.time_str(),
            who,
            self.distance,
            self.velocity
        )
    }
}

// ---------------------------------------------------------------------------
// Output records
// ---------------------------------------------------------------------------

/// Object fields as written to output files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeoDict {
    pub designation: String,
    pub name: String,
    pub diameter_km: f64,
    pub potentially_hazardous: bool,
}

/// Close approach with its object nested, as written to JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApproachDict {
    pub datetime_utc: String,
    pub distance_au: f64,
    pub velocity_km_s: f64,
    pub neo: NeoDict,
}

/// Close approach with its object flattened, as written to CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApproachRow {
    pub datetime_utc: String,
    pub distance_au: f64,
    pub velocity_km_s: f64,
    pub designation: String,
    pub name: String,
    pub diameter_km: f64,
    pub potentially_hazardous: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::cd_to_datetime;
    use std::collections::HashSet;

    fn eros() -> Rc<NearEarthObject> {
        Rc::new(
            NearEarthObject::new("433")
                .with_name("Eros")
                .with_diameter(16.84),
        )
    }

    fn approach(des: &str, cd: &str) -> CloseApproach {
        CloseApproach::new(des, Some(cd_to_datetime(cd).unwrap()), 0.3, 5.5)
    }

    #[test]
    fn fullname_includes_name_when_present() {
        assert_eq!(eros().fullname(), "433 [Eros]");
        assert_eq!(NearEarthObject::new("2020 AB").fullname(), "2020 AB");
    }

    #[test]
    fn empty_name_is_no_name() {
        let neo = NearEarthObject::new("1").with_name("");
        assert_eq!(neo.name(), None);
        assert_eq!(neo.to_dict().name, "");
    }

    #[test]
    fn defaults_for_omitted_fields() {
        let neo = NearEarthObject::new("1");
        assert!(neo.diameter().is_nan());
        assert!(!neo.hazardous());
        assert!(neo.approaches().is_empty());
        assert_eq!(NearEarthObject::default().designation(), "");
    }

    #[test]
    fn neo_identity_is_designation_only() {
        let a = NearEarthObject::new("433").with_name("Eros");
        let b = NearEarthObject::new("433").with_diameter(1.0).with_hazardous(true);
        assert_eq!(a, b);

        let set: HashSet<NearEarthObject> = [a, b, NearEarthObject::new("1")].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn approach_identity_is_designation_and_time() {
        let a = approach("433", "1900-Jan-01 00:00");
        let b = CloseApproach::new("433", a.time(), 1.0, 2.0);
        let c = approach("433", "1900-Jan-02 00:00");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);
    }

    #[test]
    fn neo_display_mentions_diameter_and_hazard() {
        let s = eros().to_string();
        assert_eq!(
            s,
            "433 [Eros] with a diameter of 16.840 km and is not potentially hazardous"
        );
        let unknown = NearEarthObject::new("X").with_hazardous(true).to_string();
        assert!(unknown.contains("NaN km"));
        assert!(unknown.ends_with("is potentially hazardous"));
    }

    #[test]
    fn serialize_requires_link() {
        let ca = approach("433", "1900-Jan-01 00:00");
        assert_eq!(
            ca.serialize(),
            Err(NeoError::UnlinkedApproach {
                designation: "433".to_string()
            })
        );
        assert!(ca.to_dict().is_err());
    }

    #[test]
    fn update_neo_writes_once() {
        let neo = eros();
        let other = Rc::new(NearEarthObject::new("1"));
        let ca = approach("433", "1900-Jan-01 00:00");

        assert!(ca.update_neo(&neo));
        assert!(ca.update_neo(&neo));
        assert!(!ca.update_neo(&other));
        assert!(Rc::ptr_eq(&ca.neo().unwrap(), &neo));
    }

    #[test]
    fn linked_approach_serializes_flat_and_nested() {
        let neo = eros();
        let ca = approach("433", "1900-Jan-01 00:00");
        ca.update_neo(&neo);

        let row = ca.serialize().unwrap();
        assert_eq!(row.datetime_utc, "1900-01-01 00:00");
        assert_eq!(row.name, "Eros");
        assert_eq!(row.designation, "433");
        assert_eq!(row.distance_au, 0.3);

        let dict = ca.to_dict().unwrap();
        let json = serde_json::to_value(&dict).unwrap();
        assert_eq!(json["neo"]["name"], "Eros");
        assert_eq!(json["velocity_km_s"], 5.5);

        assert_eq!(
            ca.to_string(),
            "At 1900-01-01 00:00, '433 [Eros]' approaches Earth at a distance of 0.30 au and a velocity of 5.50 km/s"
        );
    }

    #[test]
    fn unlinked_display_falls_back_to_designation() {
        let ca = approach("2020 AB", "2020-Jan-01 12:30");
        assert!(ca.to_string().contains("'2020 AB'"));
    }
}
