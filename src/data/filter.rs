use chrono::NaiveDate;

use super::model::CloseApproach;

// ---------------------------------------------------------------------------
// Comparison – how an attribute is compared with the filter's reference value
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    /// Inclusive lower bound.
    Ge,
    /// Inclusive upper bound.
    Le,
}

impl Comparison {
    /// Uses `PartialOrd`, so a `NaN` on either side never matches.
    fn holds<T: PartialOrd>(self, value: T, reference: T) -> bool {
        match self {
            Comparison::Eq => value == reference,
            Comparison::Ge => value >= reference,
            Comparison::Le => value <= reference,
        }
    }
}

// ---------------------------------------------------------------------------
// ApproachFilter – one predicate over a close approach
// ---------------------------------------------------------------------------

/// A single criterion on a close approach. Filters are independent and are
/// combined by logical AND in [`NeoDatabase::query`](super::database::NeoDatabase::query).
#[derive(Debug, Clone, PartialEq)]
pub enum ApproachFilter {
    /// Calendar date of the approach; time of day is ignored.
    Date(Comparison, NaiveDate),
    /// Approach distance in au.
    Distance(Comparison, f64),
    /// Relative velocity in km/s.
    Velocity(Comparison, f64),
    /// Diameter of the approaching object in km.
    Diameter(Comparison, f64),
    Hazardous(bool),
    /// Approaches of the object with this primary designation.
    Designation(String),
}

impl ApproachFilter {
    /// Whether `approach` satisfies this criterion.
    ///
    /// Unknown values fail every criterion: an approach without a time never
    /// passes a date filter, and one whose object is missing never passes an
    /// object-based filter.
    pub fn matches(&self, approach: &CloseApproach) -> bool {
        match self {
            ApproachFilter::Date(op, date) => approach
                .time()
                .is_some_and(|t| op.holds(t.date(), *date)),
            ApproachFilter::Distance(op, bound) => op.holds(approach.distance(), *bound),
            ApproachFilter::Velocity(op, bound) => op.holds(approach.velocity(), *bound),
            ApproachFilter::Diameter(op, bound) => approach
                .neo()
                .is_some_and(|neo| op.holds(neo.diameter(), *bound)),
            ApproachFilter::Hazardous(flag) => approach
                .neo()
                .is_some_and(|neo| neo.hazardous() == *flag),
            ApproachFilter::Designation(des) => approach
                .neo()
                .is_some_and(|neo| neo.designation() == des),
        }
    }
}

// ---------------------------------------------------------------------------
// FilterOptions – user-facing options → filter list
// ---------------------------------------------------------------------------

/// Optional query criteria. An unset option imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub date: Option<NaiveDate>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub distance_min: Option<f64>,
    pub distance_max: Option<f64>,
    pub velocity_min: Option<f64>,
    pub velocity_max: Option<f64>,
    pub diameter_min: Option<f64>,
    pub diameter_max: Option<f64>,
    pub hazardous: Option<bool>,
    pub designation: Option<String>,
}

impl FilterOptions {
    /// Build one filter per option that is set.
    pub fn create_filters(&self) -> Vec<ApproachFilter> {
        use ApproachFilter as F;
        use Comparison::{Eq, Ge, Le};

        let mut filters = Vec::new();
        filters.extend(self.date.map(|d| F::Date(Eq, d)));
        filters.extend(self.start_date.map(|d| F::Date(Ge, d)));
        filters.extend(self.end_date.map(|d| F::Date(Le, d)));
        filters.extend(self.distance_min.map(|v| F::Distance(Ge, v)));
        filters.extend(self.distance_max.map(|v| F::Distance(Le, v)));
        filters.extend(self.velocity_min.map(|v| F::Velocity(Ge, v)));
        filters.extend(self.velocity_max.map(|v| F::Velocity(Le, v)));
        filters.extend(self.diameter_min.map(|v| F::Diameter(Ge, v)));
        filters.extend(self.diameter_max.map(|v| F::Diameter(Le, v)));
        filters.extend(self.hazardous.map(F::Hazardous));
        filters.extend(self.designation.clone().map(F::Designation));
        filters
    }
}

/// Cap a result stream at `n` items; `None` or `0` means no limit.
pub fn limit<I: Iterator>(iter: I, n: Option<usize>) -> std::iter::Take<I> {
    match n {
        Some(n) if n > 0 => iter.take(n),
        _ => iter.take(usize::MAX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::NearEarthObject;
    use crate::helpers::cd_to_datetime;
    use std::rc::Rc;

    fn linked(neo: &Rc<NearEarthObject>, cd: &str, distance: f64, velocity: f64) -> CloseApproach {
        let ca = CloseApproach::new(
            neo.designation(),
            Some(cd_to_datetime(cd).unwrap()),
            distance,
            velocity,
        );
        ca.update_neo(neo);
        ca
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_filters_ignore_time_of_day() {
        let neo = Rc::new(NearEarthObject::new("1"));
        let ca = linked(&neo, "2020-Jan-01 23:59", 0.1, 1.0);

        assert!(ApproachFilter::Date(Comparison::Eq, ymd(2020, 1, 1)).matches(&ca));
        assert!(!ApproachFilter::Date(Comparison::Eq, ymd(2020, 1, 2)).matches(&ca));
        assert!(ApproachFilter::Date(Comparison::Ge, ymd(2020, 1, 1)).matches(&ca));
        assert!(ApproachFilter::Date(Comparison::Le, ymd(2020, 1, 1)).matches(&ca));
        assert!(!ApproachFilter::Date(Comparison::Le, ymd(2019, 12, 31)).matches(&ca));
    }

    #[test]
    fn missing_time_never_matches_date() {
        let ca = CloseApproach::new("1", None, 0.1, 1.0);
        assert!(!ApproachFilter::Date(Comparison::Ge, ymd(1900, 1, 1)).matches(&ca));
    }

    #[test]
    fn numeric_bounds_are_inclusive() {
        let neo = Rc::new(NearEarthObject::new("1"));
        let ca = linked(&neo, "2020-Jan-01 00:00", 0.25, 12.5);

        assert!(ApproachFilter::Distance(Comparison::Le, 0.25).matches(&ca));
        assert!(ApproachFilter::Distance(Comparison::Ge, 0.25).matches(&ca));
        assert!(!ApproachFilter::Distance(Comparison::Ge, 0.26).matches(&ca));
        assert!(ApproachFilter::Velocity(Comparison::Ge, 12.5).matches(&ca));
        assert!(!ApproachFilter::Velocity(Comparison::Le, 12.0).matches(&ca));
    }

    #[test]
    fn unknown_diameter_fails_every_bound() {
        let neo = Rc::new(NearEarthObject::new("1"));
        let ca = linked(&neo, "2020-Jan-01 00:00", 0.1, 1.0);

        assert!(!ApproachFilter::Diameter(Comparison::Le, f64::MAX).matches(&ca));
        assert!(!ApproachFilter::Diameter(Comparison::Ge, 0.0).matches(&ca));
        assert!(!ApproachFilter::Diameter(Comparison::Eq, f64::NAN).matches(&ca));
    }

    #[test]
    fn object_filters_on_known_object() {
        let neo = Rc::new(
            NearEarthObject::new("433")
                .with_diameter(16.84)
                .with_hazardous(true),
        );
        let ca = linked(&neo, "2020-Jan-01 00:00", 0.1, 1.0);

        assert!(ApproachFilter::Diameter(Comparison::Ge, 16.84).matches(&ca));
        assert!(ApproachFilter::Hazardous(true).matches(&ca));
        assert!(!ApproachFilter::Hazardous(false).matches(&ca));
        assert!(ApproachFilter::Designation("433".into()).matches(&ca));
        assert!(!ApproachFilter::Designation("434".into()).matches(&ca));
    }

    #[test]
    fn object_filters_on_unlinked_approach_are_false() {
        let ca = CloseApproach::new("1", None, 0.1, 1.0);
        assert!(!ApproachFilter::Hazardous(false).matches(&ca));
        assert!(!ApproachFilter::Diameter(Comparison::Le, 10.0).matches(&ca));
    }

    #[test]
    fn create_filters_skips_unset_options() {
        assert!(FilterOptions::default().create_filters().is_empty());

        let options = FilterOptions {
            start_date: Some(ymd(2020, 1, 1)),
            distance_max: Some(0.1),
            hazardous: Some(false),
            ..FilterOptions::default()
        };
        assert_eq!(
            options.create_filters(),
            vec![
                ApproachFilter::Date(Comparison::Ge, ymd(2020, 1, 1)),
                ApproachFilter::Distance(Comparison::Le, 0.1),
                ApproachFilter::Hazardous(false),
            ]
        );
    }

    #[test]
    fn limit_zero_or_none_is_unbounded() {
        assert_eq!(limit(0..5, None).count(), 5);
        assert_eq!(limit(0..5, Some(0)).count(), 5);
        assert_eq!(limit(0..5, Some(2)).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(limit(0..5, Some(10)).count(), 5);
    }
}
