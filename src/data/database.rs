use std::collections::HashMap;
use std::rc::Rc;

use super::filter::ApproachFilter;
use super::model::{CloseApproach, NearEarthObject};

// ---------------------------------------------------------------------------
// NeoDatabase – the linked, read-only dataset
// ---------------------------------------------------------------------------

/// All loaded objects and close approaches, linked to each other.
///
/// Construction resolves every approach's designation against the objects
/// and wires both directions of the relation. After that the database is
/// read-only: callers get shared handles, never copies.
#[derive(Debug)]
pub struct NeoDatabase {
    neos: Vec<Rc<NearEarthObject>>,
    approaches: Vec<Rc<CloseApproach>>,
    /// Placeholder objects for approaches with no catalogue entry. Kept here
    /// so the approaches' back-references stay alive; never indexed.
    stubs: Vec<Rc<NearEarthObject>>,
    /// designation → position in `neos`
    by_designation: HashMap<String, usize>,
    /// lowercased name → position in `neos`
    by_name: HashMap<String, usize>,
}

impl NeoDatabase {
    /// Link `neos` and `approaches` in one pass.
    ///
    /// Each approach is attached to the object with its designation and
    /// appended to that object's approaches in input order. An approach whose
    /// designation is unknown gets a fresh stub object of its own.
    pub fn new(neos: Vec<NearEarthObject>, approaches: Vec<CloseApproach>) -> Self {
        let mut by_designation: HashMap<String, usize> = HashMap::with_capacity(neos.len());
        let mut by_name = HashMap::new();
        let mut unique: Vec<Rc<NearEarthObject>> = Vec::with_capacity(neos.len());
        for neo in neos {
            // First occurrence wins, matching the loaders' dedup.
            if by_designation.contains_key(neo.designation()) {
                log::debug!("Dropping duplicate NEO '{}'", neo.designation());
                continue;
            }
            let idx = unique.len();
            by_designation.insert(neo.designation().to_string(), idx);
            if let Some(name) = neo.name() {
                by_name.entry(name.to_lowercase()).or_insert(idx);
            }
            unique.push(Rc::new(neo));
        }
        let neos = unique;

        let approaches: Vec<Rc<CloseApproach>> = approaches.into_iter().map(Rc::new).collect();
        let mut buckets: Vec<Vec<Rc<CloseApproach>>> = vec![Vec::new(); neos.len()];
        let mut stubs = Vec::new();

        for approach in &approaches {
            match by_designation.get(approach.designation()) {
                Some(&idx) => {
                    approach.update_neo(&neos[idx]);
                    buckets[idx].push(Rc::clone(approach));
                }
                None => {
                    let stub = Rc::new(NearEarthObject::new(approach.designation()));
                    approach.update_neo(&stub);
                    stubs.push(stub);
                }
            }
        }

        for (neo, bucket) in neos.iter().zip(buckets) {
            neo.link_approaches(bucket);
        }

        log::info!(
            "Linked {} NEOs with {} close approaches ({} without a catalogue entry)",
            neos.len(),
            approaches.len(),
            stubs.len()
        );

        Self {
            neos,
            approaches,
            stubs,
            by_designation,
            by_name,
        }
    }

    /// Exact lookup by primary designation.
    pub fn get_neo_by_designation(&self, designation: &str) -> Option<&Rc<NearEarthObject>> {
        self.by_designation
            .get(designation)
            .map(|&idx| &self.neos[idx])
    }

    /// Case-insensitive exact lookup by IAU name. Empty names never match.
    pub fn get_neo_by_name(&self, name: &str) -> Option<&Rc<NearEarthObject>> {
        if name.is_empty() {
            return None;
        }
        self.by_name
            .get(&name.to_lowercase())
            .map(|&idx| &self.neos[idx])
    }

    /// Lazily yield the close approaches that pass every filter, in load
    /// order. With no filters every approach is yielded.
    ///
    /// The returned iterator is single-pass; call `query` again to restart.
    /// Yielded approaches borrow only the database, so they may outlive the
    /// filter slice.
    pub fn query<'a, 'f>(
        &'a self,
        filters: &'f [ApproachFilter],
    ) -> impl Iterator<Item = &'a Rc<CloseApproach>> + 'f
    where
        'a: 'f,
    {
        self.approaches
            .iter()
            .filter(move |approach| filters.iter().all(|f| f.matches(approach)))
    }

    /// Catalogue objects in load order (stubs excluded).
    pub fn neos(&self) -> &[Rc<NearEarthObject>] {
        &self.neos
    }

    /// Every close approach in load order.
    pub fn approaches(&self) -> &[Rc<CloseApproach>] {
        &self.approaches
    }

    /// Number of approaches linked to a stub object.
    pub fn stub_count(&self) -> usize {
        self.stubs.len()
    }
}
