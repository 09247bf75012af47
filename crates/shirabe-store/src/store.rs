//! Triple storage with pattern matching

use crate::provenance::{GraphId, Provenance};
use serde::{Deserialize, Serialize};
use shirabe_core::model::{Iri, Term, Triple};
use std::collections::{HashMap, HashSet};

/// Stored triple with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredTriple {
    /// Graph identifier
    pub graph_id: GraphId,
    /// The RDF triple
    pub triple: Triple,
    /// Provenance information
    pub provenance: Provenance,
}

/// In-memory triple store with indexing for fast pattern queries.
///
/// Set semantics: inserting a triple that is already present (in any graph)
/// is a no-op, regardless of provenance. Triples are only ever added;
/// removal is not part of the contract.
#[derive(Debug, Clone, Default)]
pub struct TripleStore {
    /// All stored triples, in insertion order
    triples: Vec<StoredTriple>,
    /// Membership set for duplicate suppression
    seen: HashSet<Triple>,
    /// Subject index: term -> triple indices
    subject_index: HashMap<Term, Vec<usize>>,
    /// Predicate index: predicate -> triple indices
    predicate_index: HashMap<Iri, Vec<usize>>,
    /// Object index: term -> triple indices
    object_index: HashMap<Term, Vec<usize>>,
}

impl TripleStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple into the default graph. Returns false if the triple
    /// was already present.
    pub fn insert(&mut self, triple: Triple, provenance: Provenance) -> bool {
        self.insert_in_graph(triple, GraphId::Default, provenance)
    }

    /// Insert a triple into a specific graph. Returns false if the triple
    /// was already present.
    pub fn insert_in_graph(
        &mut self,
        triple: Triple,
        graph_id: GraphId,
        provenance: Provenance,
    ) -> bool {
        if !self.seen.insert(triple.clone()) {
            return false;
        }

        let index = self.triples.len();
        self.subject_index
            .entry(triple.subject.clone())
            .or_default()
            .push(index);
        self.predicate_index
            .entry(triple.predicate.clone())
            .or_default()
            .push(index);
        self.object_index
            .entry(triple.object.clone())
            .or_default()
            .push(index);

        self.triples.push(StoredTriple {
            graph_id,
            triple,
            provenance,
        });
        true
    }

    /// Insert multiple triples with the same provenance. Returns the number
    /// of triples actually added (duplicates are skipped).
    pub fn insert_batch<I>(&mut self, triples: I, provenance: Provenance) -> usize
    where
        I: IntoIterator<Item = Triple>,
    {
        let mut added = 0;
        for triple in triples {
            if self.insert(triple, provenance.clone()) {
                added += 1;
            }
        }
        added
    }

    /// Number of distinct triples in the store
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    pub fn contains(&self, triple: &Triple) -> bool {
        self.seen.contains(triple)
    }

    /// Iterate over all stored triples in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &StoredTriple> {
        self.triples.iter()
    }

    /// Find triples matching a pattern. Unbound positions are `None`.
    /// Uses the most selective bound position's index, then filters by the
    /// remaining constraints.
    pub fn find_triples(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Iri>,
        object: Option<&Term>,
    ) -> Vec<&StoredTriple> {
        let candidates: &[usize] = if let Some(s) = subject {
            self.subject_index.get(s).map(Vec::as_slice).unwrap_or(&[])
        } else if let Some(p) = predicate {
            self.predicate_index.get(p).map(Vec::as_slice).unwrap_or(&[])
        } else if let Some(o) = object {
            self.object_index.get(o).map(Vec::as_slice).unwrap_or(&[])
        } else {
            return self.triples.iter().collect();
        };

        candidates
            .iter()
            .map(|&i| &self.triples[i])
            .filter(|stored| {
                if let Some(s) = subject {
                    if &stored.triple.subject != s {
                        return false;
                    }
                }
                if let Some(p) = predicate {
                    if &stored.triple.predicate != p {
                        return false;
                    }
                }
                if let Some(o) = object {
                    if &stored.triple.object != o {
                        return false;
                    }
                }
                true
            })
            .collect()
    }

    /// Distinct subjects of triples matching `(?, predicate, object)`,
    /// in first-seen order.
    pub fn subjects_matching(&self, predicate: &Iri, object: &Term) -> Vec<&Term> {
        let mut seen = HashSet::new();
        self.find_triples(None, Some(predicate), Some(object))
            .into_iter()
            .filter(|stored| seen.insert(&stored.triple.subject))
            .map(|stored| &stored.triple.subject)
            .collect()
    }

    /// Objects of triples matching `(subject, predicate, ?)`
    pub fn objects_of(&self, subject: &Term, predicate: &Iri) -> Vec<&Term> {
        self.find_triples(Some(subject), Some(predicate), None)
            .into_iter()
            .map(|stored| &stored.triple.object)
            .collect()
    }

    /// Provenance of a stored triple, if present
    pub fn provenance_of(&self, triple: &Triple) -> Option<&Provenance> {
        self.find_triples(
            Some(&triple.subject),
            Some(&triple.predicate),
            Some(&triple.object),
        )
        .into_iter()
        .next()
        .map(|stored| &stored.provenance)
    }

    /// Number of triples carrying `Provenance::Inferred`
    pub fn inferred_count(&self) -> usize {
        self.triples
            .iter()
            .filter(|stored| stored.provenance.is_inferred())
            .count()
    }
}
