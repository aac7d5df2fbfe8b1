use crate::term::{BlankId, Iri, Resource, Triple, Value};
use bytesize::ByteSize;
use log::debug;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

pub type Result<T> = core::result::Result<T, Error>;

/// Objects of one subject, keyed and ordered by predicate IRI.
/// Object lists keep the order in which the triples were added and may contain duplicates.
pub type PredicateMap = BTreeMap<Iri, Vec<Value>>;

/// The error type for [`TripleIndex::check_valid`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("blank node handle {0} does not belong to this index")]
    ForeignBlankNode(usize),
    #[error("subject {subject} has an empty object list for predicate {predicate}")]
    EmptyObjects { subject: String, predicate: String },
}

/// Unsorted subject → predicate → objects index of one RDF graph.
/// Blank nodes live in an arena of labels and are referred to by [`BlankId`] handles,
/// so cyclic blank node structures are plain handle-to-handle edges.
/// Built once from the input triples, read-only during canonicalization.
#[derive(Default, Clone)]
pub struct TripleIndex {
    labels: Vec<Arc<str>>,
    blank_ids: HashMap<Arc<str>, BlankId>,
    subjects: HashMap<Resource, PredicateMap>,
    len: usize,
}

impl fmt::Debug for TripleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "total size {} {{", ByteSize(self.size_in_bytes() as u64))?;
        writeln!(f, "    triples: {},", self.len)?;
        writeln!(f, "    subjects: {},", self.subjects.len())?;
        write!(f, "    blank nodes: {}\n}}", self.labels.len())
    }
}

impl TripleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle of the blank node with the given synthetic label, created on first use.
    pub fn blank(&mut self, label: &str) -> BlankId {
        if let Some(id) = self.blank_ids.get(label) {
            return *id;
        }
        let id = BlankId(self.labels.len());
        let label: Arc<str> = label.into();
        self.labels.push(label.clone());
        self.blank_ids.insert(label, id);
        id
    }

    /// Synthetic label of a blank node, empty for handles of other indexes.
    pub fn label(&self, b: BlankId) -> &str {
        self.labels.get(b.0).map_or("", |l| l.as_ref())
    }

    /// Add a triple. Adding the same triple twice stores its object twice.
    pub fn insert(&mut self, triple: Triple) {
        let Triple { subject, predicate, object } = triple;
        self.subjects.entry(subject).or_default().entry(predicate).or_default().push(object);
        self.len += 1;
    }

    /// Number of triples added.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All subjects, in no particular order.
    pub fn subjects(&self) -> impl Iterator<Item = &Resource> {
        self.subjects.keys()
    }

    /// All blank nodes ever interned, in handle order.
    pub fn blank_nodes(&self) -> impl Iterator<Item = BlankId> + use<> {
        (0..self.labels.len()).map(BlankId)
    }

    pub fn predicates(&self, subject: &Resource) -> Option<&PredicateMap> {
        self.subjects.get(subject)
    }

    /// Predicate map of a blank node, `None` if it is never a subject.
    pub fn blank_predicates(&self, b: BlankId) -> Option<&PredicateMap> {
        self.subjects.get(&Resource::Blank(b))
    }

    /// Objects of the given subject and predicate in insertion order.
    pub fn objects(&self, subject: &Resource, predicate: &str) -> &[Value] {
        self.subjects.get(subject).and_then(|m| m.get(predicate)).map_or(&[][..], Vec::as_slice)
    }

    /// Iterate over all triples, grouped by subject.
    pub fn triples(&self) -> impl Iterator<Item = Triple> + '_ {
        self.subjects.iter().flat_map(|(s, m)| {
            m.iter().flat_map(move |(p, objects)| objects.iter().map(move |o| Triple::new(s.clone(), p.clone(), o.clone())))
        })
    }

    /// Verify that no handle of another index has been mixed in and that no object list is empty.
    pub fn check_valid(&self) -> Result<()> {
        let check = |b: BlankId| if b.0 < self.labels.len() { Ok(()) } else { Err(Error::ForeignBlankNode(b.0)) };
        for (subject, predicates) in &self.subjects {
            if let Resource::Blank(b) = subject {
                check(*b)?;
            }
            for (predicate, objects) in predicates {
                if objects.is_empty() {
                    return Err(Error::EmptyObjects {
                        subject: format!("{subject:?}"),
                        predicate: predicate.as_str().to_owned(),
                    });
                }
                for b in objects.iter().filter_map(Value::as_blank) {
                    check(b)?;
                }
            }
        }
        debug!("valid triple index {self:?}");
        Ok(())
    }

    /// Approximate size in bytes on the heap.
    pub fn size_in_bytes(&self) -> usize {
        let labels: usize = self.labels.iter().map(|l| l.len()).sum();
        let map_entries: usize = self.subjects.values().map(|m| m.len() * size_of::<(Iri, Vec<Value>)>()).sum();
        labels * 2
            + self.labels.len() * (size_of::<Arc<str>>() * 2 + size_of::<BlankId>())
            + self.subjects.len() * size_of::<(Resource, PredicateMap)>()
            + map_entries
            + self.len * size_of::<Value>()
    }
}

impl Extend<Triple> for TripleIndex {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        for triple in iter {
            self.insert(triple);
        }
    }
}

impl FromIterator<Triple> for TripleIndex {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut index = TripleIndex::new();
        index.extend(iter);
        index
    }
}
