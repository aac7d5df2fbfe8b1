use crate::canon::{Context, InlineViolation, Options, ResourceComparator, TreeMemo, sort_canonical};
use crate::index::{self, TripleIndex};
use crate::inline::{self, check_inlining};
use crate::term::{BlankId, Iri, Resource, Triple, Value};
use log::{debug, warn};
use std::collections::HashMap;
use std::time::Instant;

pub type Result<T> = core::result::Result<T, Error>;

/// The error type for [`SortedIndex::build`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid triple index")]
    Index(#[from] index::Error),
    #[error("blank nodes cannot be inlined")]
    Inlining(#[from] inline::Violation),
}

/// Objects of one predicate in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedPredicate {
    pub predicate: Iri,
    pub objects: Vec<Value>,
}

/// One subject with its predicates in IRI order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedSubject {
    pub subject: Resource,
    /// The subject is a collection node, its objects keep their insertion order.
    pub collection: bool,
    pub predicates: Vec<SortedPredicate>,
}

/// Canonical nested ordering of a graph: sorted subjects, sorted predicates per subject
/// and sorted (or list ordered, for collections) objects per predicate.
/// Handed to a writer such as [`SortedIndex::write_nt`].
#[derive(Debug, Clone)]
pub struct SortedIndex {
    subjects: Vec<SortedSubject>,
    collections: HashMap<BlankId, Vec<Value>>,
    inlined: bool,
    len: usize,
}

impl SortedIndex {
    /// Validate the index and sort it with the given options.
    /// If inlining is requested for a graph that cannot be inlined, either fail or,
    /// with [`InlineViolation::FallBack`], sort without inlining.
    pub fn build(index: &TripleIndex, options: &Options) -> Result<Self> {
        let timer = Instant::now();
        index.check_valid()?;
        let mut options = options.clone();
        if options.inline_blank_nodes {
            if let Err(violation) = check_inlining(index) {
                match options.on_inline_violation {
                    InlineViolation::Fail => return Err(violation.into()),
                    InlineViolation::FallBack => {
                        warn!("{violation}, sorting without inlining");
                        options.inline_blank_nodes = false;
                    }
                }
            }
        }
        let tree = TreeMemo::new();
        let mut context = Context::new(index, &options);
        if options.inline_blank_nodes {
            // verified above: blank nodes form a forest
            context = context.with_tree_memo(&tree);
        }
        let mut cmp = ResourceComparator::new(context);
        let sorted = sort_canonical(index.subjects(), |a, b| cmp.compare(a, b));
        debug!("sorted {} subjects in {:?}", sorted.len(), timer.elapsed());

        let mut collections = HashMap::new();
        let mut subjects = Vec::with_capacity(sorted.len());
        for subject in sorted {
            let members = subject.as_blank().and_then(|b| Some((b, context.collection_members(b)?)));
            let collection = members.is_some();
            if let Some((b, members)) = members {
                collections.insert(b, members.into_iter().cloned().collect());
            }
            let mut predicates = Vec::new();
            for (predicate, objects) in index.predicates(subject).into_iter().flatten() {
                let objects = if collection {
                    objects.clone()
                } else {
                    sort_canonical(objects.iter().cloned(), |a, b| cmp.compare_values(a, b))
                };
                predicates.push(SortedPredicate { predicate: predicate.clone(), objects });
            }
            subjects.push(SortedSubject { subject: subject.clone(), collection, predicates });
        }
        debug!("sorted {} triples in {:?}, comparator cache: {cmp:?}", index.len(), timer.elapsed());
        if options.inline_blank_nodes {
            debug!("tree cache: {tree:?}");
        }
        Ok(SortedIndex { subjects, collections, inlined: options.inline_blank_nodes, len: index.len() })
    }

    pub fn subjects(&self) -> &[SortedSubject] {
        &self.subjects
    }

    /// Members of the collection headed by the given blank node in list order.
    pub fn collection(&self, head: BlankId) -> Option<&[Value]> {
        self.collections.get(&head).map(Vec::as_slice)
    }

    /// Whether the index was sorted in inlining mode, false after a fallback.
    pub const fn is_inlined(&self) -> bool {
        self.inlined
    }

    /// Number of triples.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// All triples in canonical order.
    pub fn triples(&self) -> impl Iterator<Item = Triple> + '_ {
        self.subjects.iter().flat_map(|s| {
            s.predicates.iter().flat_map(move |p| {
                p.objects.iter().map(move |o| Triple::new(s.subject.clone(), p.predicate.clone(), o.clone()))
            })
        })
    }

    /// Labels `b0`, `b1`, … for all blank nodes, numbered by first appearance in canonical order.
    pub fn canonical_labels(&self) -> HashMap<BlankId, String> {
        let mut labels = HashMap::new();
        let mut assign = |b: BlankId| {
            let next = labels.len();
            labels.entry(b).or_insert_with(|| format!("b{next}"));
        };
        for s in &self.subjects {
            if let Resource::Blank(b) = s.subject {
                assign(b);
            }
            for b in s.predicates.iter().flat_map(|p| &p.objects).filter_map(Value::as_blank) {
                assign(b);
            }
        }
        labels
    }
}
