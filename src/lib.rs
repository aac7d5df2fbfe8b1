//! Canonical ordering of RDF graphs.
//!
//! Sorts the subjects, predicates and objects of a graph into one deterministic order,
//! so that serializations of the same graph are stable and diff friendly.
//! IRIs and literals are ordered lexically. Blank nodes are ordered by their content:
//! RDF collections by their members in list order, other blank nodes by their predicate object maps,
//! recursing into nested blank nodes with cycle detection.
//!
//! # Example
//! ```
//! use rdfsort::{Options, SortedIndex, TripleIndex};
//! use rdfsort::term::{Iri, Literal, Resource, Triple};
//! let mut index = TripleIndex::new();
//! let city = index.blank("c");
//! index.insert(Triple::new(Iri::from("http://ex.org/john"), "http://ex.org/address", city));
//! index.insert(Triple::new(city, "http://ex.org/city", Literal::new("Berlin")));
//! index.insert(Triple::new(Iri::from("http://ex.org/bob"), "http://ex.org/name", Literal::new("Bob")));
//! let sorted = SortedIndex::build(&index, &Options::default()).unwrap();
//! assert_eq!(Resource::Iri(Iri::from("http://ex.org/bob")), sorted.subjects()[0].subject);
//! assert_eq!(Resource::Blank(city), sorted.subjects()[2].subject);
//! ```
/// Comparison context, visited set and the canonical orderings.
pub mod canon;
/// Unsorted subject → predicate → objects index.
pub mod index;
pub mod inline;
#[cfg(feature = "sophia")]
pub mod nt;
/// Sorted canonical index.
pub mod sorted;
#[cfg(feature = "sophia")]
pub mod sophia;
/// RDF terms and triples.
pub mod term;
pub mod vocab;

pub use canon::{Context, InlineViolation, MemberConstraint, Options, ResourceComparator, Visited};
pub use index::TripleIndex;
pub use sorted::SortedIndex;
