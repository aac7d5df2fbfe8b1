//! Precondition check for serializing blank nodes nested at their point of use.
//!
//! A graph can be inlined faithfully if every blank node that is used as an object
//! is also a subject, is used as an object exactly once,
//! and its chain of parents ends at an IRI or at a blank node that is never an object.
use crate::index::TripleIndex;
use crate::term::{BlankId, Resource};
use log::debug;
use std::collections::{HashMap, HashSet};

/// A blank node that prevents inlining, identified by its synthetic label.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("blank node _:{0} is used as an object but never as a subject")]
    NotASubject(String),
    #[error("blank node _:{label} is used as an object {count} times")]
    SharedBlankNode { label: String, count: usize },
    #[error("blank node _:{0} is only reachable through a cycle of blank nodes")]
    Unreachable(String),
}

/// Object occurrences of one blank node: how often, and the subject of the first occurrence.
struct Uses<'a> {
    count: usize,
    parent: &'a Resource,
}

/// Verify that the graph can be inlined, reporting the first offending blank node in handle order.
pub fn check_inlining(index: &TripleIndex) -> Result<(), Violation> {
    let mut uses: HashMap<BlankId, Uses<'_>> = HashMap::new();
    for subject in index.subjects() {
        let objects = index.predicates(subject).into_iter().flat_map(|m| m.values().flatten());
        for b in objects.filter_map(|o| o.as_blank()) {
            uses.entry(b).and_modify(|u| u.count += 1).or_insert(Uses { count: 1, parent: subject });
        }
    }
    let label = |b: BlankId| index.label(b).to_owned();
    for b in index.blank_nodes() {
        let Some(u) = uses.get(&b) else {
            // top level or unused
            continue;
        };
        if index.blank_predicates(b).is_none() {
            return Err(Violation::NotASubject(label(b)));
        }
        if u.count > 1 {
            return Err(Violation::SharedBlankNode { label: label(b), count: u.count });
        }
        let mut seen = HashSet::from([b]);
        let mut parent = u.parent;
        while let Resource::Blank(p) = parent {
            if !seen.insert(*p) {
                return Err(Violation::Unreachable(label(b)));
            }
            match uses.get(p) {
                Some(pu) => parent = pu.parent,
                None => break,
            }
        }
    }
    debug!("inlining possible, {} of {} blank nodes are nested", uses.len(), index.blank_nodes().count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{Iri, Literal, Triple};
    use crate::tests::init;
    use pretty_assertions::assert_eq;

    const P: &str = "http://ex.org/p";

    fn s() -> Iri {
        Iri::from("http://ex.org/s")
    }

    #[test]
    fn nested_tree() -> color_eyre::Result<()> {
        init();
        let mut index = TripleIndex::new();
        let [a, b, top] = ["a", "b", "top"].map(|l| index.blank(l));
        index.insert(Triple::new(s(), P, a));
        index.insert(Triple::new(a, P, b));
        index.insert(Triple::new(b, P, Literal::new("leaf")));
        // never an object
        index.insert(Triple::new(top, P, Literal::new("x")));
        check_inlining(&index)?;
        Ok(())
    }

    #[test]
    fn not_a_subject() {
        let mut index = TripleIndex::new();
        let a = index.blank("a");
        index.insert(Triple::new(s(), P, a));
        assert_eq!(Err(Violation::NotASubject("a".to_owned())), check_inlining(&index));
    }

    #[test]
    fn shared() {
        let mut index = TripleIndex::new();
        let a = index.blank("a");
        index.insert(Triple::new(a, P, Literal::new("x")));
        index.insert(Triple::new(s(), P, a));
        index.insert(Triple::new(s(), "http://ex.org/q", a));
        assert_eq!(Err(Violation::SharedBlankNode { label: "a".to_owned(), count: 2 }), check_inlining(&index));
    }

    #[test]
    fn cycle() {
        let mut index = TripleIndex::new();
        let [a, b] = ["a", "b"].map(|l| index.blank(l));
        index.insert(Triple::new(a, P, b));
        index.insert(Triple::new(b, P, a));
        assert_eq!(Err(Violation::Unreachable("a".to_owned())), check_inlining(&index));
        let mut index = TripleIndex::new();
        let a = index.blank("self");
        index.insert(Triple::new(a, P, a));
        assert_eq!(Err(Violation::Unreachable("self".to_owned())), check_inlining(&index));
    }

    #[test]
    fn violation_message() {
        let v = Violation::SharedBlankNode { label: "b3".to_owned(), count: 4 };
        assert_eq!("blank node _:b3 is used as an object 4 times", v.to_string());
    }
}
