use super::{Context, Visited};
use crate::term::{Iri, Value};
use std::cmp::Ordering;

impl Context<'_> {
    /// Lexicographic order of two value sequences, a strict prefix comes first.
    /// Sequences are compared as given, collection members in list order.
    pub fn compare_object_lists(&self, a: &[&Value], b: &[&Value], visited: &mut Visited) -> Ordering {
        for (x, y) in a.iter().zip(b) {
            let order = self.compare_value(x, y, visited);
            if order.is_ne() {
                return order;
            }
        }
        a.len().cmp(&b.len())
    }

    /// Order of two predicate maps sorted by predicate.
    /// Walks both in step, comparing predicates first and then their object lists.
    /// Without inlining, blank node objects do not take part in the comparison.
    /// If one map runs out of predicates first, it comes first.
    pub fn compare_predicate_maps(
        &self, a: &[(&Iri, Vec<&Value>)], b: &[(&Iri, Vec<&Value>)], visited: &mut Visited,
    ) -> Ordering {
        let inline = self.options.inline_blank_nodes;
        for ((pa, oa), (pb, ob)) in a.iter().zip(b) {
            let order = self.compare_iri(pa, pb);
            if order.is_ne() {
                return order;
            }
            let order = self.compare_object_lists(&comparable(oa, inline), &comparable(ob, inline), visited);
            if order.is_ne() {
                return order;
            }
        }
        a.len().cmp(&b.len())
    }
}

fn comparable<'v>(objects: &[&'v Value], inline: bool) -> Vec<&'v Value> {
    if inline { objects.to_vec() } else { objects.iter().copied().filter(|o| !o.is_blank()).collect() }
}
