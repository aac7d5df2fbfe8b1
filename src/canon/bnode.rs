use super::{Context, Visited, excluded_order, sort_canonical};
use crate::term::{BlankId, Iri, Value};
use crate::vocab::{RDF_FIRST, RDF_NIL, RDF_REST, RDF_TYPE};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Predicate → object list map of one blank node, ordered by predicate.
pub type SortedPredicates<'a> = Vec<(&'a Iri, Vec<&'a Value>)>;

impl<'a> Context<'a> {
    /// Whether the blank node heads a well-formed RDF collection.
    /// Evaluated on every call by walking the `rdf:rest` chain.
    pub fn is_collection(&self, node: BlankId) -> bool {
        self.collection_members(node).is_some()
    }

    /// Members of the collection headed by `node` in list order, `None` if it is no collection node.
    ///
    /// Each node of the chain may only use `rdf:first`, `rdf:rest` and `rdf:type`,
    /// must have exactly one `rdf:rest` object, which is `rdf:nil` or the next node,
    /// and all of its `rdf:first` objects must be accepted by the configured member constraint.
    pub fn collection_members(&self, node: BlankId) -> Option<Vec<&'a Value>> {
        let constraint = self.options.collection_members;
        let mut members = Vec::new();
        let mut seen = HashSet::new();
        let mut current = node;
        loop {
            if !seen.insert(current) {
                // rdf:rest cycle, never reaches rdf:nil
                return None;
            }
            let mut rest = None;
            for (predicate, objects) in self.index.blank_predicates(current)? {
                match predicate.as_str() {
                    RDF_FIRST => {
                        if !objects.iter().all(|o| constraint.accepts(o)) {
                            return None;
                        }
                        members.extend(objects);
                    }
                    RDF_REST => match objects.as_slice() {
                        [next] => rest = Some(next),
                        _ => return None,
                    },
                    RDF_TYPE => {}
                    _ => return None,
                }
            }
            match rest? {
                Value::Iri(iri) if iri.as_str() == RDF_NIL => return Some(members),
                Value::Blank(next) => current = *next,
                _ => return None,
            }
        }
    }

    /// Canonical order of two blank nodes.
    ///
    /// Blank nodes that are visited or never a subject are excluded and come first.
    /// Collections come before other blank nodes and are compared member by member in list order.
    /// Other blank nodes are compared by their predicate maps.
    /// Both nodes are visited while their content is compared, so cycles back to them terminate.
    /// Without inlining, structurally equal nodes are ordered by label.
    /// With a [`TreeMemo`](super::TreeMemo), the pair is compared in its own scope and its result is shared.
    pub fn compare_bnode(&self, x: BlankId, y: BlankId, visited: &mut Visited) -> Ordering {
        if x == y {
            return Ordering::Equal;
        }
        let excluded = |b: BlankId, visited: &Visited| visited.contains(b) || self.index.blank_predicates(b).is_none();
        if let Some(order) = excluded_order(excluded(x, visited), excluded(y, visited)) {
            return order;
        }
        match self.tree {
            Some(tree) => tree.pair(x, y, self.options.memoize, || self.compare_content(x, y, &mut Visited::new())),
            None => self.compare_content(x, y, visited),
        }
    }

    fn compare_content(&self, x: BlankId, y: BlankId, visited: &mut Visited) -> Ordering {
        let structural = match (self.collection_members(x), self.collection_members(y)) {
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (Some(mx), Some(my)) => {
                visited.enter(x, y);
                let order = self.compare_object_lists(&mx, &my, visited);
                visited.leave(x, y);
                order
            }
            (None, None) => {
                visited.enter(x, y);
                let mx = self.sorted_predicates(x, visited);
                let my = self.sorted_predicates(y, visited);
                let order = self.compare_predicate_maps(&mx, &my, visited);
                visited.leave(x, y);
                order
            }
        };
        if structural == Ordering::Equal && !self.options.inline_blank_nodes {
            return self.compare_labels(x, y);
        }
        structural
    }

    /// The predicate map of a blank node with each object list sorted in the current visited context.
    /// Without inlining, blank node objects are not compared with each other and keep their relative order.
    /// With a [`TreeMemo`](super::TreeMemo), the lists are sorted once in an empty context.
    pub fn sorted_predicates(&self, node: BlankId, visited: &mut Visited) -> SortedPredicates<'a> {
        let Some(predicates) = self.index.blank_predicates(node) else {
            return Vec::new();
        };
        if let Some(tree) = self.tree {
            let orders = tree.object_orders(node, self.options.memoize, || {
                let visited = &mut Visited::new();
                predicates
                    .values()
                    .map(|objects| {
                        sort_canonical(0..objects.len(), |&i, &j| self.compare_value(&objects[i], &objects[j], visited))
                    })
                    .collect()
            });
            return predicates
                .iter()
                .zip(orders.iter())
                .map(|((predicate, objects), order)| (predicate, order.iter().map(|&i| &objects[i]).collect()))
                .collect();
        }
        let inline = self.options.inline_blank_nodes;
        predicates
            .iter()
            .map(|(predicate, objects)| {
                let sorted = sort_canonical(objects, |a, b| {
                    if !inline && a.is_blank() && b.is_blank() {
                        Ordering::Equal
                    } else {
                        self.compare_value(a, b, visited)
                    }
                });
                (predicate, sorted)
            })
            .collect()
    }

    /// Order of synthetic labels, the tie-break between distinct but structurally equal blank nodes.
    pub fn compare_labels(&self, x: BlankId, y: BlankId) -> Ordering {
        self.index.label(x).cmp(self.index.label(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::{MemberConstraint, Options};
    use crate::index::TripleIndex;
    use crate::term::{Literal, Resource, Triple};
    use crate::tests::init;
    use pretty_assertions::assert_eq;

    const P: &str = "http://ex.org/p";
    const Q: &str = "http://ex.org/q";

    fn iri(s: &str) -> Value {
        Value::Iri(Iri::from(s))
    }

    /// Adds the collection `( members )` and returns its head.
    fn list(index: &mut TripleIndex, name: &str, members: &[Value]) -> BlankId {
        let nodes: Vec<BlankId> = (0..members.len()).map(|i| index.blank(&format!("{name}{i}"))).collect();
        for (i, member) in members.iter().enumerate() {
            index.insert(Triple::new(nodes[i], RDF_FIRST, member.clone()));
            let rest = nodes.get(i + 1).map_or_else(|| iri(RDF_NIL), |n| Value::Blank(*n));
            index.insert(Triple::new(nodes[i], RDF_REST, rest));
        }
        nodes[0]
    }

    #[test]
    fn collection_keeps_list_order() {
        init();
        let mut index = TripleIndex::new();
        let members = [iri("http://ex.org/C"), iri("http://ex.org/A"), iri("http://ex.org/B")];
        let head = list(&mut index, "l", &members);
        let second = index.blank("l1");
        let options = Options::default();
        let ctx = Context::new(&index, &options);
        let flattened: Vec<Value> = ctx.collection_members(head).unwrap_or_default().into_iter().cloned().collect();
        assert_eq!(members.to_vec(), flattened);
        // every suffix is a collection too
        assert!(ctx.is_collection(second));
    }

    #[test]
    fn malformed_collections() {
        let mut index = TripleIndex::new();
        // no rdf:rest
        let a = index.blank("a");
        index.insert(Triple::new(a, RDF_FIRST, iri("http://ex.org/x")));
        // extra predicate
        let b = list(&mut index, "b", &[iri("http://ex.org/x")]);
        index.insert(Triple::new(b, P, iri("http://ex.org/y")));
        // rdf:rest loop
        let c = index.blank("c");
        index.insert(Triple::new(c, RDF_FIRST, iri("http://ex.org/x")));
        index.insert(Triple::new(c, RDF_REST, c));
        // two rdf:rest objects
        let d = index.blank("d");
        index.insert(Triple::new(d, RDF_REST, iri(RDF_NIL)));
        index.insert(Triple::new(d, RDF_REST, iri(RDF_NIL)));
        // rdf:rest to a node that is never a subject
        let e = index.blank("e");
        let dangling = index.blank("dangling");
        index.insert(Triple::new(e, RDF_REST, dangling));
        let options = Options::default();
        let ctx = Context::new(&index, &options);
        for node in [a, b, c, d, e, dangling] {
            assert!(!ctx.is_collection(node), "{} must not be a collection", index.label(node));
        }
    }

    #[test]
    fn member_constraint_and_type() {
        let mut index = TripleIndex::new();
        let lits = list(&mut index, "lit", &[Value::Literal(Literal::new("x"))]);
        index.insert(Triple::new(lits, RDF_TYPE, iri("http://www.w3.org/1999/02/22-rdf-syntax-ns#List")));
        let options = Options::default();
        assert!(Context::new(&index, &options).is_collection(lits));
        let options = Options::new().with_collection_members(MemberConstraint::Iri);
        assert!(!Context::new(&index, &options).is_collection(lits));
    }

    #[test]
    fn collections_sort_first() {
        let mut index = TripleIndex::new();
        let coll = list(&mut index, "l", &[iri("http://ex.org/z")]);
        let plain = index.blank("plain");
        index.insert(Triple::new(plain, P, iri("http://ex.org/a")));
        for inline in [false, true] {
            let options = Options::new().with_inline_blank_nodes(inline);
            let ctx = Context::new(&index, &options);
            let visited = &mut Visited::new();
            assert_eq!(Ordering::Less, ctx.compare_bnode(coll, plain, visited));
            assert_eq!(Ordering::Greater, ctx.compare_bnode(plain, coll, visited));
        }
    }

    #[test]
    fn collections_compare_by_members() {
        let mut index = TripleIndex::new();
        let ab = list(&mut index, "ab", &[iri("http://ex.org/a"), iri("http://ex.org/b")]);
        let ba = list(&mut index, "ba", &[iri("http://ex.org/b"), iri("http://ex.org/a")]);
        let a = list(&mut index, "a", &[iri("http://ex.org/a")]);
        let options = Options::new().with_inline_blank_nodes(true);
        let ctx = Context::new(&index, &options);
        let visited = &mut Visited::new();
        assert_eq!(Ordering::Less, ctx.compare_bnode(ab, ba, visited));
        // prefix first
        assert_eq!(Ordering::Less, ctx.compare_bnode(a, ab, visited));
        assert!(visited.is_empty());
    }

    #[test]
    fn self_reference_terminates() {
        let mut index = TripleIndex::new();
        let x = index.blank("x");
        let y = index.blank("y");
        index.insert(Triple::new(x, P, x));
        index.insert(Triple::new(y, P, y));
        for inline in [false, true] {
            let options = Options::new().with_inline_blank_nodes(inline);
            let ctx = Context::new(&index, &options);
            let visited = &mut Visited::new();
            assert_eq!(Ordering::Equal, ctx.compare_bnode(x, x, visited));
            let xy = ctx.compare_bnode(x, y, visited);
            let yx = ctx.compare_bnode(y, x, visited);
            assert_eq!(xy, yx.reverse());
            if inline {
                assert_eq!(Ordering::Equal, xy);
            } else {
                assert_eq!(Ordering::Less, xy);
            }
            assert_eq!(
                Ordering::Equal,
                ctx.compare_resource(&Resource::Blank(x), &Resource::Blank(x), visited)
            );
        }
    }

    #[test]
    fn mutual_cycle_terminates() {
        let mut index = TripleIndex::new();
        let [a, b, c, d] = ["a", "b", "c", "d"].map(|l| index.blank(l));
        index.insert(Triple::new(a, P, b));
        index.insert(Triple::new(b, P, a));
        index.insert(Triple::new(c, P, d));
        index.insert(Triple::new(d, P, c));
        index.insert(Triple::new(d, Q, Literal::new("d")));
        let options = Options::new().with_inline_blank_nodes(true);
        let ctx = Context::new(&index, &options);
        let visited = &mut Visited::new();
        // a has one predicate, d has two
        assert_eq!(Ordering::Less, ctx.compare_bnode(a, d, visited));
        assert_eq!(Ordering::Greater, ctx.compare_bnode(d, a, visited));
        assert_eq!(ctx.compare_bnode(a, c, visited), ctx.compare_bnode(c, a, visited).reverse());
        assert!(visited.is_empty());
    }

    #[test]
    fn collection_containing_itself_terminates() {
        let mut index = TripleIndex::new();
        let x = index.blank("x");
        let y = index.blank("y");
        for n in [x, y] {
            index.insert(Triple::new(n, RDF_FIRST, n));
            index.insert(Triple::new(n, RDF_REST, iri(RDF_NIL)));
        }
        let options = Options::new().with_inline_blank_nodes(true);
        let ctx = Context::new(&index, &options);
        assert!(ctx.is_collection(x));
        assert_eq!(Ordering::Equal, ctx.compare_bnode(x, y, &mut Visited::new()));
    }

    #[test]
    fn tie_break_without_inlining() {
        let mut index = TripleIndex::new();
        let b2 = index.blank("b2");
        let b1 = index.blank("b1");
        for n in [b1, b2] {
            index.insert(Triple::new(n, P, Literal::new("same")));
        }
        let options = Options::default();
        let ctx = Context::new(&index, &options);
        for _ in 0..3 {
            assert_eq!(Ordering::Less, ctx.compare_bnode(b1, b2, &mut Visited::new()));
            assert_eq!(Ordering::Greater, ctx.compare_bnode(b2, b1, &mut Visited::new()));
        }
    }

    #[test]
    fn blank_objects_ignored_without_inlining() {
        let mut index = TripleIndex::new();
        let [x, y, cx, cy] = ["x", "y", "cx", "cy"].map(|l| index.blank(l));
        index.insert(Triple::new(x, P, cx));
        index.insert(Triple::new(y, P, cy));
        index.insert(Triple::new(cx, Q, Literal::new("b")));
        index.insert(Triple::new(cy, Q, Literal::new("a")));
        // without inlining the children do not count and the labels decide
        let options = Options::default();
        let ctx = Context::new(&index, &options);
        assert_eq!(Ordering::Less, ctx.compare_bnode(x, y, &mut Visited::new()));
        // with inlining y's child "a" < x's child "b"
        let options = Options::new().with_inline_blank_nodes(true);
        let ctx = Context::new(&index, &options);
        assert_eq!(Ordering::Greater, ctx.compare_bnode(x, y, &mut Visited::new()));
    }

    #[test]
    fn object_order_is_irrelevant() {
        let mut index = TripleIndex::new();
        let x = index.blank("x");
        let y = index.blank("y");
        for o in ["1", "2", "3"] {
            index.insert(Triple::new(x, P, Literal::new(o)));
        }
        for o in ["3", "1", "2"] {
            index.insert(Triple::new(y, P, Literal::new(o)));
        }
        let options = Options::new().with_inline_blank_nodes(true);
        let ctx = Context::new(&index, &options);
        let visited = &mut Visited::new();
        assert_eq!(Ordering::Equal, ctx.compare_bnode(x, y, visited));
        let predicates = ctx.sorted_predicates(y, visited);
        let sorted: Vec<_> = predicates[0].1.iter().filter_map(|v| v.text()).collect();
        assert_eq!(vec!["1", "2", "3"], sorted);
    }

    #[test]
    fn subject_less_blank_nodes_are_minimal() {
        let mut index = TripleIndex::new();
        let ghost = index.blank("ghost");
        let x = index.blank("x");
        index.insert(Triple::new(x, P, Literal::new("x")));
        let options = Options::default();
        let ctx = Context::new(&index, &options);
        assert_eq!(Ordering::Less, ctx.compare_bnode(ghost, x, &mut Visited::new()));
        assert_eq!(Ordering::Greater, ctx.compare_bnode(x, ghost, &mut Visited::new()));
    }
}
