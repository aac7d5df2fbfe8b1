use super::{Context, Visited, excluded_order};
use crate::term::{Iri, Literal, Resource, Value};
use std::cmp::Ordering;

impl Context<'_> {
    /// Lexical order of IRIs.
    pub fn compare_iri(&self, a: &Iri, b: &Iri) -> Ordering {
        a.cmp(b)
    }

    /// Lexical form, then plain before language tagged before datatyped, then language tag, then datatype.
    pub fn compare_literal(&self, a: &Literal, b: &Literal) -> Ordering {
        a.cmp(b)
    }

    /// Total order over values.
    /// Excluded blank nodes come first, other blank nodes come after every IRI and literal.
    pub fn compare_value(&self, a: &Value, b: &Value, visited: &mut Visited) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        if let Some(order) = excluded_order(visited.excludes(a), visited.excludes(b)) {
            return order;
        }
        match (a, b) {
            (Value::Blank(x), Value::Blank(y)) => self.compare_bnode(*x, *y, visited),
            (Value::Blank(_), _) => Ordering::Greater,
            (_, Value::Blank(_)) => Ordering::Less,
            (Value::Literal(x), Value::Literal(y)) => self.compare_literal(x, y),
            (Value::Iri(x), Value::Iri(y)) => self.compare_iri(x, y),
            // an IRI and a literal with the same text: the IRI first
            _ => a.text().cmp(&b.text()).then_with(|| b.as_iri().is_some().cmp(&a.as_iri().is_some())),
        }
    }

    /// IRIs before blank nodes, excluded blank nodes before both. Structurally equal blank nodes
    /// are ordered by label, so that distinct blank nodes never collapse in a sorted collection.
    pub fn compare_resource(&self, a: &Resource, b: &Resource, visited: &mut Visited) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let excluded = |r: &Resource| r.as_blank().is_some_and(|x| visited.contains(x));
        if let Some(order) = excluded_order(excluded(a), excluded(b)) {
            return order;
        }
        match (a, b) {
            (Resource::Iri(x), Resource::Iri(y)) => self.compare_iri(x, y),
            (Resource::Iri(_), Resource::Blank(_)) => Ordering::Less,
            (Resource::Blank(_), Resource::Iri(_)) => Ordering::Greater,
            (Resource::Blank(x), Resource::Blank(y)) => {
                self.compare_bnode(*x, *y, visited).then_with(|| self.compare_labels(*x, *y))
            }
        }
    }
}
