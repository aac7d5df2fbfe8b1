use super::{Context, Visited};
use crate::term::{BlankId, Resource, Value};
use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Resource order of one canonicalization run with a cache of blank node pair results.
/// Every miss is computed with a fresh [`Visited`] set, so a cached result is exactly
/// what the uncached comparison returns and the cache never changes the order.
pub struct ResourceComparator<'a> {
    context: Context<'a>,
    cache: HashMap<(BlankId, BlankId), Ordering>,
    hits: usize,
    misses: usize,
}

impl fmt::Debug for ResourceComparator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} cached blank node pairs, {} hits, {} misses", self.cache.len(), self.hits, self.misses)
    }
}

impl<'a> ResourceComparator<'a> {
    pub fn new(context: Context<'a>) -> Self {
        ResourceComparator { context, cache: HashMap::new(), hits: 0, misses: 0 }
    }

    pub const fn context(&self) -> Context<'a> {
        self.context
    }

    /// Top-level resource comparison, see [`Context::compare_resource`].
    pub fn compare(&mut self, a: &Resource, b: &Resource) -> Ordering {
        let (Resource::Blank(x), Resource::Blank(y)) = (a, b) else {
            return self.context.compare_resource(a, b, &mut Visited::new());
        };
        if x == y || !self.context.options().memoize {
            return self.context.compare_resource(a, b, &mut Visited::new());
        }
        if let Some(order) = self.cache.get(&(*x, *y)) {
            self.hits += 1;
            return *order;
        }
        self.misses += 1;
        let order = self.context.compare_resource(a, b, &mut Visited::new());
        self.cache.insert((*x, *y), order);
        order
    }

    /// Top-level value comparison. Blank node pairs go through the cache and are tie-broken by label.
    pub fn compare_values(&mut self, a: &Value, b: &Value) -> Ordering {
        match (a, b) {
            (Value::Blank(x), Value::Blank(y)) => self.compare(&Resource::Blank(*x), &Resource::Blank(*y)),
            _ => self.context.compare_value(a, b, &mut Visited::new()),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Number of cached blank node pairs.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Shared blank node results for a graph whose blank nodes form a forest,
/// as guaranteed by [`check_inlining`](crate::inline::check_inlining).
///
/// Without cycles every pair is compared in its own scope, so the result of a pair and the sorted
/// object lists of a node do not depend on where they are reached and are computed once per run.
#[derive(Default)]
pub struct TreeMemo {
    pairs: RefCell<HashMap<(BlankId, BlankId), Ordering>>,
    object_orders: RefCell<HashMap<BlankId, Rc<[Vec<usize>]>>>,
    hits: Cell<usize>,
}

impl fmt::Debug for TreeMemo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cached blank node pairs, {} sorted nodes, {} hits",
            self.pairs.borrow().len(),
            self.object_orders.borrow().len(),
            self.hits.get()
        )
    }
}

impl TreeMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Order of the blank node pair, computed by `compare` unless cached.
    pub(super) fn pair(&self, x: BlankId, y: BlankId, store: bool, compare: impl FnOnce() -> Ordering) -> Ordering {
        let cached = self.pairs.borrow().get(&(x, y)).copied();
        if let Some(order) = cached {
            self.hits.set(self.hits.get() + 1);
            return order;
        }
        let order = compare();
        if store {
            let mut pairs = self.pairs.borrow_mut();
            pairs.insert((x, y), order);
            pairs.insert((y, x), order.reverse());
        }
        order
    }

    /// Per predicate, the positions of the node's objects in canonical order, computed by `sort` unless cached.
    pub(super) fn object_orders(
        &self, node: BlankId, store: bool, sort: impl FnOnce() -> Vec<Vec<usize>>,
    ) -> Rc<[Vec<usize>]> {
        let cached = self.object_orders.borrow().get(&node).cloned();
        if let Some(orders) = cached {
            self.hits.set(self.hits.get() + 1);
            return orders;
        }
        let orders: Rc<[Vec<usize>]> = sort().into();
        if store {
            self.object_orders.borrow_mut().insert(node, Rc::clone(&orders));
        }
        orders
    }

    pub fn hits(&self) -> usize {
        self.hits.get()
    }

    /// Number of cached blank node pairs, each in both directions.
    pub fn len(&self) -> usize {
        self.pairs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.borrow().is_empty()
    }
}
