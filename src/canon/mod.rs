//! The canonical comparison engine.
//!
//! All orderings are methods of [`Context`], which bundles the read-only [`TripleIndex`] with the [`Options`]
//! of one canonicalization run. The orderings are mutually recursive through blank nodes:
//! values → blank nodes → predicate maps → object lists → values.
//! A [`Visited`] set is threaded through every recursive call to break cycles.
use crate::index::TripleIndex;
use crate::term::{BlankId, Value};
use std::cmp::Ordering;
use std::collections::HashSet;

mod base;
mod bnode;
mod lists;
mod memo;

pub use bnode::SortedPredicates;
pub use memo::{ResourceComparator, TreeMemo};

/// Values accepted as `rdf:first` members when recognizing collections.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MemberConstraint {
    #[default]
    Any,
    Iri,
    Literal,
}

impl MemberConstraint {
    pub const fn accepts(self, value: &Value) -> bool {
        match self {
            MemberConstraint::Any => true,
            MemberConstraint::Iri => matches!(value, Value::Iri(_)),
            MemberConstraint::Literal => matches!(value, Value::Literal(_)),
        }
    }
}

/// What to do when inlining is requested for a graph that cannot be inlined faithfully.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InlineViolation {
    /// Return the violation as an error.
    #[default]
    Fail,
    /// Log a warning and sort without inlining.
    FallBack,
}

/// Configuration of one canonicalization run.
///
/// # Example
/// ```
/// use rdfsort::canon::{MemberConstraint, Options};
/// let options = Options::new().with_inline_blank_nodes(true).with_collection_members(MemberConstraint::Iri);
/// assert!(options.inline_blank_nodes);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Blank nodes are serialized nested at their point of use.
    /// Structurally equal blank nodes then compare equal, otherwise their labels break the tie.
    pub inline_blank_nodes: bool,
    /// Constraint on collection members.
    pub collection_members: MemberConstraint,
    pub on_inline_violation: InlineViolation,
    /// Cache top-level blank node comparisons. Never changes results.
    pub memoize: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            inline_blank_nodes: false,
            collection_members: MemberConstraint::Any,
            on_inline_violation: InlineViolation::Fail,
            memoize: true,
        }
    }
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_inline_blank_nodes(mut self, inline: bool) -> Self {
        self.inline_blank_nodes = inline;
        self
    }

    #[must_use]
    pub fn with_collection_members(mut self, constraint: MemberConstraint) -> Self {
        self.collection_members = constraint;
        self
    }

    #[must_use]
    pub fn with_inline_violation(mut self, policy: InlineViolation) -> Self {
        self.on_inline_violation = policy;
        self
    }

    #[must_use]
    pub fn with_memoize(mut self, memoize: bool) -> Self {
        self.memoize = memoize;
        self
    }
}

/// Immutable state shared by all comparators of one run.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    index: &'a TripleIndex,
    options: &'a Options,
    tree: Option<&'a TreeMemo>,
}

impl<'a> Context<'a> {
    pub const fn new(index: &'a TripleIndex, options: &'a Options) -> Self {
        Context { index, options, tree: None }
    }

    /// Compare each blank node pair in its own scope and share results through `memo`.
    /// Only for an index that passed [`check_inlining`](crate::inline::check_inlining) with inlining enabled:
    /// a cycle would not terminate.
    pub(crate) const fn with_tree_memo(mut self, memo: &'a TreeMemo) -> Self {
        self.tree = Some(memo);
        self
    }

    pub const fn index(&self) -> &'a TripleIndex {
        self.index
    }

    pub const fn options(&self) -> &'a Options {
        self.options
    }
}

/// Blank nodes whose comparison is in progress on the current call stack.
/// A visited blank node is excluded: it compares as the minimum and is not expanded again.
#[derive(Debug, Default)]
pub struct Visited(HashSet<BlankId>);

impl Visited {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, b: BlankId) -> bool {
        self.0.contains(&b)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn excludes(&self, value: &Value) -> bool {
        value.as_blank().is_some_and(|b| self.contains(b))
    }

    fn enter(&mut self, x: BlankId, y: BlankId) {
        self.0.insert(x);
        self.0.insert(y);
    }

    fn leave(&mut self, x: BlankId, y: BlankId) {
        self.0.remove(&x);
        self.0.remove(&y);
    }
}

/// Order of two values of which at least one is excluded, `None` if neither is.
/// Excluded values are equal to each other and less than anything else.
const fn excluded_order(a: bool, b: bool) -> Option<Ordering> {
    match (a, b) {
        (true, true) => Some(Ordering::Equal),
        (true, false) => Some(Ordering::Less),
        (false, true) => Some(Ordering::Greater),
        (false, false) => None,
    }
}

/// Stable bottom-up merge sort that never panics, even if `cmp` is not a total order.
pub(crate) fn sort_canonical<T>(items: impl IntoIterator<Item = T>, mut cmp: impl FnMut(&T, &T) -> Ordering) -> Vec<T> {
    let mut runs: Vec<Vec<T>> = items.into_iter().map(|item| vec![item]).collect();
    while runs.len() > 1 {
        let mut merged = Vec::with_capacity(runs.len().div_ceil(2));
        let mut pairs = runs.into_iter();
        while let Some(left) = pairs.next() {
            merged.push(match pairs.next() {
                Some(right) => merge(left, right, &mut cmp),
                None => left,
            });
        }
        runs = merged;
    }
    runs.pop().unwrap_or_default()
}

/// Merge two sorted runs, taking from `left` on ties.
fn merge<T>(left: Vec<T>, right: Vec<T>, cmp: &mut impl FnMut(&T, &T) -> Ordering) -> Vec<T> {
    let mut out = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    loop {
        let from_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => cmp(l, r).is_gt(),
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };
        out.extend(if from_right { right.next() } else { left.next() });
    }
    out
}
