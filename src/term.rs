use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// An Internationalized Resource Identifier.
/// IRIs are ordered by their lexical string.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Clone)]
pub struct Iri(Arc<str>);

impl Iri {
    pub fn new(iri: impl Into<Arc<str>>) -> Self {
        Iri(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Iri {
    fn from(iri: &str) -> Self {
        Iri(iri.into())
    }
}

impl Borrow<str> for Iri {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

/// Handle of a blank node inside one [`TripleIndex`](crate::TripleIndex).
/// Two handles are the same blank node if and only if they are equal; handles of different indexes must not be mixed.
/// The synthetic label is available through [`TripleIndex::label`](crate::TripleIndex::label).
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub struct BlankId(pub(crate) usize);

impl BlankId {
    /// Position of the blank node in the label arena of its index.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// RDF Literals always have a lexical form as per
/// [RDF 1.1 Concepts And Abstract Syntax](https://www.w3.org/TR/rdf11-concepts/#dfn-literal).
/// A literal either has a language tag, a datatype, or neither (a plain literal).
/// Language tagged strings do not store their implicit `rdf:langString` datatype.
///
/// Literals are ordered by lexical form first, then plain before language tagged before datatyped,
/// then by language tag and datatype IRI.
///
/// # Examples
/// ```
/// use rdfsort::term::Literal;
/// let plain = Literal::new("abc");
/// let english = Literal::new_lang("abc", "en");
/// let typed = Literal::new_typed("abc", "http://www.w3.org/2001/XMLSchema#string");
/// assert!(plain < english);
/// assert!(english < typed);
/// assert!(plain < Literal::new("abd"));
/// ```
#[derive(PartialEq, Eq, Hash, Clone)]
pub struct Literal {
    lexical: Arc<str>,
    language: Option<Arc<str>>,
    datatype: Option<Iri>,
}

impl Literal {
    /// Create a new plain literal.
    pub fn new(lexical: impl Into<Arc<str>>) -> Self {
        Literal { lexical: lexical.into(), language: None, datatype: None }
    }

    /// Create a new literal with a given lexical form and datatype.
    pub fn new_typed(lexical: impl Into<Arc<str>>, datatype: impl Into<Iri>) -> Self {
        Literal { lexical: lexical.into(), language: None, datatype: Some(datatype.into()) }
    }

    /// Create a new language tagged string.
    pub fn new_lang(lexical: impl Into<Arc<str>>, language: impl Into<Arc<str>>) -> Self {
        Literal { lexical: lexical.into(), language: Some(language.into()), datatype: None }
    }

    pub fn lexical(&self) -> &str {
        &self.lexical
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn datatype(&self) -> Option<&Iri> {
        self.datatype.as_ref()
    }
}

impl Ord for Literal {
    fn cmp(&self, other: &Self) -> Ordering {
        // (has datatype, has language): plain < language tagged < datatyped
        let kind = |l: &Literal| (l.datatype.is_some(), l.language.is_some());
        self.lexical
            .cmp(&other.lexical)
            .then_with(|| kind(self).cmp(&kind(other)))
            .then_with(|| self.language.cmp(&other.language))
            .then_with(|| self.datatype.cmp(&other.datatype))
    }
}

impl PartialOrd for Literal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// There's a custom debug implementation to hide structure tags when printing,
// it saves some screen space that's not needed.
impl fmt::Debug for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(lang) = &self.language {
            write!(f, "\"{}\"@{}", self.lexical, lang)
        } else if let Some(dt) = &self.datatype {
            write!(f, "\"{}\"^^{:?}", self.lexical, dt)
        } else {
            write!(f, "\"{}\"", self.lexical)
        }
    }
}

/// Any RDF term that can be the object of a triple.
#[derive(PartialEq, Eq, Hash, Clone)]
pub enum Value {
    Iri(Iri),
    Blank(BlankId),
    Literal(Literal),
}

impl Value {
    pub const fn is_blank(&self) -> bool {
        matches!(self, Value::Blank(_))
    }

    pub const fn as_blank(&self) -> Option<BlankId> {
        match self {
            Value::Blank(b) => Some(*b),
            _ => None,
        }
    }

    pub const fn as_iri(&self) -> Option<&Iri> {
        match self {
            Value::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Textual form used when values of different kinds are compared:
    /// the IRI string or the lexical form. Blank nodes have none.
    pub fn text(&self) -> Option<&str> {
        match self {
            Value::Iri(iri) => Some(iri.as_str()),
            Value::Literal(lit) => Some(lit.lexical()),
            Value::Blank(_) => None,
        }
    }

    /// The value as a triple subject, if it can be one.
    pub fn to_resource(&self) -> Option<Resource> {
        match self {
            Value::Iri(iri) => Some(Resource::Iri(iri.clone())),
            Value::Blank(b) => Some(Resource::Blank(*b)),
            Value::Literal(_) => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Iri(iri) => iri.fmt(f),
            Value::Blank(b) => write!(f, "_:#{}", b.0),
            Value::Literal(lit) => lit.fmt(f),
        }
    }
}

impl From<Iri> for Value {
    fn from(iri: Iri) -> Self {
        Value::Iri(iri)
    }
}

impl From<BlankId> for Value {
    fn from(b: BlankId) -> Self {
        Value::Blank(b)
    }
}

impl From<Literal> for Value {
    fn from(lit: Literal) -> Self {
        Value::Literal(lit)
    }
}

impl From<Resource> for Value {
    fn from(r: Resource) -> Self {
        match r {
            Resource::Iri(iri) => Value::Iri(iri),
            Resource::Blank(b) => Value::Blank(b),
        }
    }
}

/// RDF subjects can either be IRIs or blank nodes.
#[derive(PartialEq, Eq, Hash, Clone)]
pub enum Resource {
    Iri(Iri),
    Blank(BlankId),
}

impl Resource {
    pub const fn as_blank(&self) -> Option<BlankId> {
        match self {
            Resource::Blank(b) => Some(*b),
            Resource::Iri(_) => None,
        }
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Iri(iri) => iri.fmt(f),
            Resource::Blank(b) => write!(f, "_:#{}", b.0),
        }
    }
}

impl From<Iri> for Resource {
    fn from(iri: Iri) -> Self {
        Resource::Iri(iri)
    }
}

impl From<BlankId> for Resource {
    fn from(b: BlankId) -> Self {
        Resource::Blank(b)
    }
}

/// Represents an RDF triple.
#[derive(PartialEq, Eq, Hash, Clone)]
pub struct Triple {
    pub subject: Resource,
    pub predicate: Iri,
    pub object: Value,
}

impl Triple {
    pub fn new(subject: impl Into<Resource>, predicate: impl Into<Iri>, object: impl Into<Value>) -> Self {
        Triple { subject: subject.into(), predicate: predicate.into(), object: object.into() }
    }
}

impl fmt::Debug for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {:?} {:?} .", self.subject, self.predicate, self.object)
    }
}
