//! Build a [`TripleIndex`] from any [Sophia](https://docs.rs/sophia) graph.
//!
//! *This module is available only if rdfsort is built with the `"sophia"` feature.*
use crate::index::TripleIndex;
use crate::term::{Iri, Literal, Resource, Triple, Value};
use crate::vocab::XSD_STRING;
use log::debug;
use mownstr::MownStr;
use sophia::api::graph::Graph;
use sophia::api::term::{Term, TermKind};
use sophia::api::triple::Triple as _;
use std::sync::Arc;
use std::time::Instant;

pub type Result<T> = core::result::Result<T, Error>;

/// The error type for [`TripleIndex::from_graph`].
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("unsupported {kind:?} term as {position}")]
    UnsupportedTerm { kind: TermKind, position: &'static str },
    #[error("failed to read triples from the source graph")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TripleIndex {
    /// Copy all triples of a Sophia graph, keeping the order in which the graph yields them.
    /// Blank node labels become the synthetic labels of the index.
    /// # Example
    /// ```
    /// use sophia::api::prelude::*;
    /// use sophia::api::term::SimpleTerm;
    /// let ttl = "@prefix : <http://ex.org/>. :s :p [ :q \"x\" ].";
    /// let graph: Vec<[SimpleTerm<'static>; 3]> =
    ///     sophia::turtle::parser::turtle::parse_str(ttl).collect_triples().unwrap();
    /// let index = rdfsort::TripleIndex::from_graph(&graph).unwrap();
    /// assert_eq!(2, index.len());
    /// ```
    pub fn from_graph<G: Graph>(graph: &G) -> Result<Self>
    where
        G::Error: Send + Sync,
    {
        let timer = Instant::now();
        let mut index = TripleIndex::new();
        for t in graph.triples() {
            let t = t.map_err(|e| Error::Source(Box::new(e)))?;
            let subject = match index.term_value(t.s(), "subject")? {
                Value::Iri(iri) => Resource::Iri(iri),
                Value::Blank(b) => Resource::Blank(b),
                Value::Literal(_) => return Err(Error::UnsupportedTerm { kind: TermKind::Literal, position: "subject" }),
            };
            let predicate = match index.term_value(t.p(), "predicate")? {
                Value::Iri(iri) => iri,
                other => {
                    let kind = if other.is_blank() { TermKind::BlankNode } else { TermKind::Literal };
                    return Err(Error::UnsupportedTerm { kind, position: "predicate" });
                }
            };
            let object = index.term_value(t.o(), "object")?;
            index.insert(Triple { subject, predicate, object });
        }
        debug!("read {} triples from graph in {:?}", index.len(), timer.elapsed());
        Ok(index)
    }

    fn term_value<T: Term>(&mut self, t: T, position: &'static str) -> Result<Value> {
        let kind = t.kind();
        let unsupported = || Error::UnsupportedTerm { kind, position };
        match kind {
            TermKind::Iri => t.iri().map(|iri| Value::Iri(Iri::new(iri.as_str()))).ok_or_else(unsupported),
            TermKind::BlankNode => t.bnode_id().map(|id| Value::Blank(self.blank(id.as_str()))).ok_or_else(unsupported),
            TermKind::Literal => {
                let lexical = mown2arc(t.lexical_form().ok_or_else(unsupported)?);
                if let Some(tag) = t.language_tag() {
                    return Ok(Value::Literal(Literal::new_lang(lexical, tag.as_str())));
                }
                // xsd:string is the implicit datatype of plain literals
                Ok(Value::Literal(match t.datatype() {
                    Some(dt) if dt.as_str() != XSD_STRING => Literal::new_typed(lexical, Iri::new(dt.as_str())),
                    _ => Literal::new(lexical),
                }))
            }
            _ => Err(unsupported()),
        }
    }
}

fn mown2arc(m: MownStr) -> Arc<str> {
    Box::<str>::from(m).into()
}
