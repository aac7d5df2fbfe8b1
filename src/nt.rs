//! Canonical N-Triples output of a [`SortedIndex`].
//!
//! *This module is available only if rdfsort is built with the `"sophia"` feature.*
use crate::sorted::SortedIndex;
use crate::term::{BlankId, Iri, Resource, Value};
use crate::vocab::XSD_STRING;
use log::debug;
use mownstr::MownStr;
use sophia::api::serializer::TripleSerializer;
use sophia::api::source::StreamError;
use sophia::api::term::{BnodeId, LanguageTag, SimpleTerm};
use sophia::iri::IriRef;
use sophia::turtle::serializer::nt::NtSerializer;
use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Instant;

impl SortedIndex {
    /// Write one line per triple in canonical order, blank nodes relabeled `_:b0`, `_:b1`, ….
    /// # Example
    /// ```
    /// use rdfsort::{Options, SortedIndex, TripleIndex};
    /// use rdfsort::term::{Iri, Literal, Triple};
    /// let mut index = TripleIndex::new();
    /// let b = index.blank("x");
    /// index.insert(Triple::new(b, "http://ex.org/name", Literal::new("Ann")));
    /// index.insert(Triple::new(Iri::from("http://ex.org/s"), "http://ex.org/knows", b));
    /// let mut out = Vec::new();
    /// SortedIndex::build(&index, &Options::default()).unwrap().write_nt(&mut out).unwrap();
    /// assert_eq!(
    ///     "<http://ex.org/s> <http://ex.org/knows> _:b0.\n_:b0 <http://ex.org/name> \"Ann\".\n",
    ///     String::from_utf8(out).unwrap()
    /// );
    /// ```
    pub fn write_nt(&self, w: &mut impl Write) -> io::Result<()> {
        let timer = Instant::now();
        let labels = self.canonical_labels();
        let mut graph: Vec<[SimpleTerm<'_>; 3]> = Vec::with_capacity(self.len());
        for s in self.subjects() {
            let subject = match &s.subject {
                Resource::Iri(iri) => iri_term(iri),
                Resource::Blank(b) => blank_term(&labels, *b),
            };
            for p in &s.predicates {
                for o in &p.objects {
                    graph.push([subject.clone(), iri_term(&p.predicate), value_term(&labels, o)]);
                }
            }
        }
        NtSerializer::new(w).serialize_graph(&graph).map_err(|e| match e {
            StreamError::SourceError(never) => match never {},
            StreamError::SinkError(e) => e,
        })?;
        debug!("wrote {} triples as N-Triples in {:?}", self.len(), timer.elapsed());
        Ok(())
    }
}

fn iri_term(iri: &Iri) -> SimpleTerm<'_> {
    SimpleTerm::Iri(IriRef::new_unchecked(MownStr::from_ref(iri.as_str())))
}

/// Blank node with its canonical label, or `n` and its index if it has none.
fn blank_term(labels: &HashMap<BlankId, String>, b: BlankId) -> SimpleTerm<'_> {
    let label = labels.get(&b).map_or_else(|| MownStr::from(format!("n{}", b.index())), |l| MownStr::from_ref(l));
    SimpleTerm::BlankNode(BnodeId::new_unchecked(label))
}

fn value_term<'a>(labels: &'a HashMap<BlankId, String>, value: &'a Value) -> SimpleTerm<'a> {
    match value {
        Value::Iri(iri) => iri_term(iri),
        Value::Blank(b) => blank_term(labels, *b),
        Value::Literal(lit) => {
            let lexical = MownStr::from_ref(lit.lexical());
            match lit.language() {
                Some(tag) => SimpleTerm::LiteralLanguage(lexical, LanguageTag::new_unchecked(MownStr::from_ref(tag))),
                None => {
                    let datatype = lit.datatype().map_or(XSD_STRING, Iri::as_str);
                    SimpleTerm::LiteralDatatype(lexical, IriRef::new_unchecked(MownStr::from_ref(datatype)))
                }
            }
        }
    }
}
