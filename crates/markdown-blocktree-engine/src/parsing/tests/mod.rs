//! Tests for the parsing module as a whole.
//!
//! Hand-built run sequences exercise the tree builder directly; Markdown sources
//! go through the pulldown-cmark producer first. Every parsed document is also run
//! through the snapshot invariant checks.

mod structure;

use crate::parsing::{
    AnnotatedText, Document, IntentComponent, IntentKind, ParseError, Parser, snapshot,
};

fn component(kind: IntentKind, identity: u32) -> IntentComponent {
    IntentComponent::new(kind, identity)
}

fn parse_runs(parser: &mut Parser, text: &AnnotatedText) -> Result<Document, ParseError> {
    let document = parser.parse_annotated(text)?;
    snapshot::invariants(&document);
    Ok(document)
}

fn parse_markdown(parser: &mut Parser, markdown: &str) -> Document {
    let document = parser.parse(markdown).unwrap();
    snapshot::invariants(&document);
    document
}
