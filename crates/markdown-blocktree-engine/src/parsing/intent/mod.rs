//! # Intent Model
//!
//! The input side of the block tree builder. Text arrives as an [`AnnotatedText`]:
//! one string plus an ordered sequence of [`Run`]s, each covering a byte range and
//! tagged with a [`PresentationIntent`] (or nothing, for untyped text).
//!
//! A presentation intent is a small set of [`IntentComponent`]s. Each component says
//! one thing about the run ("inside a list", "inside list item 2", "is a paragraph")
//! and carries an `identity`. Identities only order nesting: a larger identity is a
//! deeper component at the same position. They are meaningless across parses.
//!
//! - **`markdown`**: builds an `AnnotatedText` from Markdown source with pulldown-cmark

pub mod markdown;

use std::hash::{Hash, Hasher};
use std::mem::discriminant;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

/// Column description carried by a table intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub alignment: Alignment,
}

/// The semantic tag of one intent component.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IntentKind {
    Paragraph,
    Header { level: u8 },
    CodeBlock { lang_hint: Option<String> },
    ThematicBreak,
    BlockQuote,
    OrderedList,
    UnorderedList,
    ListItem { ordinal: u32 },
    Table { columns: Vec<ColumnSpec> },
    TableHeaderRow,
    TableRow { index: u32 },
    TableCell { column: u32 },
}

impl IntentKind {
    /// Whether this kind produces a block that owns children.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            IntentKind::BlockQuote
                | IntentKind::OrderedList
                | IntentKind::UnorderedList
                | IntentKind::ListItem { .. }
                | IntentKind::Table { .. }
                | IntentKind::TableHeaderRow
                | IntentKind::TableRow { .. }
        )
    }

    pub fn is_list(&self) -> bool {
        matches!(self, IntentKind::OrderedList | IntentKind::UnorderedList)
    }

    /// Short label used in error messages and snapshots.
    pub fn label(&self) -> &'static str {
        match self {
            IntentKind::Paragraph => "paragraph",
            IntentKind::Header { .. } => "header",
            IntentKind::CodeBlock { .. } => "code block",
            IntentKind::ThematicBreak => "thematic break",
            IntentKind::BlockQuote => "block quote",
            IntentKind::OrderedList => "ordered list",
            IntentKind::UnorderedList => "unordered list",
            IntentKind::ListItem { .. } => "list item",
            IntentKind::Table { .. } => "table",
            IntentKind::TableHeaderRow => "table header row",
            IntentKind::TableRow { .. } => "table row",
            IntentKind::TableCell { .. } => "table cell",
        }
    }

    /// Drops parameters that only describe where the component sits (row index,
    /// column index) so equal content hashes equal wherever it appears.
    pub(crate) fn positionless(&self) -> IntentKind {
        match self {
            IntentKind::TableRow { .. } => IntentKind::TableRow { index: 0 },
            IntentKind::TableCell { .. } => IntentKind::TableCell { column: 0 },
            other => other.clone(),
        }
    }
}

/// One layer of structural meaning attached to a run.
///
/// Equality and hashing look at the kind's variant and the identity only, so the
/// same list item is recognised from run to run even though its parameters are
/// carried redundantly on every run.
#[derive(Debug, Clone, Eq)]
pub struct IntentComponent {
    pub kind: IntentKind,
    pub identity: u32,
}

impl IntentComponent {
    pub fn new(kind: IntentKind, identity: u32) -> Self {
        Self { kind, identity }
    }

    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// True if `self` is nested more deeply than `other`.
    pub fn is_deeper_than(&self, other: &IntentComponent) -> bool {
        self.identity > other.identity
    }
}

impl PartialEq for IntentComponent {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity && discriminant(&self.kind) == discriminant(&other.kind)
    }
}

impl Hash for IntentComponent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        discriminant(&self.kind).hash(state);
        self.identity.hash(state);
    }
}

/// The ordered set of intent components attached to one run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresentationIntent {
    components: Vec<IntentComponent>,
}

impl PresentationIntent {
    pub fn new(components: impl IntoIterator<Item = IntentComponent>) -> Self {
        Self {
            components: components.into_iter().collect(),
        }
    }

    pub fn components(&self) -> &[IntentComponent] {
        &self.components
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn contains(&self, component: &IntentComponent) -> bool {
        self.components.contains(component)
    }

    pub fn containers(&self) -> impl Iterator<Item = &IntentComponent> {
        self.components.iter().filter(|c| c.is_container())
    }

    pub fn leaves(&self) -> impl Iterator<Item = &IntentComponent> {
        self.components.iter().filter(|c| !c.is_container())
    }

    /// Components sorted shallow to deep.
    pub(crate) fn by_depth(&self) -> Vec<&IntentComponent> {
        let mut sorted: Vec<_> = self.components.iter().collect();
        sorted.sort_by_key(|c| c.identity);
        sorted
    }
}

impl FromIterator<IntentComponent> for PresentationIntent {
    fn from_iter<T: IntoIterator<Item = IntentComponent>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// A contiguous span of text with its presentation intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    /// Byte range into the owning [`AnnotatedText`].
    pub range: Range<usize>,
    /// `None` for untyped text.
    pub intent: Option<PresentationIntent>,
}

impl Run {
    /// The run's intent, or `None` when it is absent or has no components.
    pub fn typed_intent(&self) -> Option<&PresentationIntent> {
        self.intent.as_ref().filter(|intent| !intent.is_empty())
    }
}

/// Text plus the runs that cover it, in order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnnotatedText {
    text: String,
    runs: Vec<Run>,
}

impl AnnotatedText {
    pub fn builder() -> AnnotatedTextBuilder {
        AnnotatedTextBuilder::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    pub fn run_text(&self, run: &Run) -> &str {
        &self.text[run.range.clone()]
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}

/// Appends runs one after another, keeping ranges contiguous.
#[derive(Debug, Default)]
pub struct AnnotatedTextBuilder {
    text: String,
    runs: Vec<Run>,
}

impl AnnotatedTextBuilder {
    /// Appends a run tagged with the given components.
    pub fn push(
        &mut self,
        text: &str,
        components: impl IntoIterator<Item = IntentComponent>,
    ) -> &mut Self {
        self.push_run(text, Some(PresentationIntent::new(components)))
    }

    /// Appends a run with no presentation intent.
    pub fn push_untyped(&mut self, text: &str) -> &mut Self {
        self.push_run(text, None)
    }

    pub fn push_run(&mut self, text: &str, intent: Option<PresentationIntent>) -> &mut Self {
        let start = self.text.len();
        self.text.push_str(text);
        self.runs.push(Run {
            range: start..self.text.len(),
            intent,
        });
        self
    }

    pub fn finish(&mut self) -> AnnotatedText {
        AnnotatedText {
            text: std::mem::take(&mut self.text),
            runs: std::mem::take(&mut self.runs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn component_equality_ignores_parameters() {
        let a = IntentComponent::new(IntentKind::ListItem { ordinal: 1 }, 4);
        let b = IntentComponent::new(IntentKind::ListItem { ordinal: 2 }, 4);
        let c = IntentComponent::new(IntentKind::BlockQuote, 4);

        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn container_classification() {
        assert!(IntentKind::TableHeaderRow.is_container());
        assert!(IntentKind::ListItem { ordinal: 3 }.is_container());
        assert!(!IntentKind::TableCell { column: 0 }.is_container());
        assert!(!IntentKind::Header { level: 2 }.is_container());
    }

    #[test]
    fn builder_keeps_ranges_contiguous() {
        let text = AnnotatedText::builder()
            .push("Hello", [IntentComponent::new(IntentKind::Paragraph, 1)])
            .push_untyped(" world")
            .finish();

        assert_eq!(text.runs()[0].range, 0..5);
        assert_eq!(text.runs()[1].range, 5..11);
        assert_eq!(text.run_text(&text.runs()[1]), " world");
        assert!(text.runs()[1].intent.is_none());
    }

    #[test]
    fn by_depth_sorts_shallow_first() {
        let intent = PresentationIntent::new([
            IntentComponent::new(IntentKind::Paragraph, 3),
            IntentComponent::new(IntentKind::ListItem { ordinal: 1 }, 2),
            IntentComponent::new(IntentKind::UnorderedList, 1),
        ]);
        let ids: Vec<_> = intent.by_depth().iter().map(|c| c.identity).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }
}
