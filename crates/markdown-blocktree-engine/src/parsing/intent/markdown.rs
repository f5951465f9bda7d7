//! Markdown → [`AnnotatedText`] using pulldown-cmark.
//!
//! Every leaf block (paragraph, heading, code block, table cell, thematic break)
//! becomes exactly one run. The run's components are the leaf itself plus every
//! container it sits in, innermost first. Identities are handed out in document
//! order, so a nested component always has a larger identity than its ancestors.
//!
//! Inline markup is flattened to its text. Soft and hard breaks become `\n`. An
//! empty list item gets an empty paragraph run so the item is not lost.

use pulldown_cmark::{CodeBlockKind, Event, Parser as CmarkParser, Tag, TagEnd};

use super::{
    Alignment, AnnotatedText, AnnotatedTextBuilder, ColumnSpec, IntentComponent, IntentKind,
    PresentationIntent,
};
use crate::parsing::options::ParserOptions;

/// Converts Markdown source into an intent-tagged run sequence.
pub fn annotate(markdown: &str, options: &ParserOptions) -> AnnotatedText {
    let mut annotator = Annotator::default();
    for event in CmarkParser::new_ext(markdown, options.cmark_options()) {
        annotator.event(event);
    }
    annotator.finish()
}

#[derive(Default)]
struct Annotator {
    out: AnnotatedTextBuilder,
    /// Open components, shallow to deep.
    stack: Vec<IntentComponent>,
    next_identity: u32,
    /// Next ordinal for each open list.
    ordinals: Vec<u32>,
    /// Next body row index for each open table.
    rows: Vec<u32>,
    /// Whether each open list item has produced a run yet.
    items: Vec<bool>,
    next_column: u32,
    leaf: Option<String>,
    /// The open leaf was started for bare text in a tight list item.
    implicit: bool,
}

impl Annotator {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) | Event::Code(text) | Event::Html(text) | Event::InlineHtml(text) => {
                self.text(&text)
            }
            Event::SoftBreak | Event::HardBreak => self.text("\n"),
            Event::Rule => {
                self.begin_leaf(IntentKind::ThematicBreak);
                self.end_leaf();
            }
            Event::TaskListMarker(checked) => self.text(if checked { "[x] " } else { "[ ] " }),
            Event::FootnoteReference(label) => self.text(&format!("[^{label}]")),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph | Tag::HtmlBlock => self.begin_leaf(IntentKind::Paragraph),
            Tag::Heading { level, .. } => self.begin_leaf(IntentKind::Header {
                level: level as u8,
            }),
            Tag::CodeBlock(kind) => {
                let lang_hint = match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().map(String::from),
                    CodeBlockKind::Indented => None,
                };
                self.begin_leaf(IntentKind::CodeBlock { lang_hint });
            }
            Tag::BlockQuote(_) => self.open(IntentKind::BlockQuote),
            Tag::List(start) => {
                let kind = if start.is_some() {
                    IntentKind::OrderedList
                } else {
                    IntentKind::UnorderedList
                };
                self.open(kind);
                self.ordinals.push(start.map_or(1, |s| s as u32));
            }
            Tag::Item => {
                let ordinal = match self.ordinals.last_mut() {
                    Some(next) => {
                        *next += 1;
                        *next - 1
                    }
                    None => 1,
                };
                self.open(IntentKind::ListItem { ordinal });
                self.items.push(false);
            }
            Tag::Table(alignments) => {
                let columns = alignments
                    .iter()
                    .map(|a| ColumnSpec {
                        alignment: match a {
                            pulldown_cmark::Alignment::Center => Alignment::Center,
                            pulldown_cmark::Alignment::Right => Alignment::Right,
                            pulldown_cmark::Alignment::Left | pulldown_cmark::Alignment::None => {
                                Alignment::Left
                            }
                        },
                    })
                    .collect();
                self.open(IntentKind::Table { columns });
                self.rows.push(0);
            }
            Tag::TableHead => {
                self.open(IntentKind::TableHeaderRow);
                self.next_column = 0;
            }
            Tag::TableRow => {
                let index = match self.rows.last_mut() {
                    Some(next) => {
                        *next += 1;
                        *next - 1
                    }
                    None => 0,
                };
                self.open(IntentKind::TableRow { index });
                self.next_column = 0;
            }
            Tag::TableCell => {
                let column = self.next_column;
                self.next_column += 1;
                self.begin_leaf(IntentKind::TableCell { column });
            }
            // Inline tags: their text flows into the enclosing leaf.
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph
            | TagEnd::Heading(_)
            | TagEnd::CodeBlock
            | TagEnd::HtmlBlock
            | TagEnd::TableCell => self.end_leaf(),
            TagEnd::BlockQuote(_) | TagEnd::TableHead | TagEnd::TableRow => self.close(),
            TagEnd::Item => {
                self.end_implicit();
                if self.items.pop() == Some(false) {
                    self.begin_leaf(IntentKind::Paragraph);
                    self.end_leaf();
                }
                self.close();
            }
            TagEnd::List(_) => {
                self.close();
                self.ordinals.pop();
            }
            TagEnd::Table => {
                self.close();
                self.rows.pop();
            }
            _ => {}
        }
    }

    fn open(&mut self, kind: IntentKind) {
        self.end_implicit();
        self.push_component(kind);
    }

    fn close(&mut self) {
        self.end_implicit();
        self.stack.pop();
    }

    fn push_component(&mut self, kind: IntentKind) {
        self.next_identity += 1;
        self.stack.push(IntentComponent::new(kind, self.next_identity));
    }

    fn begin_leaf(&mut self, kind: IntentKind) {
        self.end_implicit();
        self.push_component(kind);
        self.leaf = Some(String::new());
    }

    fn end_leaf(&mut self) {
        let Some(text) = self.leaf.take() else {
            return;
        };
        let intent: PresentationIntent = self.stack.iter().rev().cloned().collect();
        self.out.push_run(&text, Some(intent));
        self.stack.pop();
        self.implicit = false;
        self.items.fill(true);
    }

    fn end_implicit(&mut self) {
        if self.implicit {
            self.end_leaf();
        }
    }

    fn text(&mut self, text: &str) {
        if self.leaf.is_none() {
            self.begin_leaf(IntentKind::Paragraph);
            self.implicit = true;
        }
        if let Some(leaf) = self.leaf.as_mut() {
            leaf.push_str(text);
        }
    }

    fn finish(mut self) -> AnnotatedText {
        self.end_implicit();
        self.out.finish()
    }
}
