use std::fmt::Write;

use crate::parsing::blocks::{Block, BlockKind, Document};
use crate::parsing::intent::Alignment;

#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Prefix every line with the block's short id.
    pub ids: bool,
}

/// Renders the tree without ids.
pub fn format_tree(document: &Document) -> String {
    format_tree_with(document, FormatOptions::default())
}

pub fn format_tree_with(document: &Document, options: FormatOptions) -> String {
    let mut out = String::new();
    document.root().walk(&mut |block, depth| {
        line(&mut out, block, depth, options);
    });
    out
}

fn line(out: &mut String, block: &Block, depth: usize, options: FormatOptions) {
    for _ in 0..depth {
        out.push_str("  ");
    }
    if options.ids {
        let _ = write!(out, "[{}] ", block.id());
    }
    out.push_str(block.kind().name());
    out.push_str(&attributes(block.kind()));
    out.push('\n');
}

fn attributes(kind: &BlockKind) -> String {
    match kind {
        BlockKind::Document { .. } | BlockKind::ThematicBreak => String::new(),
        BlockKind::Paragraph {
            text,
            is_untyped: true,
        } => format!("(untyped) {text:?}"),
        BlockKind::Paragraph { text, .. } => format!(" {text:?}"),
        BlockKind::Header(header) => format!("({}) {:?}", header.level, header.text),
        BlockKind::Code(code) => match &code.lang_hint {
            Some(hint) => format!("({hint}) {:?}", code.text),
            None => format!(" {:?}", code.text),
        },
        BlockKind::Blockquote {
            is_outermost: true, ..
        } => "(outermost)".to_string(),
        BlockKind::Blockquote { .. } => String::new(),
        BlockKind::List(list) => {
            let order = if list.is_ordered { "ordered" } else { "unordered" };
            format!("({order}, level {})", list.nesting_level)
        }
        BlockKind::ListItem { ordinal, .. } => format!("({ordinal})"),
        BlockKind::Table(table) => {
            let columns: Vec<_> = table.column_alignments.iter().map(alignment).collect();
            format!("({})", columns.join(", "))
        }
        BlockKind::TableRow {
            is_header: true, ..
        } => "(header)".to_string(),
        BlockKind::TableRow { .. } => String::new(),
        BlockKind::TableCell {
            is_filler: true, ..
        } => "(filler)".to_string(),
        BlockKind::TableCell { text, .. } => format!(" {text:?}"),
    }
}

fn alignment(alignment: &Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::Parser;

    #[test]
    fn ids_are_optional() {
        let document = Parser::default().parse("hello").unwrap();
        let plain = format_tree(&document);
        let with_ids = format_tree_with(&document, FormatOptions { ids: true });

        assert_eq!(plain, "Document\n  Paragraph \"hello\"\n");
        let child = &document.children()[0];
        assert!(with_ids.contains(&format!("  [{}] Paragraph", child.id())));
    }
}
