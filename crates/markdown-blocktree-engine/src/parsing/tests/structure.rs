use pretty_assertions::assert_eq;

use super::{component, parse_markdown, parse_runs};
use crate::parsing::{
    Alignment, AnnotatedText, BlockKind, ColumnSpec, IntentComponent, IntentKind, Parser,
    format_tree,
};

#[test]
fn single_paragraph_round_trips() {
    let text = AnnotatedText::builder()
        .push("hello", [component(IntentKind::Paragraph, 1)])
        .finish();

    let document = parse_runs(&mut Parser::default(), &text).unwrap();

    assert_eq!(document.children().len(), 1);
    let BlockKind::Paragraph { text, is_untyped } = document.children()[0].kind() else {
        panic!("expected a paragraph");
    };
    assert_eq!(text, "hello");
    assert!(!is_untyped);
}

#[test]
fn paragraphs_sharing_a_list_item_nest_together() {
    let list = component(IntentKind::UnorderedList, 1);
    let item = component(IntentKind::ListItem { ordinal: 1 }, 2);
    let text = AnnotatedText::builder()
        .push(
            "a",
            [component(IntentKind::Paragraph, 3), item.clone(), list.clone()],
        )
        .push("b", [component(IntentKind::Paragraph, 4), item, list])
        .finish();

    let document = parse_runs(&mut Parser::default(), &text).unwrap();

    assert_eq!(
        format_tree(&document),
        "Document\n  List(unordered, level 1)\n    ListItem(1)\n      Paragraph \"a\"\n      Paragraph \"b\"\n"
    );
}

#[test]
fn sibling_list_items_get_their_ordinals() {
    let document = parse_markdown(&mut Parser::default(), "3. x\n4. y");
    let BlockKind::List(list) = document.children()[0].kind() else {
        panic!("expected a list");
    };
    let ordinals: Vec<_> = list.items().map(|(ordinal, _)| ordinal).collect();
    assert_eq!(ordinals, vec![3, 4]);
    assert_eq!(list.decorator(4).marker(), "4.");
}

#[test]
fn nested_blockquote_is_not_outermost() {
    let document = parse_markdown(&mut Parser::default(), "> a\n>\n> > b");
    assert_eq!(
        format_tree(&document),
        "Document\n  Blockquote(outermost)\n    Paragraph \"a\"\n    Blockquote\n      Paragraph \"b\"\n"
    );
}

#[test]
fn short_table_rows_are_padded() {
    let columns = vec![ColumnSpec::default(); 3];
    let table = || component(IntentKind::Table { columns: columns.clone() }, 1);
    let header = component(IntentKind::TableHeaderRow, 2);
    let body = component(IntentKind::TableRow { index: 0 }, 6);

    let mut builder = AnnotatedText::builder();
    for (column, text) in ["a", "b", "c"].into_iter().enumerate() {
        builder.push(
            text,
            [
                component(IntentKind::TableCell { column: column as u32 }, 3 + column as u32),
                header.clone(),
                table(),
            ],
        );
    }
    builder.push(
        "1",
        [
            component(IntentKind::TableCell { column: 0 }, 7),
            body,
            table(),
        ],
    );
    let text = builder.finish();

    let document = parse_runs(&mut Parser::default(), &text).unwrap();
    assert_eq!(
        format_tree(&document),
        "Document\n  Table(left, left, left)\n    TableRow(header)\n      TableCell \"a\"\n      TableCell \"b\"\n      TableCell \"c\"\n    TableRow\n      TableCell \"1\"\n      TableCell(filler)\n      TableCell(filler)\n"
    );

    let again = parse_runs(&mut Parser::default(), &text).unwrap();
    let BlockKind::Table(first) = document.children()[0].kind() else {
        panic!("expected a table");
    };
    let BlockKind::Table(second) = again.children()[0].kind() else {
        panic!("expected a table");
    };
    assert_eq!(first.row_count(), 2);
    assert_eq!(first.column_count(), 3);
    for column in 1..3 {
        assert_eq!(
            first.cell(1, column).unwrap().id(),
            second.cell(1, column).unwrap().id()
        );
    }
}

#[test]
fn table_alignments_come_from_the_delimiter_row() {
    let document = parse_markdown(
        &mut Parser::default(),
        "| a | b | c |\n|:--|:-:|--:|\n| 1 | 2 | 3 |",
    );
    let BlockKind::Table(table) = document.children()[0].kind() else {
        panic!("expected a table");
    };
    assert_eq!(
        table.column_alignments,
        vec![Alignment::Left, Alignment::Center, Alignment::Right]
    );
    assert!(table.header().is_some());

    let row = &table.rows()[1];
    let cell = table.cell(1, 2).unwrap();
    let position = table.cell_position(row.id(), cell.id()).unwrap();
    assert_eq!((position.row, position.column), (1, 2));
}

#[test]
fn untyped_runs_join_the_innermost_container() {
    let quote = component(IntentKind::BlockQuote, 1);
    let text = AnnotatedText::builder()
        .push("q", [component(IntentKind::Paragraph, 2), quote])
        .push_untyped(" tail")
        .push("after", [component(IntentKind::Paragraph, 3)])
        .finish();

    let document = parse_runs(&mut Parser::default(), &text).unwrap();
    assert_eq!(
        format_tree(&document),
        "Document\n  Blockquote(outermost)\n    Paragraph \"q\"\n    Paragraph(untyped) \" tail\"\n  Paragraph \"after\"\n"
    );
}

#[test]
fn untyped_run_between_list_items_stays_in_the_first_item() {
    let list = || component(IntentKind::UnorderedList, 1);
    let text = AnnotatedText::builder()
        .push(
            "a",
            [
                component(IntentKind::Paragraph, 3),
                component(IntentKind::ListItem { ordinal: 1 }, 2),
                list(),
            ],
        )
        .push_untyped("~")
        .push(
            "b",
            [
                component(IntentKind::Paragraph, 5),
                component(IntentKind::ListItem { ordinal: 2 }, 4),
                list(),
            ],
        )
        .finish();

    let document = parse_runs(&mut Parser::default(), &text).unwrap();
    assert_eq!(
        format_tree(&document),
        "Document\n  List(unordered, level 1)\n    ListItem(1)\n      Paragraph \"a\"\n      Paragraph(untyped) \"~\"\n    ListItem(2)\n      Paragraph \"b\"\n"
    );
}

#[test]
fn untyped_run_inside_a_table_row_becomes_a_cell() {
    let table = component(IntentKind::Table { columns: vec![ColumnSpec::default(); 2] }, 1);
    let header = component(IntentKind::TableHeaderRow, 2);
    let body = component(IntentKind::TableRow { index: 0 }, 5);
    let cell = |column: u32, identity: u32, row: &IntentComponent| {
        [
            component(IntentKind::TableCell { column }, identity),
            row.clone(),
            table.clone(),
        ]
    };
    let text = AnnotatedText::builder()
        .push("a", cell(0, 3, &header))
        .push_untyped(" | ")
        .push("b", cell(1, 4, &header))
        .push("1", cell(0, 6, &body))
        .push("2", cell(1, 7, &body))
        .finish();

    let document = parse_runs(&mut Parser::default(), &text).unwrap();
    assert_eq!(
        format_tree(&document),
        "Document\n  Table(left, left)\n    TableRow(header)\n      TableCell \"a\"\n      TableCell \" | \"\n      TableCell \"b\"\n    TableRow\n      TableCell \"1\"\n      TableCell \"2\"\n"
    );

    let BlockKind::Table(table) = document.children()[0].kind() else {
        panic!("expected a table");
    };
    assert_eq!(table.column_count(), 2);
    let header_row = table.header().unwrap();
    let b = table.cell(0, 2).unwrap();
    let position = table.cell_position(header_row.id(), b.id()).unwrap();
    assert_eq!((position.row, position.column), (0, 2));
}

#[test]
fn empty_intent_is_treated_as_untyped() {
    let quote = || component(IntentKind::BlockQuote, 1);
    let empty = AnnotatedText::builder()
        .push("q", [component(IntentKind::Paragraph, 2), quote()])
        .push("x", Vec::<IntentComponent>::new())
        .finish();
    let untyped = AnnotatedText::builder()
        .push("q", [component(IntentKind::Paragraph, 2), quote()])
        .push_untyped("x")
        .finish();

    let document = parse_runs(&mut Parser::default(), &empty).unwrap();
    assert_eq!(
        format_tree(&document),
        "Document\n  Blockquote(outermost)\n    Paragraph \"q\"\n    Paragraph(untyped) \"x\"\n"
    );
    assert_eq!(document, parse_runs(&mut Parser::default(), &untyped).unwrap());
}

#[test]
fn empty_intent_does_not_cut_a_reused_subtree_short() {
    let text = |title: &str| {
        AnnotatedText::builder()
            .push(title, [component(IntentKind::Header { level: 1 }, 1)])
            .push(
                "q",
                [
                    component(IntentKind::Paragraph, 3),
                    component(IntentKind::BlockQuote, 2),
                ],
            )
            .push("x", Vec::<IntentComponent>::new())
            .finish()
    };

    let mut parser = Parser::default();
    let first = parse_runs(&mut parser, &text("A")).unwrap();
    let second = parse_runs(&mut parser, &text("B")).unwrap();

    assert_eq!(parser.last_stats().subtree_hits, 1);
    assert_eq!(parser.last_stats().runs_skipped, 2);
    assert!(second.children()[1].shares_node(&first.children()[1]));
}

#[test]
fn untyped_only_input_is_a_flat_document() {
    let text = AnnotatedText::builder().push_untyped("plain").finish();
    let document = parse_runs(&mut Parser::default(), &text).unwrap();
    assert_eq!(format_tree(&document), "Document\n  Paragraph(untyped) \"plain\"\n");
}

#[test]
fn empty_list_item_keeps_its_place() {
    let document = parse_markdown(&mut Parser::default(), "-\n- b");
    assert_eq!(
        format_tree(&document),
        "Document\n  List(unordered, level 1)\n    ListItem(1)\n      Paragraph \"\"\n    ListItem(2)\n      Paragraph \"b\"\n"
    );
}

#[test]
fn empty_input_is_an_empty_document() {
    let document = parse_markdown(&mut Parser::default(), "");
    assert!(document.is_empty());
}

#[test]
fn leaf_attributes_survive() {
    let document = parse_markdown(&mut Parser::default(), "## Sub\n\n```sh\nls\n```\n\n***");
    let kinds: Vec<_> = document.children().iter().map(|b| b.kind().clone()).collect();

    let BlockKind::Header(header) = &kinds[0] else {
        panic!("expected a header");
    };
    assert_eq!((header.level, header.text.as_str()), (2, "Sub"));
    assert!(header.has_divider_below());

    let BlockKind::Code(code) = &kinds[1] else {
        panic!("expected code");
    };
    assert_eq!(code.lang_hint.as_deref(), Some("sh"));
    assert_eq!(code.text, "ls");

    assert_eq!(kinds[2], BlockKind::ThematicBreak);
}
