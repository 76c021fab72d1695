use proptest::prelude::*;

use super::*;

fn doc(text: &str) -> Document {
    Document::new(text, FormatConfig::default())
}

#[test]
fn bullet_item_continues_and_exits_on_enter() {
    let mut doc = doc("Item one");
    assert!(doc.toggle_bullet_list(0..0));
    assert_eq!(doc.text(), "• Item one");
    assert_eq!(doc.list_marker(0), ListMarker::Bullet);

    let caret = doc.insert_line_break(doc.len());
    assert_eq!(doc.text(), "• Item one\n• ");
    assert_eq!(caret, doc.len());
    assert_eq!(doc.list_marker(1), ListMarker::Bullet);

    doc.insert_line_break(caret);
    assert_eq!(doc.text(), "• Item one\n\n");
    assert_eq!(doc.list_marker(1), ListMarker::None);
    assert_eq!(doc.line_text(1), "");
    assert_eq!(doc.caret(), doc.len());
}

#[test]
fn numbered_items_continue_with_the_next_number() {
    let mut doc = doc("  7. seven");
    doc.insert_line_break(doc.len());
    assert_eq!(doc.text(), "  7. seven\n  8. ");
    assert_eq!(doc.list_marker(1), ListMarker::Numbered(8));
}

#[test]
fn enter_in_the_middle_of_an_item_splits_it() {
    let mut doc = doc("• abcd");
    doc.insert_line_break(4);
    assert_eq!(doc.text(), "• ab\n• cd");
}

#[test]
fn enter_on_plain_line_inserts_bare_break() {
    let mut doc = doc("plain");
    doc.insert_line_break(5);
    assert_eq!(doc.text(), "plain\n");
}

#[test]
fn numbering_skips_blank_lines_and_converts_bullets() {
    let mut doc = doc("alpha\n\nbeta\n• gamma\n\t9. delta");
    let len = doc.len();
    assert!(doc.toggle_numbered_list(0..len));
    assert_eq!(doc.text(), "1. alpha\n\n2. beta\n3. gamma\n\t4. delta");

    let len = doc.len();
    assert!(doc.toggle_numbered_list(0..len));
    assert_eq!(doc.text(), "alpha\n\nbeta\ngamma\n\tdelta");
}

#[test]
fn bullets_replace_numbers() {
    let mut doc = doc("1. one\n2. two");
    assert!(doc.toggle_bullet_list(0..13));
    assert_eq!(doc.text(), "• one\n• two");
}

#[test]
fn list_toggle_is_a_single_text_undo_step() {
    let mut doc = doc("a\nb\nc");
    doc.toggle_bullet_list(0..5);
    assert_eq!(doc.text(), "• a\n• b\n• c");
    assert_eq!(doc.undo(), UndoOutcome::Text);
    assert_eq!(doc.text(), "a\nb\nc");
    assert_eq!(doc.redo(), UndoOutcome::Text);
    assert_eq!(doc.text(), "• a\n• b\n• c");
}

#[test]
fn blank_selection_is_left_alone() {
    let mut doc = doc("\n  \n");
    assert!(!doc.toggle_bullet_list(0..4));
    assert_eq!(doc.text(), "\n  \n");
}

proptest! {
    #[test]
    fn toggling_bullets_twice_restores_lines(
        lines in prop::collection::vec("( {0,2}[a-z]{1,6})?", 1..8),
        start in 0usize..80,
        end in 0usize..80,
    ) {
        let text = lines.join("\n");
        let mut doc = doc(&text);
        let range = start.min(end)..start.max(end);
        let touched = doc.line_span(range.clone());

        doc.toggle_bullet_list(range);
        let again = doc.line_range(touched.start).start..doc.line_range(touched.end - 1).end;
        doc.toggle_bullet_list(again);
        prop_assert_eq!(doc.text(), text);
    }
}
