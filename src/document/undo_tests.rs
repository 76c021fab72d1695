use pretty_assertions::assert_eq;

use super::*;
use crate::history::LastAction;
use crate::style::{Color, StyleFlag};

fn doc(text: &str) -> Document {
    Document::new(text, FormatConfig::default())
}

#[test]
fn format_undo_then_text_edit_kills_redo() {
    let mut doc = doc("Hello world");
    let pristine = doc.store().clone();
    doc.toggle_flag(0..5, StyleFlag::Bold);

    assert_eq!(doc.undo(), UndoOutcome::Format);
    assert_eq!(doc.store(), &pristine);
    assert!(doc.can_redo());
    assert_eq!(doc.history().last_action(), LastAction::FormatUndoPending);

    doc.insert_text(11, "!");
    assert!(!doc.can_redo());
    assert_eq!(doc.redo(), UndoOutcome::Empty);
    assert!(!doc.resolve(0).bold);
}

#[test]
fn redo_reapplies_formatting_after_undo() {
    let mut doc = doc("Hello world");
    doc.toggle_flag(0..5, StyleFlag::Bold);
    doc.apply_color(6..11, ColorChannel::Foreground, Some(Color::rgb(255, 0, 0)));

    doc.undo();
    doc.undo();
    assert!(!doc.resolve(0).bold);
    assert_eq!(doc.resolve(7).foreground, None);

    assert_eq!(doc.redo(), UndoOutcome::Format);
    assert!(doc.resolve(0).bold);
    assert_eq!(doc.history().last_action(), LastAction::FormatUndoPending);
    assert_eq!(doc.redo(), UndoOutcome::Format);
    assert_eq!(doc.resolve(7).foreground, Some(Color::rgb(255, 0, 0)));
    assert_eq!(doc.history().last_action(), LastAction::FormatLast);
}

#[test]
fn undo_after_text_edit_undoes_text_first() {
    let mut doc = doc("Hello");
    doc.toggle_flag(0..5, StyleFlag::Italic);
    doc.insert_text(5, " there");

    assert_eq!(doc.undo(), UndoOutcome::Text);
    assert_eq!(doc.text(), "Hello");
    assert!(doc.resolve(0).italic);

    // The italic record is not reachable once text was edited.
    assert_eq!(doc.undo(), UndoOutcome::Empty);
    assert!(doc.resolve(0).italic);
}

#[test]
fn redo_without_format_undo_goes_to_text() {
    let mut doc = doc("");
    doc.insert_text(0, "abc");
    doc.undo();
    doc.toggle_flag(0..0, StyleFlag::Bold);
    assert_eq!(doc.redo(), UndoOutcome::Text);
    assert_eq!(doc.text(), "abc");
}

#[test]
fn text_undo_restores_deleted_formatting() {
    let mut doc = doc("one\ntwo\nthree");
    doc.toggle_flag(2..6, StyleFlag::Bold);
    doc.apply_color(0..13, ColorChannel::Background, Some(Color::rgb(255, 255, 0)));
    doc.set_alignment(4..7, Alignment::Right);
    let before = doc.store().clone();

    assert_eq!(doc.delete(1..9), "ne\ntwo\nt");
    assert_eq!(doc.text(), "ohree");
    assert_eq!(doc.store().line_count(), 1);

    assert_eq!(doc.undo(), UndoOutcome::Text);
    assert_eq!(doc.text(), "one\ntwo\nthree");
    assert_eq!(doc.store(), &before);
}

#[test]
fn text_redo_reapplies_typed_style() {
    let mut doc = doc("ab");
    doc.set_caret(2);
    doc.toggle_flag(2..2, StyleFlag::Underline);
    doc.insert_text(2, "cd");
    let styled = doc.store().clone();

    doc.undo();
    assert_eq!(doc.text(), "ab");
    assert!(doc.store().font().is_empty());

    assert_eq!(doc.redo(), UndoOutcome::Text);
    assert_eq!(doc.text(), "abcd");
    assert_eq!(doc.store(), &styled);
}

#[test]
fn stale_records_are_clipped_to_the_text() {
    let mut doc = doc("Hello world");
    doc.toggle_flag(6..11, StyleFlag::Bold);
    doc.delete(5..11);
    doc.toggle_flag(0..2, StyleFlag::Italic);

    assert_eq!(doc.undo(), UndoOutcome::Format);
    assert_eq!(doc.undo(), UndoOutcome::Format);
    assert_eq!(doc.text(), "Hello");
    assert!(doc.segments(0..5).iter().all(|segment| segment.range.end <= 5));
}

#[test]
fn history_limit_bounds_format_undo() {
    let config = FormatConfig {
        history_limit: Some(1),
        ..FormatConfig::default()
    };
    let mut doc = Document::new("abc", config);
    doc.toggle_flag(0..1, StyleFlag::Bold);
    doc.toggle_flag(1..2, StyleFlag::Bold);

    assert_eq!(doc.undo(), UndoOutcome::Format);
    assert_eq!(doc.undo(), UndoOutcome::Empty);
    assert!(doc.resolve(0).bold);
    assert!(!doc.resolve(1).bold);
}

#[test]
fn empty_history_is_a_noop() {
    let mut doc = doc("text");
    assert!(!doc.can_undo());
    assert_eq!(doc.undo(), UndoOutcome::Empty);
    assert_eq!(doc.redo(), UndoOutcome::Empty);
    assert_eq!(doc.text(), "text");
}
