use pretty_assertions::assert_eq;

use super::*;
use crate::style::{Color, StyleFlag};

fn doc(text: &str) -> Document {
    Document::new(text, FormatConfig::default())
}

#[test]
fn toggle_decides_once_for_mixed_ranges() {
    let mut doc = doc("one two three");
    doc.toggle_flag(4..7, StyleFlag::Bold);
    assert!(doc.toggle_flag(0..13, StyleFlag::Bold));
    assert!((0..13).all(|pos| doc.resolve(pos).bold));
    assert_eq!(doc.store().font().len(), 1);

    assert!(doc.toggle_flag(0..13, StyleFlag::Bold));
    assert!((0..13).all(|pos| !doc.resolve(pos).bold));
}

#[test]
fn toggle_keeps_other_bundle_fields() {
    let mut doc = doc("Hello world");
    doc.set_font_family(0..11, "Georgia");
    doc.set_font_size(6..11, 18);
    doc.toggle_flag(0..11, StyleFlag::Italic);

    let left = doc.resolve(0);
    let right = doc.resolve(8);
    assert!(left.italic && right.italic);
    assert_eq!(left.family, "Georgia");
    assert_eq!((left.size, right.size), (11, 18));
}

#[test]
fn bundles_are_exclusive_but_colors_coexist() {
    let blue = Color::rgb(0, 0, 255);
    let mut doc = doc("abcdef");
    doc.apply_color(0..6, ColorChannel::Foreground, Some(blue));
    doc.toggle_flag(0..4, StyleFlag::Bold);
    doc.set_font_size(2..6, 14);

    let ids: Vec<_> = doc.store().font().iter().map(|(range, _)| range).collect();
    assert_eq!(ids, vec![0..2, 2..4, 4..6]);
    assert!(doc.resolve(3).bold);
    assert_eq!(doc.resolve(3).size, 14);
    assert!((0..6).all(|pos| doc.resolve(pos).foreground == Some(blue)));
}

#[test]
fn noop_operations_push_no_record() {
    let mut doc = doc("Hello");
    assert!(!doc.set_font_family(0..5, "Calibri"));
    assert!(!doc.set_font_size(0..5, 11));
    assert!(!doc.set_font_size(0..5, 0));
    assert!(!doc.apply_color(0..5, ColorChannel::Background, None));
    assert!(!doc.clear_formatting(0..5));
    assert!(!doc.toggle_flag(2..2, StyleFlag::Bold));
    assert_eq!(doc.history().undo_len(), 0);
}

#[test]
fn color_undo_restores_only_that_channel() {
    let red = Color::rgb(255, 0, 0);
    let green = Color::rgb(0, 255, 0);
    let mut doc = doc("colorful");
    doc.apply_color(0..4, ColorChannel::Foreground, Some(red));
    doc.apply_color(2..8, ColorChannel::Background, Some(green));
    doc.apply_color(0..8, ColorChannel::Foreground, Some(green));

    assert_eq!(doc.undo(), UndoOutcome::Format);
    assert_eq!(doc.resolve(1).foreground, Some(red));
    assert_eq!(doc.resolve(5).foreground, None);
    assert_eq!(doc.resolve(5).background, Some(green));
}

#[test]
fn alignment_expands_to_whole_lines() {
    let mut doc = doc("first\nsecond\nthird");
    assert!(doc.set_alignment(2..8, Alignment::Center));
    assert_eq!(doc.alignment(0), Some(Alignment::Center));
    assert_eq!(doc.alignment(1), Some(Alignment::Center));
    assert_eq!(doc.alignment(2), None);

    assert!(doc.set_alignment(13..13, Alignment::Right));
    assert_eq!(doc.alignment(2), Some(Alignment::Right));

    assert!(!doc.set_alignment(0..6, Alignment::Center));
}

#[test]
fn alignment_undo_restores_each_line() {
    let mut doc = doc("a\nb\nc\nd");
    doc.set_alignment(0..1, Alignment::Center);
    doc.set_alignment(4..5, Alignment::Right);
    doc.set_alignment(0..7, Alignment::Left);
    assert!((0..4).all(|line| doc.alignment(line) == Some(Alignment::Left)));

    doc.undo();
    let lines: Vec<_> = (0..4).map(|line| doc.alignment(line)).collect();
    assert_eq!(
        lines,
        vec![Some(Alignment::Center), None, Some(Alignment::Right), None]
    );

    doc.redo();
    assert!((0..4).all(|line| doc.alignment(line) == Some(Alignment::Left)));
}

#[test]
fn clear_formatting_drops_alignment_of_lines_starting_inside() {
    let mut doc = doc("ab\ncd\nef");
    doc.set_alignment(0..8, Alignment::Center);
    doc.toggle_flag(0..8, StyleFlag::Underline);

    assert!(doc.clear_formatting(1..6));
    assert_eq!(doc.alignment(0), Some(Alignment::Center));
    assert_eq!(doc.alignment(1), None);
    assert_eq!(doc.alignment(2), Some(Alignment::Center));
    assert!(doc.resolve(0).underline);
    assert!(!doc.resolve(3).underline);
    assert!(doc.resolve(6).underline);

    doc.undo();
    assert_eq!(doc.alignment(1), Some(Alignment::Center));
    assert!((0..8).all(|pos| doc.resolve(pos).underline));
}
