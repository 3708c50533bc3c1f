use super::*;
use crate::error::MentionError;

fn span(query: &str, range: Range<usize>) -> MentionSpan {
    MentionSpan {
        query: query.to_string(),
        range,
    }
}

#[test]
fn test_locate_lone_trigger_is_empty_query() {
    assert_eq!(locate("@", None), Some(span("", 0..1)));
}

#[test]
fn test_locate_trailing_run() {
    assert_eq!(locate("hello @al", None), Some(span("al", 6..9)));
}

#[test]
fn test_locate_closed_by_space() {
    assert_eq!(locate("hello @al world", None), None);
    assert_eq!(locate("hello @al ", None), None);
}

#[test]
fn test_locate_closed_by_full_width_space() {
    assert_eq!(locate("こんにちは @たなか\u{3000}", None), None);
}

#[test]
fn test_locate_closed_by_newline_and_tab() {
    assert_eq!(locate("@al\n", None), None);
    assert_eq!(locate("@al\tx", None), None);
}

#[test]
fn test_locate_without_trigger() {
    assert_eq!(locate("", None), None);
    assert_eq!(locate("plain text", None), None);
}

#[test]
fn test_locate_anchors_on_last_trigger() {
    // An earlier finished mention does not hide a new one.
    assert_eq!(locate("@bob hi @ca", None), Some(span("ca", 8..11)));
    // The last trigger decides even when an earlier one would match.
    assert_eq!(locate("@bob @ca x", None), None);
}

#[test]
fn test_locate_trigger_inside_word() {
    assert_eq!(locate("mail me@ex", None), Some(span("ex", 7..10)));
}

#[test]
fn test_locate_respects_boundary() {
    assert_eq!(locate("hi @bob ", Some(8)), None);
    // Trigger exactly at the boundary is suppressed too.
    assert_eq!(locate("hi @bob", Some(3)), None);
    // A trigger typed past the boundary reopens suggestions.
    assert_eq!(locate("hi @bob x @c", Some(8)), Some(span("c", 10..12)));
}

#[test]
fn test_trigger_right_at_boundary_stays_closed() {
    // The first byte after an accepted mention is the boundary itself.
    assert_eq!(locate("hi @bob @c", Some(8)), None);
    assert_eq!(locate("hi @bob @c", None), Some(span("c", 8..10)));
}

#[test]
fn test_locate_multibyte_query() {
    let text = "こんにちは @たな";
    let found = locate(text, None).unwrap();
    assert_eq!(found.query, "たな");
    assert_eq!(&text[found.range.clone()], "@たな");
    assert_eq!(found.char_range(text), Some(6..9));
    assert_eq!(found.utf16_range(text), Some(6..9));
}

#[test]
fn test_utf16_range_with_astral_chars() {
    let text = "😀 @ab";
    let found = locate(text, None).unwrap();
    assert_eq!(found.range, 5..8);
    assert_eq!(found.char_range(text), Some(2..5));
    assert_eq!(found.utf16_range(text), Some(3..6));
}

#[test]
fn test_apply_round_trip() {
    let text = "hi @b";
    let found = locate(text, None).unwrap();
    let replaced = apply(text, &found, "bob").unwrap();

    assert_eq!(replaced.text, "hi @bob ");
    assert_eq!(replaced.cursor, 8);
    assert_eq!(locate(&replaced.text, Some(replaced.cursor)), None);
}

#[test]
fn test_apply_empty_query() {
    let found = locate("@", None).unwrap();
    let replaced = apply("@", &found, "alice").unwrap();
    assert_eq!(replaced.text, "@alice ");
    assert_eq!(replaced.cursor, 7);
}

#[test]
fn test_apply_multibyte_display() {
    let text = "cc @ta";
    let found = locate(text, None).unwrap();
    let replaced = apply(text, &found, "田中").unwrap();
    assert_eq!(replaced.text, "cc @田中 ");
    assert_eq!(replaced.cursor, replaced.text.len());
}

#[test]
fn test_apply_rejects_out_of_bounds() {
    let err = apply("hi", &span("b", 3..5), "bob").unwrap_err();
    assert!(matches!(
        err,
        MentionError::Span(SpanError::InvalidRange {
            start: 3,
            end: 5,
            len: 2
        })
    ));
}

#[test]
fn test_apply_rejects_text_grown_after_locate() {
    let found = locate("hi @b", None).unwrap();
    let err = apply("hi @bo", &found, "bob").unwrap_err();
    assert!(matches!(err, MentionError::Span(SpanError::InvalidRange { .. })));
}

#[test]
fn test_apply_rejects_edited_query() {
    let found = locate("hi @bo", None).unwrap();
    let err = apply("hi @ca", &found, "bob").unwrap_err();
    assert!(matches!(err, MentionError::Span(SpanError::StaleSpan { .. })));
}

#[test]
fn test_apply_rejects_split_char() {
    // Range ends inside a multi-byte scalar.
    let found = span("", 0..1);
    assert!(!found.is_valid_for("é"));
    assert!(apply("é", &found, "x").is_err());
}

#[test]
fn test_token_includes_trigger() {
    assert_eq!(span("al", 0..3).token(), "@al");
}

#[test]
fn test_second_mention_needs_a_character_past_boundary() {
    assert_eq!(locate("@john @", Some(6)), None);
    assert_eq!(locate("@john x @", Some(6)), Some(span("", 8..9)));
}
