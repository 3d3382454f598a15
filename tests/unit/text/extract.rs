use super::*;

#[test]
fn strips_tags_and_collapses_whitespace() {
    let text = extract_text("<html><body><p>Hello   world</p>\n<p>again</p></body></html>");
    assert_eq!(text.as_str(), "Hello world again");
}

#[test]
fn tags_act_as_word_separators() {
    // No whitespace between the elements themselves.
    let text = extract_text("<p>one</p><p>two</p>");
    assert_eq!(text.as_str(), "one two");
}

#[test]
fn markup_only_input_yields_empty_narration() {
    assert!(extract_text("<html><head></head><body></body></html>").is_empty());
    assert!(extract_text("").is_empty());
    assert!(extract_text("   \n\t  ").is_empty());
}

#[test]
fn unterminated_tag_is_dropped_to_end_of_input() {
    let text = extract_text("before <a href=\"x");
    assert_eq!(text.as_str(), "before");
}

#[test]
fn bare_gt_outside_tags_is_kept() {
    let text = extract_text("a > b");
    assert_eq!(text.as_str(), "a > b");
}

#[test]
fn attributes_and_nested_tags_are_removed() {
    let text = extract_text("<div class=\"a\" data-x=\"1>\">text <b>bold</b> tail</div>");
    // The quoted `>` still terminates the tag scan; this stripper does not
    // parse attribute values.
    assert_eq!(text.as_str(), "\">text bold tail");
}

#[test]
fn plain_constructor_normalizes_but_keeps_markupish_text() {
    let text = NarrationText::from_plain("  keep   this  ");
    assert_eq!(text.as_str(), "keep this");
    assert_eq!(text.word_count(), 2);
}

#[test]
fn word_count_matches_whitespace_splits() {
    let text = extract_text("<p>one two  three</p>");
    assert_eq!(text.word_count(), 3);
}

#[test]
fn serde_round_trips_narration() {
    let text = extract_text("<p>hi there</p>");
    let json = serde_json::to_string(&text).unwrap();
    let back: NarrationText = serde_json::from_str(&json).unwrap();
    assert_eq!(back, text);
}
