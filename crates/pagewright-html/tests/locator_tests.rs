//! Integration tests for the tag depth locator.

use pagewright_html::{MarkupError, TagPattern, locate_matching_close};
use quickcheck_macros::quickcheck;

fn div() -> TagPattern {
    TagPattern::element("div").unwrap()
}

/// `depth` nested divs, each wrapping a span so unrelated tags sit between
/// every pair of div tokens.
fn nested(depth: usize) -> String {
    let mut doc = String::new();
    for _ in 0..depth {
        doc.push_str("<div><span>");
    }
    for _ in 0..depth {
        doc.push_str("</span></div>");
    }
    doc
}

#[test]
fn test_single_element() {
    let doc = "<div>hello</div> trailing";
    assert_eq!(locate_matching_close(doc, 0, &div()).unwrap(), 16);
}

#[test]
fn test_outer_open_finds_outer_close() {
    let doc = r#"<div id="a"><div id="b"></div></div><div id="c"></div>"#;
    let end = locate_matching_close(doc, 0, &div()).unwrap();
    assert_eq!(&doc[..end], r#"<div id="a"><div id="b"></div></div>"#);
}

#[test]
fn test_inner_open_finds_inner_close() {
    let doc = r#"<div id="a"><div id="b"></div></div>"#;
    let inner = doc.find(r#"<div id="b""#).unwrap();
    let end = locate_matching_close(doc, inner, &div()).unwrap();
    assert_eq!(&doc[inner..end], r#"<div id="b"></div>"#);
}

#[test]
fn test_other_element_kinds_do_not_perturb_depth() {
    let doc = "<div><section><div></div></section><p></div></p></div>";
    // The `</div>` inside `<p>` still counts: only div tokens matter.
    let end = locate_matching_close(doc, 0, &div()).unwrap();
    assert_eq!(&doc[..end], "<div><section><div></div></section><p></div>");
}

#[test]
fn test_scan_starts_mid_document() {
    let doc = "prefix <div>x</div> <div>y</div>";
    let end = locate_matching_close(doc, 7, &div()).unwrap();
    assert_eq!(&doc[7..end], "<div>x</div>");
}

#[test]
fn test_unbalanced_reports_open_depth() {
    let doc = "<div><div></div>";
    let err = locate_matching_close(doc, 0, &div()).unwrap_err();
    assert!(matches!(
        err,
        MarkupError::UnbalancedStructure { start: 0, depth: 1 }
    ));
}

#[test]
fn test_no_tokens_at_all_is_unbalanced() {
    let err = locate_matching_close("plain text", 0, &div()).unwrap_err();
    assert!(matches!(err, MarkupError::UnbalancedStructure { depth: 0, .. }));
}

#[test]
fn test_offset_past_end() {
    let err = locate_matching_close("<div></div>", 99, &div()).unwrap_err();
    assert!(matches!(err, MarkupError::InvalidOffset { offset: 99, len: 11 }));
}

#[test]
fn test_custom_pattern_pair() {
    let pattern = TagPattern::new(r"\{\{#each\b", r"\{\{/each\}\}").unwrap();
    let doc = "{{#each a}}{{#each b}}x{{/each}}{{/each}} rest";
    let end = locate_matching_close(doc, 0, &pattern).unwrap();
    assert_eq!(&doc[end..], " rest");
}

#[test]
fn test_case_insensitive_element_tokens() {
    let doc = "<DIV><div></DIV></div>";
    assert_eq!(locate_matching_close(doc, 0, &div()).unwrap(), doc.len());
}

#[quickcheck]
fn prop_each_open_finds_its_own_close(depth: u8, pick: u8) -> bool {
    let depth = usize::from(depth % 32) + 1;
    let k = usize::from(pick) % depth;
    let doc = nested(depth);
    let open = k * "<div><span>".len();
    let expected = doc.len() - k * "</span></div>".len();
    locate_matching_close(&doc, open, &div()).ok() == Some(expected)
}

#[quickcheck]
fn prop_located_span_is_balanced(depth: u8, pick: u8) -> bool {
    let depth = usize::from(depth % 32) + 1;
    let k = usize::from(pick) % depth;
    let doc = nested(depth);
    let open = k * "<div><span>".len();
    locate_matching_close(&doc, open, &div())
        .is_ok_and(|end| div().net_depth(&doc[open..end]) == 0)
}
