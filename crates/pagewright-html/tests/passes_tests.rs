//! Integration tests for the batch passes: removal, dedup, class stripping.

use pagewright_common::MissingPolicy;
use pagewright_html::{MarkupError, TagPattern, remove_elements, replace_elements, strip_class_token};

fn div() -> TagPattern {
    TagPattern::element("div").unwrap()
}

fn page() -> String {
    [
        r#"<div id="section-desk" class="desktop-only"><div class="inner">desk</div></div>"#,
        r#"<div id="section-mob" class="mobile-only"><div class="inner">mob</div></div>"#,
        r#"<div id="section-faq"><div class="inner">faq</div></div>"#,
    ]
    .join("\n")
}

// ========== remove_elements ==========

#[test]
fn test_remove_elements_in_order() {
    let doc = page();
    let (out, report) = remove_elements(
        &doc,
        &[r#"id="section-mob""#, r#"id="section-faq""#],
        &div(),
        MissingPolicy::Skip,
    )
    .unwrap();

    assert_eq!(
        out,
        r#"<div id="section-desk" class="desktop-only"><div class="inner">desk</div></div>"#
    );
    assert_eq!(report.removed.len(), 2);
    assert!(report.missing.is_empty());
    assert_eq!(report.size.before, doc.len());
    assert_eq!(report.size.after, out.len());
    // Each removal also ate one newline.
    let bytes: usize = report.removed.iter().map(|r| r.bytes).sum();
    assert_eq!(bytes, doc.len() - out.len());
}

#[test]
fn test_remove_elements_skip_records_missing() {
    let doc = page();
    let (out, report) = remove_elements(
        &doc,
        &[r#"id="section-gone""#, r#"id="section-mob""#],
        &div(),
        MissingPolicy::Skip,
    )
    .unwrap();

    assert_eq!(report.missing, vec![r#"id="section-gone""#.to_string()]);
    assert_eq!(report.removed.len(), 1);
    assert!(!out.contains("section-mob"));
    assert!(report.to_string().starts_with("removed 1 element(s)"));
}

#[test]
fn test_remove_elements_abort_on_missing() {
    let err = remove_elements(
        &page(),
        &[r#"id="section-mob""#, r#"id="section-gone""#],
        &div(),
        MissingPolicy::Abort,
    )
    .unwrap_err();
    assert!(matches!(err, MarkupError::MarkerNotFound { .. }));
}

#[test]
fn test_remove_elements_structural_error_ignores_policy() {
    let doc = r#"<div id="broken"><div></div>"#;
    let err = remove_elements(doc, &[r#"id="broken""#], &div(), MissingPolicy::Skip).unwrap_err();
    assert!(matches!(err, MarkupError::UnbalancedStructure { .. }));
}

#[test]
fn test_remove_elements_rerun_is_idempotent() {
    let doc = page();
    let markers = [r#"id="section-mob""#];
    let (once, _) = remove_elements(&doc, &markers, &div(), MissingPolicy::Skip).unwrap();
    let (twice, report) = remove_elements(&once, &markers, &div(), MissingPolicy::Skip).unwrap();
    assert_eq!(once, twice);
    assert_eq!(report.missing.len(), 1);
}

// ========== replace_elements ==========

#[test]
fn test_replace_elements_normalizes_every_block() {
    let doc = concat!(
        r#"<div class="cta big"><p>old one</p><div>nested</div></div>"#,
        "<p>between</p>",
        r#"<div class="cta big"><p>old two</p></div>"#,
    );
    let canonical = r#"<div class="cta big"><p>canonical</p></div>"#;
    let (out, report) = replace_elements(doc, r#"class="cta big""#, &div(), canonical).unwrap();

    assert_eq!(out, format!("{canonical}<p>between</p>{canonical}"));
    assert_eq!(report.replaced, 2);
    assert_eq!(report.unchanged, 0);
    assert_eq!(report.found(), 2);
}

#[test]
fn test_replace_elements_counts_already_canonical() {
    let canonical = r#"<div class="cta"><p>same</p></div>"#;
    let doc = format!(r#"{canonical}<div class="cta"><p>diff</p></div>"#);
    let (out, report) = replace_elements(&doc, r#"class="cta""#, &div(), canonical).unwrap();
    assert_eq!(out, format!("{canonical}{canonical}"));
    assert_eq!(report.unchanged, 1);
    assert_eq!(report.replaced, 1);

    let (again, report) = replace_elements(&out, r#"class="cta""#, &div(), canonical).unwrap();
    assert_eq!(again, out);
    assert_eq!(report.replaced, 0);
    assert_eq!(report.unchanged, 2);
}

#[test]
fn test_replace_elements_with_no_matches() {
    let (out, report) = replace_elements("<div></div>", "cta", &div(), "x").unwrap();
    assert_eq!(out, "<div></div>");
    assert_eq!(report.found(), 0);
}

// ========== strip_class_token ==========

#[test]
fn test_strip_class_token_on_page() {
    let (out, n) = strip_class_token(&page(), "desktop-only").unwrap();
    assert_eq!(n, 1);
    assert!(out.starts_with(r#"<div id="section-desk"><div class="inner">"#));
    assert!(out.contains("mobile-only"));
}
