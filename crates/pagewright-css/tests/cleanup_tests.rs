//! Integration tests for stylesheet cleanup: empty rules and font faces.

use pagewright_css::{
    FontPolicy, StyleError, drop_empty_rules, prune_font_faces, rewrite_style_elements, tokenize,
};

// ========== drop_empty_rules ==========

#[test]
fn test_empty_rule_bodies_dropped() {
    let css = ".a{}\n.b:before{ }\n.c{color:red}\n:root{}\n@import url(x);";
    let out = drop_empty_rules(tokenize(css).unwrap()).unwrap();

    assert_eq!(out.render(), "\n.c{color:red}\n:root{}\n@import url(x);");
    assert_eq!(out.removed_chunks, 2);
    assert_eq!(out.removed_bytes, css.len() - out.render().len());
}

#[test]
fn test_empty_rules_inside_at_rules() {
    let css = "@media (max-width:600px){.a{}.b{x:y}}@media print{.c{ }}";
    let out = drop_empty_rules(tokenize(css).unwrap()).unwrap();

    assert_eq!(out.render(), "@media (max-width:600px){.b{x:y}}");
    assert_eq!(out.removed_chunks, 3);
    assert_eq!(out.removed_bytes, css.len() - out.render().len());
}

#[test]
fn test_comment_only_body_is_not_empty() {
    let css = ".a{/* keep */}";
    let out = drop_empty_rules(tokenize(css).unwrap()).unwrap();
    assert_eq!(out.render(), css);
    assert_eq!(out.removed_chunks, 0);
}

// ========== prune_font_faces ==========

const FONTS: &str = concat!(
    "/* cyrillic */\n",
    "@font-face {\n  font-family: 'Roboto';\n  unicode-range: U+0301, U+0400-045F;\n}\n",
    "/* latin */\n",
    "@font-face {\n  font-family: 'Roboto';\n  unicode-range: U+0000-00FF, U+0131;\n}\n",
    "/* latin */\n",
    "@font-face {\n  font-family: 'Lato';\n  unicode-range: U+0000-00FF;\n}\n",
);

#[test]
fn test_font_faces_pruned_by_family_and_range() {
    let policy = FontPolicy::default().keep_families(["Roboto"]).latin_only();
    let out = prune_font_faces(tokenize(FONTS).unwrap(), &policy).unwrap();

    assert_eq!(
        out.render(),
        concat!(
            "\n/* latin */\n",
            "@font-face {\n  font-family: 'Roboto';\n  unicode-range: U+0000-00FF, U+0131;\n}\n",
        )
    );
    assert_eq!(out.kept_blocks, 1);
    assert_eq!(out.family_blocks, 1);
    assert_eq!(out.range_blocks, 1);
    assert_eq!(out.removed_families.iter().collect::<Vec<_>>(), ["Lato"]);
    assert_eq!(out.removed_bytes, FONTS.len() - out.render().len());
    assert_eq!(
        out.to_string(),
        "kept 1 @font-face block(s), dropped 1 for unused families and 1 for unicode range"
    );
}

#[test]
fn test_family_with_a_kept_subset_is_not_reported_removed() {
    let policy = FontPolicy::default().latin_only();
    let out = prune_font_faces(tokenize(FONTS).unwrap(), &policy).unwrap();
    assert_eq!(out.range_blocks, 1);
    assert!(out.removed_families.is_empty());
}

#[test]
fn test_permissive_policy_keeps_everything() {
    let policy = FontPolicy::default();
    assert!(policy.is_permissive());
    let css = "@font-face{src:url(a.woff2)}\n@font-face{font-family:\"X\"}";
    let out = prune_font_faces(tokenize(css).unwrap(), &policy).unwrap();
    assert_eq!(out.render(), css);
    assert_eq!(out.kept_blocks, 2);
}

#[test]
fn test_block_without_family_is_kept() {
    let policy = FontPolicy::default().keep_families(["Roboto"]);
    let css = "@font-face{src:url(a.woff2)}";
    let out = prune_font_faces(tokenize(css).unwrap(), &policy).unwrap();
    assert_eq!(out.render(), css);
}

// ========== rewrite_style_elements ==========

#[test]
fn test_rewrite_every_style_element() {
    let doc = "<style>.a{}</style><p></p><STYLE media=x>.b{c:d}.e{}</STYLE>";
    let (out, visited) =
        rewrite_style_elements(doc, |css| Ok(drop_empty_rules(tokenize(css)?)?.render()))
            .unwrap();
    assert_eq!(out, "<style></style><p></p><STYLE media=x>.b{c:d}</STYLE>");
    assert_eq!(visited, 2);
}

#[test]
fn test_rewrite_propagates_tokenizer_errors() {
    let err = rewrite_style_elements("<style>.a{</style>", |css| {
        Ok(drop_empty_rules(tokenize(css)?)?.render())
    })
    .unwrap_err();
    assert!(matches!(err, StyleError::UnterminatedBlock { .. }));
}
