//! Integration tests for the block-level stylesheet tokenizer.

use pagewright_css::{ChunkKind, StyleError, StyleTokenizer, render, tokenize};
use quickcheck_macros::quickcheck;

fn kinds(css: &str) -> Vec<ChunkKind> {
    tokenize(css).unwrap().iter().map(|c| c.kind).collect()
}

#[test]
fn test_every_construct_kind() {
    let css = "/* top */\n:root{--a:1}\n@media (max-width:600px){.a{b:c}}\n.x{y:z}\n";
    assert_eq!(
        kinds(css),
        vec![
            ChunkKind::Comment,
            ChunkKind::Root,
            ChunkKind::AtRule,
            ChunkKind::Rule,
            ChunkKind::Other,
        ]
    );
}

#[test]
fn test_leading_whitespace_belongs_to_next_chunk() {
    let chunks = tokenize(".a{}\n\n  .b{}").unwrap();
    assert_eq!(chunks[0].text, ".a{}");
    assert_eq!(chunks[1].text, "\n\n  .b{}");
}

#[test]
fn test_nested_at_rule_is_one_chunk() {
    let css = "@media screen{@supports (display:grid){.g{display:grid}}.h{}}.tail{}";
    let chunks = tokenize(css).unwrap();
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].kind, ChunkKind::AtRule);
    assert_eq!(chunks[1].text, ".tail{}");
}

#[test]
fn test_block_parts() {
    let chunks = tokenize("@media x{.a{}.b{}}").unwrap();
    let (head, body, tail) = chunks[0].block_parts().unwrap();
    assert_eq!(head, "@media x{");
    assert_eq!(body, ".a{}.b{}");
    assert_eq!(tail, "}");
}

#[test]
fn test_block_parts_absent_for_statements_and_comments() {
    let chunks = tokenize("@charset \"utf-8\";/* c */").unwrap();
    assert!(chunks.iter().all(|c| c.block_parts().is_none()));
}

#[test]
fn test_kind_display() {
    assert_eq!(ChunkKind::AtRule.to_string(), "at-rule");
    assert_eq!(ChunkKind::Root.to_string(), "root");
}

#[test]
fn test_unterminated_block() {
    let err = tokenize(".a{}\n.b{color:red").unwrap_err();
    assert!(matches!(
        err,
        StyleError::UnterminatedBlock { offset: 7, depth: 1 }
    ));
}

#[test]
fn test_empty_input() {
    assert!(tokenize("").unwrap().is_empty());
}

#[test]
fn test_tokenizer_struct_api() {
    let mut tokenizer = StyleTokenizer::new(".a{} ");
    tokenizer.run().unwrap();
    assert_eq!(tokenizer.chunks().len(), 2);
    assert_eq!(render(&tokenizer.into_chunks()), ".a{} ");
}

/// Builds a well-formed stylesheet from arbitrary selectors and bodies, mixing
/// in whitespace, comments, and at-rules.
fn stylesheet(parts: &[(u8, String)]) -> String {
    let mut css = String::new();
    for (shape, word) in parts {
        let word: String = word
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == ' ')
            .collect();
        match shape % 5 {
            0 => css.push_str(&format!(".{word} {{ color: {word}; }}")),
            1 => css.push_str(&format!("\n/* {word} */\n")),
            2 => css.push_str(&format!("@media ({word}) {{ .x{{a:b}} .y{{}} }}")),
            3 => css.push_str(&format!("  #{word}{{content:\"{{{word}\"}}")),
            _ => css.push_str(&format!("@import \"{word}\";")),
        }
    }
    css
}

#[quickcheck]
fn prop_tokenize_is_lossless(parts: Vec<(u8, String)>) -> bool {
    let css = stylesheet(&parts);
    tokenize(&css).is_ok_and(|chunks| render(&chunks) == css)
}

#[quickcheck]
fn prop_arbitrary_text_never_loses_bytes(text: String) -> bool {
    // Malformed input may fail, but it never yields a lossy chunk list.
    tokenize(&text).map_or(true, |chunks| render(&chunks) == text)
}
