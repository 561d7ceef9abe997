//! Block-level scanner.
//!
//! Splits stylesheet text into top-level constructs without parsing
//! declarations. Comments and quoted strings are skipped while counting braces,
//! following the consumption rules of [CSS Syntax Module Level 3 § 4.3]: a
//! string ends at its matching quote or at an unescaped newline.
//!
//! [CSS Syntax Module Level 3 § 4.3]: https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms

use crate::error::StyleError;

use super::chunk::{ChunkKind, StyleChunk, render};

/// Splits a stylesheet into an ordered list of [`StyleChunk`]s.
pub struct StyleTokenizer<'a> {
    input: &'a str,
    position: usize,
    chunks: Vec<StyleChunk>,
}

impl<'a> StyleTokenizer<'a> {
    /// Create a new tokenizer over `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            chunks: Vec::new(),
        }
    }

    /// Scan the whole input.
    ///
    /// # Errors
    ///
    /// Returns [`StyleError::UnterminatedBlock`] or
    /// [`StyleError::UnterminatedComment`] for malformed input, and
    /// [`StyleError::RoundTripMismatch`] if the chunks would not reproduce the
    /// input.
    pub fn run(&mut self) -> Result<(), StyleError> {
        let len = self.input.len();
        while self.position < len {
            let start = self.position;
            let construct = self.skip_whitespace(start);
            if construct == len {
                self.emit(ChunkKind::Other, start, len);
                break;
            }

            let (kind, end) = self.consume_construct(construct)?;
            self.emit(kind, start, end);
            self.position = end;
        }

        let rendered = render(&self.chunks);
        if rendered != self.input {
            return Err(StyleError::RoundTripMismatch {
                input_len: len,
                output_len: rendered.len(),
            });
        }
        Ok(())
    }

    /// Chunks produced so far.
    #[must_use]
    pub fn chunks(&self) -> &[StyleChunk] {
        &self.chunks
    }

    /// Consume the tokenizer and return its chunks.
    #[must_use]
    pub fn into_chunks(self) -> Vec<StyleChunk> {
        self.chunks
    }

    fn emit(&mut self, kind: ChunkKind, start: usize, end: usize) {
        self.chunks.push(StyleChunk::new(kind, &self.input[start..end]));
    }

    /// Returns the kind of the construct starting at `at` and the offset just
    /// past it.
    fn consume_construct(&self, at: usize) -> Result<(ChunkKind, usize), StyleError> {
        let rest = &self.input[at..];

        if rest.starts_with("/*") {
            return Ok((ChunkKind::Comment, self.skip_comment(at)?));
        }

        if let Some(brace) = self.root_brace(at) {
            return Ok((ChunkKind::Root, self.block_end(brace)?));
        }

        if rest.starts_with('@') {
            return match self.find_prelude_end(at, true)? {
                Some(end) if self.input.as_bytes()[end] == b';' => {
                    Ok((ChunkKind::AtRule, end + 1))
                }
                Some(brace) => Ok((ChunkKind::AtRule, self.block_end(brace)?)),
                None => Ok((ChunkKind::Other, self.input.len())),
            };
        }

        match self.find_prelude_end(at, false)? {
            Some(brace) => Ok((ChunkKind::Rule, self.block_end(brace)?)),
            None => Ok((ChunkKind::Other, self.input.len())),
        }
    }

    fn skip_whitespace(&self, from: usize) -> usize {
        let rest = &self.input[from..];
        from + (rest.len() - rest.trim_start().len())
    }

    /// Offset of the `{` of a `:root` block starting at `at`.
    fn root_brace(&self, at: usize) -> Option<usize> {
        let rest = self.input[at..].strip_prefix(":root")?;
        let brace = self.skip_whitespace(self.input.len() - rest.len());
        (self.input.as_bytes().get(brace) == Some(&b'{')).then_some(brace)
    }

    /// Find the `{` (or, for statement at-rules, `;`) that ends a prelude.
    fn find_prelude_end(
        &self,
        from: usize,
        stop_at_semicolon: bool,
    ) -> Result<Option<usize>, StyleError> {
        let bytes = self.input.as_bytes();
        let mut i = from;
        while i < bytes.len() {
            match bytes[i] {
                b'{' => return Ok(Some(i)),
                b';' if stop_at_semicolon => return Ok(Some(i)),
                b'/' if bytes.get(i + 1) == Some(&b'*') => i = self.skip_comment(i)?,
                quote @ (b'"' | b'\'') => i = self.skip_string(i, quote),
                _ => i += 1,
            }
        }
        Ok(None)
    }

    /// Offset just past the `}` matching the `{` at `open`.
    fn block_end(&self, open: usize) -> Result<usize, StyleError> {
        let bytes = self.input.as_bytes();
        let mut depth = 1usize;
        let mut i = open + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'{' => {
                    depth += 1;
                    i += 1;
                }
                b'}' => {
                    depth -= 1;
                    i += 1;
                    if depth == 0 {
                        return Ok(i);
                    }
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => i = self.skip_comment(i)?,
                quote @ (b'"' | b'\'') => i = self.skip_string(i, quote),
                _ => i += 1,
            }
        }
        Err(StyleError::UnterminatedBlock {
            offset: open,
            depth,
        })
    }

    /// Offset just past the `*/` closing the comment at `at`.
    fn skip_comment(&self, at: usize) -> Result<usize, StyleError> {
        self.input[at + 2..]
            .find("*/")
            .map(|i| at + 2 + i + 2)
            .ok_or(StyleError::UnterminatedComment { offset: at })
    }

    /// Offset just past the string opened at `at`.
    ///
    /// An unescaped newline ends the string without being consumed.
    fn skip_string(&self, at: usize, quote: u8) -> usize {
        let bytes = self.input.as_bytes();
        let mut i = at + 1;
        while i < bytes.len() {
            match bytes[i] {
                b'\\' => i += 2,
                b'\n' => return i,
                b if b == quote => return i + 1,
                _ => i += 1,
            }
        }
        bytes.len()
    }
}

/// Tokenize `css` into top-level chunks.
///
/// # Errors
///
/// See [`StyleTokenizer::run`].
pub fn tokenize(css: &str) -> Result<Vec<StyleChunk>, StyleError> {
    let mut tokenizer = StyleTokenizer::new(css);
    tokenizer.run()?;
    Ok(tokenizer.into_chunks())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(css: &str) -> Vec<ChunkKind> {
        tokenize(css).unwrap().iter().map(|c| c.kind).collect()
    }

    #[test]
    fn test_root_block() {
        let chunks = tokenize(":root { --x: 1px; }\n.a{}").unwrap();
        assert_eq!(chunks[0].kind, ChunkKind::Root);
        assert_eq!(chunks[0].text, ":root { --x: 1px; }");
        assert_eq!(chunks[1].text, "\n.a{}");
    }

    #[test]
    fn test_root_pseudo_in_selector_is_a_rule() {
        assert_eq!(kinds(":root .a{color:red}"), vec![ChunkKind::Rule]);
    }

    #[test]
    fn test_brace_inside_string_does_not_count() {
        let css = r#".a{content:"}"}.b{}"#;
        let chunks = tokenize(css).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].text, r#".a{content:"}"}"#);
    }

    #[test]
    fn test_brace_inside_comment_in_block() {
        let chunks = tokenize(".a{/* } */color:red}.b{}").unwrap();
        assert_eq!(chunks[0].text, ".a{/* } */color:red}");
    }

    #[test]
    fn test_newline_ends_bad_string() {
        let css = ".a{content:'oops\n}.b{}";
        let chunks = tokenize(css).unwrap();
        assert_eq!(chunks[0].text, ".a{content:'oops\n}");
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let chunks = tokenize(r".a{content:'\'}'}.b{}").unwrap();
        assert_eq!(chunks[0].text, r".a{content:'\'}'}");
    }

    #[test]
    fn test_statement_at_rule() {
        let chunks = tokenize("@import url(\"a;b.css\");\n.a{}").unwrap();
        assert_eq!(chunks[0].kind, ChunkKind::AtRule);
        assert_eq!(chunks[0].text, "@import url(\"a;b.css\");");
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize(".a{} /* open").unwrap_err();
        assert!(matches!(err, StyleError::UnterminatedComment { offset: 5 }));
    }

    #[test]
    fn test_dangling_prelude_is_other() {
        assert_eq!(kinds(".a{} .b"), vec![ChunkKind::Rule, ChunkKind::Other]);
    }
}
