//! Doc-comment metadata extraction (spec §4.2).
//!
//! `oxc` hands back a flat, span-ordered list of comments with no
//! attachment to the declarations they document — unlike a real
//! type-checker's `getLeadingCommentRanges`, there is no built-in
//! "comment immediately before this node" query. This module reimplements
//! that lookup directly: given a declaration's span start, find the
//! nearest preceding block comment with only whitespace between it and
//! the declaration, then scan its lines for the three recognized tags.

use oxc_ast::Comment;
use oxc_span::Span;

use crate::types::{EnumOpenness, SymbolMetadata};

/// A flattened view of the comments `oxc` attaches to a `Program`, kept
/// sorted by span for binary search.
pub struct DocCommentIndex<'a> {
    source: &'a str,
    comments: &'a [Comment],
}

impl<'a> DocCommentIndex<'a> {
    pub fn new(source: &'a str, comments: &'a [Comment]) -> Self {
        Self { source, comments }
    }

    /// `leading-comment-ranges(position)` from spec §6, specialized to
    /// the one case the parser needs: the nearest preceding `/** ... */`
    /// block comment, if any, with nothing but whitespace between its end
    /// and `decl_start`.
    fn leading_doc_comment(&self, decl_start: u32) -> Option<&'a str> {
        let mut best: Option<&Comment> = None;
        for comment in self.comments {
            if comment.span.end > decl_start {
                continue;
            }
            let between = &self.source[comment.span.end as usize..decl_start as usize];
            if !between.trim().is_empty() {
                // Something other than whitespace sits between this
                // comment and the declaration — it cannot be the leading
                // doc comment for `decl_start`, and neither can anything
                // before it once we encounter a more recent comment below.
                best = None;
                continue;
            }
            if !comment.is_block() {
                continue;
            }
            best = Some(comment);
        }
        best.map(|c| &self.source[c.span.start as usize..c.span.end as usize])
    }

    /// Extract [`SymbolMetadata`] from the doc comment leading `decl_span`,
    /// if any. A comment that is not a JSDoc-style block (`/** ... */`) or
    /// that carries none of the three recognized tags yields no metadata
    /// at all (spec §4.2: "Any parse failure yields *no* metadata, not a
    /// hard error").
    pub fn metadata_for(&self, decl_span: Span) -> Option<SymbolMetadata> {
        let text = self.leading_doc_comment(decl_span.start)?;
        if !is_jsdoc_block(text) {
            return None;
        }
        let meta = parse_tags(text);
        if meta.is_empty() {
            None
        } else {
            Some(meta)
        }
    }
}

fn is_jsdoc_block(comment_text: &str) -> bool {
    // `comment_text` is the full `/* ... */` or `/** ... */` span
    // including delimiters. JSDoc convention requires the extra `*`.
    comment_text.starts_with("/**")
}

/// Strip comment delimiters and leading `*` continuation markers, yielding
/// one trimmed logical line per input line.
fn doc_lines(comment_text: &str) -> Vec<String> {
    let inner = comment_text
        .trim_start_matches("/**")
        .trim_end_matches("*/");
    inner
        .lines()
        .map(|line| {
            let trimmed = line.trim();
            trimmed.strip_prefix('*').unwrap_or(trimmed).trim().to_string()
        })
        .filter(|l| !l.is_empty())
        .collect()
}

fn parse_tags(comment_text: &str) -> SymbolMetadata {
    let mut meta = SymbolMetadata::default();
    for line in doc_lines(comment_text) {
        if let Some(rest) = line.strip_prefix("@deprecated") {
            meta.is_deprecated = true;
            let msg = rest.trim();
            if !msg.is_empty() {
                meta.deprecation_message = Some(msg.to_string());
            }
        } else if let Some(rest) = line.strip_prefix("@defaultValue") {
            set_default(&mut meta, rest);
        } else if let Some(rest) = line.strip_prefix("@default") {
            set_default(&mut meta, rest);
        } else if let Some(rest) = line.strip_prefix("@enumType") {
            match rest.trim() {
                "open" => meta.enum_type = Some(EnumOpenness::Open),
                "closed" => meta.enum_type = Some(EnumOpenness::Closed),
                _ => {}
            }
        }
    }
    meta
}

fn set_default(meta: &mut SymbolMetadata, rest: &str) {
    let value = rest.trim();
    if !value.is_empty() {
        meta.default_value = Some(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(start: u32, end: u32, block: bool) -> Comment {
        use oxc_ast::ast::{Comment as AstComment, CommentKind};
        AstComment::new(
            start,
            end,
            if block {
                CommentKind::Block
            } else {
                CommentKind::Line
            },
        )
    }

    #[test]
    fn extracts_deprecated_with_message() {
        let source = "/** @deprecated use g instead */\nexport declare function f(): void;";
        let doc_end = source.find("*/").unwrap() as u32 + 2;
        let comments = vec![comment(0, doc_end, true)];
        let idx = DocCommentIndex::new(source, &comments);
        let decl_start = source.find("export").unwrap() as u32;
        let meta = idx.metadata_for(Span::new(decl_start, decl_start + 10)).unwrap();
        assert!(meta.is_deprecated);
        assert_eq!(meta.deprecation_message.as_deref(), Some("use g instead"));
    }

    #[test]
    fn extracts_default_value() {
        let source = "/**\n * @default 42\n */\nexport declare const x: number;";
        let doc_end = source.find("*/").unwrap() as u32 + 2;
        let comments = vec![comment(0, doc_end, true)];
        let idx = DocCommentIndex::new(source, &comments);
        let decl_start = source.find("export").unwrap() as u32;
        let meta = idx.metadata_for(Span::new(decl_start, decl_start + 5)).unwrap();
        assert_eq!(meta.default_value.as_deref(), Some("42"));
    }

    #[test]
    fn extracts_enum_openness() {
        let source = "/** @enumType open */\nexport declare enum Color { Red }";
        let doc_end = source.find("*/").unwrap() as u32 + 2;
        let comments = vec![comment(0, doc_end, true)];
        let idx = DocCommentIndex::new(source, &comments);
        let decl_start = source.find("export").unwrap() as u32;
        let meta = idx.metadata_for(Span::new(decl_start, decl_start + 5)).unwrap();
        assert_eq!(meta.enum_type, Some(EnumOpenness::Open));
    }

    #[test]
    fn non_jsdoc_comment_yields_no_metadata() {
        let source = "/* just a note */\nexport declare function f(): void;";
        let doc_end = source.find("*/").unwrap() as u32 + 2;
        let comments = vec![comment(0, doc_end, true)];
        let idx = DocCommentIndex::new(source, &comments);
        let decl_start = source.find("export").unwrap() as u32;
        assert!(idx.metadata_for(Span::new(decl_start, decl_start + 10)).is_none());
    }

    #[test]
    fn comment_separated_by_code_is_not_leading() {
        let source = "/** @deprecated */\nconst unrelated = 1;\nexport declare function f(): void;";
        let doc_end = source.find("*/").unwrap() as u32 + 2;
        let comments = vec![comment(0, doc_end, true)];
        let idx = DocCommentIndex::new(source, &comments);
        let decl_start = source.rfind("export").unwrap() as u32;
        assert!(idx.metadata_for(Span::new(decl_start, decl_start + 10)).is_none());
    }
}
