//! Line reconstruction and the small lexical helpers pass 1 needs to find
//! directive keywords, label prefixes, and the start of each operand's text.
//!
//! The expression grammar itself is tokenized by [`crate::evaluator`]; this
//! module only deals with whole source lines.

/// Join continuation lines.
///
/// Any line whose non-comment portion (everything before the first `;`) has
/// trailing whitespace terminating in `\` is concatenated, without the `\`,
/// to the next line. A dropped comment on a continued line is intentional:
/// the continuation swallows the rest of that physical line.
#[must_use]
pub fn reconstruct_lines(source: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pending = String::new();
    let mut pending_open = false;
    for raw_line in source.lines() {
        let code_part = raw_line.find(';').map_or(raw_line, |idx| &raw_line[..idx]);
        let trimmed_code = code_part.trim_end();
        if let Some(without_backslash) = trimmed_code.strip_suffix('\\') {
            if pending_open {
                pending.push(' ');
            }
            pending.push_str(without_backslash.trim_end());
            pending_open = true;
        } else if pending_open {
            pending.push(' ');
            pending.push_str(raw_line);
            out.push(core::mem::take(&mut pending));
            pending_open = false;
        } else {
            out.push(raw_line.to_owned());
        }
    }
    if pending_open {
        out.push(pending);
    }
    out
}

/// Strip an inline comment (everything from the first `;` onward) and trim
/// surrounding whitespace.
#[must_use]
pub fn strip_comment(line: &str) -> &str {
    line.find(';').map_or(line, |idx| &line[..idx]).trim()
}

/// Whether `line`, once comments are stripped, is empty.
#[must_use]
pub fn is_blank(line: &str) -> bool {
    strip_comment(line).is_empty()
}

/// A single word is an identifier if it starts with a letter or underscore
/// and otherwise contains only letters, digits, or underscores; a trailing
/// `:` is permitted (and stripped by the caller) to mark a label.
#[must_use]
pub fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Whether `word` (with any trailing `:` stripped) is a syntactically valid
/// label name.
#[must_use]
pub fn is_label_word(word: &str) -> bool {
    let stem = word.strip_suffix(':').unwrap_or(word);
    !stem.is_empty() && is_identifier(stem)
}

/// Splits a comma list at top-level commas, respecting parenthesis nesting
/// so that commas inside a parenthesized sub-expression don't split an
/// operand.
#[must_use]
pub fn split_top_level_commas(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut depth = 0_i32;
    let mut current = String::new();
    for c in text.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth -= 1;
                current.push(c);
            }
            ',' if depth == 0 => {
                parts.push(core::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    parts.push(current);
    parts.iter().map(|s| s.trim().to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use coverage_helper::test;

    use super::{is_label_word, reconstruct_lines, split_top_level_commas, strip_comment};

    #[test]
    fn joins_continuation_lines() {
        let source = "MOV.I \\\n$0, $1\nJMP $-1\n";
        let lines = reconstruct_lines(source);
        assert_eq!(lines, vec!["MOV.I $0, $1".to_owned(), "JMP $-1".to_owned()]);
    }

    #[test]
    fn continuation_drops_trailing_comment() {
        let source = "ADD #1, $2 ; keep going\\\n$3\n";
        let lines = reconstruct_lines(source);
        assert_eq!(lines, vec!["ADD #1, $2 $3".to_owned()]);
    }

    #[test]
    fn strips_comments_and_trims() {
        assert_eq!(strip_comment("  MOV $0, $1 ; a comment"), "MOV $0, $1");
        assert_eq!(strip_comment(";just a comment"), "");
    }

    #[test]
    fn recognizes_label_words() {
        assert!(is_label_word("start:"));
        assert!(is_label_word("loop_2"));
        assert!(!is_label_word("2bad"));
        assert!(!is_label_word(""));
    }

    #[test]
    fn splits_top_level_commas_only() {
        let parts = split_top_level_commas("(1,2)+3, $4");
        assert_eq!(parts, vec!["(1,2)+3".to_owned(), "$4".to_owned()]);
    }
}
