//! Pass 1: directive handling, `FOR`/`ROF` macro expansion, and label/EQU
//! collection.
//!
//! Produces an ordered list of not-yet-parsed instruction lines and a
//! [`SymbolTable`] that pass 2 consults to substitute labels and EQUs.

use core::cell::RefCell;

use crate::{
    evaluator::Evaluator,
    lexer,
    message::Message,
    options::AssembleOptions,
    predefined,
    symbols::{SymbolKind, SymbolTable},
};

/// One not-yet-assembled instruction, tagged with its source line for
/// diagnostics.
#[derive(Clone, Debug)]
pub struct InstructionLine {
    /// 0-based index into the reconstructed source lines this came from.
    pub line: usize,
    /// The opcode/modifier/operand text, labels already stripped.
    pub text: String,
}

/// Everything pass 2 needs: the expanded instruction stream, the resolved
/// symbol table, directive-derived metadata, and the shared expression
/// evaluator (registers persist across every expression in the assembly
/// unit, pass 1's and pass 2's alike).
pub struct Pass1Output {
    /// Instruction lines in final (post-expansion) order; index in this
    /// list is the instruction's address-label value.
    pub instructions: Vec<InstructionLine>,
    /// Labels and EQUs collected during this pass.
    pub symbols: SymbolTable,
    /// Absolute start offset from `ORG`/`END`, if either was given.
    pub org: Option<i64>,
    /// P-space sharing key from `PIN`, if given.
    pub pin: Option<i64>,
    /// Warrior name from `;name`.
    pub name: String,
    /// Warrior author from `;author`.
    pub author: String,
    /// Warrior strategy text, accumulated from every `;strategy` line.
    pub strategy: String,
    /// The shared expression evaluator; wrapped so pass 2 can keep mutating
    /// it through a shared reference to [`Pass1Output`].
    pub evaluator: RefCell<Evaluator>,
}

/// Mutable accumulator threaded through the (possibly recursive, for nested
/// `FOR`) line-processing walk.
struct Context {
    /// Instruction lines collected so far, pre-expansion.
    instructions: Vec<InstructionLine>,
    /// Labels/EQUs collected so far.
    symbols: SymbolTable,
    /// The most recently defined EQU label, for continuation lines with no
    /// label of their own.
    last_equ_label: Option<String>,
    org: Option<i64>,
    pin: Option<i64>,
    name: String,
    author: String,
    strategy: String,
    /// Whether a `;redcode` directive has been seen at least once.
    seen_redcode: bool,
    /// Whether processing should stop consuming further lines.
    halted: bool,
    /// Whether any `;assert` directive was encountered.
    assert_seen: bool,
    /// Next instruction index to assign.
    next_index: i64,
    /// Shared evaluator; persists registers across every expression in this
    /// assembly unit.
    evaluator: Evaluator,
}

impl Context {
    fn new() -> Self {
        Self {
            instructions: Vec::new(),
            symbols: SymbolTable::new(),
            last_equ_label: None,
            org: None,
            pin: None,
            name: String::new(),
            author: String::new(),
            strategy: String::new(),
            seen_redcode: false,
            halted: false,
            assert_seen: false,
            next_index: 0,
            evaluator: Evaluator::new(),
        }
    }

    /// Reset all accumulated warrior state, as `;redcode` specifies.
    fn reset_warrior_state(&mut self) {
        self.instructions.clear();
        self.symbols = SymbolTable::new();
        self.last_equ_label = None;
        self.org = None;
        self.pin = None;
        self.name.clear();
        self.author.clear();
        self.strategy.clear();
        self.assert_seen = false;
        self.next_index = 0;
    }
}

/// Run pass 1 over the reconstructed source lines.
#[must_use]
pub fn run(
    lines: &[String],
    options: &AssembleOptions,
    messages: &mut Vec<Message>,
) -> Option<Pass1Output> {
    let mut ctx = Context::new();
    process_lines(lines, &mut ctx, options, messages, &[]);

    if !ctx.assert_seen {
        messages.push(Message::warning(0, "Missing ASSERT".to_owned()));
    }

    let (instructions, remap) =
        expand_bare_multiline_refs(ctx.instructions, &ctx.symbols);
    ctx.symbols.remap_addresses(&remap);
    if let Some(org) = ctx.org {
        ctx.org = remap
            .get(usize::try_from(org).unwrap_or(usize::MAX))
            .copied()
            .or(Some(org));
    }

    Some(Pass1Output {
        instructions,
        symbols: ctx.symbols,
        org: ctx.org,
        pin: ctx.pin,
        name: ctx.name,
        author: ctx.author,
        strategy: ctx.strategy,
        evaluator: RefCell::new(ctx.evaluator),
    })
}

/// Process a run of already-reconstructed lines, mutating `ctx` in place.
/// `counters` holds every enclosing `FOR` loop's label and current iteration
/// value, innermost last, for `&`-substitution.
fn process_lines(
    lines: &[String],
    ctx: &mut Context,
    options: &AssembleOptions,
    messages: &mut Vec<Message>,
    counters: &[(String, i64)],
) {
    let mut idx = 0;
    while idx < lines.len() {
        if ctx.halted {
            return;
        }
        let line = &lines[idx];
        let line_no = idx;
        let raw_trimmed = line.trim();

        if raw_trimmed.starts_with(';') {
            process_directive_comment(raw_trimmed, ctx, options, messages, line_no);
            idx += 1;
            continue;
        }

        let stripped = lexer::strip_comment(line);
        let tokens: Vec<&str> = stripped.split_whitespace().collect();
        if tokens.is_empty() {
            idx += 1;
            continue;
        }

        let (labels, rest_start) = scan_labels(&tokens);
        let rest_tokens = &tokens[rest_start..];
        if rest_tokens.is_empty() {
            for label in &labels {
                ctx.symbols.define_address(label, ctx.next_index);
            }
            idx += 1;
            continue;
        }

        let keyword = keyword_of(rest_tokens[0]);
        match keyword.as_str() {
            "EQU" => {
                let body = rest_tokens[1..].join(" ");
                if labels.is_empty() {
                    if let Some(last) = ctx.last_equ_label.clone() {
                        ctx.symbols.append_macro_line(&last, body);
                    } else {
                        messages.push(Message::error(
                            line_no,
                            "EQU without label".to_owned(),
                        ));
                    }
                } else {
                    for label in &labels {
                        ctx.symbols.define_macro(label, body.clone());
                    }
                    ctx.last_equ_label = labels.first().cloned();
                }
                idx += 1;
            }
            "FOR" => {
                let expr_text = rest_tokens[1..].join(" ");
                let raw_count = evaluate_directive_expr(
                    &expr_text,
                    ctx,
                    options,
                    messages,
                    line_no,
                    |v| v,
                );
                let count = raw_count.rem_euclid(65_536);
                let (body, consumed, closed) =
                    collect_for_body(&lines[idx + 1..]);
                if !closed {
                    messages.push(Message::warning(
                        line_no,
                        "FOR unclosed at EOF".to_owned(),
                    ));
                }
                let for_label = labels.into_iter().next();
                let mut iter = 1_i64;
                while iter <= count {
                    if let Some(label) = &for_label {
                        ctx.symbols.define_macro(label, iter.to_string());
                    }
                    let mut nested_counters = counters.to_vec();
                    if let Some(label) = &for_label {
                        nested_counters.push((label.clone(), iter));
                    }
                    let substituted: Vec<String> = body
                        .iter()
                        .map(|l| substitute_amp(l, &nested_counters))
                        .collect();
                    process_lines(
                        &substituted,
                        ctx,
                        options,
                        messages,
                        &nested_counters,
                    );
                    iter += 1;
                }
                idx += 1 + consumed;
            }
            "ROF" => {
                messages
                    .push(Message::warning(line_no, "stray ROF".to_owned()));
                idx += 1;
            }
            "ORG" => {
                let expr_text = rest_tokens[1..].join(" ");
                let value = evaluate_directive_expr(
                    &expr_text,
                    ctx,
                    options,
                    messages,
                    line_no,
                    |v| v,
                );
                ctx.org = Some(value);
                idx += 1;
            }
            "END" => {
                let expr_text = rest_tokens[1..].join(" ");
                if !expr_text.trim().is_empty() {
                    let value = evaluate_directive_expr(
                        &expr_text,
                        ctx,
                        options,
                        messages,
                        line_no,
                        |v| v,
                    );
                    if ctx.org.is_none() {
                        ctx.org = Some(value);
                    } else if value != 0 {
                        messages.push(Message::warning(
                            line_no,
                            "END offset ignored, ORG is set".to_owned(),
                        ));
                    }
                }
                ctx.halted = true;
                idx += 1;
            }
            "PIN" => {
                let expr_text = rest_tokens[1..].join(" ");
                let value = evaluate_directive_expr(
                    &expr_text,
                    ctx,
                    options,
                    messages,
                    line_no,
                    |v| v,
                );
                ctx.pin = Some(value);
                idx += 1;
            }
            _ => {
                for label in &labels {
                    ctx.symbols.define_address(label, ctx.next_index);
                }
                ctx.instructions.push(InstructionLine {
                    line: line_no,
                    text: rest_tokens.join(" "),
                });
                ctx.next_index = ctx.next_index.saturating_add(1);
                idx += 1;
            }
        }
    }
}

/// Handle a `;`-prefixed line: either a recognized directive or an ordinary
/// ignored comment.
fn process_directive_comment(
    raw_trimmed: &str,
    ctx: &mut Context,
    options: &AssembleOptions,
    messages: &mut Vec<Message>,
    line_no: usize,
) {
    let body = raw_trimmed.trim_start_matches(';').trim();
    let mut words = body.split_whitespace();
    let Some(first) = words.next() else {
        return;
    };
    let rest = body
        .get(first.len()..)
        .unwrap_or_default()
        .trim()
        .to_owned();
    match first.to_ascii_uppercase().as_str() {
        "REDCODE" => {
            let already_seen = ctx.seen_redcode;
            ctx.reset_warrior_state();
            ctx.seen_redcode = true;
            if already_seen {
                ctx.halted = true;
            }
        }
        "NAME" => ctx.name = rest,
        "AUTHOR" => ctx.author = rest,
        "STRATEGY" => {
            if !ctx.strategy.is_empty() {
                ctx.strategy.push('\n');
            }
            ctx.strategy.push_str(&rest);
        }
        "ASSERT" => {
            ctx.assert_seen = true;
            let value = evaluate_directive_expr(
                &rest, ctx, options, messages, line_no, |v| v,
            );
            if value == 0 {
                messages.push(Message::error(
                    line_no,
                    "Assertion failed".to_owned(),
                ));
            }
        }
        _ => {}
    }
}

/// Evaluate an `ORG`/`END`/`PIN`/`FOR`/`;assert` expression: substitute
/// EQUs, predefined identifiers, and address labels (through `label_value`),
/// then evaluate it with the shared evaluator.
fn evaluate_directive_expr(
    expr: &str,
    ctx: &mut Context,
    options: &AssembleOptions,
    messages: &mut Vec<Message>,
    line_no: usize,
    label_value: impl Fn(i64) -> i64,
) -> i64 {
    let substituted = substitute_symbols(
        expr,
        &ctx.symbols,
        options,
        ctx.next_index,
        &label_value,
        messages,
        line_no,
    );
    match ctx.evaluator.evaluate(&substituted) {
        Ok(result) => i64::from(result.value),
        Err(_err) => {
            messages.push(Message::error(
                line_no,
                "bad expression in directive".to_owned(),
            ));
            0
        }
    }
}

/// Textually substitute EQUs, predefined identifiers, and address labels
/// into `text`. `label_value` maps an address label's raw instruction index
/// to the number it contributes (identity for absolute contexts, `v -
/// curline` for pass 2's relative operands).
pub(crate) fn substitute_symbols(
    text: &str,
    symbols: &SymbolTable,
    options: &AssembleOptions,
    curline: i64,
    label_value: &dyn Fn(i64) -> i64,
    messages: &mut Vec<Message>,
    line_no: usize,
) -> String {
    let mut visited = Vec::new();
    substitute_symbols_inner(
        text,
        symbols,
        options,
        curline,
        label_value,
        messages,
        line_no,
        &mut visited,
    )
}

#[allow(clippy::too_many_arguments, reason = "internal recursive helper")]
fn substitute_symbols_inner(
    text: &str,
    symbols: &SymbolTable,
    options: &AssembleOptions,
    curline: i64,
    label_value: &dyn Fn(i64) -> i64,
    messages: &mut Vec<Message>,
    line_no: usize,
    visited: &mut Vec<String>,
) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len()
                && (chars[i].is_ascii_alphanumeric() || chars[i] == '_')
            {
                i += 1;
            }
            let name: String = chars[start..i].iter().collect();
            out.push_str(&resolve_identifier(
                &name, symbols, options, curline, label_value, messages,
                line_no, visited,
            ));
        } else {
            out.push(c);
            i += 1;
        }
    }
    out
}

#[allow(clippy::too_many_arguments, reason = "internal recursive helper")]
fn resolve_identifier(
    name: &str,
    symbols: &SymbolTable,
    options: &AssembleOptions,
    curline: i64,
    label_value: &dyn Fn(i64) -> i64,
    messages: &mut Vec<Message>,
    line_no: usize,
    visited: &mut Vec<String>,
) -> String {
    let upper = name.to_ascii_uppercase();
    if visited.contains(&upper) {
        messages.push(Message::warning(
            line_no,
            format!("Recursive EQU cycle: {name}"),
        ));
        return "0".to_owned();
    }
    match symbols.get(name) {
        Some(SymbolKind::Macro(lines)) => {
            let body = lines.join(" ");
            visited.push(upper);
            let substituted = substitute_symbols_inner(
                &body, symbols, options, curline, label_value, messages,
                line_no, visited,
            );
            visited.pop();
            substituted
        }
        Some(SymbolKind::Address(value)) => label_value(*value).to_string(),
        None => predefined::lookup(&upper, options, curline).map_or_else(
            || {
                if name.chars().count() == 1 {
                    name.to_owned()
                } else {
                    messages.push(Message::warning(
                        line_no,
                        format!("Undefined symbol: {name}"),
                    ));
                    "0".to_owned()
                }
            },
            |v| v.to_string(),
        ),
    }
}

/// Replace `&name` with the current value of the named active `FOR`
/// counter, zero-padded to 2 digits for `1..=99`.
fn substitute_amp(line: &str, counters: &[(String, i64)]) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '&' {
            let start = i + 1;
            let mut j = start;
            while j < chars.len()
                && (chars[j].is_ascii_alphanumeric() || chars[j] == '_')
            {
                j += 1;
            }
            let name: String = chars[start..j].iter().collect();
            if let Some((_, value)) =
                counters.iter().rev().find(|(n, _)| n.eq_ignore_ascii_case(&name))
            {
                out.push_str(&format_for_counter(*value));
                i = j;
                continue;
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

/// Format a `FOR` counter value for `&`-substitution.
fn format_for_counter(value: i64) -> String {
    if (1..=99).contains(&value) {
        format!("{value:02}")
    } else {
        value.to_string()
    }
}

/// Gather lines up to (and not including) the matching `ROF`, recognizing
/// nested `FOR`s.  Returns `(body, lines consumed including ROF, closed)`.
fn collect_for_body(lines: &[String]) -> (Vec<String>, usize, bool) {
    let mut depth = 0_i32;
    let mut body = Vec::new();
    for (idx, line) in lines.iter().enumerate() {
        match first_keyword_after_labels(line).as_deref() {
            Some("FOR") => {
                depth += 1;
                body.push(line.clone());
            }
            Some("ROF") => {
                if depth == 0 {
                    return (body, idx + 1, true);
                }
                depth -= 1;
                body.push(line.clone());
            }
            _ => body.push(line.clone()),
        }
    }
    (body, lines.len(), false)
}

/// The directive/opcode keyword on this line, skipping any leading labels.
/// `None` for comment-only, blank, or label-only lines.
fn first_keyword_after_labels(line: &str) -> Option<String> {
    if line.trim().starts_with(';') {
        return None;
    }
    let stripped = lexer::strip_comment(line);
    let tokens: Vec<&str> = stripped.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }
    let (_, rest_start) = scan_labels(&tokens);
    tokens.get(rest_start).map(|t| keyword_of(t))
}

/// Extract the keyword/opcode part of a token, ignoring a `.modifier`
/// suffix.
fn keyword_of(token: &str) -> String {
    token
        .split('.')
        .next()
        .unwrap_or(token)
        .to_ascii_uppercase()
}

/// Whether `word` is one of the directive or opcode keywords.
fn is_keyword(word: &str) -> bool {
    matches!(
        keyword_of(word).as_str(),
        "DAT"
            | "MOV"
            | "ADD"
            | "SUB"
            | "MUL"
            | "DIV"
            | "MOD"
            | "JMP"
            | "JMZ"
            | "JMN"
            | "DJN"
            | "SPL"
            | "SLT"
            | "CMP"
            | "SEQ"
            | "SNE"
            | "NOP"
            | "LDP"
            | "STP"
            | "EQU"
            | "FOR"
            | "ROF"
            | "ORG"
            | "END"
            | "PIN"
    )
}

/// Whether `token` should be treated as a label in the leading-label scan.
fn is_label_token(token: &str) -> bool {
    token.strip_suffix(':').map_or_else(
        || !is_keyword(token) && lexer::is_identifier(token),
        lexer::is_identifier,
    )
}

/// Scan up to 7 leading label tokens. Returns the labels (colon stripped)
/// and the index of the first non-label token.
fn scan_labels(tokens: &[&str]) -> (Vec<String>, usize) {
    let mut labels = Vec::new();
    let mut idx = 0;
    while idx < tokens.len() && idx < 7 && is_label_token(tokens[idx]) {
        let stem = tokens[idx].strip_suffix(':').unwrap_or(tokens[idx]);
        labels.push(stem.to_owned());
        idx += 1;
    }
    (labels, idx)
}

/// Expand instruction lines that are a bare reference to a multi-line EQU
/// into that EQU's lines, and compute the resulting old-index -> new-index
/// remap (sized `instructions.len() + 1`, the final entry covering a label
/// bound to the position just past the last instruction).
fn expand_bare_multiline_refs(
    instructions: Vec<InstructionLine>,
    symbols: &SymbolTable,
) -> (Vec<InstructionLine>, Vec<i64>) {
    let mut expanded = Vec::new();
    let mut remap = Vec::with_capacity(instructions.len() + 1);
    for instr in instructions {
        remap.push(
            i64::try_from(expanded.len())
                .expect("instruction count fits in i64"),
        );
        let trimmed = instr.text.trim();
        if lexer::is_identifier(trimmed) {
            if let Some(SymbolKind::Macro(lines)) = symbols.get(trimmed) {
                if lines.len() > 1 {
                    for body_line in lines.clone() {
                        expanded.push(InstructionLine {
                            line: instr.line,
                            text: body_line,
                        });
                    }
                    continue;
                }
            }
        }
        expanded.push(instr);
    }
    remap.push(
        i64::try_from(expanded.len()).expect("instruction count fits in i64"),
    );
    (expanded, remap)
}

#[cfg(test)]
mod tests {
    use coverage_helper::test;

    use super::run;
    use crate::{message::Message, options::AssembleOptions, symbols::SymbolKind};

    fn lines_of(source: &str) -> Vec<String> {
        crate::lexer::reconstruct_lines(source)
    }

    #[test]
    fn collects_metadata_and_instructions() {
        let src = ";redcode\n;name Imp\n;author A. K. Dewdney\n;assert 1\nMOV.I $0, $1\n";
        let mut messages = Vec::new();
        let out = run(&lines_of(src), &AssembleOptions::default(), &mut messages)
            .expect("pass1 always succeeds");
        assert_eq!(out.name, "Imp");
        assert_eq!(out.author, "A. K. Dewdney");
        assert_eq!(out.instructions.len(), 1);
        assert_eq!(out.instructions[0].text, "MOV.I $0, $1");
        assert!(!messages.iter().any(Message::is_error));
    }

    #[test]
    fn address_label_binds_to_following_instruction_index() {
        let src = ";assert 1\nstart ADD #1, $1\nJMP start\n";
        let mut messages = Vec::new();
        let out = run(&lines_of(src), &AssembleOptions::default(), &mut messages)
            .expect("pass1 always succeeds");
        assert_eq!(out.symbols.get("start"), Some(&SymbolKind::Address(0)));
        assert_eq!(out.instructions.len(), 2);
    }

    #[test]
    fn equ_without_label_is_an_error() {
        let src = ";assert 1\nEQU 5\nMOV $0, $1\n";
        let mut messages = Vec::new();
        let _ = run(&lines_of(src), &AssembleOptions::default(), &mut messages);
        assert!(messages
            .iter()
            .any(|m| m.is_error() && m.text.contains("EQU without label")));
    }

    #[test]
    fn missing_assert_is_a_warning() {
        let src = "MOV $0, $1\n";
        let mut messages = Vec::new();
        let _ = run(&lines_of(src), &AssembleOptions::default(), &mut messages);
        assert!(messages
            .iter()
            .any(|m| m.text.contains("Missing ASSERT")));
    }

    #[test]
    fn failed_assert_is_an_error() {
        let src = ";assert 0\nMOV $0, $1\n";
        let mut messages = Vec::new();
        let _ = run(&lines_of(src), &AssembleOptions::default(), &mut messages);
        assert!(messages
            .iter()
            .any(|m| m.is_error() && m.text.contains("Assertion failed")));
    }

    #[test]
    fn for_rof_expands_body_n_times() {
        let src = ";assert 1\nFOR 3\nADD #1, $1\nROF\n";
        let mut messages = Vec::new();
        let out = run(&lines_of(src), &AssembleOptions::default(), &mut messages)
            .expect("pass1 always succeeds");
        assert_eq!(out.instructions.len(), 3);
        assert!(out.instructions.iter().all(|l| l.text == "ADD #1, $1"));
    }

    #[test]
    fn for_with_label_and_amp_substitution() {
        let src = ";assert 1\ni FOR 3\nDAT #&i\nROF\n";
        let mut messages = Vec::new();
        let out = run(&lines_of(src), &AssembleOptions::default(), &mut messages)
            .expect("pass1 always succeeds");
        let texts: Vec<&str> =
            out.instructions.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["DAT #01", "DAT #02", "DAT #03"]);
    }

    #[test]
    fn multiline_equ_bare_reference_expands_and_remaps_labels() {
        let src =
            ";assert 1\nstep EQU ADD #1, $1\nEQU JMP $-1\nstep\nafter NOP $0\n";
        let mut messages = Vec::new();
        let out = run(&lines_of(src), &AssembleOptions::default(), &mut messages)
            .expect("pass1 always succeeds");
        assert_eq!(out.instructions.len(), 3);
        assert_eq!(out.instructions[0].text, "ADD #1, $1");
        assert_eq!(out.instructions[1].text, "JMP $-1");
        assert_eq!(out.instructions[2].text, "NOP $0");
        assert_eq!(out.symbols.get("after"), Some(&SymbolKind::Address(2)));
    }

    #[test]
    fn org_sets_start_offset() {
        let src = ";assert 1\nORG 1\nNOP $0\nNOP $0\n";
        let mut messages = Vec::new();
        let out = run(&lines_of(src), &AssembleOptions::default(), &mut messages)
            .expect("pass1 always succeeds");
        assert_eq!(out.org, Some(1));
    }

    #[test]
    fn end_with_offset_sets_org_and_halts() {
        let src = ";assert 1\nNOP $0\nNOP $0\nEND 1\nNOP $0\n";
        let mut messages = Vec::new();
        let out = run(&lines_of(src), &AssembleOptions::default(), &mut messages)
            .expect("pass1 always succeeds");
        assert_eq!(out.org, Some(1));
        assert_eq!(out.instructions.len(), 2);
    }

    #[test]
    fn second_redcode_halts_and_clears() {
        let src =
            ";redcode\n;assert 1\nNOP $0\n;redcode\n;assert 1\nNOP $0\nNOP $0\n";
        let mut messages = Vec::new();
        let out = run(&lines_of(src), &AssembleOptions::default(), &mut messages)
            .expect("pass1 always succeeds");
        assert!(out.instructions.is_empty());
    }

    #[test]
    fn pin_expression_is_recorded() {
        let src = ";assert 1\nPIN 7\nNOP $0\n";
        let mut messages = Vec::new();
        let out = run(&lines_of(src), &AssembleOptions::default(), &mut messages)
            .expect("pass1 always succeeds");
        assert_eq!(out.pin, Some(7));
    }
}
