//! Pass 2: turns each pass-1 instruction line into a [`CompleteInstruction`],
//! resolving operand addressing modes, default modifiers, and relative
//! label/EQU substitution.

use redcode::{AddrMode, CompleteInstruction, Instruction, Modifier, default_modifiers};

use crate::{
    lexer,
    message::Message,
    options::AssembleOptions,
    pass1::{Pass1Output, substitute_symbols},
};

/// Assemble every instruction line in `pass1` into its final bytecode form.
#[must_use]
pub fn run(
    pass1: &Pass1Output,
    options: &AssembleOptions,
    messages: &mut Vec<Message>,
) -> Vec<CompleteInstruction> {
    pass1
        .instructions
        .iter()
        .enumerate()
        .map(|(idx, instr_line)| {
            let curline = i64::try_from(idx).unwrap_or(i64::MAX);
            assemble_one(
                &instr_line.text,
                curline,
                pass1,
                options,
                messages,
                instr_line.line,
            )
        })
        .collect()
}

/// Parse and assemble a single `OPCODE[.MODIFIER] a-operand, b-operand` line.
fn assemble_one(
    text: &str,
    curline: i64,
    pass1: &Pass1Output,
    options: &AssembleOptions,
    messages: &mut Vec<Message>,
    line_no: usize,
) -> CompleteInstruction {
    let mut tokens = text.splitn(2, char::is_whitespace);
    let head = tokens.next().unwrap_or_default();
    let operand_text = tokens.next().unwrap_or_default().trim();

    let mut head_parts = head.splitn(2, '.');
    let opcode_word = head_parts.next().unwrap_or_default();
    let modifier_word = head_parts.next();

    let Some(opcode) = parse_opcode(opcode_word) else {
        messages.push(Message::error(
            line_no,
            format!("unknown opcode: {opcode_word}"),
        ));
        return CompleteInstruction::default();
    };

    let operands = lexer::split_top_level_commas(operand_text);
    let (a_text, b_text) = default_operands(opcode, &operands, messages, line_no);

    let (a_mode, a_expr) = split_addr_mode(&a_text);
    let (b_mode, b_expr) = split_addr_mode(&b_text);

    let modifier = modifier_word.map_or_else(
        || default_modifiers(opcode, a_mode, b_mode),
        |word| {
            parse_modifier(word).unwrap_or_else(|| {
                messages.push(Message::error(
                    line_no,
                    format!("unknown modifier: {word}"),
                ));
                default_modifiers(opcode, a_mode, b_mode)
            })
        },
    );

    let a_field = evaluate_operand(&a_expr, curline, pass1, options, messages, line_no);
    let b_field = evaluate_operand(&b_expr, curline, pass1, options, messages, line_no);

    CompleteInstruction {
        instr: Instruction {
            opcode,
            modifier,
            a_addr_mode: a_mode,
            b_addr_mode: b_mode,
        },
        a_field,
        b_field,
    }
}

/// Fill in a missing operand per the per-opcode defaulting rules: `DAT` takes
/// its sole operand as the B-operand with an implicit `#0` A-operand; every
/// other opcode's sole operand is the A-operand with an implicit `$0`
/// B-operand.
fn default_operands(
    opcode: redcode::Opcode,
    operands: &[String],
    messages: &mut Vec<Message>,
    line_no: usize,
) -> (String, String) {
    match operands {
        [a, b] => (a.clone(), b.clone()),
        [single] => {
            if opcode == redcode::Opcode::Dat {
                ("#0".to_owned(), single.clone())
            } else {
                (single.clone(), "$0".to_owned())
            }
        }
        [] => {
            messages.push(Message::error(line_no, "missing operands".to_owned()));
            ("#0".to_owned(), "$0".to_owned())
        }
        _ => {
            messages.push(Message::error(line_no, "too many operands".to_owned()));
            (operands[0].clone(), operands[1].clone())
        }
    }
}

/// Split a leading addressing-mode character off an operand, defaulting to
/// `$` (direct) when none is present.
fn split_addr_mode(operand: &str) -> (AddrMode, String) {
    let trimmed = operand.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some('#') => (AddrMode::Immediate, chars.as_str().to_owned()),
        Some('$') => (AddrMode::Direct, chars.as_str().to_owned()),
        Some('*') => (AddrMode::IndirectA, chars.as_str().to_owned()),
        Some('@') => (AddrMode::IndirectB, chars.as_str().to_owned()),
        Some('{') => (AddrMode::PredecA, chars.as_str().to_owned()),
        Some('<') => (AddrMode::PredecB, chars.as_str().to_owned()),
        Some('}') => (AddrMode::PostincA, chars.as_str().to_owned()),
        Some('>') => (AddrMode::PostincB, chars.as_str().to_owned()),
        _ => (AddrMode::Direct, trimmed.to_owned()),
    }
}

/// Substitute labels (relative to `curline`) and EQUs, then evaluate the
/// resulting expression, normalizing into `[0, coreSize)`.
fn evaluate_operand(
    expr: &str,
    curline: i64,
    pass1: &Pass1Output,
    options: &AssembleOptions,
    messages: &mut Vec<Message>,
    line_no: usize,
) -> u32 {
    let substituted = substitute_symbols(
        expr,
        &pass1.symbols,
        options,
        curline,
        &|label_value| label_value - curline,
        messages,
        line_no,
    );
    let core_size = i64::try_from(options.core_size).unwrap_or(i64::MAX).max(1);
    let mut evaluator = pass1.evaluator.borrow_mut();
    match evaluator.evaluate(&substituted) {
        Ok(result) => {
            let wrapped = i64::from(result.value).rem_euclid(core_size);
            u32::try_from(wrapped).unwrap_or(0)
        }
        Err(_err) => {
            messages.push(Message::error(line_no, "bad operand expression".to_owned()));
            0
        }
    }
}

/// Parse an opcode mnemonic, case-insensitively.
fn parse_opcode(word: &str) -> Option<redcode::Opcode> {
    use redcode::Opcode::{
        Add, Cmp, Dat, Div, Djn, Jmn, Jmp, Jmz, Ldp, Mod, Mov, Mul, Nop, Seq, Slt,
        Sne, Spl, Stp, Sub,
    };
    Some(match word.to_ascii_uppercase().as_str() {
        "DAT" => Dat,
        "MOV" => Mov,
        "ADD" => Add,
        "SUB" => Sub,
        "MUL" => Mul,
        "DIV" => Div,
        "MOD" => Mod,
        "JMP" => Jmp,
        "JMZ" => Jmz,
        "JMN" => Jmn,
        "DJN" => Djn,
        "SPL" => Spl,
        "SLT" => Slt,
        "CMP" => Cmp,
        "SEQ" => Seq,
        "SNE" => Sne,
        "NOP" => Nop,
        "LDP" => Ldp,
        "STP" => Stp,
        _ => return None,
    })
}

/// Parse a modifier mnemonic, case-insensitively.
fn parse_modifier(word: &str) -> Option<Modifier> {
    Some(match word.to_ascii_uppercase().as_str() {
        "A" => Modifier::A,
        "B" => Modifier::B,
        "AB" => Modifier::AB,
        "BA" => Modifier::BA,
        "F" => Modifier::F,
        "X" => Modifier::X,
        "I" => Modifier::I,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use coverage_helper::test;
    use redcode::{AddrMode, Modifier, Opcode};

    use super::run;
    use crate::{lexer, message::Message, options::AssembleOptions, pass1};

    fn assemble(src: &str) -> (pass1::Pass1Output, Vec<redcode::CompleteInstruction>, Vec<Message>) {
        let options = AssembleOptions::default();
        let reconstructed = lexer::reconstruct_lines(src);
        let mut messages = Vec::new();
        let out = pass1::run(&reconstructed, &options, &mut messages)
            .expect("pass1 always succeeds");
        let code = run(&out, &options, &mut messages);
        (out, code, messages)
    }

    #[test]
    fn assembles_explicit_operands_and_modifier() {
        let (_out, code, messages) = assemble(";assert 1\nMOV.I $1, #2\n");
        assert!(!messages.iter().any(Message::is_error));
        assert_eq!(code.len(), 1);
        assert_eq!(code[0].instr.opcode, Opcode::Mov);
        assert_eq!(code[0].instr.modifier, Modifier::I);
        assert_eq!(code[0].instr.a_addr_mode, AddrMode::Direct);
        assert_eq!(code[0].instr.b_addr_mode, AddrMode::Immediate);
        assert_eq!(code[0].a_field, 1);
        assert_eq!(code[0].b_field, 2);
    }

    #[test]
    fn dat_single_operand_becomes_b_field() {
        let (_out, code, messages) = assemble(";assert 1\nDAT #5\n");
        assert!(!messages.iter().any(Message::is_error));
        assert_eq!(code[0].a_field, 0);
        assert_eq!(code[0].instr.a_addr_mode, AddrMode::Immediate);
        assert_eq!(code[0].b_field, 5);
    }

    #[test]
    fn non_dat_single_operand_becomes_a_field() {
        let (_out, code, messages) = assemble(";assert 1\nJMP $4\n");
        assert!(!messages.iter().any(Message::is_error));
        assert_eq!(code[0].a_field, 4);
        assert_eq!(code[0].instr.b_addr_mode, AddrMode::Direct);
        assert_eq!(code[0].b_field, 0);
    }

    #[test]
    fn default_modifier_follows_table() {
        let (_out, code, messages) = assemble(";assert 1\nADD #1, $1\n");
        assert!(!messages.iter().any(Message::is_error));
        assert_eq!(code[0].instr.modifier, Modifier::AB);
    }

    #[test]
    fn label_is_substituted_relative_to_curline() {
        let (_out, code, messages) = assemble("loop ;assert 1\nloop JMP loop\nNOP $0\n");
        assert!(!messages.iter().any(Message::is_error));
        assert_eq!(code[0].a_field, 0);
    }

    #[test]
    fn unknown_opcode_is_an_error() {
        let (_out, _code, messages) = assemble(";assert 1\nBOGUS $0\n");
        assert!(messages
            .iter()
            .any(|m| m.is_error() && m.text.contains("unknown opcode")));
    }

    #[test]
    fn operand_field_wraps_into_core_size() {
        let (_out, code, messages) = assemble(";assert 1\nDAT #-1\n");
        assert!(!messages.iter().any(Message::is_error));
        assert_eq!(code[0].b_field, AssembleOptions::default().core_size - 1);
    }
}
