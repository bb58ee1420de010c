//! # Redcode-Asm
//!
//! Redcode-Asm is the two-pass macro assembler for the redcode assembly
//! language used by the CoreWar programming game.  It turns warrior source
//! text into a [`WarriorData`] that a MARS implementation can load into a
//! core.
//!
//! ## Usage
//!
//! ```rust
//! use redcode_asm::{assemble, AssembleOptions};
//!
//! let source = "\
//! ;redcode
//! ;name Imp
//! ;author A. K. Dewdney
//! MOV.I $0, $1
//! ";
//! let result = redcode_asm::assemble(source, &AssembleOptions::default());
//! assert!(result.success);
//! let warrior = result.warrior.expect("assembly succeeded");
//! assert_eq!(warrior.code.len(), 1);
//! ```
//!
//! ## Pipeline
//!
//! 1. [`lexer`] reconstructs continuation lines and tokenizes source text.
//! 2. [`pass1`] walks tokenized lines, expanding `FOR`/`ROF` blocks, recording
//!    `EQU` macros, resolving `ORG`/`END`/`PIN`, and collecting address
//!    labels.
//! 3. [`pass2`] assembles each instruction line: it substitutes labels and
//!    EQUs, evaluates the A/B expressions with [`evaluator`], and normalizes
//!    the resulting fields modulo `coreSize`.
//!
//! Diagnostics accumulate in a list of [`Message`]s; any [`Severity::Error`]
//! causes assembly to fail with no warrior produced.
#![deny(
    // All typically enabled warnings are converted into errors
    // includes correctness, suspicious, style, complexity, and perf
    clippy::all,
    // Error on cargo lints
    clippy::cargo,
)]
#![warn(
    // Warn on pedantic and in-development nursery lints
    clippy::pedantic,
    clippy::nursery,
    // Lints from "restriction" group - enforce a consistent if arbitrary style
    clippy::alloc_instead_of_core,
    clippy::arithmetic_side_effects,
    clippy::unnecessary_cast,
    clippy::as_underscore,
    clippy::assertions_on_result_states,
    clippy::clone_on_ref_ptr,
    clippy::create_dir,
    clippy::dbg_macro,
    clippy::decimal_literal_representation,
    clippy::default_numeric_fallback,
    clippy::deref_by_slicing,
    clippy::empty_drop,
    clippy::empty_structs_with_brackets,
    clippy::exit,
    clippy::expect_used,
    clippy::filetype_is_file,
    clippy::float_arithmetic,
    clippy::fn_to_numeric_cast_any,
    clippy::format_push_string,
    clippy::get_unwrap,
    clippy::if_then_some_else_none,
    clippy::indexing_slicing,
    clippy::large_include_file,
    clippy::let_underscore_must_use,
    clippy::lossy_float_literal,
    clippy::map_err_ignore,
    clippy::mem_forget,
    clippy::missing_docs_in_private_items,
    clippy::missing_enforced_import_renames,
    clippy::mixed_read_write_in_expression,
    clippy::mod_module_files,
    clippy::multiple_inherent_impl,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::partial_pub_fields,
    clippy::pattern_type_mismatch,
    clippy::print_stderr,
    clippy::print_stdout,
    clippy::rc_buffer,
    clippy::rc_mutex,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::same_name_method,
    clippy::unseparated_literal_suffix,
    clippy::shadow_unrelated,
    clippy::std_instead_of_alloc,
    clippy::std_instead_of_core,
    clippy::str_to_string,
    clippy::string_slice,
    clippy::string_to_string,
    clippy::suspicious_xor_used_as_pow,
    clippy::todo,
    clippy::try_err,
    clippy::undocumented_unsafe_blocks,
    clippy::unimplemented,
    clippy::unnecessary_safety_comment,
    clippy::unnecessary_safety_doc,
    clippy::unnecessary_self_imports,
    clippy::unneeded_field_pattern,
    clippy::unreachable,
    clippy::unwrap_in_result,
    clippy::unwrap_used,
    clippy::use_debug,
    clippy::verbose_file_reads,
)]
#![allow(
    clippy::needless_pass_by_value,
    reason = "Internal Compiler Error bug workaround: https://github.com/rust-lang/rust-clippy/issues/10344"
)]

extern crate alloc;

/// Predefined, case-insensitive identifiers injected into every assembly
/// unit from [`AssembleOptions`].
pub mod predefined;

/// Diagnostics produced during assembly.
pub mod message;
pub use message::{Message, Severity};

/// Compile-time options consumed by [`assemble`].
pub mod options;
pub use options::AssembleOptions;

/// The recursive-descent expression evaluator with 26 persistent registers.
pub mod evaluator;
pub use evaluator::{EvalError, Evaluator};

/// Line reconstruction and tokenization.
pub mod lexer;

/// Label/EQU symbol table with multi-line macro bodies and cycle detection.
pub mod symbols;

/// Pass 1: macro expansion, directive handling, and symbol collection.
pub mod pass1;

/// Pass 2: instruction assembly from the symbol table and expanded lines.
pub mod pass2;

/// The immutable assembled warrior and its metadata.
pub mod warrior_data;
pub use warrior_data::WarriorData;

use redcode::CompleteInstruction;

/// The result of [`assemble`]: either a complete warrior or the set of
/// diagnostics that prevented one.
#[derive(Clone, Debug, Default)]
pub struct AssembleResult {
    /// `true` iff no [`Severity::Error`] message was produced.
    pub success: bool,
    /// The assembled warrior, present iff `success`.
    pub warrior: Option<WarriorData>,
    /// Every diagnostic produced during assembly, in emission order.
    pub messages: Vec<Message>,
}

/// Assemble redcode source text into a [`WarriorData`].
///
/// Always returns; assembly failures are reported as [`Severity::Error`]
/// messages rather than as an `Err`, matching the host contract that a
/// single result object carries both the product and its diagnostics.
#[must_use]
pub fn assemble(source: &str, options: &AssembleOptions) -> AssembleResult {
    let mut messages = Vec::new();

    let reconstructed = lexer::reconstruct_lines(source);
    let pass1_out = pass1::run(&reconstructed, options, &mut messages);

    let Some(pass1_out) = pass1_out else {
        return AssembleResult {
            success: false,
            warrior: None,
            messages,
        };
    };

    if pass1_out.instructions.len() > options.max_length {
        messages.push(Message::error(
            0,
            "instruction count exceeds maxLength".to_owned(),
        ));
        return AssembleResult {
            success: false,
            warrior: None,
            messages,
        };
    }
    if pass1_out.instructions.is_empty() {
        messages.push(Message::error(0, "zero instructions".to_owned()));
        return AssembleResult {
            success: false,
            warrior: None,
            messages,
        };
    }

    let code: Vec<CompleteInstruction> =
        pass2::run(&pass1_out, options, &mut messages);

    let has_error = messages.iter().any(Message::is_error);
    if has_error {
        return AssembleResult {
            success: false,
            warrior: None,
            messages,
        };
    }

    let warrior = WarriorData {
        instructions: code,
        start_offset: pass1_out.org.unwrap_or(0),
        name: pass1_out.name,
        author: pass1_out.author,
        strategy: pass1_out.strategy,
        pin: pass1_out.pin,
        warnings: messages
            .iter()
            .filter(|m| !m.is_error())
            .map(|m| m.text.clone())
            .collect(),
    };

    AssembleResult {
        success: true,
        warrior: Some(warrior),
        messages,
    }
}
