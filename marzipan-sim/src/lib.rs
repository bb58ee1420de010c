//! # Marzipan-Sim
//!
//! Marzipan-Sim is a Memory Array Redcode Simulator (MARS): it composes
//! [`redcode_vm`]'s low-level [`redcode_vm::EmulatorCore`] into rounds,
//! battles, and scores.
//!
//! `redcode_vm` emulates single instructions against an opaque core; it has
//! no notion of warrior placement, rounds, or P-space persistence across
//! rounds.  This crate supplies exactly that: warrior loading and
//! validation, deterministic positioning, round setup/teardown, the
//! round-robin "alive ring" scheduler, score bookkeeping, and the event
//! stream a host uses to observe a battle.
//!
//! ## Usage
//!
//! ```rust
//! use redcode::{AddrMode, CompleteInstruction, Instruction, Modifier, Opcode, Warrior};
//! use marzipan_sim::{Simulator, SimulatorOptions};
//!
//! let imp = Warrior {
//!     code: vec![CompleteInstruction {
//!         instr: Instruction {
//!             opcode: Opcode::Mov,
//!             modifier: Modifier::I,
//!             a_addr_mode: AddrMode::Direct,
//!             b_addr_mode: AddrMode::Direct,
//!         },
//!         a_field: 0,
//!         b_field: 1,
//!     }],
//!     start: 0,
//!     pin: None,
//! };
//!
//! let mut sim = Simulator::new(SimulatorOptions::default());
//! sim.load_warriors(vec![imp.clone(), imp]).expect("two warriors load fine");
//! let results = sim.run(Some(1)).expect("round runs to completion");
//! assert_eq!(results.len(), 1);
//! ```
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

/// Modular arithmetic helpers shared by positioning and checksum derivation.
mod arith;

/// Park-Miller minimal-standard Lehmer RNG.
mod rng;

/// Deterministic warrior placement (`posit`/`npos`).
mod position;

/// Warrior-checksum-derived seed computation.
mod checksum;

/// Per-pin P-space storage that persists across rounds within one
/// [`Simulator`].
mod pspace_store;

/// The doubly-linked "alive ring" round-robin scheduler.
mod ring;

/// Configuration accepted by [`Simulator::new`].
pub mod options;
pub use options::SimulatorOptions;

/// Event schemas and the listener trait a host implements to observe a
/// battle.
pub mod events;
pub use events::{
    CoreAccessEvent, EventListener, Outcome, RoundEndEvent, RoundResult,
    TaskCountEvent,
};

/// The [`Simulator`] itself and its public battle-orchestration API.
pub mod simulator;
pub use simulator::{LoadError, SimError, Simulator, WarriorState};
