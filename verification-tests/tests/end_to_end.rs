//! Assembles redcode source with `redcode-asm` and runs it through
//! `marzipan-sim`, exercising the full source-text-to-round-result pipeline
//! in one process.

use coverage_helper::test;
use marzipan_sim::{Simulator, SimulatorOptions};
use redcode::Warrior;
use redcode_asm::{assemble, AssembleOptions};

/// Options shared by every scenario below: standard '94 settings with a
/// small core so placement and termination are fast to reason about.
fn scenario_options(core_size: u32, warriors: u32) -> (AssembleOptions, SimulatorOptions) {
    let asm = AssembleOptions {
        core_size,
        warriors,
        min_separation: core_size / 4,
        ..AssembleOptions::default()
    };
    let sim = SimulatorOptions {
        core_size: asm.core_size,
        max_cycles: asm.max_cycles,
        max_length: asm.max_length,
        max_processes: asm.max_processes,
        min_separation: asm.min_separation,
        read_limit: asm.read_limit,
        write_limit: asm.write_limit,
        rounds: asm.rounds,
        pspace_size: asm.pspace_size,
        warriors: asm.warriors,
        ..SimulatorOptions::default()
    };
    (asm, sim)
}

/// Assembles `source`, panicking with the collected diagnostics on failure.
fn assemble_or_panic(source: &str, options: &AssembleOptions) -> Warrior {
    let result = assemble(source, options);
    assert!(
        result.success,
        "expected assembly to succeed, messages: {:?}",
        result.messages
    );
    result
        .warrior
        .expect("successful assembly always carries a warrior")
        .to_warrior(options.core_size)
}

/// S1: an imp beats a lone DAT.
#[test]
fn imp_beats_dat() {
    let (asm_opts, sim_opts) = scenario_options(800, 2);
    let imp = assemble_or_panic("MOV.I $0, $1\n", &asm_opts);
    let dat = assemble_or_panic("DAT.F #0, #0\n", &asm_opts);

    let mut sim = Simulator::new(sim_opts);
    sim.load_warriors(vec![imp, dat]).expect("two warriors load fine");
    let results = sim.run(Some(1)).expect("round runs to completion");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].winner_id, Some(0));
}

/// S2: two identical imps tie forever.
#[test]
fn imp_vs_imp_ties() {
    let (asm_opts, sim_opts) = scenario_options(800, 2);
    let imp_source = "MOV.I $0, $1\n";
    let imp_a = assemble_or_panic(imp_source, &asm_opts);
    let imp_b = assemble_or_panic(imp_source, &asm_opts);

    let mut sim = Simulator::new(sim_opts);
    sim.load_warriors(vec![imp_a, imp_b]).expect("two warriors load fine");
    let results = sim.run(Some(1)).expect("round runs to completion");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].winner_id, None);
}

/// S3: the classic dwarf assembles to four instructions with default
/// modifiers and an unmodified start offset.
#[test]
fn dwarf_assembles_to_four_instructions() {
    let (asm_opts, _sim_opts) = scenario_options(8000, 2);
    let source = "\
ADD.AB #4, $3
MOV.I  $2, @2
JMP    $-2, $0
DAT.F  #0, #0
";
    let result = assemble(source, &asm_opts);
    assert!(result.success, "messages: {:?}", result.messages);
    let warrior = result.warrior.expect("assembled warrior");
    assert_eq!(warrior.instructions.len(), 4);
    assert_eq!(warrior.start_offset, 0);
}

/// S4: FOR expansion with `&`-concatenated labels computes each iteration's
/// EQU independently.
#[test]
fn for_expansion_with_amp_substitution() {
    let (asm_opts, _sim_opts) = scenario_options(8000, 2);
    let source = "\
step EQU 10
i FOR 3
  x&i EQU &i*step
ROF
DAT #x01, #x02
";
    let result = assemble(source, &asm_opts);
    assert!(result.success, "messages: {:?}", result.messages);
    let warrior = result.warrior.expect("assembled warrior");
    assert_eq!(warrior.instructions.len(), 1);
    assert_eq!(warrior.instructions[0].a_field, 10);
    assert_eq!(warrior.instructions[0].b_field, 20);
}

/// S5: an explicit seed makes two independent battles identical down to the
/// round outcome, across several rounds.
#[test]
fn explicit_seed_is_deterministic_across_runs() {
    let (asm_opts, mut sim_opts) = scenario_options(8000, 3);
    sim_opts.seed = Some(42);
    sim_opts.rounds = 3;

    let imp_source = "MOV.I $0, $1\n";
    let warriors = || {
        vec![
            assemble_or_panic(imp_source, &asm_opts),
            assemble_or_panic(imp_source, &asm_opts),
            assemble_or_panic(imp_source, &asm_opts),
        ]
    };

    let mut first = Simulator::new(sim_opts);
    first.load_warriors(warriors()).expect("three warriors load fine");
    let first_results = first.run(Some(3)).expect("three rounds complete");

    let mut second = Simulator::new(sim_opts);
    second.load_warriors(warriors()).expect("three warriors load fine");
    let second_results = second.run(Some(3)).expect("three rounds complete");

    assert_eq!(first_results, second_results);
    assert_eq!(first.warrior_states(), second.warrior_states());
}

/// S6: a circular EQU reference doesn't hang the assembler; it resolves to
/// 0 with a warning, and the warrior still assembles.
#[test]
fn circular_equ_resolves_with_warning() {
    let (asm_opts, _sim_opts) = scenario_options(8000, 2);
    let source = "\
A EQU B
B EQU A
DAT 0, 0
ORG A
";
    let result = assemble(source, &asm_opts);
    assert!(result.success, "messages: {:?}", result.messages);
    let warrior = result.warrior.expect("assembled warrior");
    assert_eq!(warrior.start_offset, 0);
    assert!(warrior
        .warnings
        .iter()
        .any(|w| w.contains("Recursive EQU cycle")));
}
