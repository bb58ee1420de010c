//! Boundary behaviors and invariants that are easiest to pin down by
//! constructing warriors directly rather than through the assembler.

use coverage_helper::test;
use marzipan_sim::{Simulator, SimulatorOptions};
use redcode::{
    AddrMode, CompleteInstruction, Instruction, Modifier, Opcode, Warrior,
};
use redcode_asm::{assemble, AssembleOptions};

fn single_instruction_warrior(instr: CompleteInstruction) -> Warrior {
    Warrior {
        code: vec![instr],
        start: 0,
        pin: None,
    }
}

/// B2: SPL at exactly `tasks == maxProcesses` does not create a new task,
/// but the next instruction (`PC + 1`) is still pushed.
#[test]
fn spl_at_max_processes_pushes_next_but_not_a_new_task() {
    let spl = single_instruction_warrior(CompleteInstruction {
        instr: Instruction {
            opcode: Opcode::Spl,
            modifier: Modifier::B,
            a_addr_mode: AddrMode::Direct,
            b_addr_mode: AddrMode::Direct,
        },
        a_field: 0,
        b_field: 0,
    });
    let dat = single_instruction_warrior(CompleteInstruction {
        instr: Instruction {
            opcode: Opcode::Dat,
            modifier: Modifier::F,
            a_addr_mode: AddrMode::Immediate,
            b_addr_mode: AddrMode::Immediate,
        },
        a_field: 0,
        b_field: 0,
    });

    let options = SimulatorOptions {
        core_size: 10,
        max_processes: 1,
        warriors: 2,
        ..SimulatorOptions::default()
    };
    let mut sim = Simulator::new(options);
    sim.load_warriors(vec![spl, dat]).expect("two warriors load fine");
    sim.setup_round().expect("round sets up");
    sim.step().expect("first cycle executes warrior 0's SPL");

    let states = sim.warrior_states();
    assert!(states[0].alive, "a full process queue must not kill the task");
    assert_eq!(
        states[0].task_count, 1,
        "the spawned task must be dropped once the queue is at capacity"
    );
}

/// B3: DIV/MOD by zero in the `F`/`I`/`X` modifiers kills the task after
/// attempting the half of the operation whose divisor was non-zero.
#[test]
fn div_by_zero_in_one_field_of_an_f_modifier_still_kills_the_task() {
    let div = single_instruction_warrior(CompleteInstruction {
        instr: Instruction {
            opcode: Opcode::Div,
            modifier: Modifier::F,
            a_addr_mode: AddrMode::Immediate,
            b_addr_mode: AddrMode::Immediate,
        },
        // a_field (divisor for the A-pair) is zero; b_field (divisor for
        // the B-pair) is not.
        a_field: 0,
        b_field: 5,
    });
    let dat = single_instruction_warrior(CompleteInstruction {
        instr: Instruction {
            opcode: Opcode::Dat,
            modifier: Modifier::F,
            a_addr_mode: AddrMode::Immediate,
            b_addr_mode: AddrMode::Immediate,
        },
        a_field: 0,
        b_field: 0,
    });

    let options = SimulatorOptions {
        core_size: 10,
        warriors: 2,
        ..SimulatorOptions::default()
    };
    let mut sim = Simulator::new(options);
    sim.load_warriors(vec![div, dat]).expect("two warriors load fine");
    sim.setup_round().expect("round sets up");
    sim.step().expect("first cycle executes warrior 0's DIV.F");

    let states = sim.warrior_states();
    assert!(
        !states[0].alive,
        "a zero divisor in either field of an F-modified DIV must kill the task"
    );
}

/// B1: a `FOR` count of `N*65536 + k` produces exactly `k` iterations.
#[test]
fn for_count_truncates_modulo_65536() {
    let options = AssembleOptions::default();
    let source = "i FOR 65538\nDAT #0, #0\nROF\n";
    let result = assemble(source, &options);
    assert!(result.success, "messages: {:?}", result.messages);
    let warrior = result.warrior.expect("assembled warrior");
    assert_eq!(warrior.instructions.len(), 2);
}

/// P5: after positioning, every pairwise circular distance is at least the
/// effective minimum separation.
#[test]
fn positions_respect_minimum_separation() {
    let imp = single_instruction_warrior(CompleteInstruction {
        instr: Instruction {
            opcode: Opcode::Mov,
            modifier: Modifier::I,
            a_addr_mode: AddrMode::Direct,
            b_addr_mode: AddrMode::Direct,
        },
        a_field: 0,
        b_field: 1,
    });

    let core_size = 500;
    let separation = 50;
    let options = SimulatorOptions {
        core_size,
        min_separation: separation,
        warriors: 4,
        seed: Some(7),
        ..SimulatorOptions::default()
    };
    let mut sim = Simulator::new(options);
    sim.load_warriors(vec![imp.clone(), imp.clone(), imp.clone(), imp])
        .expect("four warriors load fine");
    sim.setup_round().expect("round sets up");

    let positions: Vec<u32> =
        sim.warrior_states().iter().map(|w| w.position).collect();
    assert_eq!(positions[0], 0);
    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let diff = positions[i].abs_diff(positions[j]);
            let circular = diff.min(core_size - diff);
            assert!(
                circular >= separation,
                "warriors {i} and {j} are only {circular} apart"
            );
        }
    }
}
