//! Derives a deterministic RNG seed from the loaded warriors' instructions,
//! used whenever no explicit seed is configured.

use redcode::CompleteInstruction;
use redcode_vm::EmulatorCore;

use crate::rng::{next, CYCLE_LENGTH};

/// XOR-accumulate every warrior's packed instruction identifier and field
/// values into a running 32-bit checksum, then fold it into a valid RNG
/// seed with one generator step.
///
/// Each "instruction field" XORed against the shuffle counter is taken to
/// be: the opcode/modifier/addressing-mode identifier (via
/// [`EmulatorCore::rc_to_bytecode`]), the A-field, and the B-field, the
/// three numeric quantities a [`CompleteInstruction`] actually carries.
#[must_use]
pub fn checksum_seed(
    emulator: &dyn EmulatorCore,
    warriors: &[Vec<CompleteInstruction>],
) -> i64 {
    let mut checksum: i32 = 0;
    let mut shuffle: u32 = 0;
    for warrior in warriors {
        for instr in warrior {
            let packed = emulator.rc_to_bytecode(instr.instr);
            for field in [packed, instr.a_field, instr.b_field] {
                #[allow(
                    clippy::cast_possible_wrap,
                    reason = "checksum XOR-fold is defined over wrapped 32-bit arithmetic"
                )]
                let signed_field = (field ^ shuffle) as i32;
                checksum = checksum.wrapping_add(signed_field);
                shuffle = shuffle.wrapping_add(1);
            }
        }
    }
    next(normalize_to_seed(checksum))
}

/// Fold a signed 32-bit checksum into the generator's valid seed range
/// `[1, 2^31-2]`.
fn normalize_to_seed(checksum: i32) -> i64 {
    #[allow(
        clippy::cast_sign_loss,
        reason = "reinterpreting the checksum's bit pattern as unsigned, not truncating a value"
    )]
    let bits = i64::from(checksum as u32);
    1 + bits.rem_euclid(CYCLE_LENGTH)
}

#[cfg(test)]
mod tests {
    use coverage_helper::test;
    use redcode::{AddrMode, CompleteInstruction, Instruction, Modifier, Opcode};
    use redcode_vm::emulators::generic_emulator;

    use super::checksum_seed;

    #[test]
    fn checksum_is_deterministic_and_in_seed_range() {
        let emulator =
            generic_emulator::Emulator::new(8000, 500, 2, 8000, 0, 0).unwrap();
        let warrior = vec![CompleteInstruction {
            instr: Instruction {
                opcode: Opcode::Mov,
                modifier: Modifier::I,
                a_addr_mode: AddrMode::Direct,
                b_addr_mode: AddrMode::Direct,
            },
            a_field: 0,
            b_field: 1,
        }];
        let warriors = vec![warrior.clone(), warrior];
        let a = checksum_seed(&emulator, &warriors);
        let b = checksum_seed(&emulator, &warriors);
        assert_eq!(a, b);
        assert!((1..=2_147_483_646).contains(&a));
    }

    #[test]
    fn different_warriors_usually_produce_different_seeds() {
        let emulator =
            generic_emulator::Emulator::new(8000, 500, 2, 8000, 0, 0).unwrap();
        let dat = vec![CompleteInstruction {
            instr: Instruction {
                opcode: Opcode::Dat,
                modifier: Modifier::F,
                a_addr_mode: AddrMode::Immediate,
                b_addr_mode: AddrMode::Immediate,
            },
            a_field: 0,
            b_field: 0,
        }];
        let mov = vec![CompleteInstruction {
            instr: Instruction {
                opcode: Opcode::Mov,
                modifier: Modifier::I,
                a_addr_mode: AddrMode::Direct,
                b_addr_mode: AddrMode::Direct,
            },
            a_field: 0,
            b_field: 1,
        }];
        let a = checksum_seed(&emulator, &[dat]);
        let b = checksum_seed(&emulator, &[mov]);
        assert_ne!(a, b);
    }
}
