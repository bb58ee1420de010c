//! The immutable product of a successful [`crate::assemble`] call.

use redcode::CompleteInstruction;

/// An assembled warrior ready to be loaded into a simulator.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WarriorData {
    /// The assembled instruction sequence, in core-load order.
    pub instructions: Vec<CompleteInstruction>,
    /// Offset into `instructions` where execution begins.
    pub start_offset: i64,
    /// The warrior's declared name (from `;name`), empty if unset.
    pub name: String,
    /// The warrior's declared author (from `;author`), empty if unset.
    pub author: String,
    /// The warrior's declared strategy (from `;strategy`, accumulated across
    /// lines), empty if unset.
    pub strategy: String,
    /// An optional P-space sharing key (from `PIN`).
    pub pin: Option<i64>,
    /// Non-fatal diagnostics produced while assembling this warrior.
    pub warnings: Vec<String>,
}

impl WarriorData {
    /// Convert into the [`redcode::Warrior`] a simulator loads, normalizing
    /// `start_offset` into `[0, core_size)`. `start_offset` may fall outside
    /// that range when an `ORG`/`END` expression evaluated to a negative or
    /// oversized value; normalization here matches the same wrap-around rule
    /// pass2 applies to instruction fields.
    #[must_use]
    pub fn to_warrior(&self, core_size: u32) -> redcode::Warrior {
        redcode::Warrior {
            code: self.instructions.clone(),
            start: redcode::normalize(self.start_offset, core_size),
            pin: self.pin,
        }
    }
}

#[cfg(test)]
mod tests {
    use coverage_helper::test;
    use redcode::{
        AddrMode, CompleteInstruction, Instruction, Modifier, Opcode,
    };

    use super::WarriorData;

    #[test]
    fn default_is_empty() {
        let w = WarriorData::default();
        assert!(w.instructions.is_empty());
        assert_eq!(w.start_offset, 0);
        assert!(w.name.is_empty());
        assert_eq!(w.pin, None);
    }

    #[test]
    fn to_warrior_carries_code_and_pin_and_normalizes_start() {
        let instr = CompleteInstruction {
            instr: Instruction {
                opcode: Opcode::Dat,
                modifier: Modifier::F,
                a_addr_mode: AddrMode::Immediate,
                b_addr_mode: AddrMode::Immediate,
            },
            a_field: 0,
            b_field: 0,
        };
        let data = WarriorData {
            instructions: vec![instr],
            start_offset: -1,
            pin: Some(7),
            ..WarriorData::default()
        };
        let warrior = data.to_warrior(8000);
        assert_eq!(warrior.code, vec![instr]);
        assert_eq!(warrior.start, 7999);
        assert_eq!(warrior.pin, Some(7));
    }
}
