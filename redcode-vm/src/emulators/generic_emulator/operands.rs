use redcode::{AddrMode, CompleteInstruction, Instruction};

use super::offset;
use crate::{
    emulator_core::{AccessKind, EmulatorError, EmulatorResult},
    CoreAddr,
};

/// Loaded at the start of a cycle, not touched by later core modifications
#[derive(Copy, Clone, Debug)]
pub struct RegisterValues {
    /// The PC and the content of the instruction it points to
    pub current: RegisterValue,

    /// The A target and A values
    pub a: RegisterValue,

    /// The B target and B values
    pub b: RegisterValue,
}

/// A core index (e.g. PC or field target) and contents
#[derive(Copy, Clone, Debug)]
pub struct RegisterValue {
    /// Core index for the instruction that occupies this register
    pub idx: CoreAddr,
    /// Decoded instruction
    pub instr: Instruction,
    /// A field for the instruction in this register
    pub a_field: CoreAddr,
    /// B field for the instruction in this register
    pub b_field: CoreAddr,
}

// TODO(jespy) Break up this function into simpler components, and enable this
// lint for each
#[allow(
    clippy::indexing_slicing,
    reason = "Removing indexing adds redundant logic for error handling and \
              to satisfy the borrow checker"
)]
#[allow(clippy::too_many_lines, reason = "operand resolution has a lot of cases")]
/// Evaluate the A and B operands according to the operand modifier, applying
/// read/write distance folding, and appending every core touch to `events` in
/// the order encountered.
///
/// Because `PostIncrement` may modify the core, the values in
/// [`RegisterValue`] are not guaranteed to match the in-core values.
///
/// # Errors
///
/// Returns [`EmulatorError::InternalError`] in exceptional circumstances.
/// Typically this is the result of invalid parameters, or core corruption where
/// field values exceed `core_size - 1`.
pub fn evaluate(
    pc: CoreAddr,
    core: &mut [CompleteInstruction],
    read_limit: CoreAddr,
    write_limit: CoreAddr,
    events: &mut Vec<(CoreAddr, AccessKind)>,
) -> EmulatorResult<RegisterValues> {
    let size = core.len();

    // Cache a copy of the current instruction before any writes to the core
    let pc_idx = usize::try_from(pc).or(Err(EmulatorError::InternalError(
        "unable to convert pc into usize",
    )))?;
    let cur = *core
        .get(pc_idx)
        .ok_or(EmulatorError::InternalError("pc larger than core size"))?;

    let (a_target, a_instr) = resolve_operand(
        pc,
        cur.a_field,
        cur.instr.a_addr_mode,
        core,
        size,
        read_limit,
        write_limit,
        events,
    )?;
    let (b_target, b_instr) = resolve_operand(
        pc,
        cur.b_field,
        cur.instr.b_addr_mode,
        core,
        size,
        read_limit,
        write_limit,
        events,
    )?;

    Ok(RegisterValues {
        current: RegisterValue {
            idx: validate(pc, size)?,
            instr: cur.instr,
            a_field: validate(cur.a_field, size)?,
            b_field: validate(cur.b_field, size)?,
        },
        a: RegisterValue {
            idx: validate(a_target, size)?,
            instr: a_instr.instr,
            a_field: validate(a_instr.a_field, size)?,
            b_field: validate(a_instr.b_field, size)?,
        },
        b: RegisterValue {
            idx: validate(b_target, size)?,
            instr: b_instr.instr,
            a_field: validate(b_instr.a_field, size)?,
            b_field: validate(b_instr.b_field, size)?,
        },
    })
}

/// Resolves a single operand (A or B) of the current instruction: handles
/// predecrement/postincrement side effects on the pointer cell, applies
/// read/write folding to every address computed along the way, and records
/// the core accesses encountered.
#[allow(
    clippy::indexing_slicing,
    reason = "bounds are established by construction via core.len()"
)]
fn resolve_operand(
    pc: CoreAddr,
    field: CoreAddr,
    mode: AddrMode,
    core: &mut [CompleteInstruction],
    size: usize,
    read_limit: CoreAddr,
    write_limit: CoreAddr,
    events: &mut Vec<(CoreAddr, AccessKind)>,
) -> EmulatorResult<(CoreAddr, CompleteInstruction)> {
    if mode == AddrMode::Immediate {
        let idx = usize::try_from(pc).or(Err(EmulatorError::InternalError(
            "unable to convert pc into usize",
        )))?;
        return Ok((pc, core[idx]));
    }

    let raddr = fold(field, pc, read_limit, size)?;
    if mode == AddrMode::Direct {
        events.push((raddr, AccessKind::Read));
        let idx = usize::try_from(raddr).or(Err(EmulatorError::InternalError(
            "unable to convert core field into usize",
        )))?;
        return Ok((raddr, core[idx]));
    }

    let is_predec_postinc = matches!(
        mode,
        AddrMode::PredecA
            | AddrMode::PredecB
            | AddrMode::PostincA
            | AddrMode::PostincB
    );
    let base = if is_predec_postinc {
        fold(field, pc, write_limit, size)?
    } else {
        raddr
    };
    let base_idx = usize::try_from(base).or(Err(EmulatorError::InternalError(
        "unable to convert core field into usize",
    )))?;

    if matches!(mode, AddrMode::PredecA | AddrMode::PredecB) {
        events.push((base, AccessKind::Write));
        match mode {
            AddrMode::PredecA => decrement(&mut core[base_idx].a_field, size)?,
            AddrMode::PredecB => decrement(&mut core[base_idx].b_field, size)?,
            _ => unreachable!(),
        }
    } else {
        events.push((base, AccessKind::Read));
    }

    let pointer = match mode {
        AddrMode::IndirectA | AddrMode::PredecA | AddrMode::PostincA => {
            core[base_idx].a_field
        }
        AddrMode::IndirectB | AddrMode::PredecB | AddrMode::PostincB => {
            core[base_idx].b_field
        }
        AddrMode::Immediate | AddrMode::Direct => {
            return Err(EmulatorError::InternalError(
                "unreachable addressing mode in indirect operand resolution",
            ))
        }
    };

    let target = fold(pointer, base, read_limit, size)?;
    events.push((target, AccessKind::Read));
    let target_idx = usize::try_from(target).or(Err(EmulatorError::InternalError(
        "unable to convert core field into usize",
    )))?;
    let instr = core[target_idx];

    if matches!(mode, AddrMode::PostincA | AddrMode::PostincB) {
        events.push((base, AccessKind::Write));
        match mode {
            AddrMode::PostincA => increment(&mut core[base_idx].a_field, size)?,
            AddrMode::PostincB => increment(&mut core[base_idx].b_field, size)?,
            _ => unreachable!(),
        }
    }

    Ok((target, instr))
}

/// Fold `field + pc` into a window of radius `limit` around `pc`, modulo core
/// size.  `limit == 0` disables folding.
fn fold(
    field: CoreAddr,
    pc: CoreAddr,
    limit: CoreAddr,
    size: usize,
) -> EmulatorResult<CoreAddr> {
    if limit == 0 {
        return add(field, pc, size);
    }
    let Ok(core_size) = i64::try_from(size) else {
        return Err(EmulatorError::InternalError(
            "core size too large to be converted into i64",
        ))
    };
    let limit_i = i64::from(limit);
    let addr = i64::from(add(field, pc, size)?);
    let mut r = (addr + core_size - i64::from(pc)).rem_euclid(limit_i);
    if r > limit_i / 2 {
        r = r
            .checked_add(core_size)
            .and_then(|v| v.checked_sub(limit_i))
            .ok_or(EmulatorError::InternalError(
                "impossible overflow while folding an address",
            ))?;
    }
    let Ok(size_addr) = CoreAddr::try_from(size) else {
        return Err(EmulatorError::InternalError(
            "core size too large to be converted into CoreAddr u32",
        ))
    };
    offset(pc, r, size_addr)
}

/// Validate an address, lookup the value at that address, and add one modulo
/// core size
fn increment(val: &mut CoreAddr, size: usize) -> EmulatorResult<()> {
    let Ok(size) = CoreAddr::try_from(size) else {
        return Err(EmulatorError::InternalError(
            "core size too large to be converted into CoreAddr u32",
        ))
    };
    let new_val = super::offset(*val, 1, size)?;
    *val = new_val;
    Ok(())
}

/// Validate an address, lookup the value at that address, and subtract one
/// modulo core size
fn decrement(val: &mut CoreAddr, size: usize) -> EmulatorResult<()> {
    let Ok(size) = CoreAddr::try_from(size) else {
        return Err(EmulatorError::InternalError(
            "core size too large to be converted into CoreAddr u32",
        ))
    };
    let new_val = super::offset(*val, -1, size)?;
    *val = new_val;
    Ok(())
}

/// Add two values modulo core size
fn add(lhs: CoreAddr, rhs: CoreAddr, size: usize) -> EmulatorResult<CoreAddr> {
    let Ok(size) = CoreAddr::try_from(size) else {
        return Err(EmulatorError::InternalError(
            "core size too large to be converted into CoreAddr u32",
        ))
    };
    offset(lhs, rhs.into(), size)
}

/// Verify that a core value is valid relative to the core size
fn validate(val: CoreAddr, size: usize) -> EmulatorResult<CoreAddr> {
    let Ok(size) = CoreAddr::try_from(size) else {
        return Err(EmulatorError::InternalError(
            "core size too large to be converted into CoreAddr u32",
        ))
    };
    if val < (size as CoreAddr) {
        Ok(val)
    } else {
        Err(EmulatorError::InternalError(
            "Invalid core value greater than core size",
        ))
    }
}
