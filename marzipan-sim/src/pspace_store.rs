//! Persistent P-space storage.
//!
//! `redcode-vm`'s [`Emulator`] owns a P-space, but
//! [`Emulator::reset_core`] wipes it along with everything else, and a
//! battle constructs a brand-new [`Emulator`] every round (see
//! [`crate::simulator`]'s module docs for why). This module is the bridge:
//! it remembers each pin-group's cell contents and each warrior's
//! `lastResult` across that churn, seeding a freshly built emulator at the
//! start of every round and reading its final state back at the end.
//!
//! Index `0` of a warrior's P-space is `lastResult`, which stays private
//! per-warrior even when warriors share a pin. It is tracked here
//! separately from the shared cell contents for that reason.

use std::collections::HashMap;

use redcode_vm::emulators::generic_emulator::Emulator;
use redcode_vm::{EmulatorCore, EmulatorResult};

/// A warrior's P-space group: either a pin shared with other warriors, or a
/// private space for a warrior with no pin. Private groups are keyed by a
/// value no real pin can take, so they never collide with a shared group.
fn private_group_key(warrior_id: u64) -> i64 {
    -1 - i64::try_from(warrior_id).unwrap_or(0)
}

/// Reinterprets a group key's bit pattern as the `u64` pin value
/// [`Emulator::initialize_pspace`] expects. Distinct group keys, whether
/// pins or private keys, always produce distinct `u64`s.
fn group_key_as_pin(key: i64) -> u64 {
    #[allow(
        clippy::cast_sign_loss,
        reason = "reinterpreting bits as an opaque pin identifier, not truncating a value"
    )]
    let bits = key as u64;
    bits
}

/// Persists P-space cell contents and `lastResult` values across rounds.
pub struct PSpaceStore {
    pspace_size: u32,
    core_size: u32,
    /// Each warrior's assigned group key (its pin, or a private key).
    groups: Vec<i64>,
    /// Shared cell contents, keyed by group; index `0` is unused since
    /// `lastResult` is tracked separately.
    cells: HashMap<i64, Vec<u32>>,
    /// Per-warrior `lastResult`, private even within a shared pin.
    last_result: Vec<u32>,
}

impl PSpaceStore {
    /// Build a store for `pins.len()` warriors. `pins[i]` is the pin
    /// assigned to warrior `i`, or `None` if unpinned. `lastResult`
    /// defaults to `core_size - 1` for every warrior.
    #[must_use]
    pub fn new(pins: &[Option<i64>], core_size: u32, pspace_size: u32) -> Self {
        let groups: Vec<i64> = pins
            .iter()
            .enumerate()
            .map(|(id, pin)| pin.unwrap_or_else(|| private_group_key(id as u64)))
            .collect();
        let mut cells = HashMap::new();
        for &group in &groups {
            cells
                .entry(group)
                .or_insert_with(|| vec![0_u32; pspace_size as usize]);
        }
        let last_result = vec![core_size.saturating_sub(1); pins.len()];
        Self {
            pspace_size,
            core_size,
            groups,
            cells,
            last_result,
        }
    }

    /// The `(pin, warrior_id)` pairs to hand to
    /// [`Emulator::initialize_pspace`] at the start of a round.
    #[must_use]
    pub fn pspace_map(&self) -> Vec<(u64, u64)> {
        self.groups
            .iter()
            .enumerate()
            .map(|(id, &group)| (group_key_as_pin(group), id as u64))
            .collect()
    }

    /// Seed a freshly constructed emulator's P-space with the persisted
    /// group contents and per-warrior `lastResult` values.
    ///
    /// # Errors
    ///
    /// Propagates any [`redcode_vm::EmulatorError`] from the underlying
    /// emulator calls.
    pub fn seed_round(&self, emulator: &mut Emulator) -> EmulatorResult<()> {
        if self.pspace_size == 0 {
            return Ok(());
        }
        emulator.initialize_pspace(&self.pspace_map())?;
        for (id, &group) in self.groups.iter().enumerate() {
            let warrior_id = id as u64;
            if let Some(values) = self.cells.get(&group) {
                for (addr, &value) in values.iter().enumerate().skip(1) {
                    emulator.write_pspace(warrior_id, addr as u32, value)?;
                }
            }
            emulator.write_pspace(warrior_id, 0, self.last_result[id])?;
        }
        Ok(())
    }

    /// Read back a finished round's P-space state for next round's seeding.
    /// Each group's shared cells are taken from its first member; every
    /// warrior's `lastResult` is read individually.
    ///
    /// # Errors
    ///
    /// Propagates any [`redcode_vm::EmulatorError`] from the underlying
    /// emulator calls.
    pub fn persist_round(&mut self, emulator: &dyn EmulatorCore) -> EmulatorResult<()> {
        if self.pspace_size == 0 {
            return Ok(());
        }
        let mut seen_groups = HashMap::new();
        for (id, &group) in self.groups.iter().enumerate() {
            let warrior_id = id as u64;
            self.last_result[id] = emulator.read_pspace(warrior_id, 0)?;
            seen_groups.entry(group).or_insert(warrior_id);
        }
        for (&group, &representative) in &seen_groups {
            let values = self
                .cells
                .entry(group)
                .or_insert_with(|| vec![0_u32; self.pspace_size as usize]);
            for (addr, slot) in values.iter_mut().enumerate().skip(1) {
                *slot = emulator.read_pspace(representative, addr as u32)?;
            }
        }
        Ok(())
    }

    /// A warrior's persisted `lastResult`, as it stands before this round's
    /// `seed_round` call (or after the previous round's `persist_round`).
    #[must_use]
    pub fn last_result(&self, warrior_id: u64) -> u32 {
        self.last_result
            .get(warrior_id as usize)
            .copied()
            .unwrap_or(self.core_size.saturating_sub(1))
    }

    /// Overwrite a warrior's persisted `lastResult` directly, used at round
    /// end once the winner is known.
    pub fn set_last_result(&mut self, warrior_id: u64, value: u32) {
        if let Some(slot) = self.last_result.get_mut(warrior_id as usize) {
            *slot = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use coverage_helper::test;
    use redcode_vm::emulators::generic_emulator::Emulator;

    use super::PSpaceStore;

    #[test]
    fn last_result_defaults_to_core_size_minus_one() {
        let store = PSpaceStore::new(&[None, None], 8000, 500);
        assert_eq!(store.last_result(0), 7999);
        assert_eq!(store.last_result(1), 7999);
    }

    #[test]
    fn unpinned_warriors_get_distinct_private_groups() {
        let store = PSpaceStore::new(&[None, None], 8000, 500);
        let map = store.pspace_map();
        assert_ne!(map[0].0, map[1].0);
    }

    #[test]
    fn pinned_warriors_share_a_group() {
        let store = PSpaceStore::new(&[Some(7), Some(7)], 8000, 500);
        let map = store.pspace_map();
        assert_eq!(map[0].0, map[1].0);
    }

    #[test]
    fn seed_then_persist_round_trips_cell_contents_and_last_result() {
        let mut store = PSpaceStore::new(&[Some(1), Some(1)], 100, 10);
        store.set_last_result(0, 42);
        store.set_last_result(1, 43);

        let mut emulator = Emulator::new(100, 10, 2, 100, 0, 0).unwrap();
        store.seed_round(&mut emulator).unwrap();
        emulator.write_pspace(0, 3, 123).unwrap();

        store.persist_round(&emulator).unwrap();
        assert_eq!(store.last_result(0), 42);
        assert_eq!(store.last_result(1), 43);

        let mut second = Emulator::new(100, 10, 2, 100, 0, 0).unwrap();
        store.seed_round(&mut second).unwrap();
        assert_eq!(second.read_pspace(1, 3).unwrap(), 123);
    }
}
