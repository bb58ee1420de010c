//! Runtime options a [`crate::Simulator`] is configured with.
//!
//! Mirrors `redcode-asm`'s `AssembleOptions` in shape, but carries the full
//! option set a battle needs rather than just what assembly needs.

/// Options that configure an entire battle: core geometry, cycle and
/// process budgets, warrior placement, and determinism controls.
///
/// Defaults match the standard '94 MARS settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimulatorOptions {
    /// Number of cells in the core.
    pub core_size: u32,
    /// Cycles budgeted per warrior per round.
    pub max_cycles: u32,
    /// Maximum number of instructions a single warrior may assemble to.
    pub max_length: usize,
    /// Maximum number of concurrent tasks a warrior may hold.
    pub max_processes: u32,
    /// Minimum circular distance enforced between warriors.
    pub min_separation: u32,
    /// Read folding radius; `0` is unlimited.
    pub read_limit: u32,
    /// Write folding radius; `0` is unlimited.
    pub write_limit: u32,
    /// Number of rounds to run per battle.
    pub rounds: u32,
    /// Explicit P-space size; `0` derives one from `core_size`.
    pub pspace_size: u32,
    /// Number of warriors that will be loaded into one battle.
    pub warriors: u32,
    /// Explicit RNG seed. `None` derives one from the warriors' checksum
    /// each round.
    pub seed: Option<i64>,
    /// When set, the checksum-derived seed is computed once (from round 1's
    /// warrior set) and reused for every round, rather than being
    /// recomputed per round.
    pub fixed_series: bool,
    /// When set, every warrior after the first is placed at this fixed
    /// offset from the previous warrior instead of being drawn randomly.
    /// Mutually exclusive with `fixed_series`.
    pub fixed_position: Option<u32>,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        Self {
            core_size: 8000,
            max_cycles: 80_000,
            max_length: 100,
            max_processes: 8_000,
            min_separation: 100,
            read_limit: 0,
            write_limit: 0,
            rounds: 1,
            pspace_size: 0,
            warriors: 2,
            seed: None,
            fixed_series: false,
            fixed_position: None,
        }
    }
}

impl SimulatorOptions {
    /// The effective P-space size: `pspace_size` if set, otherwise derived
    /// from `core_size` by finding the largest divisor of `core_size` in
    /// `1..=16`, preferring larger divisors.
    #[must_use]
    pub fn effective_pspace_size(&self) -> u32 {
        if self.pspace_size != 0 {
            return self.pspace_size;
        }
        (1..=16)
            .rev()
            .find(|d| self.core_size % d == 0)
            .map_or(self.core_size, |d| self.core_size / d)
    }
}

#[cfg(test)]
mod tests {
    use coverage_helper::test;

    use super::SimulatorOptions;

    #[test]
    fn derives_pspace_size_preferring_sixteen() {
        let opts = SimulatorOptions {
            core_size: 8000,
            ..SimulatorOptions::default()
        };
        assert_eq!(opts.effective_pspace_size(), 500);
    }

    #[test]
    fn explicit_pspace_size_wins() {
        let opts = SimulatorOptions {
            pspace_size: 64,
            ..SimulatorOptions::default()
        };
        assert_eq!(opts.effective_pspace_size(), 64);
    }

    #[test]
    fn falls_back_to_core_size_when_no_divisor_found() {
        let opts = SimulatorOptions {
            core_size: 17,
            ..SimulatorOptions::default()
        };
        assert_eq!(opts.effective_pspace_size(), 17);
    }

    #[test]
    fn defaults_match_the_standard_94_settings() {
        let opts = SimulatorOptions::default();
        assert_eq!(opts.core_size, 8000);
        assert_eq!(opts.warriors, 2);
        assert_eq!(opts.rounds, 1);
        assert_eq!(opts.seed, None);
        assert!(!opts.fixed_series);
        assert_eq!(opts.fixed_position, None);
    }
}
