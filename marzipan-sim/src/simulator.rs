//! The battle orchestrator: warrior loading, round setup, round-robin
//! stepping, and score bookkeeping built on top of [`redcode_vm`]'s
//! per-instruction emulation.
//!
//! `redcode-vm`'s [`Emulator::reset_core`] wipes P-space along with Core, but
//! this crate needs P-space to persist across rounds while Core does not.
//! Rather than special-case that one call, every round gets a brand new
//! [`Emulator`], and [`crate::pspace_store::PSpaceStore`] carries P-space
//! state across that churn.

use core::fmt;

use redcode::Warrior;
use redcode_vm::emulators::generic_emulator::Emulator;
use redcode_vm::{EmulatorCore, EmulatorError};

use crate::checksum::checksum_seed;
use crate::events::{
    CoreAccessEvent, EventListener, Outcome, RoundEndEvent, RoundResult,
    TaskCountEvent,
};
use crate::position::position_warriors;
use crate::pspace_store::PSpaceStore;
use crate::ring::Ring;
use crate::SimulatorOptions;

/// A warrior's state as observed from outside a round, for inspection by a
/// host between or during battles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WarriorState {
    /// This warrior's id, `0..warriors.len()`.
    pub id: u64,
    /// Core address this warrior's first instruction was loaded at. `0` if
    /// no round has been set up yet.
    pub position: u32,
    /// Whether this warrior still has tasks queued in the current round.
    pub alive: bool,
    /// Number of tasks (queued PCs) this warrior currently holds.
    pub task_count: usize,
    /// Placement score histogram accumulated over every round run so far;
    /// index `k` counts how many rounds this warrior scored at bucket `k`
    /// (see [`Simulator::step`]'s module docs for the bucket layout).
    pub scores: Vec<u64>,
    /// This warrior's `lastResult` as of the end of the previous round.
    pub last_result: u32,
    /// The pin this warrior was assembled with, if any.
    pub pin: Option<i64>,
}

/// Failures that can occur validating warriors at load time.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum LoadError {
    /// No warriors were provided; a battle needs at least one.
    NoWarriors,
    /// More than 36 warriors were provided.
    TooManyWarriors,
    /// `fixedSeries` and `fixedPosition` were both set.
    ConflictingPositionOptions,
    /// `fixedPosition` was smaller than the effective `minSeparation`.
    FixedPositionTooSmall,
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWarriors => write!(f, "at least one warrior is required"),
            Self::TooManyWarriors => {
                write!(f, "at most 36 warriors may be loaded in one battle")
            }
            Self::ConflictingPositionOptions => write!(
                f,
                "fixed_series and fixed_position are mutually exclusive"
            ),
            Self::FixedPositionTooSmall => {
                write!(f, "fixed_position must be at least min_separation")
            }
        }
    }
}

/// Failures that can occur while running a loaded battle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// `setup_round` or `step` was called before `load_warriors`.
    NotLoaded,
    /// The underlying emulator reported an error.
    Emulator(EmulatorError),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotLoaded => write!(f, "no warriors have been loaded"),
            Self::Emulator(err) => write!(f, "{err}"),
        }
    }
}

impl From<EmulatorError> for SimError {
    fn from(err: EmulatorError) -> Self {
        Self::Emulator(err)
    }
}

/// Per-round scheduling state, rebuilt fresh by every `setup_round`.
struct RoundState {
    emulator: Emulator,
    ring: Ring,
    current: usize,
    cycle: i64,
    warriors_left: usize,
    alive: Vec<bool>,
    positions: Vec<u32>,
}

/// Orchestrates battles between loaded warriors: deterministic placement,
/// round-robin scheduling, P-space persistence, and scoring.
pub struct Simulator {
    options: SimulatorOptions,
    warriors: Vec<Warrior>,
    separation: u32,
    pspace_size: u32,
    pspace_store: PSpaceStore,
    round_num: u32,
    /// The seed chosen once for this battle: either the configured `seed`
    /// option or the first round's warrior checksum.
    chosen_seed: Option<i64>,
    /// The seed positioning will actually draw from this round. Carries
    /// forward the previous round's advanced value unless `fixedSeries`
    /// resets it back to `chosen_seed` every round.
    current_seed: i64,
    round: Option<RoundState>,
    scores: Vec<Vec<u64>>,
    listener: Option<Box<dyn EventListener>>,
}

impl Simulator {
    /// Build a simulator with no warriors loaded yet.
    #[must_use]
    pub fn new(options: SimulatorOptions) -> Self {
        Self {
            options,
            warriors: Vec::new(),
            separation: options.min_separation,
            pspace_size: 0,
            pspace_store: PSpaceStore::new(&[], options.core_size, 0),
            round_num: 0,
            chosen_seed: None,
            current_seed: 0,
            round: None,
            scores: Vec::new(),
            listener: None,
        }
    }

    /// Register a listener to observe battle events, replacing any previous
    /// one. Pass `None` to stop observing.
    pub fn set_event_listener(&mut self, listener: Option<Box<dyn EventListener>>) {
        self.listener = listener;
    }

    /// Validate and load a set of warriors for a fresh battle, per §4.8.1:
    /// at most 36 warriors, `minSeparation` raised to at least `maxLength`
    /// and lowered to fit the core, `fixedSeries`/`fixedPosition` mutually
    /// exclusive, and P-space sized and pin-grouped.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the configuration or warrior count is
    /// invalid.
    pub fn load_warriors(&mut self, warriors: Vec<Warrior>) -> Result<(), LoadError> {
        let n = warriors.len();
        if n == 0 {
            return Err(LoadError::NoWarriors);
        }
        if n > 36 {
            return Err(LoadError::TooManyWarriors);
        }
        if self.options.fixed_series && self.options.fixed_position.is_some() {
            return Err(LoadError::ConflictingPositionOptions);
        }

        let mut separation = self.options.min_separation;
        let max_length = u32::try_from(self.options.max_length).unwrap_or(u32::MAX);
        if separation < max_length {
            separation = max_length;
        }
        let n_u32 = u32::try_from(n).unwrap_or(u32::MAX);
        if self.options.core_size < n_u32.saturating_mul(separation) {
            separation = self.options.core_size / n_u32;
        }

        if let Some(fixed_position) = self.options.fixed_position {
            if fixed_position < separation {
                return Err(LoadError::FixedPositionTooSmall);
            }
        }

        let pspace_size = self.options.effective_pspace_size();
        let pins: Vec<Option<i64>> = warriors.iter().map(|w| w.pin).collect();

        self.warriors = warriors;
        self.separation = separation;
        self.pspace_size = pspace_size;
        self.pspace_store = PSpaceStore::new(&pins, self.options.core_size, pspace_size);
        self.round_num = 0;
        self.chosen_seed = None;
        self.current_seed = 0;
        self.round = None;
        // Per-warrior placement histogram: deaths are scored in
        // `[N, 2N-2]`, round-end survivors/ties in `[0, N-1]`.
        self.scores = vec![vec![0_u64; 2 * n - 1]; n];
        Ok(())
    }

    /// Resolve the seed this round's positioning draws from, per §4.8.2 /
    /// §4.8.7.
    ///
    /// The seed is chosen once per battle: the configured `seed` option, or
    /// else the warriors' checksum computed from round 1's emulator. Every
    /// later round continues drawing from wherever the previous round's
    /// positioning left the seed, so placements differ round to round,
    /// except under `fixedSeries`, which resets back to the originally
    /// chosen seed every round so every round places warriors identically.
    fn resolve_seed(&mut self, emulator: &Emulator) -> i64 {
        if self.chosen_seed.is_none() {
            let seed = self.options.seed.unwrap_or_else(|| {
                let warriors: Vec<Vec<redcode::CompleteInstruction>> =
                    self.warriors.iter().map(|w| w.code.clone()).collect();
                checksum_seed(emulator, &warriors)
            });
            self.chosen_seed = Some(seed);
            self.current_seed = seed;
        } else if self.options.fixed_series {
            if let Some(seed) = self.chosen_seed {
                self.current_seed = seed;
            }
        }
        self.current_seed
    }

    /// Place warriors deterministically at `i * fixedPosition mod coreSize`,
    /// bypassing the RNG entirely.
    fn fixed_positions(&self, fixed_position: u32) -> Vec<u32> {
        let core_size = self.options.core_size;
        (0..self.warriors.len())
            .map(|i| {
                let i_u32 = u32::try_from(i).unwrap_or(u32::MAX);
                i_u32.wrapping_mul(fixed_position) % core_size.max(1)
            })
            .collect()
    }

    /// Clear Core, place warriors, and start a fresh round: §4.8.2.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotLoaded`] if no warriors are loaded, or
    /// propagates any [`EmulatorError`] the underlying emulator reports.
    pub fn setup_round(&mut self) -> Result<(), SimError> {
        if self.warriors.is_empty() {
            return Err(SimError::NotLoaded);
        }
        let n = self.warriors.len();
        self.round_num = self.round_num.saturating_add(1);

        let mut emulator = Emulator::new(
            u64::from(self.options.core_size),
            u64::from(self.pspace_size),
            u64::try_from(n).unwrap_or(u64::MAX),
            u64::from(self.options.max_processes),
            u64::from(self.options.read_limit),
            u64::from(self.options.write_limit),
        )?;

        let positions = if let Some(fixed_position) = self.options.fixed_position {
            self.fixed_positions(fixed_position)
        } else {
            let seed = self.resolve_seed(&emulator);
            let (positions, next_seed) =
                position_warriors(n, self.options.core_size, self.separation, seed);
            self.current_seed = next_seed;
            positions
        };

        self.pspace_store.seed_round(&mut emulator)?;

        for (id, warrior) in self.warriors.iter().enumerate() {
            let position = positions[id];
            for (offset, instr) in warrior.code.iter().enumerate() {
                let offset = u32::try_from(offset).unwrap_or(0);
                let addr = position.wrapping_add(offset) % self.options.core_size.max(1);
                let bytecode = emulator.rc_to_bytecode(instr.instr);
                emulator.write_core(
                    addr,
                    bytecode,
                    instr.a_field % self.options.core_size.max(1),
                    instr.b_field % self.options.core_size.max(1),
                )?;
            }
            let start_pc =
                position.wrapping_add(warrior.start) % self.options.core_size.max(1);
            emulator.replace_process_queue(u64::try_from(id).unwrap_or(0), &[start_pc])?;
        }

        let current = (usize::try_from(self.round_num - 1).unwrap_or(0)) % n;
        self.round = Some(RoundState {
            emulator,
            ring: Ring::new(n),
            current,
            cycle: i64::from(self.options.max_cycles)
                .saturating_mul(i64::try_from(n).unwrap_or(1)),
            warriors_left: n,
            alive: vec![true; n],
            positions,
        });
        Ok(())
    }

    /// Execute one cycle: §4.8.3/§4.8.4. Returns the round's result once it
    /// concludes, `None` otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotLoaded`] if no round is in progress, or
    /// propagates any [`EmulatorError`] the underlying emulator reports.
    pub fn step(&mut self) -> Result<Option<RoundResult>, SimError> {
        let n = self.warriors.len();
        let Some(round) = self.round.as_mut() else {
            return Err(SimError::NotLoaded);
        };
        if round.cycle <= 0 || round.warriors_left < 2 {
            return Ok(Some(self.end_round()?));
        }

        let idx = round.current;
        let warrior_id = u64::try_from(idx).unwrap_or(0);
        round.emulator.step(warrior_id)?;

        if let Some(listener) = self.listener.as_deref_mut() {
            for &(address, access_type) in round.emulator.last_step_accesses() {
                listener.on_core_access(CoreAccessEvent {
                    warrior_id,
                    address,
                    access_type: access_type.into(),
                });
            }
        }

        let died = round.emulator.read_process_queue(warrior_id)?.is_empty();
        if died {
            let warriors_left = round.warriors_left;
            round.alive[idx] = false;
            let bucket = warriors_left + n - 2;
            if let Some(slot) = self.scores[idx].get_mut(bucket) {
                *slot = slot.saturating_add(1);
            }
            let wl = i64::try_from(warriors_left).unwrap_or(1);
            round.cycle = round.cycle - 1 - (round.cycle - 1).div_euclid(wl);
            round.warriors_left = warriors_left.saturating_sub(1);
            round.current = round.ring.unlink(idx);
        } else {
            round.current = round.ring.next(idx);
            round.cycle = round.cycle.saturating_sub(1);
        }

        if let Some(listener) = self.listener.as_deref_mut() {
            for (id, &alive) in round.alive.iter().enumerate() {
                if alive {
                    let task_count = round
                        .emulator
                        .read_process_queue(u64::try_from(id).unwrap_or(0))?
                        .len();
                    listener.on_task_count(TaskCountEvent {
                        warrior_id: u64::try_from(id).unwrap_or(0),
                        task_count,
                    });
                }
            }
        }

        if round.cycle <= 0 || round.warriors_left < 2 {
            Ok(Some(self.end_round()?))
        } else {
            Ok(None)
        }
    }

    /// Finalize scores and P-space for the round in progress: §4.8.8.
    fn end_round(&mut self) -> Result<RoundResult, SimError> {
        let Some(round) = self.round.take() else {
            return Err(SimError::NotLoaded);
        };
        self.pspace_store.persist_round(&round.emulator)?;

        let warriors_left = round.warriors_left;
        let mut winner_id = None;
        for (id, &alive) in round.alive.iter().enumerate() {
            let warrior_id = u64::try_from(id).unwrap_or(0);
            if alive {
                if let Some(slot) = self.scores[id].get_mut(warriors_left.saturating_sub(1)) {
                    *slot = slot.saturating_add(1);
                }
                self.pspace_store.set_last_result(
                    warrior_id,
                    u32::try_from(warriors_left).unwrap_or(0),
                );
                if warriors_left == 1 {
                    winner_id = Some(warrior_id);
                }
            } else {
                self.pspace_store.set_last_result(warrior_id, 0);
            }
        }

        let outcome = if winner_id.is_some() {
            Outcome::Win
        } else {
            Outcome::Tie
        };
        if let Some(listener) = self.listener.as_deref_mut() {
            listener.on_round_end(RoundEndEvent { winner_id });
        }
        Ok(RoundResult { winner_id, outcome })
    }

    /// Run `rounds` rounds to completion (or the configured `rounds` option
    /// if `None`), returning each round's result in order.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::NotLoaded`] if no warriors are loaded, or
    /// propagates any [`EmulatorError`] the underlying emulator reports.
    pub fn run(&mut self, rounds: Option<u32>) -> Result<Vec<RoundResult>, SimError> {
        if self.warriors.is_empty() {
            return Err(SimError::NotLoaded);
        }
        let total = rounds.unwrap_or(self.options.rounds);
        let mut results = Vec::with_capacity(total as usize);
        for _ in 0..total {
            self.setup_round()?;
            loop {
                if let Some(result) = self.step()? {
                    results.push(result);
                    break;
                }
            }
        }
        Ok(results)
    }

    /// Snapshot every loaded warrior's current state, for inspection
    /// between or during rounds.
    #[must_use]
    pub fn warrior_states(&self) -> Vec<WarriorState> {
        self.warriors
            .iter()
            .enumerate()
            .map(|(id, warrior)| {
                let warrior_id = u64::try_from(id).unwrap_or(0);
                let (position, alive, task_count) = self.round.as_ref().map_or(
                    (0, true, 0),
                    |round| {
                        let task_count = round
                            .emulator
                            .read_process_queue(warrior_id)
                            .unwrap_or_default()
                            .len();
                        (round.positions[id], round.alive[id], task_count)
                    },
                );
                WarriorState {
                    id: warrior_id,
                    position,
                    alive,
                    task_count,
                    scores: self.scores.get(id).cloned().unwrap_or_default(),
                    last_result: self.pspace_store.last_result(warrior_id),
                    pin: warrior.pin,
                }
            })
            .collect()
    }

    /// Read a single core cell's instruction and fields, if a round is
    /// currently in progress and `addr` is valid.
    #[must_use]
    pub fn peek_core(&self, addr: u32) -> Option<(redcode::Instruction, u32, u32)> {
        let round = self.round.as_ref()?;
        let (bytecode, a_field, b_field) = round.emulator.read_core(addr).ok()?;
        let instr = round.emulator.bytecode_to_rc(bytecode).ok()?;
        Some((instr, a_field, b_field))
    }
}

#[cfg(test)]
mod tests {
    use coverage_helper::test;
    use redcode::{AddrMode, CompleteInstruction, Instruction, Modifier, Opcode, Warrior};

    use super::{LoadError, Simulator};
    use crate::events::Outcome;
    use crate::SimulatorOptions;

    fn imp() -> Warrior {
        Warrior {
            code: vec![CompleteInstruction {
                instr: Instruction {
                    opcode: Opcode::Mov,
                    modifier: Modifier::I,
                    a_addr_mode: AddrMode::Direct,
                    b_addr_mode: AddrMode::Direct,
                },
                a_field: 0,
                b_field: 1,
            }],
            start: 0,
            pin: None,
        }
    }

    fn dat() -> Warrior {
        Warrior {
            code: vec![CompleteInstruction {
                instr: Instruction {
                    opcode: Opcode::Dat,
                    modifier: Modifier::F,
                    a_addr_mode: AddrMode::Immediate,
                    b_addr_mode: AddrMode::Immediate,
                },
                a_field: 0,
                b_field: 0,
            }],
            start: 0,
            pin: None,
        }
    }

    fn small_options() -> SimulatorOptions {
        SimulatorOptions {
            core_size: 200,
            max_cycles: 500,
            max_length: 10,
            max_processes: 64,
            min_separation: 20,
            rounds: 1,
            ..SimulatorOptions::default()
        }
    }

    #[test]
    fn rejects_too_many_warriors() {
        let mut sim = Simulator::new(small_options());
        let warriors = core::iter::repeat(imp()).take(37).collect();
        assert_eq!(sim.load_warriors(warriors), Err(LoadError::TooManyWarriors));
    }

    #[test]
    fn rejects_empty_warrior_list() {
        let mut sim = Simulator::new(small_options());
        assert_eq!(sim.load_warriors(Vec::new()), Err(LoadError::NoWarriors));
    }

    #[test]
    fn rejects_conflicting_position_options() {
        let mut options = small_options();
        options.fixed_series = true;
        options.fixed_position = Some(50);
        let mut sim = Simulator::new(options);
        assert_eq!(
            sim.load_warriors(vec![imp(), imp()]),
            Err(LoadError::ConflictingPositionOptions)
        );
    }

    #[test]
    fn a_dat_warrior_loses_to_an_imp() {
        let mut sim = Simulator::new(small_options());
        sim.load_warriors(vec![dat(), imp()]).unwrap();
        let results = sim.run(Some(1)).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].winner_id, Some(1));
        assert_eq!(results[0].outcome, Outcome::Win);
    }

    #[test]
    fn two_imps_tie_out_the_cycle_budget() {
        let mut sim = Simulator::new(small_options());
        sim.load_warriors(vec![imp(), imp()]).unwrap();
        let results = sim.run(Some(1)).unwrap();
        assert_eq!(results[0].outcome, Outcome::Tie);
        assert_eq!(results[0].winner_id, None);
    }

    #[test]
    fn starter_rotates_with_round_number() {
        let mut options = small_options();
        options.rounds = 2;
        let mut sim = Simulator::new(options);
        sim.load_warriors(vec![imp(), imp()]).unwrap();
        sim.setup_round().unwrap();
        let first_round_current = sim.round.as_ref().unwrap().current;
        sim.setup_round().unwrap();
        let second_round_current = sim.round.as_ref().unwrap().current;
        assert_ne!(first_round_current, second_round_current);
    }

    #[test]
    fn explicit_seed_is_deterministic_across_loads() {
        let mut options = small_options();
        options.seed = Some(12345);
        let mut a = Simulator::new(options);
        a.load_warriors(vec![imp(), dat()]).unwrap();
        let results_a = a.run(Some(1)).unwrap();

        let mut b = Simulator::new(options);
        b.load_warriors(vec![imp(), dat()]).unwrap();
        let results_b = b.run(Some(1)).unwrap();

        assert_eq!(results_a, results_b);
    }

    #[test]
    fn fixed_position_places_warriors_without_rng() {
        let mut options = small_options();
        options.fixed_position = Some(40);
        let mut sim = Simulator::new(options);
        sim.load_warriors(vec![imp(), imp(), imp()]).unwrap();
        sim.setup_round().unwrap();
        let states = sim.warrior_states();
        assert_eq!(states[0].position, 0);
        assert_eq!(states[1].position, 40);
        assert_eq!(states[2].position, 80);
    }
}
