//! Event schemas emitted while a round runs, and the listener trait a host
//! implements to observe them.

use redcode_vm::AccessKind;

/// The kind of touch a core address received, as seen from the outside.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum AccessType {
    /// The address was read as an operand or pointer.
    Read,
    /// The address was overwritten.
    Write,
    /// The address was fetched as the instruction about to execute.
    Execute,
}

impl From<AccessKind> for AccessType {
    fn from(kind: AccessKind) -> Self {
        match kind {
            AccessKind::Read => Self::Read,
            AccessKind::Write => Self::Write,
            AccessKind::Execute => Self::Execute,
        }
    }
}

/// A single core address touched during instruction execution.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CoreAccessEvent {
    /// The warrior whose task touched the core.
    pub warrior_id: u64,
    /// The core address touched.
    pub address: u32,
    /// How the address was touched.
    pub access_type: AccessType,
}

/// A warrior's task count as of the end of a cycle.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TaskCountEvent {
    /// The warrior this count belongs to.
    pub warrior_id: u64,
    /// The number of tasks (queued PCs) the warrior currently holds.
    pub task_count: usize,
}

/// Whether a round ended with a sole survivor or a tie among the rest.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// Exactly one warrior remained alive.
    Win,
    /// Zero or more than one warrior remained alive.
    Tie,
}

/// Emitted once, when a round concludes.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RoundEndEvent {
    /// The surviving warrior's id, present only for [`Outcome::Win`].
    pub winner_id: Option<u64>,
}

/// The result of a completed round, returned from [`crate::Simulator::step`]
/// and [`crate::Simulator::run`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RoundResult {
    /// The surviving warrior's id, present only for [`Outcome::Win`].
    pub winner_id: Option<u64>,
    /// Whether the round resolved to a single winner or a tie.
    pub outcome: Outcome,
}

/// Callbacks a host registers via [`crate::Simulator::set_event_listener`] to
/// observe a battle as it runs. Every method has a no-op default so a host
/// only implements the events it cares about.
pub trait EventListener {
    /// Called for every core address touched while executing a cycle.
    fn on_core_access(&mut self, _event: CoreAccessEvent) {}

    /// Called once per cycle for each warrior still alive.
    fn on_task_count(&mut self, _event: TaskCountEvent) {}

    /// Called once, when a round concludes.
    fn on_round_end(&mut self, _event: RoundEndEvent) {}
}

#[cfg(test)]
mod tests {
    use coverage_helper::test;
    use redcode_vm::AccessKind;

    use super::{AccessType, EventListener};

    #[derive(Default)]
    struct Recorder {
        accesses: usize,
        task_counts: usize,
        round_ends: usize,
    }

    impl EventListener for Recorder {
        fn on_core_access(&mut self, _event: super::CoreAccessEvent) {
            self.accesses += 1;
        }

        fn on_task_count(&mut self, _event: super::TaskCountEvent) {
            self.task_counts += 1;
        }

        fn on_round_end(&mut self, _event: super::RoundEndEvent) {
            self.round_ends += 1;
        }
    }

    #[test]
    fn access_kind_maps_onto_access_type() {
        assert_eq!(AccessType::from(AccessKind::Read), AccessType::Read);
        assert_eq!(AccessType::from(AccessKind::Write), AccessType::Write);
        assert_eq!(AccessType::from(AccessKind::Execute), AccessType::Execute);
    }

    #[test]
    fn default_listener_methods_are_callable_no_ops() {
        struct Silent;
        impl EventListener for Silent {}
        let mut listener = Silent;
        listener.on_core_access(super::CoreAccessEvent {
            warrior_id: 0,
            address: 0,
            access_type: AccessType::Read,
        });
        listener.on_task_count(super::TaskCountEvent {
            warrior_id: 0,
            task_count: 1,
        });
        listener.on_round_end(super::RoundEndEvent { winner_id: None });
    }

    #[test]
    fn a_listener_can_record_every_event_kind() {
        let mut recorder = Recorder::default();
        recorder.on_core_access(super::CoreAccessEvent {
            warrior_id: 0,
            address: 0,
            access_type: AccessType::Execute,
        });
        recorder.on_task_count(super::TaskCountEvent {
            warrior_id: 0,
            task_count: 1,
        });
        recorder.on_round_end(super::RoundEndEvent { winner_id: Some(0) });
        assert_eq!(recorder.accesses, 1);
        assert_eq!(recorder.task_counts, 1);
        assert_eq!(recorder.round_ends, 1);
    }
}
