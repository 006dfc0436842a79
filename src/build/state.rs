// src/build/state.rs

//! Build state machine
//!
//! ```text
//! NotStarted -> Configuring -> Building -> Installing -> Done
//!                    \             \            \
//!                     +-------------+------------+--> Failed(phase)
//! ```

use super::phase::BuildPhase;
use std::fmt;

/// Where a build step is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildState {
    #[default]
    NotStarted,
    Configuring,
    Building,
    Installing,
    Done,
    Failed(BuildPhase),
}

impl BuildState {
    /// The state entered when a phase starts running
    pub fn running(phase: BuildPhase) -> Self {
        match phase {
            BuildPhase::Configure => Self::Configuring,
            BuildPhase::Build => Self::Building,
            BuildPhase::Install => Self::Installing,
        }
    }

    /// The phase currently running, if any
    pub fn active_phase(&self) -> Option<BuildPhase> {
        match self {
            Self::Configuring => Some(BuildPhase::Configure),
            Self::Building => Some(BuildPhase::Build),
            Self::Installing => Some(BuildPhase::Install),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }

    /// Whether `next` is a legal successor of this state
    pub fn can_transition_to(&self, next: BuildState) -> bool {
        use BuildState::*;
        match (self, next) {
            (NotStarted, Configuring)
            | (Configuring, Building)
            | (Building, Installing)
            | (Installing, Done) => true,
            (current, Failed(phase)) => current.active_phase() == Some(phase),
            _ => false,
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotStarted => f.write_str("not started"),
            Self::Configuring => f.write_str("configuring"),
            Self::Building => f.write_str("building"),
            Self::Installing => f.write_str("installing"),
            Self::Done => f.write_str("done"),
            Self::Failed(phase) => write!(f, "failed ({})", phase),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            BuildState::NotStarted,
            BuildState::Configuring,
            BuildState::Building,
            BuildState::Installing,
            BuildState::Done,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_no_skipping_phases() {
        assert!(!BuildState::NotStarted.can_transition_to(BuildState::Building));
        assert!(!BuildState::Configuring.can_transition_to(BuildState::Installing));
        assert!(!BuildState::Done.can_transition_to(BuildState::Configuring));
    }

    #[test]
    fn test_failure_only_from_matching_phase() {
        assert!(
            BuildState::Configuring.can_transition_to(BuildState::Failed(BuildPhase::Configure))
        );
        assert!(!BuildState::Configuring.can_transition_to(BuildState::Failed(BuildPhase::Build)));
        assert!(!BuildState::NotStarted.can_transition_to(BuildState::Failed(BuildPhase::Configure)));
    }

    #[test]
    fn test_terminal_states() {
        assert!(BuildState::Done.is_terminal());
        assert!(BuildState::Failed(BuildPhase::Install).is_terminal());
        assert!(!BuildState::Building.is_terminal());
        assert_eq!(BuildState::Failed(BuildPhase::Build).to_string(), "failed (build)");
    }
}
