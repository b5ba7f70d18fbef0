//! Playback state definitions.
//!
//! Each registered controller moves through a linear state machine:
//! `Created → Initializing → Primed → Playing`. Any state may transition to
//! `Stopped` (explicit stop, stop-all, or supersession by a new registration);
//! `Initializing` and `Primed` may transition to the terminal `Failed` when a
//! pipeline stage errors. No transition re-enters an earlier state.

use std::fmt;

/// Lifecycle state of one registered synth controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    /// Constructed and registered, pipeline not yet started.
    Created,
    /// `init` issued; covers the window until `prime` resolves.
    Initializing,
    /// `prime` resolved; ready to start.
    Primed,
    /// Audible.
    Playing,
    /// Stopped explicitly or superseded. Terminal.
    Stopped,
    /// A pipeline stage failed. Terminal; the controller stays registered so
    /// a later stop-all can still reach it.
    Failed,
}

impl PlaybackState {
    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_advance_to(self, next: PlaybackState) -> bool {
        use PlaybackState::*;
        match (self, next) {
            (_, Stopped) => !matches!(self, Stopped),
            (Created, Initializing) => true,
            (Initializing, Primed) => true,
            (Primed, Playing) => true,
            (Initializing, Failed) | (Primed, Failed) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, PlaybackState::Stopped | PlaybackState::Failed)
    }
}

/// One stage of the synthesis pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Initialize,
    Prime,
    Start,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Initialize => "initialize",
            PipelineStage::Prime => "prime",
            PipelineStage::Start => "start",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::PlaybackState::*;

    #[test]
    fn test_forward_transitions() {
        assert!(Created.can_advance_to(Initializing));
        assert!(Initializing.can_advance_to(Primed));
        assert!(Primed.can_advance_to(Playing));
    }

    #[test]
    fn test_everything_can_stop_except_stopped() {
        for state in [Created, Initializing, Primed, Playing, Failed] {
            assert!(state.can_advance_to(Stopped), "{state:?} must be stoppable");
        }
        assert!(!Stopped.can_advance_to(Stopped));
    }

    #[test]
    fn test_failure_only_from_pipeline_states() {
        assert!(Initializing.can_advance_to(Failed));
        assert!(Primed.can_advance_to(Failed));
        assert!(!Created.can_advance_to(Failed));
        assert!(!Playing.can_advance_to(Failed));
    }

    #[test]
    fn test_no_reentry() {
        assert!(!Playing.can_advance_to(Primed));
        assert!(!Primed.can_advance_to(Initializing));
        assert!(!Stopped.can_advance_to(Created));
        assert!(!Failed.can_advance_to(Primed));
    }
}
