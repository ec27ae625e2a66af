//! Explicit pipeline state machine.
//!
//! Each variant owns exactly what the next stage needs, so narrating before
//! optimizing cannot be expressed. `Completed` and `Failed` are absorbing.

use crate::error::PlannerError;
use crate::events::{Disconnected, Stage};
use crate::model::{CandidateSet, Itinerary, NormalizedSpec, TripRequest};
use crate::narrate::Narrative;

use super::PlanResult;

#[derive(Debug)]
pub enum PipelineState {
    Init {
        request: TripRequest,
    },
    Parsed {
        spec: NormalizedSpec,
        clarifications: Vec<String>,
    },
    Researched {
        spec: NormalizedSpec,
        clarifications: Vec<String>,
        candidates: CandidateSet,
    },
    Optimized {
        spec: NormalizedSpec,
        clarifications: Vec<String>,
        candidates: CandidateSet,
        itinerary: Itinerary,
    },
    Narrated {
        spec: NormalizedSpec,
        clarifications: Vec<String>,
        candidates: CandidateSet,
        itinerary: Itinerary,
        narrative: Narrative,
    },
    Completed(Box<PlanResult>),
    Failed {
        stage: Option<Stage>,
        cause: FailureCause,
    },
}

impl PipelineState {
    /// Stage that runs when leaving this state
    pub fn next_stage(&self) -> Option<Stage> {
        match self {
            PipelineState::Init { .. } => Some(Stage::Parser),
            PipelineState::Parsed { .. } => Some(Stage::Researcher),
            PipelineState::Researched { .. } => Some(Stage::Optimizer),
            PipelineState::Optimized { .. } => Some(Stage::Storyteller),
            PipelineState::Narrated { .. }
            | PipelineState::Completed(_)
            | PipelineState::Failed { .. } => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PipelineState::Completed(_) | PipelineState::Failed { .. }
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Init { .. } => "init",
            PipelineState::Parsed { .. } => "parsed",
            PipelineState::Researched { .. } => "researched",
            PipelineState::Optimized { .. } => "optimized",
            PipelineState::Narrated { .. } => "narrated",
            PipelineState::Completed(_) => "completed",
            PipelineState::Failed { .. } => "failed",
        }
    }

    pub(crate) fn disconnected(stage: Option<Stage>) -> Self {
        PipelineState::Failed {
            stage,
            cause: FailureCause::Disconnected,
        }
    }
}

/// Why a run ended in `Failed`
#[derive(Debug)]
pub enum FailureCause {
    /// Reported to the consumer as the terminal `error` frame
    Error(PlannerError),
    /// The consumer left; nothing further was emitted
    Disconnected,
}

impl From<Disconnected> for FailureCause {
    fn from(_: Disconnected) -> Self {
        FailureCause::Disconnected
    }
}

/// Final state of one run
#[derive(Debug)]
pub enum PipelineOutcome {
    Completed(Box<PlanResult>),
    Failed {
        stage: Option<Stage>,
        cause: FailureCause,
    },
}

impl PipelineOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, PipelineOutcome::Completed(_))
    }

    pub fn result(&self) -> Option<&PlanResult> {
        match self {
            PipelineOutcome::Completed(result) => Some(result),
            PipelineOutcome::Failed { .. } => None,
        }
    }

    pub fn into_result(self) -> Option<PlanResult> {
        match self {
            PipelineOutcome::Completed(result) => Some(*result),
            PipelineOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&PlannerError> {
        match self {
            PipelineOutcome::Failed {
                cause: FailureCause::Error(error),
                ..
            } => Some(error),
            _ => None,
        }
    }
}
