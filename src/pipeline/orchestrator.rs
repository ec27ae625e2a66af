//! Drives one request through the four stages.
//!
//! Stages run strictly in sequence. Every stage is bracketed by a `running`
//! frame and exactly one `complete` or `error` frame, and each in-flight
//! stage is raced against consumer disconnect so a departed consumer stops
//! the run at the next suspension point.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::error::PlannerError;
use crate::events::{
    Disconnected, EventSink, ParsedPayload, ProgressEvent, Stage, StagePayload,
};
use crate::gather::Gatherer;
use crate::model::{CandidateSet, Itinerary, NormalizedSpec, TripRequest};
use crate::narrate::{Narrative, Narrator};
use crate::normalize::Normalizer;
use crate::optimize::Optimizer;

use super::state::{FailureCause, PipelineOutcome, PipelineState};
use super::{PipelineBuilder, PlanResult};

/// Why a transition stopped short of its next state
enum Halt {
    Disconnected,
    Error(PlannerError),
}

impl From<Disconnected> for Halt {
    fn from(_: Disconnected) -> Self {
        Halt::Disconnected
    }
}

impl From<PlannerError> for Halt {
    fn from(error: PlannerError) -> Self {
        Halt::Error(error)
    }
}

type Step = Result<PipelineState, Halt>;

pub struct Pipeline {
    normalizer: Normalizer,
    gatherer: Gatherer,
    optimizer: Optimizer,
    narrator: Narrator,
    channel_capacity: usize,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub(super) fn new(
        normalizer: Normalizer,
        gatherer: Gatherer,
        optimizer: Optimizer,
        narrator: Narrator,
        channel_capacity: usize,
    ) -> Self {
        Self {
            normalizer,
            gatherer,
            optimizer,
            narrator,
            channel_capacity,
        }
    }

    /// Run in a background task and hand back the frame receiver
    pub fn stream(self: &Arc<Self>, request: TripRequest) -> mpsc::Receiver<ProgressEvent> {
        self.spawn(request).0
    }

    /// Like `stream`, also returning the task's final outcome
    pub fn spawn(
        self: &Arc<Self>,
        request: TripRequest,
    ) -> (mpsc::Receiver<ProgressEvent>, JoinHandle<PipelineOutcome>) {
        let (sink, receiver) = EventSink::channel(self.channel_capacity);
        let pipeline = Arc::clone(self);
        let handle = tokio::spawn(async move { pipeline.run(request, sink).await });
        (receiver, handle)
    }

    /// Drive the state machine to a terminal state.
    ///
    /// The sink is dropped on return, which closes the stream.
    #[instrument(skip(self, request, sink), fields(destination = %request.destination))]
    pub async fn run(&self, request: TripRequest, sink: EventSink) -> PipelineOutcome {
        let started = Instant::now();
        let mut state = PipelineState::Init { request };
        loop {
            state = match state {
                PipelineState::Completed(result) => {
                    info!(
                        result_id = %result.result_id,
                        elapsed_ms = result.processing_time_ms,
                        frames = sink.emitted(),
                        "Pipeline completed"
                    );
                    return PipelineOutcome::Completed(result);
                }
                PipelineState::Failed { stage, cause } => {
                    return PipelineOutcome::Failed { stage, cause };
                }
                state => self.advance(state, &sink, started).await,
            };
        }
    }

    /// One transition out of a non-terminal state
    async fn advance(&self, state: PipelineState, sink: &EventSink, started: Instant) -> PipelineState {
        let stage = state.next_stage();
        let step = match state {
            PipelineState::Init { request } => self.parse(request, sink).await,
            PipelineState::Parsed {
                spec,
                clarifications,
            } => self.research(spec, clarifications, sink).await,
            PipelineState::Researched {
                spec,
                clarifications,
                candidates,
            } => self.optimize(spec, clarifications, candidates, sink).await,
            PipelineState::Optimized {
                spec,
                clarifications,
                candidates,
                itinerary,
            } => {
                self.narrate(spec, clarifications, candidates, itinerary, sink)
                    .await
            }
            PipelineState::Narrated {
                spec,
                clarifications,
                candidates,
                itinerary,
                narrative,
            } => {
                let result = PlanResult {
                    result_id: Uuid::new_v4(),
                    spec,
                    clarifications,
                    candidates,
                    itinerary,
                    narrative,
                    processing_time_ms: started.elapsed().as_millis() as u64,
                };
                self.finish(result, sink).await
            }
            terminal @ (PipelineState::Completed(_) | PipelineState::Failed { .. }) => {
                return terminal
            }
        };

        match step {
            Ok(next) => next,
            Err(Halt::Disconnected) => {
                info!(stage = ?stage, "Consumer disconnected; stopping pipeline");
                PipelineState::disconnected(stage)
            }
            Err(Halt::Error(err)) => {
                match &err {
                    PlannerError::ValidationConflict { .. } => {
                        warn!(error = %err, "Request rejected")
                    }
                    _ => error!(stage = ?stage, error = %err, "Stage failed"),
                }
                // Terminal frame; a consumer that already left changes nothing
                let _ = sink.emit(ProgressEvent::error(stage, err.to_string())).await;
                PipelineState::Failed {
                    stage,
                    cause: FailureCause::Error(err),
                }
            }
        }
    }

    async fn parse(&self, request: TripRequest, sink: &EventSink) -> Step {
        const STAGE: Stage = Stage::Parser;
        sink.emit(ProgressEvent::running(STAGE, "Validating your input..."))
            .await?;

        let normalization = std::panic::catch_unwind(AssertUnwindSafe(|| {
            self.normalizer.normalize(&request)
        }))
        .map_err(|panic| stage_panicked(STAGE, panic.as_ref()))?;
        let clarifications = normalization.clarifications.clone();
        let spec = normalization.into_result()?;

        if !clarifications.is_empty() {
            sink.emit(ProgressEvent::running(
                STAGE,
                format!("Note: {}", clarifications.join(", ")),
            ))
            .await?;
        }

        info!(
            city = %spec.destination.city,
            days = spec.duration_days(),
            pace = spec.constraints.pace.as_str(),
            "Request normalized"
        );
        let message = format!(
            "✓ Validated: {}, {} days",
            spec.destination.city,
            spec.duration_days()
        );
        let payload = StagePayload::Parsed(ParsedPayload {
            spec: spec.clone(),
            clarifications: clarifications.clone(),
        });
        sink.emit(ProgressEvent::complete(STAGE, message, payload))
            .await?;
        Ok(PipelineState::Parsed {
            spec,
            clarifications,
        })
    }

    async fn research(
        &self,
        spec: NormalizedSpec,
        clarifications: Vec<String>,
        sink: &EventSink,
    ) -> Step {
        const STAGE: Stage = Stage::Researcher;
        sink.emit(ProgressEvent::running(
            STAGE,
            "Searching venues and traveler posts...",
        ))
        .await?;

        let candidates = guarded(sink, STAGE, self.gatherer.gather(&spec)).await?;

        let message = format!("✓ Found {} candidates", candidates.summary.total_candidates);
        let payload = StagePayload::Research(Box::new(candidates.clone()));
        sink.emit(ProgressEvent::complete(STAGE, message, payload))
            .await?;
        Ok(PipelineState::Researched {
            spec,
            clarifications,
            candidates,
        })
    }

    async fn optimize(
        &self,
        spec: NormalizedSpec,
        clarifications: Vec<String>,
        candidates: CandidateSet,
        sink: &EventSink,
    ) -> Step {
        const STAGE: Stage = Stage::Optimizer;
        sink.emit(ProgressEvent::running(STAGE, "Building optimal itinerary..."))
            .await?;

        // CPU-bound; keep it off the async workers
        let optimizer = self.optimizer.clone();
        let task = tokio::task::spawn_blocking(move || {
            let itinerary = optimizer.plan(&spec, &candidates);
            (spec, candidates, itinerary)
        });
        let (spec, candidates, itinerary) = guarded(sink, STAGE, task)
            .await?
            .map_err(|e| PlannerError::unexpected(STAGE.as_str(), format!("task failed: {}", e)))?;

        let message = format!("✓ Optimized {} days", spec.duration_days());
        let payload = StagePayload::Optimize(Box::new(itinerary.clone()));
        sink.emit(ProgressEvent::complete(STAGE, message, payload))
            .await?;
        Ok(PipelineState::Optimized {
            spec,
            clarifications,
            candidates,
            itinerary,
        })
    }

    async fn narrate(
        &self,
        spec: NormalizedSpec,
        clarifications: Vec<String>,
        candidates: CandidateSet,
        itinerary: Itinerary,
        sink: &EventSink,
    ) -> Step {
        const STAGE: Stage = Stage::Storyteller;
        sink.emit(ProgressEvent::running(
            STAGE,
            "Writing your personalized plan...",
        ))
        .await?;

        let narrative: Narrative =
            guarded(sink, STAGE, self.narrator.narrate(&spec, &itinerary)).await?;

        let payload = StagePayload::Narrate(narrative.clone());
        sink.emit(ProgressEvent::complete(
            STAGE,
            "✓ Your itinerary is ready!",
            payload,
        ))
        .await?;
        Ok(PipelineState::Narrated {
            spec,
            clarifications,
            candidates,
            itinerary,
            narrative,
        })
    }

    async fn finish(&self, result: PlanResult, sink: &EventSink) -> Step {
        sink.emit(ProgressEvent::finished(result.clone())).await?;
        Ok(PipelineState::Completed(Box::new(result)))
    }
}

/// Run `work` unless the consumer disconnects first; a panic inside it
/// becomes an unexpected stage error
async fn guarded<F>(sink: &EventSink, stage: Stage, work: F) -> Result<F::Output, Halt>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = sink.closed() => Err(Halt::Disconnected),
        output = AssertUnwindSafe(work).catch_unwind() => {
            output.map_err(|panic| stage_panicked(stage, panic.as_ref()).into())
        }
    }
}

fn stage_panicked(stage: Stage, panic: &(dyn Any + Send)) -> PlannerError {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    PlannerError::unexpected(stage.as_str(), format!("panicked: {}", message))
}
