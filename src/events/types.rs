//! Progress frames streamed to the caller while a plan is built.
//!
//! One `ProgressEvent` per frame. Stage payloads are a tagged union so the
//! transport decodes each stage's output explicitly.

use serde::{Deserialize, Serialize};

use crate::model::{CandidateSet, Itinerary, NormalizedSpec};
use crate::narrate::Narrative;
use crate::pipeline::PlanResult;

/// Pipeline stage, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Parser,
    Researcher,
    Optimizer,
    Storyteller,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Parser,
        Stage::Researcher,
        Stage::Optimizer,
        Stage::Storyteller,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Parser => "parser",
            Stage::Researcher => "researcher",
            Stage::Optimizer => "optimizer",
            Stage::Storyteller => "storyteller",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    Waiting,
    Running,
    Complete,
    Error,
}

/// Stage 1 output plus the notes its defaults produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedPayload {
    pub spec: NormalizedSpec,
    #[serde(default)]
    pub clarifications: Vec<String>,
}

/// Output carried by a `complete` frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum StagePayload {
    Parsed(ParsedPayload),
    Research(Box<CandidateSet>),
    Optimize(Box<Itinerary>),
    Narrate(Narrative),
    /// Final bundle on the pipeline-level `complete` frame
    Result(Box<PlanResult>),
}

impl StagePayload {
    pub fn payload_type_str(&self) -> &'static str {
        match self {
            StagePayload::Parsed(_) => "parsed",
            StagePayload::Research(_) => "research",
            StagePayload::Optimize(_) => "optimize",
            StagePayload::Narrate(_) => "narrate",
            StagePayload::Result(_) => "result",
        }
    }
}

/// One frame of the progress stream.
///
/// `stage` is absent on the pipeline-level `complete` frame. A frame with
/// `error` status always ends the stream, whether or not it names a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    pub status: StageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<StagePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_id: Option<String>,
}

impl ProgressEvent {
    pub fn running(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage: Some(stage),
            status: StageStatus::Running,
            message: Some(message.into()),
            payload: None,
            result_id: None,
        }
    }

    pub fn complete(stage: Stage, message: impl Into<String>, payload: StagePayload) -> Self {
        Self {
            stage: Some(stage),
            status: StageStatus::Complete,
            message: Some(message.into()),
            payload: Some(payload),
            result_id: None,
        }
    }

    pub fn error(stage: Option<Stage>, message: impl Into<String>) -> Self {
        Self {
            stage,
            status: StageStatus::Error,
            message: Some(message.into()),
            payload: None,
            result_id: None,
        }
    }

    /// Pipeline-level terminal frame carrying the whole result
    pub fn finished(result: PlanResult) -> Self {
        let message = format!(
            "Complete in {:.1}s",
            result.processing_time_ms as f64 / 1000.0
        );
        Self {
            stage: None,
            status: StageStatus::Complete,
            message: Some(message),
            result_id: Some(result.result_id.to_string()),
            payload: Some(StagePayload::Result(Box::new(result))),
        }
    }

    /// Whether no frame may follow this one
    pub fn is_terminal(&self) -> bool {
        match self.status {
            StageStatus::Error => true,
            StageStatus::Complete => self.stage.is_none(),
            StageStatus::Waiting | StageStatus::Running => false,
        }
    }

    /// The final bundle, when this is the pipeline-level `complete` frame
    pub fn result(&self) -> Option<&PlanResult> {
        match &self.payload {
            Some(StagePayload::Result(result)) if self.stage.is_none() => Some(result),
            _ => None,
        }
    }

    /// One NDJSON line, newline included
    pub fn to_ndjson(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_field_names() {
        let event = ProgressEvent::running(Stage::Researcher, "Searching...");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"stage": "researcher", "status": "running", "message": "Searching..."})
        );
        assert!(!event.is_terminal());
    }

    #[test]
    fn test_error_frames_are_terminal() {
        assert!(ProgressEvent::error(Some(Stage::Parser), "Validation issues: x").is_terminal());
        assert!(ProgressEvent::error(None, "boom").is_terminal());
        let stage_done = ProgressEvent::complete(
            Stage::Storyteller,
            "done",
            StagePayload::Narrate(Narrative {
                text: "x".into(),
                source: crate::narrate::NarrativeSource::Fallback,
                fallback_reason: None,
            }),
        );
        assert!(!stage_done.is_terminal());
    }

    #[test]
    fn test_ndjson_is_one_line_and_decodes() {
        let event = ProgressEvent::complete(
            Stage::Storyteller,
            "✓ Your itinerary is ready!",
            StagePayload::Narrate(Narrative {
                text: "# Day 1\n\nLine two".into(),
                source: crate::narrate::NarrativeSource::Generated,
                fallback_reason: None,
            }),
        );
        let line = event.to_ndjson().unwrap();
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.contains(r#""payload":{"type":"narrate","data":"#));

        let decoded: ProgressEvent = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(decoded, event);
    }

    #[test]
    fn test_stage_order() {
        assert!(Stage::Parser < Stage::Researcher);
        assert!(Stage::Optimizer < Stage::Storyteller);
        assert_eq!(Stage::ALL.map(Stage::as_str), ["parser", "researcher", "optimizer", "storyteller"]);
    }
}
