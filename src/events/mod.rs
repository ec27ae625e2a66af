//! Progress event protocol.

pub mod sink;
pub mod types;

pub use sink::{Disconnected, EventSink};
pub use types::{ParsedPayload, ProgressEvent, Stage, StagePayload, StageStatus};
