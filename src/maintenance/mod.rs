//! The maintenance sequence: steps, the pipeline that runs them, and
//! diagnosis of failed tool output.

pub mod patterns;
pub mod pipeline;
pub mod step;

pub use patterns::{diagnose, FailureKind};
pub use pipeline::{Pipeline, PipelineOptions, RunReport};
pub use step::{MaintenanceStep, StepOutcome, StepStatus};
