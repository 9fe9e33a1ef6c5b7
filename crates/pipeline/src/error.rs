use stager_core::intake::RejectionReason;
use stager_core::variant::Variant;
use stager_imagegen::api::GenerationError;

/// Errors surfaced by the pipeline to its caller.
///
/// Per-variant failures inside a batch are not returned through this
/// type; they are recorded in the run report instead.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("No source image has been accepted")]
    NoSourceImage,

    /// Another batch or single generation holds the run guard.
    #[error("A generation is already in progress")]
    BatchInProgress,

    #[error("No variants to generate")]
    EmptyPlan,

    #[error(transparent)]
    Rejected(#[from] RejectionReason),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// The strategy produced no prompt for this variant.
    #[error("Invalid prompt configuration for variant '{0}'")]
    EmptyPrompt(Variant),

    /// The blocking compression task panicked or was cancelled.
    #[error("Compression worker failed: {0}")]
    Worker(String),
}
