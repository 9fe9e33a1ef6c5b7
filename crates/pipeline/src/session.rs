//! Per-user working state: the accepted source and its results.

use stager_core::intake::{validate, IntakePolicy, SourceImage};
use stager_core::variant::Variant;

use crate::error::PipelineError;
use crate::orchestrator::BatchOrchestrator;
use crate::run::BatchReport;
use crate::store::{GeneratedVariant, ResultStore};
use crate::strategy::PromptStrategy;

/// Holds the current source image and everything generated from it.
///
/// Accepting a new source clears all previous results. A rejected
/// upload leaves the session untouched.
#[derive(Debug, Default)]
pub struct GenerationSession {
    source: Option<SourceImage>,
    store: ResultStore,
    last_single: Option<GeneratedVariant>,
}

impl GenerationSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `candidate` against `policy` and make it the current
    /// source.
    pub fn accept_source(
        &mut self,
        candidate: Option<SourceImage>,
        policy: &IntakePolicy,
    ) -> Result<(), PipelineError> {
        if let Err(reason) = validate(candidate.as_ref(), policy) {
            tracing::warn!(error = %reason, "Source image rejected");
            return Err(reason.into());
        }

        self.source = candidate;
        self.store.clear();
        self.last_single = None;
        if let Some(source) = &self.source {
            tracing::info!(
                file_name = source.file_name().unwrap_or("-"),
                media_type = source.media_type(),
                bytes = source.byte_len(),
                "Source image accepted",
            );
        }
        Ok(())
    }

    pub fn source(&self) -> Option<&SourceImage> {
        self.source.as_ref()
    }

    pub fn results(&self) -> &ResultStore {
        &self.store
    }

    pub fn last_single(&self) -> Option<&GeneratedVariant> {
        self.last_single.as_ref()
    }

    /// Run every variant of `strategy` against the current source.
    pub async fn run_batch(
        &mut self,
        orchestrator: &BatchOrchestrator,
        strategy: &dyn PromptStrategy,
    ) -> Result<BatchReport, PipelineError> {
        let source = self.source.as_ref().ok_or(PipelineError::NoSourceImage)?;
        let variants = strategy.variants();
        orchestrator
            .run_batch(source, &variants, strategy, &mut self.store)
            .await
    }

    /// Generate a single variant and keep it as the latest single
    /// result. Batch results are not affected.
    pub async fn generate_single(
        &mut self,
        orchestrator: &BatchOrchestrator,
        strategy: &dyn PromptStrategy,
        variant: Variant,
    ) -> Result<&GeneratedVariant, PipelineError> {
        let source = self.source.as_ref().ok_or(PipelineError::NoSourceImage)?;
        let generated = orchestrator.generate_single(source, variant, strategy).await?;
        Ok(self.last_single.insert(generated))
    }
}
