//! Drives generation over a list of variants.
//!
//! One [`BatchOrchestrator`] owns the run guard: a batch and a single
//! generation are mutually exclusive, and a second caller is turned
//! away with [`PipelineError::BatchInProgress`] rather than queued.
//!
//! Within a batch, variants run strictly one after another. Each one
//! recompresses the pristine source, so no artifact is ever derived from
//! a previous upload. A failing variant is logged, recorded in the
//! report and skipped; the run always continues to the next variant.
//! There is no automatic retry.

use std::sync::Arc;

use stager_core::compression::{compress, CompressedImage, CompressionSettings};
use stager_core::intake::SourceImage;
use stager_core::variant::Variant;
use stager_imagegen::api::ImageGenerator;
use tokio::sync::{broadcast, Mutex};

use crate::error::PipelineError;
use crate::events::{BatchEvent, EVENT_CHANNEL_CAPACITY};
use crate::run::{BatchReport, BatchRun};
use crate::store::{GeneratedVariant, GenerationResult, ResultStore};
use crate::strategy::PromptStrategy;

pub struct BatchOrchestrator {
    generator: Arc<dyn ImageGenerator>,
    compression: CompressionSettings,
    run_guard: Mutex<()>,
    event_tx: broadcast::Sender<BatchEvent>,
}

impl BatchOrchestrator {
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            generator,
            compression: CompressionSettings::default(),
            run_guard: Mutex::new(()),
            event_tx,
        }
    }

    pub fn with_compression(mut self, settings: CompressionSettings) -> Self {
        self.compression = settings;
        self
    }

    /// Subscribe to progress events for all subsequent runs.
    pub fn subscribe(&self) -> broadcast::Receiver<BatchEvent> {
        self.event_tx.subscribe()
    }

    /// Whether a batch or single generation currently holds the guard.
    pub fn is_busy(&self) -> bool {
        self.run_guard.try_lock().is_err()
    }

    /// Generate every variant in order, appending successes to `store`.
    ///
    /// Returns once all variants have been attempted. Per-variant
    /// failures are reported in the returned [`BatchReport`], not as an
    /// `Err`.
    pub async fn run_batch(
        &self,
        source: &SourceImage,
        variants: &[Variant],
        strategy: &dyn PromptStrategy,
        store: &mut ResultStore,
    ) -> Result<BatchReport, PipelineError> {
        let _guard = self
            .run_guard
            .try_lock()
            .map_err(|_| PipelineError::BatchInProgress)?;

        if variants.is_empty() {
            return Err(PipelineError::EmptyPlan);
        }

        let mut run = BatchRun::new(variants.to_vec());
        run.start();
        tracing::info!(run_id = %run.id(), total = run.total(), "Batch run started");
        self.publish(BatchEvent::RunStarted {
            run_id: run.id(),
            variants: variants.to_vec(),
        });

        for (index, &variant) in variants.iter().enumerate() {
            run.begin_variant(variant);
            self.publish(BatchEvent::VariantStarted {
                run_id: run.id(),
                variant,
                index,
                total: run.total(),
            });

            let result = match self.generate_variant(source, variant, strategy).await {
                Ok(generated) => {
                    run.record_success();
                    store.push(generated.clone());
                    tracing::info!(run_id = %run.id(), variant = %variant, "Variant generated");
                    GenerationResult::Success(generated)
                }
                Err(e) => {
                    tracing::error!(run_id = %run.id(), variant = %variant, error = %e, "Variant generation failed");
                    let reason = e.to_string();
                    run.record_failure(reason.clone());
                    GenerationResult::Failure { variant, reason }
                }
            };

            self.publish(BatchEvent::VariantFinished {
                run_id: run.id(),
                result,
                percent: run.progress_percent(),
            });
        }

        run.finish();
        tracing::info!(
            run_id = %run.id(),
            successes = run.successes(),
            total = run.total(),
            "Batch run completed",
        );
        self.publish(BatchEvent::RunCompleted {
            run_id: run.id(),
            successes: run.successes(),
            total: run.total(),
        });

        Ok(run.report())
    }

    /// Generate one variant outside of a batch.
    ///
    /// Shares the run guard with [`run_batch`](Self::run_batch) and
    /// publishes no events.
    pub async fn generate_single(
        &self,
        source: &SourceImage,
        variant: Variant,
        strategy: &dyn PromptStrategy,
    ) -> Result<GeneratedVariant, PipelineError> {
        let _guard = self
            .run_guard
            .try_lock()
            .map_err(|_| PipelineError::BatchInProgress)?;

        self.generate_variant(source, variant, strategy)
            .await
            .inspect_err(|e| tracing::error!(variant = %variant, error = %e, "Generation failed"))
    }

    // ---- private helpers ----

    async fn generate_variant(
        &self,
        source: &SourceImage,
        variant: Variant,
        strategy: &dyn PromptStrategy,
    ) -> Result<GeneratedVariant, PipelineError> {
        let prompt = strategy.prompt_for(variant);
        if prompt.is_empty() {
            return Err(PipelineError::EmptyPrompt(variant));
        }

        let upload = self.compress_source(source).await?;
        tracing::debug!(
            variant = %variant,
            upload_bytes = upload.byte_len(),
            prompt = %prompt,
            "Submitting variant",
        );

        let image = self.generator.generate(&upload, &prompt).await?;
        Ok(GeneratedVariant::new(variant, image))
    }

    /// Compress a fresh copy of `source` on the blocking pool.
    ///
    /// A compression failure is not an error here: the outcome falls
    /// back to the unmodified source, which is uploaded as is.
    async fn compress_source(&self, source: &SourceImage) -> Result<CompressedImage, PipelineError> {
        let source = source.clone();
        let settings = self.compression;
        let outcome = tokio::task::spawn_blocking(move || compress(&source, &settings))
            .await
            .map_err(|e| PipelineError::Worker(e.to_string()))?;
        Ok(outcome.into_image())
    }

    fn publish(&self, event: BatchEvent) {
        // Sending only fails when nobody is subscribed.
        let _ = self.event_tx.send(event);
    }
}
