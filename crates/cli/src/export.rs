//! Progress printing and artifact export for batch runs.

use std::path::{Path, PathBuf};

use anyhow::Context;
use stager_pipeline::events::BatchEvent;
use stager_pipeline::store::{GeneratedVariant, GenerationResult};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;

/// Write `generated` into `out_dir` under its download name.
pub async fn write_artifact(out_dir: &Path, generated: &GeneratedVariant) -> anyhow::Result<PathBuf> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let path = out_dir.join(generated.download_filename());
    tokio::fs::write(&path, generated.image.bytes())
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::debug!(path = %path.display(), bytes = generated.image.bytes().len(), "Artifact written");
    Ok(path)
}

/// Follow a run's events, printing progress and exporting each image as
/// soon as it arrives. Resolves to the written paths once the run
/// completes.
pub fn spawn_progress(
    mut rx: broadcast::Receiver<BatchEvent>,
    out_dir: PathBuf,
) -> JoinHandle<Vec<PathBuf>> {
    tokio::spawn(async move {
        let mut written = Vec::new();
        loop {
            match rx.recv().await {
                Ok(BatchEvent::RunStarted { variants, .. }) => {
                    println!("Generating {} variants", variants.len());
                }
                Ok(BatchEvent::VariantStarted {
                    variant,
                    index,
                    total,
                    ..
                }) => {
                    println!("[{}/{}] {}...", index + 1, total, variant.label());
                }
                Ok(BatchEvent::VariantFinished { result, percent, .. }) => match result {
                    GenerationResult::Success(generated) => {
                        match write_artifact(&out_dir, &generated).await {
                            Ok(path) => {
                                println!("  done ({percent}%) -> {}", path.display());
                                written.push(path);
                            }
                            Err(e) => tracing::error!(error = ?e, "Failed to export artifact"),
                        }
                    }
                    GenerationResult::Failure { variant, reason } => {
                        println!("  {} failed ({percent}%): {reason}", variant.label());
                    }
                },
                Ok(BatchEvent::RunCompleted { .. }) | Err(RecvError::Closed) => break,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Progress events dropped");
                }
            }
        }
        written
    })
}
