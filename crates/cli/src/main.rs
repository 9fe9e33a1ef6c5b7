//! `stager` command-line front end.
//!
//! Reads a room photo from disk, validates it, and runs either a single
//! generation or a sequential batch against the configured image-edit
//! endpoint. Generated PNGs are written to the output directory.
//!
//! Configuration is read from the environment (and `.env`):
//!
//! | Env Var              | Default                                               |
//! |----------------------|-------------------------------------------------------|
//! | `STAGER_API_KEY`     | required for generation                               |
//! | `STAGER_API_URL`     | `https://api.youware.com/public/v1/ai/images/edits`   |
//! | `STAGER_MODEL`       | `nano-banana`                                         |
//! | `STAGER_OUTPUT_DIR`  | `.`                                                   |
//! | `RUST_LOG`           | `stager=info,stager_pipeline=info,...`                |

mod args;
mod export;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use stager_core::intake::{format_file_size, media_type_for_path, SourceImage};
use stager_core::prompt::preview_prompt;
use stager_core::variant::Variant;
use stager_imagegen::api::ImageEditApi;
use stager_imagegen::config::GenerationConfig;
use stager_pipeline::orchestrator::BatchOrchestrator;
use stager_pipeline::session::GenerationSession;
use stager_pipeline::strategy::{FurniturePlan, PromptStrategy};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::args::{MotifArgs, OutputArgs, TransformArgs};

const DEFAULT_LOG_FILTER: &str =
    "stager=info,stager_core=info,stager_imagegen=info,stager_pipeline=info";

/// Stage room photos with AI-generated furniture, lighting or creatures.
#[derive(Parser, Debug)]
#[command(name = "stager")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the prompt that would be sent, without calling the API.
    Prompt {
        #[command(flatten)]
        transform: TransformArgs,
    },

    /// Generate one image in the selected style.
    Generate {
        /// Room photo (JPEG or PNG, up to 10 MB).
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        #[command(flatten)]
        transform: TransformArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generate all five styles one after another.
    Batch {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        #[command(flatten)]
        transform: TransformArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Add a creature to the scene, one image per motif.
    Monsters {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        #[command(flatten)]
        motif: MotifArgs,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    if let Err(err) = run(cli.command).await {
        tracing::error!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout carries only prompts and results.
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Prompt { transform } => {
            println!("{}", preview_prompt(&transform.options()));
            Ok(())
        }
        Command::Generate {
            image,
            transform,
            output,
        } => {
            let plan = FurniturePlan::new(transform.options());
            generate_single(&image, &plan, Variant::Furniture(transform.style), &output).await
        }
        Command::Batch {
            image,
            transform,
            output,
        } => {
            let plan = FurniturePlan::new(transform.options());
            generate_batch(&image, &plan, &output).await
        }
        Command::Monsters {
            image,
            motif,
            output,
        } => generate_batch(&image, &motif.plan(), &output).await,
    }
}

async fn generate_single(
    image: &Path,
    strategy: &dyn PromptStrategy,
    variant: Variant,
    output: &OutputArgs,
) -> Result<()> {
    let orchestrator = build_orchestrator()?;
    let mut session = prepare_session(image, strategy).await?;

    let generated = session
        .generate_single(&orchestrator, strategy, variant)
        .await
        .context("Generation failed")?;
    let path = export::write_artifact(&output.out, generated).await?;

    if output.json {
        let summary = serde_json::json!({
            "variant": generated.variant,
            "created_at": generated.created_at,
            "path": path,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{} -> {}", generated.variant.label(), path.display());
    }
    Ok(())
}

async fn generate_batch(image: &Path, strategy: &dyn PromptStrategy, output: &OutputArgs) -> Result<()> {
    let orchestrator = build_orchestrator()?;
    let mut session = prepare_session(image, strategy).await?;

    let progress = export::spawn_progress(orchestrator.subscribe(), output.out.clone());
    let report = match session.run_batch(&orchestrator, strategy).await {
        Ok(report) => report,
        Err(e) => {
            progress.abort();
            return Err(e).context("Batch generation failed");
        }
    };
    let written = progress.await.context("Progress task failed")?;

    if output.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{}/{} variants generated, {} written to {}",
            report.successes,
            report.total,
            written.len(),
            output.out.display()
        );
        for failure in &report.failures {
            println!("  {}: {}", failure.variant.label(), failure.error);
        }
    }

    if report.successes == 0 {
        anyhow::bail!("No variants were generated");
    }
    Ok(())
}

fn build_orchestrator() -> Result<BatchOrchestrator> {
    let config = GenerationConfig::from_env().context("Invalid generation configuration")?;
    tracing::debug!(api_url = %config.api_url, model = %config.model, "Generation client configured");
    let api = ImageEditApi::new(config);
    Ok(BatchOrchestrator::new(Arc::new(api)))
}

/// Read `path`, declare its media type from the extension and accept it
/// into a fresh session under the strategy's intake rules.
async fn prepare_session(path: &Path, strategy: &dyn PromptStrategy) -> Result<GenerationSession> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut source = SourceImage::new(bytes, media_type_for_path(path));
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        source = source.with_file_name(name);
    }
    tracing::info!(
        path = %path.display(),
        size = %format_file_size(source.byte_len()),
        "Loaded source image",
    );

    let mut session = GenerationSession::new();
    session
        .accept_source(Some(source), &strategy.intake_policy())
        .with_context(|| format!("Cannot use {}", path.display()))?;
    Ok(session)
}
