//! Integration tests for [`BatchOrchestrator`] with a scripted
//! generator standing in for the HTTP endpoint.

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use stager_core::compression::CompressedImage;
use stager_core::intake::{IntakePolicy, SourceImage};
use stager_core::prompt::{Motif, Prompt, Style, TransformOptions};
use stager_core::variant::Variant;
use stager_imagegen::api::{GeneratedImage, GenerationError, ImageGenerator};
use stager_pipeline::error::PipelineError;
use stager_pipeline::events::BatchEvent;
use stager_pipeline::orchestrator::BatchOrchestrator;
use stager_pipeline::run::VariantFailure;
use stager_pipeline::session::GenerationSession;
use stager_pipeline::store::{GenerationResult, ResultStore};
use stager_pipeline::strategy::{FurniturePlan, MotifPlan, PromptStrategy};
use tokio::sync::{Mutex, Semaphore};

// ---------------------------------------------------------------------------
// Scripted generator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct Call {
    upload: Vec<u8>,
    media_type: String,
    prompt: String,
}

/// Fails the calls whose zero-based index is listed in `fail_on`,
/// records every request and tracks how many run at once.
#[derive(Default)]
struct ScriptedGenerator {
    fail_on: Vec<usize>,
    calls: Mutex<Vec<Call>>,
    counter: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedGenerator {
    fn failing_on(fail_on: Vec<usize>) -> Self {
        Self {
            fail_on,
            ..Self::default()
        }
    }

    fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }
}

#[async_trait]
impl ImageGenerator for ScriptedGenerator {
    async fn generate(
        &self,
        image: &CompressedImage,
        prompt: &Prompt,
    ) -> Result<GeneratedImage, GenerationError> {
        let index = self.counter.fetch_add(1, Ordering::SeqCst);
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);

        self.calls.lock().await.push(Call {
            upload: image.bytes().to_vec(),
            media_type: image.media_type().to_string(),
            prompt: prompt.as_str().to_string(),
        });

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate open").forget();
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on.contains(&index) {
            return Err(GenerationError::Api {
                status: 500,
                message: "API Error: 500".into(),
            });
        }
        Ok(GeneratedImage::new(format!("image-{index}").into_bytes()))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A small gradient PNG that compresses cleanly.
fn room_png() -> SourceImage {
    let img = RgbImage::from_fn(320, 240, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .expect("encode png");
    SourceImage::new(bytes, "image/png").with_file_name("living-room.png")
}

fn furniture_plan() -> FurniturePlan {
    FurniturePlan::new(TransformOptions::add_furniture(Style::Modern))
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<BatchEvent>) -> Vec<BatchEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ---------------------------------------------------------------------------
// Partial failure
// ---------------------------------------------------------------------------

/// The third of five variants fails; the other four land in the store
/// in submission order and the run still completes.
#[tokio::test]
async fn third_variant_failure_does_not_stop_batch() {
    let generator = Arc::new(ScriptedGenerator::failing_on(vec![2]));
    let orchestrator = BatchOrchestrator::new(generator.clone());
    let plan = furniture_plan();
    let variants = plan.variants();
    let mut store = ResultStore::new();

    let report = orchestrator
        .run_batch(&room_png(), &variants, &plan, &mut store)
        .await
        .expect("batch");

    assert_eq!(report.successes, 4);
    assert_eq!(report.total, 5);
    assert_eq!(report.progress_percent(), 100);
    assert_eq!(
        report.failures,
        vec![VariantFailure {
            variant: Variant::Furniture(Style::Scandinavian),
            error: "API Error: 500".into(),
        }]
    );

    let stored: Vec<Variant> = store.iter().map(|g| g.variant).collect();
    assert_eq!(
        stored,
        vec![
            Variant::Furniture(Style::Modern),
            Variant::Furniture(Style::Natural),
            Variant::Furniture(Style::Minimalist),
            Variant::Furniture(Style::Luxury),
        ]
    );
    assert_eq!(generator.counter.load(Ordering::SeqCst), 5);
}

/// Every call fails and the run still reports completion.
#[tokio::test]
async fn all_failures_complete_with_zero_successes() {
    let generator = Arc::new(ScriptedGenerator::failing_on((0..5).collect()));
    let orchestrator = BatchOrchestrator::new(generator);
    let plan = MotifPlan::new();
    let mut store = ResultStore::new();

    let report = orchestrator
        .run_batch(&room_png(), &plan.variants(), &plan, &mut store)
        .await
        .expect("batch");

    assert_eq!(report.successes, 0);
    assert_eq!(report.failures.len(), 5);
    assert!(store.is_empty());
}

// ---------------------------------------------------------------------------
// Sequencing and compression
// ---------------------------------------------------------------------------

/// Never more than one request in flight.
#[tokio::test]
async fn variants_run_one_at_a_time() {
    let generator = Arc::new(ScriptedGenerator::default());
    let orchestrator = BatchOrchestrator::new(generator.clone());
    let plan = furniture_plan();
    let mut store = ResultStore::new();

    orchestrator
        .run_batch(&room_png(), &plan.variants(), &plan, &mut store)
        .await
        .expect("batch");

    assert_eq!(generator.max_active.load(Ordering::SeqCst), 1);
}

/// Each variant uploads a JPEG compressed from the pristine source, so
/// every upload is identical.
#[tokio::test]
async fn every_variant_recompresses_from_source() {
    let generator = Arc::new(ScriptedGenerator::default());
    let orchestrator = BatchOrchestrator::new(generator.clone());
    let plan = furniture_plan();
    let mut store = ResultStore::new();

    orchestrator
        .run_batch(&room_png(), &plan.variants(), &plan, &mut store)
        .await
        .expect("batch");

    let calls = generator.calls.lock().await;
    assert_eq!(calls.len(), 5);
    assert!(calls.iter().all(|c| c.media_type == "image/jpeg"));
    assert!(calls.iter().all(|c| c.upload.starts_with(&[0xFF, 0xD8])));
    assert!(calls.windows(2).all(|w| w[0].upload == w[1].upload));
}

/// Prompts are built per variant, in variant order.
#[tokio::test]
async fn prompts_follow_variant_order() {
    let generator = Arc::new(ScriptedGenerator::default());
    let orchestrator = BatchOrchestrator::new(generator.clone());
    let plan = furniture_plan();
    let variants = plan.variants();
    let mut store = ResultStore::new();

    orchestrator
        .run_batch(&room_png(), &variants, &plan, &mut store)
        .await
        .expect("batch");

    let sent: Vec<String> = generator
        .calls
        .lock()
        .await
        .iter()
        .map(|c| c.prompt.clone())
        .collect();
    let expected: Vec<String> = variants
        .iter()
        .map(|&v| plan.prompt_for(v).as_str().to_string())
        .collect();
    assert_eq!(sent, expected);
}

/// A variant the strategy cannot build a prompt for fails without
/// reaching the generator.
#[tokio::test]
async fn empty_prompt_fails_variant_without_request() {
    let generator = Arc::new(ScriptedGenerator::default());
    let orchestrator = BatchOrchestrator::new(generator.clone());
    let plan = furniture_plan();
    let variants = vec![
        Variant::Furniture(Style::Modern),
        Variant::Motif(Motif::Dragon),
        Variant::Furniture(Style::Luxury),
    ];
    let mut store = ResultStore::new();

    let report = orchestrator
        .run_batch(&room_png(), &variants, &plan, &mut store)
        .await
        .expect("batch");

    assert_eq!(report.successes, 2);
    assert_eq!(report.failures[0].variant, Variant::Motif(Motif::Dragon));
    assert_eq!(generator.counter.load(Ordering::SeqCst), 2);
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Subscribers see start, per-variant start/finish pairs, then
/// completion, all tagged with the same run id.
#[tokio::test]
async fn events_arrive_in_order() {
    let generator = Arc::new(ScriptedGenerator::failing_on(vec![1]));
    let orchestrator = BatchOrchestrator::new(generator);
    let mut rx = orchestrator.subscribe();
    let plan = MotifPlan::new().with_motifs(vec![Motif::Slime, Motif::Ghost]);
    let mut store = ResultStore::new();

    let report = orchestrator
        .run_batch(&room_png(), &plan.variants(), &plan, &mut store)
        .await
        .expect("batch");

    let events = drain(&mut rx);
    assert_eq!(events.len(), 6);
    assert!(events.iter().all(|e| e.run_id() == report.run_id));

    assert_matches!(&events[0], BatchEvent::RunStarted { variants, .. } if variants.len() == 2);
    assert_matches!(
        &events[1],
        BatchEvent::VariantStarted { variant: Variant::Motif(Motif::Slime), index: 0, total: 2, .. }
    );
    assert_matches!(
        &events[2],
        BatchEvent::VariantFinished { result: GenerationResult::Success(_), percent: 50, .. }
    );
    assert_matches!(&events[3], BatchEvent::VariantStarted { index: 1, .. });
    assert_matches!(
        &events[4],
        BatchEvent::VariantFinished {
            result: GenerationResult::Failure { variant: Variant::Motif(Motif::Ghost), .. },
            percent: 100,
            ..
        }
    );
    assert_matches!(&events[5], BatchEvent::RunCompleted { successes: 1, total: 2, .. });
}

// ---------------------------------------------------------------------------
// Single-flight guard
// ---------------------------------------------------------------------------

/// A second batch started while one is running is refused, and the
/// first batch is unaffected.
#[tokio::test]
async fn concurrent_batch_is_rejected() {
    let gate = Arc::new(Semaphore::new(0));
    let generator = Arc::new(ScriptedGenerator::gated(gate.clone()));
    let orchestrator = Arc::new(BatchOrchestrator::new(generator));

    let first = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move {
            let plan = furniture_plan();
            let mut store = ResultStore::new();
            let report = orchestrator
                .run_batch(&room_png(), &plan.variants(), &plan, &mut store)
                .await;
            (report, store.len())
        })
    };

    while !orchestrator.is_busy() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let plan = furniture_plan();
    let mut store = ResultStore::new();
    let err = orchestrator
        .run_batch(&room_png(), &plan.variants(), &plan, &mut store)
        .await
        .unwrap_err();
    assert_matches!(err, PipelineError::BatchInProgress);

    let err = orchestrator
        .generate_single(&room_png(), Variant::Furniture(Style::Modern), &plan)
        .await
        .unwrap_err();
    assert_matches!(err, PipelineError::BatchInProgress);
    assert!(store.is_empty());

    gate.add_permits(5);
    let (report, stored) = first.await.expect("join");
    assert_eq!(report.expect("first batch").successes, 5);
    assert_eq!(stored, 5);
    assert!(!orchestrator.is_busy());
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A session batch fills its store; a new upload empties it.
#[tokio::test]
async fn session_batch_then_new_source() {
    let orchestrator = BatchOrchestrator::new(Arc::new(ScriptedGenerator::failing_on(vec![2])));
    let plan = furniture_plan();
    let mut session = GenerationSession::new();

    session
        .accept_source(Some(room_png()), &plan.intake_policy())
        .expect("accepted");
    let report = session.run_batch(&orchestrator, &plan).await.expect("batch");

    assert_eq!(report.successes, 4);
    assert_eq!(session.results().len(), 4);
    assert!(session
        .results()
        .get(Variant::Furniture(Style::Scandinavian))
        .is_none());
    let modern = session
        .results()
        .get(Variant::Furniture(Style::Modern))
        .expect("modern result");
    assert!(modern.download_filename().starts_with("stager-modern-"));

    session
        .accept_source(Some(room_png()), &IntakePolicy::furniture())
        .expect("accepted");
    assert!(session.results().is_empty());
}
