//! State of a single batch run.

use serde::Serialize;
use stager_core::types::Timestamp;
use stager_core::variant::Variant;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Idle,
    Running,
    Completed,
}

/// A variant that did not produce an image, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantFailure {
    pub variant: Variant,
    pub error: String,
}

/// Bookkeeping for one pass over an ordered list of variants.
///
/// At most one variant is in flight at a time, and every variant ends
/// up either counted as a success or listed in `failures`.
#[derive(Debug, Clone)]
pub struct BatchRun {
    id: Uuid,
    variants: Vec<Variant>,
    status: RunStatus,
    in_flight: Option<Variant>,
    completed: usize,
    successes: usize,
    failures: Vec<VariantFailure>,
    started_at: Option<Timestamp>,
    finished_at: Option<Timestamp>,
}

impl BatchRun {
    pub fn new(variants: Vec<Variant>) -> Self {
        Self {
            id: Uuid::new_v4(),
            variants,
            status: RunStatus::Idle,
            in_flight: None,
            completed: 0,
            successes: 0,
            failures: Vec::new(),
            started_at: None,
            finished_at: None,
        }
    }

    pub fn start(&mut self) {
        self.status = RunStatus::Running;
        self.started_at = Some(chrono::Utc::now());
    }

    pub fn begin_variant(&mut self, variant: Variant) {
        self.in_flight = Some(variant);
    }

    pub fn record_success(&mut self) {
        if self.in_flight.take().is_none() {
            tracing::warn!(run_id = %self.id, "Success recorded with no variant in flight");
            return;
        }
        self.completed += 1;
        self.successes += 1;
    }

    pub fn record_failure(&mut self, error: impl Into<String>) {
        let Some(variant) = self.in_flight.take() else {
            tracing::warn!(run_id = %self.id, "Failure recorded with no variant in flight");
            return;
        };
        self.completed += 1;
        self.failures.push(VariantFailure {
            variant,
            error: error.into(),
        });
    }

    pub fn finish(&mut self) {
        self.in_flight = None;
        self.status = RunStatus::Completed;
        self.finished_at = Some(chrono::Utc::now());
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn in_flight(&self) -> Option<Variant> {
        self.in_flight
    }

    pub fn total(&self) -> usize {
        self.variants.len()
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn successes(&self) -> usize {
        self.successes
    }

    pub fn failures(&self) -> &[VariantFailure] {
        &self.failures
    }

    pub fn started_at(&self) -> Option<Timestamp> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<Timestamp> {
        self.finished_at
    }

    /// Completion percentage (0-100), counting failures as completed.
    pub fn progress_percent(&self) -> u8 {
        percent(self.completed, self.total())
    }

    /// Summary of the run in its current state.
    pub fn report(&self) -> BatchReport {
        BatchReport {
            run_id: self.id,
            successes: self.successes,
            total: self.total(),
            failures: self.failures.clone(),
        }
    }
}

/// Final tally of a batch run, returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub run_id: Uuid,
    pub successes: usize,
    pub total: usize,
    pub failures: Vec<VariantFailure>,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.successes == self.total
    }

    pub fn progress_percent(&self) -> u8 {
        percent(self.successes + self.failures.len(), self.total)
    }
}

fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    // done <= total, so the result fits in u8.
    ((done.min(total) * 100) / total) as u8
}
