//! Progress events published while a batch runs.
//!
//! Events go out on a [`tokio::sync::broadcast`] channel owned by the
//! [`BatchOrchestrator`](crate::orchestrator::BatchOrchestrator). Call
//! `subscribe()` before starting a run to observe it from the start.

use serde::Serialize;
use stager_core::variant::Variant;
use uuid::Uuid;

use crate::store::GenerationResult;

/// Capacity of the event channel. Slow subscribers that fall further
/// behind than this see `RecvError::Lagged`.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BatchEvent {
    /// A run acquired the guard and is about to process `variants`.
    RunStarted { run_id: Uuid, variants: Vec<Variant> },

    /// Generation for one variant is starting.
    VariantStarted {
        run_id: Uuid,
        variant: Variant,
        /// Zero-based position in the run.
        index: usize,
        total: usize,
    },

    /// One variant finished, successfully or not.
    VariantFinished {
        run_id: Uuid,
        result: GenerationResult,
        /// Completion percentage (0-100).
        percent: u8,
    },

    /// Every variant has been attempted.
    RunCompleted {
        run_id: Uuid,
        successes: usize,
        total: usize,
    },
}

impl BatchEvent {
    pub fn run_id(&self) -> Uuid {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::VariantStarted { run_id, .. }
            | Self::VariantFinished { run_id, .. }
            | Self::RunCompleted { run_id, .. } => *run_id,
        }
    }
}
