//! Sequential multi-variant generation.
//!
//! A batch run walks an ordered list of [`Variant`]s, recompressing the
//! pristine source for each one, building its prompt through a
//! [`strategy::PromptStrategy`], and calling the image generator with
//! at most one request in flight. Individual failures are recorded and
//! the run moves on; successes land in the [`store::ResultStore`] in
//! submission order and are broadcast as [`events::BatchEvent`]s.
//!
//! [`Variant`]: stager_core::variant::Variant

pub mod error;
pub mod events;
pub mod orchestrator;
pub mod run;
pub mod session;
pub mod store;
pub mod strategy;
