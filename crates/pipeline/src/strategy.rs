//! Prompt plans for the two batch workflows.
//!
//! A [`PromptStrategy`] names the variants a batch covers, builds the
//! prompt for each one and states which uploads it accepts. The
//! orchestrator is written against the trait only.

use stager_core::intake::IntakePolicy;
use stager_core::prompt::{build_motif_prompt, FocusOptions, Motif, Prompt, TransformOptions};
use stager_core::variant::Variant;

pub trait PromptStrategy: Send + Sync {
    /// Variants in the order they are generated.
    fn variants(&self) -> Vec<Variant>;

    /// Prompt for `variant`. Empty when the variant does not belong to
    /// this strategy.
    fn prompt_for(&self, variant: Variant) -> Prompt;

    /// Upload rules for sources fed to this strategy.
    fn intake_policy(&self) -> IntakePolicy;
}

// ---------------------------------------------------------------------------
// Furniture
// ---------------------------------------------------------------------------

/// One variant per decor style, sharing every other option.
#[derive(Debug, Clone)]
pub struct FurniturePlan {
    options: TransformOptions,
}

impl FurniturePlan {
    pub fn new(options: TransformOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }
}

impl PromptStrategy for FurniturePlan {
    fn variants(&self) -> Vec<Variant> {
        Variant::all_styles()
    }

    fn prompt_for(&self, variant: Variant) -> Prompt {
        match variant {
            Variant::Furniture(style) => self.options.prompt_for_style(style),
            Variant::Motif(_) => {
                tracing::error!(variant = %variant, "Invalid mode/style combination");
                Prompt::empty()
            }
        }
    }

    fn intake_policy(&self) -> IntakePolicy {
        IntakePolicy::furniture()
    }
}

// ---------------------------------------------------------------------------
// Motif
// ---------------------------------------------------------------------------

/// One variant per creature motif.
#[derive(Debug, Clone)]
pub struct MotifPlan {
    motifs: Vec<Motif>,
    custom_text: String,
    focus: Option<FocusOptions>,
}

impl MotifPlan {
    /// Plan covering every motif.
    pub fn new() -> Self {
        Self {
            motifs: Motif::ALL.to_vec(),
            custom_text: String::new(),
            focus: None,
        }
    }

    /// Restrict the plan to `motifs`, keeping their order.
    pub fn with_motifs(mut self, motifs: Vec<Motif>) -> Self {
        self.motifs = motifs;
        self
    }

    pub fn with_custom_text(mut self, text: impl Into<String>) -> Self {
        self.custom_text = text.into();
        self
    }

    pub fn with_focus(mut self, focus: FocusOptions) -> Self {
        self.focus = Some(focus);
        self
    }
}

impl Default for MotifPlan {
    fn default() -> Self {
        Self::new()
    }
}

impl PromptStrategy for MotifPlan {
    fn variants(&self) -> Vec<Variant> {
        self.motifs.iter().copied().map(Variant::Motif).collect()
    }

    fn prompt_for(&self, variant: Variant) -> Prompt {
        match variant {
            Variant::Motif(motif) => {
                build_motif_prompt(motif, &self.custom_text, self.focus.as_ref())
            }
            Variant::Furniture(_) => {
                tracing::error!(variant = %variant, "Invalid mode/style combination");
                Prompt::empty()
            }
        }
    }

    fn intake_policy(&self) -> IntakePolicy {
        IntakePolicy::motif()
    }
}
