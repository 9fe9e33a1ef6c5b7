//! Command-line options shared by the subcommands.

use std::path::PathBuf;

use clap::Args;
use stager_core::prompt::{
    ConversionMode, FocusOptions, FocusPosition, Intensity, Motif, RealisticOptions, Style,
    TransformOptions,
};
use stager_pipeline::strategy::MotifPlan;

/// Options that shape a furniture or realistic-conversion prompt.
#[derive(Args, Debug, Clone)]
pub struct TransformArgs {
    /// Conversion mode: add-furniture or make-realistic.
    #[arg(long, default_value = "add-furniture", value_parser = parse_mode)]
    pub mode: ConversionMode,

    /// Decor style: modern, natural, scandinavian, minimalist or luxury.
    #[arg(long, default_value = "modern", value_parser = parse_style)]
    pub style: Style,

    /// Indoor lighting intensity (0-5), realistic mode only.
    #[arg(long, default_value = "0", value_parser = parse_intensity)]
    pub indoor: Intensity,

    /// Outdoor lighting intensity (0-5), realistic mode only.
    #[arg(long, default_value = "0", value_parser = parse_intensity)]
    pub outdoor: Intensity,

    /// Also render small items realistically, realistic mode only.
    #[arg(long)]
    pub small_items: bool,

    #[command(flatten)]
    pub focus: FocusArgs,

    /// Extra requirements appended to the prompt.
    #[arg(long, default_value = "")]
    pub note: String,
}

impl TransformArgs {
    pub fn options(&self) -> TransformOptions {
        let options = match self.mode {
            ConversionMode::AddFurniture => TransformOptions::add_furniture(self.style),
            ConversionMode::MakeRealistic => TransformOptions::make_realistic(RealisticOptions {
                indoor_lighting: self.indoor,
                outdoor_lighting: self.outdoor,
                enhance_small_items: self.small_items,
            }),
        };
        let options = options.with_custom_text(self.note.clone());
        match self.focus.options() {
            Some(focus) => options.with_focus(focus),
            None => options,
        }
    }
}

/// Depth-of-field options.
#[derive(Args, Debug, Clone)]
pub struct FocusArgs {
    /// Region kept sharp: foreground, center or background.
    #[arg(long, value_parser = parse_focus)]
    pub focus: Option<FocusPosition>,

    /// Background blur strength (0-5). Defaults the focus to center.
    #[arg(long, default_value = "0", value_parser = parse_intensity)]
    pub blur: Intensity,
}

impl FocusArgs {
    pub fn options(&self) -> Option<FocusOptions> {
        if self.focus.is_none() && self.blur.is_off() {
            return None;
        }
        Some(FocusOptions {
            position: self.focus.unwrap_or(FocusPosition::Center),
            blur: self.blur,
        })
    }
}

/// Options for the monster workflow.
#[derive(Args, Debug, Clone)]
pub struct MotifArgs {
    /// Motif to generate; repeat for several. Defaults to all motifs.
    #[arg(long = "motif", value_parser = parse_motif)]
    pub motifs: Vec<Motif>,

    #[command(flatten)]
    pub focus: FocusArgs,

    /// Extra requirements appended to the prompt.
    #[arg(long, default_value = "")]
    pub note: String,
}

impl MotifArgs {
    pub fn plan(&self) -> MotifPlan {
        let mut plan = MotifPlan::new().with_custom_text(self.note.clone());
        if !self.motifs.is_empty() {
            plan = plan.with_motifs(self.motifs.clone());
        }
        match self.focus.options() {
            Some(focus) => plan.with_focus(focus),
            None => plan,
        }
    }
}

/// Where generated images are written.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output directory, created if missing.
    #[arg(long, env = "STAGER_OUTPUT_DIR", default_value = ".")]
    pub out: PathBuf,

    /// Print the final summary as JSON.
    #[arg(long)]
    pub json: bool,
}

// ---- value parsers ----

fn parse_mode(s: &str) -> Result<ConversionMode, String> {
    ConversionMode::from_tag(s).ok_or_else(|| format!("unknown mode '{s}'"))
}

fn parse_style(s: &str) -> Result<Style, String> {
    Style::from_tag(s).ok_or_else(|| format!("unknown style '{s}'"))
}

fn parse_motif(s: &str) -> Result<Motif, String> {
    Motif::from_tag(s).ok_or_else(|| format!("unknown motif '{s}'"))
}

fn parse_focus(s: &str) -> Result<FocusPosition, String> {
    FocusPosition::from_tag(s).ok_or_else(|| format!("unknown focus position '{s}'"))
}

fn parse_intensity(s: &str) -> Result<Intensity, String> {
    let level: u8 = s.parse().map_err(|_| format!("'{s}' is not a level between 0 and 5"))?;
    Intensity::new(level).map_err(|e| e.to_string())
}
