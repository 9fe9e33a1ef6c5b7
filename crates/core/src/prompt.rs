//! Instruction text sent to the image-generation endpoint.
//!
//! Prompts are assembled purely from fixed template fragments selected
//! by the transformation options. Building is deterministic: identical
//! inputs always produce byte-identical output.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Option types
// ---------------------------------------------------------------------------

/// Top-level transformation family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionMode {
    /// Furnish an empty rendered room in a chosen decor style.
    AddFurniture,
    /// Turn existing rendered furniture and materials photorealistic.
    MakeRealistic,
}

impl ConversionMode {
    pub const ALL: [ConversionMode; 2] = [Self::AddFurniture, Self::MakeRealistic];

    pub fn tag(self) -> &'static str {
        match self {
            Self::AddFurniture => "add_furniture",
            Self::MakeRealistic => "make_realistic",
        }
    }

    /// Parse a tag; accepts both `snake_case` and `kebab-case`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "add_furniture" | "addfurniture" => Some(Self::AddFurniture),
            "make_realistic" | "makerealistic" => Some(Self::MakeRealistic),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::AddFurniture => "Add furniture",
            Self::MakeRealistic => "Make realistic",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::AddFurniture => "Automatically furnish and decorate a bare room",
            Self::MakeRealistic => "Convert existing furniture to photorealistic materials",
        }
    }
}

/// Decor style used by [`ConversionMode::AddFurniture`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    Modern,
    Natural,
    Scandinavian,
    Minimalist,
    Luxury,
}

impl Style {
    /// Every style, in presentation order.
    pub const ALL: [Style; 5] = [
        Self::Modern,
        Self::Natural,
        Self::Scandinavian,
        Self::Minimalist,
        Self::Luxury,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Natural => "natural",
            Self::Scandinavian => "scandinavian",
            Self::Minimalist => "minimalist",
            Self::Luxury => "luxury",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|s| s.tag() == tag)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Modern => "Modern",
            Self::Natural => "Natural",
            Self::Scandinavian => "Scandinavian",
            Self::Minimalist => "Minimalist",
            Self::Luxury => "Luxury",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Modern => "Contemporary, refined design",
            Self::Natural => "Warm natural materials",
            Self::Scandinavian => "Simple and functional",
            Self::Minimalist => "The beauty of the bare essentials",
            Self::Luxury => "An opulent, high-end space",
        }
    }
}

/// Creature motif used by the monster workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Motif {
    Dragon,
    Kaiju,
    Slime,
    Ghost,
    Golem,
}

impl Motif {
    pub const ALL: [Motif; 5] = [
        Self::Dragon,
        Self::Kaiju,
        Self::Slime,
        Self::Ghost,
        Self::Golem,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Dragon => "dragon",
            Self::Kaiju => "kaiju",
            Self::Slime => "slime",
            Self::Ghost => "ghost",
            Self::Golem => "golem",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|m| m.tag() == tag)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dragon => "Dragon",
            Self::Kaiju => "Kaiju",
            Self::Slime => "Slime",
            Self::Ghost => "Ghost",
            Self::Golem => "Golem",
        }
    }
}

/// A 0-5 strength knob. Zero means "not requested".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Intensity(u8);

impl Intensity {
    pub const MAX: u8 = 5;
    pub const OFF: Intensity = Intensity(0);

    pub fn new(level: u8) -> Result<Self, CoreError> {
        if level > Self::MAX {
            return Err(CoreError::Validation(format!(
                "Intensity must be between 0 and {} (got {level})",
                Self::MAX
            )));
        }
        Ok(Self(level))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_off(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<u8> for Intensity {
    type Error = CoreError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<Intensity> for u8 {
    fn from(intensity: Intensity) -> u8 {
        intensity.0
    }
}

/// Knobs for [`ConversionMode::MakeRealistic`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RealisticOptions {
    /// Brightness of indoor light fixtures.
    pub indoor_lighting: Intensity,
    /// Brightness of daylight coming through windows.
    pub outdoor_lighting: Intensity,
    /// Also make plants, tableware and food photorealistic.
    pub enhance_small_items: bool,
}

/// Region of the frame kept in focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusPosition {
    Foreground,
    Center,
    Background,
}

impl FocusPosition {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "foreground" => Some(Self::Foreground),
            "center" | "centre" => Some(Self::Center),
            "background" => Some(Self::Background),
            _ => None,
        }
    }

    fn region(self) -> &'static str {
        match self {
            Self::Foreground => "foreground (objects closest to the camera)",
            Self::Center => "center of the room (the main furniture group)",
            Self::Background => "background (far walls, windows and the back of the room)",
        }
    }
}

/// Depth-of-field request. A zero blur adds nothing to the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusOptions {
    pub position: FocusPosition,
    pub blur: Intensity,
}

/// Mode together with the data only that mode reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TransformMode {
    AddFurniture { style: Style },
    MakeRealistic(RealisticOptions),
}

impl TransformMode {
    pub fn conversion_mode(&self) -> ConversionMode {
        match self {
            Self::AddFurniture { .. } => ConversionMode::AddFurniture,
            Self::MakeRealistic(_) => ConversionMode::MakeRealistic,
        }
    }
}

/// Everything the user chose for one transformation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformOptions {
    pub mode: TransformMode,
    pub focus: Option<FocusOptions>,
    #[serde(default)]
    pub custom_text: String,
}

impl TransformOptions {
    pub fn add_furniture(style: Style) -> Self {
        Self {
            mode: TransformMode::AddFurniture { style },
            focus: None,
            custom_text: String::new(),
        }
    }

    pub fn make_realistic(options: RealisticOptions) -> Self {
        Self {
            mode: TransformMode::MakeRealistic(options),
            focus: None,
            custom_text: String::new(),
        }
    }

    pub fn with_focus(mut self, focus: FocusOptions) -> Self {
        self.focus = Some(focus);
        self
    }

    pub fn with_custom_text(mut self, text: impl Into<String>) -> Self {
        self.custom_text = text.into();
        self
    }

    /// Prompt for the options as selected.
    pub fn prompt(&self) -> Prompt {
        match &self.mode {
            TransformMode::AddFurniture { style } => self.prompt_for_style(*style),
            TransformMode::MakeRealistic(_) => self.prompt_for_style(Style::Modern),
        }
    }

    /// Prompt with the decor style replaced by `style`. Realistic mode
    /// ignores the style entirely.
    pub fn prompt_for_style(&self, style: Style) -> Prompt {
        let realistic = match &self.mode {
            TransformMode::MakeRealistic(options) => Some(options),
            TransformMode::AddFurniture { .. } => None,
        };
        build_prompt(
            self.mode.conversion_mode(),
            style,
            &self.custom_text,
            realistic,
            self.focus.as_ref(),
        )
    }
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

/// Final instruction string. Never modified after construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Prompt(String);

impl Prompt {
    /// The prompt returned for an invalid mode/style combination.
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Prompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Templates
// ---------------------------------------------------------------------------

const MODERN_TEMPLATE: &str = "Transform this architectural CAD rendering into a photorealistic modern interior.
Add contemporary furniture including: designer sofa, minimalist coffee table, modern floor lamp.
Use clean lines, neutral colors with accent pieces, ambient lighting.
Include subtle decorative elements: abstract art, books, minimal plants.
Ensure photorealistic materials: leather, glass, polished wood.";

const NATURAL_TEMPLATE: &str = "Convert this CAD rendering into a warm, natural interior.
Add wooden furniture: rustic dining table, natural wood chairs, bookshelf.
Include plenty of indoor plants, woven textiles, ceramic decorations.
Use warm natural lighting, earth tones, organic textures.
Photorealistic wood grain, fabric details, plant leaves.";

const SCANDINAVIAN_TEMPLATE: &str = "Transform into a Scandinavian-style photorealistic interior.
Add light wood furniture: simple sofa, wooden side table, minimalist shelving.
Include cozy textiles: wool throw, linen cushions, woven rug.
White walls, natural light, neutral palette with soft colors.
Photorealistic pine/birch textures, soft fabric details.";

const MINIMALIST_TEMPLATE: &str = "Create a minimalist photorealistic interior with essential furniture only.
Add: simple sofa or seating, one functional table, minimal storage.
Use white/neutral surfaces, clean lines, hidden lighting.
Minimal decoration, maximum 1-2 accent pieces.
Photorealistic smooth surfaces, subtle shadows.";

const LUXURY_TEMPLATE: &str = "Generate a luxurious photorealistic interior.
Add high-end furniture: designer sofa, marble coffee table, elegant lighting fixtures.
Include: premium decorative elements, artwork, luxury textiles.
Use sophisticated color palette, dramatic lighting, premium materials.
Photorealistic leather, marble veining, metallic finishes, crystal details.";

const REALISTIC_INTRO: &str = "Transform existing furniture and materials into ultra-photorealistic elements with authentic real-world quality.";

const NATURAL_LIGHTING: &str = "NATURAL LIGHTING - Maintain original lighting balance:
- Keep the existing light levels from the original image
- Preserve natural shadows and lighting atmosphere
- Maintain original contrast between lit areas and shadow zones";

/// Indexed by intensity; index 0 is never emitted.
const INDOOR_LIGHTING_LEVELS: [&str; 6] = [
    "",
    "warm glow from indoor lighting with visible light emission",
    "bright illumination from ceiling lights and lamps with strong light output",
    "strong indoor lighting creating well-lit ambiance with glowing fixtures",
    "very bright indoor lighting with intense illumination and radiant glow",
    "extremely bright, powerfully glowing indoor lighting with dramatic intense effect and strong light rays",
];

const OUTDOOR_LIGHTING_LEVELS: [&str; 6] = [
    "",
    "soft natural light from windows with gentle rays",
    "comfortable daylight coming through windows",
    "bright natural sunlight streaming through windows",
    "strong outdoor light creating clear shadows and highlights",
    "intense sunlight with dramatic light rays and high contrast",
];

const BLUR_LEVELS: [&str; 6] = [
    "",
    "very subtle softening of out-of-focus areas",
    "gentle, natural-looking background blur",
    "moderate bokeh that clearly separates the in-focus region",
    "strong bokeh with creamy, heavily defocused areas",
    "extremely shallow depth of field with dramatic, intensely blurred out-of-focus areas",
];

const MATERIAL_TEXTURES: &str = "MATERIAL-SPECIFIC PHOTOREALISTIC TEXTURES:

Wood Materials:
- Deep, rich grain patterns with visible wood fiber direction
- Natural knots, burls, and growth rings
- Color variation within each wood piece
- Surface sheen showing light reflection along grain
- Subtle wear marks and aging on edges
- Shadow depth in grain grooves

Metal Surfaces:
- Sharp, bright highlights and reflections
- Mirror-like reflections of surroundings
- Polished surface showing fingerprints or subtle smudges
- Brushed metal showing directional grain
- Light streaks and reflective spots
- Environmental reflections clearly visible

Fabric & Textiles:
- Detailed weave pattern with individual thread visibility
- Soft shadows in fabric folds and creases
- Light diffusion through semi-transparent fabrics
- Texture depth showing pile height (for carpets/velvet)
- Natural fabric irregularities and slight pilling
- Color variation in weave pattern

Leather:
- Natural grain texture with pores visible
- Creases and wrinkles from use
- Subtle shine on worn areas
- Color depth and variation
- Surface reflections on polished leather
- Natural imperfections and character marks

Glass & Transparent Materials:
- Clear transparency with visible refraction
- Sharp reflections of light sources
- Subtle surface imperfections or dust
- Light passing through creating color shifts
- Edge highlights and reflections
- Environmental reflections and see-through clarity

Stone & Concrete:
- Surface texture with tiny pits and irregularities
- Natural color variation and veining (for marble/granite)
- Matte or polished finish clearly visible
- Shadow depth in surface texture
- Weathering and natural aging marks";

const SMALL_ITEMS: &str = "SMALL ITEMS ENHANCEMENT - Transform decorative items into photorealistic elements:

Indoor Plants:
- Replace with realistic, living plants with detailed leaf textures
- Natural green color variations and subtle imperfections
- Realistic soil, pots, and planters with authentic materials
- Visible leaf veins, natural shine, and organic shapes
- Include realistic shadows and light interaction with leaves

Tableware & Dishes (ON TABLES AND SURFACES):
- Transform ALL items on tables, countertops, and surfaces into photorealistic elements
- Replace any objects on table surfaces (dishes, cups, bowls, utensils, decorations, small items)
- Transform into photorealistic ceramic, porcelain, or glass items
- Show realistic surface reflections and material properties
- Include subtle imperfections like fingerprints or slight wear
- Natural shadows and highlights on curved surfaces
- Authentic color and glaze textures

Food Items:
- Replace with ultra-realistic food photography quality
- Show natural textures, moisture, and appetizing details
- Realistic colors with natural variations
- Proper shadows and highlights showing food dimensionality
- Include authentic imperfections that prove real food quality";

const REALISM_REQUIREMENTS: &str = "CRITICAL REALISM REQUIREMENTS:
- Remove ALL 3D/CGI appearance - make it look like a professional photograph
- Every surface must show the depth, texture, and light interaction of real materials
- Shadows must have natural softness gradients (sharp near object, softer at edges)
- Highlights must be bright and realistic, not overblown
- Materials must look touchable, with visible tactile texture
- Light must interact naturally with each material type
- Include subtle imperfections that prove authenticity (slight dust, minor wear, natural variations)";

const QUALITY_REQUIREMENTS: &str = "General requirements:
- Highly detailed, photorealistic rendering
- Professional architectural visualization
- Proper perspective and scale
- Natural color grading";

const PRESERVE_STRUCTURE: &str = "CRITICAL - Preserve room structure:
- Keep walls, floor, ceiling, windows, doors EXACTLY as they are
- Maintain original room layout, dimensions, and architectural elements
- Do NOT change wall colors, flooring, ceiling design, or window positions
- Preserve the original perspective and camera angle
- Keep all structural elements unchanged (columns, beams, architectural details)
- Only enhance or add furniture and decorative elements
- Maintain the exact same room shape and proportions";

const DRAGON_TEMPLATE: &str = "Add a photorealistic dragon to this photo.
A large winged dragon with iridescent scales, curved horns, and glowing amber eyes.
Show detailed scale texture, leathery wing membranes, and visible claws.
Pose the dragon naturally within the scene, interacting with the surroundings.
Cast realistic shadows and reflect the existing light sources on the scales.";

const KAIJU_TEMPLATE: &str = "Add a photorealistic giant kaiju monster to this photo.
A towering reptilian creature with rough, rocky hide and jagged dorsal plates.
Show massive scale relative to the scene, with atmospheric haze around distant parts.
Include dust, debris, and motion cues where the creature meets the ground.
Match the camera angle so the creature looks filmed on location.";

const SLIME_TEMPLATE: &str = "Add a photorealistic slime monster to this photo.
A glossy, semi-transparent gelatinous creature with a soft, wobbling body.
Show refraction and caustics through the slime, with objects slightly visible inside.
Include a wet sheen, small bubbles, and a faint trail where it has moved.
Reflect the surrounding colors and light sources on its curved surface.";

const GHOST_TEMPLATE: &str = "Add a photorealistic ghost to this photo.
A pale, translucent apparition with flowing, tattered edges that fade into the air.
Show a faint inner glow and soft light spill onto nearby surfaces.
Keep the background visible through the figure with subtle distortion.
Add a cold, eerie atmosphere without changing the overall exposure.";

const GOLEM_TEMPLATE: &str = "Add a photorealistic stone golem to this photo.
A hulking humanoid built from cracked boulders, moss, and glowing runes.
Show weathered rock texture, lichen, chipped edges, and heavy mass.
Ground the golem with contact shadows and small displaced debris.
Light the runes subtly so they cast a faint glow on nearby surfaces.";

const MOTIF_QUALITY_REQUIREMENTS: &str = "General requirements:
- Highly detailed, photorealistic creature rendering
- Correct perspective and scale relative to the scene
- Lighting, shadows, and color grading consistent with the original photo
- Natural integration with no visible compositing edges";

const PRESERVE_SCENE: &str = "CRITICAL - Preserve the original photo:
- Keep every existing object, person, and background element EXACTLY as it is
- Do NOT change the camera angle, framing, or perspective
- Do NOT alter the time of day, weather, or overall lighting
- Only add the creature and the shadows, reflections, and debris it directly causes";

fn furniture_template(style: Style) -> &'static str {
    match style {
        Style::Modern => MODERN_TEMPLATE,
        Style::Natural => NATURAL_TEMPLATE,
        Style::Scandinavian => SCANDINAVIAN_TEMPLATE,
        Style::Minimalist => MINIMALIST_TEMPLATE,
        Style::Luxury => LUXURY_TEMPLATE,
    }
}

fn motif_template(motif: Motif) -> &'static str {
    match motif {
        Motif::Dragon => DRAGON_TEMPLATE,
        Motif::Kaiju => KAIJU_TEMPLATE,
        Motif::Slime => SLIME_TEMPLATE,
        Motif::Ghost => GHOST_TEMPLATE,
        Motif::Golem => GOLEM_TEMPLATE,
    }
}

/// Base template for realistic mode, assembled from the lighting and
/// small-item knobs.
fn realistic_template(options: &RealisticOptions) -> String {
    let mut lighting = NATURAL_LIGHTING.to_string();

    if !options.indoor_lighting.is_off() {
        lighting.push_str("\n- Indoor lighting fixtures: ");
        lighting.push_str(INDOOR_LIGHTING_LEVELS[options.indoor_lighting.get() as usize]);
    }

    if !options.outdoor_lighting.is_off() {
        lighting.push_str("\n- Outdoor light through windows: ");
        lighting.push_str(OUTDOOR_LIGHTING_LEVELS[options.outdoor_lighting.get() as usize]);
    }

    let mut prompt = format!("{REALISTIC_INTRO}\n\n{lighting}\n\n{MATERIAL_TEXTURES}");

    if options.enhance_small_items {
        prompt.push_str("\n\n");
        prompt.push_str(SMALL_ITEMS);
    }

    prompt.push_str("\n\n");
    prompt.push_str(REALISM_REQUIREMENTS);
    prompt
}

fn focus_clause(focus: &FocusOptions) -> Option<String> {
    if focus.blur.is_off() {
        return None;
    }
    Some(format!(
        "DEPTH OF FIELD - Simulate a real camera lens:\n\
         - Keep the {} sharply in focus\n\
         - Out-of-focus areas: {}\n\
         - Blur must increase gradually with distance from the focal plane",
        focus.position.region(),
        BLUR_LEVELS[focus.blur.get() as usize],
    ))
}

/// Append the optional focus clause, the user addendum and the two
/// closing blocks to `base`.
fn finish(
    mut prompt: String,
    focus: Option<&FocusOptions>,
    custom_text: &str,
    quality: &str,
    preserve: &str,
) -> Prompt {
    if let Some(clause) = focus.and_then(focus_clause) {
        prompt.push_str("\n\n");
        prompt.push_str(&clause);
    }

    let custom = custom_text.trim();
    if !custom.is_empty() {
        prompt.push_str("\n\nAdditional requirements: ");
        prompt.push_str(custom);
    }

    prompt.push_str("\n\n");
    prompt.push_str(quality);
    prompt.push_str("\n\n");
    prompt.push_str(preserve);
    Prompt(prompt)
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Build the instruction for a room transformation.
///
/// `style` selects the template in [`ConversionMode::AddFurniture`] and
/// is ignored in [`ConversionMode::MakeRealistic`]; `realistic` is read
/// only in realistic mode (missing means every knob off).
pub fn build_prompt(
    mode: ConversionMode,
    style: Style,
    custom_text: &str,
    realistic: Option<&RealisticOptions>,
    focus: Option<&FocusOptions>,
) -> Prompt {
    let base = match mode {
        ConversionMode::AddFurniture => furniture_template(style).to_string(),
        ConversionMode::MakeRealistic => {
            realistic_template(&realistic.copied().unwrap_or_default())
        }
    };

    finish(base, focus, custom_text, QUALITY_REQUIREMENTS, PRESERVE_STRUCTURE)
}

/// Same as [`build_prompt`] but with mode and style given as free-form
/// tags. An unknown combination is logged and yields [`Prompt::empty`],
/// which must not be sent to the generator.
pub fn build_prompt_from_tags(
    mode_tag: &str,
    style_tag: &str,
    custom_text: &str,
    realistic: Option<&RealisticOptions>,
    focus: Option<&FocusOptions>,
) -> Prompt {
    let mode = ConversionMode::from_tag(mode_tag);
    let style = match mode {
        Some(ConversionMode::MakeRealistic) => Some(Style::from_tag(style_tag).unwrap_or(Style::Modern)),
        _ => Style::from_tag(style_tag),
    };

    match (mode, style) {
        (Some(mode), Some(style)) => build_prompt(mode, style, custom_text, realistic, focus),
        _ => {
            tracing::error!(
                mode = mode_tag,
                style = style_tag,
                "Invalid mode/style combination",
            );
            Prompt::empty()
        }
    }
}

/// Prompt preview for display; identical to what would be sent.
pub fn preview_prompt(options: &TransformOptions) -> Prompt {
    options.prompt()
}

/// Build the instruction for adding a creature of the given motif.
pub fn build_motif_prompt(motif: Motif, custom_text: &str, focus: Option<&FocusOptions>) -> Prompt {
    finish(
        motif_template(motif).to_string(),
        focus,
        custom_text,
        MOTIF_QUALITY_REQUIREMENTS,
        PRESERVE_SCENE,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
