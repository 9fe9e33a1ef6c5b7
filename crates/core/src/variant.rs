//! Identifiers for the individual outputs of a batch run.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::prompt::{Motif, Style};

/// One requested output: a decor style in the furniture workflow or a
/// creature motif in the monster workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "tag", rename_all = "snake_case")]
pub enum Variant {
    Furniture(Style),
    Motif(Motif),
}

impl Variant {
    /// Short identifier used in logs, events and file names.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Furniture(style) => style.tag(),
            Self::Motif(motif) => motif.tag(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Furniture(style) => style.label(),
            Self::Motif(motif) => motif.label(),
        }
    }

    /// All furniture variants in presentation order.
    pub fn all_styles() -> Vec<Variant> {
        Style::ALL.into_iter().map(Variant::Furniture).collect()
    }

    /// All motif variants in presentation order.
    pub fn all_motifs() -> Vec<Variant> {
        Motif::ALL.into_iter().map(Variant::Motif).collect()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<Style> for Variant {
    fn from(style: Style) -> Self {
        Self::Furniture(style)
    }
}

impl From<Motif> for Variant {
    fn from(motif: Motif) -> Self {
        Self::Motif(motif)
    }
}
