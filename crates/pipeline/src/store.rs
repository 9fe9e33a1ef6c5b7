//! Generated artifacts, in the order their variants were submitted.

use serde::{Serialize, Serializer};
use stager_core::naming::download_filename;
use stager_core::types::Timestamp;
use stager_core::variant::Variant;
use stager_imagegen::api::GeneratedImage;

/// One successful generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeneratedVariant {
    pub variant: Variant,
    #[serde(serialize_with = "serialize_data_uri")]
    pub image: GeneratedImage,
    pub created_at: Timestamp,
}

impl GeneratedVariant {
    pub fn new(variant: Variant, image: GeneratedImage) -> Self {
        Self {
            variant,
            image,
            created_at: chrono::Utc::now(),
        }
    }

    /// File name this artifact is exported under.
    pub fn download_filename(&self) -> String {
        download_filename(Some(self.variant.tag()), self.created_at)
    }
}

fn serialize_data_uri<S: Serializer>(image: &GeneratedImage, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&image.data_uri())
}

/// Outcome of a single variant inside a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GenerationResult {
    Success(GeneratedVariant),
    Failure { variant: Variant, reason: String },
}

impl GenerationResult {
    pub fn variant(&self) -> Variant {
        match self {
            Self::Success(generated) => generated.variant,
            Self::Failure { variant, .. } => *variant,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Append-only collection of successful generations.
///
/// Entries keep submission order. Failed variants never appear here.
/// The store is emptied only when a new source image is accepted.
#[derive(Debug, Default)]
pub struct ResultStore {
    entries: Vec<GeneratedVariant>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, generated: GeneratedVariant) {
        self.entries.push(generated);
    }

    /// Most recent artifact for `variant`, if any.
    pub fn get(&self, variant: Variant) -> Option<&GeneratedVariant> {
        self.entries.iter().rev().find(|g| g.variant == variant)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeneratedVariant> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use stager_core::prompt::Style;

    use super::*;

    fn generated(style: Style, bytes: &[u8]) -> GeneratedVariant {
        GeneratedVariant::new(Variant::Furniture(style), GeneratedImage::new(bytes.to_vec()))
    }

    #[test]
    fn keeps_insertion_order() {
        let mut store = ResultStore::new();
        store.push(generated(Style::Luxury, b"a"));
        store.push(generated(Style::Modern, b"b"));

        let order: Vec<Variant> = store.iter().map(|g| g.variant).collect();
        assert_eq!(
            order,
            vec![Variant::Furniture(Style::Luxury), Variant::Furniture(Style::Modern)]
        );
    }

    #[test]
    fn get_returns_latest_entry_for_variant() {
        let mut store = ResultStore::new();
        store.push(generated(Style::Modern, b"first"));
        store.push(generated(Style::Natural, b"other"));
        store.push(generated(Style::Modern, b"second"));

        let found = store.get(Variant::Furniture(Style::Modern)).expect("entry");
        assert_eq!(found.image.bytes(), b"second");
        assert!(store.get(Variant::Furniture(Style::Luxury)).is_none());
    }

    #[test]
    fn clear_empties_store() {
        let mut store = ResultStore::new();
        store.push(generated(Style::Modern, b"a"));
        assert_eq!(store.len(), 1);

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn download_filename_uses_variant_tag() {
        let mut g = generated(Style::Scandinavian, b"a");
        g.created_at = chrono::Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
        assert_eq!(g.download_filename(), "stager-scandinavian-1700000000000.png");
    }

    #[test]
    fn success_serializes_image_as_data_uri() {
        let result = GenerationResult::Success(generated(Style::Modern, b"ABC"));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["outcome"], "success");
        assert_eq!(json["image"], "data:image/png;base64,QUJD");
        assert_eq!(json["variant"]["tag"], "modern");
    }
}
