use serde::{Deserialize, Serialize};

/// Placeholder shown when the service returns an empty thumbnail field.
pub const FALLBACK_THUMBNAIL: &str =
    "https://images.unsplash.com/photo-1611162617474-5b21e879e113?q=80&w=1000&auto=format&fit=crop";

/// One resolved media item, produced wholesale by the acquisition client.
/// Immutable once received; replaced entirely by the next request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaDescriptor {
    pub title: String,
    pub thumbnail: String,
    pub duration: String,
    pub platform: String,
    pub formats: Vec<FormatVariant>,
}

impl MediaDescriptor {
    pub fn thumbnail_or_fallback(&self) -> &str {
        if self.thumbnail.trim().is_empty() {
            FALLBACK_THUMBNAIL
        } else {
            &self.thumbnail
        }
    }

    pub fn formats_of(&self, kind: FormatKind) -> impl Iterator<Item = &FormatVariant> {
        self.formats.iter().filter(move |f| f.kind == kind)
    }

    pub fn find_format(&self, key: &SlotKey) -> Option<&FormatVariant> {
        self.formats.iter().find(|f| &f.slot_key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    Video,
    Audio,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatVariant {
    pub quality: String,
    #[serde(rename = "type")]
    pub kind: FormatKind,
    pub size: String,
    pub extension: String,
    pub url: String,
}

impl FormatVariant {
    /// UI identity of a variant. The upstream service does not guarantee
    /// global uniqueness; two identical (quality, kind) pairs share a slot.
    pub fn slot_key(&self) -> SlotKey {
        SlotKey {
            quality: self.quality.clone(),
            kind: self.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SlotKey {
    pub quality: String,
    pub kind: FormatKind,
}

/// Web reference the service claims supports its answer. Informational only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitationSource {
    pub uri: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_requires_formats_field() {
        let payload = r#"{"title":"t","thumbnail":"","duration":"1:00","platform":"YouTube"}"#;
        assert!(serde_json::from_str::<MediaDescriptor>(payload).is_err());
    }

    #[test]
    fn format_kind_parses_lowercase() {
        let payload = r##"{"quality":"1080p","type":"video","size":"120 MB","extension":"mp4","url":"#"}"##;
        let v: FormatVariant = serde_json::from_str(payload).unwrap();
        assert_eq!(v.kind, FormatKind::Video);
    }

    #[test]
    fn unknown_format_kind_rejected() {
        let payload = r##"{"quality":"1080p","type":"subtitle","size":"1 MB","extension":"srt","url":"#"}"##;
        assert!(serde_json::from_str::<FormatVariant>(payload).is_err());
    }

    #[test]
    fn empty_thumbnail_falls_back() {
        let d = MediaDescriptor {
            title: "t".into(),
            thumbnail: "  ".into(),
            duration: "0:30".into(),
            platform: "TikTok".into(),
            formats: vec![],
        };
        assert_eq!(d.thumbnail_or_fallback(), FALLBACK_THUMBNAIL);
    }
}
