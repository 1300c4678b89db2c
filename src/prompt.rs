//! Style identifiers and the instructions sent with them.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// An artistic style the user can apply to a photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleId {
    /// Soft watercolor painting.
    Watercolor,
    /// Classical oil painting.
    OilPainting,
    /// Charcoal sketch.
    Charcoal,
    /// Neon-lit cyberpunk scene.
    Cyberpunk,
    /// Graphite pencil drawing.
    Pencil,
    /// Pop-art print.
    PopArt,
}

impl StyleId {
    /// Every style, in display order.
    pub const ALL: [StyleId; 6] = [
        Self::Watercolor,
        Self::OilPainting,
        Self::Charcoal,
        Self::Cyberpunk,
        Self::Pencil,
        Self::PopArt,
    ];

    /// Returns the identifier used on the command line and in serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Watercolor => "watercolor",
            Self::OilPainting => "oil-painting",
            Self::Charcoal => "charcoal",
            Self::Cyberpunk => "cyberpunk",
            Self::Pencil => "pencil",
            Self::PopArt => "pop-art",
        }
    }

    /// Returns a human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Watercolor => "Watercolor",
            Self::OilPainting => "Oil Painting",
            Self::Charcoal => "Charcoal",
            Self::Cyberpunk => "Cyberpunk",
            Self::Pencil => "Pencil Sketch",
            Self::PopArt => "Pop Art",
        }
    }

    /// Returns the instruction sent to the model for this style.
    pub fn instruction(&self) -> &'static str {
        PromptCatalog::instruction(*self)
    }
}

impl std::fmt::Display for StyleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleId {
    type Err = crate::RestyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == normalized)
            .ok_or_else(|| crate::RestyleError::InvalidRequest(format!("unknown style: {s}")))
    }
}

/// Fixed mapping from [`StyleId`] to model instructions.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptCatalog;

impl PromptCatalog {
    /// Returns the instruction for `style`.
    pub fn instruction(style: StyleId) -> &'static str {
        match style {
            StyleId::Watercolor => {
                "Transform this image into a delicate watercolor painting. Use soft, \
                 translucent washes of color, gentle bleeding edges, and visible paper \
                 texture while keeping the composition and subject recognizable."
            }
            StyleId::OilPainting => {
                "Transform this image into a classical oil painting. Use rich, layered \
                 colors, visible impasto brushstrokes, and warm dramatic lighting in the \
                 manner of an old master, while keeping the composition intact."
            }
            StyleId::Charcoal => {
                "Transform this image into an expressive charcoal drawing on textured \
                 paper. Use deep blacks, smudged mid-tones, and bold gestural strokes, \
                 rendered entirely in grayscale."
            }
            StyleId::Cyberpunk => {
                "Transform this image into a cyberpunk scene. Bathe it in neon pink, cyan, \
                 and purple light, add futuristic details and a rainy night-city \
                 atmosphere, while keeping the subject recognizable."
            }
            StyleId::Pencil => {
                "Transform this image into a detailed graphite pencil sketch. Use fine \
                 hatching and cross-hatching for shading, clean outlines, and a white \
                 paper background."
            }
            StyleId::PopArt => {
                "Transform this image into a bold pop-art print. Use flat, saturated \
                 primary colors, thick black outlines, and Ben-Day halftone dots in the \
                 style of 1960s comic art."
            }
        }
    }

    /// Iterates over every style and its instruction.
    pub fn iter() -> impl Iterator<Item = (StyleId, &'static str)> {
        StyleId::ALL
            .into_iter()
            .map(|style| (style, Self::instruction(style)))
    }
}

/// Builds the outfit replacement instruction for a free-text description.
///
/// The description is inserted verbatim; callers are expected to reject empty
/// descriptions before getting here.
pub fn outfit_instruction(description: &str) -> String {
    format!(
        "Edit this photo so the person is wearing the following outfit: {description}. \
         Keep the person's face, identity, body shape, hair, and pose exactly the same. \
         Keep the background, lighting, and framing unchanged. Only change the clothing, \
         and make the new outfit look photorealistic and naturally fitted."
    )
}
