#![warn(missing_docs)]
//! Restyle - artistic style transfer and outfit replacement for photos.
//!
//! A photo is sent to a Gemini image model together with a fixed style
//! instruction or a templated outfit description, and the first image in
//! the response is handed back as a data URI.
//!
//! # Quick Start
//!
//! ```no_run
//! use restyle::{GeminiEditor, ImageEditorExt, ImagePayload, StyleId};
//!
//! #[tokio::main]
//! async fn main() -> restyle::Result<()> {
//!     let editor = GeminiEditor::builder().build()?;
//!     let photo = ImagePayload::from_file("portrait.jpg")?;
//!
//!     match editor.apply_style(&photo, StyleId::Watercolor).await? {
//!         Some(image) => image.save("portrait-watercolor.png")?,
//!         None => eprintln!("no image in response"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `restyle` command-line tool

mod error;
pub mod image;
pub mod prompt;

// Re-export error types at crate root
pub use error::{RestyleError, Result};

pub use image::providers::{GeminiEditor, GeminiEditorBuilder, GeminiModel};
pub use image::{ImageEditor, ImageEditorExt, ImageFormat, ImagePayload, TransformedImage};
pub use prompt::{outfit_instruction, PromptCatalog, StyleId};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{RestyleError, Result};
    pub use crate::image::providers::GeminiEditor;
    pub use crate::image::{ImageEditor, ImageEditorExt, ImagePayload, TransformedImage};
    pub use crate::prompt::StyleId;
}
