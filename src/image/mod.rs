//! Image editing module.

mod editor;
pub mod providers;
mod types;

pub use editor::{ImageEditor, ImageEditorExt};
pub use types::{ImageFormat, ImagePayload, TransformedImage};
