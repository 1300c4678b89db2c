//! Style transfer example - redraws a photo as a watercolor painting.
//!
//! Run with: `cargo run --example apply_style -- <photo.jpg>`
//!
//! Requires `GEMINI_API_KEY` environment variable.

use restyle::{GeminiEditor, ImageEditorExt, ImagePayload, StyleId};

#[tokio::main]
async fn main() -> restyle::Result<()> {
    let input_path = std::env::args()
        .nth(1)
        .expect("Usage: apply_style <photo.jpg>");

    let photo = ImagePayload::from_file(&input_path)?;
    let editor = GeminiEditor::builder().build()?;

    match editor.apply_style(&photo, StyleId::Watercolor).await? {
        Some(image) => {
            let path = format!("watercolor.{}", image.format().map_or("png", |f| f.extension()));
            image.save(&path)?;
            println!("Saved {path}");
        }
        None => println!("Failed to generate an image"),
    }

    Ok(())
}
