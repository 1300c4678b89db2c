//! Outfit replacement example - keeps the person, swaps the clothes.
//!
//! Run with: `cargo run --example change_outfit -- <photo.jpg> "<outfit description>"`
//!
//! Requires `GEMINI_API_KEY` environment variable.

use restyle::{GeminiEditor, ImageEditorExt, ImagePayload};

#[tokio::main]
async fn main() -> restyle::Result<()> {
    let mut args = std::env::args().skip(1);
    let input_path = args
        .next()
        .expect("Usage: change_outfit <photo.jpg> <description>");
    let description = args.next().unwrap_or_default();
    if description.trim().is_empty() {
        eprintln!("Please describe the outfit");
        return Ok(());
    }

    let photo = ImagePayload::from_file(&input_path)?;
    let editor = GeminiEditor::builder().build()?;

    match editor.apply_outfit_description(&photo, &description).await? {
        Some(image) => println!("{}", image.to_data_uri()),
        None => println!("Failed to generate an image"),
    }

    Ok(())
}
