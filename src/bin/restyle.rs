//! CLI for Restyle - style transfer and outfit replacement for photos.

use clap::{Args, Parser, Subcommand, ValueEnum};
use restyle::image::{ImageEditorExt, ImagePayload, TransformedImage};
use restyle::{GeminiEditor, GeminiModel, PromptCatalog, StyleId};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "restyle")]
#[command(about = "Restyle photos or change outfits with Gemini image models")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Redraw a photo in an artistic style
    Style(StyleArgs),

    /// Replace the clothing in a photo with a described outfit
    Outfit(OutfitArgs),

    /// List available styles
    Styles,
}

#[derive(Args)]
struct StyleArgs {
    /// Style to apply
    #[arg(value_enum)]
    style: StyleArg,

    #[command(flatten)]
    io: IoArgs,
}

#[derive(Args)]
struct OutfitArgs {
    /// Description of the new outfit
    description: String,

    #[command(flatten)]
    io: IoArgs,
}

#[derive(Args)]
struct IoArgs {
    /// Input photo
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path (required unless --data-uri is given)
    #[arg(short, long, required_unless_present = "data_uri")]
    output: Option<PathBuf>,

    /// Print the result as a data URI instead of writing a file
    #[arg(long)]
    data_uri: bool,

    /// Model to use: "flash", "pro", or a full model identifier
    #[arg(short, long, default_value = "flash")]
    model: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StyleArg {
    Watercolor,
    OilPainting,
    Charcoal,
    Cyberpunk,
    Pencil,
    PopArt,
}

impl From<StyleArg> for StyleId {
    fn from(arg: StyleArg) -> Self {
        match arg {
            StyleArg::Watercolor => StyleId::Watercolor,
            StyleArg::OilPainting => StyleId::OilPainting,
            StyleArg::Charcoal => StyleId::Charcoal,
            StyleArg::Cyberpunk => StyleId::Cyberpunk,
            StyleArg::Pencil => StyleId::Pencil,
            StyleArg::PopArt => StyleId::PopArt,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Style(args) => {
            apply_style(args, cli.json).await?;
        }
        Commands::Outfit(args) => {
            apply_outfit(args, cli.json).await?;
        }
        Commands::Styles => {
            list_styles(cli.json)?;
        }
    }

    Ok(())
}

fn build_editor(io: &IoArgs) -> anyhow::Result<GeminiEditor> {
    Ok(GeminiEditor::builder()
        .model(GeminiModel::from(io.model.as_str()))
        .build()?)
}

async fn apply_style(args: StyleArgs, json_output: bool) -> anyhow::Result<()> {
    let style = StyleId::from(args.style);
    let photo = ImagePayload::from_file(&args.io.input)?;
    let editor = build_editor(&args.io)?;

    let result = editor.apply_style(&photo, style).await?;
    finish(result, &args.io, json_output, &format!("style:{style}"))
}

async fn apply_outfit(args: OutfitArgs, json_output: bool) -> anyhow::Result<()> {
    let description = args.description.trim();
    if description.is_empty() {
        anyhow::bail!("outfit description must not be empty");
    }

    let photo = ImagePayload::from_file(&args.io.input)?;
    let editor = build_editor(&args.io)?;

    let result = editor.apply_outfit_description(&photo, description).await?;
    finish(result, &args.io, json_output, "outfit")
}

fn finish(
    result: Option<TransformedImage>,
    io: &IoArgs,
    json_output: bool,
    mode: &str,
) -> anyhow::Result<()> {
    let Some(image) = result else {
        anyhow::bail!("failed to generate an image: the model returned no image");
    };

    if io.data_uri {
        println!("{}", data_uri_output(&image, json_output, mode)?);
        return Ok(());
    }

    // clap enforces --output when --data-uri is absent
    let Some(output) = io.output.as_ref() else {
        anyhow::bail!("--output is required");
    };
    let bytes = image.decode()?;
    std::fs::write(output, &bytes)?;

    if json_output {
        let result = serde_json::json!({
            "success": true,
            "mode": mode,
            "input": io.input.display().to_string(),
            "output": output.display().to_string(),
            "mime_type": image.mime_type(),
            "size_bytes": bytes.len(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Saved {} ({} bytes, {})",
            output.display(),
            bytes.len(),
            image.mime_type()
        );
    }

    Ok(())
}

fn data_uri_output(
    image: &TransformedImage,
    json_output: bool,
    mode: &str,
) -> anyhow::Result<String> {
    if !json_output {
        return Ok(image.to_data_uri());
    }
    let result = serde_json::json!({
        "success": true,
        "mode": mode,
        "mime_type": image.mime_type(),
        "data_uri": image.to_data_uri(),
    });
    Ok(serde_json::to_string_pretty(&result)?)
}

fn list_styles(json_output: bool) -> anyhow::Result<()> {
    #[derive(serde::Serialize)]
    struct StyleInfo {
        id: StyleId,
        label: &'static str,
        instruction: &'static str,
    }

    let styles: Vec<StyleInfo> = PromptCatalog::iter()
        .map(|(id, instruction)| StyleInfo {
            id,
            label: id.label(),
            instruction,
        })
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&styles)?);
    } else {
        println!("Available styles:\n");
        for s in &styles {
            println!("  {:<14} {}", s.id.as_str(), s.label);
        }
    }

    Ok(())
}
