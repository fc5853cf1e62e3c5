//! The `tonecap caption` command: caption one image without prompts.

use clap::{Args, ValueEnum};
use std::path::PathBuf;
use tonecap_core::{Config, GenerateResponse, ModelOverrides, StyledCaption, Tonecap, ToneMode};

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Numbered captions, one block per caption
    #[default]
    Text,
    /// The same JSON body the `/generate` endpoint returns
    Json,
}

/// Arguments for the `caption` command.
#[derive(Args, Debug)]
pub struct CaptionArgs {
    /// Image file to caption
    #[arg(required = true)]
    pub image: PathBuf,

    /// Tone preset (casual, professional, promotional, friendly, informative).
    /// Unrecognized values leave the captions unstyled.
    #[arg(short, long, default_value = "casual")]
    pub tone: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Execute the caption command.
pub async fn execute(
    config: Config,
    overrides: ModelOverrides,
    args: CaptionArgs,
) -> anyhow::Result<()> {
    let image = expand_path(&args.image);
    let tone = parse_tone_lenient(&args.tone);

    let tonecap = match Tonecap::connect(config, &overrides).await {
        Ok(tonecap) => tonecap,
        Err(e) => {
            if args.format == OutputFormat::Json {
                println!("{}", serde_json::to_string(&GenerateResponse::model_unavailable())?);
            }
            return Err(e.into());
        }
    };

    let spinner = create_spinner("Generating captions...");
    let result = tonecap.pipeline().caption_file(&image, tone).await;
    spinner.finish_and_clear();

    match (result, args.format) {
        (Ok(captions), OutputFormat::Text) => {
            println!("{}", render_numbered(&captions));
            Ok(())
        }
        (Ok(captions), OutputFormat::Json) => {
            println!("{}", serde_json::to_string(&GenerateResponse::success(captions))?);
            Ok(())
        }
        (Err(e), OutputFormat::Json) => {
            println!("{}", serde_json::to_string(&GenerateResponse::error(e.to_string()))?);
            Err(e.into())
        }
        (Err(e), OutputFormat::Text) => Err(e.into()),
    }
}

/// Parse a tone name; anything unrecognized means "no styling".
pub(crate) fn parse_tone_lenient(raw: &str) -> Option<ToneMode> {
    let tone = raw.parse().ok();
    if tone.is_none() {
        tracing::warn!("Unknown tone '{raw}', captions will be left unstyled");
    }
    tone
}

/// Expand `~` and environment variables in a user-supplied path.
pub(crate) fn expand_path(path: &std::path::Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path.to_path_buf(),
    }
}

/// `1. first`, `2. second`... separated by blank lines.
pub(crate) fn render_numbered(captions: &[StyledCaption]) -> String {
    captions
        .iter()
        .enumerate()
        .map(|(i, caption)| format!("{}. {}", i + 1, caption))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Spinner shown on stderr while the model is working.
pub(crate) fn create_spinner(message: &str) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap(),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
