//! One guided captioning round: image path → decode → tone → captions.
//!
//! Prompting is behind [`Prompter`] so the flow can be driven without a
//! terminal.

use std::path::PathBuf;

use tonecap_core::{CaptionPipeline, PipelineError, StyledCaption, ToneMode};

use crate::cli::caption::{create_spinner, expand_path};

/// Source of user answers. `Ok(None)` means the user interrupted.
pub trait Prompter {
    fn image_path(&mut self) -> anyhow::Result<Option<String>>;
    fn tone_choice(&mut self) -> anyhow::Result<Option<String>>;
}

/// How a session finished.
#[derive(Debug)]
pub enum SessionEnd {
    Captions(Vec<StyledCaption>),
    EmptyPath,
    NotFound(PathBuf),
    InvalidTone,
    Failed(PipelineError),
    Interrupted,
}

impl SessionEnd {
    /// Message shown to the user for anything other than captions.
    pub fn message(&self) -> Option<String> {
        match self {
            SessionEnd::Captions(_) => None,
            SessionEnd::EmptyPath => Some("No image path provided.".to_string()),
            SessionEnd::NotFound(path) => Some(format!("File '{}' not found.", path.display())),
            SessionEnd::InvalidTone => Some("Invalid tone selection.".to_string()),
            SessionEnd::Failed(e) => Some(format!("Error generating captions: {e}")),
            SessionEnd::Interrupted => Some("Program stopped by user.".to_string()),
        }
    }
}

/// Run one session. The model is only called once the path exists, the
/// image decodes and the tone choice is valid.
pub async fn run_session<P: Prompter>(
    pipeline: &CaptionPipeline,
    prompter: &mut P,
) -> anyhow::Result<SessionEnd> {
    let Some(raw_path) = prompter.image_path()? else {
        return Ok(SessionEnd::Interrupted);
    };
    let raw_path = raw_path.trim();
    if raw_path.is_empty() {
        return Ok(SessionEnd::EmptyPath);
    }

    let path = expand_path(raw_path.as_ref());
    if !path.is_file() {
        return Ok(SessionEnd::NotFound(PathBuf::from(raw_path)));
    }

    let decoded = match pipeline.decoder().decode_file(&path).await {
        Ok(decoded) => decoded,
        Err(e) => return Ok(SessionEnd::Failed(e)),
    };

    let Some(choice) = prompter.tone_choice()? else {
        return Ok(SessionEnd::Interrupted);
    };
    let Some(tone) = ToneMode::from_menu_choice(&choice) else {
        return Ok(SessionEnd::InvalidTone);
    };

    tracing::debug!("Captioning {:?} as {}", path, tone);
    let spinner = create_spinner("Generating captions...");
    let result = tokio::select! {
        result = pipeline.caption_decoded(&decoded, &path, Some(tone)) => Some(result),
        _ = tokio::signal::ctrl_c() => None,
    };
    spinner.finish_and_clear();

    Ok(match result {
        Some(Ok(captions)) => SessionEnd::Captions(captions),
        Some(Err(e)) => SessionEnd::Failed(e),
        None => SessionEnd::Interrupted,
    })
}
