//! Interactive CLI mode: the guided flow for bare `tonecap` invocation.
//!
//! Loads the caption model, asks for an image and a tone, and prints the
//! numbered captions to stdout.

pub mod session;
pub mod theme;

use anyhow::Context;
use console::Style;
use dialoguer::Input;
use tonecap_core::{Config, ModelOverrides, Tonecap};

use crate::cli::caption::render_numbered;
use session::{run_session, Prompter, SessionEnd};

/// Convert a dialoguer result into `Ok(Some(value))` on success, `Ok(None)` on
/// interrupt (Ctrl+C / terminal disconnect), and `Err` for other I/O failures.
fn handle_interrupt<T>(result: dialoguer::Result<T>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(dialoguer::Error::IO(e)) if e.kind() == std::io::ErrorKind::Interrupted => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Terminal prompts backed by dialoguer.
struct DialoguerPrompter {
    theme: dialoguer::theme::ColorfulTheme,
}

impl Prompter for DialoguerPrompter {
    fn image_path(&mut self) -> anyhow::Result<Option<String>> {
        handle_interrupt(
            Input::<String>::with_theme(&self.theme)
                .with_prompt("Enter the path to your image")
                .allow_empty(true)
                .interact_text(),
        )
    }

    fn tone_choice(&mut self) -> anyhow::Result<Option<String>> {
        theme::print_tone_menu();
        handle_interrupt(
            Input::<String>::with_theme(&self.theme)
                .with_prompt("Enter the number of your tone")
                .allow_empty(true)
                .interact_text(),
        )
    }
}

/// Entry point for interactive mode.
pub async fn run(config: Config, overrides: ModelOverrides) -> anyhow::Result<()> {
    theme::print_banner();

    let tonecap = Tonecap::connect(config, &overrides)
        .await
        .context("Failed to load the caption model")?;

    let mut prompter = DialoguerPrompter {
        theme: theme::tonecap_theme(),
    };
    let end = run_session(tonecap.pipeline(), &mut prompter).await?;

    match end {
        SessionEnd::Captions(captions) => {
            let bold = Style::new().for_stderr().bold();
            eprintln!();
            eprintln!("{}", bold.apply_to("Generated Captions:"));
            println!("{}", render_numbered(&captions));
        }
        SessionEnd::Interrupted => {
            eprintln!();
            eprintln!("Program stopped by user.");
        }
        other => {
            let red = Style::new().for_stderr().red();
            if let Some(message) = other.message() {
                eprintln!("{}", red.apply_to(message));
            }
        }
    }

    Ok(())
}
