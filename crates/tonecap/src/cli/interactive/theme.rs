//! Dialoguer theme and banner for the guided captioning flow.

use console::{style, Style};
use dialoguer::theme::ColorfulTheme;

/// `ColorfulTheme` with Tonecap's colors: magenta prompt marker, green
/// confirmations, red errors. Everything renders on stderr.
pub fn tonecap_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("?".to_string()).for_stderr().magenta(),
        prompt_style: Style::new().for_stderr().bold(),
        prompt_suffix: style("›".to_string()).for_stderr().bright().black(),
        active_item_prefix: style("▸".to_string()).for_stderr().magenta(),
        active_item_style: Style::new().for_stderr().magenta(),
        success_prefix: style("✓".to_string()).for_stderr().green(),
        success_suffix: style("·".to_string()).for_stderr().bright().black(),
        error_prefix: style("✗".to_string()).for_stderr().red(),
        error_style: Style::new().for_stderr().red(),
        values_style: Style::new().for_stderr().green(),
        ..ColorfulTheme::default()
    }
}

/// Banner text lines, boxed to fit the tagline.
fn banner_lines() -> Vec<String> {
    let version_line = format!("Tonecap v{}", tonecap_core::VERSION);
    let tagline = "Image captions in the tone you want";
    let inner_width = tagline.chars().count() + 4;

    vec![
        format!("  ╔{:═<width$}╗", "", width = inner_width),
        format!("  ║{:^width$}║", version_line, width = inner_width),
        format!("  ║{:^width$}║", tagline, width = inner_width),
        format!("  ╚{:═<width$}╝", "", width = inner_width),
    ]
}

/// Prints the banner to stderr so stdout only carries captions.
pub fn print_banner() {
    let magenta = Style::new().for_stderr().magenta();
    eprintln!();
    for line in banner_lines() {
        eprintln!("{}", magenta.apply_to(line));
    }
    eprintln!();
}

/// Prints the numbered tone menu to stderr.
pub fn print_tone_menu() {
    let bold = Style::new().for_stderr().bold();
    let dim = Style::new().for_stderr().dim();
    eprintln!();
    eprintln!("  {}", bold.apply_to("Choose a tone:"));
    for (i, tone) in tonecap_core::ToneMode::ALL.iter().enumerate() {
        eprintln!(
            "    {}. {:<13} {}",
            i + 1,
            tone.label(),
            dim.apply_to(tone.description())
        );
    }
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_box_is_aligned() {
        let lines = banner_lines();
        let widths: Vec<usize> = lines.iter().map(|l| l.chars().count()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]));
        assert!(lines[1].contains(tonecap_core::VERSION));
    }
}
