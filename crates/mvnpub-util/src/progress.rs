use std::io::Write;
use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

/// Colour of the label in a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Bold green, for actions (`Uploading`, `Installed`).
    Action,
    /// Bold cyan, for informational lines.
    Info,
    /// Bold yellow, for skipped or degraded work.
    Warn,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Action => Style::new().green().bold(),
            Self::Info => Style::new().cyan().bold(),
            Self::Warn => Style::new().yellow().bold(),
        }
    }
}

/// Print a Cargo-style status line to stderr: `   Uploading lib-1.0.jar`
///
/// The `label` is right-aligned to 12 characters.
pub fn status_line(tone: Tone, label: &str, message: &str) {
    let _ = writeln!(
        std::io::stderr(),
        "{:>12} {message}",
        tone.style().apply_to(label),
    );
}

pub fn status(label: &str, message: &str) {
    status_line(Tone::Action, label, message);
}

pub fn status_info(label: &str, message: &str) {
    status_line(Tone::Info, label, message);
}

pub fn status_warn(label: &str, message: &str) {
    status_line(Tone::Warn, label, message);
}

/// Create an animated spinner shown while a publication is transferred.
///
/// Finish it with [`ProgressBar::finish_and_clear`] before printing the
/// result line.
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
