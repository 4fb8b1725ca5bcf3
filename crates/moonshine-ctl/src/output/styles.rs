//! Palette shared by command output and clap help.

use anstyle::{AnsiColor, Color, Effects, Style};

const fn fg(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color)))
}

/// Written files and the closing "All done".
pub(crate) const CREATED: Style = fg(AnsiColor::Green);

pub(crate) const FAILED: Style = fg(AnsiColor::Red);

/// Kept files, overwrite questions, empty inputs.
pub(crate) const NOTICE: Style = fg(AnsiColor::Yellow);

/// Titles of listings.
pub(crate) const SECTION: Style = Style::new().effects(Effects::BOLD);

/// Registration hints and follow-up commands.
pub(crate) const GUIDE: Style = Style::new().effects(Effects::DIMMED);

pub(crate) fn clap_styles() -> clap::builder::Styles {
    let title = CREATED.effects(Effects::BOLD);
    clap::builder::Styles::styled()
        .header(title)
        .usage(title)
        .literal(fg(AnsiColor::Cyan))
        .placeholder(fg(AnsiColor::Cyan))
        .error(FAILED.effects(Effects::BOLD))
        .valid(CREATED)
        .invalid(NOTICE)
}
