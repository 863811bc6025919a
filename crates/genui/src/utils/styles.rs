use anstyle::{AnsiColor, Color, RgbColor, Style};
use clap::builder::Styles;

use crate::utils::CHECK;

// Palette, matches the Tailwind classes of the rendered page
const BLUE: RgbColor = RgbColor(59, 130, 246); // blue-500
const GRAY: RgbColor = RgbColor(75, 85, 99); // gray-600
const GREEN: RgbColor = RgbColor(22, 163, 74); // green-600

pub(crate) fn get_styles() -> Styles {
    Styles::styled()
        .usage(Style::new().bold().underline().fg_color(Some(Color::Rgb(BLUE))))
        .header(Style::new().bold().underline().fg_color(Some(Color::Rgb(BLUE))))
        .literal(Style::new().fg_color(Some(Color::Rgb(GREEN))))
        .invalid(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .error(
            Style::new()
                .bold()
                .fg_color(Some(Color::Ansi(AnsiColor::Red))),
        )
        .valid(Style::new().bold().underline().fg_color(Some(Color::Rgb(GREEN))))
        .placeholder(Style::new().fg_color(Some(Color::Rgb(GRAY))))
}

fn fmt_style(msg: &str, style: &Style) -> String {
    format!("{style}{msg}{style:#}")
}

pub(crate) fn fmt_green(msg: &str) -> String {
    let style = Style::new().fg_color(Some(Color::Rgb(GREEN)));
    fmt_style(msg, &style)
}

pub(crate) fn fmt_red(msg: &str) -> String {
    let red = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));
    fmt_style(msg, &red)
}

pub(crate) fn fmt_bold(msg: &str) -> String {
    let bold = Style::new().bold().fg_color(Some(Color::Rgb(BLUE)));
    fmt_style(msg, &bold)
}

pub(crate) fn fmt_dimmed(msg: &str) -> String {
    let dimmed = Style::new().dimmed();
    fmt_style(msg, &dimmed)
}

pub(crate) fn fmt_success(msg: &str) -> String {
    format!("{} {msg}", fmt_green(CHECK))
}
