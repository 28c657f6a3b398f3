use anstyle::{AnsiColor, Color, RgbColor};

/// Accent used for the run arrow
pub const ACCENT: Color = Color::Rgb(RgbColor(207, 106, 76));
pub const DIM: Color = Color::Ansi(AnsiColor::BrightBlack);

/// Map a theme color id such as `terminal.ansiGreen` or `charts.red` to a terminal color.
///
/// Ids without an ANSI equivalent return `None` and are rendered uncolored.
#[must_use]
pub fn theme_color(id: &str) -> Option<Color> {
    let name = id
        .strip_prefix("terminal.ansi")
        .or_else(|| id.strip_prefix("charts."))?
        .to_ascii_lowercase();
    let ansi = match name.as_str() {
        "black" => AnsiColor::Black,
        "red" => AnsiColor::Red,
        "green" => AnsiColor::Green,
        "yellow" => AnsiColor::Yellow,
        "blue" => AnsiColor::Blue,
        "magenta" | "purple" => AnsiColor::Magenta,
        "cyan" => AnsiColor::Cyan,
        "white" => AnsiColor::White,
        "brightblack" => AnsiColor::BrightBlack,
        "brightred" | "orange" => AnsiColor::BrightRed,
        "brightgreen" => AnsiColor::BrightGreen,
        "brightyellow" => AnsiColor::BrightYellow,
        "brightblue" => AnsiColor::BrightBlue,
        "brightmagenta" => AnsiColor::BrightMagenta,
        "brightcyan" => AnsiColor::BrightCyan,
        "brightwhite" => AnsiColor::BrightWhite,
        _ => return None,
    };
    Some(Color::Ansi(ansi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_color() {
        assert_eq!(
            theme_color("terminal.ansiGreen"),
            Some(Color::Ansi(AnsiColor::Green))
        );
        assert_eq!(
            theme_color("terminal.ansiBrightCyan"),
            Some(Color::Ansi(AnsiColor::BrightCyan))
        );
        assert_eq!(theme_color("charts.purple"), Some(Color::Ansi(AnsiColor::Magenta)));
        assert_eq!(theme_color("editor.foreground"), None);
        assert_eq!(theme_color(""), None);
    }
}
