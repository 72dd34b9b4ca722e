//! Header logo.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const LOGO: [&str; 2] = ["█▄▀ █ █   ▄▀▄", "█ █ █ █▄▄ ▀▄▀"];

pub const TAGLINE: &str = "AI Support Agent";

const HOT_PINK: Color = Color::Rgb(0xFF, 0x10, 0xF0);
const CYAN: Color = Color::Rgb(0x00, 0xFF, 0xFF);
pub const PURPLE: Color = Color::Rgb(0xB0, 0x26, 0xFF);
const ORANGE: Color = Color::Rgb(0xFF, 0x6D, 0x00);

/// Logo between two rule lines, followed by the tagline.
pub fn lines() -> Vec<Line<'static>> {
    let width = LOGO[0].chars().count();
    let rule = Line::from(Span::styled("▬".repeat(width), Style::default().fg(PURPLE)));
    let bold = |color| Style::default().fg(color).add_modifier(Modifier::BOLD);

    vec![
        rule.clone(),
        Line::from(Span::styled(LOGO[0], bold(HOT_PINK))),
        Line::from(Span::styled(LOGO[1], bold(CYAN))),
        rule,
        Line::from(Span::styled(
            format!("  {TAGLINE}"),
            bold(ORANGE).add_modifier(Modifier::ITALIC),
        )),
    ]
}

/// Height of [`lines`].
pub const HEIGHT: u16 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_matches() {
        assert_eq!(lines().len(), HEIGHT as usize);
    }

    #[test]
    fn test_rule_spans_logo() {
        let lines = lines();
        assert_eq!(lines[0].width(), lines[1].width());
    }
}
