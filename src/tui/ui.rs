//! TUI drawing logic for kilo.
//!
//! Layout, top to bottom: logo header, bordered chat history, bordered input
//! box, help line and status bar.

use ratatui::layout::{Alignment, Constraint, Layout, Position};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};
use ratatui::Frame;

use super::logo;
use super::App;
use crate::format::preview;
use crate::transcript::Turn;

const HELP: &str = "Enter: send message | Esc/Ctrl+C: quit";
const HOT_PINK: Color = Color::Rgb(0xFF, 0x10, 0xF0);
const GREY: Color = Color::Rgb(0x66, 0x66, 0x66);

/// Draws the full frame.
pub fn draw(f: &mut Frame, app: &App) {
    let inner_width = f.area().width.saturating_sub(4).max(1) as usize;

    let visual_lines = if app.input.is_empty() {
        1
    } else {
        app.input.chars().count().div_ceil(inner_width).max(1)
    };
    // Cap at 40% of terminal height to protect the history pane.
    let max_input_height = (f.area().height as usize * 2 / 5).max(3);
    let input_height = (visual_lines + 2).min(max_input_height) as u16;

    let [header_area, history_area, input_area, help_area, status_area] = Layout::vertical([
        Constraint::Length(logo::HEIGHT + 1),
        Constraint::Min(3),
        Constraint::Length(input_height),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(f.area());

    f.render_widget(
        Paragraph::new(logo::lines()).alignment(Alignment::Center),
        header_area,
    );

    // --- History ---
    let lines = history_lines(app);
    let history_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(logo::PURPLE));
    let inner = history_block.inner(history_area);
    let total = wrapped_height(&lines, inner.width);
    let max_scroll = total.saturating_sub(inner.height);
    let scroll = max_scroll.saturating_sub(app.scroll_offset);
    f.render_widget(
        Paragraph::new(lines)
            .block(history_block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        history_area,
    );

    // --- Input ---
    let input_widget = Paragraph::new(app.input.as_str())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(HOT_PINK))
                .title(" ┃ "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(input_widget, input_area);

    let dim_italic = Style::default().fg(GREY).add_modifier(Modifier::ITALIC);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(format!("  {HELP}"), dim_italic))),
        help_area,
    );
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("  Messages: {}", app.transcript.len()),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))),
        status_area,
    );

    // Cursor at end of input, accounting for wrapping.
    let iw = input_area.width.saturating_sub(2).max(1) as usize;
    let len = app.input.chars().count();
    let cursor_x = input_area.x + 1 + (len % iw) as u16;
    let cursor_y = input_area.y + 1 + (len / iw) as u16;
    f.set_cursor_position(Position::new(cursor_x, cursor_y));
}

/// Builds the history pane: turns, inline errors, live tool activity.
pub fn history_lines(app: &App) -> Vec<Line<'static>> {
    let grey_italic = Style::default().fg(GREY).add_modifier(Modifier::ITALIC);
    let mut lines: Vec<Line<'static>> = Vec::new();

    if app.transcript.is_empty() && app.errors.is_empty() {
        lines.push(Line::from(Span::styled(
            "Start chatting with Kilo...",
            grey_italic,
        )));
        return lines;
    }

    let push_errors = |lines: &mut Vec<Line<'static>>, position: usize| {
        for note in app.errors.iter().filter(|n| n.after == position) {
            lines.push(Line::from(Span::styled(
                format!("Error: {}", note.message),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
        }
    };

    push_errors(&mut lines, 0);
    for (i, turn) in app.transcript.turns().iter().enumerate() {
        lines.extend(turn_lines(turn));
        push_errors(&mut lines, i + 1);
    }

    for entry in &app.activity {
        lines.push(Line::from(Span::styled(
            entry.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }

    if app.thinking {
        let spinner = crate::constants::SPINNER_FRAMES[app.spinner_frame];
        let step = if app.model_calls > 1 {
            format!(" (step {})", app.model_calls)
        } else {
            String::new()
        };
        lines.push(Line::from(Span::styled(
            format!("{spinner} Kilo is thinking...{step}"),
            Style::default()
                .fg(logo::PURPLE)
                .add_modifier(Modifier::ITALIC),
        )));
    }

    lines
}

fn turn_lines(turn: &Turn) -> Vec<Line<'static>> {
    let label = |text: &'static str, color| {
        Span::styled(text, Style::default().fg(color).add_modifier(Modifier::BOLD))
    };
    let grey_italic = Style::default().fg(GREY).add_modifier(Modifier::ITALIC);

    let mut lines = Vec::new();
    match turn {
        Turn::User { content } | Turn::Assistant { content } => {
            let head = match turn {
                Turn::User { .. } => label("You: ", Color::Cyan),
                _ => label("Kilo: ", HOT_PINK),
            };
            let mut body = content.lines();
            let first = body.next().unwrap_or_default().to_string();
            lines.push(Line::from(vec![head, Span::raw(first)]));
            lines.extend(body.map(|l| Line::from(l.to_string())));
        }
        Turn::ToolRequest {
            tool_name,
            arguments,
            ..
        } => {
            lines.push(Line::from(vec![
                Span::styled("⚙ ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    tool_name.clone(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!(" {}", preview(arguments, 1, 120)), grey_italic),
            ]));
            return lines;
        }
        Turn::ToolResult {
            content, truncated, ..
        } => {
            lines.push(Line::from(Span::styled("Tool output:", grey_italic)));
            for l in preview(content, 12, 200).lines() {
                lines.push(Line::from(Span::styled(l.to_string(), grey_italic)));
            }
            if *truncated {
                lines.push(Line::from(Span::styled("[truncated]", grey_italic)));
            }
        }
    }
    lines.push(Line::from(""));
    lines
}

/// Rows `lines` occupy when wrapped to `width` columns.
fn wrapped_height(lines: &[Line<'_>], width: u16) -> u16 {
    let width = width.max(1) as usize;
    let rows: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    rows.min(u16::MAX as usize) as u16
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Transcript;
    use crate::tui::RenderEvent;
    use crate::tui::app::ErrorNote;

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_empty_history_placeholder() {
        let app = App::new();
        assert_eq!(text(&history_lines(&app)), vec!["Start chatting with Kilo..."]);
    }

    #[test]
    fn test_history_shows_tools_and_errors_in_place() {
        let mut app = App::new();
        let mut t = Transcript::new();
        t.push_user("time?");
        t.push(Turn::ToolRequest {
            call_id: "t1".into(),
            tool_name: "get_time".into(),
            arguments: "{}".into(),
        });
        t.push(Turn::ToolResult {
            call_id: "t1".into(),
            content: "noon".into(),
            truncated: false,
        });
        app.transcript = t;
        app.errors.push(ErrorNote {
            after: 3,
            message: "connection refused".into(),
        });

        let rendered = text(&history_lines(&app));
        assert_eq!(rendered[0], "You: time?");
        assert!(rendered.iter().any(|l| l.contains("get_time")));
        assert!(rendered.iter().any(|l| l == "noon"));
        assert_eq!(
            rendered.iter().rev().nth(1).map(String::as_str),
            Some("Error: connection refused")
        );
    }

    #[test]
    fn test_thinking_indicator() {
        let mut app = App::new();
        app.input = "hi".into();
        app.submit();
        let rendered = text(&history_lines(&app));
        assert!(rendered
            .last()
            .is_some_and(|l| l.ends_with("Kilo is thinking...")));

        app.handle_render_event(RenderEvent::ModelCall { iteration: 2 });
        let rendered = text(&history_lines(&app));
        assert!(rendered
            .last()
            .is_some_and(|l| l.ends_with("Kilo is thinking... (step 3)")));
    }

    #[test]
    fn test_wrapped_height() {
        let lines = vec![Line::from("abcdef"), Line::from("")];
        assert_eq!(wrapped_height(&lines, 4), 3);
        assert_eq!(wrapped_height(&lines, 10), 2);
    }
}
