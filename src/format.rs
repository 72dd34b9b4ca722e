//! Terminal formatting for transcript turns and assistant text.

use colored::Colorize;

use crate::transcript::Turn;

/// Format a turn for terminal display with role label and colors.
///
/// Tool requests render as a one-line summary; tool results are dimmed and
/// cut to a short preview.
pub fn format_turn(turn: &Turn) -> String {
    match turn {
        Turn::User { content } => format!("{}\n{}", "you:".green().bold(), content),
        Turn::Assistant { content } => {
            format!("{}\n{}", "kilo:".cyan().bold(), render_markdown_lite(content))
        }
        Turn::ToolRequest {
            tool_name,
            arguments,
            ..
        } => format!(
            "{} {} {}",
            "tool:".yellow(),
            tool_name.yellow().bold(),
            preview(arguments, 1, 120).dimmed()
        ),
        Turn::ToolResult {
            content, truncated, ..
        } => {
            let mut body = preview(content, 6, 120);
            if *truncated {
                body.push_str(" [truncated]");
            }
            format!("{}", body.dimmed())
        }
    }
}

/// First `max_lines` lines of `text`, each cut to `max_width` characters,
/// with an ellipsis line when anything was dropped.
pub fn preview(text: &str, max_lines: usize, max_width: usize) -> String {
    let mut lines: Vec<String> = text
        .lines()
        .take(max_lines)
        .map(|line| {
            if line.chars().count() > max_width {
                let cut: String = line.chars().take(max_width.saturating_sub(3)).collect();
                format!("{}...", cut)
            } else {
                line.to_string()
            }
        })
        .collect();
    let total = text.lines().count();
    if total > max_lines {
        lines.push(format!("... ({} more lines)", total - max_lines));
    }
    lines.join("\n")
}

/// Minimal markdown renderer for terminal output.
///
/// Handles fenced code blocks, `#` headings, `**bold**` and `` `code` ``.
/// Anything else passes through untouched.
pub fn render_markdown_lite(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut fence: Option<String> = None;

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("```") {
            match fence.take() {
                Some(_) => out.push(String::new()),
                None => {
                    let lang = rest.trim().to_string();
                    if !lang.is_empty() {
                        out.push(format!("  {}", lang.dimmed()));
                    }
                    fence = Some(lang);
                }
            }
            continue;
        }

        if fence.is_some() {
            out.push(format!("  {}", line.dimmed()));
        } else if let Some(heading) = heading_text(line) {
            out.push(render_inline(heading).bold().underline().to_string());
        } else {
            out.push(render_inline(line));
        }
    }

    out.join("\n")
}

fn heading_text(line: &str) -> Option<&str> {
    let hashes = line.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&hashes) {
        line[hashes..].strip_prefix(' ')
    } else {
        None
    }
}

/// Styles `**bold**` and `` `code` `` spans in one line. Unclosed markers are
/// kept literally.
fn render_inline(line: &str) -> String {
    let mut out = String::new();
    let mut rest = line;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("**") {
            if let Some(end) = after.find("**") {
                out.push_str(&after[..end].bold().to_string());
                rest = &after[end + 2..];
                continue;
            }
        }
        if let Some(after) = rest.strip_prefix('`') {
            if let Some(end) = after.find('`') {
                out.push_str(&after[..end].dimmed().to_string());
                rest = &after[end + 1..];
                continue;
            }
        }

        let mut chars = rest.chars();
        if let Some(c) = chars.next() {
            out.push(c);
        }
        rest = chars.as_str();
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview("one\ntwo", 5, 80), "one\ntwo");
    }

    #[test]
    fn test_preview_limits_lines() {
        let out = preview("a\nb\nc\nd", 2, 80);
        assert_eq!(out, "a\nb\n... (2 more lines)");
    }

    #[test]
    fn test_preview_limits_width() {
        let out = preview(&"x".repeat(50), 1, 10);
        assert_eq!(out, "xxxxxxx...");
    }

    #[test]
    fn test_markdown_lite_keeps_plain_text() {
        colored::control::set_override(false);
        assert_eq!(render_markdown_lite("It is noon."), "It is noon.");
        assert_eq!(render_markdown_lite("**bold** and `code`"), "bold and code");
    }

    #[test]
    fn test_markdown_lite_unclosed_markers_are_literal() {
        colored::control::set_override(false);
        assert_eq!(render_markdown_lite("2 ** 3 and `tick"), "2 ** 3 and `tick");
    }

    #[test]
    fn test_markdown_lite_code_block_and_heading() {
        colored::control::set_override(false);
        let out = render_markdown_lite("# Status\n```sh\nnvidia-smi\n```\ndone");
        assert_eq!(out, "Status\n  sh\n  nvidia-smi\n\ndone");
    }

    #[test]
    fn test_format_turn_labels() {
        colored::control::set_override(false);
        assert_eq!(format_turn(&Turn::user("hi")), "you:\nhi");
        assert_eq!(format_turn(&Turn::assistant("Paris")), "kilo:\nParis");
    }
}
