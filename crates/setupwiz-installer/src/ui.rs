//! Ratatui drawing for the wizard panels, button row, and modal dialogs.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};
use ratatui::Frame;
use setupwiz_core::{LaunchAction, Panel, Prerequisite, Visibility};

use crate::app::{App, Notice, PromptState};
use crate::model::{ActionStep, StepStatus};

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    frame.render_widget(Clear, frame.area());
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(frame.area());

    draw_header(frame, app, layout[0]);
    draw_panel(frame, app, layout[1]);
    draw_buttons(frame, app, layout[2]);
    draw_footer(frame, app, layout[3]);

    if let Some(prompt) = app.prompt.as_ref() {
        draw_prompt(frame, prompt);
    } else if let Some(notice) = app.notice.as_ref() {
        draw_notice(frame, notice);
    }
}

fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            app.title.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("  [{}]", app.step.stage)),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, area);
}

fn draw_panel(frame: &mut Frame<'_>, app: &App, area: Rect) {
    match &app.step.panel {
        Panel::Blank => {
            let block = Block::default().borders(Borders::ALL);
            frame.render_widget(Paragraph::new("Starting...").block(block), area);
        }
        Panel::Intro { text, detecting } => {
            let mut lines = text_lines(text);
            if *detecting {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Checking for an existing installation...",
                    Style::default().fg(Color::Yellow),
                )));
            }
            draw_text(frame, area, "Welcome", lines, app.scroll);
        }
        Panel::ActionSelect { selected } => draw_action_select(frame, app, area, *selected),
        Panel::License { text } => draw_text(frame, area, "License", text_lines(text), app.scroll),
        Panel::Dependencies { prerequisites } => draw_dependencies(frame, area, prerequisites),
        Panel::Progress { action, succeeded } => {
            draw_progress(frame, app, area, *action, *succeeded)
        }
        Panel::Finish {
            text,
            launch_app,
            show_help,
        } => draw_finish(frame, app, area, text, *launch_app, *show_help),
        Panel::Message { text } => {
            let mut lines = vec![
                Line::from(Span::styled(
                    "Setup did not complete",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            lines.extend(text_lines(text));
            draw_text(frame, area, "Finished", lines, app.scroll);
        }
    }
}

fn draw_text(frame: &mut Frame<'_>, area: Rect, title: &str, lines: Vec<Line<'static>>, scroll: u16) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        area,
    );
}

fn draw_action_select(
    frame: &mut Frame<'_>,
    app: &App,
    area: Rect,
    selected: Option<LaunchAction>,
) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let items = App::action_choices()
        .iter()
        .enumerate()
        .map(|(index, action)| {
            let marker = if selected == Some(*action) { "(*)" } else { "( )" };
            let label = truncate_to_width(&format!("{} {}", marker, action.label()), inner_width);
            let style = if index == app.action_index {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(label, style)))
        })
        .collect::<Vec<_>>();
    let block = Block::default()
        .title("Choose an action")
        .borders(Borders::ALL);
    frame.render_widget(List::new(items).block(block), area);
}

fn draw_dependencies(frame: &mut Frame<'_>, area: Rect, prerequisites: &[Prerequisite]) {
    let mut lines = vec![
        Line::from("The following prerequisites were not found:"),
        Line::from(""),
    ];
    for prereq in prerequisites {
        lines.push(Line::from(vec![
            Span::styled(
                "[missing] ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                prereq.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" - "),
            Span::raw(prereq.detail.clone()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(
        "Install them and press Next, or continue without them.",
    ));
    draw_text(frame, area, "Prerequisites", lines, 0);
}

fn draw_progress(
    frame: &mut Frame<'_>,
    app: &App,
    area: Rect,
    action: LaunchAction,
    succeeded: Option<bool>,
) {
    let (status_label, status_color) = match succeeded {
        None => ("In progress", Color::Yellow),
        Some(true) => ("Completed", Color::Green),
        Some(false) => ("Failed", Color::Red),
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(6)])
        .split(area);

    let status = Paragraph::new(Line::from(Span::styled(
        format!("{} - {}", action.label(), status_label),
        Style::default()
            .fg(status_color)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().title("Progress").borders(Borders::ALL));
    frame.render_widget(status, layout[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(layout[1]);

    let steps = render_steps(&app.steps, body[0].width);
    let steps_block = Block::default().title("Steps").borders(Borders::ALL);
    frame.render_widget(steps.block(steps_block), body[0]);

    let logs = render_logs(&app.logs, body[1].width, body[1].height);
    let logs_block = Block::default().title("Logs").borders(Borders::ALL);
    frame.render_widget(Paragraph::new(logs).block(logs_block), body[1]);
}

fn draw_finish(
    frame: &mut Frame<'_>,
    app: &App,
    area: Rect,
    text: &str,
    launch_app: Visibility,
    show_help: Visibility,
) {
    let mut lines = text_lines(text);
    let options = app.finish_options();
    let checkboxes = [
        (launch_app, options.launch_app, "Launch the application"),
        (show_help, options.show_help, "Show the help page"),
    ];
    if checkboxes.iter().any(|(visibility, _, _)| visibility.is_visible()) {
        lines.push(Line::from(""));
    }
    for (index, (visibility, checked, label)) in checkboxes.iter().enumerate() {
        if !visibility.is_visible() {
            continue;
        }
        let mark = if *checked { "[x]" } else { "[ ]" };
        let mut style = Style::default();
        if !visibility.is_enabled() {
            style = style.fg(Color::DarkGray);
        } else if index == app.finish_index {
            style = style.fg(Color::Black).bg(Color::Cyan);
        }
        lines.push(Line::from(Span::styled(format!("{} {}", mark, label), style)));
    }
    draw_text(frame, area, "Finished", lines, app.scroll);
}

fn draw_buttons(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let controls = app.step.controls;
    let mut spans = Vec::new();
    let buttons = [
        (controls.previous, "< Back".to_string()),
        (controls.next, format!("{} >", app.step.next_label)),
        (controls.cancel, "Cancel".to_string()),
    ];
    for (visibility, label) in buttons {
        if !visibility.is_visible() {
            continue;
        }
        let style = if visibility.is_enabled() {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        if !spans.is_empty() {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(format!("[ {} ]", label), style));
    }
    let row = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Right)
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(row, area);
}

fn draw_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let hints: &[(&str, &str)] = if app.prompt.is_some() {
        &[("Left/Right", "choose"), ("Enter", "confirm"), ("Esc", "cancel")]
    } else if app.notice.is_some() {
        &[("Enter", "dismiss")]
    } else {
        &[
            ("Enter", "next"),
            ("Backspace", "back"),
            ("Esc", "cancel"),
            ("Up/Down", "move"),
            ("Space", "toggle"),
        ]
    };
    let mut spans = Vec::new();
    for (key, action) in hints {
        spans.push(Span::styled(
            key.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" = {}  ", action)));
    }
    let footer = Paragraph::new(Text::from(Line::from(spans))).alignment(Alignment::Center);
    frame.render_widget(footer, area);
}

fn draw_prompt(frame: &mut Frame<'_>, prompt: &PromptState) {
    let area = centered_rect(60, 9, frame.area());
    frame.render_widget(Clear, area);

    let mut option_spans = Vec::new();
    for (index, option) in prompt.request.options.iter().enumerate() {
        let style = if index == prompt.selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        if index > 0 {
            option_spans.push(Span::raw("   "));
        }
        option_spans.push(Span::styled(format!("[ {} ]", option), style));
    }

    let text = Text::from(vec![
        Line::from(prompt.request.message.clone()),
        Line::from(""),
        Line::from(option_spans).alignment(Alignment::Center),
    ]);
    let block = Block::default()
        .title(prompt.request.title.clone())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    frame.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_notice(frame: &mut Frame<'_>, notice: &Notice) {
    let area = centered_rect(60, 7, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::default()
        .title(notice.title.clone())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));
    frame.render_widget(
        Paragraph::new(summarize_error(&notice.message))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = area.width.saturating_mul(percent_x) / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}

fn text_lines(text: &str) -> Vec<Line<'static>> {
    text.lines().map(|line| Line::from(line.to_string())).collect()
}

fn render_steps(steps: &[ActionStep], width: u16) -> List<'static> {
    let inner_width = width.saturating_sub(2) as usize;
    let items = steps
        .iter()
        .map(|step| {
            let (symbol, style) = match step.status {
                StepStatus::Pending => ("[ ]", Style::default().fg(Color::Gray)),
                StepStatus::Running => ("[..]", Style::default().fg(Color::Yellow)),
                StepStatus::Done => ("[ok]", Style::default().fg(Color::Green)),
                StepStatus::Failed => ("[!!]", Style::default().fg(Color::Red)),
            };
            let available = inner_width.saturating_sub(symbol.len() + 1);
            let label = truncate_to_width(step.name, available);
            ListItem::new(Line::from(vec![
                Span::styled(symbol, style.add_modifier(Modifier::BOLD)),
                Span::raw(" "),
                Span::raw(label),
            ]))
        })
        .collect::<Vec<_>>();

    List::new(items)
}

/// Wraps the log and keeps only the lines that fit, newest last.
fn render_logs(logs: &[String], width: u16, height: u16) -> Text<'static> {
    let inner_width = width.saturating_sub(2) as usize;
    let visible = height.saturating_sub(2) as usize;
    let mut lines = Vec::new();
    for line in logs {
        for wrapped in wrap_line(line, inner_width) {
            lines.push(Line::from(truncate_to_width(&wrapped, inner_width)));
        }
    }
    if lines.len() > visible {
        lines.drain(0..lines.len() - visible);
    }
    Text::from(lines)
}

fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let sanitized = line.replace('\t', " ");

    for word in sanitized.split_whitespace() {
        let word_width = word.chars().count();
        if word_width > width {
            if !current.is_empty() {
                lines.push(current);
                current = String::new();
            }
            lines.extend(break_long_word(word, width));
            continue;
        }

        let next_len = if current.is_empty() {
            word_width
        } else {
            current.chars().count() + 1 + word_width
        };

        if next_len > width {
            lines.push(current);
            current = word.to_string();
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
    }

    if current.is_empty() && lines.is_empty() {
        lines.push(String::new());
    } else if !current.is_empty() {
        lines.push(current);
    }

    lines
}

// Counts chars, not terminal columns.
fn break_long_word(word: &str, width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for ch in word.chars() {
        current.push(ch);
        if current.chars().count() >= width {
            chunks.push(current);
            current = String::new();
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn truncate_to_width(text: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    let len = text.chars().count();
    if len <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let mut out: String = text.chars().take(width - 3).collect();
    out.push_str("...");
    out
}

fn summarize_error(err: &str) -> String {
    const MAX_LEN: usize = 160;
    let mut out: String = err.chars().take(MAX_LEN).collect();
    if err.chars().count() > MAX_LEN {
        out.push_str("...");
    }
    out
}
