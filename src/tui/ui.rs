//! UI rendering for the explorer.

use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Paragraph, Tabs, Wrap},
};

use super::app::App;
use crate::models::Status;
use crate::render::{RenderedTree, TreeLine};
use crate::tree::ViewKind;

/// Render the entire UI.
pub fn render(app: &App, tree: &RenderedTree, detail: &[String], frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // View tabs
            Constraint::Min(5),    // Tree and details
            Constraint::Length(1), // Progress
            Constraint::Length(1), // Key help
        ])
        .split(area);

    render_tabs(app, frame, chunks[0]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_tree_pane(app, tree, frame, main[0]);
    render_detail_pane(app, detail, frame, main[1]);
    render_progress_bar(app, tree, frame, chunks[2]);
    render_help_bar(frame, chunks[3]);
}

fn render_tabs(app: &App, frame: &mut Frame, area: Rect) {
    let selected = match app.nav.view() {
        ViewKind::Code => 0,
        ViewKind::Category => 1,
    };

    let tabs = Tabs::new(vec![ViewKind::Code.title(), ViewKind::Category.title()])
        .block(
            Block::default()
                .title(" caseview ")
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .select(selected)
        .style(Style::default().fg(Color::DarkGray))
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn status_style(status: Status) -> Style {
    match status {
        Status::NotRun => Style::default().fg(Color::Gray),
        Status::Running => Style::default().fg(Color::Yellow),
        Status::Succeeded => Style::default().fg(Color::Green),
        Status::Failed => Style::default().fg(Color::Red),
        Status::ExceptionThrown => Style::default().fg(Color::Magenta),
    }
}

fn tree_line(line: &TreeLine) -> Line<'_> {
    let mut style = match line.status {
        Some(status) => status_style(status),
        None => Style::default().fg(Color::White),
    };
    if line.cursor {
        style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }

    let mut spans = vec![Span::styled(line.text.as_str(), style)];
    if let Some(status) = line.status {
        spans.push(Span::styled(
            format!(" {}", status.symbol()),
            status_style(status),
        ));
    }
    Line::from(spans)
}

fn render_tree_pane(app: &App, tree: &RenderedTree, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(format!(" {} ", app.nav.view().title()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    // keep the cursor row on screen
    let height = inner.height as usize;
    let v_scroll = match tree.cursor {
        Some(cursor) if height > 0 && cursor >= height => cursor + 1 - height,
        _ => 0,
    };

    let lines: Vec<Line> = tree.lines.iter().map(tree_line).collect();
    let paragraph = Paragraph::new(lines).scroll((v_scroll as u16, app.h_scroll));
    frame.render_widget(paragraph, inner);
}

fn render_detail_pane(app: &App, detail: &[String], frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" Details ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));

    let lines: Vec<Line> = detail.iter().map(|l| Line::from(l.as_str())).collect();
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_progress_bar(app: &App, tree: &RenderedTree, frame: &mut Frame, area: Rect) {
    let progress = app.progress();
    let totals_style = if progress.running > 0 {
        Style::default().fg(Color::Yellow)
    } else if progress.passed == progress.total {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![
        Span::styled(
            format!(
                "Total - [{}/{} - {}ms]",
                progress.passed, progress.total, progress.duration_ms
            ),
            totals_style,
        ),
        Span::raw("  |  "),
        Span::styled(
            format!(
                "Selected: {} ({})",
                tree.selected_label, tree.selected_path
            ),
            Style::default().fg(Color::Cyan),
        ),
    ];

    if let Some(message) = &app.status_message {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(
            message.as_str(),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help_bar(frame: &mut Frame, area: Rect) {
    let help = "[↑↓] Move  [←→] Collapse/Expand  [Space] Toggle  [Enter] Run  [a] Run all  \
                [Tab] Switch view  [Ctrl+←→] Scroll  [PgUp/PgDn] Details  [q] Quit";

    let help_bar = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help_bar, area);
}
