use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};

use super::App;

/// Render the current step with progress, upcoming steps and key help.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Recipe title
            Constraint::Length(3), // Progress gauge
            Constraint::Min(5),    // Current step
            Constraint::Length(8), // Step list
            Constraint::Length(3), // Help bar
        ])
        .split(area);

    render_title(frame, app, chunks[0]);
    render_progress(frame, app, chunks[1]);
    render_current_step(frame, app, chunks[2]);
    render_step_list(frame, app, chunks[3]);
    render_help(frame, chunks[4]);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let recipe = &app.recipe.recipe;
    let title = match recipe.servings {
        Some(servings) => format!("{}    serves {servings}", recipe.name),
        None => recipe.name.clone(),
    };
    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_progress(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let label = format!(
        "Step {} of {}    {} done",
        session.current_index() + 1,
        session.len(),
        session.completed_count()
    );
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(session.progress().clamp(0.0, 1.0))
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_current_step(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    let index = session.current_index();
    let done = session.is_complete(index);

    let (marker, style) = if done {
        (
            "\u{2713} done",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else {
        ("", Style::default().add_modifier(Modifier::BOLD))
    };

    let text = session.current().unwrap_or("");
    let step = Paragraph::new(Line::from(Span::styled(text.to_string(), style)))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Step {}", index + 1))
                .title_bottom(Line::from(marker).right_aligned()),
        );
    frame.render_widget(step, area);
}

fn render_step_list(frame: &mut Frame, app: &App, area: Rect) {
    let session = &app.session;
    // Keep the current step visible in the short list
    let visible = usize::from(area.height.saturating_sub(2)).max(1);
    let offset = session.current_index().saturating_sub(visible / 2);

    let items: Vec<ListItem<'_>> = session
        .steps()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, text)| {
            let check = if session.is_complete(i) { "[x]" } else { "[ ]" };
            let style = if i == session.current_index() {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else if session.is_complete(i) {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(Span::styled(
                format!("{check} {:>2}. {text}", i + 1),
                style,
            )))
        })
        .collect();

    let list = List::new(items).block(Block::default().borders(Borders::ALL).title("Steps"));
    frame.render_widget(list, area);
}

fn render_help(frame: &mut Frame, area: Rect) {
    let help = Paragraph::new(
        "  \u{2190}/p Prev  \u{2192}/n Next  Space Done  i Ingredients  q Quit",
    )
    .style(Style::default().fg(Color::DarkGray))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}
