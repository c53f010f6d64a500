use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem};

use super::App;

/// Render the recipe's ingredient lines beside the steps.
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem<'_>> = app
        .recipe
        .ingredients
        .iter()
        .map(|line| {
            let amount = line.display_quantity(&app.units).unwrap_or_default();
            let mut spans = vec![
                Span::styled(format!("{amount:>10} "), Style::default().fg(Color::Cyan)),
                Span::raw(line.name.clone()),
            ];
            if let Some(notes) = &line.notes {
                spans.push(Span::styled(
                    format!(" ({notes})"),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Ingredients ({})", app.recipe.ingredients.len())),
    );
    frame.render_widget(list, area);
}
