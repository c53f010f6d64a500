use std::io;
use std::path::Path;

use anyhow::{bail, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use rotisserie_core::model::{RecipeId, RecipeWithDetails, Unit};
use rotisserie_core::{CookingSession, Database};

pub mod ingredients;
pub mod step_view;

/// Application state for cooking mode.
#[derive(Debug)]
pub struct App {
    pub recipe: RecipeWithDetails,
    pub units: Vec<Unit>,
    pub session: CookingSession,
    pub show_ingredients: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(recipe: RecipeWithDetails, units: Vec<Unit>) -> Self {
        let session = CookingSession::from_instructions(&recipe.recipe.instructions);
        Self {
            recipe,
            units,
            session,
            show_ingredients: false,
            should_quit: false,
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('n' | 'l') | KeyCode::Right | KeyCode::Enter => {
                self.session.next_step();
            }
            KeyCode::Char('p' | 'h') | KeyCode::Left | KeyCode::Backspace => {
                self.session.previous_step();
            }
            KeyCode::Home | KeyCode::Char('g') => self.session.go_to(0),
            KeyCode::End | KeyCode::Char('G') => self.session.go_to(usize::MAX),
            KeyCode::Char(' ') => {
                self.session.toggle_complete(self.session.current_index());
            }
            KeyCode::Char('i') => self.show_ingredients = !self.show_ingredients,
            _ => {}
        }
    }
}

/// Run cooking mode for one recipe.
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// on exit (including on error).
pub fn run_tui(db_path: &Path, id: &RecipeId) -> Result<()> {
    let db = Database::open(db_path)?;
    let Some(recipe) = db.get_recipe(id)? else {
        bail!("Recipe not found: {id}");
    };
    let app = App::new(recipe, db.list_units()?);
    drop(db);

    if app.session.is_empty() {
        println!("{} has no steps to cook through.", app.recipe.recipe.name);
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Capture any error so the terminal is restored first
    let result = run_event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let app = result?;
    println!(
        "{}: {} of {} steps done",
        app.recipe.recipe.name,
        app.session.completed_count(),
        app.session.len()
    );
    Ok(())
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
) -> Result<App> {
    loop {
        terminal.draw(|frame| render(frame, &app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                app.handle_key(key.code);
            }
        }

        if app.should_quit {
            return Ok(app);
        }
    }
}

fn render(frame: &mut Frame, app: &App) {
    if app.show_ingredients {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(frame.area());
        step_view::render(frame, app, columns[0]);
        ingredients::render(frame, app, columns[1]);
    } else {
        step_view::render(frame, app, frame.area());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotisserie_core::model::{IngredientInput, NewRecipe};

    fn app() -> App {
        let mut db = Database::open_in_memory().unwrap();
        let input = NewRecipe::new("Toast", "1. Slice bread\n2. Toast it\n3. Butter it")
            .with_ingredient(IngredientInput::new("bread").with_quantity(2.0).with_unit("slice"))
            .with_ingredient(IngredientInput::new("butter"));
        let id = db.create_recipe(&input).unwrap().id;
        App::new(db.get_recipe(&id).unwrap().unwrap(), db.list_units().unwrap())
    }

    #[test]
    fn test_navigation_keys() {
        let mut app = app();
        assert_eq!(app.session.len(), 3);

        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char('n'));
        app.handle_key(KeyCode::Char('n'));
        assert_eq!(app.session.current(), Some("Butter it"));

        app.handle_key(KeyCode::Left);
        assert_eq!(app.session.current(), Some("Toast it"));

        app.handle_key(KeyCode::Home);
        assert!(app.session.is_first());
        app.handle_key(KeyCode::End);
        assert!(app.session.is_last());
    }

    #[test]
    fn test_space_toggles_current_step() {
        let mut app = app();
        app.handle_key(KeyCode::Char(' '));
        assert!(app.session.is_complete(0));

        app.handle_key(KeyCode::Right);
        assert!(app.session.is_complete(0), "moving does not clear completion");

        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Char(' '));
        assert_eq!(app.session.completed_count(), 0);
    }

    #[test]
    fn test_ingredients_panel_and_quit() {
        let mut app = app();
        app.handle_key(KeyCode::Char('i'));
        assert!(app.show_ingredients);
        app.handle_key(KeyCode::Char('i'));
        assert!(!app.show_ingredients);

        assert!(!app.should_quit);
        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit);
    }
}
