use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{App, Effect, FilterField, Screen};
use super::widgets::TextInput;

/// Route one key press to the active screen.
pub(super) fn handle_key(app: &mut App, key: KeyEvent) -> Option<Effect> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return None;
    }
    match app.screen {
        Screen::Gate => handle_gate_key(app, key.code),
        Screen::Table => handle_table_key(app, key.code),
        Screen::Filters => handle_filters_key(app, key),
    }
}

fn handle_gate_key(app: &mut App, key: KeyCode) -> Option<Effect> {
    if app.gate.checking {
        return None;
    }
    match key {
        KeyCode::Enter => return app.submit_key(),
        KeyCode::Esc => app.should_quit = true,
        other => {
            edit_text(&mut app.gate.input, other);
            app.gate.error = None;
        }
    }
    None
}

fn handle_table_key(app: &mut App, key: KeyCode) -> Option<Effect> {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.move_cursor(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_cursor(true),
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Right | KeyCode::Char('l') => return app.next_page(),
        KeyCode::Left | KeyCode::Char('h') => return app.prev_page(),
        KeyCode::Char('+') => return app.cycle_page_size(true),
        KeyCode::Char('-') => return app.cycle_page_size(false),
        KeyCode::Char('f') => app.open_filters(),
        KeyCode::Char('c') => return app.clear_filters(),
        KeyCode::Char('r') => return app.refresh(),
        KeyCode::Char('d') => app.disconnect(),
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        _ => {}
    }
    None
}

fn handle_filters_key(app: &mut App, key: KeyEvent) -> Option<Effect> {
    if key.code == KeyCode::Char('l') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return app.clear_filters();
    }
    match key.code {
        KeyCode::Enter => return app.apply_filters(),
        KeyCode::Esc => app.screen = Screen::Table,
        KeyCode::Tab | KeyCode::Down => app.form.focus = app.form.focus.next(),
        KeyCode::BackTab | KeyCode::Up => app.form.focus = app.form.focus.prev(),
        KeyCode::Left if app.form.focus == FilterField::Status => {
            app.form.status.prev();
            app.update_draft();
        }
        KeyCode::Right if app.form.focus == FilterField::Status => {
            app.form.status.next();
            app.update_draft();
        }
        other => {
            if let Some(input) = app.form.focused_input() {
                edit_text(input, other);
                app.form.error = None;
                app.update_draft();
            }
        }
    }
    None
}

fn edit_text(input: &mut TextInput, key: KeyCode) {
    match key {
        KeyCode::Char(c) => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => {}
    }
}
