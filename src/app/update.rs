use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::app::form::{Dismissal, FormMode};
use crate::app::keymap::KeyAction;
use crate::app::list::{Confirmation, Mutation};
use crate::app::worker::{Outcome, Worker};
use crate::app::{AppState, DELETED_NOTICE_TTL, Dialog, InputMode, SAVED_NOTICE_TTL};
use crate::ui;

/// Run the UI loop until the user quits.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    worker: &mut Worker,
) -> Result<()> {
    start_reload(app, worker);

    while !app.should_quit {
        for outcome in worker.drain() {
            apply_outcome(app, worker, outcome);
        }
        app.expire_notice(Instant::now());

        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    handle_key(app, worker, key);
                }
                Event::Mouse(mouse) => handle_mouse(app, mouse),
                _ => {}
            }
        }
    }
    info!("quitting");
    Ok(())
}

/// Kick off a reload on the worker.
pub fn start_reload(app: &mut AppState, worker: &Worker) {
    let generation = app.list.begin_reload();
    worker.fetch(generation);
}

/// Apply a finished background request to the state.
pub fn apply_outcome(app: &mut AppState, worker: &Worker, outcome: Outcome) {
    match outcome {
        Outcome::Listed { generation, result } => {
            app.list.finish_reload(generation, result);
        }
        Outcome::Written {
            mutation,
            origin,
            result,
        } => {
            if !matches!(mutation, Mutation::Remove(_)) {
                app.saving = false;
            }
            let generation = match app.list.finish_write(&mutation, result) {
                Ok(generation) => generation,
                Err(message) => {
                    app.notify_error(message);
                    return;
                }
            };
            match &mutation {
                Mutation::Create(_) => {
                    close_form_from(app, origin);
                    app.notify_success("User created", "", SAVED_NOTICE_TTL);
                }
                Mutation::Update(..) => {
                    close_form_from(app, origin);
                    app.notify_success("User updated", "", SAVED_NOTICE_TTL);
                }
                Mutation::Remove(_) => {
                    app.notify_success("Deleted", "User deleted", DELETED_NOTICE_TTL);
                }
            }
            worker.fetch(generation);
        }
    }
}

/// Close the form only if it still shows the opening that sent the write.
fn close_form_from(app: &mut AppState, origin: Option<u64>) {
    if origin.is_some_and(|session| app.form.is_session_open(session)) {
        app.close_form();
    } else {
        debug!(?origin, current = app.form.session(), "write finished after its form was dismissed");
    }
}

pub fn handle_key(app: &mut AppState, worker: &Worker, key: KeyEvent) {
    if app.dialog.is_some() {
        handle_dialog_key(app, worker, key.code);
        return;
    }
    match app.input_mode {
        InputMode::Form => handle_form_key(app, worker, key),
        InputMode::Search => handle_search_key(app, key),
        InputMode::Normal => handle_normal_key(app, worker, key),
    }
}

/// A click outside the form closes it, even while saving.
pub fn handle_mouse(app: &mut AppState, mouse: MouseEvent) {
    if app.dialog.is_some() || app.input_mode != InputMode::Form {
        return;
    }
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return;
    }
    let Some(area) = app.form_area else { return };
    let inside = mouse.column >= area.x
        && mouse.column < area.x + area.width
        && mouse.row >= area.y
        && mouse.row < area.y + area.height;
    if !inside && app.form.dismiss(Dismissal::Backdrop, app.saving) {
        debug!("form dismissed via backdrop");
        app.close_form();
    }
}

fn handle_normal_key(app: &mut AppState, worker: &Worker, key: KeyEvent) {
    let Some(action) = app.keymap.resolve(&key) else {
        return;
    };
    match action {
        KeyAction::Quit => app.should_quit = true,
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::NewRecord => app.open_create(),
        KeyAction::EditSelection => app.open_edit(),
        KeyAction::DeleteSelection => {
            if let Some(target) = app.list.selected_record().cloned() {
                app.dialog = Some(Dialog::confirm_delete(target));
            }
        }
        KeyAction::ToggleExpand => {
            if let Some(id) = app.list.selected_record().and_then(|r| r.id) {
                app.list.toggle_expand(id);
            }
        }
        KeyAction::Refresh => {
            if !app.list.is_loading() {
                app.list.clear_search();
                start_reload(app, worker);
            }
        }
        KeyAction::ToggleTheme => app.toggle_theme(),
        KeyAction::MoveUp => app.list.select_prev(),
        KeyAction::MoveDown => app.list.select_next(),
        KeyAction::PrevPage => app.list.prev_page(),
        KeyAction::NextPage => app.list.next_page(),
        KeyAction::Ignore => {}
    }
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.list.clear_search();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Backspace => {
            let mut q = app.list.search_query().to_string();
            q.pop();
            app.list.search(q);
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut q = app.list.search_query().to_string();
            q.push(c);
            app.list.search(q);
        }
        _ => {}
    }
}

fn handle_form_key(app: &mut AppState, worker: &Worker, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            if app.form.dismiss(Dismissal::Button, app.saving) {
                app.close_form();
            }
        }
        KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.form.focus_prev(),
        KeyCode::Enter => submit_form(app, worker),
        KeyCode::Backspace => app.form.pop_char(app.saving),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.form.push_char(c, app.saving)
        }
        _ => {}
    }
}

fn submit_form(app: &mut AppState, worker: &Worker) {
    if app.saving {
        return;
    }
    let Some(draft) = app.form.submit() else {
        debug!(errors = ?app.form.errors(), "form has validation errors");
        return;
    };
    let mutation = match (app.form.mode(), draft.id) {
        (FormMode::Create, _) => app.list.create(draft.fields()),
        (FormMode::Edit, Some(id)) => app.list.update(id, draft.fields()),
        (FormMode::Edit, None) => {
            app.notify_error("This record has no id and cannot be updated".to_string());
            return;
        }
    };
    app.saving = true;
    worker.write(mutation, Some(app.form.session()));
}

fn handle_dialog_key(app: &mut AppState, worker: &Worker, code: KeyCode) {
    match app.dialog.as_mut() {
        Some(Dialog::ConfirmDelete { yes_selected, .. }) => match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => answer_delete(app, worker, Confirmation::Accepted),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                answer_delete(app, worker, Confirmation::Declined)
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *yes_selected = !*yes_selected;
            }
            KeyCode::Enter => {
                let answer = if *yes_selected { Confirmation::Accepted } else { Confirmation::Declined };
                answer_delete(app, worker, answer);
            }
            _ => {}
        },
        Some(Dialog::Notice { .. }) => {
            if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.dialog = None;
            }
        }
        None => {}
    }
}

fn answer_delete(app: &mut AppState, worker: &Worker, answer: Confirmation) {
    let Some(Dialog::ConfirmDelete { target, .. }) = app.dialog.take() else {
        return;
    };
    match target.id {
        Some(id) => {
            if let Some(mutation) = app.list.remove(id, answer) {
                worker.write(mutation, None);
            }
        }
        None if answer == Confirmation::Accepted => {
            app.notify_error(format!("{} has no id and cannot be deleted", target.name));
        }
        None => debug!(name = %target.name, "delete declined"),
    }
}
