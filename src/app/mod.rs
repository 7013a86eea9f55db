//! Application state types and entry glue.
//!
//! [`AppState`] composes the list controller, the record form, dialogs and the
//! theme. Event handling lives in [`update`] (re-exported as `run`).
//!
pub mod form;
pub mod keymap;
pub mod list;
pub mod settings;
pub mod theme;
pub mod update;
pub mod worker;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use tracing::info;

use crate::model::Record;
use form::{Draft, FormMode, RecordForm};
use keymap::Keymap;
use list::ListController;
use settings::SettingsStore;
use theme::{Palette, ThemeMode};

/// How long a success notice stays up after a create or update.
pub const SAVED_NOTICE_TTL: Duration = Duration::from_millis(1400);
/// How long a success notice stays up after a delete.
pub const DELETED_NOTICE_TTL: Duration = Duration::from_millis(1200);

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Dialogs drawn over everything else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dialog {
    /// Yes/no prompt before deleting `target`.
    ConfirmDelete { target: Record, yes_selected: bool },
    /// Result of a write. Notices with `expires_at` close by themselves;
    /// the others wait for acknowledgement.
    Notice {
        kind: NoticeKind,
        title: String,
        message: String,
        expires_at: Option<Instant>,
    },
}

impl Dialog {
    pub fn confirm_delete(target: Record) -> Self {
        Dialog::ConfirmDelete {
            target,
            yes_selected: false,
        }
    }

    /// Title of the delete prompt.
    pub fn delete_prompt(target: &Record) -> String {
        format!("Delete {}?", target.name)
    }
}

pub struct AppState {
    pub list: ListController,
    pub form: RecordForm,
    /// A create or update is in flight.
    pub saving: bool,
    pub input_mode: InputMode,
    pub dialog: Option<Dialog>,
    pub theme: ThemeMode,
    pub palette: Palette,
    pub settings: Box<dyn SettingsStore>,
    pub keymap: Keymap,
    pub api_url: String,
    /// Where the form was last drawn; clicks outside it dismiss the form.
    pub form_area: Option<Rect>,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(
        settings: Box<dyn SettingsStore>,
        keymap: Keymap,
        page_size: usize,
        api_url: impl Into<String>,
    ) -> Self {
        let theme = ThemeMode::load(settings.as_ref());
        Self {
            list: ListController::new(page_size),
            form: RecordForm::new(),
            saving: false,
            input_mode: InputMode::Normal,
            dialog: None,
            theme,
            palette: Palette::for_mode(theme),
            settings,
            keymap,
            api_url: api_url.into(),
            form_area: None,
            should_quit: false,
        }
    }

    /// Flip light/dark, repaint with the new palette and persist the choice.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.palette = Palette::for_mode(self.theme);
        self.theme.store(self.settings.as_mut());
    }

    pub fn open_create(&mut self) {
        self.form.open(FormMode::Create, &Draft::default());
        self.input_mode = InputMode::Form;
    }

    /// Open the form on the selected record. No-op without a selection.
    pub fn open_edit(&mut self) {
        let Some(draft) = self.list.selected_record().map(Draft::from) else {
            return;
        };
        self.form.open(FormMode::Edit, &draft);
        self.input_mode = InputMode::Form;
    }

    pub fn close_form(&mut self) {
        self.form.close();
        self.form_area = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn notify_success(&mut self, title: &str, message: &str, ttl: Duration) {
        self.dialog = Some(Dialog::Notice {
            kind: NoticeKind::Success,
            title: title.to_string(),
            message: message.to_string(),
            expires_at: Some(Instant::now() + ttl),
        });
    }

    pub fn notify_error(&mut self, message: String) {
        self.dialog = Some(Dialog::Notice {
            kind: NoticeKind::Error,
            title: "Error".to_string(),
            message,
            expires_at: None,
        });
    }

    /// Close a timed notice whose deadline has passed.
    pub fn expire_notice(&mut self, now: Instant) {
        let expired = matches!(
            &self.dialog,
            Some(Dialog::Notice { expires_at: Some(at), .. }) if *at <= now
        );
        if expired {
            self.dialog = None;
        }
    }
}

/// Default locations for config files, under the platform config dir.
pub fn config_path(file: &str) -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    let path = base.join("userdesk").join(file);
    info!(path = %path.display(), "config path resolved");
    path
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
