//! Record form modal: draft, validation and dismissal rules.
//!
//! The form never talks to the network. [`RecordForm::submit`] hands a valid
//! draft back to the caller, which decides how to persist it and when to close.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::model::{Record, RecordFields, RecordId};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 7..=15;

/// Whether the form creates a new record or edits an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

/// Editable fields, in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    Email,
    Phone,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Email, FormField::Phone];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Email => "Email",
            FormField::Phone => "Phone",
        }
    }

    fn next(self) -> Self {
        match self {
            FormField::Name => FormField::Email,
            FormField::Email => FormField::Phone,
            FormField::Phone => FormField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Name => FormField::Phone,
            FormField::Email => FormField::Name,
            FormField::Phone => FormField::Email,
        }
    }
}

/// Working copy of a record's editable fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Draft {
    pub id: Option<RecordId>,
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl Draft {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Phone => &self.phone,
        }
    }

    fn get_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Email => &mut self.email,
            FormField::Phone => &mut self.phone,
        }
    }

    pub fn fields(&self) -> RecordFields {
        RecordFields {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

impl From<&Record> for Draft {
    fn from(r: &Record) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            email: r.email.clone(),
            phone: r.phone.clone(),
        }
    }
}

/// Validation messages keyed by field. Empty means valid.
pub type FieldErrors = BTreeMap<FormField, &'static str>;

/// Validate a draft against the static field rules.
pub fn validate_draft(draft: &Draft) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if draft.name.trim().is_empty() {
        errors.insert(FormField::Name, "Required");
    }
    if draft.email.trim().is_empty() {
        errors.insert(FormField::Email, "Required");
    } else if !EMAIL_RE.is_match(&draft.email) {
        errors.insert(FormField::Email, "Invalid email");
    }
    if draft.phone.trim().is_empty() {
        errors.insert(FormField::Phone, "Required");
    } else {
        let digits = draft.phone.chars().filter(char::is_ascii_digit).count();
        if !PHONE_DIGITS.contains(&digits) {
            errors.insert(FormField::Phone, "Invalid phone");
        }
    }
    errors
}

/// How the user asked to leave the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dismissal {
    /// The close/cancel control (Esc). Ignored while saving.
    Button,
    /// A click outside the form. Always honored.
    Backdrop,
}

/// State of the record form modal.
#[derive(Clone, Debug)]
pub struct RecordForm {
    open: bool,
    mode: FormMode,
    draft: Draft,
    errors: FieldErrors,
    focus: FormField,
    /// Bumped on every `open`, so late results can tell which opening they
    /// belong to.
    session: u64,
}

impl Default for RecordForm {
    fn default() -> Self {
        Self {
            open: false,
            mode: FormMode::Create,
            draft: Draft::default(),
            errors: FieldErrors::new(),
            focus: FormField::Name,
            session: 0,
        }
    }
}

impl RecordForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open (or re-open) the form, seeding the draft from `initial`.
    pub fn open(&mut self, mode: FormMode, initial: &Draft) {
        self.open = true;
        self.session += 1;
        self.mode = mode;
        self.draft = initial.clone();
        self.errors.clear();
        self.focus = FormField::Name;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    /// Whether the form is still showing the opening identified by `session`.
    pub fn is_session_open(&self, session: u64) -> bool {
        self.open && self.session == session
    }

    pub fn update_field(&mut self, field: FormField, value: impl Into<String>) {
        *self.draft.get_mut(field) = value.into();
    }

    pub fn validate(&self) -> FieldErrors {
        validate_draft(&self.draft)
    }

    /// Validate and, when valid, return the draft for the caller to persist.
    /// Invalid drafts record their errors and yield `None`.
    pub fn submit(&mut self) -> Option<Draft> {
        self.errors = self.validate();
        if self.errors.is_empty() {
            Some(self.draft.clone())
        } else {
            None
        }
    }

    /// Whether the caller should close the form for this dismissal.
    pub fn dismiss(&self, how: Dismissal, saving: bool) -> bool {
        match how {
            Dismissal::Button => !saving,
            Dismissal::Backdrop => true,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_prev(&mut self) {
        self.focus = self.focus.prev();
    }

    /// Type into the focused field. Inputs are disabled while saving.
    pub fn push_char(&mut self, c: char, saving: bool) {
        if saving {
            return;
        }
        let field = self.focus;
        let mut value = self.draft.get(field).to_string();
        value.push(c);
        self.update_field(field, value);
    }

    pub fn pop_char(&mut self, saving: bool) {
        if saving {
            return;
        }
        self.draft.get_mut(self.focus).pop();
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "New user",
            FormMode::Edit => "Edit user",
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create a new record",
            FormMode::Edit => "Modify the user's details",
        }
    }

    pub fn footer_hint(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "The new user will be added to the list.",
            FormMode::Edit => "Changes will be saved to the database.",
        }
    }

    pub fn submit_label(&self, saving: bool) -> &'static str {
        match (saving, self.mode) {
            (true, _) => "Saving...",
            (false, FormMode::Create) => "Create user",
            (false, FormMode::Edit) => "Save changes",
        }
    }
}
