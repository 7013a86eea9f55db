// Integration tests for userdesk

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde_json::{Value, json};
use userdesk::api::UsersApi;
use userdesk::app::keymap::Keymap;
use userdesk::app::list::Mutation;
use userdesk::app::settings::MemorySettings;
use userdesk::app::update::{apply_outcome, handle_key, start_reload};
use userdesk::app::worker::{Outcome, Worker};
use userdesk::app::{AppState, Dialog, InputMode, NoticeKind};
use userdesk::model::ListPayload;
use userdesk::{ApiError, Record, RecordFields, RecordId};

/// Backend double: serves `list_body`, records every call, and fails writes
/// with `write_error` when set.
#[derive(Default)]
struct MockApi {
    list_body: Mutex<Value>,
    write_error: Mutex<Option<(u16, String)>>,
    calls: Mutex<Vec<String>>,
}

impl MockApi {
    fn serving(body: Value) -> Arc<Self> {
        Arc::new(Self {
            list_body: Mutex::new(body),
            ..Self::default()
        })
    }

    fn fail_writes(&self, status: u16, message: &str) {
        *self.write_error.lock().unwrap() = Some((status, message.to_string()));
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn log(&self, call: String) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match self.write_error.lock().unwrap().clone() {
            Some((status, message)) => Err(ApiError::status(status, message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl UsersApi for MockApi {
    async fn list(&self) -> Result<ListPayload, ApiError> {
        self.calls.lock().unwrap().push("list".into());
        let body = self.list_body.lock().unwrap().clone();
        Ok(serde_json::from_value(body)?)
    }

    async fn create(&self, fields: &RecordFields) -> Result<Option<Record>, ApiError> {
        self.log(format!("create {}", fields.name))?;
        Ok(None)
    }

    async fn update(&self, id: RecordId, fields: &RecordFields) -> Result<Option<Record>, ApiError> {
        self.log(format!("update {id} {}", fields.name))?;
        Ok(None)
    }

    async fn remove(&self, id: RecordId) -> Result<(), ApiError> {
        self.log(format!("remove {id}"))
    }
}

fn users(n: i64) -> Value {
    Value::Array(
        (1..=n)
            .map(|i| json!({"id": i, "name": format!("User {i}"), "email": format!("u{i}@test.io"), "phone": "5551234567"}))
            .collect(),
    )
}

fn fields(name: &str) -> RecordFields {
    RecordFields {
        name: name.into(),
        email: "ana@test.io".into(),
        phone: "5551234567".into(),
    }
}

fn press(app: &mut AppState, worker: &Worker, code: KeyCode) {
    handle_key(app, worker, KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut AppState, worker: &Worker, text: &str) {
    for c in text.chars() {
        press(app, worker, KeyCode::Char(c));
    }
}

fn new_app() -> AppState {
    AppState::new(
        Box::new(MemorySettings::new()),
        Keymap::new_defaults(),
        8,
        "http://stub/api/users",
    )
}

async fn settle(app: &mut AppState, worker: &mut Worker) {
    let outcome = worker.next().await.expect("worker outcome");
    apply_outcome(app, worker, outcome);
}

// 1) Paged envelope is normalized and resets to the first page
#[tokio::test]
async fn reload_normalizes_page_envelope() {
    let api = MockApi::serving(json!({"content": [{"id": 1, "name": "Bob"}]}));
    let mut worker = Worker::new(api.clone(), tokio::runtime::Handle::current());
    let mut app = new_app();
    app.list.search("b");

    start_reload(&mut app, &worker);
    settle(&mut app, &mut worker).await;

    let records = app.list.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "Bob");
    assert_eq!(records[0].email, "");
    assert_eq!(app.list.page(), 1);
    assert!(!app.list.is_loading());
    assert_eq!(app.list.error(), None);
}

// 2) Unrecognized body shapes load as an empty collection
#[tokio::test]
async fn reload_of_unknown_shape_is_empty() {
    let api = MockApi::serving(json!({"status": "ok"}));
    let mut worker = Worker::new(api.clone(), tokio::runtime::Handle::current());
    let mut app = new_app();
    start_reload(&mut app, &worker);
    settle(&mut app, &mut worker).await;
    assert!(app.list.records().is_empty());
    assert_eq!(app.list.error(), None);
}

// 3) A failed delete keeps the record and falls back to the generic text
#[tokio::test]
async fn failed_delete_without_message_uses_fallback() {
    let api = MockApi::serving(users(1));
    let mut worker = Worker::new(api.clone(), tokio::runtime::Handle::current());
    let mut app = new_app();
    start_reload(&mut app, &worker);
    settle(&mut app, &mut worker).await;

    api.fail_writes(500, "");
    press(&mut app, &worker, KeyCode::Delete);
    press(&mut app, &worker, KeyCode::Right);
    press(&mut app, &worker, KeyCode::Enter);
    settle(&mut app, &mut worker).await;

    match &app.dialog {
        Some(Dialog::Notice { kind, message, expires_at, .. }) => {
            assert_eq!(*kind, NoticeKind::Error);
            assert_eq!(message, "Could not delete the user");
            assert!(expires_at.is_none());
        }
        other => panic!("expected error notice, got {other:?}"),
    }
    assert_eq!(app.list.records().len(), 1);
    assert!(!app.list.is_loading());
    assert_eq!(api.calls(), vec!["list", "remove 1"]);
}

// 4) A save that lands after its form was dismissed leaves the next form alone
#[tokio::test]
async fn late_save_does_not_close_a_newer_form() {
    use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
    use ratatui::layout::Rect;
    use userdesk::app::form::FormMode;
    use userdesk::app::update::handle_mouse;

    let api = MockApi::serving(users(2));
    let mut worker = Worker::new(api.clone(), tokio::runtime::Handle::current());
    let mut app = new_app();
    start_reload(&mut app, &worker);
    settle(&mut app, &mut worker).await;

    press(&mut app, &worker, KeyCode::Char('n'));
    type_text(&mut app, &worker, "Ana");
    press(&mut app, &worker, KeyCode::Tab);
    type_text(&mut app, &worker, "ana@test.io");
    press(&mut app, &worker, KeyCode::Tab);
    type_text(&mut app, &worker, "5551234567");
    press(&mut app, &worker, KeyCode::Enter);
    assert!(app.saving);

    app.form_area = Some(Rect::new(20, 5, 40, 12));
    handle_mouse(
        &mut app,
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 1,
            row: 1,
            modifiers: KeyModifiers::NONE,
        },
    );
    assert!(!app.form.is_open());

    press(&mut app, &worker, KeyCode::Char('e'));
    assert_eq!(app.form.mode(), FormMode::Edit);

    settle(&mut app, &mut worker).await;
    assert!(app.form.is_open());
    assert_eq!(app.form.mode(), FormMode::Edit);
    assert_eq!(app.form.draft().name, "User 1");
    assert_eq!(app.input_mode, InputMode::Form);
    assert!(!app.saving);

    // Acknowledge the notice, then keep typing into the edit form.
    press(&mut app, &worker, KeyCode::Enter);
    type_text(&mut app, &worker, "x");
    assert_eq!(app.form.draft().name, "User 1x");
    settle(&mut app, &mut worker).await;
    assert_eq!(api.calls(), vec!["list", "create Ana", "list"]);
}

// 5) Worker-driven flow: load, answer no, answer yes, reload
#[tokio::test]
async fn delete_prompt_flow_through_worker() {
    let api = MockApi::serving(users(3));
    let mut worker = Worker::new(api.clone(), tokio::runtime::Handle::current());
    let mut app = new_app();

    start_reload(&mut app, &worker);
    assert!(app.list.is_loading());
    settle(&mut app, &mut worker).await;
    assert_eq!(app.list.records().len(), 3);

    press(&mut app, &worker, KeyCode::Char('d'));
    match &app.dialog {
        Some(Dialog::ConfirmDelete { target, yes_selected }) => {
            assert_eq!(target.id, Some(1));
            assert!(!yes_selected);
            assert_eq!(Dialog::delete_prompt(target), "Delete User 1?");
        }
        other => panic!("expected delete prompt, got {other:?}"),
    }
    press(&mut app, &worker, KeyCode::Char('n'));
    assert!(app.dialog.is_none());
    assert_eq!(api.calls(), vec!["list"]);

    *api.list_body.lock().unwrap() = users(2);
    press(&mut app, &worker, KeyCode::Char('d'));
    press(&mut app, &worker, KeyCode::Char('y'));
    settle(&mut app, &mut worker).await;
    match &app.dialog {
        Some(Dialog::Notice { kind, title, expires_at, .. }) => {
            assert_eq!(*kind, NoticeKind::Success);
            assert_eq!(title, "Deleted");
            assert!(expires_at.is_some());
        }
        other => panic!("expected notice, got {other:?}"),
    }
    assert!(app.list.is_loading());
    settle(&mut app, &mut worker).await;
    assert_eq!(app.list.records().len(), 2);
    assert_eq!(api.calls(), vec!["list", "remove 1", "list"]);
}

// 6) Form flow: failed save keeps the draft, a retry closes the form
#[tokio::test]
async fn create_form_flow_through_worker() {
    let api = MockApi::serving(users(0));
    let mut worker = Worker::new(api.clone(), tokio::runtime::Handle::current());
    let mut app = new_app();
    start_reload(&mut app, &worker);
    settle(&mut app, &mut worker).await;

    press(&mut app, &worker, KeyCode::Char('n'));
    assert_eq!(app.input_mode, InputMode::Form);
    type_text(&mut app, &worker, "Ana");
    press(&mut app, &worker, KeyCode::Tab);
    type_text(&mut app, &worker, "ana@test.io");
    press(&mut app, &worker, KeyCode::Tab);
    type_text(&mut app, &worker, "5551234567");

    api.fail_writes(409, "Email already taken");
    press(&mut app, &worker, KeyCode::Enter);
    assert!(app.saving);
    // Button cancel is ignored while saving.
    press(&mut app, &worker, KeyCode::Esc);
    assert!(app.form.is_open());

    settle(&mut app, &mut worker).await;
    assert!(!app.saving);
    assert!(app.form.is_open());
    assert_eq!(app.form.draft().email, "ana@test.io");
    match &app.dialog {
        Some(Dialog::Notice { kind, message, .. }) => {
            assert_eq!(*kind, NoticeKind::Error);
            assert_eq!(message, "Email already taken");
        }
        other => panic!("expected error notice, got {other:?}"),
    }

    press(&mut app, &worker, KeyCode::Enter);
    assert!(app.dialog.is_none());
    *api.write_error.lock().unwrap() = None;
    *api.list_body.lock().unwrap() = users(1);
    press(&mut app, &worker, KeyCode::Enter);
    settle(&mut app, &mut worker).await;
    assert!(!app.form.is_open());
    assert_eq!(app.input_mode, InputMode::Normal);
    settle(&mut app, &mut worker).await;
    assert_eq!(app.list.records().len(), 1);
    assert_eq!(api.calls(), vec!["list", "create Ana", "create Ana", "list"]);
}

// 7) Invalid form input never reaches the backend
#[tokio::test]
async fn invalid_form_does_not_submit() {
    let api = MockApi::serving(users(0));
    let worker = Worker::new(api.clone(), tokio::runtime::Handle::current());
    let mut app = new_app();

    press(&mut app, &worker, KeyCode::Char('n'));
    type_text(&mut app, &worker, "Ana");
    press(&mut app, &worker, KeyCode::Enter);
    assert!(!app.saving);
    assert!(app.form.is_open());
    assert!(!app.form.errors().is_empty());
    assert!(api.calls().is_empty());
}

// 8) A stale reload result is dropped
#[tokio::test]
async fn stale_reload_is_discarded() {
    let api = MockApi::serving(users(1));
    let mut worker = Worker::new(api.clone(), tokio::runtime::Handle::current());
    let mut app = new_app();

    let first = app.list.begin_reload();
    let second = app.list.begin_reload();
    apply_outcome(
        &mut app,
        &worker,
        Outcome::Listed { generation: second, result: Ok(vec![]) },
    );
    apply_outcome(
        &mut app,
        &worker,
        Outcome::Listed {
            generation: first,
            result: Err(ApiError::status(500, "boom")),
        },
    );
    assert_eq!(app.list.error(), None);
    assert!(app.list.records().is_empty());
    assert!(worker.drain().is_empty());
}

// 9) Theme toggle persists the new mode
#[test]
fn theme_toggle_persists_light() {
    use userdesk::app::settings::SettingsStore;
    use userdesk::app::theme::{THEME_KEY, ThemeMode};

    let mut app = new_app();
    assert_eq!(app.theme, ThemeMode::Dark);
    app.toggle_theme();
    assert_eq!(app.theme, ThemeMode::Light);
    assert_eq!(app.settings.get(THEME_KEY).as_deref(), Some("light"));
}

#[test]
fn mutation_fallbacks_match_operation() {
    assert_eq!(Mutation::Create(fields("a")).failure_fallback(), "An error occurred while saving");
    assert_eq!(Mutation::Remove(1).failure_fallback(), "Could not delete the user");
}

mod http {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Json, Router};
    use std::time::Duration;
    use userdesk::api::HttpUsersApi;

    type Seen = Arc<Mutex<Vec<(String, Value)>>>;

    #[derive(Clone)]
    struct Stub {
        seen: Seen,
        list: Value,
    }

    async fn list(State(stub): State<Stub>) -> Json<Value> {
        Json(stub.list.clone())
    }

    async fn create(State(stub): State<Stub>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
        stub.seen.lock().unwrap().push(("POST".into(), body.clone()));
        if body["email"] == "taken@test.io" {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"message": "Email already taken", "error": true, "status": 400})),
            );
        }
        let mut created = body;
        created["id"] = json!(42);
        (StatusCode::CREATED, Json(json!({"message": "ok", "data": created})))
    }

    async fn update(State(stub): State<Stub>, Json(body): Json<Value>) -> Json<Value> {
        stub.seen.lock().unwrap().push(("PUT".into(), body.clone()));
        Json(json!({"data": body}))
    }

    async fn remove(State(stub): State<Stub>, Json(body): Json<Value>) -> StatusCode {
        stub.seen.lock().unwrap().push(("DELETE".into(), body));
        StatusCode::NO_CONTENT
    }

    async fn serve(list_body: Value) -> (String, Seen) {
        let seen: Seen = Arc::default();
        let stub = Stub {
            seen: seen.clone(),
            list: list_body,
        };
        let app = Router::new()
            .route("/api/users", get(list).post(create).put(update).delete(remove))
            .with_state(stub);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/api/users/"), seen)
    }

    #[tokio::test]
    async fn list_accepts_data_envelope() {
        let (url, _) = serve(json!({"message": "ok", "data": [{"id": 1, "name": "Ana", "email": null}]})).await;
        let api = HttpUsersApi::new(url, Duration::from_secs(5)).unwrap();
        let records = api.list().await.unwrap().into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].email, "");
    }

    #[tokio::test]
    async fn writes_carry_id_in_body() {
        let (url, seen) = serve(json!([])).await;
        let api = HttpUsersApi::new(url, Duration::from_secs(5)).unwrap();

        let created = api.create(&fields("Ana")).await.unwrap();
        assert_eq!(created.and_then(|r| r.id), Some(42));
        let updated = api.update(7, &fields("Ann")).await.unwrap();
        assert_eq!(updated.map(|r| r.name), Some("Ann".to_string()));
        api.remove(7).await.unwrap();

        let seen = seen.lock().unwrap().clone();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].0, "POST");
        assert!(seen[0].1.get("id").is_none());
        assert_eq!(seen[1].0, "PUT");
        assert_eq!(seen[1].1["id"], 7);
        assert_eq!(seen[1].1["name"], "Ann");
        assert_eq!(seen[2], ("DELETE".to_string(), json!({"id": 7})));
    }

    #[tokio::test]
    async fn rejection_message_reaches_the_user() {
        let (url, _) = serve(json!([])).await;
        let api = HttpUsersApi::new(url, Duration::from_secs(5)).unwrap();
        let mut taken = fields("Ana");
        taken.email = "taken@test.io".into();

        let err = api.create(&taken).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 400, .. }));
        assert_eq!(err.user_message("fallback"), "Email already taken");
    }

    async fn unreachable_url() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/api/users")
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        let api = HttpUsersApi::new(unreachable_url().await, Duration::from_secs(2)).unwrap();
        let err = api.list().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }

    #[tokio::test]
    async fn connection_failures_show_their_own_text() {
        let api = HttpUsersApi::new(unreachable_url().await, Duration::from_secs(2)).unwrap();
        let mut worker = Worker::new(Arc::new(api), tokio::runtime::Handle::current());
        let mut app = new_app();

        start_reload(&mut app, &worker);
        settle(&mut app, &mut worker).await;
        let shown = app.list.error().unwrap_or_default().to_string();
        assert!(shown.starts_with("could not reach the server"), "{shown}");

        press(&mut app, &worker, KeyCode::Char('n'));
        type_text(&mut app, &worker, "Ana");
        press(&mut app, &worker, KeyCode::Tab);
        type_text(&mut app, &worker, "ana@test.io");
        press(&mut app, &worker, KeyCode::Tab);
        type_text(&mut app, &worker, "5551234567");
        press(&mut app, &worker, KeyCode::Enter);
        settle(&mut app, &mut worker).await;
        match &app.dialog {
            Some(Dialog::Notice { kind, message, .. }) => {
                assert_eq!(*kind, NoticeKind::Error);
                assert!(message.starts_with("could not reach the server"), "{message}");
            }
            other => panic!("expected error notice, got {other:?}"),
        }
        assert!(app.form.is_open());
    }
}
