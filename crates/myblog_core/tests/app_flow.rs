mod support;

use myblog_core::api::Method;
use myblog_core::{
    Action, ActiveView, App, MemorySessionStore, NotificationKind, NotificationLog, Route,
    SessionStore,
};
use serde_json::json;
use support::{app_error, list_path, ok, ok_message, page_json, post_json, ScriptedTransport};

fn edit(field: &str, value: &str) -> Action {
    Action::EditField {
        field: field.to_string(),
        value: value.to_string(),
    }
}

#[test]
fn login_persists_session_and_lands_on_home() {
    let transport = ScriptedTransport::new();
    transport.reply(
        Method::Post,
        "/auth/login",
        200,
        json!({"code": 200, "message": "Welcome back", "data": {"token": "t1", "id": "u1"}}),
    );
    transport.reply(Method::Get, list_path(), 200, page_json(0..3, 3));
    let store = MemorySessionStore::new();
    let notifier = NotificationLog::new();

    let mut app = App::open(&transport, &store, &notifier, "/login");
    assert_eq!(app.route(), &Route::Login);
    assert!(app.header().is_none());

    assert!(app.dispatch(edit("email", "a@b.com")));
    assert!(app.dispatch(edit("password", "secret")));
    assert!(app.dispatch(Action::Submit));

    assert_eq!(
        transport.requests()[0].body,
        Some(json!({"email": "a@b.com", "password": "secret"}))
    );
    let stored = store.read();
    assert_eq!(stored.token.as_deref(), Some("t1"));
    assert_eq!(stored.user_id(), Some("u1"));
    assert_eq!(app.route(), &Route::Home);
    assert!(app.header().is_some());
    assert_eq!(notifier.drain()[0].message, "Welcome back");

    let list_request = transport.last_request().unwrap();
    assert_eq!(list_request.path, list_path());
    assert_eq!(list_request.bearer_token.as_deref(), Some("t1"));
    match app.view() {
        ActiveView::Home(view) => assert_eq!(view.posts().len(), 3),
        other => panic!("expected home view, got {other:?}"),
    }
}

#[test]
fn register_enforces_rules_then_persists_session() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Post, "/auth/register", 200, app_error(409, ""));
    transport.reply(
        Method::Post,
        "/auth/register",
        200,
        json!({"code": 200, "message": "", "data": {"token": "t2", "id": "u2"}}),
    );
    transport.reply(Method::Get, list_path(), 200, page_json(0..0, 0));
    let store = MemorySessionStore::new();
    let notifier = NotificationLog::new();

    let mut app = App::open(&transport, &store, &notifier, "/register");
    assert_eq!(app.route(), &Route::Register);

    app.dispatch(edit("email", "new@b.com"));
    app.dispatch(edit("password", "12345"));
    assert!(app.dispatch(Action::Submit));
    assert!(transport.requests().is_empty());
    let form = app.view().form().unwrap();
    assert_eq!(form.visible_error("username"), Some("Username is required"));
    assert_eq!(
        form.visible_error("password"),
        Some("Password must be at least 6 characters")
    );

    app.dispatch(edit("username", "newbie"));
    app.dispatch(edit("password", "secret1"));
    assert!(app.dispatch(Action::Submit));
    assert_eq!(app.route(), &Route::Register);
    assert!(!store.read().is_present());
    let failure = notifier.drain();
    assert_eq!(failure.len(), 1);
    assert_eq!(failure[0].kind, NotificationKind::Error);
    assert_eq!(failure[0].message, "Registration failed");
    assert_eq!(app.view().form().unwrap().value("username"), "newbie");

    assert!(app.dispatch(Action::Submit));
    assert_eq!(
        transport.requests()[1].body,
        Some(json!({"username": "newbie", "email": "new@b.com", "password": "secret1"}))
    );
    let stored = store.read();
    assert_eq!(stored.token.as_deref(), Some("t2"));
    assert_eq!(stored.user_id(), Some("u2"));
    assert_eq!(app.route(), &Route::Home);
    assert_eq!(app.session().user_id(), Some("u2"));
    assert_eq!(notifier.drain()[0].message, "Registered successfully");
}

#[test]
fn invalid_login_form_sends_nothing() {
    let transport = ScriptedTransport::new();
    let store = MemorySessionStore::new();
    let notifier = NotificationLog::new();
    let mut app = App::open(&transport, &store, &notifier, "/login");

    app.dispatch(edit("email", "not-an-email"));
    app.dispatch(Action::BlurField("email".to_string()));
    assert!(app.dispatch(Action::Submit));

    assert!(transport.requests().is_empty());
    assert_eq!(app.route(), &Route::Login);
    let form = app.view().form().unwrap();
    assert_eq!(form.visible_error("email"), Some("Invalid email format"));
    assert_eq!(form.visible_error("password"), Some("Password is required"));
}

#[test]
fn anonymous_visitors_are_redirected_to_login() {
    let transport = ScriptedTransport::new();
    let store = MemorySessionStore::new();
    let notifier = NotificationLog::new();

    for path in ["/", "/create", "/post/p1", "/edit/p1", "/missing"] {
        let app = App::open(&transport, &store, &notifier, path);
        assert_eq!(app.route(), &Route::Login, "path {path}");
        assert!(app.header().is_none());
    }
    assert!(transport.requests().is_empty());
}

#[test]
fn signed_in_users_skip_auth_pages() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Get, list_path(), 200, page_json(0..0, 0));
    let store = MemorySessionStore::signed_in("t1", "u1");
    let notifier = NotificationLog::new();

    for path in ["/login", "/register", "/missing"] {
        let app = App::open(&transport, &store, &notifier, path);
        assert_eq!(app.route(), &Route::Home, "path {path}");
    }

    let mut app = App::open(&transport, &store, &notifier, "/create");
    assert_eq!(app.route(), &Route::Create);
    assert!(app.dispatch(Action::Navigate("/register".to_string())));
    assert_eq!(app.route(), &Route::Home);
}

#[test]
fn logout_clears_store_and_forces_login() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Get, list_path(), 200, page_json(0..1, 1));
    let store = MemorySessionStore::signed_in("t1", "u1");
    let notifier = NotificationLog::new();
    let mut app = App::open(&transport, &store, &notifier, "/");
    assert_eq!(app.route(), &Route::Home);

    assert!(app.dispatch(Action::Logout));
    assert_eq!(app.route(), &Route::Login);
    assert!(app.header().is_none());
    assert!(!store.read().is_present());
    assert!(!app.session().is_present());

    assert!(!app.dispatch(Action::Logout));
    app.dispatch(Action::Navigate("/".to_string()));
    assert_eq!(app.route(), &Route::Login);
}

#[test]
fn create_navigates_home_exactly_once() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Post, "/posts/create-post", 200, ok_message("Post created"));
    transport.reply(Method::Get, list_path(), 200, page_json(0..1, 1));
    let store = MemorySessionStore::signed_in("t1", "u1");
    let notifier = NotificationLog::new();
    let mut app = App::open(&transport, &store, &notifier, "/create");

    app.dispatch(edit("title", "Hello"));
    app.dispatch(edit("content", "World"));
    assert!(app.dispatch(Action::Submit));

    assert_eq!(app.history(), &[Route::Create, Route::Home]);
    assert_eq!(transport.count(Method::Post, "/posts/create-post"), 1);
    assert_eq!(transport.count(Method::Get, list_path()), 1);
}

#[test]
fn owner_deletes_post_from_detail_view() {
    let transport = ScriptedTransport::new();
    transport.reply(
        Method::Get,
        "/posts/get-post/p1",
        200,
        ok(post_json("p1", "Mine", "u1")),
    );
    transport.reply(Method::Delete, "/posts/delete-post/p1", 200, ok_message("Deleted"));
    transport.reply(Method::Get, list_path(), 200, page_json(0..0, 0));
    let store = MemorySessionStore::signed_in("t1", "u1");
    let notifier = NotificationLog::new();
    let mut app = App::open(&transport, &store, &notifier, "/post/p1");

    app.dispatch(Action::ConfirmDelete);
    assert_eq!(app.route(), &Route::Post("p1".to_string()));
    assert_eq!(transport.count(Method::Delete, "/posts/delete-post/p1"), 0);

    assert!(app.dispatch(Action::OpenDeleteDialog));
    assert!(app.dispatch(Action::ConfirmDelete));
    assert_eq!(app.route(), &Route::Home);
    assert_eq!(transport.count(Method::Delete, "/posts/delete-post/p1"), 1);
}

#[test]
fn actions_for_other_views_are_ignored() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Get, list_path(), 200, page_json(0..1, 1));
    let store = MemorySessionStore::signed_in("t1", "u1");
    let notifier = NotificationLog::new();
    let mut app = App::open(&transport, &store, &notifier, "/");

    assert!(!app.dispatch(Action::Submit));
    assert!(!app.dispatch(Action::OpenDeleteDialog));
    assert!(!app.dispatch(edit("title", "x")));
    assert!(app.dispatch(Action::ToggleLike("p0".to_string())));
}

#[test]
fn leaving_a_view_cancels_its_token() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Get, list_path(), 200, page_json(0..1, 1));
    let store = MemorySessionStore::signed_in("t1", "u1");
    let notifier = NotificationLog::new();
    let mut app = App::open(&transport, &store, &notifier, "/create");

    let token = match app.view() {
        ActiveView::Create(view) => view.cancel_token().clone(),
        other => panic!("expected create view, got {other:?}"),
    };
    assert!(!token.is_cancelled());
    app.dispatch(Action::Navigate("/".to_string()));
    assert!(token.is_cancelled());
}
