mod support;

use myblog_core::api::{ApiClient, ApiError, CancellationToken, Method};
use myblog_core::model::auth::LoginRequest;
use myblog_core::model::post::PostPayload;
use myblog_core::Session;
use serde_json::json;
use support::{app_error, list_path, ok, ok_message, page_json, post_json, ScriptedTransport};

#[test]
fn list_posts_sends_offset_and_limit_and_reads_total() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Get, list_path(), 200, page_json(0..2, 23));
    let api = ApiClient::new(&transport);

    let page = api.list_posts(20, 10, &CancellationToken::new()).unwrap();
    assert_eq!(page.data.unwrap().len(), 2);
    assert_eq!(page.total, Some(23));

    let request = transport.last_request().unwrap();
    assert_eq!(
        request.query,
        vec![
            ("offset".to_string(), "20".to_string()),
            ("limit".to_string(), "10".to_string()),
        ]
    );
}

#[test]
fn bearer_token_follows_the_session() {
    let transport = ScriptedTransport::new();
    transport.reply(
        Method::Get,
        "/posts/get-post/p1",
        200,
        ok(post_json("p1", "Hello", "u1")),
    );
    let mut api = ApiClient::new(&transport);
    let cancel = CancellationToken::new();

    api.get_post("p1", &cancel).unwrap();
    assert_eq!(transport.last_request().unwrap().bearer_token, None);

    api.set_session(&Session::signed_in("t1", "u1"));
    api.get_post("p1", &cancel).unwrap();
    assert_eq!(
        transport.last_request().unwrap().bearer_token.as_deref(),
        Some("t1")
    );

    api.set_session(&Session::anonymous());
    api.get_post("p1", &cancel).unwrap();
    assert_eq!(transport.last_request().unwrap().bearer_token, None);
}

#[test]
fn request_bodies_are_json_payloads() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Post, "/auth/login", 200, ok(json!({"token": "t1", "id": "u1"})));
    transport.reply(Method::Put, "/posts/update-post/p1", 200, ok_message("Updated"));
    let api = ApiClient::new(&transport);
    let cancel = CancellationToken::new();

    let grant = api
        .login(
            &LoginRequest {
                email: "a@b.com".to_string(),
                password: "secret".to_string(),
            },
            &cancel,
        )
        .unwrap();
    assert_eq!(grant.data.unwrap().credentials(), Some(("t1", "u1")));
    assert_eq!(
        transport.last_request().unwrap().body,
        Some(json!({"email": "a@b.com", "password": "secret"}))
    );

    let updated = api
        .update_post(
            "p1",
            &PostPayload {
                title: "T".to_string(),
                content: "C".to_string(),
            },
            &cancel,
        )
        .unwrap();
    assert_eq!(updated.message, "Updated");
    assert_eq!(
        transport.last_request().unwrap().body,
        Some(json!({"title": "T", "content": "C"}))
    );
}

#[test]
fn failures_are_discriminated() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Get, "/posts/get-post/app", 200, app_error(404, "Post not found"));
    transport.reply(
        Method::Get,
        "/posts/get-post/http",
        500,
        json!({"message": "Database unavailable"}),
    );
    transport.fail(Method::Get, "/posts/get-post/net", "connection refused");
    let api = ApiClient::new(&transport);
    let cancel = CancellationToken::new();

    let app = api.get_post("app", &cancel).unwrap_err();
    assert_eq!(
        app,
        ApiError::App {
            code: 404,
            message: Some("Post not found".to_string())
        }
    );

    let http = api.get_post("http", &cancel).unwrap_err();
    assert!(http.is_transport());
    assert_eq!(http.user_message("fallback"), "Database unavailable");

    let net = api.get_post("net", &cancel).unwrap_err();
    assert!(net.is_transport());
    assert_eq!(net.user_message("fallback"), "fallback");
}

#[test]
fn cancelled_token_suppresses_the_result() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Delete, "/posts/delete-post/p1", 200, ok_message("Deleted"));
    let api = ApiClient::new(&transport);

    let cancel = CancellationToken::new();
    let in_flight = cancel.clone();
    transport.on_send(move |_| in_flight.cancel());

    let result = api.delete_post("p1", &cancel);
    assert_eq!(result.unwrap_err(), ApiError::Cancelled);
    assert_eq!(transport.count(Method::Delete, "/posts/delete-post/p1"), 1);

    let again = api.delete_post("p1", &cancel);
    assert_eq!(again.unwrap_err(), ApiError::Cancelled);
    assert_eq!(transport.count(Method::Delete, "/posts/delete-post/p1"), 1);
}

#[test]
fn every_call_gets_a_distinct_request_id() {
    let transport = ScriptedTransport::new();
    transport.reply(Method::Get, list_path(), 200, page_json(0..1, 1));
    let api = ApiClient::new(&transport);
    let cancel = CancellationToken::new();

    api.list_posts(0, 10, &cancel).unwrap();
    api.list_posts(0, 10, &cancel).unwrap();
    let requests = transport.requests();
    assert_ne!(requests[0].request_id, requests[1].request_id);
}
