#![allow(dead_code)]

use myblog_core::api::{ApiRequest, Method, RawResponse, Transport, TransportFailure};
use serde_json::{json, Value};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

type Reply = Result<RawResponse, TransportFailure>;
type Hook = Box<dyn Fn(&ApiRequest)>;

/// In-process transport answering from scripted replies.
///
/// The last reply queued for a route is reused for every later call.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: RefCell<HashMap<(Method, String), VecDeque<Reply>>>,
    requests: RefCell<Vec<ApiRequest>>,
    hook: RefCell<Option<Hook>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(&self, method: Method, path: &str, status: u16, body: Value) -> &Self {
        self.push(
            method,
            path,
            Ok(RawResponse {
                status,
                body: body.to_string(),
            }),
        )
    }

    pub fn fail(&self, method: Method, path: &str, message: &str) -> &Self {
        self.push(
            method,
            path,
            Err(TransportFailure::Network(message.to_string())),
        )
    }

    /// Runs `hook` for every request before the reply is produced.
    pub fn on_send(&self, hook: impl Fn(&ApiRequest) + 'static) {
        *self.hook.borrow_mut() = Some(Box::new(hook));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.requests
            .borrow()
            .iter()
            .filter(|request| request.method == method && request.path == path)
            .count()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.borrow().last().cloned()
    }

    fn push(&self, method: Method, path: &str, reply: Reply) -> &Self {
        self.replies
            .borrow_mut()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportFailure> {
        self.requests.borrow_mut().push(request.clone());
        if let Some(hook) = self.hook.borrow().as_ref() {
            hook(request);
        }

        let mut replies = self.replies.borrow_mut();
        let queue = replies
            .get_mut(&(request.method, request.path.clone()))
            .filter(|queue| !queue.is_empty());
        match queue {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap(),
            None => Err(TransportFailure::Network(format!(
                "no scripted reply for {} {}",
                request.method.as_str(),
                request.path
            ))),
        }
    }
}

pub fn ok(data: Value) -> Value {
    json!({ "code": 200, "message": "ok", "data": data })
}

pub fn ok_message(message: &str) -> Value {
    json!({ "code": 200, "message": message })
}

pub fn app_error(code: i64, message: &str) -> Value {
    json!({ "code": code, "message": message })
}

pub fn post_json(id: &str, title: &str, author_id: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "content": format!("{title} body"),
        "author": { "_id": author_id, "username": format!("user-{author_id}") }
    })
}

pub fn page_json(ids: std::ops::Range<u32>, total: u64) -> Value {
    let items = ids
        .map(|n| post_json(&format!("p{n}"), &format!("Post {n}"), "u1"))
        .collect::<Vec<_>>();
    json!({ "code": 200, "message": "ok", "data": items, "total": total })
}

pub fn list_path() -> &'static str {
    "/posts/all-posts"
}
