//! Plain-text rendering of the mounted view.

use myblog_core::api::Transport;
use myblog_core::form::FormDraft;
use myblog_core::router::Header;
use myblog_core::view::home::{HomeView, ListState};
use myblog_core::view::post_form::EditState;
use myblog_core::view::single_post::{DeleteDialog, DetailControl, DetailState, SinglePostView};
use myblog_core::{ActiveView, App, Notification, NotificationKind, Notifier, SessionStore};
use std::fmt::Write;

const PASSWORD_MASK: &str = "********";

pub fn render<T: Transport, S: SessionStore, N: Notifier>(app: &App<T, S, N>) -> String {
    let mut out = String::new();
    if let Some(header) = app.header() {
        render_header(&mut out, &header);
    }
    match app.view() {
        ActiveView::Home(view) => render_home(&mut out, view),
        ActiveView::Auth(view) => {
            let _ = writeln!(out, "{}", view.kind().title());
            render_form(&mut out, view.form());
        }
        ActiveView::Create(view) => {
            let _ = writeln!(out, "Create Post");
            render_form(&mut out, view.form());
        }
        ActiveView::Edit(view) => {
            let _ = writeln!(out, "Edit Post");
            match view.state() {
                EditState::Loading => {
                    let _ = writeln!(out, "Loading...");
                }
                EditState::Ready => render_form(&mut out, view.form()),
            }
        }
        ActiveView::Post(view) => render_post(&mut out, view),
    }
    out
}

pub fn render_notification(notification: &Notification) -> String {
    let tag = match notification.kind {
        NotificationKind::Success => "ok",
        NotificationKind::Error => "error",
    };
    format!("[{tag}] {}", notification.message)
}

fn render_header(out: &mut String, header: &Header) {
    let items = header
        .items
        .iter()
        .map(|item| item.label())
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "{} | {items}", header.brand);
    let _ = writeln!(out);
}

fn render_home(out: &mut String, view: &HomeView) {
    let _ = writeln!(out, "All Blog Posts");
    match view.state() {
        ListState::Loading => {
            let _ = writeln!(out, "Loading...");
            return;
        }
        ListState::Empty | ListState::Failed => {
            let _ = writeln!(out, "No blog posts available.");
            return;
        }
        ListState::Populated => {}
    }

    for post in view.posts() {
        let like = if view.is_liked(&post.id) { "♥" } else { "♡" };
        let _ = writeln!(out, "{like} {} [{}]", post.title, post.id);
        let _ = writeln!(out, "    by {}", post.author_name());
        let _ = writeln!(out, "    {}", post.excerpt());
    }
    let pagination = view.pagination();
    let _ = writeln!(
        out,
        "Page {} of {} ({} per page)",
        pagination.page(),
        pagination.total_pages(),
        pagination.page_size()
    );
}

fn render_post(out: &mut String, view: &SinglePostView) {
    let post = match view.state() {
        DetailState::Loading => {
            let _ = writeln!(out, "Loading...");
            return;
        }
        DetailState::NotFound => {
            let _ = writeln!(out, "No blog post found...");
            return;
        }
        DetailState::Found(post) => post,
    };

    let _ = writeln!(out, "{}", post.title);
    let _ = writeln!(out, "Author: {}", post.author_name());
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", post.content);
    let _ = writeln!(out);

    let controls = view
        .controls()
        .iter()
        .map(|control| match control {
            DetailControl::Back => "Back",
            DetailControl::Edit => "Edit",
            DetailControl::Delete => "Delete",
        })
        .collect::<Vec<_>>();
    let _ = writeln!(out, "[{}]", controls.join("] ["));
    if view.dialog() == DeleteDialog::Open {
        let _ = writeln!(out, "Are you sure you want to delete this post?");
    }
}

fn render_form(out: &mut String, form: &FormDraft) {
    for field in form.fields() {
        let value = form.value(field);
        let shown = if field == "password" && !value.is_empty() {
            PASSWORD_MASK
        } else {
            value
        };
        let _ = writeln!(out, "{field}: {shown}");
        if let Some(error) = form.visible_error(field) {
            let _ = writeln!(out, "  ! {error}");
        }
    }
}
