//! Create and edit post forms.
//!
//! Both share the same two required fields. Edit adds a loading pre-state
//! that seeds the form from the fetched post.

use super::Navigation;
use crate::api::{ApiClient, ApiError, ApiResult, CancellationToken, Transport};
use crate::form::{Check, FieldRule, FormDraft};
use crate::model::post::{Post, PostId, PostPayload};
use crate::notify::Notifier;
use crate::router::Route;
use log::info;

pub const TITLE_FIELD: &str = "title";
pub const CONTENT_FIELD: &str = "content";

pub const POST_RULES: &[FieldRule] = &[
    FieldRule {
        field: TITLE_FIELD,
        checks: &[Check::Required("Title is required")],
    },
    FieldRule {
        field: CONTENT_FIELD,
        checks: &[Check::Required("Content is required")],
    },
];

const CREATE_FAILED: &str = "Failed to create post";
const CREATED: &str = "Post created successfully";
const UPDATE_FAILED: &str = "Failed to update post";
const UPDATED: &str = "Post updated successfully";
const FETCH_FAILED: &str = "Failed to fetch post";

fn payload(form: &FormDraft) -> PostPayload {
    PostPayload {
        title: form.value(TITLE_FIELD).to_string(),
        content: form.value(CONTENT_FIELD).to_string(),
    }
}

/// Settles a submit result: notifies, re-enables the form and returns the
/// navigation target on success.
fn settle<D>(
    result: ApiResult<D>,
    form: &mut FormDraft,
    notifier: &impl Notifier,
    on_success: (&str, Route),
    failure_fallback: &str,
) -> Navigation {
    match result {
        Ok(success) => {
            form.finish_submit();
            let (fallback, route) = on_success;
            notifier.success(&success.message_or(fallback));
            Navigation::To(route)
        }
        Err(ApiError::Cancelled) => Navigation::Stay,
        Err(err) => {
            form.finish_submit();
            notifier.error(&err.user_message(failure_fallback));
            Navigation::Stay
        }
    }
}

#[derive(Debug)]
pub struct CreatePostView {
    form: FormDraft,
    cancel: CancellationToken,
}

impl Default for CreatePostView {
    fn default() -> Self {
        Self::mount()
    }
}

impl CreatePostView {
    pub fn mount() -> Self {
        Self {
            form: FormDraft::new(POST_RULES),
            cancel: CancellationToken::new(),
        }
    }

    pub fn form(&self) -> &FormDraft {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormDraft {
        &mut self.form
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn unmount(&self) {
        self.cancel.cancel();
    }

    /// Validates and creates the post; navigates home on success.
    pub fn submit<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
        notifier: &impl Notifier,
    ) -> Navigation {
        if !self.form.begin_submit() {
            return Navigation::Stay;
        }
        let result = api.create_post(&payload(&self.form), &self.cancel);
        let navigation = settle(
            result,
            &mut self.form,
            notifier,
            (CREATED, Route::Home),
            CREATE_FAILED,
        );
        info!(
            "event=post_create module=view status={}",
            if navigation == Navigation::Stay { "stay" } else { "ok" }
        );
        navigation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Loading,
    Ready,
}

#[derive(Debug)]
pub struct EditPostView {
    post_id: PostId,
    state: EditState,
    post: Option<Post>,
    form: FormDraft,
    cancel: CancellationToken,
}

impl EditPostView {
    pub fn mount(post_id: impl Into<PostId>) -> Self {
        Self {
            post_id: post_id.into(),
            state: EditState::Loading,
            post: None,
            form: FormDraft::new(POST_RULES),
            cancel: CancellationToken::new(),
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn form(&self) -> &FormDraft {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormDraft {
        &mut self.form
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn unmount(&self) {
        self.cancel.cancel();
    }

    /// Fetches the post and seeds the form from it.
    ///
    /// On failure the form stays empty but usable.
    pub fn load<T: Transport>(&mut self, api: &ApiClient<T>, notifier: &impl Notifier) {
        self.state = EditState::Loading;
        match api.get_post(&self.post_id, &self.cancel) {
            Ok(success) => self.replace_post(success.data),
            Err(ApiError::Cancelled) => return,
            Err(err) => notifier.error(&err.user_message(FETCH_FAILED)),
        }
        self.state = EditState::Ready;
    }

    /// Installs a freshly fetched post; the form is re-seeded when it changed.
    pub fn replace_post(&mut self, post: Option<Post>) {
        if self.post == post {
            return;
        }
        self.post = post;
        match self.post.as_ref() {
            Some(post) => self.form.seed(&[
                (TITLE_FIELD, post.title.as_str()),
                (CONTENT_FIELD, post.content.as_str()),
            ]),
            None => self.form.seed(&[]),
        }
    }

    /// Validates and updates the post; navigates to its detail view on success.
    pub fn submit<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
        notifier: &impl Notifier,
    ) -> Navigation {
        if self.state == EditState::Loading || !self.form.begin_submit() {
            return Navigation::Stay;
        }
        let result = api.update_post(&self.post_id, &payload(&self.form), &self.cancel);
        let navigation = settle(
            result,
            &mut self.form,
            notifier,
            (UPDATED, Route::Post(self.post_id.clone())),
            UPDATE_FAILED,
        );
        info!(
            "event=post_update module=view status={}",
            if navigation == Navigation::Stay { "stay" } else { "ok" }
        );
        navigation
    }
}
