//! Post detail with author-gated edit/delete.
//!
//! Gating hides controls only; the API enforces authorization.

use super::Navigation;
use crate::api::{ApiClient, ApiError, CancellationToken, Transport};
use crate::model::post::{Post, PostId};
use crate::model::session::Session;
use crate::notify::Notifier;
use crate::router::Route;
use log::info;

const FETCH_FAILED: &str = "Failed to fetch post";
const DELETE_FAILED: &str = "Failed to delete post";
const DELETED: &str = "Post deleted successfully";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Found(Post),
    NotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteDialog {
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailControl {
    Back,
    Edit,
    Delete,
}

const OWNER_CONTROLS: &[DetailControl] = &[DetailControl::Edit, DetailControl::Delete];
const VISITOR_CONTROLS: &[DetailControl] = &[DetailControl::Back];

#[derive(Debug)]
pub struct SinglePostView {
    post_id: PostId,
    session: Session,
    state: DetailState,
    dialog: DeleteDialog,
    deleting: bool,
    cancel: CancellationToken,
}

impl SinglePostView {
    pub fn mount(post_id: impl Into<PostId>, session: Session) -> Self {
        Self {
            post_id: post_id.into(),
            session,
            state: DetailState::Loading,
            dialog: DeleteDialog::Closed,
            deleting: false,
            cancel: CancellationToken::new(),
        }
    }

    pub fn post_id(&self) -> &str {
        &self.post_id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn dialog(&self) -> DeleteDialog {
        self.dialog
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn unmount(&self) {
        self.cancel.cancel();
    }

    pub fn load<T: Transport>(&mut self, api: &ApiClient<T>, notifier: &impl Notifier) {
        self.state = DetailState::Loading;
        self.state = match api.get_post(&self.post_id, &self.cancel) {
            Ok(success) => success
                .data
                .map_or(DetailState::NotFound, DetailState::Found),
            Err(ApiError::Cancelled) => return,
            Err(err) => {
                notifier.error(&err.user_message(FETCH_FAILED));
                DetailState::NotFound
            }
        };
    }

    /// Whether the signed-in user authored the displayed post.
    pub fn is_owner(&self) -> bool {
        match &self.state {
            DetailState::Found(post) => post.is_authored_by(self.session.user_id()),
            _ => false,
        }
    }

    /// Controls rendered under the post; empty until a post is found.
    pub fn controls(&self) -> &'static [DetailControl] {
        match self.state {
            DetailState::Found(_) if self.is_owner() => OWNER_CONTROLS,
            DetailState::Found(_) => VISITOR_CONTROLS,
            _ => &[],
        }
    }

    fn has_control(&self, control: DetailControl) -> bool {
        self.controls().contains(&control)
    }

    /// Opens the confirmation dialog; requires the Delete control.
    pub fn open_delete_dialog(&mut self) -> bool {
        if !self.has_control(DetailControl::Delete) || self.deleting {
            return false;
        }
        self.dialog = DeleteDialog::Open;
        true
    }

    pub fn close_delete_dialog(&mut self) {
        self.dialog = DeleteDialog::Closed;
    }

    /// Deletes the post after confirmation; navigates home on success.
    ///
    /// A failed delete leaves the stale post on screen.
    pub fn confirm_delete<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
        notifier: &impl Notifier,
    ) -> Navigation {
        if self.dialog != DeleteDialog::Open || !self.has_control(DetailControl::Delete) {
            return Navigation::Stay;
        }
        self.dialog = DeleteDialog::Closed;
        self.deleting = true;

        let result = api.delete_post(&self.post_id, &self.cancel);
        if matches!(result, Err(ApiError::Cancelled)) {
            return Navigation::Stay;
        }
        self.deleting = false;
        match result {
            Ok(success) => {
                info!("event=post_delete module=view status=ok");
                notifier.success(&success.message_or(DELETED));
                Navigation::To(Route::Home)
            }
            Err(err) => {
                info!("event=post_delete module=view status=error kind={}", err.kind());
                notifier.error(&err.user_message(DELETE_FAILED));
                Navigation::Stay
            }
        }
    }
}
