//! Application shell: session context, routing and the mounted view.
//!
//! # Responsibility
//! - Resolve paths against the session and mount exactly one view.
//! - Dispatch user actions to the mounted view.
//! - Apply session events and navigation intents produced by views.
//!
//! # Invariants
//! - Replacing a view cancels the old view's token before the new one loads.
//! - The API client's bearer token always mirrors the session context.

use crate::api::{ApiClient, Transport};
use crate::form::FormDraft;
use crate::model::post::PostId;
use crate::model::session::Session;
use crate::notify::Notifier;
use crate::router::{header, resolve, Header, Resolution, Route};
use crate::session::{SessionContext, SessionEvent, SessionStore};
use crate::view::auth::AuthView;
use crate::view::home::HomeView;
use crate::view::post_form::{CreatePostView, EditPostView};
use crate::view::single_post::SinglePostView;
use crate::view::Navigation;
use log::{error, info};

const LOGOUT_FAILED: &str = "Failed to clear the stored session";

/// The single mounted screen.
#[derive(Debug)]
pub enum ActiveView {
    Home(HomeView),
    Auth(AuthView),
    Create(CreatePostView),
    Edit(EditPostView),
    Post(SinglePostView),
}

impl ActiveView {
    fn mount(route: &Route, session: &Session) -> Self {
        match route {
            Route::Home => Self::Home(HomeView::mount()),
            Route::Login => Self::Auth(AuthView::login()),
            Route::Register => Self::Auth(AuthView::register()),
            Route::Create => Self::Create(CreatePostView::mount()),
            Route::Edit(id) => Self::Edit(EditPostView::mount(id.clone())),
            Route::Post(id) => Self::Post(SinglePostView::mount(id.clone(), session.clone())),
        }
    }

    fn unmount(&self) {
        match self {
            Self::Home(view) => view.unmount(),
            Self::Auth(view) => view.unmount(),
            Self::Create(view) => view.unmount(),
            Self::Edit(view) => view.unmount(),
            Self::Post(view) => view.unmount(),
        }
    }

    /// Form of the mounted view, if it has one.
    pub fn form(&self) -> Option<&FormDraft> {
        match self {
            Self::Auth(view) => Some(view.form()),
            Self::Create(view) => Some(view.form()),
            Self::Edit(view) => Some(view.form()),
            Self::Home(_) | Self::Post(_) => None,
        }
    }

    fn form_mut(&mut self) -> Option<&mut FormDraft> {
        match self {
            Self::Auth(view) => Some(view.form_mut()),
            Self::Create(view) => Some(view.form_mut()),
            Self::Edit(view) => Some(view.form_mut()),
            Self::Home(_) | Self::Post(_) => None,
        }
    }
}

/// User intents the shell understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(String),
    Logout,
    GoToPage(u32),
    PreviousPage,
    NextPage,
    SetPageSize(u32),
    ToggleLike(PostId),
    EditField { field: String, value: String },
    BlurField(String),
    Submit,
    OpenDeleteDialog,
    CloseDeleteDialog,
    ConfirmDelete,
}

pub struct App<T: Transport, S: SessionStore, N: Notifier> {
    api: ApiClient<T>,
    store: S,
    notifier: N,
    session: SessionContext,
    route: Route,
    view: ActiveView,
    history: Vec<Route>,
}

impl<T: Transport, S: SessionStore, N: Notifier> App<T, S, N> {
    /// Loads the stored session and navigates to `path`.
    pub fn open(transport: T, store: S, notifier: N, path: &str) -> Self {
        let session = SessionContext::load(&store);
        let mut api = ApiClient::new(transport);
        api.set_session(session.session());

        let route = resolve(path, session.is_present()).route().clone();
        let view = ActiveView::mount(&route, session.session());
        let mut app = Self {
            api,
            store,
            notifier,
            session,
            route: route.clone(),
            view,
            history: Vec::new(),
        };
        app.navigate(path);
        app
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn header(&self) -> Option<Header> {
        header(self.session.session())
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn api(&self) -> &ApiClient<T> {
        &self.api
    }

    /// Routes mounted so far, in order.
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Resolves `path`, swaps the mounted view and runs its initial fetch.
    pub fn navigate(&mut self, path: &str) -> Resolution {
        let resolution = resolve(path, self.session.is_present());
        let route = resolution.route().clone();
        info!(
            "event=navigate module=app status=ok requested={} route={} redirected={}",
            path,
            route.path(),
            matches!(resolution, Resolution::Redirect(_))
        );

        self.view.unmount();
        self.view = ActiveView::mount(&route, self.session.session());
        self.route = route.clone();
        self.history.push(route);

        match &mut self.view {
            ActiveView::Home(view) => view.load(&self.api, &self.notifier),
            ActiveView::Edit(view) => view.load(&self.api, &self.notifier),
            ActiveView::Post(view) => view.load(&self.api, &self.notifier),
            ActiveView::Auth(_) | ActiveView::Create(_) => {}
        }
        resolution
    }

    /// Applies a session transition and re-targets the API token.
    pub fn apply_session_event(&mut self, event: &SessionEvent) {
        self.session.apply(event);
        self.api.set_session(self.session.session());
    }

    /// Clears the stored session and forces `/login`.
    pub fn logout(&mut self) {
        if let Err(err) = self.store.clear() {
            error!("event=logout module=app status=error error={err}");
            self.notifier.error(LOGOUT_FAILED);
        }
        self.apply_session_event(&SessionEvent::SignedOut);
        self.navigate(&Route::Login.path());
    }

    /// Hands `action` to the mounted view; returns whether it applied.
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Navigate(path) => {
                self.navigate(&path);
                return true;
            }
            Action::Logout => {
                if self.header().is_none() {
                    return false;
                }
                self.logout();
                return true;
            }
            _ => {}
        }

        let mut event = None;
        let (handled, navigation) = match (&mut self.view, action) {
            (ActiveView::Home(view), Action::GoToPage(page)) => (
                view.go_to_page(page, &self.api, &self.notifier),
                Navigation::Stay,
            ),
            (ActiveView::Home(view), Action::PreviousPage) => {
                (view.previous_page(&self.api, &self.notifier), Navigation::Stay)
            }
            (ActiveView::Home(view), Action::NextPage) => {
                (view.next_page(&self.api, &self.notifier), Navigation::Stay)
            }
            (ActiveView::Home(view), Action::SetPageSize(size)) => (
                view.set_page_size(size, &self.api, &self.notifier),
                Navigation::Stay,
            ),
            (ActiveView::Home(view), Action::ToggleLike(id)) => {
                (view.toggle_like(&id), Navigation::Stay)
            }
            (view, Action::EditField { field, value }) => (
                view.form_mut()
                    .is_some_and(|form| form.set(&field, value)),
                Navigation::Stay,
            ),
            (view, Action::BlurField(field)) => (
                view.form_mut().is_some_and(|form| form.blur(&field)),
                Navigation::Stay,
            ),
            (ActiveView::Auth(view), Action::Submit) => {
                event = view.submit(&self.api, &self.store, &self.notifier);
                let navigation = if event.is_some() {
                    Navigation::To(Route::Home)
                } else {
                    Navigation::Stay
                };
                (true, navigation)
            }
            (ActiveView::Create(view), Action::Submit) => {
                (true, view.submit(&self.api, &self.notifier))
            }
            (ActiveView::Edit(view), Action::Submit) => {
                (true, view.submit(&self.api, &self.notifier))
            }
            (ActiveView::Post(view), Action::OpenDeleteDialog) => {
                (view.open_delete_dialog(), Navigation::Stay)
            }
            (ActiveView::Post(view), Action::CloseDeleteDialog) => {
                view.close_delete_dialog();
                (true, Navigation::Stay)
            }
            (ActiveView::Post(view), Action::ConfirmDelete) => {
                let navigation = view.confirm_delete(&self.api, &self.notifier);
                (true, navigation)
            }
            _ => (false, Navigation::Stay),
        };

        if let Some(event) = event {
            self.apply_session_event(&event);
        }
        if let Navigation::To(route) = navigation {
            self.navigate(&route.path());
        }
        handled
    }
}
