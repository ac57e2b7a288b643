//! Login and registration forms.
//!
//! A successful submit persists the credentials and yields a
//! `SessionEvent::SignedIn`; the shell applies it and navigates home.

use crate::api::{ApiClient, ApiError, ApiResult, CancellationToken, Transport};
use crate::form::{Check, FieldRule, FormDraft};
use crate::model::auth::{AuthGrant, LoginRequest, RegisterRequest};
use crate::model::session::Session;
use crate::notify::Notifier;
use crate::session::{SessionEvent, SessionStore};
use log::{error, info};

pub const USERNAME_FIELD: &str = "username";
pub const EMAIL_FIELD: &str = "email";
pub const PASSWORD_FIELD: &str = "password";

const EMAIL_CHECKS: &[Check] = &[
    Check::Required("Email is required"),
    Check::Email("Invalid email format"),
];

pub const LOGIN_RULES: &[FieldRule] = &[
    FieldRule {
        field: EMAIL_FIELD,
        checks: EMAIL_CHECKS,
    },
    FieldRule {
        field: PASSWORD_FIELD,
        checks: &[Check::Required("Password is required")],
    },
];

pub const REGISTER_RULES: &[FieldRule] = &[
    FieldRule {
        field: USERNAME_FIELD,
        checks: &[Check::Required("Username is required")],
    },
    FieldRule {
        field: EMAIL_FIELD,
        checks: EMAIL_CHECKS,
    },
    FieldRule {
        field: PASSWORD_FIELD,
        checks: &[
            Check::Required("Password is required"),
            Check::MinChars(6, "Password must be at least 6 characters"),
        ],
    },
];

const LOGIN_FAILED: &str = "Login failed";
const LOGGED_IN: &str = "Logged in successfully";
const REGISTER_FAILED: &str = "Registration failed";
const REGISTERED: &str = "Registered successfully";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    Login,
    Register,
}

impl AuthKind {
    fn rules(self) -> &'static [FieldRule] {
        match self {
            Self::Login => LOGIN_RULES,
            Self::Register => REGISTER_RULES,
        }
    }

    fn messages(self) -> (&'static str, &'static str) {
        match self {
            Self::Login => (LOGGED_IN, LOGIN_FAILED),
            Self::Register => (REGISTERED, REGISTER_FAILED),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Login => "Login",
            Self::Register => "Register",
        }
    }
}

/// Login or registration screen.
#[derive(Debug)]
pub struct AuthView {
    kind: AuthKind,
    form: FormDraft,
    cancel: CancellationToken,
}

impl AuthView {
    pub fn mount(kind: AuthKind) -> Self {
        Self {
            kind,
            form: FormDraft::new(kind.rules()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn login() -> Self {
        Self::mount(AuthKind::Login)
    }

    pub fn register() -> Self {
        Self::mount(AuthKind::Register)
    }

    pub fn kind(&self) -> AuthKind {
        self.kind
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

    /// Validates, calls the API and persists the session on success.
    pub fn submit<T: Transport>(
        &mut self,
        api: &ApiClient<T>,
        store: &impl SessionStore,
        notifier: &impl Notifier,
    ) -> Option<SessionEvent> {
        if !self.form.begin_submit() {
            return None;
        }
        let result = self.call(api);
        if matches!(result, Err(ApiError::Cancelled)) {
            return None;
        }
        self.form.finish_submit();

        let (succeeded, failed) = self.kind.messages();
        let event = match result {
            Ok(success) => match success.data.as_ref().and_then(AuthGrant::credentials) {
                Some((token, user_id)) => match store.write(token, user_id) {
                    Ok(()) => {
                        notifier.success(&success.message_or(succeeded));
                        Some(SessionEvent::SignedIn(Session::signed_in(token, user_id)))
                    }
                    Err(err) => {
                        error!(
                            "event=auth_submit module=view status=error action={} error={err}",
                            self.kind.label()
                        );
                        notifier.error(failed);
                        None
                    }
                },
                None => {
                    notifier.error(failed);
                    None
                }
            },
            Err(err) => {
                notifier.error(&err.user_message(failed));
                None
            }
        };
        info!(
            "event=auth_submit module=view action={} status={}",
            self.kind.label(),
            if event.is_some() { "ok" } else { "error" }
        );
        event
    }

    fn call<T: Transport>(&self, api: &ApiClient<T>) -> ApiResult<AuthGrant> {
        let value = |field: &str| self.form.value(field).to_string();
        match self.kind {
            AuthKind::Login => api.login(
                &LoginRequest {
                    email: value(EMAIL_FIELD),
                    password: value(PASSWORD_FIELD),
                },
                &self.cancel,
            ),
            AuthKind::Register => api.register(
                &RegisterRequest {
                    username: value(USERNAME_FIELD),
                    email: value(EMAIL_FIELD),
                    password: value(PASSWORD_FIELD),
                },
                &self.cancel,
            ),
        }
    }
}
