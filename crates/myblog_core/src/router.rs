//! Route table, session gating and header model.
//!
//! # Invariants
//! - Resolution is a pure function of `(path, session_present)`.
//! - Without a session only `/login` and `/register` render.
//! - With a session only `/`, `/create`, `/edit/:id`, `/post/:id` render.
//! - The header exists only while a session is present.

use crate::model::post::PostId;
use crate::model::session::Session;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

pub const BRAND: &str = "My Blog";

/// Characters escaped inside one path segment.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Percent-encodes `value` for use as a single path segment.
pub fn encode_segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// Reverses `encode_segment`; `None` when the bytes are not UTF-8.
pub fn decode_segment(segment: &str) -> Option<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Create,
    Edit(PostId),
    Post(PostId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Create => "/create".to_string(),
            Self::Edit(id) => format!("/edit/{}", encode_segment(id)),
            Self::Post(id) => format!("/post/{}", encode_segment(id)),
        }
    }

    /// Parses a URL path; query string, fragment and a trailing slash are ignored.
    /// Ids are percent-decoded.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>();
        if !path.starts_with('/') {
            return None;
        }

        match segments.as_slice() {
            [] => Some(Self::Home),
            ["login"] => Some(Self::Login),
            ["register"] => Some(Self::Register),
            ["create"] => Some(Self::Create),
            ["edit", id] => decode_segment(id).map(Self::Edit),
            ["post", id] => decode_segment(id).map(Self::Post),
            _ => None,
        }
    }

    /// Routes reachable without a session.
    pub fn is_public(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Render(Route),
    Redirect(Route),
}

impl Resolution {
    pub fn route(&self) -> &Route {
        match self {
            Self::Render(route) | Self::Redirect(route) => route,
        }
    }
}

pub fn resolve(path: &str, session_present: bool) -> Resolution {
    match (Route::parse(path), session_present) {
        (Some(route), false) if route.is_public() => Resolution::Render(route),
        (_, false) => Resolution::Redirect(Route::Login),
        (Some(route), true) if !route.is_public() => Resolution::Render(route),
        (_, true) => Resolution::Redirect(Route::Home),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavItem {
    CreatePost,
    Logout,
}

impl NavItem {
    pub fn label(self) -> &'static str {
        match self {
            Self::CreatePost => "Create Post",
            Self::Logout => "Logout",
        }
    }
}

/// Navigation bar shown above every protected view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub brand: &'static str,
    pub items: Vec<NavItem>,
}

pub fn header(session: &Session) -> Option<Header> {
    session.is_present().then(|| Header {
        brand: BRAND,
        items: vec![NavItem::CreatePost, NavItem::Logout],
    })
}
