//! Per-session state
//!
//! One piece of session-scoped state exists: the currently active refined
//! search query, plus a one-shot notice consumed on the next page render.
//! Sessions are identified by a cookie and live in process memory for the
//! process lifetime; a restart clears them.

use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use axum::response::Response;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "scout_session";

/// State held for one browser session
#[derive(Debug, Clone, Default)]
pub struct SessionData {
    /// The active refined search query, empty until "Ask Assistant" runs
    pub search_query: String,
    /// One-shot notice rendered on the next page view
    pub notice: Option<String>,
}

/// Resolved session identity for one request
#[derive(Debug, Clone, Copy)]
pub struct Session {
    pub id: Uuid,
    /// True when the id was minted for this request and the response must
    /// carry a Set-Cookie header
    pub is_new: bool,
}

impl Session {
    /// Resolve the session from request headers, minting a new id when the
    /// cookie is absent or unparseable.
    pub fn resolve(headers: &HeaderMap) -> Self {
        for value in headers.get_all(COOKIE) {
            let Ok(raw) = value.to_str() else { continue };
            for pair in raw.split(';') {
                if let Some((name, value)) = pair.trim().split_once('=') {
                    if name == SESSION_COOKIE {
                        if let Ok(id) = Uuid::parse_str(value.trim()) {
                            return Session { id, is_new: false };
                        }
                    }
                }
            }
        }
        Session {
            id: Uuid::new_v4(),
            is_new: true,
        }
    }

    /// Attach the session cookie to a response for newly minted sessions.
    pub fn apply(&self, mut response: Response) -> Response {
        if self.is_new {
            let cookie = format!("{}={}; Path=/; HttpOnly", SESSION_COOKIE, self.id);
            if let Ok(value) = HeaderValue::from_str(&cookie) {
                response.headers_mut().append(SET_COOKIE, value);
            }
        }
        response
    }
}

/// In-memory store of all session state
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<Uuid, SessionData>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, SessionData>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Clone of the session's current state
    pub fn snapshot(&self, id: Uuid) -> SessionData {
        self.lock().get(&id).cloned().unwrap_or_default()
    }

    /// Store the refined search query
    pub fn set_query(&self, id: Uuid, query: String) {
        self.lock().entry(id).or_default().search_query = query;
    }

    /// Queue a one-shot notice for the next page render
    pub fn set_notice(&self, id: Uuid, notice: String) {
        self.lock().entry(id).or_default().notice = Some(notice);
    }

    /// Consume the pending notice, if any
    pub fn take_notice(&self, id: Uuid) -> Option<String> {
        self.lock().get_mut(&id).and_then(|data| data.notice.take())
    }
}
