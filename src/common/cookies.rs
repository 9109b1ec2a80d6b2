use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use hyper::HeaderMap;
use hyper::header::{self, HeaderValue};

/// Session cookies keyed by account.
///
/// A response carrying `Set-Cookie` replaces the account's cookies wholesale
/// (last write wins); responses without it leave them untouched. Clones share
/// the same storage.
#[derive(Debug, Clone, Default)]
pub struct CookieStore {
    inner: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl CookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the `name=value` pairs of every `Set-Cookie` header in `headers`.
    pub fn store_from_headers(&self, account: &str, headers: &HeaderMap) {
        let cookies: Vec<String> = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|raw| raw.split(';').next())
            .map(str::trim)
            .filter(|pair| pair.contains('=') && !pair.starts_with('='))
            .map(str::to_string)
            .collect();

        if cookies.is_empty() {
            return;
        }

        tracing::trace!(account, count = cookies.len(), "storing session cookies");
        if let Ok(mut guard) = self.inner.write() {
            guard.insert(account.to_string(), cookies);
        }
    }

    pub fn cookies(&self, account: &str) -> Vec<String> {
        if let Ok(guard) = self.inner.read() {
            guard.get(account).cloned().unwrap_or_default()
        } else {
            Vec::new()
        }
    }

    /// `Cookie` header value for the account, if it has any cookies.
    pub fn cookie_header(&self, account: &str) -> Option<HeaderValue> {
        let cookies = self.cookies(account);
        if cookies.is_empty() {
            return None;
        }
        HeaderValue::from_str(&cookies.join("; ")).ok()
    }

    /// Add the account's cookies to `headers` unless a `Cookie` header is already set.
    pub fn inject(&self, account: &str, headers: &mut HeaderMap) {
        if headers.contains_key(header::COOKIE) {
            return;
        }
        if let Some(value) = self.cookie_header(account) {
            headers.insert(header::COOKIE, value);
        }
    }

    pub fn remove(&self, account: &str) {
        if let Ok(mut guard) = self.inner.write() {
            guard.remove(account);
        }
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.clear();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().map(|g| g.is_empty()).unwrap_or(true)
    }
}
