//! Account configuration and the per-call request context.

use std::collections::BTreeMap;
use std::time::Duration;

use hyper::Uri;
use serde::Deserialize;

use crate::error::DavError;
use crate::request::{encode_path, trim_slashes};

pub const DEFAULT_DAV_ROOT: &str = "remote.php/dav";
pub const OCS_FILES_API: &str = "ocs/v2.php/apps/files/api/v1";
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Deserializable account configuration.
///
/// Every field has a default so partial documents are accepted; validation
/// happens in [`ClientConfig::into_context`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub account: String,
    pub base_url: String,
    pub user: String,
    /// Server-side user id; defaults to `user` when empty.
    pub user_id: String,
    pub password: String,
    pub user_agent: Option<String>,
    pub dav_root: String,
    /// Per-request timeout in seconds. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
    pub search_timeout_secs: u64,
    pub headers: BTreeMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            account: String::new(),
            base_url: String::new(),
            user: String::new(),
            user_id: String::new(),
            password: String::new(),
            user_agent: None,
            dav_root: DEFAULT_DAV_ROOT.to_string(),
            request_timeout_secs: None,
            search_timeout_secs: DEFAULT_SEARCH_TIMEOUT.as_secs(),
            headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str, user: &str, password: &str) -> Self {
        Self {
            account: format!("{user} {base_url}"),
            base_url: base_url.to_string(),
            user: user.to_string(),
            password: password.to_string(),
            ..Self::default()
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, DavError> {
        serde_json::from_str(raw).map_err(|e| DavError::Encoding(format!("invalid config: {e}")))
    }

    pub fn into_context(self) -> Result<RequestContext, DavError> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        let base: Uri = base_url
            .parse()
            .map_err(|_| DavError::bad_url(&self.base_url))?;
        if base.scheme().is_none() || base.authority().is_none() {
            return Err(DavError::bad_url(&self.base_url));
        }

        let user_id = if self.user_id.is_empty() {
            self.user.clone()
        } else {
            self.user_id
        };
        let account = if self.account.is_empty() {
            format!("{} {}", self.user, base_url)
        } else {
            self.account
        };
        let dav_root = trim_slashes(&self.dav_root);
        let dav_root = if dav_root.is_empty() {
            DEFAULT_DAV_ROOT.to_string()
        } else {
            dav_root.to_string()
        };

        Ok(RequestContext {
            account,
            base_url,
            user: self.user,
            user_id,
            password: self.password,
            user_agent: self.user_agent,
            dav_root,
            headers: self.headers.into_iter().collect(),
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
            search_timeout: Duration::from_secs(self.search_timeout_secs),
        })
    }
}

/// Read-only state every request builder needs.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub account: String,
    /// Base URL without a trailing slash, e.g. `https://cloud.example.com`.
    pub base_url: String,
    pub user: String,
    pub user_id: String,
    pub password: String,
    pub user_agent: Option<String>,
    /// DAV root without surrounding slashes, e.g. `remote.php/dav`.
    pub dav_root: String,
    pub headers: Vec<(String, String)>,
    pub request_timeout: Option<Duration>,
    pub search_timeout: Duration,
}

impl RequestContext {
    /// Server path of the user's files collection, unencoded.
    pub fn files_root(&self) -> String {
        format!("/{}/files/{}", self.dav_root, self.user_id)
    }

    /// Server path for `path` inside the user's files collection, unencoded.
    pub fn files_path(&self, path: &str) -> String {
        let rel = path.trim_start_matches('/');
        if rel.is_empty() {
            format!("{}/", self.files_root())
        } else {
            format!("{}/{}", self.files_root(), rel)
        }
    }

    /// Server path below the DAV root, unencoded.
    pub fn dav_path(&self, rel: &str) -> String {
        let rel = rel.trim_start_matches('/');
        if rel.is_empty() {
            format!("/{}", self.dav_root)
        } else {
            format!("/{}/{}", self.dav_root, rel)
        }
    }

    /// Encode a server path and join it with the base URL.
    pub fn url_for_path(&self, raw_path: &str) -> Result<Uri, DavError> {
        let joined = format!("{}{}", self.base_url, encode_path(raw_path));
        joined.parse().map_err(|_| DavError::bad_url(joined))
    }

    /// Join an OCS endpoint (already carrying its query string) with the base URL.
    pub fn ocs_url(&self, endpoint_and_query: &str) -> Result<Uri, DavError> {
        let joined = format!(
            "{}/{}",
            self.base_url,
            endpoint_and_query.trim_start_matches('/')
        );
        joined.parse().map_err(|_| DavError::bad_url(joined))
    }
}

/// Per-call overrides.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub custom_user_agent: Option<String>,
    pub custom_headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.custom_user_agent = Some(user_agent.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.custom_headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
