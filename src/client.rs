use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use hyper::Response;
use hyper::body::Incoming;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::comments::CommentsClient;
use crate::common::compression::{decompress_body, detect_encodings};
use crate::common::cookies::CookieStore;
use crate::context::{ClientConfig, RequestContext, RequestOptions};
use crate::dispatch::{Completion, RequestHandle, spawn_with_callback, spawn_with_channel};
use crate::editing::EditingClient;
use crate::error::{DavError, classify_exchange};
use crate::files::FilesClient;
use crate::reachability::{ClientDelegate, Reachability, ReachabilityStatus};
use crate::request::DavRequest;
use crate::webdav::client::WebDavClient;

/// Entry point for one account on one server.
///
/// Owns the account's [`RequestContext`] and shares the connection pool,
/// cookie store and reachability state with its clones. Operations are grouped
/// by domain:
///
/// - [`files`](Self::files): listing, search, transfer, favorites, trash
/// - [`comments`](Self::comments): per-file comment threads
/// - [`editing`](Self::editing): OCS direct editing
///
/// Cloning `CloudClient` is cheap and reuses the same connection pool.
///
/// ```no_run
/// use cloud_dav_rs::{ClientConfig, CloudClient, Depth, RequestOptions};
///
/// # async fn example() -> Result<(), cloud_dav_rs::DavError> {
/// let client = CloudClient::new(ClientConfig::new(
///     "https://cloud.example.com",
///     "alice",
///     "app-password",
/// ))?;
/// let listing = client
///     .files()
///     .read_file_or_folder("Photos", Depth::One, false, None, &RequestOptions::default())
///     .await?;
/// for file in listing.children() {
///     println!("{} {}", file.file_name, file.size);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct CloudClient {
    webdav: WebDavClient,
    context: Arc<RequestContext>,
    defaults: RequestOptions,
    cookies: CookieStore,
    reachability: Reachability,
}

impl CloudClient {
    pub fn new(config: ClientConfig) -> Result<Self, DavError> {
        Ok(Self::from_context(config.into_context()?))
    }

    pub fn from_context(context: RequestContext) -> Self {
        Self {
            webdav: WebDavClient::new(),
            context: Arc::new(context),
            defaults: RequestOptions::default(),
            cookies: CookieStore::new(),
            reachability: Reachability::new(),
        }
    }

    /// Use a preconfigured transport, e.g. one shared with other clients.
    pub fn with_transport(mut self, webdav: WebDavClient) -> Self {
        self.webdav = webdav;
        self
    }

    /// Options applied under every call's own options.
    pub fn with_options(mut self, defaults: RequestOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Share a cookie store between several clients.
    pub fn with_cookie_store(mut self, cookies: CookieStore) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_delegate(self, delegate: Arc<dyn ClientDelegate>) -> Self {
        self.reachability.set_delegate(Some(delegate));
        self
    }

    pub fn context(&self) -> &RequestContext {
        &self.context
    }

    pub fn account(&self) -> &str {
        &self.context.account
    }

    pub fn cookies(&self) -> &CookieStore {
        &self.cookies
    }

    pub fn transport(&self) -> &WebDavClient {
        &self.webdav
    }

    pub fn files(&self) -> FilesClient<'_> {
        FilesClient::new(self)
    }

    pub fn comments(&self) -> CommentsClient<'_> {
        CommentsClient::new(self)
    }

    pub fn editing(&self) -> EditingClient<'_> {
        EditingClient::new(self)
    }

    // ----------- Account and session -----------

    /// Client for another account, sharing transport, cookie store and
    /// reachability. Session cookies are dropped as for
    /// [`notify_account_changed`](Self::notify_account_changed).
    pub fn switch_account(&self, context: RequestContext) -> CloudClient {
        self.notify_account_changed();
        CloudClient {
            webdav: self.webdav.clone(),
            context: Arc::new(context),
            defaults: self.defaults.clone(),
            cookies: self.cookies.clone(),
            reachability: self.reachability.clone(),
        }
    }

    /// The active account changed somewhere in the application; every session
    /// cookie is discarded.
    pub fn notify_account_changed(&self) {
        debug!(account = %self.context.account, "account changed, clearing session cookies");
        self.cookies.clear();
    }

    /// Drop every stored session cookie.
    pub fn session_delete_cookies(&self) {
        self.cookies.clear();
    }

    // ----------- Reachability -----------

    pub fn report_reachability(&self, status: ReachabilityStatus) {
        self.reachability.report(status);
    }

    pub fn reachability_status(&self) -> ReachabilityStatus {
        self.reachability.status()
    }

    pub fn is_network_reachable(&self) -> bool {
        self.reachability.status().is_reachable()
    }

    // ----------- Sending -----------

    /// Client defaults overlaid with the call's options. Call headers come last and win.
    pub(crate) fn options(&self, call: &RequestOptions) -> RequestOptions {
        RequestOptions {
            custom_user_agent: call
                .custom_user_agent
                .clone()
                .or_else(|| self.defaults.custom_user_agent.clone()),
            custom_headers: self
                .defaults
                .custom_headers
                .iter()
                .chain(call.custom_headers.iter())
                .cloned()
                .collect(),
            timeout: call.timeout.or(self.defaults.timeout),
        }
    }

    /// Send `req` with the account's cookies, aggregate the body and reject
    /// any status outside `200..300`.
    pub async fn perform(&self, mut req: DavRequest) -> Result<Response<Bytes>, DavError> {
        let account = self.account();
        self.cookies.inject(account, &mut req.headers);

        let resp = self.webdav.send(req).await?;
        self.cookies.store_from_headers(account, resp.headers());

        classify_exchange(None, Some(resp.status()), resp.body())?;
        Ok(resp)
    }

    /// Streaming variant of [`perform`](Self::perform). A failed status has its
    /// body read so the error carries the server's message.
    pub async fn perform_stream(&self, mut req: DavRequest) -> Result<Response<Incoming>, DavError> {
        let account = self.account();
        self.cookies.inject(account, &mut req.headers);

        let resp = self.webdav.send_stream(req).await?;
        self.cookies.store_from_headers(account, resp.headers());

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let encodings = detect_encodings(resp.headers());
        let body = match decompress_body(resp.into_body(), &encodings).await {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "could not read error body");
                Bytes::new()
            }
        };
        Err(DavError::protocol(status, &body))
    }

    // ----------- Dispatch -----------

    /// Run `operation` in the background and call `on_complete` exactly once.
    ///
    /// ```no_run
    /// # use cloud_dav_rs::{CloudClient, RequestOptions};
    /// # fn example(client: &CloudClient) {
    /// let handle = client.dispatch(
    ///     |c| async move { c.files().delete("old.txt", &RequestOptions::default()).await },
    ///     |done| println!("{}: {:?}", done.account, done.normalized()),
    /// );
    /// handle.cancel();
    /// # }
    /// ```
    pub fn dispatch<T, F, Fut, C>(&self, operation: F, on_complete: C) -> RequestHandle
    where
        T: Send + 'static,
        F: FnOnce(CloudClient) -> Fut,
        Fut: Future<Output = Result<T, DavError>> + Send + 'static,
        C: FnOnce(Completion<T>) + Send + 'static,
    {
        let fut = operation(self.clone());
        spawn_with_callback(self.context.account.clone(), fut, on_complete)
    }

    /// Like [`dispatch`](Self::dispatch) with the completion delivered on a oneshot channel.
    pub fn dispatch_channel<T, F, Fut>(
        &self,
        operation: F,
    ) -> (RequestHandle, oneshot::Receiver<Completion<T>>)
    where
        T: Send + 'static,
        F: FnOnce(CloudClient) -> Fut,
        Fut: Future<Output = Result<T, DavError>> + Send + 'static,
    {
        let fut = operation(self.clone());
        spawn_with_channel(self.context.account.clone(), fut)
    }
}

impl std::fmt::Debug for CloudClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudClient")
            .field("account", &self.context.account)
            .field("base_url", &self.context.base_url)
            .field("reachability", &self.reachability)
            .finish_non_exhaustive()
    }
}
